//! The lexer: drives a [`Streamer`] through the C translation model's early
//! phases and emits [`Token`]s.
//!
//! Line-splice absorption and trigraph recognition are fused into a single
//! `next_logical` byte reader sitting directly on top of the streamer, the
//! way a C preprocessor's byte-level `next_preproc` wrapper would. Everything
//! above that layer (whitespace/comments, directive gate, identifiers,
//! numbers, literals, punctuators) reads through a small lookahead queue
//! fed by `next_logical`, so a splice or trigraph occurring mid-identifier
//! or mid-escape is absorbed transparently without any of those scanners
//! needing to know about it.

mod identifier;
mod number;
mod operator;
mod string;

use std::collections::VecDeque;

use cflex_util::{ColorMode, Diagnostic, Handler, Interner, Level, Position, Span, Symbol};

use crate::context::{Context, WarningKind};
use crate::error::StreamerResult;
use crate::streamer::Streamer;
use crate::token::{Payload, Token, TokenFlags, TokenKind};

/// Which include-like directive is active, arming `expect_header_name` and
/// (eventually) telling a preprocessor how to resolve the header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PpKind {
    None,
    Include,
    IncludeNext,
    Import,
    Embed,
    Other,
}

/// One byte past the splice/trigraph absorption layer, tagged with the
/// position of the first physical byte of the (possibly multi-byte)
/// sequence it came from — this is the position every span in this crate
/// is built from (pre-splice physical coordinates, not post-absorption
/// ones).
struct LogicalByte {
    byte: u8,
    pos: Position,
}

pub struct Lexer<'ctx, 'i> {
    streamer: Streamer,
    context: &'ctx Context,
    interner: &'i Interner,
    handler: Handler,

    lookahead: VecDeque<LogicalByte>,

    at_line_start: bool,
    in_directive: bool,
    /// Armed immediately after the `#` token that opens a directive; only
    /// the very next identifier is classified against the directive table.
    expect_directive_name: bool,
    expect_header_name: bool,
    pp_kind: PpKind,
    reached_eof: bool,
}

impl<'ctx, 'i> Lexer<'ctx, 'i> {
    pub fn new(path: &str, context: &'ctx Context, interner: &'i Interner) -> StreamerResult<Self> {
        let streamer = Streamer::open(path)?;
        let mut lexer = Self {
            streamer,
            context,
            interner,
            handler: Handler::new(context.color_mode, context.max_errors),
            lookahead: VecDeque::new(),
            at_line_start: true,
            in_directive: false,
            expect_directive_name: false,
            expect_header_name: false,
            pp_kind: PpKind::None,
            reached_eof: false,
        };
        lexer.strip_bom();
        Ok(lexer)
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    /// The active preprocessor directive kind, if a directive name has just
    /// been classified — consulted by a preprocessor layered on top of this
    /// lexer to decide how to resolve a following header-name.
    pub fn pp_kind(&self) -> PpKind {
        self.pp_kind
    }

    pub fn handler_mut(&mut self) -> &mut Handler {
        &mut self.handler
    }

    fn strip_bom(&mut self) {
        const BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
        let mut matched = 0;
        for &want in &BOM {
            if self.streamer.peek() == want as i32 {
                self.streamer.next();
                matched += 1;
            } else {
                break;
            }
        }
        if matched == BOM.len() {
            self.streamer.reset_column(1);
        } else {
            // Partial/no match: nothing was actually consumed unless all
            // three matched, so nothing needs to be put back.
            debug_assert_eq!(matched, 0, "BOM is only ever all-or-nothing at offset 0");
        }
    }

    // ---- P1/P2: logical byte layer -----------------------------------

    fn next_logical(&mut self) -> Option<LogicalByte> {
        loop {
            let pos = self.streamer.position();
            let b = self.read_raw_or_trigraph(pos.clone())?;
            if b == b'\\' && self.splice_follows() {
                self.consume_splice();
                continue;
            }
            return Some(LogicalByte { byte: b, pos });
        }
    }

    fn read_raw_or_trigraph(&mut self, pos: Position) -> Option<u8> {
        if self.context.enable_trigraphs {
            if let Some(mapped) = self.trigraph_at_cursor() {
                self.streamer.next();
                self.streamer.next();
                self.streamer.next();
                self.warn_at(WarningKind::Trigraphs, Span::point(pos), "trigraph sequence used");
                return Some(mapped);
            }
        } else if self.trigraph_at_cursor().is_some() {
            self.warn_at(
                WarningKind::Trigraphs,
                Span::point(pos),
                "trigraph sequence ignored (trigraphs not enabled)",
            );
        }
        let c = self.streamer.peek();
        if c < 0 {
            return None;
        }
        self.streamer.next();
        Some(c as u8)
    }

    fn trigraph_at_cursor(&mut self) -> Option<u8> {
        let blob = self.streamer.get_blob();
        if blob.current() == b'?' && blob.at(1) == b'?' {
            trigraph_map(blob.at(2))
        } else {
            None
        }
    }

    fn splice_follows(&mut self) -> bool {
        let blob = self.streamer.get_blob();
        blob.current() == b'\n' || (blob.current() == b'\r' && blob.at(1) == b'\n')
    }

    fn consume_splice(&mut self) {
        let c = self.streamer.next();
        if c == b'\r' as i32 {
            self.streamer.next();
        }
    }

    // ---- lookahead queue over the logical layer ----------------------

    fn fill(&mut self, n: usize) {
        while self.lookahead.len() <= n {
            match self.next_logical() {
                Some(lb) => self.lookahead.push_back(lb),
                None => break,
            }
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.fill(0);
        self.lookahead.front().map(|l| l.byte)
    }

    fn peek_at(&mut self, n: usize) -> Option<u8> {
        self.fill(n);
        self.lookahead.get(n).map(|l| l.byte)
    }

    fn peek_pos(&mut self) -> Position {
        self.fill(0);
        match self.lookahead.front() {
            Some(l) => l.pos.clone(),
            None => self.streamer.position(),
        }
    }

    fn bump(&mut self) -> Option<u8> {
        self.fill(0);
        self.lookahead.pop_front().map(|l| l.byte)
    }

    fn current_pos(&mut self) -> Position {
        self.peek_pos()
    }

    // ---- diagnostics ---------------------------------------------------

    fn warn_at(&mut self, kind: WarningKind, span: Span, message: impl Into<String>) {
        if !self.context.warning_enabled(kind) {
            return;
        }
        let level = if self.context.warning_is_error(kind) {
            Level::Error
        } else {
            Level::Warning
        };
        self.handler.report(Diagnostic::new(level, span, message));
    }

    fn error_at(&mut self, span: Span, message: impl Into<String>) {
        self.handler.report(Diagnostic::new(Level::Error, span, message));
    }

    fn intern(&self, bytes: &[u8]) -> Symbol<'i> {
        self.interner.intern(bytes)
    }

    // ---- whitespace / comments (P5) ------------------------------------

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(b' ') | Some(b'\t') | Some(0x0B) | Some(0x0C) => {
                    self.bump();
                }
                Some(b'\n') => {
                    self.bump();
                    self.at_line_start = true;
                    if self.in_directive {
                        self.in_directive = false;
                        self.expect_directive_name = false;
                        self.expect_header_name = false;
                        self.pp_kind = PpKind::None;
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    if !self.context.gnu_extensions
                        && self.context.lang_std == crate::context::LangStd::C89
                    {
                        let pos = self.current_pos();
                        self.warn_at(
                            WarningKind::Pedantic,
                            Span::point(pos),
                            "// comments are a C99 extension",
                        );
                    }
                    while !matches!(self.peek(), None | Some(b'\n')) {
                        self.bump();
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    let start = self.current_pos();
                    self.bump();
                    self.bump();
                    let mut closed = false;
                    loop {
                        match self.peek() {
                            None => break,
                            Some(b'*') if self.peek_at(1) == Some(b'/') => {
                                self.bump();
                                self.bump();
                                closed = true;
                                break;
                            }
                            _ => {
                                self.bump();
                            }
                        }
                    }
                    if !closed {
                        self.error_at(Span::point(start), "unterminated block comment");
                        self.enter_recovery();
                    }
                }
                _ => break,
            }
        }
    }

    /// Safe-point recovery: consume bytes until the next newline or `;`,
    /// leaving `at_line_start`/`in_directive` consistent with however that
    /// terminator resets the state machine.
    fn enter_recovery(&mut self) {
        loop {
            match self.peek() {
                None => break,
                Some(b'\n') => break,
                Some(b';') => {
                    self.bump();
                    break;
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    fn make_eof(&mut self) -> Token<'i> {
        let pos = self.streamer.position();
        Token::new(TokenKind::Eof, Span::point(pos))
    }

    // ---- main entry point ----------------------------------------------

    /// Lexes and returns the next token. Idempotent once EOF has been
    /// reached.
    pub fn next_token(&mut self) -> Token<'i> {
        if self.reached_eof {
            return self.make_eof();
        }
        self.skip_whitespace_and_comments();

        let start = self.current_pos();

        // Captured once per token, before any branch clears it: the
        // directive gate below needs to know whether *this* token is the
        // first one on its line, but every token (identifier, number,
        // string/char, header-name, punctuator) starts a "not at line
        // start" run from here on, the same way the reference clears its
        // line-start flag in each of its own token paths.
        let at_line_start = self.at_line_start;
        self.at_line_start = false;

        if self.expect_header_name {
            // `<...>` is only a header-name spelling for `#include`/
            // `#include_next`; `#import`/`#embed` only ever take the quoted
            // form here, matching the reference's directive-specific gate.
            let angle_bracket_allowed = matches!(self.pp_kind, PpKind::Include | PpKind::IncludeNext);
            match self.peek() {
                Some(b'<') if angle_bracket_allowed => return self.lex_header_name(start, b'>'),
                Some(b'"') => return self.lex_header_name(start, b'"'),
                _ => self.expect_header_name = false,
            }
        }

        let Some(b) = self.peek() else {
            self.reached_eof = true;
            return Token::new(TokenKind::Eof, Span::point(start));
        };

        if self.is_identifier_start(b) {
            return self.lex_identifier(start);
        }
        if b.is_ascii_digit() || (b == b'.' && self.peek_at(1).is_some_and(|n| n.is_ascii_digit())) {
            return self.lex_number(start);
        }
        if self.at_string_prefix() {
            return self.lex_string_or_char(start);
        }
        if b == b'\'' {
            return self.lex_string_or_char(start);
        }

        if let Some(kind) = self.scan_punctuator() {
            if at_line_start && !self.in_directive && matches!(kind, TokenKind::Hash) {
                self.in_directive = true;
                self.expect_directive_name = true;
            }
            let end = self.current_pos();
            return Token::new(kind, Span::new(start, end));
        }

        self.bump();
        let msg = format!("unexpected character '\\x{b:02X}'");
        self.error_at(Span::point(start.clone()), msg.clone());
        let mut tok = Token::new(TokenKind::Error, Span::point(start));
        tok.payload = Payload::Interned(self.intern(msg.as_bytes()));
        tok
    }

    fn at_string_prefix(&mut self) -> bool {
        let b = match self.peek() {
            Some(b) => b,
            None => return false,
        };
        match b {
            b'"' => true,
            b'L' | b'U' => self.peek_at(1) == Some(b'"') || self.peek_at(1) == Some(b'\''),
            b'u' => match self.peek_at(1) {
                Some(b'"') | Some(b'\'') => true,
                Some(b'8') => self.peek_at(2) == Some(b'"'),
                _ => false,
            },
            _ => false,
        }
    }

    fn is_identifier_start(&mut self, b: u8) -> bool {
        crate::unicode::is_ascii_ident_start(b)
            || b >= 0x80
            || (b == b'\\' && matches!(self.peek_at(1), Some(b'u') | Some(b'U')))
            || (self.context.gnu_extensions && b == b'$')
    }

    fn lex_header_name(&mut self, start: Position, closing: u8) -> Token<'i> {
        self.bump(); // opening delimiter
        let mut body = Vec::new();
        let mut closed = false;
        loop {
            match self.peek() {
                None | Some(b'\n') => break,
                Some(b) if b == closing => {
                    self.bump();
                    closed = true;
                    break;
                }
                Some(b) if closing == b'"' && b == b'\\' && matches!(self.peek_at(1), Some(b'"') | Some(b'\\')) => {
                    self.bump();
                    body.push(self.peek().unwrap());
                    self.bump();
                }
                Some(b) => {
                    body.push(b);
                    self.bump();
                }
            }
        }
        self.expect_header_name = false;
        let end = self.current_pos();
        if !closed {
            self.error_at(Span::new(start.clone(), end.clone()), "unterminated header-name");
        }
        let mut tok = Token::new(TokenKind::HeaderName, Span::new(start, end));
        tok.payload = Payload::Interned(self.intern(&body));
        tok
    }
}

/// Maps a trigraph's third character to its punctuator byte.
fn trigraph_map(third: u8) -> Option<u8> {
    Some(match third {
        b'=' => b'#',
        b'/' => b'\\',
        b'\'' => b'^',
        b'(' => b'[',
        b')' => b']',
        b'!' => b'|',
        b'<' => b'{',
        b'>' => b'}',
        b'-' => b'~',
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn lex_all(src: &[u8]) -> (Vec<TokenKind>, Handler) {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(src).unwrap();
        f.flush().unwrap();
        let ctx = Context::default();
        let interner = Interner::new();
        let mut lexer = Lexer::new(f.path().to_str().unwrap(), &ctx, &interner).unwrap();
        let mut kinds = Vec::new();
        loop {
            let t = lexer.next_token();
            let is_eof = t.is_eof();
            kinds.push(t.kind);
            if is_eof {
                break;
            }
        }
        let handler = std::mem::replace(&mut lexer.handler, Handler::new(ColorMode::Never, 0));
        (kinds, handler)
    }

    #[test]
    fn empty_file_is_single_eof() {
        let (kinds, _) = lex_all(b"");
        assert_eq!(kinds, vec![TokenKind::Eof]);
    }

    #[test]
    fn bom_only_file_is_single_eof() {
        let (kinds, _) = lex_all(&[0xEF, 0xBB, 0xBF]);
        assert_eq!(kinds, vec![TokenKind::Eof]);
    }

    #[test]
    fn unterminated_comment_reports_then_eof() {
        let (kinds, handler) = lex_all(b"/* never closes");
        assert_eq!(kinds, vec![TokenKind::Eof]);
        assert_eq!(handler.error_count(), 1);
    }

    #[test]
    fn line_splice_at_eof_is_literal_backslash() {
        let (kinds, _) = lex_all(b"\\");
        assert_eq!(kinds, vec![TokenKind::Error, TokenKind::Eof]);
    }

    #[test]
    fn simple_statement_lexes_expected_kinds() {
        let (kinds, _) = lex_all(b"int x = 1 + 2;");
        use TokenKind::*;
        assert_eq!(
            kinds,
            vec![
                Keyword(crate::token::Keyword::Int),
                Identifier,
                Assign,
                IntegerConstant,
                Plus,
                IntegerConstant,
                Semicolon,
                Eof,
            ]
        );
    }

    #[test]
    fn include_directive_lexes_header_name() {
        let (kinds, _) = lex_all(b"#include <stdio.h>\n");
        use TokenKind::*;
        assert_eq!(
            kinds,
            vec![Hash, DirectiveName(crate::token::Keyword::Include), HeaderName, Eof]
        );
    }

    #[test]
    fn line_splice_inside_identifier_is_absorbed() {
        let (kinds, _) = lex_all(b"ab\\\ncd");
        assert_eq!(kinds, vec![TokenKind::Identifier, TokenKind::Eof]);
    }
}
