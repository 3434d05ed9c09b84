//! P7: identifier scanning and keyword/directive classification.

use cflex_util::{Position, Span};

use crate::context::WarningKind;
use crate::keyword::{self, C23Status};
use crate::token::{Payload, Token, TokenKind};
use crate::unicode::{encode_utf8, validate_ucn_scalar};

use super::{Lexer, PpKind};

impl<'ctx, 'i> Lexer<'ctx, 'i> {
    pub(super) fn lex_identifier(&mut self, start: Position) -> Token<'i> {
        let mut buf = Vec::new();
        loop {
            match self.peek() {
                Some(b) if crate::unicode::is_ascii_ident_continue(b) => {
                    buf.push(b);
                    self.bump();
                }
                Some(b'\\') if matches!(self.peek_at(1), Some(b'u') | Some(b'U')) => {
                    self.consume_ucn_into(&mut buf);
                }
                Some(b) if b >= 0x80 => {
                    self.consume_utf8_lead_into(b, &mut buf);
                }
                Some(b'$') if self.context.gnu_extensions => {
                    buf.push(b'$');
                    self.bump();
                }
                _ => break,
            }
        }

        let end = self.current_pos();
        let span = Span::new(start, end);
        let spelling = self.intern(&buf);

        if self.expect_directive_name {
            self.expect_directive_name = false;
            if let Some(kw) = keyword::lookup_directive(spelling.as_str()) {
                self.pp_kind = match kw {
                    crate::token::Keyword::Include => PpKind::Include,
                    crate::token::Keyword::IncludeNext => PpKind::IncludeNext,
                    crate::token::Keyword::Import => PpKind::Import,
                    crate::token::Keyword::Embed => PpKind::Embed,
                    _ => PpKind::Other,
                };
                if matches!(self.pp_kind, PpKind::Include | PpKind::IncludeNext | PpKind::Import | PpKind::Embed) {
                    self.expect_header_name = true;
                }
                let mut tok = Token::new(TokenKind::DirectiveName(kw), span);
                tok.payload = Payload::Interned(spelling);
                return tok;
            }
        }

        if let Some(info) = keyword::lookup_keyword(spelling.as_str()) {
            if info.available(self.context.lang_std, self.context.gnu_extensions) {
                if info.c23_status == C23Status::Removed
                    && self.context.lang_std == crate::context::LangStd::C23
                    && !self.context.gnu_extensions
                {
                    self.error_at(span.clone(), format!("'{}' was removed in C23", spelling));
                } else if info.c23_status == C23Status::Deprecated
                    && self.context.lang_std == crate::context::LangStd::C23
                {
                    self.warn_at(
                        WarningKind::Deprecated,
                        span.clone(),
                        format!("'{}' is deprecated in C23", spelling),
                    );
                }
            } else {
                self.warn_at(
                    WarningKind::Pedantic,
                    span.clone(),
                    format!("'{}' is not a keyword in the active standard/dialect", spelling),
                );
            }
            let mut tok = Token::new(TokenKind::Keyword(info.keyword), span);
            tok.payload = Payload::Interned(spelling);
            return tok;
        }

        let mut tok = Token::new(TokenKind::Identifier, span);
        tok.payload = Payload::Interned(spelling);
        tok
    }

    fn consume_ucn_into(&mut self, buf: &mut Vec<u8>) {
        let pos = self.current_pos();
        self.bump(); // backslash
        let digits = if self.peek() == Some(b'u') { 4 } else { 8 };
        self.bump(); // u / U
        let mut value: u32 = 0;
        let mut read = 0;
        while read < digits {
            match self.peek().and_then(crate::unicode::hex_value) {
                Some(v) => {
                    value = (value << 4) | v;
                    self.bump();
                    read += 1;
                }
                None => break,
            }
        }
        if read != digits {
            self.error_at(Span::point(pos), "incomplete universal character name");
        }
        encode_utf8(validate_ucn_scalar(value), buf);
    }

    fn consume_utf8_lead_into(&mut self, lead: u8, buf: &mut Vec<u8>) {
        let len = if lead & 0xE0 == 0xC0 {
            2
        } else if lead & 0xF0 == 0xE0 {
            3
        } else if lead & 0xF8 == 0xF0 {
            4
        } else {
            1
        };
        for _ in 0..len {
            if let Some(b) = self.peek() {
                buf.push(b);
                self.bump();
            } else {
                break;
            }
        }
    }
}
