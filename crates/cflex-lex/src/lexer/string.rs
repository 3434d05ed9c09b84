//! String and character literal lexing, including inline concatenation of
//! adjacent literals.

use cflex_util::{Position, Span};

use crate::concat::concatenate;
use crate::context::WarningKind;
use crate::token::{Payload, StringEncoding, StringUnits, Token, TokenFlags, TokenKind};
use crate::unicode::{encode_utf8, pack_multichar, validate_ucn_scalar};

use super::Lexer;

impl<'ctx, 'i> Lexer<'ctx, 'i> {
    pub(super) fn lex_string_or_char(&mut self, start: Position) -> Token<'i> {
        let (encoding, quote) = self.consume_prefix_and_quote();

        if quote == b'\'' {
            return self.lex_char_literal(start, encoding);
        }

        let mut parts: Vec<(StringUnits, StringEncoding)> = Vec::new();
        parts.push(self.lex_one_string_body(encoding));

        loop {
            self.skip_whitespace_and_comments();
            let (next_encoding, prefix_len) = self.peek_string_prefix();
            if self.peek_at(prefix_len) != Some(b'"') {
                break;
            }
            for _ in 0..=prefix_len {
                self.bump();
            }
            parts.push(self.lex_one_string_body(next_encoding));
        }

        let end = self.current_pos();
        let span = Span::new(start, end);

        let (units, result_encoding) = if parts.len() == 1 {
            parts.pop().unwrap()
        } else {
            if self.context.warning_enabled(WarningKind::StringWidthPromotion) {
                self.warn_at(
                    WarningKind::StringWidthPromotion,
                    span.clone(),
                    "adjacent string literals concatenated with width promotion",
                );
            }
            concatenate(&parts, self.context.wchar_bits.bits())
        };

        let mut tok = Token::new(TokenKind::StringLiteral, span);
        tok.flags = TokenFlags::from_encoding(result_encoding);
        tok.payload = Payload::String { units, encoding: result_encoding };
        tok
    }

    /// Determines the string/char prefix at the current position without
    /// consuming anything, returning its encoding and byte length (0 for no
    /// prefix, 1 for `L`/`U`/`u`, 2 for `u8`).
    fn peek_string_prefix(&mut self) -> (StringEncoding, usize) {
        match self.peek() {
            Some(b'L') => (StringEncoding::Wide, 1),
            Some(b'U') => (StringEncoding::Utf32, 1),
            Some(b'u') => {
                if self.peek_at(1) == Some(b'8') {
                    (StringEncoding::Utf8, 2)
                } else {
                    (StringEncoding::Utf16, 1)
                }
            }
            _ => (StringEncoding::Plain, 0),
        }
    }

    fn consume_prefix_and_quote(&mut self) -> (StringEncoding, u8) {
        let (encoding, prefix_len) = self.peek_string_prefix();
        for _ in 0..prefix_len {
            self.bump();
        }
        let quote = self.peek().unwrap_or(b'"');
        self.bump();
        (encoding, quote)
    }

    fn lex_one_string_body(&mut self, encoding: StringEncoding) -> (StringUnits, StringEncoding) {
        let mut scalars = Vec::new();
        let mut closed = false;
        let start = self.current_pos();
        loop {
            match self.peek() {
                None | Some(b'\n') => break,
                Some(b'"') => {
                    self.bump();
                    closed = true;
                    break;
                }
                Some(b'\\') => {
                    if let Some(v) = self.consume_escape(encoding) {
                        scalars.push(v);
                    }
                }
                Some(b) if b < 0x80 => {
                    scalars.push(b as u32);
                    self.bump();
                }
                Some(b) => {
                    scalars.push(self.consume_utf8_scalar(b, encoding));
                }
            }
        }
        if !closed {
            self.error_at(Span::point(start), "unterminated string literal");
            self.enter_recovery();
        }
        let units = encode_body(&scalars, encoding, self.context.wchar_bits.bits());
        (units, encoding)
    }

    fn lex_char_literal(&mut self, start: Position, encoding: StringEncoding) -> Token<'i> {
        let mut scalars = Vec::new();
        let mut closed = false;
        loop {
            match self.peek() {
                None | Some(b'\n') => break,
                Some(b'\'') => {
                    self.bump();
                    closed = true;
                    break;
                }
                Some(b'\\') => {
                    if let Some(v) = self.consume_escape(encoding) {
                        scalars.push(v);
                    }
                }
                Some(b) if b < 0x80 => {
                    scalars.push(b as u32);
                    self.bump();
                }
                Some(b) => {
                    scalars.push(self.consume_utf8_scalar(b, encoding));
                }
            }
        }
        let end = self.current_pos();
        let span = Span::new(start, end);
        if !closed {
            self.error_at(span.clone(), "unterminated character constant");
        } else if scalars.is_empty() {
            self.error_at(span.clone(), "empty character constant");
        }
        if scalars.len() > 1 {
            self.warn_at(WarningKind::MulticharChar, span.clone(), "multi-character character constant");
        }

        let unit_bits = encoding.code_unit_bits(self.context.wchar_bits.bits());
        let value = pack_multichar(&scalars, unit_bits);
        let max_value = self.context.wchar_bits.max_value();
        let value = if encoding == StringEncoding::Wide && value > max_value {
            self.warn_at(WarningKind::Truncation, span.clone(), "character constant truncated for target wchar_t");
            0xFFFD
        } else {
            value
        };

        let mut tok = Token::new(TokenKind::CharacterConstant, span);
        tok.flags = TokenFlags::from_encoding(encoding);
        tok.payload = Payload::Character { value, encoding };
        tok
    }

    fn consume_utf8_scalar(&mut self, lead: u8, encoding: StringEncoding) -> u32 {
        let len = if lead & 0xE0 == 0xC0 {
            2
        } else if lead & 0xF0 == 0xE0 {
            3
        } else if lead & 0xF8 == 0xF0 {
            4
        } else {
            1
        };
        let mut bytes = Vec::with_capacity(len);
        for _ in 0..len {
            if let Some(b) = self.peek() {
                bytes.push(b);
                self.bump();
            } else {
                break;
            }
        }
        if encoding == StringEncoding::Plain {
            let pos = self.current_pos();
            self.error_at(Span::point(pos), "non-ASCII byte in a plain string/char literal");
            return b'?' as u32;
        }
        let (value, _) = crate::unicode::decode_utf8_scalar(&bytes);
        value
    }

    fn consume_escape(&mut self, encoding: StringEncoding) -> Option<u32> {
        let pos = self.current_pos();
        self.bump(); // backslash
        match self.peek() {
            Some(b'a') => { self.bump(); Some(0x07) }
            Some(b'b') => { self.bump(); Some(0x08) }
            Some(b'f') => { self.bump(); Some(0x0C) }
            Some(b'n') => { self.bump(); Some(0x0A) }
            Some(b'r') => { self.bump(); Some(0x0D) }
            Some(b't') => { self.bump(); Some(0x09) }
            Some(b'v') => { self.bump(); Some(0x0B) }
            Some(b'\\') => { self.bump(); Some(b'\\' as u32) }
            Some(b'\'') => { self.bump(); Some(b'\'' as u32) }
            Some(b'"') => { self.bump(); Some(b'"' as u32) }
            Some(b'?') => { self.bump(); Some(b'?' as u32) }
            Some(b'x') => {
                self.bump();
                let mut value: u32 = 0;
                let mut any = false;
                while let Some(v) = self.peek().and_then(crate::unicode::hex_value) {
                    value = (value << 4) | v;
                    self.bump();
                    any = true;
                }
                if !any {
                    self.error_at(Span::point(pos), "\\x used with no following hex digits");
                }
                Some(value)
            }
            Some(b'0'..=b'7') => {
                let mut value: u32 = 0;
                for _ in 0..3 {
                    match self.peek().and_then(|b| crate::unicode::digit_value(b, 8)) {
                        Some(v) => {
                            value = (value << 3) | v;
                            self.bump();
                        }
                        None => break,
                    }
                }
                Some(value)
            }
            Some(b'u') | Some(b'U') => {
                if encoding == StringEncoding::Plain {
                    self.error_at(Span::point(pos.clone()), "universal character name not allowed in plain literal");
                }
                let digits = if self.peek() == Some(b'u') { 4 } else { 8 };
                self.bump();
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
                Some(validate_ucn_scalar(value))
            }
            Some(other) => {
                self.error_at(Span::point(pos), format!("unknown escape sequence '\\{}'", other as char));
                self.bump();
                Some(other as u32)
            }
            None => {
                self.error_at(Span::point(pos), "unterminated escape sequence");
                None
            }
        }
    }
}

fn encode_body(scalars: &[u32], encoding: StringEncoding, wchar_bits: u32) -> StringUnits {
    match encoding {
        StringEncoding::Plain => {
            let mut bytes: Vec<u8> = scalars.iter().map(|&s| s as u8).collect();
            bytes.push(0);
            StringUnits::Bytes(bytes)
        }
        StringEncoding::Utf8 => {
            let mut bytes = Vec::new();
            for &s in scalars {
                encode_utf8(s, &mut bytes);
            }
            bytes.push(0);
            StringUnits::Bytes(bytes)
        }
        StringEncoding::Utf16 => {
            let mut units = Vec::new();
            for &s in scalars {
                crate::unicode::encode_utf16(s, &mut units);
            }
            units.push(0);
            StringUnits::U16(units)
        }
        StringEncoding::Utf32 => {
            let mut units: Vec<u32> = scalars.to_vec();
            units.push(0);
            StringUnits::U32(units)
        }
        StringEncoding::Wide => {
            if wchar_bits == 16 {
                let mut units = Vec::new();
                for &s in scalars {
                    crate::unicode::encode_utf16(s, &mut units);
                }
                units.push(0);
                StringUnits::U16(units)
            } else {
                let mut units: Vec<u32> = scalars.to_vec();
                units.push(0);
                StringUnits::U32(units)
            }
        }
    }
}
