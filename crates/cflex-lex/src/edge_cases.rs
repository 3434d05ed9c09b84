//! End-to-end edge case tests for cflex-lex: escape/concatenation, header
//! names, hex floats, line splices, multichar constants, plus additional
//! boundary cases for trigraphs, digraphs, digit separators, and GNU
//! extensions.

#[cfg(test)]
mod tests {
    use std::io::Write;

    use cflex_util::Interner;

    use crate::context::{Context, LangStd};
    use crate::token::{IntValue, Keyword, NumericExtra, Payload, StringEncoding, StringUnits, TokenKind};
    use crate::Lexer;

    fn lex_all_with(src: &[u8], ctx: &Context) -> Vec<crate::Token<'static>> {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(src).unwrap();
        f.flush().unwrap();
        let interner = Box::leak(Box::new(Interner::new()));
        let mut lexer = Lexer::new(f.path().to_str().unwrap(), ctx, interner).unwrap();
        let mut out = Vec::new();
        loop {
            let t = lexer.next_token();
            let eof = t.is_eof();
            out.push(t);
            if eof {
                break;
            }
        }
        out
    }

    fn lex_all(src: &[u8]) -> Vec<crate::Token<'static>> {
        lex_all_with(src, &Context::default())
    }

    #[test]
    fn s1_simple_declaration() {
        let toks = lex_all(b"int x = 1 + 2;");
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
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
    fn s2_escape_and_concatenation() {
        let toks = lex_all(br#""A\nB\x41" "C""#);
        let str_tok = &toks[0];
        assert_eq!(str_tok.kind, TokenKind::StringLiteral);
        match &str_tok.payload {
            Payload::String { units, encoding } => {
                assert_eq!(*encoding, StringEncoding::Plain);
                assert_eq!(units, &StringUnits::Bytes(b"A\nBAC\0".to_vec()));
            }
            other => panic!("expected string payload, got {other:?}"),
        }
    }

    #[test]
    fn s3_utf16_string() {
        let toks = lex_all("u\"\u{03A9}\"".as_bytes());
        match &toks[0].payload {
            Payload::String { units, encoding } => {
                assert_eq!(*encoding, StringEncoding::Utf16);
                assert_eq!(units, &StringUnits::U16(vec![0x03A9, 0]));
            }
            other => panic!("expected string payload, got {other:?}"),
        }
    }

    #[test]
    fn s4_include_directive() {
        let toks = lex_all(b"#include <stdio.h>\n");
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Hash,
                TokenKind::DirectiveName(Keyword::Include),
                TokenKind::HeaderName,
                TokenKind::Eof,
            ]
        );
        match &toks[2].payload {
            Payload::Interned(sym) => assert_eq!(sym.as_str(), "stdio.h"),
            other => panic!("expected interned header-name payload, got {other:?}"),
        }
    }

    #[test]
    fn s5_hex_float() {
        let toks = lex_all(b"0x1.fp3");
        assert_eq!(toks[0].kind, TokenKind::FloatingConstant);
        match (&toks[0].payload, &toks[0].numeric_extra) {
            (Payload::Float(v), Some(NumericExtra::Float { style, .. })) => {
                assert!((v - 15.5).abs() < 1e-9);
                assert_eq!(*style, crate::token::FloatStyle::Hex);
            }
            other => panic!("unexpected payload/extra: {other:?}"),
        }
    }

    #[test]
    fn s6_line_splice_inside_identifier() {
        let toks = lex_all(b"ab\\\ncd");
        assert_eq!(toks[0].kind, TokenKind::Identifier);
        match &toks[0].payload {
            Payload::Interned(sym) => assert_eq!(sym.as_str(), "abcd"),
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn s7_multichar_constant() {
        let toks = lex_all(b"'AB'");
        assert_eq!(toks[0].kind, TokenKind::CharacterConstant);
        match &toks[0].payload {
            Payload::Character { value, encoding } => {
                assert_eq!(*encoding, StringEncoding::Plain);
                assert_eq!(*value, (('A' as u32) << 8) | 'B' as u32);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn empty_file_is_single_eof_at_one_one() {
        let toks = lex_all(b"");
        assert_eq!(toks.len(), 1);
        assert!(toks[0].is_eof());
        assert_eq!(toks[0].span.start.line, 1);
        assert_eq!(toks[0].span.start.column, 1);
    }

    #[test]
    fn digit_separators_are_stripped() {
        let toks = lex_all(b"1'000'000");
        match &toks[0].payload {
            Payload::Integer(IntValue::Signed(v)) => assert_eq!(*v, 1_000_000),
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn binary_literal_with_gnu_underscore_separator() {
        let mut ctx = Context::default();
        ctx.gnu_extensions = true;
        let toks = lex_all_with(b"0b1010_1010", &ctx);
        match (&toks[0].payload, &toks[0].numeric_extra) {
            (Payload::Integer(IntValue::Signed(v)), Some(NumericExtra::Integer { base })) => {
                assert_eq!(*v, 0b1010_1010);
                assert_eq!(*base, crate::token::IntegerBase::Binary);
            }
            other => panic!("unexpected payload/extra: {other:?}"),
        }
    }

    #[test]
    fn trigraphs_map_to_punctuators_when_enabled() {
        let mut ctx = Context::default();
        ctx.enable_trigraphs = true;
        let toks = lex_all_with(b"??=define", &ctx);
        assert_eq!(toks[0].kind, TokenKind::Hash);
    }

    #[test]
    fn digraphs_map_to_brackets_when_enabled() {
        let mut ctx = Context::default();
        ctx.enable_trigraphs = true;
        let toks = lex_all_with(b"<: :>", &ctx);
        assert_eq!(toks[0].kind, TokenKind::LBracket);
        assert_eq!(toks[1].kind, TokenKind::RBracket);
    }

    #[test]
    fn gnu_dollar_sign_identifier() {
        let mut ctx = Context::default();
        ctx.gnu_extensions = true;
        let toks = lex_all_with(b"foo$bar", &ctx);
        assert_eq!(toks[0].kind, TokenKind::Identifier);
        match &toks[0].payload {
            Payload::Interned(sym) => assert_eq!(sym.as_str(), "foo$bar"),
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn underscored_c11_keyword_deprecated_under_c23() {
        let mut ctx = Context::default();
        ctx.lang_std = LangStd::C23;
        let toks = lex_all_with(b"_Alignas", &ctx);
        assert_eq!(toks[0].kind, TokenKind::Keyword(Keyword::Alignas));
    }

    #[test]
    fn c23_removed_keyword_errors_without_gnu() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"_Imaginary").unwrap();
        f.flush().unwrap();
        let mut ctx = Context::default();
        ctx.lang_std = LangStd::C23;
        let interner = Interner::new();
        let mut lexer = Lexer::new(f.path().to_str().unwrap(), &ctx, &interner).unwrap();
        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::Keyword(Keyword::Imaginary));
        assert_eq!(lexer.handler().error_count(), 1);
    }

    #[test]
    fn c23_removed_keyword_survives_under_gnu() {
        let mut ctx = Context::default();
        ctx.lang_std = LangStd::C23;
        ctx.gnu_extensions = true;
        let toks = lex_all_with(b"_Imaginary", &ctx);
        assert_eq!(toks[0].kind, TokenKind::Keyword(Keyword::Imaginary));
    }

    #[test]
    fn hash_mid_line_after_identifier_is_not_a_directive() {
        let mut ctx = Context::default();
        ctx.lang_std = LangStd::C23;
        let toks = lex_all_with(b"a #include <b.h>", &ctx);
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        use TokenKind::*;
        assert_eq!(
            kinds,
            vec![Identifier, Hash, Identifier, Lt, Identifier, Period, Identifier, Gt, Eof]
        );
    }

    #[test]
    fn import_directive_does_not_accept_angle_bracket_header_name() {
        let toks = lex_all(b"#import <x>\n");
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        use TokenKind::*;
        assert_eq!(kinds, vec![Hash, DirectiveName(Keyword::Import), Lt, Identifier, Gt, Eof]);
    }

    #[test]
    fn file_ending_mid_comment_reports_one_diagnostic_then_eof() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"/* oops").unwrap();
        f.flush().unwrap();
        let ctx = Context::default();
        let interner = Interner::new();
        let mut lexer = Lexer::new(f.path().to_str().unwrap(), &ctx, &interner).unwrap();
        let tok = lexer.next_token();
        assert!(tok.is_eof());
        assert_eq!(lexer.handler().error_count(), 1);
    }
}
