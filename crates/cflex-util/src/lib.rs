//! cflex-util — shared foundation types for the cflex C lexer.
//!
//! This crate carries the parts of the lexer's infrastructure that are not
//! specific to C's lexical grammar: source positions and spans, a
//! bump-allocated string interner, and the span-anchored diagnostic
//! reporter, kept separate so a future parser or preprocessor crate can
//! reuse them without depending on `cflex-lex` itself.

pub mod diagnostic;
pub mod error;
pub mod span;
pub mod symbol;

pub use diagnostic::{ColorMode, Diagnostic, Handler, Level};
pub use span::{Position, Span};
pub use symbol::{Interner, Symbol};

// `Symbol` is meant to be passed around by value throughout the lexer and
// token model; keep it pointer-sized so that stays cheap.
static_assertions::assert_eq_size!(Symbol<'static>, (usize, usize));
