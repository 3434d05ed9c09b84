//! cflex-lex — a C lexical front end: trigraph/line-splice handling,
//! tokenization, and keyword/directive classification across C89 through
//! C23 plus GNU extensions.

pub mod concat;
pub mod context;
mod edge_cases;
pub mod error;
pub mod keyword;
pub mod lexer;
pub mod streamer;
pub mod token;
pub mod unicode;

pub use context::Context;
pub use error::{StreamerError, StreamerResult};
pub use lexer::{Lexer, PpKind};
pub use streamer::Streamer;
pub use token::{IntValue, Payload, Token, TokenKind};
