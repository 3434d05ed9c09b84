//! Error handling for the `cflex` driver binary.

use thiserror::Error;

/// Errors that can abort a `cflex` invocation before or after lexing runs.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Streamer(#[from] cflex_lex::StreamerError),

    #[error("{0} lexical error(s) reported")]
    LexicalErrors(usize),
}

pub type Result<T> = std::result::Result<T, DriverError>;
