//! Programmer/environment-facing errors, distinct from lexical
//! `Diagnostic`s. The only thing in this crate that can fail this way is
//! opening or seeking the backing file.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StreamerError {
    #[error("could not open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("i/o error reading {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("seek offset {offset} out of bounds (file length {len})")]
    SeekOutOfBounds { offset: u64, len: u64 },
}

pub type StreamerResult<T> = std::result::Result<T, StreamerError>;
