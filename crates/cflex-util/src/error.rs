//! Error taxonomy for `cflex-util`.
//!
//! These are ordinary `Result`-based errors for programmer/environment
//! failures — distinct from [`crate::diagnostic::Diagnostic`], which is the
//! user-facing, source-anchored channel for lexical findings. Nothing in
//! this crate's own operations can actually fail (interning and span
//! construction are infallible), so the taxonomy here exists for the
//! rendering path, which touches the filesystem.

use thiserror::Error;

/// Failures that can occur while rendering a [`crate::diagnostic::Diagnostic`]
/// (re-reading the offending source line from disk).
#[derive(Debug, Error)]
pub enum DiagnosticError {
    #[error("could not read source file {path} for diagnostic rendering: {source}")]
    SourceUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type DiagnosticResult<T> = std::result::Result<T, DiagnosticError>;
