//! Source positions and spans.
//!
//! A [`Position`] is a `(filename, line, column, byte offset)` tuple as read
//! directly off the [`Streamer`](../../cflex_lex/struct.Streamer.html) before
//! any trigraph/line-splice transformation is applied — line and column are
//! always the *physical* coordinates of the byte.  A [`Span`] is simply a
//! pair of positions bracketing a token or a diagnostic.

use std::rc::Rc;

/// A 1-based line/column position, plus the absolute byte offset, within a
/// named file.
///
/// `line` and `column` are 1-based; `column` counts bytes, not code points.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub filename: Rc<str>,
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

impl Position {
    pub fn new(filename: Rc<str>, line: u32, column: u32, offset: u32) -> Self {
        debug_assert!(line >= 1 && column >= 1);
        Self {
            filename,
            line,
            column,
            offset,
        }
    }
}

/// A half-open-ish source range: `start.offset <= end.offset`.
///
/// Both endpoints share the same `filename` in well-formed spans; nothing in
/// this crate enforces that beyond convention, since the lexer only ever
/// builds spans from positions it has itself produced for a single file.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(end.offset >= start.offset);
        Self { start, end }
    }

    /// A zero-width span at a single position (used for `EOF` and similar).
    pub fn point(pos: Position) -> Self {
        let end = pos.clone();
        Self { start: pos, end }
    }

    /// Merge two spans that describe adjacent or overlapping source ranges,
    /// taking the earliest start and the latest end. Used by the
    /// string-concatenation pass to widen a span across several merged
    /// literal tokens.
    pub fn to(&self, other: &Span) -> Span {
        let start = if self.start.offset <= other.start.offset {
            self.start.clone()
        } else {
            other.start.clone()
        };
        let end = if self.end.offset >= other.end.offset {
            self.end.clone()
        } else {
            other.end.clone()
        };
        Span { start, end }
    }
}
