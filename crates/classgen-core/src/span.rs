//! Source location tracking for error reporting.
//!
//! Provides [`Span`] to track where declarations, expressions and errors
//! occur. The backend never reads source text; spans are supplied by the
//! front end and passed through unchanged.

use std::fmt;

/// A span of source code, represented by its starting position.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, byte-based).
    pub col: u32,
    /// Length in bytes (for additional context).
    pub len: u32,
}

impl Span {
    /// Create a new span from a line, column, and length.
    #[inline]
    pub fn new(line: u32, col: u32, len: u32) -> Self {
        Self { line, col, len }
    }

    /// Create a zero-length span at a position.
    #[inline]
    pub fn point(line: u32, col: u32) -> Self {
        Self { line, col, len: 0 }
    }

    /// Create a span that only knows its line.
    #[inline]
    pub fn line(line: u32) -> Self {
        Self { line, col: 0, len: 0 }
    }

    /// Whether this span carries no location at all.
    #[inline]
    pub fn is_unknown(&self) -> bool {
        self.line == 0
    }

    /// Use `fallback` when this span carries no location.
    #[inline]
    pub fn or(self, fallback: Span) -> Span {
        if self.is_unknown() { fallback } else { self }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
