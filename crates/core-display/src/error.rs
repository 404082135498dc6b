//! Error types for the display pipeline.
//!
//! Every variant reports a broken caller obligation: unsorted or overlapping
//! hunks, rows the text source does not have, or a malformed tag stream.

use crate::BufferPoint;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("buffer row {row} is out of bounds")]
    RowOutOfBounds { row: usize },
    #[error("hunk {index} starts before its predecessor")]
    UnorderedHunks { index: usize },
    #[error("hunk {index} starts inside its predecessor")]
    OverlappingHunks { index: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HunkError {
    #[error("hunk {index} has a range that ends before it starts")]
    InvertedRange { index: usize },
    #[error("hunk {index} overlaps or precedes its predecessor")]
    Overlapping { index: usize },
    #[error("hunk {index} ends past the last buffer row ({line_count} rows)")]
    OutOfBounds { index: usize, line_count: usize },
    #[error("fold {start:?}..{end:?} is empty")]
    EmptyFold { start: BufferPoint, end: BufferPoint },
    #[error("fold position {point:?} lies outside the buffer")]
    FoldOutOfBounds { point: BufferPoint },
    #[error("fold {start:?}..{end:?} overlaps an existing fold")]
    FoldOverlap { start: BufferPoint, end: BufferPoint },
    #[error("soft wrap column must be at least 1")]
    ZeroWrapColumn,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TagStreamError {
    #[error("close code {code} at entry {offset} has no open tag")]
    Underflow { code: i32, offset: usize },
    #[error("close code {code} at entry {offset} does not match open code {open}")]
    Mismatched { code: i32, open: i32, offset: usize },
    #[error("unknown tag code {code} at entry {offset}")]
    UnknownCode { code: i32, offset: usize },
    #[error("{open} tag(s) left open at end of line")]
    Unclosed { open: usize },
    #[error("runs cover {runs} columns but the text is {text} columns wide")]
    LengthMismatch { runs: usize, text: usize },
}
