//! Rope-based text buffer abstraction.
//!
//! The display pipeline reads rows through the [`TextSource`] trait so any
//! storage can back it; [`Buffer`] is the rope-backed implementation used by
//! the binary and the tests. Rows are exposed without their line terminator;
//! the terminator kind is reported separately by [`TextSource::line_ending`].

use anyhow::Result;
use ropey::{Rope, RopeSlice};
use std::borrow::Cow;

pub mod line_ending;
pub mod source;
pub mod whitespace;
pub mod width;

pub use line_ending::LineEnding;
pub use source::TextSource;
pub use whitespace::{leading_whitespace_width, trailing_whitespace_start};
pub use width::glyph_width;

/// A text buffer backed by a `ropey::Rope`.
#[derive(Clone)]
pub struct Buffer {
    rope: Rope,
    pub name: String,
}

impl Buffer {
    /// Construct a buffer from an in-memory string slice. Line endings are
    /// kept verbatim so end-of-line invisibles can reflect the source file.
    pub fn from_str(name: impl Into<String>, content: &str) -> Result<Self> {
        Ok(Self {
            rope: Rope::from_str(content),
            name: name.into(),
        })
    }

    /// Total number of rows. A trailing terminator opens one final empty row.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Row content (terminator excluded) plus the terminator kind, if any.
    fn split_row(&self, idx: usize) -> Option<(RopeSlice<'_>, Option<LineEnding>)> {
        if idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(idx);
        let n = line.len_chars();
        let last = n.checked_sub(1).map(|i| line.char(i));
        let before_last = n.checked_sub(2).map(|i| line.char(i));
        let split = match (before_last, last) {
            (Some('\r'), Some('\n')) => (line.slice(..n - 2), Some(LineEnding::Crlf)),
            (_, Some('\n')) => (line.slice(..n - 1), Some(LineEnding::Lf)),
            (_, Some('\r')) => (line.slice(..n - 1), Some(LineEnding::Cr)),
            _ => (line, None),
        };
        Some(split)
    }
}

impl TextSource for Buffer {
    fn line_count(&self) -> usize {
        Buffer::line_count(self)
    }

    fn line_text(&self, row: usize) -> Option<Cow<'_, str>> {
        let (content, _) = self.split_row(row)?;
        // Contiguous rows borrow straight out of the rope chunk.
        Some(match content.as_str() {
            Some(s) => Cow::Borrowed(s),
            None => Cow::Owned(content.to_string()),
        })
    }

    fn line_ending(&self, row: usize) -> Option<LineEnding> {
        self.split_row(row).and_then(|(_, ending)| ending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_buffer_and_read_line() {
        let b = Buffer::from_str("test", "hello\nworld").unwrap();
        assert_eq!(b.line_count(), 2);
        assert_eq!(b.line_text(0).unwrap(), "hello");
        assert_eq!(b.line_text(1).unwrap(), "world");
        assert!(b.line_text(2).is_none());
    }

    #[test]
    fn line_endings_reported_per_row() {
        let b = Buffer::from_str("t", "a\r\nb\nc\rd").unwrap();
        assert_eq!(b.line_count(), 4);
        assert_eq!(b.line_ending(0), Some(LineEnding::Crlf));
        assert_eq!(b.line_ending(1), Some(LineEnding::Lf));
        assert_eq!(b.line_ending(2), Some(LineEnding::Cr));
        assert_eq!(b.line_ending(3), None);
        assert_eq!(b.line_text(0).unwrap(), "a");
        assert_eq!(b.line_text(2).unwrap(), "c");
    }

    #[test]
    fn trailing_newline_opens_empty_row() {
        let b = Buffer::from_str("t", "x\n").unwrap();
        assert_eq!(b.line_count(), 2);
        assert_eq!(b.line_text(1).unwrap(), "");
        assert_eq!(b.line_ending(1), None);
    }

    #[test]
    fn multibyte_rows_stay_intact() {
        let b = Buffer::from_str("t", "漢字\n⚙️ gear\n").unwrap();
        assert_eq!(b.line_text(0).unwrap(), "漢字");
        assert_eq!(b.line_text(1).unwrap(), "⚙️ gear");
    }
}
