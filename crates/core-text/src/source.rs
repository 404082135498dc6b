//! Read-only row access consumed by the display pipeline.

use crate::LineEnding;
use crate::whitespace::leading_whitespace_width;
use std::borrow::Cow;

/// Row-oriented view of a text buffer.
///
/// Implementors must present an immutable snapshot for as long as they are
/// borrowed; the display layer never mutates text.
pub trait TextSource {
    /// Number of rows, including a final empty row after a trailing terminator.
    fn line_count(&self) -> usize;

    /// Row content without its terminator, or `None` when `row` is out of bounds.
    fn line_text(&self, row: usize) -> Option<Cow<'_, str>>;

    /// Terminator ending `row`; `None` for the last row or out-of-bounds rows.
    fn line_ending(&self, row: usize) -> Option<LineEnding>;

    /// Indentation width surrounding an empty row: the larger of the leading
    /// whitespace widths of the nearest non-empty rows above and below.
    fn leading_whitespace_width_near(&self, row: usize, tab_length: usize) -> usize {
        let above = (0..row)
            .rev()
            .find_map(|r| non_empty_indent(self.line_text(r), tab_length))
            .unwrap_or(0);
        let below = (row + 1..self.line_count())
            .find_map(|r| non_empty_indent(self.line_text(r), tab_length))
            .unwrap_or(0);
        above.max(below)
    }
}

fn non_empty_indent(text: Option<Cow<'_, str>>, tab_length: usize) -> Option<usize> {
    text.filter(|t| !t.is_empty())
        .map(|t| leading_whitespace_width(&t, tab_length))
}
