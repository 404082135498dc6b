//! Buffer↔screen discontinuities and the trait that supplies them.
//!
//! A hunk maps the buffer range `[old_start, old_end)` onto the screen range
//! `[new_start, new_end)`, rendered as `new_text`. Outside hunks the two
//! spaces advance in lockstep, so any position can be translated from the
//! nearest preceding hunk by offset. Hunk lists are sorted by `old_start` and
//! non-overlapping in both spaces.

use crate::{BufferPoint, HunkError, ScreenPoint};
use core_text::glyph_width;
use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub old_start: BufferPoint,
    pub old_end: BufferPoint,
    pub new_start: ScreenPoint,
    pub new_end: ScreenPoint,
    pub new_text: String,
}

/// How the line builder treats a hunk, decided by its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HunkKind {
    /// `new_text` is the fold placeholder.
    Fold,
    /// Zero buffer width; `new_end.column` is the continuation indent.
    SoftWrap,
    /// Any other substitution (tab expansion, for instance). Skipped by the
    /// builder, which expands tabs itself.
    Substitution,
}

impl Hunk {
    pub fn fold(
        old_start: BufferPoint,
        old_end: BufferPoint,
        new_start: ScreenPoint,
        glyph: &str,
    ) -> Self {
        let width = glyph_width(glyph);
        Self {
            old_start,
            old_end,
            new_start,
            new_end: ScreenPoint::new(new_start.row, new_start.column + width),
            new_text: glyph.to_string(),
        }
    }

    /// Line break before the buffer position `at`, which starts the next
    /// screen row after `indent` columns of indentation.
    pub fn soft_wrap(at: BufferPoint, new_start: ScreenPoint, indent: usize) -> Self {
        Self {
            old_start: at,
            old_end: at,
            new_start,
            new_end: ScreenPoint::new(new_start.row + 1, indent),
            new_text: String::new(),
        }
    }

    /// Hard tab at `at` occupying `width` screen columns.
    pub fn tab(at: BufferPoint, new_start: ScreenPoint, width: usize) -> Self {
        Self {
            old_start: at,
            old_end: BufferPoint::new(at.row, at.column + 1),
            new_start,
            new_end: ScreenPoint::new(new_start.row, new_start.column + width),
            new_text: " ".repeat(width),
        }
    }

    /// Folds are never empty in the buffer, so a zero-width hunk is always a
    /// wrap whatever the fold glyph is.
    pub fn kind(&self, fold_glyph: &str) -> HunkKind {
        if self.old_start == self.old_end {
            HunkKind::SoftWrap
        } else if self.new_text == fold_glyph {
            HunkKind::Fold
        } else {
            HunkKind::Substitution
        }
    }
}

/// Spatial index consumed by the line builder.
pub trait HunkSource {
    /// Total number of screen rows.
    fn screen_line_count(&self) -> usize;

    /// Buffer position shown at `point`; positions inside a hunk clip back to
    /// its `old_start`.
    fn translate_screen_position(&self, point: ScreenPoint) -> BufferPoint;

    /// Screen position of `point`; positions inside a hunk map to its
    /// `new_start`.
    fn translate_buffer_position(&self, point: BufferPoint) -> ScreenPoint;

    /// Hunks intersecting the screen range `[start, end)`, sorted by
    /// `old_start`.
    fn hunks_in_new_range(&self, start: ScreenPoint, end: ScreenPoint) -> Cow<'_, [Hunk]>;
}

/// A validated, sorted hunk list over a buffer of known row count.
///
/// Translation is exact as long as the list records every discontinuity,
/// including tab expansions.
#[derive(Debug, Clone, Default)]
pub struct HunkList {
    hunks: Vec<Hunk>,
    buffer_line_count: usize,
    screen_line_count: usize,
}

impl HunkList {
    pub fn new(hunks: Vec<Hunk>, buffer_line_count: usize) -> Result<Self, HunkError> {
        for (index, hunk) in hunks.iter().enumerate() {
            if hunk.old_end < hunk.old_start || hunk.new_end < hunk.new_start {
                return Err(HunkError::InvertedRange { index });
            }
            if hunk.old_end.row >= buffer_line_count.max(1) {
                return Err(HunkError::OutOfBounds {
                    index,
                    line_count: buffer_line_count,
                });
            }
            if let Some(prev) = index.checked_sub(1).map(|i| &hunks[i]) {
                if hunk.old_start < prev.old_end || hunk.new_start < prev.new_end {
                    return Err(HunkError::Overlapping { index });
                }
            }
        }
        Ok(Self::from_sorted(hunks, buffer_line_count))
    }

    /// Construct from a list the caller produced in order (layout output).
    pub(crate) fn from_sorted(hunks: Vec<Hunk>, buffer_line_count: usize) -> Self {
        let added: usize = hunks
            .iter()
            .map(|h| h.new_end.row - h.new_start.row)
            .sum();
        let removed: usize = hunks
            .iter()
            .map(|h| h.old_end.row - h.old_start.row)
            .sum();
        Self {
            screen_line_count: (buffer_line_count + added).saturating_sub(removed),
            hunks,
            buffer_line_count,
        }
    }

    pub fn hunks(&self) -> &[Hunk] {
        &self.hunks
    }

    pub fn buffer_line_count(&self) -> usize {
        self.buffer_line_count
    }
}

impl HunkSource for HunkList {
    fn screen_line_count(&self) -> usize {
        self.screen_line_count
    }

    fn translate_screen_position(&self, point: ScreenPoint) -> BufferPoint {
        let ix = self.hunks.partition_point(|h| h.new_start <= point);
        let Some(hunk) = ix.checked_sub(1).map(|i| &self.hunks[i]) else {
            return BufferPoint::new(point.row, point.column);
        };
        if point < hunk.new_end {
            return hunk.old_start;
        }
        if point.row == hunk.new_end.row {
            BufferPoint::new(
                hunk.old_end.row,
                hunk.old_end.column + (point.column - hunk.new_end.column),
            )
        } else {
            BufferPoint::new(
                hunk.old_end.row + (point.row - hunk.new_end.row),
                point.column,
            )
        }
    }

    fn translate_buffer_position(&self, point: BufferPoint) -> ScreenPoint {
        let ix = self.hunks.partition_point(|h| h.old_start <= point);
        let Some(hunk) = ix.checked_sub(1).map(|i| &self.hunks[i]) else {
            return ScreenPoint::new(point.row, point.column);
        };
        if point < hunk.old_end {
            return hunk.new_start;
        }
        if point.row == hunk.old_end.row {
            ScreenPoint::new(
                hunk.new_end.row,
                hunk.new_end.column + (point.column - hunk.old_end.column),
            )
        } else {
            ScreenPoint::new(
                hunk.new_end.row + (point.row - hunk.old_end.row),
                point.column,
            )
        }
    }

    fn hunks_in_new_range(&self, start: ScreenPoint, end: ScreenPoint) -> Cow<'_, [Hunk]> {
        let lo = self.hunks.partition_point(|h| h.new_end < start);
        let hi = self.hunks.partition_point(|h| h.new_start < end).max(lo);
        Cow::Borrowed(&self.hunks[lo..hi])
    }
}
