//! Fold and soft-wrap layout over a text source.
//!
//! [`DisplayIndex`] owns the set of folded buffer ranges and the wrap column
//! and recomputes a [`HunkList`] whenever either changes. The layout records
//! every discontinuity between buffer and screen columns (fold placeholders,
//! wrap breaks, tab expansions) so position translation is exact. The line
//! builder only acts on the fold and wrap hunks.

use crate::{BufferPoint, Hunk, HunkError, HunkList, HunkSource, ScreenPoint};
use core_config::DisplayConfig;
use core_text::{TextSource, leading_whitespace_width};
use std::borrow::Cow;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fold {
    pub start: BufferPoint,
    pub end: BufferPoint,
}

pub struct DisplayIndex<'a, T: TextSource + ?Sized> {
    text: &'a T,
    config: &'a DisplayConfig,
    folds: Vec<Fold>,
    soft_wrap: Option<usize>,
    hunks: HunkList,
}

impl<'a, T: TextSource + ?Sized> DisplayIndex<'a, T> {
    pub fn new(text: &'a T, config: &'a DisplayConfig) -> Self {
        let mut index = Self {
            text,
            config,
            folds: Vec::new(),
            soft_wrap: None,
            hunks: HunkList::default(),
        };
        index.relayout();
        index
    }

    /// Collapse `[start, end)` into the fold glyph. Folds may touch but not
    /// overlap.
    pub fn fold(&mut self, start: BufferPoint, end: BufferPoint) -> Result<(), HunkError> {
        if end <= start {
            return Err(HunkError::EmptyFold { start, end });
        }
        for point in [start, end] {
            if !self.contains(point) {
                return Err(HunkError::FoldOutOfBounds { point });
            }
        }
        let ix = self.folds.partition_point(|f| f.start < start);
        let overlaps_prev = ix
            .checked_sub(1)
            .is_some_and(|i| self.folds[i].end > start);
        let overlaps_next = self.folds.get(ix).is_some_and(|f| f.start < end);
        if overlaps_prev || overlaps_next {
            return Err(HunkError::FoldOverlap { start, end });
        }
        self.folds.insert(ix, Fold { start, end });
        self.relayout();
        Ok(())
    }

    pub fn unfold_all(&mut self) {
        if self.folds.is_empty() {
            return;
        }
        self.folds.clear();
        self.relayout();
    }

    /// Set or clear the soft-wrap column.
    pub fn set_soft_wrap(&mut self, column: Option<usize>) -> Result<(), HunkError> {
        if column == Some(0) {
            return Err(HunkError::ZeroWrapColumn);
        }
        if self.soft_wrap != column {
            self.soft_wrap = column;
            self.relayout();
        }
        Ok(())
    }

    pub fn folds(&self) -> &[Fold] {
        &self.folds
    }

    pub fn soft_wrap(&self) -> Option<usize> {
        self.soft_wrap
    }

    pub fn hunks(&self) -> &HunkList {
        &self.hunks
    }

    fn contains(&self, point: BufferPoint) -> bool {
        point.row < self.text.line_count()
            && self
                .text
                .line_text(point.row)
                .is_some_and(|t| point.column <= t.chars().count())
    }

    fn relayout(&mut self) {
        let hunks = Layout::new(self.text, self.config, self.soft_wrap).run(&self.folds);
        self.hunks = HunkList::from_sorted(hunks, self.text.line_count());
        debug!(
            target: "display.layout",
            folds = self.folds.len(),
            soft_wrap = ?self.soft_wrap,
            hunks = self.hunks.hunks().len(),
            screen_lines = self.hunks.screen_line_count(),
            "layout_rebuilt"
        );
    }
}

impl<T: TextSource + ?Sized> HunkSource for DisplayIndex<'_, T> {
    fn screen_line_count(&self) -> usize {
        self.hunks.screen_line_count()
    }

    fn translate_screen_position(&self, point: ScreenPoint) -> BufferPoint {
        self.hunks.translate_screen_position(point)
    }

    fn translate_buffer_position(&self, point: BufferPoint) -> ScreenPoint {
        self.hunks.translate_buffer_position(point)
    }

    fn hunks_in_new_range(&self, start: ScreenPoint, end: ScreenPoint) -> Cow<'_, [Hunk]> {
        self.hunks.hunks_in_new_range(start, end)
    }
}

/// One pass over the whole buffer producing the sorted hunk list.
struct Layout<'a, T: TextSource + ?Sized> {
    text: &'a T,
    config: &'a DisplayConfig,
    wrap: Option<usize>,
    hunks: Vec<Hunk>,
    screen: ScreenPoint,
    /// Indentation of the current screen line; nothing wraps before it.
    segment_indent: usize,
}

impl<'a, T: TextSource + ?Sized> Layout<'a, T> {
    fn new(text: &'a T, config: &'a DisplayConfig, wrap: Option<usize>) -> Self {
        Self {
            text,
            config,
            wrap,
            hunks: Vec::new(),
            screen: ScreenPoint::origin(),
            segment_indent: 0,
        }
    }

    fn run(mut self, folds: &[Fold]) -> Vec<Hunk> {
        let tab = self.config.tab_length.max(1);
        let line_count = self.text.line_count();
        let mut folds = folds.iter().peekable();
        let mut row = 0;

        while row < line_count {
            let mut chars = self.row_chars(row);
            let wrap_indent = self.wrap.map_or(0, |limit| {
                let text: String = chars.iter().collect();
                let indent = leading_whitespace_width(&text, tab);
                if indent * 2 >= limit { 0 } else { indent }
            });
            self.screen = ScreenPoint::new(self.screen.row, 0);
            self.segment_indent = 0;
            let mut col = 0;

            loop {
                while let Some(fold) = folds.next_if(|f| f.start == BufferPoint::new(row, col)) {
                    let width = self.config.fold_glyph_width();
                    self.wrap_before(BufferPoint::new(row, col), width, wrap_indent);
                    self.hunks.push(Hunk::fold(
                        fold.start,
                        fold.end,
                        self.screen,
                        &self.config.fold_glyph,
                    ));
                    self.screen.column += width;
                    if fold.end.row != row {
                        row = fold.end.row;
                        chars = self.row_chars(row);
                    }
                    col = fold.end.column;
                }
                let Some(&ch) = chars.get(col) else {
                    break;
                };
                let at = BufferPoint::new(row, col);
                if ch == '\t' {
                    let width = tab - self.screen.column % tab;
                    self.wrap_before(at, width, wrap_indent);
                    let width = tab - self.screen.column % tab;
                    self.hunks.push(Hunk::tab(at, self.screen, width));
                    self.screen.column += width;
                } else {
                    self.wrap_before(at, 1, wrap_indent);
                    self.screen.column += 1;
                }
                col += 1;
            }

            row += 1;
            self.screen.row += 1;
        }
        self.hunks
    }

    /// Break the line before `at` if a glyph of `width` would cross the wrap
    /// column and the line already holds something past its indentation.
    fn wrap_before(&mut self, at: BufferPoint, width: usize, indent: usize) {
        let Some(limit) = self.wrap else {
            return;
        };
        if self.screen.column + width > limit && self.screen.column > self.segment_indent {
            self.hunks.push(Hunk::soft_wrap(at, self.screen, indent));
            self.screen = ScreenPoint::new(self.screen.row + 1, indent);
            self.segment_indent = indent;
        }
    }

    fn row_chars(&self, row: usize) -> Vec<char> {
        self.text
            .line_text(row)
            .map(|t| t.chars().collect())
            .unwrap_or_default()
    }
}
