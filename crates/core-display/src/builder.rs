//! Screen-line construction.
//!
//! [`ScreenLineBuilder`] walks buffer columns of a screen-row range against
//! the hunk list of a [`HunkSource`], collapsing folds, breaking soft wraps,
//! expanding tabs and substituting invisibles. Each screen line carries a tag
//! stream of run lengths interleaved with open/close codes from a shared
//! [`TagRegistry`].
//!
//! Runs are split whenever the decoration set changes, before every hard tab
//! and on every indent-guide tick inside leading whitespace.

use crate::{
    BufferPoint, BuildError, Decorations, Hunk, HunkKind, HunkSource, ScreenLine, ScreenLineId,
    ScreenPoint, TagRegistry,
};
use core_config::DisplayConfig;
use core_text::{LineEnding, TextSource, glyph_width, trailing_whitespace_start};
use tracing::trace;

pub struct ScreenLineBuilder<'a, T: TextSource + ?Sized, H: HunkSource + ?Sized> {
    text: &'a T,
    hunks: &'a H,
    config: &'a DisplayConfig,
    tags: &'a TagRegistry,
}

impl<'a, T: TextSource + ?Sized, H: HunkSource + ?Sized> ScreenLineBuilder<'a, T, H> {
    pub fn new(
        text: &'a T,
        hunks: &'a H,
        config: &'a DisplayConfig,
        tags: &'a TagRegistry,
    ) -> Self {
        Self {
            text,
            hunks,
            config,
            tags,
        }
    }

    /// Build screen rows `[start, end)`; `end` is clamped to the screen line
    /// count. Returns exactly `min(end, count) - start` lines (none when the
    /// range is empty).
    pub fn build_screen_lines(
        &self,
        start: usize,
        end: usize,
    ) -> Result<Vec<ScreenLine>, BuildError> {
        let end = end.min(self.hunks.screen_line_count());
        if start >= end {
            return Ok(Vec::new());
        }

        let (first_screen_row, first_buffer_row) = self.align_start(start);
        let hunks = self.hunks.hunks_in_new_range(
            ScreenPoint::new(first_screen_row, 0),
            ScreenPoint::new(end, 0),
        );
        // Zero-width wraps may share a start with the hunk that follows them.
        for (pos, pair) in hunks.windows(2).enumerate() {
            let index = pos + 1;
            if pair[1].old_start < pair[0].old_start {
                return Err(BuildError::UnorderedHunks { index });
            }
            if pair[1].old_start < pair[0].old_end {
                return Err(BuildError::OverlappingHunks { index });
            }
        }

        let mut walker = Walker {
            text: self.text,
            config: self.config,
            tab_length: self.config.tab_length.max(1),
            hunks: &hunks,
            next_hunk: 0,
            screen_row: first_screen_row,
            start,
            end,
            buffer_row: first_buffer_row,
            buffer_column: 0,
            row: RowState::default(),
            emitter: LineEmitter::new(self.tags),
            in_leading: true,
            in_trailing: false,
            lines: Vec::with_capacity(end - start),
        };
        while walker.screen_row < end {
            if walker.walk_row()? {
                break;
            }
            walker.buffer_row += 1;
        }

        trace!(
            target: "display.build",
            start,
            end,
            first_screen_row,
            hunks = hunks.len(),
            lines = walker.lines.len(),
            "screen_lines_built"
        );
        Ok(walker.lines)
    }

    /// First screen row of the buffer row shown at `start`, and that buffer
    /// row. Walks back over wrap continuations and rows whose start is folded.
    fn align_start(&self, start: usize) -> (usize, usize) {
        let mut buffer_row = self
            .hunks
            .translate_screen_position(ScreenPoint::new(start, 0))
            .row;
        loop {
            let screen_row = self
                .hunks
                .translate_buffer_position(BufferPoint::new(buffer_row, 0))
                .row;
            let origin = self
                .hunks
                .translate_screen_position(ScreenPoint::new(screen_row, 0))
                .row;
            if origin >= buffer_row || screen_row == 0 {
                return (screen_row, buffer_row.min(origin));
            }
            buffer_row = origin;
        }
    }
}

#[derive(Debug, Default)]
struct RowState {
    chars: Vec<char>,
    ending: Option<LineEnding>,
    trailing_start: usize,
}

impl RowState {
    fn load<T: TextSource + ?Sized>(text: &T, row: usize) -> Result<Self, BuildError> {
        let line = text
            .line_text(row)
            .ok_or(BuildError::RowOutOfBounds { row })?;
        Ok(Self {
            chars: line.chars().collect(),
            ending: text.line_ending(row),
            trailing_start: trailing_whitespace_start(&line),
        })
    }
}

/// Accumulates one line's text and tag stream. `run` is the length in chars
/// of the run not yet written to `codes`; `column` counts screen cells.
struct LineEmitter<'t> {
    tags: &'t TagRegistry,
    text: String,
    codes: Vec<i32>,
    run: usize,
    column: usize,
}

impl<'t> LineEmitter<'t> {
    fn new(tags: &'t TagRegistry) -> Self {
        Self {
            tags,
            text: String::new(),
            codes: Vec::new(),
            run: 0,
            column: 0,
        }
    }

    fn flush_run(&mut self) {
        if self.run > 0 {
            self.codes.push(self.run as i32);
            self.run = 0;
        }
    }

    fn open(&mut self, flags: Decorations) {
        self.flush_run();
        if !flags.is_empty() {
            self.codes.push(self.tags.open_code_for(flags));
        }
    }

    fn close(&mut self, flags: Decorations) {
        self.flush_run();
        if !flags.is_empty() {
            self.codes.push(self.tags.close_code_for(flags));
        }
    }

    fn push_char(&mut self, ch: char) {
        self.text.push(ch);
        self.run += 1;
        self.column += 1;
    }

    /// Synthetic glyph that may span more than one cell per char.
    fn push_glyph(&mut self, glyph: &str) {
        self.text.push_str(glyph);
        self.run += glyph.chars().count();
        self.column += glyph_width(glyph);
    }

    fn push_spaces(&mut self, count: usize) {
        for _ in 0..count {
            self.push_char(' ');
        }
    }

    /// Pad with spaces up to `until`, opening an indent-guide run at every
    /// tab stop.
    fn indent_guides(&mut self, until: usize, tab_length: usize) {
        let mut open = Decorations::empty();
        while self.column < until {
            if self.column % tab_length == 0 {
                self.close(open);
                open = Decorations::INDENT_GUIDE;
                self.open(open);
            }
            self.push_char(' ');
        }
        self.close(open);
    }

    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn take(&mut self) -> (String, Vec<i32>) {
        self.flush_run();
        if self.codes.is_empty() {
            self.codes.push(0);
        }
        self.column = 0;
        (
            std::mem::take(&mut self.text),
            std::mem::take(&mut self.codes),
        )
    }
}

struct Walker<'w, T: TextSource + ?Sized> {
    text: &'w T,
    config: &'w DisplayConfig,
    tab_length: usize,
    hunks: &'w [Hunk],
    next_hunk: usize,
    screen_row: usize,
    start: usize,
    end: usize,
    buffer_row: usize,
    buffer_column: usize,
    row: RowState,
    emitter: LineEmitter<'w>,
    in_leading: bool,
    in_trailing: bool,
    lines: Vec<ScreenLine>,
}

impl<'w, T: TextSource + ?Sized> Walker<'w, T> {
    /// Render the current buffer row (plus any rows folds pull in). Returns
    /// `true` once the last requested line has been produced.
    fn walk_row(&mut self) -> Result<bool, BuildError> {
        self.row = RowState::load(self.text, self.buffer_row)?;
        self.buffer_column = 0;
        self.in_leading = true;
        self.in_trailing = false;
        let mut flags = Decorations::empty();

        loop {
            let mut previous = flags;
            self.skip_passed_hunks();
            while let Some(hunk) = self.hunk_at_cursor() {
                self.next_hunk += 1;
                match hunk.kind(&self.config.fold_glyph) {
                    HunkKind::Fold => {
                        self.apply_fold(hunk, previous)?;
                        previous = Decorations::FOLD_MARKER;
                    }
                    HunkKind::SoftWrap => {
                        if self.apply_wrap(hunk, previous) {
                            return Ok(true);
                        }
                        previous = Decorations::empty();
                    }
                    HunkKind::Substitution => {}
                }
            }

            if self.buffer_column >= self.row.trailing_start {
                self.in_trailing = true;
                self.in_leading = false;
            }
            let next = self.row.chars.get(self.buffer_column).copied();
            let (current, forced) = self.classify(next);
            flags = current;
            let changed = current != previous;

            if !previous.is_empty() && (changed || forced) {
                self.emitter.close(previous);
            }
            let Some(ch) = next else {
                self.end_of_row();
                break;
            };
            if (!current.is_empty() && changed) || forced {
                self.emitter.open(current);
            }
            self.emit_character(ch);
            self.buffer_column += 1;
        }

        Ok(self.finish_line())
    }

    fn skip_passed_hunks(&mut self) {
        let here = BufferPoint::new(self.buffer_row, self.buffer_column);
        while self
            .hunks
            .get(self.next_hunk)
            .is_some_and(|h| h.old_start < here)
        {
            self.next_hunk += 1;
        }
    }

    fn hunk_at_cursor(&self) -> Option<&'w Hunk> {
        let hunks = self.hunks;
        let here = BufferPoint::new(self.buffer_row, self.buffer_column);
        hunks.get(self.next_hunk).filter(|h| h.old_start == here)
    }

    fn apply_fold(&mut self, hunk: &Hunk, previous: Decorations) -> Result<(), BuildError> {
        if !previous.is_empty() {
            self.emitter.close(previous);
        }
        self.emitter.open(Decorations::FOLD_MARKER);
        self.emitter.push_glyph(&hunk.new_text);
        self.buffer_row = hunk.old_end.row;
        self.buffer_column = hunk.old_end.column;
        self.row = RowState::load(self.text, self.buffer_row)?;
        self.in_trailing = false;
        Ok(())
    }

    /// Returns `true` when the finished line was the last one requested.
    fn apply_wrap(&mut self, hunk: &Hunk, previous: Decorations) -> bool {
        self.emitter.close(previous);
        if self.finish_line() {
            return true;
        }
        let indent = hunk.new_end.column;
        if self.config.show_indent_guides && indent > 0 {
            self.emitter.indent_guides(indent, self.tab_length);
        } else {
            self.emitter.push_spaces(indent);
        }
        false
    }

    /// Decorations for the next character and whether it must start a new run.
    fn classify(&mut self, next: Option<char>) -> (Decorations, bool) {
        let ch = match next {
            Some(ch @ (' ' | '\t')) => ch,
            _ => {
                self.in_leading = false;
                return (Decorations::empty(), false);
            }
        };
        let guides =
            self.config.show_indent_guides && (self.in_leading || self.row.trailing_start == 0);
        let on_tab_stop = self.emitter.column % self.tab_length == 0;
        let mut flags = Decorations::empty();
        let mut forced = false;
        if self.in_leading {
            flags |= Decorations::LEADING_WHITESPACE;
        }
        if self.in_trailing {
            flags |= Decorations::TRAILING_WHITESPACE;
        }
        if ch == ' ' {
            if (self.in_leading || self.in_trailing) && self.config.invisibles.space.is_some() {
                flags |= Decorations::INVISIBLE_CHARACTER;
            }
            if guides {
                flags |= Decorations::INDENT_GUIDE;
                forced = on_tab_stop;
            }
        } else {
            flags |= Decorations::HARD_TAB;
            if self.config.invisibles.tab.is_some() {
                flags |= Decorations::INVISIBLE_CHARACTER;
            }
            if guides && on_tab_stop {
                flags |= Decorations::INDENT_GUIDE;
            }
            forced = true;
        }
        (flags, forced)
    }

    fn emit_character(&mut self, ch: char) {
        let invisibles = &self.config.invisibles;
        match ch {
            '\t' => {
                let width = self.tab_length - self.emitter.column % self.tab_length;
                match invisibles.tab {
                    Some(glyph) => {
                        self.emitter.push_char(glyph);
                        self.emitter.push_spaces(width - 1);
                    }
                    None => self.emitter.push_spaces(width),
                }
            }
            ' ' if self.in_leading || self.in_trailing => {
                self.emitter.push_char(invisibles.space.unwrap_or(' '));
            }
            _ => self.emitter.push_char(ch),
        }
    }

    fn end_of_row(&mut self) {
        self.emitter.flush_run();
        let guides = self.config.show_indent_guides
            && self.row.chars.is_empty()
            && self.emitter.is_empty();

        if let Some(glyph) = self.config.eol_invisible(self.row.ending) {
            let mut flags = Decorations::INVISIBLE_CHARACTER | Decorations::LINE_ENDING;
            if guides {
                flags |= Decorations::INDENT_GUIDE;
            }
            self.emitter.open(flags);
            self.emitter.push_char(glyph);
            self.emitter.close(flags);
        }

        if guides {
            let width = self
                .text
                .leading_whitespace_width_near(self.buffer_row, self.tab_length);
            self.emitter.indent_guides(width, self.tab_length);
        }
    }

    /// Seal the current line, keeping it only if it falls inside the
    /// requested range. Returns `true` once the range is complete.
    fn finish_line(&mut self) -> bool {
        let (text, tag_codes) = self.emitter.take();
        if self.screen_row >= self.start {
            self.lines.push(ScreenLine {
                id: ScreenLineId::next(),
                text,
                tag_codes,
            });
        }
        self.screen_row += 1;
        self.screen_row >= self.end
    }
}
