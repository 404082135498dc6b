//! Built screen lines and decoding of their tag streams.

use crate::{TagEntry, TagRegistry, TagStreamError};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SCREEN_LINE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide identity of a built line. Never reused, strictly increasing
/// in allocation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScreenLineId(u64);

impl ScreenLineId {
    pub(crate) fn next() -> Self {
        Self(NEXT_SCREEN_LINE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenLine {
    pub id: ScreenLineId,
    pub text: String,
    /// Run lengths (`>= 0`) interleaved with open/close codes (`< 0`).
    pub tag_codes: Vec<i32>,
}

/// A labelled column range `[start, end)` decoded from a tag stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpan {
    pub label: Arc<str>,
    pub start: usize,
    pub end: usize,
}

impl ScreenLine {
    /// Length of the text in chars; the tag stream's runs sum to this.
    pub fn width(&self) -> usize {
        self.text.chars().count()
    }

    /// Replay the tag stream, returning spans in the order they were opened.
    /// Fails on anything that is not a balanced, properly nested stream whose
    /// runs cover exactly the text.
    pub fn tag_spans(&self, tags: &TagRegistry) -> Result<Vec<TagSpan>, TagStreamError> {
        let mut spans: Vec<TagSpan> = Vec::new();
        // (open code, index into `spans`)
        let mut stack: Vec<(i32, usize)> = Vec::new();
        let mut column = 0usize;

        for (offset, &code) in self.tag_codes.iter().enumerate() {
            match TagEntry::classify(code) {
                TagEntry::Run(len) => column += len,
                TagEntry::Open(open) => {
                    let label = tags
                        .label_for_code(open)
                        .ok_or(TagStreamError::UnknownCode { code, offset })?;
                    stack.push((open, spans.len()));
                    spans.push(TagSpan {
                        label,
                        start: column,
                        end: column,
                    });
                }
                TagEntry::Close(close) => {
                    if tags.label_for_code(close).is_none() {
                        return Err(TagStreamError::UnknownCode { code, offset });
                    }
                    let (open, index) = stack
                        .pop()
                        .ok_or(TagStreamError::Underflow { code, offset })?;
                    if close != open - 1 {
                        return Err(TagStreamError::Mismatched { code, open, offset });
                    }
                    spans[index].end = column;
                }
            }
        }

        if !stack.is_empty() {
            return Err(TagStreamError::Unclosed { open: stack.len() });
        }
        let text = self.width();
        if column != text {
            return Err(TagStreamError::LengthMismatch { runs: column, text });
        }
        Ok(spans)
    }
}
