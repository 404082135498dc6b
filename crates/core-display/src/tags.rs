//! Tag interning and tag-stream codes.
//!
//! A tag stream alternates run lengths and tag codes in one `Vec<i32>`:
//! * `>= 0` run length in columns;
//! * odd negative: open code (`-1, -3, -5, …`, assigned on first use);
//! * even negative: close code, always `open - 1` for the same label.
//!
//! The registry is append-only and shared by reference between builders, so
//! codes stay stable for its whole lifetime. Insertions take the write lock;
//! lookups of already-interned entries only take the read lock.

use crate::Decorations;
use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// One decoded entry of a tag stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagEntry {
    Run(usize),
    Open(i32),
    Close(i32),
}

impl TagEntry {
    pub fn classify(code: i32) -> Self {
        if code >= 0 {
            TagEntry::Run(code as usize)
        } else if code % 2 == -1 {
            TagEntry::Open(code)
        } else {
            TagEntry::Close(code)
        }
    }
}

#[derive(Debug, Default)]
struct TagTables {
    labels: AHashMap<Decorations, Arc<str>>,
    open_codes: AHashMap<Arc<str>, i32>,
    labels_by_slot: Vec<Arc<str>>,
    open_codes_by_flags: AHashMap<Decorations, i32>,
}

impl TagTables {
    fn label(&mut self, flags: Decorations) -> Arc<str> {
        self.labels
            .entry(flags)
            .or_insert_with(|| Arc::from(flags.label()))
            .clone()
    }

    fn open_code(&mut self, label: &str) -> i32 {
        if let Some(code) = self.open_codes.get(label) {
            return *code;
        }
        let slot = self.labels_by_slot.len() as i32;
        let code = -(2 * slot + 1);
        let label: Arc<str> = Arc::from(label);
        self.labels_by_slot.push(label.clone());
        self.open_codes.insert(label, code);
        code
    }
}

/// Interning tables for decoration labels and their open/close codes.
#[derive(Debug, Default)]
pub struct TagRegistry {
    tables: RwLock<TagTables>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical label for a flag combination (memoized).
    pub fn label(&self, flags: Decorations) -> Arc<str> {
        if let Some(label) = self.tables.read().labels.get(&flags) {
            return label.clone();
        }
        self.tables.write().label(flags)
    }

    pub fn code_for_open_tag(&self, label: &str) -> i32 {
        if let Some(code) = self.tables.read().open_codes.get(label) {
            return *code;
        }
        self.tables.write().open_code(label)
    }

    pub fn code_for_close_tag(&self, label: &str) -> i32 {
        self.code_for_open_tag(label) - 1
    }

    /// Open code for a non-empty flag combination, bypassing the label lookup
    /// once the combination has been seen.
    pub fn open_code_for(&self, flags: Decorations) -> i32 {
        debug_assert!(!flags.is_empty(), "undecorated runs carry no tag");
        if let Some(code) = self.tables.read().open_codes_by_flags.get(&flags) {
            return *code;
        }
        let mut tables = self.tables.write();
        let label = tables.label(flags);
        let code = tables.open_code(&label);
        tables.open_codes_by_flags.insert(flags, code);
        code
    }

    pub fn close_code_for(&self, flags: Decorations) -> i32 {
        self.open_code_for(flags) - 1
    }

    /// Label behind an open or close code; `None` for run lengths and codes
    /// this registry never assigned.
    pub fn label_for_code(&self, code: i32) -> Option<Arc<str>> {
        let open = match TagEntry::classify(code) {
            TagEntry::Run(_) => return None,
            TagEntry::Open(c) => c,
            TagEntry::Close(c) => c + 1,
        };
        let slot = ((-open - 1) / 2) as usize;
        self.tables.read().labels_by_slot.get(slot).cloned()
    }

    /// Number of distinct labels that have been assigned codes.
    pub fn len(&self) -> usize {
        self.tables.read().labels_by_slot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
