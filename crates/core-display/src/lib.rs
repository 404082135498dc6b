//! Screen-line construction for the display layer.
//!
//! Turns a range of screen rows over a [`TextSource`](core_text::TextSource)
//! into [`ScreenLine`]s: display text plus a run-length tag stream describing
//! decorations (leading/trailing whitespace, hard tabs, invisibles, indent
//! guides, line endings, fold markers). Folds and soft wraps come from a
//! [`HunkSource`]; [`DisplayIndex`] is the bundled implementation.

pub mod builder;
pub mod decoration;
pub mod error;
pub mod hunk;
pub mod point;
pub mod screen_line;
pub mod spatial;
pub mod tags;

pub use builder::ScreenLineBuilder;
pub use core_config::DisplayConfig;
pub use decoration::Decorations;
pub use error::{BuildError, HunkError, TagStreamError};
pub use hunk::{Hunk, HunkKind, HunkList, HunkSource};
pub use point::{BufferPoint, BufferSpace, Point, ScreenPoint, ScreenSpace, Space};
pub use screen_line::{ScreenLine, ScreenLineId, TagSpan};
pub use spatial::{DisplayIndex, Fold};
pub use tags::{TagEntry, TagRegistry};
