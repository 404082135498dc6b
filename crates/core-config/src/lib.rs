//! Configuration loading and parsing for the display pipeline.
//!
//! Parses `screenlines.toml` (or an override path provided by the binary)
//! into a raw [`ConfigFile`], then resolves it into the effective
//! [`DisplayConfig`] consumed by the line builder. Resolution clamps values
//! the builder cannot honor (zero tab length, empty fold glyph, zero wrap
//! column) and logs each clamp on the `config` target. The raw parsed values
//! are retained so callers can adjust them (CLI overrides) and re-resolve.
//!
//! Unknown fields are ignored (TOML deserialization tolerance) so the file can
//! grow without immediate warnings. An unreadable file falls back to defaults;
//! an unparsable one falls back to defaults with a warning.

use anyhow::Result;
use core_text::{LineEnding, glyph_width};
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const DEFAULT_TAB_LENGTH: usize = 4;
pub const DEFAULT_FOLD_GLYPH: &str = "⋯";

#[derive(Debug, Deserialize, Clone)]
pub struct DisplaySection {
    #[serde(default = "DisplaySection::default_tab_length")]
    pub tab_length: usize,
    #[serde(default)]
    pub show_indent_guides: bool,
    #[serde(default = "DisplaySection::default_fold_glyph")]
    pub fold_glyph: String,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            tab_length: Self::default_tab_length(),
            show_indent_guides: false,
            fold_glyph: Self::default_fold_glyph(),
        }
    }
}

impl DisplaySection {
    const fn default_tab_length() -> usize {
        DEFAULT_TAB_LENGTH
    }
    fn default_fold_glyph() -> String {
        DEFAULT_FOLD_GLYPH.to_string()
    }
}

/// Substitute glyphs as written in the file. Each must be a single character.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct InvisiblesSection {
    #[serde(default)]
    pub space: Option<char>,
    #[serde(default)]
    pub tab: Option<char>,
    #[serde(default)]
    pub lf: Option<char>,
    #[serde(default)]
    pub cr: Option<char>,
    #[serde(default)]
    pub crlf: Option<char>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SoftWrapSection {
    #[serde(default)]
    pub column: Option<usize>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub display: DisplaySection,
    #[serde(default)]
    pub invisibles: InvisiblesSection,
    #[serde(default)]
    pub soft_wrap: SoftWrapSection,
}

/// End-of-line substitutes keyed by terminator kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EolInvisibles {
    pub lf: Option<char>,
    pub cr: Option<char>,
    pub crlf: Option<char>,
}

impl EolInvisibles {
    pub fn for_ending(&self, ending: LineEnding) -> Option<char> {
        match ending {
            LineEnding::Lf => self.lf,
            LineEnding::Cr => self.cr,
            LineEnding::Crlf => self.crlf,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Invisibles {
    pub space: Option<char>,
    pub tab: Option<char>,
    pub eol: EolInvisibles,
}

/// Effective display settings. `tab_length >= 1` and `fold_glyph` is at least
/// one cell wide whenever the value came out of [`Config::resolve`] or `Default`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    pub tab_length: usize,
    pub show_indent_guides: bool,
    pub invisibles: Invisibles,
    pub fold_glyph: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            tab_length: DEFAULT_TAB_LENGTH,
            show_indent_guides: false,
            invisibles: Invisibles::default(),
            fold_glyph: DEFAULT_FOLD_GLYPH.to_string(),
        }
    }
}

impl DisplayConfig {
    /// Terminal cells occupied by the fold placeholder.
    pub fn fold_glyph_width(&self) -> usize {
        glyph_width(&self.fold_glyph)
    }

    /// End-of-line substitute for a row ending, if one is configured.
    pub fn eol_invisible(&self, ending: Option<LineEnding>) -> Option<char> {
        ending.and_then(|e| self.invisibles.eol.for_ending(e))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>,            // raw file contents, if read
    pub file: ConfigFile,               // parsed (or default) data
    pub display: DisplayConfig,         // resolved from `file`
    pub soft_wrap_column: Option<usize>, // resolved; never Some(0)
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    // Prefer a `screenlines.toml` in the working directory before falling back
    // to the platform config dir.
    let local = PathBuf::from("screenlines.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("screenlines").join("screenlines.toml");
    }
    PathBuf::from("screenlines.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let mut cfg = if let Ok(content) = fs::read_to_string(&path) {
        match toml::from_str::<ConfigFile>(&content) {
            Ok(file) => Config {
                raw: Some(content),
                file,
                ..Config::default()
            },
            Err(e) => {
                warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
                Config::default()
            }
        }
    } else {
        Config::default()
    };
    cfg.resolve();
    Ok(cfg)
}

impl Config {
    /// Recompute the effective display settings from the raw file values,
    /// clamping anything out of range. Returns the resolved settings.
    pub fn resolve(&mut self) -> &DisplayConfig {
        let section = &self.file.display;

        let tab_length = section.tab_length.max(1);
        if tab_length != section.tab_length {
            info!(
                target: "config",
                raw = section.tab_length,
                clamped = tab_length,
                "tab_length_clamped"
            );
        }

        // Zero-width glyphs count as missing.
        let fold_glyph = if glyph_width(&section.fold_glyph) == 0 {
            info!(target: "config", raw = %section.fold_glyph, "fold_glyph_defaulted");
            DEFAULT_FOLD_GLYPH.to_string()
        } else {
            section.fold_glyph.clone()
        };

        let inv = &self.file.invisibles;
        self.display = DisplayConfig {
            tab_length,
            show_indent_guides: section.show_indent_guides,
            invisibles: Invisibles {
                space: inv.space,
                tab: inv.tab,
                eol: EolInvisibles {
                    lf: inv.lf,
                    cr: inv.cr,
                    crlf: inv.crlf,
                },
            },
            fold_glyph,
        };

        self.soft_wrap_column = match self.file.soft_wrap.column {
            Some(0) => {
                info!(target: "config", raw = 0, "soft_wrap_column_disabled");
                None
            }
            other => other,
        };

        &self.display
    }
}
