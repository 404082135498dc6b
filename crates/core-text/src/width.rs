//! Display width of synthetic glyphs (fold placeholders and the like).
//!
//! Buffer text advances one column per `char`; only glyphs the display layer
//! inserts on its own are measured in terminal cells.

use unicode_width::UnicodeWidthStr;

/// Terminal cells occupied by `glyph`. Empty input is 0 wide.
#[inline]
pub fn glyph_width(glyph: &str) -> usize {
    UnicodeWidthStr::width(glyph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_and_wide_glyphs() {
        assert_eq!(glyph_width(""), 0);
        assert_eq!(glyph_width("⋯"), 1);
        assert_eq!(glyph_width("<>"), 2);
        assert_eq!(glyph_width("折"), 2);
        assert_eq!(glyph_width("[折]"), 4);
    }
}
