//! Whitespace measurements over a single row.
//!
//! Columns are counted in `char`s. Only ASCII space and horizontal tab count
//! as whitespace here; other Unicode spaces render verbatim.

/// Column at which the row's trailing whitespace begins. Equals the row's char
/// length when there is none, and 0 for an empty or all-whitespace row.
pub fn trailing_whitespace_start(line: &str) -> usize {
    let total = line.chars().count();
    let trailing = line
        .chars()
        .rev()
        .take_while(|c| matches!(c, ' ' | '\t'))
        .count();
    total - trailing
}

/// Screen width of the row's leading whitespace with tabs expanded to
/// `tab_length` stops.
pub fn leading_whitespace_width(line: &str, tab_length: usize) -> usize {
    debug_assert!(tab_length > 0, "tab_length must be positive");
    let mut width = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += tab_length - width % tab_length,
            _ => break,
        }
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_start_for_mixed_row() {
        assert_eq!(trailing_whitespace_start("  a\tb  "), 5);
        assert_eq!(trailing_whitespace_start("abc"), 3);
        assert_eq!(trailing_whitespace_start("x \t"), 1);
    }

    #[test]
    fn trailing_start_is_zero_for_blank_rows() {
        assert_eq!(trailing_whitespace_start(""), 0);
        assert_eq!(trailing_whitespace_start("   "), 0);
        assert_eq!(trailing_whitespace_start("\t \t"), 0);
    }

    #[test]
    fn trailing_start_counts_chars_not_bytes() {
        assert_eq!(trailing_whitespace_start("漢字 "), 2);
    }

    #[test]
    fn leading_width_expands_tabs_to_stops() {
        assert_eq!(leading_whitespace_width("    x", 4), 4);
        assert_eq!(leading_whitespace_width("\tx", 4), 4);
        assert_eq!(leading_whitespace_width("  \tx", 4), 4);
        assert_eq!(leading_whitespace_width("  \t x", 4), 5);
        assert_eq!(leading_whitespace_width("x    ", 4), 0);
    }
}
