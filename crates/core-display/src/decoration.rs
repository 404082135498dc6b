//! Decoration attributes carried by runs of screen text.

use bitflags::bitflags;

bitflags! {
    /// Closed set of independent run attributes. A combination maps to one
    /// basic tag (its label) through [`Decorations::label`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Decorations: u8 {
        const HARD_TAB = 1 << 0;
        const LEADING_WHITESPACE = 1 << 2;
        const TRAILING_WHITESPACE = 1 << 3;
        const INVISIBLE_CHARACTER = 1 << 4;
        const INDENT_GUIDE = 1 << 5;
        const LINE_ENDING = 1 << 6;
        const FOLD_MARKER = 1 << 7;
    }
}

/// Label order is part of the external contract: consumers match on the joined
/// class string.
const LABEL_ORDER: [(Decorations, &str); 7] = [
    (Decorations::INVISIBLE_CHARACTER, "invisible-character"),
    (Decorations::HARD_TAB, "hard-tab"),
    (Decorations::LEADING_WHITESPACE, "leading-whitespace"),
    (Decorations::TRAILING_WHITESPACE, "trailing-whitespace"),
    (Decorations::LINE_ENDING, "eol"),
    (Decorations::INDENT_GUIDE, "indent-guide"),
    (Decorations::FOLD_MARKER, "fold-marker"),
];

impl Decorations {
    /// Space-joined class names of the active attributes; empty for no
    /// attributes. Pure; [`TagRegistry`](crate::TagRegistry) memoizes it.
    pub fn label(self) -> String {
        LABEL_ORDER
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_uses_fixed_order() {
        let flags = Decorations::INDENT_GUIDE
            | Decorations::LEADING_WHITESPACE
            | Decorations::INVISIBLE_CHARACTER;
        assert_eq!(
            flags.label(),
            "invisible-character leading-whitespace indent-guide"
        );
        assert_eq!(Decorations::HARD_TAB.label(), "hard-tab");
        assert_eq!(
            (Decorations::LINE_ENDING | Decorations::INVISIBLE_CHARACTER).label(),
            "invisible-character eol"
        );
    }

    #[test]
    fn empty_set_has_empty_label() {
        assert_eq!(Decorations::empty().label(), "");
    }
}
