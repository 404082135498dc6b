//! Coordinates tagged with the space they live in.
//!
//! Buffer points address raw stored text; screen points address the display
//! after folds, soft wraps and tab expansion. The space marker is a type
//! parameter so the two cannot be compared or mixed without an explicit
//! translation through a [`HunkSource`](crate::HunkSource).

use std::fmt;
use std::marker::PhantomData;

pub trait Space: Copy + Ord + fmt::Debug {
    const NAME: &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BufferSpace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScreenSpace;

impl Space for BufferSpace {
    const NAME: &'static str = "Buffer";
}

impl Space for ScreenSpace {
    const NAME: &'static str = "Screen";
}

/// `(row, column)` in one coordinate space. Columns count `char`s in buffer
/// space and cells in screen space. Ordering is row-major.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point<S: Space> {
    pub row: usize,
    pub column: usize,
    space: PhantomData<S>,
}

pub type BufferPoint = Point<BufferSpace>;
pub type ScreenPoint = Point<ScreenSpace>;

impl<S: Space> Point<S> {
    pub const fn new(row: usize, column: usize) -> Self {
        Self {
            row,
            column,
            space: PhantomData,
        }
    }

    pub const fn origin() -> Self {
        Self::new(0, 0)
    }
}

impl<S: Space> fmt::Debug for Point<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", S::NAME, self.row, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_row_major() {
        assert!(BufferPoint::new(1, 0) > BufferPoint::new(0, 99));
        assert!(ScreenPoint::new(2, 3) < ScreenPoint::new(2, 4));
        assert_eq!(BufferPoint::origin(), BufferPoint::new(0, 0));
    }

    #[test]
    fn debug_names_the_space() {
        assert_eq!(format!("{:?}", BufferPoint::new(3, 7)), "Buffer(3, 7)");
        assert_eq!(format!("{:?}", ScreenPoint::new(0, 1)), "Screen(0, 1)");
    }
}
