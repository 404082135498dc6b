//! Line terminator kinds.

/// Terminator that ends a buffer row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineEnding {
    Lf,
    Cr,
    Crlf,
}

impl LineEnding {
    /// Short name used in logs and CLI output.
    pub fn name(self) -> &'static str {
        match self {
            LineEnding::Lf => "lf",
            LineEnding::Cr => "cr",
            LineEnding::Crlf => "crlf",
        }
    }
}
