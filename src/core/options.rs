//! Compilation options shared by every backend.

use std::fmt;

/// What `,` stores when the input stream is exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EofPolicy {
    /// Leave the current cell untouched.
    #[default]
    Unchanged,
    /// Store 0.
    Zero,
    /// Store 0xFF (an end-of-stream marker of -1 truncated to a byte).
    Max,
}

impl EofPolicy {
    /// The byte written to the cell on end of input, if any.
    pub fn fill_byte(self) -> Option<u8> {
        match self {
            EofPolicy::Unchanged => None,
            EofPolicy::Zero => Some(0),
            EofPolicy::Max => Some(u8::MAX),
        }
    }
}

impl fmt::Display for EofPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EofPolicy::Unchanged => write!(f, "unchanged"),
            EofPolicy::Zero => write!(f, "zero"),
            EofPolicy::Max => write!(f, "max"),
        }
    }
}

/// Options that influence the emitted code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub eof: EofPolicy,
}

impl CompileOptions {
    pub fn with_eof(mut self, eof: EofPolicy) -> Self {
        self.eof = eof;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_bytes() {
        assert_eq!(EofPolicy::Unchanged.fill_byte(), None);
        assert_eq!(EofPolicy::Zero.fill_byte(), Some(0));
        assert_eq!(EofPolicy::Max.fill_byte(), Some(0xFF));
    }

    #[test]
    fn test_default_leaves_cell_unchanged() {
        assert_eq!(CompileOptions::default().eof, EofPolicy::Unchanged);
        let options = CompileOptions::default().with_eof(EofPolicy::Zero);
        assert_eq!(options.eof, EofPolicy::Zero);
    }
}
