//! Source-line tracking.
//!
//! The pipeline's error format (`<Kind> Error [line N]: <message>`) only
//! ever needs a 1-based line number, never a byte range, so this is
//! deliberately thinner than a full `Span` with start/end offsets: the
//! language has no multi-line expressions whose diagnostics would need
//! anything richer.

use std::fmt;

/// A 1-based source (or AST) line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Line(pub u32);

impl Line {
    pub const START: Line = Line(1);

    pub fn new(n: u32) -> Self {
        Line(n)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Line {
    fn from(n: u32) -> Self {
        Line(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_bare_number() {
        assert_eq!(Line(42).to_string(), "42");
    }

    #[test]
    fn start_is_one() {
        assert_eq!(Line::START.get(), 1);
    }
}
