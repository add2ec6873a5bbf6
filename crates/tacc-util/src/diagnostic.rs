//! First-error-aborts diagnostic reporting.
//!
//! Every stage of the pipeline stops at its first error (§7): there is
//! no recovery and no multi-error batch reporting. `Handler` exists
//! mostly to pin down the one user-visible format string in a single
//! place rather than have each stage format its own message.

use crate::span::Line;
use std::fmt;

/// Which stage raised a diagnostic, matching the three kinds named in
/// the error-handling design (`Lexical`, `Syntax`, `Semantic`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Lexical,
    Syntax,
    Semantic,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Kind::Lexical => "Lexical",
            Kind::Syntax => "Syntax",
            Kind::Semantic => "Semantic",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: Kind,
    pub line: Line,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: Kind, line: impl Into<Line>, message: impl Into<String>) -> Self {
        Diagnostic {
            kind,
            line: line.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Error [line {}]: {}", self.kind, self.line, self.message)
    }
}

/// Records at most one diagnostic: the first call to [`Handler::report`]
/// wins and every later call is ignored, mirroring "first error aborts,
/// no recovery" from the error-handling design.
#[derive(Debug, Default)]
pub struct Handler {
    first: Option<Diagnostic>,
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diag: Diagnostic) {
        if self.first.is_none() {
            self.first = Some(diag);
        }
    }

    pub fn has_errors(&self) -> bool {
        self.first.is_some()
    }

    pub fn first_error(&self) -> Option<&Diagnostic> {
        self.first.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_per_external_interface() {
        let d = Diagnostic::new(Kind::Semantic, 4u32, "Type mismatch in assignment");
        assert_eq!(
            d.to_string(),
            "Semantic Error [line 4]: Type mismatch in assignment"
        );
    }

    #[test]
    fn only_first_report_is_kept() {
        let mut handler = Handler::new();
        handler.report(Diagnostic::new(Kind::Lexical, 1u32, "first"));
        handler.report(Diagnostic::new(Kind::Lexical, 2u32, "second"));
        assert_eq!(handler.first_error().unwrap().message, "first");
    }
}
