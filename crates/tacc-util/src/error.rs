//! Top-level error type shared by crates that don't need their own.
//!
//! Individual stages (lexer, parser, semantic analyzer) define their own
//! focused error enums and convert into [`TaccError`] at their boundary,
//! matching the one-error-enum-per-concern convention used throughout
//! this workspace.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TaccError>;

#[derive(Debug, Error)]
pub enum TaccError {
    #[error("Lexical Error [line {line}]: {message}")]
    Lexical { line: u32, message: String },

    #[error("Syntax Error [line {line}]: {message}")]
    Syntax { line: u32, message: String },

    #[error("Semantic Error [line {line}]: {message}")]
    Semantic { line: u32, message: String },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl TaccError {
    /// The source (or AST) line this error is anchored to, if any.
    pub fn line(&self) -> Option<u32> {
        match self {
            TaccError::Lexical { line, .. }
            | TaccError::Syntax { line, .. }
            | TaccError::Semantic { line, .. } => Some(*line),
            TaccError::Io(_) => None,
        }
    }
}
