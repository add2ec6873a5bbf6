//! Shared infrastructure for the tacc compiler front-end.
//!
//! Every stage of the pipeline (lexer, parser, semantic analyzer, TAC
//! generator) reports diagnostics through the same [`Handler`], names
//! identifiers through the same [`Symbol`] interner, and tags source
//! positions with the same [`Line`] newtype. Keeping these in one crate
//! with no dependency on any pipeline stage is what lets every later
//! crate depend on exactly this and nothing else.

pub mod diagnostic;
pub mod error;
pub mod index;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, Handler, Kind};
pub use error::{Result, TaccError};
pub use span::Line;
pub use symbol::{Symbol, SymbolInterner};
