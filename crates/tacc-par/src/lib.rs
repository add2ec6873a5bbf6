//! Parsing: token stream to AST (§4.2).
//!
//! The grammar is small, so this stays a single recursive-descent
//! parser with one function per precedence level rather than reaching
//! for a parser-generator or a Pratt loop over a dynamic operator
//! table — there are exactly six fixed levels and they never change.

pub mod ast;
pub mod expr;
pub mod parser;
pub mod serialize;

pub use ast::{Node, NodeKind, Program};
pub use parser::Parser;
pub use serialize::serialize;
