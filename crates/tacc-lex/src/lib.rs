//! Lexical analysis: character stream to token stream (§4.1).
//!
//! This is the smallest of the four stages. The interesting decisions
//! are all about *ordering*: two-character operators must be tried
//! before their single-character prefixes, and the number scanner must
//! commit to a float only once it has seen a digit after the dot, never
//! before.

pub mod cursor;
pub mod lexer;
pub mod token;

pub use lexer::{tokenize, Lexer};
pub use token::{Token, TokenKind};
