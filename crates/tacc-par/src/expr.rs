//! Expression precedence (§4.2).
//!
//! Six fixed levels, lowest to highest. The grammar never grows new
//! operators at runtime, so a full Pratt binding-power table would be
//! more machinery than the problem needs; what's kept from that idiom
//! is naming each level once here instead of re-deriving precedence by
//! the shape of nested recursive-descent calls.

/// Binding power of each precedence level, lowest first. Two adjacent
/// operators at the same level associate left (`a - b - c` parses as
/// `(a - b) - c`), which falls out of each level's loop consuming
/// same-level operators greedily before returning to its caller.
pub mod bp {
    pub const LOGICAL_OR: u8 = 1;
    pub const LOGICAL_AND: u8 = 2;
    pub const COMPARISON: u8 = 3;
    pub const ADDITIVE: u8 = 4;
    pub const MULTIPLICATIVE: u8 = 5;
    pub const UNARY: u8 = 6;
}

pub const COMPARISON_OPERATORS: &[&str] = &["==", "!=", "<", ">", "<=", ">="];
pub const ADDITIVE_OPERATORS: &[&str] = &["+", "-"];
pub const MULTIPLICATIVE_OPERATORS: &[&str] = &["*", "/", "%"];
