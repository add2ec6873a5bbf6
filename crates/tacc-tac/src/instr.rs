//! The TAC instruction set (§4.4, §6): a sealed variant per line shape,
//! matching the tagged-variants design note rather than `printf`-style
//! ad hoc formatting at every call site.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instr {
    Func(String),
    EndFunc,
    /// The blank line §6 says separates one function's listing from
    /// the next.
    Blank,
    Label(String),
    Assign { lhs: String, rhs: String },
    Binary { temp: String, lhs: String, op: String, rhs: String },
    /// `!x` and friends: the one operand BinOp can carry (§9's BinOp
    /// double-read bug, worked around in `Generator::gen_binop`).
    Unary { temp: String, op: String, operand: String },
    Return(Option<String>),
    Goto(String),
    IfFalseGoto { cond: String, label: String },
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::Func(name) => write!(f, "func {name}:"),
            Instr::EndFunc => write!(f, "endfunc"),
            Instr::Blank => Ok(()),
            Instr::Label(name) => write!(f, "{name}:"),
            Instr::Assign { lhs, rhs } => write!(f, "{lhs} = {rhs}"),
            Instr::Binary { temp, lhs, op, rhs } => write!(f, "{temp} = {lhs} {op} {rhs}"),
            Instr::Unary { temp, op, operand } => write!(f, "{temp} = {op}{operand}"),
            Instr::Return(Some(v)) => write!(f, "return {v}"),
            Instr::Return(None) => write!(f, "return"),
            Instr::Goto(label) => write!(f, "goto {label}"),
            Instr::IfFalseGoto { cond, label } => write!(f, "ifFalse {cond} goto {label}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_per_external_grammar() {
        assert_eq!(Instr::Func("main".into()).to_string(), "func main:");
        assert_eq!(Instr::EndFunc.to_string(), "endfunc");
        assert_eq!(
            Instr::Binary { temp: "t0".into(), lhs: "a".into(), op: "+".into(), rhs: "b".into() }
                .to_string(),
            "t0 = a + b"
        );
        assert_eq!(Instr::Return(Some("t0".into())).to_string(), "return t0");
        assert_eq!(Instr::Return(None).to_string(), "return");
        assert_eq!(
            Instr::IfFalseGoto { cond: "t0".into(), label: "L1".into() }.to_string(),
            "ifFalse t0 goto L1"
        );
    }
}
