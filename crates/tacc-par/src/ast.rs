//! AST node vocabulary (§3, §4.2).
//!
//! `NodeKind` is the faithful, sealed-variant rewrite the design notes
//! (§9) ask for in place of the reference implementation's label-prefix
//! string matching — but the *serialized* form in [`crate::serialize`]
//! still has to reproduce those exact label strings, because that text
//! is the protocol the semantic analyzer and TAC generator consume.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub ty: String,
    pub name: String,
    pub is_array: bool,
}

/// The body of a control-flow construct: either a braced block (printed
/// under a `Body:` wrapper) or a single bare statement (printed with no
/// wrapper at all, since `statement := block | assignment ';' | …` never
/// introduces one for the non-block alternatives).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Braced(Vec<Node>),
    Bare(Box<Node>),
}

/// The optional tail of an `if` statement. An `else if` chains directly
/// into a nested `If` node with no intervening `Else:` line; a plain
/// `else` always gets the `Else:` wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Else {
    ElseIf(Box<Node>),
    Else(Body),
}

/// The payload carried by a `Return` statement: a bare literal or
/// variable name is inlined into the label itself with no child node;
/// anything else gets a full expression child (§4.2's AST label table).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnValue {
    None,
    Inline(String),
    Expr(Box<Node>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    FunctionDef {
        name: String,
        return_type: String,
        params: Vec<Param>,
        body: Vec<Node>,
    },
    VarDeclGroup(Vec<Node>),
    VarDecl {
        ty: String,
        name: String,
        init: Option<Box<Node>>,
    },
    Assign {
        name: String,
        rhs: Box<Node>,
    },
    Return(ReturnValue),
    If {
        cond: Box<Node>,
        then_body: Body,
        else_clause: Option<Else>,
    },
    While {
        cond: Box<Node>,
        body: Body,
    },
    For {
        init: Option<Box<Node>>,
        cond: Option<Box<Node>>,
        step: Option<Box<Node>>,
        body: Body,
    },
    BinOp {
        op: String,
        lhs: Box<Node>,
        rhs: Option<Box<Node>>,
    },
    Cast {
        ty: String,
        expr: Box<Node>,
    },
    Call {
        name: String,
        args: Vec<Node>,
    },
    Number(String),
    Var(String),
    /// A bare `{ … }` appearing directly as a statement (not attached to
    /// an `if`/`while`/`for`/`else`). Serializes under a `Body:` wrapper
    /// the same as any other braced block.
    Block(Vec<Node>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub line: u32,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(line: u32, kind: NodeKind) -> Self {
        Node { line, kind }
    }
}

/// The parser's output: top-level function definitions and variable
/// declarations, in source order. The `Program` node itself is never
/// emitted (§4.2); only its children are.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    pub items: Vec<Node>,
}
