//! Indented-text AST to a streamed line cursor (§3, §4.2).
//!
//! This re-parses the same textual protocol [`tacc_sem::ast_lines`]
//! re-parses independently — the duplication is intentional (§3: "each
//! pass uses the AST's indentation tree as a streaming cursor and does
//! not materialize an in-memory tree"), so this module does not depend
//! on `tacc-par`'s `Node` at all, only on the line-text format it emits.

/// One line of the serialized AST: its indent level (in 4-space units,
/// already divided down) and the text after the leading spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstLine {
    pub indent: usize,
    pub text: String,
}

/// Splits AST text into indent-tagged lines, skipping blank lines (the
/// serialized form never emits them, but an empty trailing line from a
/// final newline is common and harmless to drop).
pub fn load_ast_lines(ast_text: &str) -> Vec<AstLine> {
    ast_text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let spaces = line.chars().take_while(|&c| c == ' ').count();
            AstLine {
                indent: spaces / 4,
                text: line[spaces..].to_string(),
            }
        })
        .collect()
}

/// A parsed AST line label: the sealed-variant dispatch the design notes
/// (§9) ask for, sitting on top of the one string match every label
/// still needs since the wire format is text (§4.2's "these strings are
/// the protocol").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label<'a> {
    FunctionDefinition { name: &'a str },
    Parameters,
    Param { ty: &'a str, name: &'a str },
    Body,
    VarDeclGroup,
    VarDecl { ty: &'a str, name: &'a str, has_init: bool },
    Assign { name: &'a str },
    Return { inline: Option<&'a str> },
    If,
    Else,
    While,
    For,
    BinOp { op: &'a str },
    Cast { ty: &'a str },
    Call { name: &'a str },
    Number { text: &'a str },
    Var { name: &'a str },
    Unknown,
}

fn split_two(s: &str) -> (&str, &str) {
    let mut parts = s.splitn(2, ' ');
    let a = parts.next().unwrap_or("");
    let b = parts.next().unwrap_or("");
    (a, b)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Classifies one AST line's text. Both `Param:`/`VarDecl:` are accepted
/// inside a parameter list, and a bare identifier with no known prefix
/// is tolerated as the legacy call shape (§4.2's "implementers should
/// prefer `Call(<name>)`... the semantic and TAC stages must tolerate
/// the legacy shape").
pub fn parse_label(text: &str) -> Label<'_> {
    if let Some(rest) = text.strip_prefix("FunctionDefinition: ") {
        return Label::FunctionDefinition { name: rest };
    }
    if text == "Parameters:" {
        return Label::Parameters;
    }
    if let Some(rest) = text.strip_prefix("Param: ") {
        let (ty, name) = split_two(rest);
        let name = name.strip_suffix("[]").unwrap_or(name);
        return Label::Param { ty, name };
    }
    if text == "Body:" {
        return Label::Body;
    }
    if text == "VarDeclGroup:" {
        return Label::VarDeclGroup;
    }
    if let Some(rest) = text.strip_prefix("VarDecl: ") {
        let has_init = rest.ends_with('=');
        let core = if has_init {
            rest[..rest.len() - 1].trim_end()
        } else {
            rest
        };
        let (ty, name) = split_two(core);
        return Label::VarDecl { ty, name, has_init };
    }
    if let Some(rest) = text.strip_prefix("Assign: ") {
        let name = rest.strip_suffix(" =").unwrap_or(rest);
        return Label::Assign { name };
    }
    if text == "Return:" {
        return Label::Return { inline: None };
    }
    if let Some(rest) = text.strip_prefix("Return: ") {
        return Label::Return { inline: Some(rest) };
    }
    if text == "If:" {
        return Label::If;
    }
    if text == "Else:" {
        return Label::Else;
    }
    if text == "While:" {
        return Label::While;
    }
    if text == "For:" {
        return Label::For;
    }
    if let Some(rest) = text.strip_prefix("BinOp(").and_then(|s| s.strip_suffix(')')) {
        return Label::BinOp { op: rest };
    }
    if let Some(rest) = text.strip_prefix("Cast(").and_then(|s| s.strip_suffix(')')) {
        return Label::Cast { ty: rest };
    }
    if let Some(rest) = text.strip_prefix("Call(").and_then(|s| s.strip_suffix(')')) {
        return Label::Call { name: rest };
    }
    if let Some(rest) = text.strip_prefix("Number(").and_then(|s| s.strip_suffix(')')) {
        return Label::Number { text: rest };
    }
    if let Some(rest) = text.strip_prefix("Var(").and_then(|s| s.strip_suffix(')')) {
        return Label::Var { name: rest };
    }
    if is_identifier(text) {
        return Label::Call { name: text };
    }
    Label::Unknown
}
