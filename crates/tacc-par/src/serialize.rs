//! AST to indented text (§3, §4.2, §6).
//!
//! This text is not a debugging aid: it is reparsed, independently and
//! by two different streaming cursors, by the semantic analyzer and the
//! TAC generator. Every label string here has to match §4.2's table bit
//! for bit, indentation included, or both downstream stages desync.

use crate::ast::{Body, Else, Node, NodeKind, Program};

const INDENT_UNIT: &str = "    ";

pub fn serialize(program: &Program) -> String {
    let mut out = String::new();
    for item in &program.items {
        write_node(&mut out, item, 0);
    }
    out
}

fn write_line(out: &mut String, indent: usize, text: &str) {
    for _ in 0..indent {
        out.push_str(INDENT_UNIT);
    }
    out.push_str(text);
    out.push('\n');
}

fn write_body(out: &mut String, body: &Body, indent: usize) {
    match body {
        Body::Braced(items) => {
            write_line(out, indent, "Body:");
            for item in items {
                write_node(out, item, indent + 1);
            }
        }
        Body::Bare(stmt) => write_node(out, stmt, indent),
    }
}

fn write_node(out: &mut String, node: &Node, indent: usize) {
    match &node.kind {
        NodeKind::FunctionDef {
            name,
            params,
            body,
            ..
        } => {
            write_line(out, indent, &format!("FunctionDefinition: {name}"));
            write_line(out, indent + 1, "Parameters:");
            for p in params {
                let suffix = if p.is_array { "[]" } else { "" };
                write_line(
                    out,
                    indent + 2,
                    &format!("Param: {} {}{}", p.ty, p.name, suffix),
                );
            }
            write_line(out, indent + 1, "Body:");
            for item in body {
                write_node(out, item, indent + 2);
            }
        }
        NodeKind::VarDeclGroup(decls) => {
            write_line(out, indent, "VarDeclGroup:");
            for decl in decls {
                write_node(out, decl, indent + 1);
            }
        }
        NodeKind::VarDecl { ty, name, init } => match init {
            Some(expr) => {
                write_line(out, indent, &format!("VarDecl: {ty} {name} ="));
                write_node(out, expr, indent + 1);
            }
            None => write_line(out, indent, &format!("VarDecl: {ty} {name}")),
        },
        NodeKind::Assign { name, rhs } => {
            write_line(out, indent, &format!("Assign: {name} ="));
            write_node(out, rhs, indent + 1);
        }
        NodeKind::Return(value) => match value {
            crate::ast::ReturnValue::None => write_line(out, indent, "Return:"),
            crate::ast::ReturnValue::Inline(text) => {
                write_line(out, indent, &format!("Return: {text}"))
            }
            crate::ast::ReturnValue::Expr(expr) => {
                write_line(out, indent, "Return:");
                write_node(out, expr, indent + 1);
            }
        },
        NodeKind::If {
            cond,
            then_body,
            else_clause,
        } => {
            write_line(out, indent, "If:");
            write_node(out, cond, indent + 1);
            write_body(out, then_body, indent + 1);
            match else_clause {
                None => {}
                Some(Else::ElseIf(nested)) => write_node(out, nested, indent + 1),
                Some(Else::Else(body)) => {
                    write_line(out, indent + 1, "Else:");
                    write_body(out, body, indent + 2);
                }
            }
        }
        NodeKind::While { cond, body } => {
            write_line(out, indent, "While:");
            write_node(out, cond, indent + 1);
            write_body(out, body, indent + 1);
        }
        NodeKind::For {
            init,
            cond,
            step,
            body,
        } => {
            write_line(out, indent, "For:");
            if let Some(i) = init {
                write_node(out, i, indent + 1);
            }
            if let Some(c) = cond {
                write_node(out, c, indent + 1);
            }
            if let Some(s) = step {
                write_node(out, s, indent + 1);
            }
            write_body(out, body, indent + 1);
        }
        NodeKind::BinOp { op, lhs, rhs } => {
            write_line(out, indent, &format!("BinOp({op})"));
            write_node(out, lhs, indent + 1);
            if let Some(rhs) = rhs {
                write_node(out, rhs, indent + 1);
            }
        }
        NodeKind::Cast { ty, expr } => {
            write_line(out, indent, &format!("Cast({ty})"));
            write_node(out, expr, indent + 1);
        }
        NodeKind::Call { name, args } => {
            write_line(out, indent, &format!("Call({name})"));
            for arg in args {
                write_node(out, arg, indent + 1);
            }
        }
        NodeKind::Number(text) => write_line(out, indent, &format!("Number({text})")),
        NodeKind::Var(name) => write_line(out, indent, &format!("Var({name})")),
        NodeKind::Block(items) => {
            write_line(out, indent, "Body:");
            for item in items {
                write_node(out, item, indent + 1);
            }
        }
    }
}
