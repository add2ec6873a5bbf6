//! Token stream to AST (§4.2).
//!
//! A straight recursive-descent parser with one precedence-climbing
//! function per level of [`crate::expr::bp`]. Casts are the one spot
//! that needs lookahead past the usual one token: `(` starts a cast
//! only when it is immediately followed by a type keyword and then
//! `)`, so [`Parser::looks_like_cast`] peeks three tokens deep before
//! committing to either reading.

use crate::ast::{Body, Else, Node, NodeKind, Param, Program, ReturnValue};
use crate::expr::{ADDITIVE_OPERATORS, COMPARISON_OPERATORS, MULTIPLICATIVE_OPERATORS};
use tacc_lex::{Token, TokenKind};
use tacc_util::diagnostic::{Diagnostic, Handler, Kind};
use tacc_util::error::{Result, TaccError};

const TYPE_KEYWORDS: &[&str] = &["int", "float", "void"];

pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser { tokens, pos: 0 }
    }

    pub fn parse(tokens: &'a [Token], handler: &mut Handler) -> Result<Program> {
        let mut parser = Parser::new(tokens);
        match parser.parse_program() {
            Ok(program) => Ok(program),
            Err(err) => {
                if let Some(line) = err.line() {
                    handler.report(Diagnostic::new(Kind::Syntax, line, err.to_string()));
                }
                Err(err)
            }
        }
    }

    // --- token plumbing -------------------------------------------------

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn at_eof(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> Token {
        let tok = self.current().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn line(&self) -> u32 {
        self.current().line
    }

    fn error(&self, expected: &str) -> TaccError {
        let got = self.current();
        TaccError::Syntax {
            line: got.line,
            message: format!("expected {}, got \"{}\"", expected, got.lexeme),
        }
    }

    fn check_lexeme(&self, lexeme: &str) -> bool {
        self.current().lexeme == lexeme
    }

    fn check_kind(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn eat_lexeme(&mut self, lexeme: &str) -> Result<Token> {
        if self.check_lexeme(lexeme) {
            Ok(self.advance())
        } else {
            Err(self.error(&format!("\"{lexeme}\"")))
        }
    }

    fn eat_identifier(&mut self) -> Result<Token> {
        if self.check_kind(TokenKind::Identifier) {
            Ok(self.advance())
        } else {
            Err(self.error("an identifier"))
        }
    }

    fn is_type_keyword(&self) -> bool {
        self.check_kind(TokenKind::Keyword) && TYPE_KEYWORDS.contains(&self.current().lexeme.as_str())
    }

    fn eat_type(&mut self) -> Result<String> {
        if self.is_type_keyword() {
            Ok(self.advance().lexeme)
        } else {
            Err(self.error("a type"))
        }
    }

    // --- grammar ---------------------------------------------------------

    fn parse_program(&mut self) -> Result<Program> {
        let mut items = Vec::new();
        while !self.at_eof() {
            items.push(self.parse_top_level_item()?);
        }
        Ok(Program { items })
    }

    fn parse_top_level_item(&mut self) -> Result<Node> {
        // Both a function_def and a top-level var_decl start with `type
        // IDENT`; the next token after the identifier disambiguates.
        if self.is_function_def_ahead() {
            self.parse_function_def()
        } else {
            self.parse_var_decl()
        }
    }

    fn is_function_def_ahead(&self) -> bool {
        self.is_type_keyword()
            && matches!(self.peek_at(1), Some(t) if t.kind == TokenKind::Identifier)
            && matches!(self.peek_at(2), Some(t) if t.lexeme == "(")
    }

    fn parse_function_def(&mut self) -> Result<Node> {
        let line = self.line();
        let return_type = self.eat_type()?;
        let name = self.eat_identifier()?.lexeme;
        self.eat_lexeme("(")?;
        let params = self.parse_param_list()?;
        self.eat_lexeme(")")?;
        self.eat_lexeme("{")?;
        let body = self.parse_block_items()?;
        self.eat_lexeme("}")?;
        Ok(Node::new(
            line,
            NodeKind::FunctionDef {
                name,
                return_type,
                params,
                body,
            },
        ))
    }

    fn parse_param_list(&mut self) -> Result<Vec<Param>> {
        let mut params = Vec::new();
        if self.check_lexeme(")") {
            return Ok(params);
        }
        loop {
            let ty = self.eat_type()?;
            let name = self.eat_identifier()?.lexeme;
            let mut is_array = false;
            if self.check_lexeme("[") {
                self.advance();
                self.eat_lexeme("]")?;
                is_array = true;
            }
            params.push(Param { ty, name, is_array });
            if self.check_lexeme(",") {
                self.advance();
            } else {
                break;
            }
        }
        Ok(params)
    }

    fn parse_block_items(&mut self) -> Result<Vec<Node>> {
        let mut items = Vec::new();
        while !self.check_lexeme("}") && !self.at_eof() {
            items.push(self.parse_block_item()?);
        }
        Ok(items)
    }

    fn parse_block_item(&mut self) -> Result<Node> {
        if self.is_var_decl_ahead() {
            self.parse_var_decl()
        } else {
            self.parse_statement()
        }
    }

    fn is_var_decl_ahead(&self) -> bool {
        self.check_kind(TokenKind::Keyword)
            && (self.check_lexeme("int") || self.check_lexeme("float"))
    }

    fn parse_var_decl(&mut self) -> Result<Node> {
        let line = self.line();
        let ty = self.eat_type()?;
        let mut decls = vec![self.parse_one_var_decl(&ty)?];
        while self.check_lexeme(",") {
            self.advance();
            decls.push(self.parse_one_var_decl(&ty)?);
        }
        self.eat_lexeme(";")?;
        Ok(Node::new(line, NodeKind::VarDeclGroup(decls)))
    }

    fn parse_one_var_decl(&mut self, ty: &str) -> Result<Node> {
        let line = self.line();
        let name = self.eat_identifier()?.lexeme;
        let init = if self.check_lexeme("=") {
            self.advance();
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        Ok(Node::new(
            line,
            NodeKind::VarDecl {
                ty: ty.to_string(),
                name,
                init,
            },
        ))
    }

    fn parse_statement(&mut self) -> Result<Node> {
        if self.check_lexeme("{") {
            return self.parse_block_as_node();
        }
        if self.check_lexeme("return") {
            return self.parse_return();
        }
        if self.check_lexeme("if") {
            return self.parse_if();
        }
        if self.check_lexeme("while") {
            return self.parse_while();
        }
        if self.check_lexeme("for") {
            return self.parse_for();
        }
        let stmt = self.parse_assignment()?;
        self.eat_lexeme(";")?;
        Ok(stmt)
    }

    fn parse_block_as_node(&mut self) -> Result<Node> {
        let line = self.line();
        self.eat_lexeme("{")?;
        let items = self.parse_block_items()?;
        self.eat_lexeme("}")?;
        Ok(Node::new(line, NodeKind::Block(items)))
    }

    fn parse_assignment(&mut self) -> Result<Node> {
        let line = self.line();
        let name = self.eat_identifier()?.lexeme;
        self.eat_lexeme("=")?;
        let rhs = Box::new(self.parse_expr()?);
        Ok(Node::new(line, NodeKind::Assign { name, rhs }))
    }

    fn parse_return(&mut self) -> Result<Node> {
        let line = self.line();
        self.eat_lexeme("return")?;
        if self.check_lexeme(";") {
            self.advance();
            return Ok(Node::new(line, NodeKind::Return(ReturnValue::None)));
        }
        let expr = self.parse_expr()?;
        self.eat_lexeme(";")?;
        let value = match &expr.kind {
            NodeKind::Number(text) => ReturnValue::Inline(text.clone()),
            NodeKind::Var(name) => ReturnValue::Inline(name.clone()),
            _ => ReturnValue::Expr(Box::new(expr)),
        };
        Ok(Node::new(line, NodeKind::Return(value)))
    }

    fn parse_if(&mut self) -> Result<Node> {
        let line = self.line();
        self.eat_lexeme("if")?;
        self.eat_lexeme("(")?;
        let cond = Box::new(self.parse_expr()?);
        self.eat_lexeme(")")?;
        let then_body = self.parse_body()?;
        let else_clause = if self.check_lexeme("else") {
            self.advance();
            if self.check_lexeme("if") {
                Some(Else::ElseIf(Box::new(self.parse_if()?)))
            } else {
                Some(Else::Else(self.parse_body()?))
            }
        } else {
            None
        };
        Ok(Node::new(
            line,
            NodeKind::If {
                cond,
                then_body,
                else_clause,
            },
        ))
    }

    fn parse_while(&mut self) -> Result<Node> {
        let line = self.line();
        self.eat_lexeme("while")?;
        self.eat_lexeme("(")?;
        let cond = Box::new(self.parse_expr()?);
        self.eat_lexeme(")")?;
        let body = self.parse_body()?;
        Ok(Node::new(line, NodeKind::While { cond, body }))
    }

    fn parse_for(&mut self) -> Result<Node> {
        let line = self.line();
        self.eat_lexeme("for")?;
        self.eat_lexeme("(")?;
        let init = if self.check_lexeme(";") {
            None
        } else {
            Some(Box::new(self.parse_assignment()?))
        };
        self.eat_lexeme(";")?;
        let cond = if self.check_lexeme(";") {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };
        self.eat_lexeme(";")?;
        let step = if self.check_lexeme(")") {
            None
        } else {
            Some(Box::new(self.parse_assignment()?))
        };
        self.eat_lexeme(")")?;
        let body = self.parse_body()?;
        Ok(Node::new(
            line,
            NodeKind::For {
                init,
                cond,
                step,
                body,
            },
        ))
    }

    /// The body of an `if`/`while`/`for`/`else`: a `{ … }` block becomes
    /// `Body::Braced`, a bare single statement becomes `Body::Bare`.
    fn parse_body(&mut self) -> Result<Body> {
        if self.check_lexeme("{") {
            self.advance();
            let items = self.parse_block_items()?;
            self.eat_lexeme("}")?;
            Ok(Body::Braced(items))
        } else {
            Ok(Body::Bare(Box::new(self.parse_block_item()?)))
        }
    }

    // --- expressions -------------------------------------------------------

    fn parse_expr(&mut self) -> Result<Node> {
        self.parse_logical_or()
    }

    fn parse_logical_or(&mut self) -> Result<Node> {
        let mut lhs = self.parse_logical_and()?;
        while self.check_lexeme("||") {
            let line = self.line();
            self.advance();
            let rhs = self.parse_logical_and()?;
            lhs = Node::new(
                line,
                NodeKind::BinOp {
                    op: "||".to_string(),
                    lhs: Box::new(lhs),
                    rhs: Some(Box::new(rhs)),
                },
            );
        }
        Ok(lhs)
    }

    fn parse_logical_and(&mut self) -> Result<Node> {
        let mut lhs = self.parse_comparison()?;
        while self.check_lexeme("&&") {
            let line = self.line();
            self.advance();
            let rhs = self.parse_comparison()?;
            lhs = Node::new(
                line,
                NodeKind::BinOp {
                    op: "&&".to_string(),
                    lhs: Box::new(lhs),
                    rhs: Some(Box::new(rhs)),
                },
            );
        }
        Ok(lhs)
    }

    fn parse_comparison(&mut self) -> Result<Node> {
        let mut lhs = self.parse_additive()?;
        while COMPARISON_OPERATORS.contains(&self.current().lexeme.as_str())
            && self.check_kind(TokenKind::Operator)
        {
            let op = self.current().lexeme.clone();
            let line = self.line();
            self.advance();
            let rhs = self.parse_additive()?;
            lhs = Node::new(
                line,
                NodeKind::BinOp {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Some(Box::new(rhs)),
                },
            );
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> Result<Node> {
        let mut lhs = self.parse_multiplicative()?;
        while ADDITIVE_OPERATORS.contains(&self.current().lexeme.as_str())
            && self.check_kind(TokenKind::Operator)
        {
            let op = self.current().lexeme.clone();
            let line = self.line();
            self.advance();
            let rhs = self.parse_multiplicative()?;
            lhs = Node::new(
                line,
                NodeKind::BinOp {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Some(Box::new(rhs)),
                },
            );
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<Node> {
        let mut lhs = self.parse_unary()?;
        while MULTIPLICATIVE_OPERATORS.contains(&self.current().lexeme.as_str())
            && self.check_kind(TokenKind::Operator)
        {
            let op = self.current().lexeme.clone();
            let line = self.line();
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = Node::new(
                line,
                NodeKind::BinOp {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Some(Box::new(rhs)),
                },
            );
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Node> {
        if self.check_lexeme("!") {
            let line = self.line();
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Node::new(
                line,
                NodeKind::BinOp {
                    op: "!".to_string(),
                    lhs: Box::new(operand),
                    rhs: None,
                },
            ));
        }
        if self.looks_like_cast() {
            let line = self.line();
            self.advance(); // '('
            let ty = self.eat_type()?;
            self.eat_lexeme(")")?;
            let expr = Box::new(self.parse_unary()?);
            return Ok(Node::new(line, NodeKind::Cast { ty, expr }));
        }
        self.parse_primary()
    }

    /// `(` is a cast only when followed by a type keyword and then `)`,
    /// three consecutive tokens (§4.2).
    fn looks_like_cast(&self) -> bool {
        self.check_lexeme("(")
            && matches!(self.peek_at(1), Some(t) if t.kind == TokenKind::Keyword && TYPE_KEYWORDS.contains(&t.lexeme.as_str()))
            && matches!(self.peek_at(2), Some(t) if t.lexeme == ")")
    }

    fn parse_primary(&mut self) -> Result<Node> {
        let line = self.line();
        if self.check_kind(TokenKind::IntLiteral) || self.check_kind(TokenKind::FloatLiteral) {
            let text = self.advance().lexeme;
            return Ok(Node::new(line, NodeKind::Number(text)));
        }
        if self.check_lexeme("(") {
            self.advance();
            let expr = self.parse_expr()?;
            self.eat_lexeme(")")?;
            return Ok(expr);
        }
        if self.check_kind(TokenKind::Identifier) {
            let name = self.advance().lexeme;
            if self.check_lexeme("(") {
                self.advance();
                let mut args = Vec::new();
                if !self.check_lexeme(")") {
                    loop {
                        args.push(self.parse_expr()?);
                        if self.check_lexeme(",") {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
                self.eat_lexeme(")")?;
                return Ok(Node::new(line, NodeKind::Call { name, args }));
            }
            return Ok(Node::new(line, NodeKind::Var(name)));
        }
        Err(self.error("an expression"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialize::serialize;
    use tacc_lex::tokenize;

    fn parse(source: &str) -> Result<Program> {
        let mut handler = Handler::new();
        let tokens = tokenize(source, &mut handler).unwrap();
        Parser::parse(&tokens, &mut handler)
    }

    #[test]
    fn function_with_two_params_and_sum_return() {
        let program = parse("int f(int a, int b) { return a + b; }").unwrap();
        assert_eq!(program.items.len(), 1);
        match &program.items[0].kind {
            NodeKind::FunctionDef { name, params, body, .. } => {
                assert_eq!(name, "f");
                assert_eq!(params.len(), 2);
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected FunctionDef, got {other:?}"),
        }
    }

    #[test]
    fn additive_left_associates() {
        let program = parse("int f() { return a - b - c; }").unwrap();
        let text = serialize(&program);
        // (a - b) - c: outer BinOp(-) has BinOp(-) as its left child.
        let outer = text.find("BinOp(-)").unwrap();
        let inner = text[outer + 1..].find("BinOp(-)").unwrap() + outer + 1;
        let var_c = text.find("Var(c)").unwrap();
        assert!(inner < var_c);
    }

    #[test]
    fn comparison_and_logical_and_precedence() {
        // a == b && c < d parses as (a == b) && (c < d): the top node
        // is the &&, not either comparison.
        let program = parse("int f() { return a == b && c < d; }").unwrap();
        let text = serialize(&program);
        let and_pos = text.find("BinOp(&&)").unwrap();
        let eq_pos = text.find("BinOp(==)").unwrap();
        let lt_pos = text.find("BinOp(<)").unwrap();
        assert!(and_pos < eq_pos);
        assert!(and_pos < lt_pos);
    }

    #[test]
    fn multiplicative_binds_tighter_than_additive() {
        let program = parse("int x = 1 + 2 * 3;").unwrap();
        let text = serialize(&program);
        assert_eq!(
            text,
            "VarDeclGroup:\n    VarDecl: int x =\n        BinOp(+)\n            \
             Number(1)\n            BinOp(*)\n                Number(2)\n                \
             Number(3)\n"
        );
    }

    #[test]
    fn cast_requires_type_keyword_inside_parens() {
        let program = parse("int f() { return (float)x; }").unwrap();
        let text = serialize(&program);
        assert!(text.contains("Cast(float)"));
    }

    #[test]
    fn plain_parens_are_not_a_cast() {
        let program = parse("int f() { return (x + 1); }").unwrap();
        let text = serialize(&program);
        assert!(!text.contains("Cast"));
        assert!(text.contains("BinOp(+)"));
    }

    #[test]
    fn function_call_uses_distinct_call_label() {
        let program = parse("int f() { return multiply(x, 2); }").unwrap();
        let text = serialize(&program);
        assert!(text.contains("Call(multiply)"));
    }

    #[test]
    fn for_loop_scenario_six() {
        let program =
            parse("int f() { for (i = 0; i < n; i = i + 1) { s = s + i; } return 0; }").unwrap();
        let text = serialize(&program);
        assert!(text.contains("For:"));
        assert!(text.contains("Assign: i ="));
        assert!(text.contains("BinOp(<)"));
    }

    #[test]
    fn bare_loop_body_has_no_wrapper() {
        let program = parse("int f() { while (x) y = 1; return 0; }").unwrap();
        let text = serialize(&program);
        // A bare (non-braced) while body is not wrapped in `Body:`.
        let while_pos = text.find("While:").unwrap();
        let after_while = &text[while_pos..];
        assert!(!after_while.starts_with("While:\n    Var(x)\n    Body:"));
        assert!(after_while.contains("Assign: y ="));
    }

    #[test]
    fn missing_semicolon_is_a_syntax_error() {
        let err = parse("int f() { return 0 }").unwrap_err();
        assert!(matches!(err, TaccError::Syntax { .. }));
    }

    #[test]
    fn unexpected_token_reports_source_line() {
        let err = parse("int f() {\n return x + ; \n}").unwrap_err();
        match err {
            TaccError::Syntax { line, .. } => assert_eq!(line, 2),
            other => panic!("expected Syntax error, got {other:?}"),
        }
    }
}

/// §8's "parsing the same token stream twice yields identical AST
/// text" and "multiplication binds tighter than addition" restated as
/// quickcheck properties over arbitrary operand literals, instead of
/// the one fixed triple `multiplicative_binds_tighter_than_additive`
/// checks above.
#[cfg(test)]
mod expression_properties {
    use super::*;
    use crate::serialize::serialize;
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;
    use tacc_lex::tokenize;

    #[derive(Clone, Copy, Debug)]
    struct ThreeOperands(u8, u8, u8);

    impl Arbitrary for ThreeOperands {
        fn arbitrary(g: &mut Gen) -> Self {
            ThreeOperands(
                u8::arbitrary(g) % 100,
                u8::arbitrary(g) % 100,
                u8::arbitrary(g) % 100,
            )
        }
    }

    fn sum_of_product_source(ops: ThreeOperands) -> String {
        format!(
            "int f() {{ return {} + {} * {}; }}",
            ops.0, ops.1, ops.2
        )
    }

    fn parse(source: &str) -> Result<Program> {
        let mut handler = Handler::new();
        let tokens = tokenize(source, &mut handler).unwrap();
        Parser::parse(&tokens, &mut handler)
    }

    #[quickcheck]
    fn parsing_the_same_tokens_twice_is_idempotent(ops: ThreeOperands) -> bool {
        let src = sum_of_product_source(ops);
        let mut h = Handler::new();
        let tokens = tokenize(&src, &mut h).unwrap();
        let a = Parser::parse(&tokens, &mut Handler::new()).unwrap();
        let b = Parser::parse(&tokens, &mut Handler::new()).unwrap();
        serialize(&a) == serialize(&b)
    }

    #[quickcheck]
    fn multiplication_binds_tighter_than_addition_for_any_operands(ops: ThreeOperands) -> bool {
        let program = parse(&sum_of_product_source(ops)).unwrap();
        let text = serialize(&program);
        match (text.find("BinOp(+)"), text.find("BinOp(*)")) {
            (Some(plus), Some(star)) => plus < star,
            _ => false,
        }
    }
}
