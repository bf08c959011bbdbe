//! Recursive descent parser for spec source
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use super::ast::{Expr, ExprKind, Program, Stmt};
use super::error::{Result, SpecError};
use super::lexer::{Lexer, Token, TokenKind};

/// Nesting limit for expressions, keeping recursion off the stack guard
const MAX_DEPTH: usize = 128;

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    depth: usize,
}

impl Parser {
    pub fn new(input: &str) -> Result<Self> {
        Ok(Self {
            tokens: Lexer::new(input).tokenize()?,
            current: 0,
            depth: 0,
        })
    }

    /// Parse a whole program
    pub fn parse(mut self) -> Result<Program> {
        let mut statements = Vec::new();
        while !self.check(&TokenKind::Eof) {
            statements.push(self.parse_statement()?);
        }
        Ok(Program { statements })
    }

    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    fn peek_at(&self, ahead: usize) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[(self.current + ahead).min(last)]
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.current += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, context: &str) -> Result<Token> {
        if self.check(&kind) {
            return Ok(self.advance());
        }
        let found = self.peek();
        Err(SpecError::syntax(
            format!(
                "Expected {} {}, found {}",
                kind.describe(),
                context,
                found.kind.describe()
            ),
            found.position,
        ))
    }

    fn parse_statement(&mut self) -> Result<Stmt> {
        let stmt = if self.check(&TokenKind::Let) {
            let position = self.advance().position;
            let name = self.expect_ident("after 'let'")?;
            self.expect(TokenKind::Eq, "in let binding")?;
            let value = self.parse_expr()?;
            Stmt::Let {
                name,
                value,
                position,
            }
        } else {
            Stmt::Expr(self.parse_expr()?)
        };
        self.eat(&TokenKind::Semi);
        Ok(stmt)
    }

    fn expect_ident(&mut self, context: &str) -> Result<String> {
        let token = self.advance();
        match token.kind {
            TokenKind::Ident(name) => Ok(name),
            other => Err(SpecError::syntax(
                format!("Expected identifier {}, found {}", context, other.describe()),
                token.position,
            )),
        }
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        self.descend()?;
        let expr = self.parse_unary();
        self.depth -= 1;
        expr
    }

    /// Count one more level of AST nesting against the limit
    fn descend(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(SpecError::syntax(
                "Expression nested too deeply",
                self.peek().position,
            ));
        }
        Ok(())
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        if self.check(&TokenKind::Minus) {
            let position = self.advance().position;
            let operand = self.parse_expr()?;
            return Ok(Expr::new(ExprKind::Neg(Box::new(operand)), position));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr> {
        let depth = self.depth;
        let expr = self.parse_postfix_chain();
        self.depth = depth;
        expr
    }

    /// Each call, member or index link nests the expression one level deeper
    fn parse_postfix_chain(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            let position = self.peek().position;
            if matches!(
                self.peek().kind,
                TokenKind::LParen | TokenKind::Dot | TokenKind::LBracket
            ) {
                self.descend()?;
            }
            if self.eat(&TokenKind::LParen) {
                let args = self.parse_list(TokenKind::RParen, "to close argument list")?;
                expr = Expr::new(
                    ExprKind::Call {
                        callee: Box::new(expr),
                        args,
                    },
                    position,
                );
            } else if self.eat(&TokenKind::Dot) {
                let name = self.expect_ident("after '.'")?;
                expr = Expr::new(
                    ExprKind::Member {
                        object: Box::new(expr),
                        name,
                    },
                    position,
                );
            } else if self.eat(&TokenKind::LBracket) {
                let index = self.parse_expr()?;
                self.expect(TokenKind::RBracket, "to close index")?;
                expr = Expr::new(
                    ExprKind::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    },
                    position,
                );
            } else {
                return Ok(expr);
            }
        }
    }

    /// Comma-separated expressions up to `close`, trailing comma allowed
    fn parse_list(&mut self, close: TokenKind, context: &str) -> Result<Vec<Expr>> {
        let mut items = Vec::new();
        while !self.check(&close) {
            items.push(self.parse_expr()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(close, context)?;
        Ok(items)
    }

    fn is_lambda_start(&self) -> bool {
        match (&self.peek_at(1).kind, &self.peek_at(2).kind, &self.peek_at(3).kind) {
            (TokenKind::RParen, TokenKind::Arrow, _) => true,
            (TokenKind::Ident(_), TokenKind::RParen, TokenKind::Arrow) => true,
            _ => false,
        }
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let position = self.peek().position;

        if self.check(&TokenKind::LParen) && self.is_lambda_start() {
            self.advance();
            let param = match self.advance().kind {
                TokenKind::Ident(name) => {
                    self.expect(TokenKind::RParen, "after lambda parameter")?;
                    Some(name)
                }
                _ => None,
            };
            self.expect(TokenKind::Arrow, "in lambda")?;
            let body = self.parse_expr()?;
            return Ok(Expr::new(
                ExprKind::Lambda {
                    param,
                    body: Box::new(body),
                },
                position,
            ));
        }

        let token = self.advance();
        let kind = match token.kind {
            TokenKind::Number(n) => ExprKind::Number(n),
            TokenKind::Str(s) => ExprKind::Str(s),
            TokenKind::Regex { pattern, flags } => ExprKind::Regex { pattern, flags },
            TokenKind::True => ExprKind::Bool(true),
            TokenKind::False => ExprKind::Bool(false),
            TokenKind::Null => ExprKind::Null,
            TokenKind::Ident(name) => ExprKind::Ident(name),
            TokenKind::LBracket => {
                ExprKind::Array(self.parse_list(TokenKind::RBracket, "to close array")?)
            }
            TokenKind::LBrace => ExprKind::Object(self.parse_object_entries()?),
            TokenKind::LParen => {
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen, "to close parenthesis")?;
                return Ok(inner);
            }
            other => {
                return Err(SpecError::syntax(
                    format!("Unexpected {}", other.describe()),
                    token.position,
                ))
            }
        };
        Ok(Expr::new(kind, position))
    }

    fn parse_object_entries(&mut self) -> Result<Vec<(String, Expr)>> {
        let mut entries = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            let token = self.advance();
            let key = match token.kind {
                TokenKind::Ident(name) => name,
                TokenKind::Str(s) => s,
                other => {
                    return Err(SpecError::syntax(
                        format!("Expected object key, found {}", other.describe()),
                        token.position,
                    ))
                }
            };
            self.expect(TokenKind::Colon, "after object key")?;
            entries.push((key, self.parse_expr()?));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "to close object")?;
        Ok(entries)
    }
}

/// Parse spec source into a program
pub fn parse(input: &str) -> Result<Program> {
    Parser::new(input)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only_expr(input: &str) -> ExprKind {
        let program = parse(input).unwrap();
        assert_eq!(program.statements.len(), 1);
        match program.statements.into_iter().next() {
            Some(Stmt::Expr(expr)) => expr.kind,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_call_with_object_argument() {
        let ExprKind::Call { callee, args } = only_expr("Str({minLength: 3, 'match': /a/})") else {
            panic!("expected call");
        };
        assert_eq!(callee.kind, ExprKind::Ident("Str".into()));
        let ExprKind::Object(entries) = &args[0].kind else {
            panic!("expected object");
        };
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["minLength", "match"]);
    }

    #[test]
    fn test_namespace_member_call() {
        let ExprKind::Call { callee, .. } = only_expr("Does.Not.Contain(File('x'))") else {
            panic!("expected call");
        };
        assert!(matches!(callee.kind, ExprKind::Member { ref name, .. } if name == "Contain"));
    }

    #[test]
    fn test_lambda_vs_parenthesized() {
        assert!(matches!(only_expr("(it) => [it.value]"), ExprKind::Lambda { param: Some(_), .. }));
        assert!(matches!(only_expr("() => []"), ExprKind::Lambda { param: None, .. }));
        assert!(matches!(only_expr("(Str())"), ExprKind::Call { .. }));
    }

    #[test]
    fn test_let_and_semicolons() {
        let program = parse("let name = Str(); Field({key: 'a', value: name});").unwrap();
        assert_eq!(program.statements.len(), 2);
        assert!(matches!(program.statements[0], Stmt::Let { ref name, .. } if name == "name"));
    }

    #[test]
    fn test_trailing_commas() {
        assert!(parse("OneOf('a', 'b',)").is_ok());
        assert!(parse("Object({required: [Bool(),],})").is_ok());
    }

    #[test]
    fn test_syntax_errors_carry_position() {
        let err = parse("Str(\n  {minLength 3})").unwrap_err();
        match err {
            SpecError::Syntax { position, .. } => {
                assert_eq!(position.line, 2);
                assert_eq!(position.column, 14);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(parse("Str(").is_err());
        assert!(parse("let = 3").is_err());
    }

    #[test]
    fn test_depth_limit() {
        let source = format!("{}1{}", "[".repeat(500), "]".repeat(500));
        assert!(matches!(parse(&source), Err(SpecError::Syntax { .. })));
    }

    #[test]
    fn test_long_postfix_chains_hit_depth_limit() {
        let calls = format!("Str{}", "()".repeat(200_000));
        assert!(matches!(parse(&calls), Err(SpecError::Syntax { .. })));

        let members = format!("it{}", ".a".repeat(200_000));
        assert!(matches!(parse(&members), Err(SpecError::Syntax { .. })));

        assert!(parse(&format!("Str{}", "()".repeat(50))).is_ok());
        assert!(parse("Does.Not.Contain(File('x'))").is_ok());
    }
}
