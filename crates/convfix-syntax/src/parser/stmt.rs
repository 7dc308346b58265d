//! Statement parsing.

use convfix_core::ParseError;

use super::Parser;
use crate::lexer::TokenKind;
use crate::tree::{NodeId, NodeKind, VarDeclarator};

impl<'src> Parser<'src> {
    /// Parse a statement.
    ///
    /// Dispatches on the current token; anything that does not start a
    /// keyword statement or a local declaration is an expression statement.
    pub fn parse_statement(&mut self) -> Result<NodeId, ParseError> {
        match self.peek().kind {
            TokenKind::LeftBrace => self.parse_block(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Do => self.parse_do_while(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Yield => self.parse_yield(),
            TokenKind::Break | TokenKind::Continue => self.parse_jump(),
            TokenKind::Semicolon => {
                let span = self.advance().span;
                Ok(self.alloc(NodeKind::Empty, span))
            }
            _ if self.is_var_decl() => self.parse_local_decl(),
            _ => self.parse_expr_stmt(),
        }
    }

    /// Parse a block, recovering from errors in individual statements.
    ///
    /// Grammar: `'{' STATEMENT* '}'`
    pub fn parse_block(&mut self) -> Result<NodeId, ParseError> {
        let start = self.expect(TokenKind::LeftBrace)?.span;

        let mut stmts = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_eof() {
            let before = self.position;
            match self.parse_statement() {
                Ok(stmt) => stmts.push(stmt),
                Err(error) => {
                    self.errors.push(error);
                    self.synchronize(before);
                }
            }
        }
        self.expect(TokenKind::RightBrace)?;

        let span = self.span_from(start);
        Ok(self.alloc(NodeKind::Block { stmts }, span))
    }

    /// Grammar: `EXPR ';'`
    fn parse_expr_stmt(&mut self) -> Result<NodeId, ParseError> {
        let start = self.peek().span;
        let expr = self.parse_expr(0)?;
        self.expect(TokenKind::Semicolon)?;
        let span = self.span_from(start);
        Ok(self.alloc(NodeKind::ExprStmt { expr }, span))
    }

    /// Parse a local variable declaration.
    ///
    /// Grammar: `TYPE IDENTIFIER ('=' EXPR)? (',' IDENTIFIER ('=' EXPR)?)* ';'`
    fn parse_local_decl(&mut self) -> Result<NodeId, ParseError> {
        let ty = self.parse_type()?;
        let start = ty.span;

        let mut vars = Vec::new();
        loop {
            let name = self.parse_ident()?;
            let init = if self.eat(TokenKind::Equal).is_some() {
                Some(self.parse_expr(0)?)
            } else {
                None
            };
            vars.push(VarDeclarator { name, init });
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::Semicolon)?;

        let span = self.span_from(start);
        Ok(self.alloc(NodeKind::LocalDecl { ty, vars }, span))
    }

    /// Grammar: `'return' EXPR? ';'`
    fn parse_return(&mut self) -> Result<NodeId, ParseError> {
        let start = self.expect(TokenKind::Return)?.span;
        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr(0)?)
        };
        self.expect(TokenKind::Semicolon)?;
        let span = self.span_from(start);
        Ok(self.alloc(NodeKind::Return { value }, span))
    }

    /// Grammar: `'yield' 'return' EXPR ';'`
    fn parse_yield(&mut self) -> Result<NodeId, ParseError> {
        let start = self.expect(TokenKind::Yield)?.span;
        self.expect(TokenKind::Return)?;
        let value = self.parse_expr(0)?;
        self.expect(TokenKind::Semicolon)?;
        let span = self.span_from(start);
        Ok(self.alloc(NodeKind::Yield { value }, span))
    }

    /// Grammar: `'if' '(' EXPR ')' STATEMENT ('else' STATEMENT)?`
    fn parse_if(&mut self) -> Result<NodeId, ParseError> {
        let start = self.expect(TokenKind::If)?.span;
        self.expect(TokenKind::LeftParen)?;
        let condition = self.parse_expr(0)?;
        self.expect(TokenKind::RightParen)?;

        let then_branch = self.parse_statement()?;
        let else_branch = if self.eat(TokenKind::Else).is_some() {
            Some(self.parse_statement()?)
        } else {
            None
        };

        let span = self.span_from(start);
        Ok(self.alloc(
            NodeKind::If {
                condition,
                then_branch,
                else_branch,
            },
            span,
        ))
    }

    /// Grammar: `'while' '(' EXPR ')' STATEMENT`
    fn parse_while(&mut self) -> Result<NodeId, ParseError> {
        let start = self.expect(TokenKind::While)?.span;
        self.expect(TokenKind::LeftParen)?;
        let condition = self.parse_expr(0)?;
        self.expect(TokenKind::RightParen)?;
        let body = self.parse_statement()?;
        let span = self.span_from(start);
        Ok(self.alloc(NodeKind::While { condition, body }, span))
    }

    /// Grammar: `'do' STATEMENT 'while' '(' EXPR ')' ';'`
    fn parse_do_while(&mut self) -> Result<NodeId, ParseError> {
        let start = self.expect(TokenKind::Do)?.span;
        let body = self.parse_statement()?;
        self.expect(TokenKind::While)?;
        self.expect(TokenKind::LeftParen)?;
        let condition = self.parse_expr(0)?;
        self.expect(TokenKind::RightParen)?;
        self.expect(TokenKind::Semicolon)?;
        let span = self.span_from(start);
        Ok(self.alloc(NodeKind::DoWhile { body, condition }, span))
    }

    /// `break;` or `continue;`
    fn parse_jump(&mut self) -> Result<NodeId, ParseError> {
        let token = self.advance();
        self.expect(TokenKind::Semicolon)?;
        let kind = if token.kind == TokenKind::Break {
            NodeKind::Break
        } else {
            NodeKind::Continue
        };
        let span = self.span_from(token.span);
        Ok(self.alloc(kind, span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::SyntaxTree;

    fn parse_one(source: &str) -> (SyntaxTree, NodeId) {
        let tree = Parser::parse(source).unwrap();
        let first = tree.children(tree.root())[0];
        (tree, first)
    }

    #[test]
    fn parse_local_decl_with_declarators() {
        let (tree, stmt) = parse_one("int a = 1, b, c = a;");
        let NodeKind::LocalDecl { ty, vars } = tree.kind(stmt) else {
            panic!("expected declaration");
        };
        assert_eq!(ty.name, "int");
        assert_eq!(vars.len(), 3);
        assert!(vars[0].init.is_some());
        assert!(vars[1].init.is_none());
        assert_eq!(tree.parent(vars[2].init.unwrap()), Some(stmt));
    }

    #[test]
    fn parse_var_decl() {
        let (tree, stmt) = parse_one("var total = 5L;");
        let NodeKind::LocalDecl { ty, .. } = tree.kind(stmt) else {
            panic!("expected declaration");
        };
        assert!(ty.is_var());
    }

    #[test]
    fn parse_unbraced_if_else() {
        let (tree, stmt) = parse_one("if (ok) x = y; else x = 0;");
        let NodeKind::If {
            then_branch,
            else_branch,
            ..
        } = tree.kind(stmt)
        else {
            panic!("expected if");
        };
        assert!(matches!(tree.kind(*then_branch), NodeKind::ExprStmt { .. }));
        assert_eq!(tree.parent(*then_branch), Some(stmt));
        assert!(else_branch.is_some());
    }

    #[test]
    fn parse_yield_return() {
        let (tree, stmt) = parse_one("yield return 1;");
        assert!(matches!(tree.kind(stmt), NodeKind::Yield { .. }));
    }

    #[test]
    fn parse_yield_requires_return() {
        assert!(Parser::parse("yield 1;").is_err());
    }

    #[test]
    fn parse_loops_and_jumps() {
        let (tree, stmt) = parse_one("while (go) { break; continue; ; }");
        let NodeKind::While { body, .. } = tree.kind(stmt) else {
            panic!("expected while");
        };
        let kinds: Vec<_> = tree
            .children(*body)
            .into_iter()
            .map(|s| tree.kind(s).name())
            .collect();
        assert_eq!(kinds, vec!["break", "continue", "empty statement"]);

        let (tree, stmt) = parse_one("do x = 1; while (x < 3);");
        assert!(matches!(tree.kind(stmt), NodeKind::DoWhile { .. }));
    }

    #[test]
    fn parse_return_without_value() {
        let (tree, stmt) = parse_one("return;");
        assert!(matches!(tree.kind(stmt), NodeKind::Return { value: None }));
    }

    #[test]
    fn statement_spans_cover_semicolon() {
        let (tree, stmt) = parse_one("  x = 1;  ");
        let span = tree.span(stmt);
        assert_eq!((span.offset, span.len), (2, 6));
    }

    #[test]
    fn block_recovers_from_bad_statement() {
        let (tree, errors) = Parser::parse_lenient("{ x = ; y = 2; }");
        assert_eq!(errors.len(), 1);
        let block = tree.children(tree.root())[0];
        assert_eq!(tree.children(block).len(), 1);
    }
}
