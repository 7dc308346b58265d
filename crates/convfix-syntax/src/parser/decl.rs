//! Declarations and types: classes, members, functions.

use convfix_core::{ParseError, ParseErrorKind};

use super::Parser;
use crate::lexer::TokenKind;
use crate::tree::{Ident, NodeId, NodeKind, Param, TypeExpr};

impl<'src> Parser<'src> {
    /// Parse one top-level item: a class, a function, or a statement.
    pub(super) fn parse_item(&mut self) -> Result<NodeId, ParseError> {
        match self.peek().kind {
            TokenKind::Class => self.parse_class(),
            TokenKind::Identifier if self.is_function_decl() => self.parse_function(),
            _ => self.parse_statement(),
        }
    }

    /// Parse a class declaration.
    ///
    /// Grammar: `'class' IDENTIFIER '{' MEMBER* '}'`
    fn parse_class(&mut self) -> Result<NodeId, ParseError> {
        let start = self.expect(TokenKind::Class)?.span;
        let name = self.parse_ident()?;
        self.expect(TokenKind::LeftBrace)?;

        let mut members = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_eof() {
            let before = self.position;
            match self.parse_member() {
                Ok(member) => members.push(member),
                Err(error) => {
                    self.errors.push(error);
                    self.synchronize(before);
                }
            }
        }
        self.expect(TokenKind::RightBrace)?;

        let span = self.span_from(start);
        Ok(self.alloc(NodeKind::Class { name, members }, span))
    }

    /// Parse a class member: method, property or field.
    fn parse_member(&mut self) -> Result<NodeId, ParseError> {
        if self.is_function_decl() {
            return self.parse_function();
        }

        let ty = self.parse_type()?;
        let start = ty.span;
        let name = self.parse_ident()?;

        if self.check(TokenKind::LeftBrace) {
            let has_setter = self.parse_accessors()?;
            let span = self.span_from(start);
            return Ok(self.alloc(NodeKind::Property { ty, name, has_setter }, span));
        }

        let init = if self.eat(TokenKind::Equal).is_some() {
            Some(self.parse_expr(0)?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon)?;

        let span = self.span_from(start);
        Ok(self.alloc(NodeKind::Field { ty, name, init }, span))
    }

    /// Parse `{ get; set; }`, returning whether a setter is present.
    fn parse_accessors(&mut self) -> Result<bool, ParseError> {
        self.expect(TokenKind::LeftBrace)?;
        let mut has_setter = false;
        while !self.check(TokenKind::RightBrace) {
            if self.check_contextual("get") {
                self.advance();
            } else if self.check_contextual("set") {
                self.advance();
                has_setter = true;
            } else {
                let token = self.peek();
                return Err(ParseError::expected_token(
                    token.span,
                    "'get' or 'set'",
                    token.kind.description(),
                ));
            }
            self.expect(TokenKind::Semicolon)?;
        }
        self.expect(TokenKind::RightBrace)?;
        Ok(has_setter)
    }

    /// Parse a function declaration.
    ///
    /// Grammar: `TYPE IDENTIFIER '(' (PARAM (',' PARAM)*)? ')' BLOCK`
    fn parse_function(&mut self) -> Result<NodeId, ParseError> {
        let return_type = self.parse_type()?;
        let start = return_type.span;
        let name = self.parse_ident()?;

        self.expect(TokenKind::LeftParen)?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                let ty = self.parse_type()?;
                let name = self.parse_ident()?;
                params.push(Param { ty, name });
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen)?;

        let body = self.parse_block()?;
        let span = self.span_from(start);
        Ok(self.alloc(
            NodeKind::Function {
                return_type,
                name,
                params,
                body,
            },
            span,
        ))
    }

    pub(super) fn parse_ident(&mut self) -> Result<Ident, ParseError> {
        let token = *self.peek();
        if token.kind != TokenKind::Identifier {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedIdentifier,
                token.span,
                format!("expected identifier, found {}", token.kind.description()),
            ));
        }
        self.advance();
        Ok(Ident::new(token.lexeme, token.span))
    }

    // ========================================================================
    // Types
    // ========================================================================

    /// Parse a type.
    ///
    /// Grammar: `IDENTIFIER ('<' TYPE (',' TYPE)* '>')? ('[' ']')*`
    pub(super) fn parse_type(&mut self) -> Result<TypeExpr, ParseError> {
        let token = *self.peek();
        if token.kind != TokenKind::Identifier {
            return Err(ParseError::expected_type(
                token.span,
                token.kind.description(),
            ));
        }
        self.advance();

        let mut args = Vec::new();
        if self.eat(TokenKind::Less).is_some() {
            loop {
                args.push(self.parse_type()?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
            self.expect(TokenKind::Greater)?;
        }

        let mut array_rank = 0u8;
        while self.check(TokenKind::LeftBracket) && self.peek_nth(1).kind == TokenKind::RightBracket
        {
            self.advance();
            self.advance();
            array_rank = array_rank.saturating_add(1);
        }

        Ok(TypeExpr {
            name: token.lexeme.to_string(),
            args,
            array_rank,
            span: self.span_from(token.span),
        })
    }

    /// If a type starts `n` tokens ahead, the lookahead distance just past
    /// it. Consumes nothing.
    fn scan_type(&self, mut n: usize) -> Option<usize> {
        if self.peek_nth(n).kind != TokenKind::Identifier {
            return None;
        }
        n += 1;

        if self.peek_nth(n).kind == TokenKind::Less {
            n += 1;
            loop {
                n = self.scan_type(n)?;
                if self.peek_nth(n).kind == TokenKind::Comma {
                    n += 1;
                } else {
                    break;
                }
            }
            if self.peek_nth(n).kind != TokenKind::Greater {
                return None;
            }
            n += 1;
        }

        while self.peek_nth(n).kind == TokenKind::LeftBracket
            && self.peek_nth(n + 1).kind == TokenKind::RightBracket
        {
            n += 2;
        }
        Some(n)
    }

    /// `TYPE IDENTIFIER '('` ahead.
    fn is_function_decl(&self) -> bool {
        match self.scan_type(0) {
            Some(n) => {
                self.peek_nth(n).kind == TokenKind::Identifier
                    && self.peek_nth(n + 1).kind == TokenKind::LeftParen
            }
            None => false,
        }
    }

    /// `TYPE IDENTIFIER` followed by `=`, `,` or `;` ahead.
    pub(super) fn is_var_decl(&self) -> bool {
        match self.scan_type(0) {
            Some(n) => {
                self.peek_nth(n).kind == TokenKind::Identifier
                    && matches!(
                        self.peek_nth(n + 1).kind,
                        TokenKind::Equal | TokenKind::Comma | TokenKind::Semicolon
                    )
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::SyntaxTree;

    fn items(tree: &SyntaxTree) -> Vec<NodeId> {
        tree.children(tree.root())
    }

    #[test]
    fn parse_class_with_members() {
        let tree = Parser::parse(
            "class Order {\n  long total;\n  int Count { get; set; }\n  string Label { get; }\n  int size() { return 1; }\n}",
        )
        .unwrap();
        let class = items(&tree)[0];
        let NodeKind::Class { name, members } = tree.kind(class) else {
            panic!("expected class");
        };
        assert_eq!(name.name, "Order");
        assert_eq!(members.len(), 4);
        assert!(matches!(tree.kind(members[0]), NodeKind::Field { init: None, .. }));
        assert!(matches!(
            tree.kind(members[1]),
            NodeKind::Property { has_setter: true, .. }
        ));
        assert!(matches!(
            tree.kind(members[2]),
            NodeKind::Property { has_setter: false, .. }
        ));
        assert!(matches!(tree.kind(members[3]), NodeKind::Function { .. }));
        assert_eq!(tree.parent(members[3]), Some(class));
    }

    #[test]
    fn parse_function_with_params() {
        let tree = Parser::parse("int add(int a, long b) { return a; }").unwrap();
        let NodeKind::Function {
            return_type,
            name,
            params,
            body,
        } = tree.kind(items(&tree)[0])
        else {
            panic!("expected function");
        };
        assert_eq!(return_type.to_string(), "int");
        assert_eq!(name.name, "add");
        assert_eq!(params.len(), 2);
        assert_eq!(params[1].ty.to_string(), "long");
        assert!(tree.is_block(*body));
    }

    #[test]
    fn parse_generic_and_array_types() {
        let tree =
            Parser::parse("IEnumerable<int> numbers() { yield return 1; }\nstring[] names;")
                .unwrap();
        let NodeKind::Function { return_type, .. } = tree.kind(items(&tree)[0]) else {
            panic!("expected function");
        };
        assert_eq!(return_type.to_string(), "IEnumerable<int>");

        let NodeKind::LocalDecl { ty, .. } = tree.kind(items(&tree)[1]) else {
            panic!("expected declaration");
        };
        assert_eq!(ty.array_rank, 1);
    }

    #[test]
    fn comparison_is_not_mistaken_for_generic() {
        let tree = Parser::parse("bool b = a < c;").unwrap();
        let NodeKind::LocalDecl { vars, .. } = tree.kind(items(&tree)[0]) else {
            panic!("expected declaration");
        };
        let init = vars[0].init.unwrap();
        assert!(matches!(tree.kind(init), NodeKind::Binary { .. }));
    }

    #[test]
    fn bad_accessor_is_reported() {
        let errors = Parser::parse("class A { int X { get; put; } }").unwrap_err();
        assert!(errors.to_string().contains("'get' or 'set'"));
    }
}
