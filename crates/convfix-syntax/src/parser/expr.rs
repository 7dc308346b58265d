//! Expression parsing using Pratt parsing (precedence climbing).

use convfix_core::{ParseError, ParseErrorKind, Span};

use super::Parser;
use crate::lexer::{Token, TokenKind};
use crate::tree::{AssignOp, BinaryOp, Ident, LiteralKind, NodeId, NodeKind, UnaryOp};

/// Binding power of postfix member access and calls.
const POSTFIX_BP: u8 = 17;
/// Binding power of prefix operators.
const PREFIX_BP: u8 = 15;
/// Left and right binding power of assignment (right associative).
const ASSIGN_BP: (u8, u8) = (2, 1);

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::PipePipe => BinaryOp::Or,
        TokenKind::AmpAmp => BinaryOp::And,
        TokenKind::EqualEqual => BinaryOp::Eq,
        TokenKind::BangEqual => BinaryOp::Ne,
        TokenKind::Less => BinaryOp::Lt,
        TokenKind::LessEqual => BinaryOp::Le,
        TokenKind::Greater => BinaryOp::Gt,
        TokenKind::GreaterEqual => BinaryOp::Ge,
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Rem,
        _ => return None,
    })
}

fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    Some(match kind {
        TokenKind::Equal => AssignOp::Assign,
        TokenKind::PlusEqual => AssignOp::AddAssign,
        TokenKind::MinusEqual => AssignOp::SubAssign,
        TokenKind::StarEqual => AssignOp::MulAssign,
        TokenKind::SlashEqual => AssignOp::DivAssign,
        _ => return None,
    })
}

/// Left-associative binding powers derived from operator precedence.
fn binding_power(op: BinaryOp) -> (u8, u8) {
    let p = op.precedence() * 2;
    (p + 1, p + 2)
}

impl<'src> Parser<'src> {
    /// Parse an expression with a minimum binding power.
    pub fn parse_expr(&mut self, min_bp: u8) -> Result<NodeId, ParseError> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let kind = self.peek().kind;

            if kind == TokenKind::Dot {
                if POSTFIX_BP < min_bp {
                    break;
                }
                self.advance();
                let name = self.parse_ident()?;
                let span = self.tree.span(lhs).merge(name.span);
                lhs = self.alloc(NodeKind::Member { object: lhs, name }, span);
                continue;
            }

            if kind == TokenKind::LeftParen {
                if POSTFIX_BP < min_bp {
                    break;
                }
                let args = self.parse_arguments()?;
                let span = self.span_from(self.tree.span(lhs));
                lhs = self.alloc(NodeKind::Call { callee: lhs, args }, span);
                continue;
            }

            if let Some(op) = assign_op(kind) {
                let (l_bp, r_bp) = ASSIGN_BP;
                if l_bp < min_bp {
                    break;
                }
                let op_token = self.advance();
                if !matches!(
                    self.tree.kind(lhs),
                    NodeKind::Ident(_) | NodeKind::Member { .. }
                ) {
                    return Err(ParseError::new(
                        ParseErrorKind::InvalidAssignmentTarget,
                        op_token.span,
                        format!(
                            "cannot assign to {}",
                            self.tree.kind(lhs).name()
                        ),
                    ));
                }
                let value = self.parse_expr(r_bp)?;
                let span = self.tree.span(lhs).merge(self.tree.span(value));
                lhs = self.alloc(
                    NodeKind::Assign {
                        op,
                        target: lhs,
                        value,
                    },
                    span,
                );
                continue;
            }

            if let Some(op) = binary_op(kind) {
                let (l_bp, r_bp) = binding_power(op);
                if l_bp < min_bp {
                    break;
                }
                self.advance();
                let rhs = self.parse_expr(r_bp)?;
                let span = self.tree.span(lhs).merge(self.tree.span(rhs));
                lhs = self.alloc(NodeKind::Binary { op, lhs, rhs }, span);
                continue;
            }

            break;
        }

        Ok(lhs)
    }

    /// Parse the start of an expression.
    fn parse_prefix(&mut self) -> Result<NodeId, ParseError> {
        let token = *self.peek();

        match token.kind {
            TokenKind::IntLiteral
            | TokenKind::LongLiteral
            | TokenKind::FloatLiteral
            | TokenKind::DoubleLiteral
            | TokenKind::StringLiteral => {
                self.advance();
                let literal = parse_literal(&token)?;
                Ok(self.alloc(NodeKind::Literal(literal), token.span))
            }
            TokenKind::True | TokenKind::False => {
                self.advance();
                let value = token.kind == TokenKind::True;
                Ok(self.alloc(NodeKind::Literal(LiteralKind::Bool(value)), token.span))
            }
            TokenKind::Null => {
                self.advance();
                Ok(self.alloc(NodeKind::Literal(LiteralKind::Null), token.span))
            }

            TokenKind::Minus | TokenKind::Bang => {
                self.advance();
                let op = if token.kind == TokenKind::Minus {
                    UnaryOp::Neg
                } else {
                    UnaryOp::Not
                };
                let operand = self.parse_expr(PREFIX_BP)?;
                let span = token.span.merge(self.tree.span(operand));
                Ok(self.alloc(NodeKind::Unary { op, operand }, span))
            }

            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expr(0)?;
                self.expect(TokenKind::RightParen)?;
                let span = self.span_from(token.span);
                Ok(self.alloc(NodeKind::Paren { inner }, span))
            }

            TokenKind::New => {
                self.advance();
                let ty = self.parse_type()?;
                let args = self.parse_arguments()?;
                let span = self.span_from(token.span);
                Ok(self.alloc(NodeKind::New { ty, args }, span))
            }

            TokenKind::Cast => self.parse_cast(),

            TokenKind::Identifier => {
                self.advance();
                let ident = Ident::new(token.lexeme, token.span);
                Ok(self.alloc(NodeKind::Ident(ident), token.span))
            }

            TokenKind::Eof => Err(ParseError::new(
                ParseErrorKind::UnexpectedEof,
                token.span,
                "expected expression, found end of file",
            )),

            _ => Err(ParseError::expected_expression(
                token.span,
                token.kind.description(),
            )),
        }
    }

    /// Grammar: `'cast' '<' TYPE '>' '(' EXPR ')'`
    fn parse_cast(&mut self) -> Result<NodeId, ParseError> {
        let start = self.expect(TokenKind::Cast)?.span;
        self.expect(TokenKind::Less)?;
        let ty = self.parse_type()?;
        self.expect(TokenKind::Greater)?;
        self.expect(TokenKind::LeftParen)?;
        let expr = self.parse_expr(0)?;
        self.expect(TokenKind::RightParen)?;
        let span = self.span_from(start);
        Ok(self.alloc(NodeKind::Cast { ty, expr }, span))
    }

    /// Grammar: `'(' (EXPR (',' EXPR)*)? ')'`
    fn parse_arguments(&mut self) -> Result<Vec<NodeId>, ParseError> {
        self.expect(TokenKind::LeftParen)?;
        let mut args = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                args.push(self.parse_expr(0)?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen)?;
        Ok(args)
    }
}

fn parse_literal(token: &Token<'_>) -> Result<LiteralKind, ParseError> {
    let digits: String = token.lexeme.chars().filter(|&c| c != '_').collect();
    let invalid = |detail: &str| {
        ParseError::new(
            ParseErrorKind::InvalidLiteral,
            token.span,
            format!("{detail}: {}", token.lexeme),
        )
    };

    match token.kind {
        TokenKind::IntLiteral => digits
            .parse::<i64>()
            .map(LiteralKind::Int)
            .map_err(|_| invalid("integer out of range")),
        TokenKind::LongLiteral => digits
            .trim_end_matches(['L', 'l'])
            .parse::<i64>()
            .map(LiteralKind::Long)
            .map_err(|_| invalid("long out of range")),
        TokenKind::FloatLiteral => digits
            .trim_end_matches(['f', 'F'])
            .parse::<f64>()
            .map(LiteralKind::Float)
            .map_err(|_| invalid("invalid float")),
        TokenKind::DoubleLiteral => digits
            .parse::<f64>()
            .map(LiteralKind::Double)
            .map_err(|_| invalid("invalid double")),
        TokenKind::StringLiteral => Ok(LiteralKind::String(unescape(token.lexeme, token.span)?)),
        _ => Err(invalid("not a literal")),
    }
}

/// Strip the quotes from a string literal and resolve escapes.
fn unescape(lexeme: &str, span: Span) -> Result<String, ParseError> {
    let body = &lexeme[1..lexeme.len() - 1];
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            other => {
                return Err(ParseError::new(
                    ParseErrorKind::InvalidLiteral,
                    span,
                    format!("unknown escape sequence '\\{}'", other.unwrap_or(' ')),
                ));
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> (Parser<'_>, NodeId) {
        let mut parser = Parser::new(source);
        let expr = parser.parse_expr(0).unwrap();
        (parser, expr)
    }

    #[test]
    fn parse_literals() {
        let cases = [
            ("42", LiteralKind::Int(42)),
            ("1_000L", LiteralKind::Long(1000)),
            ("1.5f", LiteralKind::Float(1.5)),
            ("2.5", LiteralKind::Double(2.5)),
            ("\"a\\\"b\"", LiteralKind::String("a\"b".into())),
            ("true", LiteralKind::Bool(true)),
            ("null", LiteralKind::Null),
        ];
        for (source, expected) in cases {
            let (parser, expr) = parse(source);
            assert_eq!(parser.tree().kind(expr), &NodeKind::Literal(expected), "{source}");
        }
    }

    #[test]
    fn parse_precedence() {
        let (parser, expr) = parse("1 + 2 * 3");
        let tree = parser.tree();
        let NodeKind::Binary { op, rhs, .. } = tree.kind(expr) else {
            panic!("expected binary");
        };
        assert_eq!(*op, BinaryOp::Add);
        assert!(matches!(
            tree.kind(*rhs),
            NodeKind::Binary { op: BinaryOp::Mul, .. }
        ));
    }

    #[test]
    fn parse_assignment_is_right_associative() {
        let (parser, expr) = parse("a = b = c");
        let tree = parser.tree();
        let NodeKind::Assign { value, .. } = tree.kind(expr) else {
            panic!("expected assignment");
        };
        assert!(matches!(tree.kind(*value), NodeKind::Assign { .. }));
    }

    #[test]
    fn parse_member_assignment() {
        let (parser, expr) = parse("order.Total += 1");
        let tree = parser.tree();
        let NodeKind::Assign { op, target, .. } = tree.kind(expr) else {
            panic!("expected assignment");
        };
        assert_eq!(*op, AssignOp::AddAssign);
        assert!(matches!(tree.kind(*target), NodeKind::Member { .. }));
    }

    #[test]
    fn reject_invalid_assignment_target() {
        let mut parser = Parser::new("a + b = c");
        let err = parser.parse_expr(0).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidAssignmentTarget);
    }

    #[test]
    fn parse_calls_new_and_cast() {
        let (parser, expr) = parse("make(new List<int>(), cast<int>(total.Sum()))");
        let tree = parser.tree();
        let NodeKind::Call { args, .. } = tree.kind(expr) else {
            panic!("expected call");
        };
        assert_eq!(args.len(), 2);
        let NodeKind::New { ty, .. } = tree.kind(args[0]) else {
            panic!("expected new");
        };
        assert_eq!(ty.to_string(), "List<int>");
        let NodeKind::Cast { ty, expr: inner } = tree.kind(args[1]) else {
            panic!("expected cast");
        };
        assert_eq!(ty.name, "int");
        assert!(matches!(tree.kind(*inner), NodeKind::Call { .. }));
    }

    #[test]
    fn parse_unary_binds_tighter_than_binary() {
        let (parser, expr) = parse("-a * b");
        let NodeKind::Binary { lhs, .. } = parser.tree().kind(expr) else {
            panic!("expected binary");
        };
        assert!(matches!(
            parser.tree().kind(*lhs),
            NodeKind::Unary { op: UnaryOp::Neg, .. }
        ));
    }

    #[test]
    fn expression_spans() {
        let (parser, expr) = parse("foo.bar(1)");
        let span = parser.tree().span(expr);
        assert_eq!((span.offset, span.len), (0, 10));
    }

    #[test]
    fn integer_overflow_is_invalid_literal() {
        let mut parser = Parser::new("99999999999999999999");
        let err = parser.parse_expr(0).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidLiteral);
    }
}
