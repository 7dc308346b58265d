//! The statement shapes the conversion fix can rewrite.

use std::fmt;

use convfix_syntax::{AssignOp, NodeId, NodeKind, SyntaxTree};

/// Shape of a convertible statement, without its node ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementShape {
    Assignment,
    Return,
    Yield,
    LocalDeclaration,
}

impl StatementShape {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementShape::Assignment => "assignment",
            StatementShape::Return => "return",
            StatementShape::Yield => "yield return",
            StatementShape::LocalDeclaration => "local declaration",
        }
    }
}

impl fmt::Display for StatementShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A statement the fix knows how to rewrite, with the nodes each shape
/// needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertibleStatement {
    /// `target = value;`
    Assignment {
        stmt: NodeId,
        target: NodeId,
        value: NodeId,
    },
    /// `return value;`
    Return { stmt: NodeId, value: NodeId },
    /// `yield return value;`
    Yield { stmt: NodeId, value: NodeId },
    /// `T name = init;` with exactly one declarator.
    LocalDeclaration { stmt: NodeId, init: NodeId },
}

impl ConvertibleStatement {
    /// Classify `node`, or `None` if it is not one of the four shapes.
    ///
    /// Only simple `=` assignments count; compound assignments do not.
    /// Returns without a value do not. Local declarations need exactly one
    /// declarator, and it must have an initializer.
    pub fn classify(tree: &SyntaxTree, node: NodeId) -> Option<Self> {
        match tree.kind(node) {
            NodeKind::ExprStmt { expr } => match tree.kind(*expr) {
                NodeKind::Assign {
                    op: AssignOp::Assign,
                    target,
                    value,
                } => Some(ConvertibleStatement::Assignment {
                    stmt: node,
                    target: *target,
                    value: *value,
                }),
                _ => None,
            },
            NodeKind::Return { value: Some(value) } => Some(ConvertibleStatement::Return {
                stmt: node,
                value: *value,
            }),
            NodeKind::Yield { value } => Some(ConvertibleStatement::Yield {
                stmt: node,
                value: *value,
            }),
            NodeKind::LocalDecl { vars, .. } => match vars.as_slice() {
                [only] => only.init.map(|init| ConvertibleStatement::LocalDeclaration {
                    stmt: node,
                    init,
                }),
                _ => None,
            },
            _ => None,
        }
    }

    /// The statement node to be replaced.
    pub fn statement(&self) -> NodeId {
        match *self {
            ConvertibleStatement::Assignment { stmt, .. }
            | ConvertibleStatement::Return { stmt, .. }
            | ConvertibleStatement::Yield { stmt, .. }
            | ConvertibleStatement::LocalDeclaration { stmt, .. } => stmt,
        }
    }

    /// The expression whose value needs converting.
    pub fn source_expr(&self) -> NodeId {
        match *self {
            ConvertibleStatement::Assignment { value, .. }
            | ConvertibleStatement::Return { value, .. }
            | ConvertibleStatement::Yield { value, .. } => value,
            ConvertibleStatement::LocalDeclaration { init, .. } => init,
        }
    }

    pub fn shape(&self) -> StatementShape {
        match self {
            ConvertibleStatement::Assignment { .. } => StatementShape::Assignment,
            ConvertibleStatement::Return { .. } => StatementShape::Return,
            ConvertibleStatement::Yield { .. } => StatementShape::Yield,
            ConvertibleStatement::LocalDeclaration { .. } => StatementShape::LocalDeclaration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convfix_syntax::Parser;

    fn classify_first(source: &str) -> Option<ConvertibleStatement> {
        let tree = Parser::parse(source).unwrap();
        let first = tree.children(tree.root())[0];
        ConvertibleStatement::classify(&tree, first)
    }

    fn shape_of(source: &str) -> Option<StatementShape> {
        classify_first(source).map(|s| s.shape())
    }

    #[test]
    fn recognized_shapes() {
        assert_eq!(shape_of("x = y;"), Some(StatementShape::Assignment));
        assert_eq!(shape_of("return y;"), Some(StatementShape::Return));
        assert_eq!(shape_of("yield return y;"), Some(StatementShape::Yield));
        assert_eq!(shape_of("int x = y;"), Some(StatementShape::LocalDeclaration));
    }

    #[test]
    fn unrecognized_shapes() {
        assert_eq!(shape_of("f(y);"), None);
        assert_eq!(shape_of("x += y;"), None);
        assert_eq!(shape_of("return;"), None);
        assert_eq!(shape_of("while (x) y = 1;"), None);
        assert_eq!(shape_of("{ x = y; }"), None);
    }

    #[test]
    fn declarations_need_one_initialized_declarator() {
        assert_eq!(shape_of("int x;"), None);
        assert_eq!(shape_of("int x = a, y = b;"), None);
        assert_eq!(shape_of("int x = a, y;"), None);
    }

    #[test]
    fn assignment_parts() {
        let tree = Parser::parse("total = amount;").unwrap();
        let stmt = tree.children(tree.root())[0];
        let Some(ConvertibleStatement::Assignment { target, value, .. }) =
            ConvertibleStatement::classify(&tree, stmt)
        else {
            panic!("expected assignment");
        };
        assert!(matches!(tree.kind(target), NodeKind::Ident(i) if i.name == "total"));
        assert!(matches!(tree.kind(value), NodeKind::Ident(i) if i.name == "amount"));
    }

    #[test]
    fn accessors() {
        let tree = Parser::parse("int x = y;").unwrap();
        let stmt = tree.children(tree.root())[0];
        let convertible = ConvertibleStatement::classify(&tree, stmt).unwrap();
        assert_eq!(convertible.statement(), stmt);
        assert_eq!(tree.parent(convertible.source_expr()), Some(stmt));
        assert_eq!(convertible.shape().to_string(), "local declaration");
    }
}
