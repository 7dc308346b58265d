//! Replacing a statement with the statements produced for it.

use convfix_core::TreeError;
use convfix_syntax::{NodeId, SyntaxFactory, SyntaxTree};

/// How a replacement was put into the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rewrite {
    /// The statements took the original's place in its block.
    Spliced { parent: NodeId, count: usize },
    /// The original was the body of a control construct; a new block
    /// holding the statements took its slot.
    Wrapped { block: NodeId },
}

/// Replace `original` in `tree` by `replacement`, in order.
///
/// When the parent holds a statement list the replacement is spliced in
/// and the siblings keep their order. Otherwise the original was the
/// unbraced body of an `if`, `else`, `while` or `do` and the replacement
/// is wrapped in a new block. Only statement nodes are inserted in either
/// case, and at least one is required: the original is never removed
/// without a substitute. On success the original ends up detached.
pub fn replace_statement(
    tree: &mut SyntaxTree,
    original: NodeId,
    replacement: &[NodeId],
) -> Result<Rewrite, TreeError> {
    if !tree.is_statement(original) {
        return Err(TreeError::NotAStatement {
            node: original.raw(),
        });
    }
    let parent = match tree.parent(original) {
        Some(parent) if tree.is_attached(original) => parent,
        _ => {
            return Err(TreeError::Detached {
                node: original.raw(),
            });
        }
    };

    let statements: Vec<NodeId> = replacement
        .iter()
        .copied()
        .filter(|&node| tree.is_statement(node))
        .collect();
    if statements.len() != replacement.len() {
        tracing::debug!(
            dropped = replacement.len() - statements.len(),
            "dropping non-statement nodes from replacement"
        );
    }
    if statements.is_empty() {
        return Err(TreeError::EmptyReplacement {
            node: original.raw(),
        });
    }

    if tree.is_block(parent) {
        tree.splice_statements(parent, original, &statements)?;
        tracing::trace!(?parent, count = statements.len(), "spliced replacement into block");
        return Ok(Rewrite::Spliced {
            parent,
            count: statements.len(),
        });
    }

    let block = SyntaxFactory::new(tree).block(statements);
    tree.replace_child(parent, original, block)?;
    tracing::trace!(?parent, ?block, "wrapped replacement in new block");
    Ok(Rewrite::Wrapped { block })
}

#[cfg(test)]
mod tests {
    use super::*;
    use convfix_syntax::{LiteralKind, NodeKind, Parser, printer};

    fn first_stmt_in_function(tree: &SyntaxTree) -> NodeId {
        let function = tree.children(tree.root())[0];
        let NodeKind::Function { body, .. } = tree.kind(function) else {
            panic!("expected function");
        };
        tree.children(*body)[0]
    }

    #[test]
    fn splice_keeps_siblings() {
        let mut tree = Parser::parse("void f() { a = 1; b = 2; c = 3; }").unwrap();
        let function = tree.children(tree.root())[0];
        let NodeKind::Function { body, .. } = *tree.kind(function) else {
            panic!("expected function");
        };
        let middle = tree.children(body)[1];

        let mut factory = SyntaxFactory::new(&mut tree);
        let x = factory.ident("x");
        let y = factory.ident("y");
        let first = factory.expr_stmt(x);
        let second = factory.expr_stmt(y);

        let rewrite = replace_statement(&mut tree, middle, &[first, second]).unwrap();
        assert_eq!(rewrite, Rewrite::Spliced { parent: body, count: 2 });
        assert!(!tree.is_attached(middle));
        assert_eq!(
            printer::print(&tree),
            "void f() {\n    a = 1;\n    x;\n    y;\n    c = 3;\n}\n"
        );
    }

    #[test]
    fn unbraced_body_is_wrapped() {
        let mut tree = Parser::parse("void f() { if (ok) a = 1; else b = 2; }").unwrap();
        let if_stmt = first_stmt_in_function(&tree);
        let NodeKind::If {
            condition,
            then_branch,
            else_branch,
        } = *tree.kind(if_stmt)
        else {
            panic!("expected if");
        };

        let mut factory = SyntaxFactory::new(&mut tree);
        let one = factory.literal(LiteralKind::Int(1));
        let stray = factory.literal(LiteralKind::Int(2));
        let stmt = factory.return_stmt(Some(one));

        let rewrite = replace_statement(&mut tree, then_branch, &[stray, stmt]).unwrap();
        let Rewrite::Wrapped { block } = rewrite else {
            panic!("expected wrap");
        };
        assert_eq!(tree.children(block), vec![stmt]);
        assert_eq!(tree.parent(block), Some(if_stmt));

        let NodeKind::If {
            condition: new_condition,
            then_branch: new_then,
            else_branch: new_else,
        } = *tree.kind(if_stmt)
        else {
            panic!("expected if");
        };
        assert_eq!(new_condition, condition);
        assert_eq!(new_then, block);
        assert_eq!(new_else, else_branch);
        assert!(!tree.is_attached(then_branch));
    }

    #[test]
    fn replacement_without_statements_is_refused() {
        let mut tree = Parser::parse("void f(long big) { x = big; g(x); }").unwrap();
        let stmt = first_stmt_in_function(&tree);
        let before = tree.clone();

        let mut factory = SyntaxFactory::new(&mut tree);
        let expr = factory.ident("big");
        let err = replace_statement(&mut tree, stmt, &[expr]).unwrap_err();
        assert_eq!(err, TreeError::EmptyReplacement { node: stmt.raw() });
        assert!(tree.is_attached(stmt));
        assert_eq!(printer::print(&tree), printer::print(&before));

        let err = replace_statement(&mut tree, stmt, &[]).unwrap_err();
        assert_eq!(err, TreeError::EmptyReplacement { node: stmt.raw() });
    }

    #[test]
    fn unbraced_else_is_wrapped() {
        let mut tree = Parser::parse("void f() { if (ok) a = 1; else b = 2; }").unwrap();
        let if_stmt = first_stmt_in_function(&tree);
        let NodeKind::If {
            then_branch,
            else_branch: Some(else_branch),
            ..
        } = *tree.kind(if_stmt)
        else {
            panic!("expected if with else");
        };

        let mut factory = SyntaxFactory::new(&mut tree);
        let c = factory.ident("c");
        let stmt = factory.expr_stmt(c);

        let Rewrite::Wrapped { block } = replace_statement(&mut tree, else_branch, &[stmt]).unwrap()
        else {
            panic!("expected wrap");
        };
        let NodeKind::If {
            then_branch: new_then,
            else_branch: new_else,
            ..
        } = *tree.kind(if_stmt)
        else {
            panic!("expected if");
        };
        assert_eq!(new_then, then_branch);
        assert_eq!(new_else, Some(block));
        assert!(!tree.is_attached(else_branch));
        assert_eq!(
            printer::print(&tree),
            "void f() {\n    if (ok)\n        a = 1;\n    else {\n        c;\n    }\n}\n"
        );
    }

    #[test]
    fn unbraced_do_body_is_wrapped() {
        let mut tree = Parser::parse("void f() { do a = 1; while (ok); }").unwrap();
        let do_stmt = first_stmt_in_function(&tree);
        let NodeKind::DoWhile { body, condition } = *tree.kind(do_stmt) else {
            panic!("expected do-while");
        };

        let mut factory = SyntaxFactory::new(&mut tree);
        let c = factory.ident("c");
        let stmt = factory.expr_stmt(c);

        let Rewrite::Wrapped { block } = replace_statement(&mut tree, body, &[stmt]).unwrap() else {
            panic!("expected wrap");
        };
        let NodeKind::DoWhile {
            body: new_body,
            condition: new_condition,
        } = *tree.kind(do_stmt)
        else {
            panic!("expected do-while");
        };
        assert_eq!(new_body, block);
        assert_eq!(new_condition, condition);
        assert_eq!(tree.children(block), vec![stmt]);
        assert_eq!(
            printer::print(&tree),
            "void f() {\n    do {\n        c;\n    } while (ok);\n}\n"
        );
    }

    #[test]
    fn detached_original_is_an_error() {
        let mut tree = Parser::parse("void f() { a = 1; }").unwrap();
        let stmt = first_stmt_in_function(&tree);
        let mut factory = SyntaxFactory::new(&mut tree);
        let empty = factory.block(Vec::new());
        replace_statement(&mut tree, stmt, &[empty]).unwrap();
        let err = replace_statement(&mut tree, stmt, &[empty]).unwrap_err();
        assert_eq!(err, TreeError::Detached { node: stmt.raw() });
    }

    #[test]
    fn non_statement_original_is_an_error() {
        let mut tree = Parser::parse("x = 1;").unwrap();
        let stmt = tree.children(tree.root())[0];
        let expr = tree.children(stmt)[0];
        let err = replace_statement(&mut tree, expr, &[]).unwrap_err();
        assert_eq!(err, TreeError::NotAStatement { node: expr.raw() });
    }

    #[test]
    fn top_level_statement_splices_into_compilation_unit() {
        let mut tree = Parser::parse("a = 1;\nb = 2;").unwrap();
        let root = tree.root();
        let first = tree.children(root)[0];
        let mut factory = SyntaxFactory::new(&mut tree);
        let empty_block = factory.block(Vec::new());
        let rewrite = replace_statement(&mut tree, first, &[empty_block]).unwrap();
        assert_eq!(rewrite, Rewrite::Spliced { parent: root, count: 1 });
        assert_eq!(tree.children(root)[0], empty_block);
    }
}
