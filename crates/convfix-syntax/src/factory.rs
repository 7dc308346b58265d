//! Construction of new nodes for code fixes.
//!
//! A [`SyntaxFactory`] borrows the working copy of a tree and adds detached
//! nodes to it. Nothing it creates is visible from the root until an edit
//! splices it in.

use convfix_core::{DataType, Span};

use crate::tree::{
    AssignOp, Ident, LiteralKind, NodeId, NodeKind, SyntaxTree, TypeExpr, VarDeclarator,
};

/// Builds synthesized nodes inside a [`SyntaxTree`].
pub struct SyntaxFactory<'t> {
    tree: &'t mut SyntaxTree,
}

impl<'t> SyntaxFactory<'t> {
    pub fn new(tree: &'t mut SyntaxTree) -> Self {
        Self { tree }
    }

    /// Read access to the tree being built into.
    pub fn tree(&self) -> &SyntaxTree {
        self.tree
    }

    fn node(&mut self, kind: NodeKind) -> NodeId {
        self.tree.alloc(kind, Span::default())
    }

    /// Deep copy of an existing subtree. The copy is detached and has no
    /// source spans.
    pub fn copy_subtree(&mut self, id: NodeId) -> NodeId {
        let mut kind = self.tree.kind(id).clone();
        let mut children = Vec::new();
        kind.for_each_child(|child| children.push(child));
        let copies: Vec<NodeId> = children
            .into_iter()
            .map(|child| self.copy_subtree(child))
            .collect();
        let mut copies = copies.into_iter();
        kind.for_each_child_mut(|slot| {
            if let Some(copy) = copies.next() {
                *slot = copy;
            }
        });
        self.node(kind)
    }

    /// The source form of a resolved type.
    pub fn type_expr(&self, ty: &DataType) -> TypeExpr {
        TypeExpr::from_data_type(ty)
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    pub fn literal(&mut self, value: LiteralKind) -> NodeId {
        self.node(NodeKind::Literal(value))
    }

    pub fn ident(&mut self, name: impl Into<String>) -> NodeId {
        self.node(NodeKind::Ident(Ident::synthetic(name)))
    }

    pub fn member(&mut self, object: NodeId, name: impl Into<String>) -> NodeId {
        self.node(NodeKind::Member {
            object,
            name: Ident::synthetic(name),
        })
    }

    pub fn call(&mut self, callee: NodeId, args: Vec<NodeId>) -> NodeId {
        self.node(NodeKind::Call { callee, args })
    }

    pub fn new_object(&mut self, ty: &DataType, args: Vec<NodeId>) -> NodeId {
        let ty = self.type_expr(ty);
        self.node(NodeKind::New { ty, args })
    }

    /// `cast<ty>(expr)`
    pub fn cast(&mut self, ty: &DataType, expr: NodeId) -> NodeId {
        let ty = self.type_expr(ty);
        self.node(NodeKind::Cast { ty, expr })
    }

    /// `target = value` as an expression.
    pub fn assign(&mut self, target: NodeId, value: NodeId) -> NodeId {
        self.node(NodeKind::Assign {
            op: AssignOp::Assign,
            target,
            value,
        })
    }

    // ========================================================================
    // Statements
    // ========================================================================

    pub fn expr_stmt(&mut self, expr: NodeId) -> NodeId {
        self.node(NodeKind::ExprStmt { expr })
    }

    /// `ty name = init;`
    pub fn local_decl(&mut self, ty: &DataType, name: impl Into<String>, init: NodeId) -> NodeId {
        let ty = self.type_expr(ty);
        self.node(NodeKind::LocalDecl {
            ty,
            vars: vec![VarDeclarator {
                name: Ident::synthetic(name),
                init: Some(init),
            }],
        })
    }

    pub fn return_stmt(&mut self, value: Option<NodeId>) -> NodeId {
        self.node(NodeKind::Return { value })
    }

    pub fn yield_stmt(&mut self, value: NodeId) -> NodeId {
        self.node(NodeKind::Yield { value })
    }

    pub fn block(&mut self, stmts: Vec<NodeId>) -> NodeId {
        self.node(NodeKind::Block { stmts })
    }
}
