//! Syntax tree with parent links.
//!
//! Nodes live in an index arena owned by [`SyntaxTree`] and are addressed by
//! [`NodeId`]. Every node records its parent, which is what the code fix
//! pipeline walks when it climbs from a diagnostic location to the enclosing
//! statement. Trees are plain values: an edit clones the tree and mutates
//! the clone, the original is never touched.
//!
//! Nodes created by a code fix (see [`SyntaxFactory`](crate::SyntaxFactory))
//! have an empty span and start out detached (no parent) until an edit
//! splices them in.

use std::fmt;

use convfix_core::{DataType, Span, TreeError};

// ============================================================================
// Handles and leaf data
// ============================================================================

/// Handle of a node in a [`SyntaxTree`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of the node in the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An identifier with its location.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    /// An identifier without source location.
    pub fn synthetic(name: impl Into<String>) -> Self {
        Self::new(name, Span::default())
    }
}

/// A type as written in source: `int`, `List<Order>`, `string[]`, `var`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    pub name: String,
    pub args: Vec<TypeExpr>,
    pub array_rank: u8,
    pub span: Span,
}

impl TypeExpr {
    /// A plain named type.
    pub fn named(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            array_rank: 0,
            span,
        }
    }

    /// Whether this is the implicit `var` type.
    pub fn is_var(&self) -> bool {
        self.name == "var" && self.args.is_empty() && self.array_rank == 0
    }

    /// Structural conversion to a resolved type. Does not check that the
    /// name is declared anywhere.
    pub fn to_data_type(&self) -> DataType {
        let mut ty = DataType::generic(
            self.name.clone(),
            self.args.iter().map(TypeExpr::to_data_type).collect(),
        );
        for _ in 0..self.array_rank {
            ty = ty.array_of();
        }
        ty
    }

    /// The source form of a resolved type, without location.
    pub fn from_data_type(ty: &DataType) -> Self {
        Self {
            name: ty.name().to_string(),
            args: ty.type_args().iter().map(TypeExpr::from_data_type).collect(),
            array_rank: ty.array_rank(),
            span: Span::default(),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        for _ in 0..self.array_rank {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralKind {
    Int(i64),
    Long(i64),
    Float(f64),
    Double(f64),
    String(String),
    Bool(bool),
    Null,
}

/// Binary operators, lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    /// Binding power; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Eq | BinaryOp::Ne => 3,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => 4,
            BinaryOp::Add | BinaryOp::Sub => 5,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 6,
        }
    }

    /// Whether the result is `bool` regardless of operand types.
    pub fn is_boolean(self) -> bool {
        self.precedence() <= 4
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
            AssignOp::MulAssign => "*=",
            AssignOp::DivAssign => "/=",
        }
    }
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: TypeExpr,
    pub name: Ident,
}

/// One variable in a local declaration: `x = 5` in `int x = 5, y;`.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarator {
    pub name: Ident,
    pub init: Option<NodeId>,
}

// ============================================================================
// Node kinds
// ============================================================================

/// The shape of a node and its children.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    // Declarations
    /// The root: classes, functions and top-level statements.
    CompilationUnit { items: Vec<NodeId> },
    /// `class Name { members }`
    Class { name: Ident, members: Vec<NodeId> },
    /// `T name = init;` inside a class
    Field {
        ty: TypeExpr,
        name: Ident,
        init: Option<NodeId>,
    },
    /// `T Name { get; set; }`
    Property {
        ty: TypeExpr,
        name: Ident,
        has_setter: bool,
    },
    /// `T name(params) { body }`
    Function {
        return_type: TypeExpr,
        name: Ident,
        params: Vec<Param>,
        body: NodeId,
    },

    // Statements
    /// `{ stmts }`
    Block { stmts: Vec<NodeId> },
    /// `expr;`
    ExprStmt { expr: NodeId },
    /// `T a = x, b;`
    LocalDecl {
        ty: TypeExpr,
        vars: Vec<VarDeclarator>,
    },
    /// `return value;`
    Return { value: Option<NodeId> },
    /// `yield return value;`
    Yield { value: NodeId },
    /// `if (condition) then_branch else else_branch`
    If {
        condition: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
    },
    /// `while (condition) body`
    While { condition: NodeId, body: NodeId },
    /// `do body while (condition);`
    DoWhile { body: NodeId, condition: NodeId },
    Break,
    Continue,
    /// `;`
    Empty,

    // Expressions
    Literal(LiteralKind),
    /// A bare name.
    Ident(Ident),
    /// `object.name`
    Member { object: NodeId, name: Ident },
    /// `callee(args)`
    Call { callee: NodeId, args: Vec<NodeId> },
    /// `new T(args)`
    New { ty: TypeExpr, args: Vec<NodeId> },
    /// `cast<T>(expr)`
    Cast { ty: TypeExpr, expr: NodeId },
    /// `target op value`
    Assign {
        op: AssignOp,
        target: NodeId,
        value: NodeId,
    },
    Binary {
        op: BinaryOp,
        lhs: NodeId,
        rhs: NodeId,
    },
    Unary { op: UnaryOp, operand: NodeId },
    /// `(inner)`
    Paren { inner: NodeId },
}

impl NodeKind {
    /// Visit child node ids in source order.
    pub fn for_each_child(&self, mut f: impl FnMut(NodeId)) {
        use NodeKind::*;
        match self {
            CompilationUnit { items } => items.iter().copied().for_each(f),
            Class { members, .. } => members.iter().copied().for_each(f),
            Field { init, .. } => init.iter().copied().for_each(f),
            Function { body, .. } => f(*body),
            Block { stmts } => stmts.iter().copied().for_each(f),
            ExprStmt { expr } => f(*expr),
            LocalDecl { vars, .. } => vars.iter().filter_map(|v| v.init).for_each(f),
            Return { value } => value.iter().copied().for_each(f),
            Yield { value } => f(*value),
            If {
                condition,
                then_branch,
                else_branch,
            } => {
                f(*condition);
                f(*then_branch);
                else_branch.iter().copied().for_each(f);
            }
            While { condition, body } => {
                f(*condition);
                f(*body);
            }
            DoWhile { body, condition } => {
                f(*body);
                f(*condition);
            }
            Member { object, .. } => f(*object),
            Call { callee, args } => {
                f(*callee);
                args.iter().copied().for_each(f);
            }
            New { args, .. } => args.iter().copied().for_each(f),
            Cast { expr, .. } => f(*expr),
            Assign { target, value, .. } => {
                f(*target);
                f(*value);
            }
            Binary { lhs, rhs, .. } => {
                f(*lhs);
                f(*rhs);
            }
            Unary { operand, .. } => f(*operand),
            Paren { inner } => f(*inner),
            Property { .. } | Break | Continue | Empty | Literal(_) | Ident(_) => {}
        }
    }

    /// Visit mutable child slots in source order.
    pub fn for_each_child_mut(&mut self, mut f: impl FnMut(&mut NodeId)) {
        use NodeKind::*;
        match self {
            CompilationUnit { items } => items.iter_mut().for_each(f),
            Class { members, .. } => members.iter_mut().for_each(f),
            Field { init, .. } => init.iter_mut().for_each(f),
            Function { body, .. } => f(body),
            Block { stmts } => stmts.iter_mut().for_each(f),
            ExprStmt { expr } => f(expr),
            LocalDecl { vars, .. } => vars.iter_mut().filter_map(|v| v.init.as_mut()).for_each(f),
            Return { value } => value.iter_mut().for_each(f),
            Yield { value } => f(value),
            If {
                condition,
                then_branch,
                else_branch,
            } => {
                f(condition);
                f(then_branch);
                else_branch.iter_mut().for_each(f);
            }
            While { condition, body } => {
                f(condition);
                f(body);
            }
            DoWhile { body, condition } => {
                f(body);
                f(condition);
            }
            Member { object, .. } => f(object),
            Call { callee, args } => {
                f(callee);
                args.iter_mut().for_each(f);
            }
            New { args, .. } => args.iter_mut().for_each(f),
            Cast { expr, .. } => f(expr),
            Assign { target, value, .. } => {
                f(target);
                f(value);
            }
            Binary { lhs, rhs, .. } => {
                f(lhs);
                f(rhs);
            }
            Unary { operand, .. } => f(operand),
            Paren { inner } => f(inner),
            Property { .. } | Break | Continue | Empty | Literal(_) | Ident(_) => {}
        }
    }

    pub fn is_statement(&self) -> bool {
        use NodeKind::*;
        matches!(
            self,
            Block { .. }
                | ExprStmt { .. }
                | LocalDecl { .. }
                | Return { .. }
                | Yield { .. }
                | If { .. }
                | While { .. }
                | DoWhile { .. }
                | Break
                | Continue
                | Empty
        )
    }

    pub fn is_expression(&self) -> bool {
        use NodeKind::*;
        matches!(
            self,
            Literal(_)
                | Ident(_)
                | Member { .. }
                | Call { .. }
                | New { .. }
                | Cast { .. }
                | Assign { .. }
                | Binary { .. }
                | Unary { .. }
                | Paren { .. }
        )
    }

    /// Whether this node holds a statement list that statements can be
    /// spliced into: a block, or the top level of a compilation unit.
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            NodeKind::Block { .. } | NodeKind::CompilationUnit { .. }
        )
    }

    /// Short name used in logs and debug output.
    pub fn name(&self) -> &'static str {
        use NodeKind::*;
        match self {
            CompilationUnit { .. } => "compilation unit",
            Class { .. } => "class",
            Field { .. } => "field",
            Property { .. } => "property",
            Function { .. } => "function",
            Block { .. } => "block",
            ExprStmt { .. } => "expression statement",
            LocalDecl { .. } => "local declaration",
            Return { .. } => "return",
            Yield { .. } => "yield return",
            If { .. } => "if",
            While { .. } => "while",
            DoWhile { .. } => "do-while",
            Break => "break",
            Continue => "continue",
            Empty => "empty statement",
            Literal(_) => "literal",
            Ident(_) => "identifier",
            Member { .. } => "member access",
            Call { .. } => "call",
            New { .. } => "object creation",
            Cast { .. } => "cast",
            Assign { .. } => "assignment",
            Binary { .. } => "binary expression",
            Unary { .. } => "unary expression",
            Paren { .. } => "parenthesized expression",
        }
    }
}

/// A node: its kind, location and parent link.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    pub kind: NodeKind,
    pub span: Span,
    parent: Option<NodeId>,
}

impl NodeData {
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

// ============================================================================
// SyntaxTree
// ============================================================================

/// An index arena of nodes with a distinguished root.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Default for SyntaxTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxTree {
    /// A tree holding an empty compilation unit.
    pub fn new() -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        tree.root = tree.alloc(NodeKind::CompilationUnit { items: Vec::new() }, Span::default());
        tree
    }

    /// A tree with no nodes yet. The caller must allocate a root and pass
    /// it to [`set_root`](Self::set_root).
    pub(crate) fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            root: NodeId(0),
        }
    }

    /// Add a node and adopt its children. Returns the new node's id.
    ///
    /// The node itself starts out without a parent.
    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        kind.for_each_child(|child| self.nodes[child.index()].parent = Some(id));
        self.nodes.push(NodeData {
            kind,
            span,
            parent: None,
        });
        id
    }

    /// Make `root` the root of the tree.
    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes in the arena, attached or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    #[inline]
    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// Child ids in source order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let mut children = Vec::new();
        self.kind(id).for_each_child(|c| children.push(c));
        children
    }

    #[inline]
    pub fn is_statement(&self, id: NodeId) -> bool {
        self.kind(id).is_statement()
    }

    #[inline]
    pub fn is_expression(&self, id: NodeId) -> bool {
        self.kind(id).is_expression()
    }

    #[inline]
    pub fn is_block(&self, id: NodeId) -> bool {
        self.kind(id).is_block()
    }

    /// Whether the node is reachable from the root through parent links.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// The innermost attached node whose span contains `offset`.
    ///
    /// Nodes without a source span (synthesized by a fix) are never
    /// returned. `None` if not even the root covers the offset.
    pub fn node_at(&self, offset: u32) -> Option<NodeId> {
        let mut current = self.root;
        if !self.span(current).contains(offset) {
            return None;
        }
        'descend: loop {
            let mut found = None;
            self.kind(current).for_each_child(|child| {
                if found.is_none() && self.span(child).contains(offset) {
                    found = Some(child);
                }
            });
            match found {
                Some(child) => {
                    current = child;
                    continue 'descend;
                }
                None => return Some(current),
            }
        }
    }

    /// The nearest function declaration enclosing `id`, if any.
    pub fn enclosing_function(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if matches!(self.kind(node), NodeKind::Function { .. }) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// The nearest class declaration enclosing `id`, if any.
    pub fn enclosing_class(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if matches!(self.kind(node), NodeKind::Class { .. }) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    // ========================================================================
    // Edits
    // ========================================================================

    /// Put `new` in the slot of `parent` that holds `old`.
    ///
    /// `old` is left detached; `new` is adopted by `parent`.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        old: NodeId,
        new: NodeId,
    ) -> Result<(), TreeError> {
        let mut found = false;
        self.nodes[parent.index()].kind.for_each_child_mut(|slot| {
            if !found && *slot == old {
                *slot = new;
                found = true;
            }
        });
        if !found {
            return Err(TreeError::SlotNotFound {
                parent: parent.raw(),
                child: old.raw(),
            });
        }
        self.nodes[old.index()].parent = None;
        self.nodes[new.index()].parent = Some(parent);
        Ok(())
    }

    /// Replace `old` in the statement list of the block-shaped `parent` by
    /// `replacement`, in order. Siblings before and after keep their order.
    pub fn splice_statements(
        &mut self,
        parent: NodeId,
        old: NodeId,
        replacement: &[NodeId],
    ) -> Result<(), TreeError> {
        let list = match &mut self.nodes[parent.index()].kind {
            NodeKind::Block { stmts } => stmts,
            NodeKind::CompilationUnit { items } => items,
            _ => {
                return Err(TreeError::SlotNotFound {
                    parent: parent.raw(),
                    child: old.raw(),
                });
            }
        };
        let Some(position) = list.iter().position(|&s| s == old) else {
            return Err(TreeError::SlotNotFound {
                parent: parent.raw(),
                child: old.raw(),
            });
        };
        list.splice(position..=position, replacement.iter().copied());

        self.nodes[old.index()].parent = None;
        for &node in replacement {
            self.nodes[node.index()].parent = Some(parent);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(offset: u32, len: u32) -> Span {
        Span::new(offset, len, 1, offset + 1)
    }

    /// `{ a = b; }` built by hand.
    fn small_tree() -> (SyntaxTree, NodeId, NodeId, NodeId) {
        let mut tree = SyntaxTree::new();
        let a = tree.alloc(NodeKind::Ident(Ident::new("a", span(2, 1))), span(2, 1));
        let b = tree.alloc(NodeKind::Ident(Ident::new("b", span(6, 1))), span(6, 1));
        let assign = tree.alloc(
            NodeKind::Assign {
                op: AssignOp::Assign,
                target: a,
                value: b,
            },
            span(2, 5),
        );
        let stmt = tree.alloc(NodeKind::ExprStmt { expr: assign }, span(2, 6));
        let block = tree.alloc(NodeKind::Block { stmts: vec![stmt] }, span(0, 10));
        let unit = tree.alloc(NodeKind::CompilationUnit { items: vec![block] }, span(0, 10));
        tree.set_root(unit);
        (tree, block, stmt, b)
    }

    #[test]
    fn alloc_sets_parent_links() {
        let (tree, block, stmt, b) = small_tree();
        assert_eq!(tree.parent(stmt), Some(block));
        assert_eq!(tree.parent(tree.parent(b).unwrap()), Some(stmt));
        assert_eq!(tree.parent(tree.root()), None);
    }

    #[test]
    fn node_at_finds_innermost() {
        let (tree, block, stmt, b) = small_tree();
        assert_eq!(tree.node_at(6), Some(b));
        assert_eq!(tree.node_at(7), Some(stmt));
        assert_eq!(tree.node_at(9), Some(block));
        assert_eq!(tree.node_at(100), None);
    }

    #[test]
    fn splice_replaces_in_order() {
        let (mut tree, block, stmt, _) = small_tree();
        let first = tree.alloc(NodeKind::Break, Span::default());
        let second = tree.alloc(NodeKind::Continue, Span::default());
        tree.splice_statements(block, stmt, &[first, second]).unwrap();

        assert_eq!(tree.children(block), vec![first, second]);
        assert!(!tree.is_attached(stmt));
        assert!(tree.is_attached(first));
        assert_eq!(tree.parent(second), Some(block));
    }

    #[test]
    fn replace_child_swaps_slot() {
        let (mut tree, block, stmt, _) = small_tree();
        let empty = tree.alloc(NodeKind::Empty, Span::default());
        tree.replace_child(block, stmt, empty).unwrap();
        assert_eq!(tree.children(block), vec![empty]);
        assert!(!tree.is_attached(stmt));
    }

    #[test]
    fn replace_child_reports_missing_slot() {
        let (mut tree, block, _, b) = small_tree();
        let empty = tree.alloc(NodeKind::Empty, Span::default());
        let err = tree.replace_child(block, b, empty).unwrap_err();
        assert_eq!(
            err,
            TreeError::SlotNotFound {
                parent: block.raw(),
                child: b.raw()
            }
        );
    }

    #[test]
    fn classification() {
        let (tree, block, stmt, b) = small_tree();
        assert!(tree.is_block(block));
        assert!(tree.is_block(tree.root()));
        assert!(tree.is_statement(stmt));
        assert!(!tree.is_statement(b));
        assert!(tree.is_expression(b));
    }

    #[test]
    fn type_expr_round_trips_through_data_type() {
        let ty = TypeExpr {
            name: "List".into(),
            args: vec![TypeExpr::named("int", Span::default())],
            array_rank: 1,
            span: Span::default(),
        };
        let data = ty.to_data_type();
        assert_eq!(data.to_string(), "List<int>[]");
        assert_eq!(TypeExpr::from_data_type(&data).to_string(), "List<int>[]");
    }

    #[test]
    fn binary_precedence_order() {
        assert!(BinaryOp::Mul.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::Lt.is_boolean());
        assert!(!BinaryOp::Sub.is_boolean());
    }
}
