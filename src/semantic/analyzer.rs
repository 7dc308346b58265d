//! Built-in semantic analysis over a parsed tree.
//!
//! Construction runs two passes:
//! 1. Declarations: classes (with their fields, properties and methods) and
//!    free functions are collected into name tables.
//! 2. Binding: every function body and the top-level statements are walked
//!    with a [`LocalScope`], and each identifier that names a local or
//!    parameter is bound to its declaration.
//!
//! Types are computed on demand from those tables.

use convfix_core::{DataType, SemanticError, primitives};
use convfix_syntax::{
    BinaryOp, LiteralKind, NodeId, NodeKind, SyntaxTree, TypeExpr, UnaryOp,
};
use rustc_hash::FxHashMap;

use super::scope::{Binding, LocalScope};
use super::{SemanticModel, SymbolKind, TypeInfo};

/// Generic library types accepted in type positions.
const LIBRARY_GENERICS: [&str; 3] = ["IEnumerable", "IEnumerator", "List"];

/// Built-in scalar types accepted in type positions.
const BUILTIN_TYPES: [&str; 7] = [
    primitives::VOID,
    primitives::BOOL,
    primitives::INT,
    primitives::LONG,
    primitives::FLOAT,
    primitives::DOUBLE,
    primitives::STRING,
];

/// A member of a class.
#[derive(Debug, Clone, Copy)]
struct MemberInfo {
    kind: SymbolKind,
    node: NodeId,
}

#[derive(Debug, Default)]
struct ClassInfo {
    members: FxHashMap<String, MemberInfo>,
}

/// [`SemanticModel`] implementation for one tree.
#[derive(Debug)]
pub struct SemanticAnalyzer<'t> {
    tree: &'t SyntaxTree,
    classes: FxHashMap<String, ClassInfo>,
    functions: FxHashMap<String, NodeId>,
    bindings: FxHashMap<NodeId, Binding>,
    errors: Vec<SemanticError>,
}

impl<'t> SemanticAnalyzer<'t> {
    /// Analyze `tree`. Problems found while binding (such as redeclared
    /// locals) are kept in [`errors`](Self::errors) and do not stop the
    /// analysis.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn new(tree: &'t SyntaxTree) -> Self {
        let mut analyzer = Self {
            tree,
            classes: FxHashMap::default(),
            functions: FxHashMap::default(),
            bindings: FxHashMap::default(),
            errors: Vec::new(),
        };
        analyzer.collect_declarations();
        analyzer.bind();
        analyzer
    }

    pub fn tree(&self) -> &'t SyntaxTree {
        self.tree
    }

    pub fn errors(&self) -> &[SemanticError] {
        &self.errors
    }

    /// The declaration a local or parameter reference is bound to.
    pub fn binding(&self, ident: NodeId) -> Option<Binding> {
        self.bindings.get(&ident).copied()
    }

    // ========================================================================
    // Pass 1: declarations
    // ========================================================================

    fn collect_declarations(&mut self) {
        let tree = self.tree;
        for item in tree.children(tree.root()) {
            match tree.kind(item) {
                NodeKind::Class { name, members } => {
                    let mut info = ClassInfo::default();
                    for &member in members {
                        let (member_name, kind) = match tree.kind(member) {
                            NodeKind::Field { name, .. } => (name, SymbolKind::Field),
                            NodeKind::Property { name, .. } => (name, SymbolKind::Property),
                            NodeKind::Function { name, .. } => (name, SymbolKind::Method),
                            _ => continue,
                        };
                        info.members.insert(
                            member_name.name.clone(),
                            MemberInfo { kind, node: member },
                        );
                    }
                    self.classes.insert(name.name.clone(), info);
                }
                NodeKind::Function { name, .. } => {
                    self.functions.insert(name.name.clone(), item);
                }
                _ => {}
            }
        }
    }

    // ========================================================================
    // Pass 2: binding
    // ========================================================================

    fn bind(&mut self) {
        let tree = self.tree;
        let mut top_level = LocalScope::new();
        for item in tree.children(tree.root()) {
            match tree.kind(item) {
                NodeKind::Class { members, .. } => {
                    for &member in members {
                        match tree.kind(member) {
                            NodeKind::Function { .. } => self.bind_function(member),
                            NodeKind::Field {
                                init: Some(init), ..
                            } => self.bind_expr(*init, &mut LocalScope::new()),
                            _ => {}
                        }
                    }
                }
                NodeKind::Function { .. } => self.bind_function(item),
                _ => self.bind_stmt(item, &mut top_level),
            }
        }
    }

    fn bind_function(&mut self, function: NodeId) {
        let tree = self.tree;
        let NodeKind::Function { params, body, .. } = tree.kind(function) else {
            return;
        };
        let mut scope = LocalScope::new();
        for (index, param) in params.iter().enumerate() {
            let binding = Binding::Parameter { function, index };
            if let Err(error) = scope.declare(&param.name.name, binding, param.name.span) {
                self.errors.push(error);
            }
        }
        self.bind_stmt(*body, &mut scope);
    }

    fn bind_stmt(&mut self, stmt: NodeId, scope: &mut LocalScope) {
        let tree = self.tree;
        match tree.kind(stmt) {
            NodeKind::Block { stmts } => {
                scope.push_scope();
                for &s in stmts {
                    self.bind_stmt(s, scope);
                }
                scope.pop_scope();
            }
            NodeKind::LocalDecl { vars, .. } => {
                for (index, var) in vars.iter().enumerate() {
                    if let Some(init) = var.init {
                        self.bind_expr(init, scope);
                    }
                    let binding = Binding::Local { decl: stmt, index };
                    if let Err(error) = scope.declare(&var.name.name, binding, var.name.span) {
                        self.errors.push(error);
                    }
                }
            }
            NodeKind::ExprStmt { expr } | NodeKind::Yield { value: expr } => {
                self.bind_expr(*expr, scope)
            }
            NodeKind::Return { value } => {
                if let Some(value) = value {
                    self.bind_expr(*value, scope);
                }
            }
            NodeKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.bind_expr(*condition, scope);
                self.bind_nested(*then_branch, scope);
                if let Some(else_branch) = else_branch {
                    self.bind_nested(*else_branch, scope);
                }
            }
            NodeKind::While { condition, body } | NodeKind::DoWhile { body, condition } => {
                self.bind_expr(*condition, scope);
                self.bind_nested(*body, scope);
            }
            _ => {}
        }
    }

    /// The body of a control construct gets its own scope even when it is
    /// not a block.
    fn bind_nested(&mut self, stmt: NodeId, scope: &mut LocalScope) {
        scope.push_scope();
        self.bind_stmt(stmt, scope);
        scope.pop_scope();
    }

    fn bind_expr(&mut self, expr: NodeId, scope: &mut LocalScope) {
        let tree = self.tree;
        match tree.kind(expr) {
            NodeKind::Ident(ident) => {
                if let Some(var) = scope.get(&ident.name) {
                    self.bindings.insert(expr, var.binding);
                }
            }
            kind => kind.for_each_child(|child| self.bind_expr(child, scope)),
        }
    }

    // ========================================================================
    // Types
    // ========================================================================

    /// Resolve a written type, checking that every name in it exists.
    pub fn resolve_type(&self, ty: &TypeExpr) -> Result<DataType, SemanticError> {
        let known = if ty.args.is_empty() {
            BUILTIN_TYPES.contains(&ty.name.as_str()) || self.classes.contains_key(&ty.name)
        } else {
            LIBRARY_GENERICS.contains(&ty.name.as_str())
        };
        if !known {
            return Err(SemanticError::UnknownType {
                name: ty.to_string(),
                span: ty.span,
            });
        }
        for arg in &ty.args {
            self.resolve_type(arg)?;
        }
        Ok(ty.to_data_type())
    }

    /// The expression's own type.
    pub fn type_of(&self, expr: NodeId) -> Result<DataType, SemanticError> {
        let tree = self.tree;
        let span = tree.span(expr);
        match tree.kind(expr) {
            NodeKind::Literal(literal) => Ok(match literal {
                LiteralKind::Int(_) => DataType::int(),
                LiteralKind::Long(_) => DataType::long(),
                LiteralKind::Float(_) => DataType::float(),
                LiteralKind::Double(_) => DataType::double(),
                LiteralKind::String(_) => DataType::string(),
                LiteralKind::Bool(_) => DataType::bool(),
                LiteralKind::Null => DataType::null_literal(),
            }),
            NodeKind::Ident(ident) => self.type_of_ident(expr, &ident.name),
            NodeKind::Member { object, name } => {
                let object_ty = self.type_of(*object)?;
                self.member_type(&object_ty, &name.name, name.span)
            }
            NodeKind::Call { .. } => {
                let function = self.resolve_callee(expr)?;
                match tree.kind(function) {
                    NodeKind::Function { return_type, .. } => self.resolve_type(return_type),
                    _ => Err(SemanticError::NotAnExpression { span }),
                }
            }
            NodeKind::New { ty, .. } | NodeKind::Cast { ty, .. } => self.resolve_type(ty),
            NodeKind::Assign { target, .. } => self.type_of(*target),
            NodeKind::Binary { op, lhs, rhs } => {
                let lhs = self.type_of(*lhs)?;
                let rhs = self.type_of(*rhs)?;
                Ok(binary_result(*op, lhs, rhs))
            }
            NodeKind::Unary { op, operand } => match op {
                UnaryOp::Not => Ok(DataType::bool()),
                UnaryOp::Neg => self.type_of(*operand),
            },
            NodeKind::Paren { inner } => self.type_of(*inner),
            _ => Err(SemanticError::NotAnExpression { span }),
        }
    }

    fn type_of_ident(&self, expr: NodeId, name: &str) -> Result<DataType, SemanticError> {
        let tree = self.tree;
        let span = tree.span(expr);

        if let Some(binding) = self.binding(expr) {
            return self.binding_type(binding);
        }
        if let Some(member) = self.enclosing_member(expr, name) {
            return match tree.kind(member.node) {
                NodeKind::Field { ty, .. } | NodeKind::Property { ty, .. } => {
                    self.resolve_type(ty)
                }
                _ => Err(SemanticError::NotAnExpression { span }),
            };
        }
        if self.functions.contains_key(name) {
            return Err(SemanticError::NotAnExpression { span });
        }
        if self.classes.contains_key(name) {
            return Ok(DataType::named(name));
        }
        Err(SemanticError::UnresolvedName {
            name: name.to_string(),
            span,
        })
    }

    fn binding_type(&self, binding: Binding) -> Result<DataType, SemanticError> {
        let tree = self.tree;
        match binding {
            Binding::Local { decl, index } => {
                let NodeKind::LocalDecl { ty, vars } = tree.kind(decl) else {
                    return Err(SemanticError::NotAnExpression {
                        span: tree.span(decl),
                    });
                };
                if !ty.is_var() {
                    return self.resolve_type(ty);
                }
                match vars.get(index).and_then(|v| v.init) {
                    Some(init) => self.type_of(init),
                    None => Err(SemanticError::UnknownType {
                        name: ty.name.clone(),
                        span: ty.span,
                    }),
                }
            }
            Binding::Parameter { function, index } => match tree.kind(function) {
                NodeKind::Function { params, .. } if index < params.len() => {
                    self.resolve_type(&params[index].ty)
                }
                _ => Err(SemanticError::NotAnExpression {
                    span: tree.span(function),
                }),
            },
        }
    }

    /// Type of `object.name` where `object` has type `ty`.
    fn member_type(
        &self,
        ty: &DataType,
        name: &str,
        span: convfix_core::Span,
    ) -> Result<DataType, SemanticError> {
        if let Some(member) = self.class_member(ty, name) {
            return match self.tree.kind(member.node) {
                NodeKind::Field { ty, .. } | NodeKind::Property { ty, .. } => {
                    self.resolve_type(ty)
                }
                _ => Err(SemanticError::NotAnExpression { span }),
            };
        }
        if builtin_length_property(ty, name) {
            return Ok(DataType::int());
        }
        Err(SemanticError::UnknownMember {
            ty: ty.to_string(),
            member: name.to_string(),
            span,
        })
    }

    fn class_member(&self, ty: &DataType, name: &str) -> Option<MemberInfo> {
        if ty.is_array() || !ty.type_args().is_empty() {
            return None;
        }
        self.classes
            .get(ty.name())
            .and_then(|class| class.members.get(name))
            .copied()
    }

    /// A member of the class enclosing `node`, looked up by name.
    fn enclosing_member(&self, node: NodeId, name: &str) -> Option<MemberInfo> {
        let class = self.tree.enclosing_class(node)?;
        let NodeKind::Class { name: class_name, .. } = self.tree.kind(class) else {
            return None;
        };
        self.classes
            .get(&class_name.name)
            .and_then(|info| info.members.get(name))
            .copied()
    }

    /// The function or method declaration a call invokes.
    fn resolve_callee(&self, call: NodeId) -> Result<NodeId, SemanticError> {
        let tree = self.tree;
        let NodeKind::Call { callee, .. } = tree.kind(call) else {
            return Err(SemanticError::NotAnExpression {
                span: tree.span(call),
            });
        };
        match tree.kind(*callee) {
            NodeKind::Ident(ident) => {
                if let Some(member) = self.enclosing_member(*callee, &ident.name)
                    && member.kind == SymbolKind::Method
                {
                    return Ok(member.node);
                }
                self.functions
                    .get(&ident.name)
                    .copied()
                    .ok_or_else(|| SemanticError::UnresolvedName {
                        name: ident.name.clone(),
                        span: ident.span,
                    })
            }
            NodeKind::Member { object, name } => {
                let object_ty = self.type_of(*object)?;
                match self.class_member(&object_ty, &name.name) {
                    Some(member) if member.kind == SymbolKind::Method => Ok(member.node),
                    _ => Err(SemanticError::UnknownMember {
                        ty: object_ty.to_string(),
                        member: name.name.clone(),
                        span: name.span,
                    }),
                }
            }
            _ => Err(SemanticError::NotAnExpression {
                span: tree.span(*callee),
            }),
        }
    }

    // ========================================================================
    // Converted types
    // ========================================================================

    /// The type the context of `expr` expects, or `None` when the context
    /// imposes no type.
    fn expected_type(&self, expr: NodeId) -> Result<Option<DataType>, SemanticError> {
        let tree = self.tree;
        let Some(parent) = tree.parent(expr) else {
            return Ok(None);
        };

        match tree.kind(parent) {
            NodeKind::LocalDecl { ty, .. } => {
                if ty.is_var() {
                    Ok(None)
                } else {
                    self.resolve_type(ty).map(Some)
                }
            }
            NodeKind::Field { ty, .. } => self.resolve_type(ty).map(Some),
            NodeKind::Return { .. } => {
                let return_type = self.enclosing_return_type(parent)?;
                Ok(Some(return_type))
            }
            NodeKind::Yield { .. } => {
                let return_type = self.enclosing_return_type(parent)?;
                match return_type.element_type() {
                    Some(element) => Ok(Some(element)),
                    None => Err(SemanticError::NotASequence {
                        found: return_type.to_string(),
                        span: tree.span(parent),
                    }),
                }
            }
            NodeKind::Assign { target, value, .. } if *value == expr => {
                self.type_of(*target).map(Some)
            }
            NodeKind::Call { args, .. } => {
                let Some(index) = args.iter().position(|&a| a == expr) else {
                    return Ok(None);
                };
                let function = self.resolve_callee(parent)?;
                match tree.kind(function) {
                    NodeKind::Function { params, .. } => match params.get(index) {
                        Some(param) => self.resolve_type(&param.ty).map(Some),
                        None => Ok(None),
                    },
                    _ => Ok(None),
                }
            }
            _ => Ok(None),
        }
    }

    fn enclosing_return_type(&self, stmt: NodeId) -> Result<DataType, SemanticError> {
        let tree = self.tree;
        let function = tree
            .enclosing_function(stmt)
            .ok_or(SemanticError::NoEnclosingFunction {
                span: tree.span(stmt),
            })?;
        match tree.kind(function) {
            NodeKind::Function { return_type, .. } => self.resolve_type(return_type),
            _ => Err(SemanticError::NoEnclosingFunction {
                span: tree.span(stmt),
            }),
        }
    }
}

impl SemanticModel for SemanticAnalyzer<'_> {
    fn type_info(&self, expr: NodeId) -> Result<TypeInfo, SemanticError> {
        let ty = self.type_of(expr)?;
        let converted = self.expected_type(expr)?.unwrap_or_else(|| ty.clone());
        Ok(TypeInfo { ty, converted })
    }

    fn symbol_kind(&self, expr: NodeId) -> Option<SymbolKind> {
        let tree = self.tree;
        match tree.kind(expr) {
            NodeKind::Ident(ident) => {
                if let Some(binding) = self.binding(expr) {
                    return Some(match binding {
                        Binding::Local { .. } => SymbolKind::Local,
                        Binding::Parameter { .. } => SymbolKind::Parameter,
                    });
                }
                if let Some(member) = self.enclosing_member(expr, &ident.name) {
                    return Some(member.kind);
                }
                if self.functions.contains_key(&ident.name) {
                    return Some(SymbolKind::Function);
                }
                if self.classes.contains_key(&ident.name) {
                    return Some(SymbolKind::Class);
                }
                None
            }
            NodeKind::Member { object, name } => {
                let object_ty = self.type_of(*object).ok()?;
                if let Some(member) = self.class_member(&object_ty, &name.name) {
                    return Some(member.kind);
                }
                builtin_length_property(&object_ty, &name.name).then_some(SymbolKind::Property)
            }
            _ => None,
        }
    }
}

/// Result type of a binary operator.
fn binary_result(op: BinaryOp, lhs: DataType, rhs: DataType) -> DataType {
    if op.is_boolean() {
        return DataType::bool();
    }
    if op == BinaryOp::Add && (lhs.name() == primitives::STRING || rhs.name() == primitives::STRING)
    {
        return DataType::string();
    }
    lhs.promote(&rhs).unwrap_or(lhs)
}

/// `Length` on arrays and strings, `Count` on lists.
fn builtin_length_property(ty: &DataType, name: &str) -> bool {
    match name {
        "Length" => ty.is_array() || ty.name() == primitives::STRING,
        "Count" => !ty.is_array() && ty.name() == "List",
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convfix_syntax::Parser;

    /// Find the first node of a given kind name whose printed form matches.
    fn find(tree: &SyntaxTree, source: &str, needle: &str, kind: &str) -> NodeId {
        let offset = source.find(needle).expect("needle in source") as u32;
        let mut node = tree.node_at(offset).expect("node at offset");
        while tree.kind(node).name() != kind {
            node = tree.parent(node).expect("matching ancestor");
        }
        node
    }

    const SOURCE: &str = r#"
class Order {
    long total;
    int Count { get; set; }
    string label() { return "order"; }
    void add(long amount) { total = total + amount; }
}

IEnumerable<int> counts(Order order) {
    yield return order.Count;
}

int narrow(long big) {
    var copy = big;
    int small = 0;
    {
        double small = 1.5;
        small = copy;
    }
    small = order_total(new Order());
    return copy;
}

long order_total(Order order) {
    return cast<long>(order.Count) * 2L;
}
"#;

    fn analyzer(tree: &SyntaxTree) -> SemanticAnalyzer<'_> {
        SemanticAnalyzer::new(tree)
    }

    #[test]
    fn literal_types() {
        let tree = Parser::parse("var a = 1L; var b = 1.5f; var c = \"s\"; var d = null;").unwrap();
        let model = analyzer(&tree);
        let kinds: Vec<String> = tree
            .children(tree.root())
            .into_iter()
            .map(|decl| {
                let NodeKind::LocalDecl { vars, .. } = tree.kind(decl) else {
                    panic!("expected declaration");
                };
                model.type_of(vars[0].init.unwrap()).unwrap().to_string()
            })
            .collect();
        assert_eq!(kinds, vec!["long", "float", "string", "null"]);
    }

    #[test]
    fn return_converted_type_is_function_return_type() {
        let tree = Parser::parse(SOURCE).unwrap();
        let model = analyzer(&tree);
        let copy = find(&tree, SOURCE, "copy;\n}", "identifier");

        let info = model.type_info(copy).unwrap();
        assert_eq!(info.ty, DataType::long());
        assert_eq!(info.converted, DataType::int());
    }

    #[test]
    fn yield_converted_type_is_element_type() {
        let tree = Parser::parse(SOURCE).unwrap();
        let model = analyzer(&tree);
        let yielded = find(&tree, SOURCE, "order.Count;", "member access");

        let info = model.type_info(yielded).unwrap();
        assert_eq!(info.ty, DataType::int());
        assert_eq!(info.converted, DataType::int());
        assert_eq!(model.symbol_kind(yielded), Some(SymbolKind::Property));
    }

    #[test]
    fn shadowed_local_resolves_to_inner_declaration() {
        let tree = Parser::parse(SOURCE).unwrap();
        let model = analyzer(&tree);
        let assign = find(&tree, SOURCE, "small = copy", "assignment");
        let NodeKind::Assign { target, value, .. } = tree.kind(assign) else {
            panic!("expected assignment");
        };

        assert_eq!(model.type_of(*target).unwrap(), DataType::double());
        assert_eq!(model.symbol_kind(*target), Some(SymbolKind::Local));
        let info = model.type_info(*value).unwrap();
        assert_eq!(info.ty, DataType::long());
        assert_eq!(info.converted, DataType::double());
    }

    #[test]
    fn call_types_and_argument_conversion() {
        let tree = Parser::parse(SOURCE).unwrap();
        let model = analyzer(&tree);
        let call = find(&tree, SOURCE, "order_total(new", "call");
        assert_eq!(model.type_of(call).unwrap(), DataType::long());

        let NodeKind::Call { args, .. } = tree.kind(call) else {
            panic!("expected call");
        };
        let info = model.type_info(args[0]).unwrap();
        assert_eq!(info.ty, DataType::named("Order"));
        assert_eq!(info.converted, DataType::named("Order"));

        let outer = find(&tree, SOURCE, "small = order_total", "assignment");
        let NodeKind::Assign { value, .. } = tree.kind(outer) else {
            panic!("expected assignment");
        };
        assert_eq!(model.type_info(*value).unwrap().converted, DataType::int());
    }

    #[test]
    fn members_resolve_inside_class() {
        let tree = Parser::parse(SOURCE).unwrap();
        let model = analyzer(&tree);
        let assign = find(&tree, SOURCE, "total = total + amount", "assignment");
        let NodeKind::Assign { target, value, .. } = tree.kind(assign) else {
            panic!("expected assignment");
        };
        assert_eq!(model.symbol_kind(*target), Some(SymbolKind::Field));
        assert_eq!(model.type_of(*value).unwrap(), DataType::long());
    }

    #[test]
    fn binary_promotion() {
        let tree = Parser::parse(SOURCE).unwrap();
        let model = analyzer(&tree);
        let product = find(&tree, SOURCE, "cast<long>(order.Count) * 2L", "binary expression");
        assert_eq!(model.type_of(product).unwrap(), DataType::long());
    }

    #[test]
    fn unresolved_name_is_an_error() {
        let tree = Parser::parse("int x = missing;").unwrap();
        let model = analyzer(&tree);
        let NodeKind::LocalDecl { vars, .. } = tree.kind(tree.children(tree.root())[0]) else {
            panic!("expected declaration");
        };
        let err = model.type_info(vars[0].init.unwrap()).unwrap_err();
        assert!(matches!(err, SemanticError::UnresolvedName { ref name, .. } if name == "missing"));
        assert_eq!(model.symbol_kind(vars[0].init.unwrap()), None);
    }

    #[test]
    fn use_before_declaration_does_not_bind() {
        let tree = Parser::parse("int y = x; long x = 1L;").unwrap();
        let model = analyzer(&tree);
        let NodeKind::LocalDecl { vars, .. } = tree.kind(tree.children(tree.root())[0]) else {
            panic!("expected declaration");
        };
        assert!(model.binding(vars[0].init.unwrap()).is_none());
    }

    #[test]
    fn unknown_declared_type() {
        let tree = Parser::parse("long v = 1L; Widget w = v;").unwrap();
        let model = analyzer(&tree);
        let NodeKind::LocalDecl { vars, .. } = tree.kind(tree.children(tree.root())[1]) else {
            panic!("expected declaration");
        };
        let err = model.type_info(vars[0].init.unwrap()).unwrap_err();
        assert!(matches!(err, SemanticError::UnknownType { ref name, .. } if name == "Widget"));
    }

    #[test]
    fn yield_outside_sequence_function() {
        let tree = Parser::parse("int f() { yield return 1; }").unwrap();
        let model = analyzer(&tree);
        let yielded = find(&tree, "int f() { yield return 1; }", "1;", "literal");
        let err = model.type_info(yielded).unwrap_err();
        assert!(matches!(err, SemanticError::NotASequence { ref found, .. } if found == "int"));
    }

    #[test]
    fn redeclaration_is_recorded() {
        let tree = Parser::parse("void f() { int a = 1; int a = 2; }").unwrap();
        let model = analyzer(&tree);
        assert_eq!(model.errors().len(), 1);
    }

    #[test]
    fn builtin_length() {
        let tree = Parser::parse("void f(int[] xs, List<int> ys) { int n = xs.Length + ys.Count; }")
            .unwrap();
        let model = analyzer(&tree);
        let source = "void f(int[] xs, List<int> ys) { int n = xs.Length + ys.Count; }";
        let sum = find(&tree, source, "xs.Length +", "binary expression");
        assert_eq!(model.type_of(sum).unwrap(), DataType::int());
    }
}
