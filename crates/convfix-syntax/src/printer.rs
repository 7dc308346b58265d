//! Renders a tree back to source text.
//!
//! Output is normalized (four-space indentation, one statement per line);
//! comments and original formatting are not preserved.

use std::fmt::Write;

use crate::tree::{LiteralKind, NodeId, NodeKind, SyntaxTree};

const INDENT: &str = "    ";

/// Render the whole tree.
pub fn print(tree: &SyntaxTree) -> String {
    let mut printer = Printer::new(tree);
    printer.node(tree.root());
    printer.out
}

/// Render one node and its subtree, starting at column zero.
pub fn print_node(tree: &SyntaxTree, id: NodeId) -> String {
    let mut printer = Printer::new(tree);
    printer.node(id);
    printer.out.truncate(printer.out.trim_end().len());
    printer.out
}

struct Printer<'t> {
    tree: &'t SyntaxTree,
    out: String,
    depth: usize,
}

impl<'t> Printer<'t> {
    fn new(tree: &'t SyntaxTree) -> Self {
        Self {
            tree,
            out: String::new(),
            depth: 0,
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    /// Render a declaration or statement on its own line(s), or an
    /// expression inline.
    fn node(&mut self, id: NodeId) {
        if self.tree.is_expression(id) {
            self.expr(id);
            return;
        }
        match self.tree.kind(id) {
            NodeKind::CompilationUnit { items } => {
                for &item in items {
                    self.node(item);
                }
            }
            NodeKind::Class { name, members } => {
                self.indent();
                let _ = writeln!(self.out, "class {} {{", name.name);
                self.depth += 1;
                for &member in members {
                    self.node(member);
                }
                self.depth -= 1;
                self.indent();
                self.out.push_str("}\n");
            }
            NodeKind::Field { ty, name, init } => {
                self.indent();
                let _ = write!(self.out, "{ty} {}", name.name);
                if let Some(init) = *init {
                    self.out.push_str(" = ");
                    self.expr(init);
                }
                self.out.push_str(";\n");
            }
            NodeKind::Property {
                ty,
                name,
                has_setter,
            } => {
                self.indent();
                let accessors = if *has_setter { "get; set;" } else { "get;" };
                let _ = writeln!(self.out, "{ty} {} {{ {accessors} }}", name.name);
            }
            NodeKind::Function {
                return_type,
                name,
                params,
                body,
            } => {
                self.indent();
                let _ = write!(self.out, "{return_type} {}(", name.name);
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    let _ = write!(self.out, "{} {}", param.ty, param.name.name);
                }
                self.out.push_str(") ");
                self.block_inline(*body);
                self.out.push('\n');
            }
            _ => {
                self.indent();
                self.stmt_inline(id);
                self.out.push('\n');
            }
        }
    }

    /// A statement, starting at the current position, without trailing
    /// newline.
    fn stmt_inline(&mut self, id: NodeId) {
        match self.tree.kind(id) {
            NodeKind::Block { .. } => self.block_inline(id),
            NodeKind::ExprStmt { expr } => {
                self.expr(*expr);
                self.out.push(';');
            }
            NodeKind::LocalDecl { ty, vars } => {
                let _ = write!(self.out, "{ty} ");
                for (i, var) in vars.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.out.push_str(&var.name.name);
                    if let Some(init) = var.init {
                        self.out.push_str(" = ");
                        self.expr(init);
                    }
                }
                self.out.push(';');
            }
            NodeKind::Return { value } => {
                self.out.push_str("return");
                if let Some(value) = *value {
                    self.out.push(' ');
                    self.expr(value);
                }
                self.out.push(';');
            }
            NodeKind::Yield { value } => {
                self.out.push_str("yield return ");
                self.expr(*value);
                self.out.push(';');
            }
            NodeKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let (condition, then_branch, else_branch) =
                    (*condition, *then_branch, *else_branch);
                self.out.push_str("if (");
                self.expr(condition);
                self.out.push(')');
                let braced = self.branch(then_branch);
                if let Some(else_branch) = else_branch {
                    if braced {
                        self.out.push_str(" else");
                    } else {
                        self.out.push('\n');
                        self.indent();
                        self.out.push_str("else");
                    }
                    self.branch(else_branch);
                }
            }
            NodeKind::While { condition, body } => {
                let (condition, body) = (*condition, *body);
                self.out.push_str("while (");
                self.expr(condition);
                self.out.push(')');
                self.branch(body);
            }
            NodeKind::DoWhile { body, condition } => {
                let (body, condition) = (*body, *condition);
                self.out.push_str("do");
                if self.branch(body) {
                    self.out.push(' ');
                } else {
                    self.out.push('\n');
                    self.indent();
                }
                self.out.push_str("while (");
                self.expr(condition);
                self.out.push_str(");");
            }
            NodeKind::Break => self.out.push_str("break;"),
            NodeKind::Continue => self.out.push_str("continue;"),
            NodeKind::Empty => self.out.push(';'),
            other => {
                let _ = write!(self.out, "/* {} */", other.name());
            }
        }
    }

    /// The body of `if`/`else`/`while`/`do`: braced blocks stay on the
    /// same line, anything else goes on the next line one level deeper.
    /// Returns whether the branch was a block.
    fn branch(&mut self, id: NodeId) -> bool {
        if matches!(self.tree.kind(id), NodeKind::Block { .. }) {
            self.out.push(' ');
            self.block_inline(id);
            true
        } else {
            self.out.push('\n');
            self.depth += 1;
            self.indent();
            self.stmt_inline(id);
            self.depth -= 1;
            false
        }
    }

    fn block_inline(&mut self, id: NodeId) {
        let stmts = self.tree.children(id);
        if stmts.is_empty() {
            self.out.push_str("{ }");
            return;
        }
        self.out.push_str("{\n");
        self.depth += 1;
        for stmt in stmts {
            self.node(stmt);
        }
        self.depth -= 1;
        self.indent();
        self.out.push('}');
    }

    fn expr(&mut self, id: NodeId) {
        match self.tree.kind(id) {
            NodeKind::Literal(literal) => self.literal(literal),
            NodeKind::Ident(ident) => self.out.push_str(&ident.name),
            NodeKind::Member { object, name } => {
                self.expr(*object);
                self.out.push('.');
                self.out.push_str(&name.name);
            }
            NodeKind::Call { callee, args } => {
                self.expr(*callee);
                self.args(args);
            }
            NodeKind::New { ty, args } => {
                let _ = write!(self.out, "new {ty}");
                self.args(args);
            }
            NodeKind::Cast { ty, expr } => {
                let _ = write!(self.out, "cast<{ty}>(");
                self.expr(*expr);
                self.out.push(')');
            }
            NodeKind::Assign { op, target, value } => {
                self.expr(*target);
                let _ = write!(self.out, " {} ", op.as_str());
                self.expr(*value);
            }
            NodeKind::Binary { op, lhs, rhs } => {
                self.expr(*lhs);
                let _ = write!(self.out, " {} ", op.as_str());
                self.expr(*rhs);
            }
            NodeKind::Unary { op, operand } => {
                self.out.push_str(op.as_str());
                self.expr(*operand);
            }
            NodeKind::Paren { inner } => {
                self.out.push('(');
                self.expr(*inner);
                self.out.push(')');
            }
            other => {
                let _ = write!(self.out, "/* {} */", other.name());
            }
        }
    }

    fn args(&mut self, args: &[NodeId]) {
        self.out.push('(');
        for (i, &arg) in args.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.expr(arg);
        }
        self.out.push(')');
    }

    fn literal(&mut self, literal: &LiteralKind) {
        match literal {
            LiteralKind::Int(v) => {
                let _ = write!(self.out, "{v}");
            }
            LiteralKind::Long(v) => {
                let _ = write!(self.out, "{v}L");
            }
            LiteralKind::Float(v) => {
                let _ = write!(self.out, "{v:?}f");
            }
            LiteralKind::Double(v) => {
                let _ = write!(self.out, "{v:?}");
            }
            LiteralKind::String(s) => {
                self.out.push('"');
                for c in s.chars() {
                    match c {
                        '\n' => self.out.push_str("\\n"),
                        '\t' => self.out.push_str("\\t"),
                        '\r' => self.out.push_str("\\r"),
                        '\0' => self.out.push_str("\\0"),
                        '\\' => self.out.push_str("\\\\"),
                        '"' => self.out.push_str("\\\""),
                        c => self.out.push(c),
                    }
                }
                self.out.push('"');
            }
            LiteralKind::Bool(v) => {
                let _ = write!(self.out, "{v}");
            }
            LiteralKind::Null => self.out.push_str("null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parser;

    fn reprint(source: &str) -> String {
        print(&Parser::parse(source).unwrap())
    }

    #[test]
    fn print_normalizes_layout() {
        let printed = reprint("int   f( long a ){ if(a>0) return 1; else { return 2; } }");
        assert_eq!(
            printed,
            "int f(long a) {\n    if (a > 0)\n        return 1;\n    else {\n        return 2;\n    }\n}\n"
        );
    }

    #[test]
    fn print_class() {
        let printed = reprint("class A { int X { get; } long y = 5L; }");
        assert_eq!(printed, "class A {\n    int X { get; }\n    long y = 5L;\n}\n");
    }

    #[test]
    fn print_literals() {
        let printed = reprint("x = f(2.0, 1.5f, \"a\\n\", null, !true, -3);");
        assert_eq!(printed, "x = f(2.0, 1.5f, \"a\\n\", null, !true, -3);\n");
    }

    #[test]
    fn print_is_stable_under_reparse() {
        let source = "IEnumerable<int> g(int n) {\n    while (n > 0) {\n        yield return cast<int>(n);\n        n -= 1;\n    }\n    do n = n + 1; while (n < 3);\n}\n";
        let once = reprint(source);
        assert_eq!(reprint(&once), once);
    }

    #[test]
    fn print_single_node() {
        let tree = Parser::parse("{ int a = 1; }").unwrap();
        let block = tree.children(tree.root())[0];
        assert_eq!(print_node(&tree, block), "{\n    int a = 1;\n}");
    }
}
