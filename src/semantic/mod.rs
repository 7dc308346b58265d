//! Semantic queries used by the code fix.
//!
//! The fix pipeline only needs two questions answered about an expression:
//! what type it has (and what type its context expects), and what kind of
//! symbol a name refers to. [`SemanticModel`] is that seam; hosts with
//! their own compiler implement it directly. [`SemanticAnalyzer`] is the
//! built-in implementation over a parsed [`SyntaxTree`](convfix_syntax::SyntaxTree).

mod analyzer;
mod scope;

pub use analyzer::SemanticAnalyzer;
pub use scope::{Binding, LocalScope, LocalVar};

use convfix_core::{DataType, SemanticError};
use convfix_syntax::NodeId;

/// Type information for an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    /// The expression's own type.
    pub ty: DataType,
    /// The type the surrounding context expects after implicit conversion.
    /// Equal to `ty` where the context expects nothing in particular.
    pub converted: DataType,
}

/// What a name resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Local,
    Parameter,
    Field,
    Property,
    Method,
    Function,
    Class,
}

impl SymbolKind {
    pub fn is_property(self) -> bool {
        self == SymbolKind::Property
    }

    /// Locals, parameters and fields: storage that can be written in place.
    pub fn is_variable(self) -> bool {
        matches!(
            self,
            SymbolKind::Local | SymbolKind::Parameter | SymbolKind::Field
        )
    }
}

/// Semantic information about the nodes of one syntax tree.
pub trait SemanticModel {
    /// Type and converted type of an expression node.
    fn type_info(&self, expr: NodeId) -> Result<TypeInfo, SemanticError>;

    /// The symbol an identifier or member access refers to, if any.
    fn symbol_kind(&self, expr: NodeId) -> Option<SymbolKind>;
}
