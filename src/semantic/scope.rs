//! Local scope tracking for name binding.
//!
//! `LocalScope` records which locals and parameters are visible while the
//! binder walks a function body. It handles:
//! - Nested block scopes (block, if/while bodies)
//! - Shadowing with restoration on scope exit
//! - Redeclaration checks within one scope

use convfix_core::{SemanticError, Span};
use convfix_syntax::NodeId;
use rustc_hash::FxHashMap;

// ============================================================================
// Types
// ============================================================================

/// Where a local name was introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    /// Declarator `index` of the local declaration statement `decl`.
    Local { decl: NodeId, index: usize },
    /// Parameter `index` of `function`.
    Parameter { function: NodeId, index: usize },
}

/// A visible local variable or parameter.
#[derive(Debug, Clone)]
pub struct LocalVar {
    pub name: String,
    pub binding: Binding,
    /// Scope depth where declared
    pub depth: u32,
    /// Source location of the declaring name
    pub span: Span,
}

// ============================================================================
// LocalScope
// ============================================================================

/// Locals visible at the current point of a body walk.
#[derive(Debug, Default)]
pub struct LocalScope {
    /// Variables by name in the current scope chain
    variables: FxHashMap<String, LocalVar>,

    /// Current scope depth (0 = function scope)
    scope_depth: u32,

    /// Shadowed variables as (shadowing depth, name, old var), restored when
    /// the shadowing scope is popped
    shadowed: Vec<(u32, String, LocalVar)>,
}

impl LocalScope {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Scope Management
    // ==========================================================================

    /// Enter a nested scope.
    pub fn push_scope(&mut self) {
        self.scope_depth += 1;
    }

    /// Exit the current scope, removing variables declared in it.
    pub fn pop_scope(&mut self) {
        self.variables.retain(|_, var| var.depth < self.scope_depth);

        while let Some((shadowing_depth, _, _)) = self.shadowed.last() {
            if *shadowing_depth != self.scope_depth {
                break;
            }
            if let Some((_, name, var)) = self.shadowed.pop() {
                self.variables.insert(name, var);
            }
        }

        self.scope_depth = self.scope_depth.saturating_sub(1);
    }

    pub fn depth(&self) -> u32 {
        self.scope_depth
    }

    // ==========================================================================
    // Declaration
    // ==========================================================================

    /// Declare a name in the current scope.
    ///
    /// A name already declared at the same depth is an error and the new
    /// declaration is ignored; one from an outer scope is shadowed.
    pub fn declare(
        &mut self,
        name: &str,
        binding: Binding,
        span: Span,
    ) -> Result<(), SemanticError> {
        if let Some(existing) = self.variables.get(name) {
            if existing.depth == self.scope_depth {
                return Err(SemanticError::Redeclared {
                    name: name.to_string(),
                    span,
                });
            }
            self.shadowed
                .push((self.scope_depth, name.to_string(), existing.clone()));
        }

        self.variables.insert(
            name.to_string(),
            LocalVar {
                name: name.to_string(),
                binding,
                depth: self.scope_depth,
                span,
            },
        );
        Ok(())
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    pub fn get(&self, name: &str) -> Option<&LocalVar> {
        self.variables.get(name)
    }

    /// Check if a name is declared in the current scope (not outer scopes).
    pub fn is_declared_in_current_scope(&self, name: &str) -> bool {
        self.variables
            .get(name)
            .is_some_and(|v| v.depth == self.scope_depth)
    }
}
