//! Finding the statement a diagnostic belongs to.

use convfix_syntax::{NodeId, SyntaxTree};

use crate::statement::ConvertibleStatement;

/// The nearest convertible statement at or above the node covering
/// `offset`.
///
/// `None` when nothing covers the offset or no ancestor up to the root has
/// a convertible shape. That is "no applicable fix", not an error.
pub fn locate(tree: &SyntaxTree, offset: u32) -> Option<ConvertibleStatement> {
    let start = tree.node_at(offset)?;
    locate_from(tree, start)
}

/// Walk from `node` up through its ancestors and return the first one
/// that classifies as a convertible statement.
pub fn locate_from(tree: &SyntaxTree, node: NodeId) -> Option<ConvertibleStatement> {
    let mut current = Some(node);
    while let Some(id) = current {
        if let Some(statement) = ConvertibleStatement::classify(tree, id) {
            return Some(statement);
        }
        current = tree.parent(id);
    }
    None
}
