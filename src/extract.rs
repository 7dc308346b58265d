//! Building the mapping request for a located statement.

use convfix_core::{CancellationToken, FixError};
use convfix_syntax::{NodeId, NodeKind, SyntaxTree};

use crate::mapping::{MappingFlags, MappingRequest};
use crate::semantic::SemanticModel;
use crate::statement::ConvertibleStatement;

/// Whether an assignment target already exists as a writable variable.
///
/// True only when the target is a bare identifier naming a local,
/// parameter or field. Member accesses (`obj.Prop = ...`), properties and
/// anything unresolved count as not existing, so the engine constructs a
/// new value instead of writing members into the old one.
///
/// This is a heuristic: a member access to a field would also be
/// writable, but is treated like a property.
pub fn target_exists_policy(
    tree: &SyntaxTree,
    target: NodeId,
    model: &dyn SemanticModel,
) -> bool {
    if !matches!(tree.kind(target), NodeKind::Ident(_)) {
        return false;
    }
    model
        .symbol_kind(target)
        .is_some_and(|kind| kind.is_variable())
}

/// Gather the types and flags for `statement` into a [`MappingRequest`].
///
/// Assignments convert from the value's type to the target's type. The
/// other shapes convert from the expression's own type to the type its
/// context expects. `cancel` is checked before every semantic query.
pub fn extract(
    statement: &ConvertibleStatement,
    tree: &SyntaxTree,
    model: &dyn SemanticModel,
    cancel: &CancellationToken,
) -> Result<MappingRequest, FixError> {
    let shape = statement.shape();
    let source_expr = statement.source_expr();

    let (source_type, destination_type, destination_expr, flags) = match *statement {
        ConvertibleStatement::Assignment { target, value, .. } => {
            cancel.check()?;
            let source = model.type_info(value)?.ty;
            cancel.check()?;
            let destination = model.type_info(target)?.ty;
            cancel.check()?;
            let flags = if target_exists_policy(tree, target, model) {
                MappingFlags::TARGET_EXISTS
            } else {
                MappingFlags::empty()
            };
            (source, destination, Some(target), flags)
        }
        ConvertibleStatement::Return { value, .. } => {
            cancel.check()?;
            let info = model.type_info(value)?;
            (info.ty, info.converted, None, MappingFlags::empty())
        }
        ConvertibleStatement::Yield { value, .. } => {
            cancel.check()?;
            let info = model.type_info(value)?;
            (info.ty, info.converted, None, MappingFlags::LAZY_SEQUENCE)
        }
        ConvertibleStatement::LocalDeclaration { init, .. } => {
            cancel.check()?;
            let info = model.type_info(init)?;
            (info.ty, info.converted, None, MappingFlags::TARGET_EXISTS)
        }
    };

    Ok(MappingRequest {
        source_type,
        destination_type,
        source_expr,
        destination_expr,
        statement: statement.statement(),
        shape,
        flags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::locate;
    use crate::semantic::SemanticAnalyzer;
    use convfix_core::DataType;
    use convfix_syntax::Parser;

    const SOURCE: &str = r#"
class Order {
    int Count { get; set; }
    long total;
    void reset(long start) { total = start; }
}

IEnumerable<int> counts(long n) {
    yield return n;
}

int narrow(Order order, long big) {
    int local = 0;
    local = big;
    order.Count = big;
    int fresh = big;
    return big;
}
"#;

    fn request_at(needle: &str) -> MappingRequest {
        let tree = Parser::parse(SOURCE).unwrap();
        let model = SemanticAnalyzer::new(&tree);
        let offset = SOURCE.find(needle).unwrap() as u32;
        let statement = locate(&tree, offset).unwrap();
        extract(&statement, &tree, &model, &CancellationToken::new()).unwrap()
    }

    #[test]
    fn assignment_to_local_target_exists() {
        let request = request_at("local = big");
        assert_eq!(request.source_type, DataType::long());
        assert_eq!(request.destination_type, DataType::int());
        assert!(request.destination_expr.is_some());
        assert!(request.target_exists());
    }

    #[test]
    fn assignment_to_member_access_does_not() {
        let request = request_at("order.Count = big");
        assert_eq!(request.destination_type, DataType::int());
        assert!(!request.target_exists());
    }

    #[test]
    fn assignment_to_field_by_name_exists() {
        let request = request_at("total = start");
        assert!(request.target_exists());
    }

    #[test]
    fn local_declaration_always_exists() {
        let request = request_at("fresh = big");
        assert_eq!(request.destination_type, DataType::int());
        assert!(request.target_exists());
        assert!(request.destination_expr.is_none());
    }

    #[test]
    fn return_uses_converted_type() {
        let request = request_at("return big");
        assert_eq!(request.source_type, DataType::long());
        assert_eq!(request.destination_type, DataType::int());
        assert!(request.flags.is_empty());
    }

    #[test]
    fn yield_is_flagged_lazy() {
        let request = request_at("yield return n");
        assert_eq!(request.destination_type, DataType::int());
        assert!(request.is_lazy_sequence());
        assert!(!request.target_exists());
    }

    #[test]
    fn bare_property_name_is_not_a_variable() {
        let source = "class A { int P { get; set; } void f(long v) { P = v; } }";
        let tree = Parser::parse(source).unwrap();
        let model = SemanticAnalyzer::new(&tree);
        let statement = locate(&tree, source.find("P = v").unwrap() as u32).unwrap();
        let ConvertibleStatement::Assignment { target, .. } = statement else {
            panic!("expected assignment");
        };
        assert!(!target_exists_policy(&tree, target, &model));
    }

    #[test]
    fn cancelled_before_queries() {
        let tree = Parser::parse(SOURCE).unwrap();
        let model = SemanticAnalyzer::new(&tree);
        let statement = locate(&tree, SOURCE.find("return big").unwrap() as u32).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = extract(&statement, &tree, &model, &cancel).unwrap_err();
        assert_eq!(err, FixError::Cancelled);
    }

    #[test]
    fn semantic_failure_propagates() {
        let tree = Parser::parse("int x = missing;").unwrap();
        let model = SemanticAnalyzer::new(&tree);
        let statement = locate(&tree, 8).unwrap();
        let err = extract(&statement, &tree, &model, &CancellationToken::new()).unwrap_err();
        assert!(err.is_recoverable());
    }
}
