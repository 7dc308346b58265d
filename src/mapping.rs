//! The seam to the engine that writes conversion code.
//!
//! The fix decides *where* a conversion is needed and between which types;
//! a [`MappingEngine`] decides *how* to convert. Engines receive a
//! [`MappingRequest`] and a [`SyntaxFactory`] over the working copy of the
//! tree and return the statements that replace the original one.

use bitflags::bitflags;
use convfix_core::{DataType, MappingError};
use convfix_syntax::{NodeId, NodeKind, SyntaxFactory};

use crate::statement::StatementShape;

bitflags! {
    /// Context flags for a mapping request.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MappingFlags: u8 {
        /// The destination is an existing variable that can be written
        /// member by member instead of being constructed anew.
        const TARGET_EXISTS = 1 << 0;
        /// The statement is inside a lazy sequence (`yield return`); the
        /// engine must not emit control flow that is illegal there.
        const LAZY_SEQUENCE = 1 << 1;
    }
}

/// Everything an engine needs to synthesize a conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingRequest {
    pub source_type: DataType,
    pub destination_type: DataType,
    /// The expression producing the value to convert.
    pub source_expr: NodeId,
    /// The assignment target. Only set for assignments.
    pub destination_expr: Option<NodeId>,
    /// The statement being replaced.
    pub statement: NodeId,
    pub shape: StatementShape,
    pub flags: MappingFlags,
}

impl MappingRequest {
    pub fn target_exists(&self) -> bool {
        self.flags.contains(MappingFlags::TARGET_EXISTS)
    }

    pub fn is_lazy_sequence(&self) -> bool {
        self.flags.contains(MappingFlags::LAZY_SEQUENCE)
    }
}

/// Produces replacement statements for a conversion.
///
/// Returned nodes must have been created through `factory`. An empty
/// result means the engine has nothing to offer and no fix is produced.
pub trait MappingEngine {
    fn map_types(
        &self,
        request: &MappingRequest,
        factory: &mut SyntaxFactory<'_>,
    ) -> Result<Vec<NodeId>, MappingError>;
}

impl<E: MappingEngine + ?Sized> MappingEngine for &E {
    fn map_types(
        &self,
        request: &MappingRequest,
        factory: &mut SyntaxFactory<'_>,
    ) -> Result<Vec<NodeId>, MappingError> {
        (**self).map_types(request, factory)
    }
}

/// Engine that wraps the source expression in `cast<D>(...)` and re-emits
/// the original statement form around it.
///
/// Only numeric conversions and `null` sources are handled; other pairs
/// get an empty result. Converting to `void` is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct CastMappingEngine;

impl CastMappingEngine {
    pub fn new() -> Self {
        Self
    }

    fn can_cast(from: &DataType, to: &DataType) -> bool {
        (from.is_numeric() && to.is_numeric()) || (from.is_null() && !to.is_numeric())
    }
}

impl MappingEngine for CastMappingEngine {
    fn map_types(
        &self,
        request: &MappingRequest,
        factory: &mut SyntaxFactory<'_>,
    ) -> Result<Vec<NodeId>, MappingError> {
        let to = &request.destination_type;
        if to.is_void() {
            return Err(MappingError::Unsupported {
                from: request.source_type.to_string(),
                to: to.to_string(),
            });
        }
        if !Self::can_cast(&request.source_type, to) {
            tracing::trace!(from = %request.source_type, %to, "no cast available");
            return Ok(Vec::new());
        }

        let source = factory.copy_subtree(request.source_expr);
        let converted = factory.cast(to, source);

        let stmt = match request.shape {
            StatementShape::Assignment => {
                let Some(target) = request.destination_expr else {
                    return Err(MappingError::Failed {
                        message: "assignment request without a destination".to_string(),
                    });
                };
                let target = factory.copy_subtree(target);
                let assign = factory.assign(target, converted);
                factory.expr_stmt(assign)
            }
            StatementShape::Return => factory.return_stmt(Some(converted)),
            StatementShape::Yield => factory.yield_stmt(converted),
            StatementShape::LocalDeclaration => {
                let name = match factory.tree().kind(request.statement) {
                    NodeKind::LocalDecl { vars, .. } if vars.len() == 1 => {
                        vars[0].name.name.clone()
                    }
                    _ => {
                        return Err(MappingError::Failed {
                            message: "declaration request without a single declarator"
                                .to_string(),
                        });
                    }
                };
                factory.local_decl(to, name, converted)
            }
        };
        Ok(vec![stmt])
    }
}
