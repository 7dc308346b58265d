//! Code fix for invalid implicit conversions.
//!
//! Given a document and a diagnostic reporting that a value cannot be
//! implicitly converted, the fix:
//! 1. locates the enclosing assignment, `return`, `yield return` or local
//!    declaration ([`locate`]),
//! 2. extracts the source and destination types ([`extract`]),
//! 3. asks a [`MappingEngine`] for replacement statements,
//! 4. splices them into a copy of the tree ([`replace_statement`]).
//!
//! The input document is never modified; the fix carries a new one.
//!
//! # Example
//!
//! ```
//! use convfix::{CancellationToken, ConversionFixProvider, DataType, Diagnostic, Document, Span};
//!
//! let source = "long total = 5L;\nint count = total;";
//! let document = Document::parse("order.cf", source).unwrap();
//! let diagnostic = Diagnostic::invalid_conversion(
//!     Span::new(29, 5, 2, 13),
//!     DataType::long(),
//!     DataType::int(),
//! );
//!
//! let provider = ConversionFixProvider::new();
//! let fix = provider
//!     .compute_fix(&document, &diagnostic, &CancellationToken::new())
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(
//!     fix.document.text(),
//!     "long total = 5L;\nint count = cast<int>(total);"
//! );
//! ```

mod extract;
mod fix;
mod locator;
mod mapping;
mod rewriter;
pub mod semantic;
mod statement;

pub use extract::{extract, target_exists_policy};
pub use fix::{CodeFix, ConversionFixProvider, FixOptions};
pub use locator::{locate, locate_from};
pub use mapping::{CastMappingEngine, MappingEngine, MappingFlags, MappingRequest};
pub use rewriter::{Rewrite, replace_statement};
pub use semantic::{SemanticAnalyzer, SemanticModel, SymbolKind, TypeInfo};
pub use statement::{ConvertibleStatement, StatementShape};

pub use convfix_core::{
    CancellationToken, DataType, Diagnostic, DiagnosticCode, FixError, MappingError,
    SemanticError, Severity, Span, TreeError,
};
pub use convfix_syntax::{Document, NodeId, NodeKind, SyntaxFactory, SyntaxTree};

/// Re-export of the syntax crate for hosts building their own engines.
pub use convfix_syntax as syntax;
