//! Core types for convfix.
//!
//! This crate holds everything the syntax model and the code fix pipeline
//! share:
//! - [`Span`] source locations
//! - [`TypeHash`] and [`DataType`] for resolved types
//! - [`Diagnostic`] occurrences and their [`DiagnosticCode`]s
//! - the error hierarchy in [`error`]
//! - [`CancellationToken`] for cooperative cancellation

mod cancel;
mod data_type;
mod diagnostic;
pub mod error;
mod span;
mod type_hash;

pub use cancel::CancellationToken;
pub use data_type::{DataType, primitives};
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use error::{
    FixError, LexError, MappingError, ParseError, ParseErrorKind, ParseErrors, SemanticError,
    TreeError,
};
pub use span::Span;
pub use type_hash::{TypeHash, hash_constants};
