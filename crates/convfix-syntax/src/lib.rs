//! Syntax model for the convfix host language.
//!
//! This crate provides:
//! - Lexical analysis (tokenization)
//! - A parser producing a [`SyntaxTree`] with parent links
//! - A [`SyntaxFactory`] for building replacement nodes
//! - A printer rendering trees back to text
//! - Immutable [`Document`]s pairing a name, text and tree
//!
//! # Example
//!
//! ```
//! use convfix_syntax::{Document, NodeKind};
//!
//! let doc = Document::parse("order.cf", "long total = 5L;\nint count = total;").unwrap();
//! let tree = doc.tree();
//!
//! // Offset 30 is inside `total` on the second line.
//! let node = tree.node_at(30).unwrap();
//! assert!(matches!(tree.kind(node), NodeKind::Ident(_)));
//! ```

pub mod lexer;
mod parser;
pub mod printer;

mod document;
mod factory;
mod tree;

pub use document::Document;
pub use factory::SyntaxFactory;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
pub use tree::{
    AssignOp, BinaryOp, Ident, LiteralKind, NodeData, NodeId, NodeKind, Param, SyntaxTree,
    TypeExpr, UnaryOp, VarDeclarator,
};
