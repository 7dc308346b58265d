//! Unified error types for convfix.
//!
//! ## Error Hierarchy
//!
//! ```text
//! LexError        - tokenization errors (collected, never fatal on their own)
//! ParseError      - parser errors (with ParseErrorKind), gathered in ParseErrors
//! SemanticError   - type or symbol lookup failures
//! MappingError    - the mapping engine could not produce replacement code
//! TreeError       - a tree edit referenced a node that is not where it should be
//! FixError        - top-level error of the code fix pipeline
//! ```
//!
//! `FixError` wraps the last three via `From`, so pipeline stages can use `?`
//! on whichever layer they call into.

use thiserror::Error;

use crate::Span;

// ============================================================================
// Lexer Errors
// ============================================================================

/// Problems found while scanning characters into tokens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at {span}")]
    UnexpectedChar { ch: char, span: Span },

    /// End of input inside a string literal.
    #[error("unterminated string at {span}")]
    UnterminatedString { span: Span },

    /// End of input inside `/* ... */`.
    #[error("unterminated comment at {span}")]
    UnterminatedComment { span: Span },

    #[error("invalid number at {span}: {detail}")]
    InvalidNumber { span: Span, detail: String },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedChar { span, .. }
            | LexError::UnterminatedString { span }
            | LexError::UnterminatedComment { span }
            | LexError::InvalidNumber { span, .. } => *span,
        }
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

/// What kind of syntax the parser was looking at when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    ExpectedToken,
    UnexpectedToken,
    UnexpectedEof,
    ExpectedExpression,
    ExpectedType,
    ExpectedStatement,
    ExpectedDeclaration,
    ExpectedIdentifier,
    /// Left of `=` is neither a name nor a member access.
    InvalidAssignmentTarget,
    InvalidLiteral,
    /// Carried over from a [`LexError`].
    LexerError,
}

impl ParseErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExpectedToken => "expected token",
            Self::UnexpectedToken => "unexpected token",
            Self::UnexpectedEof => "unexpected end of file",
            Self::ExpectedExpression => "expected expression",
            Self::ExpectedType => "expected type",
            Self::ExpectedStatement => "expected statement",
            Self::ExpectedDeclaration => "expected declaration",
            Self::ExpectedIdentifier => "expected identifier",
            Self::InvalidAssignmentTarget => "invalid assignment target",
            Self::InvalidLiteral => "invalid literal",
            Self::LexerError => "lexer error",
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One syntax error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {span}: {message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    pub message: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    pub fn expected_token(span: Span, expected: &str, found: &str) -> Self {
        let message = format!("expected {expected}, found {found}");
        Self::new(ParseErrorKind::ExpectedToken, span, message)
    }

    pub fn expected_expression(span: Span, found: &str) -> Self {
        let message = format!("expected expression, found {found}");
        Self::new(ParseErrorKind::ExpectedExpression, span, message)
    }

    pub fn expected_type(span: Span, found: &str) -> Self {
        let message = format!("expected type, found {found}");
        Self::new(ParseErrorKind::ExpectedType, span, message)
    }

    /// Render the error followed by the offending source line and a marker
    /// under the span.
    pub fn display_with_source(&self, source: &str) -> String {
        use std::fmt::Write;

        let line = self.span.line;
        let column = self.span.col.max(1) as usize;
        let mut out = format!("Error at {line}:{column}: {}\n", self.kind);
        if !self.message.is_empty() {
            let _ = writeln!(out, "  {}", self.message);
        }

        let Some(text) = source.lines().nth((line as usize).saturating_sub(1)) else {
            return out;
        };
        let width = self.span.len.max(1) as usize;
        let _ = writeln!(out, "  |");
        let _ = writeln!(out, "{line:>3} | {text}");
        let _ = writeln!(
            out,
            "  | {}^{}",
            " ".repeat(column - 1),
            "~".repeat(width - 1)
        );
        out
    }
}

impl From<LexError> for ParseError {
    fn from(error: LexError) -> Self {
        ParseError::new(ParseErrorKind::LexerError, error.span(), error.to_string())
    }
}

/// Every syntax error found in one source, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseErrors(Vec<ParseError>);

impl ParseErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ParseError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParseError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<ParseError> {
        self.0
    }
}

impl IntoIterator for ParseErrors {
    type Item = ParseError;
    type IntoIter = std::vec::IntoIter<ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<ParseError> for ParseErrors {
    fn from(error: ParseError) -> Self {
        Self(vec![error])
    }
}

impl std::fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut errors = self.0.iter();
        if let Some(first) = errors.next() {
            write!(f, "{first}")?;
        }
        for error in errors {
            write!(f, "\n{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseErrors {}

// ============================================================================
// Semantic Errors
// ============================================================================

/// A type or symbol query that could not be answered.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemanticError {
    /// No symbol with this name is visible at the use site.
    #[error("unresolved name '{name}' at {span}")]
    UnresolvedName { name: String, span: Span },

    /// The type has no member with this name.
    #[error("type '{ty}' has no member '{member}' at {span}")]
    UnknownMember {
        ty: String,
        member: String,
        span: Span,
    },

    /// A type name that is neither built in nor declared.
    #[error("unknown type '{name}' at {span}")]
    UnknownType { name: String, span: Span },

    /// The queried node is not an expression.
    #[error("node at {span} is not an expression")]
    NotAnExpression { span: Span },

    /// A `return` or `yield` outside any function.
    #[error("no enclosing function for statement at {span}")]
    NoEnclosingFunction { span: Span },

    /// Two locals with the same name in one scope.
    #[error("local '{name}' at {span} is already declared in this scope")]
    Redeclared { name: String, span: Span },

    /// A `yield return` in a function that does not return a sequence.
    #[error("'yield return' at {span} requires a sequence return type, found '{found}'")]
    NotASequence { found: String, span: Span },
}

// ============================================================================
// Mapping Errors
// ============================================================================

/// The mapping engine failed to synthesize a conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MappingError {
    /// The engine does not know how to convert between these types.
    #[error("no mapping from '{from}' to '{to}'")]
    Unsupported { from: String, to: String },

    /// The engine failed for another reason.
    #[error("mapping failed: {message}")]
    Failed { message: String },
}

// ============================================================================
// Tree Errors
// ============================================================================

/// A tree edit could not be applied.
///
/// Nodes are reported by their arena index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The node is not reachable from the root.
    #[error("node #{node} is not attached to the tree")]
    Detached { node: u32 },

    /// The parent does not hold the node in any child slot.
    #[error("node #{child} not found among the children of #{parent}")]
    SlotNotFound { parent: u32, child: u32 },

    /// A statement was required.
    #[error("node #{node} is not a statement")]
    NotAStatement { node: u32 },

    /// A statement would be replaced by nothing.
    #[error("replacement for node #{node} contains no statements")]
    EmptyReplacement { node: u32 },
}

// ============================================================================
// Fix Errors
// ============================================================================

/// Top-level error of the code fix pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FixError {
    /// A semantic query failed.
    #[error(transparent)]
    Semantic(#[from] SemanticError),

    /// The mapping engine failed.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// The tree edit failed.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,
}

impl FixError {
    /// Whether this failure only affects the current diagnostic and the
    /// caller may carry on with others.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FixError::Semantic(_))
    }
}
