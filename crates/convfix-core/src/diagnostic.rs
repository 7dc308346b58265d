//! Diagnostic occurrences handed to code fix providers.
//!
//! A [`Diagnostic`] is a single reported instance of a compiler error or
//! warning, tied to a source location. Code fix providers declare which
//! [`DiagnosticCode`]s they can fix and receive one occurrence at a time.

use std::fmt;

use crate::Span;

/// A stable, well-known diagnostic identifier such as `CF0029`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticCode(pub &'static str);

impl DiagnosticCode {
    /// Cannot implicitly convert a value of one type to another.
    pub const INVALID_IMPLICIT_CONVERSION: DiagnosticCode = DiagnosticCode("CF0029");

    /// The code as written in compiler output.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Prevents successful compilation.
    Error,
    /// Compiles, but probably not what was meant.
    Warning,
    /// Informational only.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        })
    }
}

/// A single diagnostic occurrence.
///
/// Immutable once created. The start of `span` is what code fixes use to
/// locate the offending syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Which diagnostic this is.
    pub code: DiagnosticCode,
    /// How severe it is.
    pub severity: Severity,
    /// Location of the offending expression.
    pub span: Span,
    /// Human readable message.
    pub message: String,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(code: DiagnosticCode, span: Span, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Error,
            span,
            message: message.into(),
        }
    }

    /// An invalid implicit conversion from `from` to `to` at `span`.
    pub fn invalid_conversion(span: Span, from: impl fmt::Display, to: impl fmt::Display) -> Self {
        Self::error(
            DiagnosticCode::INVALID_IMPLICIT_CONVERSION,
            span,
            format!("cannot implicitly convert type '{from}' to '{to}'"),
        )
    }

    /// Byte offset where the diagnostic starts.
    #[inline]
    pub fn start(&self) -> u32 {
        self.span.offset
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {}: {}",
            self.span, self.severity, self.code, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_conversion_message() {
        let diag = Diagnostic::invalid_conversion(Span::new(8, 13, 1, 9), "long", "int");
        assert_eq!(diag.code, DiagnosticCode::INVALID_IMPLICIT_CONVERSION);
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.start(), 8);
        assert_eq!(
            diag.to_string(),
            "1:9: error CF0029: cannot implicitly convert type 'long' to 'int'"
        );
    }
}
