//! The code fix provider: from a diagnostic to an edited document.

use convfix_core::{CancellationToken, Diagnostic, DiagnosticCode, FixError};
use convfix_syntax::{Document, NodeId, SyntaxFactory};

use crate::extract::extract;
use crate::locator::locate;
use crate::mapping::{CastMappingEngine, MappingEngine, MappingRequest};
use crate::rewriter::{Rewrite, replace_statement};
use crate::semantic::{SemanticAnalyzer, SemanticModel};

/// Diagnostic codes this fix responds to.
const FIXABLE_CODES: [DiagnosticCode; 1] = [DiagnosticCode::INVALID_IMPLICIT_CONVERSION];

/// Settings for a [`ConversionFixProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOptions {
    /// Title shown to the user for the offered fix.
    pub title: String,
}

impl Default for FixOptions {
    fn default() -> Self {
        Self {
            title: "Convert with explicit mapping".to_string(),
        }
    }
}

/// An offered fix: the document as it would be after applying it.
///
/// Only the replaced statement's text differs from the input document.
#[derive(Debug, Clone)]
pub struct CodeFix {
    pub title: String,
    pub diagnostic: Diagnostic,
    /// The request that was handed to the mapping engine.
    pub request: MappingRequest,
    /// The rewritten document.
    pub document: Document,
    pub rewrite: Rewrite,
}

impl CodeFix {
    /// The statement that was replaced. Detached in the new document's tree.
    pub fn replaced(&self) -> NodeId {
        self.request.statement
    }
}

/// Fixes invalid implicit conversions by delegating to a [`MappingEngine`].
#[derive(Debug, Clone, Default)]
pub struct ConversionFixProvider<E = CastMappingEngine> {
    engine: E,
    options: FixOptions,
}

impl ConversionFixProvider<CastMappingEngine> {
    /// A provider using the built-in cast engine.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: MappingEngine> ConversionFixProvider<E> {
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine,
            options: FixOptions::default(),
        }
    }

    pub fn with_options(mut self, options: FixOptions) -> Self {
        self.options = options;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn options(&self) -> &FixOptions {
        &self.options
    }

    /// The diagnostic codes this provider can fix.
    pub fn fixable_codes(&self) -> &'static [DiagnosticCode] {
        &FIXABLE_CODES
    }

    /// Compute the fix for one diagnostic using the built-in analyzer.
    ///
    /// `Ok(None)` means no fix applies: the diagnostic has another code,
    /// no convertible statement encloses it, or the engine produced no
    /// statements.
    pub fn compute_fix(
        &self,
        document: &Document,
        diagnostic: &Diagnostic,
        cancel: &CancellationToken,
    ) -> Result<Option<CodeFix>, FixError> {
        cancel.check()?;
        let model = SemanticAnalyzer::new(document.tree());
        self.compute_fix_with(document, &model, diagnostic, cancel)
    }

    /// Compute the fix for one diagnostic, asking `model` for types.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compute_fix_with(
        &self,
        document: &Document,
        model: &dyn SemanticModel,
        diagnostic: &Diagnostic,
        cancel: &CancellationToken,
    ) -> Result<Option<CodeFix>, FixError> {
        if !self.fixable_codes().contains(&diagnostic.code) {
            tracing::debug!(code = %diagnostic.code, "diagnostic code not handled");
            return Ok(None);
        }
        if !document.spans_current() {
            tracing::debug!(
                document = document.name(),
                "document spans do not match its text, reparse before fixing"
            );
            return Ok(None);
        }

        let tree = document.tree();
        let offset = diagnostic.start();
        let Some(statement) = locate(tree, offset) else {
            tracing::debug!(offset, "no convertible statement at diagnostic");
            return Ok(None);
        };

        let request = extract(&statement, tree, model, cancel)?;
        tracing::debug!(
            shape = %request.shape,
            from = %request.source_type,
            to = %request.destination_type,
            flags = ?request.flags,
            "mapping conversion"
        );

        cancel.check()?;
        let mut working = tree.clone();
        let produced = {
            let mut factory = SyntaxFactory::new(&mut working);
            self.engine.map_types(&request, &mut factory)?
        };
        let statements: Vec<NodeId> = produced
            .iter()
            .copied()
            .filter(|&node| working.is_statement(node))
            .collect();
        if statements.is_empty() {
            tracing::debug!(
                shape = %request.shape,
                produced = produced.len(),
                "mapping engine produced no statements"
            );
            return Ok(None);
        }

        let replaced_span = working.span(request.statement);
        let rewrite = replace_statement(&mut working, request.statement, &statements)?;
        let document = match rewrite {
            Rewrite::Spliced { .. } => {
                document.with_replacement(working, replaced_span, &statements)
            }
            Rewrite::Wrapped { block } => {
                document.with_replacement(working, replaced_span, &[block])
            }
        };
        Ok(Some(CodeFix {
            title: self.options.title.clone(),
            diagnostic: diagnostic.clone(),
            request,
            document,
            rewrite,
        }))
    }

    /// Compute fixes for every diagnostic of one document.
    ///
    /// A semantic failure only skips its own diagnostic. Cancellation,
    /// mapping failures and tree errors abort the whole pass.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn register_code_fixes(
        &self,
        document: &Document,
        diagnostics: &[Diagnostic],
        cancel: &CancellationToken,
    ) -> Result<Vec<CodeFix>, FixError> {
        cancel.check()?;
        let model = SemanticAnalyzer::new(document.tree());

        let mut fixes = Vec::new();
        for diagnostic in diagnostics {
            match self.compute_fix_with(document, &model, diagnostic, cancel) {
                Ok(Some(fix)) => fixes.push(fix),
                Ok(None) => {}
                Err(error) if error.is_recoverable() => {
                    tracing::warn!(
                        %error,
                        diagnostic = %diagnostic,
                        "skipping diagnostic after semantic failure"
                    );
                }
                Err(error) => return Err(error),
            }
        }
        Ok(fixes)
    }
}
