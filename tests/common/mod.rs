//! Shared harness for the code fix integration tests.
//!
//! Provides script loading, diagnostic construction and a mapping engine
//! that records what it was asked and answers with a scripted reply.

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::Once;

use convfix::syntax::LiteralKind;
use convfix::{
    CastMappingEngine, DataType, Diagnostic, Document, MappingEngine, MappingError,
    MappingRequest, NodeId, Span, SyntaxFactory,
};

/// Install a test-friendly subscriber once. Filter with `RUST_LOG`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Load a script from the test_scripts directory.
pub fn load_script(filename: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_scripts")
        .join(filename);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

/// Parse a script from the test_scripts directory into a document.
pub fn load_document(filename: &str) -> Document {
    let source = load_script(filename);
    Document::parse(filename, source)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {}", filename, e))
}

/// An invalid conversion diagnostic over the first occurrence of `needle`.
pub fn diagnostic_at(source: &str, needle: &str) -> Diagnostic {
    diagnostic_at_nth(source, needle, 0)
}

/// An invalid conversion diagnostic over the `nth` occurrence of `needle`.
pub fn diagnostic_at_nth(source: &str, needle: &str, nth: usize) -> Diagnostic {
    let offset = source
        .match_indices(needle)
        .nth(nth)
        .map(|(offset, _)| offset)
        .unwrap_or_else(|| panic!("'{}' occurs fewer than {} times", needle, nth + 1));
    let before = &source[..offset];
    let line = before.matches('\n').count() as u32 + 1;
    let col = (offset - before.rfind('\n').map_or(0, |nl| nl + 1)) as u32 + 1;
    Diagnostic::invalid_conversion(
        Span::new(offset as u32, needle.len() as u32, line, col),
        DataType::long(),
        DataType::int(),
    )
}

/// What a [`RecordingEngine`] answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Whatever the built-in cast engine produces.
    Cast,
    /// One `name(source);` statement per name, in order.
    Calls(Vec<&'static str>),
    /// A bare literal expression followed by the cast statement.
    StrayThenCast,
    /// A copy of the source expression and nothing else.
    ExpressionOnly,
    /// No statements at all.
    Nothing,
    /// A mapping failure.
    Fail,
}

/// Mapping engine that records every request and the nodes it returned.
#[derive(Debug)]
pub struct RecordingEngine {
    reply: Reply,
    requests: RefCell<Vec<MappingRequest>>,
    produced: RefCell<Vec<Vec<NodeId>>>,
}

impl RecordingEngine {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            requests: RefCell::new(Vec::new()),
            produced: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<MappingRequest> {
        self.requests.borrow().clone()
    }

    /// The request of the only call made so far.
    pub fn single_request(&self) -> MappingRequest {
        let requests = self.requests.borrow();
        assert_eq!(requests.len(), 1, "expected exactly one mapping request");
        requests[0].clone()
    }

    /// Nodes returned by the most recent call.
    pub fn last_produced(&self) -> Vec<NodeId> {
        self.produced.borrow().last().cloned().unwrap_or_default()
    }
}

impl MappingEngine for RecordingEngine {
    fn map_types(
        &self,
        request: &MappingRequest,
        factory: &mut SyntaxFactory<'_>,
    ) -> Result<Vec<NodeId>, MappingError> {
        self.requests.borrow_mut().push(request.clone());

        let produced = match &self.reply {
            Reply::Cast => CastMappingEngine.map_types(request, factory)?,
            Reply::Calls(names) => names
                .iter()
                .map(|name| {
                    let callee = factory.ident(*name);
                    let arg = factory.copy_subtree(request.source_expr);
                    let call = factory.call(callee, vec![arg]);
                    factory.expr_stmt(call)
                })
                .collect(),
            Reply::StrayThenCast => {
                let stray = factory.literal(LiteralKind::Int(0));
                let mut nodes = vec![stray];
                nodes.extend(CastMappingEngine.map_types(request, factory)?);
                nodes
            }
            Reply::ExpressionOnly => vec![factory.copy_subtree(request.source_expr)],
            Reply::Nothing => Vec::new(),
            Reply::Fail => {
                return Err(MappingError::Failed {
                    message: "scripted failure".to_string(),
                });
            }
        };

        self.produced.borrow_mut().push(produced.clone());
        Ok(produced)
    }
}
