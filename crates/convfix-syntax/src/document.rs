//! Immutable source documents.

use std::fmt;
use std::sync::Arc;

use convfix_core::{ParseErrors, Span};

use crate::parser::Parser;
use crate::printer;
use crate::tree::{NodeId, SyntaxTree};

/// A named source text and its syntax tree.
///
/// Documents are never modified in place. An edit produces a new document
/// through [`Document::with_replacement`], which rewrites only the edited
/// range of the text, or [`Document::with_tree`], which renders the whole
/// edited tree. Spans of the new tree still point into the text it was
/// parsed from; [`Document::reparse`] produces a document whose spans match
/// its text again.
#[derive(Clone)]
pub struct Document {
    name: Arc<str>,
    text: Arc<str>,
    tree: Arc<SyntaxTree>,
    version: u32,
    spans_current: bool,
}

impl Document {
    /// Parse `text` strictly.
    pub fn parse(name: impl Into<Arc<str>>, text: impl Into<Arc<str>>) -> Result<Self, ParseErrors> {
        let text = text.into();
        let tree = Parser::parse(&text)?;
        Ok(Self::from_parts(name.into(), text, tree, 0))
    }

    /// Parse `text`, keeping whatever tree could be built.
    pub fn parse_lenient(
        name: impl Into<Arc<str>>,
        text: impl Into<Arc<str>>,
    ) -> (Self, ParseErrors) {
        let text = text.into();
        let (tree, errors) = Parser::parse_lenient(&text);
        (Self::from_parts(name.into(), text, tree, 0), errors)
    }

    fn from_parts(name: Arc<str>, text: Arc<str>, tree: SyntaxTree, version: u32) -> Self {
        Self {
            name,
            text,
            tree: Arc::new(tree),
            version,
            spans_current: true,
        }
    }

    /// A new document holding an edited tree, with the whole tree rendered
    /// as its text.
    pub fn with_tree(&self, tree: SyntaxTree) -> Self {
        let text: Arc<str> = printer::print(&tree).into();
        Self {
            name: self.name.clone(),
            text,
            tree: Arc::new(tree),
            version: self.version + 1,
            spans_current: false,
        }
    }

    /// A new document holding an edited tree, where only the text under
    /// `span` changes: it becomes `nodes` printed from `tree`. Everything
    /// outside `span`, comments included, is kept byte for byte.
    ///
    /// Continuation lines are indented like the line `span` starts on.
    /// Several nodes go on separate lines when `span` starts its line and
    /// are separated by a space otherwise. Falls back to
    /// [`with_tree`](Self::with_tree) when `span` is not a range of the
    /// current text.
    pub fn with_replacement(&self, tree: SyntaxTree, span: Span, nodes: &[NodeId]) -> Self {
        let start = span.offset as usize;
        let end = span.end() as usize;
        let (Some(before), Some(after)) = (self.text.get(..start), self.text.get(end..)) else {
            return self.with_tree(tree);
        };

        let line = &before[before.rfind('\n').map_or(0, |nl| nl + 1)..];
        let indent: String = line.chars().take_while(|c| c.is_whitespace()).collect();
        let newline = format!("\n{indent}");
        let separator = if line.len() == indent.len() {
            newline.as_str()
        } else {
            " "
        };

        let replacement = nodes
            .iter()
            .map(|&node| printer::print_node(&tree, node).replace('\n', &newline))
            .collect::<Vec<_>>()
            .join(separator);

        let mut text = String::with_capacity(before.len() + replacement.len() + after.len());
        text.push_str(before);
        text.push_str(&replacement);
        text.push_str(after);

        Self {
            name: self.name.clone(),
            text: text.into(),
            tree: Arc::new(tree),
            version: self.version + 1,
            spans_current: false,
        }
    }

    /// Parse this document's text again so that spans match it.
    pub fn reparse(&self) -> Result<Self, ParseErrors> {
        let tree = Parser::parse(&self.text)?;
        Ok(Self::from_parts(
            self.name.clone(),
            self.text.clone(),
            tree,
            self.version,
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// Number of edits between the parsed original and this document.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Whether node spans are offsets into [`text`](Self::text).
    pub fn spans_current(&self) -> bool {
        self.spans_current
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("nodes", &self.tree.len())
            .finish()
    }
}
