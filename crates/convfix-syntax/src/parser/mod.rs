//! Recursive descent parser producing a [`SyntaxTree`].
//!
//! The parser works on a fully tokenized buffer so declarations can be told
//! apart from expressions by looking ahead without consuming anything.
//! Errors inside a statement or declaration are recorded and parsing resumes
//! at the next `;` or `}`, so one bad line does not hide the rest of the
//! file.

mod decl;
mod expr;
mod stmt;

use convfix_core::{ParseError, ParseErrorKind, ParseErrors, Span};

use crate::lexer::{Lexer, Token, TokenKind};
use crate::tree::{NodeId, NodeKind, SyntaxTree};

/// Parser state over one source text.
pub struct Parser<'src> {
    tokens: Vec<Token<'src>>,
    position: usize,
    tree: SyntaxTree,
    errors: ParseErrors,
    source_len: u32,
}

impl<'src> Parser<'src> {
    /// Tokenize `source` and prepare to parse it.
    ///
    /// Lexer errors are recorded immediately and their tokens dropped.
    pub fn new(source: &'src str) -> Self {
        let (tokens, lex_errors) = Lexer::tokenize(source);
        let mut errors = ParseErrors::new();
        for error in lex_errors {
            errors.push(error.into());
        }
        let tokens = tokens
            .into_iter()
            .filter(|t| t.kind != TokenKind::Error)
            .collect();

        Self {
            tokens,
            position: 0,
            tree: SyntaxTree::empty(),
            errors,
            source_len: source.len() as u32,
        }
    }

    /// Parse a whole compilation unit, failing if anything went wrong.
    pub fn parse(source: &'src str) -> Result<SyntaxTree, ParseErrors> {
        let (tree, errors) = Self::parse_lenient(source);
        if errors.is_empty() {
            Ok(tree)
        } else {
            Err(errors)
        }
    }

    /// Parse a whole compilation unit, returning the partial tree along with
    /// every error encountered.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse_lenient(source: &'src str) -> (SyntaxTree, ParseErrors) {
        let mut parser = Parser::new(source);
        parser.parse_compilation_unit();
        (parser.tree, parser.errors)
    }

    fn parse_compilation_unit(&mut self) {
        let mut items = Vec::new();
        while !self.is_eof() {
            let before = self.position;
            match self.parse_item() {
                Ok(item) => items.push(item),
                Err(error) => {
                    self.errors.push(error);
                    self.synchronize(before);
                }
            }
        }

        let span = Span::new(0, self.source_len, 1, 1);
        let root = self.tree.alloc(NodeKind::CompilationUnit { items }, span);
        self.tree.set_root(root);
    }

    /// The tree built so far.
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// Errors recorded so far.
    pub fn errors(&self) -> &ParseErrors {
        &self.errors
    }

    // ========================================================================
    // Token navigation
    // ========================================================================

    #[inline]
    fn peek(&self) -> &Token<'src> {
        self.peek_nth(0)
    }

    /// Look `n` tokens ahead. Past the end this keeps returning `Eof`.
    fn peek_nth(&self, n: usize) -> &Token<'src> {
        let index = (self.position + n).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    #[inline]
    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Whether the current token is the identifier `word`.
    fn check_contextual(&self, word: &str) -> bool {
        let token = self.peek();
        token.kind == TokenKind::Identifier && token.lexeme == word
    }

    #[inline]
    fn is_eof(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    fn advance(&mut self) -> Token<'src> {
        let token = *self.peek();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token<'src>> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token<'src>, ParseError> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        let token = self.peek();
        if token.kind == TokenKind::Eof {
            return Err(ParseError::new(
                ParseErrorKind::UnexpectedEof,
                token.span,
                format!("expected {}, found end of file", kind.description()),
            ));
        }
        Err(ParseError::expected_token(
            token.span,
            kind.description(),
            token.kind.description(),
        ))
    }

    /// Span of the most recently consumed token.
    fn prev_span(&self) -> Span {
        self.tokens
            .get(self.position.saturating_sub(1))
            .map(|t| t.span)
            .unwrap_or_default()
    }

    /// Span from `start` through the last consumed token.
    fn span_from(&self, start: Span) -> Span {
        start.merge(self.prev_span())
    }

    /// Skip to just past the next `;`, or up to the next `}`.
    ///
    /// Always makes progress past `before` so a failing construct cannot
    /// loop forever.
    fn synchronize(&mut self, before: usize) {
        if self.position == before {
            self.advance();
        }
        while !self.is_eof() {
            match self.peek().kind {
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::RightBrace => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        self.tree.alloc(kind, span)
    }
}
