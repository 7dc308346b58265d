//! Main lexer implementation.
//!
//! The [`Lexer`] converts source text into a stream of [`Token`]s.
//! It uses direct dispatch based on the first character.

use convfix_core::{LexError, Span};

use super::cursor::{Cursor, is_ident_continue, is_ident_start};
use super::token::{Token, TokenKind, lookup_keyword};

/// Lexer for convfix source code.
///
/// Errors are collected rather than returned, an [`TokenKind::Error`]
/// token stands in for the offending text so the parser can keep going.
pub struct Lexer<'src> {
    /// Low-level character cursor.
    cursor: Cursor<'src>,
    /// Accumulated errors.
    errors: Vec<LexError>,
    /// Set once the EOF token has been produced.
    finished: bool,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            errors: Vec::new(),
            finished: false,
        }
    }

    /// Lex the whole source. The returned vector always ends with `Eof`.
    pub fn tokenize(source: &'src str) -> (Vec<Token<'src>>, Vec<LexError>) {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if eof {
                break;
            }
        }
        (tokens, lexer.take_errors())
    }

    /// Take accumulated errors, leaving an empty vec.
    pub fn take_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.errors)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Scan and return the next token.
    pub fn next_token(&mut self) -> Token<'src> {
        loop {
            self.skip_whitespace();

            if self.cursor.is_eof() {
                self.finished = true;
                return self.make_token(TokenKind::Eof, self.start());
            }

            let start = self.start();
            let Some(c) = self.cursor.peek() else {
                continue;
            };

            let token = match c {
                '/' => match self.cursor.peek_nth(1) {
                    Some('/') => {
                        self.skip_line_comment();
                        continue;
                    }
                    Some('*') => match self.skip_block_comment(start) {
                        Some(error) => error,
                        None => continue,
                    },
                    _ => self.scan_operator(start),
                },
                '"' => self.scan_string(start),
                c if c.is_ascii_digit() => self.scan_number(start),
                '.' if self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                    self.scan_number(start)
                }
                c if is_ident_start(c) => self.scan_identifier(start),
                _ => self.scan_operator(start),
            };
            return token;
        }
    }

    // =========================================
    // Internal helpers
    // =========================================

    fn start(&self) -> (u32, u32, u32) {
        (self.cursor.offset(), self.cursor.line(), self.cursor.column())
    }

    fn span_from(&self, (offset, line, col): (u32, u32, u32)) -> Span {
        Span::new(offset, self.cursor.offset() - offset, line, col)
    }

    fn make_token(&self, kind: TokenKind, start: (u32, u32, u32)) -> Token<'src> {
        let span = self.span_from(start);
        Token::new(kind, self.cursor.slice_from(start.0), span)
    }

    fn make_error(&mut self, error: LexError, start: (u32, u32, u32)) -> Token<'src> {
        self.errors.push(error);
        self.make_token(TokenKind::Error, start)
    }

    fn skip_whitespace(&mut self) {
        self.cursor.eat('\u{FEFF}');
        self.cursor.eat_while(|c| c.is_ascii_whitespace());
    }

    fn skip_line_comment(&mut self) {
        self.cursor.eat_while(|c| c != '\n');
    }

    /// Skip `/* ... */`. Returns an error token if the comment never closes.
    fn skip_block_comment(&mut self, start: (u32, u32, u32)) -> Option<Token<'src>> {
        self.cursor.advance();
        self.cursor.advance();
        loop {
            match self.cursor.advance() {
                None => {
                    let span = self.span_from(start);
                    return Some(self.make_error(LexError::UnterminatedComment { span }, start));
                }
                Some('*') if self.cursor.eat('/') => return None,
                Some(_) => {}
            }
        }
    }

    // =========================================
    // Scanning
    // =========================================

    fn scan_string(&mut self, start: (u32, u32, u32)) -> Token<'src> {
        self.cursor.advance();
        loop {
            match self.cursor.peek() {
                None | Some('\n') => {
                    let span = self.span_from(start);
                    return self.make_error(LexError::UnterminatedString { span }, start);
                }
                Some('\\') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some('"') => {
                    self.cursor.advance();
                    return self.make_token(TokenKind::StringLiteral, start);
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    fn scan_number(&mut self, start: (u32, u32, u32)) -> Token<'src> {
        self.consume_digits();
        let mut is_float = false;

        if self.cursor.peek() == Some('.')
            && self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.advance();
            self.consume_digits();
            is_float = true;
        }

        if let Some('e' | 'E') = self.cursor.peek() {
            self.cursor.advance();
            if matches!(self.cursor.peek(), Some('+' | '-')) {
                self.cursor.advance();
            }
            if !self.cursor.check(|c| c.is_ascii_digit()) {
                let span = self.span_from(start);
                return self.make_error(
                    LexError::InvalidNumber {
                        span,
                        detail: "expected digits in exponent".to_string(),
                    },
                    start,
                );
            }
            self.consume_digits();
            is_float = true;
        }

        let kind = match self.cursor.peek() {
            Some('f' | 'F') => {
                self.cursor.advance();
                TokenKind::FloatLiteral
            }
            Some('L' | 'l') if !is_float => {
                self.cursor.advance();
                TokenKind::LongLiteral
            }
            _ if is_float => TokenKind::DoubleLiteral,
            _ => TokenKind::IntLiteral,
        };

        if self.cursor.check(is_ident_continue) {
            self.cursor.eat_while(is_ident_continue);
            let span = self.span_from(start);
            return self.make_error(
                LexError::InvalidNumber {
                    span,
                    detail: "invalid suffix".to_string(),
                },
                start,
            );
        }

        self.make_token(kind, start)
    }

    fn consume_digits(&mut self) {
        self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
    }

    fn scan_identifier(&mut self, start: (u32, u32, u32)) -> Token<'src> {
        let lexeme = self.cursor.eat_while(is_ident_continue);
        let kind = lookup_keyword(lexeme).unwrap_or(TokenKind::Identifier);
        self.make_token(kind, start)
    }

    fn scan_operator(&mut self, start: (u32, u32, u32)) -> Token<'src> {
        let Some(c) = self.cursor.advance() else {
            return self.make_token(TokenKind::Eof, start);
        };
        let next = self.cursor.peek();

        let kind = match (c, next) {
            ('(', _) => TokenKind::LeftParen,
            (')', _) => TokenKind::RightParen,
            ('[', _) => TokenKind::LeftBracket,
            (']', _) => TokenKind::RightBracket,
            ('{', _) => TokenKind::LeftBrace,
            ('}', _) => TokenKind::RightBrace,
            (';', _) => TokenKind::Semicolon,
            (',', _) => TokenKind::Comma,
            ('.', _) => TokenKind::Dot,

            ('+', Some('=')) => { self.cursor.advance(); TokenKind::PlusEqual }
            ('+', _) => TokenKind::Plus,
            ('-', Some('=')) => { self.cursor.advance(); TokenKind::MinusEqual }
            ('-', _) => TokenKind::Minus,
            ('*', Some('=')) => { self.cursor.advance(); TokenKind::StarEqual }
            ('*', _) => TokenKind::Star,
            ('/', Some('=')) => { self.cursor.advance(); TokenKind::SlashEqual }
            ('/', _) => TokenKind::Slash,
            ('%', _) => TokenKind::Percent,

            ('=', Some('=')) => { self.cursor.advance(); TokenKind::EqualEqual }
            ('=', _) => TokenKind::Equal,
            ('!', Some('=')) => { self.cursor.advance(); TokenKind::BangEqual }
            ('!', _) => TokenKind::Bang,
            ('<', Some('=')) => { self.cursor.advance(); TokenKind::LessEqual }
            ('<', _) => TokenKind::Less,
            ('>', Some('=')) => { self.cursor.advance(); TokenKind::GreaterEqual }
            ('>', _) => TokenKind::Greater,

            ('&', Some('&')) => { self.cursor.advance(); TokenKind::AmpAmp }
            ('|', Some('|')) => { self.cursor.advance(); TokenKind::PipePipe }

            _ => {
                let span = self.span_from(start);
                return self.make_error(LexError::UnexpectedChar { ch: c, span }, start);
            }
        };

        self.make_token(kind, start)
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}
