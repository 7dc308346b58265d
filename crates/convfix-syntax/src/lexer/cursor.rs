/// Character reader for the lexer.
///
/// Positions are byte offsets into the source. The line number is counted
/// as newlines are consumed; the column is derived from the offset of the
/// current line's first byte, so it is byte-based as well.
pub struct Cursor<'src> {
    source: &'src str,
    pos: usize,
    line: u32,
    line_start: usize,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            line_start: 0,
        }
    }

    #[inline]
    pub fn offset(&self) -> u32 {
        self.pos as u32
    }

    /// 1-based line of the next character.
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// 1-based byte column of the next character.
    #[inline]
    pub fn column(&self) -> u32 {
        (self.pos - self.line_start) as u32 + 1
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    #[inline]
    fn remaining(&self) -> &'src str {
        &self.source[self.pos..]
    }

    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// The character `n` positions ahead; `peek_nth(0)` is `peek()`.
    #[inline]
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining().chars().nth(n)
    }

    #[inline]
    pub fn check(&self, pred: impl Fn(char) -> bool) -> bool {
        matches!(self.peek(), Some(ch) if pred(ch))
    }

    /// Step over one character and return it.
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.line_start = self.pos;
        }
        Some(ch)
    }

    /// Step over `expected` if it is next.
    #[inline]
    pub fn eat(&mut self, expected: char) -> bool {
        let hit = self.peek() == Some(expected);
        if hit {
            self.pos += expected.len_utf8();
            if expected == '\n' {
                self.line += 1;
                self.line_start = self.pos;
            }
        }
        hit
    }

    /// Step over the longest run matching `pred` and return it.
    pub fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'src str {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.advance();
        }
        &self.source[start..self.pos]
    }

    /// Source text from `start` up to the current position.
    #[inline]
    pub fn slice_from(&self, start: u32) -> &'src str {
        &self.source[start as usize..self.pos]
    }
}

#[inline]
pub fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

#[inline]
pub fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}
