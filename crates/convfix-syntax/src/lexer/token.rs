//! Token types for the convfix lexer.

use convfix_core::Span;
use std::fmt;

/// A token from the source code.
#[derive(Clone, Copy, PartialEq)]
pub struct Token<'src> {
    /// The type of token.
    pub kind: TokenKind,
    /// The source text of this token.
    pub lexeme: &'src str,
    /// Location in source.
    pub span: Span,
}

impl<'src> Token<'src> {
    /// Create a new token.
    #[inline]
    pub fn new(kind: TokenKind, lexeme: &'src str, span: Span) -> Self {
        Self { kind, lexeme, span }
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?} @ {:?})", self.kind, self.lexeme, self.span)
    }
}

/// All token types.
///
/// Built-in type names (`int`, `long`, ...) and contextual words (`var`,
/// `get`, `set`) are plain identifiers; the parser gives them meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================
    // Literals
    // =========================================
    /// Integer literal: `42`
    IntLiteral,
    /// Long literal: `42L`
    LongLiteral,
    /// Float literal: `3.14f`
    FloatLiteral,
    /// Double literal: `3.14`, `1e10`
    DoubleLiteral,
    /// String literal: `"hello"`
    StringLiteral,

    /// User-defined identifier
    Identifier,

    // =========================================
    // Keywords
    // =========================================
    /// `class`
    Class,
    /// `return`
    Return,
    /// `yield`
    Yield,
    /// `if`
    If,
    /// `else`
    Else,
    /// `while`
    While,
    /// `do`
    Do,
    /// `break`
    Break,
    /// `continue`
    Continue,
    /// `new`
    New,
    /// `cast`
    Cast,
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,

    // =========================================
    // Operators
    // =========================================
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `=`
    Equal,
    /// `+=`
    PlusEqual,
    /// `-=`
    MinusEqual,
    /// `*=`
    StarEqual,
    /// `/=`
    SlashEqual,
    /// `==`
    EqualEqual,
    /// `!=`
    BangEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `&&`
    AmpAmp,
    /// `||`
    PipePipe,
    /// `!`
    Bang,

    // =========================================
    // Delimiters
    // =========================================
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `.`
    Dot,

    /// End of input
    Eof,
    /// Lexer error placeholder
    Error,
}

impl TokenKind {
    /// Whether this is a keyword.
    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Class
                | Return
                | Yield
                | If
                | Else
                | While
                | Do
                | Break
                | Continue
                | New
                | Cast
                | True
                | False
                | Null
        )
    }

    /// Whether this is a literal.
    pub fn is_literal(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            IntLiteral | LongLiteral | FloatLiteral | DoubleLiteral | StringLiteral
        )
    }

    /// Whether this is an assignment operator.
    pub fn is_assignment(self) -> bool {
        use TokenKind::*;
        matches!(self, Equal | PlusEqual | MinusEqual | StarEqual | SlashEqual)
    }

    /// Human-readable description for error messages.
    pub fn description(self) -> &'static str {
        use TokenKind::*;
        match self {
            IntLiteral => "integer literal",
            LongLiteral => "long literal",
            FloatLiteral => "float literal",
            DoubleLiteral => "double literal",
            StringLiteral => "string literal",
            Identifier => "identifier",
            Class => "'class'",
            Return => "'return'",
            Yield => "'yield'",
            If => "'if'",
            Else => "'else'",
            While => "'while'",
            Do => "'do'",
            Break => "'break'",
            Continue => "'continue'",
            New => "'new'",
            Cast => "'cast'",
            True => "'true'",
            False => "'false'",
            Null => "'null'",
            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Slash => "'/'",
            Percent => "'%'",
            Equal => "'='",
            PlusEqual => "'+='",
            MinusEqual => "'-='",
            StarEqual => "'*='",
            SlashEqual => "'/='",
            EqualEqual => "'=='",
            BangEqual => "'!='",
            Less => "'<'",
            LessEqual => "'<='",
            Greater => "'>'",
            GreaterEqual => "'>='",
            AmpAmp => "'&&'",
            PipePipe => "'||'",
            Bang => "'!'",
            LeftParen => "'('",
            RightParen => "')'",
            LeftBrace => "'{'",
            RightBrace => "'}'",
            LeftBracket => "'['",
            RightBracket => "']'",
            Semicolon => "';'",
            Comma => "','",
            Dot => "'.'",
            Eof => "end of file",
            Error => "error",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Map a keyword string to its [`TokenKind`], or `None` if not a keyword.
pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match ident {
        "class" => Class,
        "return" => Return,
        "yield" => Yield,
        "if" => If,
        "else" => Else,
        "while" => While,
        "do" => Do,
        "break" => Break,
        "continue" => Continue,
        "new" => New,
        "cast" => Cast,
        "true" => True,
        "false" => False,
        "null" => Null,
        _ => return None,
    })
}
