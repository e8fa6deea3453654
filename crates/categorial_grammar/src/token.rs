//! Token types for grammar source.
//!
//! Tokens are the output of the lexer and input to the parser.

use crate::span::Span;

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The type and value of this token.
    pub kind: TokenKind,
    /// Source location of this token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this token can begin a semantic term operand.
    #[must_use]
    pub const fn starts_operand(&self) -> bool {
        matches!(self.kind, TokenKind::Ident(_) | TokenKind::LParen)
    }
}

/// Token types for grammar source.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Delimiters
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,

    // Operators
    /// `/`
    Slash,
    /// `\`
    Backslash,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `&`
    Amp,
    /// `=`
    Equals,
    /// `=>` introducing a lexicon entry
    Arrow,
    /// `::` introducing a shortcut
    DoubleColon,
    /// `:-` introducing primitive declarations
    Turnstile,

    // Literals
    /// Identifier like `GrNom` or `mange`
    Ident(String),
    /// Numeric literal like `2` or `1.5`
    Number(f64),
    /// String literal like `"<"`
    String(String),

    // Meta
    /// Comment text (including `#`)
    Comment(String),
    /// End of input
    Eof,
    /// Lexer error
    Error(String),
}

impl TokenKind {
    /// Returns true if this token kind should be ignored during parsing.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self, Self::Comment(_))
    }

    /// Returns a human-readable name for this token kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::Slash => "'/'",
            Self::Backslash => "'\\'",
            Self::Comma => "','",
            Self::Dot => "'.'",
            Self::Amp => "'&'",
            Self::Equals => "'='",
            Self::Arrow => "'=>'",
            Self::DoubleColon => "'::'",
            Self::Turnstile => "':-'",
            Self::Ident(_) => "identifier",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Comment(_) => "comment",
            Self::Eof => "end of line",
            Self::Error(_) => "error",
        }
    }
}
