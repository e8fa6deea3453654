//! Lexer for grammar source.
//!
//! The lexer converts one line of grammar source into a stream of tokens.
//! Statements never span lines, so the parser feeds it line by line and
//! tells it the line number to stamp on every span.

use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Lexer over a single line of grammar source.
pub struct Lexer<'src> {
    /// Source line being tokenized.
    source: &'src str,
    /// Remaining source text.
    rest: &'src str,
    /// Current byte offset in source.
    position: usize,
    /// Line number stamped on spans (1-based).
    line: u32,
    /// Current column number (1-based, in characters).
    column: u32,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer for the given source, starting on line 1.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self::starting_at(source, 0, 1)
    }

    /// Creates a lexer that starts at byte `offset` of `source`, which is
    /// line `line` of a larger file.
    ///
    /// `offset` must lie on a character boundary.
    #[must_use]
    pub fn starting_at(source: &'src str, offset: usize, line: u32) -> Self {
        let prefix_chars = source[..offset].chars().count();
        Self {
            source,
            rest: &source[offset..],
            position: offset,
            line,
            column: u32::try_from(prefix_chars + 1).unwrap_or(u32::MAX),
        }
    }

    /// Returns the next token from the source.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.position;
        let start_column = self.column;

        let Some(c) = self.peek_char() else {
            return Token::new(
                TokenKind::Eof,
                Span::new(start, start, self.line, start_column),
            );
        };

        let kind = match c {
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '/' => self.single(TokenKind::Slash),
            '\\' => self.single(TokenKind::Backslash),
            ',' => self.single(TokenKind::Comma),
            '.' => self.single(TokenKind::Dot),
            '&' => self.single(TokenKind::Amp),
            '=' => {
                self.advance();
                if self.peek_char() == Some('>') {
                    self.advance();
                    TokenKind::Arrow
                } else {
                    TokenKind::Equals
                }
            }
            ':' => self.scan_colon(),
            '#' => self.scan_comment(),
            '"' => self.scan_string(),
            c if c.is_ascii_digit() => self.scan_number(),
            '-' if self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit()) => self.scan_number(),
            c if is_ident_start(c) => self.scan_ident(),
            c => {
                self.advance();
                TokenKind::Error(format!("unexpected character: {c}"))
            }
        };

        Token::new(
            kind,
            Span::new(start, self.position, self.line, start_column),
        )
    }

    /// Tokenizes the whole source and returns a vector of tokens ending in `Eof`.
    ///
    /// Comments are included in the output.
    #[must_use]
    pub fn tokenize_all(source: &str) -> Vec<Token> {
        Lexer::new(source).collect_tokens()
    }

    /// Drains this lexer into a vector of tokens ending in `Eof`.
    #[must_use]
    pub fn collect_tokens(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Peeks `n` characters ahead.
    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    /// Advances past the next character.
    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            let len = c.len_utf8();
            self.rest = &self.rest[len..];
            self.position += len;
            self.column += 1;
        }
    }

    /// Consumes one character and yields `kind`.
    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Scans `::` or `:-`.
    fn scan_colon(&mut self) -> TokenKind {
        self.advance(); // consume ':'
        match self.peek_char() {
            Some(':') => self.single(TokenKind::DoubleColon),
            Some('-') => self.single(TokenKind::Turnstile),
            Some(c) => TokenKind::Error(format!("unexpected character after ':': {c}")),
            None => TokenKind::Error("unexpected end of line after ':'".into()),
        }
    }

    /// Scans a comment starting with `#` up to the end of the line.
    fn scan_comment(&mut self) -> TokenKind {
        let start = self.position;
        while self.peek_char().is_some_and(|c| c != '\n') {
            self.advance();
        }
        TokenKind::Comment(self.source[start..self.position].to_string())
    }

    /// Scans a string literal.
    fn scan_string(&mut self) -> TokenKind {
        self.advance(); // consume opening '"'
        let mut text = String::new();
        loop {
            match self.peek_char() {
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.peek_char() {
                        Some(c @ ('\\' | '"')) => {
                            self.advance();
                            text.push(c);
                        }
                        Some(c) => {
                            return TokenKind::Error(format!("invalid escape sequence: \\{c}"));
                        }
                        None => {
                            return TokenKind::Error(
                                "unexpected end of line in string escape".into(),
                            );
                        }
                    }
                }
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
                None => {
                    return TokenKind::Error("unterminated string literal".into());
                }
            }
        }
        TokenKind::String(text)
    }

    /// Scans a number with an optional sign and fraction.
    fn scan_number(&mut self) -> TokenKind {
        let start = self.position;
        let mut has_dot = false;

        if self.peek_char() == Some('-') {
            self.advance();
        }

        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                self.advance();
            } else if c == '.'
                && !has_dot
                && self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit())
            {
                has_dot = true;
                self.advance();
            } else {
                break;
            }
        }

        let text = &self.source[start..self.position];
        match text.parse::<f64>() {
            Ok(n) => TokenKind::Number(n),
            Err(e) => TokenKind::Error(format!("invalid number: {e}")),
        }
    }

    /// Scans an identifier.
    fn scan_ident(&mut self) -> TokenKind {
        let start = self.position;
        while self.peek_char().is_some_and(is_ident_char) {
            self.advance();
        }
        TokenKind::Ident(self.source[start..self.position].to_string())
    }
}

/// Returns true if `c` can start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Returns true if `c` can appear in an identifier (not at start).
fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '\'')
}
