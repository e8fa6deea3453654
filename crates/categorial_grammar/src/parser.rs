//! Parser for grammar source.
//!
//! Grammar files are line oriented. Each non-blank line that is not a
//! comment holds one statement:
//!
//! ```text
//! :- Phrase, GrNom, Nom                     # start type and declared primitives
//! GrNomM :: GrNom[Masc]                     # shortcut
//! Le => GrNomM/Nom[Masc] {\P R. exists x. P(x) & R(x)}
//! dort => (2) Phrase\GrNom {\x. dort(x)}    # lexical weight
//! "s'" => Pron                              # quoted word
//! Weight("<", GrNom, Phrase\GrNom) = 1.5    # rule weight override
//! ```
//!
//! The parser only builds [`Statement`]s. Shortcut expansion and primitive
//! validation happen when the statements are assembled into a
//! [`Grammar`](crate::Grammar).

use categorial_foundation::{Category, Error, ErrorKind, Features, Result, Slash, Term, VarId};

use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Keyword introducing a rule weight statement.
pub const WEIGHT_KEYWORD: &str = "Weight";

/// Keyword introducing an existential binder in terms.
pub const EXISTS_KEYWORD: &str = "exists";

/// A parsed grammar statement with the span of its first token.
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    /// What the statement says.
    pub kind: StatementKind,
    /// Where it starts.
    pub span: Span,
}

/// The statements a grammar file can contain.
#[derive(Clone, Debug, PartialEq)]
pub enum StatementKind {
    /// `:- A, B, C`: the first category is the start type, every name is a
    /// declared primitive.
    Declare(Vec<Category>),
    /// `Name :: Category`
    Shortcut {
        /// Shortcut name.
        name: String,
        /// Category it stands for (not yet expanded).
        category: Category,
    },
    /// `word => (weight) Category {term}`
    Entry {
        /// Surface token.
        word: String,
        /// Explicit lexical weight, if any.
        weight: Option<f64>,
        /// Category (not yet expanded).
        category: Category,
        /// Semantic template, if any.
        semantics: Option<Term>,
    },
    /// `Weight("rule", A, B) = w`
    RuleWeight {
        /// Combinator symbol.
        rule: String,
        /// Premise categories, left to right.
        premises: Vec<Category>,
        /// Weight override.
        weight: f64,
    },
}

/// Parser for a single statement line.
pub struct Parser<'src> {
    /// Non-trivia tokens of the line, ending in `Eof`.
    tokens: Vec<Token>,
    /// Index of the current token.
    position: usize,
    /// The full source line (for error messages).
    source: &'src str,
    /// Variables bound by enclosing binders while parsing a term.
    bound: Vec<String>,
}

impl<'src> Parser<'src> {
    /// Creates a parser over `source` starting at byte `offset`, which is
    /// line `line` of the grammar file.
    #[must_use]
    pub fn new(source: &'src str, offset: usize, line: u32) -> Self {
        let tokens = Lexer::starting_at(source, offset, line)
            .collect_tokens()
            .into_iter()
            .filter(|token| !token.kind.is_trivia())
            .collect();
        Self {
            tokens,
            position: 0,
            source,
            bound: Vec::new(),
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Parses `:- A, B, C`.
    ///
    /// # Errors
    /// Returns an error if the line is malformed.
    pub fn parse_declaration(&mut self) -> Result<Statement> {
        let span = self.expect(&TokenKind::Turnstile)?;
        let mut categories = vec![self.parse_category()?];
        while self.eat(&TokenKind::Comma) {
            categories.push(self.parse_category()?);
        }
        self.expect_end()?;
        Ok(Statement {
            kind: StatementKind::Declare(categories),
            span,
        })
    }

    /// Parses `Name :: Category`.
    ///
    /// # Errors
    /// Returns an error if the line is malformed.
    pub fn parse_shortcut(&mut self) -> Result<Statement> {
        let (name, span) = self.expect_ident()?;
        self.expect(&TokenKind::DoubleColon)?;
        let category = self.parse_category()?;
        self.expect_end()?;
        Ok(Statement {
            kind: StatementKind::Shortcut { name, category },
            span,
        })
    }

    /// Parses the part of a lexicon entry from `=>` onwards.
    ///
    /// # Errors
    /// Returns an error if the line is malformed.
    pub fn parse_entry(&mut self, word: String, span: Span) -> Result<Statement> {
        self.expect(&TokenKind::Arrow)?;

        let weight = if self.current().kind == TokenKind::LParen
            && matches!(self.peek_kind(1), TokenKind::Number(_))
            && *self.peek_kind(2) == TokenKind::RParen
        {
            self.advance();
            let weight = self.expect_number()?;
            self.expect(&TokenKind::RParen)?;
            Some(weight)
        } else {
            None
        };

        let category = self.parse_category()?;

        let semantics = if self.eat(&TokenKind::LBrace) {
            let term = self.parse_term()?;
            self.expect(&TokenKind::RBrace)?;
            Some(term)
        } else {
            None
        };

        self.expect_end()?;
        Ok(Statement {
            kind: StatementKind::Entry {
                word,
                weight,
                category,
                semantics,
            },
            span,
        })
    }

    /// Parses `Weight("rule", A, B) = w`.
    ///
    /// # Errors
    /// Returns an error if the line is malformed.
    pub fn parse_rule_weight(&mut self) -> Result<Statement> {
        let (keyword, span) = self.expect_ident()?;
        if keyword != WEIGHT_KEYWORD {
            return Err(self.error_at(span, &format!("expected '{WEIGHT_KEYWORD}'")));
        }
        self.expect(&TokenKind::LParen)?;
        let rule = match &self.current().kind {
            TokenKind::String(rule) => rule.clone(),
            _ => return Err(self.unexpected("rule name string")),
        };
        self.advance();

        let mut premises = Vec::new();
        while self.eat(&TokenKind::Comma) {
            premises.push(self.parse_category()?);
        }
        if premises.is_empty() {
            return Err(self.error("expected at least one premise category"));
        }
        self.expect(&TokenKind::RParen)?;
        self.expect(&TokenKind::Equals)?;
        let weight = self.expect_number()?;
        self.expect_end()?;

        Ok(Statement {
            kind: StatementKind::RuleWeight {
                rule,
                premises,
                weight,
            },
            span,
        })
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Parses a category. Slashes associate to the left.
    ///
    /// # Errors
    /// Returns an error if the tokens do not form a category.
    pub fn parse_category(&mut self) -> Result<Category> {
        let mut category = self.parse_category_atom()?;
        loop {
            let slash = match self.current().kind {
                TokenKind::Slash => Slash::Right,
                TokenKind::Backslash => Slash::Left,
                _ => break,
            };
            self.advance();
            let argument = self.parse_category_atom()?;
            category = Category::functional(category, slash, argument);
        }
        Ok(category)
    }

    fn parse_category_atom(&mut self) -> Result<Category> {
        match &self.current().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                let features = if self.current().kind == TokenKind::LBracket {
                    self.parse_features()?
                } else {
                    Features::new()
                };
                Ok(Category::Primitive { name, features })
            }
            TokenKind::LParen => {
                self.advance();
                let category = self.parse_category()?;
                self.expect(&TokenKind::RParen)?;
                Ok(category)
            }
            _ => Err(self.unexpected("category")),
        }
    }

    /// Parses `[Tag]` or `[name=value, ...]`.
    fn parse_features(&mut self) -> Result<Features> {
        self.expect(&TokenKind::LBracket)?;
        let mut features = Features::new();
        loop {
            let (first, _) = self.expect_ident()?;
            if self.eat(&TokenKind::Equals) {
                let value = self.expect_feature_value()?;
                features.insert(first, value);
            } else {
                features.insert(Category::TAG.to_string(), first);
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBracket)?;
        Ok(features)
    }

    fn expect_feature_value(&mut self) -> Result<String> {
        let value = match &self.current().kind {
            TokenKind::Ident(value) => value.clone(),
            TokenKind::Number(n) => n.to_string(),
            _ => return Err(self.unexpected("feature value")),
        };
        self.advance();
        Ok(value)
    }

    // =========================================================================
    // Terms
    // =========================================================================

    /// Parses a semantic term.
    ///
    /// Identifiers bound by an enclosing `\` or `exists` become variables,
    /// every other identifier is a constant.
    ///
    /// # Errors
    /// Returns an error if the tokens do not form a term.
    pub fn parse_term(&mut self) -> Result<Term> {
        match &self.current().kind {
            TokenKind::Backslash => {
                self.advance();
                let vars = self.parse_binders()?;
                let body = self.parse_scoped(&vars)?;
                Ok(Term::abstraction(vars, body))
            }
            TokenKind::Ident(name) if name == EXISTS_KEYWORD => {
                self.advance();
                let vars = self.parse_binders()?;
                let body = self.parse_scoped(&vars)?;
                Ok(vars
                    .into_iter()
                    .rev()
                    .fold(body, |body, var| Term::exists(var, body)))
            }
            _ => self.parse_conjunction(),
        }
    }

    /// Parses `x y z .`.
    fn parse_binders(&mut self) -> Result<Vec<VarId>> {
        let mut vars = Vec::new();
        while let TokenKind::Ident(name) = &self.current().kind {
            vars.push(VarId::new(name.clone()));
            self.advance();
        }
        if vars.is_empty() {
            return Err(self.unexpected("bound variable"));
        }
        self.expect(&TokenKind::Dot)?;
        Ok(vars)
    }

    /// Parses a binder body with `vars` in scope.
    fn parse_scoped(&mut self, vars: &[VarId]) -> Result<Term> {
        let depth = self.bound.len();
        self.bound.extend(vars.iter().map(|var| var.name().to_string()));
        let body = self.parse_term();
        self.bound.truncate(depth);
        body
    }

    fn parse_conjunction(&mut self) -> Result<Term> {
        let mut term = self.parse_application()?;
        while self.eat(&TokenKind::Amp) {
            let right = match &self.current().kind {
                TokenKind::Backslash => self.parse_term()?,
                TokenKind::Ident(name) if name == EXISTS_KEYWORD => self.parse_term()?,
                _ => self.parse_application()?,
            };
            term = Term::conjoin(term, right);
        }
        Ok(term)
    }

    /// Parses juxtaposition: `f a b` applies `f` to `a` then `b`.
    fn parse_application(&mut self) -> Result<Term> {
        let mut term = self.parse_call()?;
        while self.current().starts_operand() && !self.at_keyword(EXISTS_KEYWORD) {
            let arg = self.parse_call()?;
            term = call(term, vec![arg]);
        }
        Ok(term)
    }

    /// Parses a primary followed by any number of `(args)` suffixes.
    fn parse_call(&mut self) -> Result<Term> {
        let mut term = self.parse_primary()?;
        while self.eat(&TokenKind::LParen) {
            let mut args = vec![self.parse_term()?];
            while self.eat(&TokenKind::Comma) {
                args.push(self.parse_term()?);
            }
            self.expect(&TokenKind::RParen)?;
            term = call(term, args);
        }
        Ok(term)
    }

    fn parse_primary(&mut self) -> Result<Term> {
        match &self.current().kind {
            TokenKind::Ident(name) if name != EXISTS_KEYWORD => {
                let term = if self.bound.iter().rev().any(|bound| bound == name) {
                    Term::var(name.clone())
                } else {
                    Term::constant(name.clone())
                };
                self.advance();
                Ok(term)
            }
            TokenKind::LParen => {
                self.advance();
                let term = self.parse_term()?;
                self.expect(&TokenKind::RParen)?;
                Ok(term)
            }
            _ => Err(self.unexpected("term")),
        }
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    fn current(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.position.min(last)]
    }

    fn peek_kind(&self, n: usize) -> &TokenKind {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[(self.position + n).min(last)].kind
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(&self.current().kind, TokenKind::Ident(name) if name == keyword)
    }

    fn advance(&mut self) {
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
    }

    /// Consumes the current token if it has the given kind.
    fn eat(&mut self, kind: &TokenKind) -> bool {
        if std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects the current token to be of a specific kind, then advances.
    fn expect(&mut self, expected: &TokenKind) -> Result<Span> {
        let span = self.current().span;
        if self.eat(expected) {
            Ok(span)
        } else {
            Err(self.unexpected(expected.name()))
        }
    }

    fn expect_ident(&mut self) -> Result<(String, Span)> {
        let token = self.current().clone();
        if let TokenKind::Ident(name) = token.kind {
            self.advance();
            Ok((name, token.span))
        } else {
            Err(self.unexpected("identifier"))
        }
    }

    fn expect_number(&mut self) -> Result<f64> {
        if let TokenKind::Number(n) = self.current().kind {
            self.advance();
            Ok(n)
        } else {
            Err(self.unexpected("number"))
        }
    }

    /// Expects the end of the line.
    fn expect_end(&mut self) -> Result<()> {
        if self.current().kind == TokenKind::Eof {
            Ok(())
        } else {
            Err(self.unexpected("end of line"))
        }
    }

    /// Error for an unexpected current token.
    fn unexpected(&self, expected: &str) -> Error {
        match &self.current().kind {
            TokenKind::Error(message) => self.error(message),
            found => self.error(&format!("expected {expected}, found {}", found.name())),
        }
    }

    /// Creates a parse error at the current position.
    fn error(&self, message: &str) -> Error {
        self.error_at(self.current().span, message)
    }

    /// Creates a parse error at a specific span.
    fn error_at(&self, span: Span, message: &str) -> Error {
        grammar_error(self.source, span, message)
    }
}

/// Applies `head` to `args` the way grammar source reads: a constant head
/// names a predicate, anything else is an unreduced application.
fn call(head: Term, args: Vec<Term>) -> Term {
    match head {
        Term::Const(name) => Term::Predicate(name, args),
        Term::Predicate(name, mut existing) => {
            existing.extend(args);
            Term::Predicate(name, existing)
        }
        other => Term::application(other, args),
    }
}

fn grammar_error(line: &str, span: Span, message: &str) -> Error {
    Error::new(ErrorKind::Grammar {
        message: message.to_string(),
        line: span.line,
        column: span.column,
        context: line.to_string(),
    })
}

/// Span of the first character at byte `offset` of `line`.
fn span_at(line: &str, offset: usize, line_no: u32) -> Span {
    let column = u32::try_from(line[..offset].chars().count() + 1).unwrap_or(u32::MAX);
    Span::new(offset, offset, line_no, column)
}

/// Returns true if `text` starts a `Weight(...)` statement.
fn is_rule_weight(text: &str) -> bool {
    text.strip_prefix(WEIGHT_KEYWORD)
        .is_some_and(|rest| rest.trim_start().starts_with('('))
}

/// Parses one line. Blank lines and comment lines yield `None`.
fn parse_line(line: &str, line_no: u32) -> Result<Option<Statement>> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let indent = line.len() - trimmed.len();

    let statement = if trimmed.starts_with(":-") {
        Parser::new(line, indent, line_no).parse_declaration()?
    } else if is_rule_weight(trimmed) {
        Parser::new(line, indent, line_no).parse_rule_weight()?
    } else if let Some(arrow) = line.find("=>") {
        let span = span_at(line, indent, line_no);
        let word = line[..arrow].trim();
        if word.is_empty() {
            return Err(grammar_error(line, span, "expected a word before '=>'"));
        }
        if word.contains(char::is_whitespace) {
            return Err(grammar_error(
                line,
                span,
                &format!("lexicon word must be a single token: {word}"),
            ));
        }
        let word = word
            .strip_prefix('"')
            .and_then(|w| w.strip_suffix('"'))
            .unwrap_or(word)
            .to_string();
        Parser::new(line, arrow, line_no).parse_entry(word, span)?
    } else if line.contains("::") {
        Parser::new(line, indent, line_no).parse_shortcut()?
    } else {
        return Err(grammar_error(
            line,
            span_at(line, indent, line_no),
            "expected a declaration (':-'), shortcut ('::'), lexicon entry ('=>') or rule weight",
        ));
    };
    Ok(Some(statement))
}

/// Parses grammar source into statements.
///
/// # Errors
/// Returns an error for the first malformed line.
pub fn parse(source: &str) -> Result<Vec<Statement>> {
    let mut statements = Vec::new();
    for (index, line) in source.lines().enumerate() {
        let line_no = u32::try_from(index + 1).unwrap_or(u32::MAX);
        if let Some(statement) = parse_line(line, line_no)? {
            statements.push(statement);
        }
    }
    Ok(statements)
}

/// Parses a standalone category such as `(S\NP)/NP`.
///
/// # Errors
/// Returns an error if the text is not exactly one category.
pub fn parse_category(text: &str) -> Result<Category> {
    let mut parser = Parser::new(text, 0, 1);
    let category = parser.parse_category()?;
    parser.expect_end()?;
    Ok(category)
}

/// Parses a standalone semantic term such as `\x. chat(x)`.
///
/// # Errors
/// Returns an error if the text is not exactly one term.
pub fn parse_term(text: &str) -> Result<Term> {
    let mut parser = Parser::new(text, 0, 1);
    let term = parser.parse_term()?;
    parser.expect_end()?;
    Ok(term)
}
