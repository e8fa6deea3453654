//! Error types for the Categorial system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! A sentence that has no derivation is not an error: parsing returns an
//! empty derivation set instead.

use std::fmt;

use thiserror::Error;

/// The main error type for Categorial operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an unknown category error.
    #[must_use]
    pub fn unknown_category(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownCategory(name.into()))
    }

    /// Creates an error for features attached to a functional shortcut.
    #[must_use]
    pub fn featured_functional(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::FeaturedFunctional(name.into()))
    }

    /// Creates a parse limit exceeded error.
    #[must_use]
    pub fn limit_exceeded(limit: ParseLimit) -> Self {
        Self::new(ErrorKind::LimitExceeded(limit))
    }

    /// Creates an I/O error.
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io(message.into()))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Malformed grammar source.
    #[error("grammar error at {line}:{column}: {message}")]
    Grammar {
        /// Description of the problem.
        message: String,
        /// Line number (1-indexed).
        line: u32,
        /// Column number (1-indexed).
        column: u32,
        /// The source line where the error occurred.
        context: String,
    },

    /// A primitive category that is neither declared nor a shortcut.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// Features were attached to a shortcut that expands to a functional category.
    #[error("cannot attach features to functional shortcut: {0}")]
    FeaturedFunctional(String),

    /// The grammar declares no start category.
    #[error("grammar has no start category (missing `:-` declaration)")]
    MissingStartType,

    /// A parse limit was exceeded.
    #[error("limit exceeded: {0}")]
    LimitExceeded(ParseLimit),

    /// I/O failure while reading or writing files.
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Parse limits (kill switches) that can be exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseLimit {
    /// Sentence longer than the configured maximum.
    MaxTokens {
        /// The configured limit.
        limit: usize,
        /// Length of the rejected sentence.
        actual: usize,
    },
    /// More tied-best derivations than the configured maximum.
    MaxDerivations {
        /// The configured limit.
        limit: usize,
        /// Number of derivations the chart holds (saturating).
        actual: usize,
    },
}

impl fmt::Display for ParseLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxTokens { limit, actual } => {
                write!(f, "max tokens ({limit}) exceeded: sentence has {actual}")
            }
            Self::MaxDerivations { limit, actual } => {
                write!(f, "max derivations ({limit}) exceeded")?;
                if *actual == usize::MAX {
                    write!(f, ": count overflowed")
                } else {
                    write!(f, ": chart holds {actual}")
                }
            }
        }
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Source file name.
    pub source: Option<String>,
    /// Line number in source.
    pub line: Option<usize>,
    /// Column number in source.
    pub column: Option<usize>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the line and column.
    #[must_use]
    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
            if let (Some(line), Some(col)) = (self.line, self.column) {
                write!(f, ":{line}:{col}")?;
            }
        }
        Ok(())
    }
}

/// Result type alias for Categorial operations.
pub type Result<T> = std::result::Result<T, Error>;
