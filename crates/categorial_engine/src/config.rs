//! Parse limits.
//!
//! A sentence with many tied best derivations can produce exponentially many
//! trees. [`ParseConfig`] bounds the input length and the number of trees the
//! reconstructor is allowed to materialise.

use categorial_foundation::{Error, ParseLimit, Result};

/// Default cap on materialised derivations.
pub const DEFAULT_MAX_DERIVATIONS: usize = 10_000;

/// Limits applied to a single parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseConfig {
    /// Longest accepted sentence, in tokens. `None` is unbounded.
    pub max_tokens: Option<usize>,
    /// Most tied-best derivations returned. `None` is unbounded.
    pub max_derivations: Option<usize>,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_tokens: None,
            max_derivations: Some(DEFAULT_MAX_DERIVATIONS),
        }
    }
}

impl ParseConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration without any limit.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_tokens: None,
            max_derivations: None,
        }
    }

    /// Sets the maximum sentence length.
    #[must_use]
    pub const fn with_max_tokens(mut self, max: usize) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Sets the maximum number of derivations.
    #[must_use]
    pub const fn with_max_derivations(mut self, max: usize) -> Self {
        self.max_derivations = Some(max);
        self
    }

    /// Checks a sentence length against `max_tokens`.
    ///
    /// # Errors
    /// Returns `LimitExceeded` if the sentence is too long.
    pub fn check_tokens(&self, actual: usize) -> Result<()> {
        match self.max_tokens {
            Some(limit) if actual > limit => Err(Error::limit_exceeded(ParseLimit::MaxTokens {
                limit,
                actual,
            })),
            _ => Ok(()),
        }
    }

    /// Checks a derivation count against `max_derivations`.
    ///
    /// # Errors
    /// Returns `LimitExceeded` if there are too many derivations.
    pub fn check_derivations(&self, actual: usize) -> Result<()> {
        match self.max_derivations {
            Some(limit) if actual > limit => Err(Error::limit_exceeded(
                ParseLimit::MaxDerivations { limit, actual },
            )),
            _ => Ok(()),
        }
    }
}
