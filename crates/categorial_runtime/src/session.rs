//! Session state for the REPL and CLI.
//!
//! The session holds the loaded grammar, the parse limits, and the
//! generator seed shared by successive `:gen` commands.

use std::fs;
use std::path::{Path, PathBuf};

use categorial_engine::{ChartStats, Parse, ParseConfig, Parser};
use categorial_foundation::{Error, ErrorKind, Result};
use categorial_grammar::{Generator, Grammar};

use crate::serialize;

/// File extension of grammar snapshots.
pub const SNAPSHOT_EXTENSION: &str = "msgpack";

/// Session state for an interactive session or a batch run.
pub struct Session {
    /// The loaded grammar, if any.
    grammar: Option<Grammar>,

    /// File the grammar was loaded from.
    grammar_path: Option<PathBuf>,

    /// Directory for relative path resolution.
    load_path: PathBuf,

    /// Limits applied to every parse.
    config: ParseConfig,

    /// Statistics of the most recent parse.
    last_stats: Option<ChartStats>,

    /// Seed for the next generated sentence.
    seed: u64,
}

impl Session {
    /// Creates a session with no grammar.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grammar: None,
            grammar_path: None,
            load_path: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config: ParseConfig::default(),
            last_stats: None,
            seed: 0,
        }
    }

    /// Creates a session around an already built grammar.
    #[must_use]
    pub fn with_grammar(grammar: Grammar) -> Self {
        let mut session = Self::new();
        session.grammar = Some(grammar);
        session
    }

    /// Sets the parse limits.
    #[must_use]
    pub fn with_config(mut self, config: ParseConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the generator seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the loaded grammar.
    #[must_use]
    pub const fn grammar(&self) -> Option<&Grammar> {
        self.grammar.as_ref()
    }

    /// Returns the loaded grammar mutably.
    pub fn grammar_mut(&mut self) -> Option<&mut Grammar> {
        self.grammar.as_mut()
    }

    /// Returns the loaded grammar, or an error if none is loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if no grammar has been loaded.
    pub fn require_grammar(&self) -> Result<&Grammar> {
        self.grammar
            .as_ref()
            .ok_or_else(|| Error::internal("no grammar loaded (use :load PATH)"))
    }

    /// Returns the file the grammar was loaded from.
    #[must_use]
    pub fn grammar_path(&self) -> Option<&Path> {
        self.grammar_path.as_deref()
    }

    /// Returns the current load path.
    #[must_use]
    pub const fn load_path(&self) -> &PathBuf {
        &self.load_path
    }

    /// Sets the load path.
    pub fn set_load_path(&mut self, path: PathBuf) {
        self.load_path = path;
    }

    /// Resolves a path relative to the load path.
    #[must_use]
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let p = PathBuf::from(path);
        if p.is_absolute() {
            p
        } else {
            self.load_path.join(p)
        }
    }

    /// Returns the parse limits.
    #[must_use]
    pub const fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Replaces the parse limits.
    pub fn set_config(&mut self, config: ParseConfig) {
        self.config = config;
    }

    /// Statistics of the most recent successful parse.
    #[must_use]
    pub const fn last_stats(&self) -> Option<&ChartStats> {
        self.last_stats.as_ref()
    }

    /// Loads a grammar from source, or from a snapshot when the file has
    /// the snapshot extension, replacing the current one.
    ///
    /// Flags set on the previous grammar are not carried over.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the grammar is
    /// malformed. Grammar errors carry the file name and position.
    pub fn load_grammar(&mut self, path: &str) -> Result<&Grammar> {
        let resolved = self.resolve_path(path);
        let is_snapshot = resolved
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(SNAPSHOT_EXTENSION));

        let grammar = if is_snapshot {
            serialize::load_from_file(&resolved)?
        } else {
            let source = fs::read_to_string(&resolved).map_err(|e| {
                Error::io(format!("failed to read {}: {e}", resolved.display()))
            })?;
            Grammar::from_source(&source).map_err(|e| with_file_context(e, &resolved))?
        };

        tracing::info!(
            path = %resolved.display(),
            words = grammar.word_count(),
            entries = grammar.entry_count(),
            "loaded grammar"
        );

        if let Some(parent) = resolved.parent() {
            self.load_path = parent.to_path_buf();
        }
        self.grammar_path = Some(resolved);
        self.last_stats = None;
        Ok(self.grammar.insert(grammar))
    }

    /// Parses a whitespace-separated sentence with the loaded grammar.
    ///
    /// # Errors
    ///
    /// Returns an error if no grammar is loaded or a parse limit is
    /// exceeded.
    pub fn parse(&mut self, sentence: &str) -> Result<Parse> {
        let grammar = self.require_grammar()?;
        let parse = Parser::new(grammar)
            .with_config(self.config)
            .parse_sentence(sentence)?;
        self.last_stats = Some(parse.stats());
        Ok(parse)
    }

    /// Generates up to `count` sentences of the start category.
    ///
    /// Each sentence uses the next seed, so repeated calls continue the
    /// sequence instead of repeating it. Targets the generator cannot
    /// reach within its depth bound are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if no grammar is loaded.
    pub fn generate(&mut self, count: usize) -> Result<Vec<String>> {
        let first_seed = self.seed;
        let grammar = self.require_grammar()?;
        let sentences: Vec<String> = (0..count as u64)
            .filter_map(|offset| {
                Generator::new(grammar, first_seed.wrapping_add(offset))
                    .sentence()
                    .map(|words| words.join(" "))
            })
            .collect();
        self.seed = first_seed.wrapping_add(count as u64);
        Ok(sentences)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Attaches the file name, and the position of grammar errors, to an error.
fn with_file_context(mut error: Error, path: &Path) -> Error {
    let mut context = error.context.take().unwrap_or_default();
    if context.source.is_none() {
        context.source = Some(path.display().to_string());
    }
    if context.line.is_none() {
        if let ErrorKind::Grammar { line, column, .. } = &error.kind {
            context = context.with_position(*line as usize, *column as usize);
        }
    }
    error.with_context(context)
}
