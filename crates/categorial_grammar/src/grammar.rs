//! The grammar a parse runs against.
//!
//! A [`Grammar`] bundles the start type, the lexicon, rule weight overrides
//! and the two feature switches (type raising, semantics). It is built with
//! the builder methods or loaded from source with [`Grammar::from_source`].
//! Grammars are immutable during a parse and can be shared freely.

use std::fmt;

use categorial_foundation::{Category, Error, ErrorKind, Result, Term};
use im::OrdMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::parser::{self, Statement, StatementKind};
use crate::span::Span;

/// Weight of a lexical entry or rule without an explicit weight.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// One way a token can be read.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LexicalEntry {
    /// Category of the reading.
    pub category: Category,
    /// Lexical weight.
    pub weight: f64,
    /// Semantic template, if any.
    pub semantics: Option<Term>,
}

impl LexicalEntry {
    /// Creates an entry with the default weight and no semantics.
    #[must_use]
    pub fn new(category: Category) -> Self {
        Self {
            category,
            weight: DEFAULT_WEIGHT,
            semantics: None,
        }
    }

    /// Sets the lexical weight.
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Sets the semantic template.
    #[must_use]
    pub fn with_semantics(mut self, semantics: Term) -> Self {
        self.semantics = Some(semantics);
        self
    }
}

impl fmt::Display for LexicalEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if (self.weight - DEFAULT_WEIGHT).abs() > f64::EPSILON {
            write!(f, "({}) ", self.weight)?;
        }
        write!(f, "{}", self.category)?;
        if let Some(semantics) = &self.semantics {
            write!(f, " {{{semantics}}}")?;
        }
        Ok(())
    }
}

/// A weight override for one combinator on particular premises.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RuleWeight {
    /// Combinator symbol, e.g. `"<"` or `"B>"`.
    pub rule: String,
    /// Premise categories, left to right.
    pub premises: Vec<Category>,
    /// Weight applied when the override matches.
    pub weight: f64,
}

impl RuleWeight {
    /// Creates an override.
    #[must_use]
    pub fn new(rule: impl Into<String>, premises: Vec<Category>, weight: f64) -> Self {
        Self {
            rule: rule.into(),
            premises,
            weight,
        }
    }

    /// Returns true if this override covers `rule` fired on `operands`.
    ///
    /// Premises are compared with [`Category::matches`], so a premise
    /// without features covers every featured variant.
    #[must_use]
    pub fn applies(&self, rule: &str, operands: &[&Category]) -> bool {
        self.rule == rule
            && self.premises.len() == operands.len()
            && self
                .premises
                .iter()
                .zip(operands)
                .all(|(premise, operand)| premise.matches(operand))
    }
}

impl fmt::Display for RuleWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(\"{}\"", parser::WEIGHT_KEYWORD, self.rule)?;
        for premise in &self.premises {
            write!(f, ", {premise}")?;
        }
        write!(f, ") = {}", self.weight)
    }
}

/// A weighted combinatory categorial grammar.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Grammar {
    start: Category,
    primitives: Vec<String>,
    lexicon: OrdMap<String, Vec<LexicalEntry>>,
    rule_weights: Vec<RuleWeight>,
    raising_targets: Vec<Category>,
    use_type_raising: bool,
    use_semantics: bool,
}

impl Grammar {
    /// Creates an empty grammar with the given start type.
    ///
    /// Semantics are on, type raising is off, and the start type is the only
    /// raising target.
    #[must_use]
    pub fn new(start: Category) -> Self {
        Self {
            raising_targets: vec![start.clone()],
            start,
            primitives: Vec::new(),
            lexicon: OrdMap::new(),
            rule_weights: Vec::new(),
            use_type_raising: false,
            use_semantics: true,
        }
    }

    /// Loads a grammar from source text.
    ///
    /// # Errors
    /// Returns an error for malformed source, a missing `:-` declaration,
    /// features on a functional shortcut, or an undeclared primitive.
    pub fn from_source(source: &str) -> Result<Self> {
        Self::from_statements(parser::parse(source)?)
    }

    /// Assembles parsed statements into a grammar.
    ///
    /// Shortcuts are expanded in declaration order with a single finite
    /// pass, so a cyclic definition is left partly unexpanded. When `:-`
    /// declarations are present every primitive in the lexicon must be
    /// declared.
    ///
    /// # Errors
    /// See [`Grammar::from_source`].
    pub fn from_statements(statements: Vec<Statement>) -> Result<Self> {
        let mut declared: Vec<Category> = Vec::new();
        let mut shortcuts: Vec<(String, Category, Span)> = Vec::new();
        let mut entries: Vec<(String, LexicalEntry, Span)> = Vec::new();
        let mut weights: Vec<(RuleWeight, Span)> = Vec::new();

        for Statement { kind, span } in statements {
            match kind {
                StatementKind::Declare(categories) => declared.extend(categories),
                StatementKind::Shortcut { name, category } => {
                    shortcuts.push((name, category, span));
                }
                StatementKind::Entry {
                    word,
                    weight,
                    category,
                    semantics,
                } => {
                    let entry = LexicalEntry {
                        category,
                        weight: weight.unwrap_or(DEFAULT_WEIGHT),
                        semantics,
                    };
                    entries.push((word, entry, span));
                }
                StatementKind::RuleWeight {
                    rule,
                    premises,
                    weight,
                } => weights.push((RuleWeight::new(rule, premises, weight), span)),
            }
        }

        for index in 0..shortcuts.len() {
            let (name, value, span) = shortcuts[index].clone();
            let located = |err: Error| err.with_context(span.context());
            for shortcut in &mut shortcuts {
                shortcut.1 = expand(&shortcut.1, &name, &value).map_err(located)?;
            }
            for category in &mut declared {
                *category = expand(category, &name, &value).map_err(located)?;
            }
            for (_, entry, entry_span) in &mut entries {
                entry.category = expand(&entry.category, &name, &value)
                    .map_err(|err| err.with_context(entry_span.context()))?;
            }
            for (weight, weight_span) in &mut weights {
                for premise in &mut weight.premises {
                    *premise = expand(premise, &name, &value)
                        .map_err(|err| err.with_context(weight_span.context()))?;
                }
            }
        }

        let start = declared
            .first()
            .cloned()
            .ok_or_else(|| Error::new(ErrorKind::MissingStartType))?;

        let mut primitives: Vec<String> = Vec::new();
        for category in &declared {
            category.for_each_primitive(&mut |name, _| {
                if !primitives.iter().any(|p| p == name) {
                    primitives.push(name.to_string());
                }
            });
        }

        let mut grammar = Self::new(start);
        grammar.raising_targets = declared.into_iter().filter(Category::is_primitive).collect();
        grammar.primitives = primitives;

        for (word, entry, span) in entries {
            grammar
                .check_declared(&entry.category)
                .map_err(|err| err.with_context(span.context()))?;
            grammar.add_entry(word, entry);
        }
        for (weight, _) in weights {
            grammar.add_rule_weight(weight);
        }
        Ok(grammar)
    }

    // =========================================================================
    // Builder
    // =========================================================================

    /// Adds a lexical entry for `word`.
    pub fn add_entry(&mut self, word: impl Into<String>, entry: LexicalEntry) {
        self.lexicon.entry(word.into()).or_insert_with(Vec::new).push(entry);
    }

    /// Adds a rule weight override. Earlier overrides take precedence.
    pub fn add_rule_weight(&mut self, weight: RuleWeight) {
        self.rule_weights.push(weight);
    }

    /// Builder form of [`Grammar::add_entry`].
    #[must_use]
    pub fn with_entry(mut self, word: impl Into<String>, entry: LexicalEntry) -> Self {
        self.add_entry(word, entry);
        self
    }

    /// Builder form of [`Grammar::add_rule_weight`].
    #[must_use]
    pub fn with_rule_weight(mut self, weight: RuleWeight) -> Self {
        self.add_rule_weight(weight);
        self
    }

    /// Turns type raising on or off.
    #[must_use]
    pub fn with_type_raising(mut self, enabled: bool) -> Self {
        self.use_type_raising = enabled;
        self
    }

    /// Turns semantic composition on or off.
    #[must_use]
    pub fn with_semantics(mut self, enabled: bool) -> Self {
        self.use_semantics = enabled;
        self
    }

    /// Replaces the categories primitives are raised towards.
    #[must_use]
    pub fn with_raising_targets(mut self, targets: Vec<Category>) -> Self {
        self.raising_targets = targets;
        self
    }

    /// Sets the type raising switch in place.
    pub fn set_type_raising(&mut self, enabled: bool) {
        self.use_type_raising = enabled;
    }

    /// Sets the semantics switch in place.
    pub fn set_semantics(&mut self, enabled: bool) {
        self.use_semantics = enabled;
    }

    /// Replaces the start type.
    pub fn set_start(&mut self, start: Category) {
        self.start = start;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Category a complete parse must match.
    #[must_use]
    pub fn start(&self) -> &Category {
        &self.start
    }

    /// Declared primitive names, in declaration order. Empty for grammars
    /// built without declarations.
    #[must_use]
    pub fn primitives(&self) -> &[String] {
        &self.primitives
    }

    /// Lexical entries for `word`, empty if the word is unknown.
    #[must_use]
    pub fn entries(&self, word: &str) -> &[LexicalEntry] {
        self.lexicon.get(word).map_or(&[], Vec::as_slice)
    }

    /// Iterates over every word and its entries, in word order.
    pub fn lexicon(&self) -> impl Iterator<Item = (&String, &Vec<LexicalEntry>)> {
        self.lexicon.iter()
    }

    /// Number of distinct words.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.lexicon.len()
    }

    /// Number of lexical entries over all words.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.lexicon.values().map(Vec::len).sum()
    }

    /// Rule weight overrides in declaration order.
    #[must_use]
    pub fn rule_weights(&self) -> &[RuleWeight] {
        &self.rule_weights
    }

    /// Categories primitives are raised towards.
    #[must_use]
    pub fn raising_targets(&self) -> &[Category] {
        &self.raising_targets
    }

    /// Whether type raising is on.
    #[must_use]
    pub const fn use_type_raising(&self) -> bool {
        self.use_type_raising
    }

    /// Whether semantic composition is on.
    #[must_use]
    pub const fn use_semantics(&self) -> bool {
        self.use_semantics
    }

    /// Weight of firing `rule` on `operands`.
    ///
    /// The first override, in declaration order, whose name equals `rule`
    /// and whose premises match the operands wins; otherwise
    /// [`DEFAULT_WEIGHT`].
    #[must_use]
    pub fn rule_weight(&self, rule: &str, operands: &[&Category]) -> f64 {
        self.rule_weights
            .iter()
            .find(|weight| weight.applies(rule, operands))
            .map_or(DEFAULT_WEIGHT, |weight| weight.weight)
    }

    fn check_declared(&self, category: &Category) -> Result<()> {
        if self.primitives.is_empty() {
            return Ok(());
        }
        let mut unknown = None;
        category.for_each_primitive(&mut |name, _| {
            if unknown.is_none() && !self.primitives.iter().any(|p| p == name) {
                unknown = Some(name.to_string());
            }
        });
        unknown.map_or(Ok(()), |name| Err(Error::unknown_category(name)))
    }
}

/// Replaces every reference to shortcut `name` in `category` with `value`.
///
/// Features on the reference are merged into a primitive expansion and win
/// over the expansion's own values.
fn expand(category: &Category, name: &str, value: &Category) -> Result<Category> {
    match category {
        Category::Primitive { name: n, features } if n == name => {
            if features.is_empty() {
                return Ok(value.clone());
            }
            match value {
                Category::Primitive {
                    name: target,
                    features: defaults,
                } => Ok(Category::Primitive {
                    name: target.clone(),
                    features: features.clone().union(defaults.clone()),
                }),
                Category::Functional { .. } => Err(Error::featured_functional(name)),
            }
        }
        Category::Primitive { .. } => Ok(category.clone()),
        Category::Functional {
            result,
            argument,
            slash,
        } => Ok(Category::functional(
            expand(result, name, value)?,
            *slash,
            expand(argument, name, value)?,
        )),
    }
}

fn needs_quotes(word: &str) -> bool {
    word.starts_with(['#', ':', '"'])
        || word.starts_with(parser::WEIGHT_KEYWORD)
        || word.contains("=>")
}

impl fmt::Display for Grammar {
    /// Writes the grammar back in source form, with shortcuts expanded.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":- {}", self.start)?;
        let start_name = self.start.name();
        let mut declared: Vec<&str> = self.primitives.iter().map(String::as_str).collect();
        if declared.is_empty() {
            for entries in self.lexicon.values() {
                for entry in entries {
                    entry.category.for_each_primitive(&mut |name, _| {
                        if !declared.contains(&name) {
                            declared.push(name);
                        }
                    });
                }
            }
        }
        for name in declared {
            if Some(name) != start_name {
                write!(f, ", {name}")?;
            }
        }
        writeln!(f)?;

        for (word, entries) in &self.lexicon {
            for entry in entries {
                if needs_quotes(word) {
                    writeln!(f, "\"{word}\" => {entry}")?;
                } else {
                    writeln!(f, "{word} => {entry}")?;
                }
            }
        }
        for weight in &self.rule_weights {
            writeln!(f, "{weight}")?;
        }
        Ok(())
    }
}
