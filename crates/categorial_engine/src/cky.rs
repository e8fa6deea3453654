//! The weighted CKY driver.
//!
//! Fills a [`Chart`] bottom-up: lexical seeding, then every span length from
//! 2 to `n`, every start, every split, every pair of premises, every binary
//! combinator. When type raising is on, each filled cell's primitive
//! judgements are raised into the same cell. Finally the best root
//! judgements are expanded into derivation trees.

use categorial_foundation::{FreshVars, Result};
use categorial_grammar::Grammar;

use crate::chart::{Backpointer, Chart, ChartStats, JudgementId};
use crate::config::ParseConfig;
use crate::derivation::{DerivationTree, Reconstructor};
use crate::rule::{self, Combinator, Outcome};

/// Parser for one grammar.
#[derive(Clone, Debug)]
pub struct Parser<'g> {
    grammar: &'g Grammar,
    config: ParseConfig,
}

impl<'g> Parser<'g> {
    /// Creates a parser with the default configuration.
    #[must_use]
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            config: ParseConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ParseConfig) -> Self {
        self.config = config;
        self
    }

    /// The grammar this parser runs against.
    #[must_use]
    pub const fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Parses a whitespace-separated sentence.
    ///
    /// # Errors
    /// See [`Parser::parse`].
    pub fn parse_sentence(&self, sentence: &str) -> Result<Parse> {
        let tokens: Vec<&str> = sentence.split_whitespace().collect();
        self.parse(&tokens)
    }

    /// Parses a token sequence and returns every maximum-weight derivation.
    ///
    /// A sentence with no derivation, including an empty sentence or one
    /// containing an unknown token, yields an empty [`Parse`], not an error.
    ///
    /// # Errors
    /// Returns `LimitExceeded` if the sentence is longer than `max_tokens`
    /// or has more best derivations than `max_derivations`.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Parse> {
        self.config.check_tokens(tokens.len())?;

        let mut fresh = FreshVars::new();
        let chart = self.fill(tokens, &mut fresh);
        let roots = chart.roots(self.grammar.start());

        let count = chart.derivation_count_all(&roots);
        tracing::debug!(
            tokens = chart.len(),
            roots = roots.len(),
            derivations = count,
            "chart filled"
        );
        self.config.check_derivations(count)?;

        let derivations = Reconstructor::new(self.grammar, &chart).derivations(&roots, &mut fresh);
        Ok(Parse {
            chart,
            roots,
            derivations,
        })
    }

    /// Fills a chart for `tokens` without reconstructing derivations.
    pub fn fill<S: AsRef<str>>(&self, tokens: &[S], fresh: &mut FreshVars) -> Chart {
        let mut chart = Chart::new(tokens.iter().map(|t| t.as_ref().to_string()).collect());
        let n = chart.len();

        for position in 0..n {
            self.seed(&mut chart, position, fresh);
            self.raise_cell(&mut chart, position, position, fresh);
        }

        for length in 2..=n {
            for start in 0..=n - length {
                let end = start + length - 1;
                for split in start..end {
                    self.combine_cells(&mut chart, start, split, end, fresh);
                }
                self.raise_cell(&mut chart, start, end, fresh);
            }
        }
        chart
    }

    /// Seeds one judgement per distinct category the token's entries give.
    fn seed(&self, chart: &mut Chart, position: usize, fresh: &mut FreshVars) {
        let Some(token) = chart.token(position).map(str::to_string) else {
            return;
        };
        let entries = self.grammar.entries(&token);
        if entries.is_empty() {
            tracing::debug!(position, token = %token, "unknown token");
        }
        for (index, entry) in entries.iter().enumerate() {
            let semantics = if self.grammar.use_semantics() {
                entry.semantics.as_ref().map(|term| term.instantiate(fresh))
            } else {
                None
            };
            chart.offer(
                position,
                position,
                Outcome {
                    category: entry.category.clone(),
                    weight: entry.weight,
                    semantics,
                },
                Backpointer::Lexical {
                    position,
                    entry: index,
                },
            );
        }
    }

    /// Combines cell `(start, split)` with cell `(split + 1, end)`.
    fn combine_cells(
        &self,
        chart: &mut Chart,
        start: usize,
        split: usize,
        end: usize,
        fresh: &mut FreshVars,
    ) {
        let lefts = chart.cell(start, split);
        let rights = chart.cell(split + 1, end);
        for &left in &lefts {
            for &right in &rights {
                for rule in Combinator::BINARY {
                    let outcome = rule::fire_binary(
                        rule,
                        self.grammar,
                        chart.judgement(left),
                        chart.judgement(right),
                        fresh,
                    );
                    if let Some(outcome) = outcome {
                        chart.offer(
                            start,
                            end,
                            outcome,
                            Backpointer::Binary {
                                rule,
                                split,
                                left,
                                right,
                            },
                        );
                    }
                }
            }
        }
    }

    /// Type-raises the primitive judgements of a filled cell into the same cell.
    fn raise_cell(&self, chart: &mut Chart, start: usize, end: usize, fresh: &mut FreshVars) {
        if !self.grammar.use_type_raising() {
            return;
        }
        let primitives: Vec<JudgementId> = chart
            .cell(start, end)
            .into_iter()
            .filter(|id| chart.judgement(*id).category.is_primitive())
            .collect();
        for child in primitives {
            let outcomes = rule::fire_raising(self.grammar, chart.judgement(child), fresh);
            for outcome in outcomes {
                chart.offer(
                    start,
                    end,
                    outcome,
                    Backpointer::Unary {
                        rule: Combinator::TypeRaising,
                        child,
                    },
                );
            }
        }
    }
}

/// The result of parsing one sentence.
#[derive(Clone, Debug)]
pub struct Parse {
    chart: Chart,
    roots: Vec<JudgementId>,
    derivations: Vec<DerivationTree>,
}

impl Parse {
    /// Every maximum-weight derivation. Empty when the sentence has none.
    #[must_use]
    pub fn derivations(&self) -> &[DerivationTree] {
        &self.derivations
    }

    /// Consumes the parse, keeping only the derivations.
    #[must_use]
    pub fn into_derivations(self) -> Vec<DerivationTree> {
        self.derivations
    }

    /// The filled chart.
    #[must_use]
    pub const fn chart(&self) -> &Chart {
        &self.chart
    }

    /// Root judgements the derivations were expanded from.
    #[must_use]
    pub fn roots(&self) -> &[JudgementId] {
        &self.roots
    }

    /// Returns true if the sentence has no derivation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.derivations.is_empty()
    }

    /// Weight shared by every returned derivation.
    #[must_use]
    pub fn best_weight(&self) -> Option<f64> {
        self.derivations.first().map(|tree| tree.weight)
    }

    /// Counters for the filled chart.
    #[must_use]
    pub fn stats(&self) -> ChartStats {
        self.chart.stats()
    }
}
