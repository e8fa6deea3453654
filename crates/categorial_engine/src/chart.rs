//! The parse chart.
//!
//! Judgements live in an arena and are referred to by [`JudgementId`]. Each
//! cell `(start, end)` (inclusive token positions) maps a category to the
//! single best judgement for it, in insertion order, so iteration and
//! therefore output are deterministic.
//!
//! Backpointers always lead to judgements in strictly smaller spans, except
//! type-raising backpointers, which lead from a functional judgement to a
//! primitive one in the same cell. The backpointer graph is therefore
//! acyclic.

use std::cmp::Ordering;
use std::collections::HashMap;

use categorial_foundation::{Category, Term};
use indexmap::IndexMap;

use crate::rule::{Combinator, Outcome};

/// Compares two weights exactly. Incomparable (NaN) pairs order as `Less`.
#[must_use]
pub fn compare_weights(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Less)
}

/// Handle to a judgement in a [`Chart`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JudgementId(usize);

impl JudgementId {
    /// Index of the judgement in the chart's arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// How a judgement was derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Backpointer {
    /// Seeded from lexical entry `entry` of the token at `position`.
    Lexical {
        /// Token position.
        position: usize,
        /// Index into the token's lexical entries.
        entry: usize,
    },
    /// Produced by a unary rule from a judgement in the same cell.
    Unary {
        /// The rule.
        rule: Combinator,
        /// The premise.
        child: JudgementId,
    },
    /// Produced by a binary rule from two adjacent judgements.
    Binary {
        /// The rule.
        rule: Combinator,
        /// Position of the last token covered by the left premise.
        split: usize,
        /// Left premise.
        left: JudgementId,
        /// Right premise.
        right: JudgementId,
    },
}

impl Backpointer {
    /// The rule, or `None` for a lexical seed.
    #[must_use]
    pub const fn rule(&self) -> Option<Combinator> {
        match self {
            Self::Lexical { .. } => None,
            Self::Unary { rule, .. } | Self::Binary { rule, .. } => Some(*rule),
        }
    }

    /// The split point of a binary backpointer.
    #[must_use]
    pub const fn split(&self) -> Option<usize> {
        match self {
            Self::Binary { split, .. } => Some(*split),
            _ => None,
        }
    }

    /// The first (or only) premise.
    #[must_use]
    pub const fn left(&self) -> Option<JudgementId> {
        match self {
            Self::Lexical { .. } => None,
            Self::Unary { child, .. } => Some(*child),
            Self::Binary { left, .. } => Some(*left),
        }
    }

    /// The second premise of a binary backpointer.
    #[must_use]
    pub const fn right(&self) -> Option<JudgementId> {
        match self {
            Self::Binary { right, .. } => Some(*right),
            _ => None,
        }
    }
}

/// The best way found so far to read a span as a category.
#[derive(Clone, Debug, PartialEq)]
pub struct Judgement {
    /// Category of the span.
    pub category: Category,
    /// Best weight found.
    pub weight: f64,
    /// Semantics of the first derivation found with that weight.
    pub semantics: Option<Term>,
    /// Covered token positions, inclusive.
    pub span: (usize, usize),
    /// Every derivation reaching `weight`, in discovery order.
    pub parents: Vec<Backpointer>,
}

impl Judgement {
    /// Returns true if any parent is a type-raising step.
    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.parents
            .iter()
            .any(|parent| matches!(parent, Backpointer::Unary { .. }))
    }
}

/// What happened to an outcome offered to the chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Offer {
    /// New category in the cell.
    Inserted(JudgementId),
    /// Strictly better than the existing judgement, which it replaced.
    Replaced(JudgementId),
    /// Tied with the existing judgement; the backpointer was added.
    Tied(JudgementId),
    /// Worse than the existing judgement.
    Discarded,
}

/// Counters describing a filled chart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChartStats {
    /// Non-empty cells.
    pub cells: usize,
    /// Judgements across all cells.
    pub judgements: usize,
    /// Backpointers across all judgements.
    pub backpointers: usize,
    /// Judgements reached by type raising.
    pub raised: usize,
}

/// The CKY chart for one sentence.
#[derive(Clone, Debug)]
pub struct Chart {
    tokens: Vec<String>,
    judgements: Vec<Judgement>,
    /// Upper-triangular cells, one per `start <= end`, row by row.
    cells: Vec<IndexMap<Category, JudgementId>>,
}

impl Chart {
    /// Creates an empty chart for `tokens`.
    #[must_use]
    pub fn new(tokens: Vec<String>) -> Self {
        let n = tokens.len();
        Self {
            tokens,
            judgements: Vec::new(),
            cells: vec![IndexMap::new(); n * (n + 1) / 2],
        }
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true for the chart of an empty sentence.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The sentence.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// The token at `position`.
    #[must_use]
    pub fn token(&self, position: usize) -> Option<&str> {
        self.tokens.get(position).map(String::as_str)
    }

    /// Looks up a judgement.
    ///
    /// # Panics
    /// Panics if `id` was not issued by this chart.
    #[must_use]
    pub fn judgement(&self, id: JudgementId) -> &Judgement {
        &self.judgements[id.0]
    }

    /// Ids of the judgements in cell `(start, end)`, in insertion order.
    /// Empty when the cell lies outside the chart.
    #[must_use]
    pub fn cell(&self, start: usize, end: usize) -> Vec<JudgementId> {
        self.cell_map(start, end)
            .map(|cell| cell.values().copied().collect())
            .unwrap_or_default()
    }

    /// The judgement for `category` in cell `(start, end)`, if any.
    #[must_use]
    pub fn get(&self, start: usize, end: usize, category: &Category) -> Option<&Judgement> {
        let id = self.cell_map(start, end)?.get(category)?;
        Some(self.judgement(*id))
    }

    /// Every judgement in the arena.
    pub fn judgements(&self) -> impl Iterator<Item = (JudgementId, &Judgement)> {
        self.judgements
            .iter()
            .enumerate()
            .map(|(index, judgement)| (JudgementId(index), judgement))
    }

    /// Position of cell `(start, end)` in `cells`. Row `start` begins after
    /// the `n - k` cells of every earlier row `k`.
    fn cell_index(&self, start: usize, end: usize) -> Option<usize> {
        let n = self.len();
        (start <= end && end < n).then(|| start * (2 * n + 1 - start) / 2 + (end - start))
    }

    fn cell_map(&self, start: usize, end: usize) -> Option<&IndexMap<Category, JudgementId>> {
        self.cell_index(start, end).map(|index| &self.cells[index])
    }

    /// Offers a conclusion for cell `(start, end)` reached via `parent`.
    ///
    /// Per category the chart keeps only the best weight: a new category is
    /// inserted; a strictly greater weight replaces the judgement and resets
    /// its parents; an exactly equal weight adds `parent`; a smaller weight is
    /// discarded.
    /// Different categories never compete.
    ///
    /// # Panics
    /// Panics if the cell lies outside the chart.
    pub fn offer(&mut self, start: usize, end: usize, outcome: Outcome, parent: Backpointer) -> Offer {
        let Some(index) = self.cell_index(start, end) else {
            panic!("cell ({start}, {end}) lies outside a chart of {} tokens", self.len());
        };
        let cell = &mut self.cells[index];

        let Some(&id) = cell.get(&outcome.category) else {
            let id = JudgementId(self.judgements.len());
            tracing::trace!(
                start,
                end,
                category = %outcome.category,
                weight = outcome.weight,
                "insert judgement"
            );
            cell.insert(outcome.category.clone(), id);
            self.judgements.push(Judgement {
                category: outcome.category,
                weight: outcome.weight,
                semantics: outcome.semantics,
                span: (start, end),
                parents: vec![parent],
            });
            return Offer::Inserted(id);
        };

        let existing = &mut self.judgements[id.0];
        match compare_weights(outcome.weight, existing.weight) {
            Ordering::Greater => {
                tracing::trace!(
                    start,
                    end,
                    category = %outcome.category,
                    old = existing.weight,
                    new = outcome.weight,
                    "replace judgement"
                );
                existing.weight = outcome.weight;
                existing.semantics = outcome.semantics;
                existing.parents = vec![parent];
                Offer::Replaced(id)
            }
            Ordering::Equal => {
                if !existing.parents.contains(&parent) {
                    existing.parents.push(parent);
                }
                Offer::Tied(id)
            }
            Ordering::Less => Offer::Discarded,
        }
    }

    /// Judgements covering the whole sentence whose category matches
    /// `start`, keeping only those with the maximum weight.
    #[must_use]
    pub fn roots(&self, start: &Category) -> Vec<JudgementId> {
        let Some(last) = self.len().checked_sub(1) else {
            return Vec::new();
        };
        let candidates: Vec<JudgementId> = self
            .cell(0, last)
            .into_iter()
            .filter(|id| self.judgement(*id).category.matches(start))
            .collect();
        let Some(best) = candidates
            .iter()
            .map(|id| self.judgement(*id).weight)
            .reduce(f64::max)
        else {
            return Vec::new();
        };
        candidates
            .into_iter()
            .filter(|id| compare_weights(self.judgement(*id).weight, best) == Ordering::Equal)
            .collect()
    }

    /// Number of distinct derivation trees below `id`, saturating at
    /// `usize::MAX`.
    #[must_use]
    pub fn derivation_count(&self, id: JudgementId) -> usize {
        self.count_memo(id, &mut HashMap::new())
    }

    /// Total number of derivation trees below `roots`, saturating.
    #[must_use]
    pub fn derivation_count_all(&self, roots: &[JudgementId]) -> usize {
        let mut memo = HashMap::new();
        roots
            .iter()
            .fold(0usize, |total, id| total.saturating_add(self.count_memo(*id, &mut memo)))
    }

    fn count_memo(&self, id: JudgementId, memo: &mut HashMap<JudgementId, usize>) -> usize {
        if let Some(count) = memo.get(&id) {
            return *count;
        }
        let count = self.judgement(id).parents.iter().fold(0usize, |total, parent| {
            let ways = match parent {
                Backpointer::Lexical { .. } => 1,
                Backpointer::Unary { child, .. } => self.count_memo(*child, memo),
                Backpointer::Binary { left, right, .. } => self
                    .count_memo(*left, memo)
                    .saturating_mul(self.count_memo(*right, memo)),
            };
            total.saturating_add(ways)
        });
        memo.insert(id, count);
        count
    }

    /// Counters for this chart.
    #[must_use]
    pub fn stats(&self) -> ChartStats {
        ChartStats {
            cells: self.cells.iter().filter(|cell| !cell.is_empty()).count(),
            judgements: self.judgements.len(),
            backpointers: self.judgements.iter().map(|j| j.parents.len()).sum(),
            raised: self.judgements.iter().filter(|j| j.is_raised()).count(),
        }
    }
}
