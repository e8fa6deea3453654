//! Random sentence generation.
//!
//! [`Generator`] grows a sentence top-down from a target category. For a
//! target `C` it either picks a word whose entry matches `C`, or splits `C`
//! into a functor `C/Y` (then `Y` on its right) or `C\Y` (then `Y` on its
//! left), where the functor is any level of a lexical entry's result spine.
//! Every split is checked against the category actually produced, so a
//! generated sentence always has an application-only derivation to the
//! target.
//!
//! Generation is deterministic for a given seed.

use categorial_foundation::{Category, Slash};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::grammar::Grammar;

/// Default bound on the nesting of splits.
pub const DEFAULT_MAX_DEPTH: usize = 6;

/// Alternatives tried for one target before giving up on it.
const ATTEMPTS_PER_TARGET: usize = 3;

/// One way to produce a target category.
#[derive(Clone, Debug, PartialEq)]
enum Choice {
    /// A single word read as `category`.
    Word { word: String, category: Category },
    /// A functor category followed or preceded by its argument.
    Split { functor: Category },
}

/// Seeded top-down sentence generator.
pub struct Generator<'g> {
    grammar: &'g Grammar,
    rng: ChaCha8Rng,
    max_depth: usize,
}

impl<'g> Generator<'g> {
    /// Creates a generator over `grammar` seeded with `seed`.
    #[must_use]
    pub fn new(grammar: &'g Grammar, seed: u64) -> Self {
        Self {
            grammar,
            rng: ChaCha8Rng::seed_from_u64(seed),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the bound on nested splits.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Generates a sentence for the grammar's start type.
    pub fn sentence(&mut self) -> Option<Vec<String>> {
        let start = self.grammar.start().clone();
        self.generate(&start)
    }

    /// Generates a sentence whose derivation produces a category matching
    /// `target`. Returns `None` when no sentence is found within the depth
    /// bound.
    pub fn generate(&mut self, target: &Category) -> Option<Vec<String>> {
        self.grow(target, 0).map(|(words, _)| words)
    }

    fn grow(&mut self, target: &Category, depth: usize) -> Option<(Vec<String>, Category)> {
        let mut choices = self.choices(target, depth < self.max_depth);
        choices.shuffle(&mut self.rng);

        for choice in choices.into_iter().take(ATTEMPTS_PER_TARGET) {
            match choice {
                Choice::Word { word, category } => return Some((vec![word], category)),
                Choice::Split { functor } => {
                    if let Some(grown) = self.grow_split(target, &functor, depth) {
                        return Some(grown);
                    }
                }
            }
        }
        None
    }

    fn grow_split(
        &mut self,
        target: &Category,
        functor: &Category,
        depth: usize,
    ) -> Option<(Vec<String>, Category)> {
        let (functor_words, produced) = self.grow(functor, depth + 1)?;
        let (result, slash, argument) = produced.as_functional()?;
        if !result.matches(target) {
            return None;
        }
        let (argument_words, _) = self.grow(argument, depth + 1)?;
        let words = match slash {
            Slash::Right => [functor_words, argument_words].concat(),
            Slash::Left => [argument_words, functor_words].concat(),
        };
        Some((words, result.clone()))
    }

    /// Ways to produce `target`, in lexicon order.
    fn choices(&self, target: &Category, allow_splits: bool) -> Vec<Choice> {
        let mut choices = Vec::new();
        for (word, entries) in self.grammar.lexicon() {
            for entry in entries {
                if entry.category.matches(target) {
                    choices.push(Choice::Word {
                        word: word.clone(),
                        category: entry.category.clone(),
                    });
                }
                if !allow_splits {
                    continue;
                }
                let mut spine = &entry.category;
                while let Some((result, _, _)) = spine.as_functional() {
                    if result.matches(target) {
                        let split = Choice::Split {
                            functor: spine.clone(),
                        };
                        if !choices.contains(&split) {
                            choices.push(split);
                        }
                    }
                    spine = result;
                }
            }
        }
        choices
    }
}
