//! The combinator rule set.
//!
//! Each [`Combinator`] is a pure function from premise judgements to an
//! optional conclusion: syntax, weight and semantics are computed together.
//! A combinator that does not apply yields `None`; that is never an error.
//!
//! | Symbol | Rule                 | Syntax                     | Semantics       |
//! |--------|----------------------|----------------------------|-----------------|
//! | `>`    | forward application  | `X/Y  Y  => X`             | `f(a)`          |
//! | `<`    | backward application | `Y  X\Y  => X`             | `f(a)`          |
//! | `B>`   | forward composition  | `X/Y  Y/Z  => X/Z`         | `\x. f(g(x))`   |
//! | `B<`   | backward composition | `Y\Z  X\Y  => X\Z`         | `\x. f(g(x))`   |
//! | `T`    | type raising         | `x  => T/(T\x), T\(T/x)`   | `\f. f(a)`      |

use std::fmt;

use categorial_foundation::{Category, FreshVars, Slash, Term};
use categorial_grammar::Grammar;

use crate::chart::Judgement;

/// A CCG combinator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Combinator {
    /// `>`
    ApplicationRight,
    /// `<`
    ApplicationLeft,
    /// `B>`
    CompositionRight,
    /// `B<`
    CompositionLeft,
    /// `T`
    TypeRaising,
}

impl Combinator {
    /// Binary combinators in the order the driver tries them.
    pub const BINARY: [Self; 4] = [
        Self::ApplicationRight,
        Self::ApplicationLeft,
        Self::CompositionRight,
        Self::CompositionLeft,
    ];

    /// Every combinator, binary ones first.
    pub const ALL: [Self; 5] = [
        Self::ApplicationRight,
        Self::ApplicationLeft,
        Self::CompositionRight,
        Self::CompositionLeft,
        Self::TypeRaising,
    ];

    /// Symbol used in rule weights and rendered derivations.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::ApplicationRight => ">",
            Self::ApplicationLeft => "<",
            Self::CompositionRight => "B>",
            Self::CompositionLeft => "B<",
            Self::TypeRaising => "T",
        }
    }

    /// Looks a combinator up by symbol.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rule| rule.symbol() == symbol)
    }

    /// Number of premises.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::TypeRaising => 1,
            _ => 2,
        }
    }

    /// Syntactic result of a binary combinator on `left` and `right`.
    ///
    /// Always `None` for [`Combinator::TypeRaising`].
    #[must_use]
    pub fn combine(self, left: &Category, right: &Category) -> Option<Category> {
        match self {
            Self::ApplicationRight => {
                let (result, slash, argument) = left.as_functional()?;
                (slash == Slash::Right && argument.matches(right)).then(|| result.clone())
            }
            Self::ApplicationLeft => {
                let (result, slash, argument) = right.as_functional()?;
                (slash == Slash::Left && argument.matches(left)).then(|| result.clone())
            }
            Self::CompositionRight => {
                let (x, outer, y) = left.as_functional()?;
                let (y2, inner, z) = right.as_functional()?;
                (outer == Slash::Right && inner == Slash::Right && y.matches(y2))
                    .then(|| Category::forward(x.clone(), z.clone()))
            }
            Self::CompositionLeft => {
                let (y2, inner, z) = left.as_functional()?;
                let (x, outer, y) = right.as_functional()?;
                (outer == Slash::Left && inner == Slash::Left && y.matches(y2))
                    .then(|| Category::backward(x.clone(), z.clone()))
            }
            Self::TypeRaising => None,
        }
    }

    /// Semantic result of this combinator on its premises' terms, given in
    /// surface order.
    ///
    /// Returns `None` when the number of terms does not match the arity.
    #[must_use]
    pub fn semantics(self, operands: &[&Term], fresh: &mut FreshVars) -> Option<Term> {
        match (self, operands) {
            (Self::ApplicationRight, [fun, arg]) => Some((*fun).clone().apply((*arg).clone(), fresh)),
            (Self::ApplicationLeft, [arg, fun]) => Some((*fun).clone().apply((*arg).clone(), fresh)),
            (Self::CompositionRight, [outer, inner]) | (Self::CompositionLeft, [inner, outer]) => {
                Some(Term::compose((*outer).clone(), (*inner).clone(), fresh))
            }
            (Self::TypeRaising, [arg]) => Some(Term::lift((*arg).clone(), fresh)),
            _ => None,
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The conclusion of a rule firing, before it is offered to the chart.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    /// Concluded category.
    pub category: Category,
    /// Weight of the conclusion.
    pub weight: f64,
    /// Composed semantics, if both premises have some and semantics are on.
    pub semantics: Option<Term>,
}

/// Fires a binary combinator on two adjacent judgements.
pub fn fire_binary(
    rule: Combinator,
    grammar: &Grammar,
    left: &Judgement,
    right: &Judgement,
    fresh: &mut FreshVars,
) -> Option<Outcome> {
    let category = rule.combine(&left.category, &right.category)?;
    let weight = grammar.rule_weight(rule.symbol(), &[&left.category, &right.category])
        * left.weight
        * right.weight;
    let semantics = if grammar.use_semantics() {
        match (&left.semantics, &right.semantics) {
            (Some(l), Some(r)) => rule.semantics(&[l, r], fresh),
            _ => None,
        }
    } else {
        None
    };
    Some(Outcome {
        category,
        weight,
        semantics,
    })
}

/// Type-raises a primitive judgement towards every raising target of the
/// grammar. Functional judgements yield nothing.
pub fn fire_raising(grammar: &Grammar, operand: &Judgement, fresh: &mut FreshVars) -> Vec<Outcome> {
    let weight =
        grammar.rule_weight(Combinator::TypeRaising.symbol(), &[&operand.category]) * operand.weight;
    operand
        .category
        .raise(grammar.raising_targets())
        .into_iter()
        .map(|category| Outcome {
            category,
            weight,
            semantics: if grammar.use_semantics() {
                operand
                    .semantics
                    .as_ref()
                    .and_then(|term| Combinator::TypeRaising.semantics(&[term], fresh))
            } else {
                None
            },
        })
        .collect()
}
