//! Syntactic categories.
//!
//! A category is either a primitive such as `Nom[Masc]` or a functional
//! category `X/Y` (looks for a `Y` on its right) or `X\Y` (looks for a `Y`
//! on its left). Categories are built bottom-up and are therefore acyclic.
//!
//! Two notions of sameness coexist:
//! - `==`, `Hash` and `Ord` are exact and key chart cells;
//! - [`Category::matches`] treats a feature missing on either side as a
//!   wildcard and decides whether a combinator may fire.

use std::fmt;
use std::sync::Arc;

use im::OrdMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Feature annotations on a primitive category, name to value.
pub type Features = OrdMap<String, String>;

/// Direction in which a functional category looks for its argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Slash {
    /// `\`: argument on the left.
    Left,
    /// `/`: argument on the right.
    Right,
}

impl Slash {
    /// The opposite direction.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// The character used in grammar source.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Left => '\\',
            Self::Right => '/',
        }
    }
}

/// A CCG category.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Category {
    /// An atomic category with optional features.
    Primitive {
        /// Category name, e.g. `Nom`.
        name: String,
        /// Feature annotations, e.g. `{tag: Masc}`.
        features: Features,
    },
    /// A function from `argument` to `result`.
    Functional {
        /// Category produced once the argument is consumed.
        result: Arc<Category>,
        /// Category consumed.
        argument: Arc<Category>,
        /// Side on which the argument is expected.
        slash: Slash,
    },
}

impl Category {
    /// Feature name used for bare annotations such as `Nom[Masc]`.
    pub const TAG: &'static str = "tag";

    /// Creates a primitive category without features.
    #[must_use]
    pub fn primitive(name: impl Into<String>) -> Self {
        Self::Primitive {
            name: name.into(),
            features: Features::new(),
        }
    }

    /// Creates a primitive category with a single bare tag, e.g. `Nom[Masc]`.
    #[must_use]
    pub fn tagged(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::primitive(name).with_feature(Self::TAG, tag)
    }

    /// Creates a functional category.
    #[must_use]
    pub fn functional(result: Category, slash: Slash, argument: Category) -> Self {
        Self::Functional {
            result: Arc::new(result),
            argument: Arc::new(argument),
            slash,
        }
    }

    /// Creates `result/argument`.
    #[must_use]
    pub fn forward(result: Category, argument: Category) -> Self {
        Self::functional(result, Slash::Right, argument)
    }

    /// Creates `result\argument`.
    #[must_use]
    pub fn backward(result: Category, argument: Category) -> Self {
        Self::functional(result, Slash::Left, argument)
    }

    /// Returns this category with a feature added.
    ///
    /// Functional categories carry no features and are returned unchanged.
    #[must_use]
    pub fn with_feature(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        match self {
            Self::Primitive { name: n, features } => Self::Primitive {
                name: n,
                features: features.update(name.into(), value.into()),
            },
            functional @ Self::Functional { .. } => functional,
        }
    }

    /// Returns true for primitive categories.
    #[must_use]
    pub const fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive { .. })
    }

    /// Returns true for functional categories.
    #[must_use]
    pub const fn is_functional(&self) -> bool {
        matches!(self, Self::Functional { .. })
    }

    /// Name of a primitive category.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Primitive { name, .. } => Some(name),
            Self::Functional { .. } => None,
        }
    }

    /// Features of a primitive category.
    #[must_use]
    pub fn features(&self) -> Option<&Features> {
        match self {
            Self::Primitive { features, .. } => Some(features),
            Self::Functional { .. } => None,
        }
    }

    /// Splits a functional category into `(result, slash, argument)`.
    #[must_use]
    pub fn as_functional(&self) -> Option<(&Category, Slash, &Category)> {
        match self {
            Self::Functional {
                result,
                argument,
                slash,
            } => Some((result, *slash, argument)),
            Self::Primitive { .. } => None,
        }
    }

    /// Structural match with wildcard features.
    ///
    /// Shapes and primitive names must be equal. A feature present on both
    /// sides must carry the same value; a feature present on only one side
    /// matches anything.
    #[must_use]
    pub fn matches(&self, other: &Category) -> bool {
        match (self, other) {
            (
                Self::Primitive {
                    name: a,
                    features: fa,
                },
                Self::Primitive {
                    name: b,
                    features: fb,
                },
            ) => {
                a == b
                    && fa
                        .iter()
                        .all(|(key, value)| fb.get(key).is_none_or(|other| other == value))
            }
            (
                Self::Functional {
                    result: ra,
                    argument: aa,
                    slash: sa,
                },
                Self::Functional {
                    result: rb,
                    argument: ab,
                    slash: sb,
                },
            ) => sa == sb && ra.matches(rb) && aa.matches(ab),
            _ => false,
        }
    }

    /// Type-raises a primitive category towards each target.
    ///
    /// For every `T` in `targets` yields `T/(T\x)` and then `T\(T/x)`.
    /// Functional categories are never raised and yield nothing.
    #[must_use]
    pub fn raise(&self, targets: &[Category]) -> Vec<Category> {
        if !self.is_primitive() {
            return Vec::new();
        }
        let mut raised = Vec::with_capacity(targets.len() * 2);
        for target in targets {
            raised.push(Self::forward(
                target.clone(),
                Self::backward(target.clone(), self.clone()),
            ));
            raised.push(Self::backward(
                target.clone(),
                Self::forward(target.clone(), self.clone()),
            ));
        }
        raised
    }

    /// Number of primitive leaves in this category.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Self::Primitive { .. } => 1,
            Self::Functional {
                result, argument, ..
            } => result.size() + argument.size(),
        }
    }

    /// Visits every primitive name in this category, left to right.
    pub fn for_each_primitive<'a>(&'a self, f: &mut impl FnMut(&'a str, &'a Features)) {
        match self {
            Self::Primitive { name, features } => f(name, features),
            Self::Functional {
                result, argument, ..
            } => {
                result.for_each_primitive(f);
                argument.for_each_primitive(f);
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive { name, features } => {
                write!(f, "{name}")?;
                if !features.is_empty() {
                    write!(f, "[")?;
                    for (i, (key, value)) in features.iter().enumerate() {
                        if i > 0 {
                            write!(f, ",")?;
                        }
                        if key == Self::TAG {
                            write!(f, "{value}")?;
                        } else {
                            write!(f, "{key}={value}")?;
                        }
                    }
                    write!(f, "]")?;
                }
                Ok(())
            }
            Self::Functional {
                result,
                argument,
                slash,
            } => {
                write_operand(f, result)?;
                write!(f, "{}", slash.symbol())?;
                write_operand(f, argument)
            }
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, category: &Category) -> fmt::Result {
    if category.is_functional() {
        write!(f, "({category})")
    } else {
        write!(f, "{category}")
    }
}

impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Category({self})")
    }
}
