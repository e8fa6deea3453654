//! Combinators, weighted CKY chart parsing, and derivation reconstruction
//! for Categorial.
//!
//! This crate provides:
//! - [`Combinator`] - Application, composition, and type raising
//! - [`Chart`] - Per-span best judgements with tied backpointers
//! - [`Parser`] - The weighted CKY driver
//! - [`DerivationTree`] - Reconstructed maximum-weight derivations
//! - [`ParseConfig`] - Input length and ambiguity limits
//!
//! # Example
//!
//! ```
//! use categorial_engine::Parser;
//! use categorial_grammar::Grammar;
//!
//! let grammar = Grammar::from_source(
//!     ":- Phrase, GrNom, Nom\n\
//!      Le => GrNom/Nom {\\P. P}\n\
//!      chat => Nom {chat}\n\
//!      dort => Phrase\\GrNom {\\x. dort(x)}\n",
//! )
//! .unwrap();
//!
//! let parse = Parser::new(&grammar).parse_sentence("Le chat dort").unwrap();
//! let tree = &parse.derivations()[0];
//! assert_eq!(tree.semantics.as_ref().unwrap().to_string(), "dort(chat)");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod chart;
pub mod cky;
pub mod config;
pub mod derivation;
pub mod rule;

pub use chart::{Backpointer, Chart, ChartStats, Judgement, JudgementId, Offer};
pub use cky::{Parse, Parser};
pub use config::{DEFAULT_MAX_DERIVATIONS, ParseConfig};
pub use derivation::{DerivationTree, Reconstructor, Rule};
pub use rule::{Combinator, Outcome};
