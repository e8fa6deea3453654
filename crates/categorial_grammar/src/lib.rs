//! Grammar model, grammar source loader, and sentence generator for Categorial.
//!
//! This crate provides:
//! - [`Grammar`] - Start type, lexicon, rule weights, and feature switches
//! - [`parser`] - Line-oriented grammar source parser
//! - [`Lexer`] - Tokenizer for grammar source
//! - [`Generator`] - Seeded random sentence generation
//!
//! # Example
//!
//! ```
//! use categorial_grammar::Grammar;
//!
//! let grammar = Grammar::from_source(
//!     ":- Phrase, GrNom, Nom\n\
//!      Le => GrNom/Nom\n\
//!      chat => Nom\n\
//!      dort => Phrase\\GrNom\n",
//! )
//! .unwrap();
//! assert_eq!(grammar.word_count(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod generate;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

pub use generate::Generator;
pub use grammar::{DEFAULT_WEIGHT, Grammar, LexicalEntry, RuleWeight};
pub use lexer::Lexer;
pub use parser::{Statement, StatementKind, parse, parse_category, parse_term};
pub use span::Span;
pub use token::{Token, TokenKind};
