//! Categories, semantic terms, and error types for Categorial.
//!
//! This crate provides:
//! - [`Category`] - Primitive and functional CCG categories with feature matching
//! - [`Term`] - Lambda-calculus semantic terms with capture-avoiding substitution
//! - [`FreshVars`] - Parse-scoped fresh variable generation
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod category;
pub mod error;
pub mod fresh;
pub mod term;

pub use category::{Category, Features, Slash};
pub use error::{Error, ErrorContext, ErrorKind, ParseLimit, Result};
pub use fresh::FreshVars;
pub use term::{Term, VarId};
