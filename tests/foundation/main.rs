//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Category, Term, FreshVars, and Error.

mod categories;
mod errors;
mod terms;
