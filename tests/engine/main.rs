//! Integration tests for Layer 2: Engine
//!
//! Tests for the weighted CKY parser: combinators, ties, rule weights,
//! type raising, limits, and reconstructed derivations.

mod limits;
mod parsing;
mod properties;
