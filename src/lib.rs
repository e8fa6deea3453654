//! Categorial - weighted CKY parsing for combinatory categorial grammars
//!
//! This crate re-exports all layers of the Categorial system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: categorial_runtime    - Rendering, export, snapshots, REPL, CLI
//! Layer 2: categorial_engine     - Combinators, chart, CKY driver, reconstruction
//! Layer 1: categorial_grammar    - Grammar tables, source loader, generator
//! Layer 0: categorial_foundation - Categories, semantic terms, errors
//! ```

pub use categorial_engine as engine;
pub use categorial_foundation as foundation;
pub use categorial_grammar as grammar;
pub use categorial_runtime as runtime;
