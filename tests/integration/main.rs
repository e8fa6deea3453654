//! End-to-end tests across all layers
//!
//! Tests the bundled French grammar, the session, rendering, export,
//! snapshots, and the REPL driven by a scripted editor.

mod french;
