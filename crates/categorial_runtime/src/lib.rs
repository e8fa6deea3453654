//! Rendering, export, grammar snapshots, REPL, and CLI for Categorial.
//!
//! This crate provides:
//! - [`render`](render::render) - Proof-style text drawings of derivations
//! - [`brackets`] and [`ParseReport`] - Bracketed and JSON export
//! - [`save_to_file`] / [`load_from_file`] - `MessagePack` grammar snapshots
//! - [`Session`] and [`Repl`] - Interactive parsing with `:commands`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod editor;
pub mod export;
pub mod highlight;
pub mod render;
pub mod repl;
pub mod serialize;
pub mod session;

pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use export::{DerivationView, ParseReport, brackets, to_json};
pub use render::{render, render_all};
pub use repl::{Repl, Reply};
pub use serialize::{from_bytes, load_from_file, save_to_file, to_bytes};
pub use session::{SNAPSHOT_EXTENSION, Session};
