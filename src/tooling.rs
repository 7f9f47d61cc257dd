//! Tooling & Integration Layer
//!
//! Command-line entry points wiring configuration into the reader, the
//! normalizer, the snapshot builder, the watcher and the HTTP server.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands};
