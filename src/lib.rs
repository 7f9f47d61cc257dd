//! vizdata: JSON data trees for visualization front-ends
//!
//! Reads a directory of JSON files into a nested table of contents, serves
//! it together with the files over HTTP, publishes build-time snapshots, and
//! repairs files saved with a UTF-8 BOM or as UTF-16LE.

pub mod config;
pub mod encoding;
pub mod error;
pub mod logging;
pub mod server;
pub mod snapshot;
pub mod tooling;
pub mod tree;
pub mod watch;
