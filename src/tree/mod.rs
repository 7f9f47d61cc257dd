//! Directory structure reader
//!
//! Walks a data directory and describes it as a nested [`DirectoryNode`]: the
//! `.json` files present at each level plus one child node per subdirectory.

pub mod node;
pub mod reader;

pub use node::{DirectoryNode, StructureFormat, FILES_KEY};
pub use reader::{is_json_file_name, read_structure, WalkerConfig, JSON_SUFFIX};
