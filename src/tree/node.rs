//! Directory node representation and its wire renderings

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

/// Key under which the flat rendering stores a node's file list.
pub const FILES_KEY: &str = "files";

/// One level of a data directory: the JSON files found directly in it and
/// its subdirectories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryNode {
    /// `.json` file names in filesystem enumeration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    /// Subdirectories keyed by name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, DirectoryNode>,
}

/// Output shape for a structure document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureFormat {
    /// Child names and a reserved `files` key share one object
    #[default]
    Flat,
    /// `{ "files": [...], "children": {...} }`
    Tagged,
}

impl std::str::FromStr for StructureFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flat" => Ok(StructureFormat::Flat),
            "tagged" => Ok(StructureFormat::Tagged),
            other => Err(format!(
                "Invalid structure format: {} (must be 'flat' or 'tagged')",
                other
            )),
        }
    }
}

impl DirectoryNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the node has neither files nor subdirectories.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.children.is_empty()
    }

    /// Total `.json` files in this node and every descendant.
    pub fn json_file_count(&self) -> usize {
        self.files.len()
            + self
                .children
                .values()
                .map(DirectoryNode::json_file_count)
                .sum::<usize>()
    }

    /// Total descendant directories.
    pub fn directory_count(&self) -> usize {
        self.children.len()
            + self
                .children
                .values()
                .map(DirectoryNode::directory_count)
                .sum::<usize>()
    }

    /// Legacy flat rendering.
    ///
    /// A subdirectory literally named `files` collides with the file list; when
    /// both exist the file list wins and the subdirectory is dropped from this
    /// rendering. Use [`StructureFormat::Tagged`] for a lossless document.
    pub fn to_flat_value(&self) -> Value {
        let mut map = Map::new();
        for (name, child) in &self.children {
            if name == FILES_KEY && !self.files.is_empty() {
                warn!(
                    directory = %name,
                    "Subdirectory shadowed by file list in flat structure"
                );
                continue;
            }
            map.insert(name.clone(), child.to_flat_value());
        }
        if !self.files.is_empty() {
            map.insert(
                FILES_KEY.to_string(),
                Value::Array(self.files.iter().cloned().map(Value::String).collect()),
            );
        }
        Value::Object(map)
    }

    pub fn render(&self, format: StructureFormat) -> Result<Value, serde_json::Error> {
        match format {
            StructureFormat::Flat => Ok(self.to_flat_value()),
            StructureFormat::Tagged => serde_json::to_value(self),
        }
    }
}
