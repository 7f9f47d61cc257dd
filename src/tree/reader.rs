//! Recursive directory reader producing [`DirectoryNode`] trees.

use super::node::DirectoryNode;
use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Suffix a file name must carry to be listed.
pub const JSON_SUFFIX: &str = ".json";

/// Walker configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkerConfig {
    /// Descend into symlinked directories. Links that point back at a
    /// directory on the current descent path are skipped.
    #[serde(default = "default_follow_symlinks")]
    pub follow_symlinks: bool,
    /// Directories deeper than this are reported as empty nodes. Root is depth 0.
    #[serde(default)]
    pub max_depth: Option<usize>,
}

fn default_follow_symlinks() -> bool {
    true
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: default_follow_symlinks(),
            max_depth: None,
        }
    }
}

/// True for names ending in the literal `.json` suffix.
pub fn is_json_file_name(name: &str) -> bool {
    name.ends_with(JSON_SUFFIX)
}

/// Read the structure rooted at `path`.
///
/// Returns `Ok(None)` when `path` is not a directory. Filesystem errors below
/// the root propagate to the caller.
pub fn read_structure(
    path: &Path,
    config: &WalkerConfig,
) -> Result<Option<DirectoryNode>, StorageError> {
    if !path.is_dir() {
        debug!(path = %path.display(), "Structure root is not a directory");
        return Ok(None);
    }

    let canonical_root = dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let mut ancestors = vec![canonical_root];
    let node = read_node(path, config, 0, &mut ancestors)?;

    debug!(
        path = %path.display(),
        files = node.json_file_count(),
        directories = node.directory_count(),
        "Read directory structure"
    );
    Ok(Some(node))
}

enum EntryKind {
    Directory { canonical: PathBuf },
    File,
    Skip,
}

fn read_node(
    dir: &Path,
    config: &WalkerConfig,
    depth: usize,
    ancestors: &mut Vec<PathBuf>,
) -> Result<DirectoryNode, StorageError> {
    let mut node = DirectoryNode::new();
    if config.max_depth.map_or(false, |max| depth > max) {
        return Ok(node);
    }

    let entries = fs::read_dir(dir).map_err(|e| StorageError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| StorageError::io(dir, e))?;
        let entry_path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        match classify(&entry, &entry_path, config, ancestors)? {
            EntryKind::Directory { canonical } => {
                ancestors.push(canonical);
                let child = read_node(&entry_path, config, depth + 1, ancestors);
                ancestors.pop();
                node.children.insert(name, child?);
            }
            EntryKind::File => {
                if is_json_file_name(&name) {
                    node.files.push(name);
                }
            }
            EntryKind::Skip => {}
        }
    }

    Ok(node)
}

fn classify(
    entry: &fs::DirEntry,
    entry_path: &Path,
    config: &WalkerConfig,
    ancestors: &[PathBuf],
) -> Result<EntryKind, StorageError> {
    let file_type = entry
        .file_type()
        .map_err(|e| StorageError::io(entry_path, e))?;

    if !file_type.is_symlink() {
        if file_type.is_dir() {
            let canonical = match ancestors.last() {
                Some(parent) => parent.join(entry.file_name()),
                None => entry_path.to_path_buf(),
            };
            return Ok(EntryKind::Directory { canonical });
        }
        return Ok(EntryKind::File);
    }

    if !config.follow_symlinks {
        // Unfollowed links are listed only when they resolve to a regular file
        return Ok(match fs::metadata(entry_path) {
            Ok(metadata) if metadata.is_file() => EntryKind::File,
            _ => EntryKind::Skip,
        });
    }

    let metadata = match fs::metadata(entry_path) {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!(path = %entry_path.display(), error = %e, "Skipping broken symlink");
            return Ok(EntryKind::Skip);
        }
    };
    if !metadata.is_dir() {
        return Ok(EntryKind::File);
    }

    let canonical =
        dunce::canonicalize(entry_path).map_err(|e| StorageError::io(entry_path, e))?;
    if ancestors.contains(&canonical) {
        warn!(
            path = %entry_path.display(),
            target = %canonical.display(),
            "Skipping symlink that loops back to an ancestor directory"
        );
        return Ok(EntryKind::Skip);
    }
    Ok(EntryKind::Directory { canonical })
}
