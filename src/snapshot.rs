//! Build-time snapshot generation
//!
//! Writes the structure of the data directory to a JSON file and publishes a
//! copy of the data tree next to it. Either both artifacts are produced and
//! non-empty, or the build fails and leaves neither behind.

use crate::error::{SnapshotError, StorageError};
use crate::tree::{is_json_file_name, read_structure, StructureFormat, WalkerConfig};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Resolved snapshot settings
#[derive(Debug, Clone)]
pub struct SnapshotSettings {
    pub data_dir: PathBuf,
    pub output_file: PathBuf,
    pub publish_dir: PathBuf,
    pub format: StructureFormat,
    pub walker: WalkerConfig,
}

/// Summary of a successful snapshot build
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotReport {
    pub output_file: PathBuf,
    pub publish_dir: PathBuf,
    pub directories: usize,
    pub json_files: usize,
    pub copied_files: usize,
    pub published_json_files: usize,
    pub generated_at: String,
}

/// Generate the snapshot file and publish the data tree.
pub fn generate(settings: &SnapshotSettings) -> Result<SnapshotReport, SnapshotError> {
    check_layout(settings)?;

    let node = read_structure(&settings.data_dir, &settings.walker)?
        .filter(|node| !node.is_empty())
        .ok_or_else(|| SnapshotError::EmptySnapshot {
            data_dir: settings.data_dir.clone(),
        })?;

    let rendered = node.render(settings.format)?;
    let document = serde_json::to_vec_pretty(&rendered)?;

    let result = publish(settings, &document);
    if result.is_err() {
        discard_artifacts(settings);
    }
    let (copied_files, published_json_files) = result?;

    let report = SnapshotReport {
        output_file: settings.output_file.clone(),
        publish_dir: settings.publish_dir.clone(),
        directories: node.directory_count(),
        json_files: node.json_file_count(),
        copied_files,
        published_json_files,
        generated_at: chrono::Utc::now().to_rfc3339(),
    };
    info!(
        output_file = %report.output_file.display(),
        publish_dir = %report.publish_dir.display(),
        json_files = report.json_files,
        copied_files = report.copied_files,
        "Snapshot generated"
    );
    Ok(report)
}

/// Resolve `path` for prefix comparison, even when it does not exist yet.
fn comparable_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = dunce::canonicalize(path) {
        return canonical;
    }
    match (path.parent().map(dunce::canonicalize), path.file_name()) {
        (Some(Ok(parent)), Some(name)) => parent.join(name),
        _ => path.to_path_buf(),
    }
}

/// The publish directory is replaced wholesale, so it must not overlap the
/// data directory in either direction or contain the snapshot file.
fn check_layout(settings: &SnapshotSettings) -> Result<(), SnapshotError> {
    let data_dir = comparable_path(&settings.data_dir);
    let publish_dir = comparable_path(&settings.publish_dir);
    let output_file = comparable_path(&settings.output_file);

    if publish_dir.starts_with(&data_dir) {
        return Err(SnapshotError::PublishInsideData {
            publish_dir: settings.publish_dir.clone(),
            data_dir: settings.data_dir.clone(),
        });
    }
    if data_dir.starts_with(&publish_dir) {
        return Err(SnapshotError::DataInsidePublish {
            data_dir: settings.data_dir.clone(),
            publish_dir: settings.publish_dir.clone(),
        });
    }
    if output_file.starts_with(&publish_dir) {
        return Err(SnapshotError::OutputInsidePublish {
            output_file: settings.output_file.clone(),
            publish_dir: settings.publish_dir.clone(),
        });
    }
    Ok(())
}

fn publish(settings: &SnapshotSettings, document: &[u8]) -> Result<(usize, usize), SnapshotError> {
    let copied = copy_tree(&settings.data_dir, &settings.publish_dir, &settings.walker)?;
    let published_json = count_json_files(&settings.publish_dir)?;
    if published_json == 0 {
        return Err(SnapshotError::NoJsonFiles {
            publish_dir: settings.publish_dir.clone(),
        });
    }
    write_output(&settings.output_file, document)?;
    Ok((copied, published_json))
}

fn write_output(output_file: &Path, document: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = output_file.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }
    fs::write(output_file, document).map_err(|e| StorageError::io(output_file, e))
}

/// Copy every file below `source` into `dest`, replacing any earlier copy.
///
/// Returns the number of files copied.
pub fn copy_tree(source: &Path, dest: &Path, walker: &WalkerConfig) -> Result<usize, StorageError> {
    if dest.exists() {
        fs::remove_dir_all(dest).map_err(|e| StorageError::io(dest, e))?;
    }
    fs::create_dir_all(dest).map_err(|e| StorageError::io(dest, e))?;

    let mut copied = 0;
    for entry in WalkDir::new(source)
        .follow_links(walker.follow_symlinks)
        .min_depth(1)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.loop_ancestor().is_some() => {
                warn!(error = %e, "Skipping symlink loop while copying");
                continue;
            }
            Err(e) => return Err(StorageError::Walk(e)),
        };

        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| {
                StorageError::io(
                    entry.path(),
                    std::io::Error::new(std::io::ErrorKind::InvalidInput, e),
                )
            })?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| StorageError::io(&target, e))?;
        } else if entry.file_type().is_file() || links_to_file(entry.path()) {
            // fs::copy reads through symlinks, so unfollowed links publish their target
            fs::copy(entry.path(), &target).map_err(|e| StorageError::io(entry.path(), e))?;
            copied += 1;
        } else {
            debug!(path = %entry.path().display(), "Skipping non-regular entry");
        }
    }
    Ok(copied)
}

fn links_to_file(path: &Path) -> bool {
    path.is_symlink() && fs::metadata(path).map_or(false, |m| m.is_file())
}

/// Count `.json` files anywhere below `dir`.
pub fn count_json_files(dir: &Path) -> Result<usize, StorageError> {
    let mut count = 0;
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if entry.file_type().is_file() && is_json_file_name(&entry.file_name().to_string_lossy()) {
            count += 1;
        }
    }
    Ok(count)
}

fn discard_artifacts(settings: &SnapshotSettings) {
    if settings.output_file.exists() {
        if let Err(e) = fs::remove_file(&settings.output_file) {
            warn!(
                path = %settings.output_file.display(),
                error = %e,
                "Failed to remove partial snapshot"
            );
        }
    }
    if settings.publish_dir.exists() {
        if let Err(e) = fs::remove_dir_all(&settings.publish_dir) {
            warn!(
                path = %settings.publish_dir.display(),
                error = %e,
                "Failed to remove partial publish directory"
            );
        }
    }
}
