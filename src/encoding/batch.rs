//! Continue-on-error normalization over many files.

use super::normalize::{normalize_file, NormalizeOutcome};
use crate::error::StorageError;
use crate::tree::is_json_file_name;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Per-file entry in a batch report
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub path: PathBuf,
    #[serde(flatten)]
    pub result: BatchResult,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum BatchResult {
    Outcome(NormalizeOutcome),
    Failed { status: &'static str, error: String },
}

/// Summary of a batch normalization run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub rewritten: usize,
    pub unchanged: usize,
    pub rejected: usize,
    pub failed: usize,
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    /// True when every file decoded, parsed and was written successfully.
    pub fn all_succeeded(&self) -> bool {
        self.rejected == 0 && self.failed == 0
    }

    /// Fold another report's counts and entries into this one.
    pub fn merge(&mut self, other: BatchReport) {
        self.rewritten += other.rewritten;
        self.unchanged += other.unchanged;
        self.rejected += other.rejected;
        self.failed += other.failed;
        self.entries.extend(other.entries);
    }

    fn record(&mut self, path: PathBuf, result: Result<NormalizeOutcome, StorageError>) {
        let result = match result {
            Ok(outcome) => {
                match &outcome {
                    NormalizeOutcome::Rewritten { .. } => self.rewritten += 1,
                    NormalizeOutcome::AlreadyNormalized => self.unchanged += 1,
                    NormalizeOutcome::Rejected { reason, .. } => {
                        warn!(path = %path.display(), reason = %reason, "Could not normalize file");
                        self.rejected += 1;
                    }
                }
                BatchResult::Outcome(outcome)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to normalize file");
                self.failed += 1;
                BatchResult::Failed {
                    status: "failed",
                    error: e.to_string(),
                }
            }
        };
        self.entries.push(BatchEntry { path, result });
    }
}

/// Normalize each of `paths`, continuing past failures.
pub fn normalize_files<I, P>(paths: I) -> BatchReport
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut report = BatchReport::default();
    for path in paths {
        let path = path.as_ref();
        report.record(path.to_path_buf(), normalize_file(path));
    }
    report
}

/// Normalize every `.json` file below `dir`.
///
/// Only a failure to walk `dir` itself is an error; per-file problems are
/// recorded in the report.
pub fn normalize_dir(dir: &Path) -> Result<BatchReport, StorageError> {
    let mut report = BatchReport::default();
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(StorageError::Walk(e)),
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
                warn!(path = %path.display(), error = %e, "Skipping unreadable entry");
                report.failed += 1;
                report.entries.push(BatchEntry {
                    path,
                    result: BatchResult::Failed {
                        status: "failed",
                        error: e.to_string(),
                    },
                });
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if !is_json_file_name(&entry.file_name().to_string_lossy()) {
            continue;
        }
        let path = entry.into_path();
        let result = normalize_file(&path);
        report.record(path, result);
    }

    info!(
        dir = %dir.display(),
        total = report.total(),
        rewritten = report.rewritten,
        unchanged = report.unchanged,
        rejected = report.rejected,
        failed = report.failed,
        "Normalized data directory"
    );
    Ok(report)
}
