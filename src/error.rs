//! Error types shared across the reader, normalizer, snapshot builder and CLI.

use std::path::PathBuf;
use thiserror::Error;

/// Filesystem-level failures.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Build-gate failures raised while producing a snapshot. All of them are fatal.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot of {} is empty", data_dir.display())]
    EmptySnapshot { data_dir: PathBuf },

    #[error("Published tree at {} contains no .json files", publish_dir.display())]
    NoJsonFiles { publish_dir: PathBuf },

    #[error(
        "Publish directory {} must not be inside data directory {}",
        publish_dir.display(),
        data_dir.display()
    )]
    PublishInsideData {
        publish_dir: PathBuf,
        data_dir: PathBuf,
    },

    #[error(
        "Data directory {} must not be inside publish directory {}",
        data_dir.display(),
        publish_dir.display()
    )]
    DataInsidePublish {
        data_dir: PathBuf,
        publish_dir: PathBuf,
    },

    #[error(
        "Snapshot file {} must not be inside publish directory {}",
        output_file.display(),
        publish_dir.display()
    )]
    OutputInsidePublish {
        output_file: PathBuf,
        publish_dir: PathBuf,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Top-level error returned by CLI commands.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    StorageError(#[from] StorageError),

    #[error(transparent)]
    SnapshotError(#[from] SnapshotError),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Watch error: {0}")]
    WatchError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
