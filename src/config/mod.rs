//! Configuration
//!
//! Layered configuration for every component. Paths in the file are relative
//! to the project root and are made absolute by [`VizConfig::resolve_paths`]
//! before any component sees them.

mod facade;
pub mod merge;
pub mod sources;

pub use facade::ConfigLoader;

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::server::ServerSettings;
use crate::snapshot::SnapshotSettings;
use crate::tree::{StructureFormat, WalkerConfig};
use crate::watch::WatchConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_structure_endpoint() -> String {
    "data-structure".to_string()
}

fn default_data_mount() -> String {
    "data".to_string()
}

fn default_output_file() -> PathBuf {
    PathBuf::from("public/data-structure.json")
}

fn default_publish_dir() -> PathBuf {
    PathBuf::from("public/data")
}

fn default_settle_ms() -> u64 {
    500
}

fn default_poll_interval_ms() -> u64 {
    200
}

fn default_true() -> bool {
    true
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VizConfig {
    /// Root of the JSON data tree
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub walker: WalkerConfig,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub snapshot: SnapshotSection,

    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[server]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Served at `/api/<structure_endpoint>`
    #[serde(default = "default_structure_endpoint")]
    pub structure_endpoint: String,

    /// Static files are served under `/<data_mount>/`
    #[serde(default = "default_data_mount")]
    pub data_mount: String,

    #[serde(default = "default_true")]
    pub cors: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            structure_endpoint: default_structure_endpoint(),
            data_mount: default_data_mount(),
            cors: default_true(),
        }
    }
}

/// `[snapshot]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotSection {
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,

    #[serde(default = "default_publish_dir")]
    pub publish_dir: PathBuf,

    #[serde(default)]
    pub format: StructureFormat,
}

impl Default for SnapshotSection {
    fn default() -> Self {
        Self {
            output_file: default_output_file(),
            publish_dir: default_publish_dir(),
            format: StructureFormat::default(),
        }
    }
}

/// `[watch]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchSection {
    /// Delay before normalizing a changed file
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Normalize the whole data directory before watching
    #[serde(default = "default_true")]
    pub normalize_on_start: bool,
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            settle_ms: default_settle_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            normalize_on_start: default_true(),
        }
    }
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            walker: WalkerConfig::default(),
            server: ServerSection::default(),
            snapshot: SnapshotSection::default(),
            watch: WatchSection::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Route paths must be literal: axum treats `:name` and `*name` segments as
/// captures and panics on malformed ones.
fn check_route_path(key: &str, raw: &str) -> Result<(), ApiError> {
    let path = raw.trim_matches('/');
    let literal = !path.is_empty()
        && !path.contains(char::is_whitespace)
        && !path.contains(['*', '{', '}'])
        && path
            .split('/')
            .all(|segment| !segment.is_empty() && !segment.starts_with(':'));
    if literal {
        Ok(())
    } else {
        Err(ApiError::ConfigError(format!("Invalid {}: '{}'", key, raw)))
    }
}

impl VizConfig {
    /// Make every configured path absolute relative to `root`.
    pub fn resolve_paths(mut self, root: &Path) -> Self {
        self.data_dir = root.join(&self.data_dir);
        self.snapshot.output_file = root.join(&self.snapshot.output_file);
        self.snapshot.publish_dir = root.join(&self.snapshot.publish_dir);
        if let Some(file) = self.logging.file.take() {
            self.logging.file = Some(root.join(file));
        }
        self
    }

    /// Reject values that would produce an unroutable server.
    pub fn validate(&self) -> Result<(), ApiError> {
        check_route_path("server.structure_endpoint", &self.server.structure_endpoint)?;
        check_route_path("server.data_mount", &self.server.data_mount)?;

        let mount = self.server.data_mount.trim_matches('/');
        if mount == "api" || mount.starts_with("api/") {
            return Err(ApiError::ConfigError(
                "server.data_mount must not shadow the /api prefix".to_string(),
            ));
        }
        if mount == "health" {
            return Err(ApiError::ConfigError(
                "server.data_mount must not shadow /health".to_string(),
            ));
        }

        Ok(())
    }

    pub fn server_settings(&self) -> ServerSettings {
        ServerSettings {
            data_dir: self.data_dir.clone(),
            walker: self.walker.clone(),
            host: self.server.host.clone(),
            port: self.server.port,
            structure_endpoint: self.server.structure_endpoint.trim_matches('/').to_string(),
            data_mount: self.server.data_mount.trim_matches('/').to_string(),
            cors: self.server.cors,
        }
    }

    pub fn snapshot_settings(&self) -> SnapshotSettings {
        SnapshotSettings {
            data_dir: self.data_dir.clone(),
            output_file: self.snapshot.output_file.clone(),
            publish_dir: self.snapshot.publish_dir.clone(),
            format: self.snapshot.format,
            walker: self.walker.clone(),
        }
    }

    pub fn watch_config(&self) -> WatchConfig {
        WatchConfig {
            data_dir: self.data_dir.clone(),
            settle_ms: self.watch.settle_ms,
            poll_interval_ms: self.watch.poll_interval_ms,
            normalize_on_start: self.watch.normalize_on_start,
        }
    }
}
