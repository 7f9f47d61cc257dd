//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::VizConfig;
use crate::error::ApiError;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from files and environment.
    pub fn load(root: &Path) -> Result<VizConfig, ConfigError> {
        MergeService::load(root)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<VizConfig, ConfigError> {
        MergeService::load_from_file(path)
    }

    /// Load the configuration a command runs with.
    ///
    /// An explicit file replaces the global and `<root>/vizdata.toml` layers.
    /// Paths in the result are absolute against `root` and the server
    /// section has been validated.
    pub fn load_resolved(
        root: &Path,
        config_file: Option<&Path>,
    ) -> Result<VizConfig, ApiError> {
        let loaded = match config_file {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load(root)?,
        };
        let config = loaded.resolve_paths(root);
        config.validate()?;
        Ok(config)
    }

    /// Create default configuration.
    pub fn default() -> VizConfig {
        VizConfig::default()
    }
}
