//! MergeService: orchestrates sources, applies merge policy, deserializes to VizConfig.

use crate::config::sources::{environment, global_file, workspace_file};
use crate::config::VizConfig;
use config::{ConfigError, File};
use std::path::Path;

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config for a project root.
    /// Precedence: defaults (lowest) -> global file -> `<root>/vizdata.toml`
    /// -> environment (highest).
    pub fn load(root: &Path) -> Result<VizConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, root)?;
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<VizConfig, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let builder = merge_policy::builder_with_defaults()?;
        let builder = builder.add_source(File::from(path));
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }
}
