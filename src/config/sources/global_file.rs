//! User-level config file: `<platform config dir>/vizdata/config.toml`

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::PathBuf;

/// Location of the user-level config file, if the platform has one.
pub fn path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "vizdata", "vizdata")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    match path() {
        Some(path) => Ok(builder.add_source(File::from(path).required(false))),
        None => Ok(builder),
    }
}
