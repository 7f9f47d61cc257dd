//! Project config file: `<root>/vizdata.toml`

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::{Path, PathBuf};

pub const FILE_NAME: &str = "vizdata.toml";

pub fn path(root: &Path) -> PathBuf {
    root.join(FILE_NAME)
}

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(File::from(path(root)).required(false)))
}
