//! Environment variable source: `VIZDATA__SECTION__KEY` overrides `section.key`.
//!
//! The single-underscore `VIZDATA_LOG*` variables belong to the logging layer
//! and never reach this source: the prefix separator is `__` as well.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, Map};

/// Prefix shared by every configuration environment variable.
pub const ENV_PREFIX: &str = "VIZDATA";

/// Environment source over `vars`, or over the process environment when `None`.
pub fn source(vars: Option<Map<String, String>>) -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
        .source(vars)
}

/// Add the process environment overlay to builder.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(source(None)))
}
