//! Logging System
//!
//! Structured logging on top of `tracing`. Level, format and destination come
//! from [`LoggingConfig`], each overridable through `VIZDATA_LOG*` variables.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Resolve the log file path with precedence: CLI, VIZDATA_LOG_FILE env, config file, default.
pub fn resolve_log_file_path(
    cli_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
) -> Result<PathBuf, ApiError> {
    if let Some(p) = cli_file.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(p);
    }
    if let Ok(env_path) = std::env::var("VIZDATA_LOG_FILE") {
        if !env_path.is_empty() {
            return Ok(PathBuf::from(env_path));
        }
    }
    if let Some(p) = config_file.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(p);
    }
    default_log_file_path()
}

fn default_log_file_path() -> Result<PathBuf, ApiError> {
    let project_dirs = directories::ProjectDirs::from("", "vizdata", "vizdata").ok_or_else(|| {
        ApiError::ConfigError("Could not determine platform directories for log file".to_string())
    })?;
    // macOS and Windows have no state dir
    let dir = project_dirs
        .state_dir()
        .unwrap_or_else(|| project_dirs.data_local_dir());
    Ok(dir.join("vizdata.log"))
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file, file+stderr, both
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path when output includes file; None means use runtime default
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Colored output (text format on a terminal stream only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Per-module levels, e.g. `tower_http = "debug"`
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogOutput {
    Stdout,
    Stderr,
    File,
    FileAndStderr,
    Both,
}

impl LogOutput {
    fn writes_file(self) -> bool {
        matches!(self, LogOutput::File | LogOutput::FileAndStderr)
    }
}

impl std::str::FromStr for LogOutput {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stdout" => Ok(LogOutput::Stdout),
            "stderr" => Ok(LogOutput::Stderr),
            "file" => Ok(LogOutput::File),
            "file+stderr" => Ok(LogOutput::FileAndStderr),
            "both" => Ok(LogOutput::Both),
            _ => Err(ApiError::ConfigError(format!(
                "Invalid log output: {} (must be 'stdout', 'stderr', 'file', 'file+stderr', or 'both')",
                s
            ))),
        }
    }
}

/// Initialize the logging system
///
/// Priority order (highest to lowest):
/// 1. Environment variables (VIZDATA_LOG, VIZDATA_LOG_FORMAT, ...)
/// 2. The given config (CLI flags are merged into it by the caller)
/// 3. Defaults
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ApiError> {
    if config.map_or(false, |c| !c.enabled) {
        return Registry::default()
            .with(EnvFilter::new("off"))
            .try_init()
            .map_err(|e| ApiError::ConfigError(format!("Failed to install logger: {}", e)));
    }

    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let output = determine_output(config)?;
    let use_color = config.map_or(true, |c| c.color) && !output.writes_file();
    let writer = make_writer(output, config)?;

    let registry = Registry::default().with(filter);
    let layer = fmt::layer()
        .with_target(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(writer);

    let installed = match format {
        LogFormat::Json => registry.with(layer.json()).try_init(),
        LogFormat::Text => registry.with(layer.with_ansi(use_color)).try_init(),
    };
    installed.map_err(|e| ApiError::ConfigError(format!("Failed to install logger: {}", e)))
}

fn make_writer(
    output: LogOutput,
    config: Option<&LoggingConfig>,
) -> Result<BoxMakeWriter, ApiError> {
    let writer = match output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogOutput::Both => BoxMakeWriter::new(std::io::stdout.and(std::io::stderr)),
        LogOutput::File => BoxMakeWriter::new(open_log_file(config)?),
        LogOutput::FileAndStderr => {
            BoxMakeWriter::new(open_log_file(config)?.and(std::io::stderr))
        }
    };
    Ok(writer)
}

fn open_log_file(config: Option<&LoggingConfig>) -> Result<Arc<std::fs::File>, ApiError> {
    let log_file = resolve_log_file_path(None, config.and_then(|c| c.file.clone()))?;
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ApiError::ConfigError(format!("Failed to create log directory: {}", e))
        })?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .map_err(|e| {
            ApiError::ConfigError(format!("Failed to open log file {:?}: {}", log_file, e))
        })?;
    Ok(Arc::new(file))
}

/// Build environment filter from config or environment variables
fn build_env_filter(config: Option<&LoggingConfig>) -> Result<EnvFilter, ApiError> {
    if let Ok(filter) = EnvFilter::try_from_env("VIZDATA_LOG") {
        return Ok(filter);
    }

    let level = config.map(|c| c.level.as_str()).unwrap_or("info");
    if level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut directives: Vec<String> = Vec::new();
    if let Some(config) = config {
        directives.extend(
            config
                .modules
                .iter()
                .map(|(module, module_level)| format!("{}={}", module, module_level)),
        );
    }
    if let Ok(modules_str) = std::env::var("VIZDATA_LOG_MODULES") {
        directives.extend(module_directives(&modules_str));
    }

    let mut filter = EnvFilter::new(level);
    for directive in directives {
        filter = filter.add_directive(
            directive
                .parse()
                .map_err(|e| ApiError::ConfigError(format!("Invalid log directive: {}", e)))?,
        );
    }
    Ok(filter)
}

/// Parse `module=level,module=level` into filter directives.
fn module_directives(spec: &str) -> Vec<String> {
    spec.split(',')
        .filter_map(|part| part.split_once('='))
        .map(|(module, level)| format!("{}={}", module.trim(), level.trim()))
        .collect()
}

fn determine_format(config: Option<&LoggingConfig>) -> Result<LogFormat, ApiError> {
    let from_env = std::env::var("VIZDATA_LOG_FORMAT").ok();
    let format = from_env
        .as_deref()
        .filter(|f| *f == "json" || *f == "text")
        .or_else(|| config.map(|c| c.format.as_str()))
        .unwrap_or("text");

    match format {
        "json" => Ok(LogFormat::Json),
        "text" => Ok(LogFormat::Text),
        other => Err(ApiError::ConfigError(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            other
        ))),
    }
}

fn determine_output(config: Option<&LoggingConfig>) -> Result<LogOutput, ApiError> {
    if let Ok(output) = std::env::var("VIZDATA_LOG_OUTPUT") {
        return output.parse();
    }
    config.map(|c| c.output.as_str()).unwrap_or("stderr").parse()
}
