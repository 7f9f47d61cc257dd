//! CLI Tooling
//!
//! Command-line interface for serving, indexing, snapshotting and repairing a
//! JSON data directory.

use crate::config::{ConfigLoader, VizConfig};
use crate::encoding::{normalize_dir, normalize_files, BatchReport};
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::server;
use crate::snapshot;
use crate::tooling::format::format_batch_report_text;
use crate::tree::{read_structure, DirectoryNode, StructureFormat};
use crate::watch::WatchDaemon;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// vizdata CLI - serve and maintain JSON data trees for visualizations
#[derive(Parser)]
#[command(name = "vizdata")]
#[command(about = "Serve, index, and repair directory trees of JSON data files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project root; relative config paths resolve against it
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Overlay logging flags onto a configured [`LoggingConfig`].
    pub fn apply_logging_overrides(&self, logging: &mut LoggingConfig) {
        if let Some(level) = &self.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            logging.file = Some(file.clone());
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the structure endpoint and the data files over HTTP
    Serve {
        /// Listen host (overrides server.host)
        #[arg(long)]
        host: Option<String>,
        /// Listen port (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the structure of the data directory as JSON
    Structure {
        /// Output shape (flat or tagged)
        #[arg(long, default_value = "flat")]
        format: String,
        /// Directory to read instead of the configured data directory
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Write the structure snapshot and publish a copy of the data tree
    Snapshot {
        /// Snapshot file (overrides snapshot.output_file)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Publish directory (overrides snapshot.publish_dir)
        #[arg(long)]
        publish_dir: Option<PathBuf>,
    },
    /// Repair BOM and UTF-16 encoded JSON files in place
    Fix {
        /// Files or directories to repair (default: the data directory)
        paths: Vec<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Watch the data directory and repair files as they change
    Watch {
        /// Delay before repairing a changed file
        #[arg(long)]
        settle_ms: Option<u64>,
        /// Skip the full repair pass before watching
        #[arg(long)]
        no_initial_pass: bool,
    },
    /// Print the effective configuration as TOML
    Config,
}

/// CLI context holding the resolved configuration
pub struct CliContext {
    root: PathBuf,
    config: VizConfig,
}

impl CliContext {
    /// Load, resolve and validate configuration for `root`.
    pub fn new(root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = ConfigLoader::load_resolved(&root, config_path.as_deref())?;
        Ok(Self { root, config })
    }

    /// Build a context from an already loaded configuration.
    pub fn with_config(root: PathBuf, config: VizConfig) -> Result<Self, ApiError> {
        let config = config.resolve_paths(&root);
        config.validate()?;
        Ok(Self { root, config })
    }

    pub fn config(&self) -> &VizConfig {
        &self.config
    }

    /// Execute a command and return its printable output.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        let result = match command {
            Commands::Serve { host, port } => self.handle_serve(host.clone(), *port),
            Commands::Structure { format, path } => self.handle_structure(format, path.clone()),
            Commands::Snapshot {
                output,
                publish_dir,
            } => self.handle_snapshot(output.clone(), publish_dir.clone()),
            Commands::Fix { paths, format } => self.handle_fix(paths, format),
            Commands::Watch {
                settle_ms,
                no_initial_pass,
            } => self.handle_watch(*settle_ms, *no_initial_pass),
            Commands::Config => self.handle_config(),
        };
        info!(
            command = command_name(command),
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn handle_serve(&self, host: Option<String>, port: Option<u16>) -> Result<String, ApiError> {
        let mut settings = self.config.server_settings();
        if let Some(host) = host {
            settings.host = host;
        }
        if let Some(port) = port {
            settings.port = port;
        }

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| ApiError::ServerError(format!("Failed to start runtime: {}", e)))?;
        runtime.block_on(server::serve(&settings))?;
        Ok("Server stopped".to_string())
    }

    fn handle_structure(&self, format: &str, path: Option<PathBuf>) -> Result<String, ApiError> {
        let format: StructureFormat = format.parse().map_err(ApiError::ConfigError)?;
        let dir = path
            .map(|p| self.root.join(p))
            .unwrap_or_else(|| self.config.data_dir.clone());

        let node = read_structure(&dir, &self.config.walker)?.unwrap_or_else(DirectoryNode::new);
        let rendered = node.render(format)?;
        Ok(serde_json::to_string_pretty(&rendered)?)
    }

    fn handle_snapshot(
        &self,
        output: Option<PathBuf>,
        publish_dir: Option<PathBuf>,
    ) -> Result<String, ApiError> {
        let mut settings = self.config.snapshot_settings();
        if let Some(output) = output {
            settings.output_file = self.root.join(output);
        }
        if let Some(publish_dir) = publish_dir {
            settings.publish_dir = self.root.join(publish_dir);
        }

        let report = snapshot::generate(&settings)?;
        Ok(serde_json::to_string_pretty(&report)?)
    }

    fn handle_fix(&self, paths: &[PathBuf], format: &str) -> Result<String, ApiError> {
        if format != "text" && format != "json" {
            return Err(ApiError::ConfigError(format!(
                "Invalid format: {} (must be 'text' or 'json')",
                format
            )));
        }

        let report = if paths.is_empty() {
            normalize_dir(&self.config.data_dir)?
        } else {
            let mut report = BatchReport::default();
            let (dirs, files): (Vec<PathBuf>, Vec<PathBuf>) = paths
                .iter()
                .map(|p| self.root.join(p))
                .partition(|p| p.is_dir());
            for dir in &dirs {
                report.merge(normalize_dir(dir)?);
            }
            report.merge(normalize_files(&files));
            report
        };

        if format == "json" {
            Ok(serde_json::to_string_pretty(&report)?)
        } else {
            Ok(format_batch_report_text(&report, &self.config.data_dir))
        }
    }

    fn handle_watch(
        &self,
        settle_ms: Option<u64>,
        no_initial_pass: bool,
    ) -> Result<String, ApiError> {
        let mut config = self.config.watch_config();
        if let Some(settle_ms) = settle_ms {
            config.settle_ms = settle_ms;
        }
        if no_initial_pass {
            config.normalize_on_start = false;
        }

        let daemon = WatchDaemon::new(config)?;
        daemon.start()?;
        Ok("Watch stopped".to_string())
    }

    fn handle_config(&self) -> Result<String, ApiError> {
        toml::to_string_pretty(&self.config)
            .map_err(|e| ApiError::ConfigError(format!("Failed to render configuration: {}", e)))
    }
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Serve { .. } => "serve",
        Commands::Structure { .. } => "structure",
        Commands::Snapshot { .. } => "snapshot",
        Commands::Fix { .. } => "fix",
        Commands::Watch { .. } => "watch",
        Commands::Config => "config",
    }
}
