//! vizdata CLI Binary
//!
//! Command-line interface for serving and maintaining JSON data trees.

use anyhow::Context;
use clap::Parser;
use vizdata::logging::init_logging;
use vizdata::tooling::cli::{Cli, CliContext};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let context = CliContext::new(cli.root.clone(), cli.config.clone())
        .context("Error initializing configuration")?;

    let mut logging = context.config().logging.clone();
    cli.apply_logging_overrides(&mut logging);
    init_logging(Some(&logging)).context("Error initializing logging")?;

    let output = context.execute(&cli.command)?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}
