//! CLI command definitions and execution
//!
//! This module contains all CLI commands and their implementations.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mc_core::ConfigStore;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod alias;
mod completions;
mod config;

/// mc - Minio Client
///
/// A command-line interface for S3-compatible object storage services.
#[derive(Parser, Debug)]
#[command(name = "mc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    /// Directory holding config.json (default: ~/.mc)
    #[arg(long, global = true, env = "MC_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage storage service aliases
    #[command(subcommand)]
    Alias(alias::AliasCommands),

    /// Manage the configuration file
    #[command(subcommand)]
    Config(config::ConfigCommands),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

/// Open the config store selected by --config-dir, or the default one
fn open_store(config_dir: Option<PathBuf>) -> mc_core::Result<ConfigStore> {
    match config_dir {
        Some(dir) => Ok(ConfigStore::in_dir(dir)),
        None => ConfigStore::new(),
    }
}

/// Run a command against the selected store, reporting a store error
fn with_store(
    config_dir: Option<PathBuf>,
    formatter: &Formatter,
    run: impl FnOnce(ConfigStore) -> ExitCode,
) -> ExitCode {
    match open_store(config_dir) {
        Ok(store) => {
            tracing::debug!(path = %store.config_path().display(), "Using configuration file");
            run(store)
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}

/// Execute the CLI command and return an exit code
pub fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        quiet: cli.quiet,
    };
    let formatter = Formatter::new(output_config);

    match cli.command {
        Commands::Alias(cmd) => with_store(cli.config_dir, &formatter, |store| {
            alias::execute(cmd, store, &formatter)
        }),
        Commands::Config(cmd) => with_store(cli.config_dir, &formatter, |store| {
            config::execute(cmd, store, &formatter)
        }),
        Commands::Completions(args) => completions::execute(args),
    }
}
