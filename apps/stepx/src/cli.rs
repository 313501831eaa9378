//! Command line interface definition

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// stepx - Toolchain build-step executor for CI jobs
#[derive(Parser)]
#[command(name = "stepx")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Toolchain build-step executor for CI jobs")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Use alternate config file
    #[arg(long, global = true, env = "STEPX_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Execute a configured build step and report its verdict
    #[command(alias = "r")]
    Run {
        /// Step name from the configuration file
        step: String,

        /// Working directory for the step (defaults to the current dir)
        #[arg(short, long, value_name = "DIR")]
        working_dir: Option<PathBuf>,
    },

    /// List the available command natures
    Natures,

    /// List the configured toolchain installations
    #[command(alias = "ls")]
    Installations,

    /// List the configured build steps
    Steps,

    /// Show the merged matrix axis values
    Axis {
        /// Selected default value (repeatable; defaults to the full
        /// built-in list when omitted)
        #[arg(long = "value", value_name = "VALUE")]
        values: Vec<String>,

        /// Extra values as free-form text
        #[arg(long, value_name = "TEXT")]
        extra: Option<String>,

        /// Print only the extracted extras string
        #[arg(long)]
        extras_only: bool,
    },
}
