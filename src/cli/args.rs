//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// exerun - Run registered command line tools as build steps.
#[derive(Debug, Parser)]
#[command(name = "exerun")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .exerun/config.yml)
    #[arg(short, long, global = true, env = "EXERUN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Build workspace (overrides current directory)
    #[arg(short, long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Configured node profile to run on (default: this machine)
    #[arg(short, long, global = true)]
    pub node: Option<String>,

    /// Job name exposed as JOB_NAME
    #[arg(long, global = true, value_name = "NAME")]
    pub job: Option<String>,

    /// Build number exposed as BUILD_NUMBER
    #[arg(long, global = true, value_name = "N")]
    pub build_number: Option<u64>,

    /// Kill the tool and fail the build after this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run configured steps in order
    Run(RunArgs),

    /// Run an installation directly
    Exec(ExecArgs),

    /// List registered installations
    List(ListArgs),

    /// Register or update an installation
    Add(AddArgs),

    /// Unregister an installation
    Remove(RemoveArgs),

    /// Validate configuration file
    Validate,
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RunArgs {
    /// Steps to run; the pipeline stops at the first failure
    #[arg(required = true, value_name = "STEP")]
    pub steps: Vec<String>,
}

/// Arguments for the `exec` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ExecArgs {
    /// Installation to run
    pub installation: String,

    /// Arguments appended after the installation's default arguments
    #[arg(short, long, allow_hyphen_values = true)]
    pub args: Option<String>,

    /// Mark the build unstable instead of failing on a non-zero exit
    #[arg(long)]
    pub lenient: bool,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Print installations as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `add` command.
#[derive(Debug, Clone, clap::Args)]
pub struct AddArgs {
    /// Installation name
    pub name: String,

    /// Path to the executable; may reference environment variables
    pub home: String,

    /// Arguments placed before every step's own arguments
    #[arg(long, allow_hyphen_values = true)]
    pub default_args: Option<String>,
}

/// Arguments for the `remove` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RemoveArgs {
    /// Installation name
    pub name: String,
}
