//! Command-line interface for exerun.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{AddArgs, Cli, Commands, ExecArgs, ListArgs, RemoveArgs, RunArgs};
pub use commands::{
    BuildHost, Command, CommandDispatcher, CommandResult, HostOptions, EXIT_CONFIG, EXIT_FAILURE,
    EXIT_UNSTABLE,
};
