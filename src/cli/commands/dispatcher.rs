//! Command dispatching.
//!
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::time::Duration;

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::output::BuildLog;
use crate::shell::CancelToken;
use crate::steps::BuildResult;

use super::host::HostOptions;

/// Exit code for a failed build.
pub const EXIT_FAILURE: i32 = 1;

/// Exit code for configuration problems.
pub const EXIT_CONFIG: i32 = 2;

/// Exit code for an unstable build.
pub const EXIT_UNSTABLE: i32 = 3;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command, writing user-facing output to `log`.
    fn execute(&self, log: &dyn BuildLog) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Report a build result.
    pub fn from_build(result: BuildResult) -> Self {
        match result {
            BuildResult::Success => Self::success(),
            BuildResult::Unstable => Self::failure(EXIT_UNSTABLE),
            BuildResult::Failure => Self::failure(EXIT_FAILURE),
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    options: HostOptions,
}

impl CommandDispatcher {
    pub fn new(options: HostOptions) -> Self {
        Self { options }
    }

    /// Build a dispatcher from parsed global flags.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let workspace = match &cli.workspace {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        Ok(Self::new(HostOptions {
            workspace,
            config: cli.config.clone(),
            node: cli.node.clone(),
            job_name: cli.job.clone(),
            build_number: cli.build_number,
            timeout: cli.timeout.map(Duration::from_secs),
            cancel: CancelToken::new(),
        }))
    }

    pub fn options(&self) -> &HostOptions {
        &self.options
    }

    /// Token that aborts whatever build this dispatcher runs.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.options.cancel
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, command: &Commands, log: &dyn BuildLog) -> Result<CommandResult> {
        match command {
            Commands::Run(args) => {
                super::run::RunCommand::new(&self.options, args.clone()).execute(log)
            }
            Commands::Exec(args) => {
                super::exec::ExecCommand::new(&self.options, args.clone()).execute(log)
            }
            Commands::List(args) => {
                super::list::ListCommand::new(&self.options, args.clone()).execute(log)
            }
            Commands::Add(args) => {
                super::add::AddCommand::new(&self.options, args.clone()).execute(log)
            }
            Commands::Remove(args) => {
                super::remove::RemoveCommand::new(&self.options, args.clone()).execute(log)
            }
            Commands::Validate => super::validate::ValidateCommand::new(&self.options).execute(log),
        }
    }
}
