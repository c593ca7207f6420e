//! Run command implementation.
//!
//! The `exerun run` command performs configured steps in order. An unstable
//! step lets the pipeline continue; a failing step stops it.

use crate::cli::args::RunArgs;
use crate::error::Result;
use crate::output::BuildLog;
use crate::steps::BuildResult;

use super::dispatcher::{Command, CommandResult};
use super::host::{BuildHost, HostOptions};

/// The run command implementation.
pub struct RunCommand {
    options: HostOptions,
    args: RunArgs,
}

impl RunCommand {
    pub fn new(options: &HostOptions, args: RunArgs) -> Self {
        Self {
            options: options.clone(),
            args,
        }
    }

    pub fn args(&self) -> &RunArgs {
        &self.args
    }
}

impl Command for RunCommand {
    fn execute(&self, log: &dyn BuildLog) -> Result<CommandResult> {
        let host = BuildHost::open(&self.options)?;

        // Unknown step names are reported before anything runs.
        let steps = self
            .args
            .steps
            .iter()
            .map(|name| host.step(name).map(|step| (name.as_str(), step)))
            .collect::<Result<Vec<_>>>()?;

        let mut overall = BuildResult::Success;
        for (name, step) in &steps {
            tracing::info!("Starting step '{}'", name);
            let result = host.perform(step, log)?;
            tracing::info!("Step '{}' finished: {}", name, result);
            overall = overall.combine(result);
        }

        log.println(&format!("{} Build {}", overall.display_char(), overall));
        Ok(CommandResult::from_build(overall))
    }
}
