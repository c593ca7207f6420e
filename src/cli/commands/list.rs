//! List command implementation.
//!
//! The `exerun list` command lists registered installations.

use console::style;

use crate::cli::args::ListArgs;
use crate::config::InstallationConfig;
use crate::error::{ExerunError, Result};
use crate::output::BuildLog;

use super::dispatcher::{Command, CommandResult};
use super::host::HostOptions;

/// The list command implementation.
pub struct ListCommand {
    options: HostOptions,
    args: ListArgs,
}

impl ListCommand {
    pub fn new(options: &HostOptions, args: ListArgs) -> Self {
        Self {
            options: options.clone(),
            args,
        }
    }

    pub fn args(&self) -> &ListArgs {
        &self.args
    }
}

impl Command for ListCommand {
    fn execute(&self, log: &dyn BuildLog) -> Result<CommandResult> {
        let config = self.options.load_config()?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&config.installations)
                .map_err(|e| ExerunError::Other(e.into()))?;
            log.println(&json);
            return Ok(CommandResult::success());
        }

        if config.installations.is_empty() {
            log.println("No installations registered.");
            return Ok(CommandResult::success());
        }

        log.println(&format!("  {}", style("Installations:").bold()));
        for installation in &config.installations {
            log.println(&describe(installation));
        }

        Ok(CommandResult::success())
    }
}

fn describe(installation: &InstallationConfig) -> String {
    let mut line = format!(
        "    {} {}",
        style(&installation.name).cyan(),
        style(&installation.home).dim()
    );
    if let Some(args) = &installation.default_args {
        line.push_str(&format!(" {}", style(format!("(default args: {})", args)).dim()));
    }
    line
}
