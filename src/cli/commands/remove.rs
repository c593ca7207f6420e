//! Remove command implementation.

use crate::cli::args::RemoveArgs;
use crate::config::{save_config, validate};
use crate::error::{ExerunError, Result};
use crate::output::BuildLog;

use super::dispatcher::{Command, CommandResult};
use super::host::HostOptions;

/// The remove command implementation.
pub struct RemoveCommand {
    options: HostOptions,
    args: RemoveArgs,
}

impl RemoveCommand {
    pub fn new(options: &HostOptions, args: RemoveArgs) -> Self {
        Self {
            options: options.clone(),
            args,
        }
    }
}

impl Command for RemoveCommand {
    fn execute(&self, log: &dyn BuildLog) -> Result<CommandResult> {
        let mut config = self.options.load_config()?;
        let name = self.args.name.trim();

        let before = config.installations.len();
        config.installations.retain(|i| i.name != name);
        if config.installations.len() == before {
            return Err(ExerunError::InstallationNotFound {
                name: name.to_string(),
            });
        }

        // Steps still using the installation make this fail.
        validate(&config)?;
        save_config(&config, &self.options.config_paths().config)?;

        log.println(&format!("Removed installation '{}'", name));
        Ok(CommandResult::success())
    }
}
