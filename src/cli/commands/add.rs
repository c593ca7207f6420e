//! Add command implementation.
//!
//! The `exerun add` command registers an installation, or updates the one
//! with the same name, and saves the configuration.

use crate::cli::args::AddArgs;
use crate::config::{fix_empty_and_trim, save_config, validate, InstallationConfig};
use crate::error::Result;
use crate::output::BuildLog;

use super::dispatcher::{Command, CommandResult};
use super::host::HostOptions;

/// The add command implementation.
pub struct AddCommand {
    options: HostOptions,
    args: AddArgs,
}

impl AddCommand {
    pub fn new(options: &HostOptions, args: AddArgs) -> Self {
        Self {
            options: options.clone(),
            args,
        }
    }

    fn installation(&self) -> InstallationConfig {
        InstallationConfig {
            name: self.args.name.trim().to_string(),
            home: self.args.home.trim().to_string(),
            default_args: fix_empty_and_trim(self.args.default_args.as_deref()),
        }
    }
}

impl Command for AddCommand {
    fn execute(&self, log: &dyn BuildLog) -> Result<CommandResult> {
        let mut config = self.options.load_config()?;
        let installation = self.installation();
        let name = installation.name.clone();

        let updated = match config.installations.iter_mut().find(|i| i.name == name) {
            Some(existing) => {
                *existing = installation;
                true
            }
            None => {
                config.installations.push(installation);
                false
            }
        };

        // A config that validates always loads into a registry.
        validate(&config)?;
        save_config(&config, &self.options.config_paths().config)?;

        tracing::debug!("Config now holds {} installation(s)", config.installations.len());
        let verb = if updated { "Updated" } else { "Added" };
        log.println(&format!("{} installation '{}'", verb, name));
        Ok(CommandResult::success())
    }
}
