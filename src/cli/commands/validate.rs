//! Validate command implementation.
//!
//! The `exerun validate` command checks the configuration file and reports
//! every problem it finds.

use crate::config::validate_config;
use crate::error::Result;
use crate::output::BuildLog;

use super::dispatcher::{Command, CommandResult, EXIT_CONFIG};
use super::host::HostOptions;

/// The validate command implementation.
pub struct ValidateCommand {
    options: HostOptions,
}

impl ValidateCommand {
    pub fn new(options: &HostOptions) -> Self {
        Self {
            options: options.clone(),
        }
    }
}

impl Command for ValidateCommand {
    fn execute(&self, log: &dyn BuildLog) -> Result<CommandResult> {
        let paths = self.options.config_paths();
        let config = self.options.load_config()?;
        let errors = validate_config(&config);

        if errors.is_empty() {
            log.println(&format!("{} is valid", paths.config.display()));
            return Ok(CommandResult::success());
        }

        for error in &errors {
            log.error(&format!("[{}] {}", error.rule, error.message));
        }
        log.println(&format!(
            "{} problem(s) found in {}",
            errors.len(),
            paths.config.display()
        ));
        Ok(CommandResult::failure(EXIT_CONFIG))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{default_config_path, save_config, ExerunConfig, InstallationConfig};
    use crate::output::CapturedLog;
    use tempfile::TempDir;

    fn validate_workspace(config: &ExerunConfig) -> (CommandResult, CapturedLog) {
        let temp = TempDir::new().unwrap();
        save_config(config, &default_config_path(temp.path())).unwrap();
        let log = CapturedLog::new();
        let result = ValidateCommand::new(&HostOptions::new(temp.path()))
            .execute(&log)
            .unwrap();
        (result, log)
    }

    #[test]
    fn valid_config_passes() {
        let (result, log) = validate_workspace(&ExerunConfig::default());
        assert!(result.success);
        assert!(log.contains("is valid"));
    }

    #[test]
    fn reports_every_problem() {
        let config = ExerunConfig {
            installations: vec![
                InstallationConfig {
                    name: "tool".to_string(),
                    home: String::new(),
                    default_args: None,
                },
                InstallationConfig {
                    name: "tool".to_string(),
                    home: "/bin/tool".to_string(),
                    default_args: None,
                },
            ],
            ..Default::default()
        };

        let (result, log) = validate_workspace(&config);

        assert_eq!(result.exit_code, EXIT_CONFIG);
        assert!(log.contains("empty-home"));
        assert!(log.contains("duplicate-installation"));
        assert!(log.contains("2 problem(s)"));
    }
}
