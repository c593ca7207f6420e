//! Exec command implementation.
//!
//! The `exerun exec` command runs a registered installation without a
//! configured step.

use crate::cli::args::ExecArgs;
use crate::config::schema::FailurePolicy;
use crate::error::Result;
use crate::output::BuildLog;
use crate::steps::ExeStep;

use super::dispatcher::{Command, CommandResult};
use super::host::{BuildHost, HostOptions};

/// The exec command implementation.
pub struct ExecCommand {
    options: HostOptions,
    args: ExecArgs,
}

impl ExecCommand {
    pub fn new(options: &HostOptions, args: ExecArgs) -> Self {
        Self {
            options: options.clone(),
            args,
        }
    }

    fn step(&self) -> ExeStep {
        let policy = if self.args.lenient {
            FailurePolicy::Lenient
        } else {
            FailurePolicy::Strict
        };
        let step = ExeStep::new(&self.args.installation).with_failure_policy(policy);
        match &self.args.args {
            Some(args) => step.with_args(args),
            None => step,
        }
    }
}

impl Command for ExecCommand {
    fn execute(&self, log: &dyn BuildLog) -> Result<CommandResult> {
        let host = BuildHost::open(&self.options)?;
        let result = host.perform(&self.step(), log)?;
        Ok(CommandResult::from_build(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExerunError;
    use crate::output::CapturedLog;
    use tempfile::TempDir;

    fn exec(installation: &str, args: Option<&str>, lenient: bool) -> ExecCommand {
        ExecCommand::new(
            &HostOptions::default(),
            ExecArgs {
                installation: installation.to_string(),
                args: args.map(str::to_string),
                lenient,
            },
        )
    }

    #[test]
    fn step_reflects_flags() {
        let step = exec("tool", Some(" -v "), true).step();
        assert_eq!(step.installation(), "tool");
        assert_eq!(step.args(), Some("-v"));
        assert_eq!(step.failure_policy(), FailurePolicy::Lenient);

        let step = exec("tool", None, false).step();
        assert_eq!(step.args(), None);
        assert_eq!(step.failure_policy(), FailurePolicy::Strict);
    }

    #[test]
    fn unknown_installation_fails_before_launch() {
        let temp = TempDir::new().unwrap();
        let log = CapturedLog::new();
        let cmd = ExecCommand::new(
            &HostOptions::new(temp.path()),
            ExecArgs {
                installation: "missing".to_string(),
                args: None,
                lenient: false,
            },
        );

        let result = cmd.execute(&log);

        assert!(matches!(
            result,
            Err(ExerunError::InstallationNotFound { .. })
        ));
        assert!(log.lines().is_empty());
    }
}
