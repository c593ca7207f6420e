//! Step execution engine.
//!
//! Runs one tool invocation end to end: resolve the installation, verify the
//! executable, expand arguments, assemble the platform command line, run it
//! and map the exit code onto a [`BuildResult`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::schema::{fix_empty_and_trim, FailurePolicy, StepConfig};
use crate::error::{ExerunError, Result};
use crate::expand::{expand, BuildContext};
use crate::node::Node;
use crate::output::BuildLog;
use crate::registry::{resolve, InstallationRegistry, ResolvedInstallation};
use crate::shell::cancel::CancelToken;
use crate::shell::command::build_command_line;
use crate::shell::process::run_command_line;
use crate::steps::outcome::{map_outcome, BuildResult};

/// Everything a step needs from its host.
#[derive(Clone, Copy)]
pub struct StepContext<'a> {
    pub registry: &'a InstallationRegistry,
    pub node: &'a dyn Node,
    pub build: &'a dyn BuildContext,
    /// Working directory of the process; batch scripts are created here too.
    pub workspace: &'a Path,
    pub log: &'a dyn BuildLog,
    pub cancel: &'a CancelToken,
}

/// A fully resolved invocation, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub executable_path: String,
    /// Expanded arguments; never empty or whitespace-only.
    pub arguments: Vec<String>,
    pub working_directory: PathBuf,
    pub environment: HashMap<String, String>,
}

impl ExecutionRequest {
    /// Executable followed by its arguments.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.executable_path.clone())
            .chain(self.arguments.iter().cloned())
            .collect()
    }
}

/// A build step that runs a registered tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExeStep {
    installation: String,
    args: Option<String>,
    failure_policy: FailurePolicy,
}

impl ExeStep {
    /// Create a step for `installation` with no arguments and the strict policy.
    pub fn new(installation: &str) -> Self {
        Self {
            installation: installation.to_string(),
            args: None,
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn from_config(config: &StepConfig) -> Self {
        Self {
            installation: config.installation.clone(),
            args: fix_empty_and_trim(config.args.as_deref()),
            failure_policy: config.failure_policy,
        }
    }

    /// Set the manual argument string. Blank strings clear it.
    pub fn with_args(mut self, args: &str) -> Self {
        self.args = fix_empty_and_trim(Some(args));
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn installation(&self) -> &str {
        &self.installation
    }

    pub fn args(&self) -> Option<&str> {
        self.args.as_deref()
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Resolve, verify and expand into an [`ExecutionRequest`].
    ///
    /// # Errors
    ///
    /// - `InstallationNotFound` before any other work is done
    /// - `ExecutablePathMissing` if the executable is not on the node
    pub fn prepare(&self, ctx: &StepContext<'_>) -> Result<ExecutionRequest> {
        let env = ctx.build.environment();
        let installation = resolve(ctx.registry, &self.installation, ctx.node, env)?;
        let executable_path = verify_executable(&installation, ctx)?;

        let mut arguments = Vec::new();
        if let Some(default_args) = installation.default_args() {
            arguments.extend(expand(default_args, ctx.build, ctx.log));
        }
        if let Some(args) = &self.args {
            arguments.extend(expand(args, ctx.build, ctx.log));
        }

        Ok(ExecutionRequest {
            executable_path,
            arguments,
            working_directory: ctx.workspace.to_path_buf(),
            environment: env.clone(),
        })
    }

    /// Run the step and report its build result.
    ///
    /// # Errors
    ///
    /// Every error is fatal to the build: configuration and resolution
    /// errors, launch failures, cancellation, a passed deadline, and a
    /// non-zero exit under the strict policy (`NonZeroExit`).
    pub fn perform(&self, ctx: &StepContext<'_>) -> Result<BuildResult> {
        tracing::info!(
            "Running installation '{}' ({} policy)",
            self.installation,
            self.failure_policy
        );

        let request = self.prepare(ctx)?;
        let command_line = build_command_line(
            &request.executable_path,
            &request.arguments,
            &ctx.node.platform(),
            &request.working_directory,
        )?;

        ctx.log
            .println(&format!("Executing : {}", command_line.display()));

        let outcome = run_command_line(
            command_line,
            &request.environment,
            &request.working_directory,
            ctx.log,
            ctx.cancel,
        )?;

        match map_outcome(&outcome, self.failure_policy) {
            BuildResult::Success => Ok(BuildResult::Success),
            BuildResult::Unstable => {
                ctx.log
                    .println(&format!("Exe exited with code: {}", outcome.exit_code));
                Ok(BuildResult::Unstable)
            }
            BuildResult::Failure if outcome.timed_out => Err(ExerunError::TimedOut),
            BuildResult::Failure => Err(ExerunError::NonZeroExit {
                code: outcome.exit_code,
            }),
        }
    }
}

/// Check the resolved executable exists on the node and return its path.
fn verify_executable(installation: &ResolvedInstallation, ctx: &StepContext<'_>) -> Result<String> {
    let path = installation.home_path();

    if path.trim().is_empty() {
        ctx.log.error("Exe path is blank.");
        return Err(ExerunError::ExecutablePathMissing {
            path: path.to_string(),
            reason: "path is blank".to_string(),
        });
    }

    match ctx.node.path_exists(Path::new(path)) {
        Ok(true) => {}
        Ok(false) => {
            ctx.log.error(&format!("{} doesn't exist", path));
            return Err(ExerunError::ExecutablePathMissing {
                path: path.to_string(),
                reason: "doesn't exist".to_string(),
            });
        }
        Err(e) => {
            ctx.log
                .error(&format!("Failed checking for existence of {}", path));
            return Err(ExerunError::ExecutablePathMissing {
                path: path.to_string(),
                reason: e.to_string(),
            });
        }
    }

    ctx.log.println(&format!("Path To exe: {}", path));
    Ok(path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::EnvContext;
    use crate::node::LocalNode;
    use crate::output::CapturedLog;
    use crate::registry::InstallationTemplate;
    use crate::shell::platform::Platform;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn no_scripts_left(dir: &Path) -> bool {
        std::fs::read_dir(dir).unwrap().all(|entry| {
            !entry
                .unwrap()
                .file_name()
                .to_string_lossy()
                .starts_with(crate::shell::SCRIPT_PREFIX)
        })
    }

    struct Fixture {
        tools: TempDir,
        workspace: TempDir,
        registry: InstallationRegistry,
        build: EnvContext,
        log: CapturedLog,
        cancel: CancelToken,
    }

    impl Fixture {
        fn new(installations: Vec<InstallationTemplate>) -> Self {
            let workspace = TempDir::new().unwrap();
            let mut env = HashMap::new();
            env.insert(
                "WORKSPACE".to_string(),
                workspace.path().display().to_string(),
            );
            Self {
                tools: TempDir::new().unwrap(),
                workspace,
                registry: InstallationRegistry::with_installations(installations).unwrap(),
                build: EnvContext::new(env),
                log: CapturedLog::new(),
                cancel: CancelToken::new(),
            }
        }

        fn ctx<'a>(&'a self, node: &'a dyn Node) -> StepContext<'a> {
            StepContext {
                registry: &self.registry,
                node,
                build: &self.build,
                workspace: self.workspace.path(),
                log: &self.log,
                cancel: &self.cancel,
            }
        }
    }

    #[test]
    fn missing_installation_fails_without_logging() {
        let fixture = Fixture::new(vec![]);
        let node = LocalNode::new();

        let result = ExeStep::new("missing").perform(&fixture.ctx(&node));

        assert!(matches!(
            result,
            Err(ExerunError::InstallationNotFound { .. })
        ));
        assert!(fixture.log.lines().is_empty());
    }

    #[test]
    fn missing_executable_is_reported_before_launch() {
        let fixture = Fixture::new(vec![InstallationTemplate::new(
            "tool",
            "/definitely/not/here/tool",
            None,
        )]);
        let node = LocalNode::new();

        let result = ExeStep::new("tool").perform(&fixture.ctx(&node));

        assert!(matches!(
            result,
            Err(ExerunError::ExecutablePathMissing { .. })
        ));
        assert!(fixture.log.contains("doesn't exist"));
        assert!(!fixture.log.contains("Executing"));
    }

    #[test]
    fn blank_executable_path_is_missing() {
        let fixture = Fixture::new(vec![InstallationTemplate::new("tool", "  ", None)]);
        let node = LocalNode::new();

        let result = ExeStep::new("tool").prepare(&fixture.ctx(&node));

        assert!(matches!(
            result,
            Err(ExerunError::ExecutablePathMissing { .. })
        ));
    }

    #[test]
    #[cfg(unix)]
    fn prepare_orders_default_then_manual_args() {
        let mut fixture = Fixture::new(vec![]);
        let tool = write_script(fixture.tools.path(), "tool", "exit 0");
        fixture.registry = InstallationRegistry::with_installations(vec![
            InstallationTemplate::new("tool", &tool.display().to_string(), Some("--verbose  -x")),
        ])
        .unwrap();
        let node = LocalNode::with_platform(Platform::Unix);

        let request = ExeStep::new("tool")
            .with_args("--input=$WORKSPACE/a.txt\n${UNSET_OPTIONAL}")
            .prepare(&fixture.ctx(&node))
            .unwrap();

        let workspace = fixture.workspace.path().display().to_string();
        assert_eq!(request.executable_path, tool.display().to_string());
        assert_eq!(
            request.arguments,
            vec![
                "--verbose".to_string(),
                "-x".to_string(),
                format!("--input={}/a.txt", workspace),
                "${UNSET_OPTIONAL}".to_string(),
            ]
        );
        assert_eq!(request.argv()[0], tool.display().to_string());
        assert_eq!(request.working_directory, fixture.workspace.path());
        assert!(fixture.log.contains("Path To exe:"));
    }

    #[test]
    #[cfg(unix)]
    fn unix_success() {
        let mut fixture = Fixture::new(vec![]);
        let tool = write_script(fixture.tools.path(), "tool", "echo ran \"$@\"");
        fixture.registry = InstallationRegistry::with_installations(vec![
            InstallationTemplate::new("tool", &tool.display().to_string(), Some("--verbose")),
        ])
        .unwrap();
        let node = LocalNode::with_platform(Platform::Unix);

        let result = ExeStep::new("tool")
            .with_args("a b")
            .perform(&fixture.ctx(&node))
            .unwrap();

        assert_eq!(result, BuildResult::Success);
        assert!(fixture.log.contains("Executing :"));
        assert!(fixture.log.contains("ran --verbose a b"));
    }

    #[test]
    #[cfg(unix)]
    fn strict_non_zero_exit_is_fatal() {
        let mut fixture = Fixture::new(vec![]);
        let tool = write_script(fixture.tools.path(), "tool", "exit 1");
        fixture.registry = InstallationRegistry::with_installations(vec![
            InstallationTemplate::new("tool", &tool.display().to_string(), None),
        ])
        .unwrap();
        let node = LocalNode::with_platform(Platform::Unix);

        let result = ExeStep::new("tool").perform(&fixture.ctx(&node));

        assert!(matches!(result, Err(ExerunError::NonZeroExit { code: 1 })));
        assert_eq!(BuildResult::of(&result), BuildResult::Failure);
    }

    #[test]
    #[cfg(unix)]
    fn lenient_non_zero_exit_is_unstable() {
        let mut fixture = Fixture::new(vec![]);
        let tool = write_script(fixture.tools.path(), "tool", "exit 2");
        fixture.registry = InstallationRegistry::with_installations(vec![
            InstallationTemplate::new("tool", &tool.display().to_string(), None),
        ])
        .unwrap();
        let node = LocalNode::with_platform(Platform::Unix);

        let result = ExeStep::new("tool")
            .with_failure_policy(FailurePolicy::Lenient)
            .perform(&fixture.ctx(&node))
            .unwrap();

        assert_eq!(result, BuildResult::Unstable);
        assert!(fixture.log.contains("Exe exited with code: 2"));
    }

    #[test]
    #[cfg(unix)]
    fn windows_like_script_is_removed_after_success() {
        let mut fixture = Fixture::new(vec![]);
        let tool = write_script(fixture.tools.path(), "cli.exe", "exit 0");
        // Stand-in interpreter: prints the batch script it was given.
        let interpreter = write_script(fixture.tools.path(), "cmd", "cat \"$2\"");
        fixture.registry = InstallationRegistry::with_installations(vec![
            InstallationTemplate::new("cli-tool", &tool.display().to_string(), Some("--verbose")),
        ])
        .unwrap();
        let node = LocalNode::with_platform(Platform::Windows {
            interpreter: interpreter.display().to_string(),
        });

        let result = ExeStep::new("cli-tool")
            .with_args("--input=%WORKSPACE%\\a.txt")
            .perform(&fixture.ctx(&node))
            .unwrap();

        let workspace = fixture.workspace.path().display().to_string();
        assert_eq!(result, BuildResult::Success);
        assert!(fixture.log.contains(&format!(
            "\"{}\" --verbose --input={}\\a.txt",
            tool.display(),
            workspace
        )));
        assert!(fixture.log.contains("&& exit %ERRORLEVEL%"));
        assert!(no_scripts_left(fixture.workspace.path()));
    }

    #[test]
    #[cfg(unix)]
    fn windows_like_script_is_removed_after_non_zero_exit() {
        let mut fixture = Fixture::new(vec![]);
        let tool = write_script(fixture.tools.path(), "cli.exe", "exit 0");
        let interpreter = write_script(fixture.tools.path(), "cmd", "exit 2");
        fixture.registry = InstallationRegistry::with_installations(vec![
            InstallationTemplate::new("cli-tool", &tool.display().to_string(), None),
        ])
        .unwrap();
        let node = LocalNode::with_platform(Platform::Windows {
            interpreter: interpreter.display().to_string(),
        });

        let result = ExeStep::new("cli-tool")
            .with_failure_policy(FailurePolicy::Lenient)
            .perform(&fixture.ctx(&node))
            .unwrap();

        assert_eq!(result, BuildResult::Unstable);
        assert!(no_scripts_left(fixture.workspace.path()));
    }

    #[test]
    #[cfg(unix)]
    fn windows_like_script_is_removed_after_launch_failure() {
        let mut fixture = Fixture::new(vec![]);
        let tool = write_script(fixture.tools.path(), "cli.exe", "exit 0");
        fixture.registry = InstallationRegistry::with_installations(vec![
            InstallationTemplate::new("cli-tool", &tool.display().to_string(), None),
        ])
        .unwrap();
        let node = LocalNode::with_platform(Platform::Windows {
            interpreter: "/no/such/interpreter".to_string(),
        });

        let result = ExeStep::new("cli-tool")
            .with_failure_policy(FailurePolicy::Lenient)
            .perform(&fixture.ctx(&node));

        assert!(matches!(result, Err(ExerunError::LaunchFailure { .. })));
        assert!(no_scripts_left(fixture.workspace.path()));
    }

    #[cfg(unix)]
    fn sleeping_windows_like_fixture() -> (Fixture, LocalNode) {
        let mut fixture = Fixture::new(vec![]);
        let tool = write_script(fixture.tools.path(), "cli.exe", "exit 0");
        let interpreter = write_script(fixture.tools.path(), "cmd", "exec sleep 30");
        fixture.registry = InstallationRegistry::with_installations(vec![
            InstallationTemplate::new("cli-tool", &tool.display().to_string(), None),
        ])
        .unwrap();
        let node = LocalNode::with_platform(Platform::Windows {
            interpreter: interpreter.display().to_string(),
        });
        (fixture, node)
    }

    #[test]
    #[cfg(unix)]
    fn windows_like_script_is_removed_after_cancellation() {
        let (fixture, node) = sleeping_windows_like_fixture();
        let trigger = fixture.cancel.clone();
        std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(300));
            trigger.cancel();
        });

        let started = std::time::Instant::now();
        let result = ExeStep::new("cli-tool")
            .with_failure_policy(FailurePolicy::Lenient)
            .perform(&fixture.ctx(&node));

        assert!(matches!(result, Err(ExerunError::Cancelled)));
        assert!(started.elapsed() < std::time::Duration::from_secs(10));
        assert!(no_scripts_left(fixture.workspace.path()));
    }

    #[test]
    #[cfg(unix)]
    fn windows_like_script_is_removed_after_timeout() {
        let (mut fixture, node) = sleeping_windows_like_fixture();
        fixture.cancel = CancelToken::with_timeout(std::time::Duration::from_millis(300));

        let result = ExeStep::new("cli-tool").perform(&fixture.ctx(&node));

        assert!(matches!(result, Err(ExerunError::TimedOut)));
        assert!(no_scripts_left(fixture.workspace.path()));
    }

    #[test]
    fn from_config_copies_fields() {
        let step = ExeStep::from_config(&StepConfig {
            installation: "tool".to_string(),
            args: Some("  -v ".to_string()),
            failure_policy: FailurePolicy::Lenient,
        });
        assert_eq!(step.installation(), "tool");
        assert_eq!(step.args(), Some("-v"));
        assert_eq!(step.failure_policy(), FailurePolicy::Lenient);
    }

    #[test]
    fn new_step_defaults_to_strict() {
        let step = ExeStep::new("tool").with_args("   ");
        assert_eq!(step.failure_policy(), FailurePolicy::Strict);
        assert_eq!(step.args(), None);
    }
}
