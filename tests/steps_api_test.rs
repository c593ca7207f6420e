//! Integration tests for the steps public API.

use exerun::config::FailurePolicy;
use exerun::expand::{BuildMacros, EnvContext};
use exerun::node::LocalNode;
use exerun::output::CapturedLog;
use exerun::registry::{InstallationRegistry, InstallationTemplate};
use exerun::shell::{CancelToken, ExecutionOutcome};
use exerun::steps::{map_outcome, BuildResult, ExeStep, StepContext};
use exerun::ExerunError;
use std::collections::HashMap;
use std::path::Path;
use tempfile::TempDir;

#[cfg(unix)]
fn fake_tool(dir: &Path, name: &str, body: &str) -> String {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.display().to_string()
}

#[test]
fn public_api_accessible() {
    let _step = ExeStep::new("tool").with_failure_policy(FailurePolicy::Lenient);
    let _result = BuildResult::Success.combine(BuildResult::Unstable);
    let _cancel = CancelToken::new();
}

#[test]
fn outcome_mapping_matches_policy() {
    let exited = |code| ExecutionOutcome::exited(code);

    assert_eq!(map_outcome(&exited(0), FailurePolicy::Strict), BuildResult::Success);
    assert_eq!(map_outcome(&exited(0), FailurePolicy::Lenient), BuildResult::Success);
    assert_eq!(map_outcome(&exited(7), FailurePolicy::Strict), BuildResult::Failure);
    assert_eq!(map_outcome(&exited(7), FailurePolicy::Lenient), BuildResult::Unstable);
    assert_eq!(
        map_outcome(&ExecutionOutcome::timed_out(), FailurePolicy::Lenient),
        BuildResult::Failure
    );
}

#[test]
fn missing_installation_is_reported_without_log_output() {
    let workspace = TempDir::new().unwrap();
    let registry = InstallationRegistry::new();
    let build = EnvContext::new(HashMap::new());
    let log = CapturedLog::new();
    let ctx = StepContext {
        registry: &registry,
        node: &LocalNode::new(),
        build: &build,
        workspace: workspace.path(),
        log: &log,
        cancel: &CancelToken::new(),
    };

    let result = ExeStep::new("missing").perform(&ctx);

    assert!(matches!(
        result,
        Err(ExerunError::InstallationNotFound { .. })
    ));
    assert!(log.lines().is_empty());
}

#[test]
#[cfg(unix)]
fn full_step_execution_workflow() {
    let tools = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let tool = fake_tool(tools.path(), "tool", "echo \"$@\"; pwd");

    let registry = InstallationRegistry::with_installations(vec![InstallationTemplate::new(
        "tool",
        &tool,
        Some("--verbose"),
    )])
    .unwrap();

    let mut env = HashMap::new();
    env.insert("WORKSPACE".to_string(), workspace.path().display().to_string());
    let build = BuildMacros::new(env)
        .with_job_name("nightly")
        .with_build_number(42);
    let log = CapturedLog::new();
    let ctx = StepContext {
        registry: &registry,
        node: &LocalNode::new(),
        build: &build,
        workspace: workspace.path(),
        log: &log,
        cancel: &CancelToken::new(),
    };

    let step = ExeStep::new("tool").with_args("--job=${JOB_NAME}\t#${BUILD_NUMBER}");
    let request = step.prepare(&ctx).unwrap();
    assert_eq!(request.arguments, vec!["--verbose", "--job=nightly", "#42"]);

    let result = step.perform(&ctx).unwrap();

    assert_eq!(result, BuildResult::Success);
    let lines = log.lines();
    let path_line = lines.iter().position(|l| l.starts_with("Path To exe:")).unwrap();
    let exec_line = lines.iter().position(|l| l.starts_with("Executing :")).unwrap();
    assert!(path_line < exec_line);
    assert!(log.contains("--verbose --job=nightly #42"));
    let dir_name = workspace.path().file_name().unwrap().to_string_lossy().to_string();
    assert!(log.contains(&dir_name));
}

#[test]
#[cfg(unix)]
fn cancelled_step_is_an_error() {
    let tools = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let tool = fake_tool(tools.path(), "tool", "sleep 30");
    let registry = InstallationRegistry::with_installations(vec![InstallationTemplate::new(
        "tool", &tool, None,
    )])
    .unwrap();
    let build = EnvContext::new(HashMap::new());
    let log = CapturedLog::new();
    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_millis(200));
        trigger.cancel();
    });
    let ctx = StepContext {
        registry: &registry,
        node: &LocalNode::new(),
        build: &build,
        workspace: workspace.path(),
        log: &log,
        cancel: &cancel,
    };

    let result = ExeStep::new("tool")
        .with_failure_policy(FailurePolicy::Lenient)
        .perform(&ctx);

    assert!(matches!(result, Err(ExerunError::Cancelled)));
}
