//! Build outcome mapping.

use crate::config::schema::FailurePolicy;
use crate::error::Result;
use crate::shell::process::ExecutionOutcome;

/// Outcome signal handed back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BuildResult {
    Success,
    /// Completed with problems; later steps still run.
    Unstable,
    /// Fatal; the pipeline stops.
    Failure,
}

impl BuildResult {
    /// The worse of two results.
    pub fn combine(self, other: BuildResult) -> BuildResult {
        self.max(other)
    }

    /// Result of a step that returned `result`. Any error is a failure.
    pub fn of(result: &Result<BuildResult>) -> BuildResult {
        match result {
            Ok(r) => *r,
            Err(_) => BuildResult::Failure,
        }
    }

    /// Whether later steps should still run.
    pub fn should_continue(&self) -> bool {
        !matches!(self, BuildResult::Failure)
    }

    /// Get a display character for this result.
    pub fn display_char(&self) -> char {
        match self {
            BuildResult::Success => '✓',
            BuildResult::Unstable => '⚠',
            BuildResult::Failure => '✗',
        }
    }
}

impl std::fmt::Display for BuildResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BuildResult::Success => "success",
            BuildResult::Unstable => "unstable",
            BuildResult::Failure => "failure",
        };
        write!(f, "{}", s)
    }
}

/// Map a finished process onto a build result under `policy`.
///
/// Exit code 0 is success under either policy. A non-zero exit is a failure
/// under `Strict` and unstable under `Lenient`. A timed-out process is always
/// a failure.
pub fn map_outcome(outcome: &ExecutionOutcome, policy: FailurePolicy) -> BuildResult {
    if outcome.timed_out {
        return BuildResult::Failure;
    }
    match (outcome.exit_code, policy) {
        (0, _) => BuildResult::Success,
        (_, FailurePolicy::Strict) => BuildResult::Failure,
        (_, FailurePolicy::Lenient) => BuildResult::Unstable,
    }
}
