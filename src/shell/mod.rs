//! Command line assembly and process execution.

pub mod cancel;
pub mod command;
pub mod platform;
pub mod process;

pub use cancel::{CancelReason, CancelToken};
pub use command::{
    batch_line, build_command_line, CommandLine, ScriptArtifact, SCRIPT_PREFIX, SCRIPT_SUFFIX,
};
pub use platform::Platform;
pub use process::{run, run_command_line, ExecutionOutcome, NO_EXIT_CODE};
