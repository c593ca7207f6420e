//! Step execution and outcome mapping.
//!
//! - [`ExeStep`] - A configured tool invocation
//! - [`StepContext`] - Registry, node, build context and log for a run
//! - [`ExecutionRequest`] - A fully resolved invocation
//! - [`BuildResult`] - The build status a step reports
//!
//! # Example
//!
//! ```no_run
//! use exerun::expand::EnvContext;
//! use exerun::node::LocalNode;
//! use exerun::output::ConsoleLog;
//! use exerun::registry::{InstallationRegistry, InstallationTemplate};
//! use exerun::shell::CancelToken;
//! use exerun::steps::{BuildResult, ExeStep, StepContext};
//! use std::collections::HashMap;
//! use std::path::Path;
//!
//! let registry = InstallationRegistry::with_installations(vec![
//!     InstallationTemplate::new("linter", "/usr/local/bin/lint", Some("--strict")),
//! ])
//! .unwrap();
//! let build = EnvContext::new(HashMap::new());
//! let ctx = StepContext {
//!     registry: &registry,
//!     node: &LocalNode::new(),
//!     build: &build,
//!     workspace: Path::new("."),
//!     log: &ConsoleLog::new(),
//!     cancel: &CancelToken::new(),
//! };
//!
//! match ExeStep::new("linter").with_args("src").perform(&ctx) {
//!     Ok(BuildResult::Success) => println!("clean"),
//!     Ok(result) => println!("finished as {}", result),
//!     Err(e) => eprintln!("build failed: {}", e),
//! }
//! ```

pub mod executor;
pub mod outcome;

pub use executor::{ExeStep, ExecutionRequest, StepContext};
pub use outcome::{map_outcome, BuildResult};
