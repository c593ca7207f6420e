//! exerun - Run registered command line tools as CI build steps.
//!
//! A build step names a registered tool installation and an argument string.
//! exerun resolves the installation for the execution node, expands build
//! variables in the arguments, launches the tool (through a temporary batch
//! script on Windows-like nodes), streams its output to the build log and
//! maps the exit code to a build result.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`error`] - Error types and result aliases
//! - [`expand`] - Argument tokenizing and build variable expansion
//! - [`node`] - Execution nodes and path translation
//! - [`output`] - Build log sinks
//! - [`registry`] - Installation registry and resolution
//! - [`shell`] - Command line assembly and process execution
//! - [`steps`] - Step execution and outcome mapping
//!
//! # Example
//!
//! ```
//! use exerun::expand::{expand, EnvContext};
//! use exerun::output::CapturedLog;
//! use std::collections::HashMap;
//!
//! let mut env = HashMap::new();
//! env.insert("WORKSPACE".to_string(), "/ws".to_string());
//! let ctx = EnvContext::new(env);
//!
//! let args = expand("--verbose  --input=$WORKSPACE/a.txt", &ctx, &CapturedLog::new());
//! assert_eq!(args, vec!["--verbose", "--input=/ws/a.txt"]);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod expand;
pub mod node;
pub mod output;
pub mod registry;
pub mod shell;
pub mod steps;

pub use error::{ExerunError, Result};
