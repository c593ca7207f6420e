//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results. Commands are
//! routed by [`CommandDispatcher`]; the ones that run tools share the setup
//! in [`host`].

pub mod add;
pub mod dispatcher;
pub mod exec;
pub mod host;
pub mod list;
pub mod remove;
pub mod run;
pub mod validate;

pub use dispatcher::{
    Command, CommandDispatcher, CommandResult, EXIT_CONFIG, EXIT_FAILURE, EXIT_UNSTABLE,
};
pub use host::{BuildHost, HostOptions};
