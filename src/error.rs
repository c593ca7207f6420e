//! Error types for exerun operations.
//!
//! This module defines [`ExerunError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Configuration and resolution errors abort a step before anything is spawned
//! - Launch failures are always fatal, independent of the failure policy
//! - Argument expansion and script cleanup problems are recovered where they
//!   happen and only logged, so they never appear here
//! - Use `anyhow::Error` (via `ExerunError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for exerun operations.
#[derive(Debug, Error)]
pub enum ExerunError {
    /// No installation with this name is registered.
    #[error("Installation not found: '{name}'")]
    InstallationNotFound { name: String },

    /// The resolved executable does not exist on the execution node.
    #[error("Executable not found: {path} ({reason})")]
    ExecutablePathMissing { path: String, reason: String },

    /// The process could not be started at all.
    #[error("Failed to launch {command}: {message}")]
    LaunchFailure { command: String, message: String },

    /// The process ran and exited with a non-zero code under the strict policy.
    #[error("Exited with code: {code}")]
    NonZeroExit { code: i32 },

    /// The enclosing build was aborted while the process was running.
    #[error("Execution cancelled")]
    Cancelled,

    /// The host's deadline passed while the process was running.
    #[error("Execution exceeded its deadline")]
    TimedOut,

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// Referenced step is not configured.
    #[error("Unknown step: {name}")]
    UnknownStep { name: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ExerunError {
    /// Whether this error stems from configuration rather than execution.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ExerunError::InstallationNotFound { .. }
                | ExerunError::ConfigNotFound { .. }
                | ExerunError::ConfigParseError { .. }
                | ExerunError::ConfigValidationError { .. }
                | ExerunError::UnknownStep { .. }
        )
    }
}

/// Result type alias for exerun operations.
pub type Result<T> = std::result::Result<T, ExerunError>;
