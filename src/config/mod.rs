//! Configuration loading, parsing, and validation for exerun.
//!
//! - Schema definitions in [`schema`]
//! - File discovery, loading and saving in [`loader`]
//! - Validation in [`validator`]
//! - Environment variable references in [`interpolation`]
//! - Build environment assembly in [`environment`]
//!
//! # Example
//!
//! ```
//! use exerun::config::{load_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".exerun");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(
//!     dir.join("config.yml"),
//!     "installations:\n  - name: lint\n    home: /usr/bin/lint\n",
//! )
//! .unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.installations[0].name, "lint");
//! ```
//!
//! # Configuration File Location
//!
//! `<workspace>/.exerun/config.yml`, unless `--config` or `EXERUN_CONFIG`
//! names another file.

pub mod environment;
pub mod interpolation;
pub mod loader;
pub mod schema;
pub mod validator;

// Schema re-exports
pub use schema::{
    fix_empty_and_trim, ExerunConfig, FailurePolicy, InstallationConfig, NodeConfig, NodeOs,
    PathMapping, StepConfig,
};

// Loader re-exports
pub use loader::{
    default_config_path, load_config, load_config_file, parse_config, save_config, ConfigPaths,
};

// Validator re-exports
pub use validator::{validate, validate_config, ValidationError};

// Interpolation re-exports
pub use interpolation::{expand_env, parse_references, Segment};

// Environment re-exports
pub use environment::{build_environment, load_system_env, merge_env, BuildInfo};
