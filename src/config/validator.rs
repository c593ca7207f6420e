//! Configuration validation rules.
//!
//! - Installation names must be non-empty, unique and free of surrounding
//!   whitespace (lookups match names exactly)
//! - Installation homes must be non-empty
//! - Steps must reference registered installations
//! - Node path mappings need a non-empty `from` prefix

use crate::config::schema::ExerunConfig;
use crate::error::{ExerunError, Result};
use std::collections::HashSet;

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
    /// Installation name if error is installation-specific
    pub installation: Option<String>,
    /// Step name if error is step-specific
    pub step: Option<String>,
}

/// Validate a configuration and return all errors.
///
/// All errors are collected rather than stopping at the first one.
pub fn validate_config(config: &ExerunConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_installations(config));
    errors.extend(validate_steps(config));
    errors.extend(validate_nodes(config));

    errors
}

fn validate_installations(config: &ExerunConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (index, installation) in config.installations.iter().enumerate() {
        let name = installation.name.as_str();

        if name.trim().is_empty() {
            errors.push(ValidationError {
                rule: "empty-installation-name".to_string(),
                message: format!("Installation #{} has an empty name", index + 1),
                installation: None,
                step: None,
            });
            continue;
        }

        if name.trim() != name {
            errors.push(ValidationError {
                rule: "padded-installation-name".to_string(),
                message: format!(
                    "Installation '{}' has leading or trailing whitespace in its name",
                    name
                ),
                installation: Some(name.to_string()),
                step: None,
            });
        }

        if !seen.insert(name) {
            errors.push(ValidationError {
                rule: "duplicate-installation".to_string(),
                message: format!("Installation '{}' is defined more than once", name),
                installation: Some(name.to_string()),
                step: None,
            });
        }

        if installation.home.trim().is_empty() {
            errors.push(ValidationError {
                rule: "empty-home".to_string(),
                message: format!("Installation '{}' has an empty home", name),
                installation: Some(name.to_string()),
                step: None,
            });
        }
    }

    errors
}

fn validate_steps(config: &ExerunConfig) -> Vec<ValidationError> {
    let known: HashSet<&str> = config
        .installations
        .iter()
        .map(|i| i.name.as_str())
        .collect();

    config
        .steps
        .iter()
        .filter(|(_, step)| !known.contains(step.installation.as_str()))
        .map(|(name, step)| ValidationError {
            rule: "unknown-installation".to_string(),
            message: format!(
                "Step '{}' uses installation '{}' which does not exist",
                name, step.installation
            ),
            installation: Some(step.installation.clone()),
            step: Some(name.clone()),
        })
        .collect()
}

fn validate_nodes(config: &ExerunConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (name, node) in &config.nodes {
        if node.path_map.iter().any(|m| m.from.is_empty()) {
            errors.push(ValidationError {
                rule: "empty-path-prefix".to_string(),
                message: format!("Node '{}' maps an empty path prefix", name),
                installation: None,
                step: None,
            });
        }
    }

    errors
}

/// Validate and return Result (for convenience).
///
/// # Errors
///
/// Returns `ConfigValidationError` if any validation rules fail.
pub fn validate(config: &ExerunConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(ExerunError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}
