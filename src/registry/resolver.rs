//! Installation resolution.
//!
//! Looks an installation up by name and resolves it for the node and
//! environment of the current build. Nothing is cached: the same inputs
//! always give an equivalent result, and the node or environment may differ
//! between build steps.

use std::collections::HashMap;

use crate::error::{ExerunError, Result};
use crate::node::Node;
use crate::registry::installation::ResolvedInstallation;
use crate::registry::store::InstallationRegistry;

/// Resolve installation `name` for `node` and `env`.
///
/// The home path is first translated for the node, then environment
/// references in the translated path are expanded.
///
/// # Errors
///
/// Returns `InstallationNotFound` if no installation is registered under
/// `name`, including when `name` is empty.
pub fn resolve(
    registry: &InstallationRegistry,
    name: &str,
    node: &dyn Node,
    env: &HashMap<String, String>,
) -> Result<ResolvedInstallation> {
    let template = registry
        .find(name)
        .ok_or_else(|| ExerunError::InstallationNotFound {
            name: name.to_string(),
        })?;

    let resolved = template.for_node(node)?.for_environment(env);
    tracing::debug!(
        "Resolved installation '{}' on node '{}': {}",
        name,
        node.name(),
        resolved.home_path()
    );
    Ok(resolved)
}
