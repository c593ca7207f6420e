//! Execution nodes.
//!
//! A [`Node`] is the machine a build step runs on. It knows its platform,
//! how a path registered on the controller maps onto its own filesystem, and
//! whether a path exists there.

use std::io;
use std::path::Path;

use crate::config::schema::{NodeConfig, PathMapping};
use crate::error::Result;
use crate::shell::platform::Platform;

/// A machine that can execute build steps.
pub trait Node: Send + Sync {
    /// Node name used in diagnostics.
    fn name(&self) -> &str;

    /// How processes are launched on this node.
    fn platform(&self) -> Platform;

    /// Map an installation's home path to the equivalent path on this node.
    fn translate_path(&self, installation: &str, path: &str) -> Result<String>;

    /// Check whether `path` exists on this node.
    ///
    /// `Err` means existence could not be determined.
    fn path_exists(&self, path: &Path) -> io::Result<bool>;
}

fn local_path_exists(path: &Path) -> io::Result<bool> {
    match std::fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// The machine this process runs on, with no path translation.
#[derive(Debug, Clone)]
pub struct LocalNode {
    platform: Platform,
}

impl LocalNode {
    pub fn new() -> Self {
        Self {
            platform: Platform::host(),
        }
    }

    /// Local node that launches commands as if it were `platform`.
    pub fn with_platform(platform: Platform) -> Self {
        Self { platform }
    }
}

impl Default for LocalNode {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for LocalNode {
    fn name(&self) -> &str {
        "(built-in)"
    }

    fn platform(&self) -> Platform {
        self.platform.clone()
    }

    fn translate_path(&self, _installation: &str, path: &str) -> Result<String> {
        Ok(path.to_string())
    }

    fn path_exists(&self, path: &Path) -> io::Result<bool> {
        local_path_exists(path)
    }
}

/// A configured node profile.
///
/// Translation order: a per-installation tool location wins; otherwise the
/// first matching path prefix rewrite applies; otherwise the path is kept.
#[derive(Debug, Clone)]
pub struct NodeProfile {
    name: String,
    config: NodeConfig,
}

impl NodeProfile {
    pub fn new(name: &str, config: NodeConfig) -> Self {
        Self {
            name: name.to_string(),
            config,
        }
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Rewrite the first mapping whose `from` is a whole-component prefix of `path`.
fn apply_path_map(path: &str, mappings: &[PathMapping]) -> Option<String> {
    mappings.iter().find_map(|m| {
        let rest = path.strip_prefix(m.from.as_str())?;
        let at_boundary =
            rest.is_empty() || rest.starts_with(is_separator) || m.from.ends_with(is_separator);
        at_boundary.then(|| format!("{}{}", m.to, rest))
    })
}

impl Node for NodeProfile {
    fn name(&self) -> &str {
        &self.name
    }

    fn platform(&self) -> Platform {
        Platform::for_os(self.config.os, self.config.interpreter.as_deref())
    }

    fn translate_path(&self, installation: &str, path: &str) -> Result<String> {
        if let Some(location) = self.config.tool_locations.get(installation) {
            tracing::debug!(
                "Node '{}' overrides location of '{}': {}",
                self.name,
                installation,
                location
            );
            return Ok(location.clone());
        }

        Ok(apply_path_map(path, &self.config.path_map).unwrap_or_else(|| path.to_string()))
    }

    fn path_exists(&self, path: &Path) -> io::Result<bool> {
        local_path_exists(path)
    }
}
