//! Installation values.
//!
//! An [`InstallationTemplate`] is what the user registered. Resolving it for a
//! build produces a [`ResolvedInstallation`] through two steps, each of which
//! returns a new value: node translation, then environment expansion.

use std::collections::HashMap;

use crate::config::interpolation::expand_env;
use crate::config::schema::fix_empty_and_trim;
use crate::error::Result;
use crate::node::Node;

/// A named tool installation as registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationTemplate {
    name: String,
    home_template: String,
    default_args: Option<String>,
}

impl InstallationTemplate {
    /// Create a template. Blank default arguments are stored as `None`.
    pub fn new(name: &str, home_template: &str, default_args: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            home_template: home_template.to_string(),
            default_args: fix_empty_and_trim(default_args),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Executable path, possibly containing variable references.
    pub fn home_template(&self) -> &str {
        &self.home_template
    }

    pub fn default_args(&self) -> Option<&str> {
        self.default_args.as_deref()
    }

    /// Translate the home path into the path seen by `node`.
    pub fn for_node(&self, node: &dyn Node) -> Result<InstallationTemplate> {
        let home = node.translate_path(&self.name, &self.home_template)?;
        Ok(InstallationTemplate {
            name: self.name.clone(),
            home_template: home,
            default_args: self.default_args.clone(),
        })
    }

    /// Expand environment references in the home path.
    ///
    /// Default arguments are left untouched; they are expanded per token later.
    pub fn for_environment(&self, env: &HashMap<String, String>) -> ResolvedInstallation {
        ResolvedInstallation {
            name: self.name.clone(),
            home_path: expand_env(&self.home_template, env),
            default_args: self.default_args.clone(),
        }
    }
}

/// An installation resolved for one node and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInstallation {
    name: String,
    home_path: String,
    default_args: Option<String>,
}

impl ResolvedInstallation {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Concrete executable path on the execution node.
    pub fn home_path(&self) -> &str {
        &self.home_path
    }

    pub fn default_args(&self) -> Option<&str> {
        self.default_args.as_deref()
    }
}
