//! Configuration schema definitions.
//!
//! These types map directly to the YAML configuration format.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::registry::InstallationTemplate;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ExerunConfig {
    /// Registered tool installations, in registration order.
    #[serde(default)]
    pub installations: Vec<InstallationConfig>,

    /// Execution node profiles keyed by node name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub nodes: BTreeMap<String, NodeConfig>,

    /// Named build steps.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub steps: BTreeMap<String, StepConfig>,
}

/// A registered tool installation.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct InstallationConfig {
    pub name: String,

    /// Path to the executable; may reference environment variables.
    pub home: String,

    /// Arguments placed before every step's own arguments.
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_args: Option<String>,
}

impl InstallationConfig {
    pub fn to_template(&self) -> InstallationTemplate {
        InstallationTemplate::new(&self.name, &self.home, self.default_args.as_deref())
    }
}

impl From<&InstallationTemplate> for InstallationConfig {
    fn from(template: &InstallationTemplate) -> Self {
        Self {
            name: template.name().to_string(),
            home: template.home_template().to_string(),
            default_args: template.default_args().map(str::to_string),
        }
    }
}

/// Operating system family of an execution node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeOs {
    #[default]
    Unix,
    Windows,
}

/// One controller-to-node path prefix rewrite.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct PathMapping {
    pub from: String,
    pub to: String,
}

/// Execution node profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct NodeConfig {
    #[serde(default)]
    pub os: NodeOs,

    /// Command interpreter used for batch wrappers on Windows-like nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<String>,

    /// Installation name -> executable path on this node.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub tool_locations: HashMap<String, String>,

    /// Prefix rewrites applied to installation homes, first match wins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path_map: Vec<PathMapping>,
}

/// How a non-zero exit code affects the build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Non-zero exit aborts the build.
    #[default]
    Strict,
    /// Non-zero exit marks the build unstable and continues.
    Lenient,
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailurePolicy::Strict => write!(f, "strict"),
            FailurePolicy::Lenient => write!(f, "lenient"),
        }
    }
}

/// Per-step configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct StepConfig {
    /// Name of the installation to run.
    pub installation: String,

    /// Manual command line arguments.
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub args: Option<String>,

    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

/// Trim a string and map blank values to `None`.
pub fn fix_empty_and_trim(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(fix_empty_and_trim(value.as_deref()))
}
