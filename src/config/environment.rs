//! Build environment assembly.
//!
//! A step sees the system environment plus the build variables the host
//! provides (`WORKSPACE`, and `JOB_NAME` / `BUILD_NUMBER` when known).

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;

/// Build variables supplied by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildInfo {
    pub workspace: PathBuf,
    pub job_name: Option<String>,
    pub build_number: Option<u64>,
}

impl BuildInfo {
    pub fn new(workspace: PathBuf) -> Self {
        Self {
            workspace,
            ..Default::default()
        }
    }

    /// The build variables as environment entries.
    pub fn variables(&self) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        vars.insert(
            "WORKSPACE".to_string(),
            self.workspace.display().to_string(),
        );
        if let Some(job) = &self.job_name {
            vars.insert("JOB_NAME".to_string(), job.clone());
        }
        if let Some(number) = self.build_number {
            vars.insert("BUILD_NUMBER".to_string(), number.to_string());
        }
        vars
    }
}

/// Load environment variables from system.
///
/// Entries whose name or value is not valid UTF-8 are skipped.
pub fn load_system_env() -> HashMap<String, String> {
    utf8_env(std::env::vars_os())
}

fn utf8_env(vars: impl IntoIterator<Item = (OsString, OsString)>) -> HashMap<String, String> {
    vars.into_iter()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                let name = match key {
                    Ok(key) => key,
                    Err(key) => key.to_string_lossy().into_owned(),
                };
                tracing::debug!("Skipping non UTF-8 environment variable {}", name);
                None
            }
        })
        .collect()
}

/// Merge environment maps, with `overlay` taking precedence.
pub fn merge_env(
    base: &HashMap<String, String>,
    overlay: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut result = base.clone();
    result.extend(overlay.iter().map(|(k, v)| (k.clone(), v.clone())));
    result
}

/// The environment a step runs with: `system` overlaid with `info`.
pub fn build_environment(
    system: &HashMap<String, String>,
    info: &BuildInfo,
) -> HashMap<String, String> {
    merge_env(system, &info.variables())
}
