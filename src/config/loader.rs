//! Configuration file discovery, loading and saving.

use crate::config::schema::ExerunConfig;
use crate::error::{ExerunError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Directory under the workspace that holds the configuration.
pub const CONFIG_DIR: &str = ".exerun";

/// Configuration file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.yml";

/// Where the configuration for a workspace lives.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// The file that is read and written.
    pub config: PathBuf,

    /// Whether the path came from `--config` / `EXERUN_CONFIG`.
    pub overridden: bool,
}

impl ConfigPaths {
    /// Resolve the config path for `workspace`, honouring an explicit override.
    pub fn discover(workspace: &Path, config_override: Option<&Path>) -> Self {
        match config_override {
            Some(path) => Self {
                config: path.to_path_buf(),
                overridden: true,
            },
            None => Self {
                config: default_config_path(workspace),
                overridden: false,
            },
        }
    }

    pub fn exists(&self) -> bool {
        self.config.is_file()
    }
}

/// `<workspace>/.exerun/config.yml`
pub fn default_config_path(workspace: &Path) -> PathBuf {
    workspace.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<ExerunConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ExerunError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ExerunError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into an [`ExerunConfig`].
///
/// `source_path` is only used for error reporting. An empty document is an
/// empty configuration.
pub fn parse_config(content: &str, source_path: &Path) -> Result<ExerunConfig> {
    if content.trim().is_empty() {
        return Ok(ExerunConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| ExerunError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load the configuration for a workspace.
///
/// A missing default config is an empty configuration; a missing override
/// is an error.
pub fn load_config(workspace: &Path, config_override: Option<&Path>) -> Result<ExerunConfig> {
    let paths = ConfigPaths::discover(workspace, config_override);
    if !paths.overridden && !paths.exists() {
        tracing::debug!(
            "No config at {}, starting empty",
            paths.config.display()
        );
        return Ok(ExerunConfig::default());
    }
    tracing::debug!("Loading config from {}", paths.config.display());
    load_config_file(&paths.config)
}

/// Write `config` to `path` atomically.
///
/// The YAML goes to a temporary file in the same directory which then
/// replaces `path`, so readers see either the old or the new file.
pub fn save_config(config: &ExerunConfig, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    let yaml = serde_yaml::to_string(config)
        .map_err(|e| ExerunError::Other(anyhow::anyhow!("Failed to serialize config: {}", e)))?;

    let mut file = tempfile::NamedTempFile::new_in(&dir)?;
    file.write_all(yaml.as_bytes())?;
    file.flush()?;
    file.persist(path).map_err(|e| ExerunError::Io(e.error))?;

    tracing::debug!("Saved config to {}", path.display());
    Ok(())
}
