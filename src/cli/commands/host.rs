//! Build host setup shared by commands that run steps.
//!
//! Loads and validates the configuration, builds the installation registry,
//! selects the execution node and assembles the build environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{
    build_environment, load_config, load_system_env, validate, BuildInfo, ConfigPaths,
    ExerunConfig,
};
use crate::error::{ExerunError, Result};
use crate::expand::BuildMacros;
use crate::node::{LocalNode, Node, NodeProfile};
use crate::output::BuildLog;
use crate::registry::InstallationRegistry;
use crate::shell::CancelToken;
use crate::steps::{BuildResult, ExeStep, StepContext};

/// Global options every command receives.
#[derive(Debug, Clone, Default)]
pub struct HostOptions {
    pub workspace: PathBuf,
    pub config: Option<PathBuf>,
    pub node: Option<String>,
    pub job_name: Option<String>,
    pub build_number: Option<u64>,
    pub timeout: Option<Duration>,
    /// Abort flag shared with whoever may interrupt the build.
    pub cancel: CancelToken,
}

impl HostOptions {
    pub fn new(workspace: &Path) -> Self {
        Self {
            workspace: workspace.to_path_buf(),
            ..Default::default()
        }
    }

    pub fn config_paths(&self) -> ConfigPaths {
        ConfigPaths::discover(&self.workspace, self.config.as_deref())
    }

    pub fn load_config(&self) -> Result<ExerunConfig> {
        load_config(&self.workspace, self.config.as_deref())
    }

    pub fn build_info(&self) -> BuildInfo {
        BuildInfo {
            workspace: self.workspace.clone(),
            job_name: self.job_name.clone(),
            build_number: self.build_number,
        }
    }
}

/// Everything needed to perform steps in one build.
pub struct BuildHost {
    config: ExerunConfig,
    registry: InstallationRegistry,
    node: Box<dyn Node>,
    macros: BuildMacros,
    workspace: PathBuf,
    cancel: CancelToken,
}

impl BuildHost {
    /// Load, validate and assemble the host for `options`.
    ///
    /// # Errors
    ///
    /// Configuration errors, including an unknown `--node`.
    pub fn open(options: &HostOptions) -> Result<Self> {
        let config = options.load_config()?;
        validate(&config)?;

        let registry = InstallationRegistry::from_config(&config)?;
        let node = select_node(&config, options.node.as_deref())?;

        let info = options.build_info();
        let env = build_environment(&load_system_env(), &info);
        let mut macros = BuildMacros::new(env).with_workspace(&info.workspace);
        if let Some(job) = &info.job_name {
            macros = macros.with_job_name(job);
        }
        if let Some(number) = info.build_number {
            macros = macros.with_build_number(number);
        }

        let cancel = match options.timeout {
            Some(timeout) => options.cancel.expires_after(timeout),
            None => options.cancel.clone(),
        };

        tracing::debug!(
            "Build host ready: {} installation(s), node '{}', workspace {}",
            registry.len(),
            node.name(),
            options.workspace.display()
        );

        Ok(Self {
            config,
            registry,
            node,
            macros,
            workspace: options.workspace.clone(),
            cancel,
        })
    }

    pub fn config(&self) -> &ExerunConfig {
        &self.config
    }

    pub fn registry(&self) -> &InstallationRegistry {
        &self.registry
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// The configured step called `name`.
    pub fn step(&self, name: &str) -> Result<ExeStep> {
        self.config
            .steps
            .get(name)
            .map(ExeStep::from_config)
            .ok_or_else(|| ExerunError::UnknownStep {
                name: name.to_string(),
            })
    }

    pub fn perform(&self, step: &ExeStep, log: &dyn BuildLog) -> Result<BuildResult> {
        let ctx = StepContext {
            registry: &self.registry,
            node: self.node.as_ref(),
            build: &self.macros,
            workspace: &self.workspace,
            log,
            cancel: &self.cancel,
        };
        step.perform(&ctx)
    }
}

fn select_node(config: &ExerunConfig, name: Option<&str>) -> Result<Box<dyn Node>> {
    match name {
        None => Ok(Box::new(LocalNode::new())),
        Some(name) => config
            .nodes
            .get(name)
            .map(|profile| Box::new(NodeProfile::new(name, profile.clone())) as Box<dyn Node>)
            .ok_or_else(|| ExerunError::ConfigValidationError {
                message: format!("Unknown node: '{}'", name),
            }),
    }
}
