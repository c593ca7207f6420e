//! Build metadata macros.
//!
//! [`BuildMacros`] evaluates `${NAME}` and `${NAME,arg="value",...}` macros
//! against build metadata and the build environment:
//!
//! - `${BUILD_NUMBER}`, `${JOB_NAME}`, `${WORKSPACE}`, `${BUILD_TIMESTAMP}`
//!   and any other metadata key set on the context
//! - `${ENV,var="NAME"}` - value of an environment variable (empty if unset)
//! - `${NAME}` for a variable present only in the environment
//!
//! Text outside macros still gets `$VAR` and `%VAR%` substitution. An unknown
//! macro name or malformed macro is an error, which the expander treats as a
//! signal to fall back to plain environment expansion.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::config::interpolation::expand_env;
use crate::expand::BuildContext;

/// Error raised while evaluating a macro.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MacroError {
    #[error("Unrecognized macro '{name}'")]
    Unknown { name: String },

    #[error("Malformed macro '{text}'")]
    Malformed { text: String },

    #[error("Macro '{name}' requires argument '{argument}'")]
    MissingArgument { name: String, argument: String },
}

/// Richer-than-environment template evaluation.
pub trait MacroEvaluator: Send + Sync {
    /// Whether the evaluator is available for use right now.
    fn is_active(&self) -> bool {
        true
    }

    /// Evaluate every macro in `token`.
    fn evaluate(&self, token: &str) -> Result<String, MacroError>;
}

/// Regex for `${...}` macro references.
static MACRO_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([^}]*)\}").expect("MACRO_REGEX must compile")
});

/// Regex for one `key="value"` macro argument.
static ARGUMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*=\s*"([^"]*)"\s*$"#)
        .expect("ARGUMENT_REGEX must compile")
});

fn is_macro_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Macro evaluator backed by build metadata and environment.
#[derive(Debug, Clone)]
pub struct BuildMacros {
    metadata: HashMap<String, String>,
    env: HashMap<String, String>,
    active: bool,
}

impl BuildMacros {
    /// Create an evaluator over `env` with `BUILD_TIMESTAMP` set to now.
    pub fn new(env: HashMap<String, String>) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert(
            "BUILD_TIMESTAMP".to_string(),
            chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string(),
        );
        Self {
            metadata,
            env,
            active: true,
        }
    }

    /// Set an arbitrary metadata value.
    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_job_name(self, name: &str) -> Self {
        self.with_metadata("JOB_NAME", name)
    }

    pub fn with_build_number(self, number: u64) -> Self {
        self.with_metadata("BUILD_NUMBER", &number.to_string())
    }

    pub fn with_workspace(self, workspace: &std::path::Path) -> Self {
        self.with_metadata("WORKSPACE", &workspace.display().to_string())
    }

    /// Enable or disable macro evaluation.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn evaluate_macro(&self, body: &str, text: &str) -> Result<String, MacroError> {
        let mut parts = body.split(',');
        let name = parts.next().unwrap_or_default().trim();
        if !is_macro_name(name) {
            return Err(MacroError::Malformed {
                text: text.to_string(),
            });
        }

        let mut arguments = HashMap::new();
        for part in parts {
            let captures = ARGUMENT_REGEX
                .captures(part)
                .ok_or_else(|| MacroError::Malformed {
                    text: text.to_string(),
                })?;
            arguments.insert(captures[1].to_string(), captures[2].to_string());
        }

        if name == "ENV" {
            let var = arguments
                .get("var")
                .ok_or_else(|| MacroError::MissingArgument {
                    name: name.to_string(),
                    argument: "var".to_string(),
                })?;
            return Ok(self.env.get(var).cloned().unwrap_or_default());
        }

        self.metadata
            .get(name)
            .or_else(|| self.env.get(name))
            .cloned()
            .ok_or_else(|| MacroError::Unknown {
                name: name.to_string(),
            })
    }
}

impl MacroEvaluator for BuildMacros {
    fn is_active(&self) -> bool {
        self.active
    }

    fn evaluate(&self, token: &str) -> Result<String, MacroError> {
        let mut result = String::with_capacity(token.len());
        let mut last = 0;

        for captures in MACRO_REGEX.captures_iter(token) {
            let whole = captures.get(0).ok_or_else(|| MacroError::Malformed {
                text: token.to_string(),
            })?;
            result.push_str(&expand_env(&token[last..whole.start()], &self.env));
            result.push_str(&self.evaluate_macro(&captures[1], whole.as_str())?);
            last = whole.end();
        }

        result.push_str(&expand_env(&token[last..], &self.env));
        Ok(result)
    }
}

impl BuildContext for BuildMacros {
    fn environment(&self) -> &HashMap<String, String> {
        &self.env
    }

    fn macro_evaluator(&self) -> Option<&dyn MacroEvaluator> {
        Some(self)
    }
}
