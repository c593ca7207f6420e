//! Argument tokenization and expansion.
//!
//! An argument string is split on runs of whitespace (space, tab, carriage
//! return, newline); quoting is not interpreted. Each token is then expanded
//! on its own against a [`BuildContext`]:
//!
//! 1. If the context offers an active [`MacroEvaluator`], the token is
//!    evaluated as a macro template. If evaluation fails, a diagnostic is
//!    written and the token falls back to environment expansion.
//! 2. Otherwise only environment references are substituted.
//!
//! Tokens that expand to nothing but whitespace are dropped, which lets an
//! unset optional variable remove its argument entirely.
//!
//! # Example
//!
//! ```
//! use exerun::expand::{expand, EnvContext};
//! use exerun::output::CapturedLog;
//! use std::collections::HashMap;
//!
//! let mut env = HashMap::new();
//! env.insert("OUT".to_string(), "build".to_string());
//! env.insert("EXTRA".to_string(), String::new());
//! let ctx = EnvContext::new(env);
//!
//! let args = expand("--out=$OUT  ${EXTRA}\t-q", &ctx, &CapturedLog::new());
//! assert_eq!(args, vec!["--out=build", "-q"]);
//! ```

pub mod macros;

use std::collections::HashMap;

use crate::config::interpolation::expand_env;
use crate::output::BuildLog;

pub use macros::{BuildMacros, MacroError, MacroEvaluator};

/// Characters that separate argument tokens.
const DELIMITERS: &[char] = &[' ', '\t', '\r', '\n'];

/// Source of variables for argument expansion.
pub trait BuildContext: Send + Sync {
    /// Environment of the current build.
    fn environment(&self) -> &HashMap<String, String>;

    /// Richer macro evaluation, when the host provides it.
    fn macro_evaluator(&self) -> Option<&dyn MacroEvaluator> {
        None
    }
}

/// Build context offering environment substitution only.
#[derive(Debug, Clone, Default)]
pub struct EnvContext {
    env: HashMap<String, String>,
}

impl EnvContext {
    pub fn new(env: HashMap<String, String>) -> Self {
        Self { env }
    }
}

impl BuildContext for EnvContext {
    fn environment(&self) -> &HashMap<String, String> {
        &self.env
    }
}

/// Split `raw` on runs of whitespace.
pub fn tokenize(raw: &str) -> Vec<&str> {
    raw.split(DELIMITERS).filter(|t| !t.is_empty()).collect()
}

/// Expand one token.
///
/// Never fails; macro problems degrade to environment expansion.
pub fn expand_token(token: &str, ctx: &dyn BuildContext, log: &dyn BuildLog) -> String {
    match ctx.macro_evaluator() {
        Some(evaluator) if evaluator.is_active() => match evaluator.evaluate(token) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Macro evaluation failed for '{}': {}", token, e);
                log.error(&format!("Unable to evaluate macro in: {} {}", token, e));
                expand_env(token, ctx.environment())
            }
        },
        Some(_) => {
            tracing::debug!("Macro evaluator inactive, using environment expansion");
            expand_env(token, ctx.environment())
        }
        None => expand_env(token, ctx.environment()),
    }
}

/// Tokenize and expand an argument string, dropping blank results.
pub fn expand(raw: &str, ctx: &dyn BuildContext, log: &dyn BuildLog) -> Vec<String> {
    tokenize(raw)
        .into_iter()
        .map(|token| expand_token(token, ctx, log))
        .filter(|value| !value.trim().is_empty())
        .collect()
}
