//! Command line assembly.
//!
//! On POSIX-like platforms the argv is the executable followed by its
//! arguments, with no shell in between. On Windows-like platforms the whole
//! command is written to a temporary batch script, which is run through the
//! command interpreter so the child's exit code survives the interpreter:
//!
//! ```text
//! cmd.exe /C <workspace>\exe_runner_XXXX.bat && exit %ERRORLEVEL%
//! ```
//!
//! The script is owned by the returned [`CommandLine`] and removed by
//! whoever runs it; see [`crate::shell::process::run_command_line`].

use std::io::Write;
use std::path::Path;

use crate::error::{ExerunError, Result};
use crate::output::BuildLog;
use crate::shell::platform::Platform;

/// Prefix of temporary batch script names.
pub const SCRIPT_PREFIX: &str = "exe_runner_";

/// Suffix of temporary batch script names.
pub const SCRIPT_SUFFIX: &str = ".bat";

/// A temporary batch script on disk.
///
/// Dropping it also removes the file; [`ScriptArtifact::cleanup`] does the
/// same but reports failures to the build log.
#[derive(Debug)]
pub struct ScriptArtifact {
    path: tempfile::TempPath,
}

impl ScriptArtifact {
    /// Write `content` to a new script file in `dir`.
    pub fn create(dir: &Path, content: &str) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix(SCRIPT_PREFIX)
            .suffix(SCRIPT_SUFFIX)
            .tempfile_in(dir)
            .map_err(|e| ExerunError::LaunchFailure {
                command: content.to_string(),
                message: format!("cannot create script in {}: {}", dir.display(), e),
            })?;

        write!(file, "{}\r\n", content)
            .and_then(|_| file.flush())
            .map_err(|e| ExerunError::LaunchFailure {
                command: content.to_string(),
                message: format!("cannot write {}: {}", file.path().display(), e),
            })?;

        let path = file.into_temp_path();
        tracing::debug!("Created script {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the script. Failures are logged and otherwise ignored.
    pub fn cleanup(self, log: &dyn BuildLog) {
        let path = self.path.display().to_string();
        if let Err(e) = self.path.close() {
            tracing::warn!("Failed to delete {}: {}", path, e);
            log.error(&format!("temporary file delete failed: {}: {}", path, e));
        }
    }
}

/// A launch-ready command.
#[derive(Debug)]
pub struct CommandLine {
    argv: Vec<String>,
    script: Option<ScriptArtifact>,
}

impl CommandLine {
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn script(&self) -> Option<&ScriptArtifact> {
        self.script.as_ref()
    }

    /// Render the command for the build log, quoting arguments that need it.
    pub fn display(&self) -> String {
        self.argv
            .iter()
            .map(|arg| quote_for_display(arg))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn into_parts(self) -> (Vec<String>, Option<ScriptArtifact>) {
        (self.argv, self.script)
    }
}

fn quote_for_display(arg: &str) -> String {
    if arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || c == '"') {
        format!("\"{}\"", arg.replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}

/// Wrap `value` in double quotes.
pub fn append_quote(value: &str) -> String {
    format!("\"{}\"", value)
}

/// The single batch line for an executable and its arguments.
///
/// The executable is quoted so paths with spaces survive; arguments are
/// written exactly as expanded.
pub fn batch_line(executable: &str, args: &[String]) -> String {
    std::iter::once(append_quote(executable))
        .chain(args.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Assemble the command line for `platform`.
///
/// `script_dir` is where a batch script is created on Windows-like platforms.
pub fn build_command_line(
    executable: &str,
    args: &[String],
    platform: &Platform,
    script_dir: &Path,
) -> Result<CommandLine> {
    match platform {
        Platform::Unix => {
            let mut argv = Vec::with_capacity(args.len() + 1);
            argv.push(executable.to_string());
            argv.extend(args.iter().cloned());
            Ok(CommandLine { argv, script: None })
        }
        Platform::Windows { interpreter } => {
            let script = ScriptArtifact::create(script_dir, &batch_line(executable, args))?;
            let argv = vec![
                interpreter.clone(),
                "/C".to_string(),
                script.path().display().to_string(),
                "&&".to_string(),
                "exit".to_string(),
                "%ERRORLEVEL%".to_string(),
            ];
            Ok(CommandLine {
                argv,
                script: Some(script),
            })
        }
    }
}
