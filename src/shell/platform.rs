//! Target platform detection.

use crate::config::schema::NodeOs;

/// How commands must be launched on an execution node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    /// POSIX-like: argv is handed to the process launcher directly.
    Unix,
    /// Windows-like: commands go through a batch script run by `interpreter`.
    Windows { interpreter: String },
}

impl Platform {
    /// Platform of the machine this process runs on.
    pub fn host() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows {
                interpreter: default_interpreter(),
            }
        } else {
            Platform::Unix
        }
    }

    /// Platform for a configured node OS, with an optional interpreter override.
    pub fn for_os(os: NodeOs, interpreter: Option<&str>) -> Self {
        match os {
            NodeOs::Unix => Platform::Unix,
            NodeOs::Windows => Platform::Windows {
                interpreter: interpreter
                    .map(str::to_string)
                    .unwrap_or_else(default_interpreter),
            },
        }
    }

    pub fn is_unix(&self) -> bool {
        matches!(self, Platform::Unix)
    }
}

/// `COMSPEC` when set, otherwise `cmd.exe`.
fn default_interpreter() -> String {
    std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string())
}
