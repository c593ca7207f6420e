//! Build log sinks.
//!
//! The build log is plain, line-oriented text: the lines a user reads in the
//! build's console. It is separate from `tracing` diagnostics.
//!
//! # Example
//!
//! ```
//! use exerun::output::{BuildLog, CapturedLog};
//!
//! let log = CapturedLog::new();
//! log.println("Path To exe: /bin/true");
//! log.error("something failed");
//!
//! assert_eq!(log.lines(), vec!["Path To exe: /bin/true", "ERROR: something failed"]);
//! ```

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use console::style;

/// Line-oriented sink for build output.
///
/// Implementations must accept lines from several threads, since child
/// stdout and stderr are forwarded as they arrive.
pub trait BuildLog: Send + Sync {
    /// Write one line.
    fn println(&self, line: &str);

    /// Write one error line.
    fn error(&self, message: &str) {
        self.println(&format!("ERROR: {}", message));
    }
}

/// Build log written to the process's stdout (errors to stderr).
#[derive(Debug, Default)]
pub struct ConsoleLog {
    lock: Mutex<()>,
}

impl ConsoleLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BuildLog for ConsoleLog {
    fn println(&self, line: &str) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", line);
        let _ = out.flush();
    }

    fn error(&self, message: &str) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err, "{} {}", style("ERROR:").red().bold(), message);
    }
}

/// Build log that records lines in memory.
#[derive(Debug, Default)]
pub struct CapturedLog {
    lines: Mutex<Vec<String>>,
}

impl CapturedLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }
}

impl BuildLog for CapturedLog {
    fn println(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }
}
