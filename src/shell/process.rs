//! Process execution with streamed output.
//!
//! The child's stdout and stderr are forwarded to the build log line by line
//! while it runs. The wait polls so that a [`CancelToken`] can interrupt it:
//! on cancellation the child is killed before returning.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use crate::error::{ExerunError, Result};
use crate::output::BuildLog;
use crate::shell::cancel::{CancelReason, CancelToken};
use crate::shell::command::CommandLine;

/// How often the wait loop checks for exit and cancellation.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Exit code reported when the child had no exit code (killed by a signal).
pub const NO_EXIT_CODE: i32 = -1;

/// Result of running a process to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub exit_code: i32,

    /// The process was killed because the host's deadline passed.
    pub timed_out: bool,
}

impl ExecutionOutcome {
    pub fn exited(exit_code: i32) -> Self {
        Self {
            exit_code,
            timed_out: false,
        }
    }

    pub fn timed_out() -> Self {
        Self {
            exit_code: NO_EXIT_CODE,
            timed_out: true,
        }
    }

    pub fn is_success(&self) -> bool {
        !self.timed_out && self.exit_code == 0
    }
}

fn forward_lines<R: Read + Send + 'static>(stream: R, tx: Sender<String>) {
    thread::spawn(move || {
        let reader = BufReader::new(stream);
        for line in reader.lines().map_while(std::result::Result::ok) {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
}

/// Kill a process and wait for it to terminate.
fn terminate(child: &mut Child) {
    // On Unix this is SIGKILL; on Windows it is TerminateProcess.
    let _ = child.kill();
    let _ = child.wait();
}

/// Forward every line that arrives before `rx` goes quiet for a poll interval.
fn drain(rx: &Receiver<String>, log: &dyn BuildLog) {
    while let Ok(line) = rx.recv_timeout(POLL_INTERVAL) {
        log.println(&line);
    }
}

fn wait_streaming(
    child: &mut Child,
    rx: &Receiver<String>,
    log: &dyn BuildLog,
    cancel: &CancelToken,
) -> Result<std::result::Result<ExitStatus, CancelReason>> {
    let mut streams_open = true;

    loop {
        if let Some(reason) = cancel.reason() {
            tracing::info!("Cancelling process {} ({:?})", child.id(), reason);
            terminate(child);
            return Ok(Err(reason));
        }

        if streams_open {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(line) => {
                    log.println(&line);
                    continue;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => streams_open = false,
            }
        } else {
            thread::sleep(POLL_INTERVAL);
        }

        if let Some(status) = child.try_wait()? {
            drain(rx, log);
            return Ok(Ok(status));
        }
    }
}

/// Run `argv` in `cwd` with `env` added to the inherited environment.
///
/// Blocks until the child exits or `cancel` fires.
///
/// # Errors
///
/// - `LaunchFailure` if the process could not be started
/// - `Cancelled` if the build was aborted while the child ran
pub fn run(
    argv: &[String],
    env: &HashMap<String, String>,
    cwd: &Path,
    log: &dyn BuildLog,
    cancel: &CancelToken,
) -> Result<ExecutionOutcome> {
    let (program, args) = argv.split_first().ok_or_else(|| ExerunError::LaunchFailure {
        command: String::new(),
        message: "empty command line".to_string(),
    })?;

    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(cwd)
        .envs(env)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| ExerunError::LaunchFailure {
        command: program.clone(),
        message: e.to_string(),
    })?;
    tracing::debug!("Spawned {} as pid {}", program, child.id());

    let (tx, rx) = mpsc::channel();
    if let Some(stdout) = child.stdout.take() {
        forward_lines(stdout, tx.clone());
    }
    if let Some(stderr) = child.stderr.take() {
        forward_lines(stderr, tx.clone());
    }
    drop(tx);

    let status = match wait_streaming(&mut child, &rx, log, cancel) {
        Ok(status) => status,
        Err(e) => {
            terminate(&mut child);
            return Err(e);
        }
    };

    match status {
        Ok(status) => {
            let exit_code = status.code().unwrap_or(NO_EXIT_CODE);
            tracing::debug!("{} exited with {}", program, exit_code);
            Ok(ExecutionOutcome::exited(exit_code))
        }
        Err(CancelReason::DeadlineExceeded) => Ok(ExecutionOutcome::timed_out()),
        Err(CancelReason::Aborted) => Err(ExerunError::Cancelled),
    }
}

/// Run a command line, then remove its script on every exit path.
pub fn run_command_line(
    command_line: CommandLine,
    env: &HashMap<String, String>,
    cwd: &Path,
    log: &dyn BuildLog,
    cancel: &CancelToken,
) -> Result<ExecutionOutcome> {
    let (argv, script) = command_line.into_parts();
    let result = run(&argv, env, cwd, log, cancel);
    if let Some(script) = script {
        script.cleanup(log);
    }
    result
}
