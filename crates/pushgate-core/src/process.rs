//! Bounded subprocess execution.
//!
//! Every external tool the checks touch (git, the package manager, linters,
//! type checkers, test runners, audit tools) goes through [`CommandRunner`].
//! The outcome keeps "binary missing", "timed out" and "crashed" apart so
//! callers can report each one honestly.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Invocation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub env: Vec<(String, String)>,
    pub timeout: Duration,
}

impl Invocation {
    pub fn new(program: impl Into<String>, cwd: &Path, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
            env: Vec::new(),
            timeout,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// `program arg1 arg2`, for log lines and messages.
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

// ---------------------------------------------------------------------------
// InvocationOutcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    /// The process ran to completion. `output` is stdout and stderr combined.
    Completed {
        success: bool,
        code: Option<i32>,
        output: String,
    },
    /// The program is not installed or not on PATH.
    NotFound { program: String },
    /// The process was killed after exceeding its timeout.
    TimedOut { after: Duration },
    /// Spawning or waiting failed for another reason.
    Failed { error: String },
}

impl InvocationOutcome {
    /// Stdout+stderr of a successful run, `None` otherwise.
    pub fn success_output(&self) -> Option<&str> {
        match self {
            InvocationOutcome::Completed {
                success: true,
                output,
                ..
            } => Some(output),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// CommandRunner
// ---------------------------------------------------------------------------

pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> InvocationOutcome;
}

/// Runs invocations as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> InvocationOutcome {
        tracing::debug!(
            command = %invocation.display(),
            cwd = %invocation.cwd.display(),
            timeout_s = invocation.timeout.as_secs(),
            "running"
        );
        let outcome = execute(invocation);
        tracing::debug!(command = %invocation.display(), outcome = ?summary(&outcome), "finished");
        outcome
    }
}

fn summary(outcome: &InvocationOutcome) -> String {
    match outcome {
        InvocationOutcome::Completed { code, .. } => format!("exit {code:?}"),
        InvocationOutcome::NotFound { program } => format!("not found: {program}"),
        InvocationOutcome::TimedOut { after } => format!("timed out after {}s", after.as_secs()),
        InvocationOutcome::Failed { error } => format!("failed: {error}"),
    }
}

/// Spawn the invocation and wait for it, bounded by its timeout.
///
/// Stdout and stderr are drained on dedicated threads to avoid pipe-buffer
/// deadlocks; a waiter thread reports the exit status over a channel so the
/// timeout needs no busy-wait.
fn execute(invocation: &Invocation) -> InvocationOutcome {
    // Resolve through PATH (and PATHEXT on Windows) first so a missing
    // binary is reported as such rather than as a generic spawn error.
    let program = match which::which_in(
        &invocation.program,
        std::env::var_os("PATH"),
        &invocation.cwd,
    ) {
        Ok(p) => p,
        Err(_) => {
            return InvocationOutcome::NotFound {
                program: invocation.program.clone(),
            }
        }
    };

    let mut cmd = Command::new(&program);
    cmd.args(&invocation.args)
        .current_dir(&invocation.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in &invocation.env {
        cmd.env(key, value);
    }

    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return InvocationOutcome::NotFound {
                program: invocation.program.clone(),
            }
        }
        Err(e) => {
            return InvocationOutcome::Failed {
                error: format!("failed to spawn {}: {e}", invocation.program),
            }
        }
    };

    let child_pid = child.id();

    let stdout_handle = child.stdout.take();
    let stderr_handle = child.stderr.take();

    let stdout_thread = std::thread::spawn(move || -> String {
        let mut buf = Vec::new();
        if let Some(mut r) = stdout_handle {
            let _ = r.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    });
    let stderr_thread = std::thread::spawn(move || -> String {
        let mut buf = Vec::new();
        if let Some(mut r) = stderr_handle {
            let _ = r.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    });

    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(child.wait());
    });

    let wait_result = match rx.recv_timeout(invocation.timeout) {
        Ok(result) => result,
        Err(_) => {
            // The waiter thread unblocks once the killed process exits; the
            // reader threads see EOF and finish on their own.
            kill_process(child_pid);
            return InvocationOutcome::TimedOut {
                after: invocation.timeout,
            };
        }
    };

    let stdout_buf = stdout_thread.join().unwrap_or_default();
    let stderr_buf = stderr_thread.join().unwrap_or_default();

    match wait_result {
        Ok(status) => InvocationOutcome::Completed {
            success: status.success(),
            code: status.code(),
            output: combine_output(&stdout_buf, &stderr_buf),
        },
        Err(e) => InvocationOutcome::Failed {
            error: format!("wait failed: {e}"),
        },
    }
}

fn combine_output(stdout: &str, stderr: &str) -> String {
    let stdout = stdout.trim();
    let stderr = stderr.trim();
    if stderr.is_empty() {
        stdout.to_string()
    } else if stdout.is_empty() {
        stderr.to_string()
    } else {
        format!("{stdout}\n{stderr}")
    }
}

/// Best-effort kill by PID; errors are ignored.
#[cfg(unix)]
fn kill_process(pid: u32) {
    let _ = Command::new("kill")
        .arg("-9")
        .arg(pid.to_string())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
}

#[cfg(windows)]
fn kill_process(pid: u32) {
    let _ = Command::new("taskkill")
        .args(["/PID", &pid.to_string(), "/T", "/F"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
}

// ---------------------------------------------------------------------------
// Output truncation
// ---------------------------------------------------------------------------

pub const TRUNCATION_MARKER: &str = "\n... (output truncated)";

/// Keep at most `max_chars` characters of `text`, cutting on a char boundary.
pub fn truncate_output(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((byte_idx, _)) => format!("{}{TRUNCATION_MARKER}", &text[..byte_idx]),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
