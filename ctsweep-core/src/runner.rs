//! Process execution seam for external invocations.
//!
//! [`CommandRunner`] isolates the orchestrators from the operating system so
//! tests can observe the exact argument vectors without spawning processes.
//! [`ProcessRunner`] is the production implementation.

use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Terminal state of one external invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationStatus {
    /// The process ran to completion with the given exit code.
    Exited(i32),
    /// The process was terminated without an exit code, e.g. by a signal.
    Terminated,
    /// The process could not be started.
    SpawnFailed(String),
}

impl InvocationStatus {
    /// Returns `true` when the process exited with code zero.
    ///
    /// # Examples
    /// ```
    /// use ctsweep_core::InvocationStatus;
    ///
    /// assert!(InvocationStatus::Exited(0).is_success());
    /// assert!(!InvocationStatus::Exited(2).is_success());
    /// assert!(!InvocationStatus::SpawnFailed("not found".into()).is_success());
    /// ```
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Exited(0))
    }
}

impl fmt::Display for InvocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exited(code) => write!(f, "exit {code}"),
            Self::Terminated => f.write_str("terminated"),
            Self::SpawnFailed(reason) => write!(f, "spawn failed: {reason}"),
        }
    }
}

/// Everything observed about a finished external invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationOutput {
    /// How the process ended.
    pub status: InvocationStatus,
    /// Captured standard output, lossily decoded.
    pub stdout: String,
    /// Captured standard error, lossily decoded.
    pub stderr: String,
    /// Wall-clock time between spawn and exit.
    pub elapsed: Duration,
}

/// Runs external programs on behalf of the orchestrators.
pub trait CommandRunner {
    /// Runs `program` with `args` to completion.
    ///
    /// Implementations must not fail: spawn errors are reported through
    /// [`InvocationStatus::SpawnFailed`].
    fn run(&self, program: &Path, args: &[OsString]) -> InvocationOutput;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, program: &Path, args: &[OsString]) -> InvocationOutput {
        (**self).run(program, args)
    }
}

/// [`CommandRunner`] backed by [`std::process::Command`].
///
/// The child inherits no standard input; standard output and error are
/// captured in full and the call blocks until the child exits.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> InvocationOutput {
        let started = Instant::now();
        let result = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output();
        let elapsed = started.elapsed();

        match result {
            Ok(output) => InvocationOutput {
                status: output
                    .status
                    .code()
                    .map_or(InvocationStatus::Terminated, InvocationStatus::Exited),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                elapsed,
            },
            Err(err) => InvocationOutput {
                status: InvocationStatus::SpawnFailed(err.to_string()),
                stdout: String::new(),
                stderr: String::new(),
                elapsed,
            },
        }
    }
}
