//! Helpers shared by the ctsweep-core integration tests.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use ctsweep_core::{CommandRunner, InvocationOutput, InvocationStatus};

/// One call observed by [`RecordingRunner`].
#[derive(Debug, Clone)]
pub struct Call {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Call {
    /// Returns the argument following `flag`.
    #[must_use]
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|arg| arg == flag)
            .and_then(|index| self.args.get(index + 1))
            .map(String::as_str)
    }
}

/// Runner that records calls instead of spawning processes.
#[derive(Clone)]
pub struct RecordingRunner {
    calls: Arc<Mutex<Vec<Call>>>,
    status: InvocationStatus,
}

impl Default for RecordingRunner {
    fn default() -> Self {
        Self::with_status(InvocationStatus::Exited(0))
    }
}

impl RecordingRunner {
    /// Creates a runner that reports `status` for every call.
    #[must_use]
    pub fn with_status(status: InvocationStatus) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            status,
        }
    }

    /// Returns the recorded calls in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> InvocationOutput {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Call {
                program: program.to_path_buf(),
                args: args
                    .iter()
                    .map(|arg| arg.to_string_lossy().into_owned())
                    .collect(),
            });
        InvocationOutput {
            status: self.status.clone(),
            stdout: String::new(),
            stderr: String::new(),
            elapsed: Duration::from_millis(1),
        }
    }
}
