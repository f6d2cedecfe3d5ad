//! Small helpers shared across CLI tests.

use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use clap::Parser;
use ctsweep_core::{
    CommandRunner, InvocationOutput, InvocationStatus, InvocationTemplate, Sweeper,
};
use ctsweep_test_support::fixtures::SweepWorkspace;

use super::commands::run_command;
use super::{Cli, CliError, Command, ExecutionSummary};

/// Runner that reports a fixed status without spawning anything.
#[derive(Clone)]
pub(super) struct StubRunner(pub(super) InvocationStatus);

impl CommandRunner for StubRunner {
    fn run(&self, _program: &Path, _args: &[OsString]) -> InvocationOutput {
        InvocationOutput {
            status: self.0.clone(),
            stdout: String::new(),
            stderr: String::new(),
            elapsed: Duration::from_millis(3),
        }
    }
}

pub(super) fn workspace() -> SweepWorkspace {
    match SweepWorkspace::new() {
        Ok(workspace) => workspace,
        Err(err) => panic!("failed to create workspace: {err}"),
    }
}

pub(super) fn parse<I, S>(args: I) -> Cli
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => panic!("arguments must parse: {err}"),
    }
}

pub(super) fn run_stubbed(
    command: Command,
    status: InvocationStatus,
    strict: bool,
) -> Result<ExecutionSummary, CliError> {
    let sweeper = Sweeper::with_runner(InvocationTemplate::default(), StubRunner(status));
    run_command(&sweeper, command, strict)
}

pub(super) fn run_stubbed_expecting_error(command: Command, panic_msg: &str) -> CliError {
    match run_stubbed(command, InvocationStatus::Exited(0), false) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
