//! Command implementations and argument parsing for the ctsweep CLI.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ctsweep_core::{
    CommandRunner, DEFAULT_EXECUTABLE, DEFAULT_THREADS, InvocationRequest, InvocationTemplate,
    MultiRequest, SweepError, SweepReport, Sweeper, Threshold,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Environment variable naming the external clustering executable.
pub const VSEARCH_ENV: &str = "CTSWEEP_VSEARCH";

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "ctsweep",
    version,
    about = "Run `vsearch --cluster_fast` for multiple clustering thresholds and inputs."
)]
pub struct Cli {
    /// Path to the VSEARCH executable.
    #[arg(long, global = true, env = VSEARCH_ENV, default_value = DEFAULT_EXECUTABLE)]
    pub vsearch: PathBuf,

    /// Exit with a failure status if any clustering invocation fails.
    #[arg(long, global = true)]
    pub strict: bool,

    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Cluster one FASTA file at every requested threshold.
    Simple(SimpleArgs),
    /// Cluster every file matched by a glob pattern at every requested
    /// threshold, one output directory per input.
    Multi(MultiArgs),
}

impl Command {
    /// Returns the subcommand name as typed on the command line.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Simple(_) => "simple",
            Self::Multi(_) => "multi",
        }
    }
}

/// Options accepted by the `simple` command.
#[derive(Debug, Args, Clone)]
pub struct SimpleArgs {
    /// FASTA file containing the sequences to cluster.
    pub in_file: PathBuf,

    /// Output directory; created if missing, with one subdirectory per
    /// threshold.
    pub out_dir: PathBuf,

    /// Threshold and thread options.
    #[command(flatten)]
    pub sweep: SweepArgs,
}

/// Options accepted by the `multi` command.
#[derive(Debug, Args, Clone)]
pub struct MultiArgs {
    /// Glob pattern selecting the inputs, e.g. "in/*.fasta". Quote it so the
    /// shell does not expand it. A "**" component also descends into
    /// subdirectories.
    pub in_files: String,

    /// Output directory; created if missing, with one subdirectory per input
    /// named after the input without its extension.
    pub out_dir: PathBuf,

    /// Threshold and thread options.
    #[command(flatten)]
    pub sweep: SweepArgs,
}

/// Options shared by both commands.
#[derive(Debug, Args, Clone)]
pub struct SweepArgs {
    /// Clustering threshold (id); repeat to test several.
    #[arg(
        short = 'c',
        long = "ct",
        value_name = "THRESHOLD",
        allow_negative_numbers = true
    )]
    pub cts: Vec<Threshold>,

    /// Number of threads passed to VSEARCH.
    #[arg(short = 't', long, default_value_t = DEFAULT_THREADS)]
    pub threads: usize,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The sweep could not be prepared or run.
    #[error(transparent)]
    Sweep(#[from] SweepError),
    /// Strict mode saw at least one unsuccessful invocation.
    #[error("{failed} of {total} clustering invocations failed")]
    FailedInvocations {
        /// Number of unsuccessful invocations.
        failed: usize,
        /// Number of invocations attempted.
        total: usize,
    },
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Name of the executed command.
    pub command: &'static str,
    /// Outcomes collected by the sweep.
    pub report: SweepReport,
    /// Whether failed invocations fail the command.
    pub strict: bool,
}

impl ExecutionSummary {
    /// Checks the report against the strictness setting.
    ///
    /// # Errors
    /// Returns [`CliError::FailedInvocations`] in strict mode when any
    /// invocation did not exit successfully.
    pub fn ensure_success(&self) -> Result<(), CliError> {
        let failed = self.report.failed_count();
        if self.strict && failed > 0 {
            return Err(CliError::FailedInvocations {
                failed,
                total: self.report.invocation_count(),
            });
        }
        Ok(())
    }
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when the sweep cannot be prepared or a directory
/// cannot be created. Failed invocations are reported in the summary instead.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use std::ffi::OsString;
/// # use clap::Parser;
/// # use ctsweep_cli::cli::{Cli, run_cli};
/// # use tempfile::TempDir;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = TempDir::new()?;
/// let out_dir = dir.path().join("out");
/// let args: Vec<OsString> = vec![
///     "ctsweep".into(),
///     "multi".into(),
///     dir.path().join("*.fasta").into_os_string(),
///     out_dir.clone().into_os_string(),
///     "--ct".into(),
///     "0.97".into(),
/// ];
/// let cli = Cli::try_parse_from(args)?;
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.report.invocation_count(), 0);
/// assert!(out_dir.is_dir());
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty, vsearch = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let Cli {
        vsearch,
        strict,
        command,
    } = cli;
    let span = Span::current();
    span.record("command", command.name());
    span.record("vsearch", field::display(vsearch.display()));
    let template = InvocationTemplate::builder()
        .with_executable(vsearch)
        .build();
    run_command(&Sweeper::new(template), command, strict)
}

#[instrument(
    name = "cli.execute",
    err,
    skip(sweeper, command),
    fields(command = field::Empty, out_dir = field::Empty, threads = field::Empty),
)]
pub(super) fn run_command<R: CommandRunner>(
    sweeper: &Sweeper<R>,
    command: Command,
    strict: bool,
) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    let name = command.name();
    span.record("command", name);
    let report = match command {
        Command::Simple(args) => {
            span.record("out_dir", field::display(args.out_dir.display()));
            span.record("threads", args.sweep.threads);
            let request = InvocationRequest::new(args.in_file, args.out_dir)
                .with_thresholds(args.sweep.cts)
                .with_threads(args.sweep.threads);
            sweeper.run_single(&request)?
        }
        Command::Multi(args) => {
            span.record("out_dir", field::display(args.out_dir.display()));
            span.record("threads", args.sweep.threads);
            let request = MultiRequest::new(args.in_files, args.out_dir)
                .with_thresholds(args.sweep.cts)
                .with_threads(args.sweep.threads);
            sweeper.run_multi(&request)?
        }
    };

    info!(
        command = name,
        invocations = report.invocation_count(),
        failed = report.failed_count(),
        collisions = report.collisions().len(),
        "command completed"
    );
    Ok(ExecutionSummary {
        command: name,
        report,
        strict,
    })
}

/// Renders `summary` to `writer` in a tab-separated text format.
///
/// One line per invocation (`input`, `label`, `status`, `elapsed ms`),
/// followed by a totals line and one line per output directory collision.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use ctsweep_cli::cli::{ExecutionSummary, render_summary};
/// # use ctsweep_core::SweepReport;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary {
///     command: "simple",
///     report: SweepReport::default(),
///     strict: false,
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(String::from_utf8(buffer)?, "invocations: 0, failed: 0\n");
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    let report = &summary.report;
    for outcome in report.outcomes() {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            outcome.input.display(),
            outcome.label,
            outcome.output.status,
            outcome.output.elapsed.as_millis()
        )?;
    }
    writeln!(
        writer,
        "invocations: {}, failed: {}",
        report.invocation_count(),
        report.failed_count()
    )?;
    for collision in report.collisions() {
        writeln!(writer, "collision: {collision}")?;
    }
    Ok(())
}
