//! Single- and multi-input orchestration of clustering threshold sweeps.
//!
//! A sweep runs the external clustering program once per (input, threshold)
//! pair, strictly one process at a time. Only local preconditions are fatal:
//! a missing input, an uncreatable directory, a bad pattern or a threshold
//! without a label. Whatever the external program does is recorded in the
//! returned [`SweepReport`].

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{Span, debug, field, info, instrument, warn};

use crate::{
    Result,
    error::SweepError,
    runner::{CommandRunner, InvocationOutput, ProcessRunner},
    template::InvocationTemplate,
    threshold::{Threshold, ThresholdLabel},
};

/// Thread count used when a request does not set one.
pub const DEFAULT_THREADS: usize = 1;

/// One input file swept across a list of thresholds.
///
/// # Examples
/// ```
/// use ctsweep_core::{InvocationRequest, Threshold};
///
/// let request = InvocationRequest::new("reads.fasta", "out")
///     .with_thresholds(vec![Threshold::new(0.9), Threshold::new(0.97)])
///     .with_threads(8);
/// assert_eq!(request.thresholds.len(), 2);
/// assert_eq!(request.threads, 8);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    /// Sequence file handed to the external program.
    pub input: PathBuf,
    /// Root under which one directory per threshold label is created.
    pub out_dir: PathBuf,
    /// Thresholds in the order they are run.
    pub thresholds: Vec<Threshold>,
    /// Thread count forwarded to the external program.
    pub threads: usize,
}

impl InvocationRequest {
    /// Creates a request with no thresholds and a single thread.
    #[must_use]
    pub fn new(input: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            out_dir: out_dir.into(),
            thresholds: Vec::new(),
            threads: DEFAULT_THREADS,
        }
    }

    /// Replaces the thresholds.
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: Vec<Threshold>) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Replaces the thread count.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }
}

/// Every file matched by a glob pattern swept across a shared list of
/// thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiRequest {
    /// Shell-style pattern selecting the inputs.
    ///
    /// A `**` path component matches any number of nested directories, so
    /// `in/**/*.fasta` also selects files in subdirectories of `in`.
    pub pattern: String,
    /// Root under which one directory per input stem is created.
    pub out_dir: PathBuf,
    /// Thresholds applied to every input.
    pub thresholds: Vec<Threshold>,
    /// Thread count forwarded to the external program.
    pub threads: usize,
}

impl MultiRequest {
    /// Creates a request with no thresholds and a single thread.
    #[must_use]
    pub fn new(pattern: impl Into<String>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            pattern: pattern.into(),
            out_dir: out_dir.into(),
            thresholds: Vec::new(),
            threads: DEFAULT_THREADS,
        }
    }

    /// Replaces the thresholds.
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: Vec<Threshold>) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Replaces the thread count.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    fn request_for(&self, input: PathBuf, stem: &OsStr) -> InvocationRequest {
        InvocationRequest {
            input,
            out_dir: self.out_dir.join(stem),
            thresholds: self.thresholds.clone(),
            threads: self.threads,
        }
    }
}

/// Result of one external invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationOutcome {
    /// Input file that was clustered.
    pub input: PathBuf,
    /// Threshold passed to the external program.
    pub threshold: Threshold,
    /// Label naming the output directory.
    pub label: ThresholdLabel,
    /// Directory the external program wrote into.
    pub out_dir: PathBuf,
    /// Exit status, captured streams and timing.
    pub output: InvocationOutput,
}

impl InvocationOutcome {
    /// Returns `true` when the external program exited with code zero.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.output.status.is_success()
    }
}

/// Two or more runs that write into the same output directory.
///
/// Collisions are reported, not prevented: the later run overwrites the
/// earlier one's files.
#[derive(Debug, Clone, PartialEq)]
pub enum Collision {
    /// Distinct thresholds that round to the same percentage label.
    Label {
        /// Shared threshold directory.
        out_dir: PathBuf,
        /// The shared label.
        label: ThresholdLabel,
        /// Thresholds mapped to `label`, in run order.
        thresholds: Vec<Threshold>,
    },
    /// Matched inputs whose names agree once the extension is stripped.
    Stem {
        /// Shared input directory.
        out_dir: PathBuf,
        /// Inputs mapped to `out_dir`, in run order.
        inputs: Vec<PathBuf>,
    },
}

impl fmt::Display for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label {
                out_dir,
                label,
                thresholds,
            } => {
                let values: Vec<String> = thresholds.iter().map(ToString::to_string).collect();
                write!(
                    f,
                    "thresholds {} share label {label} in `{}`",
                    values.join(", "),
                    out_dir.display()
                )
            }
            Self::Stem { out_dir, inputs } => {
                let names: Vec<String> = inputs
                    .iter()
                    .map(|input| input.display().to_string())
                    .collect();
                write!(
                    f,
                    "inputs {} share directory `{}`",
                    names.join(", "),
                    out_dir.display()
                )
            }
        }
    }
}

/// Outcomes and warnings collected by a sweep.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepReport {
    outcomes: Vec<InvocationOutcome>,
    collisions: Vec<Collision>,
}

impl SweepReport {
    /// Returns the invocation outcomes in run order.
    #[must_use]
    pub fn outcomes(&self) -> &[InvocationOutcome] {
        &self.outcomes
    }

    /// Returns the detected output directory collisions.
    #[must_use]
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// Returns the number of external invocations.
    #[must_use]
    pub fn invocation_count(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns the number of invocations that did not exit with code zero.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| !outcome.is_success())
            .count()
    }

    fn merge(&mut self, other: Self) {
        self.outcomes.extend(other.outcomes);
        self.collisions.extend(other.collisions);
    }
}

/// Drives the external clustering program over inputs and thresholds.
///
/// # Examples
/// ```no_run
/// use ctsweep_core::{InvocationRequest, InvocationTemplate, Sweeper, Threshold};
///
/// let sweeper = Sweeper::new(InvocationTemplate::default());
/// let request = InvocationRequest::new("reads.fasta", "out")
///     .with_thresholds(vec![Threshold::new(0.97)]);
/// let report = sweeper.run_single(&request).expect("reads.fasta exists");
/// println!("{} failed", report.failed_count());
/// ```
#[derive(Debug, Clone)]
pub struct Sweeper<R = ProcessRunner> {
    template: InvocationTemplate,
    runner: R,
}

impl Sweeper<ProcessRunner> {
    /// Creates a sweeper that spawns real processes.
    #[must_use]
    pub const fn new(template: InvocationTemplate) -> Self {
        Self {
            template,
            runner: ProcessRunner,
        }
    }
}

impl<R: CommandRunner> Sweeper<R> {
    /// Creates a sweeper that delegates execution to `runner`.
    #[must_use]
    pub const fn with_runner(template: InvocationTemplate, runner: R) -> Self {
        Self { template, runner }
    }

    /// Returns the invocation template.
    #[must_use]
    pub const fn template(&self) -> &InvocationTemplate {
        &self.template
    }

    /// Sweeps one input file across the request's thresholds.
    ///
    /// The input is checked before anything touches the filesystem. The
    /// output root is created without parents; each threshold directory is
    /// created just before its invocation.
    ///
    /// # Errors
    /// Returns [`SweepError::InputNotFound`] when the input is not a regular
    /// file, [`SweepError::NonFiniteThreshold`] when a threshold has no label
    /// and [`SweepError::CreateDir`] when a directory cannot be created.
    #[instrument(
        name = "sweep.single",
        err,
        skip_all,
        fields(
            input = %request.input.display(),
            out_dir = %request.out_dir.display(),
            thresholds = request.thresholds.len(),
            threads = request.threads,
            failed = field::Empty,
        ),
    )]
    pub fn run_single(&self, request: &InvocationRequest) -> Result<SweepReport> {
        ensure_input_file(&request.input)?;
        if request.thresholds.is_empty() {
            warn!(
                input = %request.input.display(),
                "provide at least one clustering threshold (-c/--ct)"
            );
        }
        let labelled = label_thresholds(&request.thresholds)?;
        ensure_dir(&request.out_dir)?;

        let mut report = SweepReport::default();
        for collision in label_collisions(&request.out_dir, &labelled) {
            warn!(collision = %collision, "threshold directories collide");
            report.collisions.push(collision);
        }

        for (threshold, label) in labelled {
            let dir = request.out_dir.join(label.to_string());
            ensure_dir(&dir)?;
            let outcome = self.invoke(&request.input, dir, threshold, label, request.threads);
            report.outcomes.push(outcome);
        }

        Span::current().record("failed", report.failed_count());
        info!(
            invocations = report.invocation_count(),
            failed = report.failed_count(),
            "input sweep completed"
        );
        Ok(report)
    }

    /// Sweeps every file matched by the request's pattern.
    ///
    /// Each match is swept into `<out_dir>/<stem>` where `stem` is the file
    /// name without its final extension. A pattern without matches produces
    /// an empty report.
    ///
    /// # Errors
    /// Returns [`SweepError::InvalidPattern`] or [`SweepError::GlobEntry`]
    /// when expansion fails, and any error of [`Self::run_single`] for the
    /// individual matches.
    #[instrument(
        name = "sweep.multi",
        err,
        skip_all,
        fields(
            pattern = %request.pattern,
            out_dir = %request.out_dir.display(),
            matches = field::Empty,
        ),
    )]
    pub fn run_multi(&self, request: &MultiRequest) -> Result<SweepReport> {
        let inputs = expand_pattern(&request.pattern)?;
        Span::current().record("matches", inputs.len());
        ensure_dir(&request.out_dir)?;

        let targets = inputs
            .into_iter()
            .map(|input| input_stem(&input).map(|stem| (input, stem)))
            .collect::<Result<Vec<_>>>()?;

        let mut report = SweepReport::default();
        for collision in stem_collisions(&request.out_dir, &targets) {
            warn!(collision = %collision, "input directories collide");
            report.collisions.push(collision);
        }

        for (input, stem) in targets {
            let single = request.request_for(input, &stem);
            report.merge(self.run_single(&single)?);
        }

        info!(
            invocations = report.invocation_count(),
            failed = report.failed_count(),
            "pattern sweep completed"
        );
        Ok(report)
    }

    #[instrument(
        name = "sweep.invoke",
        skip_all,
        fields(label = %label, threshold = %threshold, threads = threads),
    )]
    fn invoke(
        &self,
        input: &Path,
        out_dir: PathBuf,
        threshold: Threshold,
        label: ThresholdLabel,
        threads: usize,
    ) -> InvocationOutcome {
        let args = self.template.arguments(input, &out_dir, threshold, threads);
        debug!(
            program = %self.template.executable().display(),
            args = ?args,
            "invoking external program"
        );
        let output = self.runner.run(self.template.executable(), &args);
        let elapsed_ms = u64::try_from(output.elapsed.as_millis()).unwrap_or(u64::MAX);
        if output.status.is_success() {
            info!(status = %output.status, elapsed_ms, "invocation completed");
        } else {
            warn!(
                status = %output.status,
                elapsed_ms,
                stderr = output.stderr.trim_end(),
                "invocation failed"
            );
        }
        InvocationOutcome {
            input: input.to_path_buf(),
            threshold,
            label,
            out_dir,
            output,
        }
    }
}

fn ensure_input_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(SweepError::InputNotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Creates `path` unless it already exists. Parents are never created.
fn ensure_dir(path: &Path) -> Result<()> {
    match fs::create_dir(path) {
        Ok(()) => {
            debug!(path = %path.display(), "created directory");
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(source) => Err(SweepError::CreateDir {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn label_thresholds(thresholds: &[Threshold]) -> Result<Vec<(Threshold, ThresholdLabel)>> {
    thresholds
        .iter()
        .map(|threshold| threshold.label().map(|label| (*threshold, label)))
        .collect()
}

fn label_collisions(out_dir: &Path, labelled: &[(Threshold, ThresholdLabel)]) -> Vec<Collision> {
    let mut groups: BTreeMap<ThresholdLabel, Vec<Threshold>> = BTreeMap::new();
    for (threshold, label) in labelled {
        groups.entry(*label).or_default().push(*threshold);
    }
    groups
        .into_iter()
        .filter(|(_, thresholds)| thresholds.len() > 1)
        .map(|(label, thresholds)| Collision::Label {
            out_dir: out_dir.join(label.to_string()),
            label,
            thresholds,
        })
        .collect()
}

fn stem_collisions(out_dir: &Path, targets: &[(PathBuf, OsString)]) -> Vec<Collision> {
    let mut groups: BTreeMap<&OsStr, Vec<PathBuf>> = BTreeMap::new();
    for (input, stem) in targets {
        groups.entry(stem.as_os_str()).or_default().push(input.clone());
    }
    groups
        .into_iter()
        .filter(|(_, inputs)| inputs.len() > 1)
        .map(|(stem, inputs)| Collision::Stem {
            out_dir: out_dir.join(stem),
            inputs,
        })
        .collect()
}

fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let options = glob::MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };
    let paths = glob::glob_with(pattern, options).map_err(|source| SweepError::InvalidPattern {
        pattern: pattern.to_owned(),
        source,
    })?;
    paths
        .map(|entry| entry.map_err(|source| SweepError::GlobEntry { source }))
        .collect()
}

/// File name of `input` with its final extension stripped.
fn input_stem(input: &Path) -> Result<OsString> {
    input
        .file_stem()
        .map(OsStr::to_os_string)
        .ok_or_else(|| SweepError::InputNotFound {
            path: input.to_path_buf(),
        })
}
