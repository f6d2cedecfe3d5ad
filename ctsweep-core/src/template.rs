//! Invocation template for the external clustering program.
//!
//! The template owns every constant of an external invocation: the executable,
//! the fixed clustering flags and the output file names. Orchestrators receive
//! it as a value and ask it for the argument vector of one (input, threshold)
//! pair.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::threshold::Threshold;

/// Executable used when no explicit path is configured.
pub const DEFAULT_EXECUTABLE: &str = "vsearch";

const DEFAULT_FIXED_FLAGS: [&str; 6] = [
    "--clusterout_id",
    "--clusterout_sort",
    "--qmask",
    "none",
    "--strand",
    "both",
];

/// File names written by the external program inside a threshold directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    /// Centroid sequences (`--centroids`).
    pub centroids: String,
    /// Prefix for per-cluster files (`--clusters`); the program appends the
    /// cluster number.
    pub clusters: String,
    /// Multiple sequence alignments (`--msaout`).
    pub alignments: String,
    /// Cluster membership report in UCLUST format (`--uc`).
    pub membership: String,
    /// Tabular pairwise alignment report (`--blast6out`).
    pub tabular: String,
    /// Program log (`--log`).
    pub log: String,
    /// Consensus sequences (`--consout`).
    pub consensus: String,
}

impl Default for OutputNames {
    fn default() -> Self {
        Self {
            centroids: "centroids.fasta".to_owned(),
            clusters: "cluster".to_owned(),
            alignments: "clusteralignments.fasta".to_owned(),
            membership: "uclust.txt".to_owned(),
            tabular: "blast6.txt".to_owned(),
            log: "log.txt".to_owned(),
            consensus: "clusterconsensus.fasta".to_owned(),
        }
    }
}

impl OutputNames {
    /// Resolves every output name inside `dir`.
    #[must_use]
    pub fn resolve(&self, dir: &Path) -> OutputPaths {
        OutputPaths {
            centroids: dir.join(&self.centroids),
            clusters: dir.join(&self.clusters),
            alignments: dir.join(&self.alignments),
            membership: dir.join(&self.membership),
            tabular: dir.join(&self.tabular),
            log: dir.join(&self.log),
            consensus: dir.join(&self.consensus),
        }
    }
}

/// Output paths of a single invocation, resolved against its threshold
/// directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Centroid sequences.
    pub centroids: PathBuf,
    /// Per-cluster file prefix.
    pub clusters: PathBuf,
    /// Multiple sequence alignments.
    pub alignments: PathBuf,
    /// Cluster membership report.
    pub membership: PathBuf,
    /// Tabular alignment report.
    pub tabular: PathBuf,
    /// Program log.
    pub log: PathBuf,
    /// Consensus sequences.
    pub consensus: PathBuf,
}

/// Describes how the external clustering program is invoked.
///
/// # Examples
/// ```
/// use std::path::Path;
///
/// use ctsweep_core::{InvocationTemplate, Threshold};
///
/// let template = InvocationTemplate::builder()
///     .with_executable("/opt/vsearch/bin/vsearch")
///     .build();
/// let args = template.arguments(
///     Path::new("reads.fasta"),
///     Path::new("out/97"),
///     Threshold::new(0.97),
///     4,
/// );
/// assert_eq!(args[0], "--cluster_fast");
/// assert!(args.iter().any(|arg| arg == "0.97"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationTemplate {
    executable: PathBuf,
    fixed_flags: Vec<String>,
    outputs: OutputNames,
}

impl Default for InvocationTemplate {
    fn default() -> Self {
        InvocationTemplateBuilder::default().build()
    }
}

impl InvocationTemplate {
    /// Starts a builder populated with the default VSEARCH configuration.
    #[must_use]
    pub fn builder() -> InvocationTemplateBuilder {
        InvocationTemplateBuilder::default()
    }

    /// Returns the external executable.
    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Returns the flags appended verbatim to every invocation.
    #[must_use]
    pub fn fixed_flags(&self) -> &[String] {
        &self.fixed_flags
    }

    /// Returns the output file naming convention.
    #[must_use]
    pub const fn outputs(&self) -> &OutputNames {
        &self.outputs
    }

    /// Builds the argument vector for one input and threshold.
    ///
    /// Arguments are handed to the child process directly, so paths containing
    /// spaces or shell metacharacters need no quoting.
    #[must_use]
    pub fn arguments(
        &self,
        input: &Path,
        out_dir: &Path,
        threshold: Threshold,
        threads: usize,
    ) -> Vec<OsString> {
        let paths = self.outputs.resolve(out_dir);
        let mut args: Vec<OsString> = Vec::with_capacity(20 + self.fixed_flags.len());
        push_pair(&mut args, "--cluster_fast", input.as_os_str());
        push_pair(&mut args, "--centroids", paths.centroids.as_os_str());
        push_pair(&mut args, "--clusters", paths.clusters.as_os_str());
        push_pair(&mut args, "--msaout", paths.alignments.as_os_str());
        push_pair(&mut args, "--uc", paths.membership.as_os_str());
        push_pair(&mut args, "--blast6out", paths.tabular.as_os_str());
        push_pair(&mut args, "--id", OsStr::new(&threshold.to_string()));
        push_pair(&mut args, "--log", paths.log.as_os_str());
        push_pair(&mut args, "--threads", OsStr::new(&threads.to_string()));
        push_pair(&mut args, "--consout", paths.consensus.as_os_str());
        args.extend(self.fixed_flags.iter().map(OsString::from));
        args
    }
}

fn push_pair(args: &mut Vec<OsString>, flag: &str, value: &OsStr) {
    args.push(OsString::from(flag));
    args.push(value.to_os_string());
}

/// Configures and constructs [`InvocationTemplate`] values.
#[derive(Debug, Clone)]
pub struct InvocationTemplateBuilder {
    executable: PathBuf,
    fixed_flags: Vec<String>,
    outputs: OutputNames,
}

impl Default for InvocationTemplateBuilder {
    fn default() -> Self {
        Self {
            executable: PathBuf::from(DEFAULT_EXECUTABLE),
            fixed_flags: DEFAULT_FIXED_FLAGS
                .iter()
                .map(|flag| (*flag).to_owned())
                .collect(),
            outputs: OutputNames::default(),
        }
    }
}

impl InvocationTemplateBuilder {
    /// Overrides the external executable.
    #[must_use]
    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }

    /// Replaces the fixed clustering flags.
    #[must_use]
    pub fn with_fixed_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fixed_flags = flags.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the output file naming convention.
    #[must_use]
    pub fn with_outputs(mut self, outputs: OutputNames) -> Self {
        self.outputs = outputs;
        self
    }

    /// Constructs the template.
    #[must_use]
    pub fn build(self) -> InvocationTemplate {
        InvocationTemplate {
            executable: self.executable,
            fixed_flags: self.fixed_flags,
            outputs: self.outputs,
        }
    }
}
