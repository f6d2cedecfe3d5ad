//! Temporary sweep workspaces with small FASTA inputs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Three short reads, enough for the external program to form clusters.
pub const SAMPLE_FASTA: &str = ">read1\nACGTACGTACGTACGT\n>read2\nACGTACGTACGTACGA\n>read3\nTTTTGGGGCCCCAAAA\n";

/// Temporary directory holding sweep inputs and outputs.
///
/// The directory is removed when the workspace is dropped.
///
/// # Examples
/// ```
/// use ctsweep_test_support::fixtures::SweepWorkspace;
///
/// let workspace = SweepWorkspace::new().expect("temp dir");
/// let input = workspace.write_fasta("reads.fasta").expect("write input");
/// assert!(input.is_file());
/// assert!(!workspace.out_dir().exists());
/// ```
pub struct SweepWorkspace {
    dir: TempDir,
}

impl SweepWorkspace {
    /// Creates an empty workspace.
    ///
    /// # Errors
    /// Returns an error when the temporary directory cannot be created.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    /// Returns the workspace root.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Returns the conventional output root. It is not created.
    #[must_use]
    pub fn out_dir(&self) -> PathBuf {
        self.path().join("out")
    }

    /// Writes [`SAMPLE_FASTA`] to `name` below the workspace root, creating
    /// intermediate directories.
    ///
    /// # Errors
    /// Returns an error when the file or its parents cannot be written.
    pub fn write_fasta(&self, name: &str) -> io::Result<PathBuf> {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, SAMPLE_FASTA)?;
        Ok(path)
    }
}

/// Returns the sorted names of the directories directly below `path`.
///
/// # Errors
/// Returns an error when `path` cannot be listed.
pub fn directory_names(path: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}
