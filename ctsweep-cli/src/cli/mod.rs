//! Command-line interface for sweeping clustering thresholds.
//!
//! `simple` sweeps one FASTA file; `multi` sweeps every file matched by a glob
//! pattern, one output directory per input.

mod commands;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, MultiArgs, SimpleArgs, SweepArgs, VSEARCH_ENV,
    render_summary, run_cli,
};

#[cfg(test)]
mod test_helpers;
