//! ctsweep core library.
//!
//! Runs an external sequence-clustering program once per (input file,
//! similarity threshold) pair and lays the outputs out as one directory per
//! threshold label, optionally nested under one directory per input.

mod error;
mod runner;
mod sweep;
mod template;
mod threshold;

pub use crate::{
    error::{Result, SweepError, SweepErrorCode},
    runner::{CommandRunner, InvocationOutput, InvocationStatus, ProcessRunner},
    sweep::{
        Collision, DEFAULT_THREADS, InvocationOutcome, InvocationRequest, MultiRequest,
        SweepReport, Sweeper,
    },
    template::{
        DEFAULT_EXECUTABLE, InvocationTemplate, InvocationTemplateBuilder, OutputNames,
        OutputPaths,
    },
    threshold::{Threshold, ThresholdLabel},
};
