//! Support library for the ctsweep CLI binary.
//!
//! Re-exports the CLI and logging modules so integration tests can drive the
//! command pipeline without forking a subprocess.

pub mod cli;
pub mod logging;
