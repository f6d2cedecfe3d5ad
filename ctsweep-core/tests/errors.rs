//! Stable error codes and messages for [`SweepError`].

use std::io;
use std::path::PathBuf;

use ctsweep_core::{SweepError, SweepErrorCode};
use rstest::rstest;

fn pattern_error() -> glob::PatternError {
    match glob::Pattern::new("[") {
        Ok(_) => panic!("unclosed character class must not compile"),
        Err(err) => err,
    }
}

#[rstest]
#[case(
    SweepError::InputNotFound { path: PathBuf::from("reads.fasta") },
    SweepErrorCode::InputNotFound,
    "SWEEP_INPUT_NOT_FOUND",
)]
#[case(
    SweepError::CreateDir {
        path: PathBuf::from("out"),
        source: io::Error::from(io::ErrorKind::PermissionDenied),
    },
    SweepErrorCode::CreateDir,
    "SWEEP_CREATE_DIR",
)]
#[case(
    SweepError::InvalidPattern { pattern: "[".into(), source: pattern_error() },
    SweepErrorCode::InvalidPattern,
    "SWEEP_INVALID_PATTERN",
)]
#[case(
    SweepError::NonFiniteThreshold { value: f64::NAN },
    SweepErrorCode::NonFiniteThreshold,
    "SWEEP_NON_FINITE_THRESHOLD",
)]
fn returns_expected_sweep_code(
    #[case] error: SweepError,
    #[case] expected: SweepErrorCode,
    #[case] raw: &str,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), raw);
    assert_eq!(expected.to_string(), raw);
}

#[rstest]
fn input_not_found_names_the_path() {
    let err = SweepError::InputNotFound {
        path: PathBuf::from("missing.fasta"),
    };
    assert_eq!(
        err.to_string(),
        "file `missing.fasta` does not exist or is a directory"
    );
}
