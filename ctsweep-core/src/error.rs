//! Error types for the ctsweep core library.
//!
//! Defines the fatal error enum exposed by the public API, its stable codes,
//! and a convenient result alias.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Fatal errors raised while preparing or running a threshold sweep.
///
/// Failures of the external clustering program are deliberately absent: they
/// are captured per invocation in [`crate::InvocationOutcome`] and never abort
/// a sweep.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SweepError {
    /// The input path does not exist or is not a regular file.
    #[error("file `{}` does not exist or is a directory", path.display())]
    InputNotFound {
        /// Offending input path.
        path: PathBuf,
    },
    /// An output directory could not be created.
    #[error("failed to create directory `{}`: {source}", path.display())]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The multi-input glob pattern could not be compiled.
    #[error("invalid input pattern `{pattern}`: {source}")]
    InvalidPattern {
        /// Pattern supplied by the caller.
        pattern: String,
        /// Parse failure reported by `glob`.
        #[source]
        source: glob::PatternError,
    },
    /// A path matched by the glob pattern could not be read.
    #[error("failed to expand input pattern: {source}")]
    GlobEntry {
        /// Underlying traversal failure.
        #[source]
        source: glob::GlobError,
    },
    /// A threshold cannot be mapped to a directory label.
    #[error("threshold {value} is not finite and cannot be used as a directory label")]
    NonFiniteThreshold {
        /// The offending threshold value.
        value: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`SweepError`] variants.
    enum SweepErrorCode for SweepError {
        /// The input path does not exist or is not a regular file.
        InputNotFound => InputNotFound { .. } => "SWEEP_INPUT_NOT_FOUND",
        /// An output directory could not be created.
        CreateDir => CreateDir { .. } => "SWEEP_CREATE_DIR",
        /// The multi-input glob pattern could not be compiled.
        InvalidPattern => InvalidPattern { .. } => "SWEEP_INVALID_PATTERN",
        /// A path matched by the glob pattern could not be read.
        GlobEntry => GlobEntry { .. } => "SWEEP_GLOB_ENTRY",
        /// A threshold cannot be mapped to a directory label.
        NonFiniteThreshold => NonFiniteThreshold { .. } => "SWEEP_NON_FINITE_THRESHOLD",
    }
}

/// Convenient result alias for sweep operations.
pub type Result<T> = std::result::Result<T, SweepError>;
