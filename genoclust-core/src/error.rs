//! Error types for the genoclust core library.
//!
//! Record-level failures ([`RecordError`]) are collected by the driver and
//! never halt a run. Run-level failures ([`ClusteringError`]) abort the run
//! and no partial assignment is returned alongside them.

use std::{fmt, io, sync::Arc};

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

pub(crate) use define_error_codes;

/// Reason a single distance record could not be turned into an edge.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum RecordError {
    /// The record had fewer than the three mandatory tab-separated fields.
    #[error("too few fields: expected at least 3, found {found}")]
    TooFewFields {
        /// Number of tab-separated fields present on the line.
        found: usize,
    },
    /// The distance column was not a finite floating-point number.
    #[error("bad distance `{token}`")]
    BadDistance {
        /// Raw distance token as it appeared in the record.
        token: String,
    },
    /// A genome token was empty once its path and extension were removed.
    #[error("genome token `{token}` has no identifier after canonicalisation")]
    EmptyGenomeId {
        /// Raw genome token as it appeared in the record.
        token: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`RecordError`] variants.
    enum RecordErrorCode for RecordError {
        /// The record had fewer than three fields.
        TooFewFields => TooFewFields { .. } => "RECORD_TOO_FEW_FIELDS",
        /// The distance column was not a finite number.
        BadDistance => BadDistance { .. } => "RECORD_BAD_DISTANCE",
        /// A genome token canonicalised to an empty identifier.
        EmptyGenomeId => EmptyGenomeId { .. } => "RECORD_EMPTY_GENOME_ID",
    }
}

/// Error type produced when configuring or running a clustering pass.
#[non_exhaustive]
#[derive(Clone, Debug, Error)]
pub enum ClusteringError {
    /// The merge threshold must be a finite, non-negative distance.
    #[error("threshold must be a finite, non-negative distance (got {got})")]
    InvalidThreshold {
        /// The rejected threshold.
        got: f64,
    },
    /// Reading the distance stream failed; the run is abandoned.
    #[error("failed to read distance record at line {line}: {source}")]
    Read {
        /// One-based line number that could not be read.
        line: u64,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },
    /// The number of clusters or a cluster's size does not fit the 32-bit
    /// identifiers exposed by [`crate::ClusterAssignment`].
    #[error("{clusters} clusters exceed the 32-bit cluster identifier range")]
    CapacityExceeded {
        /// Number of clusters (or members) that overflowed.
        clusters: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`ClusteringError`] variants.
    enum ClusteringErrorCode for ClusteringError {
        /// The merge threshold was rejected.
        InvalidThreshold => InvalidThreshold { .. } => "GENOCLUST_INVALID_THRESHOLD",
        /// Reading the distance stream failed.
        Read => Read { .. } => "GENOCLUST_READ_FAILURE",
        /// Cluster identifiers overflowed.
        CapacityExceeded => CapacityExceeded { .. } => "GENOCLUST_CAPACITY_EXCEEDED",
    }
}

impl PartialEq for ClusteringError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidThreshold { got: left }, Self::InvalidThreshold { got: right }) => {
                left.to_bits() == right.to_bits()
            }
            (
                Self::Read {
                    line: left_line,
                    source: left_source,
                },
                Self::Read {
                    line: right_line,
                    source: right_source,
                },
            ) => left_line == right_line && left_source.kind() == right_source.kind(),
            (
                Self::CapacityExceeded { clusters: left },
                Self::CapacityExceeded { clusters: right },
            ) => left == right,
            _ => false,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, ClusteringError>;
