//! Error types for validity construction and loading.

use std::error::Error;
use std::fmt;

use tessel_core::{CodecError, GridCoord, Signature};

/// Errors from [`ValiditySet::build`](crate::ValiditySet::build).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildError {
    /// The flood origin could not be encoded.
    Codec(CodecError),
    /// The sampler rejected every reachable cell, starting with the origin.
    ///
    /// Treated as a setup failure: the sampler is misconfigured or the
    /// origin is not on traversable terrain.
    NoTraversableCells {
        /// The flood origin.
        origin: GridCoord,
    },
    /// The flood fill took more samples than allowed.
    SampleLimitExceeded {
        /// The configured sample limit.
        limit: usize,
    },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codec(e) => write!(f, "invalid flood origin: {e}"),
            Self::NoTraversableCells { origin } => {
                write!(f, "no traversable cells reachable from {origin}")
            }
            Self::SampleLimitExceeded { limit } => {
                write!(f, "flood fill exceeded the limit of {limit} samples")
            }
        }
    }
}

impl Error for BuildError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CodecError> for BuildError {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}

/// Errors from loading a persisted signature list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidityError {
    /// The list is not strictly ascending (unsorted or duplicated).
    NotAscending {
        /// Position of the first offending entry.
        index: usize,
        /// The entry before it.
        previous: Signature,
        /// The offending entry.
        signature: Signature,
    },
    /// A signature lies outside the domain of the grid it is loaded into.
    OutOfDomain {
        /// The offending signature.
        signature: Signature,
        /// Number of signatures the grid can address.
        capacity: u64,
    },
}

impl fmt::Display for ValidityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAscending {
                index,
                previous,
                signature,
            } => write!(
                f,
                "signature list not strictly ascending at index {index}: {signature} follows {previous}"
            ),
            Self::OutOfDomain {
                signature,
                capacity,
            } => write!(
                f,
                "signature {signature} outside grid domain of {capacity} cells"
            ),
        }
    }
}

impl Error for ValidityError {}
