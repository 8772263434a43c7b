//! Error types for coordinate packing.

use std::error::Error;
use std::fmt;

use crate::id::{GridCoord, Signature};

/// Errors from [`CoordinateCodec`](crate::CoordinateCodec) construction or use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodecError {
    /// `grid_row_max` is not a power of two; shift packing would not be
    /// bijective.
    NotPowerOfTwo {
        /// The rejected side length.
        value: u32,
    },
    /// `grid_row_max` is a power of two but outside the supported range.
    RowMaxOutOfRange {
        /// The rejected side length.
        value: u32,
        /// Smallest supported side length.
        min: u32,
        /// Largest supported side length.
        max: u32,
    },
    /// A coordinate lies outside `[-half, half)` on some axis.
    CoordOutOfBounds {
        /// The offending coordinate.
        coord: GridCoord,
        /// Half the grid side length.
        half: i32,
    },
    /// A signature was not produced by a codec of this size.
    SignatureOutOfBounds {
        /// The offending signature.
        signature: Signature,
        /// Number of valid signatures.
        capacity: u64,
    },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPowerOfTwo { value } => {
                write!(f, "grid_row_max {value} is not a power of two")
            }
            Self::RowMaxOutOfRange { value, min, max } => {
                write!(f, "grid_row_max {value} outside supported range [{min}, {max}]")
            }
            Self::CoordOutOfBounds { coord, half } => {
                write!(f, "coordinate {coord} out of bounds: both axes must be in [{}, {half})", -half)
            }
            Self::SignatureOutOfBounds {
                signature,
                capacity,
            } => {
                write!(f, "signature {signature} out of bounds: capacity {capacity}")
            }
        }
    }
}

impl Error for CodecError {}
