//! Bijective packing of grid coordinates into [`Signature`]s.

use crate::error::CodecError;
use crate::id::{GridCoord, Signature};

/// Packs `(x, y)` pairs in `[-half, half)²` into a single `u32`.
///
/// `signature = (x + half) + ((y + half) << exponent)` with
/// `half = grid_row_max / 2` and `exponent = log2(grid_row_max)`. The
/// power-of-two side length is a hard precondition: it is what makes the
/// shift packing bijective, so construction rejects anything else.
///
/// # Examples
///
/// ```
/// use tessel_core::{CoordinateCodec, GridCoord};
///
/// let codec = CoordinateCodec::new(8).unwrap();
/// let sig = codec.encode(GridCoord::new(0, 0)).unwrap();
/// assert_eq!(sig.0, 4 + (4 << 3));
/// assert_eq!(codec.decode(sig).unwrap(), GridCoord::new(0, 0));
///
/// // Out-of-domain coordinates are rejected, never wrapped.
/// assert!(codec.encode(GridCoord::new(4, 0)).is_err());
/// assert!(CoordinateCodec::new(12).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoordinateCodec {
    grid_row_max: u32,
    half: i32,
    exponent: u32,
}

impl CoordinateCodec {
    /// Smallest supported side length.
    pub const MIN_ROW_MAX: u32 = 2;
    /// Largest supported side length: `MAX_ROW_MAX²` signatures fit in `u32`.
    pub const MAX_ROW_MAX: u32 = 1 << 16;

    /// Create a codec for a grid `grid_row_max` cells on a side.
    ///
    /// Returns `Err(CodecError::NotPowerOfTwo)` if `grid_row_max` is not a
    /// power of two, or `Err(CodecError::RowMaxOutOfRange)` if it lies
    /// outside `[MIN_ROW_MAX, MAX_ROW_MAX]`.
    pub fn new(grid_row_max: u32) -> Result<Self, CodecError> {
        if !grid_row_max.is_power_of_two() {
            return Err(CodecError::NotPowerOfTwo {
                value: grid_row_max,
            });
        }
        if !(Self::MIN_ROW_MAX..=Self::MAX_ROW_MAX).contains(&grid_row_max) {
            return Err(CodecError::RowMaxOutOfRange {
                value: grid_row_max,
                min: Self::MIN_ROW_MAX,
                max: Self::MAX_ROW_MAX,
            });
        }
        Ok(Self {
            grid_row_max,
            half: (grid_row_max / 2) as i32,
            exponent: grid_row_max.trailing_zeros(),
        })
    }

    /// Side length of the addressable grid in cells.
    pub fn grid_row_max(&self) -> u32 {
        self.grid_row_max
    }

    /// Half the side length; the domain of each axis is `[-half, half)`.
    pub fn half(&self) -> i32 {
        self.half
    }

    /// `log2(grid_row_max)`.
    pub fn exponent(&self) -> u32 {
        self.exponent
    }

    /// Number of distinct signatures (`grid_row_max²`).
    pub fn capacity(&self) -> u64 {
        u64::from(self.grid_row_max) * u64::from(self.grid_row_max)
    }

    /// Whether `coord` lies inside the encodable domain.
    #[inline]
    pub fn contains(&self, coord: GridCoord) -> bool {
        (-self.half..self.half).contains(&coord.x) && (-self.half..self.half).contains(&coord.y)
    }

    /// Whether `sig` could have been produced by this codec.
    #[inline]
    pub fn contains_signature(&self, sig: Signature) -> bool {
        u64::from(sig.0) < self.capacity()
    }

    /// Pack a coordinate.
    ///
    /// Returns `Err(CodecError::CoordOutOfBounds)` for coordinates outside
    /// `[-half, half)²`.
    #[inline]
    pub fn encode(&self, coord: GridCoord) -> Result<Signature, CodecError> {
        self.try_encode(coord)
            .ok_or(CodecError::CoordOutOfBounds {
                coord,
                half: self.half,
            })
    }

    /// Pack a coordinate, returning `None` outside the domain.
    ///
    /// Used on hot paths (ring walks, flood fill) where leaving the domain
    /// is expected and simply means "no such cell".
    #[inline]
    pub fn try_encode(&self, coord: GridCoord) -> Option<Signature> {
        if !self.contains(coord) {
            return None;
        }
        let px = (coord.x + self.half) as u32;
        let py = (coord.y + self.half) as u32;
        Some(Signature(px + (py << self.exponent)))
    }

    /// Unpack a signature.
    ///
    /// Returns `Err(CodecError::SignatureOutOfBounds)` if `sig` is not below
    /// [`capacity`](Self::capacity).
    #[inline]
    pub fn decode(&self, sig: Signature) -> Result<GridCoord, CodecError> {
        if !self.contains_signature(sig) {
            return Err(CodecError::SignatureOutOfBounds {
                signature: sig,
                capacity: self.capacity(),
            });
        }
        let mask = self.grid_row_max - 1;
        let x = (sig.0 & mask) as i32 - self.half;
        let y = ((sig.0 >> self.exponent) & mask) as i32 - self.half;
        Ok(GridCoord { x, y })
    }
}
