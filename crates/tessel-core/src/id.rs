//! Strongly-typed identifiers and the [`GridCoord`] pair.

use std::fmt;

/// Integer grid coordinate.
///
/// The meaning of the axes depends on the topology: cartesian `(column, row)`
/// for square grids, axial `(q, r)` for hex grids.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCoord {
    /// First axis (column / `q`).
    pub x: i32,
    /// Second axis (row / `r`).
    pub y: i32,
}

impl GridCoord {
    /// The grid origin `(0, 0)`.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Create a coordinate from its two components.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise offset.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

impl From<(i32, i32)> for GridCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Packed integer encoding of a [`GridCoord`].
///
/// Produced by [`CoordinateCodec::encode`](crate::CoordinateCodec::encode).
/// Signatures from codecs with different `grid_row_max` are not comparable.
/// Ordering is the packed integer ordering, which is what the validity set
/// binary-searches on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Signature(pub u32);

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Signature {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies one logical occupant lease.
///
/// Issued by an engine-scoped monotonic counter. A pooled occupant that is
/// recycled for a new lease receives a fresh ID, so an `OccupantId` is never
/// reused within one engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OccupantId(pub u64);

impl fmt::Display for OccupantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for OccupantId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Opaque caller-side handle for a tracked entity.
///
/// The grid never dereferences it; it is only handed back to the
/// [`PositionSource`](crate::PositionSource) and
/// [`GridListener`](crate::GridListener).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Monotonically increasing tick counter.
///
/// Incremented each time the driver calls `tick()`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
