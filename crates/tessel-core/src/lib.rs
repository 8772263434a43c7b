//! Core types for the Tessel occupancy grid.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! strongly-typed identifiers shared by every other crate, the
//! [`CoordinateCodec`] that packs grid coordinates into [`Signature`]s, and
//! the traits through which the grid talks to its external collaborators
//! (terrain sampler, entity positions, grid-changed notifications).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod id;
pub mod traits;

pub use codec::CoordinateCodec;
pub use error::CodecError;
pub use id::{EntityId, GridCoord, OccupantId, Signature, TickId};
pub use traits::{GridListener, PositionSource, SurfaceSampler};

/// World-space position on the ground plane (`x` east, `y` north).
pub use glam::Vec2;
