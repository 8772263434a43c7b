//! Cell indexes for Tessel grids.
//!
//! - [`ValiditySet`]: which cells are traversable, discovered by a
//!   breadth-first flood fill over a [`SurfaceSampler`](tessel_core::SurfaceSampler)
//!   or loaded from a persisted signature list.
//! - [`OccupancyIndex`]: which occupants cover which cells, with pooled
//!   buckets.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod occupancy;
pub mod validity;

pub use error::{BuildError, ValidityError};
pub use occupancy::{Bucket, OccupancyIndex};
pub use validity::{BuildOptions, ValiditySet};
