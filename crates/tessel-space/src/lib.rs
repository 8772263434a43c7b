//! Grid topologies and neighbourhood enumeration for Tessel grids.
//!
//! # Topologies
//!
//! - [`Topology::Hex`]: pointy-top hexagons in axial `(q, r)` coordinates,
//!   six neighbours per cell.
//! - [`Topology::Square`]: square cells in cartesian coordinates,
//!   4-connected adjacency with Chebyshev rings.
//!
//! # Rings
//!
//! [`RingEnumerator`] walks the cells at an exact ring distance from a
//! centre, or the whole footprint (rings `0..=m`) without duplicates, into
//! caller-owned buffers.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod ring;
pub mod topology;

#[cfg(test)]
pub(crate) mod compliance;

pub use ring::RingEnumerator;
pub use topology::{Topology, HEX_OFFSETS, SQUARE_OFFSETS};
