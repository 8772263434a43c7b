//! Test utilities for Tessel development.
//!
//! Deterministic [`SurfaceSampler`]s describing simple terrain shapes, plus
//! position sources and listeners for driving `tick()` in tests (see
//! [`fixtures`]).

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::cell::Cell;

use glam::Vec2;
use tessel_core::SurfaceSampler;

pub use fixtures::{RandomWalk, RecordingListener, ScriptedPositions};

/// Walkable disk of `radius` world units around `center`.
#[derive(Clone, Copy, Debug)]
pub struct DiskSampler {
    pub center: Vec2,
    pub radius: f32,
}

impl DiskSampler {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Disk centred on the world origin.
    pub fn at_origin(radius: f32) -> Self {
        Self::new(Vec2::ZERO, radius)
    }
}

impl SurfaceSampler for DiskSampler {
    fn is_traversable(&self, position: Vec2, _tolerance: f32) -> bool {
        position.distance(self.center) <= self.radius
    }
}

/// Walkable axis-aligned rectangle, inclusive of its edges.
#[derive(Clone, Copy, Debug)]
pub struct RectSampler {
    pub min: Vec2,
    pub max: Vec2,
}

impl RectSampler {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }
}

impl SurfaceSampler for RectSampler {
    fn is_traversable(&self, position: Vec2, _tolerance: f32) -> bool {
        position.cmpge(self.min).all() && position.cmple(self.max).all()
    }
}

/// Accepts every position.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenSampler;

impl SurfaceSampler for OpenSampler {
    fn is_traversable(&self, _position: Vec2, _tolerance: f32) -> bool {
        true
    }
}

/// Wraps another sampler and counts how often it is asked.
#[derive(Debug)]
pub struct CountingSampler<S> {
    inner: S,
    calls: Cell<usize>,
}

impl<S: SurfaceSampler> CountingSampler<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
        }
    }

    /// Number of queries so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl<S: SurfaceSampler> SurfaceSampler for CountingSampler<S> {
    fn is_traversable(&self, position: Vec2, tolerance: f32) -> bool {
        self.calls.set(self.calls.get() + 1);
        self.inner.is_traversable(position, tolerance)
    }
}
