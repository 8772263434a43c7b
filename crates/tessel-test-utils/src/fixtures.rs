//! Position sources and listeners for driving `tick()`.
//!
//! - [`ScriptedPositions`]: positions set explicitly by the test.
//! - [`RandomWalk`]: seeded random walkers inside a disk.
//! - [`RecordingListener`]: records every grid-changed notification.

use std::collections::HashMap;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tessel_core::{EntityId, GridListener, PositionSource};

/// Positions set by hand.
///
/// An entity without a position reports `NaN`, which the grid treats as
/// off the grid.
#[derive(Clone, Debug, Default)]
pub struct ScriptedPositions {
    positions: HashMap<EntityId, Vec2>,
}

impl ScriptedPositions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `entity` at `position`.
    pub fn set(&mut self, entity: EntityId, position: Vec2) {
        self.positions.insert(entity, position);
    }

    /// Forget `entity`'s position.
    pub fn remove(&mut self, entity: EntityId) {
        self.positions.remove(&entity);
    }
}

impl PositionSource for ScriptedPositions {
    fn position(&self, entity: EntityId) -> Vec2 {
        self.positions.get(&entity).copied().unwrap_or(Vec2::NAN)
    }
}

/// Entities taking random steps inside a disk around the origin.
///
/// Seeded, so a walk replays identically for the same seed.
#[derive(Clone, Debug)]
pub struct RandomWalk {
    rng: ChaCha8Rng,
    positions: Vec<Vec2>,
    step: f32,
    radius: f32,
}

impl RandomWalk {
    /// `count` walkers starting at the origin. Walker `i` is `EntityId(i)`.
    pub fn new(seed: u64, count: usize, step: f32, radius: f32) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            positions: vec![Vec2::ZERO; count],
            step,
            radius,
        }
    }

    /// Number of walkers.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Move every walker by up to `step` on each axis, staying in the disk.
    pub fn advance(&mut self) {
        for pos in &mut self.positions {
            let delta = Vec2::new(
                self.rng.gen_range(-self.step..=self.step),
                self.rng.gen_range(-self.step..=self.step),
            );
            *pos = (*pos + delta).clamp_length_max(self.radius);
        }
    }

    /// Entity IDs of all walkers.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> {
        (0..self.positions.len() as u64).map(EntityId)
    }
}

impl PositionSource for RandomWalk {
    fn position(&self, entity: EntityId) -> Vec2 {
        usize::try_from(entity.0)
            .ok()
            .and_then(|i| self.positions.get(i))
            .copied()
            .unwrap_or(Vec2::NAN)
    }
}

/// Records grid-changed notifications in arrival order.
#[derive(Clone, Debug, Default)]
pub struct RecordingListener {
    events: Vec<EntityId>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far.
    pub fn events(&self) -> &[EntityId] {
        &self.events
    }

    /// Drain the recorded notifications.
    pub fn take(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.events)
    }
}

impl GridListener for RecordingListener {
    fn on_grid_changed(&mut self, entity: EntityId) {
        self.events.push(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_positions_default_to_nan() {
        let mut source = ScriptedPositions::new();
        source.set(EntityId(1), Vec2::new(2.0, 3.0));
        assert_eq!(source.position(EntityId(1)), Vec2::new(2.0, 3.0));
        assert!(source.position(EntityId(2)).is_nan());
    }

    #[test]
    fn random_walk_is_reproducible_and_bounded() {
        let mut a = RandomWalk::new(42, 8, 0.5, 3.0);
        let mut b = RandomWalk::new(42, 8, 0.5, 3.0);
        for _ in 0..50 {
            a.advance();
            b.advance();
        }
        for e in a.entities() {
            assert_eq!(a.position(e), b.position(e));
            assert!(a.position(e).length() <= 3.0 + 1e-4);
        }
    }

    #[test]
    fn recording_listener_keeps_order() {
        let mut listener = RecordingListener::new();
        listener.on_grid_changed(EntityId(2));
        listener.on_grid_changed(EntityId(1));
        assert_eq!(listener.take(), vec![EntityId(2), EntityId(1)]);
        assert!(listener.events().is_empty());
    }
}
