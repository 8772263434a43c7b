//! Interfaces to the grid's external collaborators.
//!
//! The grid holds no reference to any scene or rendering object. Terrain
//! validity, entity positions and change notifications are all supplied by
//! the caller through these traits. Closures implement them directly, which
//! keeps tests and small drivers short.

use glam::Vec2;

use crate::id::EntityId;

/// Terrain oracle consulted while building the validity set.
pub trait SurfaceSampler {
    /// Whether `position` lies on traversable terrain, allowing the sample to
    /// snap up to `tolerance` world units.
    fn is_traversable(&self, position: Vec2, tolerance: f32) -> bool;
}

impl<F> SurfaceSampler for F
where
    F: Fn(Vec2, f32) -> bool,
{
    fn is_traversable(&self, position: Vec2, tolerance: f32) -> bool {
        self(position, tolerance)
    }
}

/// Supplies the current world position of tracked entities.
///
/// Polled once per tick for every occupant that tracks an entity.
pub trait PositionSource {
    /// Current world position of `entity`.
    fn position(&self, entity: EntityId) -> Vec2;
}

impl<F> PositionSource for F
where
    F: Fn(EntityId) -> Vec2,
{
    fn position(&self, entity: EntityId) -> Vec2 {
        self(entity)
    }
}

/// Receives grid-changed notifications.
///
/// Called synchronously from `tick()` when a tracked occupant's centre cell
/// changes. Not cancellable.
pub trait GridListener {
    /// `entity` moved into a different cell.
    fn on_grid_changed(&mut self, entity: EntityId);
}

impl<F> GridListener for F
where
    F: FnMut(EntityId),
{
    fn on_grid_changed(&mut self, entity: EntityId) {
        self(entity)
    }
}

/// Listener that drops every notification.
impl GridListener for () {
    fn on_grid_changed(&mut self, _entity: EntityId) {}
}
