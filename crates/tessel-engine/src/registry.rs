//! Occupant lifecycle: pooled occupants behind generational handles.
//!
//! An occupant is **Unbound** while it sits in the pool, **Active** while a
//! handle refers to it and its footprint is recorded in the
//! [`OccupancyIndex`], and Unbound again after [`OccupantRegistry::destroy`].
//! Handles are slot+generation pairs, so a handle that outlives its occupant
//! is detected rather than aliasing whatever reuses the slot.

use std::error::Error;
use std::fmt;

use glam::Vec2;
use indexmap::IndexMap;
use tessel_core::{CodecError, EntityId, OccupantId, Signature};
use tessel_index::OccupancyIndex;
use tessel_pool::{ObjectPool, PoolStats, SlotKey, SlotTable};
use tessel_space::RingEnumerator;
use tracing::debug;

/// Opaque reference to an active occupant or reservation.
///
/// Only valid with the engine that issued it. Cross-engine use is not
/// detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OccupantHandle(SlotKey);

impl OccupantHandle {
    /// The packed slot+generation value, for logging or FFI.
    pub fn to_raw(self) -> u64 {
        self.0.to_raw()
    }
}

impl fmt::Display for OccupantHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Errors from occupant lifecycle operations.
#[derive(Clone, Debug, PartialEq)]
pub enum OccupantError {
    /// The handle was destroyed already, or never issued by this registry.
    StaleHandle {
        /// The rejected handle.
        handle: OccupantHandle,
    },
    /// The position is not finite or maps outside the grid.
    PositionOutOfBounds {
        /// The rejected position.
        position: Vec2,
    },
    /// A signature could not be decoded.
    Codec(CodecError),
}

impl fmt::Display for OccupantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleHandle { handle } => {
                write!(f, "occupant handle {handle} is stale or was already destroyed")
            }
            Self::PositionOutOfBounds { position } => {
                write!(f, "position {position} lies outside the grid")
            }
            Self::Codec(e) => write!(f, "codec: {e}"),
        }
    }
}

impl Error for OccupantError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CodecError> for OccupantError {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}

/// A footprint on the grid.
///
/// Occupants with a tracked entity follow that entity every tick.
/// Reservations (magnitude 0, no entity) hold a single cell until
/// destroyed. Callers only ever see an occupant through a shared
/// reference obtained from its handle.
#[derive(Debug)]
pub struct Occupant {
    id: OccupantId,
    entity: Option<EntityId>,
    magnitude: u32,
    center: Signature,
    footprint: Vec<Signature>,
}

impl Occupant {
    fn unbound() -> Self {
        Self {
            id: OccupantId(0),
            entity: None,
            magnitude: 0,
            center: Signature(0),
            footprint: Vec::new(),
        }
    }

    fn reset(&mut self) {
        self.entity = None;
        self.magnitude = 0;
        self.footprint.clear();
    }

    /// ID of the current lease.
    pub fn id(&self) -> OccupantId {
        self.id
    }

    /// The tracked entity, if any.
    pub fn entity(&self) -> Option<EntityId> {
        self.entity
    }

    /// Ring radius of the footprint.
    pub fn magnitude(&self) -> u32 {
        self.magnitude
    }

    /// Signature of the centre cell.
    pub fn center(&self) -> Signature {
        self.center
    }

    /// Every cell the occupant covers, innermost ring first.
    pub fn footprint(&self) -> &[Signature] {
        &self.footprint
    }

    /// Whether this is a single-cell reservation with no tracked entity.
    pub fn is_reservation(&self) -> bool {
        self.magnitude == 0 && self.entity.is_none()
    }
}

/// Owns every active occupant and the pool they are recycled through.
pub struct OccupantRegistry {
    slots: SlotTable<Occupant>,
    handles_by_id: IndexMap<OccupantId, OccupantHandle>,
    pool: ObjectPool<Occupant>,
    next_id: u64,
}

impl OccupantRegistry {
    /// Create an empty registry. IDs start at 1.
    pub fn new() -> Self {
        Self {
            slots: SlotTable::new(),
            handles_by_id: IndexMap::new(),
            pool: ObjectPool::with_reset(Occupant::unbound, Occupant::reset),
            next_id: 1,
        }
    }

    /// Activate a pooled occupant covering rings `0..=magnitude` around
    /// `center` and record its footprint in `index`.
    pub fn create(
        &mut self,
        center: Signature,
        magnitude: u32,
        entity: Option<EntityId>,
        rings: &RingEnumerator,
        index: &mut OccupancyIndex,
    ) -> Result<OccupantHandle, OccupantError> {
        let mut occupant = self.pool.acquire();
        if let Err(e) = rings.footprint_into(center, magnitude, &mut occupant.footprint) {
            self.pool.release(occupant);
            return Err(e.into());
        }
        occupant.id = OccupantId(self.next_id);
        self.next_id += 1;
        occupant.entity = entity;
        occupant.magnitude = magnitude;
        occupant.center = center;

        index.occupy(occupant.id, &occupant.footprint);
        let id = occupant.id;
        let cells = occupant.footprint.len();
        let handle = OccupantHandle(self.slots.insert(occupant));
        self.handles_by_id.insert(id, handle);
        debug!(%id, %handle, %center, magnitude, cells, "occupant created");
        Ok(handle)
    }

    /// Move an occupant's footprint to `new_center`.
    ///
    /// Returns `Ok(false)` without touching the index when the centre is
    /// unchanged, `Ok(true)` when the footprint moved.
    pub fn refresh(
        &mut self,
        handle: OccupantHandle,
        new_center: Signature,
        rings: &RingEnumerator,
        index: &mut OccupancyIndex,
    ) -> Result<bool, OccupantError> {
        let occupant = self
            .slots
            .get_mut(handle.0)
            .ok_or(OccupantError::StaleHandle { handle })?;
        if occupant.center == new_center {
            return Ok(false);
        }
        // Reject before vacating so a bad centre leaves the old footprint.
        rings.codec().decode(new_center)?;

        index.vacate(occupant.id, &occupant.footprint);
        occupant.footprint.clear();
        rings.footprint_into(new_center, occupant.magnitude, &mut occupant.footprint)?;
        index.occupy(occupant.id, &occupant.footprint);
        occupant.center = new_center;
        Ok(true)
    }

    /// Vacate an occupant's footprint and return it to the pool.
    ///
    /// Destroying a handle twice is rejected with
    /// [`OccupantError::StaleHandle`].
    pub fn destroy(
        &mut self,
        handle: OccupantHandle,
        index: &mut OccupancyIndex,
    ) -> Result<(), OccupantError> {
        let occupant = self
            .slots
            .remove(handle.0)
            .ok_or(OccupantError::StaleHandle { handle })?;
        index.vacate(occupant.id, &occupant.footprint);
        self.handles_by_id.swap_remove(&occupant.id);
        debug!(id = %occupant.id, %handle, "occupant destroyed");
        self.pool.release(occupant);
        Ok(())
    }

    /// The occupant behind `handle`, if it is still active.
    pub fn get(&self, handle: OccupantHandle) -> Option<&Occupant> {
        self.slots.get(handle.0)
    }

    /// The active occupant with lease `id`.
    pub fn by_id(&self, id: OccupantId) -> Option<&Occupant> {
        self.handles_by_id.get(&id).and_then(|&handle| self.get(handle))
    }

    /// The entity tracked by the occupant with lease `id`.
    pub fn entity_of(&self, id: OccupantId) -> Option<EntityId> {
        self.by_id(id).and_then(Occupant::entity)
    }

    /// Active occupants that track an entity, in slot order.
    pub fn tracked(&self) -> impl Iterator<Item = (OccupantHandle, EntityId, Signature)> + '_ {
        self.slots.iter().filter_map(|(key, occupant)| {
            occupant
                .entity
                .map(|entity| (OccupantHandle(key), entity, occupant.center))
        })
    }

    /// Number of active occupants and reservations.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing is active.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Counters of the occupant pool.
    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Emit the occupant pool counters at `debug` level.
    pub fn log_stats(&self) {
        self.pool.log_stats("occupants");
    }
}

impl Default for OccupantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OccupantRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OccupantRegistry")
            .field("active", &self.slots.len())
            .field("next_id", &self.next_id)
            .field("pool", &self.pool)
            .finish()
    }
}

impl Drop for OccupantRegistry {
    fn drop(&mut self) {
        for occupant in self.slots.take_all() {
            self.pool.release(occupant);
        }
    }
}
