//! The driver-facing grid engine.

use std::fmt;

use glam::Vec2;
use tessel_core::{
    CoordinateCodec, EntityId, GridCoord, GridListener, OccupantId, PositionSource, Signature,
    SurfaceSampler, TickId,
};
use tessel_index::{BuildError, OccupancyIndex, ValidityError, ValiditySet};
use tessel_pool::{ObjectPool, PoolStats};
use tessel_space::{RingEnumerator, Topology};
use tracing::{debug, info, trace, warn};

use crate::config::{ConfigError, GridConfig};
use crate::registry::{Occupant, OccupantError, OccupantHandle, OccupantRegistry};
use crate::vacancy::{Vacancy, VacancyError, VacancyQuery, VacancySearch};

/// Outcome of one [`GridEngine::tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// The tick that just completed.
    pub tick: TickId,
    /// Tracked occupants polled.
    pub polled: usize,
    /// Occupants whose centre cell changed; one notification each.
    pub moved: usize,
    /// Occupants whose entity was off the grid; they kept their footprint.
    pub out_of_bounds: usize,
}

/// Snapshot of grid-wide counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridStats {
    /// Last completed tick.
    pub tick: TickId,
    /// Cells in the validity set, 0 if none is loaded.
    pub valid_cells: usize,
    /// Active occupants and reservations.
    pub active_occupants: usize,
    /// Cells covered by at least one occupant.
    pub occupied_cells: usize,
    /// Occupant pool counters.
    pub occupant_pool: PoolStats,
    /// Bucket pool counters.
    pub bucket_pool: PoolStats,
    /// Scratch buffer pool counters.
    pub scratch_pool: PoolStats,
}

impl fmt::Display for GridStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tick {}: {} valid cells, {} occupants over {} cells",
            self.tick, self.valid_cells, self.active_occupants, self.occupied_cells
        )
    }
}

/// A bounded spatial-occupancy grid.
///
/// Owns the validity set, the occupancy index, every occupant and all the
/// pools behind them. Single-threaded: every operation runs to completion
/// on the caller's thread, and [`tick`](Self::tick) takes `&mut self`, so
/// nothing can re-enter the engine from a listener.
///
/// # Examples
///
/// ```
/// use tessel_core::{EntityId, Vec2};
/// use tessel_engine::{GridConfig, GridEngine, VacancyQuery};
///
/// let mut grid = GridEngine::new(GridConfig {
///     cell_size: 1.0,
///     grid_row_max: 64,
///     ..GridConfig::default()
/// })
/// .unwrap();
/// grid.rebuild_validity(&|p: Vec2, _tol: f32| p.length() < 10.0).unwrap();
///
/// let agent = grid.create_occupant(EntityId(1), Vec2::ZERO, 1).unwrap();
/// assert!(grid.is_occupied(Vec2::ZERO, &[]));
///
/// let spot = grid.find_closest_vacant(&VacancyQuery::new(Vec2::ZERO)).unwrap();
/// assert_eq!(spot.magnitude, 2);
///
/// grid.destroy(agent).unwrap();
/// assert!(grid.destroy(agent).is_err());
/// ```
pub struct GridEngine {
    config: GridConfig,
    rings: RingEnumerator,
    validity: Option<ValiditySet>,
    occupancy: OccupancyIndex,
    registry: OccupantRegistry,
    scratch: ObjectPool<Vec<Signature>>,
    tracked: Vec<(OccupantHandle, EntityId, Signature)>,
    tick: TickId,
}

impl GridEngine {
    /// Validate `config` and create an empty grid.
    pub fn new(config: GridConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let codec = config.codec()?;
        Ok(Self {
            rings: RingEnumerator::new(codec, config.topology),
            config,
            validity: None,
            occupancy: OccupancyIndex::new(),
            registry: OccupantRegistry::new(),
            scratch: ObjectPool::with_reset(Vec::new, Vec::clear),
            tracked: Vec::new(),
            tick: TickId(0),
        })
    }

    /// The configuration this grid was built from.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// The coordinate codec.
    pub fn codec(&self) -> &CoordinateCodec {
        self.rings.codec()
    }

    /// The grid topology.
    pub fn topology(&self) -> Topology {
        self.rings.topology()
    }

    /// Ring enumerator for this grid.
    pub fn rings(&self) -> &RingEnumerator {
        &self.rings
    }

    /// Last completed tick.
    pub fn current_tick(&self) -> TickId {
        self.tick
    }

    // ── Validity ───────────────────────────────────────────────────

    /// Flood-fill the validity set from the grid origin.
    ///
    /// Returns the number of valid cells. On failure the previous validity
    /// set is kept.
    pub fn rebuild_validity<S>(&mut self, sampler: &S) -> Result<usize, BuildError>
    where
        S: SurfaceSampler + ?Sized,
    {
        self.rebuild_validity_from(GridCoord::ORIGIN, sampler)
    }

    /// Flood-fill the validity set from `origin`.
    pub fn rebuild_validity_from<S>(
        &mut self,
        origin: GridCoord,
        sampler: &S,
    ) -> Result<usize, BuildError>
    where
        S: SurfaceSampler + ?Sized,
    {
        let set = ValiditySet::build(origin, sampler, &self.rings, &self.config.build_options())?;
        let len = set.len();
        self.validity = Some(set);
        Ok(len)
    }

    /// Install a persisted validity set instead of flood-filling.
    pub fn load_validity(&mut self, set: ValiditySet) -> Result<(), ValidityError> {
        set.check_domain(self.rings.codec())?;
        info!(valid_cells = set.len(), "validity set loaded");
        self.validity = Some(set);
        Ok(())
    }

    /// The current validity set, if one has been built or loaded.
    pub fn validity(&self) -> Option<&ValiditySet> {
        self.validity.as_ref()
    }

    /// Whether the cell containing `position` is valid.
    ///
    /// Always `false` before a validity set exists.
    pub fn is_valid(&self, position: Vec2) -> bool {
        self.signature_at(position)
            .is_some_and(|sig| self.is_valid_signature(sig))
    }

    /// Whether `coord` is a valid cell.
    pub fn is_valid_coord(&self, coord: GridCoord) -> bool {
        self.codec()
            .try_encode(coord)
            .is_some_and(|sig| self.is_valid_signature(sig))
    }

    fn is_valid_signature(&self, sig: Signature) -> bool {
        self.validity.as_ref().is_some_and(|v| v.contains(sig))
    }

    // ── Transforms ─────────────────────────────────────────────────

    /// The in-domain cell containing `position`.
    pub fn position_to_grid(&self, position: Vec2) -> Option<GridCoord> {
        self.topology()
            .world_to_grid(position, self.config.cell_size)
            .filter(|&c| self.codec().contains(c))
    }

    /// World-space centre of `coord`.
    pub fn grid_to_position(&self, coord: GridCoord) -> Vec2 {
        self.topology().grid_to_world(coord, self.config.cell_size)
    }

    /// Centre of the cell containing `position`.
    pub fn snap_position(&self, position: Vec2) -> Option<Vec2> {
        self.position_to_grid(position)
            .map(|c| self.grid_to_position(c))
    }

    /// Signature of the cell containing `position`.
    pub fn signature_at(&self, position: Vec2) -> Option<Signature> {
        self.position_to_grid(position)
            .and_then(|c| self.codec().try_encode(c))
    }

    /// Centres of every valid cell, in signature order.
    pub fn world_positions(&self) -> Vec<Vec2> {
        let Some(validity) = &self.validity else {
            return Vec::new();
        };
        validity
            .iter()
            .filter_map(|sig| self.codec().decode(sig).ok())
            .map(|c| self.grid_to_position(c))
            .collect()
    }

    /// Centres of the in-domain cells adjacent to the cell at `position`.
    pub fn neighbour_positions(&self, position: Vec2) -> Vec<Vec2> {
        let Some(coord) = self.position_to_grid(position) else {
            return Vec::new();
        };
        self.rings
            .neighbour_coords(coord)
            .into_iter()
            .filter(|&c| self.codec().contains(c))
            .map(|c| self.grid_to_position(c))
            .collect()
    }

    // ── Occupancy ──────────────────────────────────────────────────

    /// Whether an occupant not listed in `excluding` covers the cell at
    /// `position`. Positions off the grid are never occupied.
    pub fn is_occupied(&self, position: Vec2, excluding: &[OccupantId]) -> bool {
        self.signature_at(position)
            .is_some_and(|sig| self.occupancy.is_occupied(sig, excluding))
    }

    /// Whether an occupant not listed in `excluding` covers `coord`.
    pub fn is_occupied_coord(&self, coord: GridCoord, excluding: &[OccupantId]) -> bool {
        self.codec()
            .try_encode(coord)
            .is_some_and(|sig| self.occupancy.is_occupied(sig, excluding))
    }

    /// Entities tracked by the occupants covering the cell at `position`.
    ///
    /// Reservations have no entity and are left out.
    pub fn occupants_at(&self, position: Vec2) -> Vec<EntityId> {
        let Some(sig) = self.signature_at(position) else {
            return Vec::new();
        };
        self.occupancy
            .occupants(sig)
            .iter()
            .filter_map(|&id| self.registry.entity_of(id))
            .collect()
    }

    // ── Lifecycle ──────────────────────────────────────────────────

    /// Start tracking `entity` with a footprint of `magnitude` rings around
    /// the cell at `position`.
    pub fn create_occupant(
        &mut self,
        entity: EntityId,
        position: Vec2,
        magnitude: u32,
    ) -> Result<OccupantHandle, OccupantError> {
        self.create(position, magnitude, Some(entity))
    }

    /// Reserve the single cell at `position`.
    pub fn create_reservation(&mut self, position: Vec2) -> Result<OccupantHandle, OccupantError> {
        self.create(position, 0, None)
    }

    fn create(
        &mut self,
        position: Vec2,
        magnitude: u32,
        entity: Option<EntityId>,
    ) -> Result<OccupantHandle, OccupantError> {
        let center = self
            .signature_at(position)
            .ok_or(OccupantError::PositionOutOfBounds { position })?;
        self.registry
            .create(center, magnitude, entity, &self.rings, &mut self.occupancy)
    }

    /// Release an occupant or reservation.
    ///
    /// A handle that was already destroyed is rejected with
    /// [`OccupantError::StaleHandle`].
    pub fn destroy(&mut self, handle: OccupantHandle) -> Result<(), OccupantError> {
        self.registry.destroy(handle, &mut self.occupancy)
    }

    /// Read-only view of an active occupant.
    pub fn occupant(&self, handle: OccupantHandle) -> Option<&Occupant> {
        self.registry.get(handle)
    }

    /// Number of active occupants and reservations.
    pub fn occupant_count(&self) -> usize {
        self.registry.len()
    }

    // ── Tick ───────────────────────────────────────────────────────

    /// Advance one step: poll every tracked occupant and move those whose
    /// centre cell changed.
    ///
    /// `listener` is called synchronously, in slot order, once for each
    /// occupant that moved. An entity whose position is off the grid keeps
    /// its previous footprint and is counted in
    /// [`TickReport::out_of_bounds`].
    pub fn tick<P, L>(&mut self, source: &P, listener: &mut L) -> TickReport
    where
        P: PositionSource + ?Sized,
        L: GridListener + ?Sized,
    {
        self.tick = TickId(self.tick.0 + 1);
        let mut report = TickReport {
            tick: self.tick,
            ..TickReport::default()
        };

        let mut tracked = std::mem::take(&mut self.tracked);
        tracked.clear();
        tracked.extend(self.registry.tracked());

        for &(handle, entity, current) in &tracked {
            report.polled += 1;
            let position = source.position(entity);
            let Some(sig) = self.signature_at(position) else {
                report.out_of_bounds += 1;
                warn!(%entity, %position, tick = %self.tick, "tracked entity is off the grid");
                continue;
            };
            if sig == current {
                continue;
            }
            match self
                .registry
                .refresh(handle, sig, &self.rings, &mut self.occupancy)
            {
                Ok(true) => {
                    report.moved += 1;
                    trace!(%entity, from = %current, to = %sig, "occupant moved");
                    listener.on_grid_changed(entity);
                }
                Ok(false) => {}
                Err(e) => warn!(%entity, error = %e, "occupant refresh failed"),
            }
        }
        self.tracked = tracked;
        report
    }

    // ── Queries ────────────────────────────────────────────────────

    /// Nearest free cell to the query target.
    ///
    /// Bounded by the query's `max_magnitude`, or
    /// [`GridConfig::max_vacancy_magnitude`] when the query sets none.
    pub fn find_closest_vacant(&mut self, query: &VacancyQuery<'_>) -> Result<Vacancy, VacancyError> {
        let mut ring = self.scratch.scoped();
        VacancySearch::new(
            &self.rings,
            &self.occupancy,
            self.validity.as_ref(),
            self.config.cell_size,
        )
        .find(query, self.config.max_vacancy_magnitude, &mut *ring)
    }

    /// Ring distance between the cells at `a` and `b`, capped at `max`.
    ///
    /// Positions need not lie on the grid. `None` if either is not finite.
    pub fn grid_distance(&self, a: Vec2, b: Vec2, max: u32) -> Option<u32> {
        let topology = self.topology();
        let ca = topology.world_to_grid(a, self.config.cell_size)?;
        let cb = topology.world_to_grid(b, self.config.cell_size)?;
        Some(topology.distance(ca, cb).min(max))
    }

    /// Ring distance between the centres of two occupants, capped at `max`.
    pub fn distance_between_occupants(
        &self,
        a: OccupantHandle,
        b: OccupantHandle,
        max: u32,
    ) -> Result<u32, OccupantError> {
        let center_of = |handle| {
            self.registry
                .get(handle)
                .ok_or(OccupantError::StaleHandle { handle })
                .and_then(|occ| {
                    self.codec()
                        .decode(occ.center())
                        .map_err(OccupantError::from)
                })
        };
        let (ca, cb) = (center_of(a)?, center_of(b)?);
        Ok(self.topology().distance(ca, cb).min(max))
    }

    // ── Stats ──────────────────────────────────────────────────────

    /// Snapshot of grid-wide counters.
    pub fn stats(&self) -> GridStats {
        GridStats {
            tick: self.tick,
            valid_cells: self.validity.as_ref().map_or(0, ValiditySet::len),
            active_occupants: self.registry.len(),
            occupied_cells: self.occupancy.bucket_count(),
            occupant_pool: self.registry.pool_stats(),
            bucket_pool: self.occupancy.pool_stats(),
            scratch_pool: self.scratch.stats(),
        }
    }

    /// Emit [`stats`](Self::stats) and every pool's counters at `debug`
    /// level.
    pub fn log_stats(&self) {
        let stats = self.stats();
        debug!(%stats, "grid stats");
        self.registry.log_stats();
        debug!(pool = "buckets", stats = %stats.bucket_pool, "pool stats");
        self.scratch.log_stats("scratch");
    }
}

impl fmt::Debug for GridEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridEngine")
            .field("config", &self.config)
            .field("tick", &self.tick)
            .field("valid_cells", &self.validity.as_ref().map(ValiditySet::len))
            .field("registry", &self.registry)
            .field("occupancy", &self.occupancy)
            .finish_non_exhaustive()
    }
}
