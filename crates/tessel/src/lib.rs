//! Tessel: hex and square spatial-occupancy grids for swarms of moving entities.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Tessel sub-crates. For most users, adding `tessel` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use tessel::prelude::*;
//!
//! let mut grid = GridEngine::new(GridConfig {
//!     cell_size: 1.0,
//!     grid_row_max: 64,
//!     topology: Topology::Hex,
//!     ..GridConfig::default()
//! })
//! .unwrap();
//!
//! // Everything within ten units of the origin is walkable.
//! let walkable = |p: Vec2, _tolerance: f32| p.length() <= 10.0;
//! let cells = grid.rebuild_validity(&walkable).unwrap();
//! assert!(cells > 0);
//!
//! // A unit standing at the origin claims its cell and the six around it.
//! let unit = grid.create_occupant(EntityId(1), Vec2::ZERO, 1).unwrap();
//! assert!(grid.is_occupied(Vec2::ZERO, &[]));
//!
//! // The nearest free cell lies just outside that footprint.
//! let spot = grid.find_closest_vacant(&VacancyQuery::new(Vec2::ZERO)).unwrap();
//! assert_eq!(spot.magnitude, 2);
//!
//! // The unit walks east; one tick moves its footprint along.
//! let source = |_e: EntityId| Vec2::new(6.0, 0.0);
//! let mut moved = Vec::new();
//! let report = grid.tick(&source, &mut |e: EntityId| moved.push(e));
//! assert_eq!(report.moved, 1);
//! assert_eq!(moved, vec![EntityId(1)]);
//! assert!(!grid.is_occupied(Vec2::ZERO, &[]));
//!
//! grid.destroy(unit).unwrap();
//! assert_eq!(grid.stats().occupied_cells, 0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tessel-core` | Coordinates, signatures, IDs, codec, collaborator traits |
//! | [`pool`] | `tessel-pool` | `ObjectPool`, `PoolGuard`, generational `SlotTable` |
//! | [`space`] | `tessel-space` | Topologies, world transforms, ring enumeration |
//! | [`index`] | `tessel-index` | Validity set and flood-fill build, occupancy index |
//! | [`engine`] | `tessel-engine` | `GridEngine`, occupants, vacancy search, config |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types: [`types::GridCoord`], [`types::Signature`], the
/// [`types::CoordinateCodec`], and the traits through which the grid talks
/// to terrain, positions and listeners.
pub use tessel_core as types;

/// Object pooling: [`pool::ObjectPool`] with RAII [`pool::PoolGuard`]s, and
/// the generational [`pool::SlotTable`] behind occupant handles.
pub use tessel_pool as pool;

/// Grid geometry: [`space::Topology`] and the [`space::RingEnumerator`].
pub use tessel_space as space;

/// Cell sets: the flood-filled [`index::ValiditySet`] and the
/// multi-occupant [`index::OccupancyIndex`].
pub use tessel_index as index;

/// The tick-driven [`engine::GridEngine`] and its configuration.
pub use tessel_engine as engine;

/// Common imports for typical Tessel usage.
///
/// ```rust
/// use tessel::prelude::*;
/// ```
///
/// This imports the engine and its configuration, the handle and query
/// types, the collaborator traits, and the errors most callers match on.
pub mod prelude {
    // Core types and traits
    pub use tessel_core::{
        EntityId, GridCoord, GridListener, OccupantId, PositionSource, Signature,
        SurfaceSampler, TickId, Vec2,
    };

    // Errors
    pub use tessel_core::CodecError;
    pub use tessel_engine::{ConfigError, OccupantError, VacancyError};
    pub use tessel_index::{BuildError, ValidityError};

    // Space
    pub use tessel_space::Topology;

    // Index
    pub use tessel_index::ValiditySet;

    // Engine
    pub use tessel_engine::{
        GridConfig, GridEngine, GridStats, OccupantHandle, TickReport, Vacancy, VacancyQuery,
    };
}
