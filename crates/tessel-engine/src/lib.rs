//! Tick-driven spatial-occupancy engine for Tessel grids.
//!
//! [`GridEngine`] ties the pieces together: it maps world positions onto
//! the grid, owns the validity set and occupancy index, manages occupant
//! lifecycles through opaque [`OccupantHandle`]s, and answers vacancy
//! queries. The caller drives it by invoking [`GridEngine::tick`] once per
//! step with a [`PositionSource`](tessel_core::PositionSource) and a
//! [`GridListener`](tessel_core::GridListener).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod grid;
pub mod registry;
pub mod vacancy;

pub use config::{ConfigError, GridConfig};
pub use grid::{GridEngine, GridStats, TickReport};
pub use registry::{Occupant, OccupantError, OccupantHandle, OccupantRegistry};
pub use vacancy::{Vacancy, VacancyError, VacancyQuery, VacancySearch};
