//! Integration test: end-to-end grid scenarios.
//!
//! Builds small grids through the public engine API and checks the
//! occupancy, validity and vacancy behaviour a driver relies on.

use tessel_core::{EntityId, GridCoord, Vec2};
use tessel_engine::{GridConfig, GridEngine, OccupantError, VacancyError, VacancyQuery};
use tessel_index::BuildError;
use tessel_space::Topology;
use tessel_test_utils::{CountingSampler, DiskSampler, OpenSampler, RectSampler};

fn engine(grid_row_max: u32, topology: Topology) -> GridEngine {
    GridEngine::new(GridConfig {
        cell_size: 1.0,
        grid_row_max,
        topology,
        ..GridConfig::default()
    })
    .unwrap()
}

// ── Small hex grid walkthrough ──────────────────────────────────────

#[test]
fn hex_row_max_eight_walkthrough() {
    let mut grid = engine(8, Topology::Hex);
    let origin = grid.codec().encode(GridCoord::ORIGIN).unwrap();
    assert_eq!(grid.codec().decode(origin).unwrap(), GridCoord::ORIGIN);

    let handle = grid.create_occupant(EntityId(1), Vec2::ZERO, 1).unwrap();
    let occupant = grid.occupant(handle).unwrap();
    assert_eq!(occupant.footprint().len(), 7);
    assert_eq!(grid.stats().occupied_cells, 7);

    assert!(grid.is_occupied_coord(GridCoord::new(0, 0), &[]));
    assert!(grid.is_occupied_coord(GridCoord::new(1, 0), &[]));
    assert!(!grid.is_occupied_coord(GridCoord::new(2, 0), &[]));

    grid.destroy(handle).unwrap();
    for (dq, dr) in tessel_space::HEX_OFFSETS.into_iter().chain([(0, 0)]) {
        assert!(!grid.is_occupied_coord(GridCoord::new(dq, dr), &[]));
    }
    assert_eq!(grid.stats().occupied_cells, 0);
}

#[test]
fn double_destroy_is_a_stale_handle() {
    let mut grid = engine(8, Topology::Hex);
    let reservation = grid.create_reservation(Vec2::ZERO).unwrap();
    grid.destroy(reservation).unwrap();
    assert_eq!(
        grid.destroy(reservation),
        Err(OccupantError::StaleHandle {
            handle: reservation
        })
    );
}

#[test]
fn overlapping_occupants_keep_shared_cells() {
    let mut grid = engine(16, Topology::Hex);
    let a = grid.create_occupant(EntityId(1), Vec2::ZERO, 1).unwrap();
    let east = grid.grid_to_position(GridCoord::new(1, 0));
    let _b = grid.create_occupant(EntityId(2), east, 1).unwrap();

    grid.destroy(a).unwrap();
    assert!(grid.is_occupied_coord(GridCoord::new(0, 0), &[]));
    assert!(grid.is_occupied_coord(GridCoord::new(1, 0), &[]));
    assert!(!grid.is_occupied_coord(GridCoord::new(-1, 0), &[]));
}

// ── Validity builds ─────────────────────────────────────────────────

#[test]
fn disk_build_agrees_with_membership() {
    for topology in [Topology::Hex, Topology::Square] {
        let mut grid = engine(64, topology);
        let disk = DiskSampler::at_origin(9.5);
        let count = grid.rebuild_validity(&disk).unwrap();

        let half = grid.codec().half();
        let mut expected = 0;
        for y in -half..half {
            for x in -half..half {
                let coord = GridCoord::new(x, y);
                let centre = grid.grid_to_position(coord);
                let inside = centre.length() <= 9.5;
                expected += usize::from(inside);
                assert_eq!(grid.is_valid_coord(coord), inside, "{topology:?} {coord}");
                assert_eq!(grid.is_valid(centre), inside, "{topology:?} {coord}");
            }
        }
        assert_eq!(count, expected);
        assert_eq!(grid.world_positions().len(), expected);
    }
}

#[test]
fn flood_samples_each_cell_once() {
    let mut grid = engine(32, Topology::Hex);
    let sampler = CountingSampler::new(DiskSampler::at_origin(6.0));
    let valid = grid.rebuild_validity(&sampler).unwrap();

    // Accepted cells plus their rejected in-domain neighbours.
    let half = grid.codec().half();
    let mut rim = 0;
    for y in -half..half {
        for x in -half..half {
            let coord = GridCoord::new(x, y);
            if grid.is_valid_coord(coord) {
                continue;
            }
            let touches_valid = tessel_space::HEX_OFFSETS
                .iter()
                .any(|&(dx, dy)| grid.is_valid_coord(coord.offset(dx, dy)));
            rim += usize::from(touches_valid);
        }
    }
    assert_eq!(sampler.calls(), valid + rim);
}

#[test]
fn rectangle_build_on_square_grid() {
    let mut grid = engine(32, Topology::Square);
    let rect = RectSampler::new(Vec2::new(-3.0, -1.0), Vec2::new(4.0, 2.0));
    assert_eq!(grid.rebuild_validity(&rect).unwrap(), 8 * 4);
    assert!(grid.is_valid(Vec2::new(4.0, 2.0)));
    assert!(!grid.is_valid(Vec2::new(5.0, 2.0)));
}

#[test]
fn untraversable_origin_is_reported() {
    let mut grid = engine(16, Topology::Hex);
    let elsewhere = DiskSampler::new(Vec2::new(5.0, 5.0), 1.0);
    assert_eq!(
        grid.rebuild_validity(&elsewhere),
        Err(BuildError::NoTraversableCells {
            origin: GridCoord::ORIGIN
        })
    );
    // The same terrain is reachable from a different origin.
    let origin = grid.position_to_grid(Vec2::new(5.0, 5.0)).unwrap();
    assert!(grid.rebuild_validity_from(origin, &elsewhere).unwrap() > 0);
}

#[test]
fn sample_budget_is_enforced() {
    let mut grid = GridEngine::new(GridConfig {
        cell_size: 1.0,
        grid_row_max: 64,
        max_flood_samples: Some(500),
        ..GridConfig::default()
    })
    .unwrap();
    assert_eq!(
        grid.rebuild_validity(&OpenSampler),
        Err(BuildError::SampleLimitExceeded { limit: 500 })
    );
}

// ── Vacancy ─────────────────────────────────────────────────────────

#[test]
fn empty_grid_vacancy_is_the_target_cell() {
    let mut grid = engine(16, Topology::Hex);
    let target = grid.grid_to_position(GridCoord::new(2, -3));
    let vacancy = grid.find_closest_vacant(&VacancyQuery::new(target)).unwrap();
    assert_eq!(vacancy.coord, GridCoord::new(2, -3));
    assert_eq!(vacancy.magnitude, 0);
}

#[test]
fn vacancy_grows_with_footprint() {
    let mut grid = engine(32, Topology::Hex);
    grid.create_occupant(EntityId(1), Vec2::ZERO, 3).unwrap();
    let vacancy = grid.find_closest_vacant(&VacancyQuery::new(Vec2::ZERO)).unwrap();
    assert_eq!(vacancy.magnitude, 4);
    assert!(!grid.is_occupied_coord(vacancy.coord, &[]));
}

#[test]
fn occupant_excluding_itself_sees_its_own_cell() {
    let mut grid = engine(16, Topology::Hex);
    let handle = grid.create_occupant(EntityId(1), Vec2::ZERO, 1).unwrap();
    let own = [grid.occupant(handle).unwrap().id()];
    assert!(!grid.is_occupied(Vec2::ZERO, &own));
    let query = VacancyQuery::new(Vec2::ZERO).excluding(&own);
    assert_eq!(grid.find_closest_vacant(&query).unwrap().magnitude, 0);
}

#[test]
fn saturated_grid_has_no_vacancy() {
    let mut grid = engine(4, Topology::Hex);
    for y in -2..2 {
        for x in -2..2 {
            let pos = grid.grid_to_position(GridCoord::new(x, y));
            grid.create_reservation(pos).unwrap();
        }
    }
    assert_eq!(grid.occupant_count(), 16);
    let result = grid.find_closest_vacant(&VacancyQuery::new(Vec2::ZERO).max_magnitude(1_000));
    assert_eq!(
        result,
        Err(VacancyError::NoVacancy {
            max_magnitude: 1_000
        })
    );
}

#[test]
fn biased_vacancy_prefers_the_requested_side() {
    let mut grid = engine(32, Topology::Square);
    grid.create_reservation(Vec2::ZERO).unwrap();
    let north = grid
        .find_closest_vacant(&VacancyQuery::new(Vec2::ZERO).bias(Vec2::Y))
        .unwrap();
    assert_eq!(north.coord, GridCoord::new(0, 1));
    let south_west = grid
        .find_closest_vacant(&VacancyQuery::new(Vec2::ZERO).bias(Vec2::new(-1.0, -1.0)))
        .unwrap();
    assert_eq!(south_west.coord, GridCoord::new(-1, -1));
}
