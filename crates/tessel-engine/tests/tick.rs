//! Integration test: tick-driven tracking of moving entities.
//!
//! Drives the engine with scripted and random-walk position sources and
//! checks that footprints follow their entities, that exactly one
//! notification fires per moved occupant, and that the occupancy index
//! stays consistent with the registry throughout.

use tessel_core::{EntityId, GridCoord, PositionSource, TickId, Vec2};
use tessel_engine::{GridConfig, GridEngine, OccupantHandle};
use tessel_space::Topology;
use tessel_test_utils::{RandomWalk, RecordingListener, ScriptedPositions};

fn engine(topology: Topology) -> GridEngine {
    GridEngine::new(GridConfig {
        cell_size: 1.0,
        grid_row_max: 64,
        topology,
        ..GridConfig::default()
    })
    .unwrap()
}

#[test]
fn stationary_occupants_are_not_notified() {
    let mut grid = engine(Topology::Hex);
    let mut source = ScriptedPositions::new();
    source.set(EntityId(1), Vec2::ZERO);
    grid.create_occupant(EntityId(1), Vec2::ZERO, 1).unwrap();

    let mut listener = RecordingListener::new();
    for _ in 0..3 {
        let report = grid.tick(&source, &mut listener);
        assert_eq!(report.polled, 1);
        assert_eq!(report.moved, 0);
    }
    assert!(listener.events().is_empty());
    assert_eq!(grid.current_tick(), TickId(3));
}

#[test]
fn moved_occupant_is_notified_once_and_footprint_follows() {
    let mut grid = engine(Topology::Hex);
    let mut source = ScriptedPositions::new();
    source.set(EntityId(7), Vec2::ZERO);
    let handle = grid.create_occupant(EntityId(7), Vec2::ZERO, 1).unwrap();

    let target = grid.grid_to_position(GridCoord::new(5, -1));
    source.set(EntityId(7), target);
    let mut listener = RecordingListener::new();
    let report = grid.tick(&source, &mut listener);

    assert_eq!(report.moved, 1);
    assert_eq!(listener.take(), vec![EntityId(7)]);
    assert!(!grid.is_occupied(Vec2::ZERO, &[]));
    assert!(grid.is_occupied(target, &[]));
    assert_eq!(grid.stats().occupied_cells, 7);
    let centre = grid.occupant(handle).unwrap().center();
    assert_eq!(grid.signature_at(target), Some(centre));

    // Moving within the same cell is not a change.
    source.set(EntityId(7), target + Vec2::new(0.1, 0.1));
    assert_eq!(grid.tick(&source, &mut listener).moved, 0);
    assert!(listener.events().is_empty());
}

#[test]
fn entity_off_grid_keeps_last_footprint() {
    let mut grid = engine(Topology::Square);
    let mut source = ScriptedPositions::new();
    source.set(EntityId(1), Vec2::ZERO);
    grid.create_occupant(EntityId(1), Vec2::ZERO, 0).unwrap();

    source.set(EntityId(1), Vec2::new(1_000.0, 0.0));
    let mut listener = RecordingListener::new();
    let report = grid.tick(&source, &mut listener);
    assert_eq!(report.out_of_bounds, 1);
    assert_eq!(report.moved, 0);
    assert!(grid.is_occupied(Vec2::ZERO, &[]));

    // A missing position is treated the same way.
    source.remove(EntityId(1));
    assert_eq!(grid.tick(&source, &mut listener).out_of_bounds, 1);
    assert!(listener.events().is_empty());
}

#[test]
fn reservations_are_not_polled() {
    let mut grid = engine(Topology::Hex);
    grid.create_reservation(Vec2::ZERO).unwrap();
    let source = |_e: EntityId| -> Vec2 { panic!("reservations have no entity") };
    let report = grid.tick(&source, &mut ());
    assert_eq!(report.polled, 0);
    assert!(grid.is_occupied(Vec2::ZERO, &[]));
}

#[test]
fn closure_listener_receives_notifications() {
    let mut grid = engine(Topology::Square);
    grid.create_occupant(EntityId(3), Vec2::ZERO, 0).unwrap();
    let source = |_e: EntityId| Vec2::new(4.0, 4.0);
    let mut seen = Vec::new();
    grid.tick(&source, &mut |e: EntityId| seen.push(e));
    assert_eq!(seen, vec![EntityId(3)]);
}

#[test]
fn random_walk_keeps_index_consistent() {
    for topology in [Topology::Hex, Topology::Square] {
        let mut grid = engine(topology);
        let mut walk = RandomWalk::new(0x5eed, 24, 0.8, 12.0);
        let handles: Vec<(EntityId, OccupantHandle)> = walk
            .entities()
            .map(|e| (e, grid.create_occupant(e, walk.position(e), 1).unwrap()))
            .collect();

        let mut listener = RecordingListener::new();
        for _ in 0..200 {
            walk.advance();
            let report = grid.tick(&walk, &mut listener);
            let events = listener.take();
            assert_eq!(report.polled, walk.len());
            assert_eq!(report.out_of_bounds, 0);
            assert_eq!(events.len(), report.moved);

            for &(entity, handle) in &handles {
                let occupant = grid.occupant(handle).unwrap();
                assert_eq!(grid.signature_at(walk.position(entity)), Some(occupant.center()));
                for &cell in occupant.footprint() {
                    let coord = grid.codec().decode(cell).unwrap();
                    assert!(grid.is_occupied_coord(coord, &[]));
                }
            }
        }

        for (_, handle) in handles {
            grid.destroy(handle).unwrap();
        }
        let stats = grid.stats();
        assert_eq!(stats.occupied_cells, 0);
        assert_eq!(stats.active_occupants, 0);
        assert_eq!(stats.bucket_pool.outstanding, 0);
        assert_eq!(stats.occupant_pool.outstanding, 0);
    }
}
