//! Tessel swarm: a crowd of wandering units on a hex grid.
//!
//! Demonstrates:
//!   1. Building the validity set from a terrain closure
//!   2. Creating occupants with footprints, plus a reservation
//!   3. Driving `tick()` from a moving position source
//!   4. Finding vacant cells with and without a directional bias
//!   5. Logging pool and grid statistics
//!
//! Run with:
//!   RUST_LOG=tessel_engine=debug cargo run --example swarm

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tessel::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ─── World parameters ───────────────────────────────────────────

const ARENA_RADIUS: f32 = 30.0;
const POND_CENTER: Vec2 = Vec2::new(10.0, 4.0);
const POND_RADIUS: f32 = 5.0;
const UNITS: u64 = 40;
const TICKS: u32 = 120;

// ─── Terrain: a disk with a pond cut out of it ──────────────────

fn walkable(position: Vec2, tolerance: f32) -> bool {
    position.length() <= ARENA_RADIUS + tolerance * 0.5
        && position.distance(POND_CENTER) > POND_RADIUS
}

// ─── Position source: seeded wanderers ──────────────────────────

struct Wanderers {
    rng: ChaCha8Rng,
    positions: Vec<Vec2>,
}

impl Wanderers {
    fn new(seed: u64, count: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let positions = (0..count)
            .map(|_| Vec2::new(rng.gen_range(-15.0..15.0), rng.gen_range(-15.0..-5.0)))
            .collect();
        Self { rng, positions }
    }

    fn step(&mut self) {
        for pos in &mut self.positions {
            let delta = Vec2::new(self.rng.gen_range(-0.6..0.6), self.rng.gen_range(-0.6..0.6));
            let next = *pos + delta;
            if walkable(next, 0.0) {
                *pos = next;
            }
        }
    }
}

impl PositionSource for Wanderers {
    fn position(&self, entity: EntityId) -> Vec2 {
        usize::try_from(entity.0)
            .ok()
            .and_then(|i| self.positions.get(i))
            .copied()
            .unwrap_or(Vec2::NAN)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("tessel_engine=info".parse()?))
        .init();

    let mut grid = GridEngine::new(GridConfig {
        cell_size: 0.5,
        grid_row_max: 256,
        topology: Topology::Hex,
        ..GridConfig::default()
    })?;
    let cells = grid.rebuild_validity(&walkable)?;
    info!(cells, "terrain ready");

    let mut crowd = Wanderers::new(7, UNITS);
    for id in 0..UNITS {
        let entity = EntityId(id);
        grid.create_occupant(entity, crowd.position(entity), 1)?;
    }
    // Hold a landing spot at the origin.
    let landing = grid.create_reservation(Vec2::ZERO)?;

    let mut moves = 0usize;
    for _ in 0..TICKS {
        crowd.step();
        let report = grid.tick(&crowd, &mut |_entity: EntityId| moves += 1);
        if report.out_of_bounds > 0 {
            info!(tick = %report.tick, off_grid = report.out_of_bounds, "units left the grid");
        }
    }
    info!(moves, "simulation finished");

    // Where can a newcomer stand near the landing spot?
    let nearest = grid.find_closest_vacant(&VacancyQuery::new(Vec2::ZERO))?;
    let eastward = grid.find_closest_vacant(&VacancyQuery::new(Vec2::ZERO).bias(Vec2::X))?;
    info!(
        nearest = %nearest.coord,
        nearest_rings = nearest.magnitude,
        eastward = %eastward.coord,
        "vacancies around the landing spot"
    );

    let pond_edge = POND_CENTER - Vec2::new(POND_RADIUS + 1.0, 0.0);
    let at_pond = grid.occupants_at(pond_edge);
    info!(?at_pond, "units standing at the pond edge");

    grid.destroy(landing)?;
    grid.log_stats();
    println!("{}", grid.stats());
    Ok(())
}
