//! Adjacency rules and world transforms per grid topology.

use glam::Vec2;
use tessel_core::GridCoord;

/// Pointy-top hex offsets in axial `(dq, dr)` order: E, NE, NW, W, SW, SE.
pub const HEX_OFFSETS: [(i32, i32); 6] = [
    (1, 0),  // E
    (1, -1), // NE
    (0, -1), // NW
    (-1, 0), // W
    (-1, 1), // SW
    (0, 1),  // SE
];

/// 4-connected square offsets in `(dx, dy)` order: E, S, W, N.
pub const SQUARE_OFFSETS: [(i32, i32); 4] = [
    (1, 0),  // E
    (0, -1), // S
    (-1, 0), // W
    (0, 1),  // N
];

const SQRT_3: f32 = 1.732_050_8;

/// Cell shape and adjacency of a grid.
///
/// Flood fill walks [`adjacency`](Self::adjacency); rings and distances use
/// the ring metric of the topology: cube distance on hex grids (six
/// neighbours, ring `k` has `6k` cells) and Chebyshev distance on square
/// grids (ring `k` is the perimeter of a `(2k+1)²` square, `8k` cells).
///
/// # Examples
///
/// ```
/// use tessel_core::{GridCoord, Vec2};
/// use tessel_space::Topology;
///
/// let hex = Topology::Hex;
/// let centre = hex.grid_to_world(GridCoord::new(2, -1), 0.5);
/// assert_eq!(hex.world_to_grid(centre, 0.5), Some(GridCoord::new(2, -1)));
/// assert_eq!(hex.distance(GridCoord::new(0, 0), GridCoord::new(2, -1)), 2);
/// assert_eq!(hex.footprint_len(1), 7);
///
/// let square = Topology::Square;
/// assert_eq!(square.world_to_grid(Vec2::new(0.9, -1.2), 1.0), Some(GridCoord::new(1, -1)));
/// assert_eq!(square.footprint_len(1), 9);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Topology {
    /// Square cells, cartesian coordinates.
    Square,
    /// Pointy-top hexagons, axial coordinates.
    #[default]
    Hex,
}

impl Topology {
    /// Immediate neighbour offsets used for flood fill.
    pub fn adjacency(self) -> &'static [(i32, i32)] {
        match self {
            Self::Square => &SQUARE_OFFSETS,
            Self::Hex => &HEX_OFFSETS,
        }
    }

    /// Ring distance between two cells.
    ///
    /// Saturates at `u32::MAX`, so any pair of coordinates is accepted,
    /// including the saturated ones `world_to_grid` returns for far
    /// positions.
    pub fn distance(self, a: GridCoord, b: GridCoord) -> u32 {
        let dx = i64::from(a.x) - i64::from(b.x);
        let dy = i64::from(a.y) - i64::from(b.y);
        let d = match self {
            Self::Square => dx.abs().max(dy.abs()),
            // |ds| where s = -q - r
            Self::Hex => dx.abs().max(dy.abs()).max((dx + dy).abs()),
        };
        u32::try_from(d).unwrap_or(u32::MAX)
    }

    /// Number of cells on ring `k` of an unbounded grid.
    pub fn ring_len(self, k: u32) -> usize {
        if k == 0 {
            return 1;
        }
        let k = k as usize;
        match self {
            Self::Square => 8 * k,
            Self::Hex => 6 * k,
        }
    }

    /// Number of cells in a footprint of magnitude `m` on an unbounded grid.
    pub fn footprint_len(self, m: u32) -> usize {
        let m = m as usize;
        match self {
            Self::Square => (2 * m + 1) * (2 * m + 1),
            Self::Hex => 1 + 3 * m * (m + 1),
        }
    }

    /// World-space centre of a cell.
    pub fn grid_to_world(self, coord: GridCoord, cell_size: f32) -> Vec2 {
        let q = coord.x as f32;
        let r = coord.y as f32;
        match self {
            Self::Square => Vec2::new(q * cell_size, r * cell_size),
            Self::Hex => Vec2::new(cell_size * SQRT_3 * (q + r * 0.5), cell_size * 1.5 * r),
        }
    }

    /// The cell whose area contains `position`.
    ///
    /// Returns `None` for non-finite positions. The result may still lie
    /// outside a codec's domain; callers check that separately.
    pub fn world_to_grid(self, position: Vec2, cell_size: f32) -> Option<GridCoord> {
        if !position.is_finite() {
            return None;
        }
        let scaled = position / cell_size;
        let coord = match self {
            Self::Square => GridCoord::new(round_to_i32(scaled.x), round_to_i32(scaled.y)),
            Self::Hex => {
                let q = (SQRT_3 / 3.0) * scaled.x - scaled.y / 3.0;
                let r = (2.0 / 3.0) * scaled.y;
                cube_round(q, r)
            }
        };
        Some(coord)
    }
}

fn round_to_i32(v: f32) -> i32 {
    // Saturating cast: far-away positions land outside any codec domain.
    v.round() as i32
}

/// Round fractional axial coordinates to the containing hex.
///
/// Rounds all three cube components and then recomputes the one with the
/// largest rounding error from the other two, keeping `q + r + s == 0`.
fn cube_round(q: f32, r: f32) -> GridCoord {
    let s = -q - r;
    let mut rq = q.round();
    let mut rr = r.round();
    let rs = s.round();
    let dq = (rq - q).abs();
    let dr = (rr - r).abs();
    let ds = (rs - s).abs();
    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }
    GridCoord::new(rq as i32, rr as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn c(x: i32, y: i32) -> GridCoord {
        GridCoord::new(x, y)
    }

    #[test]
    fn distance_between_extreme_cells_saturates() {
        let (lo, hi) = (c(i32::MIN, i32::MIN), c(i32::MAX, i32::MAX));
        assert_eq!(Topology::Square.distance(lo, hi), u32::MAX);
        assert_eq!(Topology::Hex.distance(lo, hi), u32::MAX);
        assert_eq!(Topology::Square.distance(c(i32::MIN, 0), c(0, 0)), 1 << 31);
        assert_eq!(Topology::Hex.distance(c(0, i32::MAX), c(0, i32::MIN)), u32::MAX);

        // Positions far off any grid still yield a distance.
        let east = Topology::Hex.world_to_grid(Vec2::new(3.0e9, 0.0), 1.0).unwrap();
        let west = Topology::Hex.world_to_grid(Vec2::new(-3.0e9, 0.0), 1.0).unwrap();
        assert!(Topology::Hex.distance(east, west) > 1_000_000);
    }

    #[test]
    fn hex_adjacency_matches_axial_directions() {
        assert_eq!(
            Topology::Hex.adjacency(),
            &[(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)]
        );
        assert_eq!(Topology::Square.adjacency().len(), 4);
    }

    #[test]
    fn hex_distance_worked_examples() {
        let t = Topology::Hex;
        assert_eq!(t.distance(c(2, 1), c(2, 1)), 0);
        assert_eq!(t.distance(c(2, 1), c(3, 0)), 1);
        assert_eq!(t.distance(c(2, 1), c(4, 0)), 2);
        assert_eq!(t.distance(c(0, 0), c(4, 4)), 8);
        assert_eq!(t.distance(c(0, 0), c(3, -3)), 3);
    }

    #[test]
    fn square_distance_is_chebyshev() {
        let t = Topology::Square;
        assert_eq!(t.distance(c(0, 0), c(3, -4)), 4);
        assert_eq!(t.distance(c(-2, -2), c(2, 2)), 4);
    }

    #[test]
    fn hex_world_layout_is_pointy_top() {
        let t = Topology::Hex;
        let east = t.grid_to_world(c(1, 0), 1.0);
        assert!((east.x - SQRT_3).abs() < 1e-6);
        assert_eq!(east.y, 0.0);
        let se = t.grid_to_world(c(0, 1), 1.0);
        assert!((se.x - SQRT_3 / 2.0).abs() < 1e-6);
        assert!((se.y - 1.5).abs() < 1e-6);
    }

    #[test]
    fn hex_rounding_picks_nearest_centre_near_boundaries() {
        let t = Topology::Hex;
        // Slightly inside (1, 0) from the shared edge with (0, 0).
        let p = Vec2::new(SQRT_3 * 0.5 + 0.01, 0.0);
        assert_eq!(t.world_to_grid(p, 1.0), Some(c(1, 0)));
        let p = Vec2::new(SQRT_3 * 0.5 - 0.01, 0.0);
        assert_eq!(t.world_to_grid(p, 1.0), Some(c(0, 0)));
    }

    #[test]
    fn non_finite_positions_have_no_cell() {
        assert_eq!(Topology::Hex.world_to_grid(Vec2::new(f32::NAN, 0.0), 1.0), None);
        assert_eq!(
            Topology::Square.world_to_grid(Vec2::new(0.0, f32::INFINITY), 1.0),
            None
        );
    }

    #[test]
    fn closed_form_cardinalities() {
        assert_eq!(Topology::Hex.footprint_len(0), 1);
        assert_eq!(Topology::Hex.footprint_len(2), 19);
        assert_eq!(Topology::Square.footprint_len(2), 25);
        assert_eq!(Topology::Hex.ring_len(3), 18);
        assert_eq!(Topology::Square.ring_len(3), 24);
        for m in 0..6u32 {
            let rings: usize = (0..=m).map(|k| Topology::Hex.ring_len(k)).sum();
            assert_eq!(rings, Topology::Hex.footprint_len(m));
            let rings: usize = (0..=m).map(|k| Topology::Square.ring_len(k)).sum();
            assert_eq!(rings, Topology::Square.footprint_len(m));
        }
    }

    proptest! {
        #[test]
        fn world_round_trip(x in -500i32..500, y in -500i32..500, size in 0.05f32..4.0) {
            for t in [Topology::Hex, Topology::Square] {
                let coord = c(x, y);
                let centre = t.grid_to_world(coord, size);
                prop_assert_eq!(t.world_to_grid(centre, size), Some(coord));
            }
        }

        #[test]
        fn nearest_centre_wins(px in -50.0f32..50.0, py in -50.0f32..50.0) {
            // The chosen hex centre is never farther than any neighbouring centre.
            let t = Topology::Hex;
            let p = Vec2::new(px, py);
            let cell = t.world_to_grid(p, 1.0).unwrap();
            let d = p.distance(t.grid_to_world(cell, 1.0));
            for (dx, dy) in HEX_OFFSETS {
                let other = t.grid_to_world(cell.offset(dx, dy), 1.0);
                prop_assert!(d <= p.distance(other) + 1e-3);
            }
        }

        #[test]
        fn distance_is_metric(
            ax in -20i32..20, ay in -20i32..20,
            bx in -20i32..20, by in -20i32..20,
            cx in -20i32..20, cy in -20i32..20,
        ) {
            for t in [Topology::Hex, Topology::Square] {
                let (a, b, cc) = (c(ax, ay), c(bx, by), c(cx, cy));
                prop_assert_eq!(t.distance(a, a), 0);
                prop_assert_eq!(t.distance(a, b), t.distance(b, a));
                prop_assert!(t.distance(a, cc) <= t.distance(a, b) + t.distance(b, cc));
            }
        }
    }
}
