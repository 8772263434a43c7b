//! Ring and footprint enumeration around a centre cell.

use smallvec::SmallVec;
use tessel_core::{CodecError, CoordinateCodec, GridCoord, Signature};

use crate::topology::{Topology, HEX_OFFSETS};

/// Square ring walk: right along the bottom edge, up, left, down.
const SQUARE_RING_WALK: [(i32, i32); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

/// Enumerates cells at increasing ring distance from a centre signature.
///
/// Rings are produced by walking their perimeter directly, so a ring never
/// contains a cell from a smaller ring and a footprint (rings `0..=m`) never
/// contains duplicates. Cells that fall outside the codec's domain are
/// skipped; the grid edge absorbs rather than wraps.
///
/// All `*_into` methods append to the caller's buffer so hot paths can reuse
/// pooled vectors.
///
/// # Examples
///
/// ```
/// use tessel_core::{CoordinateCodec, GridCoord};
/// use tessel_space::{RingEnumerator, Topology};
///
/// let codec = CoordinateCodec::new(64).unwrap();
/// let rings = RingEnumerator::new(codec, Topology::Hex);
/// let centre = codec.encode(GridCoord::ORIGIN).unwrap();
///
/// assert_eq!(rings.ring(centre, 0).unwrap(), vec![centre]);
/// assert_eq!(rings.ring(centre, 2).unwrap().len(), 12);
/// assert_eq!(rings.footprint(centre, 3).unwrap().len(), 1 + 3 * 3 * 4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RingEnumerator {
    codec: CoordinateCodec,
    topology: Topology,
}

impl RingEnumerator {
    /// Create an enumerator for the given grid.
    pub fn new(codec: CoordinateCodec, topology: Topology) -> Self {
        Self { codec, topology }
    }

    /// The codec used to pack and unpack cells.
    pub fn codec(&self) -> &CoordinateCodec {
        &self.codec
    }

    /// The grid topology.
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Append the cells of ring `k` around `center` to `out`.
    ///
    /// Returns the number of cells appended, which is below
    /// [`Topology::ring_len`] only where the ring crosses the grid edge.
    pub fn ring_into(
        &self,
        center: Signature,
        k: u32,
        out: &mut Vec<Signature>,
    ) -> Result<usize, CodecError> {
        let origin = self.codec.decode(center)?;
        Ok(self.ring_coords_into(origin, k, out))
    }

    /// Append the footprint of magnitude `m` (rings `0..=m`) to `out`.
    ///
    /// Returns the number of cells appended.
    pub fn footprint_into(
        &self,
        center: Signature,
        m: u32,
        out: &mut Vec<Signature>,
    ) -> Result<usize, CodecError> {
        let origin = self.codec.decode(center)?;
        let mut total = 0;
        for k in 0..=m {
            total += self.ring_coords_into(origin, k, out);
        }
        Ok(total)
    }

    /// Append the immediate neighbours of `center` under the topology's
    /// adjacency (six for hex, four for square).
    pub fn neighbours_into(
        &self,
        center: Signature,
        out: &mut Vec<Signature>,
    ) -> Result<usize, CodecError> {
        let origin = self.codec.decode(center)?;
        let before = out.len();
        out.extend(
            self.neighbour_coords(origin)
                .into_iter()
                .filter_map(|c| self.codec.try_encode(c)),
        );
        Ok(out.len() - before)
    }

    /// Cells of ring `k` around `center`, in enumeration order.
    pub fn ring(&self, center: Signature, k: u32) -> Result<Vec<Signature>, CodecError> {
        let mut out = Vec::with_capacity(self.topology.ring_len(k));
        self.ring_into(center, k, &mut out)?;
        Ok(out)
    }

    /// Cells of rings `0..=m` around `center`, innermost first.
    pub fn footprint(&self, center: Signature, m: u32) -> Result<Vec<Signature>, CodecError> {
        let mut out = Vec::with_capacity(self.topology.footprint_len(m));
        self.footprint_into(center, m, &mut out)?;
        Ok(out)
    }

    /// Adjacent coordinates of `coord`, ignoring the codec domain.
    pub fn neighbour_coords(&self, coord: GridCoord) -> SmallVec<[GridCoord; 6]> {
        self.topology
            .adjacency()
            .iter()
            .map(|&(dx, dy)| coord.offset(dx, dy))
            .collect()
    }

    /// Whether every cell of ring `k` around `center` lies outside the grid.
    ///
    /// For a centre inside the domain, once this holds for some `k` it holds
    /// for every larger ring too.
    pub fn ring_outside_domain(&self, center: GridCoord, k: u32) -> bool {
        match self.topology {
            Topology::Square => {
                let half = i64::from(self.codec.half());
                let k = i64::from(k);
                let (lo_x, hi_x) = (i64::from(center.x) - k, i64::from(center.x) + k);
                let (lo_y, hi_y) = (i64::from(center.y) - k, i64::from(center.y) + k);
                let inside = |v: i64| (-half..half).contains(&v);
                // Each side of the square ring is a full edge of its box.
                let x_span_hits = lo_x.max(-half) <= hi_x.min(half - 1);
                let y_span_hits = lo_y.max(-half) <= hi_y.min(half - 1);
                !((x_span_hits && (inside(lo_y) || inside(hi_y)))
                    || (y_span_hits && (inside(lo_x) || inside(hi_x))))
            }
            Topology::Hex => {
                let mut hit = false;
                self.walk_ring(center, k, |coord| hit |= self.codec.contains(coord));
                !hit
            }
        }
    }

    fn ring_coords_into(&self, origin: GridCoord, k: u32, out: &mut Vec<Signature>) -> usize {
        let before = out.len();
        self.walk_ring(origin, k, |coord| {
            if let Some(sig) = self.codec.try_encode(coord) {
                out.push(sig);
            }
        });
        out.len() - before
    }

    /// Visit every coordinate of ring `k` exactly once.
    fn walk_ring(&self, origin: GridCoord, k: u32, mut visit: impl FnMut(GridCoord)) {
        if k == 0 {
            visit(origin);
            return;
        }
        // Rings far past the domain are still walked in i64 to avoid
        // overflow, then skipped when narrowing back to i32.
        let k = i64::from(k);
        let (mut x, mut y) = match self.topology {
            // Start at k steps in the SW direction.
            Topology::Hex => (
                i64::from(origin.x) + i64::from(HEX_OFFSETS[4].0) * k,
                i64::from(origin.y) + i64::from(HEX_OFFSETS[4].1) * k,
            ),
            // Start at the bottom-left corner of the box.
            Topology::Square => (i64::from(origin.x) - k, i64::from(origin.y) - k),
        };
        let steps_per_side = match self.topology {
            Topology::Hex => k,
            Topology::Square => 2 * k,
        };
        let sides: &[(i32, i32)] = match self.topology {
            Topology::Hex => &HEX_OFFSETS,
            Topology::Square => &SQUARE_RING_WALK,
        };
        for &(dx, dy) in sides {
            for _ in 0..steps_per_side {
                if let (Ok(cx), Ok(cy)) = (i32::try_from(x), i32::try_from(y)) {
                    visit(GridCoord::new(cx, cy));
                }
                x += i64::from(dx);
                y += i64::from(dy);
            }
        }
    }
}
