//! Ring enumeration compliance test helpers.
//!
//! Shared by the ring tests of both topologies.

use crate::ring::RingEnumerator;
use indexmap::IndexSet;
use tessel_core::{GridCoord, Signature};

fn decode_all(rings: &RingEnumerator, sigs: &[Signature]) -> Vec<GridCoord> {
    sigs.iter()
        .map(|&s| rings.codec().decode(s).unwrap())
        .collect()
}

/// Assert that every cell of rings `0..=max_k` sits at exactly distance `k`.
pub fn assert_rings_at_exact_distance(rings: &RingEnumerator, center: GridCoord, max_k: u32) {
    let topology = rings.topology();
    let centre_sig = rings.codec().encode(center).unwrap();
    for k in 0..=max_k {
        let ring = rings.ring(centre_sig, k).unwrap();
        for coord in decode_all(rings, &ring) {
            let d = topology.distance(center, coord);
            assert_eq!(d, k, "{coord} in ring {k} of {center} has distance {d}");
        }
    }
}

/// Assert that footprints of magnitude `0..=max_m` have the closed-form
/// size and contain no duplicates.
pub fn assert_footprint_closed_form(rings: &RingEnumerator, center: GridCoord, max_m: u32) {
    let topology = rings.topology();
    let centre_sig = rings.codec().encode(center).unwrap();
    for m in 0..=max_m {
        let fp = rings.footprint(centre_sig, m).unwrap();
        assert_eq!(
            fp.len(),
            topology.footprint_len(m),
            "footprint {m} of {center} on {topology:?}"
        );
        let unique: IndexSet<Signature> = fp.iter().copied().collect();
        assert_eq!(unique.len(), fp.len(), "footprint {m} has duplicates");
    }
}

/// Assert that `b in neighbours(a)` implies `a in neighbours(b)` over the
/// whole domain.
pub fn assert_neighbours_symmetric(rings: &RingEnumerator) {
    let half = rings.codec().half();
    let mut out = Vec::new();
    let mut back = Vec::new();
    for y in -half..half {
        for x in -half..half {
            let sig = rings.codec().encode(GridCoord::new(x, y)).unwrap();
            out.clear();
            rings.neighbours_into(sig, &mut out).unwrap();
            for &nb in &out {
                back.clear();
                rings.neighbours_into(nb, &mut back).unwrap();
                assert!(
                    back.contains(&sig),
                    "neighbour symmetry violated: {nb:?} in N({sig:?}) but not the reverse"
                );
            }
        }
    }
}
