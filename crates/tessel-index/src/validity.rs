//! The set of traversable cells, built by flood fill or loaded from disk.

use std::collections::{HashSet, VecDeque};
use std::time::Instant;

use tessel_core::{CoordinateCodec, GridCoord, Signature, SurfaceSampler};
use tessel_space::RingEnumerator;
use tracing::info;

use crate::error::{BuildError, ValidityError};

/// Parameters for [`ValiditySet::build`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildOptions {
    /// World length of one grid edge.
    pub cell_size: f32,
    /// Snap distance passed to the sampler with every query.
    pub tolerance: f32,
    /// Upper bound on sampler calls. `None` floods until the frontier is
    /// exhausted, which is bounded by the grid capacity.
    pub max_samples: Option<usize>,
}

impl BuildOptions {
    /// Options for a grid with the given cell size; the tolerance defaults
    /// to one cell.
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            tolerance: cell_size,
            max_samples: None,
        }
    }

    /// Override the sampler tolerance.
    pub fn tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Cap the number of sampler calls.
    pub fn max_samples(mut self, limit: usize) -> Self {
        self.max_samples = Some(limit);
        self
    }
}

/// Sorted, duplicate-free list of traversable signatures.
///
/// Membership is a binary search. The set persists as a flat ascending
/// array of integers; with the `serde` feature that is exactly its
/// serialised form, and deserialising re-validates the ordering.
///
/// # Examples
///
/// ```
/// use tessel_core::{CoordinateCodec, GridCoord, Vec2};
/// use tessel_index::{BuildOptions, ValiditySet};
/// use tessel_space::{RingEnumerator, Topology};
///
/// let codec = CoordinateCodec::new(32).unwrap();
/// let rings = RingEnumerator::new(codec, Topology::Square);
/// // Everything within 2.5 units of the origin is walkable.
/// let sampler = |p: Vec2, _tol: f32| p.length() <= 2.5;
///
/// let set = ValiditySet::build(GridCoord::ORIGIN, &sampler, &rings, &BuildOptions::new(1.0)).unwrap();
/// assert_eq!(set.len(), 21);
/// assert!(set.contains(codec.encode(GridCoord::new(2, 1)).unwrap()));
/// assert!(!set.contains(codec.encode(GridCoord::new(2, 2)).unwrap()));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<Signature>", into = "Vec<Signature>")
)]
pub struct ValiditySet {
    signatures: Vec<Signature>,
}

impl ValiditySet {
    /// Discover every traversable cell reachable from `origin`.
    ///
    /// Breadth-first over the topology's adjacency. A cell is marked
    /// visited when it is enqueued, so the sampler is asked about each cell
    /// at most once. Only accepted cells expand the frontier, and cells
    /// outside the codec domain are never enqueued.
    pub fn build<S>(
        origin: GridCoord,
        sampler: &S,
        rings: &RingEnumerator,
        options: &BuildOptions,
    ) -> Result<Self, BuildError>
    where
        S: SurfaceSampler + ?Sized,
    {
        let started = Instant::now();
        let codec = rings.codec();
        let topology = rings.topology();
        let origin_sig = codec.encode(origin)?;

        let mut visited: HashSet<Signature> = HashSet::new();
        let mut frontier: VecDeque<(GridCoord, Signature)> = VecDeque::new();
        let mut accepted: Vec<Signature> = Vec::new();
        let mut samples = 0usize;
        let mut peak_frontier = 1usize;

        visited.insert(origin_sig);
        frontier.push_back((origin, origin_sig));

        while let Some((coord, sig)) = frontier.pop_front() {
            if let Some(limit) = options.max_samples {
                if samples >= limit {
                    return Err(BuildError::SampleLimitExceeded { limit });
                }
            }
            samples += 1;

            let position = topology.grid_to_world(coord, options.cell_size);
            if !sampler.is_traversable(position, options.tolerance) {
                continue;
            }
            accepted.push(sig);

            for neighbour in rings.neighbour_coords(coord) {
                if let Some(n_sig) = codec.try_encode(neighbour) {
                    if visited.insert(n_sig) {
                        frontier.push_back((neighbour, n_sig));
                    }
                }
            }
            peak_frontier = peak_frontier.max(frontier.len());
        }

        if accepted.is_empty() {
            return Err(BuildError::NoTraversableCells { origin });
        }
        accepted.sort_unstable();
        accepted.dedup();

        info!(
            accepted = accepted.len(),
            samples,
            peak_frontier,
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "validity set built"
        );
        Ok(Self {
            signatures: accepted,
        })
    }

    /// Load a persisted signature list.
    ///
    /// The list must be strictly ascending. Whether the signatures fit a
    /// particular grid is checked separately by
    /// [`check_domain`](Self::check_domain).
    pub fn from_signatures(signatures: Vec<Signature>) -> Result<Self, ValidityError> {
        if let Some(index) = signatures.windows(2).position(|w| w[0] >= w[1]) {
            return Err(ValidityError::NotAscending {
                index: index + 1,
                previous: signatures[index],
                signature: signatures[index + 1],
            });
        }
        Ok(Self { signatures })
    }

    /// Verify every signature could have been produced by `codec`.
    pub fn check_domain(&self, codec: &CoordinateCodec) -> Result<(), ValidityError> {
        // Sorted, so the largest signature is the only one worth checking.
        match self.signatures.last() {
            Some(&last) if !codec.contains_signature(last) => Err(ValidityError::OutOfDomain {
                signature: last,
                capacity: codec.capacity(),
            }),
            _ => Ok(()),
        }
    }

    /// The flat ascending signature list, for persistence.
    pub fn into_signatures(self) -> Vec<Signature> {
        self.signatures
    }

    /// Whether `sig` is a valid cell.
    #[inline]
    pub fn contains(&self, sig: Signature) -> bool {
        self.signatures.binary_search(&sig).is_ok()
    }

    /// Number of valid cells.
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    /// Whether no cell is valid.
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// Valid signatures in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Signature> + '_ {
        self.signatures.iter().copied()
    }

    /// Valid signatures as an ascending slice.
    pub fn as_slice(&self) -> &[Signature] {
        &self.signatures
    }
}

impl TryFrom<Vec<Signature>> for ValiditySet {
    type Error = ValidityError;

    fn try_from(signatures: Vec<Signature>) -> Result<Self, Self::Error> {
        Self::from_signatures(signatures)
    }
}

impl From<ValiditySet> for Vec<Signature> {
    fn from(set: ValiditySet) -> Self {
        set.into_signatures()
    }
}
