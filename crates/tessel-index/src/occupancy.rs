//! Per-cell occupant buckets.

use indexmap::IndexMap;
use smallvec::SmallVec;
use tessel_core::{OccupantId, Signature};
use tessel_pool::{ObjectPool, PoolStats};

/// Occupant IDs covering one cell.
pub type Bucket = SmallVec<[OccupantId; 4]>;

/// Map from cell to the occupants whose footprint covers it.
///
/// Only non-empty buckets are stored; a bucket that empties on
/// [`vacate`](Self::vacate) is removed and returned to the bucket pool.
///
/// # Examples
///
/// ```
/// use tessel_core::{OccupantId, Signature};
/// use tessel_index::OccupancyIndex;
///
/// let mut index = OccupancyIndex::new();
/// let cells = [Signature(10), Signature(11)];
/// index.occupy(OccupantId(1), &cells);
///
/// assert!(index.is_occupied(Signature(10), &[]));
/// // An occupant never blocks itself.
/// assert!(!index.is_occupied(Signature(10), &[OccupantId(1)]));
///
/// index.vacate(OccupantId(1), &cells);
/// assert!(index.is_empty());
/// ```
pub struct OccupancyIndex {
    buckets: IndexMap<Signature, Bucket>,
    pool: ObjectPool<Bucket>,
}

impl OccupancyIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            buckets: IndexMap::new(),
            pool: ObjectPool::with_reset(Bucket::new, Bucket::clear),
        }
    }

    /// Add `id` to the bucket of every cell in `cells`.
    ///
    /// Adding an ID that is already present is a no-op for that cell.
    pub fn occupy(&mut self, id: OccupantId, cells: &[Signature]) {
        let pool = &mut self.pool;
        for &sig in cells {
            let bucket = self.buckets.entry(sig).or_insert_with(|| pool.acquire());
            if !bucket.contains(&id) {
                bucket.push(id);
            }
        }
    }

    /// Remove `id` from the bucket of every cell in `cells`.
    pub fn vacate(&mut self, id: OccupantId, cells: &[Signature]) {
        for &sig in cells {
            let Some(bucket) = self.buckets.get_mut(&sig) else {
                continue;
            };
            if let Some(pos) = bucket.iter().position(|&o| o == id) {
                bucket.swap_remove(pos);
            }
            if bucket.is_empty() {
                if let Some(bucket) = self.buckets.swap_remove(&sig) {
                    self.pool.release(bucket);
                }
            }
        }
    }

    /// Whether some occupant other than those in `excluding` covers `sig`.
    pub fn is_occupied(&self, sig: Signature, excluding: &[OccupantId]) -> bool {
        self.buckets
            .get(&sig)
            .is_some_and(|bucket| bucket.iter().any(|id| !excluding.contains(id)))
    }

    /// Occupants covering `sig`, in no particular order.
    pub fn occupants(&self, sig: Signature) -> &[OccupantId] {
        self.buckets
            .get(&sig)
            .map(|bucket| bucket.as_slice())
            .unwrap_or(&[])
    }

    /// Cells covered by at least one occupant.
    pub fn occupied_cells(&self) -> impl Iterator<Item = Signature> + '_ {
        self.buckets.keys().copied()
    }

    /// Number of non-empty buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Whether no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Counters of the bucket pool.
    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }
}

impl Default for OccupancyIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OccupancyIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OccupancyIndex")
            .field("buckets", &self.buckets.len())
            .field("pool", &self.pool)
            .finish()
    }
}

impl Drop for OccupancyIndex {
    fn drop(&mut self) {
        for (_, bucket) in self.buckets.drain(..) {
            self.pool.release(bucket);
        }
    }
}
