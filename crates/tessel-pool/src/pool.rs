//! Free-list object pool with scoped acquisition.

use std::fmt;
use std::ops::{Deref, DerefMut};

use tracing::{debug, warn};

/// Diagnostics for an [`ObjectPool`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Released instances waiting on the free list.
    pub available: usize,
    /// Acquired minus released.
    pub outstanding: usize,
    /// Instances ever constructed by the factory (peak population).
    pub high_water: usize,
}

impl fmt::Display for PoolStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} available, {} outstanding, {} constructed",
            self.available, self.outstanding, self.high_water
        )
    }
}

/// Free-list recycler.
///
/// [`acquire`](Self::acquire) pops a released instance or invokes the
/// factory; [`release`](Self::release) pushes it back after running the
/// optional reset hook. There is no capacity limit and the free list never
/// shrinks on its own. Not safe for concurrent use; each pool is owned by
/// exactly one grid.
///
/// # Examples
///
/// ```
/// use tessel_pool::ObjectPool;
///
/// let mut pool = ObjectPool::with_reset(Vec::<u32>::new, Vec::clear);
/// {
///     let mut scratch = pool.scoped();
///     scratch.push(7);
/// }
/// // The guard returned (and cleared) the vector.
/// let again = pool.acquire();
/// assert!(again.is_empty());
/// assert_eq!(pool.stats().high_water, 1);
/// pool.release(again);
/// ```
pub struct ObjectPool<T> {
    free: Vec<T>,
    factory: Box<dyn Fn() -> T>,
    reset: Option<Box<dyn Fn(&mut T)>>,
    outstanding: usize,
    high_water: usize,
}

impl<T> ObjectPool<T> {
    /// Create a pool that constructs new instances with `factory`.
    pub fn new(factory: impl Fn() -> T + 'static) -> Self {
        Self {
            free: Vec::new(),
            factory: Box::new(factory),
            reset: None,
            outstanding: 0,
            high_water: 0,
        }
    }

    /// Create a pool whose instances are passed through `reset` on release.
    pub fn with_reset(factory: impl Fn() -> T + 'static, reset: impl Fn(&mut T) + 'static) -> Self {
        Self {
            free: Vec::new(),
            factory: Box::new(factory),
            reset: Some(Box::new(reset)),
            outstanding: 0,
            high_water: 0,
        }
    }

    /// Take an instance from the free list, constructing one if it is empty.
    pub fn acquire(&mut self) -> T {
        let obj = match self.free.pop() {
            Some(obj) => obj,
            None => {
                self.high_water += 1;
                (self.factory)()
            }
        };
        self.outstanding += 1;
        obj
    }

    /// Return an instance to the free list.
    ///
    /// The caller gives up ownership, so the object cannot be used after
    /// release.
    pub fn release(&mut self, mut obj: T) {
        if let Some(reset) = &self.reset {
            reset(&mut obj);
        }
        // Objects not acquired from this pool are still accepted; they just
        // grow the free list.
        self.outstanding = self.outstanding.saturating_sub(1);
        self.free.push(obj);
    }

    /// Acquire an instance that is released when the guard drops.
    pub fn scoped(&mut self) -> PoolGuard<'_, T> {
        let obj = self.acquire();
        PoolGuard {
            obj: Some(obj),
            pool: self,
        }
    }

    /// Snapshot of the pool's counters.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            available: self.free.len(),
            outstanding: self.outstanding,
            high_water: self.high_water,
        }
    }

    /// Emit the pool's counters at `debug` level.
    pub fn log_stats(&self, label: &str) {
        debug!(pool = label, stats = %self.stats(), "pool stats");
    }
}

impl<T> fmt::Debug for ObjectPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPool")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl<T> Drop for ObjectPool<T> {
    fn drop(&mut self) {
        if self.outstanding > 0 {
            warn!(
                outstanding = self.outstanding,
                "object pool dropped before all instances were released"
            );
        }
    }
}

/// Scoped lease on a pooled instance.
///
/// Dereferences to the instance and returns it to the pool on drop.
pub struct PoolGuard<'a, T> {
    obj: Option<T>,
    pool: &'a mut ObjectPool<T>,
}

impl<T> Deref for PoolGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // `obj` is only taken in `drop`.
        match &self.obj {
            Some(obj) => obj,
            None => unreachable!("pool guard accessed after release"),
        }
    }
}

impl<T> DerefMut for PoolGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.obj {
            Some(obj) => obj,
            None => unreachable!("pool guard accessed after release"),
        }
    }
}

impl<T> Drop for PoolGuard<'_, T> {
    fn drop(&mut self) {
        if let Some(obj) = self.obj.take() {
            self.pool.release(obj);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn acquire_constructs_when_empty() {
        let mut pool = ObjectPool::new(|| 5u32);
        assert_eq!(pool.acquire(), 5);
        assert_eq!(
            pool.stats(),
            PoolStats {
                available: 0,
                outstanding: 1,
                high_water: 1
            }
        );
    }

    #[test]
    fn release_then_acquire_reuses_instance() {
        let built = Rc::new(Cell::new(0));
        let counter = Rc::clone(&built);
        let mut pool = ObjectPool::new(move || {
            counter.set(counter.get() + 1);
            Vec::<u8>::with_capacity(16)
        });
        let mut v = pool.acquire();
        v.push(1);
        pool.release(v);
        let v = pool.acquire();
        // No reset hook: contents survive.
        assert_eq!(v, vec![1]);
        assert_eq!(built.get(), 1);
        pool.release(v);
    }

    #[test]
    fn reset_hook_runs_on_release() {
        let mut pool = ObjectPool::with_reset(Vec::<u8>::new, Vec::clear);
        let mut v = pool.acquire();
        v.extend_from_slice(&[1, 2, 3]);
        pool.release(v);
        let v = pool.acquire();
        assert!(v.is_empty());
        assert!(v.capacity() >= 3, "reset must keep the allocation");
        pool.release(v);
    }

    #[test]
    fn scoped_guard_returns_on_drop() {
        let mut pool = ObjectPool::with_reset(Vec::<u8>::new, Vec::clear);
        {
            let mut guard = pool.scoped();
            guard.push(9);
            assert_eq!(guard.len(), 1);
        }
        assert_eq!(
            pool.stats(),
            PoolStats {
                available: 1,
                outstanding: 0,
                high_water: 1
            }
        );
    }

    #[test]
    fn high_water_tracks_peak_population() {
        let mut pool = ObjectPool::new(|| 0u8);
        let a = pool.acquire();
        let b = pool.acquire();
        let c = pool.acquire();
        pool.release(a);
        pool.release(b);
        pool.release(c);
        let d = pool.acquire();
        assert_eq!(pool.stats().high_water, 3);
        assert_eq!(pool.stats().outstanding, 1);
        assert_eq!(pool.stats().available, 2);
        pool.release(d);
    }

    #[test]
    fn stats_display() {
        let stats = PoolStats {
            available: 2,
            outstanding: 1,
            high_water: 3,
        };
        assert_eq!(stats.to_string(), "2 available, 1 outstanding, 3 constructed");
    }
}
