//! Allocation recycling for Tessel grids.
//!
//! The grid avoids per-tick allocation by recycling everything it hands
//! out:
//!
//! - [`ObjectPool`]: free-list recycler with a factory, scoped acquisition
//!   through [`PoolGuard`], and [`PoolStats`] diagnostics.
//! - [`SlotTable`]: generational table addressed by [`SlotKey`]s, so a key
//!   that outlives its value is detected instead of aliasing a recycled
//!   slot.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod pool;
pub mod slots;

pub use pool::{ObjectPool, PoolGuard, PoolStats};
pub use slots::{SlotKey, SlotTable};
