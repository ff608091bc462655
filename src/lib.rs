//! `kismet`: luck-biased weighted loot tables.
//!
//! This crate is meant to be a low-level "loot-table toolbox" that game crates
//! can depend on without pulling in engine-specific machinery. Items are
//! opaque values: the pool compares them with `==`, never hashes them, and
//! hands them back unchanged.
//!
//! Exposed modules:
//! - `pool`: the weight-sorted entry store (insert / set / remove / list).
//! - `draw`: the luck-biased draw algorithm over a pool.
//! - `report`: bulk draws and the estimated-vs-observed distribution report.

#![forbid(unsafe_code)]

pub mod draw;
pub mod pool;
pub mod report;

pub use draw::{Draw, DEFAULT_LUCK, DEFAULT_RETRIES};
pub use pool::{Entry, LootPool, PoolError, DEFAULT_LUCK_FACTOR};
pub use report::{ReportError, Tally};
