//! Weight-sorted entry storage.
//!
//! A [`LootPool`] owns a list of (item, weight) entries kept sorted by
//! descending weight, together with the exact total weight. Weights are
//! supplied and reported as plain `f64` but stored in fixed-point units
//! (a private scale factor), so the cumulative sums walked during drawing
//! are exact integer arithmetic.
//!
//! Duplicate items may coexist as distinct entries; [`LootPool::set`] is the
//! one operation that overwrites instead of appending.

use log::debug;

// Fixed-point scale applied to caller weights. Large enough that fractional
// weights survive the integer cumulative sums used in drawing.
const WEIGHT_SCALE: f64 = 1e9;

/// Curve exponent used by [`LootPool::new`].
pub const DEFAULT_LUCK_FACTOR: f64 = 1.2;

/// Errors for pool mutation and drawing.
#[derive(Debug, Clone, PartialEq)]
pub enum PoolError {
    /// Weight is non-positive, non-finite, or outside the storable range.
    InvalidWeight(f64),
    /// The pool has zero total weight; there is nothing to draw.
    EmptyPool,
    /// Internal state is broken; returned instead of a wrong item.
    InconsistentState(&'static str),
}

impl std::fmt::Display for PoolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWeight(w) => write!(f, "weight must be positive and finite (got {w})"),
            Self::EmptyPool => write!(f, "pool has zero total weight"),
            Self::InconsistentState(msg) => write!(f, "inconsistent pool state: {msg}"),
        }
    }
}

impl std::error::Error for PoolError {}

/// One (item, weight) pair stored in a pool.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<T> {
    pub(crate) item: T,
    pub(crate) scaled: u64,
}

impl<T> Entry<T> {
    /// The stored item.
    pub fn item(&self) -> &T {
        &self.item
    }

    /// Consume the entry, yielding the item.
    pub fn into_item(self) -> T {
        self.item
    }

    /// The un-scaled weight.
    pub fn weight(&self) -> f64 {
        self.scaled as f64 / WEIGHT_SCALE
    }
}

/// A weighted item pool with a tunable luck curve.
///
/// Entries stay sorted by descending weight so the draw algorithm can scan
/// from the rare end. Inserts are O(n); loot tables are small and mostly
/// built once at startup, so ordered insertion is the whole indexing story.
///
/// Mutation takes `&mut self` and queries take `&self`, which makes the
/// single-writer contract a compile-time property within one thread. Sharing
/// a pool across threads is the caller's synchronization problem.
#[derive(Debug, Clone)]
pub struct LootPool<T> {
    pub(crate) entries: Vec<Entry<T>>,
    /// Exact sum of all stored (fixed-point) weights.
    pub(crate) total: u64,
    pub(crate) luck_factor: f64,
}

impl<T> Default for LootPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LootPool<T> {
    /// Create an empty pool with the default luck curve.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            total: 0,
            luck_factor: DEFAULT_LUCK_FACTOR,
        }
    }

    /// Override the luck-curve exponent.
    ///
    /// Larger exponents make low-luck draws favor common entries more
    /// strongly; `1.0` makes a luck-1 draw exactly weight-proportional.
    pub fn with_luck_factor(mut self, luck_factor: f64) -> Self {
        self.luck_factor = luck_factor;
        self
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pool holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The luck-curve exponent.
    pub fn luck_factor(&self) -> f64 {
        self.luck_factor
    }

    /// Sum of all entry weights (un-scaled).
    pub fn total_weight(&self) -> f64 {
        self.total as f64 / WEIGHT_SCALE
    }

    /// Validate a caller weight and convert it to fixed-point units.
    fn scale(weight: f64) -> Result<u64, PoolError> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(PoolError::InvalidWeight(weight));
        }
        let scaled = (weight * WEIGHT_SCALE).round();
        if scaled < 1.0 || scaled > u64::MAX as f64 {
            return Err(PoolError::InvalidWeight(weight));
        }
        Ok(scaled as u64)
    }

    /// Add an entry, keeping the descending-weight order.
    ///
    /// The position is found by a reverse linear scan from the low-weight
    /// end. On a weight tie the new entry lands ahead of the existing ones,
    /// so newer entries group before older equal-weight ones.
    pub fn insert(&mut self, item: T, weight: f64) -> Result<(), PoolError> {
        let scaled = Self::scale(weight)?;
        let total = self
            .total
            .checked_add(scaled)
            .ok_or(PoolError::InvalidWeight(weight))?;

        let mut idx = self.entries.len();
        while idx > 0 && self.entries[idx - 1].scaled <= scaled {
            idx -= 1;
        }
        self.entries.insert(idx, Entry { item, scaled });
        self.total = total;
        Ok(())
    }

    /// Every entry's weight, or its share of the total as a percentage.
    ///
    /// Order is the pool's sort order (descending weight).
    pub fn list_items(&self, use_percentage: bool) -> Vec<(&T, f64)> {
        self.entries
            .iter()
            .map(|e| {
                let w = if use_percentage {
                    e.scaled as f64 / self.total as f64 * 100.0
                } else {
                    e.weight()
                };
                (&e.item, w)
            })
            .collect()
    }

    /// Remove every entry whose item satisfies `pred`, returning the count.
    pub fn remove_if<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.entries.len();
        // Reverse index order: a removal never shifts an unvisited entry.
        for i in (0..self.entries.len()).rev() {
            if pred(&self.entries[i].item) {
                let entry = self.entries.remove(i);
                self.total -= entry.scaled;
            }
        }
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!("remove_if dropped {removed} of {before} entries");
        }
        removed
    }
}

impl<T: PartialEq> LootPool<T> {
    /// Update the weight of the first entry equal to `item`.
    ///
    /// Returns `true` if an entry was updated. A missing item is a no-op
    /// returning `false`: unlike [`insert`], `set` never creates entries.
    /// The weight is validated before the lookup, so an invalid weight is
    /// an error even when the item is absent.
    ///
    /// [`insert`]: LootPool::insert
    pub fn set(&mut self, item: &T, weight: f64) -> Result<bool, PoolError> {
        let scaled = Self::scale(weight)?;
        let Some(pos) = self.entries.iter().position(|e| e.item == *item) else {
            return Ok(false);
        };

        let old = self.entries[pos].scaled;
        let total = self
            .total
            .checked_sub(old)
            .and_then(|t| t.checked_add(scaled))
            .ok_or(PoolError::InvalidWeight(weight))?;

        self.entries[pos].scaled = scaled;
        // Stable sort: equal-weight entries keep their relative order.
        self.entries.sort_by(|a, b| b.scaled.cmp(&a.scaled));
        self.total = total;
        Ok(true)
    }

    /// Remove the first entry equal to `item` in sort order (the highest
    /// weight among duplicates). Returns the removed entry, or `None` when
    /// no entry matches.
    pub fn remove(&mut self, item: &T) -> Option<Entry<T>> {
        let pos = self.entries.iter().position(|e| e.item == *item)?;
        let entry = self.entries.remove(pos);
        self.total -= entry.scaled;
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights(pool: &LootPool<&'static str>) -> Vec<f64> {
        pool.list_items(false).iter().map(|(_, w)| *w).collect()
    }

    fn items(pool: &LootPool<&'static str>) -> Vec<&'static str> {
        pool.list_items(false).iter().map(|(i, _)| **i).collect()
    }

    #[test]
    fn insert_keeps_descending_order() {
        let mut pool = LootPool::new();
        pool.insert("mid", 10.0).unwrap();
        pool.insert("rare", 0.5).unwrap();
        pool.insert("common", 50.0).unwrap();
        pool.insert("uncommon", 5.0).unwrap();

        assert_eq!(items(&pool), ["common", "mid", "uncommon", "rare"]);
        assert_eq!(weights(&pool), [50.0, 10.0, 5.0, 0.5]);
        assert!((pool.total_weight() - 65.5).abs() < 1e-9);
    }

    #[test]
    fn insert_places_new_entry_ahead_of_equal_weights() {
        let mut pool = LootPool::new();
        pool.insert("old", 5.0).unwrap();
        pool.insert("new", 5.0).unwrap();
        assert_eq!(items(&pool), ["new", "old"]);
    }

    #[test]
    fn insert_rejects_bad_weights() {
        let mut pool = LootPool::new();
        pool.insert("a", 1.0).unwrap();
        for w in [0.0, -3.0, f64::NAN, f64::INFINITY, 1e-12] {
            let err = pool.insert("bad", w).unwrap_err();
            assert!(matches!(err, PoolError::InvalidWeight(_)), "weight {w}");
        }
        assert_eq!(pool.len(), 1);
        assert!((pool.total_weight() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn set_updates_weight_and_resorts() {
        let mut pool = LootPool::new();
        pool.insert("a", 50.0).unwrap();
        pool.insert("b", 30.0).unwrap();
        pool.insert("c", 20.0).unwrap();

        assert!(pool.set(&"c", 40.0).unwrap());
        assert_eq!(items(&pool), ["a", "c", "b"]);
        assert!((pool.total_weight() - 120.0).abs() < 1e-9);
    }

    #[test]
    fn set_on_missing_item_is_a_noop() {
        let mut pool = LootPool::new();
        pool.insert("a", 50.0).unwrap();

        assert!(!pool.set(&"ghost", 10.0).unwrap());
        assert_eq!(pool.len(), 1);
        assert!((pool.total_weight() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn set_rejects_bad_weight_even_when_item_missing() {
        let mut pool: LootPool<&str> = LootPool::new();
        let err = pool.set(&"ghost", -1.0).unwrap_err();
        assert_eq!(err, PoolError::InvalidWeight(-1.0));
    }

    #[test]
    fn set_touches_only_the_first_duplicate() {
        let mut pool = LootPool::new();
        pool.insert("a", 10.0).unwrap();
        pool.insert("a", 5.0).unwrap();

        assert!(pool.set(&"a", 7.0).unwrap());
        assert_eq!(weights(&pool), [7.0, 5.0]);
        assert!((pool.total_weight() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn remove_returns_heaviest_duplicate_first() {
        let mut pool = LootPool::new();
        pool.insert("a", 10.0).unwrap();
        pool.insert("b", 8.0).unwrap();
        pool.insert("a", 5.0).unwrap();

        let removed = pool.remove(&"a").expect("present");
        assert_eq!(removed.item(), &"a");
        assert!((removed.weight() - 10.0).abs() < 1e-9);
        assert_eq!(weights(&pool), [8.0, 5.0]);

        assert!(pool.remove(&"ghost").is_none());
    }

    #[test]
    fn insert_then_remove_restores_the_pool() {
        let mut pool = LootPool::new();
        pool.insert("a", 50.0).unwrap();
        pool.insert("b", 30.0).unwrap();
        let before: Vec<(&str, f64)> = pool
            .list_items(false)
            .iter()
            .map(|(i, w)| (**i, *w))
            .collect();

        pool.insert("c", 12.5).unwrap();
        let removed = pool.remove(&"c").expect("present");
        assert!((removed.weight() - 12.5).abs() < 1e-9);

        let after: Vec<(&str, f64)> = pool
            .list_items(false)
            .iter()
            .map(|(i, w)| (**i, *w))
            .collect();
        assert_eq!(before, after);
        assert!((pool.total_weight() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn remove_if_removes_every_match() {
        let mut pool = LootPool::new();
        for (item, w) in [
            ("keep1", 9.0),
            ("drop1", 8.0),
            ("drop2", 7.0),
            ("keep2", 6.0),
            ("drop3", 5.0),
        ] {
            pool.insert(item, w).unwrap();
        }

        let removed = pool.remove_if(|item| item.starts_with("drop"));
        assert_eq!(removed, 3);
        assert_eq!(items(&pool), ["keep1", "keep2"]);
        assert!((pool.total_weight() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn list_items_as_percentages() {
        let mut pool = LootPool::new();
        pool.insert("a", 50.0).unwrap();
        pool.insert("b", 30.0).unwrap();
        pool.insert("c", 20.0).unwrap();

        let pct: Vec<f64> = pool.list_items(true).iter().map(|(_, p)| *p).collect();
        assert!((pct[0] - 50.0).abs() < 1e-9);
        assert!((pct[1] - 30.0).abs() < 1e-9);
        assert!((pct[2] - 20.0).abs() < 1e-9);
    }

    #[test]
    fn fractional_weights_survive_the_round_trip() {
        let mut pool = LootPool::new();
        pool.insert("a", 0.125).unwrap();
        pool.insert("b", 2.75).unwrap();

        assert_eq!(weights(&pool), [2.75, 0.125]);
        assert!((pool.total_weight() - 2.875).abs() < 1e-9);
    }
}
