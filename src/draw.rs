//! Luck-biased drawing.
//!
//! Each attempt draws \( u \sim \mathrm{U}[0, 1) \) and turns it into a target mass
//!
//! \[
//! t = \max\bigl(\epsilon,\ W - \lfloor W \cdot u^{f/\ell} \rfloor\bigr)
//! \]
//!
//! where \( W \) is the pool's total weight in fixed-point units, \( f \) the
//! pool's curve exponent, and \( \ell \) the caller's luck. Entries are then
//! scanned from the low-weight end accumulating cumulative weight; the first
//! entry whose band contains \( t \) wins the attempt. Raising \( \ell \)
//! flattens the exponent toward zero, which pulls \( t \) toward small values
//! and therefore toward the rare end of the scan.
//!
//! A call makes `retries` independent attempts and keeps the lowest-weight
//! candidate, so retries amplify the luck bias by order-statistic selection.
//!
//! Notes:
//! - `draw_with_rng` exists where determinism matters (tests/benches).
//! - `draw` uses the thread RNG and is not reproducible across processes by design.

use log::trace;
use rand::prelude::*;

use crate::pool::{LootPool, PoolError};

/// Luck used when a caller has no opinion: no bias beyond the pool's curve.
pub const DEFAULT_LUCK: f64 = 1.0;

/// Attempts per draw when a caller has no opinion.
pub const DEFAULT_RETRIES: u32 = 1;

// Lower clamp for the caller's luck; keeps the exponent finite.
const MIN_LUCK: f64 = 0.01;

// Floor for the target mass so an extreme `u` can never produce target zero.
const TARGET_FLOOR: f64 = 0.001;

/// One draw result: the winning item, its un-scaled weight, and its position
/// in the pool's (descending) order at draw time.
#[derive(Debug, Clone, Copy)]
pub struct Draw<'a, T> {
    pub item: &'a T,
    pub weight: f64,
    pub index: usize,
}

impl<T> LootPool<T> {
    /// Draw one item using the thread RNG. See [`draw_with_rng`].
    ///
    /// [`draw_with_rng`]: LootPool::draw_with_rng
    pub fn draw(&self, luck: f64, retries: u32) -> Result<Draw<'_, T>, PoolError> {
        let mut rng = rand::rng();
        self.draw_with_rng(luck, retries, &mut rng)
    }

    /// Draw one item, keeping the rarest candidate across `retries` attempts.
    ///
    /// `luck` is clamped to `>= 0.01` (a NaN clamps too) and `retries` to
    /// `>= 1`. Returns [`PoolError::EmptyPool`] when the pool has zero total
    /// weight.
    pub fn draw_with_rng<R: Rng + ?Sized>(
        &self,
        luck: f64,
        retries: u32,
        rng: &mut R,
    ) -> Result<Draw<'_, T>, PoolError> {
        if self.total == 0 {
            return Err(PoolError::EmptyPool);
        }

        let luck = luck.max(MIN_LUCK);
        let retries = retries.max(1);
        let exponent = self.luck_factor / luck;
        let total = self.total as f64;

        let mut best: Option<Draw<'_, T>> = None;
        for _ in 0..retries {
            let u: f64 = rng.random();
            let target = (total - (total * u.powf(exponent)).floor()).max(TARGET_FLOOR);

            let candidate = self.band_containing(target)?;
            let rarer = best.as_ref().map_or(true, |b| candidate.weight < b.weight);
            if rarer {
                best = Some(candidate);
            }
        }

        let best = best.ok_or(PoolError::InconsistentState(
            "draw finished with no candidate",
        ))?;
        trace!(
            "draw kept index {} (weight {}) after {retries} attempts",
            best.index,
            best.weight
        );
        Ok(best)
    }

    /// Map a target mass to the entry whose cumulative band contains it,
    /// scanning from the low-weight end. The sums are exact `u64` arithmetic,
    /// so the final band always reaches the pool total.
    fn band_containing(&self, target: f64) -> Result<Draw<'_, T>, PoolError> {
        let mut upper_bound = 0u64;
        for (index, entry) in self.entries.iter().enumerate().rev() {
            upper_bound += entry.scaled;
            if target <= upper_bound as f64 {
                return Ok(Draw {
                    item: entry.item(),
                    weight: entry.weight(),
                    index,
                });
            }
        }
        Err(PoolError::InconsistentState(
            "target above total cumulative weight",
        ))
    }
}
