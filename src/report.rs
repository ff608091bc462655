//! Bulk draws and distribution reporting.
//!
//! [`draw_many`] folds repeated draws into per-item tallies. [`sample_report`]
//! is the diagnostic flavor: it tracks a counter for every pool entry (zero
//! counts included) and writes an estimated-vs-observed rarity table to a
//! caller-supplied sink.
//!
//! [`draw_many`]: LootPool::draw_many
//! [`sample_report`]: LootPool::sample_report

use std::io;

use log::debug;
use rand::prelude::*;

use crate::pool::{LootPool, PoolError};

/// Occurrence tally for one item: its (last-seen) weight and draw count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tally<'a, T> {
    pub item: &'a T,
    pub weight: f64,
    pub count: u64,
}

/// Errors from the reporting layer.
#[derive(Debug)]
pub enum ReportError {
    /// The underlying draw failed.
    Pool(PoolError),
    /// Writing to the report sink failed.
    Io(io::Error),
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pool(e) => write!(f, "draw failed: {e}"),
            Self::Io(e) => write!(f, "report sink failed: {e}"),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Pool(e) => Some(e),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<PoolError> for ReportError {
    fn from(e: PoolError) -> Self {
        Self::Pool(e)
    }
}

impl From<io::Error> for ReportError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl<T: PartialEq> LootPool<T> {
    /// [`draw_many_with_rng`] with the thread RNG.
    ///
    /// [`draw_many_with_rng`]: LootPool::draw_many_with_rng
    pub fn draw_many(
        &self,
        count: usize,
        luck: f64,
        retries: u32,
    ) -> Result<Vec<Tally<'_, T>>, PoolError> {
        let mut rng = rand::rng();
        self.draw_many_with_rng(count, luck, retries, &mut rng)
    }

    /// Perform `count` draws, tallying occurrences per distinct item.
    ///
    /// Items are grouped by equality (no hashing), so duplicate pool entries
    /// with equal items fold into one tally whose weight is the last one
    /// drawn. A `count` of zero yields an empty tally without touching the
    /// RNG.
    pub fn draw_many_with_rng<R: Rng + ?Sized>(
        &self,
        count: usize,
        luck: f64,
        retries: u32,
        rng: &mut R,
    ) -> Result<Vec<Tally<'_, T>>, PoolError> {
        let mut tallies: Vec<Tally<'_, T>> = Vec::new();
        for _ in 0..count {
            let drawn = self.draw_with_rng(luck, retries, rng)?;
            match tallies.iter_mut().find(|t| *t.item == *drawn.item) {
                Some(t) => {
                    t.count += 1;
                    t.weight = drawn.weight;
                }
                None => tallies.push(Tally {
                    item: drawn.item,
                    weight: drawn.weight,
                    count: 1,
                }),
            }
        }
        Ok(tallies)
    }
}

impl<T> LootPool<T> {
    /// [`sample_report_with_rng`] with the thread RNG.
    ///
    /// [`sample_report_with_rng`]: LootPool::sample_report_with_rng
    pub fn sample_report<F, W>(
        &self,
        count: usize,
        luck: f64,
        retries: u32,
        label: F,
        out: &mut W,
    ) -> Result<Vec<Tally<'_, T>>, ReportError>
    where
        F: FnMut(&T) -> String,
        W: io::Write + ?Sized,
    {
        let mut rng = rand::rng();
        self.sample_report_with_rng(count, luck, retries, label, out, &mut rng)
    }

    /// Draw `count` times and write an estimated-vs-observed rarity table.
    ///
    /// Every pool entry gets a row (zero counts included), sorted descending
    /// by weight: the caller-formatted label, the observed count, the
    /// estimated rarity (`weight / total`, percent) and the sampled rarity
    /// (`count / draws`, percent). The rows are also returned so callers can
    /// assert on them without parsing text.
    pub fn sample_report_with_rng<R, F, W>(
        &self,
        count: usize,
        luck: f64,
        retries: u32,
        mut label: F,
        out: &mut W,
        rng: &mut R,
    ) -> Result<Vec<Tally<'_, T>>, ReportError>
    where
        R: Rng + ?Sized,
        F: FnMut(&T) -> String,
        W: io::Write + ?Sized,
    {
        let mut rows: Vec<Tally<'_, T>> = self
            .entries
            .iter()
            .map(|e| Tally {
                item: e.item(),
                weight: e.weight(),
                count: 0,
            })
            .collect();

        // Counting is index-based, so duplicate items stay distinct rows.
        for _ in 0..count {
            let drawn = self.draw_with_rng(luck, retries, rng)?;
            rows[drawn.index].count += 1;
        }

        rows.sort_by(|a, b| b.weight.total_cmp(&a.weight));

        let total = self.total_weight();
        let draws = count.max(1) as f64;
        writeln!(
            out,
            "{:<24} {:>8} {:>12} {:>12}",
            "item", "count", "estimated", "sampled"
        )?;
        for row in &rows {
            writeln!(
                out,
                "{:<24} {:>8} {:>11.2}% {:>11.2}%",
                label(row.item),
                row.count,
                row.weight / total * 100.0,
                row.count as f64 / draws * 100.0,
            )?;
        }
        debug!("sample report: {count} draws over {} entries", rows.len());

        Ok(rows)
    }
}
