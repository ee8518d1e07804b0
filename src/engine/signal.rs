//! Dense minute-resolution indicator signals over a closed date range

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::collections::HashSet;

pub const MINUTES_PER_DAY: i64 = 1440;

/// Minute-step index space spanning `start` 00:00 to `end` 23:59 UTC,
/// both dates inclusive.
///
/// Every signal built against the same grid has identical length and an
/// identical instant-to-index mapping; the correlation math relies on
/// aligned, equal-length vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeGrid {
    start_minute: i64,
    len: usize,
}

impl TimeGrid {
    /// Build the grid for a closed date range. An inverted range
    /// (`start > end`) yields a zero-length grid; callers are expected to
    /// reject inverted ranges before getting here.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        let start_minute = start.and_time(NaiveTime::MIN).and_utc().timestamp() / 60;
        let days = (end - start).num_days() + 1;
        let len = if days > 0 {
            (days * MINUTES_PER_DAY) as usize
        } else {
            0
        };
        Self { start_minute, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Grid index of a timestamp, or None when it falls outside the range.
    pub fn index_of(&self, timestamp: DateTime<Utc>) -> Option<usize> {
        let offset = timestamp.timestamp().div_euclid(60) - self.start_minute;
        if offset >= 0 && (offset as usize) < self.len {
            Some(offset as usize)
        } else {
            None
        }
    }
}

/// Build the dense 0/1 indicator series for one label's event timestamps.
///
/// A slot is 1.0 iff at least one event falls in that exact minute;
/// several events in the same minute collapse to a single 1.0 (presence is
/// modeled, not count). Events outside the grid contribute nothing.
pub fn build_indicator(grid: &TimeGrid, timestamps: &[DateTime<Utc>]) -> Vec<f64> {
    let mut minutes: HashSet<i64> = HashSet::with_capacity(timestamps.len());
    for ts in timestamps {
        minutes.insert(ts.timestamp().div_euclid(60));
    }

    let mut series = vec![0.0; grid.len()];
    for (i, slot) in series.iter_mut().enumerate() {
        if minutes.contains(&(grid.start_minute + i as i64)) {
            *slot = 1.0;
        }
    }
    series
}
