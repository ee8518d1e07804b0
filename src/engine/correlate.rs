//! Lag cross-correlation and meal-to-symptom delay statistics

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Pearson cross-correlation of two aligned series over a symmetric lag
/// window. `lags` and `values` are parallel, lags ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct LagCorrelation {
    pub lags: Vec<i64>,
    pub values: Vec<f64>,
}

/// Sparse histogram of delays from each meal to the nearest following
/// symptom. `bins` are ascending with no duplicates and no zero counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelayHistogram {
    pub bins: Vec<i64>,
    pub counts: Vec<u64>,
}

impl DelayHistogram {
    pub fn empty() -> Self {
        Self {
            bins: Vec::new(),
            counts: Vec::new(),
        }
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Compute the normalized cross-correlation between `x` and `y` for every
/// integer lag in `[-max_lag, max_lag]`.
///
/// Positive lag compares `y[i + lag]` against `x[i]`: it probes whether the
/// second series changes `lag` minutes after the first. Each lag's value is
/// the Pearson correlation over the valid index pairs only; a lag with no
/// valid pairs, or where either side has zero variance over the overlap,
/// yields 0 rather than an error.
///
/// The output always has exactly `2 * max_lag + 1` entries.
pub fn cross_correlation(x: &[f64], y: &[f64], max_lag: i64) -> LagCorrelation {
    let max_lag = max_lag.max(0);
    let n = x.len().min(y.len()) as i64;

    let mut lags = Vec::with_capacity((2 * max_lag + 1) as usize);
    let mut values = Vec::with_capacity((2 * max_lag + 1) as usize);
    for lag in -max_lag..=max_lag {
        lags.push(lag);
        values.push(pearson_at_lag(x, y, lag, n));
    }

    LagCorrelation { lags, values }
}

/// Pearson correlation of the subsets `x[i]`, `y[i + lag]` over all `i`
/// with both indices in bounds.
fn pearson_at_lag(x: &[f64], y: &[f64], lag: i64, n: i64) -> f64 {
    let lo = 0.max(-lag);
    let hi = n.min(n - lag);
    if lo >= hi {
        return 0.0;
    }
    let count = (hi - lo) as f64;

    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    for i in lo..hi {
        mean_x += x[i as usize];
        mean_y += y[(i + lag) as usize];
    }
    mean_x /= count;
    mean_y /= count;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in lo..hi {
        let dx = x[i as usize] - mean_x;
        let dy = y[(i + lag) as usize] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }

    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

/// Bin the delay from each meal to the first symptom strictly after it.
///
/// Meals with no following symptom in the supplied window contribute
/// nothing (they are excluded, not zero-filled). The symptom batch should
/// extend past the nominal query end so meals late in the range can still
/// find their next symptom.
pub fn delay_histogram(
    meal_times: &[DateTime<Utc>],
    symptom_times: &[DateTime<Utc>],
    bin_size_minutes: f64,
) -> DelayHistogram {
    if bin_size_minutes <= 0.0 {
        return DelayHistogram::empty();
    }

    let mut symptoms = symptom_times.to_vec();
    symptoms.sort_unstable();

    let mut counts: BTreeMap<i64, u64> = BTreeMap::new();
    for meal in meal_times {
        let next = symptoms.partition_point(|s| s <= meal);
        if next == symptoms.len() {
            continue;
        }
        let delay_minutes = (symptoms[next] - *meal).num_seconds() as f64 / 60.0;
        let bin = (delay_minutes / bin_size_minutes).floor() as i64;
        *counts.entry(bin).or_insert(0) += 1;
    }

    DelayHistogram {
        bins: counts.keys().copied().collect(),
        counts: counts.values().copied().collect(),
    }
}
