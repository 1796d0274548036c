//! Distribution summaries and single-formula indices.

use super::stats::{nan_max, nan_mean, nan_median, nan_min, nan_percentile, nan_std};
use crate::series::Sample;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Interday glucose summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlucoseSummary {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// First quartile.
    pub q1: f64,
    /// Third quartile.
    pub q3: f64,
}

/// Mean, median, extremes and quartiles of the glucose column.
pub fn summary(glucose: &[f64]) -> GlucoseSummary {
    GlucoseSummary {
        mean: nan_mean(glucose),
        median: nan_median(glucose),
        min: nan_min(glucose),
        max: nan_max(glucose),
        q1: nan_percentile(glucose, 25.0),
        q3: nan_percentile(glucose, 75.0),
    }
}

/// Population standard deviation of glucose across the whole record.
pub fn interday_sd(glucose: &[f64]) -> f64 {
    nan_std(glucose)
}

/// Coefficient of variation in percent: `100 * sd / mean`.
pub fn interday_cv(glucose: &[f64]) -> f64 {
    100.0 * nan_std(glucose) / nan_mean(glucose)
}

/// J-index: `0.001 * (mean + sd)^2`.
pub fn j_index(glucose: &[f64]) -> f64 {
    0.001 * (nan_mean(glucose) + nan_std(glucose)).powi(2)
}

/// Glucose management indicator (percent).
pub fn gmi(glucose: &[f64]) -> f64 {
    3.31 + 0.02392 * nan_mean(glucose)
}

/// ADA estimated HbA1c (percent).
pub fn ea1c(glucose: &[f64]) -> f64 {
    (46.7 + nan_mean(glucose)) / 28.7
}

/// Spread of a per-day statistic across calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailySpread {
    pub mean: f64,
    pub median: f64,
    pub sd: f64,
    pub days: usize,
}

impl DailySpread {
    fn from_daily(values: &[f64]) -> Self {
        Self {
            mean: nan_mean(values),
            median: nan_median(values),
            sd: nan_std(values),
            days: values.len(),
        }
    }
}

/// Per-day standard deviation, summarized across days.
pub fn intraday_sd(samples: &[Sample]) -> DailySpread {
    let daily: Vec<f64> = by_day(samples).values().map(|g| nan_std(g)).collect();
    DailySpread::from_daily(&daily)
}

/// Per-day coefficient of variation, summarized across days.
pub fn intraday_cv(samples: &[Sample]) -> DailySpread {
    let daily: Vec<f64> = by_day(samples)
        .values()
        .map(|g| 100.0 * nan_std(g) / nan_mean(g))
        .collect();
    DailySpread::from_daily(&daily)
}

fn by_day(samples: &[Sample]) -> BTreeMap<NaiveDate, Vec<f64>> {
    let mut days: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for sample in samples {
        days.entry(sample.time.date()).or_default().push(sample.glucose);
    }
    days
}
