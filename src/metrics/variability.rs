//! Day-over-day variability: MODD and CONGA24.
//!
//! Readings are grouped by minute of day; within a group consecutive readings
//! are (nominally) 24 hours apart. The per-minute value is the mean absolute
//! difference between them.

use super::stats::{nan_mean, nan_std};
use crate::series::Sample;
use chrono::{NaiveDateTime, Timelike};
use std::collections::HashMap;

/// Minute of day with the seconds rounded half-to-even onto the nearest
/// minute: `:30` rounds down, `:31` and later round up. `23:59:45` maps to
/// 1440, one past the last regular minute.
pub fn minute_of_day(time: NaiveDateTime) -> u32 {
    let carry = u32::from(time.second() > 30);
    time.hour() * 60 + time.minute() + carry
}

/// Mean absolute day-over-day difference for every minute of day present in
/// the series, in order of first appearance. Groups with a single reading or
/// a zero difference are reported as `NaN` (missing).
pub fn modd_per_minute(samples: &[Sample]) -> Vec<(u32, f64)> {
    let mut order: Vec<u32> = Vec::new();
    let mut groups: HashMap<u32, Vec<f64>> = HashMap::new();

    for sample in samples {
        let minute = minute_of_day(sample.time);
        groups
            .entry(minute)
            .or_insert_with(|| {
                order.push(minute);
                Vec::new()
            })
            .push(sample.glucose);
    }

    order
        .into_iter()
        .map(|minute| {
            let values = &groups[&minute];
            let diffs: Vec<f64> = values.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
            let value = nan_mean(&diffs);
            (minute, if value == 0.0 { f64::NAN } else { value })
        })
        .collect()
}

/// Mean of daily differences.
pub fn modd(samples: &[Sample]) -> f64 {
    let values: Vec<f64> = modd_per_minute(samples).into_iter().map(|(_, v)| v).collect();
    nan_mean(&values)
}

/// Continuous overall net glycemic action over 24 hours: population standard
/// deviation of the per-minute day-over-day differences, missing groups
/// omitted.
pub fn conga24(samples: &[Sample]) -> f64 {
    let values: Vec<f64> = modd_per_minute(samples).into_iter().map(|(_, v)| v).collect();
    nan_std(&values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn at(day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_minute_of_day_rounding() {
        assert_eq!(minute_of_day(at(1, 0, 0, 0)), 0);
        assert_eq!(minute_of_day(at(1, 1, 2, 29)), 62);
        assert_eq!(minute_of_day(at(1, 1, 2, 30)), 62);
        assert_eq!(minute_of_day(at(1, 1, 2, 31)), 63);
        assert_eq!(minute_of_day(at(1, 23, 59, 45)), 1440);
    }

    #[test]
    fn test_modd_per_minute_groups() {
        let samples = vec![
            Sample::new(at(1, 8, 0, 0), 100.0),
            Sample::new(at(1, 8, 5, 0), 110.0),
            Sample::new(at(2, 8, 0, 10), 130.0),
            Sample::new(at(2, 8, 5, 0), 110.0),
            Sample::new(at(3, 8, 0, 0), 120.0),
        ];

        let groups = modd_per_minute(&samples);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, 480);
        // |130-100| and |120-130|
        assert_eq!(groups[0].1, 20.0);
        // Identical readings are treated as missing
        assert_eq!(groups[1].0, 485);
        assert!(groups[1].1.is_nan());
    }

    #[test]
    fn test_modd_and_conga24() {
        let mut samples = Vec::new();
        for day in 1..=3 {
            samples.push(Sample::new(at(day, 6, 0, 0), 100.0 + 10.0 * day as f64));
            samples.push(Sample::new(at(day, 18, 0, 0), 100.0 + 30.0 * day as f64));
        }

        // Minute 360 differs by 10 per day, minute 1080 by 30
        assert!((modd(&samples) - 20.0).abs() < 1e-12);
        assert!((conga24(&samples) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_day_is_undefined() {
        let start = at(1, 0, 0, 0);
        let samples: Vec<Sample> = (0..288)
            .map(|i| Sample::new(start + Duration::minutes(5 * i), 120.0))
            .collect();
        assert!(modd(&samples).is_nan());
        assert!(conga24(&samples).is_nan());
    }
}
