//! Fixed-interval median resampling.
//!
//! Regularizes a window onto a grid anchored at midnight of the first
//! reading's day. Buckets are left-closed and labeled by their left edge; a
//! bucket takes the median of its present readings. Buckets with no present
//! reading become absent samples, so the output always has one entry per
//! grid step between the first and last reading.

use crate::metrics::stats::nan_median;
use crate::series::Sample;
use chrono::{Duration, NaiveDateTime, NaiveTime};

/// Median resampler onto a fixed grid.
#[derive(Debug, Clone, Copy)]
pub struct Resampler {
    interval_ms: i64,
}

impl Resampler {
    /// Create a resampler with the given grid step in minutes.
    pub fn new(interval_minutes: u32) -> Self {
        Self {
            interval_ms: i64::from(interval_minutes.max(1)) * 60_000,
        }
    }

    /// Grid step.
    pub fn interval(&self) -> Duration {
        Duration::milliseconds(self.interval_ms)
    }

    /// Resample `samples` (sorted) onto the grid.
    pub fn resample(&self, samples: &[Sample]) -> Vec<Sample> {
        let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
            return Vec::new();
        };

        let origin = first.time.date().and_time(NaiveTime::MIN);
        let first_bucket = self.bucket_index(origin, first.time);
        let last_bucket = self.bucket_index(origin, last.time);
        let n_buckets = (last_bucket - first_bucket + 1).max(0) as usize;

        let mut buckets: Vec<Vec<f64>> = vec![Vec::new(); n_buckets];
        for sample in samples {
            let slot = (self.bucket_index(origin, sample.time) - first_bucket) as usize;
            buckets[slot].push(sample.glucose);
        }

        buckets
            .iter()
            .enumerate()
            .map(|(i, values)| {
                let label = origin + Duration::milliseconds((first_bucket + i as i64) * self.interval_ms);
                Sample::new(label, nan_median(values))
            })
            .collect()
    }

    /// Left edge of the bucket holding `time`, for a grid anchored at
    /// `origin`.
    pub fn bucket_start(&self, origin: NaiveDateTime, time: NaiveDateTime) -> NaiveDateTime {
        origin + Duration::milliseconds(self.bucket_index(origin, time) * self.interval_ms)
    }

    fn bucket_index(&self, origin: NaiveDateTime, time: NaiveDateTime) -> i64 {
        (time - origin).num_milliseconds().div_euclid(self.interval_ms)
    }
}

impl Default for Resampler {
    fn default() -> Self {
        Self::new(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn base() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_exact_grid_is_identity() {
        let samples: Vec<Sample> = (0..288)
            .map(|i| Sample::new(base() + Duration::minutes(5 * i), 80.0 + (i % 37) as f64 * 3.5))
            .collect();

        let resampled = Resampler::default().resample(&samples);
        assert_eq!(resampled, samples);
    }

    #[test]
    fn test_median_per_bucket() {
        let samples = vec![
            Sample::new(base() + Duration::seconds(10), 100.0),
            Sample::new(base() + Duration::seconds(70), 120.0),
            Sample::new(base() + Duration::seconds(200), 90.0),
            Sample::new(base() + Duration::seconds(310), 140.0),
        ];

        let resampled = Resampler::default().resample(&samples);
        assert_eq!(resampled.len(), 2);
        assert_eq!(resampled[0].time, base());
        assert_eq!(resampled[0].glucose, 100.0);
        assert_eq!(resampled[1].time, base() + Duration::minutes(5));
        assert_eq!(resampled[1].glucose, 140.0);
    }

    #[test]
    fn test_even_bucket_takes_middle_mean() {
        let samples = vec![
            Sample::new(base() + Duration::minutes(1), 100.0),
            Sample::new(base() + Duration::minutes(2), 110.0),
        ];
        let resampled = Resampler::default().resample(&samples);
        assert_eq!(resampled.len(), 1);
        assert_eq!(resampled[0].glucose, 105.0);
    }

    #[test]
    fn test_gaps_become_absent() {
        let samples = vec![
            Sample::new(base(), 100.0),
            Sample::new(base() + Duration::minutes(20), 130.0),
        ];

        let resampled = Resampler::default().resample(&samples);
        assert_eq!(resampled.len(), 5);
        assert_eq!(resampled[0].glucose, 100.0);
        assert!(resampled[1..4].iter().all(|s| !s.is_present()));
        assert_eq!(resampled[4].glucose, 130.0);
    }

    #[test]
    fn test_grid_is_anchored_at_midnight() {
        let start = base() + Duration::minutes(23 * 60 + 58);
        let samples = vec![
            Sample::new(start, 100.0),
            Sample::new(start + Duration::minutes(5), 110.0),
        ];

        let resampled = Resampler::default().resample(&samples);
        assert_eq!(resampled[0].time, base() + Duration::minutes(23 * 60 + 55));
        assert_eq!(resampled[1].time, base() + Duration::minutes(24 * 60));
    }

    #[test]
    fn test_empty_input() {
        assert!(Resampler::default().resample(&[]).is_empty());
    }

    #[test]
    fn test_bucket_start() {
        let resampler = Resampler::new(15);
        let t = base() + Duration::minutes(37);
        assert_eq!(resampler.bucket_start(base(), t), base() + Duration::minutes(30));
        assert_eq!(resampler.interval(), Duration::minutes(15));
    }
}
