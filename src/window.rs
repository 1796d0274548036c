//! Midnight-aligned window selection.
//!
//! An anchor is any sample within the configured tolerance of local
//! midnight. Each anchor opens a half-open window `[anchor, anchor + length)`
//! which is kept only if it holds more samples than the coverage threshold.

use crate::config::{ExtractionConfig, MAX_WINDOW_HOURS, SECONDS_PER_DAY};
use crate::series::{GlucoseSeries, Sample};
use chrono::{Duration, NaiveDateTime};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::Range;

/// A candidate window over a series.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    /// 1-based position of the anchor among all anchors of the series.
    pub number: u32,
    /// Anchor timestamp (inclusive).
    pub start: NaiveDateTime,
    /// Window end (exclusive).
    pub end: NaiveDateTime,
    /// Sample indices inside the window.
    pub range: Range<usize>,
}

impl Window {
    /// Number of samples inside the window.
    pub fn count(&self) -> usize {
        self.range.len()
    }

    /// The window's samples.
    pub fn samples<'a>(&self, series: &'a GlucoseSeries) -> &'a [Sample] {
        &series.samples()[self.range.clone()]
    }

    /// Whether the window holds strictly more than `threshold` samples.
    pub fn is_covered(&self, threshold: f64) -> bool {
        self.count() as f64 > threshold
    }
}

/// Enumerates and filters windows according to an [`ExtractionConfig`].
#[derive(Debug, Clone)]
pub struct WindowSelector {
    length: Duration,
    tolerance_secs: u32,
    fixed_hour_threshold: f64,
    random_day_threshold: f64,
}

impl WindowSelector {
    /// Create a selector from the extraction config.
    ///
    /// The config is not validated here; the window length is capped at
    /// [`MAX_WINDOW_HOURS`] and a tolerance of half a day or more makes every
    /// sample an anchor.
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            length: Duration::hours(i64::from(config.window_hours.min(MAX_WINDOW_HOURS))),
            tolerance_secs: config.anchor_tolerance_secs,
            fixed_hour_threshold: config.coverage_threshold(config.fixed_hour_coverage),
            random_day_threshold: config.coverage_threshold(config.random_day_coverage),
        }
    }

    /// Window length.
    pub fn length(&self) -> Duration {
        self.length
    }

    /// Minimum exclusive sample count for fixed-hour windows.
    pub fn fixed_hour_threshold(&self) -> f64 {
        self.fixed_hour_threshold
    }

    /// Minimum exclusive sample count for random-day windows.
    pub fn random_day_threshold(&self) -> f64 {
        self.random_day_threshold
    }

    /// Whether `sample` lies in the band around midnight.
    pub fn is_anchor(&self, sample: &Sample) -> bool {
        let secs = sample.seconds_from_midnight();
        secs >= SECONDS_PER_DAY.saturating_sub(self.tolerance_secs) || secs < self.tolerance_secs
    }

    /// Indices of every anchor sample, in time order.
    pub fn anchors(&self, series: &GlucoseSeries) -> Vec<usize> {
        series
            .samples()
            .iter()
            .enumerate()
            .filter(|(_, s)| self.is_anchor(s))
            .map(|(i, _)| i)
            .collect()
    }

    /// Window opened by the anchor at sample index `anchor`.
    pub fn window_at(&self, series: &GlucoseSeries, number: u32, anchor: usize) -> Window {
        let start = series.samples()[anchor].time;
        let end = start + self.length;
        Window {
            number,
            start,
            end,
            range: series.range_between(start, end),
        }
    }

    /// Every candidate window, one per anchor, numbered from 1.
    pub fn candidates(&self, series: &GlucoseSeries) -> Vec<Window> {
        self.anchors(series)
            .into_iter()
            .zip(1..)
            .map(|(anchor, number)| self.window_at(series, number, anchor))
            .collect()
    }

    /// Fixed-hour mode: every candidate above the fixed-hour coverage
    /// threshold, in time order. Rejected candidates keep their number.
    pub fn fixed_hour(&self, series: &GlucoseSeries) -> Vec<Window> {
        self.candidates(series)
            .into_iter()
            .filter(|w| {
                let accepted = w.is_covered(self.fixed_hour_threshold);
                debug!(
                    "{} win{} at {}: {} samples, threshold {:.1}, {}",
                    series.label(),
                    w.number,
                    w.start,
                    w.count(),
                    self.fixed_hour_threshold,
                    if accepted { "accepted" } else { "rejected" }
                );
                accepted
            })
            .collect()
    }

    /// Random-day mode: shuffle the candidates with `rng` and return the
    /// first one above the random-day coverage threshold.
    pub fn random_day<R: Rng + ?Sized>(&self, series: &GlucoseSeries, rng: &mut R) -> Option<Window> {
        let mut candidates = self.candidates(series);
        candidates.shuffle(rng);

        let chosen = candidates
            .into_iter()
            .find(|w| w.is_covered(self.random_day_threshold));
        match &chosen {
            Some(w) => debug!(
                "{}: random day win{} at {} with {} samples",
                series.label(),
                w.number,
                w.start,
                w.count()
            ),
            None => debug!("{}: no window above {:.1} samples", series.label(), self.random_day_threshold),
        }
        chosen
    }
}

impl Default for WindowSelector {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn midnight() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn regular(start: NaiveDateTime, n: i64) -> GlucoseSeries {
        let samples = (0..n)
            .map(|i| Sample::new(start + Duration::minutes(5 * i), 100.0 + (i % 50) as f64))
            .collect();
        GlucoseSeries::with_subject("s1", samples)
    }

    #[test]
    fn test_anchor_band() {
        let selector = WindowSelector::default();
        let at = |h, m, s| Sample::new(midnight().date().and_hms_opt(h, m, s).unwrap(), 100.0);

        assert!(selector.is_anchor(&at(0, 0, 0)));
        assert!(selector.is_anchor(&at(0, 2, 29)));
        assert!(!selector.is_anchor(&at(0, 2, 30)));
        assert!(selector.is_anchor(&at(23, 57, 30)));
        assert!(!selector.is_anchor(&at(23, 57, 29)));
        assert!(!selector.is_anchor(&at(12, 0, 0)));
    }

    #[test]
    fn test_unvalidated_config_does_not_panic() {
        let mut config = ExtractionConfig::default().with_window_hours(u32::MAX);
        config.anchor_tolerance_secs = 100_000;
        let selector = WindowSelector::new(&config);
        assert_eq!(selector.length(), Duration::hours(i64::from(MAX_WINDOW_HOURS)));

        let series = regular(midnight() + Duration::hours(12), 10);
        assert!(selector.is_anchor(&series.samples()[0]));
        let windows = selector.candidates(&series);
        assert_eq!(windows.len(), 10);
        assert_eq!(windows[0].count(), 10);
    }

    #[test]
    fn test_two_days_two_windows() {
        let series = regular(midnight(), 576);
        let selector = WindowSelector::default();

        assert_eq!(selector.anchors(&series), vec![0, 288]);
        let windows = selector.fixed_hour(&series);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].count(), 288);
        assert_eq!(windows[1].number, 2);
        assert_eq!(windows[1].range, 288..576);
        assert_eq!(windows[0].end, windows[1].start);
    }

    #[test]
    fn test_rejected_window_keeps_number() {
        // One and a half days: the second window is only half covered
        let series = regular(midnight(), 432);
        let windows = WindowSelector::default().fixed_hour(&series);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].number, 1);

        // Thin out the first day so only the second window survives
        let mut samples = regular(midnight(), 576).samples().to_vec();
        samples.drain(10..200);
        let sparse = GlucoseSeries::with_subject("s1", samples);
        let windows = WindowSelector::default().fixed_hour(&sparse);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].number, 2);
        assert_eq!(windows[0].count(), 288);
    }

    #[test]
    fn test_no_anchor_no_window() {
        let start = midnight() + Duration::minutes(7);
        let samples = (0..200)
            .map(|i| Sample::new(start + Duration::minutes(7 * i), 120.0))
            .filter(|s| !WindowSelector::default().is_anchor(s))
            .collect();
        let series = GlucoseSeries::new(samples);
        assert!(WindowSelector::default().fixed_hour(&series).is_empty());
    }

    #[test]
    fn test_coverage_is_strict() {
        let window = Window {
            number: 1,
            start: midnight(),
            end: midnight() + Duration::hours(24),
            range: 0..10,
        };
        assert!(window.is_covered(9.5));
        assert!(!window.is_covered(10.0));
    }

    #[test]
    fn test_random_day_is_seeded() {
        let series = regular(midnight(), 288 * 5 + 1);
        let selector = WindowSelector::default();

        let a = selector.random_day(&series, &mut StdRng::seed_from_u64(7));
        let b = selector.random_day(&series, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        // The last midnight opens a window with a single sample
        let chosen = a.unwrap();
        assert!(chosen.number <= 5);
        assert_eq!(chosen.count(), 288);
    }

    #[test]
    fn test_random_day_none_qualifies() {
        let series = regular(midnight(), 200);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(WindowSelector::default().random_day(&series, &mut rng).is_none());
    }
}
