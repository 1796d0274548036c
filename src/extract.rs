//! Feature extraction pipeline.
//!
//! The [`FeatureExtractor`] turns a [`GlucoseSeries`] into a feature table in
//! one of two modes:
//!
//! - **Fixed-hour**: every midnight-anchored window above the fixed-hour
//!   coverage threshold is resampled onto the 5 minute grid and yields one
//!   `{subject}_win{n}` row.
//! - **Random-day**: anchors are shuffled and the first window above the
//!   random-day coverage threshold is gap-filled and yields the subject's
//!   single row. A subject without such a window gets an all-absent row.
//!
//! # Example
//!
//! ```rust
//! use cgmetrics::{ExtractionConfig, FeatureExtractor, GlucoseSeries, Sample};
//! use chrono::{Duration, NaiveDate};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let samples = (0..576)
//!     .map(|i| Sample::new(start + Duration::minutes(5 * i), 110.0 + (i % 24) as f64))
//!     .collect();
//! let series = GlucoseSeries::with_subject("p01", samples);
//!
//! let extractor = FeatureExtractor::new(ExtractionConfig::default().with_seed(42)).unwrap();
//! let table = extractor.fixed_hour(&series).unwrap();
//! assert_eq!(table.ids(), vec!["p01_win1", "p01_win2"]);
//!
//! let day = extractor.random_day_seeded(&series).unwrap();
//! assert_eq!(day.len(), 1);
//! ```

use crate::config::{ExtractionConfig, NumericPolicy};
use crate::error::{CgmError, Result};
use crate::features::WindowFeatures;
use crate::interpolate::interpolate_samples;
use crate::resample::Resampler;
use crate::series::{GlucoseSeries, Sample};
use crate::table::{FeatureRow, FeatureTable, FixedHourRow, RandomDayRow};
use crate::window::WindowSelector;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Windowing and metric pipeline.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    config: ExtractionConfig,
    selector: WindowSelector,
    resampler: Resampler,
}

impl FeatureExtractor {
    /// Create an extractor after validating `config`.
    pub fn new(config: ExtractionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            selector: WindowSelector::new(&config),
            resampler: Resampler::new(config.sampling_interval_minutes),
            config,
        })
    }

    /// Get current configuration.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Window selector in use.
    pub fn selector(&self) -> &WindowSelector {
        &self.selector
    }

    /// One row per accepted midnight-anchored window.
    pub fn fixed_hour(&self, series: &GlucoseSeries) -> Result<FeatureTable<FixedHourRow>> {
        self.check_input(series)?;

        let windows = self.selector.fixed_hour(series);
        let mut table = FeatureTable::new();
        for window in &windows {
            let resampled = self.resampler.resample(window.samples(series));
            let features = self.compute(&resampled);
            let row = FixedHourRow::new(series.label(), window.number, features);
            table.push(self.enforce(row)?);
        }

        info!(
            "{}: {} fixed-hour rows from {} anchors",
            series.label(),
            table.len(),
            self.selector.anchors(series).len()
        );
        Ok(table)
    }

    /// The subject's single random-day row, drawing the day with `rng`.
    pub fn random_day<R: Rng + ?Sized>(
        &self,
        series: &GlucoseSeries,
        rng: &mut R,
    ) -> Result<FeatureTable<RandomDayRow>> {
        self.check_input(series)?;

        let row = match self.selector.random_day(series, rng) {
            Some(window) => {
                let filled = interpolate_samples(window.samples(series));
                RandomDayRow::new(series.label(), self.compute(&filled))
            }
            None => {
                warn!("{}: no day qualifies, emitting empty row", series.label());
                RandomDayRow::empty(series.label())
            }
        };

        let mut table = FeatureTable::new();
        table.push(self.enforce(row)?);
        Ok(table)
    }

    /// [`random_day`](Self::random_day) with a generator seeded from the
    /// config, or from OS entropy when no seed is set.
    pub fn random_day_seeded(&self, series: &GlucoseSeries) -> Result<FeatureTable<RandomDayRow>> {
        let mut rng = self.rng();
        self.random_day(series, &mut rng)
    }

    /// Fixed-hour tables of every subject, concatenated in input order.
    pub fn fixed_hour_batch(&self, subjects: &[GlucoseSeries]) -> Result<FeatureTable<FixedHourRow>> {
        let mut table = FeatureTable::new();
        for series in subjects {
            table.append(self.fixed_hour(series)?);
        }
        debug!("batch: {} subjects, {} rows", subjects.len(), table.len());
        Ok(table)
    }

    /// Random-day rows of every subject in input order, sharing one generator.
    pub fn random_day_batch<R: Rng + ?Sized>(
        &self,
        subjects: &[GlucoseSeries],
        rng: &mut R,
    ) -> Result<FeatureTable<RandomDayRow>> {
        let mut table = FeatureTable::new();
        for series in subjects {
            table.append(self.random_day(series, rng)?);
        }
        Ok(table)
    }

    /// Generator for the seeded variants.
    pub fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn compute(&self, samples: &[Sample]) -> WindowFeatures {
        let glucose: Vec<f64> = samples.iter().map(|s| s.glucose).collect();
        WindowFeatures::compute(&glucose, self.config.band_sd, self.config.sampling_rate())
    }

    fn check_input(&self, series: &GlucoseSeries) -> Result<()> {
        let fail_fast = self.config.numeric_policy == NumericPolicy::FailFast;
        if self.config.validate_input || fail_fast {
            series.validate(fail_fast)?;
        }
        Ok(())
    }

    fn enforce<R: FeatureRow>(&self, row: R) -> Result<R> {
        if self.config.numeric_policy == NumericPolicy::FailFast {
            if let Some(column) = row.undefined_column() {
                return Err(CgmError::UndefinedMetric {
                    row: row.id().to_string(),
                    column,
                });
            }
        }
        Ok(row)
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        let config = ExtractionConfig::default();
        Self {
            selector: WindowSelector::new(&config),
            resampler: Resampler::new(config.sampling_interval_minutes),
            config,
        }
    }
}
