// cgmetrics Testdata - Core generator
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Core dataset generation logic.
//!
//! Samples a [`SubjectProfile`] on a regular sensor clock, adding timing
//! jitter, meal-time variation, sensor noise and artifacts.

use crate::artifacts::Reading;
use crate::dataset::{Dataset, DatasetError, DatasetMetadata, DatasetRow};
use crate::profiles::{SubjectProfile, SENSOR_MAX, SENSOR_MIN};
use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

/// Generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Time of the first reading.
    pub start: NaiveDateTime,
    /// Interval between readings in seconds.
    pub sample_interval_secs: u32,
    /// Number of readings to generate.
    pub num_samples: usize,
    /// Maximum absolute clock jitter per reading, in seconds.
    pub jitter_secs: u32,
    /// Random seed for reproducibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2024, 2, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap_or_default(),
            sample_interval_secs: 300, // 5 minutes
            num_samples: 288,          // 1 day
            jitter_secs: 0,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Create a new generator config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the first reading's time.
    pub fn with_start(mut self, start: NaiveDateTime) -> Self {
        self.start = start;
        self
    }

    /// Set sample interval in seconds.
    pub fn with_sample_interval_secs(mut self, secs: u32) -> Self {
        self.sample_interval_secs = secs;
        self
    }

    /// Set number of samples.
    pub fn with_num_samples(mut self, n: usize) -> Self {
        self.num_samples = n;
        self
    }

    /// Set duration in days (calculates num_samples from interval).
    pub fn with_duration_days(mut self, days: f64) -> Self {
        let total_secs = days * 86_400.0;
        self.num_samples = (total_secs / self.sample_interval_secs as f64).ceil() as usize;
        self
    }

    /// Set clock jitter.
    pub fn with_jitter_secs(mut self, secs: u32) -> Self {
        self.jitter_secs = secs;
        self
    }

    /// Set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Nominal time of reading `i`, before jitter.
    pub fn nominal_time(&self, i: usize) -> NaiveDateTime {
        self.start + Duration::seconds(i as i64 * i64::from(self.sample_interval_secs))
    }
}

/// Generate one subject's record.
pub fn generate_subject(config: &GeneratorConfig, profile: &SubjectProfile) -> Result<Dataset, DatasetError> {
    let mut rng: Box<dyn RngCore> = match config.seed {
        Some(s) => Box::new(StdRng::seed_from_u64(s)),
        None => Box::new(StdRng::from_entropy()),
    };
    let mut dataset = sample_profile(config, profile, &mut *rng)?;
    dataset.metadata = metadata(config);
    Ok(dataset)
}

/// Generate a multi-subject record, subjects one after another, each tagged
/// with its ID.
pub fn generate_cohort(config: &GeneratorConfig, profiles: &[SubjectProfile]) -> Result<Dataset, DatasetError> {
    let mut rng: Box<dyn RngCore> = match config.seed {
        Some(s) => Box::new(StdRng::seed_from_u64(s)),
        None => Box::new(StdRng::from_entropy()),
    };

    let mut dataset = Dataset::new();
    for profile in profiles {
        dataset.extend(sample_profile(config, profile, &mut *rng)?);
    }
    dataset.metadata = metadata(config);
    Ok(dataset)
}

fn metadata(config: &GeneratorConfig) -> DatasetMetadata {
    DatasetMetadata {
        name: None,
        description: None,
        seed: config.seed,
        sample_interval_secs: Some(config.sample_interval_secs),
    }
}

fn sample_profile(
    config: &GeneratorConfig,
    profile: &SubjectProfile,
    rng: &mut dyn RngCore,
) -> Result<Dataset, DatasetError> {
    let noise = Normal::new(0.0, profile.noise_std)
        .map_err(|e| DatasetError::InvalidProfile(format!("noise_std: {}", e)))?;
    let meal_jitter = Normal::new(0.0, profile.meal_jitter_min)
        .map_err(|e| DatasetError::InvalidProfile(format!("meal_jitter_min: {}", e)))?;

    let mut dataset = Dataset::new();
    let mut current_day: Option<NaiveDate> = None;
    let mut meal_offsets: Vec<f64> = Vec::new();

    for i in 0..config.num_samples {
        let nominal = config.nominal_time(i);

        // New meal schedule for every calendar day
        if current_day != Some(nominal.date()) {
            current_day = Some(nominal.date());
            meal_offsets = profile.meals.iter().map(|_| meal_jitter.sample(&mut *rng)).collect();
        }

        let jitter = if config.jitter_secs > 0 {
            let j = i64::from(config.jitter_secs);
            rng.gen_range(-j..=j)
        } else {
            0
        };
        let time = nominal + Duration::seconds(jitter);

        let minute = f64::from(time.num_seconds_from_midnight()) / 60.0;
        let clean = profile.glucose_at(minute, &meal_offsets) + noise.sample(&mut *rng);

        let reading = profile
            .artifacts
            .iter()
            .filter(|a| a.is_active(i))
            .fold(Reading::Value(clean), |reading, artifact| match reading {
                Reading::Value(v) => artifact.apply(v, &mut *rng),
                other => other,
            });

        let glucose = match reading {
            Reading::Value(v) => Some(v.clamp(SENSOR_MIN, SENSOR_MAX).round()),
            Reading::Missing => None,
            Reading::Dropped => continue,
        };
        dataset.add_row(DatasetRow::new(time, glucose).with_id(&profile.id));
    }

    Ok(dataset)
}
