// cgmetrics Testdata - Subject profiles
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Glycemic subject profiles.
//!
//! A profile describes the noise-free glucose curve of one wearer: a fasting
//! baseline, a dawn-phenomenon wave and a set of daily meals, each producing
//! a gamma-shaped postprandial excursion.

use crate::artifacts::{ArtifactConfig, ArtifactType};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Physiological floor and ceiling of sensor output (mg/dL).
pub const SENSOR_MIN: f64 = 40.0;
pub const SENSOR_MAX: f64 = 400.0;

/// A daily meal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    /// Nominal meal time, minutes after midnight.
    pub minute_of_day: f64,
    /// Peak rise above baseline (mg/dL).
    pub peak_rise: f64,
    /// Minutes from meal to peak.
    pub time_to_peak: f64,
}

impl Meal {
    pub fn new(hour: f64, peak_rise: f64, time_to_peak: f64) -> Self {
        Self {
            minute_of_day: hour * 60.0,
            peak_rise,
            time_to_peak,
        }
    }

    /// Rise above baseline `elapsed` minutes after eating.
    pub fn response(&self, elapsed: f64) -> f64 {
        if elapsed < 0.0 {
            return 0.0;
        }
        let x = elapsed / self.time_to_peak;
        self.peak_rise * x * (1.0 - x).exp()
    }
}

/// Glucose profile of one subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectProfile {
    /// Subject identifier.
    pub id: String,
    /// Fasting glucose (mg/dL).
    pub baseline: f64,
    /// Amplitude of the early-morning rise (mg/dL).
    pub dawn_amplitude: f64,
    /// Daily meals.
    pub meals: Vec<Meal>,
    /// Standard deviation of meal timing, minutes.
    pub meal_jitter_min: f64,
    /// Standard deviation of sensor noise (mg/dL).
    pub noise_std: f64,
    /// Artifacts to inject.
    #[serde(default)]
    pub artifacts: Vec<ArtifactConfig>,
}

impl SubjectProfile {
    /// Create a flat profile with no meals.
    pub fn new(id: &str, baseline: f64) -> Self {
        Self {
            id: id.to_string(),
            baseline,
            dawn_amplitude: 0.0,
            meals: Vec::new(),
            meal_jitter_min: 0.0,
            noise_std: 0.0,
            artifacts: Vec::new(),
        }
    }

    /// Set dawn-phenomenon amplitude.
    pub fn with_dawn(mut self, amplitude: f64) -> Self {
        self.dawn_amplitude = amplitude;
        self
    }

    /// Add a meal.
    pub fn with_meal(mut self, meal: Meal) -> Self {
        self.meals.push(meal);
        self
    }

    /// Set meal timing jitter.
    pub fn with_meal_jitter(mut self, minutes: f64) -> Self {
        self.meal_jitter_min = minutes;
        self
    }

    /// Add sensor noise.
    pub fn with_noise(mut self, std: f64) -> Self {
        self.noise_std = std;
        self
    }

    /// Add an artifact.
    pub fn with_artifact(mut self, artifact: ArtifactConfig) -> Self {
        self.artifacts.push(artifact);
        self
    }

    /// Noise-free glucose `minute` minutes after midnight, with meals
    /// shifted by `meal_offsets` (one entry per meal, missing entries are
    /// zero). Meals from the previous day still contribute their tail.
    pub fn glucose_at(&self, minute: f64, meal_offsets: &[f64]) -> f64 {
        // Dawn rise centered on 06:00, flat at night and in the afternoon
        let dawn_phase = (minute - 240.0) / 240.0;
        let dawn = if (0.0..=1.0).contains(&dawn_phase) {
            self.dawn_amplitude * (PI * dawn_phase).sin()
        } else {
            0.0
        };

        let meals: f64 = self
            .meals
            .iter()
            .enumerate()
            .map(|(i, meal)| {
                let start = meal.minute_of_day + meal_offsets.get(i).copied().unwrap_or(0.0);
                meal.response(minute - start) + meal.response(minute + 1440.0 - start)
            })
            .sum();

        self.baseline + dawn + meals
    }
}

/// Glycemic phenotype presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phenotype {
    /// Healthy glucose regulation.
    Normoglycemic,
    /// Impaired fasting glucose, moderate excursions.
    Prediabetic,
    /// Large excursions and nocturnal lows.
    Type1,
    /// High baseline, slow meal clearance.
    Type2,
}

/// Create a subject profile for a phenotype.
pub fn create_subject(id: &str, phenotype: Phenotype) -> SubjectProfile {
    match phenotype {
        Phenotype::Normoglycemic => SubjectProfile::new(id, 90.0)
            .with_dawn(8.0)
            .with_meal(Meal::new(7.5, 35.0, 40.0))
            .with_meal(Meal::new(12.5, 45.0, 45.0))
            .with_meal(Meal::new(19.0, 50.0, 45.0))
            .with_meal_jitter(20.0)
            .with_noise(4.0),
        Phenotype::Prediabetic => SubjectProfile::new(id, 108.0)
            .with_dawn(15.0)
            .with_meal(Meal::new(7.5, 60.0, 50.0))
            .with_meal(Meal::new(12.5, 75.0, 55.0))
            .with_meal(Meal::new(19.0, 80.0, 55.0))
            .with_meal_jitter(30.0)
            .with_noise(6.0),
        Phenotype::Type1 => SubjectProfile::new(id, 125.0)
            .with_dawn(35.0)
            .with_meal(Meal::new(8.0, 120.0, 60.0))
            .with_meal(Meal::new(13.0, 110.0, 60.0))
            .with_meal(Meal::new(19.5, 140.0, 70.0))
            .with_meal_jitter(45.0)
            .with_noise(12.0)
            .with_artifact(
                ArtifactConfig::new(ArtifactType::CompressionLow { depth: 60.0 }, 30).with_duration(12),
            ),
        Phenotype::Type2 => SubjectProfile::new(id, 150.0)
            .with_dawn(25.0)
            .with_meal(Meal::new(8.0, 90.0, 90.0))
            .with_meal(Meal::new(13.0, 100.0, 90.0))
            .with_meal(Meal::new(19.5, 110.0, 100.0))
            .with_meal_jitter(30.0)
            .with_noise(8.0),
    }
}
