// cgmetrics Testdata - Sensor artifacts
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Sensor artifact injection.
//!
//! Real CGM records are full of holes: warm-up periods, lost Bluetooth
//! links, compression lows while the wearer sleeps on the sensor. These
//! artifacts exercise window coverage, resampling and gap filling.

use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Artifact injection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    /// Type of artifact to inject.
    pub artifact_type: ArtifactType,
    /// Sample index when the artifact starts.
    pub start_sample: usize,
    /// Duration in samples (None = until end).
    pub duration_samples: Option<usize>,
}

impl ArtifactConfig {
    /// Create a new artifact configuration.
    pub fn new(artifact_type: ArtifactType, start_sample: usize) -> Self {
        Self {
            artifact_type,
            start_sample,
            duration_samples: None,
        }
    }

    /// Set duration in samples.
    pub fn with_duration(mut self, samples: usize) -> Self {
        self.duration_samples = Some(samples);
        self
    }

    /// Check if the artifact is active at given sample index.
    pub fn is_active(&self, sample_idx: usize) -> bool {
        if sample_idx < self.start_sample {
            return false;
        }
        match self.duration_samples {
            Some(duration) => sample_idx < self.start_sample + duration,
            None => true,
        }
    }

    /// Apply the artifact to a clean reading.
    pub fn apply<R: Rng + ?Sized>(&self, value: f64, rng: &mut R) -> Reading {
        match self.artifact_type {
            ArtifactType::SignalLoss => Reading::Dropped,
            ArtifactType::BlankValue => Reading::Missing,
            ArtifactType::CompressionLow { depth } => Reading::Value(value - depth),
            ArtifactType::Intermittent { failure_prob } => {
                if rng.gen::<f64>() < failure_prob {
                    Reading::Dropped
                } else {
                    Reading::Value(value)
                }
            }
        }
    }
}

/// Type of artifact to inject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ArtifactType {
    /// Receiver out of range: no row is recorded.
    SignalLoss,

    /// Row recorded with an empty glucose cell.
    BlankValue,

    /// Pressure on the sensor drags readings down.
    CompressionLow {
        /// mg/dL subtracted from the true value.
        depth: f64,
    },

    /// Random dropped rows.
    Intermittent {
        /// Probability of losing each sample.
        failure_prob: f64,
    },
}

/// Outcome of a sample after artifacts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    /// A glucose value is recorded.
    Value(f64),
    /// A row is recorded without a value.
    Missing,
    /// No row is recorded.
    Dropped,
}
