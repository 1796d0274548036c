//! Glucose time series.
//!
//! A [`GlucoseSeries`] is the immutable input of every extraction. It is
//! always held in non-decreasing timestamp order; constructors sort.

use crate::error::{CgmError, Result};
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// A single CGM reading.
///
/// `glucose` is in mg/dL. `NaN` marks an absent reading (an empty resampling
/// bucket or a missing value in the source record).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: NaiveDateTime,
    pub glucose: f64,
}

impl Sample {
    /// Create a new sample.
    pub fn new(time: NaiveDateTime, glucose: f64) -> Self {
        Self { time, glucose }
    }

    /// Create an absent reading at `time`.
    pub fn absent(time: NaiveDateTime) -> Self {
        Self {
            time,
            glucose: f64::NAN,
        }
    }

    /// Whether the reading carries a value.
    pub fn is_present(&self) -> bool {
        !self.glucose.is_nan()
    }

    /// Seconds elapsed since local midnight.
    pub fn seconds_from_midnight(&self) -> u32 {
        self.time.num_seconds_from_midnight()
    }
}

/// Ordered CGM record for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlucoseSeries {
    subject_id: Option<String>,
    samples: Vec<Sample>,
}

impl GlucoseSeries {
    /// Build a series from samples in any order.
    pub fn new(samples: Vec<Sample>) -> Self {
        Self::build(None, samples)
    }

    /// Build a series tagged with a subject identifier.
    pub fn with_subject(subject_id: impl Into<String>, samples: Vec<Sample>) -> Self {
        Self::build(Some(subject_id.into()), samples)
    }

    /// Build from `(timestamp, glucose)` pairs.
    pub fn from_pairs(
        subject_id: Option<&str>,
        pairs: impl IntoIterator<Item = (NaiveDateTime, f64)>,
    ) -> Self {
        let samples = pairs
            .into_iter()
            .map(|(time, glucose)| Sample::new(time, glucose))
            .collect();
        Self::build(subject_id.map(str::to_string), samples)
    }

    fn build(subject_id: Option<String>, mut samples: Vec<Sample>) -> Self {
        // Stable: readings sharing a timestamp keep their input order.
        samples.sort_by_key(|s| s.time);
        Self {
            subject_id,
            samples,
        }
    }

    /// Subject identifier, if tagged.
    pub fn subject_id(&self) -> Option<&str> {
        self.subject_id.as_deref()
    }

    /// Subject identifier or an empty string, as used in row labels.
    pub fn label(&self) -> &str {
        self.subject_id.as_deref().unwrap_or("")
    }

    /// All samples, sorted.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Glucose column.
    pub fn glucose(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.glucose).collect()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// First and last timestamps.
    pub fn time_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => Some((first.time, last.time)),
            _ => None,
        }
    }

    /// Index range of samples with `start <= time < end`.
    pub fn range_between(&self, start: NaiveDateTime, end: NaiveDateTime) -> std::ops::Range<usize> {
        let lo = self.samples.partition_point(|s| s.time < start);
        let hi = self.samples.partition_point(|s| s.time < end);
        lo..hi.max(lo)
    }

    /// Check the input contract: glucose must be absent or a finite,
    /// non-negative number. With `require_positive`, zero is rejected too.
    pub fn validate(&self, require_positive: bool) -> Result<()> {
        for (index, sample) in self.samples.iter().enumerate() {
            let g = sample.glucose;
            if g.is_nan() {
                continue;
            }
            if g.is_infinite() {
                return Err(CgmError::InvalidInput {
                    index,
                    reason: format!("glucose is infinite at {}", sample.time),
                });
            }
            if g < 0.0 {
                return Err(CgmError::InvalidInput {
                    index,
                    reason: format!("glucose {} is negative at {}", g, sample.time),
                });
            }
            if require_positive && g == 0.0 {
                return Err(CgmError::InvalidInput {
                    index,
                    reason: format!("glucose is zero at {}", sample.time),
                });
            }
        }
        Ok(())
    }
}
