//! Extraction configuration.
//!
//! Every knob the windowing pipeline reads lives here. Defaults reproduce the
//! reference behavior: 24 hour windows anchored within 2.5 minutes of
//! midnight, 5 minute sensor cadence, 70% coverage for the every-midnight mode
//! and 95% for the random-day mode.

use crate::error::{CgmError, Result};
use serde::{Deserialize, Serialize};

/// Seconds in a day.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Longest accepted window, one leap year.
pub const MAX_WINDOW_HOURS: u32 = 24 * 366;

/// Master configuration for feature extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Window length in hours.
    pub window_hours: u32,

    /// Nominal sensor cadence in minutes. Drives the expected sample count,
    /// the resampling grid and the minutes credited per sample.
    pub sampling_interval_minutes: u32,

    /// Half-width of the midnight anchor band, in seconds.
    pub anchor_tolerance_secs: u32,

    /// Coverage fraction a window must exceed in fixed-hour mode.
    pub fixed_hour_coverage: f64,

    /// Coverage fraction a window must exceed in random-day mode.
    pub random_day_coverage: f64,

    /// Width of the statistical band (in standard deviations) used by
    /// TIR/TOR/MGE/MGN.
    pub band_sd: f64,

    /// Seed for the random-day shuffle. `None` draws from OS entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// What to do with undefined metric values.
    pub numeric_policy: NumericPolicy,

    /// Reject non-finite or negative glucose before windowing.
    pub validate_input: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            window_hours: 24,
            sampling_interval_minutes: 5,
            anchor_tolerance_secs: 150, // 23:57:30 .. 00:02:30
            fixed_hour_coverage: 0.70,
            random_day_coverage: 0.95,
            band_sd: 1.0,
            seed: None,
            numeric_policy: NumericPolicy::Propagate,
            validate_input: true,
        }
    }
}

/// Handling of numerically undefined results (log of non-positive glucose,
/// zero-variance windows, empty selections).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum NumericPolicy {
    /// Keep going; undefined values surface as absent cells.
    #[default]
    Propagate,
    /// Reject non-positive glucose up front and abort on the first
    /// non-finite metric.
    FailFast,
}

impl ExtractionConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set window length in hours.
    pub fn with_window_hours(mut self, hours: u32) -> Self {
        self.window_hours = hours;
        self
    }

    /// Set sensor cadence in minutes.
    pub fn with_sampling_interval_minutes(mut self, minutes: u32) -> Self {
        self.sampling_interval_minutes = minutes;
        self
    }

    /// Set both coverage thresholds.
    pub fn with_coverage(mut self, fixed_hour: f64, random_day: f64) -> Self {
        self.fixed_hour_coverage = fixed_hour;
        self.random_day_coverage = random_day;
        self
    }

    /// Set the shuffle seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the numeric policy.
    pub fn with_numeric_policy(mut self, policy: NumericPolicy) -> Self {
        self.numeric_policy = policy;
        self
    }

    /// Window length in minutes.
    pub fn window_minutes(&self) -> u32 {
        self.window_hours.saturating_mul(60)
    }

    /// Number of samples a fully covered window holds at the nominal cadence.
    pub fn expected_samples(&self) -> f64 {
        self.window_minutes() as f64 / self.sampling_interval_minutes as f64
    }

    /// Sample count a window must exceed for the given coverage fraction.
    pub fn coverage_threshold(&self, coverage: f64) -> f64 {
        self.expected_samples() * coverage
    }

    /// Minutes credited per sample by count-based metrics.
    pub fn sampling_rate(&self) -> f64 {
        self.sampling_interval_minutes as f64
    }

    /// Check ranges.
    pub fn validate(&self) -> Result<()> {
        if self.window_hours == 0 || self.window_hours > MAX_WINDOW_HOURS {
            return Err(CgmError::InvalidConfig(format!(
                "window_hours must be in 1..={}, got {}",
                MAX_WINDOW_HOURS, self.window_hours
            )));
        }
        if self.sampling_interval_minutes == 0 {
            return Err(CgmError::InvalidConfig(
                "sampling_interval_minutes must be positive".to_string(),
            ));
        }
        if self.anchor_tolerance_secs == 0 || self.anchor_tolerance_secs >= SECONDS_PER_DAY / 2 {
            return Err(CgmError::InvalidConfig(format!(
                "anchor_tolerance_secs must be in 1..{}, got {}",
                SECONDS_PER_DAY / 2,
                self.anchor_tolerance_secs
            )));
        }
        for (name, value) in [
            ("fixed_hour_coverage", self.fixed_hour_coverage),
            ("random_day_coverage", self.random_day_coverage),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(CgmError::InvalidConfig(format!(
                    "{} must be in (0, 1], got {}",
                    name, value
                )));
            }
        }
        if !(self.band_sd.is_finite() && self.band_sd >= 0.0) {
            return Err(CgmError::InvalidConfig(format!(
                "band_sd must be finite and non-negative, got {}",
                self.band_sd
            )));
        }
        Ok(())
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
