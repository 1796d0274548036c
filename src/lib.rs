//! # cgmetrics - Glycemic variability features for CGM records
//!
//! Computes clinical glycemic-variability metrics from continuous glucose
//! monitor time series and cuts long records into midnight-aligned windows,
//! one feature row per window.
//!
//! ## Key Features
//!
//! - **Metric library**: TIR/TOR, LBGI/HBGI, GRI, peak counts, CONGA24, MODD
//! - **Midnight windows**: anchors within ±2.5 minutes of midnight, strict
//!   coverage acceptance
//! - **Two extraction modes**: every qualifying day (fixed-hour) or one
//!   randomly drawn day per subject (random-day)
//! - **Typed tables**: column order is fixed by the row type
//!
//! ## Quick Start
//!
//! ```rust
//! use cgmetrics::{metrics, FeatureExtractor, GlucoseSeries, Sample};
//! use chrono::{Duration, NaiveDate};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let samples = (0..288)
//!     .map(|i| Sample::new(start + Duration::minutes(5 * i), 100.0 + (i % 30) as f64 * 4.0))
//!     .collect();
//! let series = GlucoseSeries::with_subject("p01", samples);
//!
//! // Single metrics over the glucose column
//! let glucose = series.glucose();
//! let tir = metrics::time_in_range(&glucose, 1.0, 5.0);
//! let tor = metrics::time_outside_range(&glucose, 1.0, 5.0);
//! assert_eq!(tir + tor, 288.0 * 5.0);
//!
//! // One row per accepted midnight window
//! let table = FeatureExtractor::default().fixed_hour(&series).unwrap();
//! assert_eq!(table.ids(), vec!["p01_win1"]);
//! ```
//!
//! ## Modules
//!
//! - [`series`]: Samples and the ordered glucose record
//! - [`metrics`]: Glycemic metric library
//! - [`window`]: Midnight anchors and coverage check
//! - [`resample`]: Fixed-grid median resampling
//! - [`interpolate`]: Piecewise quadratic gap filling
//! - [`features`]: Per-window metric bundle
//! - [`table`]: Typed rows and feature tables
//! - [`extract`]: Extraction pipeline

// Modules
pub mod config;
pub mod error;
pub mod extract;
pub mod features;
pub mod interpolate;
pub mod metrics;
pub mod resample;
pub mod series;
pub mod table;
pub mod window;

// Re-exports for convenient access
pub use config::{ExtractionConfig, NumericPolicy};
pub use error::{CgmError, Result};
pub use extract::FeatureExtractor;
pub use features::{WindowFeatures, METRIC_COLUMNS};
pub use interpolate::{fill_gaps, LocalQuadratic};
pub use resample::Resampler;
pub use series::{GlucoseSeries, Sample};
pub use table::{
    FeatureRow, FeatureTable, FixedHourRow, RandomDayRow, FIXED_HOUR_COLUMNS, RANDOM_DAY_COLUMNS,
};
pub use window::{Window, WindowSelector};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_default_pipeline_schema() {
        let table = FeatureExtractor::default()
            .fixed_hour(&GlucoseSeries::new(Vec::new()))
            .unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns(), &FIXED_HOUR_COLUMNS[..]);
    }
}
