// cgmetrics Testdata - Synthetic CGM record generator
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # cgmetrics Testdata
//!
//! Synthetic continuous glucose monitor records for testing and
//! benchmarking `cgmetrics`.
//!
//! - **Subject profiles**: baseline, dawn phenomenon and meal responses
//! - **Phenotype presets**: normoglycemic, prediabetic, type 1, type 2
//! - **Artifact injection**: signal loss, blank cells, compression lows
//! - **Dataset I/O**: `Time,Glucose[,ID]` CSV and JSON
//!
//! ## Quick Start
//!
//! ```rust
//! use cgmetrics::FeatureExtractor;
//! use cgmetrics_testdata::{create_subject, generate_subject, GeneratorConfig, Phenotype};
//!
//! // Three days of a type 2 wearer on a 5 minute clock
//! let config = GeneratorConfig::new().with_duration_days(3.0).with_seed(42);
//! let profile = create_subject("t2-01", Phenotype::Type2);
//! let dataset = generate_subject(&config, &profile).unwrap();
//!
//! let series = dataset.to_series();
//! let table = FeatureExtractor::default().fixed_hour(&series[0]).unwrap();
//! assert_eq!(table.len(), 3);
//! ```

pub mod artifacts;
pub mod dataset;
pub mod generator;
pub mod profiles;

// Re-exports for convenience
pub use artifacts::{ArtifactConfig, ArtifactType, Reading};
pub use dataset::{Dataset, DatasetError, DatasetMetadata, DatasetRow};
pub use generator::{generate_cohort, generate_subject, GeneratorConfig};
pub use profiles::{create_subject, Meal, Phenotype, SubjectProfile};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
