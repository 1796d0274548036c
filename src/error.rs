//! Error types for cgmetrics
//!
//! Business conditions (no qualifying window, empty record) never surface
//! here; they degrade to empty or all-absent tables. Errors are reserved for
//! precondition violations and for the fail-fast numeric policy.

use thiserror::Error;

/// Result type alias for cgmetrics operations
pub type Result<T> = std::result::Result<T, CgmError>;

/// Main error type for cgmetrics operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CgmError {
    /// A sample violates the input contract
    #[error("Invalid input at sample {index}: {reason}")]
    InvalidInput { index: usize, reason: String },

    /// Configuration values are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A metric evaluated to a non-finite value under the fail-fast policy
    #[error("Metric {column} is undefined for row {row}")]
    UndefinedMetric { row: String, column: &'static str },

    /// Table or config export failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CgmError {
    fn from(err: serde_json::Error) -> Self {
        CgmError::Serialization(err.to_string())
    }
}
