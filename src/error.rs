//! Error types for Trueno-Lab
//!
//! Toyota Way: Clear error messages with actionable guidance (Respect for People)

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Trueno-Lab error types
#[derive(Error, Debug)]
pub enum Error {
    /// Experiment settings rejected at construction
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Feature rows and label count disagree
    #[error("Shape mismatch: features have {feature_rows} rows but {label_rows} labels were given")]
    ShapeMismatch {
        /// Row count of the feature table
        feature_rows: usize,
        /// Number of labels
        label_rows: usize,
    },

    /// Requested input feature column is absent from the dataset
    #[error("Unknown feature: column '{0}' is not a numeric column of the dataset")]
    UnknownFeature(String),

    /// Requested metric was not tracked by the experiment
    #[error("Unknown metric: '{0}' was not tracked during training")]
    UnknownMetric(String),

    /// Failure surfaced by the model capability during fit
    #[error("Training failure: {0}")]
    TrainingFailure(String),

    /// Dataset column type or content rejected at the schema boundary
    #[error("Schema error: {0}")]
    Schema(String),

    /// Storage error (Parquet/Arrow)
    #[error("Storage error: {0}")]
    StorageError(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow/Parquet error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Settings (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Convert any error raised while fitting into a `TrainingFailure`.
    ///
    /// A `TrainingFailure` is passed through unchanged.
    #[must_use]
    pub fn into_training_failure(self) -> Self {
        match self {
            Self::TrainingFailure(_) => self,
            other => Self::TrainingFailure(other.to_string()),
        }
    }
}
