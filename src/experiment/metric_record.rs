//! Metric Record - one point of a training curve

use serde::{Deserialize, Serialize};

/// Metric Record represents a single metric data point of an experiment.
///
/// Plotting and reporting sinks consume experiments as a flat list of
/// records, filtering by `key` and ordering by `epoch` to draw one curve
/// per metric.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricRecord {
    experiment: String,
    key: String,
    epoch: usize,
    value: f64,
}

impl MetricRecord {
    /// Create a new metric record.
    ///
    /// # Arguments
    ///
    /// * `experiment` - Name of the experiment the value belongs to
    /// * `key` - Metric name/key (e.g., "loss", "accuracy")
    /// * `epoch` - Epoch index, starting at 0
    /// * `value` - Metric value
    #[must_use]
    pub fn new(
        experiment: impl Into<String>,
        key: impl Into<String>,
        epoch: usize,
        value: f64,
    ) -> Self {
        Self {
            experiment: experiment.into(),
            key: key.into(),
            epoch,
            value,
        }
    }

    /// Get the experiment name.
    #[must_use]
    pub fn experiment(&self) -> &str {
        &self.experiment
    }

    /// Get the metric key/name.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the epoch index.
    #[must_use]
    pub const fn epoch(&self) -> usize {
        self.epoch
    }

    /// Get the metric value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }
}
