//! Metrics tracked during training and computed at evaluation time
//!
//! - Loss: binary cross-entropy, mean squared error
//! - Classification: accuracy, precision, recall, ROC AUC
//! - Regression: root mean squared error
//!
//! Every metric is a pure function of `(predictions, labels)`, so the value a
//! model reports for an epoch and the value [`Experiment::evaluate`] computes
//! on held-out data come from the same formula.
//!
//! [`Experiment::evaluate`]: crate::experiment::Experiment::evaluate

mod classification;
mod loss;
mod report;

pub use classification::{binary_accuracy, precision, recall, roc_auc, ConfusionCounts};
pub use loss::{binary_crossentropy, mean_squared_error, root_mean_squared_error};
pub use report::MetricsReport;

/// Number of thresholds used by [`Metric::Auc`] unless configured otherwise.
pub const DEFAULT_AUC_THRESHOLDS: usize = 200;

/// Loss function minimized by a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossKind {
    /// Binary cross-entropy on sigmoid outputs.
    BinaryCrossentropy,
    /// Mean squared error on raw outputs.
    MeanSquaredError,
}

impl LossKind {
    /// Mean loss over all rows.
    #[must_use]
    pub fn compute(self, predictions: &[f64], labels: &[f64]) -> f64 {
        match self {
            Self::BinaryCrossentropy => binary_crossentropy(predictions, labels),
            Self::MeanSquaredError => mean_squared_error(predictions, labels),
        }
    }
}

/// A tracked metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    /// The model's loss, reported as `loss`.
    Loss(LossKind),
    /// Share of rows whose thresholded prediction equals the label.
    BinaryAccuracy {
        /// Decision boundary; predictions above it are positive.
        threshold: f64,
    },
    /// `tp / (tp + fp)` at a threshold.
    Precision {
        /// Decision boundary; predictions above it are positive.
        threshold: f64,
    },
    /// `tp / (tp + fn)` at a threshold.
    Recall {
        /// Decision boundary; predictions above it are positive.
        threshold: f64,
    },
    /// Area under the ROC curve.
    Auc {
        /// Number of evenly spaced thresholds in `[0, 1]`.
        num_thresholds: usize,
    },
    /// Square root of the mean squared error.
    RootMeanSquaredError,
}

impl Metric {
    /// Name the metric is tracked under.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Loss(_) => "loss",
            Self::BinaryAccuracy { .. } => "accuracy",
            Self::Precision { .. } => "precision",
            Self::Recall { .. } => "recall",
            Self::Auc { .. } => "auc",
            Self::RootMeanSquaredError => "root_mean_squared_error",
        }
    }

    /// Compute the metric over all rows. Empty input yields 0.
    #[must_use]
    pub fn compute(&self, predictions: &[f64], labels: &[f64]) -> f64 {
        match *self {
            Self::Loss(kind) => kind.compute(predictions, labels),
            Self::BinaryAccuracy { threshold } => binary_accuracy(predictions, labels, threshold),
            Self::Precision { threshold } => precision(predictions, labels, threshold),
            Self::Recall { threshold } => recall(predictions, labels, threshold),
            Self::Auc { num_thresholds } => roc_auc(predictions, labels, num_thresholds),
            Self::RootMeanSquaredError => root_mean_squared_error(predictions, labels),
        }
    }
}

/// Compute every metric in `metrics`, in order.
#[must_use]
pub fn compute_all(metrics: &[Metric], predictions: &[f64], labels: &[f64]) -> MetricsReport {
    let mut report = MetricsReport::new();
    for metric in metrics {
        report.insert(metric.name(), metric.compute(predictions, labels));
    }
    report
}
