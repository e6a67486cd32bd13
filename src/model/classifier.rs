//! Binary classifier capability

use super::{DenseModel, Head, ModelCapability};
use crate::experiment::ExperimentSettings;
use crate::metrics::{Metric, DEFAULT_AUC_THRESHOLDS};
use crate::Result;

/// Builds one-unit sigmoid classifiers.
///
/// Tracked metrics: `loss` (binary cross-entropy), `accuracy`, `precision`,
/// `recall` at the settings' classification threshold, and `auc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryClassifier {
    auc_thresholds: usize,
}

impl BinaryClassifier {
    /// Threshold used when the settings carry none.
    pub const DEFAULT_THRESHOLD: f64 = 0.5;

    /// Classifier with the default AUC resolution.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            auc_thresholds: DEFAULT_AUC_THRESHOLDS,
        }
    }

    /// Override the number of AUC thresholds.
    #[must_use]
    pub const fn with_auc_thresholds(mut self, auc_thresholds: usize) -> Self {
        self.auc_thresholds = auc_thresholds;
        self
    }

    /// Metrics tracked for `threshold`, excluding the loss.
    #[must_use]
    pub const fn metrics(&self, threshold: f64) -> [Metric; 4] {
        [
            Metric::BinaryAccuracy { threshold },
            Metric::Precision { threshold },
            Metric::Recall { threshold },
            Metric::Auc {
                num_thresholds: self.auc_thresholds,
            },
        ]
    }
}

impl Default for BinaryClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelCapability for BinaryClassifier {
    type Model = DenseModel;

    fn build(&self, settings: &ExperimentSettings, seed: u64) -> Result<DenseModel> {
        let threshold = settings
            .classification_threshold()
            .unwrap_or(Self::DEFAULT_THRESHOLD);
        DenseModel::new(
            settings.input_features().to_vec(),
            Head::Logistic,
            &self.metrics(threshold),
            settings.learning_rate(),
            seed,
        )
    }
}
