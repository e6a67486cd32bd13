//! Experiment - the outcome record of one training run

use super::{ExperimentSettings, MetricRecord, MetricsHistory};
use crate::dataset::Dataset;
use crate::metrics::{compute_all, MetricsReport};
use crate::model::TrainedModel;
use crate::{Error, Result};
use chrono::{DateTime, Utc};

/// Outcome of one training run.
///
/// Owns its trained model exclusively and is read-only after creation.
/// Every tracked metric has exactly one history value per epoch.
#[derive(Debug)]
pub struct Experiment<M> {
    name: String,
    settings: ExperimentSettings,
    model: M,
    epochs: Vec<usize>,
    metrics_history: MetricsHistory,
    created_at: DateTime<Utc>,
}

impl<M: TrainedModel> Experiment<M> {
    /// Assemble an experiment from a finished fit.
    ///
    /// # Errors
    ///
    /// Returns `Error::TrainingFailure` if the history does not hold exactly
    /// `settings.number_epochs()` values for every metric the model tracks,
    /// or holds a series for a metric the model does not track.
    pub fn new(
        name: impl Into<String>,
        settings: ExperimentSettings,
        model: M,
        metrics_history: MetricsHistory,
    ) -> Result<Self> {
        let name = name.into();
        let expected = settings.number_epochs();
        if metrics_history.num_epochs() != expected {
            return Err(Error::TrainingFailure(format!(
                "experiment '{name}' recorded {} epochs, expected {expected}",
                metrics_history.num_epochs()
            )));
        }
        if let Some(missing) = model
            .metrics()
            .iter()
            .find(|metric| metrics_history.get(metric.name()).is_none())
        {
            return Err(Error::TrainingFailure(format!(
                "experiment '{name}' has no history for metric '{}'",
                missing.name()
            )));
        }
        if let Some(extra) = metrics_history
            .names()
            .find(|name| !model.metrics().iter().any(|metric| metric.name() == *name))
        {
            return Err(Error::TrainingFailure(format!(
                "experiment '{name}' has history for untracked metric '{extra}'"
            )));
        }

        Ok(Self {
            name,
            settings,
            model,
            epochs: (0..expected).collect(),
            metrics_history,
            created_at: Utc::now(),
        })
    }

    /// Get the experiment name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the settings the run used.
    #[must_use]
    pub const fn settings(&self) -> &ExperimentSettings {
        &self.settings
    }

    /// Get the trained model.
    #[must_use]
    pub const fn model(&self) -> &M {
        &self.model
    }

    /// Epoch indices, `[0, number_epochs)`.
    #[must_use]
    pub fn epochs(&self) -> &[usize] {
        &self.epochs
    }

    /// Per-epoch values of every tracked metric.
    #[must_use]
    pub const fn metrics_history(&self) -> &MetricsHistory {
        &self.metrics_history
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Per-epoch values of one metric.
    #[must_use]
    pub fn series(&self, metric_name: &str) -> Option<&[f64]> {
        self.metrics_history.get(metric_name)
    }

    /// Value of `metric_name` after the last epoch.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownMetric` if the metric was not tracked.
    pub fn get_final_metric_value(&self, metric_name: &str) -> Result<f64> {
        self.metrics_history
            .final_value(metric_name)
            .ok_or_else(|| Error::UnknownMetric(metric_name.to_string()))
    }

    /// Model outputs for every row of `features`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownFeature` if an input feature column is absent.
    pub fn predict(&self, features: &Dataset) -> Result<Vec<f64>> {
        let columns = features.select(self.settings.input_features())?;
        self.model.predict(&columns)
    }

    /// Compute every tracked metric on held-out data.
    ///
    /// Predicts once over all rows; the experiment is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `Error::ShapeMismatch` if the row counts disagree, and
    /// `Error::UnknownFeature` if an input feature column is absent.
    pub fn evaluate(&self, test_features: &Dataset, test_labels: &[f64]) -> Result<MetricsReport> {
        if test_features.num_rows() != test_labels.len() {
            return Err(Error::ShapeMismatch {
                feature_rows: test_features.num_rows(),
                label_rows: test_labels.len(),
            });
        }
        let predictions = self.predict(test_features)?;
        Ok(compute_all(self.model.metrics(), &predictions, test_labels))
    }

    /// Flatten the history into one record per metric per epoch, metric-major.
    #[must_use]
    pub fn metric_records(&self) -> Vec<MetricRecord> {
        self.metrics_history
            .iter()
            .flat_map(|(key, values)| {
                values
                    .iter()
                    .enumerate()
                    .map(move |(epoch, &value)| MetricRecord::new(&*self.name, key, epoch, value))
            })
            .collect()
    }

    /// Summary for logs and reports: name, timestamp, settings and history.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "created_at": self.created_at,
            "settings": self.settings.to_config_json(),
            "metrics_history": self.metrics_history,
        })
    }

    /// Consume the experiment, keeping only the trained model.
    #[must_use]
    pub fn into_model(self) -> M {
        self.model
    }
}

impl<M: TrainedModel + 'static> Experiment<M> {
    /// Erase the model type so experiments over different model kinds can be
    /// compared together.
    #[must_use]
    pub fn boxed(self) -> Experiment<Box<dyn TrainedModel>> {
        Experiment {
            name: self.name,
            settings: self.settings,
            model: Box::new(self.model),
            epochs: self.epochs,
            metrics_history: self.metrics_history,
            created_at: self.created_at,
        }
    }
}
