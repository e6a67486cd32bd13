//! Experiment Runner - orchestrates one training run

use super::{Experiment, ExperimentSettings};
use crate::dataset::Dataset;
use crate::model::{FitOptions, ModelCapability, TrainedModel};
use crate::{Error, Result};

/// Runs training experiments with an explicit seed.
///
/// The seed feeds both weight initialization and per-epoch shuffling, so
/// two runs with the same seed, settings and data produce identical
/// histories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExperimentRunner {
    seed: u64,
}

impl ExperimentRunner {
    /// Seed used by [`ExperimentRunner::new`].
    pub const DEFAULT_SEED: u64 = 42;

    /// Runner seeded with [`ExperimentRunner::DEFAULT_SEED`].
    #[must_use]
    pub const fn new() -> Self {
        Self::with_seed(Self::DEFAULT_SEED)
    }

    /// Runner with an explicit seed.
    #[must_use]
    pub const fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    /// Get the seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Build, train and record one experiment.
    ///
    /// Inputs are validated before the model is built, so a rejected call
    /// never touches `capability`. Training is synchronous: `number_epochs`
    /// epochs in batches of `batch_size`, no early stopping.
    ///
    /// # Errors
    ///
    /// - `Error::ShapeMismatch` if `training_labels` does not have one entry
    ///   per row
    /// - `Error::UnknownFeature` if an input feature column is absent or not
    ///   numeric
    /// - `Error::TrainingFailure` if building or fitting the model fails, or
    ///   the returned history does not cover every epoch
    pub fn run<C: ModelCapability>(
        &self,
        name: &str,
        capability: &C,
        training_features: &Dataset,
        training_labels: &[f64],
        settings: ExperimentSettings,
    ) -> Result<Experiment<C::Model>> {
        let span = tracing::info_span!("experiment", name, seed = self.seed);
        let _guard = span.enter();

        if training_features.num_rows() != training_labels.len() {
            return Err(Error::ShapeMismatch {
                feature_rows: training_features.num_rows(),
                label_rows: training_labels.len(),
            });
        }
        let features = training_features.select(settings.input_features())?;

        tracing::info!(
            rows = features.num_rows(),
            features = ?settings.input_features(),
            learning_rate = settings.learning_rate(),
            epochs = settings.number_epochs(),
            batch_size = settings.batch_size(),
            "Starting training run"
        );

        let options = FitOptions::from_settings(&settings, self.seed);
        let trained = capability
            .build(&settings, self.seed)
            .and_then(|mut model| {
                let history = model.fit(&features, training_labels, &options)?;
                Ok((model, history))
            })
            .and_then(|(model, history)| Experiment::new(name, settings, model, history))
            .map_err(Error::into_training_failure);

        match trained {
            Ok(experiment) => {
                tracing::info!(
                    epochs = experiment.epochs().len(),
                    metrics = ?experiment.metrics_history().names().collect::<Vec<_>>(),
                    "Training run complete"
                );
                log_final_metrics(&experiment);
                Ok(experiment)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Training run failed");
                Err(err)
            }
        }
    }
}

impl Default for ExperimentRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn log_final_metrics<M: TrainedModel>(experiment: &Experiment<M>) {
    for (metric, values) in experiment.metrics_history().iter() {
        if let Some(value) = values.last() {
            tracing::debug!(metric, value, "Final training metric");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LinearRegressor;

    fn data() -> (Dataset, Vec<f64>) {
        let a: Vec<f64> = (0..20).map(|i| f64::from(i) / 10.0).collect();
        let labels = a.iter().map(|x| 2.0 * x + 1.0).collect();
        let dataset = Dataset::builder().numeric("A", a).build().unwrap();
        (dataset, labels)
    }

    #[test]
    fn test_default_seed() {
        assert_eq!(ExperimentRunner::default().seed(), 42);
        assert_eq!(ExperimentRunner::with_seed(7).seed(), 7);
    }

    #[test]
    fn test_run_records_every_epoch() {
        let (dataset, labels) = data();
        let settings = ExperimentSettings::builder(["A"])
            .number_epochs(3)
            .batch_size(4)
            .build()
            .unwrap();
        let experiment = ExperimentRunner::new()
            .run("line", &LinearRegressor, &dataset, &labels, settings)
            .unwrap();

        assert_eq!(experiment.epochs(), [0, 1, 2]);
        for (_, values) in experiment.metrics_history().iter() {
            assert_eq!(values.len(), 3);
        }
    }

    #[test]
    fn test_run_rejects_mismatched_labels() {
        let (dataset, _) = data();
        let settings = ExperimentSettings::builder(["A"]).build().unwrap();
        let result =
            ExperimentRunner::new().run("bad", &LinearRegressor, &dataset, &[1.0], settings);
        assert!(matches!(
            result,
            Err(Error::ShapeMismatch {
                feature_rows: 20,
                label_rows: 1
            })
        ));
    }

    #[test]
    fn test_run_rejects_unknown_feature() {
        let (dataset, labels) = data();
        let settings = ExperimentSettings::builder(["A", "B"]).build().unwrap();
        let result =
            ExperimentRunner::new().run("bad", &LinearRegressor, &dataset, &labels, settings);
        assert!(matches!(result, Err(Error::UnknownFeature(name)) if name == "B"));
    }

    #[test]
    fn test_same_seed_same_history() {
        let (dataset, labels) = data();
        let settings = ExperimentSettings::builder(["A"])
            .number_epochs(4)
            .batch_size(3)
            .learning_rate(0.01)
            .build()
            .unwrap();
        let runner = ExperimentRunner::with_seed(9);
        let first = runner
            .run("first", &LinearRegressor, &dataset, &labels, settings.clone())
            .unwrap();
        let second = runner
            .run("second", &LinearRegressor, &dataset, &labels, settings)
            .unwrap();
        assert_eq!(first.metrics_history(), second.metrics_history());
        assert_eq!(first.model().weights(), second.model().weights());
    }
}
