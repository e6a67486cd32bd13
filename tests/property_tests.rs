//! Comprehensive property-based tests for trueno-lab
//!
//! Following ruchy/trueno/aprender pattern:
//! - Test mathematical invariants
//! - Test training-record integrity properties
//! - Run with ProptestConfig::with_cases(100) (fewer for training runs)
//! - Must complete in <30 seconds for pre-commit hook

use proptest::prelude::*;
use std::cell::Cell;
use trueno_lab::dataset::{Dataset, FeatureColumns};
use trueno_lab::experiment::{ExperimentRunner, ExperimentSettings, MetricsHistory};
use trueno_lab::metrics::{
    binary_accuracy, precision, recall, roc_auc, LossKind, Metric, MetricsReport,
};
use trueno_lab::model::{FitOptions, LinearRegressor, ModelCapability, TrainedModel};
use trueno_lab::Error;

// ============================================================================
// Test doubles
// ============================================================================

/// Reports `(epoch + 1)` for every tracked metric.
struct CountingModel {
    features: Vec<String>,
    metrics: Vec<Metric>,
}

impl TrainedModel for CountingModel {
    fn input_features(&self) -> &[String] {
        &self.features
    }

    fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    #[allow(clippy::cast_precision_loss)]
    fn fit(
        &mut self,
        _features: &FeatureColumns,
        _labels: &[f64],
        options: &FitOptions,
    ) -> trueno_lab::Result<MetricsHistory> {
        let mut history = MetricsHistory::new();
        for epoch in 0..options.epochs {
            let mut report = MetricsReport::new();
            for metric in &self.metrics {
                report.insert(metric.name(), epoch as f64 + 1.0);
            }
            history.push_epoch(&report)?;
        }
        Ok(history)
    }

    fn predict(&self, features: &FeatureColumns) -> trueno_lab::Result<Vec<f64>> {
        Ok(features.aligned(&self.features)?[0].to_vec())
    }
}

#[derive(Default)]
struct CountingCapability {
    builds: Cell<usize>,
}

impl ModelCapability for CountingCapability {
    type Model = CountingModel;

    fn build(
        &self,
        settings: &ExperimentSettings,
        _seed: u64,
    ) -> trueno_lab::Result<CountingModel> {
        self.builds.set(self.builds.get() + 1);
        Ok(CountingModel {
            features: settings.input_features().to_vec(),
            metrics: vec![
                Metric::Loss(LossKind::MeanSquaredError),
                Metric::RootMeanSquaredError,
            ],
        })
    }
}

// ============================================================================
// Property Test Generators (Strategies)
// ============================================================================

/// Generate a two-column dataset with matching labels
fn arb_dataset(max_rows: usize) -> impl Strategy<Value = (Dataset, Vec<f64>)> {
    (1..=max_rows).prop_flat_map(|rows| {
        (
            proptest::collection::vec(-10.0f64..10.0, rows),
            proptest::collection::vec(-10.0f64..10.0, rows),
            proptest::collection::vec(-50.0f64..50.0, rows),
        )
            .prop_map(|(a, b, labels)| {
                let dataset = Dataset::builder()
                    .numeric("A", a)
                    .numeric("B", b)
                    .build()
                    .unwrap();
                (dataset, labels)
            })
    })
}

/// Generate predictions in [0, 1] with 0/1 labels
fn arb_scored_labels(max_rows: usize) -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (1..=max_rows).prop_flat_map(|rows| {
        (
            proptest::collection::vec(0.0f64..=1.0, rows),
            proptest::collection::vec(prop_oneof![Just(0.0), Just(1.0)], rows),
        )
    })
}

fn settings(epochs: usize, batch_size: usize) -> ExperimentSettings {
    ExperimentSettings::builder(["A", "B"])
        .number_epochs(epochs)
        .batch_size(batch_size)
        .build()
        .unwrap()
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ========================================================================
    // Experiment record properties
    // ========================================================================

    /// Property: N epochs produce N epoch entries and N values per metric
    #[test]
    fn prop_epoch_count_matches_settings(
        (dataset, labels) in arb_dataset(30),
        epochs in 1usize..20,
        batch_size in 1usize..40,
    ) {
        let capability = CountingCapability::default();
        let experiment = ExperimentRunner::new()
            .run("counting", &capability, &dataset, &labels, settings(epochs, batch_size))
            .unwrap();

        let expected: Vec<usize> = (0..epochs).collect();
        prop_assert_eq!(experiment.epochs().len(), epochs);
        prop_assert_eq!(experiment.epochs(), expected.as_slice());
        for (_, values) in experiment.metrics_history().iter() {
            prop_assert_eq!(values.len(), epochs);
        }
    }

    /// Property: final metric value is the last history entry
    #[test]
    fn prop_final_value_is_last_entry(
        (dataset, labels) in arb_dataset(30),
        epochs in 1usize..20,
    ) {
        let experiment = ExperimentRunner::new()
            .run("counting", &CountingCapability::default(), &dataset, &labels, settings(epochs, 8))
            .unwrap();

        for (name, values) in experiment.metrics_history().iter() {
            prop_assert_eq!(
                experiment.get_final_metric_value(name).unwrap(),
                *values.last().unwrap()
            );
        }
        prop_assert!(matches!(
            experiment.get_final_metric_value("auc"),
            Err(Error::UnknownMetric(_))
        ));
    }

    /// Property: mismatched labels fail with ShapeMismatch and never build
    #[test]
    fn prop_shape_mismatch_never_builds(
        (dataset, labels) in arb_dataset(30),
        extra in 1usize..5,
    ) {
        let capability = CountingCapability::default();
        let mut longer = labels;
        longer.extend(std::iter::repeat(0.0).take(extra));

        let result =
            ExperimentRunner::new().run("mismatch", &capability, &dataset, &longer, settings(1, 1));

        prop_assert!(
            matches!(result, Err(Error::ShapeMismatch { .. })),
            "expected ShapeMismatch"
        );
        prop_assert_eq!(capability.builds.get(), 0);
    }

    /// Property: evaluate twice on identical data gives identical reports
    #[test]
    fn prop_evaluate_is_deterministic(
        (dataset, labels) in arb_dataset(30),
    ) {
        let experiment = ExperimentRunner::new()
            .run("counting", &CountingCapability::default(), &dataset, &labels, settings(2, 4))
            .unwrap();

        let first = experiment.evaluate(&dataset, &labels).unwrap();
        let second = experiment.evaluate(&dataset, &labels).unwrap();
        prop_assert_eq!(first, second);
    }

    // ========================================================================
    // Settings properties
    // ========================================================================

    /// Property: thresholds inside [0, 1] are accepted, outside rejected
    #[test]
    fn prop_threshold_bounds(threshold in -2.0f64..3.0) {
        let result = ExperimentSettings::builder(["A"])
            .classification_threshold(threshold)
            .build();
        if (0.0..=1.0).contains(&threshold) {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
        }
    }

    // ========================================================================
    // Metric properties
    // ========================================================================

    /// Property: ratio metrics stay within [0, 1]
    #[test]
    fn prop_ratio_metrics_bounded(
        (predictions, labels) in arb_scored_labels(100),
        threshold in 0.0f64..=1.0,
    ) {
        for value in [
            binary_accuracy(&predictions, &labels, threshold),
            precision(&predictions, &labels, threshold),
            recall(&predictions, &labels, threshold),
            roc_auc(&predictions, &labels, 200),
        ] {
            prop_assert!((0.0..=1.0 + 1e-12).contains(&value), "out of range: {}", value);
        }
    }

    /// Property: flipping predictions mirrors the AUC when both classes exist
    #[test]
    fn prop_auc_flip_symmetry(
        (predictions, labels) in arb_scored_labels(60),
    ) {
        let positives = labels.iter().filter(|&&label| label > 0.5).count();
        prop_assume!(positives > 0 && positives < labels.len());
        // stay off the threshold grid so both orderings bin identically
        let predictions: Vec<f64> = predictions.iter().map(|p| 0.0025 + p * 0.99).collect();
        let flipped: Vec<f64> = predictions.iter().map(|p| 1.0 - p).collect();

        let auc = roc_auc(&predictions, &labels, 200);
        let flipped_auc = roc_auc(&flipped, &labels, 200);
        prop_assert!(auc + flipped_auc <= 1.0 + 1e-9);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Property: same seed, same data, same settings ⇒ identical histories
    #[test]
    fn prop_same_seed_same_history(
        (dataset, labels) in arb_dataset(20),
        seed in any::<u64>(),
    ) {
        let runner = ExperimentRunner::with_seed(seed);
        let first = runner.run("a", &LinearRegressor, &dataset, &labels, settings(3, 4)).unwrap();
        let second = runner.run("b", &LinearRegressor, &dataset, &labels, settings(3, 4)).unwrap();
        prop_assert_eq!(first.metrics_history(), second.metrics_history());
    }
}
