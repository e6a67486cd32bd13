//! Integration test for the experiment workflow
//!
//! Tests the complete training pipeline:
//! 1. Build a dataset and validated settings
//! 2. Run an experiment through a model capability
//! 3. Inspect per-epoch histories and final metric values
//! 4. Evaluate on held-out rows
//!
//! Toyota Way: Jidoka (Built-in Quality)

use std::cell::Cell;
use trueno_lab::dataset::{Dataset, FeatureColumns};
use trueno_lab::experiment::{ExperimentRunner, ExperimentSettings, MetricsHistory};
use trueno_lab::metrics::{LossKind, Metric};
use trueno_lab::model::{
    BinaryClassifier, FitOptions, LinearRegressor, ModelCapability, TrainedModel,
};
use trueno_lab::Error;

// ============================================================================
// Test doubles
// ============================================================================

/// Deterministic model: predicts a constant and reports a scripted history.
#[derive(Debug)]
struct ScriptedModel {
    features: Vec<String>,
    metrics: Vec<Metric>,
    epochs_reported: Option<usize>,
    fail_with: Option<fn() -> Error>,
}

impl TrainedModel for ScriptedModel {
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
        if let Some(fail) = self.fail_with {
            return Err(fail());
        }
        let epochs = self.epochs_reported.unwrap_or(options.epochs);
        let loss = (0..epochs).map(|epoch| 1.0 / (epoch as f64 + 1.0)).collect();
        MetricsHistory::from_series(vec![("loss", loss)])
    }

    fn predict(&self, features: &FeatureColumns) -> trueno_lab::Result<Vec<f64>> {
        features.aligned(&self.features)?;
        Ok(vec![0.5; features.num_rows()])
    }
}

/// Counts how often it is asked to build.
#[derive(Debug, Default)]
struct ScriptedCapability {
    builds: Cell<usize>,
    epochs_reported: Option<usize>,
    fail_with: Option<fn() -> Error>,
}

impl ModelCapability for ScriptedCapability {
    type Model = ScriptedModel;

    fn build(
        &self,
        settings: &ExperimentSettings,
        _seed: u64,
    ) -> trueno_lab::Result<ScriptedModel> {
        self.builds.set(self.builds.get() + 1);
        Ok(ScriptedModel {
            features: settings.input_features().to_vec(),
            metrics: vec![Metric::Loss(LossKind::MeanSquaredError)],
            epochs_reported: self.epochs_reported,
            fail_with: self.fail_with,
        })
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// 50 rows of `y = 5A + 4B + 10` with A, B in [1, 2].
fn linear_data() -> (Dataset, Vec<f64>) {
    let a: Vec<f64> = (0..50).map(|i| 1.0 + f64::from(i) / 50.0).collect();
    let b: Vec<f64> = (0..50).map(|i| 2.0 - f64::from(i % 10) / 10.0).collect();
    let labels = a
        .iter()
        .zip(&b)
        .map(|(a, b)| 5.0 * a + 4.0 * b + 10.0)
        .collect();
    let dataset = Dataset::builder()
        .numeric("A", a)
        .numeric("B", b)
        .build()
        .unwrap();
    (dataset, labels)
}

fn scenario_settings() -> ExperimentSettings {
    ExperimentSettings::new(0.001, 5, 10, None, ["A", "B"]).unwrap()
}

// ============================================================================
// Workflow
// ============================================================================

#[test]
fn test_regression_run_has_one_entry_per_epoch_and_non_increasing_loss() {
    let (dataset, labels) = linear_data();
    let experiment = ExperimentRunner::new()
        .run("two_features", &LinearRegressor, &dataset, &labels, scenario_settings())
        .unwrap();

    assert_eq!(experiment.epochs(), [0, 1, 2, 3, 4]);
    assert_eq!(
        experiment.metrics_history().names().collect::<Vec<_>>(),
        vec!["loss", "root_mean_squared_error"]
    );

    let loss = experiment.series("loss").unwrap();
    assert_eq!(loss.len(), 5);
    for pair in loss.windows(2) {
        assert!(pair[1] <= pair[0], "loss increased: {loss:?}");
    }
    assert_eq!(
        experiment.get_final_metric_value("loss").unwrap(),
        *loss.last().unwrap()
    );
}

#[test]
fn test_evaluate_is_idempotent_and_leaves_experiment_unchanged() {
    let (dataset, labels) = linear_data();
    let experiment = ExperimentRunner::new()
        .run("two_features", &LinearRegressor, &dataset, &labels, scenario_settings())
        .unwrap();
    let history_before = experiment.metrics_history().clone();

    let first = experiment.evaluate(&dataset, &labels).unwrap();
    let second = experiment.evaluate(&dataset, &labels).unwrap();

    assert_eq!(first, second);
    assert_eq!(experiment.metrics_history(), &history_before);
    let rmse = first.get("root_mean_squared_error").unwrap();
    assert!((rmse * rmse - first.get("loss").unwrap()).abs() < 1e-9);
}

#[test]
fn test_classification_run_tracks_thresholded_metrics() {
    let area: Vec<f64> = (0..80).map(|i| f64::from(i) / 40.0 - 1.0).collect();
    let class: Vec<&str> = area
        .iter()
        .map(|&a| if a > 0.0 { "Cammeo" } else { "Osmancik" })
        .collect();
    let dataset = Dataset::builder()
        .numeric("Area", area)
        .categorical("Class", &class)
        .build()
        .unwrap();
    let labels = dataset.binary_labels("Class", "Cammeo").unwrap();

    let settings = ExperimentSettings::builder(["Area"])
        .learning_rate(0.05)
        .number_epochs(30)
        .batch_size(16)
        .classification_threshold(0.35)
        .build()
        .unwrap();
    let experiment = ExperimentRunner::new()
        .run("area_only", &BinaryClassifier::new(), &dataset, &labels, settings)
        .unwrap();

    for metric in ["loss", "accuracy", "precision", "recall", "auc"] {
        assert_eq!(experiment.series(metric).unwrap().len(), 30, "{metric}");
    }
    assert!(experiment.get_final_metric_value("auc").unwrap() > 0.9);

    let report = experiment.evaluate(&dataset, &labels).unwrap();
    assert!(report.get("accuracy").unwrap() > 0.8);
}

#[test]
fn test_metric_records_flatten_history() {
    let (dataset, labels) = linear_data();
    let experiment = ExperimentRunner::new()
        .run("records", &LinearRegressor, &dataset, &labels, scenario_settings())
        .unwrap();

    let records = experiment.metric_records();
    assert_eq!(records.len(), 10);
    assert!(records.iter().all(|record| record.experiment() == "records"));
    let loss_epochs: Vec<usize> = records
        .iter()
        .filter(|record| record.key() == "loss")
        .map(|record| record.epoch())
        .collect();
    assert_eq!(loss_epochs, vec![0, 1, 2, 3, 4]);
}

// ============================================================================
// Validation and failures
// ============================================================================

#[test]
fn test_shape_mismatch_never_builds_model() {
    let (dataset, _) = linear_data();
    let capability = ScriptedCapability::default();

    let result = ExperimentRunner::new().run(
        "mismatch",
        &capability,
        &dataset,
        &[1.0; 49],
        scenario_settings(),
    );

    assert!(matches!(
        result,
        Err(Error::ShapeMismatch {
            feature_rows: 50,
            label_rows: 49
        })
    ));
    assert_eq!(capability.builds.get(), 0);
}

#[test]
fn test_unknown_feature_never_builds_model() {
    let (dataset, labels) = linear_data();
    let capability = ScriptedCapability::default();
    let settings = ExperimentSettings::builder(["A", "C"]).build().unwrap();

    let result = ExperimentRunner::new().run("missing", &capability, &dataset, &labels, settings);

    assert!(matches!(result, Err(Error::UnknownFeature(name)) if name == "C"));
    assert_eq!(capability.builds.get(), 0);
}

#[test]
fn test_fit_errors_surface_as_training_failure() {
    let (dataset, labels) = linear_data();
    let capability = ScriptedCapability {
        fail_with: Some(|| Error::Schema("bad column".to_string())),
        ..ScriptedCapability::default()
    };

    let result =
        ExperimentRunner::new().run("fails", &capability, &dataset, &labels, scenario_settings());

    match result {
        Err(Error::TrainingFailure(message)) => assert!(message.contains("bad column")),
        other => panic!("expected TrainingFailure, got {:?}", other.err()),
    }
    assert_eq!(capability.builds.get(), 1);
}

#[test]
fn test_short_history_is_training_failure() {
    let (dataset, labels) = linear_data();
    let capability = ScriptedCapability {
        epochs_reported: Some(3),
        ..ScriptedCapability::default()
    };

    let result =
        ExperimentRunner::new().run("short", &capability, &dataset, &labels, scenario_settings());

    assert!(matches!(result, Err(Error::TrainingFailure(_))));
}

#[test]
fn test_divergent_regression_is_training_failure() {
    let dataset = Dataset::builder()
        .numeric("A", vec![1e200, -1e200, 1e200])
        .build()
        .unwrap();
    let settings = ExperimentSettings::builder(["A"])
        .learning_rate(1.0)
        .number_epochs(3)
        .batch_size(1)
        .build()
        .unwrap();

    let result = ExperimentRunner::new().run(
        "diverges",
        &LinearRegressor,
        &dataset,
        &[1e200, -1e200, 1e200],
        settings,
    );

    assert!(matches!(result, Err(Error::TrainingFailure(_))));
}

#[test]
fn test_classifier_rejects_non_binary_labels() {
    let (dataset, labels) = linear_data();
    let settings = ExperimentSettings::builder(["A"]).build().unwrap();

    let result = ExperimentRunner::new().run(
        "not_binary",
        &BinaryClassifier::new(),
        &dataset,
        &labels,
        settings,
    );

    assert!(matches!(result, Err(Error::TrainingFailure(_))));
}
