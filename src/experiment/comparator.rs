//! Experiment Comparator - side-by-side train/test metrics
//!
//! Each experiment is evaluated once on the shared held-out set, resolving
//! its own input features, so experiments trained on different feature
//! subsets can be compared in one report.

use super::Experiment;
use crate::dataset::Dataset;
use crate::metrics::MetricsReport;
use crate::model::TrainedModel;
use crate::{Error, Result};
use serde::Serialize;
use std::fmt;

/// What to do when an experiment does not track a requested metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Mark the cell as unknown and keep comparing.
    #[default]
    PerCell,
    /// Fail the whole comparison with `Error::UnknownMetric`.
    Abort,
}

/// One side (train or test) of a comparison cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellValue {
    /// The metric's value.
    Value(f64),
    /// The experiment does not track the metric.
    UnknownMetric,
}

impl CellValue {
    /// The value, if known.
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Value(value) => Some(value),
            Self::UnknownMetric => None,
        }
    }
}

impl From<Option<f64>> for CellValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::UnknownMetric, Self::Value)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value:.4}"),
            Self::UnknownMetric => write!(f, "unknown"),
        }
    }
}

/// Train and test value of one metric for one experiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricComparison {
    /// Metric name.
    pub metric: String,
    /// Final training value.
    pub train: CellValue,
    /// Value on the held-out set.
    pub test: CellValue,
}

/// One experiment's row of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    /// Experiment name.
    pub experiment: String,
    /// One cell per requested metric, in request order.
    pub cells: Vec<MetricComparison>,
    /// Every tracked metric evaluated on the held-out set.
    pub test_metrics: MetricsReport,
}

impl ComparisonRow {
    /// Cell of one requested metric.
    #[must_use]
    pub fn cell(&self, metric: &str) -> Option<&MetricComparison> {
        self.cells.iter().find(|cell| cell.metric == metric)
    }
}

/// Comparison of several experiments on the same held-out data.
///
/// Rows follow the input experiment order, columns the requested metric
/// order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    metrics: Vec<String>,
    rows: Vec<ComparisonRow>,
}

impl ComparisonReport {
    /// Requested metric names, in order.
    #[must_use]
    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    /// Rows, one per experiment.
    #[must_use]
    pub fn rows(&self) -> &[ComparisonRow] {
        &self.rows
    }

    /// Row of one experiment.
    #[must_use]
    pub fn row(&self, experiment: &str) -> Option<&ComparisonRow> {
        self.rows.iter().find(|row| row.experiment == experiment)
    }

    /// Held-out value of `metric` for `experiment`.
    #[must_use]
    pub fn test_value(&self, experiment: &str, metric: &str) -> Option<f64> {
        self.row(experiment)?.cell(metric)?.test.value()
    }

    /// Final training value of `metric` for `experiment`.
    #[must_use]
    pub fn train_value(&self, experiment: &str, metric: &str) -> Option<f64> {
        self.row(experiment)?.cell(metric)?.train.value()
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_width = self
            .rows
            .iter()
            .map(|row| row.experiment.len())
            .chain(std::iter::once("experiment".len()))
            .max()
            .unwrap_or_default();

        write!(f, "{:<name_width$}", "experiment")?;
        for metric in &self.metrics {
            write!(f, " | {:>10} {:>10}", format!("{metric} (train)"), "(test)")?;
        }
        writeln!(f)?;

        for row in &self.rows {
            write!(f, "{:<name_width$}", row.experiment)?;
            for cell in &row.cells {
                write!(
                    f,
                    " | {:>10} {:>10}",
                    cell.train.to_string(),
                    cell.test.to_string()
                )?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Compares experiments on a shared held-out set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExperimentComparator {
    policy: FailurePolicy,
}

impl ExperimentComparator {
    /// Comparator with the per-cell failure policy.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_policy(FailurePolicy::PerCell)
    }

    /// Comparator with an explicit failure policy.
    #[must_use]
    pub const fn with_policy(policy: FailurePolicy) -> Self {
        Self { policy }
    }

    /// Get the failure policy.
    #[must_use]
    pub const fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Evaluate every experiment on `test_features`/`test_labels` and
    /// collect train/test values of `metric_names`.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidConfiguration` if two experiments share a name
    /// - `Error::ShapeMismatch` / `Error::UnknownFeature` from evaluating
    ///   any experiment
    /// - `Error::UnknownMetric` under [`FailurePolicy::Abort`] when an
    ///   experiment does not track a requested metric
    pub fn compare<'a, M, I, S>(
        &self,
        experiments: I,
        metric_names: &[S],
        test_features: &Dataset,
        test_labels: &[f64],
    ) -> Result<ComparisonReport>
    where
        M: TrainedModel + 'a,
        I: IntoIterator<Item = &'a Experiment<M>>,
        S: AsRef<str>,
    {
        let metrics: Vec<String> = metric_names
            .iter()
            .map(|name| name.as_ref().to_string())
            .collect();
        let mut rows: Vec<ComparisonRow> = Vec::new();

        for experiment in experiments {
            if rows.iter().any(|row| row.experiment == experiment.name()) {
                return Err(Error::InvalidConfiguration(format!(
                    "experiment name '{}' appears more than once",
                    experiment.name()
                )));
            }

            let test_metrics = experiment.evaluate(test_features, test_labels)?;
            let cells = metrics
                .iter()
                .map(|metric| self.cell(experiment, &test_metrics, metric))
                .collect::<Result<Vec<_>>>()?;

            tracing::debug!(
                experiment = experiment.name(),
                test_metrics = %test_metrics,
                "Evaluated experiment"
            );
            rows.push(ComparisonRow {
                experiment: experiment.name().to_string(),
                cells,
                test_metrics,
            });
        }

        tracing::info!(
            experiments = rows.len(),
            metrics = ?metrics,
            "Comparison complete"
        );
        Ok(ComparisonReport { metrics, rows })
    }

    fn cell<M: TrainedModel>(
        &self,
        experiment: &Experiment<M>,
        test_metrics: &MetricsReport,
        metric: &str,
    ) -> Result<MetricComparison> {
        let train = match experiment.get_final_metric_value(metric) {
            Ok(value) => Some(value),
            Err(Error::UnknownMetric(_)) => None,
            Err(err) => return Err(err),
        };
        let test = test_metrics.get(metric);

        if train.is_none() || test.is_none() {
            if self.policy == FailurePolicy::Abort {
                return Err(Error::UnknownMetric(metric.to_string()));
            }
            tracing::warn!(
                experiment = experiment.name(),
                metric,
                "Metric not tracked by experiment"
            );
        }

        Ok(MetricComparison {
            metric: metric.to_string(),
            train: train.into(),
            test: test.into(),
        })
    }
}
