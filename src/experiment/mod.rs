//! Experiment Tracking
//!
//! Settings → model → training run → metrics → comparison.
//!
//! ## Overview
//!
//! ```text
//! ExperimentSettings ──> ExperimentRunner::run ──> Experiment (1)
//!                                                     │
//!                                                     ├── MetricsHistory [per epoch]
//!                                                     └──< MetricRecord (N) [flattened]
//!
//! Experiment (N) ──> ExperimentComparator::compare ──> ComparisonReport
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use trueno_lab::dataset::Dataset;
//! use trueno_lab::experiment::{ExperimentComparator, ExperimentRunner, ExperimentSettings};
//! use trueno_lab::model::LinearRegressor;
//!
//! let miles: Vec<f64> = (0..40).map(|i| f64::from(i) / 4.0).collect();
//! let fares: Vec<f64> = miles.iter().map(|m| 2.5 * m + 3.0).collect();
//! let data = Dataset::builder().numeric("TRIP_MILES", miles).build()?;
//!
//! let settings = ExperimentSettings::builder(["TRIP_MILES"])
//!     .learning_rate(0.01)
//!     .number_epochs(5)
//!     .batch_size(10)
//!     .build()?;
//!
//! let experiment =
//!     ExperimentRunner::new().run("one_feature", &LinearRegressor, &data, &fares, settings)?;
//! assert_eq!(experiment.epochs(), [0, 1, 2, 3, 4]);
//!
//! let report = ExperimentComparator::new().compare(
//!     [&experiment],
//!     &["root_mean_squared_error"],
//!     &data,
//!     &fares,
//! )?;
//! assert!(report.test_value("one_feature", "root_mean_squared_error").is_some());
//! # Ok::<(), trueno_lab::Error>(())
//! ```

mod comparator;
mod history;
mod metric_record;
mod outcome;
mod runner;
mod settings;

pub use comparator::{
    CellValue, ComparisonReport, ComparisonRow, ExperimentComparator, FailurePolicy,
    MetricComparison,
};
pub use history::MetricsHistory;
pub use metric_record::MetricRecord;
pub use outcome::Experiment;
pub use runner::ExperimentRunner;
pub use settings::{ExperimentSettings, ExperimentSettingsBuilder};
