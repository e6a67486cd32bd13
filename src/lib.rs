//! # Trueno-Lab: Experiment Tracking for Small Tabular Models
//!
//! **Version**: 0.1.0
//!
//! Trueno-Lab runs the settings → model → training run → metrics →
//! comparison loop for one-unit tabular models over Arrow-backed datasets.
//! Every run records one value per tracked metric per epoch, and finished
//! runs can be compared side by side on held-out data.
//!
//! ## Design Principles (Toyota Way Aligned)
//!
//! - **Poka-Yoke safety**: Settings and dataset schemas are validated once,
//!   at construction; invalid runs are rejected before a model is built
//! - **Genchi Genbutsu**: Training metrics and evaluation metrics share one
//!   formula per metric
//! - **Jidoka**: A training run either covers every epoch or fails; no
//!   partial experiments
//! - **Heijunka**: Explicit seeds; identical inputs give identical histories
//!
//! ## Example Usage
//!
//! ```rust
//! use trueno_lab::dataset::Dataset;
//! use trueno_lab::experiment::{ExperimentRunner, ExperimentSettings};
//! use trueno_lab::model::BinaryClassifier;
//!
//! let area: Vec<f64> = (0..60).map(|i| f64::from(i) / 30.0 - 1.0).collect();
//! let class: Vec<&str> = area
//!     .iter()
//!     .map(|&a| if a > 0.0 { "Cammeo" } else { "Osmancik" })
//!     .collect();
//! let data = Dataset::builder()
//!     .numeric("Area", area)
//!     .categorical("Class", &class)
//!     .build()?;
//! let labels = data.binary_labels("Class", "Cammeo")?;
//!
//! let settings = ExperimentSettings::builder(["Area"])
//!     .learning_rate(0.01)
//!     .number_epochs(10)
//!     .batch_size(16)
//!     .classification_threshold(0.5)
//!     .build()?;
//!
//! let experiment = ExperimentRunner::new().run(
//!     "area_only",
//!     &BinaryClassifier::new(),
//!     &data,
//!     &labels,
//!     settings,
//! )?;
//! println!("final accuracy: {}", experiment.get_final_metric_value("accuracy")?);
//! # Ok::<(), trueno_lab::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod dataset;
pub mod error;
pub mod experiment;
pub mod metrics;
pub mod model;

pub use dataset::Dataset;
pub use error::{Error, Result};
pub use experiment::{
    ComparisonReport, Experiment, ExperimentComparator, ExperimentRunner, ExperimentSettings,
};
pub use metrics::{Metric, MetricsReport};
pub use model::{BinaryClassifier, LinearRegressor, ModelCapability, TrainedModel};
