//! Trainable model capability
//!
//! The runner never sees a concrete model type. It asks a
//! [`ModelCapability`] to build a fresh model from the experiment settings
//! and a seed, then drives it through the [`TrainedModel`] interface:
//!
//! - `fit`: train for `epochs` epochs in batches, returning one value per
//!   tracked metric per epoch
//! - `predict`: continuous outputs for arbitrary rows
//! - `metrics`: the tracked metrics, `loss` first
//!
//! Two one-unit dense models ship with the crate:
//! [`BinaryClassifier`] (sigmoid, binary cross-entropy) and
//! [`LinearRegressor`] (identity, mean squared error), both trained with
//! [`RmsProp`].

mod classifier;
mod dense;
mod optimizer;
mod regressor;

pub use classifier::BinaryClassifier;
pub use dense::{DenseModel, Head};
pub use optimizer::RmsProp;
pub use regressor::LinearRegressor;

use crate::dataset::FeatureColumns;
use crate::experiment::{ExperimentSettings, MetricsHistory};
use crate::metrics::Metric;
use crate::Result;

/// Per-run training options handed to [`TrainedModel::fit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitOptions {
    /// Rows per optimizer step; the last batch of an epoch may be smaller.
    pub batch_size: usize,
    /// Full passes over the training rows.
    pub epochs: usize,
    /// Seed for row shuffling.
    pub seed: u64,
}

impl FitOptions {
    /// Options matching `settings`, shuffled with `seed`.
    #[must_use]
    pub const fn from_settings(settings: &ExperimentSettings, seed: u64) -> Self {
        Self {
            batch_size: settings.batch_size(),
            epochs: settings.number_epochs(),
            seed,
        }
    }
}

/// Factory for untrained models.
pub trait ModelCapability {
    /// Model type produced by [`ModelCapability::build`].
    type Model: TrainedModel;

    /// Build an untrained model for `settings`.
    ///
    /// All randomness of the model (weight initialization) must derive from
    /// `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot describe this kind of model.
    fn build(&self, settings: &ExperimentSettings, seed: u64) -> Result<Self::Model>;
}

/// A model that can be trained and queried.
pub trait TrainedModel {
    /// Input columns, in the order the model concatenates them.
    fn input_features(&self) -> &[String];

    /// Tracked metrics, in reporting order.
    fn metrics(&self) -> &[Metric];

    /// Train on `features`/`labels`.
    ///
    /// # Errors
    ///
    /// Returns an error if training cannot complete.
    fn fit(
        &mut self,
        features: &FeatureColumns,
        labels: &[f64],
        options: &FitOptions,
    ) -> Result<MetricsHistory>;

    /// One continuous output per row of `features`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownFeature` if an input column is missing.
    fn predict(&self, features: &FeatureColumns) -> Result<Vec<f64>>;
}

impl<T: TrainedModel + ?Sized> TrainedModel for Box<T> {
    fn input_features(&self) -> &[String] {
        (**self).input_features()
    }

    fn metrics(&self) -> &[Metric] {
        (**self).metrics()
    }

    fn fit(
        &mut self,
        features: &FeatureColumns,
        labels: &[f64],
        options: &FitOptions,
    ) -> Result<MetricsHistory> {
        (**self).fit(features, labels, options)
    }

    fn predict(&self, features: &FeatureColumns) -> Result<Vec<f64>> {
        (**self).predict(features)
    }
}
