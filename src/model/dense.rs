//! One-unit dense model
//!
//! `output = activation(w · x + b)` over the concatenated input features,
//! trained with mini-batch RMSprop. The head decides the activation and the
//! loss; everything else is shared by the classifier and the regressor.

use super::{FitOptions, RmsProp, TrainedModel};
use crate::dataset::FeatureColumns;
use crate::experiment::MetricsHistory;
use crate::metrics::{compute_all, LossKind, Metric};
use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fmt::Write as _;

/// Output activation and matching loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Head {
    /// Sigmoid output, binary cross-entropy loss.
    Logistic,
    /// Identity output, mean squared error loss.
    Linear,
}

impl Head {
    /// Loss minimized with this head.
    #[must_use]
    pub const fn loss(self) -> LossKind {
        match self {
            Self::Logistic => LossKind::BinaryCrossentropy,
            Self::Linear => LossKind::MeanSquaredError,
        }
    }

    fn activate(self, z: f64) -> f64 {
        match self {
            Self::Logistic => 1.0 / (1.0 + (-z).exp()),
            Self::Linear => z,
        }
    }

    /// d(loss)/d(z) = scale * (prediction - label) for a single row.
    const fn gradient_scale(self) -> f64 {
        match self {
            Self::Logistic => 1.0,
            Self::Linear => 2.0,
        }
    }
}

/// A single dense unit with its optimizer state.
#[derive(Debug, Clone)]
pub struct DenseModel {
    input_features: Vec<String>,
    weights: Vec<f64>,
    bias: f64,
    head: Head,
    metrics: Vec<Metric>,
    optimizer: RmsProp,
}

impl DenseModel {
    /// Build an untrained unit.
    ///
    /// Weights are drawn Glorot-uniform from a generator seeded with `seed`;
    /// the bias starts at zero. `loss` is always tracked first, followed by
    /// `extra_metrics`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfiguration` if `input_features` is empty.
    #[allow(clippy::cast_precision_loss)]
    pub fn new(
        input_features: Vec<String>,
        head: Head,
        extra_metrics: &[Metric],
        learning_rate: f64,
        seed: u64,
    ) -> Result<Self> {
        if input_features.is_empty() {
            return Err(Error::InvalidConfiguration(
                "a dense model needs at least one input feature".to_string(),
            ));
        }

        let fan_in = input_features.len();
        let limit = (6.0 / (fan_in + 1) as f64).sqrt();
        let mut rng = StdRng::seed_from_u64(seed);
        let weights = (0..fan_in).map(|_| rng.gen_range(-limit..=limit)).collect();

        let mut metrics = Vec::with_capacity(extra_metrics.len() + 1);
        metrics.push(Metric::Loss(head.loss()));
        metrics.extend_from_slice(extra_metrics);

        Ok(Self {
            optimizer: RmsProp::new(learning_rate, fan_in),
            input_features,
            weights,
            bias: 0.0,
            head,
            metrics,
        })
    }

    /// Weights, one per input feature.
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Bias term.
    #[must_use]
    pub const fn bias(&self) -> f64 {
        self.bias
    }

    /// Output head.
    #[must_use]
    pub const fn head(&self) -> Head {
        self.head
    }

    /// Weight of one input feature.
    #[must_use]
    pub fn weight(&self, feature: &str) -> Option<f64> {
        self.input_features
            .iter()
            .position(|name| name == feature)
            .map(|position| self.weights[position])
    }

    /// Render the fitted pre-activation, e.g.
    /// `FARE = 2.000 * TRIP_MILES + 0.500 * TRIP_MINUTES + 3.500`.
    #[must_use]
    pub fn equation(&self, label: &str) -> String {
        let mut equation = format!("{label} =");
        for (feature, weight) in self.input_features.iter().zip(&self.weights) {
            let _ = write!(equation, " {weight:.3} * {feature} +");
        }
        let _ = write!(equation, " {:.3}", self.bias);
        equation
    }

    fn forward(&self, columns: &[&[f64]], row: usize) -> f64 {
        let z = columns
            .iter()
            .zip(&self.weights)
            .fold(self.bias, |acc, (column, weight)| weight.mul_add(column[row], acc));
        self.head.activate(z)
    }

    fn check_labels(&self, labels: &[f64]) -> Result<()> {
        if self.head == Head::Logistic {
            if let Some(label) = labels.iter().find(|&&label| label != 0.0 && label != 1.0) {
                return Err(Error::TrainingFailure(format!(
                    "binary classifier labels must be 0 or 1, found {label}"
                )));
            }
        } else if let Some(label) = labels.iter().find(|label| !label.is_finite()) {
            return Err(Error::TrainingFailure(format!(
                "regression labels must be finite, found {label}"
            )));
        }
        Ok(())
    }
}

impl TrainedModel for DenseModel {
    fn input_features(&self) -> &[String] {
        &self.input_features
    }

    fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    #[allow(clippy::cast_precision_loss)]
    fn fit(
        &mut self,
        features: &FeatureColumns,
        labels: &[f64],
        options: &FitOptions,
    ) -> Result<MetricsHistory> {
        let rows = features.num_rows();
        if labels.len() != rows {
            return Err(Error::ShapeMismatch {
                feature_rows: rows,
                label_rows: labels.len(),
            });
        }
        if rows == 0 {
            return Err(Error::TrainingFailure("no training rows".to_string()));
        }
        if options.batch_size == 0 || options.epochs == 0 {
            return Err(Error::InvalidConfiguration(
                "batch_size and epochs must be positive".to_string(),
            ));
        }
        self.check_labels(labels)?;

        let columns = features.aligned(&self.input_features)?;
        let scale = self.head.gradient_scale();
        let mut order: Vec<usize> = (0..rows).collect();
        let mut gradients = vec![0.0; self.weights.len()];
        let mut history = MetricsHistory::new();

        for epoch in 0..options.epochs {
            let mut rng = StdRng::seed_from_u64(options.seed.wrapping_add(epoch as u64));
            order.shuffle(&mut rng);

            let mut predictions = Vec::with_capacity(rows);
            let mut targets = Vec::with_capacity(rows);
            for batch in order.chunks(options.batch_size) {
                gradients.fill(0.0);
                let mut bias_gradient = 0.0;
                let batch_scale = scale / batch.len() as f64;

                for &row in batch {
                    let prediction = self.forward(&columns, row);
                    let error = batch_scale * (prediction - labels[row]);
                    for (gradient, column) in gradients.iter_mut().zip(&columns) {
                        *gradient = error.mul_add(column[row], *gradient);
                    }
                    bias_gradient += error;
                    predictions.push(prediction);
                    targets.push(labels[row]);
                }

                self.optimizer
                    .step(&mut self.weights, &mut self.bias, &gradients, bias_gradient);
            }

            let report = compute_all(&self.metrics, &predictions, &targets);
            let loss = report.get("loss").unwrap_or(f64::NAN);
            if !loss.is_finite()
                || !self.bias.is_finite()
                || self.weights.iter().any(|weight| !weight.is_finite())
            {
                return Err(Error::TrainingFailure(format!(
                    "loss diverged at epoch {epoch}"
                )));
            }
            tracing::debug!(epoch, loss, metrics = %report, "Epoch complete");
            history.push_epoch(&report)?;
        }

        Ok(history)
    }

    fn predict(&self, features: &FeatureColumns) -> Result<Vec<f64>> {
        let columns = features.aligned(&self.input_features)?;
        Ok((0..features.num_rows())
            .map(|row| self.forward(&columns, row))
            .collect())
    }
}
