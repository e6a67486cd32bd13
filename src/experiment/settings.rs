//! Experiment Settings - validated configuration for one training run

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Immutable configuration of one training run.
///
/// Settings can only be obtained through validation: [`ExperimentSettings::new`],
/// [`ExperimentSettingsBuilder::build`], [`ExperimentSettings::from_json`] or
/// serde deserialization, which all apply the same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ExperimentSettingsBuilder")]
pub struct ExperimentSettings {
    learning_rate: f64,
    number_epochs: usize,
    batch_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    classification_threshold: Option<f64>,
    input_features: Vec<String>,
}

impl ExperimentSettings {
    /// Create validated settings.
    ///
    /// # Arguments
    ///
    /// * `learning_rate` - Optimizer step size, positive
    /// * `number_epochs` - Full passes over the training data, positive
    /// * `batch_size` - Rows per optimizer step, positive
    /// * `classification_threshold` - Decision boundary in `[0, 1]`, for classifiers
    /// * `input_features` - Dataset columns used as model inputs, non-empty
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfiguration` if any argument is out of range.
    pub fn new<I, S>(
        learning_rate: f64,
        number_epochs: usize,
        batch_size: usize,
        classification_threshold: Option<f64>,
        input_features: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut builder = Self::builder(input_features)
            .learning_rate(learning_rate)
            .number_epochs(number_epochs)
            .batch_size(batch_size);
        builder.classification_threshold = classification_threshold;
        builder.build()
    }

    /// Create a builder; `input_features` is the only required field.
    #[must_use]
    pub fn builder<I, S>(input_features: I) -> ExperimentSettingsBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ExperimentSettingsBuilder::new(input_features)
    }

    /// Parse and validate settings from JSON.
    ///
    /// Missing optional fields take the builder defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` for malformed JSON and
    /// `Error::InvalidConfiguration` for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self> {
        let builder: ExperimentSettingsBuilder = serde_json::from_str(json)?;
        builder.build()
    }

    /// Render the settings as a JSON object, e.g. for logs and reports.
    #[must_use]
    pub fn to_config_json(&self) -> serde_json::Value {
        let mut config = serde_json::json!({
            "learning_rate": self.learning_rate,
            "number_epochs": self.number_epochs,
            "batch_size": self.batch_size,
            "input_features": self.input_features,
        });
        if let (Some(threshold), Some(object)) =
            (self.classification_threshold, config.as_object_mut())
        {
            object.insert(
                "classification_threshold".to_string(),
                serde_json::json!(threshold),
            );
        }
        config
    }

    /// Optimizer step size.
    #[must_use]
    pub const fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Number of training epochs.
    #[must_use]
    pub const fn number_epochs(&self) -> usize {
        self.number_epochs
    }

    /// Rows per optimizer step.
    #[must_use]
    pub const fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Decision boundary for classifiers, if set.
    #[must_use]
    pub const fn classification_threshold(&self) -> Option<f64> {
        self.classification_threshold
    }

    /// Input feature columns, in model input order.
    #[must_use]
    pub fn input_features(&self) -> &[String] {
        &self.input_features
    }
}

/// Builder for `ExperimentSettings`.
///
/// Defaults: `learning_rate = 0.001`, `number_epochs = 1`, `batch_size = 32`,
/// no classification threshold.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExperimentSettingsBuilder {
    learning_rate: f64,
    number_epochs: usize,
    batch_size: usize,
    classification_threshold: Option<f64>,
    input_features: Vec<String>,
}

impl Default for ExperimentSettingsBuilder {
    fn default() -> Self {
        Self {
            learning_rate: 0.001,
            number_epochs: 1,
            batch_size: 32,
            classification_threshold: None,
            input_features: Vec::new(),
        }
    }
}

impl ExperimentSettingsBuilder {
    /// Create a new builder with the required input features.
    #[must_use]
    pub fn new<I, S>(input_features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input_features: input_features.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set the learning rate.
    #[must_use]
    pub const fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the number of epochs.
    #[must_use]
    pub const fn number_epochs(mut self, number_epochs: usize) -> Self {
        self.number_epochs = number_epochs;
        self
    }

    /// Set the batch size.
    #[must_use]
    pub const fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the classification threshold.
    #[must_use]
    pub const fn classification_threshold(mut self, threshold: f64) -> Self {
        self.classification_threshold = Some(threshold);
        self
    }

    /// Validate and build the `ExperimentSettings`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfiguration` if the learning rate is not a
    /// positive finite number, epochs or batch size is zero, the threshold is
    /// outside `[0, 1]`, or the input features are empty, blank or repeated.
    pub fn build(self) -> Result<ExperimentSettings> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.number_epochs == 0 {
            return Err(Error::InvalidConfiguration(
                "number_epochs must be positive".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(Error::InvalidConfiguration(
                "batch_size must be positive".to_string(),
            ));
        }
        if let Some(threshold) = self.classification_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(Error::InvalidConfiguration(format!(
                    "classification_threshold must be within [0, 1], got {threshold}"
                )));
            }
        }
        if self.input_features.is_empty() {
            return Err(Error::InvalidConfiguration(
                "input_features must name at least one column".to_string(),
            ));
        }
        for (position, feature) in self.input_features.iter().enumerate() {
            if feature.trim().is_empty() {
                return Err(Error::InvalidConfiguration(
                    "input_features contains a blank column name".to_string(),
                ));
            }
            if self.input_features[..position].contains(feature) {
                return Err(Error::InvalidConfiguration(format!(
                    "input feature '{feature}' is listed more than once"
                )));
            }
        }

        Ok(ExperimentSettings {
            learning_rate: self.learning_rate,
            number_epochs: self.number_epochs,
            batch_size: self.batch_size,
            classification_threshold: self.classification_threshold,
            input_features: self.input_features,
        })
    }
}

impl TryFrom<ExperimentSettingsBuilder> for ExperimentSettings {
    type Error = Error;

    fn try_from(builder: ExperimentSettingsBuilder) -> Result<Self> {
        builder.build()
    }
}
