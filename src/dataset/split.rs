//! Dataset preparation: z-score normalization and shuffled splits

use super::{ColumnKind, Dataset};
use crate::{Error, Result};
use arrow::array::{ArrayRef, Float64Array};
use arrow::record_batch::RecordBatch;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Arc;

/// Train/validation/test partition of one dataset.
#[derive(Debug, Clone)]
pub struct DatasetSplit {
    /// Rows used for fitting.
    pub train: Dataset,
    /// Rows held back for tuning decisions.
    pub validation: Dataset,
    /// Rows held back for the final comparison.
    pub test: Dataset,
}

impl Dataset {
    /// Z-score every numeric column: `(x - mean) / std`, with the sample
    /// standard deviation. Categorical columns are kept as they are.
    ///
    /// A column with zero deviation (or fewer than two rows) is only centered.
    ///
    /// # Errors
    ///
    /// Returns `Error::Arrow` if the normalized batch cannot be assembled.
    pub fn normalized(&self) -> Result<Self> {
        let mut columns: Vec<ArrayRef> = Vec::with_capacity(self.schema.len());
        for (position, (name, kind)) in self.schema.columns().iter().enumerate() {
            match kind {
                ColumnKind::Numeric => {
                    let values = self.numeric(name)?;
                    columns.push(Arc::new(Float64Array::from(z_scores(values))));
                }
                ColumnKind::Categorical => columns.push(Arc::clone(self.batch.column(position))),
            }
        }

        let batch = RecordBatch::try_new(self.batch.schema(), columns)?;
        Ok(Self {
            schema: self.schema.clone(),
            batch,
        })
    }

    /// Shuffle rows with `seed` and cut them into train, validation and test.
    ///
    /// `train` gets `round(n * train_fraction)` rows, `validation` the next
    /// `round(n * validation_fraction)` rows, and `test` the rest.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfiguration` if a fraction is negative or not
    /// finite, or if the two fractions sum to more than 1.
    #[allow(clippy::cast_precision_loss)]
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    pub fn split(
        &self,
        train_fraction: f64,
        validation_fraction: f64,
        seed: u64,
    ) -> Result<DatasetSplit> {
        for fraction in [train_fraction, validation_fraction] {
            if !fraction.is_finite() || fraction < 0.0 {
                return Err(Error::InvalidConfiguration(format!(
                    "split fraction must be a non-negative number, got {fraction}"
                )));
            }
        }
        if train_fraction + validation_fraction > 1.0 {
            return Err(Error::InvalidConfiguration(format!(
                "split fractions sum to {}, which exceeds 1",
                train_fraction + validation_fraction
            )));
        }

        let rows = self.num_rows();
        let mut order: Vec<usize> = (0..rows).collect();
        order.shuffle(&mut StdRng::seed_from_u64(seed));

        let train_end = ((rows as f64 * train_fraction).round() as usize).min(rows);
        let validation_end =
            (train_end + (rows as f64 * validation_fraction).round() as usize).min(rows);

        tracing::debug!(
            rows,
            train = train_end,
            validation = validation_end - train_end,
            test = rows - validation_end,
            seed,
            "split dataset"
        );

        Ok(DatasetSplit {
            train: self.take_rows(&order[..train_end])?,
            validation: self.take_rows(&order[train_end..validation_end])?,
            test: self.take_rows(&order[validation_end..])?,
        })
    }
}

#[allow(clippy::cast_precision_loss)]
fn z_scores(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = if values.len() < 2 {
        0.0
    } else {
        (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
    };
    let scale = if std > 0.0 { std } else { 1.0 };
    values.iter().map(|v| (v - mean) / scale).collect()
}
