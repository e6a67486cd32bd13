//! Tabular dataset provider (Arrow/Parquet)
//!
//! A [`Dataset`] wraps a single Arrow `RecordBatch` whose columns were
//! validated once against a typed [`DatasetSchema`]:
//! - Numeric columns (any integer or float type) are stored as `Float64`
//! - String columns are stored as `Utf8` and treated as categorical
//! - Null values are rejected at the boundary
//!
//! Internally every access goes through typed accessors
//! ([`Dataset::numeric`], [`Dataset::categorical`]), never through raw
//! Arrow downcasts.
//!
//! ## Example
//!
//! ```rust
//! use trueno_lab::dataset::Dataset;
//!
//! let dataset = Dataset::builder()
//!     .numeric("Area", vec![4537.0, 2872.0, 3048.0])
//!     .categorical("Class", &["Cammeo", "Osmancik", "Osmancik"])
//!     .build()?;
//!
//! assert_eq!(dataset.num_rows(), 3);
//! assert_eq!(dataset.binary_labels("Class", "Cammeo")?, vec![1.0, 0.0, 0.0]);
//! # Ok::<(), trueno_lab::Error>(())
//! ```

mod features;
mod schema;
mod split;

pub use features::FeatureColumns;
pub use schema::{ColumnKind, DatasetSchema};
pub use split::DatasetSplit;

use crate::{Error, Result};
use arrow::array::{Array, ArrayRef, Float64Array, StringArray, UInt64Array};
use arrow::compute;
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use std::path::Path;
use std::sync::Arc;

/// Columnar table with a validated schema.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: DatasetSchema,
    batch: RecordBatch,
}

impl Dataset {
    /// Validate a record batch and normalize its column storage types.
    ///
    /// # Errors
    ///
    /// Returns `Error::Schema` for unsupported column types or null values,
    /// and `Error::Arrow` if a numeric column cannot be cast to `Float64`.
    pub fn try_new(batch: RecordBatch) -> Result<Self> {
        let schema = DatasetSchema::from_arrow(&batch.schema())?;

        let mut fields = Vec::with_capacity(schema.len());
        let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.len());
        for ((name, kind), column) in schema.columns().iter().zip(batch.columns()) {
            if column.null_count() > 0 {
                return Err(Error::Schema(format!(
                    "column '{name}' has {} missing values",
                    column.null_count()
                )));
            }

            let storage_type = kind.storage_type();
            let column = if column.data_type() == &storage_type {
                Arc::clone(column)
            } else {
                compute::cast(column, &storage_type)?
            };
            fields.push(Field::new(name.as_str(), storage_type, false));
            columns.push(column);
        }

        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?;
        Ok(Self { schema, batch })
    }

    /// Create a builder for assembling a dataset column by column.
    #[must_use]
    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::default()
    }

    /// Load a table from a Parquet file
    ///
    /// All row groups are concatenated into one batch.
    ///
    /// # Errors
    /// Returns `Error::Io` if the file cannot be opened, `Error::StorageError`
    /// if it cannot be parsed, or any error of [`Dataset::try_new`]
    pub fn load_parquet<P: AsRef<Path>>(path: P) -> Result<Self> {
        use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
        use std::fs::File;

        let file = File::open(path.as_ref())?;

        let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| {
            Error::StorageError(format!("Failed to parse Parquet file: {e}"))
        })?;
        let arrow_schema = Arc::clone(builder.schema());

        let reader = builder.build().map_err(|e| {
            Error::StorageError(format!("Failed to create Parquet reader: {e}"))
        })?;

        let mut batches = Vec::new();
        for batch in reader {
            let batch = batch.map_err(|e| {
                Error::StorageError(format!("Failed to read record batch: {e}"))
            })?;
            batches.push(batch);
        }

        let combined = compute::concat_batches(&arrow_schema, &batches)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            rows = combined.num_rows(),
            columns = combined.num_columns(),
            "loaded parquet dataset"
        );
        Self::try_new(combined)
    }

    /// Number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Typed schema.
    #[must_use]
    pub const fn schema(&self) -> &DatasetSchema {
        &self.schema
    }

    /// Underlying Arrow batch (numeric columns as `Float64`, strings as `Utf8`).
    #[must_use]
    pub const fn record_batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Values of a numeric column.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownFeature` if the column is missing or categorical.
    pub fn numeric(&self, name: &str) -> Result<&[f64]> {
        let position = self.schema.require_numeric(name)?;
        let array = self
            .batch
            .column(position)
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or_else(|| Error::Schema(format!("column '{name}' is not stored as Float64")))?;
        Ok(&array.values()[..])
    }

    /// Values of a categorical column.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownFeature` if the column is missing and
    /// `Error::Schema` if it is numeric.
    pub fn categorical(&self, name: &str) -> Result<Vec<&str>> {
        let position = self
            .schema
            .position(name)
            .ok_or_else(|| Error::UnknownFeature(name.to_string()))?;
        let array = self
            .batch
            .column(position)
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| Error::Schema(format!("column '{name}' is not categorical")))?;
        Ok((0..array.len()).map(|row| array.value(row)).collect())
    }

    /// Extract the named numeric columns, in order.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownFeature` for the first column that is missing or
    /// not numeric.
    pub fn select<S: AsRef<str>>(&self, features: &[S]) -> Result<FeatureColumns> {
        let columns = features
            .iter()
            .map(|name| {
                let name = name.as_ref();
                Ok((name.to_string(), self.numeric(name)?.to_vec()))
            })
            .collect::<Result<Vec<_>>>()?;
        FeatureColumns::new(columns)
    }

    /// Derive 0/1 labels from a categorical column: 1 where the value equals
    /// `positive`, 0 elsewhere.
    ///
    /// # Errors
    ///
    /// Same as [`Dataset::categorical`].
    pub fn binary_labels(&self, column: &str, positive: &str) -> Result<Vec<f64>> {
        Ok(self
            .categorical(column)?
            .into_iter()
            .map(|value| if value == positive { 1.0 } else { 0.0 })
            .collect())
    }

    /// Return a copy with a numeric column added, or replaced if the name
    /// already exists.
    ///
    /// # Errors
    ///
    /// Returns `Error::Arrow` if `values` does not have one entry per row.
    pub fn with_numeric_column(&self, name: &str, values: Vec<f64>) -> Result<Self> {
        let column: ArrayRef = Arc::new(Float64Array::from(values));
        let mut fields: Vec<Field> = self
            .batch
            .schema()
            .fields()
            .iter()
            .map(|field| field.as_ref().clone())
            .collect();
        let mut columns = self.batch.columns().to_vec();

        if let Some(position) = self.schema.position(name) {
            fields[position] = Field::new(name, ColumnKind::Numeric.storage_type(), false);
            columns[position] = column;
        } else {
            fields.push(Field::new(name, ColumnKind::Numeric.storage_type(), false));
            columns.push(column);
        }

        Self::try_new(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
    }

    /// Rows at `rows`, in that order.
    pub(crate) fn take_rows(&self, rows: &[usize]) -> Result<Self> {
        let indices = UInt64Array::from_iter_values(rows.iter().map(|&row| row as u64));
        let batch = compute::take_record_batch(&self.batch, &indices)?;
        Ok(Self {
            schema: self.schema.clone(),
            batch,
        })
    }
}

/// Builder for `Dataset`.
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    fields: Vec<Field>,
    columns: Vec<ArrayRef>,
}

impl DatasetBuilder {
    /// Add a numeric column.
    #[must_use]
    pub fn numeric(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.fields.push(Field::new(
            name.into(),
            ColumnKind::Numeric.storage_type(),
            false,
        ));
        self.columns.push(Arc::new(Float64Array::from(values)));
        self
    }

    /// Add a categorical column.
    #[must_use]
    pub fn categorical<S: AsRef<str>>(mut self, name: impl Into<String>, values: &[S]) -> Self {
        self.fields.push(Field::new(
            name.into(),
            ColumnKind::Categorical.storage_type(),
            false,
        ));
        self.columns.push(Arc::new(StringArray::from_iter_values(
            values.iter().map(AsRef::as_ref),
        )));
        self
    }

    /// Build the `Dataset`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Arrow` if the columns differ in length and
    /// `Error::Schema` if no column was added or a name repeats.
    pub fn build(self) -> Result<Dataset> {
        if self.columns.is_empty() {
            return Err(Error::Schema("dataset has no columns".to_string()));
        }
        let batch = RecordBatch::try_new(Arc::new(Schema::new(self.fields)), self.columns)?;
        Dataset::try_new(batch)
    }
}
