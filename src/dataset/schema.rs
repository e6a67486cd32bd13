//! Typed dataset schema, validated once at the Arrow boundary

use crate::{Error, Result};
use arrow::datatypes::{DataType, Schema};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Logical type of a dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Stored as `Float64`; usable as a model input or regression label.
    Numeric,
    /// Stored as `Utf8`; usable to derive labels (e.g. a class name).
    Categorical,
}

impl ColumnKind {
    /// Map an Arrow type to a column kind.
    ///
    /// Returns `None` for types the dataset does not accept.
    #[must_use]
    pub const fn from_arrow(data_type: &DataType) -> Option<Self> {
        match data_type {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float16
            | DataType::Float32
            | DataType::Float64 => Some(Self::Numeric),
            DataType::Utf8 | DataType::LargeUtf8 => Some(Self::Categorical),
            _ => None,
        }
    }

    /// Arrow type a column of this kind is stored as.
    #[must_use]
    pub const fn storage_type(self) -> DataType {
        match self {
            Self::Numeric => DataType::Float64,
            Self::Categorical => DataType::Utf8,
        }
    }
}

/// Fixed mapping from column name to column kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSchema {
    columns: Vec<(String, ColumnKind)>,
    index: HashMap<String, usize>,
}

impl DatasetSchema {
    /// Validate an Arrow schema and derive the typed schema.
    ///
    /// # Errors
    ///
    /// Returns `Error::Schema` if the schema is empty, repeats a column name,
    /// or contains a column type other than integer, float or string.
    pub fn from_arrow(schema: &Schema) -> Result<Self> {
        if schema.fields().is_empty() {
            return Err(Error::Schema("dataset has no columns".to_string()));
        }

        let mut columns = Vec::with_capacity(schema.fields().len());
        let mut index = HashMap::with_capacity(schema.fields().len());
        for (position, field) in schema.fields().iter().enumerate() {
            let kind = ColumnKind::from_arrow(field.data_type()).ok_or_else(|| {
                Error::Schema(format!(
                    "column '{}' has unsupported type {}",
                    field.name(),
                    field.data_type()
                ))
            })?;
            if index.insert(field.name().clone(), position).is_some() {
                return Err(Error::Schema(format!(
                    "column '{}' appears more than once",
                    field.name()
                )));
            }
            columns.push((field.name().clone(), kind));
        }

        Ok(Self { columns, index })
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema has no columns (never true for a validated schema).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns in storage order.
    #[must_use]
    pub fn columns(&self) -> &[(String, ColumnKind)] {
        &self.columns
    }

    /// Column names in storage order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Whether a column with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Kind of the named column.
    #[must_use]
    pub fn kind(&self, name: &str) -> Option<ColumnKind> {
        self.index.get(name).map(|&position| self.columns[position].1)
    }

    /// Storage position of the named column.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Position of a numeric column.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownFeature` if the column is missing or categorical.
    pub fn require_numeric(&self, name: &str) -> Result<usize> {
        match self.index.get(name) {
            Some(&position) if self.columns[position].1 == ColumnKind::Numeric => Ok(position),
            _ => Err(Error::UnknownFeature(name.to_string())),
        }
    }
}
