//! Feature columns extracted from a dataset for model input

use crate::{Error, Result};

/// Ordered mapping from feature name to its column vector.
///
/// All columns have the same length. Column order follows the order the
/// features were requested in, which is the order a model concatenates its
/// inputs in.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureColumns {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
    rows: usize,
}

impl FeatureColumns {
    /// Build feature columns from `(name, values)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `Error::Schema` if no columns are given, a name repeats, or the
    /// columns differ in length.
    pub fn new(columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        let rows = columns
            .first()
            .map(|(_, values)| values.len())
            .ok_or_else(|| Error::Schema("feature set has no columns".to_string()))?;

        let mut names = Vec::with_capacity(columns.len());
        let mut values = Vec::with_capacity(columns.len());
        for (name, column) in columns {
            if column.len() != rows {
                return Err(Error::Schema(format!(
                    "feature '{name}' has {} rows, expected {rows}",
                    column.len()
                )));
            }
            if names.contains(&name) {
                return Err(Error::Schema(format!("feature '{name}' appears more than once")));
            }
            names.push(name);
            values.push(column);
        }

        Ok(Self {
            names,
            columns: values,
            rows,
        })
    }

    /// Number of rows.
    #[must_use]
    pub const fn num_rows(&self) -> usize {
        self.rows
    }

    /// Number of feature columns.
    #[must_use]
    pub fn num_features(&self) -> usize {
        self.names.len()
    }

    /// Feature names in column order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Values of one feature.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|candidate| candidate == name)
            .map(|position| self.columns[position].as_slice())
    }

    /// Iterate `(name, values)` in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Columns for `names`, in that order.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownFeature` for the first name that is not present.
    pub fn aligned(&self, names: &[String]) -> Result<Vec<&[f64]>> {
        names
            .iter()
            .map(|name| {
                self.column(name)
                    .ok_or_else(|| Error::UnknownFeature(name.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FeatureColumns {
        FeatureColumns::new(vec![
            ("A".to_string(), vec![1.0, 2.0, 3.0]),
            ("B".to_string(), vec![4.0, 5.0, 6.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_feature_columns_shape() {
        let features = sample();
        assert_eq!(features.num_rows(), 3);
        assert_eq!(features.num_features(), 2);
        assert_eq!(features.names(), ["A".to_string(), "B".to_string()]);
        assert_eq!(features.column("B"), Some(&[4.0, 5.0, 6.0][..]));
    }

    #[test]
    fn test_feature_columns_reject_ragged() {
        let err = FeatureColumns::new(vec![
            ("A".to_string(), vec![1.0, 2.0]),
            ("B".to_string(), vec![1.0]),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    #[test]
    fn test_feature_columns_reject_empty() {
        assert!(FeatureColumns::new(Vec::new()).is_err());
    }

    #[test]
    fn test_aligned_reorders_and_reports_missing() {
        let features = sample();
        let aligned = features
            .aligned(&["B".to_string(), "A".to_string()])
            .unwrap();
        assert_eq!(aligned[0], &[4.0, 5.0, 6.0]);
        assert_eq!(aligned[1], &[1.0, 2.0, 3.0]);

        let err = features.aligned(&["C".to_string()]).unwrap_err();
        assert!(matches!(err, Error::UnknownFeature(name) if name == "C"));
    }
}
