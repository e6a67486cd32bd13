//! Metrics report - one value per metric name

use serde::ser::{Serialize, Serializer};
use std::fmt;

/// Ordered mapping from metric name to a single value.
///
/// Produced by evaluating an experiment on held-out data. Insertion order is
/// kept, so reports list metrics in the order the model tracks them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsReport {
    values: Vec<(String, f64)>,
}

impl MetricsReport {
    /// Create an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a metric value, replacing an existing entry with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        if let Some(entry) = self.values.iter_mut().find(|(key, _)| *key == name) {
            entry.1 = value;
        } else {
            self.values.push((name, value));
        }
    }

    /// Value of a metric.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|&(_, value)| value)
    }

    /// Whether the report has a value for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Metric names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(key, _)| key.as_str())
    }

    /// `(name, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(key, value)| (key.as_str(), *value))
    }

    /// Number of metrics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the report is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for MetricsReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (name, value)) in self.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}={value:.4}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut report = MetricsReport::new();
        report.insert("loss", 0.7);
        report.insert("accuracy", 0.5);
        report.insert("loss", 0.6);

        assert_eq!(report.len(), 2);
        assert_eq!(report.get("loss"), Some(0.6));
        assert_eq!(report.names().collect::<Vec<_>>(), vec!["loss", "accuracy"]);
    }

    #[test]
    fn test_serializes_as_map() {
        let mut report = MetricsReport::new();
        report.insert("loss", 0.25);
        report.insert("auc", 0.5);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json, serde_json::json!({"loss": 0.25, "auc": 0.5}));
    }

    #[test]
    fn test_display() {
        let mut report = MetricsReport::new();
        report.insert("loss", 0.25);
        report.insert("auc", 0.5);
        assert_eq!(report.to_string(), "loss=0.2500, auc=0.5000");
    }
}
