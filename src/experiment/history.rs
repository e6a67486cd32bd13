//! Metrics History - per-epoch values of every tracked metric

use crate::metrics::MetricsReport;
use crate::{Error, Result};
use serde::ser::{Serialize, Serializer};

/// Ordered mapping from metric name to one value per epoch.
///
/// Every series always has exactly [`MetricsHistory::num_epochs`] values.
/// Series keep the order the metrics were first reported in (`loss` first
/// for the built-in models).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsHistory {
    series: Vec<(String, Vec<f64>)>,
    epochs: usize,
}

impl MetricsHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a history from complete series.
    ///
    /// # Errors
    ///
    /// Returns `Error::TrainingFailure` if the series differ in length or a
    /// name repeats.
    pub fn from_series<S: Into<String>>(series: Vec<(S, Vec<f64>)>) -> Result<Self> {
        let epochs = series.first().map_or(0, |(_, values)| values.len());
        let mut history = Self {
            series: Vec::with_capacity(series.len()),
            epochs,
        };
        for (name, values) in series {
            let name = name.into();
            if values.len() != epochs {
                return Err(Error::TrainingFailure(format!(
                    "metric '{name}' has {} values, expected {epochs}",
                    values.len()
                )));
            }
            if history.get(&name).is_some() {
                return Err(Error::TrainingFailure(format!(
                    "metric '{name}' reported twice"
                )));
            }
            history.series.push((name, values));
        }
        Ok(history)
    }

    /// Append one epoch.
    ///
    /// The first epoch fixes the set of tracked metrics; every later epoch
    /// must report exactly that set.
    ///
    /// # Errors
    ///
    /// Returns `Error::TrainingFailure` if the report adds or omits a metric.
    pub fn push_epoch(&mut self, report: &MetricsReport) -> Result<()> {
        if self.epochs == 0 && self.series.is_empty() {
            self.series = report
                .iter()
                .map(|(name, value)| (name.to_string(), vec![value]))
                .collect();
            self.epochs = 1;
            return Ok(());
        }

        if report.len() != self.series.len() {
            return Err(Error::TrainingFailure(format!(
                "epoch {} reported {} metrics, expected {}",
                self.epochs,
                report.len(),
                self.series.len()
            )));
        }
        let values = self
            .series
            .iter()
            .map(|(name, _)| {
                report.get(name).ok_or_else(|| {
                    Error::TrainingFailure(format!(
                        "epoch {} did not report metric '{name}'",
                        self.epochs
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        for ((_, series), value) in self.series.iter_mut().zip(values) {
            series.push(value);
        }
        self.epochs += 1;
        Ok(())
    }

    /// Number of recorded epochs.
    #[must_use]
    pub const fn num_epochs(&self) -> usize {
        self.epochs
    }

    /// Whether no epoch was recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.epochs == 0
    }

    /// Tracked metric names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|(name, _)| name.as_str())
    }

    /// Per-epoch values of one metric.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.series
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Most recent value of one metric.
    #[must_use]
    pub fn final_value(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|values| values.last().copied())
    }

    /// `(name, values)` pairs, in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.series
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

impl Serialize for MetricsHistory {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(loss: f64, accuracy: f64) -> MetricsReport {
        let mut report = MetricsReport::new();
        report.insert("loss", loss);
        report.insert("accuracy", accuracy);
        report
    }

    #[test]
    fn test_push_epoch_accumulates_in_order() {
        let mut history = MetricsHistory::new();
        history.push_epoch(&report(0.7, 0.5)).unwrap();
        history.push_epoch(&report(0.6, 0.6)).unwrap();
        history.push_epoch(&report(0.5, 0.7)).unwrap();

        assert_eq!(history.num_epochs(), 3);
        assert_eq!(history.get("loss"), Some(&[0.7, 0.6, 0.5][..]));
        assert_eq!(history.final_value("accuracy"), Some(0.7));
        assert_eq!(history.names().collect::<Vec<_>>(), vec!["loss", "accuracy"]);
    }

    #[test]
    fn test_push_epoch_rejects_changed_metric_set() {
        let mut history = MetricsHistory::new();
        history.push_epoch(&report(0.7, 0.5)).unwrap();

        let mut missing = MetricsReport::new();
        missing.insert("loss", 0.6);
        assert!(matches!(
            history.push_epoch(&missing),
            Err(Error::TrainingFailure(_))
        ));

        let mut renamed = MetricsReport::new();
        renamed.insert("loss", 0.6);
        renamed.insert("auc", 0.6);
        assert!(history.push_epoch(&renamed).is_err());
        assert_eq!(history.num_epochs(), 1);
    }

    #[test]
    fn test_from_series_validates_lengths() {
        let history =
            MetricsHistory::from_series(vec![("loss", vec![0.3, 0.2]), ("auc", vec![0.8, 0.9])])
                .unwrap();
        assert_eq!(history.num_epochs(), 2);

        assert!(
            MetricsHistory::from_series(vec![("loss", vec![0.3, 0.2]), ("auc", vec![0.8])])
                .is_err()
        );
        assert!(
            MetricsHistory::from_series(vec![("loss", vec![0.3]), ("loss", vec![0.8])]).is_err()
        );
    }

    #[test]
    fn test_unknown_metric_lookup() {
        let history = MetricsHistory::from_series(vec![("loss", vec![0.3])]).unwrap();
        assert!(history.get("precision").is_none());
        assert!(history.final_value("precision").is_none());
    }

    #[test]
    fn test_serializes_as_map() {
        let history = MetricsHistory::from_series(vec![("loss", vec![0.5, 0.25])]).unwrap();
        assert_eq!(
            serde_json::to_value(&history).unwrap(),
            serde_json::json!({"loss": [0.5, 0.25]})
        );
    }
}
