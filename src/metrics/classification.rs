//! Classification metrics on continuous outputs
//!
//! A prediction counts as positive when it is strictly greater than the
//! threshold. Labels are 0/1; anything above 0.5 is read as positive.
//! Ratios with a zero denominator evaluate to 0.

/// Keeps the outermost AUC thresholds just outside `[0, 1]`.
const AUC_EPSILON: f64 = 1e-7;

/// Confusion matrix counts at one threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionCounts {
    /// Positive predictions with a positive label.
    pub true_positives: usize,
    /// Positive predictions with a negative label.
    pub false_positives: usize,
    /// Negative predictions with a negative label.
    pub true_negatives: usize,
    /// Negative predictions with a positive label.
    pub false_negatives: usize,
}

impl ConfusionCounts {
    /// Count outcomes of thresholding `predictions` against `labels`.
    #[must_use]
    pub fn at_threshold(predictions: &[f64], labels: &[f64], threshold: f64) -> Self {
        let mut counts = Self::default();
        for (&prediction, &label) in predictions.iter().zip(labels) {
            match (prediction > threshold, label > 0.5) {
                (true, true) => counts.true_positives += 1,
                (true, false) => counts.false_positives += 1,
                (false, false) => counts.true_negatives += 1,
                (false, true) => counts.false_negatives += 1,
            }
        }
        counts
    }

    /// Total number of rows counted.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }

    /// `tp / (tp + fn)`.
    #[must_use]
    pub fn true_positive_rate(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// `fp / (fp + tn)`.
    #[must_use]
    pub fn false_positive_rate(&self) -> f64 {
        ratio(self.false_positives, self.false_positives + self.true_negatives)
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Share of rows whose thresholded prediction matches the label.
#[must_use]
pub fn binary_accuracy(predictions: &[f64], labels: &[f64], threshold: f64) -> f64 {
    let counts = ConfusionCounts::at_threshold(predictions, labels, threshold);
    ratio(
        counts.true_positives + counts.true_negatives,
        counts.total(),
    )
}

/// `tp / (tp + fp)` at `threshold`.
#[must_use]
pub fn precision(predictions: &[f64], labels: &[f64], threshold: f64) -> f64 {
    let counts = ConfusionCounts::at_threshold(predictions, labels, threshold);
    ratio(
        counts.true_positives,
        counts.true_positives + counts.false_positives,
    )
}

/// `tp / (tp + fn)` at `threshold`.
#[must_use]
pub fn recall(predictions: &[f64], labels: &[f64], threshold: f64) -> f64 {
    ConfusionCounts::at_threshold(predictions, labels, threshold).true_positive_rate()
}

/// Area under the ROC curve, approximated on `num_thresholds` evenly spaced
/// thresholds with trapezoidal interpolation.
///
/// The first threshold sits just below 0 and the last just above 1, so the
/// curve always spans `(1, 1)` to `(0, 0)` for outputs in `[0, 1]`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn roc_auc(predictions: &[f64], labels: &[f64], num_thresholds: usize) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let steps = num_thresholds.max(2) - 1;
    let points: Vec<(f64, f64)> = (0..=steps)
        .map(|i| {
            let threshold = match i {
                0 => -AUC_EPSILON,
                i if i == steps => 1.0 + AUC_EPSILON,
                i => i as f64 / steps as f64,
            };
            let counts = ConfusionCounts::at_threshold(predictions, labels, threshold);
            (counts.false_positive_rate(), counts.true_positive_rate())
        })
        .collect();

    points
        .windows(2)
        .map(|pair| {
            let (fpr_low, tpr_low) = pair[0];
            let (fpr_high, tpr_high) = pair[1];
            (fpr_low - fpr_high) * (tpr_low + tpr_high) / 2.0
        })
        .sum()
}
