//! Loss and regression metrics

/// Predictions are clipped into `[EPSILON, 1 - EPSILON]` before taking logs.
const EPSILON: f64 = 1e-7;

/// Mean binary cross-entropy.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn binary_crossentropy(predictions: &[f64], labels: &[f64]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let total: f64 = predictions
        .iter()
        .zip(labels)
        .map(|(&p, &y)| {
            let p = p.clamp(EPSILON, 1.0 - EPSILON);
            -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
        })
        .sum();
    total / predictions.len() as f64
}

/// Mean squared error.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean_squared_error(predictions: &[f64], labels: &[f64]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let total: f64 = predictions
        .iter()
        .zip(labels)
        .map(|(p, y)| (p - y).powi(2))
        .sum();
    total / predictions.len() as f64
}

/// Root mean squared error.
#[must_use]
pub fn root_mean_squared_error(predictions: &[f64], labels: &[f64]) -> f64 {
    mean_squared_error(predictions, labels).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mse_and_rmse() {
        let predictions = [2.0, 4.0, 6.0];
        let labels = [1.0, 4.0, 8.0];
        // squared errors 1, 0, 4
        assert!((mean_squared_error(&predictions, &labels) - 5.0 / 3.0).abs() < 1e-12);
        assert!(
            (root_mean_squared_error(&predictions, &labels) - (5.0_f64 / 3.0).sqrt()).abs()
                < 1e-12
        );
    }

    #[test]
    fn test_binary_crossentropy() {
        let loss = binary_crossentropy(&[0.9, 0.2], &[1.0, 0.0]);
        let expected = -(0.9_f64.ln() + 0.8_f64.ln()) / 2.0;
        assert!((loss - expected).abs() < 1e-12);
    }

    #[test]
    fn test_binary_crossentropy_clips_extremes() {
        let loss = binary_crossentropy(&[0.0, 1.0], &[1.0, 0.0]);
        assert!(loss.is_finite());
        assert!(loss > 10.0);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(mean_squared_error(&[], &[]), 0.0);
        assert_eq!(binary_crossentropy(&[], &[]), 0.0);
        assert_eq!(root_mean_squared_error(&[], &[]), 0.0);
    }
}
