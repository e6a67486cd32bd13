//! RMSprop optimizer for a single dense unit

/// Decay of the squared-gradient moving average.
pub const DEFAULT_RHO: f64 = 0.9;

/// Added under the square root to keep steps finite.
pub const DEFAULT_EPSILON: f64 = 1e-7;

/// RMSprop state for `n` weights and one bias.
///
/// Update per parameter:
/// `cache = rho * cache + (1 - rho) * g^2`,
/// `param -= learning_rate * g / sqrt(cache + epsilon)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RmsProp {
    learning_rate: f64,
    rho: f64,
    epsilon: f64,
    weight_cache: Vec<f64>,
    bias_cache: f64,
}

impl RmsProp {
    /// Fresh optimizer state for `num_weights` weights.
    #[must_use]
    pub fn new(learning_rate: f64, num_weights: usize) -> Self {
        Self {
            learning_rate,
            rho: DEFAULT_RHO,
            epsilon: DEFAULT_EPSILON,
            weight_cache: vec![0.0; num_weights],
            bias_cache: 0.0,
        }
    }

    /// Step size.
    #[must_use]
    pub const fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Apply one update in place.
    ///
    /// `gradients` must have one entry per weight.
    pub fn step(
        &mut self,
        weights: &mut [f64],
        bias: &mut f64,
        gradients: &[f64],
        bias_gradient: f64,
    ) {
        debug_assert_eq!(weights.len(), gradients.len());
        for ((weight, cache), &gradient) in weights
            .iter_mut()
            .zip(self.weight_cache.iter_mut())
            .zip(gradients)
        {
            *weight -= Self::delta(
                self.learning_rate,
                self.rho,
                self.epsilon,
                cache,
                gradient,
            );
        }
        *bias -= Self::delta(
            self.learning_rate,
            self.rho,
            self.epsilon,
            &mut self.bias_cache,
            bias_gradient,
        );
    }

    fn delta(learning_rate: f64, rho: f64, epsilon: f64, cache: &mut f64, gradient: f64) -> f64 {
        *cache = rho.mul_add(*cache, (1.0 - rho) * gradient * gradient);
        learning_rate * gradient / (*cache + epsilon).sqrt()
    }
}
