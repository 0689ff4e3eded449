use crate::{math::matrix::Matrix, layers::dense::Layer};

pub const MIN_LEARNING_RATE: f64 = 0.001;
pub const MAX_LEARNING_RATE: f64 = 1.0;

/// Plain gradient descent.  The learning rate is clamped to
/// `[MIN_LEARNING_RATE, MAX_LEARNING_RATE]` on construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate: learning_rate.clamp(MIN_LEARNING_RATE, MAX_LEARNING_RATE) }
    }

    /// Applies one weight update to a layer given its pre-computed gradients.
    /// Returns how many parameter updates were discarded as non-finite.
    pub fn step(&self, layer: &mut Layer, weights_grad: &Matrix, biases_grad: &Matrix) -> usize {
        layer.apply_gradients(weights_grad, biases_grad, self.learning_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn learning_rate_is_clamped() {
        assert_eq!(Sgd::new(5.0).learning_rate, MAX_LEARNING_RATE);
        assert_eq!(Sgd::new(0.0).learning_rate, MIN_LEARNING_RATE);
        assert_eq!(Sgd::new(-3.0).learning_rate, MIN_LEARNING_RATE);
        assert_eq!(Sgd::new(0.05).learning_rate, 0.05);
    }
}
