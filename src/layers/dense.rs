use serde::{Serialize, Deserialize};

use crate::{math::{matrix::Matrix, rng::Mulberry32}, activation::activation::ActivationFunction};

/// Fully-connected layer.
///
/// `weights` is `input_size x size` (row = source neuron, column =
/// destination neuron) and `biases` is a `1 x size` row vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub size: usize,
    pub weights: Matrix,
    pub biases: Matrix,
    pub activation: ActivationFunction,
}

impl Layer {
    /// Draws He-uniform weights then small uniform biases in `[-0.1, 0.1)`
    /// from `rng`, in that order.
    pub fn new(size: usize, input_size: usize, activation: ActivationFunction, rng: &mut Mulberry32) -> Layer {
        let weights = Matrix::he_uniform(input_size, size, rng);
        let biases = Matrix::from_fn(1, size, || (rng.next_f64() - 0.5) * 0.2);

        Layer {
            size,
            weights,
            biases,
            activation,
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    /// Returns `(z, a)` for a `1 x input_size` row vector, where
    /// `z = input * W + b` and `a = f(z)`.
    pub fn feed_from(&self, input: &Matrix) -> (Matrix, Matrix) {
        let z = &(input * &self.weights) + &self.biases;
        let a = z.map(|x| self.activation.function(x));
        (z, a)
    }

    /// Computes gradient contributions for one sample. Returns
    /// (weights_grad, biases_grad).
    /// `delta` is ∂L/∂z for this layer and `inputs` the activations that fed it.
    pub fn compute_gradients(&self, delta: &Matrix, inputs: &Matrix) -> (Matrix, Matrix) {
        let weights_grad = &inputs.transpose() * delta;
        (weights_grad, delta.clone())
    }

    /// Propagates ∂L/∂z of this layer back to ∂L/∂a of the layer feeding it.
    pub fn backpropagate(&self, delta: &Matrix) -> Matrix {
        delta * &self.weights.transpose()
    }

    /// Applies `param -= lr * grad` element-wise.  An update whose result is
    /// not finite is skipped and the parameter keeps its value.  Returns the
    /// number of skipped updates.
    pub fn apply_gradients(&mut self, weights_grad: &Matrix, biases_grad: &Matrix, lr: f64) -> usize {
        apply_finite(&mut self.weights, weights_grad, lr) + apply_finite(&mut self.biases, biases_grad, lr)
    }
}

fn apply_finite(params: &mut Matrix, grad: &Matrix, lr: f64) -> usize {
    let mut skipped = 0;
    for (row, grad_row) in params.data.iter_mut().zip(grad.data.iter()) {
        for (p, g) in row.iter_mut().zip(grad_row.iter()) {
            let updated = *p - lr * g;
            if updated.is_finite() {
                *p = updated;
            } else {
                skipped += 1;
            }
        }
    }
    skipped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_layer() -> Layer {
        Layer {
            size: 2,
            weights: Matrix::from_data(vec![vec![1.0, -1.0], vec![0.5, 2.0]]),
            biases: Matrix::row_vector(&[0.0, 1.0]),
            activation: ActivationFunction::ReLU,
        }
    }

    #[test]
    fn new_layer_has_expected_shapes() {
        let mut rng = Mulberry32::new(1);
        let layer = Layer::new(3, 5, ActivationFunction::Tanh, &mut rng);
        assert_eq!((layer.weights.rows, layer.weights.cols), (5, 3));
        assert_eq!((layer.biases.rows, layer.biases.cols), (1, 3));
        assert_eq!(layer.input_size(), 5);
        assert!(layer.biases.as_row().iter().all(|b| (-0.1..0.1).contains(b)));
    }

    #[test]
    fn feed_from_applies_affine_then_activation() {
        let layer = fixed_layer();
        let (z, a) = layer.feed_from(&Matrix::row_vector(&[2.0, 2.0]));
        assert_eq!(z.as_row(), &[3.0, 3.0]);
        assert_eq!(a.as_row(), &[3.0, 3.0]);

        let (z, a) = layer.feed_from(&Matrix::row_vector(&[-2.0, 0.0]));
        assert_eq!(z.as_row(), &[-2.0, 3.0]);
        assert_eq!(a.as_row(), &[0.0, 3.0]);
    }

    #[test]
    fn gradients_are_outer_product() {
        let layer = fixed_layer();
        let delta = Matrix::row_vector(&[1.0, -2.0]);
        let inputs = Matrix::row_vector(&[3.0, 4.0]);
        let (w, b) = layer.compute_gradients(&delta, &inputs);
        assert_eq!(w.data, vec![vec![3.0, -6.0], vec![4.0, -8.0]]);
        assert_eq!(b.as_row(), &[1.0, -2.0]);
        assert_eq!(layer.backpropagate(&delta).as_row(), &[3.0, -3.5]);
    }

    #[test]
    fn non_finite_updates_are_skipped() {
        let mut layer = fixed_layer();
        let w_grad = Matrix::from_data(vec![vec![f64::NAN, 1.0], vec![f64::INFINITY, 0.0]]);
        let b_grad = Matrix::row_vector(&[1.0, f64::NEG_INFINITY]);
        let skipped = layer.apply_gradients(&w_grad, &b_grad, 0.5);
        assert_eq!(skipped, 3);
        assert_eq!(layer.weights.data, vec![vec![1.0, -1.5], vec![0.5, 2.0]]);
        assert_eq!(layer.biases.as_row(), &[-0.5, 1.0]);
    }
}
