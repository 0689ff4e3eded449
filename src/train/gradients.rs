use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;
use crate::network::network::Network;

/// Per-layer gradient storage, parallel to a network's weights and biases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradients {
    pub weight_grads: Vec<Matrix>,
    pub bias_grads: Vec<Matrix>,
}

impl Gradients {
    /// Zero-initialized accumulators shaped like `network`'s parameters.
    pub fn zeros_like(network: &Network) -> Gradients {
        Gradients {
            weight_grads: network.layers.iter()
                .map(|layer| Matrix::zeros(layer.weights.rows, layer.weights.cols))
                .collect(),
            bias_grads: network.layers.iter()
                .map(|layer| Matrix::zeros(layer.biases.rows, layer.biases.cols))
                .collect(),
        }
    }

    pub fn accumulate(&mut self, layer: usize, weights_grad: &Matrix, biases_grad: &Matrix) {
        self.weight_grads[layer] += weights_grad;
        self.bias_grads[layer] += biases_grad;
    }

    /// Every accumulated gradient divided by `count` (treated as 1 when zero).
    pub fn mean_over(&self, count: usize) -> Gradients {
        let n = count.max(1) as f64;
        Gradients {
            weight_grads: self.weight_grads.iter().map(|g| g.map(|x| x / n)).collect(),
            bias_grads: self.bias_grads.iter().map(|g| g.map(|x| x / n)).collect(),
        }
    }

    /// Gradient for the connection from neuron `from` into neuron `to` of
    /// layer `layer`, if it exists.
    pub fn weight(&self, layer: usize, from: usize, to: usize) -> Option<f64> {
        self.weight_grads.get(layer)?.data.get(from)?.get(to).copied()
    }

    /// Largest absolute weight gradient across all layers.
    pub fn max_abs(&self) -> f64 {
        self.weight_grads.iter()
            .flat_map(|g| g.data.iter().flatten())
            .fold(0.0, |acc: f64, x| acc.max(x.abs()))
    }
}
