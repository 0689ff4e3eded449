use log::info;
use serde::{Serialize, Deserialize};

use crate::{
    activation::activation::ActivationFunction,
    data::normalize::standardize,
    error::{NnError, Result},
    layers::dense::Layer,
    math::{matrix::Matrix, rng::Mulberry32},
    network::config::NetworkConfig,
};

/// A stack of dense layers plus the input statistics it was built against.
///
/// `input_mean` / `input_std` are owned by the network so that raw inputs
/// can be normalized at prediction time without the dataset at hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Layer>,
    pub input_size: usize,
    pub output_size: usize,
    pub input_mean: Vec<f64>,
    pub input_std: Vec<f64>,
}

/// Intermediate values of a forward pass.
///
/// `activations[0]` is the input itself; `activations[l + 1]` and
/// `pre_activations[l]` belong to layer `l`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardPass {
    pub activations: Vec<Vec<f64>>,
    pub pre_activations: Vec<Vec<f64>>,
}

impl ForwardPass {
    pub fn output(&self) -> &[f64] {
        self.activations.last().map(|a| a.as_slice()).unwrap_or(&[])
    }
}

impl Network {
    /// Builds and initializes a network from `config`.
    ///
    /// Layer sizes are `[input, neurons x hidden_layers, output]`.  A single
    /// generator seeded with `config.seed` initializes every layer in order.
    /// The last layer's activation is chosen by the task.
    pub fn new(config: &NetworkConfig) -> Result<Network> {
        config.validate()?;

        let mut rng = Mulberry32::new(config.seed);
        let sizes = config.layer_sizes();
        let last = sizes.len() - 2;

        let layers = sizes
            .windows(2)
            .enumerate()
            .map(|(i, pair)| {
                let activation: ActivationFunction = if i == last {
                    config.task.output_activation()
                } else {
                    config.activation
                };
                Layer::new(pair[1], pair[0], activation, &mut rng)
            })
            .collect::<Vec<_>>();

        info!(
            "created network {:?} (hidden {}, output {}, seed {})",
            sizes,
            config.activation,
            config.task.output_activation(),
            config.seed
        );

        Ok(Network {
            layers,
            input_size: config.input_size,
            output_size: config.output_size,
            input_mean: config.input_mean.clone(),
            input_std: config.input_std.clone(),
        })
    }

    /// Neuron count of every layer, input first.
    pub fn layer_sizes(&self) -> Vec<usize> {
        std::iter::once(self.input_size)
            .chain(self.layers.iter().map(|l| l.size))
            .collect()
    }

    /// Runs `input` (already normalized) through every layer.
    pub fn forward(&self, input: &[f64]) -> Result<ForwardPass> {
        NnError::check_len("network input", self.input_size, input.len())?;

        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        let mut pre_activations = Vec::with_capacity(self.layers.len());

        let mut current = Matrix::row_vector(input);
        activations.push(input.to_vec());
        for layer in &self.layers {
            let (z, a) = layer.feed_from(&current);
            pre_activations.push(z.as_row().to_vec());
            activations.push(a.as_row().to_vec());
            current = a;
        }

        Ok(ForwardPass { activations, pre_activations })
    }

    /// Standardizes a raw input with the network's stored statistics.
    pub fn normalize_input(&self, input: &[f64]) -> Result<Vec<f64>> {
        NnError::check_len("network input", self.input_size, input.len())?;
        Ok(standardize(input, &self.input_mean, &self.input_std))
    }

    /// Normalizes `raw_input` and returns the output-layer activations.
    pub fn predict(&self, raw_input: &[f64]) -> Result<Vec<f64>> {
        let normalized = self.normalize_input(raw_input)?;
        let pass = self.forward(&normalized)?;
        Ok(pass.output().to_vec())
    }
}

/// Free-function form of [`Network::new`].
pub fn create_network(config: &NetworkConfig) -> Result<Network> {
    Network::new(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loss::Task;

    fn config(hidden_layers: usize, task: Task) -> NetworkConfig {
        NetworkConfig {
            input_size: 2,
            output_size: 1,
            hidden_layers,
            neurons_per_layer: 3,
            activation: ActivationFunction::Tanh,
            task,
            input_mean: vec![0.0, 0.0],
            input_std: vec![1.0, 1.0],
            seed: 42,
        }
    }

    #[test]
    fn shapes_chain_between_layers() {
        let net = Network::new(&config(2, Task::Regression)).unwrap();
        assert_eq!(net.layer_sizes(), vec![2, 3, 3, 1]);
        let mut prev = net.input_size;
        for layer in &net.layers {
            assert_eq!(layer.weights.rows, prev);
            assert_eq!(layer.weights.cols, layer.size);
            assert_eq!(layer.biases.cols, layer.size);
            prev = layer.size;
        }
    }

    #[test]
    fn output_activation_is_forced_by_task() {
        let net = Network::new(&config(1, Task::Classification)).unwrap();
        assert_eq!(net.layers[0].activation, ActivationFunction::Tanh);
        assert_eq!(net.layers[1].activation, ActivationFunction::Sigmoid);

        let net = Network::new(&config(0, Task::Regression)).unwrap();
        assert_eq!(net.layers.len(), 1);
        assert_eq!(net.layers[0].activation, ActivationFunction::Linear);
    }

    #[test]
    fn forward_records_every_layer() {
        let net = Network::new(&config(2, Task::Classification)).unwrap();
        let pass = net.forward(&[0.3, -0.7]).unwrap();
        assert_eq!(pass.activations.len(), 4);
        assert_eq!(pass.pre_activations.len(), 3);
        assert_eq!(pass.activations[0], vec![0.3, -0.7]);
        for (z, a) in pass.pre_activations[0].iter().zip(&pass.activations[1]) {
            assert_eq!(a, &z.tanh());
        }
    }

    #[test]
    fn predict_normalizes_with_stored_stats() {
        let mut cfg = config(0, Task::Regression);
        cfg.input_mean = vec![10.0, -4.0];
        cfg.input_std = vec![2.0, 0.5];
        let net = Network::new(&cfg).unwrap();
        let direct = net.forward(&[1.0, 2.0]).unwrap();
        let predicted = net.predict(&[12.0, -3.0]).unwrap();
        assert_eq!(predicted, direct.output());
    }

    #[test]
    fn wrong_input_length_is_rejected() {
        let net = Network::new(&config(1, Task::Regression)).unwrap();
        assert!(matches!(
            net.predict(&[1.0]),
            Err(NnError::DimensionMismatch { expected: 2, actual: 1, .. })
        ));
        assert!(net.forward(&[1.0, 2.0, 3.0]).is_err());
    }
}
