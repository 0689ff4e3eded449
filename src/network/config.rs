use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{NnError, Result};
use crate::loss::Task;

/// Everything needed to build a fresh [`Network`](crate::Network).
///
/// Fields:
/// - `input_size` / `output_size` — dataset feature and target widths
/// - `hidden_layers`              — number of hidden layers (0 means a single
///                                  input → output layer)
/// - `neurons_per_layer`          — width of every hidden layer
/// - `activation`                 — hidden-layer activation; the output
///                                  activation is derived from `task`
/// - `input_mean` / `input_std`   — normalization statistics bound to the
///                                  network for later prediction
/// - `seed`                       — seed for weight initialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub input_size: usize,
    pub output_size: usize,
    pub hidden_layers: usize,
    pub neurons_per_layer: usize,
    pub activation: ActivationFunction,
    pub task: Task,
    pub input_mean: Vec<f64>,
    pub input_std: Vec<f64>,
    pub seed: u32,
}

impl NetworkConfig {
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden_layers + 2);
        sizes.push(self.input_size);
        sizes.extend(std::iter::repeat(self.neurons_per_layer).take(self.hidden_layers));
        sizes.push(self.output_size);
        sizes
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_size == 0 || self.output_size == 0 {
            return Err(NnError::InvalidConfig(format!(
                "input and output sizes must be positive, got {} and {}",
                self.input_size, self.output_size
            )));
        }
        if self.hidden_layers > 0 && self.neurons_per_layer == 0 {
            return Err(NnError::InvalidConfig(
                "hidden layers need at least one neuron".to_string(),
            ));
        }
        NnError::check_len("input mean", self.input_size, self.input_mean.len())?;
        NnError::check_len("input std", self.input_size, self.input_std.len())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> NetworkConfig {
        NetworkConfig {
            input_size: 1,
            output_size: 1,
            hidden_layers: 2,
            neurons_per_layer: 5,
            activation: ActivationFunction::ReLU,
            task: Task::Regression,
            input_mean: vec![0.0],
            input_std: vec![1.0],
            seed: 1,
        }
    }

    #[test]
    fn layer_sizes_repeat_hidden_width() {
        assert_eq!(base().layer_sizes(), vec![1, 5, 5, 1]);
        let flat = NetworkConfig { hidden_layers: 0, ..base() };
        assert_eq!(flat.layer_sizes(), vec![1, 1]);
    }

    #[test]
    fn validate_rejects_bad_shapes() {
        assert!(base().validate().is_ok());
        let zero_width = NetworkConfig { neurons_per_layer: 0, ..base() };
        assert!(matches!(zero_width.validate(), Err(NnError::InvalidConfig(_))));
        let zero_input = NetworkConfig { input_size: 0, input_mean: vec![], input_std: vec![], ..base() };
        assert!(matches!(zero_input.validate(), Err(NnError::InvalidConfig(_))));
        let bad_stats = NetworkConfig { input_std: vec![1.0, 1.0], ..base() };
        assert!(matches!(
            bad_stats.validate(),
            Err(NnError::DimensionMismatch { what: "input std", .. })
        ));
    }
}
