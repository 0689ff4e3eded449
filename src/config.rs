use serde::{Serialize, Deserialize};

use crate::activation::ActivationFunction;
use crate::data::{dataset::DatasetId, normalize::NormalizedDataset};
use crate::error::{NnError, Result};
use crate::network::config::NetworkConfig;
use crate::train::train_config::TrainConfig;

pub const MAX_HIDDEN_LAYERS: usize = 2;
pub const MAX_NEURONS: usize = 8;

/// User-facing knobs for one playground run.
///
/// Every field has a default, so a JSON file only needs the keys it wants to
/// override:
///
/// ```json
/// { "dataset": "xor", "hidden_layers": 1, "learning_rate": 0.3, "epochs": 500 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    pub dataset: DatasetId,
    pub seed: u32,
    pub hidden_layers: usize,
    pub neurons: usize,
    pub activation: ActivationFunction,
    pub learning_rate: f64,
    pub epochs: usize,
    pub frozen_layers: Vec<bool>,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        PlaygroundConfig {
            dataset: DatasetId::Linear,
            seed: 42,
            hidden_layers: 1,
            neurons: 4,
            activation: ActivationFunction::ReLU,
            learning_rate: 0.05,
            epochs: 50,
            frozen_layers: Vec::new(),
        }
    }
}

impl PlaygroundConfig {
    /// Deserializes a config from a JSON file; missing keys take defaults.
    pub fn load_json(path: &str) -> Result<PlaygroundConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: PlaygroundConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.hidden_layers > MAX_HIDDEN_LAYERS {
            return Err(NnError::InvalidConfig(format!(
                "hidden_layers must be at most {MAX_HIDDEN_LAYERS}, got {}",
                self.hidden_layers
            )));
        }
        if !(1..=MAX_NEURONS).contains(&self.neurons) {
            return Err(NnError::InvalidConfig(format!(
                "neurons must be between 1 and {MAX_NEURONS}, got {}",
                self.neurons
            )));
        }
        if self.epochs == 0 {
            return Err(NnError::InvalidConfig("epochs must be at least 1".to_string()));
        }
        if !self.learning_rate.is_finite() {
            return Err(NnError::InvalidConfig("learning_rate must be finite".to_string()));
        }
        Ok(())
    }

    /// Network settings for `dataset`, binding its normalization statistics.
    pub fn network_config(&self, dataset: &NormalizedDataset) -> NetworkConfig {
        NetworkConfig {
            input_size: dataset.base.input_size,
            output_size: dataset.base.output_size,
            hidden_layers: self.hidden_layers,
            neurons_per_layer: self.neurons.max(1),
            activation: self.activation,
            task: dataset.base.task,
            input_mean: dataset.input_mean.clone(),
            input_std: dataset.input_std.clone(),
            seed: self.seed,
        }
    }

    pub fn train_config(&self) -> TrainConfig {
        TrainConfig::new(self.epochs, self.learning_rate)
            .with_frozen_layers(self.frozen_layers.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{create_dataset, normalize_dataset};
    use crate::loss::Task;

    #[test]
    fn partial_json_fills_defaults() {
        let config: PlaygroundConfig =
            serde_json::from_str(r#"{ "dataset": "xor", "activation": "tanh", "epochs": 500 }"#).unwrap();
        assert_eq!(config.dataset, DatasetId::Xor);
        assert_eq!(config.activation, ActivationFunction::Tanh);
        assert_eq!(config.epochs, 500);
        assert_eq!(config.seed, 42);
        assert_eq!(config.learning_rate, 0.05);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_names_fail_to_parse() {
        assert!(serde_json::from_str::<PlaygroundConfig>(r#"{ "dataset": "spiral" }"#).is_err());
        assert!(serde_json::from_str::<PlaygroundConfig>(r#"{ "activation": "gelu" }"#).is_err());
    }

    #[test]
    fn validate_bounds() {
        let too_deep = PlaygroundConfig { hidden_layers: 3, ..Default::default() };
        assert!(too_deep.validate().is_err());
        let no_neurons = PlaygroundConfig { neurons: 0, ..Default::default() };
        assert!(no_neurons.validate().is_err());
        let no_epochs = PlaygroundConfig { epochs: 0, ..Default::default() };
        assert!(no_epochs.validate().is_err());
    }

    #[test]
    fn network_config_binds_dataset_stats() {
        let norm = normalize_dataset(&create_dataset(DatasetId::And, 42));
        let config = PlaygroundConfig { dataset: DatasetId::And, ..Default::default() };
        let net = config.network_config(&norm);
        assert_eq!(net.task, Task::Classification);
        assert_eq!(net.input_size, 2);
        assert_eq!(net.input_mean, norm.input_mean);
        assert_eq!(net.layer_sizes(), vec![2, 4, 1]);
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            PlaygroundConfig::load_json("/nonexistent/playground.json"),
            Err(NnError::Io(_))
        ));
    }
}
