pub mod error;
pub mod math;
pub mod activation;
pub mod loss;
pub mod data;
pub mod layers;
pub mod network;
pub mod optim;
pub mod train;
pub mod config;

// Convenience re-exports
pub use error::{NnError, Result};
pub use math::{Matrix, Mulberry32};
pub use activation::ActivationFunction;
pub use loss::{compute_loss, Task};
pub use data::{
    create_dataset, create_dataset_by_name, normalize_dataset, DataPoint, Dataset, DatasetId,
    NormalizedDataset, DATASET_OPTIONS,
};
pub use layers::Layer;
pub use network::{create_network, decision_grid, regression_curve, ForwardPass, Network, NetworkConfig};
pub use optim::Sgd;
pub use train::{train_epoch, train_loop, EpochReport, EpochStats, Gradients, TrainConfig, TrainSession};
pub use config::PlaygroundConfig;
