pub mod config;
pub mod network;
pub mod probe;

pub use config::NetworkConfig;
pub use network::{create_network, ForwardPass, Network};
pub use probe::{decision_grid, regression_curve, CurvePoint, GridCell};
