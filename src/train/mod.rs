pub mod trainer;
pub mod gradients;
pub mod epoch_stats;
pub mod train_config;
pub mod loop_fn;

pub use trainer::train_epoch;
pub use gradients::Gradients;
pub use epoch_stats::{EpochReport, EpochStats};
pub use train_config::TrainConfig;
pub use loop_fn::{train_loop, LossPoint, TrainSession};
