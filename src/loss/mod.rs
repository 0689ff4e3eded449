pub mod mse;
pub mod bce;
pub mod task;

pub use mse::MseLoss;
pub use bce::BceLoss;
pub use task::{compute_loss, Task};
