use serde::{Serialize, Deserialize};

use crate::train::gradients::Gradients;

/// Result of a single `train_epoch` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochReport {
    /// Mean loss over the points seen this epoch, measured before the update.
    pub loss: f64,
    /// Fraction of points on the right side of the 0.5 threshold; only set
    /// for classification.
    pub accuracy: Option<f64>,
    /// Gradients summed over every point, before averaging.
    pub gradients: Gradients,
    /// Parameter updates dropped because they were not finite.
    pub discarded_updates: usize,
}

/// Per-epoch training statistics emitted by `train_loop`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the training
/// loop sends one `EpochStats` value at the end of every completed epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number, counted over the lifetime of the session.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    pub loss: f64,
    pub accuracy: Option<f64>,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}
