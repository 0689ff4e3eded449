use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};

use crate::train::epoch_stats::EpochStats;

/// Epochs run per scheduling tick unless configured otherwise.
pub const DEFAULT_EPOCHS_PER_TICK: usize = 2;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`          — number of epochs to run in this session
/// - `learning_rate`   — gradient-descent step size (clamped by the trainer)
/// - `frozen_layers`   — per-layer freeze flags; missing entries are unfrozen
/// - `epochs_per_tick` — bound on epochs run by one `TrainSession::tick`
/// - `progress_tx`     — optional channel sender; one `EpochStats` is sent per
///                       completed epoch.  If the receiver is dropped the loop
///                       terminates early.
/// - `stop_flag`       — optional atomic flag; when set to `true` from another
///                       thread the loop terminates after the current epoch.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    pub frozen_layers: Vec<bool>,
    pub epochs_per_tick: usize,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a minimal `TrainConfig` with nothing frozen, no progress
    /// channel and no stop flag.
    pub fn new(epochs: usize, learning_rate: f64) -> Self {
        TrainConfig {
            epochs,
            learning_rate,
            frozen_layers: Vec::new(),
            epochs_per_tick: DEFAULT_EPOCHS_PER_TICK,
            progress_tx: None,
            stop_flag: None,
        }
    }

    pub fn with_frozen_layers(mut self, frozen_layers: Vec<bool>) -> Self {
        self.frozen_layers = frozen_layers;
        self
    }

    pub fn with_progress(mut self, tx: mpsc::Sender<EpochStats>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }

    pub(crate) fn frozen_mask(&self) -> Option<&[bool]> {
        if self.frozen_layers.is_empty() {
            None
        } else {
            Some(self.frozen_layers.as_slice())
        }
    }
}
