use std::sync::atomic::Ordering;
use std::time::Instant;

use log::info;
use serde::{Serialize, Deserialize};

use crate::data::normalize::NormalizedDataset;
use crate::error::{NnError, Result};
use crate::loss::Task;
use crate::network::{config::NetworkConfig, network::Network};
use crate::train::epoch_stats::{EpochReport, EpochStats};
use crate::train::train_config::TrainConfig;
use crate::train::trainer::train_epoch;

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossPoint {
    pub epoch: usize,
    pub loss: f64,
}

/// Caller-side bookkeeping around repeated `train_epoch` calls.
///
/// The session owns the live network and the dataset it trains on, counts
/// epochs, and keeps the loss history plus the latest report (metrics and
/// gradients).  `snapshot()` hands out an independent copy of the network
/// for display while training continues on the live one.
#[derive(Debug, Clone)]
pub struct TrainSession {
    network_config: NetworkConfig,
    dataset: NormalizedDataset,
    network: Network,
    epoch: usize,
    loss_history: Vec<LossPoint>,
    last_report: Option<EpochReport>,
}

impl TrainSession {
    /// Initializes a network from `network_config` for `dataset`.
    ///
    /// # Errors
    /// `InvalidConfig` if the config's task differs from the dataset's, plus
    /// anything `Network::new` rejects.
    pub fn new(network_config: NetworkConfig, dataset: NormalizedDataset) -> Result<TrainSession> {
        if network_config.task != dataset.base.task {
            return Err(NnError::InvalidConfig(format!(
                "network task {} does not match dataset task {}",
                network_config.task, dataset.base.task
            )));
        }
        let network = Network::new(&network_config)?;
        Ok(TrainSession {
            network_config,
            dataset,
            network,
            epoch: 0,
            loss_history: Vec::new(),
            last_report: None,
        })
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn snapshot(&self) -> Network {
        self.network.clone()
    }

    pub fn dataset(&self) -> &NormalizedDataset {
        &self.dataset
    }

    pub fn task(&self) -> Task {
        self.dataset.base.task
    }

    /// Number of epochs completed since creation or the last reset.
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    pub fn loss_history(&self) -> &[LossPoint] {
        &self.loss_history
    }

    pub fn last_report(&self) -> Option<&EpochReport> {
        self.last_report.as_ref()
    }

    /// Runs exactly one epoch.
    pub fn step(&mut self, learning_rate: f64, frozen_layers: Option<&[bool]>) -> Result<&EpochReport> {
        let task = self.task();
        let report = train_epoch(&mut self.network, &self.dataset, task, learning_rate, frozen_layers)?;
        self.epoch += 1;
        self.loss_history.push(LossPoint { epoch: self.epoch, loss: report.loss });
        Ok(&*self.last_report.insert(report))
    }

    /// Runs up to `config.epochs_per_tick` epochs, never more than
    /// `*remaining`, decrementing it.  Returns the number of epochs run.
    ///
    /// A pause or cancel is simply not calling `tick` again.
    pub fn tick(&mut self, config: &TrainConfig, remaining: &mut usize) -> Result<usize> {
        let budget = config.epochs_per_tick.max(1).min(*remaining);
        for _ in 0..budget {
            self.step(config.learning_rate, config.frozen_mask())?;
            *remaining -= 1;
        }
        Ok(budget)
    }

    /// Re-initializes the network from the stored config and clears history.
    pub fn reset(&mut self) -> Result<()> {
        self.network = Network::new(&self.network_config)?;
        self.epoch = 0;
        self.loss_history.clear();
        self.last_report = None;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `session` for `config.epochs` epochs and returns the mean loss of
/// the **last completed epoch** (`None` if no epoch ran).
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
pub fn train_loop(session: &mut TrainSession, config: &TrainConfig) -> Result<Option<f64>> {
    let mut last_loss = None;

    for run_epoch in 1..=config.epochs {
        if stop_requested(config) {
            break;
        }

        let t_start = Instant::now();
        let (loss, accuracy) = {
            let report = session.step(config.learning_rate, config.frozen_mask())?;
            (report.loss, report.accuracy)
        };
        let elapsed_ms = t_start.elapsed().as_millis() as u64;
        last_loss = Some(loss);

        let stats = EpochStats {
            epoch: session.epoch(),
            total_epochs: config.epochs,
            loss,
            accuracy,
            elapsed_ms,
        };

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                info!("progress receiver dropped after {run_epoch} epochs");
                break;
            }
        }
    }

    info!(
        "session at epoch {} (loss {:?})",
        session.epoch(),
        last_loss
    );
    Ok(last_loss)
}

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .is_some_and(|flag| flag.load(Ordering::Relaxed))
}
