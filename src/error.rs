//! Error type shared by every part of the trainer.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, NnError>;

#[derive(Debug, Error)]
pub enum NnError {
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("Unknown activation: {0}")]
    UnknownActivation(String),

    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NnError {
    pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(NnError::DimensionMismatch { what, expected, actual })
        }
    }
}
