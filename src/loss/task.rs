use serde::{Serialize, Deserialize};
use std::fmt;

use crate::activation::ActivationFunction;
use crate::loss::{bce::BceLoss, mse::MseLoss};

/// The learning problem a dataset poses.  The task selects both the loss
/// function and the output-layer activation.
///
/// - `Regression`     — MSE loss, linear output.
/// - `Classification` — binary cross-entropy loss, sigmoid output, accuracy
///   measured with a 0.5 threshold on the single output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Task {
    Regression,
    Classification,
}

impl Task {
    pub fn output_activation(self) -> ActivationFunction {
        match self {
            Task::Regression => ActivationFunction::Linear,
            Task::Classification => ActivationFunction::Sigmoid,
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::Regression => f.write_str("regression"),
            Task::Classification => f.write_str("classification"),
        }
    }
}

/// Scalar loss for one sample — dispatches on `Task`.
pub fn compute_loss(task: Task, predicted: &[f64], expected: &[f64]) -> f64 {
    match task {
        Task::Regression     => MseLoss::loss(predicted, expected),
        Task::Classification => BceLoss::loss(predicted, expected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_by_task() {
        assert_eq!(compute_loss(Task::Regression, &[2.0], &[0.0]), 4.0);
        let bce = compute_loss(Task::Classification, &[0.5], &[1.0]);
        assert!((bce - std::f64::consts::LN_2).abs() < 1e-12);
    }

    #[test]
    fn output_activation_follows_task() {
        assert_eq!(Task::Regression.output_activation(), ActivationFunction::Linear);
        assert_eq!(Task::Classification.output_activation(), ActivationFunction::Sigmoid);
    }
}
