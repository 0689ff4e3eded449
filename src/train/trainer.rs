use log::{debug, warn};

use crate::{
    data::normalize::NormalizedDataset,
    error::{NnError, Result},
    loss::{bce::BceLoss, mse::MseLoss, task::{compute_loss, Task}},
    math::matrix::Matrix,
    network::network::Network,
    optim::sgd::Sgd,
    train::{epoch_stats::EpochReport, gradients::Gradients},
};

/// Runs one epoch of full-batch gradient descent over `dataset`.
///
/// Gradients are accumulated over every point with the network's current
/// parameters, averaged, and applied once.  The report carries the summed
/// (not averaged) gradients.  Layers whose entry in
/// `frozen_layers` is `true` keep their parameters; missing entries count as
/// not frozen.  `learning_rate` is clamped by [`Sgd::new`].
///
/// # Errors
/// `DimensionMismatch` if any point's input or target width disagrees with
/// the network.  The network is untouched in that case.
pub fn train_epoch(
    network: &mut Network,
    dataset: &NormalizedDataset,
    task: Task,
    learning_rate: f64,
    frozen_layers: Option<&[bool]>,
) -> Result<EpochReport> {
    if network.layers.is_empty() {
        return Err(NnError::InvalidConfig("network has no layers".to_string()));
    }
    for point in &dataset.points {
        NnError::check_len("sample input", network.input_size, point.x.len())?;
        NnError::check_len("sample target", network.output_size, point.y.len())?;
    }

    let optimizer = Sgd::new(learning_rate);
    let mut acc_grads = Gradients::zeros_like(network);
    let mut loss_sum = 0.0;
    let mut correct = 0usize;

    for point in &dataset.points {
        let pass = network.forward(&point.x)?;
        let output = pass.output();

        loss_sum += compute_loss(task, output, &point.y);
        if task == Task::Classification && is_correct(output, &point.y) {
            correct += 1;
        }

        let last = network.layers.len() - 1;
        let mut delta = output_delta(network, task, output, &point.y, &pass.pre_activations[last]);

        // Backward pass.  Deltas for layer i-1 are formed from layer i's
        // pre-update weights, which stay fixed for the whole epoch.
        for i in (0..network.layers.len()).rev() {
            let layer = &network.layers[i];
            let inputs = Matrix::row_vector(&pass.activations[i]);
            let (w_grad, b_grad) = layer.compute_gradients(&delta, &inputs);
            acc_grads.accumulate(i, &w_grad, &b_grad);

            if i > 0 {
                let upstream = layer.backpropagate(&delta);
                let prev = &network.layers[i - 1];
                let act_derivative = Matrix::row_vector(&pass.pre_activations[i - 1])
                    .map(|z| prev.activation.derivative(z));
                delta = upstream.hadamard(&act_derivative);
            }
        }
    }

    let batch_size = dataset.points.len().max(1);
    let mean_grads = acc_grads.mean_over(batch_size);

    let mut discarded = 0;
    for (i, layer) in network.layers.iter_mut().enumerate() {
        let frozen = frozen_layers.and_then(|mask| mask.get(i).copied()).unwrap_or(false);
        if frozen {
            continue;
        }
        discarded += optimizer.step(layer, &mean_grads.weight_grads[i], &mean_grads.bias_grads[i]);
    }

    if discarded > 0 {
        warn!("discarded {discarded} non-finite parameter updates (lr {})", optimizer.learning_rate);
    }

    let loss = loss_sum / batch_size as f64;
    let accuracy = match task {
        Task::Classification => Some(correct as f64 / batch_size as f64),
        Task::Regression => None,
    };

    debug!("epoch over {} points: loss {loss:.6}, accuracy {accuracy:?}", dataset.points.len());

    Ok(EpochReport {
        loss,
        accuracy,
        gradients: acc_grads,
        discarded_updates: discarded,
    })
}

/// ∂L/∂z of the output layer for one sample.
///
/// Classification pairs a sigmoid output with BCE, so the sigmoid derivative
/// cancels and the delta is `p - y`.  Regression multiplies the MSE gradient
/// by the output activation's derivative.
fn output_delta(network: &Network, task: Task, output: &[f64], expected: &[f64], pre_activation: &[f64]) -> Matrix {
    match task {
        Task::Classification => Matrix::row_vector(&BceLoss::derivative(output, expected)),
        Task::Regression => {
            let activation = network.layers[network.layers.len() - 1].activation;
            let error = Matrix::row_vector(&MseLoss::derivative(output, expected));
            let act_derivative = Matrix::row_vector(pre_activation).map(|z| activation.derivative(z));
            error.hadamard(&act_derivative)
        }
    }
}

/// Thresholds the first output at 0.5 and compares with the first target.
fn is_correct(output: &[f64], expected: &[f64]) -> bool {
    let predicted = if output[0] >= 0.5 { 1.0 } else { 0.0 };
    predicted == expected[0]
}
