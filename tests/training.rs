//! End-to-end training behaviour on the built-in datasets.

use nn_playground::{
    create_dataset, normalize_dataset, train_epoch, ActivationFunction, DatasetId, Network,
    NetworkConfig, NnError, NormalizedDataset, PlaygroundConfig, TrainSession,
};

fn setup(id: DatasetId, hidden_layers: usize, neurons: usize, activation: ActivationFunction) -> (NormalizedDataset, Network) {
    let norm = normalize_dataset(&create_dataset(id, 42));
    let net = Network::new(&NetworkConfig {
        input_size: norm.base.input_size,
        output_size: norm.base.output_size,
        hidden_layers,
        neurons_per_layer: neurons,
        activation,
        task: norm.base.task,
        input_mean: norm.input_mean.clone(),
        input_std: norm.input_std.clone(),
        seed: 42,
    })
    .unwrap();
    (norm, net)
}

#[test]
fn linear_regression_loss_decreases() {
    let (ds, mut net) = setup(DatasetId::Linear, 0, 4, ActivationFunction::ReLU);
    let losses: Vec<f64> = (0..200)
        .map(|_| train_epoch(&mut net, &ds, ds.base.task, 0.05, None).unwrap().loss)
        .collect();

    assert!(losses[199] < losses[0]);
    for pair in losses.windows(2) {
        assert!(pair[1] <= pair[0] + 1e-12, "loss went up: {} -> {}", pair[0], pair[1]);
    }
    assert!(losses[199] < 0.05, "final loss {}", losses[199]);
}

#[test]
fn trained_line_predicts_in_raw_space() {
    let (ds, mut net) = setup(DatasetId::Linear, 0, 4, ActivationFunction::ReLU);
    for _ in 0..300 {
        train_epoch(&mut net, &ds, ds.base.task, 0.1, None).unwrap();
    }
    // y = 2x + 1 with zero-mean noise
    let y = net.predict(&[0.5]).unwrap()[0];
    assert!((y - 2.0).abs() < 0.1, "predicted {y}");
}

#[test]
fn xor_is_learned_with_one_hidden_layer() {
    let (ds, mut net) = setup(DatasetId::Xor, 1, 8, ActivationFunction::ReLU);
    let mut accuracy = 0.0;
    for _ in 0..500 {
        accuracy = train_epoch(&mut net, &ds, ds.base.task, 0.5, None)
            .unwrap()
            .accuracy
            .unwrap();
    }
    assert!(accuracy >= 0.9, "accuracy {accuracy}");
}

#[test]
fn frozen_layer_is_bit_identical() {
    let (ds, mut net) = setup(DatasetId::Xor, 2, 4, ActivationFunction::Tanh);
    let before = net.clone();
    train_epoch(&mut net, &ds, ds.base.task, 0.3, Some(&[false, true, false][..])).unwrap();

    assert_eq!(net.layers[1], before.layers[1]);
    assert_ne!(net.layers[0].weights, before.layers[0].weights);
    assert_ne!(net.layers[2].weights, before.layers[2].weights);
    assert_ne!(net.layers[2].biases, before.layers[2].biases);
}

#[test]
fn short_freeze_mask_leaves_rest_trainable() {
    let (ds, mut net) = setup(DatasetId::And, 1, 3, ActivationFunction::Sigmoid);
    let before = net.clone();
    train_epoch(&mut net, &ds, ds.base.task, 0.3, Some(&[true][..])).unwrap();
    assert_eq!(net.layers[0], before.layers[0]);
    assert_ne!(net.layers[1], before.layers[1]);
}

#[test]
fn overflowing_updates_keep_prior_values() {
    let (ds, mut net) = setup(DatasetId::Linear, 0, 1, ActivationFunction::ReLU);
    net.layers[0].weights.data[0][0] = 1e308;
    net.layers[0].biases.data[0][0] = 1e308;

    let report = train_epoch(&mut net, &ds, ds.base.task, 50.0, None).unwrap();

    assert_eq!(report.discarded_updates, 2);
    assert_eq!(net.layers[0].weights.data[0][0], 1e308);
    assert_eq!(net.layers[0].biases.data[0][0], 1e308);
    for layer in &net.layers {
        assert!(layer.weights.is_finite());
        assert!(layer.biases.is_finite());
    }
}

#[test]
fn mismatched_input_fails_fast() {
    let (_, net) = setup(DatasetId::Xor, 1, 2, ActivationFunction::ReLU);
    assert!(matches!(
        net.predict(&[0.1, 0.2, 0.3]),
        Err(NnError::DimensionMismatch { expected: 2, actual: 3, .. })
    ));
}

#[test]
fn session_from_playground_config() {
    let config = PlaygroundConfig {
        dataset: DatasetId::Or,
        epochs: 30,
        learning_rate: 0.3,
        ..Default::default()
    };
    let norm = normalize_dataset(&create_dataset(config.dataset, config.seed));
    let mut session = TrainSession::new(config.network_config(&norm), norm).unwrap();
    let train_config = config.train_config();

    let mut remaining = train_config.epochs;
    while remaining > 0 {
        session.tick(&train_config, &mut remaining).unwrap();
    }

    let history = session.loss_history();
    assert_eq!(session.epoch(), 30);
    assert_eq!(history.len(), 30);
    assert!(history[29].loss < history[0].loss);
    let report = session.last_report().unwrap();
    assert!(report.accuracy.unwrap() > 0.5);
    assert_eq!(report.gradients.weight_grads.len(), 2);
}
