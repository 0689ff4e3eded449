use std::sync::mpsc;
use std::thread;

use anyhow::{anyhow, Context};
use clap::Parser;
use log::info;

use nn_playground::{
    create_dataset, decision_grid, normalize_dataset, regression_curve, train_loop,
    ActivationFunction, DatasetId, PlaygroundConfig, Task, TrainSession,
};
use nn_playground::network::probe::DEFAULT_CURVE_SAMPLES;

/// Train a small feed-forward network on a synthetic dataset.
///
/// Settings come from the defaults, then the optional JSON config file, then
/// any flags given on the command line.
#[derive(Debug, Parser)]
#[command(name = "nn-playground", version)]
struct Args {
    /// JSON file with playground settings.
    #[arg(short, long)]
    config: Option<String>,

    /// Dataset: linear, xor, and, or.
    #[arg(short, long)]
    dataset: Option<DatasetId>,

    #[arg(short, long)]
    seed: Option<u32>,

    /// Number of hidden layers (0-2).
    #[arg(long)]
    hidden_layers: Option<usize>,

    /// Neurons per hidden layer (1-8).
    #[arg(long)]
    neurons: Option<usize>,

    /// Hidden activation: relu, sigmoid, tanh.
    #[arg(short, long)]
    activation: Option<ActivationFunction>,

    /// Learning rate, clamped to [0.001, 1].
    #[arg(short, long)]
    learning_rate: Option<f64>,

    #[arg(short, long)]
    epochs: Option<usize>,

    /// Comma-separated per-layer freeze flags, e.g. `true,false`.
    #[arg(long, value_delimiter = ',')]
    freeze: Option<Vec<bool>>,

    /// Emit one JSON object per epoch instead of text.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn resolve(&self) -> anyhow::Result<PlaygroundConfig> {
        let mut config = match &self.config {
            Some(path) => PlaygroundConfig::load_json(path)
                .with_context(|| format!("loading config from {path}"))?,
            None => PlaygroundConfig::default(),
        };

        if let Some(dataset) = self.dataset { config.dataset = dataset; }
        if let Some(seed) = self.seed { config.seed = seed; }
        if let Some(hidden) = self.hidden_layers { config.hidden_layers = hidden; }
        if let Some(neurons) = self.neurons { config.neurons = neurons; }
        if let Some(activation) = self.activation { config.activation = activation; }
        if let Some(lr) = self.learning_rate { config.learning_rate = lr; }
        if let Some(epochs) = self.epochs { config.epochs = epochs; }
        if let Some(freeze) = &self.freeze { config.frozen_layers = freeze.clone(); }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = args.resolve()?;
    info!("running with {config:?}");

    let dataset = create_dataset(config.dataset, config.seed);
    let normalized = normalize_dataset(&dataset);
    let mut session = TrainSession::new(config.network_config(&normalized), normalized)?;

    // Training runs on its own thread and streams per-epoch stats back.
    let (tx, rx) = mpsc::channel();
    let train_config = config.train_config().with_progress(tx);
    let handle = thread::spawn(move || -> nn_playground::Result<TrainSession> {
        train_loop(&mut session, &train_config)?;
        Ok(session)
    });

    for stats in rx {
        if args.json {
            println!("{}", serde_json::to_string(&stats)?);
        } else {
            match stats.accuracy {
                Some(acc) => println!(
                    "epoch {:>4}/{}: loss = {:.6}, accuracy = {:.3}",
                    stats.epoch, stats.total_epochs, stats.loss, acc
                ),
                None => println!(
                    "epoch {:>4}/{}: loss = {:.6}",
                    stats.epoch, stats.total_epochs, stats.loss
                ),
            }
        }
    }

    let session = handle
        .join()
        .map_err(|_| anyhow!("training thread panicked"))??;
    let network = session.network();

    if args.json {
        return Ok(());
    }

    match dataset.task {
        Task::Regression => {
            let curve = regression_curve(network, &dataset, DEFAULT_CURVE_SAMPLES)?;
            for point in curve.iter().step_by(DEFAULT_CURVE_SAMPLES / 4) {
                println!("f({:+.3}) = {:+.4}", point.x, point.y);
            }
        }
        Task::Classification => {
            for input in [[0.25, 0.25], [0.25, 0.75], [0.75, 0.25], [0.75, 0.75]] {
                let p = network.predict(&input)?[0];
                println!("p({:.2}, {:.2}) = {:.4}", input[0], input[1], p);
            }
            let grid = decision_grid(network, 30)?;
            let positive = grid.iter().filter(|cell| cell.value >= 0.5).count();
            println!("{positive}/{} grid cells predicted as class 1", grid.len());
        }
    }

    Ok(())
}
