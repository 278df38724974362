use std::env;

use anyhow::Context;
use env_logger::Env;
use log::{debug, info};

use linreg::{
    config::TrainingConfig,
    plot,
    training::{LogReporter, TrainerBuilder},
};

const CHART_HEIGHT: u16 = 12;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // Usage: linreg [config.json]
    let config = match env::args().nth(1) {
        Some(path) => TrainingConfig::from_path(&path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => TrainingConfig::default(),
    };
    debug!("{config:?}");

    let mut trainer = TrainerBuilder::new().build(&config)?;
    let dataset = trainer.loader().dataset();
    info!(
        "{} samples ({} features, {} target), batches of {}, {} output unit(s)",
        dataset.len(),
        dataset.x_size(),
        dataset.y_size(),
        trainer.loader().batch_size(),
        trainer.model().units()
    );
    info!(
        "learning rate {}, l2 scale {}",
        trainer.optimizer().learning_rate(),
        trainer.loss_fn().scale()
    );

    let history = trainer.train(&mut LogReporter)?;

    let model = trainer.model();
    info!(
        "weight: learned {}, expected {:?}",
        model.weight()?.column(0),
        config.data.true_weight
    );
    info!(
        "bias: learned {}, expected {}",
        model.bias()?[0],
        config.data.true_bias
    );

    println!("{}", plot::render(history.as_slice(), CHART_HEIGHT));

    if let Some(path) = &config.history_path {
        history
            .save(path)
            .with_context(|| format!("failed to write the loss history to {}", path.display()))?;
        info!("loss history written to {}", path.display());
    }

    Ok(())
}
