use log::info;
use rand::{rngs::StdRng, SeedableRng};

use super::ModelTrainer;
use crate::{
    arch::{layers::Dense, loss::L2Loss},
    config::{LossFnConfig, OptimizerConfig, TrainingConfig},
    data::{DataLoader, Synthesizer},
    optimization::GradientDescent,
    Result,
};

/// The trainer type produced by `TrainerBuilder`.
pub type LinearTrainer = ModelTrainer<Dense, GradientDescent, L2Loss>;

/// Builds `ModelTrainer`s given a config.
#[derive(Debug, Default)]
pub struct TrainerBuilder;

impl TrainerBuilder {
    /// Creates a new `TrainerBuilder`.
    pub fn new() -> Self {
        Self
    }

    /// Builds a new trainer following a config: generates the dataset, creates the model with
    /// its initializer bound, and resolves the optimizer and the loss function.
    ///
    /// # Arguments
    /// * `config` - The config for the training.
    ///
    /// # Returns
    /// The trainer or an error if the config is invalid.
    pub fn build(&self, config: &TrainingConfig) -> Result<LinearTrainer> {
        config.validate()?;

        let mut rng = self.generate_rng(config.seed);
        let data = &config.data;
        let synthesizer = Synthesizer::new(&data.true_weight, data.true_bias, data.noise_std)?;
        let dataset = synthesizer.generate(data.num_examples, &mut rng)?;
        info!(
            "generated {} examples with {} features",
            dataset.len(),
            dataset.x_size()
        );

        let mut builder = Dense::builder(1);
        if let Some(in_dim) = config.model.in_dim {
            builder = builder.in_dim(in_dim);
        }

        let mut model = builder.build();
        model.initialize(config.model.init, StdRng::from_rng(&mut rng))?;

        let loader = DataLoader::new(
            dataset,
            config.batch_size,
            config.shuffle,
            StdRng::from_rng(&mut rng),
        );

        Ok(ModelTrainer::new(
            model,
            self.resolve_optimizer(config.optimizer),
            loader,
            config.epochs,
            self.resolve_loss(config.loss),
        ))
    }

    fn resolve_optimizer(&self, config: OptimizerConfig) -> GradientDescent {
        match config {
            OptimizerConfig::GradientDescent { learning_rate } => {
                GradientDescent::new(learning_rate)
            }
        }
    }

    fn resolve_loss(&self, config: LossFnConfig) -> L2Loss {
        match config {
            LossFnConfig::L2 { scale } => L2Loss::with_scale(scale),
        }
    }

    fn generate_rng(&self, seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{arch::Initializer, RegressionErr};
    use std::num::NonZeroUsize;

    fn small_config() -> TrainingConfig {
        let mut config = TrainingConfig::default();
        config.data.num_examples = 100;
        config.seed = Some(11);
        config
    }

    #[test]
    fn builds_a_deferred_model() {
        let trainer = TrainerBuilder::new().build(&small_config()).unwrap();

        assert_eq!(trainer.loader().dataset().len(), 100);
        assert_eq!(trainer.loader().num_batches(), 25);
        assert!(matches!(
            trainer.model().params(),
            Err(RegressionErr::DeferredInit { .. })
        ));
    }

    #[test]
    fn resolves_components_from_the_config() {
        let mut config = small_config();
        config.batch_size = NonZeroUsize::new(8).unwrap();
        config.optimizer = OptimizerConfig::GradientDescent {
            learning_rate: 0.03,
        };
        config.loss = LossFnConfig::L2 { scale: 1. };

        let trainer = TrainerBuilder::new().build(&config).unwrap();
        assert_eq!(trainer.optimizer().learning_rate(), 0.03);
        assert_eq!(trainer.loss_fn().scale(), 1.);
        assert_eq!(trainer.loader().batch_size().get(), 8);
        assert_eq!(trainer.loader().dataset().x_size(), 2);
        assert_eq!(trainer.loader().dataset().y_size(), 1);
        assert_eq!(trainer.model().units(), 1);
    }

    #[test]
    fn declared_in_dim_builds_a_ready_model() {
        let mut config = small_config();
        config.model.in_dim = Some(2);
        config.model.init = Initializer::Constant { value: 0.25 };

        let trainer = TrainerBuilder::new().build(&config).unwrap();
        let weight = trainer.model().weight().unwrap();
        assert_eq!(weight.dim(), (2, 1));
        assert!(weight.iter().all(|&w| w == 0.25));
    }

    #[test]
    fn same_seed_same_training() {
        let mut config = small_config();
        config.epochs = NonZeroUsize::new(2).unwrap();

        let builder = TrainerBuilder::new();
        let mut a = builder.build(&config).unwrap();
        let mut b = builder.build(&config).unwrap();

        let mut quiet = |_: usize, _: f32| {};
        assert_eq!(a.train(&mut quiet).unwrap(), b.train(&mut quiet).unwrap());
        assert_eq!(a.model().params().unwrap(), b.model().params().unwrap());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = small_config();
        config.optimizer = OptimizerConfig::GradientDescent {
            learning_rate: f32::NAN,
        };

        assert!(matches!(
            TrainerBuilder::new().build(&config),
            Err(RegressionErr::InvalidConfig(_))
        ));
    }
}
