use std::{
    fs::File,
    io::BufReader,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{arch::Initializer, RegressionErr, Result};

const DEFAULT_EPOCHS: NonZeroUsize = NonZeroUsize::new(10).unwrap();
const DEFAULT_BATCH_SIZE: NonZeroUsize = NonZeroUsize::new(4).unwrap();

/// How the synthetic dataset is generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub num_examples: usize,
    /// The weights of the target function, its length is the amount of features.
    pub true_weight: Vec<f32>,
    pub true_bias: f32,
    pub noise_std: f32,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            num_examples: 10_000,
            true_weight: vec![2., -3.4],
            true_bias: 4.2,
            noise_std: 0.01,
        }
    }
}

/// How the linear model is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Declares the input dimension upfront instead of inferring it from the first batch.
    pub in_dim: Option<usize>,
    pub init: Initializer,
}

/// Selects and configures the `Optimizer`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerConfig {
    GradientDescent { learning_rate: f32 },
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::GradientDescent { learning_rate: 0.1 }
    }
}

/// Selects and configures the `LossFn`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossFnConfig {
    L2 { scale: f32 },
}

impl Default for LossFnConfig {
    fn default() -> Self {
        Self::L2 { scale: 0.5 }
    }
}

/// Everything needed to run a training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub data: DataConfig,
    pub model: ModelConfig,
    pub optimizer: OptimizerConfig,
    pub loss: LossFnConfig,
    pub epochs: NonZeroUsize,
    pub batch_size: NonZeroUsize,
    pub shuffle: bool,
    pub seed: Option<u64>,
    /// Where to write the loss history as json, if anywhere.
    pub history_path: Option<PathBuf>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            model: ModelConfig::default(),
            optimizer: OptimizerConfig::default(),
            loss: LossFnConfig::default(),
            epochs: DEFAULT_EPOCHS,
            batch_size: DEFAULT_BATCH_SIZE,
            shuffle: true,
            seed: None,
            history_path: None,
        }
    }
}

impl TrainingConfig {
    /// Reads and validates a json config file. Missing fields take their default value.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the amount of features of every sample.
    pub fn num_inputs(&self) -> usize {
        self.data.true_weight.len()
    }

    /// Checks the config for values the training can't run with.
    pub fn validate(&self) -> Result<()> {
        let data = &self.data;

        if data.true_weight.is_empty() {
            return Err(RegressionErr::InvalidConfig(
                "true_weight must have at least one entry".into(),
            ));
        }

        if data.num_examples == 0 {
            return Err(RegressionErr::InvalidConfig(
                "num_examples must be greater than 0".into(),
            ));
        }

        if !data.noise_std.is_finite() || data.noise_std < 0. {
            return Err(RegressionErr::InvalidConfig(format!(
                "noise_std ({}) must be finite and non negative",
                data.noise_std
            )));
        }

        if let Some(in_dim) = self.model.in_dim {
            if in_dim != self.num_inputs() {
                return Err(RegressionErr::InvalidConfig(format!(
                    "model in_dim ({in_dim}) does not match the amount of features ({})",
                    self.num_inputs()
                )));
            }
        }

        self.model.init.validate()?;

        let OptimizerConfig::GradientDescent { learning_rate } = self.optimizer;
        if !learning_rate.is_finite() || learning_rate <= 0. {
            return Err(RegressionErr::InvalidConfig(format!(
                "learning_rate ({learning_rate}) must be finite and positive"
            )));
        }

        let LossFnConfig::L2 { scale } = self.loss;
        if !scale.is_finite() || scale <= 0. {
            return Err(RegressionErr::InvalidConfig(format!(
                "loss scale ({scale}) must be finite and positive"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_run() {
        let config = TrainingConfig::default();

        assert_eq!(config.data.num_examples, 10_000);
        assert_eq!(config.data.true_weight, [2., -3.4]);
        assert_eq!(config.batch_size.get(), 4);
        assert_eq!(config.epochs.get(), 10);
        assert_eq!(
            config.optimizer,
            OptimizerConfig::GradientDescent { learning_rate: 0.1 }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: TrainingConfig =
            serde_json::from_str(r#"{ "batch_size": 8, "seed": 1, "data": { "num_examples": 50 } }"#)
                .unwrap();

        assert_eq!(config.batch_size.get(), 8);
        assert_eq!(config.seed, Some(1));
        assert_eq!(config.data.num_examples, 50);
        assert_eq!(config.data.true_bias, 4.2);
        assert_eq!(config.model.init, Initializer::default());
    }

    #[test]
    fn tagged_enums() {
        let config: TrainingConfig = serde_json::from_str(
            r#"{
                "model": { "init": { "uniform": { "low": -0.1, "high": 0.1 } } },
                "optimizer": { "gradient_descent": { "learning_rate": 0.03 } },
                "loss": { "l2": { "scale": 1.0 } }
            }"#,
        )
        .unwrap();

        assert_eq!(
            config.model.init,
            Initializer::Uniform {
                low: -0.1,
                high: 0.1
            }
        );
        assert_eq!(config.loss, LossFnConfig::L2 { scale: 1.0 });
    }

    #[test]
    fn zero_batch_size_does_not_parse() {
        assert!(serde_json::from_str::<TrainingConfig>(r#"{ "batch_size": 0 }"#).is_err());
    }

    #[test]
    fn rejects_invalid_values() {
        let mut config = TrainingConfig::default();
        config.optimizer = OptimizerConfig::GradientDescent { learning_rate: 0. };
        assert!(config.validate().is_err());

        let mut config = TrainingConfig::default();
        config.model.in_dim = Some(3);
        assert!(config.validate().is_err());

        let mut config = TrainingConfig::default();
        config.data.noise_std = -1.;
        assert!(config.validate().is_err());

        let mut config = TrainingConfig::default();
        config.data.true_weight.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_path_reads_and_validates() {
        let path = std::env::temp_dir().join(format!("linreg-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "epochs": 3, "model": { "in_dim": 2 } }"#).unwrap();

        let config = TrainingConfig::from_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.epochs.get(), 3);
        assert_eq!(config.model.in_dim, Some(2));
        assert!(matches!(
            TrainingConfig::from_path(std::env::temp_dir().join("linreg-missing.json")),
            Err(RegressionErr::Io(_))
        ));
    }
}
