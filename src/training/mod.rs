mod builder;
mod history;
mod model_trainer;
mod reporter;

pub use builder::{LinearTrainer, TrainerBuilder};
pub use history::LossHistory;
pub use model_trainer::ModelTrainer;
pub use reporter::{epoch_line, LogReporter, Reporter};
