mod dataset;
mod loader;
mod synthetic;

pub use dataset::Dataset;
pub use loader::DataLoader;
pub use synthetic::Synthesizer;
