pub mod arch;
pub mod config;
pub mod data;
pub mod error;
pub mod optimization;
pub mod plot;
pub mod training;

pub use error::{RegressionErr, Result};
