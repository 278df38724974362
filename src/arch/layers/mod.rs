mod dense;

pub use dense::{Dense, DenseBuilder, LinearParams};
