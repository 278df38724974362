pub mod init;
pub mod layers;
pub mod loss;
mod model;

pub use init::Initializer;
pub use model::Model;
