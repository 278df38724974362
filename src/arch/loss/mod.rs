mod l2;
mod loss_fn;

pub use l2::L2Loss;
pub use loss_fn::LossFn;
