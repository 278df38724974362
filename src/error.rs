use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, RegressionErr>;

/// The crate's error type.
#[derive(Debug)]
pub enum RegressionErr {
    /// The parameters were read, or a forward pass was attempted, before any initializer was bound.
    ParamsUninitialized { layer: &'static str },
    /// An initializer is bound but the input dimension has not been observed yet.
    DeferredInit { layer: &'static str },
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    InvalidConfig(String),
    InvalidDistribution(String),
    /// The epoch loss stopped being a finite number.
    Diverged { epoch: usize },
    Io(io::Error),
    Json(serde_json::Error),
}

impl Display for RegressionErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegressionErr::ParamsUninitialized { layer } => write!(
                f,
                "the parameters of {layer} are not initialized, call `initialize` before using them"
            ),
            RegressionErr::DeferredInit { layer } => write!(
                f,
                "the parameters of {layer} have deferred initialization, run a forward pass or \
                 declare the input dimension before reading them"
            ),
            RegressionErr::SizeMismatch {
                what,
                got,
                expected,
            } => write!(f, "size mismatch for {what}: got {got}, expected {expected}"),
            RegressionErr::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            RegressionErr::InvalidDistribution(msg) => write!(f, "invalid distribution: {msg}"),
            RegressionErr::Diverged { epoch } => {
                write!(f, "training diverged at epoch {epoch}, the loss is not finite")
            }
            RegressionErr::Io(e) => write!(f, "io error: {e}"),
            RegressionErr::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl Error for RegressionErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RegressionErr::Io(e) => Some(e),
            RegressionErr::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RegressionErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for RegressionErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
