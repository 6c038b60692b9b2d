use crate::node::source::NodeError;

// ====== Unified Error Type ======
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  #[error("number of blocks has to be lower than {max} (requested {requested})")]
  WindowTooLarge { requested: u64, max: u32 },

  #[error("block not found: {0}")]
  NotFound(String),

  #[error("node is missing block {level} inside the requested window")]
  Inconsistent { level: u64 },

  #[error("upstream node error: {0}")]
  Upstream(String),

  #[error("configuration error: {0}")]
  Config(String),

  #[error("initialization error: {0}")]
  Initialization(String),
}

// ====== Error Conversions (From impls) ======

impl From<NodeError> for GatewayError {
  fn from(err: NodeError) -> Self {
    match err {
      NodeError::NotFound(id) => GatewayError::NotFound(id),
      NodeError::Transport(msg) => GatewayError::Upstream(msg),
    }
  }
}

impl From<std::io::Error> for GatewayError {
  fn from(err: std::io::Error) -> Self {
    GatewayError::Initialization(format!("IO error: {}", err))
  }
}
