use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

use crate::node::model::Block;

/// Identifier accepted by the node's block endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockId {
  Head,
  Level(u64),
  Hash(String),
}

impl fmt::Display for BlockId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BlockId::Head => write!(f, "head"),
      BlockId::Level(level) => write!(f, "{}", level),
      BlockId::Hash(hash) => write!(f, "{}", hash),
    }
  }
}

impl FromStr for BlockId {
  type Err = std::convert::Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s == "head" {
      return Ok(BlockId::Head);
    }
    match s.parse::<u64>() {
      Ok(level) => Ok(BlockId::Level(level)),
      Err(_) => Ok(BlockId::Hash(s.to_string())),
    }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum NodeError {
  #[error("block not found: {0}")]
  NotFound(String),

  #[error("node request failed: {0}")]
  Transport(String),
}

#[async_trait]
pub trait NodeDataSource: Send + Sync {
  async fn fetch_block(&self, id: &BlockId) -> Result<Block, NodeError>;
}

#[async_trait]
impl<D: NodeDataSource + ?Sized> NodeDataSource for Arc<D> {
  async fn fetch_block(&self, id: &BlockId) -> Result<Block, NodeError> {
    (**self).fetch_block(id).await
  }
}
