use crate::node::model::Block;
use crate::node::source::{BlockId, NodeDataSource};
use crate::types::GatewayError;

/// Single-block entry point: fetch by identifier, defaulting to the chain
/// head when none is given.
pub async fn single<D: NodeDataSource>(
  source: &D,
  id: Option<BlockId>,
) -> Result<Block, GatewayError> {
  Ok(source.fetch_block(&id.unwrap_or(BlockId::Head)).await?)
}
