use reqwest::{Client, StatusCode};
use async_trait::async_trait;

use crate::node::model::Block;
use crate::node::source::{BlockId, NodeDataSource, NodeError};

/// HTTP client for the Tezos node block RPC.
#[derive(Clone)]
pub struct TezosClient {
  client: Client,
  api_url: String,
}

impl TezosClient {
  pub fn new(api_url: String) -> Self {
    Self {
      client: Client::new(),
      api_url,
    }
  }
}

#[async_trait]
impl NodeDataSource for TezosClient {
  async fn fetch_block(&self, id: &BlockId) -> Result<Block, NodeError> {
    let url = format!("{}/chains/main/blocks/{}", self.api_url, id);
    let response = self
      .client
      .get(&url)
      .send()
      .await
      .map_err(|e| NodeError::Transport(format!("Reqwest error: {}", e)))?;

    if response.status() == StatusCode::NOT_FOUND {
      return Err(NodeError::NotFound(id.to_string()));
    }
    let response = response
      .error_for_status()
      .map_err(|e| NodeError::Transport(format!("Node returned error status: {}", e)))?;

    let response_text = response
      .text()
      .await
      .map_err(|e| NodeError::Transport(format!("Reqwest error: {}", e)))?;
    log::debug!("[TEZOS] Raw block response for {}: {}", id, response_text);

    let block: Block = serde_json::from_str(&response_text)
      .map_err(|e| NodeError::Transport(format!("JSON parse error: {}", e)))?;
    Ok(block)
  }
}
