use std::convert::Infallible;
use std::str::FromStr;

use futures::stream::{self, StreamExt};
use log::debug;

use crate::node::model::Block;
use crate::node::source::{BlockId, NodeDataSource, NodeError};
use crate::types::GatewayError;

/// One end of a requested block range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
  /// Absolute chain level.
  Level(u64),
  /// Block hash (or any non-numeric identifier the node accepts).
  Hash(String),
  /// Level relative to the current head; 0 is head itself.
  HeadOffset(i64),
}

impl FromStr for Endpoint {
  type Err = Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s == "head" {
      return Ok(Endpoint::HeadOffset(0));
    }
    match s.parse::<i64>() {
      Ok(parsed) if parsed >= 0 => Ok(Endpoint::Level(parsed as u64)),
      Ok(parsed) => Ok(Endpoint::HeadOffset(parsed)),
      Err(_) => Ok(Endpoint::Hash(s.to_string())),
    }
  }
}

/// Caller-supplied range specification. At most two of the three fields may
/// be present; all three absent is invalid.
#[derive(Debug, Clone, Default)]
pub struct RangeSpec {
  pub from: Option<Endpoint>,
  pub to: Option<Endpoint>,
  pub count: Option<u32>,
}

/// Resolves a range specification into a bounded, height-ascending window of
/// blocks fetched from the injected data source.
pub struct RangeResolver<D> {
  source: D,
  max_blocks: u32,
  fetch_concurrency: usize,
}

enum Slot {
  Ready(Block),
  Fetch(u64),
}

impl<D: NodeDataSource> RangeResolver<D> {
  pub fn new(source: D, max_blocks: u32, fetch_concurrency: usize) -> Self {
    Self {
      source,
      max_blocks,
      fetch_concurrency,
    }
  }

  /// Resolve one endpoint to a level, keeping the block around when the
  /// lookup had to fetch it anyway so the assembly does not fetch it again.
  async fn endpoint_level(
    &self,
    endpoint: Option<&Endpoint>,
  ) -> Result<(u64, Option<Block>), GatewayError> {
    match endpoint {
      None => {
        let head = self.source.fetch_block(&BlockId::Head).await?;
        Ok((head.level(), Some(head)))
      }
      Some(Endpoint::Level(level)) => Ok((*level, None)),
      Some(Endpoint::Hash(hash)) => {
        let block = self.source.fetch_block(&BlockId::Hash(hash.clone())).await?;
        Ok((block.level(), Some(block)))
      }
      Some(Endpoint::HeadOffset(offset)) => {
        let head = self.source.fetch_block(&BlockId::Head).await?;
        if *offset == 0 {
          return Ok((head.level(), Some(head)));
        }
        // head designates a different level than the offset target, so the
        // fetched block is not reusable here
        let level = (head.level() as i64).saturating_add(*offset).max(0) as u64;
        Ok((level, None))
      }
    }
  }

  pub async fn resolve(&self, spec: &RangeSpec) -> Result<Vec<Block>, GatewayError> {
    // argument combinations are rejected before any fetch
    if spec.from.is_none() && spec.to.is_none() && spec.count.is_none() {
      return Err(GatewayError::InvalidArgument(
        "neither \"from\", \"to\" nor \"count\" argument specified".to_string(),
      ));
    }
    if spec.from.is_some() && spec.to.is_some() && spec.count.is_some() {
      return Err(GatewayError::InvalidArgument(
        "cannot limit the query from both ends (\"from\" and \"to\") and by maximum count at the same time"
          .to_string(),
      ));
    }
    if spec.count == Some(0) {
      return Err(GatewayError::InvalidArgument(
        "the \"count\" argument has to be greater than 0".to_string(),
      ));
    }

    // fix the window boundaries, keeping endpoint blocks for reuse; a window
    // whose upper bound comes from a count is open-ended and may truncate at
    // the chain tip
    let (from_level, to_level, mut first_block, mut last_block, open_ended) = match spec.count {
      None => {
        let (from_level, first_block) = self.endpoint_level(spec.from.as_ref()).await?;
        let (to_level, last_block) = self.endpoint_level(spec.to.as_ref()).await?;
        if to_level < from_level {
          return Ok(Vec::new());
        }
        (from_level, to_level, first_block, last_block, false)
      }
      Some(count) => {
        let span = count as u64 - 1;
        if spec.from.is_some() {
          let (from_level, first_block) = self.endpoint_level(spec.from.as_ref()).await?;
          (from_level, from_level.saturating_add(span), first_block, None, true)
        } else {
          let (to_level, last_block) = self.endpoint_level(spec.to.as_ref()).await?;
          (to_level.saturating_sub(span), to_level, None, last_block, false)
        }
      }
    };

    let window = to_level - from_level + 1;
    if window > self.max_blocks as u64 {
      return Err(GatewayError::WindowTooLarge {
        requested: window,
        max: self.max_blocks,
      });
    }
    debug!(
      "[Range] resolved window {}..={} ({} blocks)",
      from_level, to_level, window
    );

    let mut slots = Vec::with_capacity(window as usize);
    for level in from_level..=to_level {
      if level == from_level {
        if let Some(block) = first_block.take() {
          slots.push(Slot::Ready(block));
          continue;
        }
      }
      if level == to_level {
        if let Some(block) = last_block.take() {
          slots.push(Slot::Ready(block));
          continue;
        }
      }
      slots.push(Slot::Fetch(level));
    }

    let source = &self.source;
    let mut blocks: Vec<Block> = Vec::with_capacity(window as usize);
    let mut fetches = stream::iter(slots)
      .map(|slot| async move {
        match slot {
          Slot::Ready(block) => {
            let level = block.level();
            (level, Ok(block))
          }
          Slot::Fetch(level) => (level, source.fetch_block(&BlockId::Level(level)).await),
        }
      })
      .buffered(self.fetch_concurrency.max(1));

    while let Some((level, result)) = fetches.next().await {
      match result {
        Ok(block) => blocks.push(block),
        Err(NodeError::NotFound(_)) if open_ended && level > from_level => {
          debug!("[Range] chain tip reached at level {}, truncating window", level);
          break;
        }
        Err(NodeError::NotFound(id)) if level == from_level || level == to_level => {
          return Err(GatewayError::NotFound(id));
        }
        Err(NodeError::NotFound(_)) => {
          return Err(GatewayError::Inconsistent { level });
        }
        Err(err) => return Err(err.into()),
      }
    }
    Ok(blocks)
  }
}
