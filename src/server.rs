use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::node::client::TezosClient;
use crate::node::model::{Block, OperationEnvelope, OperationKind};
use crate::node::source::{BlockId, NodeDataSource};
use crate::operations::extend::ExtendedContent;
use crate::operations::filter as ops;
use crate::operations::filter::{
  ActivateAccountFilter, BallotFilter, DelegationFilter, EndorsementFilter, EvidenceFilter,
  OriginationFilter, ProposalsFilter, RevealFilter, SeedNonceRevelationFilter, TransactionFilter,
};
use crate::query::block as block_query;
use crate::query::range::{Endpoint, RangeResolver, RangeSpec};
use crate::scalars;
use crate::types::GatewayError;

#[derive(Clone)]
pub struct AppState {
  pub client: TezosClient,
  pub max_blocks: u32,
  pub fetch_concurrency: usize,
}

pub fn router(state: AppState) -> Router {
  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([Method::GET]);

  Router::new()
    .route("/health", get(health))
    .route("/blocks", get(blocks_range))
    .route("/blocks/:id", get(block_single))
    .route("/blocks/:id/operations", get(block_operations))
    .route("/blocks/:id/operations/:operation_hash", get(block_operation))
    .layer(cors)
    .with_state(state)
}

async fn health() -> impl IntoResponse {
  Json(json!({ "status": "ok" }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RangeParams {
  from: Option<String>,
  to: Option<String>,
  count: Option<u32>,
}

async fn blocks_range(
  State(state): State<AppState>,
  Query(params): Query<RangeParams>,
) -> Result<Json<Vec<Block>>, GatewayError> {
  let spec = RangeSpec {
    from: params.from.as_deref().map(parse_endpoint).transpose()?,
    to: params.to.as_deref().map(parse_endpoint).transpose()?,
    count: params.count,
  };
  let resolver =
    RangeResolver::new(state.client.clone(), state.max_blocks, state.fetch_concurrency);
  Ok(Json(resolver.resolve(&spec).await?))
}

async fn block_single(
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> Result<Json<Block>, GatewayError> {
  let block_id = parse_block_id(&id)?;
  Ok(Json(block_query::single(&state.client, Some(block_id)).await?))
}

async fn block_operations(
  State(state): State<AppState>,
  Path(id): Path<String>,
  Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<ExtendedContent>>, GatewayError> {
  let block_id = parse_block_id(&id)?;
  let block = state.client.fetch_block(&block_id).await?;
  Ok(Json(classify(&block, params)?))
}

async fn block_operation(
  State(state): State<AppState>,
  Path((id, operation_hash)): Path<(String, String)>,
) -> Result<Json<OperationEnvelope>, GatewayError> {
  let block_id = parse_block_id(&id)?;
  if !scalars::is_valid_operation_hash(&operation_hash) {
    return Err(GatewayError::InvalidArgument(format!(
      "\"{}\" is not a valid operation hash",
      operation_hash
    )));
  }
  let block = state.client.fetch_block(&block_id).await?;
  match ops::find_operation(&block, &operation_hash) {
    Some(envelope) => Ok(Json(envelope.clone())),
    None => Err(GatewayError::NotFound(operation_hash)),
  }
}

// ====== Parameter parsing & validation ======

fn parse_block_id(value: &str) -> Result<BlockId, GatewayError> {
  if value == "head" {
    return Ok(BlockId::Head);
  }
  if let Ok(level) = value.parse::<u64>() {
    return Ok(BlockId::Level(level));
  }
  if scalars::is_valid_block_hash(value) {
    return Ok(BlockId::Hash(value.to_string()));
  }
  Err(GatewayError::InvalidArgument(format!(
    "\"{}\" is not a block level, block hash or \"head\"",
    value
  )))
}

fn parse_endpoint(value: &str) -> Result<Endpoint, GatewayError> {
  if value == "head" {
    return Ok(Endpoint::HeadOffset(0));
  }
  if let Ok(parsed) = value.parse::<i64>() {
    if parsed >= 0 {
      return Ok(Endpoint::Level(parsed as u64));
    }
    return Ok(Endpoint::HeadOffset(parsed));
  }
  if scalars::is_valid_block_hash(value) {
    return Ok(Endpoint::Hash(value.to_string()));
  }
  Err(GatewayError::InvalidArgument(format!(
    "\"{}\" is not a block level, block hash, head offset or \"head\"",
    value
  )))
}

fn parse_filter<T: DeserializeOwned>(params: HashMap<String, String>) -> Result<T, GatewayError> {
  let value =
    serde_json::to_value(params).map_err(|e| GatewayError::InvalidArgument(e.to_string()))?;
  serde_json::from_value(value).map_err(|e| GatewayError::InvalidArgument(e.to_string()))
}

fn check_address(name: &str, value: &Option<String>) -> Result<(), GatewayError> {
  match value {
    Some(v) if !scalars::is_valid_address(v) => Err(GatewayError::InvalidArgument(format!(
      "\"{}\" is not a valid address for \"{}\"",
      v, name
    ))),
    _ => Ok(()),
  }
}

fn check_operation_hash(value: &Option<String>) -> Result<(), GatewayError> {
  match value {
    Some(v) if !scalars::is_valid_operation_hash(v) => Err(GatewayError::InvalidArgument(
      format!("\"{}\" is not a valid operation hash", v),
    )),
    _ => Ok(()),
  }
}

fn check_protocol_hash(value: &Option<String>) -> Result<(), GatewayError> {
  match value {
    Some(v) if !scalars::is_valid_protocol_hash(v) => Err(GatewayError::InvalidArgument(
      format!("\"{}\" is not a valid protocol hash", v),
    )),
    _ => Ok(()),
  }
}

/// Dispatch the requested kind to its typed predicate filter. Unknown or
/// mistyped predicate parameters are rejected here, before any data leaves
/// the gateway.
fn classify(
  block: &Block,
  mut params: HashMap<String, String>,
) -> Result<Vec<ExtendedContent>, GatewayError> {
  let kind = match params.remove("kind") {
    None => None,
    Some(raw) => Some(
      serde_json::from_value::<OperationKind>(serde_json::Value::String(raw.clone()))
        .map_err(|_| GatewayError::InvalidArgument(format!("unknown operation kind \"{}\"", raw)))?,
    ),
  };

  match kind {
    None => {
      #[derive(Debug, Default, Deserialize)]
      #[serde(default, deny_unknown_fields)]
      struct GenericParams {
        operation_hash: Option<String>,
      }
      let filter: GenericParams = parse_filter(params)?;
      check_operation_hash(&filter.operation_hash)?;
      Ok(ops::operations(block, filter.operation_hash.as_deref()))
    }
    Some(OperationKind::Endorsement) => {
      let filter: EndorsementFilter = parse_filter(params)?;
      check_operation_hash(&filter.operation_hash)?;
      check_address("delegate", &filter.delegate)?;
      Ok(ops::endorsements(block, &filter))
    }
    Some(OperationKind::SeedNonceRevelation) => {
      let filter: SeedNonceRevelationFilter = parse_filter(params)?;
      check_operation_hash(&filter.operation_hash)?;
      Ok(ops::seed_nonce_revelations(block, &filter))
    }
    Some(OperationKind::DoubleEndorsementEvidence) => {
      let filter: EvidenceFilter = parse_filter(params)?;
      check_operation_hash(&filter.operation_hash)?;
      check_address("delegate", &filter.delegate)?;
      Ok(ops::double_endorsement_evidence(block, &filter))
    }
    Some(OperationKind::DoubleBakingEvidence) => {
      let filter: EvidenceFilter = parse_filter(params)?;
      check_operation_hash(&filter.operation_hash)?;
      check_address("delegate", &filter.delegate)?;
      Ok(ops::double_baking_evidence(block, &filter))
    }
    Some(OperationKind::ActivateAccount) => {
      let filter: ActivateAccountFilter = parse_filter(params)?;
      check_operation_hash(&filter.operation_hash)?;
      check_address("pkh", &filter.pkh)?;
      Ok(ops::activations(block, &filter))
    }
    Some(OperationKind::Proposals) => {
      let filter: ProposalsFilter = parse_filter(params)?;
      check_operation_hash(&filter.operation_hash)?;
      check_address("source", &filter.source)?;
      check_protocol_hash(&filter.proposal)?;
      Ok(ops::proposals(block, &filter))
    }
    Some(OperationKind::Ballot) => {
      let filter: BallotFilter = parse_filter(params)?;
      check_operation_hash(&filter.operation_hash)?;
      check_address("source", &filter.source)?;
      check_protocol_hash(&filter.proposal)?;
      Ok(ops::ballots(block, &filter))
    }
    Some(OperationKind::Reveal) => {
      let filter: RevealFilter = parse_filter(params)?;
      check_operation_hash(&filter.operation_hash)?;
      check_address("source", &filter.source)?;
      Ok(ops::reveals(block, &filter))
    }
    Some(OperationKind::Transaction) => {
      let filter: TransactionFilter = parse_filter(params)?;
      check_operation_hash(&filter.operation_hash)?;
      check_address("source", &filter.source)?;
      check_address("destination", &filter.destination)?;
      Ok(ops::transactions(block, &filter))
    }
    Some(OperationKind::Origination) => {
      let filter: OriginationFilter = parse_filter(params)?;
      check_operation_hash(&filter.operation_hash)?;
      check_address("source", &filter.source)?;
      check_address("delegate", &filter.delegate)?;
      check_address("originated_contract", &filter.originated_contract)?;
      Ok(ops::originations(block, &filter))
    }
    Some(OperationKind::Delegation) => {
      let filter: DelegationFilter = parse_filter(params)?;
      check_operation_hash(&filter.operation_hash)?;
      check_address("source", &filter.source)?;
      check_address("delegate", &filter.delegate)?;
      Ok(ops::delegations(block, &filter))
    }
  }
}

impl IntoResponse for GatewayError {
  fn into_response(self) -> Response {
    let status = match &self {
      GatewayError::InvalidArgument(_) | GatewayError::WindowTooLarge { .. } => {
        StatusCode::BAD_REQUEST
      }
      GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
      GatewayError::Inconsistent { .. } | GatewayError::Upstream(_) => StatusCode::BAD_GATEWAY,
      GatewayError::Config(_) | GatewayError::Initialization(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    if status.is_server_error() {
      warn!("[Gateway] request failed: {}", self);
    }
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
