use serde::Deserialize;

use crate::node::model::{
  BalanceUpdateKind, BallotVote, Block, ManagerMetadata, OperationContent, OperationEnvelope,
  OperationKind, OperationMetadata, OperationResultStatus,
};
use crate::operations::extend::{extend_bucket, ExtendedContent};

/// Fixed validation pass each operation kind is confined to. Kinds never
/// appear outside their designated pass.
pub fn validation_pass(kind: OperationKind) -> usize {
  match kind {
    OperationKind::Endorsement => 0,
    OperationKind::Ballot | OperationKind::Proposals | OperationKind::SeedNonceRevelation => 1,
    OperationKind::DoubleBakingEvidence
    | OperationKind::DoubleEndorsementEvidence
    | OperationKind::ActivateAccount => 2,
    OperationKind::Reveal
    | OperationKind::Transaction
    | OperationKind::Delegation
    | OperationKind::Origination => 3,
  }
}

fn bucket_for(block: &Block, kind: OperationKind) -> &[OperationEnvelope] {
  block
    .operations
    .get(validation_pass(kind))
    .map(Vec::as_slice)
    .unwrap_or(&[])
}

/// Extend the kind's designated bucket and keep only content items with the
/// requested kind tag, optionally restricted to one envelope hash.
fn contents_of_kind(
  block: &Block,
  kind: OperationKind,
  operation_hash: Option<&str>,
) -> Vec<ExtendedContent> {
  extend_bucket(bucket_for(block, kind))
    .into_iter()
    .filter(|ext| ext.content.kind() == Some(kind))
    .filter(|ext| operation_hash.map_or(true, |hash| ext.envelope.hash == hash))
    .collect()
}

// Absent predicate fields mean "no constraint"; absent data fields fail the
// predicate as a plain non-match.

fn opt_eq(want: &Option<String>, have: Option<&str>) -> bool {
  match want {
    None => true,
    Some(w) => have == Some(w.as_str()),
  }
}

fn result_status(metadata: &Option<ManagerMetadata>) -> Option<OperationResultStatus> {
  metadata
    .as_ref()
    .and_then(|m| m.operation_result.as_ref())
    .and_then(|r| r.status)
}

fn status_matches(want: Option<OperationResultStatus>, metadata: &Option<ManagerMetadata>) -> bool {
  match want {
    None => true,
    Some(w) => result_status(metadata) == Some(w),
  }
}

fn freezer_delegate_matches(want: &Option<String>, metadata: &Option<OperationMetadata>) -> bool {
  match want {
    None => true,
    Some(w) => metadata
      .as_ref()
      .map(|m| {
        m.balance_updates.iter().any(|update| {
          update.kind == Some(BalanceUpdateKind::Freezer)
            && update.delegate.as_deref() == Some(w.as_str())
        })
      })
      .unwrap_or(false),
  }
}

// ====== Per-kind predicate structs ======

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct EndorsementFilter {
  pub operation_hash: Option<String>,
  pub delegate: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct SeedNonceRevelationFilter {
  pub operation_hash: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct EvidenceFilter {
  pub operation_hash: Option<String>,
  pub delegate: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ActivateAccountFilter {
  pub operation_hash: Option<String>,
  pub pkh: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ProposalsFilter {
  pub operation_hash: Option<String>,
  pub source: Option<String>,
  pub proposal: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct BallotFilter {
  pub operation_hash: Option<String>,
  pub source: Option<String>,
  pub proposal: Option<String>,
  pub ballot: Option<BallotVote>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct RevealFilter {
  pub operation_hash: Option<String>,
  pub source: Option<String>,
  pub status: Option<OperationResultStatus>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct TransactionFilter {
  pub operation_hash: Option<String>,
  pub source: Option<String>,
  pub destination: Option<String>,
  pub status: Option<OperationResultStatus>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct OriginationFilter {
  pub operation_hash: Option<String>,
  pub source: Option<String>,
  pub delegate: Option<String>,
  pub status: Option<OperationResultStatus>,
  pub originated_contract: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct DelegationFilter {
  pub operation_hash: Option<String>,
  pub source: Option<String>,
  pub delegate: Option<String>,
  pub status: Option<OperationResultStatus>,
}

// ====== Per-kind accessors ======

pub fn endorsements(block: &Block, filter: &EndorsementFilter) -> Vec<ExtendedContent> {
  contents_of_kind(block, OperationKind::Endorsement, filter.operation_hash.as_deref())
    .into_iter()
    .filter(|ext| match &ext.content {
      OperationContent::Endorsement(op) => {
        let delegate = op.metadata.as_ref().and_then(|m| m.delegate.as_deref());
        opt_eq(&filter.delegate, delegate)
      }
      _ => false,
    })
    .collect()
}

pub fn seed_nonce_revelations(
  block: &Block,
  filter: &SeedNonceRevelationFilter,
) -> Vec<ExtendedContent> {
  contents_of_kind(
    block,
    OperationKind::SeedNonceRevelation,
    filter.operation_hash.as_deref(),
  )
}

pub fn double_endorsement_evidence(block: &Block, filter: &EvidenceFilter) -> Vec<ExtendedContent> {
  contents_of_kind(
    block,
    OperationKind::DoubleEndorsementEvidence,
    filter.operation_hash.as_deref(),
  )
  .into_iter()
  .filter(|ext| match &ext.content {
    OperationContent::DoubleEndorsementEvidence(op) => {
      freezer_delegate_matches(&filter.delegate, &op.metadata)
    }
    _ => false,
  })
  .collect()
}

pub fn double_baking_evidence(block: &Block, filter: &EvidenceFilter) -> Vec<ExtendedContent> {
  contents_of_kind(
    block,
    OperationKind::DoubleBakingEvidence,
    filter.operation_hash.as_deref(),
  )
  .into_iter()
  .filter(|ext| match &ext.content {
    OperationContent::DoubleBakingEvidence(op) => {
      freezer_delegate_matches(&filter.delegate, &op.metadata)
    }
    _ => false,
  })
  .collect()
}

pub fn activations(block: &Block, filter: &ActivateAccountFilter) -> Vec<ExtendedContent> {
  contents_of_kind(block, OperationKind::ActivateAccount, filter.operation_hash.as_deref())
    .into_iter()
    .filter(|ext| match &ext.content {
      OperationContent::ActivateAccount(op) => opt_eq(&filter.pkh, op.pkh.as_deref()),
      _ => false,
    })
    .collect()
}

pub fn proposals(block: &Block, filter: &ProposalsFilter) -> Vec<ExtendedContent> {
  contents_of_kind(block, OperationKind::Proposals, filter.operation_hash.as_deref())
    .into_iter()
    .filter(|ext| match &ext.content {
      OperationContent::Proposals(op) => {
        opt_eq(&filter.source, op.source.as_deref())
          && filter
            .proposal
            .as_ref()
            .map_or(true, |p| op.proposals.iter().any(|candidate| candidate == p))
      }
      _ => false,
    })
    .collect()
}

pub fn ballots(block: &Block, filter: &BallotFilter) -> Vec<ExtendedContent> {
  contents_of_kind(block, OperationKind::Ballot, filter.operation_hash.as_deref())
    .into_iter()
    .filter(|ext| match &ext.content {
      OperationContent::Ballot(op) => {
        opt_eq(&filter.source, op.source.as_deref())
          && opt_eq(&filter.proposal, op.proposal.as_deref())
          && filter.ballot.map_or(true, |vote| op.ballot == Some(vote))
      }
      _ => false,
    })
    .collect()
}

pub fn reveals(block: &Block, filter: &RevealFilter) -> Vec<ExtendedContent> {
  contents_of_kind(block, OperationKind::Reveal, filter.operation_hash.as_deref())
    .into_iter()
    .filter(|ext| match &ext.content {
      OperationContent::Reveal(op) => {
        opt_eq(&filter.source, op.source.as_deref()) && status_matches(filter.status, &op.metadata)
      }
      _ => false,
    })
    .collect()
}

pub fn transactions(block: &Block, filter: &TransactionFilter) -> Vec<ExtendedContent> {
  contents_of_kind(block, OperationKind::Transaction, filter.operation_hash.as_deref())
    .into_iter()
    .filter(|ext| match &ext.content {
      OperationContent::Transaction(op) => {
        opt_eq(&filter.source, op.source.as_deref())
          && opt_eq(&filter.destination, op.destination.as_deref())
          && status_matches(filter.status, &op.metadata)
      }
      _ => false,
    })
    .collect()
}

pub fn originations(block: &Block, filter: &OriginationFilter) -> Vec<ExtendedContent> {
  contents_of_kind(block, OperationKind::Origination, filter.operation_hash.as_deref())
    .into_iter()
    .filter(|ext| match &ext.content {
      OperationContent::Origination(op) => {
        let originated = filter.originated_contract.as_ref().map_or(true, |address| {
          op.metadata
            .as_ref()
            .and_then(|m| m.operation_result.as_ref())
            .map(|r| r.originated_contracts.iter().any(|contract| contract == address))
            .unwrap_or(false)
        });
        opt_eq(&filter.source, op.source.as_deref())
          && opt_eq(&filter.delegate, op.delegate.as_deref())
          && status_matches(filter.status, &op.metadata)
          && originated
      }
      _ => false,
    })
    .collect()
}

pub fn delegations(block: &Block, filter: &DelegationFilter) -> Vec<ExtendedContent> {
  contents_of_kind(block, OperationKind::Delegation, filter.operation_hash.as_deref())
    .into_iter()
    .filter(|ext| match &ext.content {
      OperationContent::Delegation(op) => {
        opt_eq(&filter.source, op.source.as_deref())
          && opt_eq(&filter.delegate, op.delegate.as_deref())
          && status_matches(filter.status, &op.metadata)
      }
      _ => false,
    })
    .collect()
}

/// All four buckets with extension applied and no kind or field filtering,
/// optionally restricted to one envelope hash.
pub fn operations(block: &Block, operation_hash: Option<&str>) -> Vec<ExtendedContent> {
  block
    .operations
    .iter()
    .flat_map(|bucket| extend_bucket(bucket))
    .filter(|ext| operation_hash.map_or(true, |hash| ext.envelope.hash == hash))
    .collect()
}

/// First envelope whose hash matches, scanning pass order then envelope
/// order. Absence is not an error.
pub fn find_operation<'a>(block: &'a Block, operation_hash: &str) -> Option<&'a OperationEnvelope> {
  block
    .operations
    .iter()
    .flatten()
    .find(|envelope| envelope.hash == operation_hash)
}
