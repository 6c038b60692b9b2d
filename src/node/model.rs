use serde::{Deserialize, Serialize};

// Node JSON comes in snake_case; the gateway re-emits camelCase, so every
// struct below renames on serialize only.

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Block {
  pub protocol: String,
  pub chain_id: String,
  pub hash: String,
  pub header: BlockHeader,
  #[serde(default)]
  pub metadata: Option<BlockMetadata>,
  pub operations: Vec<Vec<OperationEnvelope>>,
}

impl Block {
  pub fn level(&self) -> u64 {
    self.header.level
  }

  pub fn predecessor(&self) -> &str {
    &self.header.predecessor
  }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct BlockHeader {
  pub level: u64,
  pub predecessor: String,
  #[serde(default)]
  pub proto: Option<u32>,
  #[serde(default)]
  pub timestamp: Option<String>,
  #[serde(default)]
  pub validation_pass: Option<u8>,
  #[serde(default)]
  pub operations_hash: Option<String>,
  #[serde(default)]
  pub fitness: Option<Vec<String>>,
  #[serde(default)]
  pub context: Option<String>,
  #[serde(default)]
  pub priority: Option<u32>,
  #[serde(default)]
  pub proof_of_work_nonce: Option<String>,
  #[serde(default)]
  pub seed_nonce_hash: Option<String>,
  #[serde(default)]
  pub signature: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct BlockMetadata {
  #[serde(default)]
  pub protocol: Option<String>,
  #[serde(default)]
  pub next_protocol: Option<String>,
  #[serde(default)]
  pub baker: Option<String>,
  #[serde(default)]
  pub level: Option<LevelInfo>,
  #[serde(default)]
  pub voting_period_kind: Option<String>,
  #[serde(default)]
  pub consumed_gas: Option<String>,
  #[serde(default)]
  pub balance_updates: Vec<BalanceUpdate>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct LevelInfo {
  pub level: u64,
  #[serde(default)]
  pub cycle: Option<u64>,
  #[serde(default)]
  pub cycle_position: Option<u64>,
  #[serde(default)]
  pub voting_period: Option<u64>,
  #[serde(default)]
  pub voting_period_position: Option<u64>,
  #[serde(default)]
  pub expected_commitment: Option<bool>,
}

/// One signed operation group as included in a block. Several content items
/// may share one envelope (batched operations).
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct OperationEnvelope {
  #[serde(default)]
  pub protocol: Option<String>,
  #[serde(default)]
  pub chain_id: Option<String>,
  pub hash: String,
  pub branch: String,
  #[serde(default)]
  pub signature: Option<String>,
  pub contents: Vec<OperationContent>,
}

/// Closed union over the operation kinds the node can return. Kind tags the
/// gateway does not know about land in `Unknown` instead of failing the whole
/// block, so protocol upgrades cannot break deserialization.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationContent {
  Endorsement(Endorsement),
  SeedNonceRevelation(SeedNonceRevelation),
  DoubleEndorsementEvidence(DoubleEndorsementEvidence),
  DoubleBakingEvidence(DoubleBakingEvidence),
  ActivateAccount(ActivateAccount),
  Proposals(Proposals),
  Ballot(Ballot),
  Reveal(Reveal),
  Transaction(Transaction),
  Origination(Origination),
  Delegation(Delegation),
  #[serde(other)]
  Unknown,
}

/// The eleven kinds the classifier can be asked for. `Unknown` content has no
/// kind and therefore never classifies.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
  Endorsement,
  SeedNonceRevelation,
  DoubleEndorsementEvidence,
  DoubleBakingEvidence,
  ActivateAccount,
  Proposals,
  Ballot,
  Reveal,
  Transaction,
  Origination,
  Delegation,
}

impl OperationContent {
  pub fn kind(&self) -> Option<OperationKind> {
    match self {
      OperationContent::Endorsement(_) => Some(OperationKind::Endorsement),
      OperationContent::SeedNonceRevelation(_) => Some(OperationKind::SeedNonceRevelation),
      OperationContent::DoubleEndorsementEvidence(_) => Some(OperationKind::DoubleEndorsementEvidence),
      OperationContent::DoubleBakingEvidence(_) => Some(OperationKind::DoubleBakingEvidence),
      OperationContent::ActivateAccount(_) => Some(OperationKind::ActivateAccount),
      OperationContent::Proposals(_) => Some(OperationKind::Proposals),
      OperationContent::Ballot(_) => Some(OperationKind::Ballot),
      OperationContent::Reveal(_) => Some(OperationKind::Reveal),
      OperationContent::Transaction(_) => Some(OperationKind::Transaction),
      OperationContent::Origination(_) => Some(OperationKind::Origination),
      OperationContent::Delegation(_) => Some(OperationKind::Delegation),
      OperationContent::Unknown => None,
    }
  }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Endorsement {
  #[serde(default)]
  pub level: Option<u64>,
  #[serde(default)]
  pub metadata: Option<EndorsementMetadata>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct EndorsementMetadata {
  #[serde(default)]
  pub balance_updates: Vec<BalanceUpdate>,
  #[serde(default)]
  pub delegate: Option<String>,
  #[serde(default)]
  pub slots: Vec<u64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct SeedNonceRevelation {
  #[serde(default)]
  pub level: Option<u64>,
  #[serde(default)]
  pub nonce: Option<String>,
  #[serde(default)]
  pub metadata: Option<OperationMetadata>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct DoubleEndorsementEvidence {
  #[serde(default)]
  pub op1: Option<InlinedEndorsement>,
  #[serde(default)]
  pub op2: Option<InlinedEndorsement>,
  #[serde(default)]
  pub metadata: Option<OperationMetadata>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct InlinedEndorsement {
  pub branch: String,
  pub operations: InlinedEndorsementContent,
  #[serde(default)]
  pub signature: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct InlinedEndorsementContent {
  pub kind: String,
  pub level: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct DoubleBakingEvidence {
  #[serde(default)]
  pub bh1: Option<BlockHeader>,
  #[serde(default)]
  pub bh2: Option<BlockHeader>,
  #[serde(default)]
  pub metadata: Option<OperationMetadata>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct ActivateAccount {
  #[serde(default)]
  pub pkh: Option<String>,
  #[serde(default)]
  pub secret: Option<String>,
  #[serde(default)]
  pub metadata: Option<OperationMetadata>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Proposals {
  #[serde(default)]
  pub source: Option<String>,
  #[serde(default)]
  pub period: Option<i64>,
  #[serde(default)]
  pub proposals: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Ballot {
  #[serde(default)]
  pub source: Option<String>,
  #[serde(default)]
  pub period: Option<i64>,
  #[serde(default)]
  pub proposal: Option<String>,
  #[serde(default)]
  pub ballot: Option<BallotVote>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BallotVote {
  Nay,
  Yay,
  Pass,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Reveal {
  #[serde(default)]
  pub source: Option<String>,
  #[serde(default)]
  pub fee: Option<String>,
  #[serde(default)]
  pub counter: Option<String>,
  #[serde(default)]
  pub gas_limit: Option<String>,
  #[serde(default)]
  pub storage_limit: Option<String>,
  #[serde(default)]
  pub public_key: Option<String>,
  #[serde(default)]
  pub metadata: Option<ManagerMetadata>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Transaction {
  #[serde(default)]
  pub source: Option<String>,
  #[serde(default)]
  pub fee: Option<String>,
  #[serde(default)]
  pub counter: Option<String>,
  #[serde(default)]
  pub gas_limit: Option<String>,
  #[serde(default)]
  pub storage_limit: Option<String>,
  #[serde(default)]
  pub amount: Option<String>,
  #[serde(default)]
  pub destination: Option<String>,
  #[serde(default)]
  pub parameters: Option<serde_json::Value>,
  #[serde(default)]
  pub metadata: Option<ManagerMetadata>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Origination {
  #[serde(default)]
  pub source: Option<String>,
  #[serde(default)]
  pub fee: Option<String>,
  #[serde(default)]
  pub counter: Option<String>,
  #[serde(default)]
  pub gas_limit: Option<String>,
  #[serde(default)]
  pub storage_limit: Option<String>,
  #[serde(default)]
  pub balance: Option<String>,
  #[serde(default)]
  pub delegate: Option<String>,
  #[serde(default)]
  pub script: Option<serde_json::Value>,
  #[serde(default)]
  pub metadata: Option<ManagerMetadata>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Delegation {
  #[serde(default)]
  pub source: Option<String>,
  #[serde(default)]
  pub fee: Option<String>,
  #[serde(default)]
  pub counter: Option<String>,
  #[serde(default)]
  pub gas_limit: Option<String>,
  #[serde(default)]
  pub storage_limit: Option<String>,
  #[serde(default)]
  pub delegate: Option<String>,
  #[serde(default)]
  pub metadata: Option<ManagerMetadata>,
}

/// Metadata shared by the anonymous operation kinds (balance updates only).
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct OperationMetadata {
  #[serde(default)]
  pub balance_updates: Vec<BalanceUpdate>,
}

/// Metadata attached to manager operations (reveal, transaction, origination,
/// delegation): the operation result plus any internal results it spawned.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct ManagerMetadata {
  #[serde(default)]
  pub balance_updates: Vec<BalanceUpdate>,
  #[serde(default)]
  pub operation_result: Option<OperationResult>,
  #[serde(default)]
  pub internal_operation_results: Vec<InternalOperationResult>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct OperationResult {
  #[serde(default)]
  pub status: Option<OperationResultStatus>,
  #[serde(default)]
  pub consumed_gas: Option<String>,
  #[serde(default)]
  pub storage_size: Option<String>,
  #[serde(default)]
  pub paid_storage_size_diff: Option<String>,
  #[serde(default)]
  pub originated_contracts: Vec<String>,
  #[serde(default)]
  pub balance_updates: Vec<BalanceUpdate>,
  #[serde(default)]
  pub errors: Vec<OperationError>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OperationResultStatus {
  Applied,
  Failed,
  Skipped,
  Backtracked,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct OperationError {
  pub kind: String,
  pub id: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct InternalOperationResult {
  pub kind: String,
  #[serde(default)]
  pub source: Option<String>,
  #[serde(default)]
  pub nonce: Option<u64>,
  #[serde(default)]
  pub amount: Option<String>,
  #[serde(default)]
  pub destination: Option<String>,
  #[serde(default)]
  pub balance: Option<String>,
  #[serde(default)]
  pub delegate: Option<String>,
  #[serde(default)]
  pub public_key: Option<String>,
  #[serde(default)]
  pub result: Option<OperationResult>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct BalanceUpdate {
  #[serde(default)]
  pub kind: Option<BalanceUpdateKind>,
  #[serde(default)]
  pub category: Option<BalanceUpdateCategory>,
  #[serde(default)]
  pub contract: Option<String>,
  #[serde(default)]
  pub delegate: Option<String>,
  #[serde(default)]
  pub cycle: Option<i64>,
  #[serde(default)]
  pub change: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BalanceUpdateKind {
  Contract,
  Freezer,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BalanceUpdateCategory {
  Rewards,
  Fees,
  Deposits,
}
