use serde_json::json;

use tezgate::node::model::{
  BallotVote, Block, OperationContent, OperationKind, OperationResultStatus,
};
use tezgate::operations::extend::extend_bucket;
use tezgate::operations::filter::{
  activations, ballots, delegations, double_baking_evidence, double_endorsement_evidence,
  endorsements, find_operation, operations, originations, proposals, reveals,
  seed_nonce_revelations, transactions, ActivateAccountFilter, BallotFilter, DelegationFilter,
  EndorsementFilter, EvidenceFilter, OriginationFilter, ProposalsFilter, RevealFilter,
  SeedNonceRevelationFilter, TransactionFilter,
};

const BAKER_A: &str = "tz1Yju7jmmsaUiG9qQLoYv35v5pHgnWoLWbt";
const BAKER_B: &str = "tz1fJHFn6sWEd3NnBPngACuw2dggTv6nQZ7g";
const VOTER: &str = "tz1SZZqtY8qkVVSLJJbtWud7yaNiwGbj4sRp";
const ACTIVATED_PKH: &str = "tz1ddb9NMYHZi5UzPdzTZMYQQZoMub195zgv";
const EVIDENCE_DELEGATE: &str = "tz1NortRftucvAkD1J58L32EhSVrQEWJCEnB";
const DECOY_DELEGATE: &str = "tz1hThMBD8jQjFt78heuCnKxJnJtQo9Ao25X";
const SRC: &str = "tz1KqTpEZ7Yob7QbPE4Hy4Wo8fHG8LhKxZSx";
const OTHER_SRC: &str = "tz1WCd2jm4uSt4vntk4vSuUWoZQGhLcDuR9q";
const DST_KT: &str = "KT1BUKeAvQ3pc5cjA9qCFxWE3zumh44kJPLt";
const OTHER_DST: &str = "tz1gjaF81ZRRvdzjobyfVNsAeSC6PScjfQwN";
const DELEGATE_TARGET: &str = "tz1aWXP237BLwNHJcCD4b3DutCevhqq2T1Z9";
const ORIGINATED: &str = "KT1GrStTuhgMMpzbNWKTt7NoXGrYiufrHDYq";

const CARTHAGE: &str = "PsCARTHAGazKbHtnKfLzQg3kms52kSRpgnDY982a9oYsSXRLQEb";
const BABYLON: &str = "PsBabyM1eUXZseaJdmXFApDSBqj8YBfwELoxZHHW77EMcAbbwAS";
const EDO: &str = "PtEdo2ZkT9oKpimTah6x2embF25oss54njMuPzkJTEi5RqfdZFA";

const OP_E1: &str = "ooYySZN8dfVMXtvVYCwBqMUoRXoEozRDAUUQ1KLsLVjD4kQZzTa";
const OP_E2: &str = "ooYySZN8dfVMXtvVYCwBqMUoRXoEozRDAUUQ1KLsLVjD4kQZzTb";
const OP_V1: &str = "ooYySZN8dfVMXtvVYCwBqMUoRXoEozRDAUUQ1KLsLVjD4kQZzTc";
const OP_V2: &str = "ooYySZN8dfVMXtvVYCwBqMUoRXoEozRDAUUQ1KLsLVjD4kQZzTd";
const OP_V3: &str = "ooYySZN8dfVMXtvVYCwBqMUoRXoEozRDAUUQ1KLsLVjD4kQZzTe";
const OP_A1: &str = "ooYySZN8dfVMXtvVYCwBqMUoRXoEozRDAUUQ1KLsLVjD4kQZzTf";
const OP_D1: &str = "ooYySZN8dfVMXtvVYCwBqMUoRXoEozRDAUUQ1KLsLVjD4kQZzTh";
const OP_D2: &str = "ooYySZN8dfVMXtvVYCwBqMUoRXoEozRDAUUQ1KLsLVjD4kQZzTi";
const OP_M1: &str = "ooYySZN8dfVMXtvVYCwBqMUoRXoEozRDAUUQ1KLsLVjD4kQZzTj";
const OP_M2: &str = "ooYySZN8dfVMXtvVYCwBqMUoRXoEozRDAUUQ1KLsLVjD4kQZzTk";

const BLOCK_HASH: &str = "BMTPqcZDUnCgEnBdLHTRMa5cgdTUZiyk2maP6bzy8ZkM9DWktCr";
const BRANCH: &str = "BLrLQXbvSwLtSMGvKxVvB21guzfZPvW8w2pRGMHW34SBLkF8ia1";

/// One block covering all four validation passes, shaped like a node
/// response, including one operation kind the gateway does not know about.
fn sample_block() -> Block {
  serde_json::from_value(json!({
    "protocol": CARTHAGE,
    "chain_id": "NetXdQprcVkpaWU",
    "hash": BLOCK_HASH,
    "header": {
      "level": 730000,
      "predecessor": BRANCH,
      "timestamp": "2020-01-14T18:29:16Z",
      "validation_pass": 4
    },
    "operations": [
      [
        {
          "hash": OP_E1,
          "branch": BRANCH,
          "signature": "sigUHx32f9wesZ1n2BWbixXdKnzSz2YgCkWoAuwEUyWXJdjrvjRiKo495GAvpF7h3mgzMmQqb7sfNVXWsLFTED226SNyGLbM",
          "contents": [
            {
              "kind": "endorsement",
              "level": 729999,
              "metadata": {
                "balance_updates": [],
                "delegate": BAKER_A,
                "slots": [4, 17]
              }
            }
          ]
        },
        {
          "hash": OP_E2,
          "branch": BRANCH,
          "contents": [
            {
              "kind": "endorsement",
              "level": 729999,
              "metadata": {
                "balance_updates": [],
                "delegate": BAKER_B,
                "slots": [9]
              }
            }
          ]
        }
      ],
      [
        {
          "hash": OP_V1,
          "branch": BRANCH,
          "contents": [
            {
              "kind": "ballot",
              "source": VOTER,
              "period": 17,
              "proposal": BABYLON,
              "ballot": "yay"
            }
          ]
        },
        {
          "hash": OP_V2,
          "branch": BRANCH,
          "contents": [
            {
              "kind": "proposals",
              "source": VOTER,
              "period": 17,
              "proposals": [CARTHAGE, BABYLON]
            }
          ]
        },
        {
          "hash": OP_V3,
          "branch": BRANCH,
          "contents": [
            {
              "kind": "seed_nonce_revelation",
              "level": 729856,
              "nonce": "a67cde"
            }
          ]
        }
      ],
      [
        {
          "hash": OP_A1,
          "branch": BRANCH,
          "contents": [
            {
              "kind": "activate_account",
              "pkh": ACTIVATED_PKH,
              "secret": "41f98b15efc63fa893d61d7d6eee4a2ce9427ac4"
            }
          ]
        },
        {
          "hash": OP_D1,
          "branch": BRANCH,
          "contents": [
            {
              "kind": "double_baking_evidence",
              "bh1": { "level": 729612, "predecessor": BRANCH },
              "bh2": { "level": 729612, "predecessor": BRANCH },
              "metadata": {
                "balance_updates": [
                  {
                    "kind": "freezer",
                    "category": "deposits",
                    "delegate": EVIDENCE_DELEGATE,
                    "cycle": 178,
                    "change": "-512000000"
                  },
                  {
                    "kind": "contract",
                    "delegate": DECOY_DELEGATE,
                    "change": "256000000"
                  }
                ]
              }
            }
          ]
        },
        {
          "hash": OP_D2,
          "branch": BRANCH,
          "contents": [
            {
              "kind": "double_endorsement_evidence",
              "op1": {
                "branch": BRANCH,
                "operations": { "kind": "endorsement", "level": 729610 }
              },
              "op2": {
                "branch": BRANCH,
                "operations": { "kind": "endorsement", "level": 729610 }
              },
              "metadata": {
                "balance_updates": [
                  {
                    "kind": "freezer",
                    "category": "deposits",
                    "delegate": EVIDENCE_DELEGATE,
                    "cycle": 178,
                    "change": "-64000000"
                  }
                ]
              }
            }
          ]
        }
      ],
      [
        {
          "hash": OP_M1,
          "branch": BRANCH,
          "contents": [
            {
              "kind": "transaction",
              "source": SRC,
              "fee": "1420",
              "counter": "300861",
              "gas_limit": "10307",
              "storage_limit": "0",
              "amount": "1000000",
              "destination": DST_KT,
              "metadata": {
                "balance_updates": [],
                "operation_result": { "status": "applied", "consumed_gas": "10207" }
              }
            },
            {
              "kind": "transaction",
              "source": SRC,
              "fee": "1420",
              "counter": "300862",
              "gas_limit": "10307",
              "storage_limit": "0",
              "amount": "2500000",
              "destination": OTHER_DST,
              "metadata": {
                "balance_updates": [],
                "operation_result": {
                  "status": "failed",
                  "errors": [
                    { "kind": "temporary", "id": "proto.006-PsCARTHA.contract.balance_too_low" }
                  ]
                }
              }
            },
            {
              "kind": "reveal",
              "source": SRC,
              "fee": "1269",
              "counter": "300860",
              "gas_limit": "10000",
              "storage_limit": "0",
              "public_key": "edpkuBknW28nW72KG6RoHtYW7p12T6GKc7nAbwYX5m8Wd9sDVC9yav",
              "metadata": {
                "balance_updates": [],
                "operation_result": { "status": "applied", "consumed_gas": "10000" }
              }
            }
          ]
        },
        {
          "hash": OP_M2,
          "branch": BRANCH,
          "contents": [
            {
              "kind": "transaction",
              "source": OTHER_SRC,
              "fee": "1500",
              "counter": "881430",
              "gas_limit": "10600",
              "storage_limit": "300",
              "amount": "750000",
              "destination": DST_KT,
              "metadata": {
                "balance_updates": [],
                "operation_result": { "status": "applied", "consumed_gas": "10507" }
              }
            },
            {
              "kind": "origination",
              "source": SRC,
              "fee": "2000",
              "counter": "300863",
              "gas_limit": "12000",
              "storage_limit": "600",
              "balance": "5000000",
              "delegate": DELEGATE_TARGET,
              "metadata": {
                "balance_updates": [],
                "operation_result": {
                  "status": "applied",
                  "originated_contracts": [ORIGINATED]
                }
              }
            },
            {
              "kind": "delegation",
              "source": SRC,
              "fee": "1300",
              "counter": "300864",
              "gas_limit": "10000",
              "storage_limit": "0",
              "delegate": DELEGATE_TARGET,
              "metadata": {
                "balance_updates": [],
                "operation_result": { "status": "applied" }
              }
            },
            {
              "kind": "endorsement_with_slot",
              "endorsement": { "branch": BRANCH },
              "slot": 3
            }
          ]
        }
      ]
    ]
  }))
  .expect("sample block fixture must deserialize")
}

#[test]
fn fixture_deserializes_and_tolerates_unknown_kinds() {
  let block = sample_block();
  assert_eq!(block.level(), 730000);
  let manager_bucket = &block.operations[3];
  assert_eq!(manager_bucket[1].contents.len(), 4);
  let unknown = &manager_bucket[1].contents[3];
  assert_eq!(*unknown, OperationContent::Unknown);
  assert_eq!(unknown.kind(), None);
}

#[test]
fn transactions_filter_never_leaks_other_kinds() {
  let block = sample_block();
  let items = transactions(&block, &TransactionFilter::default());
  assert_eq!(items.len(), 3);
  for item in &items {
    assert!(matches!(item.content, OperationContent::Transaction(_)));
  }
  // envelope order first, intra-envelope order second
  let hashes: Vec<&str> = items.iter().map(|i| i.envelope.hash.as_str()).collect();
  assert_eq!(hashes, vec![OP_M1, OP_M1, OP_M2]);
}

#[test]
fn extended_items_point_back_at_their_envelope() {
  let block = sample_block();
  for item in operations(&block, None) {
    let envelope = find_operation(&block, &item.envelope.hash)
      .expect("every back-reference must resolve to an envelope in the block");
    assert!(envelope.contents.contains(&item.content));
    assert_eq!(envelope.branch, item.envelope.branch);
  }
}

#[test]
fn destination_predicate_narrows_transactions() {
  let block = sample_block();
  let items = transactions(
    &block,
    &TransactionFilter {
      destination: Some(DST_KT.to_string()),
      ..Default::default()
    },
  );
  assert_eq!(items.len(), 2);
  let hashes: Vec<&str> = items.iter().map(|i| i.envelope.hash.as_str()).collect();
  assert_eq!(hashes, vec![OP_M1, OP_M2]);
}

#[test]
fn status_predicate_reads_the_operation_result() {
  let block = sample_block();
  let applied = transactions(
    &block,
    &TransactionFilter {
      status: Some(OperationResultStatus::Applied),
      ..Default::default()
    },
  );
  assert_eq!(applied.len(), 2);

  let failed = transactions(
    &block,
    &TransactionFilter {
      status: Some(OperationResultStatus::Failed),
      ..Default::default()
    },
  );
  assert_eq!(failed.len(), 1);
}

#[test]
fn predicates_combine_by_logical_and() {
  let block = sample_block();
  let items = transactions(
    &block,
    &TransactionFilter {
      source: Some(SRC.to_string()),
      status: Some(OperationResultStatus::Applied),
      ..Default::default()
    },
  );
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].envelope.hash, OP_M1);
}

#[test]
fn envelope_hash_restricts_any_kind_query() {
  let block = sample_block();
  let items = transactions(
    &block,
    &TransactionFilter {
      operation_hash: Some(OP_M1.to_string()),
      ..Default::default()
    },
  );
  assert_eq!(items.len(), 2);
  assert!(items.iter().all(|i| i.envelope.hash == OP_M1));
}

#[test]
fn endorsement_delegate_comes_from_result_metadata() {
  let block = sample_block();
  let items = endorsements(
    &block,
    &EndorsementFilter {
      delegate: Some(BAKER_A.to_string()),
      ..Default::default()
    },
  );
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].envelope.hash, OP_E1);

  assert_eq!(endorsements(&block, &EndorsementFilter::default()).len(), 2);
}

#[test]
fn ballot_predicates_match_source_proposal_and_vote() {
  let block = sample_block();
  let filter = BallotFilter {
    source: Some(VOTER.to_string()),
    proposal: Some(BABYLON.to_string()),
    ballot: Some(BallotVote::Yay),
    ..Default::default()
  };
  assert_eq!(ballots(&block, &filter).len(), 1);

  let wrong_vote = BallotFilter {
    ballot: Some(BallotVote::Nay),
    ..Default::default()
  };
  assert!(ballots(&block, &wrong_vote).is_empty());
}

#[test]
fn proposals_predicate_is_a_membership_test() {
  let block = sample_block();
  let member = ProposalsFilter {
    proposal: Some(CARTHAGE.to_string()),
    ..Default::default()
  };
  assert_eq!(proposals(&block, &member).len(), 1);

  let non_member = ProposalsFilter {
    proposal: Some(EDO.to_string()),
    ..Default::default()
  };
  assert!(proposals(&block, &non_member).is_empty());
}

#[test]
fn seed_nonce_revelations_support_envelope_hash_only() {
  let block = sample_block();
  assert_eq!(
    seed_nonce_revelations(&block, &SeedNonceRevelationFilter::default()).len(),
    1
  );
  let by_hash = SeedNonceRevelationFilter {
    operation_hash: Some(OP_V3.to_string()),
  };
  assert_eq!(seed_nonce_revelations(&block, &by_hash).len(), 1);
  let wrong_hash = SeedNonceRevelationFilter {
    operation_hash: Some(OP_V1.to_string()),
  };
  assert!(seed_nonce_revelations(&block, &wrong_hash).is_empty());
}

#[test]
fn activation_matches_on_pkh() {
  let block = sample_block();
  let hit = ActivateAccountFilter {
    pkh: Some(ACTIVATED_PKH.to_string()),
    ..Default::default()
  };
  assert_eq!(activations(&block, &hit).len(), 1);

  let miss = ActivateAccountFilter {
    pkh: Some(VOTER.to_string()),
    ..Default::default()
  };
  assert!(activations(&block, &miss).is_empty());
}

#[test]
fn evidence_delegate_reads_the_freezer_balance_update() {
  let block = sample_block();
  let hit = EvidenceFilter {
    delegate: Some(EVIDENCE_DELEGATE.to_string()),
    ..Default::default()
  };
  assert_eq!(double_baking_evidence(&block, &hit).len(), 1);
  assert_eq!(double_endorsement_evidence(&block, &hit).len(), 1);

  // the decoy delegate only appears in a contract-kind update
  let miss = EvidenceFilter {
    delegate: Some(DECOY_DELEGATE.to_string()),
    ..Default::default()
  };
  assert!(double_baking_evidence(&block, &miss).is_empty());
}

#[test]
fn reveal_and_delegation_filters_match_source_and_status() {
  let block = sample_block();
  let reveal_hits = reveals(
    &block,
    &RevealFilter {
      source: Some(SRC.to_string()),
      status: Some(OperationResultStatus::Applied),
      ..Default::default()
    },
  );
  assert_eq!(reveal_hits.len(), 1);

  let delegation_hits = delegations(
    &block,
    &DelegationFilter {
      delegate: Some(DELEGATE_TARGET.to_string()),
      status: Some(OperationResultStatus::Applied),
      ..Default::default()
    },
  );
  assert_eq!(delegation_hits.len(), 1);
}

#[test]
fn origination_matches_on_originated_contract_membership() {
  let block = sample_block();
  let hit = OriginationFilter {
    originated_contract: Some(ORIGINATED.to_string()),
    delegate: Some(DELEGATE_TARGET.to_string()),
    ..Default::default()
  };
  assert_eq!(originations(&block, &hit).len(), 1);

  let miss = OriginationFilter {
    originated_contract: Some(DST_KT.to_string()),
    ..Default::default()
  };
  assert!(originations(&block, &miss).is_empty());
}

#[test]
fn generic_accessor_returns_every_content_item_extended() {
  let block = sample_block();
  let all = operations(&block, None);
  assert_eq!(all.len(), 15);
  // the unknown kind is carried through untouched
  let unknown = all
    .iter()
    .filter(|i| i.content == OperationContent::Unknown)
    .count();
  assert_eq!(unknown, 1);

  let scoped = operations(&block, Some(OP_M2));
  assert_eq!(scoped.len(), 4);
  assert!(scoped.iter().all(|i| i.envelope.hash == OP_M2));
}

#[test]
fn unknown_kinds_never_classify() {
  let block = sample_block();
  for kind in [
    OperationKind::Endorsement,
    OperationKind::Transaction,
    OperationKind::Origination,
    OperationKind::Delegation,
    OperationKind::Reveal,
  ] {
    let bucket = &block.operations[tezgate::operations::filter::validation_pass(kind)];
    for item in extend_bucket(bucket) {
      if item.content == OperationContent::Unknown {
        assert_eq!(item.content.kind(), None);
      }
    }
  }
  // and no kind query ever returns it
  assert!(transactions(&block, &TransactionFilter::default())
    .iter()
    .all(|i| i.content != OperationContent::Unknown));
}

#[test]
fn extension_is_idempotent() {
  let block = sample_block();
  for bucket in &block.operations {
    let once = extend_bucket(bucket);
    let twice = extend_bucket(bucket);
    assert_eq!(once, twice);
    assert_eq!(
      serde_json::to_string(&once).expect("extended bucket serializes"),
      serde_json::to_string(&twice).expect("extended bucket serializes")
    );
  }
}

#[test]
fn find_operation_scans_all_passes_and_misses_softly() {
  let block = sample_block();
  let envelope = find_operation(&block, OP_A1).expect("activation envelope is in pass 2");
  assert_eq!(envelope.hash, OP_A1);

  let absent = "ooYySZN8dfVMXtvVYCwBqMUoRXoEozRDAUUQ1KLsLVjD4kQZzTz";
  assert!(find_operation(&block, absent).is_none());
}
