use serde::Serialize;

use crate::node::model::{OperationContent, OperationEnvelope};

/// Non-owning back-reference from a content item to the envelope it was
/// extracted from.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct EnvelopeRef {
  pub hash: String,
  pub branch: String,
  pub signature: Option<String>,
}

impl EnvelopeRef {
  pub fn of(envelope: &OperationEnvelope) -> Self {
    Self {
      hash: envelope.hash.clone(),
      branch: envelope.branch.clone(),
      signature: envelope.signature.clone(),
    }
  }
}

/// A content item paired with its envelope back-reference, so filters can
/// match envelope-level fields while targeting the content item.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ExtendedContent {
  #[serde(flatten)]
  pub content: OperationContent,
  pub envelope: EnvelopeRef,
}

/// Pair every content item of one envelope with its back-reference,
/// preserving intra-envelope order.
pub fn extend_envelope(envelope: &OperationEnvelope) -> Vec<ExtendedContent> {
  let envelope_ref = EnvelopeRef::of(envelope);
  envelope
    .contents
    .iter()
    .map(|content| ExtendedContent {
      content: content.clone(),
      envelope: envelope_ref.clone(),
    })
    .collect()
}

/// Flatten one validation-pass bucket to extended content items, envelope
/// order first, intra-envelope order second. Extending the same bucket twice
/// yields identical output.
pub fn extend_bucket(bucket: &[OperationEnvelope]) -> Vec<ExtendedContent> {
  bucket.iter().flat_map(extend_envelope).collect()
}
