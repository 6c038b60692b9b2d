//! Shape checks for the Base58Check-encoded identifiers accepted at the
//! query boundary. Prefix, length and alphabet only; the node remains the
//! authority on whether an identifier exists.

const BASE58_CHARS: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

fn is_base58(value: &str) -> bool {
  !value.is_empty() && value.chars().all(|c| BASE58_CHARS.contains(c))
}

fn has_prefix_and_length(value: &str, prefix: &str, length: usize) -> bool {
  value.starts_with(prefix) && value.len() == length
}

/// Address prefixed with tz1 (ed25519), tz2 (secp256k1), tz3 (p256) or KT1.
pub fn is_valid_address(value: &str) -> bool {
  let prefixed = has_prefix_and_length(value, "tz1", 36)
    || has_prefix_and_length(value, "KT1", 36)
    || has_prefix_and_length(value, "tz2", 36)
    || has_prefix_and_length(value, "tz3", 36);
  prefixed && is_base58(value)
}

/// Block identifier prefixed with B.
pub fn is_valid_block_hash(value: &str) -> bool {
  has_prefix_and_length(value, "B", 51) && is_base58(value)
}

/// Operation group identifier prefixed with o.
pub fn is_valid_operation_hash(value: &str) -> bool {
  has_prefix_and_length(value, "o", 51) && is_base58(value)
}

/// Protocol identifier prefixed with P.
pub fn is_valid_protocol_hash(value: &str) -> bool {
  has_prefix_and_length(value, "P", 51) && is_base58(value)
}
