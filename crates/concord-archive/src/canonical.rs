//! Canonical JSON and content hashing
//!
//! Canonical form: object keys sorted lexicographically, no insignificant
//! whitespace. Hashes are lowercase hex SHA-256 of the canonical bytes.

use crate::Result;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Serialize `value` to canonical JSON bytes
///
/// # Examples
///
/// ```
/// use concord_archive::to_canonical_json;
/// use std::collections::HashMap;
///
/// let map = HashMap::from([("b", 1), ("a", 2)]);
/// assert_eq!(to_canonical_json(&map).unwrap(), br#"{"a":2,"b":1}"#);
/// ```
pub fn to_canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    // Value's object map is ordered by key
    let value = serde_json::to_value(value)?;
    Ok(serde_json::to_vec(&value)?)
}

/// Lowercase hex SHA-256 of `bytes`
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Canonical bytes of `value` together with their hash
pub fn canonical_hash<T: Serialize + ?Sized>(value: &T) -> Result<(Vec<u8>, String)> {
    let bytes = to_canonical_json(value)?;
    let hash = content_hash(&bytes);
    Ok((bytes, hash))
}
