//! C1 — deterministic canonical serialization and SHA-256 hashing.
//!
//! Canonicalization rides on `serde_json::Map`'s default (non-`preserve_order`)
//! backing of a `BTreeMap`: serializing any `Value` built through `serde_json`
//! already emits object keys in lexicographic order at every depth, which is
//! the bulk of what section 4.1 asks for. The rest — omitting derived fields
//! and the `@id` envelope before hashing — is the caller's job via
//! `hash_entity`/`hash_action`/`hash_event`/`hash_commit`/`hash_tree` below,
//! each of which projects to the hashable subset before serializing.

use crate::id::ContentHash;
use crate::model::{Action, Commit, Entity, Event, Tree};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Canonical bytes for an arbitrary serializable payload: stable key order,
/// stable number formatting, UTF-8. Two payloads that differ only in key
/// order or whitespace hash identically.
pub fn canonical_bytes<T: Serialize>(payload: &T) -> Vec<u8> {
    let value = serde_json::to_value(payload).expect("object model types always serialize");
    serde_json::to_vec(&value).expect("serde_json::Value always serializes")
}

/// `sha256:` + 64 hex of the canonical bytes of an arbitrary payload.
pub fn hash_value<T: Serialize>(payload: &T) -> ContentHash {
    let bytes = canonical_bytes(payload);
    let digest = Sha256::digest(&bytes);
    ContentHash::from_digest(digest.as_slice().try_into().expect("sha256 is 32 bytes"))
}

/// Hashes an [`Entity`]. Entities carry no derived fields, so this is a
/// direct projection.
pub fn hash_entity(entity: &Entity) -> ContentHash {
    hash_value(entity)
}

/// Hashes an [`Action`]. Actions carry no derived fields either.
pub fn hash_action(action: &Action) -> ContentHash {
    hash_value(action)
}

/// Hashes an [`Event`], after zeroing the `metadata.derived` bundle —
/// confidence, volatility, evidence/source scores, and cached depth never
/// participate in the hash (invariant 1, section 3).
pub fn hash_event(event: &Event) -> ContentHash {
    let mut projected = event.clone();
    projected.metadata.derived = Default::default();
    hash_value(&projected)
}

/// Hashes a [`Commit`].
pub fn hash_commit(commit: &Commit) -> ContentHash {
    hash_value(commit)
}

/// Hashes a [`Tree`].
pub fn hash_tree(tree: &Tree) -> ContentHash {
    hash_value(tree)
}
