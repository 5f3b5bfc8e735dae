//! Content hashes and logical identifiers.
//!
//! The two identifier flavors are kept as distinct newtypes on purpose: a
//! [`ContentHash`] names one immutable version of a payload, a [`LogicalId`]
//! names the logical object across all of its versions. Mixing them up is a
//! type error, not a runtime bug.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// `sha256:` + 64 lowercase hex digits, identifying one immutable version of
/// an object's payload.
#[derive(Clone, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentHash(String);

const PREFIX: &str = "sha256:";

impl ContentHash {
    /// Wraps an already-validated hash string. Prefer [`crate::hash::hash_value`]
    /// for computing new hashes; this is for round-tripping stored values.
    pub fn parse(value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into();
        if Self::is_valid(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::BadHash { value })
        }
    }

    /// Builds a `ContentHash` directly from 32 raw digest bytes.
    pub fn from_digest(digest: &[u8; 32]) -> Self {
        Self(format!("{PREFIX}{}", hex::encode(digest)))
    }

    fn is_valid(value: &str) -> bool {
        match value.strip_prefix(PREFIX) {
            Some(hex_part) => hex_part.len() == 64 && hex_part.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()),
            None => false,
        }
    }

    /// The raw string form, e.g. for use as a filename.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ContentHash {
    type Error = CoreError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.0
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0[..20.min(self.0.len())])
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContentHash {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.to_string())
    }
}

/// Opaque identifier grouping all versions of the same logical entity,
/// action, or event. Stable across edits.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogicalId(Uuid);

impl LogicalId {
    /// Mints a fresh logical id for a newly created logical object.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID, e.g. when round-tripping from storage.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }
}

impl Default for LogicalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LogicalId {
    type Err = uuid::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}
