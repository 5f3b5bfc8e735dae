use crate::id::{ContentHash, LogicalId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A noun-like concept. Immutable once stored; editing an entity means
/// writing a new version with `previous_version` pointing at the old one.
///
/// Entities are opaque property bags distinguished by semantics, not by a
/// class hierarchy (spec non-goal: no rigid type system for entities).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Stable identifier grouping all versions of this entity.
    pub logical_id: LogicalId,
    /// Free-form semantic version string, e.g. `"1.0"` or `"2.3.1"`.
    pub version: String,
    /// The content hash of the prior version, if this isn't the first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<ContentHash>,
    /// The commit that introduced this version.
    pub commit_hash: ContentHash,
    /// Human-readable label.
    pub label: String,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional typing hint (observed, not enforced).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<String>,
    /// Opaque key/value property bag.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, serde_json::Value>,
    /// Alternate labels for the same entity.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// External identifier bag (ticker, LEI, ISIN, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub identifiers: BTreeMap<String, String>,
}
