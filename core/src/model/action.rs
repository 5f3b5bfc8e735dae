use crate::id::{ContentHash, LogicalId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A verb/predicate concept, analogous to [`crate::model::Entity`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// Stable identifier grouping all versions of this action.
    pub logical_id: LogicalId,
    /// Free-form semantic version string.
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
    /// Optional typing hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<String>,
    /// Free-form category string, e.g. `"financial"`, `"procedural"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Deontic modality, meaningful for actions used in norm events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modality: Option<Modality>,
    /// Free-form valency hint, e.g. `"transitive"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valency: Option<String>,
    /// Opaque key/value property bag.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, serde_json::Value>,
}

/// Deontic modality of an action, drawn from the closed set in section 3.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Modality {
    /// Obligatory.
    Shall,
    /// Permitted but not required.
    May,
    /// Forbidden.
    MustNot,
    /// Strict-liability obligation.
    LiableFor,
    /// Holds a right or entitlement.
    EntitledTo,
    /// Recommended but not mandatory.
    Should,
    /// Explicitly allowed.
    Permitted,
    /// Explicitly disallowed.
    Prohibited,
}
