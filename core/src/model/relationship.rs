use crate::id::ContentHash;
use serde::{Deserialize, Serialize};

/// A directed, typed edge from one event to another's content hash.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    /// The edge type.
    pub kind: RelationshipKind,
    /// The content hash of the related event.
    pub target: ContentHash,
    /// How strongly the relationship holds, in `[0, 1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<f64>,
    /// Confidence in the relationship itself, in `[0, 1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Relationship edge types, grouped causal / informational / structural /
/// legal per spec section 3.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipKind {
    // Causal
    /// This event was caused by the target.
    CausedBy,
    /// This event causes the target.
    Causes,
    /// This event enables the target.
    Enables,
    /// This event prevents the target.
    Prevents,
    /// This event threatens the target.
    Threatens,
    // Informational
    /// This event was derived from the target.
    DerivedFrom,
    /// This event supports the target.
    Supports,
    /// This event contradicts the target.
    Contradicts,
    /// This event updates the target.
    Updates,
    /// This event corrects the target.
    Corrects,
    /// This event clarifies the target.
    Clarifies,
    // Structural
    /// A loose thematic relation to the target.
    RelatedTo,
    /// This event is part of the target.
    PartOf,
    /// This event contains the target.
    Contains,
    /// This event precedes the target.
    Precedes,
    /// This event follows the target.
    Follows,
    // Legal
    /// This event amends the target.
    Amends,
    /// This event supersedes the target.
    Supersedes,
    /// This event refers to the target.
    RefersTo,
    /// This event is dependent on the target.
    DependentOn,
}
