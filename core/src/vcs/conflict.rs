use crate::id::LogicalId;
use crate::model::ObjectKind;
use serde::{Deserialize, Serialize};

/// A single three-way disagreement about the value of one property of one
/// logical object, surfaced by the per-kind detectors in `vcs::merge`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeConflict {
    /// Stable id for referencing this conflict in a resolution log entry.
    pub conflict_id: String,
    /// The kind of disagreement.
    pub kind: ConflictKind,
    /// The logical object the conflict concerns.
    pub logical_id: LogicalId,
    /// Which sub-store the object lives in.
    pub object_kind: ObjectKind,
    /// Dotted/bracketed property path, e.g. `properties.name`, `components[abc]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_path: Option<String>,
    /// The three-way values, as opaque JSON for uniform handling across kinds.
    pub base: Option<serde_json::Value>,
    pub ours: Option<serde_json::Value>,
    pub theirs: Option<serde_json::Value>,
    /// How serious the conflict is.
    pub severity: Severity,
    /// Whether a built-in strategy is expected to resolve this automatically.
    pub auto_resolvable: bool,
    /// The suggested way to resolve it, absent a stronger strategy opinion.
    pub suggested_resolution: SuggestedResolution,
    /// Human-readable explanation.
    pub description: String,
}

/// The category of a [`MergeConflict`], per section 4.5.5.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConflictKind {
    Content,
    Structural,
    Relationship,
    Statement,
    Metadata,
    Version,
    Component,
    Aggregation,
}

/// Conflict severity, coarsest-first.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// What a detector (or strategy) proposes doing about a conflict.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestedResolution {
    Ours,
    Theirs,
    Merge,
    Manual,
}

/// One entry in the audit trail for a resolved (or left-manual) conflict.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionLogEntry {
    /// The conflict this entry resolves.
    pub conflict_id: String,
    /// The side chosen, or `None` when `resolved_value` is a synthesized merge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chosen_side: Option<SuggestedResolution>,
    /// The value actually applied, when synthesized rather than a straight pick.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_value: Option<serde_json::Value>,
    /// Why this resolution was chosen.
    pub reasoning: String,
    /// The resolving strategy's confidence in this outcome.
    pub confidence: f64,
    /// How the resolution was reached.
    pub method: ResolutionMethod,
    /// When the resolution was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: time::OffsetDateTime,
}

/// How a conflict was resolved.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionMethod {
    Auto,
    Manual,
    AiAssisted,
}

/// The outcome of a merge attempt: either it advanced the target branch, or
/// it returned a full conflict report with nothing committed (section
/// 4.5.4 step 7-8; merges are never partial).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MergeOutcome {
    /// The target branch's head was a strict ancestor of the source; the
    /// pointer moved with no new commit.
    FastForward {
        /// The new head, equal to the source branch's head.
        new_head: crate::id::ContentHash,
    },
    /// The branches already pointed at compatible history.
    UpToDate,
    /// A merge commit was created and the target branch advanced.
    Merged {
        /// The new merge commit's hash.
        commit_hash: crate::id::ContentHash,
        /// Conflicts that were detected and auto-resolved along the way.
        resolved: Vec<ResolutionLogEntry>,
    },
    /// Unresolved conflicts remain; nothing was committed.
    Conflicted {
        /// The full conflict list.
        conflicts: Vec<MergeConflict>,
        /// Conflicts that a strategy did manage to auto-resolve.
        resolved: Vec<ResolutionLogEntry>,
    },
}
