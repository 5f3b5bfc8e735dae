use crate::id::{ContentHash, LogicalId};
use crate::model::modifiers::Modifiers;
use crate::model::relationship::Relationship;
use crate::model::statement::Statement;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The atomic semantic unit: a fact (observed event) or a norm (deontic
/// clause). An event is *composite* iff `components` is non-empty, *leaf*
/// otherwise — leaf and composite share the same type; there is no separate
/// class (spec section 3).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Stable identifier grouping all versions of this event.
    pub logical_id: LogicalId,
    /// Free-form semantic version string.
    pub version: String,
    /// The content hash of the prior version, if this isn't the first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<ContentHash>,
    /// The commit that introduced this version.
    pub commit_hash: ContentHash,
    /// Human-readable title.
    pub title: String,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When the event is asserted to have occurred.
    #[serde(with = "time::serde::rfc3339")]
    pub date_occurred: OffsetDateTime,
    /// When the event was recorded in this store.
    #[serde(with = "time::serde::rfc3339")]
    pub date_recorded: OffsetDateTime,
    /// When this version was last modified, if different from `date_recorded`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(with = "time::serde::rfc3339::option")]
    pub date_modified: Option<OffsetDateTime>,
    /// Fact or norm. Defaults to `fact`.
    #[serde(default)]
    pub kind: EventKind,
    /// The proposition itself: an SVO triple or a logical composition.
    pub statement: Statement,
    /// Temporal/spatial/manner/... modifier bundle.
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Directed typed edges to other events.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,
    /// Component references; non-empty iff this event is composite.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentRef>,
    /// Aggregation rule; meaningful only when `components` is non-empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<Aggregation>,
    /// Identifies the pluggable aggregator when `aggregation = CUSTOM`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_rule_id: Option<String>,
    /// Overall span this event (typically composite) covers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline_span: Option<TimelineSpan>,
    /// Subjective importance, 1 (least) through 5 (most).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<u8>,
    /// Short human summary, distinct from `description`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Source/author/derived-confidence bundle.
    #[serde(default)]
    pub metadata: EventMetadata,
}

impl Event {
    /// An event is composite iff it carries at least one component
    /// reference; otherwise it is a leaf. There is no separate type for
    /// either case — this predicate is the single source of truth (the
    /// `@type: "Event"` discriminator some legacy payloads carry is
    /// redundant and untrusted; see `migrate`).
    pub fn is_composite(&self) -> bool {
        !self.components.is_empty()
    }

    /// The aggregation rule in effect, defaulting to `ALL` for composites
    /// that didn't specify one explicitly.
    pub fn aggregation_or_default(&self) -> Aggregation {
        self.aggregation.unwrap_or(Aggregation::All)
    }
}

/// Fact (observed event) or norm (deontic clause).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// An observed event.
    #[default]
    Fact,
    /// A deontic clause.
    Norm,
}

/// A reference to a component event. Absent `version` binds to the latest
/// visible version at resolution time. `weak: true` excludes the component
/// from confidence aggregation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRef {
    /// The logical id of the referenced event.
    pub logical_id: LogicalId,
    /// A pinned version, or `None` to track the latest.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Excludes this component from confidence aggregation when `true`.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub weak: bool,
}

impl ComponentRef {
    /// Pins to the latest version.
    pub fn latest(logical_id: LogicalId) -> Self {
        Self {
            logical_id,
            version: None,
            weak: false,
        }
    }
}

/// Rule combining component confidences. Meaningful only for composites.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Aggregation {
    /// Weakest link: `min` over non-weak components.
    #[default]
    All,
    /// Strongest evidence: `max` over non-weak components.
    Any,
    /// `min`, plus a strictly-increasing `dateOccurred` sequencing check.
    Ordered,
    /// Delegates to a registered aggregator named by `customRuleId`.
    Custom,
}

/// The overall span of time a (typically composite) event covers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSpan {
    /// Span start.
    #[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none", default)]
    pub start: Option<OffsetDateTime>,
    /// Span end.
    #[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none", default)]
    pub end: Option<OffsetDateTime>,
}

/// Source/author/derived-confidence bundle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventMetadata {
    /// Provenance of the underlying statement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    /// Free-form author identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Server-computed confidence fields. Clients may send these; the core
    /// always overwrites them and never trusts or hashes the input
    /// (invariant 5, section 3).
    #[serde(default)]
    pub derived: DerivedFields,
}

/// The source a fact or norm is attributed to.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Source {
    /// Source type for facts: `Academic`/`Government`/`NewsAgency`/`Corporate`/`Social`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    /// Source's legal hierarchy position for norms: `constitution`/`statute`/...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_type: Option<String>,
    /// Free-form name of the source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Optional locator for the source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Confidence, volatility, evidence/source scores, and cached depth: the
/// fields invariant 1 and invariant 5 (section 3) say are never hashed and
/// never accepted from clients. Always recomputed by the confidence engine
/// and the event algebra.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DerivedFields {
    /// The aggregated or leaf confidence in `[0, 1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// The volatility estimate in `[0, 1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volatility: Option<f64>,
    /// The resolved evidence factor E.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence_score: Option<f64>,
    /// The resolved source factor S.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_score: Option<f64>,
    /// The resolved legal hierarchy weight (norms only; aliases `sourceScore`'s role).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_hierarchy_weight: Option<f64>,
    /// The cached composite depth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_depth: Option<u32>,
}
