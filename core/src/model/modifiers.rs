use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The modifier bundle attached to an event. Every field is optional; no
/// keyword vocabulary is normative beyond the closed enums below (spec
/// section 3: "duck typing of modifiers becomes tagged variants").
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Modifiers {
    /// Temporal modifier bundle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporal: Option<TemporalModifier>,
    /// Spatial modifier bundle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spatial: Option<SpatialModifier>,
    /// Free-form manner description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manner: Option<String>,
    /// Free-form degree description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    /// Free-form purpose description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    /// Free-form condition description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    /// Certainty modifier bundle (feeds the confidence engine's E factor).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certainty: Option<CertaintyModifier>,
    /// Legal modifier bundle (feeds the confidence engine's N factor).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal: Option<LegalModifier>,
}

/// When/tense/duration/frequency/phase/sequence modifiers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemporalModifier {
    /// Free-form time reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,
    /// Grammatical tense, if meaningful to the caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tense: Option<String>,
    /// ISO-8601 duration string, e.g. `"P3D"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    /// Free-form recurrence description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    /// Free-form phase label, e.g. `"onset"`, `"conclusion"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    /// Ordering hint among sibling events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<i64>,
}

/// Location/region/scope/coordinates modifiers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpatialModifier {
    /// Free-form location label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Free-form region label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Free-form scope label, e.g. `"national"`, `"local"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// `(latitude, longitude)` pair.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<(f64, f64)>,
}

/// Evidence quality and reliability, feeding the confidence engine's E factor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertaintyModifier {
    /// Evidentiary class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Evidence>,
    /// Reliability rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reliability: Option<Reliability>,
}

/// Evidentiary class, used to look up the confidence engine's E factor
/// (section 4.3.1).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Evidence {
    /// Primary source, directly observed.
    Primary,
    /// Official source (government, institutional).
    Official,
    /// Independently confirmed.
    Confirmed,
    /// A secondary account of a primary source.
    Secondary,
    /// Reported by a credible outlet but not independently confirmed.
    Reported,
    /// Circulating but unconfirmed.
    Rumored,
    /// Speculative, no confirmed source.
    Speculated,
}

/// Reliability rating of the asserting source.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reliability {
    /// Low reliability.
    Low,
    /// Medium reliability.
    Medium,
    /// High reliability.
    High,
    /// Independently verified.
    Verified,
}

/// Jurisdiction/effective-date/sunset-date/norm-force/exception modifiers,
/// meaningful for `kind = norm` events.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegalModifier {
    /// Free-form jurisdiction label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
    /// When the norm takes effect.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(with = "time::serde::rfc3339::option")]
    pub effective_date: Option<OffsetDateTime>,
    /// When the norm ceases to apply.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(with = "time::serde::rfc3339::option")]
    pub sunset_date: Option<OffsetDateTime>,
    /// Deontic strength, feeding the confidence engine's N factor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub norm_force: Option<NormForce>,
    /// Free-form carve-out description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
}

/// Deontic strength of a legal clause (section 4.3.1's N factor).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormForce {
    /// Obligatory; scales confidence by 1.0.
    Mandatory,
    /// The fallback rule absent an explicit override; scales by 0.7.
    Default,
    /// Non-binding guidance; scales by 0.4.
    Advisory,
}
