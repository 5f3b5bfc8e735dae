//! Resolution strategies (section 4.5.6): a priority-ordered pipeline
//! consulted per conflict. The first strategy whose confidence meets its
//! own threshold wins; `manual` is always available as the terminal
//! fallback.

use crate::vcs::conflict::{MergeConflict, ResolutionLogEntry, ResolutionMethod, SuggestedResolution};
use time::OffsetDateTime;

/// Side-channel facts a strategy may need beyond what's already on the
/// [`MergeConflict`] itself (computed confidence, legal rank, edit times).
/// Populated by the caller (`vcs::merge`) per conflict, since computing
/// these facts requires resolving full event payloads the conflict
/// detector already had in hand.
#[derive(Clone, Debug, Default)]
pub struct StrategyContext {
    pub ours_confidence: Option<f64>,
    pub theirs_confidence: Option<f64>,
    pub ours_legal_type: Option<String>,
    pub theirs_legal_type: Option<String>,
    pub ours_modified: Option<OffsetDateTime>,
    pub theirs_modified: Option<OffsetDateTime>,
}

/// A pluggable conflict-resolution decision procedure.
pub trait ResolutionStrategy: Send + Sync {
    /// Stable name, used in the resolution log's `method`/`reasoning` text.
    fn name(&self) -> &str;
    /// Higher runs first.
    fn priority(&self) -> u8;
    /// The confidence below which this strategy's opinion is discarded.
    fn threshold(&self) -> f64;
    /// Proposes a resolution, or `None` if this strategy has no opinion.
    fn propose(&self, conflict: &MergeConflict, ctx: &StrategyContext) -> Option<(SuggestedResolution, f64, String)>;
}

/// Legal-hierarchy rank, highest first; normalizing divisor for confidence
/// (section 4.3.1's legal hierarchy weight table, reused here as a rank
/// order rather than a confidence weight).
fn legal_rank(legal_type: &str) -> Option<u8> {
    match legal_type {
        "constitution" => Some(6),
        "statute" => Some(5),
        "regulation" => Some(4),
        "case-law" => Some(3),
        "contract" => Some(2),
        "policy" => Some(1),
        _ => None,
    }
}

/// Priority 90: prefers the side whose `legalType` outranks the other.
pub struct LegalHierarchy;

impl ResolutionStrategy for LegalHierarchy {
    fn name(&self) -> &str {
        "legal-hierarchy"
    }
    fn priority(&self) -> u8 {
        90
    }
    fn threshold(&self) -> f64 {
        0.0
    }
    fn propose(&self, _conflict: &MergeConflict, ctx: &StrategyContext) -> Option<(SuggestedResolution, f64, String)> {
        let ours = legal_rank(ctx.ours_legal_type.as_deref()?)?;
        let theirs = legal_rank(ctx.theirs_legal_type.as_deref()?)?;
        if ours == theirs {
            return None;
        }
        let confidence = (ours.abs_diff(theirs)) as f64 / 6.0;
        let (side, winner, loser) = if ours > theirs {
            (SuggestedResolution::Ours, "ours", "theirs")
        } else {
            (SuggestedResolution::Theirs, "theirs", "ours")
        };
        Some((
            side,
            confidence,
            format!("{winner} outranks {loser} in the legal hierarchy"),
        ))
    }
}

/// Priority 85: component-version conflicts, resolved per section 4.5.5's
/// own policy (latest beats pinned; higher semantic version beats lower).
/// This strategy only fires for [`crate::vcs::conflict::ConflictKind::Component`]
/// conflicts whose `ours`/`theirs` values are reduced to a `version`
/// string (or `null`) by the detector.
pub struct ComponentVersion;

impl ResolutionStrategy for ComponentVersion {
    fn name(&self) -> &str {
        "component-version"
    }
    fn priority(&self) -> u8 {
        85
    }
    fn threshold(&self) -> f64 {
        0.0
    }
    fn propose(&self, conflict: &MergeConflict, _ctx: &StrategyContext) -> Option<(SuggestedResolution, f64, String)> {
        if conflict.kind != crate::vcs::conflict::ConflictKind::Component {
            return None;
        }
        let ours = conflict.ours.as_ref()?;
        let theirs = conflict.theirs.as_ref()?;
        let ours_version = ours.get("version").and_then(|v| v.as_str());
        let theirs_version = theirs.get("version").and_then(|v| v.as_str());
        match (ours_version, theirs_version) {
            (None, Some(_)) => Some((
                SuggestedResolution::Ours,
                0.85,
                "ours tracks latest, theirs pins a version".to_string(),
            )),
            (Some(_), None) => Some((
                SuggestedResolution::Theirs,
                0.85,
                "theirs tracks latest, ours pins a version".to_string(),
            )),
            (Some(a), Some(b)) if a != b => {
                let side = if semver_gt(a, b) {
                    SuggestedResolution::Ours
                } else if semver_gt(b, a) {
                    SuggestedResolution::Theirs
                } else {
                    return None;
                };
                Some((side, 0.8, format!("comparing pinned versions {a} and {b}")))
            }
            _ => None,
        }
    }
}

/// Dotted numeric comparison; non-numeric segments compare as strings.
fn semver_gt(a: &str, b: &str) -> bool {
    let pa = a.split('.');
    let pb = b.split('.');
    for (x, y) in pa.zip(pb) {
        let (x, y) = (x.parse::<u64>(), y.parse::<u64>());
        match (x, y) {
            (Ok(x), Ok(y)) if x != y => return x > y,
            (Ok(_), Ok(_)) => continue,
            _ if x.is_ok() != y.is_ok() => return x.is_ok(),
            _ => continue,
        }
    }
    a.len() > b.len()
}

/// Priority 80: prefers the side with higher computed confidence when the
/// gap is at least 0.1.
pub struct ConfidenceBased;

impl ResolutionStrategy for ConfidenceBased {
    fn name(&self) -> &str {
        "confidence-based"
    }
    fn priority(&self) -> u8 {
        80
    }
    fn threshold(&self) -> f64 {
        0.0
    }
    fn propose(&self, _conflict: &MergeConflict, ctx: &StrategyContext) -> Option<(SuggestedResolution, f64, String)> {
        let ours = ctx.ours_confidence?;
        let theirs = ctx.theirs_confidence?;
        let delta = ours - theirs;
        if delta.abs() < 0.1 {
            return None;
        }
        let side = if delta > 0.0 {
            SuggestedResolution::Ours
        } else {
            SuggestedResolution::Theirs
        };
        Some((
            side,
            delta.abs(),
            format!("confidence gap {:.3} favors {:?}", delta.abs(), side),
        ))
    }
}

/// Priority 70: for string fields, takes the longer text or the union of
/// non-overlapping additions over the base.
pub struct SemanticTextMerge;

impl ResolutionStrategy for SemanticTextMerge {
    fn name(&self) -> &str {
        "semantic-text-merge"
    }
    fn priority(&self) -> u8 {
        70
    }
    fn threshold(&self) -> f64 {
        0.0
    }
    fn propose(&self, conflict: &MergeConflict, _ctx: &StrategyContext) -> Option<(SuggestedResolution, f64, String)> {
        let is_text_field = matches!(conflict.property_path.as_deref(), Some("title") | Some("description") | Some("label"));
        if !is_text_field {
            return None;
        }
        let ours = conflict.ours.as_ref()?.as_str()?;
        let theirs = conflict.theirs.as_ref()?.as_str()?;
        if ours.len() == theirs.len() {
            return None;
        }
        let side = if ours.len() > theirs.len() {
            SuggestedResolution::Ours
        } else {
            SuggestedResolution::Theirs
        };
        Some((side, 0.7, "took the longer of the two texts".to_string()))
    }
}

/// Priority 60: prefers the more recently modified side if the gap exceeds
/// one hour.
pub struct TemporalPrecedence;

impl ResolutionStrategy for TemporalPrecedence {
    fn name(&self) -> &str {
        "temporal-precedence"
    }
    fn priority(&self) -> u8 {
        60
    }
    fn threshold(&self) -> f64 {
        0.0
    }
    fn propose(&self, _conflict: &MergeConflict, ctx: &StrategyContext) -> Option<(SuggestedResolution, f64, String)> {
        let ours = ctx.ours_modified?;
        let theirs = ctx.theirs_modified?;
        let gap = ours - theirs;
        if gap.abs() <= time::Duration::hours(1) {
            return None;
        }
        let side = if gap > time::Duration::ZERO {
            SuggestedResolution::Ours
        } else {
            SuggestedResolution::Theirs
        };
        Some((side, 0.6, "newer side wins on dateModified".to_string()))
    }
}

/// Bias applied when the pipeline would otherwise fall through to
/// `manual`: the `ours`/`theirs` strategy names from the source material
/// are, per the merge algorithm's actual shape, a default bias rather than
/// full strategies of their own (see `DESIGN.md`'s Open Question log).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConflictResolutionBias {
    /// No bias: unresolved conflicts stay manual.
    None,
    /// Resolve ties toward `ours`.
    Ours,
    /// Resolve ties toward `theirs`.
    Theirs,
}

/// The built-in pipeline, highest priority first.
pub fn default_pipeline() -> Vec<Box<dyn ResolutionStrategy>> {
    vec![
        Box::new(LegalHierarchy),
        Box::new(ComponentVersion),
        Box::new(ConfidenceBased),
        Box::new(SemanticTextMerge),
        Box::new(TemporalPrecedence),
    ]
}

/// Runs `conflict` through `pipeline` in priority order, returning the
/// first strategy's proposal that meets its own threshold. Falls back to
/// `bias` and finally to a manual entry.
pub fn resolve(
    pipeline: &[Box<dyn ResolutionStrategy>],
    conflict: &MergeConflict,
    ctx: &StrategyContext,
    bias: ConflictResolutionBias,
    now: OffsetDateTime,
) -> ResolutionLogEntry {
    let mut ordered: Vec<&Box<dyn ResolutionStrategy>> = pipeline.iter().collect();
    ordered.sort_by(|a, b| b.priority().cmp(&a.priority()));

    for strategy in ordered {
        if let Some((side, confidence, reasoning)) = strategy.propose(conflict, ctx) {
            if confidence >= strategy.threshold() {
                return ResolutionLogEntry {
                    conflict_id: conflict.conflict_id.clone(),
                    chosen_side: Some(side),
                    resolved_value: Some(match side {
                        SuggestedResolution::Ours => conflict.ours.clone(),
                        SuggestedResolution::Theirs => conflict.theirs.clone(),
                        _ => None,
                    }.unwrap_or(serde_json::Value::Null)),
                    reasoning: format!("[{}] {reasoning}", strategy.name()),
                    confidence,
                    method: ResolutionMethod::Auto,
                    timestamp: now,
                };
            }
        }
    }

    match bias {
        ConflictResolutionBias::Ours | ConflictResolutionBias::Theirs if conflict.auto_resolvable => {
            let side = if bias == ConflictResolutionBias::Ours {
                SuggestedResolution::Ours
            } else {
                SuggestedResolution::Theirs
            };
            let value = match side {
                SuggestedResolution::Ours => conflict.ours.clone(),
                _ => conflict.theirs.clone(),
            };
            ResolutionLogEntry {
                conflict_id: conflict.conflict_id.clone(),
                chosen_side: Some(side),
                resolved_value: Some(value.unwrap_or(serde_json::Value::Null)),
                reasoning: format!("no strategy matched; applying {side:?} bias"),
                confidence: 0.5,
                method: ResolutionMethod::Auto,
                timestamp: now,
            }
        }
        _ => ResolutionLogEntry {
            conflict_id: conflict.conflict_id.clone(),
            chosen_side: None,
            resolved_value: None,
            reasoning: "no strategy resolved this conflict".to_string(),
            confidence: 0.0,
            method: ResolutionMethod::Manual,
            timestamp: now,
        },
    }
}
