//! Three-way merge (section 4.5.4): fast-forward detection, per-logicalId
//! classification, per-kind conflict detection (section 4.5.5), and
//! resolution via the strategy pipeline (section 4.5.6).

use crate::confidence;
use crate::error::{CoreError, CoreResult};
use crate::hash::{hash_commit, hash_tree};
use crate::id::{ContentHash, LogicalId};
use crate::model::{Action, ChangeSet, Commit, Entity, Event, ObjectKind, Tree};
use crate::store::{ObjectStore, RefStore};
use crate::vcs::conflict::{ConflictKind, MergeConflict, MergeOutcome, ResolutionLogEntry, Severity, SuggestedResolution};
use crate::vcs::merge_base::merge_base;
use crate::vcs::strategy::{resolve, ConflictResolutionBias, ResolutionStrategy, StrategyContext};
use std::collections::BTreeSet;
use time::OffsetDateTime;

/// How aggressively to resolve conflicts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MergeStrategy {
    /// Run the full pipeline; leave genuinely unresolvable conflicts manual.
    Auto,
    /// Like `Auto`, but unresolved conflicts default toward `ours`.
    Ours,
    /// Like `Auto`, but unresolved conflicts default toward `theirs`.
    Theirs,
    /// Detect conflicts but never auto-resolve; always returns `Conflicted`
    /// when any exist, even ones a strategy could otherwise close.
    Manual,
}

/// Merge options (section 4.5.4).
pub struct MergeOptions<'a> {
    pub strategy: MergeStrategy,
    pub author: &'a str,
    pub message: &'a str,
    pub pipeline: &'a [Box<dyn ResolutionStrategy>],
    pub confidence_config: &'a confidence::ConfidenceConfig,
}

/// Merges `source` into `target`, per the eight-step algorithm in section
/// 4.5.4. Never partially commits: either the target branch advances or
/// nothing changes and a structured [`MergeOutcome`] describes why.
pub fn three_way_merge(
    store: &dyn ObjectStore,
    refs: &dyn RefStore,
    source: &str,
    target: &str,
    options: &MergeOptions,
    now: OffsetDateTime,
) -> CoreResult<MergeOutcome> {
    let source_branch = refs.get_branch(source)?.ok_or_else(|| CoreError::BranchNotFound {
        name: source.to_string(),
    })?;
    let target_branch = refs.get_branch(target)?.ok_or_else(|| CoreError::BranchNotFound {
        name: target.to_string(),
    })?;

    let (ours, theirs) = match (&target_branch.head, &source_branch.head) {
        (Some(ours), Some(theirs)) => (ours.clone(), theirs.clone()),
        (None, Some(theirs)) => {
            // Target is unborn: fast-forward unconditionally.
            let mut branch = target_branch;
            branch.head = Some(theirs.clone());
            refs.put_branch(&branch)?;
            return Ok(MergeOutcome::FastForward { new_head: theirs.clone() });
        }
        (_, None) => return Ok(MergeOutcome::UpToDate),
    };

    if ours == theirs {
        return Ok(MergeOutcome::UpToDate);
    }

    let base = merge_base(store, &ours, &theirs)?;
    if base == theirs {
        return Ok(MergeOutcome::UpToDate);
    }
    if base == ours {
        let mut branch = target_branch;
        branch.head = Some(theirs.clone());
        refs.put_branch(&branch)?;
        return Ok(MergeOutcome::FastForward { new_head: theirs });
    }

    let base_commit = load_commit(store, &base)?;
    let ours_commit = load_commit(store, &ours)?;
    let theirs_commit = load_commit(store, &theirs)?;
    let base_tree = load_tree(store, &base_commit.tree_hash)?;
    let ours_tree = load_tree(store, &ours_commit.tree_hash)?;
    let theirs_tree = load_tree(store, &theirs_commit.tree_hash)?;

    let mut conflicts = Vec::new();
    let mut merged = Tree::empty();
    let mut changes = Vec::new();

    for kind in [ObjectKind::Entity, ObjectKind::Action, ObjectKind::Event] {
        merge_kind(
            store,
            kind,
            &base_tree,
            &ours_tree,
            &theirs_tree,
            &mut merged,
            &mut changes,
            &mut conflicts,
        )?;
    }

    let bias = match options.strategy {
        MergeStrategy::Ours => ConflictResolutionBias::Ours,
        MergeStrategy::Theirs => ConflictResolutionBias::Theirs,
        _ => ConflictResolutionBias::None,
    };

    let mut resolved_log = Vec::new();
    let mut unresolved = Vec::new();
    for pending in conflicts {
        let PendingConflict {
            conflict,
            ours_hash,
            theirs_hash,
        } = pending;
        let ctx = build_context(store, options.confidence_config, conflict.object_kind, &ours_hash, &theirs_hash)?;
        let bias_for_conflict = if matches!(options.strategy, MergeStrategy::Manual) {
            ConflictResolutionBias::None
        } else {
            bias
        };
        let entry = resolve(options.pipeline, &conflict, &ctx, bias_for_conflict, now);
        let resolved = entry.chosen_side.is_some() && !matches!(options.strategy, MergeStrategy::Manual);
        if resolved {
            apply_resolution(&mut merged, &conflict, &ours_hash, &theirs_hash, &entry);
            resolved_log.push(entry);
        } else {
            unresolved.push(conflict);
        }
    }

    if !unresolved.is_empty() {
        return Ok(MergeOutcome::Conflicted {
            conflicts: unresolved,
            resolved: resolved_log,
        });
    }

    let tree_hash = hash_tree(&merged);
    store.put_tree(&merged)?;

    let commit = Commit {
        parents: vec![ours.clone(), theirs.clone()],
        tree_hash,
        changes,
        message: options.message.to_string(),
        author: options.author.to_string(),
        branch: target.to_string(),
        timestamp: now,
        signature: None,
    };
    let commit_hash = hash_commit(&commit);
    store.put_commit(&commit)?;

    let mut branch = target_branch;
    branch.head = Some(commit_hash.clone());
    refs.put_branch(&branch)?;

    Ok(MergeOutcome::Merged {
        commit_hash,
        resolved: resolved_log,
    })
}

fn load_commit(store: &dyn ObjectStore, hash: &ContentHash) -> CoreResult<Commit> {
    store.get_commit(hash)?.ok_or_else(|| CoreError::NotFound {
        kind: ObjectKind::Commit,
        id: hash.to_string(),
    })
}

fn load_tree(store: &dyn ObjectStore, hash: &ContentHash) -> CoreResult<Tree> {
    store.get_tree(hash)?.ok_or_else(|| CoreError::NotFound {
        kind: ObjectKind::Tree,
        id: hash.to_string(),
    })
}

/// A detected conflict together with the full object hashes on each side,
/// needed by the strategy pipeline independent of which specific field the
/// conflict describes.
struct PendingConflict {
    conflict: MergeConflict,
    ours_hash: Option<ContentHash>,
    theirs_hash: Option<ContentHash>,
}

#[allow(clippy::too_many_arguments)]
fn merge_kind(
    store: &dyn ObjectStore,
    kind: ObjectKind,
    base_tree: &Tree,
    ours_tree: &Tree,
    theirs_tree: &Tree,
    merged: &mut Tree,
    changes: &mut Vec<ChangeSet>,
    conflicts: &mut Vec<PendingConflict>,
) -> CoreResult<()> {
    let base_map = base_tree.map_for(kind).expect("entity/action/event kinds have maps");
    let ours_map = ours_tree.map_for(kind).expect("entity/action/event kinds have maps");
    let theirs_map = theirs_tree.map_for(kind).expect("entity/action/event kinds have maps");

    let mut logical_ids: BTreeSet<LogicalId> = BTreeSet::new();
    logical_ids.extend(base_map.keys());
    logical_ids.extend(ours_map.keys());
    logical_ids.extend(theirs_map.keys());

    for logical_id in logical_ids {
        let base = base_map.get(&logical_id).cloned();
        let ours = ours_map.get(&logical_id).cloned();
        let theirs = theirs_map.get(&logical_id).cloned();

        let resolution = match (&ours, &theirs) {
            (a, b) if a == b => Some(a.clone()),
            (a, _) if *a == base => Some(theirs.clone()),
            (_, b) if *b == base => Some(ours.clone()),
            _ => None,
        };

        if let Some(hash) = resolution {
            *merged.map_for_mut(kind).expect("map exists") = {
                let mut map = merged.map_for(kind).expect("map exists").clone();
                match &hash {
                    Some(h) => {
                        map.insert(logical_id, h.clone());
                    }
                    None => {
                        map.remove(&logical_id);
                    }
                }
                map
            };
            if hash != base {
                changes.push(ChangeSet {
                    kind,
                    logical_id,
                    new_hash: hash,
                    old_hash: base,
                });
            }
            continue;
        }

        let detected = detect_conflict(store, kind, logical_id, base, ours.clone(), theirs.clone())?;
        conflicts.push(PendingConflict {
            conflict: detected,
            ours_hash: ours,
            theirs_hash: theirs,
        });
    }

    Ok(())
}

fn detect_conflict(
    store: &dyn ObjectStore,
    kind: ObjectKind,
    logical_id: LogicalId,
    base: Option<ContentHash>,
    ours: Option<ContentHash>,
    theirs: Option<ContentHash>,
) -> CoreResult<MergeConflict> {
    match kind {
        ObjectKind::Entity => detect_entity_conflict(store, logical_id, base, ours, theirs),
        ObjectKind::Action => detect_action_conflict(store, logical_id, base, ours, theirs),
        ObjectKind::Event => detect_event_conflict(store, logical_id, base, ours, theirs),
        ObjectKind::Commit | ObjectKind::Tree => unreachable!("commits/trees aren't tree-tracked"),
    }
}

fn conflict_id(logical_id: LogicalId, suffix: &str) -> String {
    format!("{logical_id}/{suffix}")
}

fn detect_entity_conflict(
    store: &dyn ObjectStore,
    logical_id: LogicalId,
    base: Option<ContentHash>,
    ours: Option<ContentHash>,
    theirs: Option<ContentHash>,
) -> CoreResult<MergeConflict> {
    let base_e = load_opt_entity(store, &base)?;
    let ours_e = load_opt_entity(store, &ours)?;
    let theirs_e = load_opt_entity(store, &theirs)?;

    if ours_e.as_ref().map(|e| &e.type_hint) != theirs_e.as_ref().map(|e| &e.type_hint) {
        return Ok(MergeConflict {
            conflict_id: conflict_id(logical_id, "dataType"),
            kind: ConflictKind::Structural,
            logical_id,
            object_kind: ObjectKind::Entity,
            property_path: Some("typeHint".to_string()),
            base: base_e.as_ref().and_then(|e| e.type_hint.clone()).map(Into::into),
            ours: ours_e.as_ref().and_then(|e| e.type_hint.clone()).map(Into::into),
            theirs: theirs_e.as_ref().and_then(|e| e.type_hint.clone()).map(Into::into),
            severity: Severity::Critical,
            auto_resolvable: false,
            suggested_resolution: SuggestedResolution::Manual,
            description: "entity type hint differs between branches".to_string(),
        });
    }

    if ours_e.as_ref().map(|e| &e.label) != theirs_e.as_ref().map(|e| &e.label) {
        return Ok(MergeConflict {
            conflict_id: conflict_id(logical_id, "label"),
            kind: ConflictKind::Content,
            logical_id,
            object_kind: ObjectKind::Entity,
            property_path: Some("label".to_string()),
            base: base_e.as_ref().map(|e| e.label.clone().into()),
            ours: ours_e.as_ref().map(|e| e.label.clone().into()),
            theirs: theirs_e.as_ref().map(|e| e.label.clone().into()),
            severity: Severity::Medium,
            auto_resolvable: false,
            suggested_resolution: SuggestedResolution::Manual,
            description: "entity label differs between branches".to_string(),
        });
    }

    if ours_e.as_ref().and_then(|e| e.description.clone()) != theirs_e.as_ref().and_then(|e| e.description.clone()) {
        return Ok(MergeConflict {
            conflict_id: conflict_id(logical_id, "description"),
            kind: ConflictKind::Content,
            logical_id,
            object_kind: ObjectKind::Entity,
            property_path: Some("description".to_string()),
            base: base_e.as_ref().and_then(|e| e.description.clone()).map(Into::into),
            ours: ours_e.as_ref().and_then(|e| e.description.clone()).map(Into::into),
            theirs: theirs_e.as_ref().and_then(|e| e.description.clone()).map(Into::into),
            severity: Severity::Low,
            auto_resolvable: true,
            suggested_resolution: SuggestedResolution::Merge,
            description: "entity description differs between branches".to_string(),
        });
    }

    for key in property_keys(&ours_e, &theirs_e) {
        let ov = ours_e.as_ref().and_then(|e| e.properties.get(&key)).cloned();
        let tv = theirs_e.as_ref().and_then(|e| e.properties.get(&key)).cloned();
        if ov != tv {
            let bv = base_e.as_ref().and_then(|e| e.properties.get(&key)).cloned();
            return Ok(MergeConflict {
                conflict_id: conflict_id(logical_id, &format!("properties.{key}")),
                kind: ConflictKind::Content,
                logical_id,
                object_kind: ObjectKind::Entity,
                property_path: Some(format!("properties.{key}")),
                base: bv,
                ours: ov,
                theirs: tv,
                severity: Severity::Medium,
                auto_resolvable: false,
                suggested_resolution: SuggestedResolution::Manual,
                description: format!("entity property '{key}' differs between branches"),
            });
        }
    }

    Ok(fallback_conflict(logical_id, ObjectKind::Entity, base, ours, theirs))
}

fn property_keys(a: &Option<Entity>, b: &Option<Entity>) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();
    if let Some(a) = a {
        keys.extend(a.properties.keys().cloned());
    }
    if let Some(b) = b {
        keys.extend(b.properties.keys().cloned());
    }
    keys
}

fn detect_action_conflict(
    store: &dyn ObjectStore,
    logical_id: LogicalId,
    base: Option<ContentHash>,
    ours: Option<ContentHash>,
    theirs: Option<ContentHash>,
) -> CoreResult<MergeConflict> {
    let base_a = load_opt_action(store, &base)?;
    let ours_a = load_opt_action(store, &ours)?;
    let theirs_a = load_opt_action(store, &theirs)?;

    let deontic_differs = ours_a.as_ref().map(|a| a.modality) != theirs_a.as_ref().map(|a| a.modality);
    let valency_differs = ours_a.as_ref().map(|a| &a.valency) != theirs_a.as_ref().map(|a| &a.valency);
    if deontic_differs || valency_differs {
        return Ok(MergeConflict {
            conflict_id: conflict_id(logical_id, "modality"),
            kind: ConflictKind::Structural,
            logical_id,
            object_kind: ObjectKind::Action,
            property_path: Some(if deontic_differs { "modality".to_string() } else { "valency".to_string() }),
            base: base_a.as_ref().and_then(|a| a.modality).map(|m| serde_json::to_value(m).unwrap()),
            ours: ours_a.as_ref().and_then(|a| a.modality).map(|m| serde_json::to_value(m).unwrap()),
            theirs: theirs_a.as_ref().and_then(|a| a.modality).map(|m| serde_json::to_value(m).unwrap()),
            severity: Severity::High,
            auto_resolvable: false,
            suggested_resolution: SuggestedResolution::Manual,
            description: "action deontic modality or valency differs between branches".to_string(),
        });
    }

    Ok(fallback_conflict(logical_id, ObjectKind::Action, base, ours, theirs))
}

fn detect_event_conflict(
    store: &dyn ObjectStore,
    logical_id: LogicalId,
    base: Option<ContentHash>,
    ours: Option<ContentHash>,
    theirs: Option<ContentHash>,
) -> CoreResult<MergeConflict> {
    let base_e = load_opt_event(store, &base)?;
    let ours_e = load_opt_event(store, &ours)?;
    let theirs_e = load_opt_event(store, &theirs)?;

    let ours_composite = ours_e.as_ref().map(|e| e.is_composite());
    let theirs_composite = theirs_e.as_ref().map(|e| e.is_composite());
    if ours_composite != theirs_composite {
        return Ok(MergeConflict {
            conflict_id: conflict_id(logical_id, "structure"),
            kind: ConflictKind::Structural,
            logical_id,
            object_kind: ObjectKind::Event,
            property_path: Some("components".to_string()),
            base: None,
            ours: ours_composite.map(Into::into),
            theirs: theirs_composite.map(Into::into),
            severity: Severity::Critical,
            auto_resolvable: false,
            suggested_resolution: SuggestedResolution::Manual,
            description: "one side is a leaf event, the other composite".to_string(),
        });
    }

    if ours_composite == Some(false) {
        if ours_e.as_ref().map(|e| &e.statement) != theirs_e.as_ref().map(|e| &e.statement) {
            return Ok(MergeConflict {
                conflict_id: conflict_id(logical_id, "statement"),
                kind: ConflictKind::Statement,
                logical_id,
                object_kind: ObjectKind::Event,
                property_path: Some("statement".to_string()),
                base: base_e.as_ref().map(|e| serde_json::to_value(&e.statement).unwrap()),
                ours: ours_e.as_ref().map(|e| serde_json::to_value(&e.statement).unwrap()),
                theirs: theirs_e.as_ref().map(|e| serde_json::to_value(&e.statement).unwrap()),
                severity: Severity::Critical,
                auto_resolvable: false,
                suggested_resolution: SuggestedResolution::Manual,
                description: "leaf event statement differs between branches".to_string(),
            });
        }
    } else if ours_e.as_ref().map(|e| e.aggregation_or_default()) != theirs_e.as_ref().map(|e| e.aggregation_or_default()) {
        return Ok(MergeConflict {
            conflict_id: conflict_id(logical_id, "aggregation"),
            kind: ConflictKind::Aggregation,
            logical_id,
            object_kind: ObjectKind::Event,
            property_path: Some("aggregation".to_string()),
            base: base_e.as_ref().map(|e| serde_json::to_value(e.aggregation_or_default()).unwrap()),
            ours: ours_e.as_ref().map(|e| serde_json::to_value(e.aggregation_or_default()).unwrap()),
            theirs: theirs_e.as_ref().map(|e| serde_json::to_value(e.aggregation_or_default()).unwrap()),
            severity: Severity::Critical,
            auto_resolvable: false,
            suggested_resolution: SuggestedResolution::Manual,
            description: "composite aggregation rule differs between branches".to_string(),
        });
    }

    if ours_e.as_ref().map(|e| &e.custom_rule_id) != theirs_e.as_ref().map(|e| &e.custom_rule_id) {
        return Ok(MergeConflict {
            conflict_id: conflict_id(logical_id, "customRuleId"),
            kind: ConflictKind::Aggregation,
            logical_id,
            object_kind: ObjectKind::Event,
            property_path: Some("customRuleId".to_string()),
            base: base_e.as_ref().and_then(|e| e.custom_rule_id.clone()).map(Into::into),
            ours: ours_e.as_ref().and_then(|e| e.custom_rule_id.clone()).map(Into::into),
            theirs: theirs_e.as_ref().and_then(|e| e.custom_rule_id.clone()).map(Into::into),
            severity: Severity::High,
            auto_resolvable: false,
            suggested_resolution: SuggestedResolution::Manual,
            description: "custom aggregator rule id differs between branches".to_string(),
        });
    }

    if ours_e.as_ref().map(|e| &e.title) != theirs_e.as_ref().map(|e| &e.title) {
        return Ok(MergeConflict {
            conflict_id: conflict_id(logical_id, "title"),
            kind: ConflictKind::Content,
            logical_id,
            object_kind: ObjectKind::Event,
            property_path: Some("title".to_string()),
            base: base_e.as_ref().map(|e| e.title.clone().into()),
            ours: ours_e.as_ref().map(|e| e.title.clone().into()),
            theirs: theirs_e.as_ref().map(|e| e.title.clone().into()),
            severity: Severity::Medium,
            auto_resolvable: false,
            suggested_resolution: SuggestedResolution::Manual,
            description: "event title differs between branches".to_string(),
        });
    }

    if ours_e.as_ref().map(|e| &e.relationships) != theirs_e.as_ref().map(|e| &e.relationships) {
        return Ok(MergeConflict {
            conflict_id: conflict_id(logical_id, "relationships"),
            kind: ConflictKind::Relationship,
            logical_id,
            object_kind: ObjectKind::Event,
            property_path: Some("relationships".to_string()),
            base: base_e.as_ref().map(|e| serde_json::to_value(&e.relationships).unwrap()),
            ours: ours_e.as_ref().map(|e| serde_json::to_value(&e.relationships).unwrap()),
            theirs: theirs_e.as_ref().map(|e| serde_json::to_value(&e.relationships).unwrap()),
            severity: Severity::Medium,
            auto_resolvable: true,
            suggested_resolution: SuggestedResolution::Merge,
            description: "relationship sets differ between branches; auto-mergeable by union".to_string(),
        });
    }

    if ours_e.as_ref().map(|e| &e.timeline_span) != theirs_e.as_ref().map(|e| &e.timeline_span) {
        return Ok(MergeConflict {
            conflict_id: conflict_id(logical_id, "timelineSpan"),
            kind: ConflictKind::Metadata,
            logical_id,
            object_kind: ObjectKind::Event,
            property_path: Some("timelineSpan".to_string()),
            base: base_e.as_ref().and_then(|e| e.timeline_span.clone()).map(|s| serde_json::to_value(s).unwrap()),
            ours: ours_e.as_ref().and_then(|e| e.timeline_span.clone()).map(|s| serde_json::to_value(s).unwrap()),
            theirs: theirs_e.as_ref().and_then(|e| e.timeline_span.clone()).map(|s| serde_json::to_value(s).unwrap()),
            severity: Severity::Medium,
            auto_resolvable: true,
            suggested_resolution: SuggestedResolution::Merge,
            description: "timeline spans differ between branches; auto-mergeable by union of bounds".to_string(),
        });
    }

    if ours_e.as_ref().and_then(|e| e.importance) != theirs_e.as_ref().and_then(|e| e.importance) {
        return Ok(MergeConflict {
            conflict_id: conflict_id(logical_id, "importance"),
            kind: ConflictKind::Metadata,
            logical_id,
            object_kind: ObjectKind::Event,
            property_path: Some("importance".to_string()),
            base: base_e.as_ref().and_then(|e| e.importance).map(Into::into),
            ours: ours_e.as_ref().and_then(|e| e.importance).map(Into::into),
            theirs: theirs_e.as_ref().and_then(|e| e.importance).map(Into::into),
            severity: Severity::Low,
            auto_resolvable: true,
            suggested_resolution: SuggestedResolution::Merge,
            description: "importance differs between branches; auto-resolved to the higher value".to_string(),
        });
    }

    if ours_e.as_ref().map(|e| &e.components) != theirs_e.as_ref().map(|e| &e.components) {
        return Ok(MergeConflict {
            conflict_id: conflict_id(logical_id, "components"),
            kind: ConflictKind::Component,
            logical_id,
            object_kind: ObjectKind::Event,
            property_path: Some("components".to_string()),
            base: base_e.as_ref().map(|e| serde_json::to_value(&e.components).unwrap()),
            ours: ours_e.as_ref().map(|e| serde_json::to_value(e.components.first()).unwrap()),
            theirs: theirs_e.as_ref().map(|e| serde_json::to_value(e.components.first()).unwrap()),
            severity: Severity::Medium,
            auto_resolvable: false,
            suggested_resolution: SuggestedResolution::Manual,
            description: "component reference sets differ between branches".to_string(),
        });
    }

    Ok(fallback_conflict(logical_id, ObjectKind::Event, base, ours, theirs))
}

fn fallback_conflict(
    logical_id: LogicalId,
    object_kind: ObjectKind,
    base: Option<ContentHash>,
    ours: Option<ContentHash>,
    theirs: Option<ContentHash>,
) -> MergeConflict {
    MergeConflict {
        conflict_id: conflict_id(logical_id, "hash"),
        kind: ConflictKind::Version,
        logical_id,
        object_kind,
        property_path: None,
        base: base.map(|h| h.to_string().into()),
        ours: ours.map(|h| h.to_string().into()),
        theirs: theirs.map(|h| h.to_string().into()),
        severity: Severity::Medium,
        auto_resolvable: false,
        suggested_resolution: SuggestedResolution::Manual,
        description: "payloads differ but no field-level difference was detected".to_string(),
    }
}

fn load_opt_entity(store: &dyn ObjectStore, hash: &Option<ContentHash>) -> CoreResult<Option<Entity>> {
    match hash {
        Some(h) => store.get_entity(h),
        None => Ok(None),
    }
}

fn load_opt_action(store: &dyn ObjectStore, hash: &Option<ContentHash>) -> CoreResult<Option<Action>> {
    match hash {
        Some(h) => store.get_action(h),
        None => Ok(None),
    }
}

fn load_opt_event(store: &dyn ObjectStore, hash: &Option<ContentHash>) -> CoreResult<Option<Event>> {
    match hash {
        Some(h) => store.get_event(h),
        None => Ok(None),
    }
}

fn build_context(
    store: &dyn ObjectStore,
    confidence_config: &confidence::ConfidenceConfig,
    object_kind: ObjectKind,
    ours_hash: &Option<ContentHash>,
    theirs_hash: &Option<ContentHash>,
) -> CoreResult<StrategyContext> {
    if object_kind != ObjectKind::Event {
        return Ok(StrategyContext::default());
    }
    let ours_event = match ours_hash {
        Some(h) => store.get_event(h)?,
        None => None,
    };
    let theirs_event = match theirs_hash {
        Some(h) => store.get_event(h)?,
        None => None,
    };

    let ours_confidence = ours_event
        .as_ref()
        .filter(|e| !e.is_composite())
        .map(|e| confidence::leaf_confidence(e, &[], confidence_config).value);
    let theirs_confidence = theirs_event
        .as_ref()
        .filter(|e| !e.is_composite())
        .map(|e| confidence::leaf_confidence(e, &[], confidence_config).value);

    Ok(StrategyContext {
        ours_confidence,
        theirs_confidence,
        ours_legal_type: ours_event.as_ref().and_then(|e| e.metadata.source.as_ref()).and_then(|s| s.legal_type.clone()),
        theirs_legal_type: theirs_event.as_ref().and_then(|e| e.metadata.source.as_ref()).and_then(|s| s.legal_type.clone()),
        ours_modified: ours_event.as_ref().and_then(|e| e.date_modified),
        theirs_modified: theirs_event.as_ref().and_then(|e| e.date_modified),
    })
}

fn apply_resolution(
    merged: &mut Tree,
    conflict: &MergeConflict,
    ours_hash: &Option<ContentHash>,
    theirs_hash: &Option<ContentHash>,
    entry: &ResolutionLogEntry,
) {
    let Some(side) = entry.chosen_side else { return };
    let hash = match side {
        SuggestedResolution::Ours => ours_hash.clone(),
        SuggestedResolution::Theirs => theirs_hash.clone(),
        _ => None,
    };
    if let Some(map) = merged.map_for_mut(conflict.object_kind) {
        match hash {
            Some(hash) => {
                map.insert(conflict.logical_id, hash);
            }
            None => {
                map.remove(&conflict.logical_id);
            }
        }
    }
}
