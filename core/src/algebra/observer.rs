//! Pattern observation (section 4.4.5): a passive [`VisitHooks`] implementer
//! that records SVO label triples, relationship type usage, inferred
//! entity/action type hints, and composite aggregation shapes as a
//! traversal runs. Purely additive — it never validates or rejects
//! anything it sees, only counts it.

use crate::algebra::visitor::VisitHooks;
use crate::id::LogicalId;
use crate::model::{Action, Aggregation, Entity, Event, Operator, RelationshipKind};
use parking_lot::Mutex;
use std::collections::HashMap;
use time::OffsetDateTime;

/// How often a pattern was seen, and when it was first and most recently
/// seen, with one representative sample for later inspection.
#[derive(Clone, Debug, PartialEq)]
pub struct Occurrence {
    pub count: u64,
    pub first_seen: OffsetDateTime,
    pub last_seen: OffsetDateTime,
    pub sample_id: LogicalId,
}

impl Occurrence {
    fn new(seen_at: OffsetDateTime, sample_id: LogicalId) -> Self {
        Self {
            count: 1,
            first_seen: seen_at,
            last_seen: seen_at,
            sample_id,
        }
    }

    fn bump(&mut self, seen_at: OffsetDateTime) {
        self.count += 1;
        if seen_at < self.first_seen {
            self.first_seen = seen_at;
        }
        if seen_at > self.last_seen {
            self.last_seen = seen_at;
        }
    }
}

fn record(table: &mut HashMap<String, Occurrence>, key: String, seen_at: OffsetDateTime, sample_id: LogicalId) {
    table
        .entry(key)
        .and_modify(|o| o.bump(seen_at))
        .or_insert_with(|| Occurrence::new(seen_at, sample_id));
}

#[derive(Default)]
struct ObserverState {
    svo_triples: HashMap<String, Occurrence>,
    relationship_kinds: HashMap<String, Occurrence>,
    entity_type_hints: HashMap<String, Occurrence>,
    action_type_hints: HashMap<String, Occurrence>,
    aggregation_shapes: HashMap<String, Occurrence>,
}

/// Accumulates the patterns a traversal observes, behind a single lock so
/// its hooks can be invoked from a parallel traversal (`TraversalConfig {
/// parallel: true, .. }`) without each caller synchronizing access itself.
#[derive(Default)]
pub struct PatternObserver {
    state: Mutex<ObserverState>,
}

impl PatternObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// SVO label triples, keyed `"subject -> verb -> object"`.
    pub fn svo_triples(&self) -> HashMap<String, Occurrence> {
        self.state.lock().svo_triples.clone()
    }

    /// Relationship kinds observed across every composite event visited.
    pub fn relationship_kinds(&self) -> HashMap<String, Occurrence> {
        self.state.lock().relationship_kinds.clone()
    }

    /// Entity `type_hint` values observed, keyed by the hint string
    /// (entities with no hint are not recorded).
    pub fn entity_type_hints(&self) -> HashMap<String, Occurrence> {
        self.state.lock().entity_type_hints.clone()
    }

    /// Action `type_hint` values observed, keyed by the hint string.
    pub fn action_type_hints(&self) -> HashMap<String, Occurrence> {
        self.state.lock().action_type_hints.clone()
    }

    /// Composite aggregation shapes, keyed by a rendering of the rule
    /// (`"ALL"`, `"ANY"`, `"ORDERED"`, or `"CUSTOM(rule_id)"`).
    pub fn aggregation_shapes(&self) -> HashMap<String, Occurrence> {
        self.state.lock().aggregation_shapes.clone()
    }
}

fn relationship_key(kind: RelationshipKind) -> String {
    format!("{kind:?}")
}

fn aggregation_key(event: &Event) -> String {
    match event.aggregation_or_default() {
        Aggregation::All => "ALL".to_string(),
        Aggregation::Any => "ANY".to_string(),
        Aggregation::Ordered => "ORDERED".to_string(),
        Aggregation::Custom => format!("CUSTOM({})", event.custom_rule_id.as_deref().unwrap_or("?")),
    }
}

impl VisitHooks for PatternObserver {
    fn on_entity(&self, owner: &Event, entity: &Entity, _depth: usize) {
        let Some(hint) = entity.type_hint.as_deref() else {
            return;
        };
        let mut state = self.state.lock();
        record(&mut state.entity_type_hints, hint.to_string(), owner.date_recorded, entity.logical_id);
    }

    fn on_action(&self, owner: &Event, action: &Action, _depth: usize) {
        let Some(hint) = action.type_hint.as_deref() else {
            return;
        };
        let mut state = self.state.lock();
        record(&mut state.action_type_hints, hint.to_string(), owner.date_recorded, action.logical_id);
    }

    fn on_svo(&self, owner: &Event, subject: &Entity, verb: &Action, object: &Entity, _depth: usize) {
        let key = format!("{} -> {} -> {}", subject.label, verb.label, object.label);
        let mut state = self.state.lock();
        record(&mut state.svo_triples, key, owner.date_recorded, owner.logical_id);
    }

    fn on_clause(&self, _owner: &Event, _operator: Operator, _depth: usize) {}

    fn on_leaf_event(&self, event: &Event, _depth: usize) {
        let mut state = self.state.lock();
        for relationship in &event.relationships {
            record(
                &mut state.relationship_kinds,
                relationship_key(relationship.kind),
                event.date_recorded,
                event.logical_id,
            );
        }
    }

    fn on_composite_event(&self, event: &Event, _depth: usize) {
        let shape = aggregation_key(event);
        let mut state = self.state.lock();
        record(&mut state.aggregation_shapes, shape, event.date_recorded, event.logical_id);
        for relationship in &event.relationships {
            record(
                &mut state.relationship_kinds,
                relationship_key(relationship.kind),
                event.date_recorded,
                event.logical_id,
            );
        }
    }
}
