//! Universal invariants from the testable-properties catalog, run as
//! proptest suites rather than fixed examples: hashing, the confidence
//! formula, and compositional aggregation, each over randomized inputs.

mod common;

use common::MemStore;
use proptest::prelude::*;
use time::macros::datetime;
use time::OffsetDateTime;
use veritaschain_core::confidence::{
    aggregate_composite, leaf_confidence, AggregatorRegistry, ChangeRecord, ConfidenceConfig, ResolvedComponent,
};
use veritaschain_core::hash::{hash_entity, hash_event};
use veritaschain_core::id::{ContentHash, LogicalId};
use veritaschain_core::model::{
    Aggregation, CertaintyModifier, Entity, Evidence, EventKind, LegalModifier, Modifiers, NormForce, Operator,
    Source, Statement,
};
use veritaschain_core::store::ObjectStore;

fn arb_evidence() -> impl Strategy<Value = Evidence> {
    prop_oneof![
        Just(Evidence::Primary),
        Just(Evidence::Official),
        Just(Evidence::Confirmed),
        Just(Evidence::Secondary),
        Just(Evidence::Reported),
        Just(Evidence::Rumored),
        Just(Evidence::Speculated),
    ]
}

fn arb_norm_force() -> impl Strategy<Value = NormForce> {
    prop_oneof![Just(NormForce::Mandatory), Just(NormForce::Default), Just(NormForce::Advisory)]
}

fn arb_fact_source_type() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Academic".to_string()),
        Just("Government".to_string()),
        Just("NewsAgency".to_string()),
        Just("Corporate".to_string()),
        Just("Social".to_string()),
    ]
}

fn arb_legal_type() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("constitution".to_string()),
        Just("statute".to_string()),
        Just("regulation".to_string()),
        Just("case-law".to_string()),
        Just("contract".to_string()),
        Just("policy".to_string()),
    ]
}

fn leaf_event(kind: EventKind, evidence: Evidence, fact_source: String, legal_type: String, norm_force: NormForce) -> veritaschain_core::model::Event {
    veritaschain_core::model::Event {
        logical_id: LogicalId::new(),
        version: "1.0".into(),
        previous_version: None,
        commit_hash: ContentHash::from_digest(&[0u8; 32]),
        title: "t".into(),
        description: None,
        date_occurred: OffsetDateTime::UNIX_EPOCH,
        date_recorded: OffsetDateTime::UNIX_EPOCH,
        date_modified: None,
        kind,
        statement: Statement::LogicalClause {
            operator: Operator::Not,
            operands: vec![],
            variable: None,
            domain: None,
        },
        modifiers: Modifiers {
            certainty: Some(CertaintyModifier { evidence: Some(evidence), reliability: None }),
            legal: Some(LegalModifier { norm_force: Some(norm_force), ..Default::default() }),
            ..Default::default()
        },
        relationships: vec![],
        components: vec![],
        aggregation: None,
        custom_rule_id: None,
        timeline_span: None,
        importance: None,
        summary: None,
        metadata: veritaschain_core::model::EventMetadata {
            source: Some(Source { r#type: Some(fact_source), legal_type: Some(legal_type), ..Default::default() }),
            author: None,
            derived: Default::default(),
        },
    }
}

fn arb_change_history() -> impl Strategy<Value = Vec<ChangeRecord>> {
    prop::collection::vec(0i64..365, 0..20).prop_map(|days| {
        days.into_iter()
            .map(|d| ChangeRecord {
                timestamp: OffsetDateTime::UNIX_EPOCH + time::Duration::days(d),
                commit_id: format!("c{d}"),
                change_type: "update".to_string(),
                changed_fields: vec![],
                author: "a".to_string(),
            })
            .collect()
    })
}

proptest! {
    /// *Confidence clamping.* Every leaf confidence value lands in `[0, 1]`
    /// regardless of evidence class, source type, legal type, norm force,
    /// or change history shape.
    #[test]
    fn leaf_confidence_is_always_clamped(
        evidence in arb_evidence(),
        fact_source in arb_fact_source_type(),
        legal_type in arb_legal_type(),
        norm_force in arb_norm_force(),
        is_norm in any::<bool>(),
        history in arb_change_history(),
    ) {
        let kind = if is_norm { EventKind::Norm } else { EventKind::Fact };
        let event = leaf_event(kind, evidence, fact_source, legal_type, norm_force);
        let breakdown = leaf_confidence(&event, &history, &ConfidenceConfig::default());
        prop_assert!(breakdown.value >= 0.0 && breakdown.value <= 1.0);
    }

    /// *Leaf-formula determinism.* Holding inputs fixed, recomputing the
    /// same event's confidence twice yields the bit-exact same value.
    #[test]
    fn leaf_confidence_is_deterministic(
        evidence in arb_evidence(),
        fact_source in arb_fact_source_type(),
        legal_type in arb_legal_type(),
        norm_force in arb_norm_force(),
        history in arb_change_history(),
    ) {
        let event = leaf_event(EventKind::Fact, evidence, fact_source, legal_type, norm_force);
        let config = ConfidenceConfig::default();
        let a = leaf_confidence(&event, &history, &config);
        let b = leaf_confidence(&event, &history, &config);
        prop_assert_eq!(a.value.to_bits(), b.value.to_bits());
    }

    /// *Composite monotonicity — ALL/ANY.* `ALL` never exceeds the weakest
    /// non-weak component; `ANY` never falls below the strongest.
    #[test]
    fn composite_monotonicity_all_and_any(
        confidences in prop::collection::vec(0.0f64..=1.0, 1..8),
    ) {
        let registry = AggregatorRegistry::new();
        let components: Vec<ResolvedComponent> = confidences
            .iter()
            .enumerate()
            .map(|(i, &c)| ResolvedComponent {
                confidence: c,
                weak: false,
                date_occurred: datetime!(2024-01-01 00:00 UTC) + time::Duration::days(i as i64),
            })
            .collect();

        let min = confidences.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = confidences.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        let all_result = aggregate_composite(&components, Aggregation::All, None, &registry).unwrap();
        let any_result = aggregate_composite(&components, Aggregation::Any, None, &registry).unwrap();

        prop_assert!(all_result.value <= min + 1e-9);
        prop_assert!(any_result.value >= max - 1e-9);
    }

    /// Aggregation is always clamped to `[0, 1]` even when fed confidences
    /// at the boundary.
    #[test]
    fn aggregate_composite_is_always_clamped(
        confidences in prop::collection::vec(0.0f64..=1.0, 1..8),
        weak_flags in prop::collection::vec(any::<bool>(), 1..8),
    ) {
        let registry = AggregatorRegistry::new();
        let n = confidences.len().min(weak_flags.len());
        let components: Vec<ResolvedComponent> = (0..n)
            .map(|i| ResolvedComponent {
                confidence: confidences[i],
                weak: weak_flags[i],
                date_occurred: datetime!(2024-01-01 00:00 UTC) + time::Duration::days(i as i64),
            })
            .collect();
        let result = aggregate_composite(&components, Aggregation::All, None, &registry).unwrap();
        prop_assert!(result.value >= 0.0 && result.value <= 1.0);
    }

    /// *Store round-trip.* Any entity persisted through `ObjectStore` is
    /// returned unchanged by the hash it was stored under.
    #[test]
    fn entity_store_round_trip(label in "[a-zA-Z0-9 ]{1,40}") {
        let store = MemStore::default();
        let entity = Entity {
            logical_id: LogicalId::new(),
            version: "1.0".into(),
            previous_version: None,
            commit_hash: ContentHash::from_digest(&[0u8; 32]),
            label: label.clone(),
            description: None,
            type_hint: None,
            properties: Default::default(),
            aliases: vec![],
            identifiers: Default::default(),
        };
        let hash = store.put_entity(&entity).unwrap();
        prop_assert_eq!(hash.clone(), hash_entity(&entity));
        let fetched = store.get_entity(&hash).unwrap().unwrap();
        prop_assert_eq!(fetched, entity);
    }

    /// *Hash totality.* Key order and incidental whitespace never change a
    /// payload's hash; two entities differing only in field insertion
    /// order (same values) hash identically because canonicalization goes
    /// through `serde_json::Value`, not the struct's declaration order.
    #[test]
    fn permuting_json_object_keys_does_not_change_the_hash(
        a in 0i64..1000, b in 0i64..1000, c in 0i64..1000,
    ) {
        let first = serde_json::json!({"a": a, "b": b, "c": c});
        let second = serde_json::json!({"c": c, "b": b, "a": a});
        prop_assert_eq!(veritaschain_core::hash::hash_value(&first), veritaschain_core::hash::hash_value(&second));
    }

    /// Derived fields never affect an event's hash (invariant 1, section 3):
    /// the engine always recomputes them and they're excluded from hashing.
    #[test]
    fn event_derived_fields_do_not_affect_the_hash(
        confidence in 0.0f64..=1.0,
    ) {
        let mut event = leaf_event(EventKind::Fact, Evidence::Reported, "NewsAgency".into(), "statute".into(), NormForce::Default);
        let base_hash = hash_event(&event);
        event.metadata.derived.confidence = Some(confidence);
        event.metadata.derived.cached_depth = Some(3);
        prop_assert_eq!(hash_event(&event), base_hash);
    }
}
