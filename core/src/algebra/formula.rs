//! Formula derivation (section 4.4.3): a side-effect-free textual rendering
//! of an event's aggregation tree, leaves as three-decimal confidences.

use crate::algebra::resolve::{resolve_component, AlgebraConfig};
use crate::confidence::{leaf_confidence, AggregatorRegistry, ChangeRecord, ConfidenceConfig};
use crate::error::CoreResult;
use crate::model::{Aggregation, Event};
use crate::store::{ObjectStore, TreeIndex};

/// Renders `event`'s aggregation tree as text. Weak components are omitted,
/// matching what the confidence engine itself excludes from aggregation.
pub fn render_formula(
    store: &dyn ObjectStore,
    tree: &dyn TreeIndex,
    event: &Event,
    confidence_config: &ConfidenceConfig,
    algebra_config: &AlgebraConfig,
    registry: &AggregatorRegistry,
) -> CoreResult<String> {
    render_inner(store, tree, event, confidence_config, algebra_config, registry, 0)
}

fn render_inner(
    store: &dyn ObjectStore,
    tree: &dyn TreeIndex,
    event: &Event,
    confidence_config: &ConfidenceConfig,
    algebra_config: &AlgebraConfig,
    registry: &AggregatorRegistry,
    depth: usize,
) -> CoreResult<String> {
    if depth > algebra_config.max_depth {
        return Err(crate::error::CoreError::DepthExceeded {
            limit: algebra_config.max_depth,
        });
    }

    if !event.is_composite() {
        let breakdown = leaf_confidence(event, &[] as &[ChangeRecord], confidence_config);
        return Ok(format!("{:.3}", breakdown.value));
    }

    let mut rendered = Vec::new();
    for component in &event.components {
        if component.weak {
            continue;
        }
        let child = resolve_component(store, tree, component)?;
        rendered.push(render_inner(store, tree, &child, confidence_config, algebra_config, registry, depth + 1)?);
    }

    let joined = rendered.join(", ");
    Ok(match event.aggregation_or_default() {
        Aggregation::All => format!("min({joined})"),
        Aggregation::Any => format!("max({joined})"),
        Aggregation::Ordered => format!("sequence({})", rendered.join(" \u{2192} ")),
        Aggregation::Custom => {
            let rule_id = event.custom_rule_id.as_deref().unwrap_or("?");
            format!("custom({rule_id})({joined})")
        }
    })
}
