//! Compositional aggregation (section 4.3.3): combines already-resolved
//! component confidences into a parent's confidence. Resolving component
//! references themselves (latest vs. pinned, weak exclusion, depth, cycles)
//! is the event algebra's job — see `crate::algebra::resolve`; this module
//! only ever sees the flat slice of results that recursion produced.

use crate::confidence::{clamp01, AggregatorRegistry};
use crate::error::CoreError;
use crate::model::Aggregation;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One component's contribution to a parent's aggregation, already resolved
/// by the event algebra.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedComponent {
    pub confidence: f64,
    pub weak: bool,
    pub date_occurred: OffsetDateTime,
}

/// The aggregated value plus which components fed it and which were
/// excluded, for audit and UI use.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    pub value: f64,
    pub rule: Aggregation,
    pub included: usize,
    pub excluded_weak: usize,
    pub formula: String,
}

/// Aggregates `components` per `rule`. `custom_rule_id` is required and
/// looked up in `registry` when `rule == Custom`. An empty non-weak set
/// yields `0.0` (section 4.3.3: "no evidence means no confidence").
pub fn aggregate_composite(
    components: &[ResolvedComponent],
    rule: Aggregation,
    custom_rule_id: Option<&str>,
    registry: &AggregatorRegistry,
) -> Result<AggregationResult, CoreError> {
    let excluded_weak = components.iter().filter(|c| c.weak).count();
    let strong: Vec<&ResolvedComponent> = components.iter().filter(|c| !c.weak).collect();

    if strong.is_empty() {
        return Ok(AggregationResult {
            value: 0.0,
            rule,
            included: 0,
            excluded_weak,
            formula: "no non-weak components; confidence is 0".into(),
        });
    }

    let values: Vec<f64> = strong.iter().map(|c| c.confidence).collect();
    let joined = values.iter().map(|v| format!("{v:.3}")).collect::<Vec<_>>().join(", ");

    let (value, formula) = match rule {
        Aggregation::All => {
            let v = values.iter().cloned().fold(f64::INFINITY, f64::min);
            (v, format!("min({joined})"))
        }
        Aggregation::Any => {
            let v = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            (v, format!("max({joined})"))
        }
        Aggregation::Ordered => {
            let mut last: Option<OffsetDateTime> = None;
            for component in &strong {
                if let Some(prev) = last {
                    if component.date_occurred <= prev {
                        return Err(CoreError::InvalidStatement {
                            reason: format!(
                                "ORDERED aggregation requires strictly increasing dateOccurred; {:?} does not follow {prev:?}",
                                component.date_occurred
                            ),
                        });
                    }
                }
                last = Some(component.date_occurred);
            }
            let v = values.iter().cloned().fold(f64::INFINITY, f64::min);
            (v, format!("sequence({joined})"))
        }
        Aggregation::Custom => {
            let rule_id = custom_rule_id.ok_or_else(|| CoreError::AggregatorUnknown {
                rule_id: "<missing customRuleId>".into(),
            })?;
            let f = registry.get(rule_id).ok_or_else(|| CoreError::AggregatorUnknown {
                rule_id: rule_id.to_string(),
            })?;
            let v = f(&values);
            (v, format!("custom({rule_id})({joined})"))
        }
    };

    Ok(AggregationResult {
        value: clamp01(value),
        rule,
        included: strong.len(),
        excluded_weak,
        formula,
    })
}
