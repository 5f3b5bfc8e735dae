//! C4 — the transparent confidence engine: leaf formula, volatility
//! estimation, compositional aggregation, and a commit-scoped cache.

mod aggregate;
mod cache;
mod leaf;
mod volatility;

pub use aggregate::{aggregate_composite, AggregationResult, ResolvedComponent};
pub use cache::{CacheKey, ConfidenceCache};
pub use leaf::{leaf_confidence, ConfidenceBreakdown};
pub use volatility::{volatility, ChangeRecord};

use serde::{Deserialize, Serialize};

/// Tunable knobs for the confidence engine; an Open Question in the
/// source material (the volatility divisor `K`) is resolved here as a
/// configuration field rather than a hardcoded constant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceConfig {
    /// Volatility normalizing divisor (section 4.3.2). Default `10.0`.
    pub volatility_k: f64,
    /// LRU ceiling for the confidence cache (section 4.3.4). Default `10_000`.
    pub cache_capacity: usize,
    /// The minimum |Δconfidence| the confidence-based merge strategy requires.
    pub confidence_delta_threshold: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            volatility_k: 10.0,
            cache_capacity: 10_000,
            confidence_delta_threshold: 0.1,
        }
    }
}

/// A registered pluggable aggregator for `Aggregation::Custom` events,
/// addressed by `customRuleId` (section 4.3.3). Registered functions must
/// be pure and must clamp their own output is not required — the caller
/// clamps to `[0,1]` regardless.
pub type CustomAggregatorFn = fn(&[f64]) -> f64;

/// An in-process registry of custom aggregators. Kept in-process and
/// code-defined rather than data-driven: the engine never evaluates
/// untrusted expressions (see `DESIGN.md`'s Open Question log).
#[derive(Default)]
pub struct AggregatorRegistry {
    aggregators: std::collections::HashMap<String, CustomAggregatorFn>,
}

impl AggregatorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an aggregator under `rule_id`, replacing any prior
    /// registration with the same id.
    pub fn register(&mut self, rule_id: impl Into<String>, f: CustomAggregatorFn) {
        self.aggregators.insert(rule_id.into(), f);
    }

    /// Looks up a registered aggregator.
    pub fn get(&self, rule_id: &str) -> Option<&CustomAggregatorFn> {
        self.aggregators.get(rule_id)
    }
}

impl std::fmt::Debug for AggregatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregatorRegistry")
            .field("rule_ids", &self.aggregators.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Clamps a raw confidence value into `[0, 1]`.
pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
