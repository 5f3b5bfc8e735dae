//! Legacy payload migration (section 6, "Legacy interfaces"): prior
//! `MacroEvent` JSON is rewritten in place into the current `Event` shape
//! before deserialization is attempted. Idempotent — migrating an
//! already-current payload is a no-op.
//!
//! Kept as a small registry of named rewrite functions rather than a single
//! hardcoded rewrite, the way `cambria::registry::Registry` keeps lens
//! packages addressable by name rather than inlining one fixed transform.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One legacy-shape rewrite: mutates a JSON object in place into the shape
/// the current model expects. Returns whether it changed anything.
pub type Migration = fn(&mut Map<String, Value>) -> bool;

/// Maps a legacy `@type` tag to the migration that understands it.
pub struct MigrationRegistry {
    migrations: BTreeMap<&'static str, Migration>,
}

impl Default for MigrationRegistry {
    fn default() -> Self {
        let mut registry = Self {
            migrations: BTreeMap::new(),
        };
        registry.register("MacroEvent", migrate_macro_event);
        registry
    }
}

impl MigrationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the migration for a legacy `@type` tag.
    pub fn register(&mut self, legacy_type: &'static str, migration: Migration) {
        self.migrations.insert(legacy_type, migration);
    }

    /// Applies the matching migration, if any, based on `payload`'s current
    /// `@type`. Returns whether anything changed.
    pub fn migrate(&self, payload: &mut Value) -> bool {
        let Some(object) = payload.as_object_mut() else {
            return false;
        };
        let Some(tag) = object.get("@type").and_then(Value::as_str) else {
            return false;
        };
        let Some(migration) = self.migrations.get(tag) else {
            return false;
        };
        migration(object)
    }
}

/// Rewrites a legacy `MacroEvent` payload into the current `Event` shape:
/// - `@type: "MacroEvent"` becomes `@type: "Event"`.
/// - `aggregationLogic` (`AND`/`OR`/`ORDERED_ALL`) becomes `aggregation`
///   (`ALL`/`ANY`/`ORDERED`).
/// - Bare-hash component entries (plain strings) are wrapped as
///   `{logicalId, version: "1.0"}`.
///
/// Idempotent: a payload already in the current shape has nothing for this
/// function to change, and it is only invoked when `@type == "MacroEvent"`
/// in the first place.
pub fn migrate_macro_event(object: &mut Map<String, Value>) -> bool {
    let mut changed = false;

    if object.get("@type").and_then(Value::as_str) == Some("MacroEvent") {
        object.insert("@type".to_string(), Value::String("Event".to_string()));
        changed = true;
    }

    if let Some(logic) = object.remove("aggregationLogic") {
        if let Some(logic) = logic.as_str() {
            let mapped = match logic {
                "AND" => "ALL",
                "OR" => "ANY",
                "ORDERED_ALL" => "ORDERED",
                other => other,
            };
            object.insert("aggregation".to_string(), Value::String(mapped.to_string()));
        }
        changed = true;
    }

    if let Some(Value::Array(components)) = object.get_mut("components") {
        for component in components.iter_mut() {
            if let Value::String(logical_id) = component {
                let wrapped = Value::Object(Map::from_iter([
                    ("logicalId".to_string(), Value::String(logical_id.clone())),
                    ("version".to_string(), Value::String("1.0".to_string())),
                ]));
                *component = wrapped;
                changed = true;
            }
        }
    }

    changed
}
