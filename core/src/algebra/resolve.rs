//! Component resolution and depth computation (sections 4.4.1, 4.4.2).

use crate::error::{CoreError, CoreResult};
use crate::id::LogicalId;
use crate::model::{ComponentRef, Event, ObjectKind};
use crate::store::{ObjectStore, TreeIndex};
use std::collections::{HashMap, HashSet};

/// Tunables for the event algebra. `max_depth` bounds composite resolution
/// (section 4.4.2); default `10`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlgebraConfig {
    pub max_depth: usize,
}

impl Default for AlgebraConfig {
    fn default() -> Self {
        Self { max_depth: 10 }
    }
}

/// Resolves a `ComponentRef` to the `Event` it currently points at: the
/// pinned `version` if set, otherwise whatever `tree` considers latest for
/// `logical_id`.
pub fn resolve_component(store: &dyn ObjectStore, tree: &dyn TreeIndex, component: &ComponentRef) -> CoreResult<Event> {
    let missing = || CoreError::MissingComponent {
        logical_id: component.logical_id.to_string(),
        version: component.version.clone(),
    };

    let latest_hash = tree
        .resolve(ObjectKind::Event, component.logical_id)
        .ok_or_else(missing)?;
    let latest = store.get_event(&latest_hash)?.ok_or_else(missing)?;

    let Some(wanted_version) = &component.version else {
        return Ok(latest);
    };
    if &latest.version == wanted_version {
        return Ok(latest);
    }

    // Walk the `previousVersion` chain backward from latest until the
    // requested version string is found, or the chain runs out.
    let mut current = latest;
    loop {
        let Some(prev_hash) = &current.previous_version else {
            return Err(missing());
        };
        let prev = store.get_event(prev_hash)?.ok_or_else(missing)?;
        if &prev.version == wanted_version {
            return Ok(prev);
        }
        current = prev;
    }
}

/// Computes the composite depth of `event` (leaf = 0; composite = `1 +
/// max(depth(child))`), memoizing each unique `(logicalId, version)` visited
/// and rejecting cycles.
pub fn depth(store: &dyn ObjectStore, tree: &dyn TreeIndex, event: &Event, config: &AlgebraConfig) -> CoreResult<u32> {
    let mut memo: HashMap<(LogicalId, String), u32> = HashMap::new();
    let mut visiting: HashSet<(LogicalId, String)> = HashSet::new();
    let mut stack: Vec<(LogicalId, String)> = Vec::new();
    depth_inner(store, tree, event, config, 0, &mut memo, &mut visiting, &mut stack)
}

fn depth_inner(
    store: &dyn ObjectStore,
    tree: &dyn TreeIndex,
    event: &Event,
    config: &AlgebraConfig,
    current_depth: usize,
    memo: &mut HashMap<(LogicalId, String), u32>,
    visiting: &mut HashSet<(LogicalId, String)>,
    stack: &mut Vec<(LogicalId, String)>,
) -> CoreResult<u32> {
    let key = (event.logical_id, event.version.clone());

    if let Some(&cached) = memo.get(&key) {
        return Ok(cached);
    }
    if current_depth > config.max_depth {
        return Err(CoreError::DepthExceeded { limit: config.max_depth });
    }
    if !event.is_composite() {
        memo.insert(key, 0);
        return Ok(0);
    }
    if visiting.contains(&key) {
        let reentry = stack.iter().position(|k| k == &key).unwrap_or(0);
        let mut path: Vec<String> = stack[reentry..].iter().map(|k| format!("{}@{}", k.0, k.1)).collect();
        path.push(format!("{}@{}", key.0, key.1));
        return Err(CoreError::CircularComposite { path });
    }
    visiting.insert(key.clone());
    stack.push(key.clone());

    let mut max_child = 0u32;
    for component in &event.components {
        let child = resolve_component(store, tree, component)?;
        let child_depth = depth_inner(store, tree, &child, config, current_depth + 1, memo, visiting, stack)?;
        max_child = max_child.max(child_depth);
    }

    stack.pop();
    visiting.remove(&key);
    let result = 1 + max_child;
    if result as usize > config.max_depth {
        return Err(CoreError::DepthExceeded { limit: config.max_depth });
    }
    memo.insert(key, result);
    Ok(result)
}
