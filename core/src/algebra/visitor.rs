//! Generic traversal (section 4.4.4): per-kind hooks over an event's
//! statement tree and composite structure, with bounded depth, eager or
//! lazy enumeration, and optional parallel descent over independent
//! operands/components.
//!
//! Hooks take `&self` rather than `&mut self` so a [`TraversalConfig`] with
//! `parallel: true` can fan descent out across threads without requiring
//! hook state to be externally synchronized by the caller; implementations
//! that need mutable state (see `algebra::observer::PatternObserver`) hold
//! it behind their own lock.

use crate::algebra::resolve::{resolve_component, AlgebraConfig};
use crate::error::{CoreError, CoreResult};
use crate::model::{Action, Entity, Event, Operator, Statement};
use crate::store::{ObjectStore, TreeIndex};
use std::time::{Duration, Instant};

/// Per-kind callbacks a traversal invokes as it descends. All methods default
/// to a no-op, so a caller only overrides the hooks it cares about.
pub trait VisitHooks: Sync {
    fn on_entity(&self, _owner: &Event, _entity: &Entity, _depth: usize) {}
    fn on_action(&self, _owner: &Event, _action: &Action, _depth: usize) {}
    fn on_svo(&self, _owner: &Event, _subject: &Entity, _verb: &Action, _object: &Entity, _depth: usize) {}
    fn on_clause(&self, _owner: &Event, _operator: Operator, _depth: usize) {}
    fn on_leaf_event(&self, _event: &Event, _depth: usize) {}
    fn on_composite_event(&self, _event: &Event, _depth: usize) {}
}

/// Traversal tunables.
#[derive(Clone, Copy, Debug)]
pub struct TraversalConfig {
    pub max_depth: usize,
    /// Whether composite component descent may fan out across threads.
    /// Statement operand descent is always sequential (it is typically
    /// shallow and cheap relative to component resolution's store I/O).
    pub parallel: bool,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            max_depth: AlgebraConfig::default().max_depth,
            parallel: false,
        }
    }
}

/// Summary of one traversal run, for progress reporting.
#[derive(Clone, Debug)]
pub struct TraversalReport {
    pub visited: usize,
    pub max_depth_reached: usize,
    pub errors: Vec<String>,
    pub duration: Duration,
}

struct State {
    visited: usize,
    max_depth_reached: usize,
    errors: Vec<String>,
}

/// Eagerly walks `event`'s statement (if leaf) or component tree (if
/// composite), invoking `hooks` at each node, and returns a run summary.
pub fn traverse(
    store: &dyn ObjectStore,
    tree: &dyn TreeIndex,
    event: &Event,
    config: &TraversalConfig,
    hooks: &dyn VisitHooks,
) -> CoreResult<TraversalReport> {
    let started = Instant::now();
    let mut state = State {
        visited: 0,
        max_depth_reached: 0,
        errors: Vec::new(),
    };
    let result = visit_event(store, tree, event, config, hooks, 0, &mut state);
    if let Err(err) = result {
        state.errors.push(err.to_string());
    }
    Ok(TraversalReport {
        visited: state.visited,
        max_depth_reached: state.max_depth_reached,
        errors: state.errors,
        duration: started.elapsed(),
    })
}

/// Lazily enumerates the same nodes `traverse` would visit, as a sequence of
/// owned events, generator-style: each [`Iterator::next`] call descends just
/// far enough to produce the next leaf or composite node.
pub struct LazyEventWalk<'a> {
    store: &'a dyn ObjectStore,
    tree: &'a dyn TreeIndex,
    config: TraversalConfig,
    stack: Vec<(Event, usize)>,
}

impl<'a> LazyEventWalk<'a> {
    pub fn new(store: &'a dyn ObjectStore, tree: &'a dyn TreeIndex, root: Event, config: TraversalConfig) -> Self {
        Self {
            store,
            tree,
            config,
            stack: vec![(root, 0)],
        }
    }
}

impl Iterator for LazyEventWalk<'_> {
    type Item = CoreResult<(Event, usize)>;

    fn next(&mut self) -> Option<Self::Item> {
        let (event, depth) = self.stack.pop()?;
        if depth > self.config.max_depth {
            return Some(Err(CoreError::DepthExceeded {
                limit: self.config.max_depth,
            }));
        }
        if event.is_composite() {
            for component in event.components.iter().rev() {
                if component.weak {
                    continue;
                }
                match resolve_component(self.store, self.tree, component) {
                    Ok(child) => self.stack.push((child, depth + 1)),
                    Err(err) => return Some(Err(err)),
                }
            }
        }
        Some(Ok((event, depth)))
    }
}

fn visit_event(
    store: &dyn ObjectStore,
    tree: &dyn TreeIndex,
    event: &Event,
    config: &TraversalConfig,
    hooks: &dyn VisitHooks,
    depth: usize,
    state: &mut State,
) -> CoreResult<()> {
    if depth > config.max_depth {
        return Err(CoreError::DepthExceeded { limit: config.max_depth });
    }
    state.visited += 1;
    state.max_depth_reached = state.max_depth_reached.max(depth);

    if !event.is_composite() {
        hooks.on_leaf_event(event, depth);
        visit_statement(store, event, &event.statement, hooks, depth)?;
        return Ok(());
    }

    hooks.on_composite_event(event, depth);
    let strong_components: Vec<_> = event.components.iter().filter(|c| !c.weak).collect();

    if config.parallel && strong_components.len() > 1 {
        let outcomes: Vec<CoreResult<(usize, usize, Vec<String>)>> = std::thread::scope(|scope| {
            let handles: Vec<_> = strong_components
                .iter()
                .copied()
                .map(|component| {
                    scope.spawn(|| {
                        let child = resolve_component(store, tree, component)?;
                        let mut sub_state = State {
                            visited: 0,
                            max_depth_reached: 0,
                            errors: Vec::new(),
                        };
                        visit_event(store, tree, &child, config, hooks, depth + 1, &mut sub_state)?;
                        Ok((sub_state.visited, sub_state.max_depth_reached, sub_state.errors))
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().expect("visitor thread panicked")).collect()
        });
        for outcome in outcomes {
            let (visited, max_depth_reached, errors) = outcome?;
            state.visited += visited;
            state.max_depth_reached = state.max_depth_reached.max(max_depth_reached);
            state.errors.extend(errors);
        }
    } else {
        for component in strong_components {
            let child = resolve_component(store, tree, component)?;
            visit_event(store, tree, &child, config, hooks, depth + 1, state)?;
        }
    }

    Ok(())
}

fn visit_statement(
    store: &dyn ObjectStore,
    owner: &Event,
    statement: &Statement,
    hooks: &dyn VisitHooks,
    depth: usize,
) -> CoreResult<()> {
    match statement {
        Statement::Svo {
            subject_ref,
            verb_ref,
            object_ref,
        } => {
            let subject = store.get_entity(subject_ref)?.ok_or_else(|| CoreError::NotFound {
                kind: crate::model::ObjectKind::Entity,
                id: subject_ref.to_string(),
            })?;
            let verb = store.get_action(verb_ref)?.ok_or_else(|| CoreError::NotFound {
                kind: crate::model::ObjectKind::Action,
                id: verb_ref.to_string(),
            })?;
            let object = store.get_entity(object_ref)?.ok_or_else(|| CoreError::NotFound {
                kind: crate::model::ObjectKind::Entity,
                id: object_ref.to_string(),
            })?;
            hooks.on_entity(owner, &subject, depth);
            hooks.on_action(owner, &verb, depth);
            hooks.on_entity(owner, &object, depth);
            hooks.on_svo(owner, &subject, &verb, &object, depth);
            Ok(())
        }
        Statement::LogicalClause { operator, operands, .. } => {
            hooks.on_clause(owner, *operator, depth);
            for operand in operands {
                visit_statement(store, owner, operand, hooks, depth + 1)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_event;
    use crate::id::{ContentHash, LogicalId};
    use crate::model::{Aggregation, ComponentRef, EventKind, Modifiers, ObjectKind, Tree};
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use time::OffsetDateTime;

    #[derive(Default)]
    struct MemTree {
        events: Mutex<HashMap<LogicalId, ContentHash>>,
    }
    impl TreeIndex for MemTree {
        fn resolve(&self, kind: ObjectKind, logical_id: LogicalId) -> Option<ContentHash> {
            if kind != ObjectKind::Event {
                return None;
            }
            self.events.lock().get(&logical_id).cloned()
        }
    }

    #[derive(Default)]
    struct MemStore {
        events: Mutex<HashMap<ContentHash, Event>>,
        entities: Mutex<HashMap<ContentHash, Entity>>,
        actions: Mutex<HashMap<ContentHash, Action>>,
    }
    impl std::fmt::Debug for MemStore {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("MemStore").finish()
        }
    }
    impl ObjectStore for MemStore {
        fn get_entity(&self, hash: &ContentHash) -> CoreResult<Option<Entity>> {
            Ok(self.entities.lock().get(hash).cloned())
        }
        fn put_entity(&self, entity: &Entity) -> CoreResult<ContentHash> {
            let hash = ContentHash::from_digest(&{
                let mut d = [0u8; 32];
                d[..16].copy_from_slice(entity.logical_id.to_string().as_bytes()[..16].try_into().unwrap());
                d[16] = 1;
                d
            });
            self.entities.lock().insert(hash.clone(), entity.clone());
            Ok(hash)
        }
        fn get_action(&self, hash: &ContentHash) -> CoreResult<Option<Action>> {
            Ok(self.actions.lock().get(hash).cloned())
        }
        fn put_action(&self, action: &Action) -> CoreResult<ContentHash> {
            let hash = ContentHash::from_digest(&{
                let mut d = [0u8; 32];
                d[..16].copy_from_slice(action.logical_id.to_string().as_bytes()[..16].try_into().unwrap());
                d[16] = 2;
                d
            });
            self.actions.lock().insert(hash.clone(), action.clone());
            Ok(hash)
        }
        fn get_event(&self, hash: &ContentHash) -> CoreResult<Option<Event>> {
            Ok(self.events.lock().get(hash).cloned())
        }
        fn put_event(&self, event: &Event) -> CoreResult<ContentHash> {
            let hash = hash_event(event);
            self.events.lock().insert(hash.clone(), event.clone());
            Ok(hash)
        }
        fn get_commit(&self, _: &ContentHash) -> CoreResult<Option<crate::model::Commit>> {
            Ok(None)
        }
        fn put_commit(&self, _: &crate::model::Commit) -> CoreResult<ContentHash> {
            unimplemented!()
        }
        fn get_tree(&self, _: &ContentHash) -> CoreResult<Option<Tree>> {
            Ok(None)
        }
        fn put_tree(&self, _: &Tree) -> CoreResult<ContentHash> {
            unimplemented!()
        }
        fn contains(&self, _: ObjectKind, hash: &ContentHash) -> CoreResult<bool> {
            Ok(self.events.lock().contains_key(hash))
        }
        fn list(&self, _: ObjectKind) -> CoreResult<Vec<ContentHash>> {
            Ok(Vec::new())
        }
        fn get_latest(&self, _: ObjectKind, _: LogicalId) -> CoreResult<Option<serde_json::Value>> {
            Ok(None)
        }
        fn retrieve_batch(&self, _: ObjectKind, _: &[ContentHash]) -> CoreResult<Vec<serde_json::Value>> {
            Ok(Vec::new())
        }
    }

    fn entity(store: &MemStore, label: &str) -> ContentHash {
        let e = Entity {
            logical_id: LogicalId::new(),
            version: "1.0".into(),
            previous_version: None,
            commit_hash: ContentHash::from_digest(&[0u8; 32]),
            label: label.into(),
            description: None,
            type_hint: None,
            properties: Default::default(),
            aliases: vec![],
            identifiers: Default::default(),
        };
        store.put_entity(&e).unwrap()
    }

    fn action(store: &MemStore, label: &str) -> ContentHash {
        let a = Action {
            logical_id: LogicalId::new(),
            version: "1.0".into(),
            previous_version: None,
            commit_hash: ContentHash::from_digest(&[0u8; 32]),
            label: label.into(),
            description: None,
            type_hint: None,
            category: None,
            modality: None,
            valency: None,
            properties: Default::default(),
        };
        store.put_action(&a).unwrap()
    }

    fn svo_leaf(title: &str, subject_ref: ContentHash, verb_ref: ContentHash, object_ref: ContentHash) -> Event {
        Event {
            logical_id: LogicalId::new(),
            version: "1.0".into(),
            previous_version: None,
            commit_hash: ContentHash::from_digest(&[0u8; 32]),
            title: title.into(),
            description: None,
            date_occurred: OffsetDateTime::UNIX_EPOCH,
            date_recorded: OffsetDateTime::UNIX_EPOCH,
            date_modified: None,
            kind: EventKind::Fact,
            statement: Statement::Svo {
                subject_ref,
                verb_ref,
                object_ref,
            },
            modifiers: Modifiers::default(),
            relationships: vec![],
            components: vec![],
            aggregation: None,
            custom_rule_id: None,
            timeline_span: None,
            importance: None,
            summary: None,
            metadata: Default::default(),
        }
    }

    fn store_and_index(store: &MemStore, tree: &MemTree, event: Event) -> ComponentRef {
        let id = event.logical_id;
        let hash = store.put_event(&event).unwrap();
        tree.events.lock().insert(id, hash);
        ComponentRef::latest(id)
    }

    #[derive(Default)]
    struct CountingHooks {
        entities: AtomicUsize,
        actions: AtomicUsize,
        svos: AtomicUsize,
        leaves: AtomicUsize,
        composites: AtomicUsize,
    }
    impl VisitHooks for CountingHooks {
        fn on_entity(&self, _owner: &Event, _entity: &Entity, _depth: usize) {
            self.entities.fetch_add(1, Ordering::SeqCst);
        }
        fn on_action(&self, _owner: &Event, _action: &Action, _depth: usize) {
            self.actions.fetch_add(1, Ordering::SeqCst);
        }
        fn on_svo(&self, _owner: &Event, _subject: &Entity, _verb: &Action, _object: &Entity, _depth: usize) {
            self.svos.fetch_add(1, Ordering::SeqCst);
        }
        fn on_leaf_event(&self, _event: &Event, _depth: usize) {
            self.leaves.fetch_add(1, Ordering::SeqCst);
        }
        fn on_composite_event(&self, _event: &Event, _depth: usize) {
            self.composites.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn traverse_visits_leaf_svo_and_invokes_hooks() {
        let store = MemStore::default();
        let tree = MemTree::default();
        let subject = entity(&store, "Alice");
        let verb = action(&store, "notified");
        let object = entity(&store, "Bob");
        let event = svo_leaf("e1", subject, verb, object);

        let hooks = CountingHooks::default();
        let report = traverse(&store, &tree, &event, &TraversalConfig::default(), &hooks).unwrap();

        assert!(report.errors.is_empty());
        assert_eq!(report.visited, 1);
        assert_eq!(hooks.leaves.load(Ordering::SeqCst), 1);
        assert_eq!(hooks.composites.load(Ordering::SeqCst), 0);
        assert_eq!(hooks.entities.load(Ordering::SeqCst), 2);
        assert_eq!(hooks.actions.load(Ordering::SeqCst), 1);
        assert_eq!(hooks.svos.load(Ordering::SeqCst), 1);
    }

    fn composite_fixture(store: &MemStore, tree: &MemTree) -> Event {
        let subject = entity(store, "Alice");
        let verb = action(store, "notified");
        let object = entity(store, "Bob");
        let c1 = store_and_index(store, tree, svo_leaf("c1", subject, verb, object));

        let subject2 = entity(store, "Carol");
        let verb2 = action(store, "notified");
        let object2 = entity(store, "Dave");
        let c2 = store_and_index(store, tree, svo_leaf("c2", subject2, verb2, object2));

        let mut parent = svo_leaf("parent", subject, verb, object);
        parent.components = vec![c1, c2];
        parent.aggregation = Some(Aggregation::All);
        parent
    }

    #[test]
    fn traverse_visits_every_composite_child_exactly_once() {
        let store = MemStore::default();
        let tree = MemTree::default();
        let parent = composite_fixture(&store, &tree);

        let hooks = CountingHooks::default();
        let report = traverse(&store, &tree, &parent, &TraversalConfig::default(), &hooks).unwrap();

        assert!(report.errors.is_empty());
        assert_eq!(report.visited, 3);
        assert_eq!(report.max_depth_reached, 1);
        assert_eq!(hooks.composites.load(Ordering::SeqCst), 1);
        assert_eq!(hooks.leaves.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn parallel_traversal_matches_sequential_counts() {
        let store = MemStore::default();
        let tree = MemTree::default();
        let parent = composite_fixture(&store, &tree);

        let sequential_hooks = CountingHooks::default();
        let sequential = traverse(&store, &tree, &parent, &TraversalConfig::default(), &sequential_hooks).unwrap();

        let parallel_hooks = CountingHooks::default();
        let parallel_config = TraversalConfig {
            max_depth: TraversalConfig::default().max_depth,
            parallel: true,
        };
        let parallel = traverse(&store, &tree, &parent, &parallel_config, &parallel_hooks).unwrap();

        assert_eq!(sequential.visited, parallel.visited);
        assert_eq!(sequential.max_depth_reached, parallel.max_depth_reached);
        assert_eq!(
            sequential_hooks.leaves.load(Ordering::SeqCst),
            parallel_hooks.leaves.load(Ordering::SeqCst)
        );
    }

    #[test]
    fn depth_exceeded_is_reported_as_a_traversal_error() {
        let store = MemStore::default();
        let tree = MemTree::default();
        let parent = composite_fixture(&store, &tree);

        let hooks = CountingHooks::default();
        let config = TraversalConfig { max_depth: 0, parallel: false };
        let report = traverse(&store, &tree, &parent, &config, &hooks).unwrap();

        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("depth") || !report.errors[0].is_empty());
    }

    #[test]
    fn lazy_walk_enumerates_parent_then_children() {
        let store = MemStore::default();
        let tree = MemTree::default();
        let parent = composite_fixture(&store, &tree);

        let walk = LazyEventWalk::new(&store, &tree, parent, TraversalConfig::default());
        let titles: Vec<String> = walk.map(|item| item.unwrap().0.title).collect();

        assert_eq!(titles.len(), 3);
        assert_eq!(titles[0], "parent");
        assert!(titles.contains(&"c1".to_string()));
        assert!(titles.contains(&"c2".to_string()));
    }

    #[test]
    fn lazy_walk_propagates_depth_exceeded() {
        let store = MemStore::default();
        let tree = MemTree::default();
        let parent = composite_fixture(&store, &tree);

        let config = TraversalConfig { max_depth: 0, parallel: false };
        let mut walk = LazyEventWalk::new(&store, &tree, parent, config);
        assert!(walk.next().unwrap().is_ok());
        assert!(matches!(walk.next(), Some(Err(CoreError::DepthExceeded { .. }))));
    }
}
