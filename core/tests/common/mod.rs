//! Shared in-memory fixtures for the integration tests in this directory:
//! a thread-safe [`ObjectStore`]/[`RefStore`] pair and small builders for
//! entities, actions, and leaf events.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::collections::HashMap;
use time::OffsetDateTime;
use veritaschain_core::error::CoreResult;
use veritaschain_core::hash::{hash_action, hash_commit, hash_entity, hash_event, hash_tree};
use veritaschain_core::id::{ContentHash, LogicalId};
use veritaschain_core::model::{
    Action, Branch, CertaintyModifier, Commit, Entity, Evidence, Event, EventKind, EventMetadata,
    Modifiers, ObjectKind, Source, Statement, Tree,
};
use veritaschain_core::store::{ObjectStore, RefStore};

#[derive(Default)]
pub struct MemStore {
    entities: Mutex<HashMap<String, Entity>>,
    actions: Mutex<HashMap<String, Action>>,
    events: Mutex<HashMap<String, Event>>,
    commits: Mutex<HashMap<String, Commit>>,
    trees: Mutex<HashMap<String, Tree>>,
    versions: Mutex<HashMap<(ObjectKind, LogicalId), Vec<ContentHash>>>,
}

impl MemStore {
    fn record_version(&self, kind: ObjectKind, logical_id: LogicalId, hash: &ContentHash) {
        let mut versions = self.versions.lock();
        let entry = versions.entry((kind, logical_id)).or_default();
        if entry.last() != Some(hash) {
            entry.push(hash.clone());
        }
    }
}

impl std::fmt::Debug for MemStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemStore").finish()
    }
}

impl ObjectStore for MemStore {
    fn get_entity(&self, hash: &ContentHash) -> CoreResult<Option<Entity>> {
        Ok(self.entities.lock().get(hash.as_str()).cloned())
    }
    fn put_entity(&self, entity: &Entity) -> CoreResult<ContentHash> {
        let hash = hash_entity(entity);
        self.entities.lock().insert(hash.as_str().to_string(), entity.clone());
        self.record_version(ObjectKind::Entity, entity.logical_id, &hash);
        Ok(hash)
    }
    fn get_action(&self, hash: &ContentHash) -> CoreResult<Option<Action>> {
        Ok(self.actions.lock().get(hash.as_str()).cloned())
    }
    fn put_action(&self, action: &Action) -> CoreResult<ContentHash> {
        let hash = hash_action(action);
        self.actions.lock().insert(hash.as_str().to_string(), action.clone());
        self.record_version(ObjectKind::Action, action.logical_id, &hash);
        Ok(hash)
    }
    fn get_event(&self, hash: &ContentHash) -> CoreResult<Option<Event>> {
        Ok(self.events.lock().get(hash.as_str()).cloned())
    }
    fn put_event(&self, event: &Event) -> CoreResult<ContentHash> {
        let hash = hash_event(event);
        self.events.lock().insert(hash.as_str().to_string(), event.clone());
        self.record_version(ObjectKind::Event, event.logical_id, &hash);
        Ok(hash)
    }
    fn get_commit(&self, hash: &ContentHash) -> CoreResult<Option<Commit>> {
        Ok(self.commits.lock().get(hash.as_str()).cloned())
    }
    fn put_commit(&self, commit: &Commit) -> CoreResult<ContentHash> {
        let hash = hash_commit(commit);
        self.commits.lock().insert(hash.as_str().to_string(), commit.clone());
        Ok(hash)
    }
    fn get_tree(&self, hash: &ContentHash) -> CoreResult<Option<Tree>> {
        Ok(self.trees.lock().get(hash.as_str()).cloned())
    }
    fn put_tree(&self, tree: &Tree) -> CoreResult<ContentHash> {
        let hash = hash_tree(tree);
        self.trees.lock().insert(hash.as_str().to_string(), tree.clone());
        Ok(hash)
    }
    fn contains(&self, kind: ObjectKind, hash: &ContentHash) -> CoreResult<bool> {
        Ok(match kind {
            ObjectKind::Entity => self.entities.lock().contains_key(hash.as_str()),
            ObjectKind::Action => self.actions.lock().contains_key(hash.as_str()),
            ObjectKind::Event => self.events.lock().contains_key(hash.as_str()),
            ObjectKind::Commit => self.commits.lock().contains_key(hash.as_str()),
            ObjectKind::Tree => self.trees.lock().contains_key(hash.as_str()),
        })
    }

    fn list(&self, kind: ObjectKind) -> CoreResult<Vec<ContentHash>> {
        let keys: Vec<String> = match kind {
            ObjectKind::Entity => self.entities.lock().keys().cloned().collect(),
            ObjectKind::Action => self.actions.lock().keys().cloned().collect(),
            ObjectKind::Event => self.events.lock().keys().cloned().collect(),
            ObjectKind::Commit => self.commits.lock().keys().cloned().collect(),
            ObjectKind::Tree => self.trees.lock().keys().cloned().collect(),
        };
        keys.into_iter().map(ContentHash::parse).collect()
    }

    fn get_latest(&self, kind: ObjectKind, logical_id: LogicalId) -> CoreResult<Option<serde_json::Value>> {
        let latest_hash = self.versions.lock().get(&(kind, logical_id)).and_then(|v| v.last().cloned());
        let Some(hash) = latest_hash else { return Ok(None) };
        Ok(match kind {
            ObjectKind::Entity => self.get_entity(&hash)?.map(|v| serde_json::to_value(v).unwrap()),
            ObjectKind::Action => self.get_action(&hash)?.map(|v| serde_json::to_value(v).unwrap()),
            ObjectKind::Event => self.get_event(&hash)?.map(|v| serde_json::to_value(v).unwrap()),
            ObjectKind::Commit => self.get_commit(&hash)?.map(|v| serde_json::to_value(v).unwrap()),
            ObjectKind::Tree => self.get_tree(&hash)?.map(|v| serde_json::to_value(v).unwrap()),
        })
    }

    fn retrieve_batch(&self, kind: ObjectKind, hashes: &[ContentHash]) -> CoreResult<Vec<serde_json::Value>> {
        let mut found = Vec::with_capacity(hashes.len());
        for hash in hashes {
            let value = match kind {
                ObjectKind::Entity => self.get_entity(hash)?.map(|v| serde_json::to_value(v).unwrap()),
                ObjectKind::Action => self.get_action(hash)?.map(|v| serde_json::to_value(v).unwrap()),
                ObjectKind::Event => self.get_event(hash)?.map(|v| serde_json::to_value(v).unwrap()),
                ObjectKind::Commit => self.get_commit(hash)?.map(|v| serde_json::to_value(v).unwrap()),
                ObjectKind::Tree => self.get_tree(hash)?.map(|v| serde_json::to_value(v).unwrap()),
            };
            if let Some(value) = value {
                found.push(value);
            }
        }
        Ok(found)
    }
}

#[derive(Default)]
pub struct MemRefStore {
    branches: Mutex<HashMap<String, Branch>>,
    head: Mutex<String>,
}

impl std::fmt::Debug for MemRefStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemRefStore").finish()
    }
}

impl MemRefStore {
    pub fn with_main() -> Self {
        let store = Self {
            branches: Mutex::new(HashMap::new()),
            head: Mutex::new("main".to_string()),
        };
        store
            .branches
            .lock()
            .insert("main".to_string(), Branch::default_branch(OffsetDateTime::UNIX_EPOCH, "system"));
        store
    }
}

impl RefStore for MemRefStore {
    fn list_branches(&self) -> CoreResult<Vec<Branch>> {
        Ok(self.branches.lock().values().cloned().collect())
    }
    fn get_branch(&self, name: &str) -> CoreResult<Option<Branch>> {
        Ok(self.branches.lock().get(name).cloned())
    }
    fn put_branch(&self, branch: &Branch) -> CoreResult<()> {
        self.branches.lock().insert(branch.name.clone(), branch.clone());
        Ok(())
    }
    fn delete_branch(&self, name: &str) -> CoreResult<()> {
        self.branches.lock().remove(name);
        Ok(())
    }
    fn head(&self) -> CoreResult<String> {
        Ok(self.head.lock().clone())
    }
    fn set_head(&self, branch: &str) -> CoreResult<()> {
        *self.head.lock() = branch.to_string();
        Ok(())
    }
}

fn digest_for(discriminator: u8, id: LogicalId) -> [u8; 32] {
    let mut digest = [0u8; 32];
    let bytes = id.to_string();
    let bytes = bytes.as_bytes();
    let n = bytes.len().min(16);
    digest[..n].copy_from_slice(&bytes[..n]);
    digest[31] = discriminator;
    digest
}

fn genesis_commit_hash() -> ContentHash {
    ContentHash::from_digest(&[0u8; 32])
}

pub fn entity(store: &MemStore, label: &str) -> (LogicalId, ContentHash) {
    let logical_id = LogicalId::new();
    let entity = Entity {
        logical_id,
        version: "1.0".to_string(),
        previous_version: None,
        commit_hash: genesis_commit_hash(),
        label: label.to_string(),
        description: None,
        type_hint: None,
        properties: Default::default(),
        aliases: Vec::new(),
        identifiers: Default::default(),
    };
    let hash = store.put_entity(&entity).unwrap();
    (logical_id, hash)
}

pub fn action(store: &MemStore, label: &str) -> (LogicalId, ContentHash) {
    let logical_id = LogicalId::new();
    let action = Action {
        logical_id,
        version: "1.0".to_string(),
        previous_version: None,
        commit_hash: genesis_commit_hash(),
        label: label.to_string(),
        description: None,
        type_hint: None,
        category: None,
        modality: None,
        valency: None,
        properties: Default::default(),
    };
    let hash = store.put_action(&action).unwrap();
    (logical_id, hash)
}

/// Builds and stores a leaf SVO fact event with a given evidence class and
/// fact source type, the inputs seed scenario 1/2 (section 8) vary.
pub fn leaf_fact(
    store: &MemStore,
    title: &str,
    subject: ContentHash,
    verb: ContentHash,
    object: ContentHash,
    evidence: Evidence,
    source_type: &str,
    occurred: OffsetDateTime,
) -> (LogicalId, ContentHash) {
    let logical_id = LogicalId::new();
    let event = Event {
        logical_id,
        version: "1.0".to_string(),
        previous_version: None,
        commit_hash: genesis_commit_hash(),
        title: title.to_string(),
        description: None,
        date_occurred: occurred,
        date_recorded: occurred,
        date_modified: None,
        kind: EventKind::Fact,
        statement: Statement::Svo {
            subject_ref: subject,
            verb_ref: verb,
            object_ref: object,
        },
        modifiers: Modifiers {
            certainty: Some(CertaintyModifier {
                evidence: Some(evidence),
                reliability: None,
            }),
            ..Default::default()
        },
        relationships: Vec::new(),
        components: Vec::new(),
        aggregation: None,
        custom_rule_id: None,
        timeline_span: None,
        importance: None,
        summary: None,
        metadata: EventMetadata {
            source: Some(Source {
                r#type: Some(source_type.to_string()),
                legal_type: None,
                name: None,
                url: None,
            }),
            author: None,
            derived: Default::default(),
        },
    };
    let hash = store.put_event(&event).unwrap();
    (logical_id, hash)
}

pub fn tree_with_event(store: &MemStore, logical_id: LogicalId, hash: ContentHash) -> Tree {
    let mut tree = Tree::empty();
    *tree.map_for_mut(ObjectKind::Event).unwrap() = [(logical_id, hash)].into_iter().collect();
    store.put_tree(&tree).unwrap();
    tree
}

pub const _TOUCH_DIGEST_HELPER: fn(u8, LogicalId) -> [u8; 32] = digest_for;
