//! C3 — the storage seam. `veritaschain-core` defines these traits and
//! never implements them: persistence is the facade crate's job
//! (`fs_store::FsObjectStore`), so the same object model, confidence
//! engine, and merge algorithm work over an on-disk layout, an in-memory
//! map for tests, or something else entirely.

use crate::id::{ContentHash, LogicalId};
use crate::model::{Action, Branch, Commit, Entity, Event, ObjectKind, Tree};
use std::fmt::Debug;

/// Read/write access to the content-addressed object graph: entities,
/// actions, events, commits, and trees, each keyed by their own content
/// hash. Implementations must be content-addressed-honest: `put` computes
/// (or receives) the hash itself and a later `get` of that hash must
/// return a payload that hashes back to it (section 4.1's invariant).
pub trait ObjectStore: Send + Sync + Debug {
    /// Looks up an entity by content hash.
    fn get_entity(&self, hash: &ContentHash) -> crate::error::CoreResult<Option<Entity>>;
    /// Persists an entity, returning its content hash.
    fn put_entity(&self, entity: &Entity) -> crate::error::CoreResult<ContentHash>;

    /// Looks up an action by content hash.
    fn get_action(&self, hash: &ContentHash) -> crate::error::CoreResult<Option<Action>>;
    /// Persists an action, returning its content hash.
    fn put_action(&self, action: &Action) -> crate::error::CoreResult<ContentHash>;

    /// Looks up an event by content hash.
    fn get_event(&self, hash: &ContentHash) -> crate::error::CoreResult<Option<Event>>;
    /// Persists an event, returning its content hash.
    fn put_event(&self, event: &Event) -> crate::error::CoreResult<ContentHash>;

    /// Looks up a commit by content hash.
    fn get_commit(&self, hash: &ContentHash) -> crate::error::CoreResult<Option<Commit>>;
    /// Persists a commit, returning its content hash.
    fn put_commit(&self, commit: &Commit) -> crate::error::CoreResult<ContentHash>;

    /// Looks up a tree by content hash.
    fn get_tree(&self, hash: &ContentHash) -> crate::error::CoreResult<Option<Tree>>;
    /// Persists a tree, returning its content hash.
    fn put_tree(&self, tree: &Tree) -> crate::error::CoreResult<ContentHash>;

    /// Whether an object of the given kind and hash is present, without
    /// paying for a full deserialization.
    fn contains(&self, kind: ObjectKind, hash: &ContentHash) -> crate::error::CoreResult<bool>;

    /// Every content hash currently stored for `kind`, in unspecified order.
    fn list(&self, kind: ObjectKind) -> crate::error::CoreResult<Vec<ContentHash>>;

    /// The object most recently stored for `logical_id` under `kind`,
    /// according to that kind's version history — independent of any one
    /// branch's tree, unlike [`TreeIndex::resolve`].
    fn get_latest(
        &self,
        kind: ObjectKind,
        logical_id: LogicalId,
    ) -> crate::error::CoreResult<Option<serde_json::Value>>;

    /// Looks up several hashes of the same kind at once. A hash with
    /// nothing stored for it is simply omitted, not an error.
    fn retrieve_batch(
        &self,
        kind: ObjectKind,
        hashes: &[ContentHash],
    ) -> crate::error::CoreResult<Vec<serde_json::Value>>;
}

/// Read/write access to the mutable parts of a repository: branch
/// pointers and the current `HEAD`. Kept separate from [`ObjectStore`]
/// because branch state is not content-addressed — it changes in place.
pub trait RefStore: Send + Sync + Debug {
    /// Lists every branch, in no particular order.
    fn list_branches(&self) -> crate::error::CoreResult<Vec<Branch>>;
    /// Looks up a single branch by name.
    fn get_branch(&self, name: &str) -> crate::error::CoreResult<Option<Branch>>;
    /// Creates or overwrites a branch record.
    fn put_branch(&self, branch: &Branch) -> crate::error::CoreResult<()>;
    /// Removes a branch record. Callers are responsible for protection checks.
    fn delete_branch(&self, name: &str) -> crate::error::CoreResult<()>;

    /// The name of the branch `HEAD` currently points at.
    fn head(&self) -> crate::error::CoreResult<String>;
    /// Repoints `HEAD` at a different branch.
    fn set_head(&self, branch: &str) -> crate::error::CoreResult<()>;
}

/// Resolves a [`LogicalId`] to the content hash of its latest version on a
/// given branch's tree. Implemented in terms of [`ObjectStore`]'s tree
/// lookups; kept as its own trait so the confidence engine and event
/// algebra can depend on resolution without depending on branch plumbing.
pub trait TreeIndex: Send + Sync {
    /// The content hash `logical_id` currently resolves to for `kind`, or
    /// `None` if it doesn't exist in this tree.
    fn resolve(&self, kind: ObjectKind, logical_id: LogicalId) -> Option<ContentHash>;
}

impl TreeIndex for Tree {
    fn resolve(&self, kind: ObjectKind, logical_id: LogicalId) -> Option<ContentHash> {
        self.map_for(kind).and_then(|m| m.get(&logical_id)).cloned()
    }
}
