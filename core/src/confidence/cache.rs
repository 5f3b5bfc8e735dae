//! Commit-scoped confidence cache (section 4.3.4): memoizes a logical
//! event's confidence at a given commit, invalidated whenever any component
//! in its dependency set changes hash.

use crate::id::{ContentHash, LogicalId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::collections::VecDeque;

/// Identifies one cached confidence value: a logical event as it appears in
/// a specific commit's tree.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct CacheKey {
    pub commit_hash: ContentHash,
    pub logical_id: LogicalId,
}

struct Entry {
    value: f64,
    /// Content hashes of every component (transitively) this value depended
    /// on at compute time; a `put` for the same key is only trusted if none
    /// of these have since been superseded (checked by the caller via
    /// `invalidate_component`).
    component_hashes: Vec<ContentHash>,
}

/// A bounded LRU-evicted cache of computed confidence values, keyed by
/// `(commit, logical id)`. Callers compute eagerly; this cache only ever
/// remembers, it never recomputes.
pub struct ConfidenceCache {
    capacity: usize,
    inner: Mutex<CacheState>,
}

struct CacheState {
    entries: HashMap<CacheKey, Entry>,
    /// Most-recently-used order, front = most recent.
    order: VecDeque<CacheKey>,
}

impl ConfidenceCache {
    /// Builds an empty cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(CacheState {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    /// Returns the cached value for `key`, if present, and marks it
    /// most-recently-used.
    pub fn get(&self, key: &CacheKey) -> Option<f64> {
        let mut state = self.inner.lock();
        let value = state.entries.get(key).map(|e| e.value);
        if value.is_some() {
            state.order.retain(|k| k != key);
            state.order.push_front(key.clone());
        }
        value
    }

    /// Inserts or replaces the cached value for `key`, recording the
    /// content hashes of every component it depended on.
    pub fn put(&self, key: CacheKey, value: f64, component_hashes: Vec<ContentHash>) {
        let mut state = self.inner.lock();
        if !state.entries.contains_key(&key) && state.entries.len() >= self.capacity {
            if let Some(evicted) = state.order.pop_back() {
                state.entries.remove(&evicted);
            }
        }
        state.order.retain(|k| k != &key);
        state.order.push_front(key.clone());
        state.entries.insert(
            key,
            Entry {
                value,
                component_hashes,
            },
        );
    }

    /// Drops every cached entry whose dependency set includes `changed`.
    /// Called once per object write, before the write is made visible.
    pub fn invalidate_component(&self, changed: &ContentHash) {
        let mut state = self.inner.lock();
        let stale: Vec<CacheKey> = state
            .entries
            .iter()
            .filter(|(_, entry)| entry.component_hashes.contains(changed))
            .map(|(key, _)| key.clone())
            .collect();
        for key in stale {
            state.entries.remove(&key);
            state.order.retain(|k| k != &key);
        }
    }

    /// Drops every cached entry for `commit_hash`, e.g. when a branch is
    /// rewound past it.
    pub fn invalidate_commit(&self, commit_hash: &ContentHash) {
        let mut state = self.inner.lock();
        let stale: Vec<CacheKey> = state
            .entries
            .keys()
            .filter(|key| &key.commit_hash == commit_hash)
            .cloned()
            .collect();
        for key in stale {
            state.entries.remove(&key);
            state.order.retain(|k| k != &key);
        }
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
