//! Merge-base discovery (section 4.5.3): first common ancestor of two
//! commits via bi-directional breadth-first search over parent pointers.
//! Sufficient for bi-parent histories; a full LCA algorithm is future work
//! for richer multi-head histories.

use crate::error::{CoreError, CoreResult};
use crate::id::ContentHash;
use crate::store::ObjectStore;
use std::collections::{HashSet, VecDeque};

/// Finds the first common ancestor of `a` and `b`, walking outward from
/// both simultaneously one generation at a time. Returns `NoBase` if the
/// two histories never converge.
pub fn merge_base(store: &dyn ObjectStore, a: &ContentHash, b: &ContentHash) -> CoreResult<ContentHash> {
    if a == b {
        return Ok(a.clone());
    }

    let mut seen_a: HashSet<ContentHash> = HashSet::new();
    let mut seen_b: HashSet<ContentHash> = HashSet::new();
    let mut frontier_a: VecDeque<ContentHash> = VecDeque::from([a.clone()]);
    let mut frontier_b: VecDeque<ContentHash> = VecDeque::from([b.clone()]);
    seen_a.insert(a.clone());
    seen_b.insert(b.clone());

    while !frontier_a.is_empty() || !frontier_b.is_empty() {
        if let Some(found) = step(store, &mut frontier_a, &mut seen_a, &seen_b)? {
            return Ok(found);
        }
        if let Some(found) = step(store, &mut frontier_b, &mut seen_b, &seen_a)? {
            return Ok(found);
        }
    }

    Err(CoreError::NoBase {
        a: a.to_string(),
        b: b.to_string(),
    })
}

fn step(
    store: &dyn ObjectStore,
    frontier: &mut VecDeque<ContentHash>,
    seen_own: &mut HashSet<ContentHash>,
    seen_other: &HashSet<ContentHash>,
) -> CoreResult<Option<ContentHash>> {
    let generation: Vec<ContentHash> = frontier.drain(..).collect();
    for hash in generation {
        if seen_other.contains(&hash) {
            return Ok(Some(hash));
        }
        let commit = store.get_commit(&hash)?.ok_or_else(|| CoreError::NotFound {
            kind: crate::model::ObjectKind::Commit,
            id: hash.to_string(),
        })?;
        for parent in commit.parents {
            if seen_own.insert(parent.clone()) {
                frontier.push_back(parent);
            }
        }
    }
    Ok(None)
}

/// Whether `ancestor` can be reached by following parent links from
/// `descendant`. Used by fast-forward detection.
pub fn is_ancestor(store: &dyn ObjectStore, ancestor: &ContentHash, descendant: &ContentHash) -> CoreResult<bool> {
    if ancestor == descendant {
        return Ok(true);
    }
    let mut seen = HashSet::new();
    let mut frontier = VecDeque::from([descendant.clone()]);
    seen.insert(descendant.clone());
    while let Some(hash) = frontier.pop_front() {
        let commit = store.get_commit(&hash)?.ok_or_else(|| CoreError::NotFound {
            kind: crate::model::ObjectKind::Commit,
            id: hash.to_string(),
        })?;
        for parent in commit.parents {
            if &parent == ancestor {
                return Ok(true);
            }
            if seen.insert(parent.clone()) {
                frontier.push_back(parent);
            }
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Commit;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    #[derive(Debug, Default)]
    struct MemStore {
        commits: Mutex<HashMap<ContentHash, Commit>>,
    }

    impl MemStore {
        fn insert(&self, parents: Vec<ContentHash>) -> ContentHash {
            let commit = Commit {
                parents,
                tree_hash: ContentHash::from_digest(&[0u8; 32]),
                changes: vec![],
                message: "t".into(),
                author: "t".into(),
                branch: "main".into(),
                timestamp: time::OffsetDateTime::UNIX_EPOCH,
                signature: None,
            };
            let hash = crate::hash::hash_commit(&commit);
            self.commits.lock().insert(hash.clone(), commit);
            hash
        }
    }

    impl ObjectStore for MemStore {
        fn get_entity(&self, _: &ContentHash) -> CoreResult<Option<crate::model::Entity>> {
            Ok(None)
        }
        fn put_entity(&self, e: &crate::model::Entity) -> CoreResult<ContentHash> {
            Ok(crate::hash::hash_entity(e))
        }
        fn get_action(&self, _: &ContentHash) -> CoreResult<Option<crate::model::Action>> {
            Ok(None)
        }
        fn put_action(&self, a: &crate::model::Action) -> CoreResult<ContentHash> {
            Ok(crate::hash::hash_action(a))
        }
        fn get_event(&self, _: &ContentHash) -> CoreResult<Option<crate::model::Event>> {
            Ok(None)
        }
        fn put_event(&self, e: &crate::model::Event) -> CoreResult<ContentHash> {
            Ok(crate::hash::hash_event(e))
        }
        fn get_commit(&self, hash: &ContentHash) -> CoreResult<Option<Commit>> {
            Ok(self.commits.lock().get(hash).cloned())
        }
        fn put_commit(&self, commit: &Commit) -> CoreResult<ContentHash> {
            let hash = crate::hash::hash_commit(commit);
            self.commits.lock().insert(hash.clone(), commit.clone());
            Ok(hash)
        }
        fn get_tree(&self, _: &ContentHash) -> CoreResult<Option<crate::model::Tree>> {
            Ok(None)
        }
        fn put_tree(&self, t: &crate::model::Tree) -> CoreResult<ContentHash> {
            Ok(crate::hash::hash_tree(t))
        }
        fn contains(&self, _: crate::model::ObjectKind, hash: &ContentHash) -> CoreResult<bool> {
            Ok(self.commits.lock().contains_key(hash))
        }
        fn list(&self, _: crate::model::ObjectKind) -> CoreResult<Vec<ContentHash>> {
            Ok(self.commits.lock().keys().cloned().collect())
        }
        fn get_latest(&self, _: crate::model::ObjectKind, _: crate::id::LogicalId) -> CoreResult<Option<serde_json::Value>> {
            Ok(None)
        }
        fn retrieve_batch(&self, _: crate::model::ObjectKind, hashes: &[ContentHash]) -> CoreResult<Vec<serde_json::Value>> {
            let commits = self.commits.lock();
            Ok(hashes
                .iter()
                .filter_map(|h| commits.get(h))
                .map(|c| serde_json::to_value(c).unwrap())
                .collect())
        }
    }

    #[test]
    fn finds_common_ancestor() {
        let store = MemStore::default();
        let root = store.insert(vec![]);
        let left = store.insert(vec![root.clone()]);
        let right = store.insert(vec![root.clone()]);
        assert_eq!(merge_base(&store, &left, &right).unwrap(), root);
    }

    #[test]
    fn merge_base_is_symmetric() {
        let store = MemStore::default();
        let root = store.insert(vec![]);
        let left = store.insert(vec![root.clone()]);
        let right = store.insert(vec![root.clone()]);
        assert_eq!(
            merge_base(&store, &left, &right).unwrap(),
            merge_base(&store, &right, &left).unwrap()
        );
    }

    #[test]
    fn disjoint_histories_have_no_base() {
        let store = MemStore::default();
        let a = store.insert(vec![]);
        let b = store.insert(vec![]);
        assert!(merge_base(&store, &a, &b).is_err());
    }

    #[test]
    fn ancestor_of_a_linear_chain() {
        let store = MemStore::default();
        let root = store.insert(vec![]);
        let mid = store.insert(vec![root.clone()]);
        let tip = store.insert(vec![mid]);
        assert!(is_ancestor(&store, &root, &tip).unwrap());
        assert!(!is_ancestor(&store, &tip, &root).unwrap());
    }
}
