use crate::id::{ContentHash, LogicalId};
use crate::model::ObjectKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A commit's full snapshot: for every object kind, the content hash each
/// logical id resolves to at that commit. Trees are themselves content
/// addressed (`hash::hash_tree`), so two commits with identical state share
/// a tree hash regardless of history.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tree {
    /// Logical id -> content hash, per kind.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub entities: BTreeMap<LogicalId, ContentHash>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub actions: BTreeMap<LogicalId, ContentHash>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub events: BTreeMap<LogicalId, ContentHash>,
}

impl Tree {
    /// An empty tree, the parent-less starting point of a branch's history.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The map for a given kind. Commits and trees never carry `Commit` or
    /// `Tree` entries themselves, so those kinds have no corresponding map.
    pub fn map_for(&self, kind: ObjectKind) -> Option<&BTreeMap<LogicalId, ContentHash>> {
        match kind {
            ObjectKind::Entity => Some(&self.entities),
            ObjectKind::Action => Some(&self.actions),
            ObjectKind::Event => Some(&self.events),
            ObjectKind::Commit | ObjectKind::Tree => None,
        }
    }

    /// Mutable counterpart of [`Tree::map_for`].
    pub fn map_for_mut(&mut self, kind: ObjectKind) -> Option<&mut BTreeMap<LogicalId, ContentHash>> {
        match kind {
            ObjectKind::Entity => Some(&mut self.entities),
            ObjectKind::Action => Some(&mut self.actions),
            ObjectKind::Event => Some(&mut self.events),
            ObjectKind::Commit | ObjectKind::Tree => None,
        }
    }

    /// Overlays `changes` onto a clone of `self`, the "copy tree, overlay
    /// changes" step of commit creation (section 4.5's tree-building rule).
    pub fn overlay(&self, kind: ObjectKind, logical_id: LogicalId, hash: Option<ContentHash>) -> Self {
        let mut next = self.clone();
        if let Some(map) = next.map_for_mut(kind) {
            match hash {
                Some(hash) => {
                    map.insert(logical_id, hash);
                }
                None => {
                    map.remove(&logical_id);
                }
            }
        }
        next
    }

    /// Total object count across all kinds.
    pub fn len(&self) -> usize {
        self.entities.len() + self.actions.len() + self.events.len()
    }

    /// Whether the tree has no objects at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
