use crate::id::{ContentHash, LogicalId};
use crate::model::ObjectKind;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A point in the version-control history: the tree it produced, the
/// changes that produced it, and (for merges) more than one parent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    /// Parent commit hashes. Empty for a branch's root commit, two or more
    /// for a merge commit.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<ContentHash>,
    /// The resulting tree's content hash.
    pub tree_hash: ContentHash,
    /// The individual object changes this commit introduces.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<ChangeSet>,
    /// Free-form commit message.
    pub message: String,
    /// Free-form author identifier.
    pub author: String,
    /// The branch this commit was made on.
    pub branch: String,
    /// Commit timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// An inert placeholder: this store never verifies or produces
    /// signatures (see non-goals).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl Commit {
    /// Whether this is a merge commit (more than one parent).
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// Whether this is a root commit (no parents).
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

/// One object-level change within a commit: which kind, which logical id,
/// and the hash it now resolves to (`None` records a deletion).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSet {
    /// Which sub-store the change applies to.
    pub kind: ObjectKind,
    /// The logical id affected.
    pub logical_id: LogicalId,
    /// The hash the logical id now resolves to, or `None` if deleted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_hash: Option<ContentHash>,
    /// The hash the logical id previously resolved to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_hash: Option<ContentHash>,
}
