//! Commit creation (section 4.5.2): copy the parent tree, overlay the
//! changed objects, hash and persist the tree, then hash and persist the
//! commit and atomically move the branch head.

use crate::error::{CoreError, CoreResult};
use crate::hash::{hash_commit, hash_tree};
use crate::id::ContentHash;
use crate::model::{ChangeSet, Commit, Tree};
use crate::store::{ObjectStore, RefStore};
use time::OffsetDateTime;

/// Builds, persists, and checks out a new commit on `branch`.
///
/// `changes` is the full list of object-level edits this commit introduces;
/// the resulting tree is the current branch tree with each change
/// overlaid. An empty `changes` list is allowed (an empty commit), matching
/// Git's behavior for merge commits with no additional edits.
pub fn commit(
    store: &dyn ObjectStore,
    refs: &dyn RefStore,
    branch_name: &str,
    parents: Vec<ContentHash>,
    changes: Vec<ChangeSet>,
    message: impl Into<String>,
    author: impl Into<String>,
    now: OffsetDateTime,
) -> CoreResult<ContentHash> {
    let branch = refs
        .get_branch(branch_name)?
        .ok_or_else(|| CoreError::BranchNotFound {
            name: branch_name.to_string(),
        })?;

    let base_tree = match &branch.head {
        Some(head) => {
            let head_commit = store
                .get_commit(head)?
                .ok_or_else(|| CoreError::NotFound {
                    kind: crate::model::ObjectKind::Commit,
                    id: head.to_string(),
                })?;
            store
                .get_tree(&head_commit.tree_hash)?
                .ok_or_else(|| CoreError::NotFound {
                    kind: crate::model::ObjectKind::Tree,
                    id: head_commit.tree_hash.to_string(),
                })?
        }
        None => Tree::empty(),
    };

    let mut tree = base_tree;
    for change in &changes {
        tree = tree.overlay(change.kind, change.logical_id, change.new_hash.clone());
    }
    let tree_hash = hash_tree(&tree);
    store.put_tree(&tree)?;

    let commit = Commit {
        parents,
        tree_hash,
        changes,
        message: message.into(),
        author: author.into(),
        branch: branch_name.to_string(),
        timestamp: now,
        signature: None,
    };
    let commit_hash = hash_commit(&commit);
    store.put_commit(&commit)?;

    let mut branch = branch;
    branch.head = Some(commit_hash.clone());
    refs.put_branch(&branch)?;

    Ok(commit_hash)
}

/// Resolves a branch's current head to its full [`Commit`] record.
pub fn head_commit(store: &dyn ObjectStore, refs: &dyn RefStore, branch_name: &str) -> CoreResult<Option<Commit>> {
    let branch = refs
        .get_branch(branch_name)?
        .ok_or_else(|| CoreError::BranchNotFound {
            name: branch_name.to_string(),
        })?;
    match branch.head {
        Some(head) => {
            let commit = store
                .get_commit(&head)?
                .ok_or_else(|| CoreError::NotFound {
                    kind: crate::model::ObjectKind::Commit,
                    id: head.to_string(),
                })?;
            Ok(Some(commit))
        }
        None => Ok(None),
    }
}
