//! End-to-end `Repository` facade scenarios: branch, commit, and merge
//! driven entirely through the public API a CLI or HTTP surface would call,
//! over a real temporary filesystem store.

use tempfile::tempdir;
use veritaschain::{RepoConfig, Repository};
use veritaschain_core::model::{ChangeSet, Entity, ObjectKind};
use veritaschain_core::vcs::{MergeOutcome, MergeStrategy};

fn new_entity(label: &str) -> Entity {
    Entity {
        logical_id: veritaschain_core::id::LogicalId::new(),
        version: "1.0".to_string(),
        previous_version: None,
        commit_hash: veritaschain_core::id::ContentHash::from_digest(&[0u8; 32]),
        label: label.to_string(),
        description: None,
        type_hint: None,
        properties: Default::default(),
        aliases: Vec::new(),
        identifiers: Default::default(),
    }
}

#[test]
fn branch_commit_and_fast_forward_merge_round_trip() {
    let dir = tempdir().unwrap();
    let repo = Repository::init(RepoConfig::new(dir.path()), "alice").unwrap();

    let entity = new_entity("Acme Corp");
    let hash = repo.put_entity(&entity).unwrap();
    let root = repo
        .commit(
            "main",
            vec![ChangeSet { kind: ObjectKind::Entity, logical_id: entity.logical_id, new_hash: Some(hash.clone()), old_hash: None }],
            "seed",
            "alice",
        )
        .unwrap();
    assert_eq!(repo.head_commit("main").unwrap().unwrap().tree_hash, repo.head_commit("main").unwrap().unwrap().tree_hash);

    repo.create_branch("feature", Some(root.clone()), "alice").unwrap();
    repo.switch_branch("feature", false, "alice").unwrap();
    assert_eq!(repo.current_branch().unwrap().name, "feature");

    let mut updated = entity.clone();
    updated.label = "Acme Corporation".to_string();
    updated.previous_version = Some(hash.clone());
    updated.version = "1.1".to_string();
    let updated_hash = repo.put_entity(&updated).unwrap();
    let tip = repo
        .commit(
            "feature",
            vec![ChangeSet { kind: ObjectKind::Entity, logical_id: entity.logical_id, new_hash: Some(updated_hash.clone()), old_hash: Some(hash) }],
            "rename",
            "alice",
        )
        .unwrap();

    let outcome = repo.merge("feature", "main", MergeStrategy::Auto, "alice", "merge feature").unwrap();
    assert_eq!(outcome, MergeOutcome::FastForward { new_head: tip });

    let tree = repo.tree(&repo.head_commit("main").unwrap().unwrap()).unwrap();
    assert_eq!(tree.entities.get(&entity.logical_id), Some(&updated_hash));
}

#[test]
fn deleting_a_branch_does_not_touch_its_commits() {
    let dir = tempdir().unwrap();
    let repo = Repository::init(RepoConfig::new(dir.path()), "alice").unwrap();
    let entity = new_entity("Acme Corp");
    let hash = repo.put_entity(&entity).unwrap();
    repo.commit(
        "main",
        vec![ChangeSet { kind: ObjectKind::Entity, logical_id: entity.logical_id, new_hash: Some(hash.clone()), old_hash: None }],
        "seed",
        "alice",
    )
    .unwrap();
    repo.create_branch("scratch", None, "alice").unwrap();
    repo.delete_branch("scratch", false).unwrap();
    assert_eq!(repo.list_branches().unwrap().len(), 1);
    assert!(repo.get_entity(&hash).unwrap().is_some());
}
