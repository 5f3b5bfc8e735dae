//! Filesystem-backed [`ObjectStore`]/[`RefStore`] implementation (section 6,
//! "Persisted store layout"): one file per object, keyed by its content
//! hash, under a kind-specific subdirectory, plus a flat `refs/heads/` and
//! `HEAD` for branch state. Adapted from the key-prefixed, one-entry-per-key
//! on-disk layout a `sled::Tree` gives the crdt engine, down to plain files
//! a human can `cat` — the format calls for a directly-inspectable tree, not
//! an embedded database.

use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use veritaschain_core::error::{CoreError, CoreResult};
use veritaschain_core::hash::{hash_action, hash_commit, hash_entity, hash_event, hash_tree};
use veritaschain_core::id::{ContentHash, LogicalId};
use veritaschain_core::model::{Action, Branch, Commit, Entity, Event, ObjectKind, Tree};
use veritaschain_core::store::{ObjectStore, RefStore};

fn io_err(cause: io::Error) -> CoreError {
    CoreError::StoreIo {
        cause: cause.to_string(),
    }
}

fn hash_filename(hash: &ContentHash) -> String {
    format!("{}.json", hash.as_str().trim_start_matches("sha256:"))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> CoreResult<Option<T>> {
    match fs::read(path) {
        Ok(bytes) => {
            let value = serde_json::from_slice(&bytes).map_err(|_| CoreError::StoreCorrupted {
                hash: path.display().to_string(),
            })?;
            Ok(Some(value))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(io_err(err)),
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let bytes = serde_json::to_vec_pretty(value).expect("object model types always serialize");
    fs::write(path, bytes).map_err(io_err)
}

/// One file per object, one directory per kind, rooted at a repository's
/// hidden store directory.
pub struct FsObjectStore {
    root: PathBuf,
}

impl std::fmt::Debug for FsObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsObjectStore").field("root", &self.root).finish()
    }
}

impl FsObjectStore {
    /// Opens (and if necessary creates) the object store rooted at
    /// `store_dir` (typically `<repo>/.veritaschain`).
    pub fn open(store_dir: impl Into<PathBuf>) -> io::Result<Self> {
        let root = store_dir.into();
        for kind_dir in ["entities", "actions", "events", "commits", "trees", "macro-cache"] {
            fs::create_dir_all(root.join("objects").join(kind_dir))?;
        }
        fs::create_dir_all(root.join("history"))?;
        Ok(Self { root })
    }

    fn kind_dir(&self, subdir: &str) -> PathBuf {
        self.root.join("objects").join(subdir)
    }

    fn subdir_for(kind: ObjectKind) -> &'static str {
        match kind {
            ObjectKind::Entity => "entities",
            ObjectKind::Action => "actions",
            ObjectKind::Event => "events",
            ObjectKind::Commit => "commits",
            ObjectKind::Tree => "trees",
        }
    }

    fn get_value(&self, kind: ObjectKind, hash: &ContentHash) -> CoreResult<Option<serde_json::Value>> {
        let path = self.kind_dir(Self::subdir_for(kind)).join(hash_filename(hash));
        read_json(&path)
    }

    fn history_path(&self, kind: ObjectKind, logical_id: LogicalId) -> PathBuf {
        self.root.join("history").join(kind.to_string()).join(format!("{logical_id}.json"))
    }

    /// Appends `hash` to `logical_id`'s ordered version list, unless it's
    /// already the most recent entry (a re-`put` of unchanged content).
    fn record_version(&self, kind: ObjectKind, logical_id: LogicalId, hash: &ContentHash) -> CoreResult<()> {
        let path = self.history_path(kind, logical_id);
        let mut versions: Vec<ContentHash> = read_json(&path)?.unwrap_or_default();
        if versions.last() != Some(hash) {
            versions.push(hash.clone());
        }
        write_json(&path, &versions)
    }

    /// The ordered list of every content hash ever recorded for
    /// `logical_id`, oldest first. Empty if the logical id is unknown.
    pub fn version_history(&self, kind: ObjectKind, logical_id: LogicalId) -> CoreResult<Vec<ContentHash>> {
        Ok(read_json(&self.history_path(kind, logical_id))?.unwrap_or_default())
    }

    fn cache_key(event_hash: &ContentHash, commit_hash: &ContentHash) -> String {
        use std::hash::Hasher;
        let mut hasher = fnv::FnvHasher::default();
        hasher.write(event_hash.as_str().as_bytes());
        hasher.write(commit_hash.as_str().as_bytes());
        format!("{:016x}", hasher.finish())
    }

    /// Loads a persisted confidence breakdown for `(event_hash,
    /// commit_hash)`, if one was ever saved. Safe to find nothing: the
    /// cache is a pure speedup, never a source of truth.
    pub fn load_confidence_cache_entry(
        &self,
        event_hash: &ContentHash,
        commit_hash: &ContentHash,
    ) -> CoreResult<Option<veritaschain_core::confidence::ConfidenceBreakdown>> {
        let path = self.kind_dir("macro-cache").join(format!("{}.json", Self::cache_key(event_hash, commit_hash)));
        read_json(&path)
    }

    /// Persists a confidence breakdown for `(event_hash, commit_hash)`.
    /// These files are safe to delete at any time; the next read simply
    /// recomputes and re-populates.
    pub fn save_confidence_cache_entry(
        &self,
        event_hash: &ContentHash,
        commit_hash: &ContentHash,
        breakdown: &veritaschain_core::confidence::ConfidenceBreakdown,
    ) -> CoreResult<()> {
        let path = self.kind_dir("macro-cache").join(format!("{}.json", Self::cache_key(event_hash, commit_hash)));
        write_json(&path, breakdown)
    }
}

impl ObjectStore for FsObjectStore {
    fn get_entity(&self, hash: &ContentHash) -> CoreResult<Option<Entity>> {
        read_json(&self.kind_dir("entities").join(hash_filename(hash)))
    }

    fn put_entity(&self, entity: &Entity) -> CoreResult<ContentHash> {
        let hash = hash_entity(entity);
        write_json(&self.kind_dir("entities").join(hash_filename(&hash)), entity)?;
        self.record_version(ObjectKind::Entity, entity.logical_id, &hash)?;
        Ok(hash)
    }

    fn get_action(&self, hash: &ContentHash) -> CoreResult<Option<Action>> {
        read_json(&self.kind_dir("actions").join(hash_filename(hash)))
    }

    fn put_action(&self, action: &Action) -> CoreResult<ContentHash> {
        let hash = hash_action(action);
        write_json(&self.kind_dir("actions").join(hash_filename(&hash)), action)?;
        self.record_version(ObjectKind::Action, action.logical_id, &hash)?;
        Ok(hash)
    }

    fn get_event(&self, hash: &ContentHash) -> CoreResult<Option<Event>> {
        read_json(&self.kind_dir("events").join(hash_filename(hash)))
    }

    fn put_event(&self, event: &Event) -> CoreResult<ContentHash> {
        let hash = hash_event(event);
        write_json(&self.kind_dir("events").join(hash_filename(&hash)), event)?;
        self.record_version(ObjectKind::Event, event.logical_id, &hash)?;
        Ok(hash)
    }

    fn get_commit(&self, hash: &ContentHash) -> CoreResult<Option<Commit>> {
        read_json(&self.kind_dir("commits").join(hash_filename(hash)))
    }

    fn put_commit(&self, commit: &Commit) -> CoreResult<ContentHash> {
        let hash = hash_commit(commit);
        write_json(&self.kind_dir("commits").join(hash_filename(&hash)), commit)?;
        Ok(hash)
    }

    fn get_tree(&self, hash: &ContentHash) -> CoreResult<Option<Tree>> {
        read_json(&self.kind_dir("trees").join(hash_filename(hash)))
    }

    fn put_tree(&self, tree: &Tree) -> CoreResult<ContentHash> {
        let hash = hash_tree(tree);
        write_json(&self.kind_dir("trees").join(hash_filename(&hash)), tree)?;
        Ok(hash)
    }

    fn contains(&self, kind: ObjectKind, hash: &ContentHash) -> CoreResult<bool> {
        Ok(self.kind_dir(Self::subdir_for(kind)).join(hash_filename(hash)).is_file())
    }

    fn list(&self, kind: ObjectKind) -> CoreResult<Vec<ContentHash>> {
        let dir = self.kind_dir(Self::subdir_for(kind));
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(io_err(err)),
        };
        let mut hashes = Vec::new();
        for entry in entries {
            let entry = entry.map_err(io_err)?;
            let Some(stem) = entry.path().file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };
            hashes.push(ContentHash::parse(&format!("sha256:{stem}")).map_err(|_| CoreError::StoreCorrupted {
                hash: entry.path().display().to_string(),
            })?);
        }
        Ok(hashes)
    }

    fn get_latest(&self, kind: ObjectKind, logical_id: LogicalId) -> CoreResult<Option<serde_json::Value>> {
        match self.version_history(kind, logical_id)?.last() {
            Some(hash) => self.get_value(kind, hash),
            None => Ok(None),
        }
    }

    fn retrieve_batch(&self, kind: ObjectKind, hashes: &[ContentHash]) -> CoreResult<Vec<serde_json::Value>> {
        let mut found = Vec::with_capacity(hashes.len());
        for hash in hashes {
            if let Some(value) = self.get_value(kind, hash)? {
                found.push(value);
            }
        }
        Ok(found)
    }
}

/// `refs/heads/<name>.json` holding each branch's full record, plus a
/// `HEAD` file naming the current branch.
pub struct FsRefStore {
    heads_dir: PathBuf,
    head_file: PathBuf,
}

impl std::fmt::Debug for FsRefStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsRefStore").field("heads_dir", &self.heads_dir).finish()
    }
}

impl FsRefStore {
    /// Opens (and if necessary creates) the ref store rooted at
    /// `store_dir`. Does not create a default branch; that is
    /// [`crate::Repository::init`]'s job, since it needs an author and
    /// timestamp this layer has no opinion about.
    pub fn open(store_dir: impl Into<PathBuf>) -> io::Result<Self> {
        let root = store_dir.into();
        let heads_dir = root.join("refs").join("heads");
        fs::create_dir_all(&heads_dir)?;
        Ok(Self {
            heads_dir,
            head_file: root.join("HEAD"),
        })
    }

    fn branch_path(&self, name: &str) -> PathBuf {
        self.heads_dir.join(format!("{name}.json"))
    }
}

impl RefStore for FsRefStore {
    fn list_branches(&self) -> CoreResult<Vec<Branch>> {
        let entries = fs::read_dir(&self.heads_dir).map_err(io_err)?;
        let mut branches = Vec::new();
        for entry in entries {
            let entry = entry.map_err(io_err)?;
            if let Some(branch) = read_json(&entry.path())? {
                branches.push(branch);
            }
        }
        branches.sort_by(|a: &Branch, b: &Branch| a.name.cmp(&b.name));
        Ok(branches)
    }

    fn get_branch(&self, name: &str) -> CoreResult<Option<Branch>> {
        read_json(&self.branch_path(name))
    }

    fn put_branch(&self, branch: &Branch) -> CoreResult<()> {
        write_json(&self.branch_path(&branch.name), branch)
    }

    fn delete_branch(&self, name: &str) -> CoreResult<()> {
        match fs::remove_file(self.branch_path(name)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_err(err)),
        }
    }

    fn head(&self) -> CoreResult<String> {
        match fs::read_to_string(&self.head_file) {
            Ok(contents) => Ok(contents.trim().to_string()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Ok(veritaschain_core::model::DEFAULT_BRANCH.to_string())
            }
            Err(err) => Err(io_err(err)),
        }
    }

    fn set_head(&self, branch: &str) -> CoreResult<()> {
        if let Some(parent) = self.head_file.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(&self.head_file, branch).map_err(io_err)
    }
}
