//! `veritaschain` — the reference adapter and facade: a filesystem-backed
//! object/ref store (section 6) wired to `veritaschain-core`'s pure
//! algorithms, exposing the operations a CLI or HTTP surface (both out of
//! scope here) would call.
//!
//! ```no_run
//! use veritaschain::{Repository, RepoConfig};
//!
//! let repo = Repository::init(RepoConfig::new("/tmp/my-repo"), "alice").unwrap();
//! let branch = repo.current_branch().unwrap();
//! assert_eq!(branch.name, "main");
//! ```

pub mod config;
pub mod error;
pub mod fs_store;

pub use config::RepoConfig;
pub use error::{RepoError, RepoResult};
pub use fs_store::{FsObjectStore, FsRefStore};

use time::OffsetDateTime;
use tracing::{info, instrument};
use veritaschain_core::algebra::{self, PatternObserver, TraversalConfig, TraversalReport, VisitHooks};
use veritaschain_core::confidence::{AggregatorRegistry, CacheKey, ChangeRecord, ConfidenceBreakdown, ConfidenceCache};
use veritaschain_core::hash::hash_event;
use veritaschain_core::id::{ContentHash, LogicalId};
use veritaschain_core::migrate::MigrationRegistry;
use veritaschain_core::model::{
    Action, Branch, ChangeSet, Commit, Entity, Event, ObjectKind, Tree,
};
use veritaschain_core::store::{ObjectStore, RefStore, TreeIndex};
use veritaschain_core::vcs;
use veritaschain_core::vcs::{MergeOptions, MergeOutcome, MergeStrategy};

/// A single-writer, filesystem-backed VeritasChain repository: the object
/// store and ref store from [`fs_store`], plus the confidence cache,
/// custom-aggregator registry, pattern observer, and legacy-migration
/// registry a real deployment keeps alive for the repository's lifetime.
pub struct Repository {
    config: RepoConfig,
    store: FsObjectStore,
    refs: FsRefStore,
    cache: ConfidenceCache,
    aggregators: AggregatorRegistry,
    observer: PatternObserver,
    migrations: MigrationRegistry,
}

impl Repository {
    /// Opens an existing repository, or creates one with a protected `main`
    /// branch if its store directory doesn't exist yet.
    #[instrument(skip(config), fields(root = %config.root.display()))]
    pub fn init(config: RepoConfig, author: &str) -> RepoResult<Self> {
        let store_dir = config.store_dir();
        let store = FsObjectStore::open(&store_dir).map_err(|source| RepoError::InitFailed {
            path: store_dir.clone(),
            source,
        })?;
        let refs = FsRefStore::open(&store_dir).map_err(|source| RepoError::InitFailed {
            path: store_dir.clone(),
            source,
        })?;
        if refs.get_branch(veritaschain_core::model::DEFAULT_BRANCH)?.is_none() {
            let default = Branch::default_branch(OffsetDateTime::now_utc(), author);
            refs.put_branch(&default)?;
            info!(branch = %default.name, "initialized repository");
        }
        let cache = ConfidenceCache::new(config.confidence.cache_capacity);
        Ok(Self {
            config,
            store,
            refs,
            cache,
            aggregators: AggregatorRegistry::new(),
            observer: PatternObserver::new(),
            migrations: MigrationRegistry::new(),
        })
    }

    /// Registers a custom aggregator for `Aggregation::Custom` events named
    /// by `rule_id` in their `customRuleId`.
    pub fn register_aggregator(&mut self, rule_id: impl Into<String>, f: veritaschain_core::confidence::CustomAggregatorFn) {
        self.aggregators.register(rule_id, f);
    }

    /// The repository's tunables.
    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    /// The process-local [`PatternObserver`] that accumulates as
    /// traversals run.
    pub fn observer(&self) -> &PatternObserver {
        &self.observer
    }

    // -- branches (section 4.5.1) --------------------------------------

    /// Lists every branch.
    pub fn list_branches(&self) -> RepoResult<Vec<Branch>> {
        Ok(vcs::branch::list(&self.refs)?)
    }

    /// The branch `HEAD` currently points at.
    pub fn current_branch(&self) -> RepoResult<Branch> {
        Ok(vcs::branch::current(&self.refs)?)
    }

    /// Creates a new branch pointed at `from_commit` (or unborn).
    #[instrument(skip(self))]
    pub fn create_branch(&self, name: &str, from_commit: Option<ContentHash>, author: &str) -> RepoResult<Branch> {
        let branch = vcs::branch::create(&self.refs, name, from_commit, false, author, OffsetDateTime::now_utc())?;
        info!(branch = %branch.name, "created branch");
        Ok(branch)
    }

    /// Switches `HEAD` to `name`.
    #[instrument(skip(self))]
    pub fn switch_branch(&self, name: &str, create_if_missing: bool, author: &str) -> RepoResult<Branch> {
        let branch = vcs::branch::switch(&self.refs, name, create_if_missing, false, author, OffsetDateTime::now_utc())?;
        info!(branch = %branch.name, "switched branch");
        Ok(branch)
    }

    /// Renames a branch.
    pub fn rename_branch(&self, old: &str, new: &str) -> RepoResult<Branch> {
        Ok(vcs::branch::rename(&self.refs, old, new, false)?)
    }

    /// Deletes a branch.
    pub fn delete_branch(&self, name: &str, force: bool) -> RepoResult<()> {
        vcs::branch::delete(&self.refs, name, force)?;
        info!(branch = name, "deleted branch");
        Ok(())
    }

    // -- objects ---------------------------------------------------------

    /// Persists an entity, returning its content hash. Does not touch any
    /// branch; callers assemble a [`ChangeSet`] and call [`Self::commit`]
    /// to make it part of history.
    pub fn put_entity(&self, entity: &Entity) -> RepoResult<ContentHash> {
        Ok(self.store.put_entity(entity)?)
    }

    /// Looks up an entity by content hash.
    pub fn get_entity(&self, hash: &ContentHash) -> RepoResult<Option<Entity>> {
        Ok(self.store.get_entity(hash)?)
    }

    /// Persists an action.
    pub fn put_action(&self, action: &Action) -> RepoResult<ContentHash> {
        Ok(self.store.put_action(action)?)
    }

    /// Looks up an action by content hash.
    pub fn get_action(&self, hash: &ContentHash) -> RepoResult<Option<Action>> {
        Ok(self.store.get_action(hash)?)
    }

    /// Persists an event, invalidating any cached confidence value that
    /// depended on its previous content hash.
    pub fn put_event(&self, event: &Event) -> RepoResult<ContentHash> {
        let hash = self.store.put_event(event)?;
        self.cache.invalidate_component(&hash);
        Ok(hash)
    }

    /// Looks up an event by content hash. Legacy `MacroEvent` payloads are
    /// not handled here (this reads already-typed [`Event`] objects); use
    /// [`Self::migrate_legacy_payload`] before deserializing raw JSON from
    /// an external source.
    pub fn get_event(&self, hash: &ContentHash) -> RepoResult<Option<Event>> {
        Ok(self.store.get_event(hash)?)
    }

    /// Rewrites a raw JSON payload in place if it matches a known legacy
    /// shape (section 6, "Legacy interfaces"). Returns whether anything
    /// changed; the caller should re-attempt `Event` deserialization
    /// afterward.
    pub fn migrate_legacy_payload(&self, payload: &mut serde_json::Value) -> bool {
        self.migrations.migrate(payload)
    }

    /// The ordered version history of a logical object, oldest first.
    pub fn version_history(&self, kind: ObjectKind, logical_id: LogicalId) -> RepoResult<Vec<ContentHash>> {
        Ok(self.store.version_history(kind, logical_id)?)
    }

    // -- commits (section 4.5.2) -----------------------------------------

    /// The current head commit on `branch`, if it has any.
    pub fn head_commit(&self, branch: &str) -> RepoResult<Option<Commit>> {
        Ok(vcs::head_commit(&self.store, &self.refs, branch)?)
    }

    /// The tree a commit produced.
    pub fn tree(&self, commit: &Commit) -> RepoResult<Tree> {
        self.store
            .get_tree(&commit.tree_hash)?
            .ok_or_else(|| veritaschain_core::CoreError::NotFound {
                kind: ObjectKind::Tree,
                id: commit.tree_hash.to_string(),
            })
            .map_err(RepoError::from)
    }

    /// Builds, persists, and checks out a new commit on `branch`.
    #[instrument(skip(self, changes))]
    pub fn commit(
        &self,
        branch: &str,
        changes: Vec<ChangeSet>,
        message: &str,
        author: &str,
    ) -> RepoResult<ContentHash> {
        let parents = match self.refs.get_branch(branch)?.and_then(|b| b.head) {
            Some(head) => vec![head],
            None => vec![],
        };
        let hash = vcs::commit(&self.store, &self.refs, branch, parents, changes, message, author, OffsetDateTime::now_utc())?;
        info!(branch, commit = %hash, "created commit");
        Ok(hash)
    }

    // -- merge (sections 4.5.3-4.5.7) ------------------------------------

    /// Merges `source` into `target` using the built-in resolution
    /// pipeline (section 4.5.6), biased per `strategy`.
    #[instrument(skip(self))]
    pub fn merge(
        &self,
        source: &str,
        target: &str,
        strategy: MergeStrategy,
        author: &str,
        message: &str,
    ) -> RepoResult<MergeOutcome> {
        let pipeline = vcs::default_pipeline();
        let options = MergeOptions {
            strategy,
            author,
            message,
            pipeline: &pipeline,
            confidence_config: &self.config.confidence,
        };
        let outcome = vcs::three_way_merge(&self.store, &self.refs, source, target, &options, OffsetDateTime::now_utc())?;
        match &outcome {
            MergeOutcome::FastForward { new_head } => info!(target, new_head = %new_head, "fast-forwarded"),
            MergeOutcome::UpToDate => info!(target, "already up to date"),
            MergeOutcome::Merged { commit_hash, .. } => info!(target, commit = %commit_hash, "merge committed"),
            MergeOutcome::Conflicted { conflicts, .. } => {
                info!(target, unresolved = conflicts.len(), "merge left unresolved conflicts")
            }
        }
        Ok(outcome)
    }

    // -- event algebra and confidence -------------------------------------

    /// Resolves a composite event's component reference.
    pub fn resolve_component(&self, tree: &dyn TreeIndex, component: &veritaschain_core::model::ComponentRef) -> RepoResult<Event> {
        Ok(algebra::resolve_component(&self.store, tree, component)?)
    }

    /// The composite depth of `event` (0 for a leaf).
    pub fn depth(&self, tree: &dyn TreeIndex, event: &Event) -> RepoResult<u32> {
        Ok(algebra::depth(&self.store, tree, event, &self.config.algebra)?)
    }

    /// Renders the human-readable formula string for `event`.
    pub fn render_formula(&self, tree: &dyn TreeIndex, event: &Event) -> RepoResult<String> {
        Ok(algebra::render_formula(
            &self.store,
            tree,
            event,
            &self.config.confidence,
            &self.config.algebra,
            &self.aggregators,
        )?)
    }

    /// Walks `event`'s statement or component tree, invoking `hooks`.
    /// Traversals always also feed the repository's [`PatternObserver`],
    /// since observation is meant to be passive and cumulative across
    /// every walk a caller runs.
    pub fn traverse(&self, tree: &dyn TreeIndex, event: &Event, config: &TraversalConfig, hooks: &dyn VisitHooks) -> RepoResult<TraversalReport> {
        let observed = algebra::traverse(&self.store, tree, event, config, &self.observer)?;
        let report = algebra::traverse(&self.store, tree, event, config, hooks)?;
        Ok(TraversalReport { duration: observed.duration + report.duration, ..report })
    }

    /// Computes (or returns the cached) confidence breakdown for `event`
    /// as it appears in `commit_hash`'s tree.
    #[instrument(skip(self, tree, event))]
    pub fn confidence(&self, tree: &dyn TreeIndex, event: &Event, commit_hash: &ContentHash) -> RepoResult<ConfidenceBreakdown> {
        let event_hash = hash_event(event);
        let key = CacheKey {
            commit_hash: commit_hash.clone(),
            logical_id: event.logical_id,
        };
        if let Some(value) = self.cache.get(&key) {
            return Ok(ConfidenceBreakdown {
                value,
                volatility: f64::NAN,
                evidence_factor: f64::NAN,
                source_factor: f64::NAN,
                norm_force_factor: f64::NAN,
                formula: "(cached)".to_string(),
                justification: vec!["served from the commit-scoped confidence cache".to_string()],
            });
        }

        let (breakdown, component_hashes) = self.compute_confidence(tree, event)?;
        self.cache.put(key, breakdown.value, component_hashes.clone());
        self.store.save_confidence_cache_entry(&event_hash, commit_hash, &breakdown)?;
        Ok(breakdown)
    }

    /// Builds the change history `leaf_confidence`'s volatility estimate
    /// needs, from the stored version chain for `logical_id`: each prior
    /// version names the commit that introduced it in its own
    /// `commit_hash` field.
    fn change_history(&self, logical_id: LogicalId) -> RepoResult<Vec<ChangeRecord>> {
        let versions = self.store.version_history(ObjectKind::Event, logical_id)?;
        let mut history = Vec::with_capacity(versions.len());
        for hash in versions {
            let Some(version) = self.store.get_event(&hash)? else {
                continue;
            };
            history.push(ChangeRecord {
                timestamp: version.date_modified.unwrap_or(version.date_recorded),
                commit_id: version.commit_hash.to_string(),
                change_type: if version.previous_version.is_none() { "create".to_string() } else { "update".to_string() },
                changed_fields: Vec::new(),
                author: version.metadata.author.clone().unwrap_or_else(|| "unknown".to_string()),
            });
        }
        Ok(history)
    }

    fn compute_confidence(&self, tree: &dyn TreeIndex, event: &Event) -> RepoResult<(ConfidenceBreakdown, Vec<ContentHash>)> {
        if !event.is_composite() {
            let history = self.change_history(event.logical_id)?;
            let breakdown = veritaschain_core::confidence::leaf_confidence(event, &history, &self.config.confidence);
            return Ok((breakdown, vec![hash_event(event)]));
        }

        let mut component_hashes = vec![hash_event(event)];
        let mut resolved = Vec::with_capacity(event.components.len());
        for component_ref in &event.components {
            let child = algebra::resolve_component(&self.store, tree, component_ref)?;
            component_hashes.push(hash_event(&child));
            let (child_breakdown, mut child_component_hashes) = self.compute_confidence(tree, &child)?;
            component_hashes.append(&mut child_component_hashes);
            resolved.push(veritaschain_core::confidence::ResolvedComponent {
                confidence: child_breakdown.value,
                weak: component_ref.weak,
                date_occurred: child.date_occurred,
            });
        }
        let result = veritaschain_core::confidence::aggregate_composite(
            &resolved,
            event.aggregation_or_default(),
            event.custom_rule_id.as_deref(),
            &self.aggregators,
        )?;
        let breakdown = ConfidenceBreakdown {
            value: result.value,
            volatility: f64::NAN,
            evidence_factor: f64::NAN,
            source_factor: f64::NAN,
            norm_force_factor: f64::NAN,
            formula: result.formula.clone(),
            justification: vec![format!(
                "{} components included, {} excluded as weak: {}",
                result.included, result.excluded_weak, result.formula
            )],
        };
        Ok((breakdown, component_hashes))
    }
}
