//! The flat, stable error taxonomy from spec section 7.
//!
//! Every variant is a machine-checkable code a collaborator (HTTP layer, CLI,
//! whatever sits outside the core) can switch on without parsing messages.

use crate::model::ObjectKind;
use crate::vcs::conflict::MergeConflict;
use thiserror::Error;

/// Errors produced by `veritaschain-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No object of the given kind exists under that id.
    #[error("{kind:?} not found: {id}")]
    NotFound {
        /// Which store was consulted.
        kind: ObjectKind,
        /// The hash or logical id that was looked up.
        id: String,
    },
    /// A string presented as a content hash does not match `sha256:` + 64 hex.
    #[error("malformed hash: {value}")]
    BadHash {
        /// The offending string.
        value: String,
    },
    /// A `put` targeted an existing hash with a different payload.
    #[error("hash collision on {hash}")]
    HashCollision {
        /// The hash both payloads mapped to.
        hash: String,
    },
    /// A composite event's component reference did not resolve.
    #[error("missing component {logical_id}{}", version.as_deref().map(|v| format!("@{v}")).unwrap_or_default())]
    MissingComponent {
        /// The logical id that failed to resolve.
        logical_id: String,
        /// The pinned version requested, if any.
        version: Option<String>,
    },
    /// Resolving components re-entered an already-visited node.
    #[error("circular composite: {}", path.join(" -> "))]
    CircularComposite {
        /// The cycle, as a sequence of `logicalId@version` labels.
        path: Vec<String>,
    },
    /// Composite resolution exceeded the configured depth cap.
    #[error("depth exceeded (limit {limit})")]
    DepthExceeded {
        /// The configured `maxDepth`.
        limit: usize,
    },
    /// A statement failed a structural invariant (bad arity, bad sequencing).
    #[error("invalid statement: {reason}")]
    InvalidStatement {
        /// Human-readable explanation.
        reason: String,
    },
    /// A modifier field failed validation.
    #[error("invalid modifier field: {field}")]
    InvalidModifier {
        /// The offending field path.
        field: String,
    },
    /// No branch with that name exists.
    #[error("branch not found: {name}")]
    BranchNotFound {
        /// The requested branch name.
        name: String,
    },
    /// A branch with that name already exists.
    #[error("branch already exists: {name}")]
    BranchExists {
        /// The conflicting branch name.
        name: String,
    },
    /// The operation would remove or clobber a protected branch.
    #[error("branch is protected: {name}")]
    BranchProtected {
        /// The protected branch name.
        name: String,
    },
    /// A branch name failed the naming rules in section 4.5.1.
    #[error("invalid branch name: {name}")]
    InvalidBranchName {
        /// The rejected name.
        name: String,
    },
    /// Two commits share no common ancestor.
    #[error("no merge base between {a} and {b}")]
    NoBase {
        /// One commit hash.
        a: String,
        /// The other commit hash.
        b: String,
    },
    /// A merge produced unresolved conflicts; the target branch was not advanced.
    #[error("merge produced {} unresolved conflict(s)", conflicts.len())]
    MergeConflictError {
        /// The full conflict list, for the caller to present or resolve.
        conflicts: Vec<MergeConflict>,
    },
    /// A merge required a fast-forward but the caller forbade one.
    #[error("fast-forward required")]
    FastForwardRequired,
    /// The branches already point at compatible history; nothing to do.
    #[error("already up to date")]
    AlreadyUpToDate,
    /// A `CUSTOM` aggregation named a rule id with no registered aggregator.
    #[error("unknown aggregator: {rule_id}")]
    AggregatorUnknown {
        /// The unresolved rule id.
        rule_id: String,
    },
    /// A registered aggregator ran but failed.
    #[error("aggregator {rule_id} failed: {reason}")]
    AggregatorFailed {
        /// The rule id that failed.
        rule_id: String,
        /// Why it failed.
        reason: String,
    },
    /// The underlying storage medium returned an I/O error.
    #[error("store I/O error: {cause}")]
    StoreIo {
        /// The underlying cause, stringified (the adapter owns the real error).
        cause: String,
    },
    /// A stored object failed to deserialize or its hash no longer matches its bytes.
    #[error("store corrupted at {hash}")]
    StoreCorrupted {
        /// The hash whose backing bytes are inconsistent.
        hash: String,
    },
}

/// Convenience alias used throughout the core.
pub type CoreResult<T> = Result<T, CoreError>;
