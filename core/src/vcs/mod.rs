//! C6 — version control: branches, commits, merge-base discovery, conflict
//! detection and resolution strategies, and the three-way merge that ties
//! them together (spec section 4.5).

pub mod branch;
pub mod commit;
pub mod conflict;
pub mod merge;
pub mod merge_base;
pub mod strategy;

pub use branch::{create, current, delete, list, rename, switch};
pub use commit::{commit, head_commit};
pub use conflict::{ConflictKind, MergeConflict, MergeOutcome, ResolutionLogEntry, ResolutionMethod, Severity, SuggestedResolution};
pub use merge::{three_way_merge, MergeOptions, MergeStrategy};
pub use merge_base::{is_ancestor, merge_base};
pub use strategy::{default_pipeline, resolve, ConflictResolutionBias, ResolutionStrategy, StrategyContext};
