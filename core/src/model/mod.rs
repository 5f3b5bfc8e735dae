//! C2 — the object model: entities, actions, statements, events, trees,
//! commits, and branches, plus the invariants in spec section 3.

mod action;
mod branch;
mod commit;
mod entity;
mod event;
mod modifiers;
mod relationship;
mod statement;
mod tree;

pub use action::{Action, Modality};
pub use branch::{validate_branch_name, Branch, DEFAULT_BRANCH};
pub use commit::{ChangeSet, Commit};
pub use entity::Entity;
pub use event::{
    Aggregation, ComponentRef, DerivedFields, Event, EventKind, EventMetadata, Source,
    TimelineSpan,
};
pub use modifiers::{
    CertaintyModifier, Evidence, LegalModifier, Modifiers, NormForce, Reliability,
    SpatialModifier, TemporalModifier,
};
pub use relationship::{Relationship, RelationshipKind};
pub use statement::{Arity, Operator, Statement};
pub use tree::Tree;

/// Which per-kind sub-store an object lives in. Used by error reporting and
/// by the store/tree partitioning described in section 3.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Entities sub-store.
    Entity,
    /// Actions sub-store.
    Action,
    /// Events sub-store.
    Event,
    /// Commits sub-store.
    Commit,
    /// Trees sub-store.
    Tree,
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ObjectKind::Entity => "entity",
            ObjectKind::Action => "action",
            ObjectKind::Event => "event",
            ObjectKind::Commit => "commit",
            ObjectKind::Tree => "tree",
        };
        write!(f, "{s}")
    }
}
