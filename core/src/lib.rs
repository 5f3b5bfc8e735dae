//! `veritaschain-core` — object model, confidence engine, event algebra, and
//! version control for VeritasChain, a content-addressed, version-controlled
//! store for structured propositions (facts and norms) with Git-like branch,
//! commit, and three-way-merge semantics.
//!
//! This crate is deliberately storage-agnostic: [`store`] defines the
//! [`store::ObjectStore`]/[`store::RefStore`]/[`store::TreeIndex`] seams and
//! everything else is built against them, never against a concrete backend.
//! The facade crate (`veritaschain`, the workspace root) supplies a
//! filesystem-backed implementation; tests here use in-memory ones.
//!
//! Module map, mirroring the components in spec section 4:
//! - [`id`] / [`hash`] — content hashes and logical ids (C1).
//! - [`model`] — entities, actions, statements, events, trees, commits,
//!   branches (C2).
//! - [`store`] — the storage seam (C3).
//! - [`confidence`] — the leaf formula, volatility, aggregation, and the
//!   commit-scoped cache (C4).
//! - [`algebra`] — component resolution, composite depth, formula
//!   rendering, generic traversal, and pattern observation (C5).
//! - [`vcs`] — branches, commits, merge-base, three-way merge, conflict
//!   detection and resolution (C6).
//! - [`migrate`] — legacy `MacroEvent` payload migration.
//! - [`error`] — the flat error taxonomy every other module returns.

pub mod algebra;
pub mod confidence;
pub mod error;
pub mod hash;
pub mod id;
pub mod migrate;
pub mod model;
pub mod store;
pub mod vcs;

pub use error::{CoreError, CoreResult};
pub use id::{ContentHash, LogicalId};
