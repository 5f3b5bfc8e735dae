//! C5 — the event algebra: component resolution, composite depth, formula
//! derivation, generic traversal, and passive pattern observation (spec
//! section 4.4).

pub mod formula;
pub mod observer;
pub mod resolve;
pub mod visitor;

pub use formula::render_formula;
pub use observer::{Occurrence, PatternObserver};
pub use resolve::{depth, resolve_component, AlgebraConfig};
pub use visitor::{traverse, LazyEventWalk, TraversalConfig, TraversalReport, VisitHooks};
