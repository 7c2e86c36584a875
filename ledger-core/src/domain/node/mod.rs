//! Node health tracking and per-attempt node selection.

pub mod backoff;
pub mod selection;

pub use backoff::{NodeBackoff, NodeBackoffConfig};
pub use selection::{select_node, NodeHealth};
