//! Graph path attribution
//!
//! Maps multi-hop causal paths produced by the external graph RAG engine onto
//! the chunks retrieved for the same query, scoring each hop by the evidence
//! behind it and each path by its weakest hop.

mod attributor;
mod render;
mod types;

pub use attributor::{attribute_paths, describe_path, AttributionConfig, PathAttributor};
pub use render::format_attributed_path;
pub use types::{AttributedHop, AttributedPath};

/// Round to two decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
