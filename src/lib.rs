//! ICE: attribution core of the investment context engine
//!
//! Sits around an external graph-based RAG engine and turns its raw output
//! into answers a reader can check.
//!
//! # Core Concepts
//!
//! - **Attribution**: maps each hop of a causal path onto the retrieved chunks
//!   that mention both endpoints and scores the path by its weakest hop
//! - **Citations**: renders enriched sources inline, as footnotes or as a
//!   structured record
//! - **Temporal enhancement**: freshness, reporting period and age-discounted
//!   weights for entities and edges
//! - **Ingestion manifest**: content-hash keyed ledger of what has been
//!   inserted into the engine
//!
//! # Example
//!
//! ```
//! use ice::{attribute_paths, CausalPathHop, Chunk, ParsedContext, SourceType};
//!
//! let context = ParsedContext::from_chunks(vec![
//!     Chunk::new("c1", "NVIDIA depends on TSMC", SourceType::Filing, 0.9),
//! ]);
//! let paths = vec![vec![CausalPathHop::new("NVIDIA", "DEPENDS_ON", "TSMC")]];
//!
//! let attributed = attribute_paths(&paths, &context);
//! assert_eq!(attributed[0].overall_confidence, 0.9);
//! ```

pub mod api;
pub mod attribution;
pub mod cache;
pub mod citation;
pub mod config;
pub mod context;
pub mod graph;
pub mod manifest;
mod outcome;
pub mod temporal;

pub use api::IceApi;
pub use attribution::{attribute_paths, format_attributed_path, AttributedHop, AttributedPath, PathAttributor};
pub use cache::{CacheConfig, CacheStats, QueryCache};
pub use citation::{format_citations, CitationOutput, CitationStyle, EnrichedSource};
pub use config::{ConfigError, IceConfig};
pub use context::{CausalPathHop, Chunk, ParsedContext, SourceType};
pub use graph::{Edge, EdgeProperties, Entity, EntityMetadata, PropertyValue};
pub use manifest::{compute_content_hash, get_document_id, IngestionManifest, ManifestError, ManifestResult};
pub use outcome::Outcome;
pub use temporal::{create_temporal_edges, Freshness, TemporalEnhancer, TemporalMetadata};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
