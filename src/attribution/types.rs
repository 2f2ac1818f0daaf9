//! Attribution result structures

use crate::context::{Chunk, SourceType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Attribution of one hop of a causal path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributedHop {
    /// Position in the path, starting at 1
    pub hop_number: usize,
    /// Rendered relationship, e.g. `NVIDIA -[DEPENDS_ON]-> TSMC`
    pub relationship: String,
    pub entity1: String,
    pub relation: String,
    pub entity2: String,
    /// Chunks mentioning both endpoints
    pub supporting_chunks: Vec<Chunk>,
    pub confidence: f64,
    /// Distinct source types among supporters, in first-seen order
    pub sources: Vec<SourceType>,
    /// Most recent date among supporters
    pub date: Option<NaiveDate>,
}

impl AttributedHop {
    /// Whether no retrieved chunk evidences this hop
    pub fn is_inferred(&self) -> bool {
        self.supporting_chunks.is_empty()
    }

    /// Number of supporting chunks
    pub fn chunk_count(&self) -> usize {
        self.supporting_chunks.len()
    }
}

/// Attribution of a full causal path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributedPath {
    pub path_id: String,
    /// Number of hops
    pub path_length: usize,
    /// Entities along the path joined with ` → `
    pub path_description: String,
    pub hops: Vec<AttributedHop>,
    /// Minimum hop confidence; a path is only as strong as its weakest hop
    pub overall_confidence: f64,
}

impl AttributedPath {
    /// The hop with the lowest confidence (first one on ties)
    pub fn weakest_hop(&self) -> Option<&AttributedHop> {
        self.hops.iter().fold(None, |weakest: Option<&AttributedHop>, hop| match weakest {
            Some(w) if w.confidence <= hop.confidence => Some(w),
            _ => Some(hop),
        })
    }

    /// Whether every hop is backed by at least one chunk
    pub fn is_fully_evidenced(&self) -> bool {
        self.hops.iter().all(|h| !h.is_inferred())
    }
}
