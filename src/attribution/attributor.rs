//! Hop and path scoring

use super::round2;
use super::types::{AttributedHop, AttributedPath};
use crate::context::{CausalPathHop, Chunk, ParsedContext, SourceType};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Scoring parameters for path attribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributionConfig {
    /// Confidence of a hop no chunk supports ("inferred, not evidenced")
    #[serde(default = "default_unsupported_hop_confidence")]
    pub unsupported_hop_confidence: f64,

    /// Confidence of a path with no hops at all
    #[serde(default = "default_empty_path_confidence")]
    pub empty_path_confidence: f64,

    /// Boost per additional supporting chunk
    #[serde(default = "default_redundancy_step")]
    pub redundancy_step: f64,

    /// Upper bound of the redundancy boost
    #[serde(default = "default_redundancy_cap")]
    pub redundancy_cap: f64,
}

fn default_unsupported_hop_confidence() -> f64 { 0.40 }
fn default_empty_path_confidence() -> f64 { 0.50 }
fn default_redundancy_step() -> f64 { 0.05 }
fn default_redundancy_cap() -> f64 { 0.15 }

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            unsupported_hop_confidence: default_unsupported_hop_confidence(),
            empty_path_confidence: default_empty_path_confidence(),
            redundancy_step: default_redundancy_step(),
            redundancy_cap: default_redundancy_cap(),
        }
    }
}

/// Attributes causal paths to the chunks of a parsed context
#[derive(Debug, Clone, Default)]
pub struct PathAttributor {
    config: AttributionConfig,
}

impl PathAttributor {
    pub fn new(config: AttributionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AttributionConfig {
        &self.config
    }

    /// Attribute every path, in order
    pub fn attribute_paths(
        &self,
        causal_paths: &[Vec<CausalPathHop>],
        context: &ParsedContext,
    ) -> Vec<AttributedPath> {
        let paths: Vec<AttributedPath> = causal_paths
            .iter()
            .enumerate()
            .map(|(i, hops)| self.attribute_path(format!("path_{}", i + 1), hops, &context.chunks))
            .collect();

        debug!(
            "attributed {} paths against {} chunks",
            paths.len(),
            context.chunks.len()
        );
        paths
    }

    /// Attribute a single path
    pub fn attribute_path(&self, path_id: impl Into<String>, hops: &[CausalPathHop], chunks: &[Chunk]) -> AttributedPath {
        let attributed: Vec<AttributedHop> = hops
            .iter()
            .enumerate()
            .map(|(i, hop)| self.attribute_hop(i + 1, hop, chunks))
            .collect();

        // Weakest link: exactly the lowest hop, never rounded above it
        let overall_confidence = attributed
            .iter()
            .map(|h| h.confidence)
            .reduce(f64::min)
            .unwrap_or(self.config.empty_path_confidence);

        AttributedPath {
            path_id: path_id.into(),
            path_length: hops.len(),
            path_description: describe_path(hops),
            hops: attributed,
            overall_confidence,
        }
    }

    fn attribute_hop(&self, hop_number: usize, hop: &CausalPathHop, chunks: &[Chunk]) -> AttributedHop {
        let supporting: Vec<&Chunk> = chunks
            .iter()
            .filter(|c| c.mentions_both(&hop.entity1, &hop.entity2))
            .collect();

        let mut sources: Vec<SourceType> = Vec::new();
        for chunk in &supporting {
            if !sources.contains(&chunk.source_type) {
                sources.push(chunk.source_type);
            }
        }

        AttributedHop {
            hop_number,
            relationship: format!("{} -[{}]-> {}", hop.entity1, hop.relation, hop.entity2),
            entity1: hop.entity1.clone(),
            relation: hop.relation.clone(),
            entity2: hop.entity2.clone(),
            confidence: self.hop_confidence(&supporting),
            date: supporting.iter().filter_map(|c| c.date).max(),
            sources,
            supporting_chunks: supporting.into_iter().cloned().collect(),
        }
    }

    /// Confidence of a hop given the chunks supporting it.
    ///
    /// - none: the fixed "inferred" confidence
    /// - one: that chunk's confidence, unmodified
    /// - several: their average plus a capped redundancy boost, at most 1.0
    pub fn hop_confidence(&self, supporting: &[&Chunk]) -> f64 {
        match supporting {
            [] => self.config.unsupported_hop_confidence,
            [only] => only.confidence,
            many => {
                let n = many.len() as f64;
                let average = many.iter().map(|c| c.confidence).sum::<f64>() / n;
                let boost = (self.config.redundancy_step * (n - 1.0)).min(self.config.redundancy_cap);
                round2((average + boost).min(1.0))
            }
        }
    }
}

/// Attribute paths with the default scoring parameters
pub fn attribute_paths(causal_paths: &[Vec<CausalPathHop>], context: &ParsedContext) -> Vec<AttributedPath> {
    PathAttributor::default().attribute_paths(causal_paths, context)
}

/// Entities along a path in visiting order, each listed once, joined with ` → `
pub fn describe_path(hops: &[CausalPathHop]) -> String {
    let mut entities: Vec<&str> = Vec::new();
    for hop in hops {
        for name in [hop.entity1.as_str(), hop.entity2.as_str()] {
            if !entities.contains(&name) {
                entities.push(name);
            }
        }
    }
    entities.join(" → ")
}
