//! Boundary parsing of attributor input
//!
//! The RAG engine and the context parser use more than one key naming for
//! the same field (`entity1` / `source`, `relation` / `description`, ...).
//! Aliases are resolved here, once, into canonical structs.

use super::chunk::Chunk;
use crate::graph::{Edge, Entity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while parsing attributor input
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Malformed input JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One edge of a causal reasoning path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CausalPathHop {
    #[serde(alias = "source")]
    pub entity1: String,
    #[serde(default, alias = "description")]
    pub relation: String,
    #[serde(alias = "target")]
    pub entity2: String,
}

impl CausalPathHop {
    pub fn new(entity1: impl Into<String>, relation: impl Into<String>, entity2: impl Into<String>) -> Self {
        Self {
            entity1: entity1.into(),
            relation: relation.into(),
            entity2: entity2.into(),
        }
    }
}

/// Entities, relationships and chunks retrieved for one query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedContext {
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub relationships: Vec<Edge>,
    #[serde(default)]
    pub chunks: Vec<Chunk>,
}

impl ParsedContext {
    /// Create a context holding only chunks
    pub fn from_chunks(chunks: Vec<Chunk>) -> Self {
        Self {
            chunks,
            ..Default::default()
        }
    }

    /// Parse a context bundle from JSON text
    pub fn from_json(json: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Look up an entity by name (case-insensitive)
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }
}

/// Full attribution request: causal paths plus the context they refer to
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributionInput {
    #[serde(default, alias = "causal_paths")]
    pub paths: Vec<Vec<CausalPathHop>>,
    #[serde(default, alias = "parsed_context")]
    pub context: ParsedContext,
}

impl AttributionInput {
    /// Parse an attribution request from JSON text
    pub fn from_json(json: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse an attribution request from a file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, InputError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

/// Parse causal paths (a JSON list of lists of hops).
///
/// A hop missing either endpoint is rejected here, before attribution.
pub fn parse_causal_paths(json: &str) -> Result<Vec<Vec<CausalPathHop>>, InputError> {
    Ok(serde_json::from_str(json)?)
}
