//! Relationship edges between entities

use super::entity::Properties;
use crate::temporal::TemporalMetadata;
use serde::{Deserialize, Serialize};

/// Relationship linking successive observations of the same metric
pub const METRIC_EVOLVED: &str = "METRIC_EVOLVED";

/// Relationship linking events that happened on the same day
pub const TEMPORALLY_CORRELATED: &str = "TEMPORALLY_CORRELATED";

/// Properties attached to an edge.
///
/// Temporal annotations are merged here by the temporal enhancer; anything
/// else the context parser produced lands in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporal: Option<TemporalMetadata>,
    /// Step-function confidence derived from the edge's age
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporal_confidence: Option<f64>,
    /// Weight before temporal discounting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_weight: Option<f64>,
    /// Causal lag mentioned in the relationship context, in days
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lag_days: Option<u32>,
    #[serde(flatten)]
    pub extra: Properties,
}

/// A directed relationship between two named entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Source entity name
    #[serde(alias = "src_id", alias = "entity1")]
    pub source: String,
    /// Target entity name
    #[serde(alias = "tgt_id", alias = "entity2")]
    pub target: String,
    /// Relationship label (e.g., "DEPENDS_ON", "LOCATED_IN")
    #[serde(default = "default_relationship", alias = "relation", alias = "keywords")]
    pub relationship: String,
    /// Relationship strength, if the parser produced one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default)]
    pub properties: EdgeProperties,
}

fn default_relationship() -> String {
    "RELATED_TO".to_string()
}

impl Edge {
    /// Create a new edge
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        relationship: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relationship: relationship.into(),
            weight: None,
            properties: EdgeProperties::default(),
        }
    }

    /// Set the edge weight
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Whether this edge links the same endpoints with the same relationship
    pub fn same_link(&self, source: &str, target: &str, relationship: &str) -> bool {
        self.source == source && self.target == target && self.relationship == relationship
    }
}
