//! Entity representation for parsed query context

use crate::temporal::TemporalMetadata;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Typed property values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Array(Vec<PropertyValue>),
    Object(HashMap<String, PropertyValue>),
}

impl PropertyValue {
    /// Borrow the inner string, if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        PropertyValue::Int(n)
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        PropertyValue::Float(n)
    }
}

/// Properties collection
pub type Properties = HashMap<String, PropertyValue>;

/// Entity type used for financial metrics (revenue, margin, ...)
pub const METRIC_TYPE: &str = "METRIC";

/// Entity type used for dated events (earnings call, export ban, ...)
pub const EVENT_TYPE: &str = "EVENT";

/// Entity metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityMetadata {
    /// Extractor confidence (0.0 - 1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Where the entity was extracted from (document id, chunk id, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Temporal annotation, attached by the temporal enhancer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporal: Option<TemporalMetadata>,
}

/// A named entity (company, risk, metric, event, ...) from the parsed context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Display name, also the identity used by relationships and paths
    #[serde(alias = "entity_name")]
    pub name: String,
    /// Entity type (e.g., "COMPANY", "METRIC", "EVENT")
    #[serde(default = "default_entity_type", alias = "type")]
    pub entity_type: String,
    /// Domain-specific properties
    #[serde(default)]
    pub properties: Properties,
    /// Entity metadata
    #[serde(default)]
    pub metadata: EntityMetadata,
}

fn default_entity_type() -> String {
    "UNKNOWN".to_string()
}

impl Entity {
    /// Create a new entity with the given name and type
    pub fn new(name: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entity_type: entity_type.into(),
            properties: HashMap::new(),
            metadata: EntityMetadata::default(),
        }
    }

    /// Add a property to the entity
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Set the extraction source
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.metadata.source = Some(source.into());
        self
    }

    /// Whether this entity has the given type (case-insensitive)
    pub fn is_type(&self, entity_type: &str) -> bool {
        self.entity_type.eq_ignore_ascii_case(entity_type)
    }

    /// Metric family used to link successive observations of the same metric.
    ///
    /// Falls back to the entity name when no `metric_type` property is set.
    pub fn metric_type(&self) -> &str {
        self.properties
            .get("metric_type")
            .and_then(PropertyValue::as_str)
            .unwrap_or(&self.name)
    }

    /// The temporal annotation, if the entity has been enhanced
    pub fn temporal(&self) -> Option<&TemporalMetadata> {
        self.metadata.temporal.as_ref()
    }
}
