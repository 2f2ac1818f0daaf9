//! Entities and relationships of the parsed query context

mod edge;
mod entity;


pub use edge::{Edge, EdgeProperties, METRIC_EVOLVED, TEMPORALLY_CORRELATED};
pub use entity::{Entity, EntityMetadata, Properties, PropertyValue, EVENT_TYPE, METRIC_TYPE};
