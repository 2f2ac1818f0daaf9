//! Temporal annotation of entities and edges
//!
//! Information about companies goes stale. The enhancer records when a fact
//! was observed, how fresh it is, which reporting period it belongs to, and
//! discounts edge weights by age. It can also derive edges that only exist
//! because of timing: successive observations of a metric, and events that
//! happened on the same day.

mod edges;
mod enhancer;
mod metadata;
mod patterns;

pub use edges::create_temporal_edges;
pub use enhancer::{TemporalConfig, TemporalEnhancer, TemporalError};
pub use metadata::{
    decay_score, freshness_score, temporal_confidence, Freshness, ReportingPeriod, TemporalMetadata,
    DEFAULT_HALF_LIFE_DAYS,
};
pub use patterns::{extract_lag_days, extract_reporting_period, quarter_of_month};
