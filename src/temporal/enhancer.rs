//! Attaches temporal metadata to entities and edges

use super::metadata::{decay_score, temporal_confidence, Freshness, TemporalMetadata, DEFAULT_HALF_LIFE_DAYS};
use super::patterns::{extract_lag_days, extract_reporting_period, quarter_of_month};
use super::ReportingPeriod;
use crate::graph::{Edge, Entity};
use crate::outcome::Outcome;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Errors that prevent temporal annotation
#[derive(Debug, Error, PartialEq)]
pub enum TemporalError {
    #[error("Entity has an empty name")]
    EmptyEntityName,

    #[error("Source date {source_date} is after reference time {reference}")]
    FutureSourceDate {
        source_date: DateTime<Utc>,
        reference: DateTime<Utc>,
    },

    #[error("Edge weight is not a finite number: {0}")]
    NonFiniteWeight(f64),
}

/// Temporal enhancer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalConfig {
    /// Half-life of the continuous freshness score
    #[serde(default = "default_half_life_days")]
    pub half_life_days: f64,

    /// How far in the future a source date may lie (clock skew) before it is rejected
    #[serde(default = "default_future_tolerance_days")]
    pub future_tolerance_days: i64,
}

fn default_half_life_days() -> f64 { DEFAULT_HALF_LIFE_DAYS }
fn default_future_tolerance_days() -> i64 { 1 }

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            half_life_days: default_half_life_days(),
            future_tolerance_days: default_future_tolerance_days(),
        }
    }
}

/// Annotates entities and edges with freshness relative to a reference time
#[derive(Debug, Clone, Default)]
pub struct TemporalEnhancer {
    config: TemporalConfig,
    /// Fixed "now"; the wall clock is used when unset
    reference_time: Option<DateTime<Utc>>,
}

impl TemporalEnhancer {
    pub fn new(config: TemporalConfig) -> Self {
        Self {
            config,
            reference_time: None,
        }
    }

    /// Measure ages against a fixed instant instead of the wall clock
    pub fn with_reference_time(mut self, reference: DateTime<Utc>) -> Self {
        self.reference_time = Some(reference);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.reference_time.unwrap_or_else(Utc::now)
    }

    /// Compute the temporal annotation for something observed at `source_date`.
    ///
    /// The reporting period is read from `text` when it names one, otherwise
    /// it is inferred from the month of `source_date`.
    pub fn temporal_metadata(
        &self,
        source_date: DateTime<Utc>,
        text: Option<&str>,
    ) -> Result<TemporalMetadata, TemporalError> {
        let reference = self.now();
        let age_days = (reference - source_date).num_days();

        if age_days < -self.config.future_tolerance_days {
            return Err(TemporalError::FutureSourceDate {
                source_date,
                reference,
            });
        }
        // Small clock skew counts as "just observed"
        let age_days = age_days.max(0);

        let reporting_period = text
            .and_then(extract_reporting_period)
            .unwrap_or_else(|| ReportingPeriod {
                quarter: quarter_of_month(source_date.month()),
                year: source_date.year(),
            });

        Ok(TemporalMetadata {
            valid_from: source_date,
            valid_to: None,
            observed_at: reference,
            age_days,
            freshness: Freshness::from_age_days(age_days),
            freshness_score: decay_score(age_days, self.config.half_life_days),
            reporting_period: Some(reporting_period),
        })
    }

    /// Attach `metadata.temporal` to the entity. On error the entity is left untouched.
    pub fn try_enhance_entity(
        &self,
        entity: &mut Entity,
        source_date: DateTime<Utc>,
        context: Option<&str>,
    ) -> Result<(), TemporalError> {
        if entity.name.trim().is_empty() {
            return Err(TemporalError::EmptyEntityName);
        }
        let temporal = self.temporal_metadata(source_date, context)?;
        entity.metadata.temporal = Some(temporal);
        Ok(())
    }

    /// Annotate an entity, returning the original unmodified (and flagged) on failure
    pub fn enhance_entity(
        &self,
        mut entity: Entity,
        source_date: DateTime<Utc>,
        context: Option<&str>,
    ) -> Outcome<Entity> {
        match self.try_enhance_entity(&mut entity, source_date, context) {
            Ok(()) => Outcome::Complete(entity),
            Err(e) => {
                warn!("temporal enhancement skipped for entity '{}': {}", entity.name, e);
                Outcome::Degraded {
                    value: entity,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Annotate a batch of entities observed at the same date
    pub fn enhance_entities(
        &self,
        entities: Vec<Entity>,
        source_date: DateTime<Utc>,
        context: Option<&str>,
    ) -> Vec<Outcome<Entity>> {
        entities
            .into_iter()
            .map(|e| self.enhance_entity(e, source_date, context))
            .collect()
    }

    /// Merge temporal data into the edge properties and discount its weight by age.
    ///
    /// The discount is applied to the original weight, so enhancing the same
    /// edge twice does not compound. On error the edge is left untouched.
    pub fn try_enhance_edge(
        &self,
        edge: &mut Edge,
        source_date: DateTime<Utc>,
        relationship_context: Option<&str>,
    ) -> Result<(), TemporalError> {
        let base_weight = edge.properties.original_weight.or(edge.weight);
        if let Some(w) = base_weight {
            if !w.is_finite() {
                return Err(TemporalError::NonFiniteWeight(w));
            }
        }

        let temporal = self.temporal_metadata(source_date, relationship_context)?;
        let confidence = temporal_confidence(temporal.age_days);

        if let Some(w) = base_weight {
            edge.properties.original_weight = Some(w);
            edge.weight = Some(w * confidence);
        }
        edge.properties.temporal_confidence = Some(confidence);
        edge.properties.lag_days = relationship_context.and_then(extract_lag_days);
        edge.properties.temporal = Some(temporal);
        Ok(())
    }

    /// Annotate an edge, returning the original unmodified (and flagged) on failure
    pub fn enhance_edge(
        &self,
        mut edge: Edge,
        source_date: DateTime<Utc>,
        relationship_context: Option<&str>,
    ) -> Outcome<Edge> {
        match self.try_enhance_edge(&mut edge, source_date, relationship_context) {
            Ok(()) => Outcome::Complete(edge),
            Err(e) => {
                warn!(
                    "temporal enhancement skipped for edge {} -[{}]-> {}: {}",
                    edge.source, edge.relationship, edge.target, e
                );
                Outcome::Degraded {
                    value: edge,
                    reason: e.to_string(),
                }
            }
        }
    }
}
