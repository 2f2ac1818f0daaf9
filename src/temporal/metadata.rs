//! Temporal metadata and the freshness scales

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Half-life of the continuous freshness score
pub const DEFAULT_HALF_LIFE_DAYS: f64 = 30.0;

/// Freshness bucket by age in days
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    VeryFresh,
    Fresh,
    Moderate,
    Stale,
    VeryStale,
}

impl Freshness {
    /// Bucket an age: ≤7, ≤30, ≤90, ≤365 days, older
    pub fn from_age_days(age_days: i64) -> Self {
        match age_days {
            d if d <= 7 => Freshness::VeryFresh,
            d if d <= 30 => Freshness::Fresh,
            d if d <= 90 => Freshness::Moderate,
            d if d <= 365 => Freshness::Stale,
            _ => Freshness::VeryStale,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Freshness::VeryFresh => "very_fresh",
            Freshness::Fresh => "fresh",
            Freshness::Moderate => "moderate",
            Freshness::Stale => "stale",
            Freshness::VeryStale => "very_stale",
        }
    }
}

impl std::fmt::Display for Freshness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fiscal reporting period
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReportingPeriod {
    /// 1 - 4
    pub quarter: u8,
    pub year: i32,
}

impl std::fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Q{} {}", self.quarter, self.year)
    }
}

/// Temporal annotation attached to an entity or merged into an edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalMetadata {
    pub valid_from: DateTime<Utc>,
    /// `None` means currently valid
    #[serde(default)]
    pub valid_to: Option<DateTime<Utc>>,
    /// Reference time the age was measured against
    pub observed_at: DateTime<Utc>,
    pub age_days: i64,
    pub freshness: Freshness,
    pub freshness_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_period: Option<ReportingPeriod>,
}

impl TemporalMetadata {
    /// Whether the annotated fact is still valid at `at`
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        at >= self.valid_from && self.valid_to.map_or(true, |end| at < end)
    }
}

/// Exponential decay with the given half-life: `0.5 ^ (age / half_life)`
pub fn decay_score(age_days: i64, half_life_days: f64) -> f64 {
    0.5_f64.powf(age_days as f64 / half_life_days)
}

/// Continuous freshness with a 30-day half-life
pub fn freshness_score(age_days: i64) -> f64 {
    decay_score(age_days, DEFAULT_HALF_LIFE_DAYS)
}

/// Coarse confidence step used to discount edge weights by age
pub fn temporal_confidence(age_days: i64) -> f64 {
    match age_days {
        d if d <= 7 => 1.0,
        d if d <= 30 => 0.9,
        d if d <= 90 => 0.7,
        d if d <= 365 => 0.5,
        _ => 0.3,
    }
}
