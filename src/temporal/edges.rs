//! Edges derived from timing alone
//!
//! - `METRIC_EVOLVED`: links an observation of a metric to the observation of
//!   the same metric at the next distinct timestamp.
//! - `TEMPORALLY_CORRELATED`: symmetric edge pair between events on the same day.
//!
//! Only entities carrying temporal metadata take part. Idempotent: edges
//! already present in `existing_edges` are not emitted again, so repeated
//! runs reach quiescence. Pairing is quadratic within each time bucket.

use crate::graph::{Edge, Entity, PropertyValue, EVENT_TYPE, METRIC_EVOLVED, METRIC_TYPE, TEMPORALLY_CORRELATED};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;

/// Derive metric-evolution and same-day correlation edges
pub fn create_temporal_edges(entities: &[Entity], existing_edges: &[Edge]) -> Vec<Edge> {
    let mut emitted: Vec<Edge> = Vec::new();

    // Metrics grouped by observation timestamp, in time order
    let mut metrics: BTreeMap<DateTime<Utc>, Vec<&Entity>> = BTreeMap::new();
    for entity in entities.iter().filter(|e| e.is_type(METRIC_TYPE)) {
        if let Some(temporal) = entity.temporal() {
            metrics.entry(temporal.valid_from).or_default().push(entity);
        }
    }

    let buckets: Vec<(&DateTime<Utc>, &Vec<&Entity>)> = metrics.iter().collect();
    for window in buckets.windows(2) {
        let (earlier_at, earlier) = window[0];
        let (later_at, later) = window[1];
        let delta_days = (*later_at - *earlier_at).num_days();

        for a in earlier {
            for b in later {
                if a.metric_type() != b.metric_type() {
                    continue;
                }
                if !edge_exists(existing_edges, &emitted, &a.name, &b.name, METRIC_EVOLVED) {
                    let mut edge = Edge::new(a.name.clone(), b.name.clone(), METRIC_EVOLVED);
                    edge.properties
                        .extra
                        .insert("time_delta_days".to_string(), PropertyValue::Int(delta_days));
                    emitted.push(edge);
                }
            }
        }
    }

    // Events grouped by calendar day
    let mut events: BTreeMap<NaiveDate, Vec<&Entity>> = BTreeMap::new();
    for entity in entities.iter().filter(|e| e.is_type(EVENT_TYPE)) {
        if let Some(temporal) = entity.temporal() {
            events.entry(temporal.valid_from.date_naive()).or_default().push(entity);
        }
    }

    for (day, same_day) in &events {
        for i in 0..same_day.len() {
            for j in (i + 1)..same_day.len() {
                let (a, b) = (same_day[i], same_day[j]);
                if a.name == b.name {
                    continue;
                }
                for (from, to) in [(a, b), (b, a)] {
                    if !edge_exists(existing_edges, &emitted, &from.name, &to.name, TEMPORALLY_CORRELATED) {
                        let mut edge = Edge::new(from.name.clone(), to.name.clone(), TEMPORALLY_CORRELATED);
                        edge.properties
                            .extra
                            .insert("date".to_string(), PropertyValue::String(day.to_string()));
                        emitted.push(edge);
                    }
                }
            }
        }
    }

    emitted
}

fn edge_exists(existing: &[Edge], emitted: &[Edge], source: &str, target: &str, relationship: &str) -> bool {
    existing
        .iter()
        .chain(emitted.iter())
        .any(|e| e.same_link(source, target, relationship))
}
