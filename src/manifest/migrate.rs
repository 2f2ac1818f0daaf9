//! Schema upgrades applied to manifest JSON before it is deserialized
//!
//! Every load runs through `migrate`, whatever the stored version. Document
//! entries are keyed by doc_id and need not repeat it, timestamps may lack an
//! offset (read as UTC), and `statistics` is dropped because it is recomputed
//! from the documents.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{json, Map, Value};
use tracing::{info, warn};

/// Schema version written by this crate
pub const CURRENT_VERSION: u32 = 2;

/// Bring a parsed manifest up to `CURRENT_VERSION`
pub(crate) fn migrate(mut value: Value) -> Value {
    let version = schema_version(&value);
    if let Some(root) = value.as_object_mut() {
        if version < CURRENT_VERSION {
            info!("migrating manifest from schema v{} to v{}", version, CURRENT_VERSION);
        }
        migrate_add_temporal_fields(root);
        root.insert("version".to_string(), json!(CURRENT_VERSION));
    }
    value
}

/// Version 1 files carry a string version ("1.0") or none at all
fn schema_version(value: &Value) -> u32 {
    match value.get("version") {
        Some(Value::Number(n)) => n.as_u64().map(|v| v as u32).unwrap_or(1),
        Some(Value::String(s)) => s
            .split('.')
            .next()
            .and_then(|major| major.parse().ok())
            .unwrap_or(1),
        _ => 1,
    }
}

/// RFC 3339 form of a stored timestamp.
///
/// Accepts RFC 3339, offset-less ISO date-times (read as UTC) and bare dates
/// (midnight UTC).
pub(crate) fn normalize_timestamp(value: &Value) -> Option<String> {
    let s = value.as_str()?.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).to_rfc3339());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc().to_rfc3339());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().to_rfc3339())
}

/// Fill timestamps, containers and per-document fields the current schema requires
fn migrate_add_temporal_fields(root: &mut Map<String, Value>) {
    let created_at = root
        .get("created_at")
        .and_then(normalize_timestamp)
        .unwrap_or_else(|| Utc::now().to_rfc3339());
    let last_updated = root
        .get("last_updated")
        .and_then(normalize_timestamp)
        .unwrap_or_else(|| created_at.clone());

    root.insert("created_at".to_string(), json!(created_at));
    root.insert("last_updated".to_string(), json!(last_updated));
    root.remove("statistics");
    for (key, empty) in [
        ("documents", json!({})),
        ("portfolio_history", json!([])),
        ("api_data_coverage", json!({})),
    ] {
        if root.get(key).map_or(true, Value::is_null) {
            root.insert(key.to_string(), empty);
        }
    }

    if let Some(Value::Object(documents)) = root.get_mut("documents") {
        documents.retain(|doc_id, doc| {
            let keep = doc.is_object();
            if !keep {
                warn!("dropping malformed manifest entry {}", doc_id);
            }
            keep
        });
        for (doc_id, doc) in documents.iter_mut() {
            let Some(doc) = doc.as_object_mut() else { continue };
            normalize_document(doc_id, doc, &created_at);
        }
    }

    if let Some(Value::Array(history)) = root.get_mut("portfolio_history") {
        for snapshot in history.iter_mut().filter_map(Value::as_object_mut) {
            let date = snapshot
                .get("date")
                .and_then(normalize_timestamp)
                .unwrap_or_else(|| created_at.clone());
            snapshot.insert("date".to_string(), json!(date));
            if snapshot.get("holdings").map_or(true, Value::is_null) {
                snapshot.insert("holdings".to_string(), json!([]));
            }
        }
    }
}

/// The map key is the authoritative doc_id
fn normalize_document(doc_id: &str, doc: &mut Map<String, Value>, created_at: &str) {
    doc.insert("doc_id".to_string(), json!(doc_id));

    if doc.get("source_type").map_or(true, |v| !v.is_string()) {
        let source_type = doc_id.split_once(':').map_or("unknown", |(prefix, _)| prefix);
        doc.insert("source_type".to_string(), json!(source_type));
    }

    let ingested_at = doc
        .get("ingested_at")
        .and_then(normalize_timestamp)
        .unwrap_or_else(|| created_at.to_string());
    doc.insert("ingested_at".to_string(), json!(ingested_at));

    if doc.get("metadata").is_some_and(|m| !m.is_object()) {
        doc.remove("metadata");
    }
    if doc.get("content_hash").map_or(true, |h| !h.is_string()) {
        doc.insert("content_hash".to_string(), json!(""));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v1_manifest_gains_missing_fields() {
        let v1 = json!({
            "version": "1.0",
            "created_at": "2024-01-02T03:04:05+00:00",
            "documents": {
                "email:msg-1": {"content_hash": "abc"}
            }
        });

        let migrated = migrate(v1);

        assert_eq!(migrated["version"], json!(2));
        assert_eq!(migrated["portfolio_history"], json!([]));
        assert_eq!(migrated["api_data_coverage"], json!({}));
        let doc = &migrated["documents"]["email:msg-1"];
        assert_eq!(doc["doc_id"], "email:msg-1");
        assert_eq!(doc["source_type"], "email");
        assert_eq!(doc["ingested_at"], "2024-01-02T03:04:05+00:00");
    }

    #[test]
    fn current_version_entries_are_keyed_by_doc_id() {
        let v2 = json!({
            "version": 2,
            "created_at": "2024-03-01T00:00:00+00:00",
            "last_updated": "2024-03-02T00:00:00+00:00",
            "documents": {
                "api:NVDA-1": {
                    "ingested_at": "2024-03-01T10:00:00+00:00",
                    "content_hash": "abc",
                    "source_type": "api",
                    "metadata": null
                }
            },
            "statistics": {"total_documents": 1, "unique_tickers": ["NVDA"]}
        });

        let migrated = migrate(v2);
        let doc = &migrated["documents"]["api:NVDA-1"];
        assert_eq!(doc["doc_id"], "api:NVDA-1");
        assert!(doc.get("metadata").is_none());
        assert!(migrated.get("statistics").is_none());
        assert_eq!(migrated["last_updated"], "2024-03-02T00:00:00+00:00");
    }

    #[test]
    fn naive_timestamps_are_read_as_utc() {
        assert_eq!(
            normalize_timestamp(&json!("2024-01-02T03:04:05.123456")).as_deref(),
            Some("2024-01-02T03:04:05.123456+00:00")
        );
        assert_eq!(
            normalize_timestamp(&json!("2024-01-02 03:04:05")).as_deref(),
            Some("2024-01-02T03:04:05+00:00")
        );
        assert_eq!(
            normalize_timestamp(&json!("2024-01-02")).as_deref(),
            Some("2024-01-02T00:00:00+00:00")
        );
        assert_eq!(normalize_timestamp(&json!("yesterday")), None);
        assert_eq!(normalize_timestamp(&json!(null)), None);
    }

    #[test]
    fn document_timestamps_are_repaired() {
        let v1 = json!({
            "created_at": "2024-01-02T03:04:05.123456",
            "documents": {
                "email:m1": {"content_hash": "abc", "ingested_at": "2024-01-03T08:00:00.5"},
                "email:m2": {"content_hash": "def", "ingested_at": "not a date"},
                "broken": "oops"
            },
            "portfolio_history": [{"date": "2024-01-02", "holdings": ["NVDA"]}]
        });

        let migrated = migrate(v1);
        let documents = migrated["documents"].as_object().unwrap();

        assert_eq!(documents.len(), 2);
        assert_eq!(migrated["created_at"], "2024-01-02T03:04:05.123456+00:00");
        assert_eq!(documents["email:m1"]["ingested_at"], "2024-01-03T08:00:00.500+00:00");
        assert_eq!(documents["email:m2"]["ingested_at"], migrated["created_at"]);
        assert_eq!(migrated["portfolio_history"][0]["date"], "2024-01-02T00:00:00+00:00");
    }

    #[test]
    fn missing_version_is_treated_as_v1() {
        assert_eq!(schema_version(&json!({})), 1);
        assert_eq!(schema_version(&json!({"version": "2.0"})), 2);
    }
}
