//! Ingestion manifest persistence and deduplication

mod common;

use common::TICKERS;
use ice::manifest::{
    CandidateDocument, DocumentMetadata, IngestionManifest, BACKUP_FILE_NAME, MANIFEST_FILE_NAME,
};
use ice::{compute_content_hash, get_document_id};
use std::fs;
use tempfile::TempDir;

fn tickers(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn round_trip_through_disk() {
    let dir = TempDir::new().unwrap();
    let content = "Subject: NVDA raises guidance\n\nData-center revenue beat.";

    let mut manifest = IngestionManifest::open(dir.path());
    let doc_id = get_document_id("email", "msg-001");
    let stored = manifest.add_document(
        &doc_id,
        content,
        DocumentMetadata::default()
            .with_ticker("NVDA")
            .with_email_date("2024-05-22")
            .with_relevance(0.9)
            .with_extra("sender", "broker@example.com"),
    );
    assert_eq!(stored.source_type, "email");
    assert_eq!(stored.content_hash, compute_content_hash(content));
    manifest.save().unwrap();

    let reloaded = IngestionManifest::open(dir.path());
    assert!(reloaded.is_document_ingested(&doc_id));
    assert!(reloaded.is_content_duplicate(content));
    assert!(!reloaded.is_content_duplicate("Subject: NVDA cuts guidance"));

    let doc = reloaded.document(&doc_id).unwrap();
    assert_eq!(doc.ticker.as_deref(), Some("NVDA"));
    assert_eq!(doc.email_date.as_deref(), Some("2024-05-22"));
    assert_eq!(doc.portfolio_relevance, Some(0.9));
    assert_eq!(doc.metadata["sender"], "broker@example.com");
}

#[test]
fn identical_content_under_two_ids() {
    let dir = TempDir::new().unwrap();
    let mut manifest = IngestionManifest::open(dir.path());

    manifest.add_document("email:fwd-1", "same newsletter", DocumentMetadata::default());
    assert!(manifest.is_content_duplicate("same newsletter"));
    manifest.add_document("email:fwd-2", "same newsletter", DocumentMetadata::default());

    assert!(manifest.is_document_ingested(&get_document_id("email", "fwd-1")));
    assert!(manifest.is_document_ingested(&get_document_id("email", "fwd-2")));
    assert_eq!(manifest.statistics().total_documents, 2);
}

#[test]
fn incremental_ingestion_batches() {
    let dir = TempDir::new().unwrap();
    let mut manifest = IngestionManifest::open(dir.path());

    let batch1 = vec![
        CandidateDocument::new("api", "NVDA-news-1", "NVIDIA news one"),
        CandidateDocument::new("api", "TSM-news-1", "TSMC news one"),
    ];
    for doc in manifest.get_new_documents(&batch1).into_iter().cloned().collect::<Vec<_>>() {
        manifest.add_document(&doc.doc_id(), &doc.content, DocumentMetadata::default());
    }
    manifest.save().unwrap();

    let mut manifest = IngestionManifest::open(dir.path());
    let batch2 = vec![
        CandidateDocument::new("api", "NVDA-news-1", "NVIDIA news one"),
        CandidateDocument::new("api", "TSM-news-1", "TSMC news one, corrected"),
        CandidateDocument::new("api", "AMD-news-1", "AMD news one"),
    ];

    let new: Vec<String> = manifest.get_new_documents(&batch2).iter().map(|c| c.doc_id()).collect();
    let updated: Vec<String> = manifest.get_updated_documents(&batch2).iter().map(|c| c.doc_id()).collect();

    assert_eq!(new, vec!["api:AMD-news-1"]);
    assert_eq!(updated, vec!["api:TSM-news-1"]);
}

#[test]
fn backup_survives_corruption() {
    let dir = TempDir::new().unwrap();
    let mut manifest = IngestionManifest::open(dir.path());
    manifest.update_portfolio(&tickers(&TICKERS));
    manifest.save().unwrap();
    manifest.add_document("news:n1", "headline", DocumentMetadata::default());
    manifest.save().unwrap();

    // The backup holds the state before the last save
    fs::write(dir.path().join(MANIFEST_FILE_NAME), "").unwrap();
    let recovered = IngestionManifest::open(dir.path());

    assert!(dir.path().join(BACKUP_FILE_NAME).exists());
    assert_eq!(recovered.latest_portfolio().unwrap().holdings, tickers(&TICKERS));
    assert!(!recovered.is_document_ingested("news:n1"));
}

#[test]
fn missing_directory_starts_empty_and_save_creates_it() {
    let dir = TempDir::new().unwrap();
    let storage = dir.path().join("nested").join("ice");

    let mut manifest = IngestionManifest::open(&storage);
    assert!(manifest.is_empty());

    manifest.save().unwrap();
    assert!(storage.join(MANIFEST_FILE_NAME).exists());
}

#[test]
fn save_into_unwritable_location_reports_error() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("file");
    fs::write(&blocker, "not a directory").unwrap();

    let mut manifest = IngestionManifest::open(blocker.join("ice"));
    assert!(manifest.save().is_err());
}

#[test]
fn portfolio_first_delta() {
    let dir = TempDir::new().unwrap();
    let manifest = IngestionManifest::open(dir.path());

    let delta = manifest.get_portfolio_delta(&tickers(&["NVDA", "AAPL"]));
    assert_eq!(delta.added, tickers(&["NVDA", "AAPL"]));
    assert!(delta.removed.is_empty());
    assert!(delta.kept.is_empty());
    assert!(delta.is_first);
}

#[test]
fn portfolio_history_persists() {
    let dir = TempDir::new().unwrap();
    let mut manifest = IngestionManifest::open(dir.path());
    manifest.update_portfolio(&tickers(&["NVDA", "AAPL"]));
    manifest.update_portfolio(&tickers(&["NVDA", "TSM"]));
    manifest.save().unwrap();

    let reloaded = IngestionManifest::open(dir.path());
    assert_eq!(reloaded.portfolio_history().len(), 2);

    let delta = reloaded.get_portfolio_delta(&tickers(&["TSM", "AMD"]));
    assert_eq!(delta.added, tickers(&["AMD"]));
    assert_eq!(delta.removed, tickers(&["NVDA"]));
    assert_eq!(delta.kept, tickers(&["TSM"]));
    assert!(!delta.is_first);
}

#[test]
fn api_coverage_records_several_data_types_at_once() {
    let dir = TempDir::new().unwrap();
    let mut manifest = IngestionManifest::open(dir.path());
    manifest.update_api_coverage("NVDA", [("news", 3), ("quotes", 2)]);
    manifest.save().unwrap();

    let reloaded = IngestionManifest::open(dir.path());
    let coverage = reloaded.api_coverage("NVDA").unwrap();
    assert_eq!(coverage.get("news"), Some(&3));
    assert_eq!(coverage.get("quotes"), Some(&2));
    assert_eq!(reloaded.statistics().unique_tickers, tickers(&["NVDA"]));
}

#[test]
fn manifest_with_offsetless_timestamps_loads() {
    let dir = TempDir::new().unwrap();
    let hash = compute_content_hash("Broker note on TSMC capacity");
    let stored = format!(
        r#"{{
  "version": "2.0",
  "created_at": "2024-04-01T09:30:00.250000",
  "last_updated": "2024-04-02T18:00:00",
  "documents": {{
    "email:note-7": {{
      "ingested_at": "2024-04-01T09:31:00.000001",
      "content_hash": "{hash}",
      "source_type": "email",
      "metadata": {{"ticker": "TSM"}}
    }}
  }},
  "portfolio_history": [],
  "api_data_coverage": {{}},
  "statistics": {{"total_documents": 1, "email_count": 1, "unique_tickers": []}}
}}"#
    );
    fs::write(dir.path().join(MANIFEST_FILE_NAME), stored).unwrap();

    let mut manifest = IngestionManifest::open(dir.path());
    assert_eq!(manifest.len(), 1);
    assert!(manifest.is_document_ingested("email:note-7"));
    assert!(manifest.is_content_duplicate("Broker note on TSMC capacity"));

    manifest.save().unwrap();
    manifest.save().unwrap();
    let reloaded = IngestionManifest::open(dir.path());
    assert!(reloaded.is_document_ingested("email:note-7"));
    assert!(fs::read_to_string(dir.path().join(BACKUP_FILE_NAME)).unwrap().contains("email:note-7"));
}
