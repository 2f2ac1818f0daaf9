use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One ingested document.
///
/// Entries are replaced, never edited, when a document is re-added with
/// changed content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestDocument {
    /// `"{source_type}:{identifier}"`, also the key of the entry in the file
    #[serde(default)]
    pub doc_id: String,
    /// SHA-256 hex digest of the UTF-8 content
    pub content_hash: String,
    pub source_type: String,
    pub ingested_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio_relevance: Option<f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// Optional attributes recorded alongside a document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentMetadata {
    /// Overrides the source type taken from the doc_id prefix
    pub source_type: Option<String>,
    pub ticker: Option<String>,
    pub email_date: Option<String>,
    pub portfolio_relevance: Option<f64>,
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl DocumentMetadata {
    pub fn with_source_type(mut self, source_type: impl Into<String>) -> Self {
        self.source_type = Some(source_type.into());
        self
    }

    pub fn with_ticker(mut self, ticker: impl Into<String>) -> Self {
        self.ticker = Some(ticker.into());
        self
    }

    pub fn with_email_date(mut self, date: impl Into<String>) -> Self {
        self.email_date = Some(date.into());
        self
    }

    pub fn with_relevance(mut self, relevance: f64) -> Self {
        self.portfolio_relevance = Some(relevance);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// A document offered for ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDocument {
    pub source_type: String,
    #[serde(alias = "id")]
    pub identifier: String,
    pub content: String,
}

impl CandidateDocument {
    pub fn new(source_type: impl Into<String>, identifier: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source_type: source_type.into(),
            identifier: identifier.into(),
            content: content.into(),
        }
    }

    pub fn doc_id(&self) -> String {
        super::get_document_id(&self.source_type, &self.identifier)
    }

    pub fn content_hash(&self) -> String {
        super::compute_content_hash(&self.content)
    }
}

/// Aggregate counts over the manifest, recomputed on every change
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestStatistics {
    #[serde(default)]
    pub total_documents: usize,
    #[serde(default)]
    pub by_source_type: BTreeMap<String, usize>,
    #[serde(default)]
    pub tickers_covered: usize,
    #[serde(default)]
    pub unique_tickers: Vec<String>,
    #[serde(default)]
    pub portfolio_snapshots: usize,
    #[serde(default)]
    pub last_ingestion: Option<DateTime<Utc>>,
}
