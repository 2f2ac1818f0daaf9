use super::document::{CandidateDocument, DocumentMetadata, ManifestDocument, ManifestStatistics};
use super::error::ManifestResult;
use super::migrate::{migrate, CURRENT_VERSION};
use super::portfolio::{PortfolioDelta, PortfolioSnapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// File name of the manifest inside the storage directory
pub const MANIFEST_FILE_NAME: &str = ".ingestion_manifest.json";

/// File name of the previous manifest version
pub const BACKUP_FILE_NAME: &str = ".ingestion_manifest.json.bak";

/// SHA-256 hex digest of the UTF-8 bytes of `content`
pub fn compute_content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// `"{source_type}:{identifier}"`
pub fn get_document_id(source_type: impl Display, identifier: impl Display) -> String {
    format!("{}:{}", source_type, identifier)
}

/// Deduplication ledger of everything inserted into the retrieval engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionManifest {
    #[serde(skip)]
    path: PathBuf,

    version: u32,
    created_at: DateTime<Utc>,
    last_updated: DateTime<Utc>,
    #[serde(default)]
    documents: BTreeMap<String, ManifestDocument>,
    #[serde(default)]
    portfolio_history: Vec<PortfolioSnapshot>,
    /// ticker -> data type -> records fetched
    #[serde(default)]
    api_data_coverage: BTreeMap<String, BTreeMap<String, u64>>,
    #[serde(default)]
    statistics: ManifestStatistics,
}

impl IngestionManifest {
    /// An empty manifest that will be saved under `storage_dir`
    pub fn empty(storage_dir: impl AsRef<Path>) -> Self {
        let now = Utc::now();
        Self {
            path: storage_dir.as_ref().join(MANIFEST_FILE_NAME),
            version: CURRENT_VERSION,
            created_at: now,
            last_updated: now,
            documents: BTreeMap::new(),
            portfolio_history: Vec::new(),
            api_data_coverage: BTreeMap::new(),
            statistics: ManifestStatistics::default(),
        }
    }

    /// Load the manifest from `storage_dir`.
    ///
    /// Never fails: an unreadable manifest falls back to the `.bak` copy, and
    /// when that is unusable too an empty manifest is returned.
    pub fn open(storage_dir: impl AsRef<Path>) -> Self {
        let storage_dir = storage_dir.as_ref();
        let path = storage_dir.join(MANIFEST_FILE_NAME);
        let backup = storage_dir.join(BACKUP_FILE_NAME);

        if !path.exists() && !backup.exists() {
            debug!("no manifest in {}, starting empty", storage_dir.display());
            return Self::empty(storage_dir);
        }

        match Self::read(&path) {
            Ok(manifest) => return manifest.at(path),
            Err(e) => warn!("failed to load manifest {}: {}", path.display(), e),
        }

        match Self::read(&backup) {
            Ok(manifest) => {
                info!("recovered manifest from backup {}", backup.display());
                manifest.at(path)
            }
            Err(e) => {
                warn!("failed to load manifest backup {}: {}, starting empty", backup.display(), e);
                Self::empty(storage_dir)
            }
        }
    }

    fn read(path: &Path) -> ManifestResult<Self> {
        let text = fs::read_to_string(path)?;
        let value: serde_json::Value = serde_json::from_str(&text)?;
        let mut manifest: Self = serde_json::from_value(migrate(value))?;
        manifest.version = CURRENT_VERSION;
        manifest.recompute_statistics();
        Ok(manifest)
    }

    fn at(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    /// Persist the manifest, copying the previous file to `.bak` first
    pub fn save(&mut self) -> ManifestResult<()> {
        let result = self.write();
        if let Err(e) = &result {
            error!("failed to save manifest {}: {}", self.path.display(), e);
        }
        result
    }

    fn write(&mut self) -> ManifestResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        if self.path.exists() {
            fs::copy(&self.path, self.backup_path())?;
        }

        self.last_updated = Utc::now();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&self.path, json)?;
        debug!("saved manifest with {} documents to {}", self.documents.len(), self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        self.path.with_file_name(BACKUP_FILE_NAME)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    // === Documents ===

    pub fn is_document_ingested(&self, doc_id: &str) -> bool {
        self.documents.contains_key(doc_id)
    }

    /// Whether any stored document has the same content (linear scan)
    pub fn is_content_duplicate(&self, content: &str) -> bool {
        self.is_hash_duplicate(&compute_content_hash(content))
    }

    /// Whether any stored document has this content hash (linear scan)
    pub fn is_hash_duplicate(&self, content_hash: &str) -> bool {
        self.documents.values().any(|d| d.content_hash == content_hash)
    }

    /// Record an ingested document under `doc_id` and return the stored entry.
    ///
    /// The source type is the doc_id prefix (`"email:msg-1"` is `email`)
    /// unless the metadata names one. Re-adding a doc_id replaces its entry.
    /// A content hash shared with a different doc_id is logged but still
    /// recorded.
    pub fn add_document(&mut self, doc_id: &str, content: &str, metadata: DocumentMetadata) -> ManifestDocument {
        let content_hash = compute_content_hash(content);

        if let Some(other) = self
            .documents
            .values()
            .find(|d| d.content_hash == content_hash && d.doc_id != doc_id)
        {
            warn!("{} has the same content as {}", doc_id, other.doc_id);
        }

        let source_type = metadata.source_type.unwrap_or_else(|| {
            doc_id
                .split_once(':')
                .map_or("unknown", |(prefix, _)| prefix)
                .to_string()
        });

        let document = ManifestDocument {
            doc_id: doc_id.to_string(),
            content_hash,
            source_type,
            ingested_at: Utc::now(),
            ticker: metadata.ticker,
            email_date: metadata.email_date,
            portfolio_relevance: metadata.portfolio_relevance,
            metadata: metadata.extra,
        };

        if self.documents.insert(doc_id.to_string(), document.clone()).is_some() {
            debug!("superseded {}", doc_id);
        }
        self.recompute_statistics();
        document
    }

    pub fn document(&self, doc_id: &str) -> Option<&ManifestDocument> {
        self.documents.get(doc_id)
    }

    pub fn documents(&self) -> impl Iterator<Item = &ManifestDocument> {
        self.documents.values()
    }

    pub fn documents_for_ticker<'a>(&'a self, ticker: &'a str) -> impl Iterator<Item = &'a ManifestDocument> + 'a {
        self.documents
            .values()
            .filter(move |d| d.ticker.as_deref() == Some(ticker))
    }

    /// Candidates whose doc_id is unknown and whose content is not already present
    pub fn get_new_documents<'a>(&self, candidates: &'a [CandidateDocument]) -> Vec<&'a CandidateDocument> {
        candidates
            .iter()
            .filter(|c| !self.is_document_ingested(&c.doc_id()) && !self.is_hash_duplicate(&c.content_hash()))
            .collect()
    }

    /// Candidates whose doc_id is known but whose content changed
    pub fn get_updated_documents<'a>(&self, candidates: &'a [CandidateDocument]) -> Vec<&'a CandidateDocument> {
        candidates
            .iter()
            .filter(|c| {
                self.documents
                    .get(&c.doc_id())
                    .is_some_and(|d| d.content_hash != c.content_hash())
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    // === Portfolio ===

    /// Compare holdings with the most recent snapshot
    pub fn get_portfolio_delta(&self, holdings: &[String]) -> PortfolioDelta {
        PortfolioDelta::between(self.latest_portfolio(), holdings)
    }

    /// Append a timestamped snapshot of the holdings
    pub fn update_portfolio(&mut self, holdings: &[String]) {
        self.portfolio_history.push(PortfolioSnapshot {
            date: Utc::now(),
            holdings: holdings.to_vec(),
        });
        self.recompute_statistics();
    }

    pub fn latest_portfolio(&self) -> Option<&PortfolioSnapshot> {
        self.portfolio_history.last()
    }

    pub fn portfolio_history(&self) -> &[PortfolioSnapshot] {
        &self.portfolio_history
    }

    // === API coverage ===

    /// Add fetched record counts per data type for `ticker`
    pub fn update_api_coverage<I, S>(&mut self, ticker: &str, data_types: I)
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let coverage = self.api_data_coverage.entry(ticker.to_string()).or_default();
        for (data_type, count) in data_types {
            *coverage.entry(data_type.into()).or_default() += count;
        }
        self.recompute_statistics();
    }

    pub fn api_coverage(&self, ticker: &str) -> Option<&BTreeMap<String, u64>> {
        self.api_data_coverage.get(ticker)
    }

    // === Statistics ===

    pub fn statistics(&self) -> &ManifestStatistics {
        &self.statistics
    }

    fn recompute_statistics(&mut self) {
        let mut by_source_type: BTreeMap<String, usize> = BTreeMap::new();
        for doc in self.documents.values() {
            *by_source_type.entry(doc.source_type.clone()).or_default() += 1;
        }

        let tickers: BTreeSet<&str> = self
            .documents
            .values()
            .filter_map(|d| d.ticker.as_deref())
            .chain(self.api_data_coverage.keys().map(String::as_str))
            .collect();
        let unique_tickers: Vec<String> = tickers.iter().map(|t| t.to_string()).collect();

        self.statistics = ManifestStatistics {
            total_documents: self.documents.len(),
            by_source_type,
            tickers_covered: unique_tickers.len(),
            unique_tickers,
            portfolio_snapshots: self.portfolio_history.len(),
            last_ingestion: self.documents.values().map(|d| d.ingested_at).max(),
        };
    }
}
