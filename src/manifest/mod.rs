//! Ingestion manifest: content-hash keyed deduplication ledger
//!
//! Gates what is inserted into the external retrieval engine. Tracks every
//! ingested document by `"{source_type}:{identifier}"`, the history of
//! portfolio snapshots and per-ticker API data coverage. Persisted as a single
//! JSON file with a `.bak` copy of the previous version.
//!
//! Single process, single writer. There is no file locking.

mod document;
mod error;
mod ledger;
mod migrate;
mod portfolio;

pub use document::{CandidateDocument, DocumentMetadata, ManifestDocument, ManifestStatistics};
pub use error::{ManifestError, ManifestResult};
pub use ledger::{compute_content_hash, get_document_id, IngestionManifest, BACKUP_FILE_NAME, MANIFEST_FILE_NAME};
pub use migrate::CURRENT_VERSION;
pub use portfolio::{PortfolioDelta, PortfolioSnapshot};
