//! Retrieved text chunks with provenance metadata

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// Kind of document a chunk or manifest entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Email,
    Api,
    News,
    Filing,
    #[default]
    #[serde(other)]
    Unknown,
}

impl SourceType {
    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Email => "email",
            SourceType::Api => "api",
            SourceType::News => "news",
            SourceType::Filing => "filing",
            SourceType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "api" => Ok(Self::Api),
            "news" => Ok(Self::News),
            "filing" => Ok(Self::Filing),
            "unknown" => Ok(Self::Unknown),
            _ => Err(format!("unknown source type: {}", s)),
        }
    }
}

/// Confidence assumed for chunks whose source did not report one
pub const DEFAULT_CHUNK_CONFIDENCE: f64 = 0.5;

fn default_confidence() -> f64 {
    DEFAULT_CHUNK_CONFIDENCE
}

/// A text fragment from a source document, the unit of evidence for attribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    #[serde(default, alias = "chunk_id")]
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub source_type: SourceType,
    /// Source-provided confidence (0.0 - 1.0)
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default, deserialize_with = "lenient_date", skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub relevance_rank: u32,
}

impl Chunk {
    /// Create a chunk with the given content and provenance
    pub fn new(id: impl Into<String>, content: impl Into<String>, source_type: SourceType, confidence: f64) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            source_type,
            confidence,
            date: None,
            relevance_rank: 0,
        }
    }

    /// Set the source date
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the retrieval rank
    pub fn with_rank(mut self, rank: u32) -> Self {
        self.relevance_rank = rank;
        self
    }

    /// Whether both names occur in the content (case-insensitive substring)
    pub fn mentions_both(&self, first: &str, second: &str) -> bool {
        let content = self.content.to_lowercase();
        content.contains(&first.to_lowercase()) && content.contains(&second.to_lowercase())
    }
}

/// Accepts `YYYY-MM-DD`, an RFC 3339 timestamp, or null.
///
/// Anything else is treated as "no date" rather than rejecting the chunk.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(ts.date_naive()));
    }
    tracing::debug!("ignoring unparseable chunk date: {}", raw);
    Ok(None)
}
