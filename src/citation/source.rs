//! Citation input records and presentation styles

use serde::{Deserialize, Serialize};
use tracing::warn;

/// A citation-ready source record produced by the enrichment step.
///
/// Every field is optional on input, and an explicit `null` reads as missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawEnrichedSource")]
pub struct EnrichedSource {
    pub source_type: String,
    pub label: String,
    pub date: String,
    pub confidence: f64,
    pub quality_badge: String,
    pub link: String,
}

/// Wire shape of [`EnrichedSource`] before defaults are applied
#[derive(Deserialize)]
struct RawEnrichedSource {
    #[serde(default, alias = "type")]
    source_type: Option<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default, alias = "rating")]
    quality_badge: Option<String>,
    #[serde(default)]
    link: Option<String>,
}

impl From<RawEnrichedSource> for EnrichedSource {
    fn from(raw: RawEnrichedSource) -> Self {
        Self {
            source_type: raw.source_type.unwrap_or_else(default_source_type),
            label: raw.label.unwrap_or_else(default_label),
            date: raw.date.unwrap_or_else(default_date),
            confidence: raw.confidence.unwrap_or_default(),
            quality_badge: raw.quality_badge.unwrap_or_default(),
            link: raw.link.unwrap_or_default(),
        }
    }
}

fn default_source_type() -> String {
    "unknown".to_string()
}

fn default_label() -> String {
    "Unknown".to_string()
}

fn default_date() -> String {
    "N/A".to_string()
}

impl Default for EnrichedSource {
    fn default() -> Self {
        Self {
            source_type: default_source_type(),
            label: default_label(),
            date: default_date(),
            confidence: 0.0,
            quality_badge: String::new(),
            link: String::new(),
        }
    }
}

impl EnrichedSource {
    pub fn new(source_type: impl Into<String>, label: impl Into<String>, confidence: f64) -> Self {
        Self {
            source_type: source_type.into(),
            label: label.into(),
            confidence,
            ..Default::default()
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.quality_badge = badge.into();
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    /// Source type for display: underscores become spaces, words title-cased
    pub fn display_type(&self) -> String {
        title_case(&self.source_type.replace('_', " "))
    }
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// How citations are presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationStyle {
    #[default]
    Inline,
    Footnote,
    Structured,
}

impl std::str::FromStr for CitationStyle {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" => Ok(Self::Inline),
            "footnote" => Ok(Self::Footnote),
            "structured" => Ok(Self::Structured),
            _ => Err(format!("unknown citation style: {}", s)),
        }
    }
}

impl CitationStyle {
    /// Parse a style name, falling back to inline (with a warning) when unknown
    pub fn parse_or_inline(s: &str) -> Self {
        s.parse().unwrap_or_else(|e| {
            warn!("{}, falling back to inline", e);
            CitationStyle::Inline
        })
    }
}

/// One entry of a structured citation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredCitation {
    pub source: String,
    pub label: String,
    pub date: String,
    pub confidence: f64,
    pub quality_badge: String,
    pub link: String,
}

impl From<&EnrichedSource> for StructuredCitation {
    fn from(s: &EnrichedSource) -> Self {
        Self {
            source: s.source_type.clone(),
            label: s.label.clone(),
            date: s.date.clone(),
            confidence: s.confidence,
            quality_badge: s.quality_badge.clone(),
            link: s.link.clone(),
        }
    }
}

/// Answer plus its citations, for machine consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredCitations {
    pub answer: String,
    pub citations: Vec<StructuredCitation>,
}

impl StructuredCitations {
    /// Answer with no citations attached
    pub fn bare(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            citations: Vec::new(),
        }
    }
}
