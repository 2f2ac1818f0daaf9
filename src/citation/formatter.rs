//! Inline, footnote and structured citation rendering

use super::source::{CitationStyle, EnrichedSource, StructuredCitation, StructuredCitations};
use crate::outcome::Outcome;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Errors that prevent citations from being rendered
#[derive(Debug, Error, PartialEq)]
pub enum CitationError {
    #[error("Source {index} has a non-finite confidence: {value}")]
    NonFiniteConfidence { index: usize, value: f64 },
}

/// Citation formatter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationConfig {
    /// Sources listed before the inline list is truncated
    #[serde(default = "default_max_inline")]
    pub max_inline: usize,

    #[serde(default)]
    pub default_style: CitationStyle,
}

fn default_max_inline() -> usize { 3 }

impl Default for CitationConfig {
    fn default() -> Self {
        Self {
            max_inline: default_max_inline(),
            default_style: CitationStyle::default(),
        }
    }
}

/// Rendered citations
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CitationOutput {
    /// Inline or footnote rendering: the answer with citations appended
    Text(String),
    Structured(StructuredCitations),
}

impl CitationOutput {
    /// The rendered text, for the text styles
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CitationOutput::Text(text) => Some(text),
            CitationOutput::Structured(_) => None,
        }
    }

    /// The structured record, for the structured style
    pub fn as_structured(&self) -> Option<&StructuredCitations> {
        match self {
            CitationOutput::Text(_) => None,
            CitationOutput::Structured(record) => Some(record),
        }
    }

    /// The undecorated fallback for a style
    fn bare(answer: &str, style: CitationStyle) -> Self {
        match style {
            CitationStyle::Structured => CitationOutput::Structured(StructuredCitations::bare(answer)),
            CitationStyle::Inline | CitationStyle::Footnote => CitationOutput::Text(answer.to_string()),
        }
    }
}

/// Renders enriched sources for display
#[derive(Debug, Clone, Default)]
pub struct CitationFormatter {
    config: CitationConfig,
}

impl CitationFormatter {
    pub fn new(config: CitationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CitationConfig {
        &self.config
    }

    /// Render with the configured default style and inline limit
    pub fn format(&self, answer: &str, sources: &[EnrichedSource]) -> Outcome<CitationOutput> {
        self.format_with(answer, sources, self.config.default_style, self.config.max_inline)
    }

    /// Render citations, degrading to the bare answer on failure
    pub fn format_with(
        &self,
        answer: &str,
        sources: &[EnrichedSource],
        style: CitationStyle,
        max_inline: usize,
    ) -> Outcome<CitationOutput> {
        match self.try_format(answer, sources, style, max_inline) {
            Ok(output) => Outcome::Complete(output),
            Err(e) => {
                error!("citation formatting failed, returning bare answer: {}", e);
                Outcome::Degraded {
                    value: CitationOutput::bare(answer, style),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Render citations, reporting failures to the caller
    pub fn try_format(
        &self,
        answer: &str,
        sources: &[EnrichedSource],
        style: CitationStyle,
        max_inline: usize,
    ) -> Result<CitationOutput, CitationError> {
        if sources.is_empty() {
            return Ok(CitationOutput::bare(answer, style));
        }

        for (index, source) in sources.iter().enumerate() {
            if !source.confidence.is_finite() {
                return Err(CitationError::NonFiniteConfidence {
                    index,
                    value: source.confidence,
                });
            }
        }

        Ok(match style {
            CitationStyle::Inline => CitationOutput::Text(inline(answer, sources, max_inline)),
            CitationStyle::Footnote => CitationOutput::Text(footnotes(answer, sources)),
            CitationStyle::Structured => CitationOutput::Structured(StructuredCitations {
                answer: answer.to_string(),
                citations: sources.iter().map(StructuredCitation::from).collect(),
            }),
        })
    }
}

/// Render citations with a style given by name; unknown names fall back to inline
pub fn format_citations(
    answer: &str,
    sources: &[EnrichedSource],
    style: &str,
    max_inline: usize,
) -> Outcome<CitationOutput> {
    CitationFormatter::default().format_with(answer, sources, CitationStyle::parse_or_inline(style), max_inline)
}

fn percent(confidence: f64) -> String {
    format!("{:.0}%", confidence * 100.0)
}

fn inline(answer: &str, sources: &[EnrichedSource], max_inline: usize) -> String {
    let mut segments: Vec<String> = sources
        .iter()
        .take(max_inline)
        .map(|s| format!("{}: {}, {}", s.display_type(), s.label, percent(s.confidence)))
        .collect();

    if sources.len() > max_inline {
        segments.push(format!("...and {} more", sources.len() - max_inline));
    }

    format!("{} [{}]", answer, segments.join(" | "))
}

fn footnotes(answer: &str, sources: &[EnrichedSource]) -> String {
    let markers: String = (1..=sources.len()).map(|n| format!("[{}]", n)).collect();

    let notes: Vec<String> = sources
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let mut line = format!(
                "[{}] {}: {}, {}, Confidence: {}",
                i + 1,
                s.display_type(),
                s.label,
                s.date,
                percent(s.confidence)
            );
            if !s.quality_badge.is_empty() {
                line.push_str(&format!(", Quality: {}", s.quality_badge));
            }
            if !s.link.is_empty() {
                line.push_str(&format!("\n    {}", s.link));
            }
            line
        })
        .collect();

    format!("{}{}\n\n{}", answer, markers, notes.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANSWER: &str = "NVIDIA is exposed to Taiwan risk through TSMC.";

    fn sources() -> Vec<EnrichedSource> {
        vec![
            EnrichedSource::new("email", "Broker note", 0.9)
                .with_date("2024-03-15")
                .with_badge("🟢 High"),
            EnrichedSource::new("sec_filing", "NVDA 10-K", 0.85)
                .with_date("2024-02-21")
                .with_link("https://sec.gov/nvda-10k"),
        ]
    }

    #[test]
    fn empty_sources_return_answer_unchanged() {
        for style in ["inline", "footnote"] {
            let outcome = format_citations(ANSWER, &[], style, 3);
            assert_eq!(outcome.value().as_text(), Some(ANSWER));
        }
        let outcome = format_citations(ANSWER, &[], "structured", 3);
        assert_eq!(outcome.into_inner(), CitationOutput::Structured(StructuredCitations::bare(ANSWER)));
    }

    #[test]
    fn inline_lists_sources_in_input_order() {
        let outcome = format_citations(ANSWER, &sources(), "inline", 3);
        assert_eq!(
            outcome.value().as_text().unwrap(),
            format!("{} [Email: Broker note, 90% | Sec Filing: NVDA 10-K, 85%]", ANSWER)
        );
    }

    #[test]
    fn inline_truncates_with_remaining_count() {
        let many = vec![EnrichedSource::new("news", "Reuters", 0.7); 10];
        let outcome = format_citations(ANSWER, &many, "inline", 3);
        let text = outcome.value().as_text().unwrap();

        assert!(text.contains("...and 7 more"));
        assert_eq!(text.matches("News: Reuters, 70%").count(), 3);
    }

    #[test]
    fn footnotes_append_markers_and_notes() {
        let outcome = format_citations(ANSWER, &sources(), "footnote", 3);
        let expected = format!(
            "{}[1][2]\n\n\
             [1] Email: Broker note, 2024-03-15, Confidence: 90%, Quality: 🟢 High\n\
             [2] Sec Filing: NVDA 10-K, 2024-02-21, Confidence: 85%\n    https://sec.gov/nvda-10k",
            ANSWER
        );
        assert_eq!(outcome.value().as_text().unwrap(), expected);
    }

    #[test]
    fn structured_maps_every_source() {
        let many = vec![EnrichedSource::new("api", "Yahoo", 0.6); 5];
        let outcome = format_citations(ANSWER, &many, "structured", 3);
        let record = outcome.value().as_structured().unwrap();

        assert_eq!(record.answer, ANSWER);
        assert_eq!(record.citations.len(), 5);
        assert_eq!(record.citations[0].source, "api");

        let json = serde_json::to_value(outcome.value()).unwrap();
        assert_eq!(json["citations"][0]["label"], "Yahoo");
    }

    #[test]
    fn unknown_style_falls_back_to_inline() {
        let outcome = format_citations(ANSWER, &sources(), "fancy", 3);
        assert!(outcome.value().as_text().unwrap().ends_with("85%]"));
        assert!(!outcome.is_degraded());
    }

    #[test]
    fn invalid_confidence_degrades_to_bare_answer() {
        let bad = vec![EnrichedSource::new("news", "Reuters", f64::NAN)];

        let outcome = format_citations(ANSWER, &bad, "footnote", 3);
        assert!(outcome.is_degraded());
        assert_eq!(outcome.value().as_text(), Some(ANSWER));

        let outcome = format_citations(ANSWER, &bad, "structured", 3);
        assert!(outcome.is_degraded());
        assert!(outcome.value().as_structured().unwrap().citations.is_empty());
    }

    #[test]
    fn configured_defaults_are_used() {
        let formatter = CitationFormatter::new(CitationConfig {
            max_inline: 1,
            default_style: CitationStyle::Inline,
        });
        let outcome = formatter.format(ANSWER, &sources());
        assert!(outcome.value().as_text().unwrap().ends_with("90% | ...and 1 more]"));
    }
}
