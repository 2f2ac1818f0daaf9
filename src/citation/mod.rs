//! Citation rendering for attributed answers
//!
//! Turns enriched source records into one of three presentations consumed by
//! the UI layer: an inline bracket list, numbered footnotes, or a structured
//! record. Citation display must never break the answer it decorates, so
//! every failure degrades to the bare answer.

mod formatter;
mod source;

pub use formatter::{format_citations, CitationConfig, CitationError, CitationFormatter, CitationOutput};
pub use source::{CitationStyle, EnrichedSource, StructuredCitation, StructuredCitations};
