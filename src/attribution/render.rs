//! Human-readable rendering of attributed paths

use super::types::AttributedPath;
use std::fmt::Write;

/// Render a path as a multi-line report.
///
/// ```text
/// Path: NVIDIA → TSMC → Taiwan (confidence: 0.85)
///   Hop 1: NVIDIA -[DEPENDS_ON]-> TSMC
///     Sources: email | Confidence: 0.90 | Date: 2024-03-15 | Chunks: 1
/// ```
pub fn format_attributed_path(path: &AttributedPath) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Path: {} (confidence: {:.2})",
        path.path_description, path.overall_confidence
    );

    for hop in &path.hops {
        let sources = if hop.sources.is_empty() {
            "inferred".to_string()
        } else {
            hop.sources
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let date = hop
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "N/A".to_string());

        let _ = writeln!(out, "  Hop {}: {}", hop.hop_number, hop.relationship);
        let _ = writeln!(
            out,
            "    Sources: {} | Confidence: {:.2} | Date: {} | Chunks: {}",
            sources,
            hop.confidence,
            date,
            hop.chunk_count()
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribution::PathAttributor;
    use crate::context::{CausalPathHop, Chunk, SourceType};
    use chrono::NaiveDate;

    #[test]
    fn renders_header_and_hops() {
        let chunks = vec![Chunk::new("c1", "NVIDIA depends on TSMC", SourceType::Email, 0.9)
            .with_date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())];
        let hops = vec![
            CausalPathHop::new("NVIDIA", "DEPENDS_ON", "TSMC"),
            CausalPathHop::new("TSMC", "LOCATED_IN", "Taiwan"),
        ];
        let path = PathAttributor::default().attribute_path("path_1", &hops, &chunks);

        let text = format_attributed_path(&path);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Path: NVIDIA → TSMC → Taiwan (confidence: 0.40)");
        assert_eq!(lines[1], "  Hop 1: NVIDIA -[DEPENDS_ON]-> TSMC");
        assert_eq!(
            lines[2],
            "    Sources: email | Confidence: 0.90 | Date: 2024-03-15 | Chunks: 1"
        );
        assert_eq!(
            lines[4],
            "    Sources: inferred | Confidence: 0.40 | Date: N/A | Chunks: 0"
        );
    }

    #[test]
    fn empty_path_renders_header_only() {
        let path = PathAttributor::default().attribute_path("path_1", &[], &[]);
        assert_eq!(format_attributed_path(&path), "Path:  (confidence: 0.50)\n");
    }
}
