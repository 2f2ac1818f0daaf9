//! Scenario fixtures

use chrono::NaiveDate;
use ice::{CausalPathHop, Chunk, EnrichedSource, ParsedContext, SourceType};
use rand::rngs::StdRng;
use rand::Rng;

/// Portfolio used by the manifest tests
pub const TICKERS: [&str; 4] = ["NVDA", "AAPL", "TSM", "AMD"];

const ENTITIES: [&str; 8] = [
    "NVIDIA", "TSMC", "Taiwan", "Apple", "AMD", "ASML", "Netherlands", "China",
];

const SOURCE_TYPES: [SourceType; 5] = [
    SourceType::Email,
    SourceType::Api,
    SourceType::News,
    SourceType::Filing,
    SourceType::Unknown,
];

pub fn hop(entity1: &str, relation: &str, entity2: &str) -> CausalPathHop {
    CausalPathHop::new(entity1, relation, entity2)
}

/// NVIDIA → TSMC → Taiwan
pub fn nvidia_paths() -> Vec<Vec<CausalPathHop>> {
    vec![vec![
        hop("NVIDIA", "DEPENDS_ON", "TSMC"),
        hop("TSMC", "LOCATED_IN", "Taiwan"),
    ]]
}

/// One supporting chunk per hop of `nvidia_paths`, with confidences 0.90 and 0.85
pub fn nvidia_context() -> ParsedContext {
    ParsedContext::from_chunks(vec![
        Chunk::new(
            "email-1",
            "Broker note: NVIDIA sources all leading-edge GPUs from TSMC.",
            SourceType::Email,
            0.90,
        )
        .with_date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        .with_rank(1),
        Chunk::new(
            "filing-1",
            "TSMC operates most of its fabs in Taiwan.",
            SourceType::Filing,
            0.85,
        )
        .with_date(NaiveDate::from_ymd_opt(2024, 2, 21).unwrap())
        .with_rank(2),
    ])
}

/// Chunks mentioning random pairs of scenario entities
pub fn random_context(rng: &mut StdRng, chunks: usize) -> ParsedContext {
    let chunks = (0..chunks)
        .map(|i| {
            let a = ENTITIES[rng.gen_range(0..ENTITIES.len())];
            let b = ENTITIES[rng.gen_range(0..ENTITIES.len())];
            let source_type = SOURCE_TYPES[rng.gen_range(0..SOURCE_TYPES.len())];
            let confidence = (rng.gen_range(0..=100) as f64) / 100.0;
            Chunk::new(format!("c{}", i), format!("{} and {} announced", a, b), source_type, confidence)
        })
        .collect();
    ParsedContext::from_chunks(chunks)
}

/// A random walk over the scenario entities
pub fn random_path(rng: &mut StdRng, hops: usize) -> Vec<CausalPathHop> {
    let mut current = ENTITIES[rng.gen_range(0..ENTITIES.len())];
    (0..hops)
        .map(|_| {
            let next = ENTITIES[rng.gen_range(0..ENTITIES.len())];
            let h = hop(current, "AFFECTS", next);
            current = next;
            h
        })
        .collect()
}

pub fn sample_sources() -> Vec<EnrichedSource> {
    vec![
        EnrichedSource::new("email", "Goldman Sachs broker note", 0.92)
            .with_date("2024-03-15")
            .with_badge("🟢 Tier 1"),
        EnrichedSource::new("sec_filing", "NVDA 10-K 2024", 0.88)
            .with_date("2024-02-21")
            .with_link("https://www.sec.gov/nvda-10k-2024"),
        EnrichedSource::new("news", "Reuters", 0.75).with_date("2024-04-02"),
        EnrichedSource::new("api", "Market data feed", 0.6),
    ]
}
