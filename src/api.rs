//! Transport-independent API layer.
//!
//! `IceApi` is the single entry point for consumer-facing operations. It owns
//! the configuration, the scoring components and the query cache for the
//! lifetime of the service; the CLI and any embedding application call it
//! rather than building the components themselves.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::attribution::{format_attributed_path, AttributedPath, PathAttributor};
use crate::cache::{CacheStats, QueryCache};
use crate::citation::{CitationFormatter, CitationOutput, CitationStyle, EnrichedSource};
use crate::config::IceConfig;
use crate::context::{CausalPathHop, ParsedContext};
use crate::graph::{Edge, Entity};
use crate::manifest::{compute_content_hash, IngestionManifest};
use crate::outcome::Outcome;
use crate::temporal::{create_temporal_edges, TemporalEnhancer};

/// Single entry point for all consumer-facing operations.
pub struct IceApi {
    config: IceConfig,
    attributor: PathAttributor,
    enhancer: TemporalEnhancer,
    formatter: CitationFormatter,
    attribution_cache: QueryCache<String, Vec<AttributedPath>>,
}

impl IceApi {
    pub fn new(config: IceConfig) -> Self {
        Self {
            attributor: PathAttributor::new(config.attribution.clone()),
            enhancer: TemporalEnhancer::new(config.temporal.clone()),
            formatter: CitationFormatter::new(config.citation.clone()),
            attribution_cache: QueryCache::from_config(&config.cache),
            config,
        }
    }

    /// Measure temporal ages against a fixed instant
    pub fn with_reference_time(mut self, reference: DateTime<Utc>) -> Self {
        self.enhancer = self.enhancer.with_reference_time(reference);
        self
    }

    pub fn config(&self) -> &IceConfig {
        &self.config
    }

    // --- Ingestion ---

    /// Load (or start) the manifest in the configured storage directory
    pub fn open_manifest(&self) -> IngestionManifest {
        IngestionManifest::open(&self.config.storage_dir)
    }

    // --- Attribution ---

    pub fn attribute(&self, causal_paths: &[Vec<CausalPathHop>], context: &ParsedContext) -> Vec<AttributedPath> {
        self.attributor.attribute_paths(causal_paths, context)
    }

    /// Attribute paths, reusing a fresh cached result for the same query,
    /// paths and context
    pub fn attribute_cached(
        &mut self,
        query: &str,
        causal_paths: &[Vec<CausalPathHop>],
        context: &ParsedContext,
    ) -> Vec<AttributedPath> {
        let Some(key) = attribution_key(query, causal_paths, context) else {
            return self.attribute(causal_paths, context);
        };
        if let Some(paths) = self.attribution_cache.get(&key) {
            return paths;
        }
        let paths = self.attribute(causal_paths, context);
        self.attribution_cache.insert(key, paths.clone());
        paths
    }

    /// Render attributed paths as one text report
    pub fn render_paths(&self, paths: &[AttributedPath]) -> String {
        paths
            .iter()
            .map(format_attributed_path)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.attribution_cache.stats()
    }

    pub fn clear_expired(&mut self) {
        self.attribution_cache.clear_expired();
    }

    // --- Temporal ---

    pub fn enhance_entity(&self, entity: Entity, source_date: DateTime<Utc>, context: Option<&str>) -> Outcome<Entity> {
        self.enhancer.enhance_entity(entity, source_date, context)
    }

    pub fn enhance_edge(&self, edge: Edge, source_date: DateTime<Utc>, context: Option<&str>) -> Outcome<Edge> {
        self.enhancer.enhance_edge(edge, source_date, context)
    }

    pub fn temporal_edges(&self, entities: &[Entity], existing_edges: &[Edge]) -> Vec<Edge> {
        create_temporal_edges(entities, existing_edges)
    }

    // --- Citations ---

    /// Render citations with the configured style and inline limit
    pub fn cite(&self, answer: &str, sources: &[EnrichedSource]) -> Outcome<CitationOutput> {
        self.formatter.format(answer, sources)
    }

    pub fn cite_with(
        &self,
        answer: &str,
        sources: &[EnrichedSource],
        style: CitationStyle,
        max_inline: usize,
    ) -> Outcome<CitationOutput> {
        self.formatter.format_with(answer, sources, style, max_inline)
    }
}

/// `query` plus a digest of the inputs, so a changed context never hits a stale entry
fn attribution_key(query: &str, causal_paths: &[Vec<CausalPathHop>], context: &ParsedContext) -> Option<String> {
    match serde_json::to_string(&(causal_paths, context)) {
        Ok(inputs) => Some(format!("{}#{}", query, compute_content_hash(&inputs))),
        Err(e) => {
            warn!("attribution inputs not cacheable: {}", e);
            None
        }
    }
}

impl Default for IceApi {
    fn default() -> Self {
        Self::new(IceConfig::default())
    }
}
