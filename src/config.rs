//! Runtime configuration.
//!
//! Loaded from a YAML file, then overridden from `ICE_*` environment
//! variables. Every field has a default, so partial files load.

use crate::attribution::AttributionConfig;
use crate::cache::CacheConfig;
use crate::citation::{CitationConfig, CitationStyle};
use crate::temporal::TemporalConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Configuration loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceConfig {
    /// Directory holding the ingestion manifest
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    #[serde(default)]
    pub attribution: AttributionConfig,

    #[serde(default)]
    pub temporal: TemporalConfig,

    #[serde(default)]
    pub citation: CitationConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

/// `<data_dir>/ice`, e.g. `~/.local/share/ice`
pub fn default_storage_dir() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    data_dir.join("ice")
}

impl Default for IceConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            attribution: AttributionConfig::default(),
            temporal: TemporalConfig::default(),
            citation: CitationConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl IceConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Apply `ICE_*` overrides from the process environment
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply `ICE_*` overrides from any variable lookup.
    ///
    /// Recognised: `ICE_STORAGE_DIR`, `ICE_HALF_LIFE_DAYS`,
    /// `ICE_UNSUPPORTED_HOP_CONFIDENCE`, `ICE_CITATION_STYLE`,
    /// `ICE_MAX_INLINE`, `ICE_CACHE_MAX_ENTRIES`, `ICE_CACHE_TTL_SECS`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("ICE_STORAGE_DIR") {
            self.storage_dir = PathBuf::from(dir);
        }
        if let Some(v) = parsed(&lookup, "ICE_HALF_LIFE_DAYS")? {
            self.temporal.half_life_days = v;
        }
        if let Some(v) = parsed(&lookup, "ICE_UNSUPPORTED_HOP_CONFIDENCE")? {
            self.attribution.unsupported_hop_confidence = v;
        }
        if let Some(v) = parsed::<CitationStyle, _>(&lookup, "ICE_CITATION_STYLE")? {
            self.citation.default_style = v;
        }
        if let Some(v) = parsed(&lookup, "ICE_MAX_INLINE")? {
            self.citation.max_inline = v;
        }
        if let Some(v) = parsed(&lookup, "ICE_CACHE_MAX_ENTRIES")? {
            self.cache.max_entries = v;
        }
        if let Some(v) = parsed(&lookup, "ICE_CACHE_TTL_SECS")? {
            self.cache.ttl_secs = v;
        }
        Ok(self)
    }

    /// Load the YAML file when given (defaults otherwise), then the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.with_env()
    }
}

fn parsed<T, F>(lookup: &F, name: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv {
                name: name.to_string(),
                value,
            }),
    }
}
