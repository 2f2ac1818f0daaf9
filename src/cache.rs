//! Bounded LRU cache with TTL for query-time results

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Cache sizing and expiry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_max_entries() -> usize { 256 }
fn default_ttl_secs() -> u64 { 3600 }

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    last_access: Instant,
}

/// LRU cache whose entries also expire after a fixed TTL
#[derive(Debug, Clone)]
pub struct QueryCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    ttl: Duration,
    max_size: usize,
    hits: u64,
    misses: u64,
}

impl<K: Hash + Eq + Clone, V: Clone> QueryCache<K, V> {
    pub fn new(ttl: Duration, max_size: usize) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            max_size,
            hits: 0,
            misses: 0,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(Duration::from_secs(config.ttl_secs), config.max_entries)
    }

    /// Get a cached value if present and not expired
    pub fn get(&mut self, key: &K) -> Option<V> {
        let ttl = self.ttl;
        match self.entries.get_mut(key) {
            Some(entry) if entry.inserted_at.elapsed() < ttl => {
                entry.last_access = Instant::now();
                self.hits += 1;
                Some(entry.value.clone())
            }
            Some(_) => {
                self.entries.remove(key);
                self.misses += 1;
                None
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store a value, evicting the least recently used entry when full
    pub fn insert(&mut self, key: K, value: V) {
        if self.max_size == 0 {
            return;
        }
        if self.entries.len() >= self.max_size && !self.entries.contains_key(&key) {
            self.evict_least_recent();
        }

        let now = Instant::now();
        self.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: now,
                last_access: now,
            },
        );
    }

    fn evict_least_recent(&mut self) {
        if let Some(oldest_key) = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(key, _)| key.clone())
        {
            self.entries.remove(&oldest_key);
        }
    }

    /// Drop expired entries
    pub fn clear_expired(&mut self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.inserted_at.elapsed() < ttl);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        let valid_entries = self
            .entries
            .values()
            .filter(|entry| entry.inserted_at.elapsed() < self.ttl)
            .count();

        CacheStats {
            total_entries: self.entries.len(),
            valid_entries,
            expired_entries: self.entries.len() - valid_entries,
            hits: self.hits,
            misses: self.misses,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
    pub hits: u64,
    pub misses: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut cache: QueryCache<String, u32> = QueryCache::new(Duration::from_secs(60), 10);
        cache.insert("nvda".to_string(), 1);

        assert_eq!(cache.get(&"nvda".to_string()), Some(1));
        assert_eq!(cache.get(&"tsm".to_string()), None);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn entries_expire() {
        let mut cache: QueryCache<&str, u32> = QueryCache::new(Duration::from_millis(50), 10);
        cache.insert("nvda", 1);
        assert!(cache.get(&"nvda").is_some());

        std::thread::sleep(Duration::from_millis(80));

        assert_eq!(cache.stats().expired_entries, 1);
        assert!(cache.get(&"nvda").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_expired_drops_stale_entries() {
        let mut cache: QueryCache<&str, u32> = QueryCache::new(Duration::from_millis(50), 10);
        cache.insert("a", 1);
        std::thread::sleep(Duration::from_millis(80));
        cache.insert("b", 2);

        cache.clear_expired();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"b"), Some(2));
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut cache: QueryCache<&str, u32> = QueryCache::new(Duration::from_secs(60), 2);
        cache.insert("a", 1);
        std::thread::sleep(Duration::from_millis(2));
        cache.insert("b", 2);
        std::thread::sleep(Duration::from_millis(2));
        cache.get(&"a");
        std::thread::sleep(Duration::from_millis(2));

        cache.insert("c", 3);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"a"), Some(1));
        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.get(&"c"), Some(3));
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let mut cache: QueryCache<&str, u32> = QueryCache::new(Duration::from_secs(60), 0);
        cache.insert("a", 1);
        assert!(cache.is_empty());
    }
}
