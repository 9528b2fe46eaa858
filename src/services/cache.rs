//! Process-wide TTL cache for fetched OHLCV series.
//!
//! Keyed by (symbol, period). Entries expire after a fixed TTL or on an
//! explicit `clear`. Concurrent identical requests may both miss and
//! both fetch; there is no single-flight de-duplication.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::debug;

use crate::constants::FETCH_CACHE_TTL_SECS;
use crate::models::Ohlcv;

struct CacheEntry {
    bars: Vec<Ohlcv>,
    inserted: Instant,
}

pub struct FetchCache {
    entries: RwLock<HashMap<(String, String), CacheEntry>>,
    ttl: Duration,
}

impl FetchCache {
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(FETCH_CACHE_TTL_SECS))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Fresh cached series for (symbol, period), if any
    pub async fn get(&self, symbol: &str, period: &str) -> Option<Vec<Ohlcv>> {
        let entries = self.entries.read().await;
        let entry = entries.get(&(symbol.to_string(), period.to_string()))?;
        if entry.inserted.elapsed() > self.ttl {
            return None;
        }
        debug!(symbol = symbol, period = period, bars = entry.bars.len(), "Fetch cache hit");
        Some(entry.bars.clone())
    }

    pub async fn insert(&self, symbol: &str, period: &str, bars: Vec<Ohlcv>) {
        let mut entries = self.entries.write().await;
        entries.insert(
            (symbol.to_string(), period.to_string()),
            CacheEntry {
                bars,
                inserted: Instant::now(),
            },
        );
    }

    /// Explicit manual invalidation of every entry
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

impl Default for FetchCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_bars() -> Vec<Ohlcv> {
        let time = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        vec![Ohlcv::new(time, 1.0, 2.0, 0.5, 1.5, 100)]
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let cache = FetchCache::new();
        cache.insert("TCS.NS", "6mo", sample_bars()).await;

        let hit = cache.get("TCS.NS", "6mo").await;
        assert_eq!(hit.map(|b| b.len()), Some(1));
        assert!(cache.get("TCS.NS", "1y").await.is_none());
    }

    #[tokio::test]
    async fn test_ttl_expiry() {
        let cache = FetchCache::with_ttl(Duration::from_millis(10));
        cache.insert("TCS.NS", "6mo", sample_bars()).await;

        tokio::time::sleep(Duration::from_millis(25)).await;
        assert!(cache.get("TCS.NS", "6mo").await.is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = FetchCache::new();
        cache.insert("TCS.NS", "6mo", sample_bars()).await;
        cache.clear().await;
        assert_eq!(cache.len().await, 0);
    }
}
