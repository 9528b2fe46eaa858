//! Market-data fetch adapter.
//!
//! Pulls daily OHLCV history from a Yahoo-style chart endpoint, trying a
//! fixed sequence of lookback periods until one yields a usable series.
//! Provider and network failures are swallowed and logged; the caller
//! only ever sees a (possibly empty) bar series. Fetched series are
//! cached per (symbol, period) with a short TTL.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use crate::constants::{FALLBACK_PERIODS, MIN_BARS_FOR_SCORE};
use crate::error::{AppError, Result};
use crate::models::Ohlcv;
use crate::services::cache::FetchCache;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const HTTP_TIMEOUT_SECS: u64 = 20;

pub struct StockFetcher {
    client: reqwest::Client,
    base_url: String,
    cache: Arc<FetchCache>,
}

impl StockFetcher {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL.to_string(), Arc::new(FetchCache::new()))
    }

    /// Build against an alternate endpoint with an injected cache.
    /// Used by tests and by callers that share one cache across scans.
    pub fn with_base_url(base_url: String, cache: Arc<FetchCache>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36")
            .build()
            .map_err(|e| AppError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache,
        })
    }

    pub fn cache(&self) -> Arc<FetchCache> {
        Arc::clone(&self.cache)
    }

    /// Fetch daily bars for one symbol and lookback period. Network and
    /// provider errors surface as `AppError::Network`/`Parse`.
    pub async fn fetch(&self, symbol: &str, period: &str) -> Result<Vec<Ohlcv>> {
        if let Some(bars) = self.cache.get(symbol, period).await {
            return Ok(bars);
        }

        let url = format!(
            "{}/{}?range={}&interval=1d",
            self.base_url, symbol, period
        );
        debug!(symbol = symbol, period = period, "Fetching history");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::Network(format!(
                "Provider returned {} for {}",
                response.status(),
                symbol
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::Parse(format!("Bad provider JSON for {}: {}", symbol, e)))?;

        let bars = parse_chart_response(&body, symbol)?;
        self.cache.insert(symbol, period, bars.clone()).await;
        Ok(bars)
    }

    /// Fetch with the fixed fallback sequence of lookback periods,
    /// stopping at the first attempt yielding at least 20 bars. Every
    /// error degrades to an empty result; nothing is thrown to the
    /// caller.
    pub async fn fetch_with_fallback(&self, symbol: &str, preferred: &str) -> Vec<Ohlcv> {
        let mut periods: Vec<&str> = vec![preferred];
        for period in FALLBACK_PERIODS {
            if *period != preferred {
                periods.push(period);
            }
        }

        for period in periods {
            match self.fetch(symbol, period).await {
                Ok(bars) if bars.len() >= MIN_BARS_FOR_SCORE => return bars,
                Ok(bars) => {
                    debug!(
                        symbol = symbol,
                        period = period,
                        bars = bars.len(),
                        "Too few bars, trying next period"
                    );
                }
                Err(e) => {
                    warn!(symbol = symbol, period = period, error = %e, "Fetch attempt failed");
                }
            }
        }

        Vec::new()
    }
}

/// Flatten the provider's nested chart payload into a bar series.
/// Bars with any null field are dropped; multi-level column shape is
/// normalized by indexing the first quote set.
fn parse_chart_response(body: &Value, symbol: &str) -> Result<Vec<Ohlcv>> {
    let result = body
        .get("chart")
        .and_then(|c| c.get("result"))
        .and_then(|r| r.get(0))
        .ok_or_else(|| {
            AppError::Parse(format!("No chart result for {}", symbol))
        })?;

    let timestamps = result
        .get("timestamp")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::NotFound(format!("No timestamps for {}", symbol)))?;

    let quote = result
        .get("indicators")
        .and_then(|i| i.get("quote"))
        .and_then(|q| q.get(0))
        .ok_or_else(|| AppError::Parse(format!("No quote data for {}", symbol)))?;

    let column = |name: &str| -> Vec<Option<f64>> {
        quote
            .get(name)
            .and_then(Value::as_array)
            .map(|values| values.iter().map(Value::as_f64).collect())
            .unwrap_or_default()
    };

    let opens = column("open");
    let highs = column("high");
    let lows = column("low");
    let closes = column("close");
    let vols = column("volume");

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let time = match ts.as_i64().and_then(|secs| Utc.timestamp_opt(secs, 0).single()) {
            Some(t) => t,
            None => continue,
        };

        // dropna: any missing field discards the whole bar
        let (open, high, low, close, volume) = match (
            opens.get(i).copied().flatten(),
            highs.get(i).copied().flatten(),
            lows.get(i).copied().flatten(),
            closes.get(i).copied().flatten(),
            vols.get(i).copied().flatten(),
        ) {
            (Some(o), Some(h), Some(l), Some(c), Some(v)) => (o, h, l, c, v),
            _ => continue,
        };

        let mut bar = Ohlcv::new(time, open, high, low, close, volume.max(0.0) as u64);
        bar.symbol = Some(symbol.to_string());
        bars.push(bar);
    }

    bars.sort_by(|a, b| a.time.cmp(&b.time));
    bars.dedup_by(|a, b| a.time == b.time);
    Ok(bars)
}
