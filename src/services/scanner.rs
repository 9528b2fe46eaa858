//! Parallel batch scanner.
//!
//! Fans (symbol, company) pairs out to a bounded set of concurrent
//! tasks, each doing fetch + score independently, then collects the
//! survivors into a ranked, truncated result list. Tasks share nothing
//! mutable beyond the fetch cache. A symbol whose fetch fails, whose
//! score falls below the minimum, or whose task times out simply
//! contributes no result.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::constants::{
    DEFAULT_MAX_RESULTS, DEFAULT_MIN_SCORE, DEFAULT_PERIOD, DEFAULT_SCAN_TIMEOUT_SECS,
    DEFAULT_SCAN_WORKERS, DEFAULT_TASK_TIMEOUT_SECS,
};
use crate::models::{trailing_change_pct, Ohlcv, ScanResult};
use crate::services::fetcher::StockFetcher;
use crate::services::scoring::score_series;

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub min_score: u32,
    pub max_results: usize,
    pub workers: usize,
    pub scan_timeout: Duration,
    pub task_timeout: Duration,
    pub period: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            max_results: DEFAULT_MAX_RESULTS,
            workers: DEFAULT_SCAN_WORKERS,
            scan_timeout: Duration::from_secs(DEFAULT_SCAN_TIMEOUT_SECS),
            task_timeout: Duration::from_secs(DEFAULT_TASK_TIMEOUT_SECS),
            period: DEFAULT_PERIOD.to_string(),
        }
    }
}

/// Score an already-fetched series into a scan row. `None` when the
/// series is empty or the score misses the minimum.
pub fn evaluate_symbol(
    symbol: &str,
    company: &str,
    bars: &[Ohlcv],
    min_score: u32,
) -> Option<ScanResult> {
    if bars.is_empty() {
        return None;
    }

    let scored = score_series(bars);
    if scored.score < min_score {
        debug!(symbol = symbol, score = scored.score, min_score = min_score, "Below minimum score");
        return None;
    }

    let price = bars[bars.len() - 1].close;
    Some(ScanResult {
        symbol: symbol.to_string(),
        company: company.to_string(),
        price,
        change_1d_pct: trailing_change_pct(bars, 1),
        change_5d_pct: trailing_change_pct(bars, 5),
        rsi: scored.frame.latest_rsi(),
        volume_ratio: scored.frame.latest_volume_ratio(),
        score: scored.score,
        signals: scored.signals,
        frame: scored.frame,
    })
}

/// Stable-sort results descending by score (ties keep encounter order)
/// and truncate to the result cap.
pub fn rank_results(mut results: Vec<ScanResult>, max_results: usize) -> Vec<ScanResult> {
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results.truncate(max_results);
    results
}

/// Scan a universe slice: fetch + score each pair concurrently, keep
/// scores at or above the minimum, rank and truncate. Partial results
/// are returned when the scan deadline passes.
pub async fn scan(
    fetcher: Arc<StockFetcher>,
    universe: &[(String, String)],
    config: &ScanConfig,
) -> Vec<ScanResult> {
    let started = Instant::now();
    let deadline = started + config.scan_timeout;
    let semaphore = Arc::new(Semaphore::new(config.workers.max(1)));

    info!(
        symbols = universe.len(),
        min_score = config.min_score,
        workers = config.workers,
        period = config.period,
        "Starting batch scan"
    );

    let mut handles = Vec::with_capacity(universe.len());
    for (symbol, company) in universe.iter().cloned() {
        let fetcher = Arc::clone(&fetcher);
        let semaphore = Arc::clone(&semaphore);
        let period = config.period.clone();
        let min_score = config.min_score;

        handles.push(tokio::spawn(async move {
            // Closed only when the pool is dropped, which cannot happen
            // while tasks are still being collected.
            let _permit = semaphore.acquire_owned().await.ok()?;
            let bars = fetcher.fetch_with_fallback(&symbol, &period).await;
            evaluate_symbol(&symbol, &company, &bars, min_score)
        }));
    }

    let mut results = Vec::new();
    let mut dropped = 0usize;
    for handle in handles {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            // Deadline passed: stop awaiting, abandon the rest.
            handle.abort();
            dropped += 1;
            continue;
        }

        let per_task = remaining.min(config.task_timeout);
        match tokio::time::timeout(per_task, handle).await {
            Ok(Ok(Some(result))) => results.push(result),
            Ok(Ok(None)) => {}
            Ok(Err(e)) => {
                warn!(error = %e, "Scan task failed");
                dropped += 1;
            }
            Err(_) => {
                debug!("Scan task timed out");
                dropped += 1;
            }
        }
    }

    let ranked = rank_results(results, config.max_results);
    info!(
        results = ranked.len(),
        dropped = dropped,
        elapsed_s = started.elapsed().as_secs_f64(),
        "Batch scan finished"
    );
    ranked
}
