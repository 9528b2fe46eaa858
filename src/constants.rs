//! Canonical indicator windows, scoring thresholds and scan defaults.
//!
//! The scoring rule table lives in `services::scoring`; this module only
//! holds the numeric knobs so every consumer (scoring, prediction, CLI
//! defaults) agrees on the same values.

/// RSI lookback window
pub const RSI_PERIOD: usize = 14;

/// MACD fast EMA span
pub const MACD_FAST_SPAN: usize = 12;

/// MACD slow EMA span
pub const MACD_SLOW_SPAN: usize = 26;

/// MACD signal-line EMA span
pub const MACD_SIGNAL_SPAN: usize = 9;

/// Short simple moving average window
pub const SMA_SHORT_WINDOW: usize = 20;

/// Long simple moving average window
pub const SMA_LONG_WINDOW: usize = 50;

/// EMA span used in the moving-average stack check
pub const EMA_SPAN: usize = 20;

/// Short window for the volume-surge ratio (recent bars)
pub const VOLUME_SHORT_WINDOW: usize = 3;

/// Long window for the volume-surge ratio (baseline bars)
pub const VOLUME_LONG_WINDOW: usize = 20;

/// Lookback for the 52-week-high breakout check (trading days)
pub const BREAKOUT_LONG_WINDOW: usize = 252;

/// Lookback for the 20-day-high breakout check
pub const BREAKOUT_SHORT_WINDOW: usize = 20;

/// Minimum bars required before the scoring engine produces a score
pub const MIN_BARS_FOR_SCORE: usize = 20;

/// Minimum bars required before the prediction model produces a forecast
pub const MIN_BARS_FOR_PREDICTION: usize = 30;

/// Scores are clipped to [0, MAX_SCORE]
pub const MAX_SCORE: i32 = 20;

/// Confidence from the prediction model is clipped to [0, MAX_CONFIDENCE]
pub const MAX_CONFIDENCE: i32 = 100;

/// Predicted one-period returns are clamped to +/- this fraction
pub const PREDICTED_RETURN_CLAMP: f64 = 0.10;

/// Per-day decay applied to the extended forecast horizons
pub const FORECAST_DECAY: f64 = 0.8;

/// Lookback periods tried in order by the fetch adapter
pub const FALLBACK_PERIODS: &[&str] = &["6mo", "3mo", "1y", "2y"];

/// Default lookback period requested from the provider
pub const DEFAULT_PERIOD: &str = "6mo";

/// Fetch cache entries expire after this many seconds
pub const FETCH_CACHE_TTL_SECS: u64 = 300;

/// Default bounded worker count for the batch scanner.
/// Sized for provider rate limits, not CPU throughput.
pub const DEFAULT_SCAN_WORKERS: usize = 8;

/// Default minimum score for a symbol to appear in scan output
pub const DEFAULT_MIN_SCORE: u32 = 10;

/// Default cap on the number of scan results returned
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// Overall wall-clock deadline for a batch scan (seconds)
pub const DEFAULT_SCAN_TIMEOUT_SECS: u64 = 120;

/// Per-task result-retrieval deadline (seconds)
pub const DEFAULT_TASK_TIMEOUT_SECS: u64 = 15;

/// Trading days per year, used to annualize volatility and drift
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Simulated prices are floored here so paths never go non-positive
pub const MIN_SIMULATED_PRICE: f64 = 0.01;

/// Default Monte Carlo horizon (trading days)
pub const DEFAULT_SIMULATION_DAYS: usize = 30;

/// Default Monte Carlo path count
pub const DEFAULT_SIMULATION_PATHS: usize = 1000;

/// Epsilon substituted for a zero average loss in the RSI calculation
pub const RSI_LOSS_EPSILON: f64 = 1e-10;
