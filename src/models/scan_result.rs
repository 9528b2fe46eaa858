use serde::Serialize;

use crate::models::indicators::IndicatorFrame;

/// One ranked row of batch-scan output. Immutable once produced.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub symbol: String,
    pub company: String,

    /// Latest closing price
    pub price: f64,

    /// Percent change over the last bar
    pub change_1d_pct: f64,

    /// Percent change over the trailing five bars
    pub change_5d_pct: f64,

    /// Latest RSI value
    pub rsi: f64,

    /// Latest short/long average volume ratio
    pub volume_ratio: f64,

    /// Composite technical score, clipped to [0, 20]
    pub score: u32,

    /// Signal descriptions in rule-priority order
    pub signals: Vec<String>,

    /// Full indicator columns for charting consumers
    #[serde(skip_serializing)]
    pub frame: IndicatorFrame,
}

impl ScanResult {
    /// Highest-priority signal, empty string when none fired
    pub fn top_signal(&self) -> &str {
        self.signals.first().map(String::as_str).unwrap_or("")
    }
}
