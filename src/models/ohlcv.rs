use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One daily OHLCV (Open, High, Low, Close, Volume) bar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ohlcv {
    /// Trading day of the bar
    #[serde(with = "chrono::serde::ts_seconds")]
    pub time: DateTime<Utc>,

    /// Opening price
    pub open: f64,

    /// Highest price
    pub high: f64,

    /// Lowest price
    pub low: f64,

    /// Closing price
    pub close: f64,

    /// Trading volume
    pub volume: u64,

    /// Optional ticker symbol
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl Ohlcv {
    pub fn new(
        time: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
            symbol: None,
        }
    }
}

/// Extract the close column from a bar series
pub fn closes(bars: &[Ohlcv]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Extract the high column from a bar series
pub fn highs(bars: &[Ohlcv]) -> Vec<f64> {
    bars.iter().map(|b| b.high).collect()
}

/// Extract the volume column as floats for windowed averaging
pub fn volumes(bars: &[Ohlcv]) -> Vec<f64> {
    bars.iter().map(|b| b.volume as f64).collect()
}

/// Percent change between the last close and the close `lookback` bars
/// earlier. Returns 0.0 when the series is too short or the reference
/// close is zero.
pub fn trailing_change_pct(bars: &[Ohlcv], lookback: usize) -> f64 {
    if bars.len() <= lookback {
        return 0.0;
    }
    let current = bars[bars.len() - 1].close;
    let reference = bars[bars.len() - 1 - lookback].close;
    if reference == 0.0 {
        return 0.0;
    }
    (current - reference) / reference * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar(day: u32, close: f64) -> Ohlcv {
        let time = Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap();
        Ohlcv::new(time, close, close, close, close, 1000)
    }

    #[test]
    fn test_trailing_change_pct() {
        let bars = vec![bar(1, 100.0), bar(2, 110.0)];
        assert!((trailing_change_pct(&bars, 1) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_trailing_change_pct_short_series() {
        let bars = vec![bar(1, 100.0)];
        assert_eq!(trailing_change_pct(&bars, 1), 0.0);
        assert_eq!(trailing_change_pct(&[], 5), 0.0);
    }
}
