//! Composite technical scoring engine.
//!
//! Maps one symbol's OHLCV series to an integer score in [0, 20] plus an
//! ordered list of human-readable signals. Scoring is additive across
//! independent rule groups; inside a group an if/else-if chain means at
//! most one rule fires, appending exactly one signal. The engine fails
//! soft: too-short or degenerate input yields score 0 and no signals,
//! never an error to the caller.

use tracing::debug;

use crate::constants::{
    BREAKOUT_LONG_WINDOW, BREAKOUT_SHORT_WINDOW, EMA_SPAN, MAX_SCORE, MIN_BARS_FOR_SCORE,
    SMA_LONG_WINDOW, SMA_SHORT_WINDOW,
};
use crate::models::indicators::{ema, macd, rolling_volume_ratio, rsi_default, sma, IndicatorFrame};
use crate::models::{closes, highs, volumes, Ohlcv};

/// Scoring engine output: score, prioritized signals and the indicator
/// frame for charting consumers.
#[derive(Debug, Clone, Default)]
pub struct Scored {
    pub score: u32,
    pub signals: Vec<String>,
    pub frame: IndicatorFrame,
}

/// Compute the full indicator frame for a bar series. Every column comes
/// back with the same length as `bars`.
pub fn compute_frame(bars: &[Ohlcv]) -> IndicatorFrame {
    let close = closes(bars);
    let volume = volumes(bars);
    let (macd_line, macd_signal) = macd(&close);

    IndicatorFrame {
        rsi: rsi_default(&close),
        macd: macd_line,
        macd_signal,
        sma20: sma(&close, SMA_SHORT_WINDOW),
        sma50: sma(&close, SMA_LONG_WINDOW),
        ema20: ema(&close, EMA_SPAN),
        volume_ratio: rolling_volume_ratio(&volume),
    }
}

/// Score one OHLCV series. Returns score 0 and no signals for series
/// shorter than 20 bars or with a degenerate latest close.
pub fn score_series(bars: &[Ohlcv]) -> Scored {
    if bars.len() < MIN_BARS_FOR_SCORE {
        debug!(bars = bars.len(), "Series too short to score");
        return Scored::default();
    }

    let close = closes(bars);
    let last = close[close.len() - 1];
    if !last.is_finite() || last <= 0.0 {
        debug!(close = last, "Degenerate latest close, scoring skipped");
        return Scored::default();
    }

    let frame = compute_frame(bars);
    let high = highs(bars);
    let n = close.len();

    let mut score: i32 = 0;
    let mut signals: Vec<String> = Vec::new();

    // RSI
    let rsi_now = frame.rsi[n - 1];
    if (55.0..=75.0).contains(&rsi_now) {
        score += 3;
        signals.push("RSI strong momentum zone".to_string());
    } else if (45.0..55.0).contains(&rsi_now) {
        score += 2;
        signals.push("RSI neutral-bullish".to_string());
    } else if rsi_now < 30.0 {
        score += 2;
        signals.push("RSI oversold".to_string());
    } else if rsi_now > 80.0 {
        score -= 1;
        signals.push("RSI overbought".to_string());
    }

    // MACD
    let macd_now = frame.macd[n - 1];
    let signal_now = frame.macd_signal[n - 1];
    let crossed_up = macd_now > signal_now && frame.macd[n - 2] <= frame.macd_signal[n - 2];
    if crossed_up {
        score += 3;
        signals.push("MACD bullish crossover".to_string());
    } else if macd_now > signal_now {
        score += 2;
        signals.push("MACD above signal".to_string());
    } else if macd_now > 0.0 {
        score += 1;
        signals.push("MACD positive".to_string());
    }

    // Volume surge
    let vol_ratio = frame.volume_ratio[n - 1];
    if vol_ratio >= 3.0 {
        score += 4;
        signals.push("Explosive volume".to_string());
    } else if vol_ratio >= 2.0 {
        score += 3;
        signals.push("High volume".to_string());
    } else if vol_ratio >= 1.5 {
        score += 2;
        signals.push("Above average volume".to_string());
    } else if vol_ratio >= 1.2 {
        score += 1;
        signals.push("Elevated volume".to_string());
    }

    // 1-day momentum
    let change_1d = fractional_change(&close, 1);
    if change_1d > 0.05 {
        score += 2;
        signals.push("Strong 1-day move".to_string());
    } else if change_1d > 0.02 {
        score += 1;
        signals.push("Moderate 1-day move".to_string());
    }

    // 5-day momentum
    let change_5d = fractional_change(&close, 5);
    if change_5d > 0.10 {
        score += 2;
        signals.push("Strong 5-day momentum".to_string());
    } else if change_5d > 0.05 {
        score += 1;
        signals.push("Positive 5-day momentum".to_string());
    }

    // Breakout
    let high_long = window_max(&high, BREAKOUT_LONG_WINDOW);
    let high_short = window_max(&high, BREAKOUT_SHORT_WINDOW);
    if last >= high_long {
        score += 3;
        signals.push("52-week high breakout".to_string());
    } else if last >= high_short {
        score += 2;
        signals.push("20-day high breakout".to_string());
    } else if last >= 0.98 * high_short {
        score += 1;
        signals.push("Near 20-day high".to_string());
    }

    // Moving-average stack
    let ema20 = frame.ema20[n - 1];
    let sma20 = frame.sma20[n - 1];
    let sma50 = frame.sma50[n - 1];
    if last > ema20 && ema20 > sma20 && sma20 > sma50 {
        score += 3;
        signals.push("Full bullish MA stack".to_string());
    } else if last > sma20 && sma20 > sma50 {
        score += 2;
        signals.push("Bullish MA alignment".to_string());
    } else if last > sma20 {
        score += 1;
        signals.push("Above 20-day MA".to_string());
    }

    let clipped = score.clamp(0, MAX_SCORE) as u32;
    Scored {
        score: clipped,
        signals,
        frame,
    }
}

/// Fractional change between the last close and the close `lookback`
/// bars earlier; 0.0 when the reference is unusable.
fn fractional_change(close: &[f64], lookback: usize) -> f64 {
    if close.len() <= lookback {
        return 0.0;
    }
    let reference = close[close.len() - 1 - lookback];
    if reference == 0.0 || !reference.is_finite() {
        return 0.0;
    }
    (close[close.len() - 1] - reference) / reference
}

/// Maximum over the trailing `window` values (or the whole slice when
/// shorter).
fn window_max(values: &[f64], window: usize) -> f64 {
    let start = values.len().saturating_sub(window);
    values[start..]
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bar(day: i64, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Ohlcv {
        let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
            + chrono::Duration::days(day);
        Ohlcv::new(time, open, high, low, close, volume)
    }

    fn flat_series(len: usize, price: f64, volume: u64) -> Vec<Ohlcv> {
        (0..len)
            .map(|i| bar(i as i64, price, price, price, price, volume))
            .collect()
    }

    #[test]
    fn test_short_series_scores_zero() {
        let bars = flat_series(19, 100.0, 1000);
        let scored = score_series(&bars);
        assert_eq!(scored.score, 0);
        assert!(scored.signals.is_empty());
    }

    #[test]
    fn test_empty_series_scores_zero() {
        let scored = score_series(&[]);
        assert_eq!(scored.score, 0);
        assert!(scored.signals.is_empty());
    }

    #[test]
    fn test_score_always_in_range() {
        // Strongly bullish series: rising closes, surge volume, new highs.
        let mut bars = Vec::new();
        for i in 0..60 {
            let price = 100.0 + i as f64 * 0.5;
            let volume = if i >= 57 { 50_000 } else { 5_000 };
            bars.push(bar(i, price - 0.2, price + 0.3, price - 0.5, price, volume));
        }
        let scored = score_series(&bars);
        assert!(scored.score <= 20);
    }

    #[test]
    fn test_flat_series_fires_only_neutral_groups() {
        // Flat 30-bar series: RSI pins at neutral 50, momentum and volume
        // groups stay silent, the breakout tie fires (close equals every
        // prior high) and the MA stack does not (close == sma == ema).
        let bars = flat_series(30, 100.0, 1000);
        let scored = score_series(&bars);

        assert!((scored.frame.rsi[29] - 50.0).abs() < 1e-9);
        assert!(scored.signals.contains(&"RSI neutral-bullish".to_string()));
        assert!(scored.signals.contains(&"52-week high breakout".to_string()));
        assert!(!scored.signals.iter().any(|s| s.contains("volume")));
        assert!(!scored.signals.iter().any(|s| s.contains("MA")));
        assert!(!scored.signals.iter().any(|s| s.contains("MACD")));
        // RSI neutral +2, 52-week breakout tie +3
        assert_eq!(scored.score, 5);
    }

    #[test]
    fn test_explosive_volume_group() {
        // Flat prices so only the volume group differs from the flat
        // baseline; volume jumps 10x on the final 3 bars which pushes the
        // short/long ratio past 3.0.
        let mut bars = flat_series(17, 100.0, 1_000);
        for i in 17..20 {
            bars.push(bar(i as i64, 100.0, 100.0, 100.0, 100.0, 10_000));
        }

        let scored = score_series(&bars);
        assert!(scored.frame.volume_ratio[19] >= 3.0);
        assert!(scored.signals.contains(&"Explosive volume".to_string()));

        // Same series without the surge scores exactly 4 points less.
        let baseline = score_series(&flat_series(20, 100.0, 1_000));
        assert_eq!(scored.score, baseline.score + 4);
    }

    #[test]
    fn test_one_signal_per_group() {
        let bars = flat_series(30, 100.0, 1000);
        let scored = score_series(&bars);

        let rsi_signals = scored
            .signals
            .iter()
            .filter(|s| s.starts_with("RSI"))
            .count();
        assert_eq!(rsi_signals, 1);
    }

    #[test]
    fn test_frame_columns_aligned() {
        let bars = flat_series(35, 100.0, 1000);
        let frame = compute_frame(&bars);
        assert_eq!(frame.rsi.len(), 35);
        assert_eq!(frame.macd.len(), 35);
        assert_eq!(frame.macd_signal.len(), 35);
        assert_eq!(frame.sma20.len(), 35);
        assert_eq!(frame.sma50.len(), 35);
        assert_eq!(frame.ema20.len(), 35);
        assert_eq!(frame.volume_ratio.len(), 35);
    }

    #[test]
    fn test_macd_crossover_priority() {
        // Decline then sharp recovery produces a fresh cross where the
        // crossover rule must win over the plain above-signal rule.
        let mut bars = Vec::new();
        let mut price = 120.0;
        for i in 0..25 {
            price -= 1.0;
            bars.push(bar(i, price, price + 0.5, price - 0.5, price, 1000));
        }
        for i in 25..31 {
            price += 4.0;
            bars.push(bar(i, price, price + 0.5, price - 0.5, price, 1000));
        }

        let scored = score_series(&bars);
        let macd_signals: Vec<&String> = scored
            .signals
            .iter()
            .filter(|s| s.starts_with("MACD"))
            .collect();
        assert!(macd_signals.len() <= 1);
    }
}
