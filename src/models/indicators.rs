//! Technical indicators over closing-price and volume series.
//!
//! Every function here is pure: same input slice, same output vector,
//! no hidden state. All outputs are aligned index-for-index with the
//! input. Leading indices with an incomplete window average whatever
//! samples exist so far (min-periods-of-one semantics), so no output
//! position is ever NaN or undefined.

use crate::constants::{
    MACD_FAST_SPAN, MACD_SIGNAL_SPAN, MACD_SLOW_SPAN, RSI_LOSS_EPSILON, RSI_PERIOD,
    VOLUME_LONG_WINDOW, VOLUME_SHORT_WINDOW,
};

/// Derived indicator columns, parallel to the source OHLCV series.
///
/// Invariant: every column has the same length as the source series.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct IndicatorFrame {
    pub rsi: Vec<f64>,
    pub macd: Vec<f64>,
    pub macd_signal: Vec<f64>,
    pub sma20: Vec<f64>,
    pub sma50: Vec<f64>,
    pub ema20: Vec<f64>,
    pub volume_ratio: Vec<f64>,
}

impl IndicatorFrame {
    pub fn len(&self) -> usize {
        self.rsi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rsi.is_empty()
    }

    /// Last RSI value, neutral 50 when the frame is empty
    pub fn latest_rsi(&self) -> f64 {
        self.rsi.last().copied().unwrap_or(50.0)
    }

    /// Last volume ratio, neutral 1.0 when the frame is empty
    pub fn latest_volume_ratio(&self) -> f64 {
        self.volume_ratio.last().copied().unwrap_or(1.0)
    }
}

/// Rolling arithmetic mean with a minimum period of one: indices before
/// `window` samples exist average over however many samples are available.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;

    for i in 0..values.len() {
        sum += values[i];
        if i >= window {
            sum -= values[i - window];
        }
        let count = (i + 1).min(window);
        out.push(sum / count as f64);
    }

    out
}

/// Simple Moving Average of closing prices
pub fn sma(closes: &[f64], window: usize) -> Vec<f64> {
    rolling_mean(closes, window)
}

/// Exponential Moving Average with `span` semantics.
///
/// Smoothing factor is `2 / (span + 1)`; the recursion is seeded with the
/// first value, so the output has no leading gap.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let first = match values.first() {
        Some(v) => *v,
        None => return out,
    };

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut prev = first;
    out.push(first);

    for value in &values[1..] {
        prev = alpha * value + (1.0 - alpha) * prev;
        out.push(prev);
    }

    out
}

/// Wilder-style RSI using a simple rolling mean of gains and losses.
///
/// The first bar's delta is treated as zero (prepend identity). A zero
/// average loss is replaced by a near-zero epsilon, which drives RSI
/// toward 100 when gains dominate instead of producing an undefined
/// value. A window with neither gains nor losses reads as neutral 50.
/// Output is strictly within [0, 100].
pub fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    if closes.is_empty() {
        return Vec::new();
    }

    let mut gains = vec![0.0; closes.len()];
    let mut losses = vec![0.0; closes.len()];
    for i in 1..closes.len() {
        let delta = closes[i] - closes[i - 1];
        if delta > 0.0 {
            gains[i] = delta;
        } else {
            losses[i] = -delta;
        }
    }

    let avg_gain = rolling_mean(&gains, period);
    let avg_loss = rolling_mean(&losses, period);

    avg_gain
        .iter()
        .zip(avg_loss.iter())
        .map(|(&gain, &loss)| {
            if gain == 0.0 && loss == 0.0 {
                // Flat window: zero net gain and loss is neutral, not oversold
                return 50.0;
            }
            let loss = if loss == 0.0 { RSI_LOSS_EPSILON } else { loss };
            let rs = gain / loss;
            100.0 - (100.0 / (1.0 + rs))
        })
        .collect()
}

/// RSI with the canonical 14-bar period
pub fn rsi_default(closes: &[f64]) -> Vec<f64> {
    rsi(closes, RSI_PERIOD)
}

/// MACD line and signal line.
///
/// MACD line is `ema(closes, 12) - ema(closes, 26)` elementwise; the
/// signal line is a 9-span EMA of the MACD line.
pub fn macd(closes: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let fast = ema(closes, MACD_FAST_SPAN);
    let slow = ema(closes, MACD_SLOW_SPAN);

    let line: Vec<f64> = fast.iter().zip(slow.iter()).map(|(f, s)| f - s).collect();
    let signal = ema(&line, MACD_SIGNAL_SPAN);

    (line, signal)
}

/// Rolling volume-surge ratio: short-window average volume divided by
/// long-window average volume at each index. A zero baseline reads as
/// neutral 1.0.
pub fn rolling_volume_ratio(volumes: &[f64]) -> Vec<f64> {
    let short = rolling_mean(volumes, VOLUME_SHORT_WINDOW);
    let long = rolling_mean(volumes, VOLUME_LONG_WINDOW);

    short
        .iter()
        .zip(long.iter())
        .map(|(&s, &l)| if l == 0.0 { 1.0 } else { s / l })
        .collect()
}
