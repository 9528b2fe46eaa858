//! Heuristic next-period prediction and Monte Carlo price simulation.
//!
//! The prediction model is a second additive scorer producing a 0-100
//! confidence, mapped onto a predicted one-period return by scaling the
//! trailing 5-day mean return. The simulator runs independent geometric
//! random-walk paths with daily steps. Neither is a validated
//! forecasting system; the formulas are the product behavior.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use tracing::debug;

use crate::constants::{
    FORECAST_DECAY, MAX_CONFIDENCE, MIN_BARS_FOR_PREDICTION, MIN_SIMULATED_PRICE,
    PREDICTED_RETURN_CLAMP, TRADING_DAYS_PER_YEAR,
};
use crate::models::{closes, Ohlcv};
use crate::services::scoring::compute_frame;

#[derive(Debug, Clone)]
pub struct Prediction {
    /// Predicted next-period fractional return, clamped to [-0.10, 0.10]
    pub predicted_return: f64,
    /// Confidence in [0, 100]; equals the heuristic score
    pub confidence: u32,
    pub signals: Vec<String>,
}

/// One row of the decayed multi-day forecast table
#[derive(Debug, Clone)]
pub struct ForecastRow {
    pub days: u32,
    pub expected_return: f64,
    pub target_price: f64,
    pub confidence: f64,
}

/// Distribution summary of simulated terminal prices
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    /// Terminal price at the 5th/25th/50th/75th/95th percentiles
    pub percentiles: [f64; 5],
    /// Share of paths ending below the start price, in percent
    pub probability_of_loss_pct: f64,
    /// Loss to the 5th percentile relative to the start price, in percent
    pub value_at_risk_pct: f64,
    /// Best path's gain relative to the start price, in percent
    pub max_gain_pct: f64,
}

/// Run the heuristic prediction model over a bar series.
///
/// Series shorter than 30 bars yield a zero-return, zero-confidence
/// prediction rather than an error.
pub fn predict(bars: &[Ohlcv]) -> Prediction {
    if bars.len() < MIN_BARS_FOR_PREDICTION {
        debug!(bars = bars.len(), "Series too short for prediction");
        return Prediction {
            predicted_return: 0.0,
            confidence: 0,
            signals: vec!["Insufficient data".to_string()],
        };
    }

    let close = closes(bars);
    let frame = compute_frame(bars);
    let n = close.len();
    let last = close[n - 1];

    let mut score: i32 = 0;
    let mut signals: Vec<String> = Vec::new();

    // RSI
    let rsi = frame.rsi[n - 1];
    if rsi < 30.0 {
        score += 15;
        signals.push("RSI oversold - buy signal".to_string());
    } else if rsi > 70.0 {
        score -= 10;
        signals.push("RSI overbought - caution".to_string());
    } else if (45.0..=55.0).contains(&rsi) {
        score += 5;
        signals.push("RSI neutral".to_string());
    }

    // MACD
    if frame.macd[n - 1] > frame.macd_signal[n - 1] {
        score += 15;
        signals.push("MACD bullish".to_string());
    } else {
        score -= 5;
        signals.push("MACD bearish".to_string());
    }

    // Moving averages
    let sma20 = frame.sma20[n - 1];
    let sma50 = frame.sma50[n - 1];
    if last > 0.0 && sma20 > 0.0 && sma50 > 0.0 {
        if last > sma20 && sma20 > sma50 {
            score += 20;
            signals.push("Strong uptrend".to_string());
        } else if last > sma20 {
            score += 10;
            signals.push("Short-term bullish".to_string());
        } else {
            score -= 10;
            signals.push("Below moving averages".to_string());
        }
    }

    // Volume
    let volume_ratio = frame.volume_ratio[n - 1];
    if volume_ratio > 2.0 {
        score += 15;
        signals.push("Volume explosion".to_string());
    } else if volume_ratio > 1.5 {
        score += 10;
        signals.push("High volume".to_string());
    }

    // 5-day momentum
    let prev = close[n - 5];
    if prev > 0.0 {
        let change_5d = (last - prev) / prev;
        if change_5d > 0.05 {
            score += 15;
            signals.push("Strong momentum".to_string());
        } else if change_5d > 0.02 {
            score += 10;
            signals.push("Positive momentum".to_string());
        } else if change_5d < -0.05 {
            score -= 15;
            signals.push("Negative momentum".to_string());
        }
    }

    let confidence = score.clamp(0, MAX_CONFIDENCE) as u32;

    let mean_return = trailing_mean_return(&close, 5);
    let predicted = if confidence > 70 {
        mean_return * 1.5 + 0.01
    } else if confidence < 30 {
        mean_return * 0.5 - 0.01
    } else {
        mean_return
    };
    let predicted_return = predicted.clamp(-PREDICTED_RETURN_CLAMP, PREDICTED_RETURN_CLAMP);

    Prediction {
        predicted_return,
        confidence,
        signals,
    }
}

/// Decayed forecast rows for 1/3/5/7-day horizons
pub fn extended_forecast(prediction: &Prediction, current_price: f64) -> Vec<ForecastRow> {
    [1u32, 3, 5, 7]
        .iter()
        .map(|&days| {
            let decay = FORECAST_DECAY.powi(days as i32 - 1);
            let expected_return = prediction.predicted_return * decay;
            ForecastRow {
                days,
                expected_return,
                target_price: current_price * (1.0 + expected_return),
                confidence: prediction.confidence as f64 * decay,
            }
        })
        .collect()
}

/// Mean of the trailing `window` daily fractional returns
fn trailing_mean_return(close: &[f64], window: usize) -> f64 {
    let mut returns = Vec::new();
    for i in 1..close.len() {
        if close[i - 1] != 0.0 {
            returns.push((close[i] - close[i - 1]) / close[i - 1]);
        }
    }
    if returns.is_empty() {
        return 0.0;
    }
    let tail = &returns[returns.len().saturating_sub(window)..];
    tail.iter().sum::<f64>() / tail.len() as f64
}

/// Annualized volatility and drift from daily returns, plus the latest
/// price. `None` when there are not enough returns to estimate from.
pub fn annualized_stats(bars: &[Ohlcv]) -> Option<(f64, f64, f64)> {
    let close = closes(bars);
    let mut returns = Vec::new();
    for i in 1..close.len() {
        if close[i - 1] != 0.0 {
            returns.push((close[i] - close[i - 1]) / close[i - 1]);
        }
    }
    if returns.len() <= 10 {
        return None;
    }

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>()
        / (returns.len() - 1) as f64;

    let volatility = variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt();
    let drift = mean * TRADING_DAYS_PER_YEAR;
    Some((volatility, drift, close[close.len() - 1]))
}

/// Simulate geometric-random-walk terminal prices.
///
/// Each path takes `days` steps of size dt = 1/252 with an independent
/// standard-normal shock, floored at a minimum positive price.
/// Deterministic when `seed` is given.
pub fn monte_carlo(
    current_price: f64,
    volatility: f64,
    drift: f64,
    days: usize,
    paths: usize,
    seed: Option<u64>,
) -> Vec<f64> {
    if !current_price.is_finite() || !volatility.is_finite() || !drift.is_finite() {
        return vec![current_price; paths];
    }

    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let dt = 1.0 / TRADING_DAYS_PER_YEAR;
    let mut results = Vec::with_capacity(paths);

    for _ in 0..paths {
        let mut price = current_price;
        for _ in 0..days {
            let shock: f64 = rng.sample(StandardNormal);
            let change = price * (drift * dt + volatility * dt.sqrt() * shock);
            price = (price + change).max(MIN_SIMULATED_PRICE);
        }
        results.push(price);
    }

    results
}

/// Summarize terminal prices against the starting price
pub fn summarize_simulation(terminal_prices: &[f64], start_price: f64) -> SimulationSummary {
    let mut sorted = terminal_prices.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let percentiles = [
        percentile(&sorted, 5.0),
        percentile(&sorted, 25.0),
        percentile(&sorted, 50.0),
        percentile(&sorted, 75.0),
        percentile(&sorted, 95.0),
    ];

    let losses = sorted.iter().filter(|&&p| p < start_price).count();
    let probability_of_loss_pct = if sorted.is_empty() {
        0.0
    } else {
        losses as f64 / sorted.len() as f64 * 100.0
    };

    let value_at_risk_pct = if start_price == 0.0 {
        0.0
    } else {
        (start_price - percentiles[0]) / start_price * 100.0
    };

    let max_gain_pct = match sorted.last() {
        Some(&best) if start_price != 0.0 => (best - start_price) / start_price * 100.0,
        _ => 0.0,
    };

    SimulationSummary {
        percentiles,
        probability_of_loss_pct,
        value_at_risk_pct,
        max_gain_pct,
    }
}

/// Linear-interpolation percentile over a pre-sorted slice
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = pct / 100.0 * (n - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = (lower + 1).min(n - 1);
            let fraction = rank - lower as f64;
            sorted[lower] + fraction * (sorted[upper] - sorted[lower])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bars_from_closes(prices: &[f64]) -> Vec<Ohlcv> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                    + chrono::Duration::days(i as i64);
                Ohlcv::new(time, close, close, close, close, 1000)
            })
            .collect()
    }

    #[test]
    fn test_predict_insufficient_data() {
        let bars = bars_from_closes(&vec![100.0; 29]);
        let prediction = predict(&bars);
        assert_eq!(prediction.confidence, 0);
        assert_eq!(prediction.predicted_return, 0.0);
        assert_eq!(prediction.signals, vec!["Insufficient data".to_string()]);
    }

    #[test]
    fn test_predict_clamps() {
        // Steep 15%/day climb: the momentum-scaled return must still be
        // clamped to +10% and confidence kept inside [0, 100].
        let prices: Vec<f64> = (0..40).map(|i| 100.0 * 1.15f64.powi(i)).collect();
        let prediction = predict(&bars_from_closes(&prices));

        assert!(prediction.confidence <= 100);
        assert!(prediction.predicted_return <= PREDICTED_RETURN_CLAMP + 1e-12);
        assert!(prediction.predicted_return >= -PREDICTED_RETURN_CLAMP - 1e-12);
    }

    #[test]
    fn test_extended_forecast_decays() {
        let prediction = Prediction {
            predicted_return: 0.04,
            confidence: 80,
            signals: Vec::new(),
        };
        let rows = extended_forecast(&prediction, 100.0);

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].days, 1);
        assert!((rows[0].expected_return - 0.04).abs() < 1e-12);
        assert!((rows[1].expected_return - 0.04 * 0.8 * 0.8).abs() < 1e-12);
        assert!(rows[3].confidence < rows[0].confidence);
    }

    #[test]
    fn test_monte_carlo_zero_volatility_zero_drift() {
        let results = monte_carlo(250.0, 0.0, 0.0, 30, 200, Some(7));
        assert_eq!(results.len(), 200);
        for price in results {
            assert!((price - 250.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_monte_carlo_seeded_reproducible() {
        let a = monte_carlo(100.0, 0.3, 0.05, 10, 50, Some(42));
        let b = monte_carlo(100.0, 0.3, 0.05, 10, 50, Some(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_monte_carlo_price_floor() {
        // Violent downward drift cannot push a path non-positive.
        let results = monte_carlo(1.0, 5.0, -50.0, 60, 100, Some(3));
        for price in results {
            assert!(price >= MIN_SIMULATED_PRICE);
        }
    }

    #[test]
    fn test_annualized_stats_needs_enough_returns() {
        assert!(annualized_stats(&bars_from_closes(&vec![100.0; 10])).is_none());
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64 * 0.9).sin()).collect();
        let (volatility, _, last) = annualized_stats(&bars_from_closes(&prices)).unwrap();
        assert!(volatility >= 0.0);
        assert!((last - prices[29]).abs() < 1e-9);
    }

    #[test]
    fn test_summarize_simulation() {
        let prices = vec![90.0, 95.0, 100.0, 105.0, 110.0];
        let summary = summarize_simulation(&prices, 100.0);

        assert!(summary.percentiles[0] <= summary.percentiles[4]);
        assert!((summary.percentiles[2] - 100.0).abs() < 1e-9);
        // 2 of 5 paths end below the start price
        assert!((summary.probability_of_loss_pct - 40.0).abs() < 1e-9);
        assert!((summary.max_gain_pct - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentile_interpolation() {
        let sorted = vec![1.0, 2.0, 3.0, 4.0];
        assert!((percentile(&sorted, 50.0) - 2.5).abs() < 1e-12);
        assert!((percentile(&sorted, 0.0) - 1.0).abs() < 1e-12);
        assert!((percentile(&sorted, 100.0) - 4.0).abs() < 1e-12);
    }
}
