//! Post-scan predicate filters.
//!
//! Each predicate is independently optional; active predicates compose
//! by logical AND, so every applied filter can only shrink the result
//! set. The default (all-`None`) filter is the identity transform.

use crate::models::ScanResult;

#[derive(Debug, Clone, Default)]
pub struct ScanFilter {
    /// Keep results with volume ratio at or above this floor
    pub min_volume_ratio: Option<f64>,
    /// Keep results with RSI inside this closed band
    pub rsi_band: Option<(f64, f64)>,
    /// Keep results with 1-day percent change at or above this floor
    pub min_change_1d_pct: Option<f64>,
    /// Keep results with 5-day percent change at or above this floor
    pub min_change_5d_pct: Option<f64>,
}

impl ScanFilter {
    pub fn is_identity(&self) -> bool {
        self.min_volume_ratio.is_none()
            && self.rsi_band.is_none()
            && self.min_change_1d_pct.is_none()
            && self.min_change_5d_pct.is_none()
    }

    pub fn matches(&self, result: &ScanResult) -> bool {
        if let Some(floor) = self.min_volume_ratio {
            if result.volume_ratio < floor {
                return false;
            }
        }
        if let Some((low, high)) = self.rsi_band {
            if result.rsi < low || result.rsi > high {
                return false;
            }
        }
        if let Some(floor) = self.min_change_1d_pct {
            if result.change_1d_pct < floor {
                return false;
            }
        }
        if let Some(floor) = self.min_change_5d_pct {
            if result.change_5d_pct < floor {
                return false;
            }
        }
        true
    }

    /// Retain matching results, preserving order
    pub fn apply(&self, results: Vec<ScanResult>) -> Vec<ScanResult> {
        if self.is_identity() {
            return results;
        }
        results.into_iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IndicatorFrame;

    fn result(symbol: &str, rsi: f64, volume_ratio: f64, change_1d: f64) -> ScanResult {
        ScanResult {
            symbol: symbol.to_string(),
            company: symbol.to_string(),
            price: 100.0,
            change_1d_pct: change_1d,
            change_5d_pct: change_1d * 2.0,
            rsi,
            volume_ratio,
            score: 10,
            signals: Vec::new(),
            frame: IndicatorFrame::default(),
        }
    }

    fn sample() -> Vec<ScanResult> {
        vec![
            result("A", 60.0, 2.5, 3.0),
            result("B", 40.0, 1.1, -1.0),
            result("C", 70.0, 3.5, 6.0),
        ]
    }

    #[test]
    fn test_identity_filter_keeps_everything() {
        let filter = ScanFilter::default();
        assert!(filter.is_identity());
        assert_eq!(filter.apply(sample()).len(), 3);
    }

    #[test]
    fn test_filters_compose_by_and() {
        let filter = ScanFilter {
            min_volume_ratio: Some(2.0),
            rsi_band: Some((55.0, 75.0)),
            ..ScanFilter::default()
        };
        let kept = filter.apply(sample());
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].symbol, "A");
        assert_eq!(kept[1].symbol, "C");
    }

    #[test]
    fn test_independent_predicates_commute() {
        let volume_only = ScanFilter {
            min_volume_ratio: Some(2.0),
            ..ScanFilter::default()
        };
        let momentum_only = ScanFilter {
            min_change_1d_pct: Some(5.0),
            ..ScanFilter::default()
        };

        let a_then_b: Vec<String> = momentum_only
            .apply(volume_only.apply(sample()))
            .into_iter()
            .map(|r| r.symbol)
            .collect();
        let b_then_a: Vec<String> = volume_only
            .apply(momentum_only.apply(sample()))
            .into_iter()
            .map(|r| r.symbol)
            .collect();

        assert_eq!(a_then_b, b_then_a);
        assert_eq!(a_then_b, vec!["C".to_string()]);
    }
}
