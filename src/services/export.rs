//! Flat delimited export of scan results.

use std::path::Path;

use tracing::info;

use crate::error::{AppError, Result};
use crate::models::ScanResult;

/// Write scan results as a flat CSV table: one row per symbol with the
/// headline numbers and the top signal.
pub fn write_csv(results: &[ScanResult], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::Io(format!("Failed to create {}: {}", path.display(), e)))?;

    writer.write_record([
        "symbol",
        "company",
        "price",
        "change_1d_pct",
        "change_5d_pct",
        "rsi",
        "volume_ratio",
        "score",
        "top_signal",
    ])?;

    for result in results {
        writer.write_record([
            result.symbol.clone(),
            result.company.clone(),
            format!("{:.2}", result.price),
            format!("{:.2}", result.change_1d_pct),
            format!("{:.2}", result.change_5d_pct),
            format!("{:.1}", result.rsi),
            format!("{:.2}", result.volume_ratio),
            result.score.to_string(),
            result.top_signal().to_string(),
        ])?;
    }

    writer.flush()?;
    info!(path = %path.display(), rows = results.len(), "Exported scan results");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IndicatorFrame;

    fn sample_result() -> ScanResult {
        ScanResult {
            symbol: "TCS.NS".to_string(),
            company: "Tata Consultancy Services".to_string(),
            price: 3450.55,
            change_1d_pct: 1.25,
            change_5d_pct: 4.5,
            rsi: 62.3,
            volume_ratio: 1.8,
            score: 12,
            signals: vec!["MACD above signal".to_string(), "High volume".to_string()],
            frame: IndicatorFrame::default(),
        }
    }

    #[test]
    fn test_write_csv_round_trip() {
        let path = std::env::temp_dir().join("stockscan_export_test.csv");
        write_csv(&[sample_result()], &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("symbol,company,price"));
        assert!(contents.contains("TCS.NS"));
        assert!(contents.contains("MACD above signal"));

        let _ = std::fs::remove_file(&path);
    }
}
