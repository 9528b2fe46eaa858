use std::path::PathBuf;
use std::sync::Arc;

use crate::models::SymbolUniverse;
use crate::services::export;
use crate::services::{scan, ScanConfig, ScanFilter, StockFetcher};
use crate::utils::get_catalog_path;

pub struct ScanArgs {
    pub min_score: u32,
    pub max_results: usize,
    pub workers: usize,
    pub limit: Option<usize>,
    pub period: String,
    pub min_volume_ratio: Option<f64>,
    pub rsi_min: Option<f64>,
    pub rsi_max: Option<f64>,
    pub min_change_1d: Option<f64>,
    pub min_change_5d: Option<f64>,
    pub export: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
}

pub fn run(args: ScanArgs) {
    let catalog_path = args.catalog.clone().unwrap_or_else(get_catalog_path);
    let universe = match SymbolUniverse::load(&catalog_path) {
        Ok(u) => u,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let mut pairs = universe.pairs();
    if let Some(limit) = args.limit {
        pairs.truncate(limit);
    }

    let filter = build_filter(&args);
    let config = ScanConfig {
        min_score: args.min_score,
        max_results: args.max_results,
        workers: args.workers,
        period: args.period.clone(),
        ..ScanConfig::default()
    };

    let runtime = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");
    runtime.block_on(async move {
        let fetcher = match StockFetcher::new() {
            Ok(f) => Arc::new(f),
            Err(e) => {
                eprintln!("❌ Failed to create fetcher: {}", e);
                std::process::exit(1);
            }
        };

        println!("🔥 Scanning {} symbols (min score {})...", pairs.len(), config.min_score);
        let results = scan(fetcher, &pairs, &config).await;
        let results = filter.apply(results);

        if results.is_empty() {
            println!("No stocks matched the screening criteria.");
            return;
        }

        println!();
        println!(
            "{:<14} {:<28} {:>10} {:>7} {:>7} {:>6} {:>6} {:>6}  {}",
            "symbol", "company", "price", "1d%", "5d%", "rsi", "vol", "score", "top signal"
        );
        for result in &results {
            println!(
                "{:<14} {:<28} {:>10.2} {:>7.2} {:>7.2} {:>6.1} {:>6.2} {:>6}  {}",
                result.symbol,
                truncate(&result.company, 28),
                result.price,
                result.change_1d_pct,
                result.change_5d_pct,
                result.rsi,
                result.volume_ratio,
                result.score,
                result.top_signal(),
            );
        }

        if let Some(path) = args.export {
            match export::write_csv(&results, &path) {
                Ok(()) => println!("\n✅ Exported {} rows to {}", results.len(), path.display()),
                Err(e) => eprintln!("❌ Export failed: {}", e),
            }
        }
    });
}

fn build_filter(args: &ScanArgs) -> ScanFilter {
    let rsi_band = match (args.rsi_min, args.rsi_max) {
        (None, None) => None,
        (low, high) => Some((low.unwrap_or(0.0), high.unwrap_or(100.0))),
    };

    ScanFilter {
        min_volume_ratio: args.min_volume_ratio,
        rsi_band,
        min_change_1d_pct: args.min_change_1d,
        min_change_5d_pct: args.min_change_5d,
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut shortened: String = text.chars().take(max.saturating_sub(1)).collect();
        shortened.push('…');
        shortened
    }
}
