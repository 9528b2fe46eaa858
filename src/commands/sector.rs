use std::path::PathBuf;
use std::sync::Arc;

use crate::models::SymbolUniverse;
use crate::services::{scan, ScanConfig, StockFetcher};
use crate::utils::get_catalog_path;

pub fn run(
    sectors: Option<String>,
    min_score: u32,
    top: usize,
    period: String,
    catalog: Option<PathBuf>,
) {
    let catalog_path = catalog.unwrap_or_else(get_catalog_path);
    let universe = match SymbolUniverse::load(&catalog_path) {
        Ok(u) => u,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let selected: Vec<String> = match sectors {
        Some(list) => list
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => universe.sectors(),
    };

    if selected.is_empty() {
        eprintln!("❌ No sectors selected");
        std::process::exit(1);
    }

    let runtime = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");
    runtime.block_on(async move {
        let fetcher = match StockFetcher::new() {
            Ok(f) => Arc::new(f),
            Err(e) => {
                eprintln!("❌ Failed to create fetcher: {}", e);
                std::process::exit(1);
            }
        };

        println!("🏭 Sector analysis across {} sector(s)", selected.len());

        for sector in &selected {
            let pairs = universe.sector_pairs(sector);
            if pairs.is_empty() {
                println!("\n== {} ==\n   (no symbols in catalog)", sector);
                continue;
            }

            let config = ScanConfig {
                min_score,
                max_results: top,
                period: period.clone(),
                ..ScanConfig::default()
            };

            // The cache inside the shared fetcher carries across sectors,
            // so symbols listed twice are only fetched once.
            let results = scan(Arc::clone(&fetcher), &pairs, &config).await;

            println!("\n== {} ({} symbols) ==", sector, pairs.len());
            if results.is_empty() {
                println!("   No stocks passed scoring with min score {}.", min_score);
                continue;
            }

            for result in &results {
                let shown: Vec<&str> = result
                    .signals
                    .iter()
                    .take(4)
                    .map(String::as_str)
                    .collect();
                println!(
                    "   {} - {} | Score: {} | {}",
                    result.symbol,
                    result.company,
                    result.score,
                    shown.join(", "),
                );
            }
        }
    });
}
