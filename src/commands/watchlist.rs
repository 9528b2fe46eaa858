use crate::models::Watchlist;
use crate::services::{score_series, StockFetcher};

pub fn run(symbols: Vec<String>, period: String) {
    let watchlist = match Watchlist::from_symbols(&symbols) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    if watchlist.is_empty() {
        eprintln!("❌ Watchlist is empty");
        std::process::exit(1);
    }

    let runtime = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");
    runtime.block_on(async move {
        let fetcher = match StockFetcher::new() {
            Ok(f) => f,
            Err(e) => {
                eprintln!("❌ Failed to create fetcher: {}", e);
                std::process::exit(1);
            }
        };

        println!("⭐ Watchlist ({} symbols)", watchlist.len());

        for symbol in watchlist.symbols() {
            let bars = fetcher.fetch_with_fallback(symbol, &period).await;
            if bars.is_empty() {
                println!("   {} - no data", symbol);
                continue;
            }

            let scored = score_series(&bars);
            let shown: Vec<&str> = scored
                .signals
                .iter()
                .take(4)
                .map(String::as_str)
                .collect();
            println!(
                "   {} - Score: {:>2} | {:.2} | {}",
                symbol,
                scored.score,
                bars[bars.len() - 1].close,
                shown.join(", "),
            );
        }
    });
}
