use crate::services::{compute_frame, score_series, StockFetcher};
use crate::utils::normalize_symbol;

pub fn run(symbol: String, period: String) {
    let symbol = match normalize_symbol(&symbol) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let runtime = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");
    runtime.block_on(async move {
        let fetcher = match StockFetcher::new() {
            Ok(f) => f,
            Err(e) => {
                eprintln!("❌ Failed to create fetcher: {}", e);
                std::process::exit(1);
            }
        };

        println!("🔬 Analyzing {} ({})...", symbol, period);
        let bars = fetcher.fetch_with_fallback(&symbol, &period).await;
        if bars.is_empty() {
            println!("No data found for {}. Please check the symbol and try again.", symbol);
            std::process::exit(1);
        }

        let scored = score_series(&bars);
        // Soft-failed scores come back with an empty frame
        let frame = if scored.frame.is_empty() {
            compute_frame(&bars)
        } else {
            scored.frame.clone()
        };
        let last = &bars[bars.len() - 1];

        println!();
        println!("{} - Score: {}/20", symbol, scored.score);
        if scored.signals.is_empty() {
            println!("   (no signals fired)");
        } else {
            for signal in &scored.signals {
                println!("   • {}", signal);
            }
        }

        println!();
        println!("📊 Last close: {:.2} on {}", last.close, last.time.format("%Y-%m-%d"));
        println!();
        println!("Technical details (last 5 bars):");
        println!("{:<12} {:>10} {:>10} {:>10} {:>12} {:>8}", "date", "open", "close", "volume", "rsi", "vol_ratio");

        let n = bars.len();
        for i in n.saturating_sub(5)..n {
            println!(
                "{:<12} {:>10.2} {:>10.2} {:>10} {:>12.1} {:>8.2}",
                bars[i].time.format("%Y-%m-%d"),
                bars[i].open,
                bars[i].close,
                bars[i].volume,
                frame.rsi[i],
                frame.volume_ratio[i],
            );
        }
    });
}
