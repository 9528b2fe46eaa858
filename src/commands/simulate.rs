use crate::services::prediction::{annualized_stats, monte_carlo, summarize_simulation};
use crate::services::StockFetcher;
use crate::utils::normalize_symbol;

pub fn run(symbol: String, days: usize, paths: usize, seed: Option<u64>, period: String) {
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

        println!("🎲 Running Monte Carlo for {} ({} paths, {} days)...", symbol, paths, days);
        let bars = fetcher.fetch_with_fallback(&symbol, &period).await;
        if bars.is_empty() {
            println!("Could not fetch data for {}. Please check the symbol.", symbol);
            std::process::exit(1);
        }

        let (volatility, drift, current_price) = match annualized_stats(&bars) {
            Some(stats) => stats,
            None => {
                println!("Insufficient return history for {} to estimate volatility.", symbol);
                std::process::exit(1);
            }
        };

        println!(
            "   price={:.2} annualized volatility={:.1}% drift={:.1}%",
            current_price,
            volatility * 100.0,
            drift * 100.0
        );

        let terminal = monte_carlo(current_price, volatility, drift, days, paths, seed);
        let summary = summarize_simulation(&terminal, current_price);

        let labels = ["5th", "25th", "median", "75th", "95th"];
        println!();
        println!("Terminal price distribution after {} days:", days);
        for (label, value) in labels.iter().zip(summary.percentiles.iter()) {
            let change_pct = (value - current_price) / current_price * 100.0;
            println!("   {:<8} {:>10.2} ({:+.1}%)", label, value, change_pct);
        }

        println!();
        println!("Risk metrics:");
        println!("   Probability of loss:    {:.1}%", summary.probability_of_loss_pct);
        println!("   Value at risk (5%):     {:.1}%", summary.value_at_risk_pct);
        println!("   Max potential gain:     {:.1}%", summary.max_gain_pct);
    });
}
