use crate::services::prediction::{extended_forecast, predict};
use crate::services::StockFetcher;
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

        println!("🔮 Generating prediction for {}...", symbol);
        let bars = fetcher.fetch_with_fallback(&symbol, &period).await;
        if bars.is_empty() {
            println!("Could not fetch data for {}. Please check the symbol.", symbol);
            std::process::exit(1);
        }
        println!("✅ Loaded {} days of data", bars.len());

        let prediction = predict(&bars);
        let current_price = bars[bars.len() - 1].close;
        let predicted_price = current_price * (1.0 + prediction.predicted_return);

        let stance = if prediction.predicted_return > 0.02 {
            "bullish"
        } else if prediction.predicted_return < -0.02 {
            "bearish"
        } else {
            "neutral"
        };

        println!();
        println!("Next-period prediction: {:.2} ({:+.2}%) [{}]", predicted_price, prediction.predicted_return * 100.0, stance);
        println!("Confidence:             {}%", prediction.confidence);
        println!();
        println!("Key signals:");
        for signal in &prediction.signals {
            println!("   • {}", signal);
        }

        println!();
        println!("Extended forecast:");
        println!("{:<8} {:>14} {:>16} {:>12}", "period", "target price", "expected return", "confidence");
        for row in extended_forecast(&prediction, current_price) {
            println!(
                "{:<8} {:>14.2} {:>15.2}% {:>11.0}%",
                format!("{}d", row.days),
                row.target_price,
                row.expected_return * 100.0,
                row.confidence,
            );
        }
    });
}
