use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;
use crate::constants::{
    DEFAULT_MAX_RESULTS, DEFAULT_MIN_SCORE, DEFAULT_PERIOD, DEFAULT_SCAN_WORKERS,
    DEFAULT_SIMULATION_DAYS, DEFAULT_SIMULATION_PATHS,
};

#[derive(Parser)]
#[command(name = "stockscan")]
#[command(about = "Stock screener and technical scoring CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a single symbol and show its signals
    Analyze {
        /// Ticker symbol, optionally exchange-suffixed (e.g. RELIANCE.NS)
        symbol: String,
        /// Lookback period requested from the provider
        #[arg(short, long, default_value = DEFAULT_PERIOD)]
        period: String,
    },
    /// Run the batch screener over the symbol catalog
    Scan {
        /// Minimum score for a symbol to appear in the output
        #[arg(long, default_value_t = DEFAULT_MIN_SCORE)]
        min_score: u32,
        /// Cap on the number of results
        #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
        max_results: usize,
        /// Concurrent fetch workers
        #[arg(long, default_value_t = DEFAULT_SCAN_WORKERS)]
        workers: usize,
        /// Only scan the first N catalog symbols
        #[arg(long)]
        limit: Option<usize>,
        #[arg(short, long, default_value = DEFAULT_PERIOD)]
        period: String,
        /// Keep results with volume ratio at or above this floor
        #[arg(long)]
        min_volume_ratio: Option<f64>,
        /// Lower bound of an RSI band filter
        #[arg(long)]
        rsi_min: Option<f64>,
        /// Upper bound of an RSI band filter
        #[arg(long)]
        rsi_max: Option<f64>,
        /// Keep results with 1-day change (%) at or above this floor
        #[arg(long)]
        min_change_1d: Option<f64>,
        /// Keep results with 5-day change (%) at or above this floor
        #[arg(long)]
        min_change_5d: Option<f64>,
        /// Write the ranked table to this CSV file
        #[arg(long)]
        export: Option<PathBuf>,
        /// Symbol catalog CSV (defaults to STOCK_CATALOG or assets/stock_catalog.csv)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Scan the catalog sector by sector
    Sector {
        /// Comma-separated sector names (defaults to every sector)
        #[arg(long)]
        sectors: Option<String>,
        #[arg(long, default_value_t = DEFAULT_MIN_SCORE)]
        min_score: u32,
        /// Top results kept per sector
        #[arg(long, default_value_t = 10)]
        top: usize,
        #[arg(short, long, default_value = DEFAULT_PERIOD)]
        period: String,
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Score each symbol of a watchlist
    Watchlist {
        /// Comma-separated ticker symbols
        #[arg(long, value_delimiter = ',', required = true)]
        symbols: Vec<String>,
        #[arg(short, long, default_value = DEFAULT_PERIOD)]
        period: String,
    },
    /// Heuristic next-period prediction for one symbol
    Predict {
        symbol: String,
        #[arg(short, long, default_value = "1y")]
        period: String,
    },
    /// Monte Carlo terminal-price simulation for one symbol
    Simulate {
        symbol: String,
        /// Simulation horizon in trading days
        #[arg(long, default_value_t = DEFAULT_SIMULATION_DAYS)]
        days: usize,
        /// Number of simulated paths
        #[arg(long, default_value_t = DEFAULT_SIMULATION_PATHS)]
        paths: usize,
        /// RNG seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short, long, default_value = "1y")]
        period: String,
    },
}

pub fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { symbol, period } => {
            commands::analyze::run(symbol, period);
        }
        Commands::Scan {
            min_score,
            max_results,
            workers,
            limit,
            period,
            min_volume_ratio,
            rsi_min,
            rsi_max,
            min_change_1d,
            min_change_5d,
            export,
            catalog,
        } => {
            commands::scan::run(commands::scan::ScanArgs {
                min_score,
                max_results,
                workers,
                limit,
                period,
                min_volume_ratio,
                rsi_min,
                rsi_max,
                min_change_1d,
                min_change_5d,
                export,
                catalog,
            });
        }
        Commands::Sector {
            sectors,
            min_score,
            top,
            period,
            catalog,
        } => {
            commands::sector::run(sectors, min_score, top, period, catalog);
        }
        Commands::Watchlist { symbols, period } => {
            commands::watchlist::run(symbols, period);
        }
        Commands::Predict { symbol, period } => {
            commands::predict::run(symbol, period);
        }
        Commands::Simulate {
            symbol,
            days,
            paths,
            seed,
            period,
        } => {
            commands::simulate::run(symbol, days, paths, seed, period);
        }
    }
}
