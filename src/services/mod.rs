pub mod cache;
pub mod export;
pub mod fetcher;
pub mod filters;
pub mod prediction;
pub mod scanner;
pub mod scoring;

pub use fetcher::StockFetcher;
pub use filters::ScanFilter;
pub use scanner::{scan, ScanConfig};
pub use scoring::{compute_frame, score_series};
