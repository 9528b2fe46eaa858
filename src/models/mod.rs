pub mod indicators;
mod ohlcv;
mod scan_result;
mod universe;
mod watchlist;

pub use indicators::IndicatorFrame;
pub use ohlcv::{closes, highs, trailing_change_pct, volumes, Ohlcv};
pub use scan_result::ScanResult;
pub use universe::SymbolUniverse;
pub use watchlist::Watchlist;
