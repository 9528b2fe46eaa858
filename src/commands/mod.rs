pub mod analyze;
pub mod predict;
pub mod scan;
pub mod sector;
pub mod simulate;
pub mod watchlist;
