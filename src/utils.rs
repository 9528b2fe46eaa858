use std::path::PathBuf;

use crate::error::{AppError, Result};

/// Get the symbol catalog path from environment variable or use default
pub fn get_catalog_path() -> PathBuf {
    std::env::var("STOCK_CATALOG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("assets/stock_catalog.csv"))
}

/// Validate ticker symbol syntax and normalize to uppercase.
///
/// Accepts letters, digits and the separators used by exchange-suffixed
/// tickers (`RELIANCE.NS`, `BRK-B`, `^NSEI`). Anything else is a usage
/// error surfaced to the caller, never a crash.
pub fn normalize_symbol(raw: &str) -> Result<String> {
    let symbol = raw.trim().to_uppercase();

    if symbol.is_empty() {
        return Err(AppError::InvalidInput("symbol must not be empty".to_string()));
    }

    if !symbol
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '&'))
    {
        return Err(AppError::InvalidInput(format!(
            "invalid symbol syntax: '{}'",
            raw
        )));
    }

    Ok(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_symbol_uppercases_and_trims() {
        assert_eq!(normalize_symbol(" reliance.ns ").unwrap(), "RELIANCE.NS");
        assert_eq!(normalize_symbol("brk-b").unwrap(), "BRK-B");
        assert_eq!(normalize_symbol("^NSEI").unwrap(), "^NSEI");
    }

    #[test]
    fn test_normalize_symbol_rejects_bad_input() {
        assert!(normalize_symbol("").is_err());
        assert!(normalize_symbol("   ").is_err());
        assert!(normalize_symbol("TCS NS").is_err());
        assert!(normalize_symbol("INFY;drop").is_err());
    }
}
