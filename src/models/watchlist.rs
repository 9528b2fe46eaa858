use crate::error::Result;
use crate::utils::normalize_symbol;

/// Small ordered set of ticker symbols for one interactive session.
/// No cross-session persistence.
#[derive(Debug, Clone, Default)]
pub struct Watchlist {
    symbols: Vec<String>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a watchlist from raw symbol strings, normalizing and
    /// de-duplicating while preserving first-seen order.
    pub fn from_symbols<I, S>(raw: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut watchlist = Self::new();
        for item in raw {
            watchlist.add(item.as_ref())?;
        }
        Ok(watchlist)
    }

    /// Add a symbol; duplicates are ignored. Returns true when added.
    pub fn add(&mut self, raw: &str) -> Result<bool> {
        let symbol = normalize_symbol(raw)?;
        if self.symbols.contains(&symbol) {
            return Ok(false);
        }
        self.symbols.push(symbol);
        Ok(true)
    }

    /// Remove a symbol. Returns true when it was present.
    pub fn remove(&mut self, raw: &str) -> bool {
        let target = raw.trim().to_uppercase();
        let before = self.symbols.len();
        self.symbols.retain(|s| *s != target);
        self.symbols.len() != before
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_normalizes_and_dedupes() {
        let mut watchlist = Watchlist::new();
        assert!(watchlist.add("reliance.ns").unwrap());
        assert!(!watchlist.add("RELIANCE.NS").unwrap());
        assert_eq!(watchlist.symbols(), &["RELIANCE.NS".to_string()]);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut watchlist =
            Watchlist::from_symbols(["TCS.NS", "INFY.NS", "HDFCBANK.NS"]).unwrap();
        assert!(watchlist.remove("infy.ns"));
        assert!(!watchlist.remove("INFY.NS"));
        assert_eq!(
            watchlist.symbols(),
            &["TCS.NS".to_string(), "HDFCBANK.NS".to_string()]
        );
    }

    #[test]
    fn test_invalid_symbol_rejected() {
        let mut watchlist = Watchlist::new();
        assert!(watchlist.add("BAD SYMBOL").is_err());
        assert!(watchlist.is_empty());
    }
}
