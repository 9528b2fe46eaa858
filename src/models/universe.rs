use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{AppError, Result};

/// One catalog entry for a listed symbol. Extra catalog columns
/// (e.g. an exchange tag) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolInfo {
    pub symbol: String,
    pub company: String,
    pub sector: String,
}

/// Static reference catalog mapping ticker symbols to company names,
/// partitioned by sector. Loaded once, read-only during a scan.
#[derive(Debug, Clone, Default)]
pub struct SymbolUniverse {
    entries: Vec<SymbolInfo>,
}

impl SymbolUniverse {
    /// Load the catalog from a CSV file with columns
    /// `symbol,company,sector` (further columns are ignored).
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| {
            AppError::Config(format!(
                "Failed to open symbol catalog {}: {}",
                path.display(),
                e
            ))
        })?;
        let universe = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            symbols = universe.len(),
            sectors = universe.sectors().len(),
            "Loaded symbol catalog"
        );
        Ok(universe)
    }

    /// Parse catalog rows from any reader (used directly by tests)
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut entries = Vec::new();

        for record in csv_reader.deserialize::<SymbolInfo>() {
            let mut entry =
                record.map_err(|e| AppError::Parse(format!("Bad catalog row: {}", e)))?;
            entry.symbol = entry.symbol.trim().to_uppercase();
            if entry.symbol.is_empty() {
                continue;
            }
            entries.push(entry);
        }

        if entries.is_empty() {
            return Err(AppError::Config("Symbol catalog is empty".to_string()));
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (symbol, company) pairs in catalog order
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|e| (e.symbol.clone(), e.company.clone()))
            .collect()
    }

    /// Distinct sector names, sorted
    pub fn sectors(&self) -> Vec<String> {
        let mut set: BTreeMap<&str, ()> = BTreeMap::new();
        for entry in &self.entries {
            set.insert(entry.sector.as_str(), ());
        }
        set.keys().map(|s| s.to_string()).collect()
    }

    /// (symbol, company) pairs belonging to one sector, in catalog order
    pub fn sector_pairs(&self, sector: &str) -> Vec<(String, String)> {
        self.entries
            .iter()
            .filter(|e| e.sector.eq_ignore_ascii_case(sector))
            .map(|e| (e.symbol.clone(), e.company.clone()))
            .collect()
    }

    pub fn company_for(&self, symbol: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.symbol == symbol)
            .map(|e| e.company.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = "\
symbol,company,sector,exchange
RELIANCE.NS,Reliance Industries,Energy,NSE
TCS.NS,Tata Consultancy Services,IT,NSE
INFY.NS,Infosys,IT,NSE
";

    #[test]
    fn test_from_reader_parses_rows() {
        let universe = SymbolUniverse::from_reader(CATALOG.as_bytes()).unwrap();
        assert_eq!(universe.len(), 3);
        assert_eq!(universe.company_for("TCS.NS"), Some("Tata Consultancy Services"));
    }

    #[test]
    fn test_minimal_three_column_catalog() {
        let minimal = "\
symbol,company,sector
RELIANCE.NS,Reliance Industries,Energy
";
        let universe = SymbolUniverse::from_reader(minimal.as_bytes()).unwrap();
        assert_eq!(universe.len(), 1);
        assert_eq!(universe.sectors(), vec!["Energy".to_string()]);
    }

    #[test]
    fn test_sector_partition() {
        let universe = SymbolUniverse::from_reader(CATALOG.as_bytes()).unwrap();
        assert_eq!(universe.sectors(), vec!["Energy".to_string(), "IT".to_string()]);

        let it = universe.sector_pairs("IT");
        assert_eq!(it.len(), 2);
        assert_eq!(it[0].0, "TCS.NS");
    }

    #[test]
    fn test_empty_catalog_is_config_error() {
        let result = SymbolUniverse::from_reader("symbol,company,sector,exchange\n".as_bytes());
        assert!(result.is_err());
    }
}
