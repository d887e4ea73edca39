//! Symbol-level correction policy for known vendor data defects.
//!
//! Some vendor series have one-off problems: spin-offs and renamed entities
//! whose earliest merged quarter is a duplicated artifact, and symbols whose
//! history is unusable outright. The correction policy is data, not code -
//! callers can extend or replace the table without touching pipeline logic.

use std::collections::HashSet;

/// Symbols whose earliest merged row is a known vendor artifact.
const DROP_FIRST_ROW: &[&str] = &[
    "ADT", "ALTR", "ARNC", "BEAM", "CEG", "CSC", "CTLT", "FTV", "HLT", "HPE", "LDOS", "LW",
    "MMI", "MRNA", "OTIS", "PLL", "S", "TWTR", "VNT",
];

/// Symbols whose statement history is unusable regardless of data quality.
const EXCLUDED: &[&str] = &["CSC"];

/// Per-symbol correction rules applied by the statement merger.
#[derive(Clone, Debug)]
pub struct SymbolOverrides {
    drop_first: HashSet<String>,
    excluded: HashSet<String>,
}

impl Default for SymbolOverrides {
    /// The built-in table of known vendor defects.
    fn default() -> Self {
        Self {
            drop_first: DROP_FIRST_ROW.iter().map(ToString::to_string).collect(),
            excluded: EXCLUDED.iter().map(ToString::to_string).collect(),
        }
    }
}

impl SymbolOverrides {
    /// An empty table: no corrections applied.
    #[must_use]
    pub fn none() -> Self {
        Self {
            drop_first: HashSet::new(),
            excluded: HashSet::new(),
        }
    }

    /// Adds a symbol whose first merged row should be dropped.
    #[must_use]
    pub fn with_drop_first(mut self, symbol: impl Into<String>) -> Self {
        self.drop_first.insert(symbol.into().to_uppercase());
        self
    }

    /// Adds a symbol to exclude outright.
    #[must_use]
    pub fn with_excluded(mut self, symbol: impl Into<String>) -> Self {
        self.excluded.insert(symbol.into().to_uppercase());
        self
    }

    /// Whether the merger should drop the earliest merged row.
    #[must_use]
    pub fn drops_first_row(&self, symbol: &str) -> bool {
        self.drop_first.contains(symbol)
    }

    /// Whether the symbol is denied outright.
    #[must_use]
    pub fn is_excluded(&self, symbol: &str) -> bool {
        self.excluded.contains(symbol)
    }
}
