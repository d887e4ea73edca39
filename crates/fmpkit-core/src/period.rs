//! Reporting period and statement kind definitions.
//!
//! This module defines [`Period`] for the reporting cadence, [`StatementKind`]
//! for selecting one of the three financial statements, [`ReleaseTime`] for
//! earnings release timing, and [`SegmentStructure`] for revenue segmentation.

use serde::{Deserialize, Serialize};

/// Reporting cadence for fundamental data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    /// Annual reporting period.
    Annual,
    /// Quarterly reporting period.
    #[default]
    Quarter,
}

impl Period {
    /// Returns the query-parameter value the vendor expects.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Quarter => "quarter",
        }
    }
}

/// One of the three financial statement types.
///
/// Being an enum, an invalid statement kind cannot reach the network: the
/// caller contract of the statement fetcher holds by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    /// Income statement.
    Income,
    /// Balance sheet.
    Balance,
    /// Cash-flow statement.
    Cash,
}

impl StatementKind {
    /// Returns the vendor endpoint for this statement type.
    #[must_use]
    pub const fn endpoint(&self) -> &'static str {
        match self {
            Self::Income => "income-statement",
            Self::Balance => "balance-sheet-statement",
            Self::Cash => "cash-flow-statement",
        }
    }
}

/// Timing of an earnings release relative to the trading session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ReleaseTime {
    /// Before market open.
    #[serde(rename = "bmo")]
    Bmo,
    /// After market close.
    #[serde(rename = "amc")]
    Amc,
    /// The vendor did not classify the release.
    #[serde(rename = "--")]
    #[default]
    Unspecified,
}

// Hand-written so unknown vendor values ("--", "", "dmh") decode as
// Unspecified instead of failing the whole calendar response.
impl<'de> Deserialize<'de> for ReleaseTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(match s.as_str() {
            "bmo" => Self::Bmo,
            "amc" => Self::Amc,
            _ => Self::Unspecified,
        })
    }
}

impl ReleaseTime {
    /// Returns true for after-market-close releases.
    #[must_use]
    pub const fn is_after_close(&self) -> bool {
        matches!(self, Self::Amc)
    }
}

/// Revenue segmentation axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentStructure {
    /// Revenue by product line.
    Product,
    /// Revenue by geography.
    Geographic,
}

impl SegmentStructure {
    /// Returns the vendor endpoint for this segmentation axis.
    #[must_use]
    pub const fn endpoint(&self) -> &'static str {
        match self {
            Self::Product => "revenue-product-segmentation",
            Self::Geographic => "revenue-geographic-segmentation",
        }
    }
}
