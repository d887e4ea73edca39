//! Source traits for fetching FMP data.
//!
//! The reconciliation pipeline is written against these traits rather than a
//! concrete HTTP client, so it can be exercised with canned data in tests.
//! `fmpkit-client` implements all of them against the real vendor API.

use async_trait::async_trait;

use crate::{
    error::Result,
    period::Period,
    types::{BalanceSheet, CashFlowStatement, EarningsEvent, IncomeStatement, PriceBar, Symbol},
};

/// Source of the three financial statements.
#[async_trait]
pub trait FundamentalSource: Send + Sync {
    /// Fetches income statements, most recent first, up to `limit` entries.
    ///
    /// An empty `Vec` means the vendor has no data for the symbol; it is an
    /// absence signal, not an error.
    async fn income_statements(
        &self,
        symbol: &Symbol,
        period: Period,
        limit: usize,
    ) -> Result<Vec<IncomeStatement>>;

    /// Fetches balance sheets, most recent first, up to `limit` entries.
    async fn balance_sheets(
        &self,
        symbol: &Symbol,
        period: Period,
        limit: usize,
    ) -> Result<Vec<BalanceSheet>>;

    /// Fetches cash-flow statements, most recent first, up to `limit` entries.
    async fn cash_flow_statements(
        &self,
        symbol: &Symbol,
        period: Period,
        limit: usize,
    ) -> Result<Vec<CashFlowStatement>>;
}

/// Source of daily price history.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetches daily bars covering the last `years` years, oldest first,
    /// with `pct_chg` already derived.
    async fn daily_prices(&self, symbol: &Symbol, years: u32) -> Result<Vec<PriceBar>>;
}

/// Source of historical earnings releases.
#[async_trait]
pub trait EarningsSource: Send + Sync {
    /// Fetches normalized earnings events covering the last `years` years,
    /// most recent first.
    async fn earnings_history(&self, symbol: &Symbol, years: u32) -> Result<Vec<EarningsEvent>>;
}
