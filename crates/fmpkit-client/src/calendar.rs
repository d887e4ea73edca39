//! Historical earnings calendar endpoint.

use async_trait::async_trait;
use fmpkit_core::{EarningsEvent, EarningsSource, RawEarningsEvent, Result, Symbol};
use fmpkit_pipeline::earnings::normalize_earnings;

use crate::FmpClient;

/// Extra rows requested beyond `years * 4`; the vendor pads the calendar
/// with a few empty future entries.
const CALENDAR_OVERFETCH: u32 = 4;

impl FmpClient {
    /// Fetches the raw earnings calendar, over-fetching `years * 4 + 4`
    /// entries to absorb vendor gaps.
    pub async fn earnings_calendar(
        &self,
        symbol: &Symbol,
        years: u32,
    ) -> Result<Vec<RawEarningsEvent>> {
        let endpoint = format!("historical/earning_calendar/{}", symbol.as_str());
        let limit = years * 4 + CALENDAR_OVERFETCH;
        self.get(&endpoint, &[("limit", limit.to_string())]).await
    }

    /// Fetches normalized earnings history: after-market-close releases are
    /// shifted onto the next day and entries are ordered most recent first.
    pub async fn earnings_history(
        &self,
        symbol: &Symbol,
        years: u32,
    ) -> Result<Vec<EarningsEvent>> {
        let raw = self.earnings_calendar(symbol, years).await?;
        Ok(normalize_earnings(raw))
    }
}

#[async_trait]
impl EarningsSource for FmpClient {
    async fn earnings_history(&self, symbol: &Symbol, years: u32) -> Result<Vec<EarningsEvent>> {
        Self::earnings_history(self, symbol, years).await
    }
}
