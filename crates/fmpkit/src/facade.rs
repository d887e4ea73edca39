//! The [`Fmp`] facade: an `FmpClient` wired to the reconciliation pipeline.

use chrono::NaiveDate;
use polars::prelude::DataFrame;

use fmpkit_client::FmpClient;
use fmpkit_core::{
    table, EarningsEvent, EpsPricePoint, FiscalReaction, ListedStock, MergedFinancialRecord,
    Period, PerformanceRecord, PriceBar, Quote, QuoteShort, Result, SearchResult, SegmentRevenue,
    SegmentStructure, StatementKind, Symbol,
};
use fmpkit_pipeline::{ops, MergeOutcome, SymbolOverrides};

/// High-level entry point combining the HTTP client with the pipeline.
///
/// Pipeline methods return typed rows; each has a `_frame` sibling that
/// converts the rows to a polars [`DataFrame`] for tabular work. The raw
/// vendor JSON is reachable via [`Fmp::statements_raw`].
#[derive(Clone, Debug)]
pub struct Fmp {
    client: FmpClient,
    overrides: SymbolOverrides,
}

impl Fmp {
    /// Creates a facade over a client built from the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(FmpClient::new(api_key))
    }

    /// Creates a facade reading the API key from `FMP_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::with_client(FmpClient::from_env()?))
    }

    /// Wraps an already-configured client.
    #[must_use]
    pub fn with_client(client: FmpClient) -> Self {
        Self {
            client,
            overrides: SymbolOverrides::default(),
        }
    }

    /// Replaces the per-symbol data-quality overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: SymbolOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// The underlying HTTP client, for endpoints the facade does not wrap.
    #[must_use]
    pub const fn client(&self) -> &FmpClient {
        &self.client
    }

    /// Fetches and reconciles the three statements, keeping the full
    /// outcome taxonomy.
    pub async fn merge_outcome(
        &self,
        symbol: &Symbol,
        period: Period,
        limit: usize,
    ) -> Result<MergeOutcome> {
        ops::merged_financials(&self.client, symbol, period, limit, &self.overrides).await
    }

    /// Fetches and reconciles the three statements; `None` when they did
    /// not reconcile.
    pub async fn merged_financials(
        &self,
        symbol: &Symbol,
        period: Period,
        limit: usize,
    ) -> Result<Option<Vec<MergedFinancialRecord>>> {
        Ok(self.merge_outcome(symbol, period, limit).await?.records())
    }

    /// [`Self::merged_financials`] as a polars frame.
    pub async fn merged_financials_frame(
        &self,
        symbol: &Symbol,
        period: Period,
        limit: usize,
    ) -> Result<Option<DataFrame>> {
        match self.merged_financials(symbol, period, limit).await? {
            Some(records) => Ok(Some(table::merged_records_to_dataframe(&records)?)),
            None => Ok(None),
        }
    }

    /// Derived performance metrics; `None` when the statements did not
    /// reconcile.
    pub async fn stock_performance(
        &self,
        symbol: &Symbol,
        period: Period,
        limit: usize,
    ) -> Result<Option<Vec<PerformanceRecord>>> {
        ops::stock_performance(&self.client, symbol, period, limit, &self.overrides).await
    }

    /// [`Self::stock_performance`] as a polars frame.
    pub async fn stock_performance_frame(
        &self,
        symbol: &Symbol,
        period: Period,
        limit: usize,
    ) -> Result<Option<DataFrame>> {
        match self.stock_performance(symbol, period, limit).await? {
            Some(records) => Ok(Some(table::performance_to_dataframe(&records)?)),
            None => Ok(None),
        }
    }

    /// Daily EPS and P/E series over the last `years` years.
    pub async fn eps_price_history(
        &self,
        symbol: &Symbol,
        years: u32,
    ) -> Result<Vec<EpsPricePoint>> {
        ops::eps_price_history(&self.client, symbol, years).await
    }

    /// [`Self::eps_price_history`] as a polars frame.
    pub async fn eps_price_history_frame(
        &self,
        symbol: &Symbol,
        years: u32,
    ) -> Result<DataFrame> {
        let points = self.eps_price_history(symbol, years).await?;
        table::eps_price_to_dataframe(&points)
    }

    /// Close changes around each fiscal release, up to today.
    pub async fn fiscal_reactions(
        &self,
        symbol: &Symbol,
        years: u32,
    ) -> Result<Vec<FiscalReaction>> {
        ops::fiscal_reactions(&self.client, symbol, years).await
    }

    /// Close changes around each fiscal release, up to `as_of`.
    pub async fn fiscal_reactions_as_of(
        &self,
        symbol: &Symbol,
        years: u32,
        as_of: NaiveDate,
    ) -> Result<Vec<FiscalReaction>> {
        ops::fiscal_reactions_as_of(&self.client, symbol, years, as_of).await
    }

    /// Normalized earnings history, most recent first.
    pub async fn earnings_history(
        &self,
        symbol: &Symbol,
        years: u32,
    ) -> Result<Vec<EarningsEvent>> {
        self.client.earnings_history(symbol, years).await
    }

    /// Daily bars covering the last `years` years, oldest first.
    pub async fn daily_prices(&self, symbol: &Symbol, years: u32) -> Result<Vec<PriceBar>> {
        self.client.daily_prices(symbol, years).await
    }

    /// One statement type as raw vendor JSON.
    pub async fn statements_raw(
        &self,
        symbol: &Symbol,
        kind: StatementKind,
        period: Period,
        limit: usize,
    ) -> Result<serde_json::Value> {
        self.client.statements_raw(symbol, kind, period, limit).await
    }

    /// Full real-time quote.
    pub async fn quote(&self, symbol: &Symbol) -> Result<Option<Quote>> {
        self.client.quote(symbol).await
    }

    /// Minimal price/volume quote.
    pub async fn quote_short(&self, symbol: &Symbol) -> Result<Option<QuoteShort>> {
        self.client.quote_short(symbol).await
    }

    /// Company search by name or symbol fragment.
    pub async fn search(
        &self,
        query: &str,
        exchange: Option<&str>,
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        self.client.search(query, exchange, limit).await
    }

    /// The full listed-stock roster.
    pub async fn stock_list(&self) -> Result<Vec<ListedStock>> {
        self.client.stock_list().await
    }

    /// Revenue by product line or geography, most recent first.
    pub async fn revenue_segments(
        &self,
        symbol: &Symbol,
        structure: SegmentStructure,
        period: Period,
        limit: usize,
    ) -> Result<Vec<SegmentRevenue>> {
        self.client
            .revenue_segments(symbol, structure, period, limit)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn statement_row(extra: serde_json::Value) -> serde_json::Value {
        let mut row = serde_json::json!({
            "date": "2023-07-01",
            "symbol": "AAPL",
            "reportedCurrency": "USD",
            "cik": "0000320193",
            "fillingDate": "2023-08-04",
            "acceptedDate": "2023-08-03 18:04:43",
            "calendarYear": "2023",
            "period": "Q3"
        });
        row.as_object_mut()
            .unwrap()
            .extend(extra.as_object().unwrap().clone());
        row
    }

    async fn mount_statements(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/income-statement/AAPL"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                statement_row(serde_json::json!({"revenue": 81797000000.0, "epsdiluted": 1.26}))
            ])))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/balance-sheet-statement/AAPL"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                statement_row(serde_json::json!({"totalAssets": 335038000000.0}))
            ])))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/cash-flow-statement/AAPL"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                statement_row(serde_json::json!({"freeCashFlow": 24287000000.0}))
            ])))
            .mount(server)
            .await;
    }

    fn facade(server: &MockServer) -> Fmp {
        Fmp::with_client(FmpClient::new("k").with_base_url(server.uri()))
    }

    #[tokio::test]
    async fn test_merged_financials_through_facade() {
        let server = MockServer::start().await;
        mount_statements(&server).await;

        let fmp = facade(&server);
        let merged = fmp
            .merged_financials(&Symbol::new("AAPL"), Period::Quarter, 4)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].revenue, Some(81797000000.0));
        assert_eq!(merged[0].total_assets, Some(335038000000.0));
        assert_eq!(merged[0].free_cash_flow, Some(24287000000.0));
    }

    #[tokio::test]
    async fn test_merged_frame_shape() {
        let server = MockServer::start().await;
        mount_statements(&server).await;

        let fmp = facade(&server);
        let frame = fmp
            .merged_financials_frame(&Symbol::new("AAPL"), Period::Quarter, 4)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(frame.height(), 1);
        assert!(frame.get_column_names_str().contains(&"revenue"));
    }

    #[tokio::test]
    async fn test_missing_statement_yields_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let fmp = facade(&server);
        let merged = fmp
            .merged_financials(&Symbol::new("AAPL"), Period::Quarter, 4)
            .await
            .unwrap();
        assert!(merged.is_none());
    }
}
