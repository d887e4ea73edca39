//! High-level pipeline operations against abstract data sources.
//!
//! Each operation fetches what it needs through the source traits and runs
//! the pure pipeline stages over the results. Fetches are sequential on
//! purpose: the vendor rate-limits per key, and firing the statement
//! requests concurrently trips the limiter on larger batches.

use chrono::{NaiveDate, Utc};
use tracing::{debug, warn};

use fmpkit_core::{
    EarningsSource, EpsPricePoint, FiscalReaction, FundamentalSource, Period, PerformanceRecord,
    PriceSource, Result, Symbol,
};

use crate::align;
use crate::merge::{merge_statements, MergeOutcome};
use crate::overrides::SymbolOverrides;
use crate::performance::derive_performance;

/// Fetches and reconciles the three statements for one symbol.
pub async fn merged_financials<S>(
    source: &S,
    symbol: &Symbol,
    period: Period,
    limit: usize,
    overrides: &SymbolOverrides,
) -> Result<MergeOutcome>
where
    S: FundamentalSource + ?Sized,
{
    let income = source.income_statements(symbol, period, limit).await?;
    let balance = source.balance_sheets(symbol, period, limit).await?;
    let cash = source.cash_flow_statements(symbol, period, limit).await?;
    debug!(
        symbol = symbol.as_str(),
        income = income.len(),
        balance = balance.len(),
        cash = cash.len(),
        "fetched statements"
    );
    Ok(merge_statements(&income, &balance, &cash, period, overrides))
}

/// Fetches, reconciles, and derives performance metrics for one symbol.
///
/// `None` when the statements did not reconcile; the reason has already
/// been logged by the merge stage.
pub async fn stock_performance<S>(
    source: &S,
    symbol: &Symbol,
    period: Period,
    limit: usize,
    overrides: &SymbolOverrides,
) -> Result<Option<Vec<PerformanceRecord>>>
where
    S: FundamentalSource + ?Sized,
{
    let outcome = merged_financials(source, symbol, period, limit, overrides).await?;
    Ok(outcome
        .records()
        .map(|records| derive_performance(&records)))
}

/// Fetches earnings and prices for one symbol and aligns them into a daily
/// EPS and P/E series.
///
/// An empty series when either input is empty; absence of vendor data is
/// not an error.
pub async fn eps_price_history<S>(
    source: &S,
    symbol: &Symbol,
    years: u32,
) -> Result<Vec<EpsPricePoint>>
where
    S: EarningsSource + PriceSource + ?Sized,
{
    let events = source.earnings_history(symbol, years).await?;
    let bars = source.daily_prices(symbol, years).await?;
    if events.is_empty() || bars.is_empty() {
        warn!(
            symbol = symbol.as_str(),
            events = events.len(),
            bars = bars.len(),
            "missing earnings or price data, empty series"
        );
        return Ok(Vec::new());
    }
    Ok(align::eps_price_series(&events, &bars))
}

/// Fetches earnings and prices for one symbol and computes the close change
/// around each fiscal release, up to `as_of`.
pub async fn fiscal_reactions_as_of<S>(
    source: &S,
    symbol: &Symbol,
    years: u32,
    as_of: NaiveDate,
) -> Result<Vec<FiscalReaction>>
where
    S: EarningsSource + PriceSource + ?Sized,
{
    let events = source.earnings_history(symbol, years).await?;
    let bars = source.daily_prices(symbol, years).await?;
    if events.is_empty() || bars.is_empty() {
        warn!(
            symbol = symbol.as_str(),
            events = events.len(),
            bars = bars.len(),
            "missing earnings or price data, no reactions"
        );
        return Ok(Vec::new());
    }
    Ok(align::fiscal_reactions(&events, &bars, as_of))
}

/// [`fiscal_reactions_as_of`] anchored at today's date.
pub async fn fiscal_reactions<S>(
    source: &S,
    symbol: &Symbol,
    years: u32,
) -> Result<Vec<FiscalReaction>>
where
    S: EarningsSource + PriceSource + ?Sized,
{
    fiscal_reactions_as_of(source, symbol, years, Utc::now().date_naive()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Datelike, Duration};
    use fmpkit_core::{
        BalanceSheet, CashFlowStatement, EarningsEvent, IncomeStatement, PriceBar, ReleaseTime,
    };

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// Canned source serving one symbol's worth of aligned quarterly data.
    struct CannedSource {
        quarters: Vec<NaiveDate>,
        bars: Vec<PriceBar>,
    }

    impl CannedSource {
        fn new() -> Self {
            let quarters = vec![
                d(2023, 3, 31),
                d(2023, 6, 30),
                d(2023, 9, 30),
                d(2023, 12, 30),
                d(2024, 3, 31),
            ];
            let bars = quarters
                .iter()
                .map(|&q| PriceBar {
                    date: q + Duration::days(35),
                    open: 100.0,
                    high: 101.0,
                    low: 99.0,
                    close: 100.0,
                    volume: 1_000.0,
                    pct_chg: None,
                })
                .collect();
            Self { quarters, bars }
        }

        fn stamp<T>(&self, f: impl Fn(NaiveDate, NaiveDate) -> T) -> Vec<T> {
            self.quarters
                .iter()
                .map(|&q| f(q, q + Duration::days(35)))
                .collect()
        }
    }

    #[async_trait]
    impl FundamentalSource for CannedSource {
        async fn income_statements(
            &self,
            symbol: &Symbol,
            _period: Period,
            _limit: usize,
        ) -> Result<Vec<IncomeStatement>> {
            Ok(self.stamp(|end, filed| IncomeStatement {
                date: end,
                symbol: symbol.as_str().to_string(),
                reported_currency: "USD".to_string(),
                filling_date: filed,
                accepted_date: format!("{filed} 17:00:00"),
                calendar_year: end.format("%Y").to_string(),
                period: format!("Q{}", (end.month0() / 3) + 1),
                revenue: Some(1000.0),
                operating_income: Some(200.0),
                eps_diluted: Some(1.0),
                ..Default::default()
            }))
        }

        async fn balance_sheets(
            &self,
            symbol: &Symbol,
            _period: Period,
            _limit: usize,
        ) -> Result<Vec<BalanceSheet>> {
            Ok(self.stamp(|end, filed| BalanceSheet {
                date: end,
                symbol: symbol.as_str().to_string(),
                reported_currency: "USD".to_string(),
                filling_date: filed,
                accepted_date: format!("{filed} 17:00:00"),
                calendar_year: end.format("%Y").to_string(),
                period: format!("Q{}", (end.month0() / 3) + 1),
                total_assets: Some(4000.0),
                total_debt: Some(1000.0),
                ..Default::default()
            }))
        }

        async fn cash_flow_statements(
            &self,
            symbol: &Symbol,
            _period: Period,
            _limit: usize,
        ) -> Result<Vec<CashFlowStatement>> {
            Ok(self.stamp(|end, filed| CashFlowStatement {
                date: end,
                symbol: symbol.as_str().to_string(),
                reported_currency: "USD".to_string(),
                filling_date: filed,
                accepted_date: format!("{filed} 17:00:00"),
                calendar_year: end.format("%Y").to_string(),
                period: format!("Q{}", (end.month0() / 3) + 1),
                free_cash_flow: Some(250.0),
                ..Default::default()
            }))
        }
    }

    #[async_trait]
    impl EarningsSource for CannedSource {
        async fn earnings_history(
            &self,
            symbol: &Symbol,
            _years: u32,
        ) -> Result<Vec<EarningsEvent>> {
            Ok(self
                .quarters
                .iter()
                .rev()
                .map(|&q| EarningsEvent {
                    symbol: symbol.as_str().to_string(),
                    date: q + Duration::days(35),
                    time: ReleaseTime::Bmo,
                    eps: Some(1.0),
                    eps_estimated: Some(1.0),
                    is_fiscal: true,
                })
                .collect())
        }
    }

    #[async_trait]
    impl PriceSource for CannedSource {
        async fn daily_prices(&self, _symbol: &Symbol, _years: u32) -> Result<Vec<PriceBar>> {
            Ok(self.bars.clone())
        }
    }

    /// Source with no data at all.
    struct EmptySource;

    #[async_trait]
    impl EarningsSource for EmptySource {
        async fn earnings_history(
            &self,
            _symbol: &Symbol,
            _years: u32,
        ) -> Result<Vec<EarningsEvent>> {
            Ok(Vec::new())
        }
    }

    #[async_trait]
    impl PriceSource for EmptySource {
        async fn daily_prices(&self, _symbol: &Symbol, _years: u32) -> Result<Vec<PriceBar>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_merged_financials_end_to_end() {
        let source = CannedSource::new();
        let outcome = merged_financials(
            &source,
            &Symbol::new("TEST"),
            Period::Quarter,
            20,
            &SymbolOverrides::default(),
        )
        .await
        .unwrap();

        let records = outcome.records().unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].fiscal_period_end, d(2023, 3, 31));
        assert_eq!(records[0].revenue, Some(1000.0));
        assert_eq!(records[0].free_cash_flow, Some(250.0));
    }

    #[tokio::test]
    async fn test_stock_performance_end_to_end() {
        let source = CannedSource::new();
        let perf = stock_performance(
            &source,
            &Symbol::new("TEST"),
            Period::Quarter,
            20,
            &SymbolOverrides::default(),
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(perf.len(), 5);
        // Most recent disclosure first; Q1 2024 vs Q1 2023 is flat.
        assert_eq!(perf[0].fiscal_period_end, d(2024, 3, 31));
        assert_eq!(perf[0].revenue_growth, Some(0.0));
        assert_eq!(perf[0].debt_to_assets, Some(0.25));
    }

    #[tokio::test]
    async fn test_excluded_symbol_yields_no_performance() {
        let source = CannedSource::new();
        let perf = stock_performance(
            &source,
            &Symbol::new("CSC"),
            Period::Quarter,
            20,
            &SymbolOverrides::default(),
        )
        .await
        .unwrap();
        assert!(perf.is_none());
    }

    #[tokio::test]
    async fn test_eps_price_history_end_to_end() {
        let source = CannedSource::new();
        let points = eps_price_history(&source, &Symbol::new("TEST"), 3)
            .await
            .unwrap();

        assert_eq!(points.len(), 5);
        // Rolling four quarters of 1.0 each once the window fills.
        assert_eq!(points.last().unwrap().eps_ttm, Some(4.0));
        assert_eq!(points.last().unwrap().pe, 25.0);
    }

    #[tokio::test]
    async fn test_empty_sources_yield_empty_series() {
        let points = eps_price_history(&EmptySource, &Symbol::new("TEST"), 3)
            .await
            .unwrap();
        assert!(points.is_empty());

        let reactions = fiscal_reactions(&EmptySource, &Symbol::new("TEST"), 3)
            .await
            .unwrap();
        assert!(reactions.is_empty());
    }

    #[tokio::test]
    async fn test_fiscal_reactions_end_to_end() {
        let source = CannedSource::new();
        let reactions =
            fiscal_reactions_as_of(&source, &Symbol::new("TEST"), 3, d(2024, 12, 31))
                .await
                .unwrap();

        assert_eq!(reactions.len(), 5);
        assert!(reactions.iter().all(|r| r.close == Some(100.0)));
        // Flat closes mean zero reaction after the first release.
        assert_eq!(reactions[1].change, Some(0.0));
        assert_eq!(reactions[0].change, None);
    }
}
