//! Quote, price-history, search, and roster endpoints.

use async_trait::async_trait;
use chrono::{Months, NaiveDate, Utc};
use fmpkit_core::{
    FmpError, ListedStock, PriceBar, PriceSource, Quote, QuoteShort, Result, SearchResult, Symbol,
};
use serde::Deserialize;

use crate::FmpClient;

/// The vendor wraps price history in an envelope object.
#[derive(Debug, Deserialize)]
struct HistoricalEnvelope {
    #[serde(default)]
    historical: Vec<RawPriceBar>,
}

/// One raw daily bar. Vendor noise columns (splits, vwap, labels, ...) are
/// not deserialized.
#[derive(Debug, Deserialize)]
struct RawPriceBar {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: f64,
}

impl FmpClient {
    /// Fetches daily price history for a date range, oldest first, with the
    /// close-over-close percentage change derived.
    pub async fn historical_prices(
        &self,
        symbol: &Symbol,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<PriceBar>> {
        let mut params = Vec::new();
        if let Some(f) = from {
            params.push(("from", f.to_string()));
        }
        if let Some(t) = to {
            params.push(("to", t.to_string()));
        }

        let endpoint = format!("historical-price-full/{}", symbol.as_str());
        let envelope: HistoricalEnvelope = self.get(&endpoint, &params).await?;

        let mut raw = envelope.historical;
        raw.sort_by_key(|b| b.date);
        raw.dedup_by_key(|b| b.date);

        let mut bars = Vec::with_capacity(raw.len());
        let mut prev_close: Option<f64> = None;
        for r in raw {
            let pct_chg = prev_close
                .filter(|p| *p != 0.0)
                .map(|p| (r.close - p) / p);
            prev_close = Some(r.close);
            bars.push(PriceBar {
                date: r.date,
                open: r.open,
                high: r.high,
                low: r.low,
                close: r.close,
                volume: r.volume,
                pct_chg,
            });
        }
        Ok(bars)
    }

    /// Fetches daily price history covering the last `years` years.
    pub async fn daily_prices(&self, symbol: &Symbol, years: u32) -> Result<Vec<PriceBar>> {
        let to = Utc::now().date_naive();
        let from = to
            .checked_sub_months(Months::new(years * 12))
            .ok_or_else(|| FmpError::InvalidParameter(format!("window too large: {years} years")))?;
        self.historical_prices(symbol, Some(from), Some(to)).await
    }

    /// Fetches the full real-time quote for a symbol.
    pub async fn quote(&self, symbol: &Symbol) -> Result<Option<Quote>> {
        let endpoint = format!("quote/{}", symbol.as_str());
        let quotes: Vec<Quote> = self.get(&endpoint, &[]).await?;
        Ok(quotes.into_iter().next())
    }

    /// Fetches the minimal price/volume quote for a symbol.
    pub async fn quote_short(&self, symbol: &Symbol) -> Result<Option<QuoteShort>> {
        let endpoint = format!("quote-short/{}", symbol.as_str());
        let quotes: Vec<QuoteShort> = self.get(&endpoint, &[]).await?;
        Ok(quotes.into_iter().next())
    }

    /// Searches companies by name or symbol fragment.
    pub async fn search(
        &self,
        query: &str,
        exchange: Option<&str>,
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        let mut params = vec![
            ("query", query.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(ex) = exchange {
            params.push(("exchange", ex.to_string()));
        }
        self.get("search", &params).await
    }

    /// Fetches the full listed-stock roster.
    pub async fn stock_list(&self) -> Result<Vec<ListedStock>> {
        self.get("stock/list", &[]).await
    }
}

#[async_trait]
impl PriceSource for FmpClient {
    async fn daily_prices(&self, symbol: &Symbol, years: u32) -> Result<Vec<PriceBar>> {
        Self::daily_prices(self, symbol, years).await
    }
}
