//! Core data types for FMP market and fundamental data.
//!
//! This module defines:
//!
//! - [`Symbol`] - Trading symbol/ticker
//! - [`IncomeStatement`], [`BalanceSheet`], [`CashFlowStatement`] - wire-level statement rows
//! - [`StatementKey`] - the seven-field join key shared by the three statements
//! - [`MergedFinancialRecord`] - the inner-join product of the three statements
//! - [`EarningsEvent`] - a normalized earnings release
//! - [`PriceBar`] - one trading day of OHLCV data
//! - [`EpsPricePoint`] - trailing EPS aligned with a daily close
//! - [`PerformanceRecord`] - derived margins, leverage, and growth rates
//! - [`FiscalReaction`] - closing-price move attributed to an earnings release
//! - [`SegmentRevenue`] - revenue broken down by product or geography
//!
//! Numeric fields on fundamental types are `Option<f64>`: the vendor reports
//! sparse data, and "not reported" is kept distinct from "reported as zero"
//! until a caller opts into [`MergedFinancialRecord::zero_filled`] or
//! [`PerformanceRecord::zero_filled`] at the presentation boundary.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::period::ReleaseTime;

/// A trading symbol/ticker.
///
/// Symbols are automatically uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// The key set the three statements are joined on.
///
/// A period survives the merge only when all three statements agree on every
/// field of this key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatementKey {
    /// SEC filer identifier.
    pub cik: Option<String>,
    /// Date the statement was filed/disclosed (vendor `fillingDate`).
    pub disclosure_date: NaiveDate,
    /// Calendar date the reporting period covers (vendor `date`).
    pub fiscal_period_end: NaiveDate,
    /// Stock symbol.
    pub symbol: String,
    /// Reporting period label as the vendor sends it ("Q1".."Q4" or "FY").
    pub period: String,
    /// Calendar year label.
    pub calendar_year: String,
    /// Currency the statement is reported in.
    pub reported_currency: String,
}

/// One reporting period of an income statement, as the vendor returns it.
///
/// Vendor link boilerplate (`link`, `finalLink`) is never deserialized.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStatement {
    /// Fiscal period end date.
    pub date: NaiveDate,
    /// Stock symbol.
    pub symbol: String,
    /// Currency the statement is reported in.
    #[serde(default)]
    pub reported_currency: String,
    /// SEC filer identifier.
    pub cik: Option<String>,
    /// Filing/disclosure date.
    pub filling_date: NaiveDate,
    /// SEC acceptance timestamp, kept in the vendor's sortable string form.
    #[serde(default)]
    pub accepted_date: String,
    /// Calendar year label.
    #[serde(default)]
    pub calendar_year: String,
    /// Reporting period label ("Q1".."Q4" or "FY").
    #[serde(default)]
    pub period: String,
    /// Total revenue.
    pub revenue: Option<f64>,
    /// Cost of revenue.
    pub cost_of_revenue: Option<f64>,
    /// Gross profit.
    pub gross_profit: Option<f64>,
    /// Gross profit as a fraction of revenue.
    pub gross_profit_ratio: Option<f64>,
    /// Operating expenses.
    pub operating_expenses: Option<f64>,
    /// Operating income.
    pub operating_income: Option<f64>,
    /// Operating income as a fraction of revenue.
    pub operating_income_ratio: Option<f64>,
    /// Net income.
    pub net_income: Option<f64>,
    /// Net income as a fraction of revenue.
    pub net_income_ratio: Option<f64>,
    /// EBITDA.
    pub ebitda: Option<f64>,
    /// Basic earnings per share.
    pub eps: Option<f64>,
    /// Diluted earnings per share.
    #[serde(rename = "epsdiluted")]
    pub eps_diluted: Option<f64>,
    /// Weighted average shares outstanding.
    pub weighted_average_shs_out: Option<f64>,
    /// Weighted average diluted shares outstanding.
    pub weighted_average_shs_out_dil: Option<f64>,
}

/// One reporting period of a balance sheet, as the vendor returns it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheet {
    /// Fiscal period end date.
    pub date: NaiveDate,
    /// Stock symbol.
    pub symbol: String,
    /// Currency the statement is reported in.
    #[serde(default)]
    pub reported_currency: String,
    /// SEC filer identifier.
    pub cik: Option<String>,
    /// Filing/disclosure date.
    pub filling_date: NaiveDate,
    /// SEC acceptance timestamp.
    #[serde(default)]
    pub accepted_date: String,
    /// Calendar year label.
    #[serde(default)]
    pub calendar_year: String,
    /// Reporting period label.
    #[serde(default)]
    pub period: String,
    /// Total assets.
    pub total_assets: Option<f64>,
    /// Total current assets.
    pub total_current_assets: Option<f64>,
    /// Cash and cash equivalents.
    pub cash_and_cash_equivalents: Option<f64>,
    /// Total liabilities.
    pub total_liabilities: Option<f64>,
    /// Total current liabilities.
    pub total_current_liabilities: Option<f64>,
    /// Total debt.
    pub total_debt: Option<f64>,
    /// Net debt.
    pub net_debt: Option<f64>,
    /// Total stockholders' equity.
    pub total_stockholders_equity: Option<f64>,
}

/// One reporting period of a cash-flow statement, as the vendor returns it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowStatement {
    /// Fiscal period end date.
    pub date: NaiveDate,
    /// Stock symbol.
    pub symbol: String,
    /// Currency the statement is reported in.
    #[serde(default)]
    pub reported_currency: String,
    /// SEC filer identifier.
    pub cik: Option<String>,
    /// Filing/disclosure date.
    pub filling_date: NaiveDate,
    /// SEC acceptance timestamp.
    #[serde(default)]
    pub accepted_date: String,
    /// Calendar year label.
    #[serde(default)]
    pub calendar_year: String,
    /// Reporting period label.
    #[serde(default)]
    pub period: String,
    /// Net income as reported on the cash-flow statement.
    pub net_income: Option<f64>,
    /// Operating cash flow.
    pub operating_cash_flow: Option<f64>,
    /// Capital expenditure (negative by vendor convention).
    pub capital_expenditure: Option<f64>,
    /// Free cash flow.
    pub free_cash_flow: Option<f64>,
    /// Dividends paid.
    pub dividends_paid: Option<f64>,
}

impl IncomeStatement {
    /// Returns the join key for this row.
    #[must_use]
    pub fn key(&self) -> StatementKey {
        StatementKey {
            cik: self.cik.clone(),
            disclosure_date: self.filling_date,
            fiscal_period_end: self.date,
            symbol: self.symbol.clone(),
            period: self.period.clone(),
            calendar_year: self.calendar_year.clone(),
            reported_currency: self.reported_currency.clone(),
        }
    }
}

impl BalanceSheet {
    /// Returns the join key for this row.
    #[must_use]
    pub fn key(&self) -> StatementKey {
        StatementKey {
            cik: self.cik.clone(),
            disclosure_date: self.filling_date,
            fiscal_period_end: self.date,
            symbol: self.symbol.clone(),
            period: self.period.clone(),
            calendar_year: self.calendar_year.clone(),
            reported_currency: self.reported_currency.clone(),
        }
    }
}

impl CashFlowStatement {
    /// Returns the join key for this row.
    #[must_use]
    pub fn key(&self) -> StatementKey {
        StatementKey {
            cik: self.cik.clone(),
            disclosure_date: self.filling_date,
            fiscal_period_end: self.date,
            symbol: self.symbol.clone(),
            period: self.period.clone(),
            calendar_year: self.calendar_year.clone(),
            reported_currency: self.reported_currency.clone(),
        }
    }
}

/// The inner join of income, balance, and cash-flow rows for one period.
///
/// Every record carries data from all three statements; partial records never
/// survive the merge. The fiscal period covered and the date it was disclosed
/// are two explicitly named fields, `fiscal_period_end` and
/// `disclosure_date` - there is no post-merge overloading of `date`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedFinancialRecord {
    /// Stock symbol.
    pub symbol: String,
    /// SEC filer identifier.
    pub cik: Option<String>,
    /// Calendar date the reporting period covers.
    pub fiscal_period_end: NaiveDate,
    /// Date the statements were filed/disclosed.
    pub disclosure_date: NaiveDate,
    /// SEC acceptance timestamp of the income statement filing.
    pub accepted_at: String,
    /// Calendar year label.
    pub calendar_year: String,
    /// Reporting period label.
    pub period: String,
    /// Currency the statements are reported in.
    pub reported_currency: String,

    // Income statement
    /// Total revenue.
    pub revenue: Option<f64>,
    /// Cost of revenue.
    pub cost_of_revenue: Option<f64>,
    /// Gross profit.
    pub gross_profit: Option<f64>,
    /// Gross profit as a fraction of revenue.
    pub gross_profit_ratio: Option<f64>,
    /// Operating expenses.
    pub operating_expenses: Option<f64>,
    /// Operating income.
    pub operating_income: Option<f64>,
    /// Operating income as a fraction of revenue.
    pub operating_income_ratio: Option<f64>,
    /// Net income (from the income statement, which wins the cross-statement
    /// field collision).
    pub net_income: Option<f64>,
    /// Net income as a fraction of revenue.
    pub net_income_ratio: Option<f64>,
    /// EBITDA.
    pub ebitda: Option<f64>,
    /// Basic earnings per share.
    pub eps: Option<f64>,
    /// Diluted earnings per share.
    pub eps_diluted: Option<f64>,
    /// Weighted average shares outstanding.
    pub weighted_average_shs_out: Option<f64>,

    // Balance sheet
    /// Total assets.
    pub total_assets: Option<f64>,
    /// Total current assets.
    pub total_current_assets: Option<f64>,
    /// Cash and cash equivalents.
    pub cash_and_equivalents: Option<f64>,
    /// Total liabilities.
    pub total_liabilities: Option<f64>,
    /// Total current liabilities.
    pub total_current_liabilities: Option<f64>,
    /// Total debt.
    pub total_debt: Option<f64>,
    /// Total stockholders' equity.
    pub stockholders_equity: Option<f64>,

    // Cash flow statement
    /// Operating cash flow.
    pub operating_cash_flow: Option<f64>,
    /// Capital expenditure.
    pub capital_expenditure: Option<f64>,
    /// Free cash flow.
    pub free_cash_flow: Option<f64>,
    /// Dividends paid.
    pub dividends_paid: Option<f64>,
}

impl MergedFinancialRecord {
    /// Fiscal quarter (1-4) of the period this record covers.
    #[must_use]
    pub fn fiscal_quarter(&self) -> u32 {
        (self.fiscal_period_end.month() - 1) / 3 + 1
    }

    /// Fiscal year of the period this record covers.
    #[must_use]
    pub fn fiscal_year(&self) -> i32 {
        self.fiscal_period_end.year()
    }

    /// Free cash flow, deriving `operating_cash_flow + capital_expenditure`
    /// when the vendor did not report it directly.
    #[must_use]
    pub fn free_cash_flow_or_derived(&self) -> Option<f64> {
        self.free_cash_flow.or_else(|| {
            Some(self.operating_cash_flow? + self.capital_expenditure?)
        })
    }

    /// Replaces every missing numeric field with zero.
    ///
    /// This conflates "not reported" with "reported as zero" and exists so
    /// downstream ratio arithmetic never sees a hole; it is an opt-in
    /// presentation step, not something the pipeline does implicitly.
    #[must_use]
    pub fn zero_filled(mut self) -> Self {
        for field in [
            &mut self.revenue,
            &mut self.cost_of_revenue,
            &mut self.gross_profit,
            &mut self.gross_profit_ratio,
            &mut self.operating_expenses,
            &mut self.operating_income,
            &mut self.operating_income_ratio,
            &mut self.net_income,
            &mut self.net_income_ratio,
            &mut self.ebitda,
            &mut self.eps,
            &mut self.eps_diluted,
            &mut self.weighted_average_shs_out,
            &mut self.total_assets,
            &mut self.total_current_assets,
            &mut self.cash_and_equivalents,
            &mut self.total_liabilities,
            &mut self.total_current_liabilities,
            &mut self.total_debt,
            &mut self.stockholders_equity,
            &mut self.operating_cash_flow,
            &mut self.capital_expenditure,
            &mut self.free_cash_flow,
            &mut self.dividends_paid,
        ] {
            field.get_or_insert(0.0);
        }
        self
    }
}

/// One raw earnings-calendar entry, as the vendor returns it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEarningsEvent {
    /// Release date as reported by the vendor (not yet session-adjusted).
    pub date: NaiveDate,
    /// Stock symbol.
    pub symbol: String,
    /// Actual earnings per share, absent until the release happens.
    pub eps: Option<f64>,
    /// Analyst-estimated earnings per share.
    pub eps_estimated: Option<f64>,
    /// Release timing relative to the trading session.
    #[serde(default)]
    pub time: ReleaseTime,
    /// Reported revenue.
    pub revenue: Option<f64>,
    /// Estimated revenue.
    pub revenue_estimated: Option<f64>,
}

/// One earnings release with the session-adjusted date applied.
///
/// Construction is the only place the date shift happens; events are never
/// mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EarningsEvent {
    /// Stock symbol.
    pub symbol: String,
    /// Release date, shifted forward one day for after-market-close releases.
    pub date: NaiveDate,
    /// Release timing as originally reported.
    pub time: ReleaseTime,
    /// Actual earnings per share, absent until the release happens.
    pub eps: Option<f64>,
    /// Analyst-estimated earnings per share.
    pub eps_estimated: Option<f64>,
    /// Marks the entry as a fiscal event; always true once normalized.
    pub is_fiscal: bool,
}

/// One trading day's OHLCV bar.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading date.
    pub date: NaiveDate,
    /// Opening price.
    pub open: f64,
    /// Highest price of the session.
    pub high: f64,
    /// Lowest price of the session.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Trading volume.
    pub volume: f64,
    /// Percentage change of the close from the prior bar; `None` on the
    /// first bar of a series.
    pub pct_chg: Option<f64>,
}

/// Trailing EPS aligned with one trading day's close.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpsPricePoint {
    /// Trading date.
    pub date: NaiveDate,
    /// Trailing-twelve-month EPS; `None` until four quarters of history
    /// exist.
    pub eps_ttm: Option<f64>,
    /// Price/earnings ratio; exactly `0.0` whenever the trailing EPS is
    /// unknown or non-positive, never negative and never NaN.
    pub pe: f64,
    /// Closing price.
    pub close: f64,
    /// Quarterly EPS in effect at this date (estimated when `forward`).
    pub eps: Option<f64>,
    /// True when the trailing EPS incorporates an estimated quarter; `None`
    /// past the last known earnings event.
    pub forward: Option<bool>,
}

/// Closing-price reaction attributed to one earnings release.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FiscalReaction {
    /// Session-adjusted release date.
    pub date: NaiveDate,
    /// Closing price on (or carried forward onto) the release date.
    pub close: Option<f64>,
    /// Actual earnings per share.
    pub eps: Option<f64>,
    /// Analyst-estimated earnings per share.
    pub eps_estimated: Option<f64>,
    /// Percentage change of the close into the release date.
    pub change: Option<f64>,
}

/// Derived per-period performance metrics for one merged record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    /// Stock symbol.
    pub symbol: String,
    /// Calendar date the reporting period covers.
    pub fiscal_period_end: NaiveDate,
    /// Date the statements were disclosed.
    pub disclosure_date: NaiveDate,
    /// Calendar year label.
    pub calendar_year: String,
    /// Reporting period label.
    pub period: String,
    /// Gross margin (vendor-provided ratio, passed through).
    pub gross_margin: Option<f64>,
    /// Operating margin (vendor-provided ratio, passed through).
    pub operating_margin: Option<f64>,
    /// Free cash flow divided by revenue.
    pub free_cash_flow_margin: Option<f64>,
    /// Total debt divided by total assets.
    pub debt_to_assets: Option<f64>,
    /// Total revenue.
    pub revenue: Option<f64>,
    /// Year-over-year revenue growth, matched by fiscal quarter.
    pub revenue_growth: Option<f64>,
    /// Operating income.
    pub operating_income: Option<f64>,
    /// Year-over-year operating income growth, matched by fiscal quarter.
    pub operating_income_growth: Option<f64>,
    /// Diluted earnings per share.
    pub eps_diluted: Option<f64>,
    /// Year-over-year diluted EPS growth, matched by fiscal quarter.
    pub eps_diluted_growth: Option<f64>,
}

impl PerformanceRecord {
    /// Replaces every missing numeric field with zero; opt-in presentation
    /// step with the same caveats as
    /// [`MergedFinancialRecord::zero_filled`].
    #[must_use]
    pub fn zero_filled(mut self) -> Self {
        for field in [
            &mut self.gross_margin,
            &mut self.operating_margin,
            &mut self.free_cash_flow_margin,
            &mut self.debt_to_assets,
            &mut self.revenue,
            &mut self.revenue_growth,
            &mut self.operating_income,
            &mut self.operating_income_growth,
            &mut self.eps_diluted,
            &mut self.eps_diluted_growth,
        ] {
            field.get_or_insert(0.0);
        }
        self
    }
}

/// Revenue for one period broken down by segment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentRevenue {
    /// Fiscal period end date.
    pub date: NaiveDate,
    /// Revenue per segment name.
    pub segments: BTreeMap<String, f64>,
}

/// A real-time quote for one symbol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Stock symbol.
    pub symbol: String,
    /// Company name.
    #[serde(default)]
    pub name: String,
    /// Last trade price.
    pub price: Option<f64>,
    /// Percentage change on the day.
    pub changes_percentage: Option<f64>,
    /// Absolute change on the day.
    pub change: Option<f64>,
    /// Session low.
    pub day_low: Option<f64>,
    /// Session high.
    pub day_high: Option<f64>,
    /// 52-week high.
    pub year_high: Option<f64>,
    /// 52-week low.
    pub year_low: Option<f64>,
    /// Market capitalization.
    pub market_cap: Option<f64>,
    /// Session volume.
    pub volume: Option<f64>,
    /// Previous session close.
    pub previous_close: Option<f64>,
    /// Trailing EPS as the vendor computes it.
    pub eps: Option<f64>,
    /// Trailing PE as the vendor computes it.
    pub pe: Option<f64>,
}

/// A minimal price/volume quote.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuoteShort {
    /// Stock symbol.
    pub symbol: String,
    /// Last trade price.
    pub price: Option<f64>,
    /// Session volume.
    pub volume: Option<f64>,
}

/// One symbol-search hit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Stock symbol.
    pub symbol: String,
    /// Company name.
    #[serde(default)]
    pub name: String,
    /// Trading currency.
    pub currency: Option<String>,
    /// Full exchange name.
    pub stock_exchange: Option<String>,
    /// Short exchange name.
    pub exchange_short_name: Option<String>,
}

/// One entry of the full listed-stock roster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedStock {
    /// Stock symbol.
    pub symbol: String,
    /// Company name.
    pub name: Option<String>,
    /// Last trade price.
    pub price: Option<f64>,
    /// Short exchange name.
    pub exchange_short_name: Option<String>,
    /// Security type label ("stock", "etf", ...).
    #[serde(rename = "type", default)]
    pub kind: String,
}
