//! Tabular (polars `DataFrame`) conversions for typed rows.
//!
//! Every pipeline operation returns typed rows; callers that want a
//! row-oriented table convert here, and callers that want the raw JSON shape
//! use `serde_json::to_value` on the same rows. Presentation never feeds back
//! into the pipeline algorithms.

use chrono::NaiveDate;
use polars::prelude::*;

use crate::error::{FmpError, Result};
use crate::types::{
    EarningsEvent, EpsPricePoint, MergedFinancialRecord, PerformanceRecord, PriceBar,
};

/// Days since the Unix epoch, which is what polars' `Date` dtype stores.
fn date_to_days(date: NaiveDate) -> i32 {
    (date - NaiveDate::default()).num_days() as i32
}

fn frame_err(e: PolarsError) -> FmpError {
    FmpError::Other(e.to_string())
}

/// Casts the named columns from epoch-day integers to the `Date` dtype.
fn cast_dates(df: DataFrame, date_cols: &[&str]) -> Result<DataFrame> {
    let mut lf = df.lazy();
    for name in date_cols {
        lf = lf.with_column(col(*name).cast(DataType::Date));
    }
    lf.collect().map_err(frame_err)
}

/// Converts daily price bars into a date-sorted DataFrame.
///
/// Columns: date, open, high, low, close, volume, pct_chg.
pub fn price_bars_to_dataframe(bars: &[PriceBar]) -> Result<DataFrame> {
    if bars.is_empty() {
        return Ok(DataFrame::empty());
    }

    let dates: Vec<i32> = bars.iter().map(|b| date_to_days(b.date)).collect();
    let df = DataFrame::new(vec![
        Column::new("date".into(), dates),
        Column::new("open".into(), bars.iter().map(|b| b.open).collect::<Vec<f64>>()),
        Column::new("high".into(), bars.iter().map(|b| b.high).collect::<Vec<f64>>()),
        Column::new("low".into(), bars.iter().map(|b| b.low).collect::<Vec<f64>>()),
        Column::new("close".into(), bars.iter().map(|b| b.close).collect::<Vec<f64>>()),
        Column::new("volume".into(), bars.iter().map(|b| b.volume).collect::<Vec<f64>>()),
        Column::new(
            "pct_chg".into(),
            bars.iter().map(|b| b.pct_chg).collect::<Vec<Option<f64>>>(),
        ),
    ])
    .map_err(frame_err)?;

    cast_dates(df, &["date"])
}

/// Converts normalized earnings events into a DataFrame.
///
/// Columns: date, symbol, eps, eps_estimated, is_fiscal.
pub fn earnings_to_dataframe(events: &[EarningsEvent]) -> Result<DataFrame> {
    if events.is_empty() {
        return Ok(DataFrame::empty());
    }

    let dates: Vec<i32> = events.iter().map(|e| date_to_days(e.date)).collect();
    let df = DataFrame::new(vec![
        Column::new("date".into(), dates),
        Column::new(
            "symbol".into(),
            events.iter().map(|e| e.symbol.clone()).collect::<Vec<String>>(),
        ),
        Column::new("eps".into(), events.iter().map(|e| e.eps).collect::<Vec<Option<f64>>>()),
        Column::new(
            "eps_estimated".into(),
            events.iter().map(|e| e.eps_estimated).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            "is_fiscal".into(),
            events.iter().map(|e| e.is_fiscal).collect::<Vec<bool>>(),
        ),
    ])
    .map_err(frame_err)?;

    cast_dates(df, &["date"])
}

/// Converts merged financial records into a DataFrame.
///
/// Carries the key fields plus the numeric columns the performance deriver
/// consumes; the full typed record remains available for anything else.
pub fn merged_records_to_dataframe(records: &[MergedFinancialRecord]) -> Result<DataFrame> {
    if records.is_empty() {
        return Ok(DataFrame::empty());
    }

    let period_ends: Vec<i32> = records.iter().map(|r| date_to_days(r.fiscal_period_end)).collect();
    let disclosures: Vec<i32> = records.iter().map(|r| date_to_days(r.disclosure_date)).collect();
    let df = DataFrame::new(vec![
        Column::new(
            "symbol".into(),
            records.iter().map(|r| r.symbol.clone()).collect::<Vec<String>>(),
        ),
        Column::new("fiscal_period_end".into(), period_ends),
        Column::new("disclosure_date".into(), disclosures),
        Column::new(
            "calendar_year".into(),
            records.iter().map(|r| r.calendar_year.clone()).collect::<Vec<String>>(),
        ),
        Column::new(
            "period".into(),
            records.iter().map(|r| r.period.clone()).collect::<Vec<String>>(),
        ),
        Column::new(
            "revenue".into(),
            records.iter().map(|r| r.revenue).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            "gross_profit".into(),
            records.iter().map(|r| r.gross_profit).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            "gross_profit_ratio".into(),
            records.iter().map(|r| r.gross_profit_ratio).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            "operating_income".into(),
            records.iter().map(|r| r.operating_income).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            "operating_income_ratio".into(),
            records.iter().map(|r| r.operating_income_ratio).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            "net_income".into(),
            records.iter().map(|r| r.net_income).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            "eps".into(),
            records.iter().map(|r| r.eps).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            "eps_diluted".into(),
            records.iter().map(|r| r.eps_diluted).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            "total_assets".into(),
            records.iter().map(|r| r.total_assets).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            "total_debt".into(),
            records.iter().map(|r| r.total_debt).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            "stockholders_equity".into(),
            records.iter().map(|r| r.stockholders_equity).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            "operating_cash_flow".into(),
            records.iter().map(|r| r.operating_cash_flow).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            "capital_expenditure".into(),
            records.iter().map(|r| r.capital_expenditure).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            "free_cash_flow".into(),
            records.iter().map(|r| r.free_cash_flow).collect::<Vec<Option<f64>>>(),
        ),
    ])
    .map_err(frame_err)?;

    cast_dates(df, &["fiscal_period_end", "disclosure_date"])
}

/// Converts the EPS/price time series into a DataFrame.
///
/// Columns: date, eps_ttm, pe, close, eps, forward.
pub fn eps_price_to_dataframe(points: &[EpsPricePoint]) -> Result<DataFrame> {
    if points.is_empty() {
        return Ok(DataFrame::empty());
    }

    let dates: Vec<i32> = points.iter().map(|p| date_to_days(p.date)).collect();
    let df = DataFrame::new(vec![
        Column::new("date".into(), dates),
        Column::new(
            "eps_ttm".into(),
            points.iter().map(|p| p.eps_ttm).collect::<Vec<Option<f64>>>(),
        ),
        Column::new("pe".into(), points.iter().map(|p| p.pe).collect::<Vec<f64>>()),
        Column::new("close".into(), points.iter().map(|p| p.close).collect::<Vec<f64>>()),
        Column::new("eps".into(), points.iter().map(|p| p.eps).collect::<Vec<Option<f64>>>()),
        Column::new(
            "forward".into(),
            points.iter().map(|p| p.forward).collect::<Vec<Option<bool>>>(),
        ),
    ])
    .map_err(frame_err)?;

    cast_dates(df, &["date"])
}

/// Converts performance records into a DataFrame.
pub fn performance_to_dataframe(records: &[PerformanceRecord]) -> Result<DataFrame> {
    if records.is_empty() {
        return Ok(DataFrame::empty());
    }

    let period_ends: Vec<i32> = records.iter().map(|r| date_to_days(r.fiscal_period_end)).collect();
    let disclosures: Vec<i32> = records.iter().map(|r| date_to_days(r.disclosure_date)).collect();
    let df = DataFrame::new(vec![
        Column::new(
            "symbol".into(),
            records.iter().map(|r| r.symbol.clone()).collect::<Vec<String>>(),
        ),
        Column::new("fiscal_period_end".into(), period_ends),
        Column::new("disclosure_date".into(), disclosures),
        Column::new(
            "calendar_year".into(),
            records.iter().map(|r| r.calendar_year.clone()).collect::<Vec<String>>(),
        ),
        Column::new(
            "period".into(),
            records.iter().map(|r| r.period.clone()).collect::<Vec<String>>(),
        ),
        Column::new(
            "gross_margin".into(),
            records.iter().map(|r| r.gross_margin).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            "operating_margin".into(),
            records.iter().map(|r| r.operating_margin).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            "free_cash_flow_margin".into(),
            records.iter().map(|r| r.free_cash_flow_margin).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            "debt_to_assets".into(),
            records.iter().map(|r| r.debt_to_assets).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            "revenue".into(),
            records.iter().map(|r| r.revenue).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            "revenue_growth".into(),
            records.iter().map(|r| r.revenue_growth).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            "operating_income".into(),
            records.iter().map(|r| r.operating_income).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            "operating_income_growth".into(),
            records.iter().map(|r| r.operating_income_growth).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            "eps_diluted".into(),
            records.iter().map(|r| r.eps_diluted).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            "eps_diluted_growth".into(),
            records.iter().map(|r| r.eps_diluted_growth).collect::<Vec<Option<f64>>>(),
        ),
    ])
    .map_err(frame_err)?;

    cast_dates(df, &["fiscal_period_end", "disclosure_date"])
}
