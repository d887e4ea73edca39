//! Per-period performance metrics derived from merged statement records.
//!
//! Margins are point-in-time ratios within one period; growth compares each
//! period against the same fiscal quarter one year earlier, so seasonal
//! issuers are never measured against an adjacent quarter.

use std::collections::HashMap;

use fmpkit_core::{MergedFinancialRecord, PerformanceRecord};

/// Relative change from `prev` to `cur`, defined only when the base period
/// is known and nonzero.
fn growth(cur: Option<f64>, prev: Option<f64>) -> Option<f64> {
    match (cur, prev) {
        (Some(c), Some(p)) if p != 0.0 => Some((c - p) / p),
        _ => None,
    }
}

/// Ratio of two optional quantities, `None` when either side is missing or
/// the denominator is zero.
fn ratio(num: Option<f64>, den: Option<f64>) -> Option<f64> {
    match (num, den) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}

/// Derives performance metrics for a set of merged records.
///
/// Margins pass through or divide fields within one record. Growth fields
/// compare each record with the record one fiscal year earlier in the same
/// fiscal quarter; records without such a predecessor keep `None`. Output
/// is ordered by disclosure date descending.
#[must_use]
pub fn derive_performance(records: &[MergedFinancialRecord]) -> Vec<PerformanceRecord> {
    // Prior-year lookup keyed by (symbol, fiscal year, fiscal quarter).
    let by_period: HashMap<(&str, i32, u32), &MergedFinancialRecord> = records
        .iter()
        .map(|r| ((r.symbol.as_str(), r.fiscal_year(), r.fiscal_quarter()), r))
        .collect();

    let mut out: Vec<PerformanceRecord> = records
        .iter()
        .map(|r| {
            let prior = by_period
                .get(&(r.symbol.as_str(), r.fiscal_year() - 1, r.fiscal_quarter()))
                .copied();
            PerformanceRecord {
                symbol: r.symbol.clone(),
                fiscal_period_end: r.fiscal_period_end,
                disclosure_date: r.disclosure_date,
                calendar_year: r.calendar_year.clone(),
                period: r.period.clone(),
                gross_margin: r.gross_profit_ratio,
                operating_margin: r.operating_income_ratio,
                free_cash_flow_margin: ratio(r.free_cash_flow_or_derived(), r.revenue),
                debt_to_assets: ratio(r.total_debt, r.total_assets),
                revenue: r.revenue,
                revenue_growth: growth(r.revenue, prior.and_then(|p| p.revenue)),
                operating_income: r.operating_income,
                operating_income_growth: growth(
                    r.operating_income,
                    prior.and_then(|p| p.operating_income),
                ),
                eps_diluted: r.eps_diluted,
                eps_diluted_growth: growth(
                    r.eps_diluted,
                    prior.and_then(|p| p.eps_diluted),
                ),
            }
        })
        .collect();

    out.sort_by(|a, b| b.disclosure_date.cmp(&a.disclosure_date));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn record(
        period_end: NaiveDate,
        revenue: f64,
        operating_income: f64,
        eps_diluted: f64,
    ) -> MergedFinancialRecord {
        MergedFinancialRecord {
            symbol: "TEST".to_string(),
            fiscal_period_end: period_end,
            disclosure_date: period_end + chrono::Duration::days(35),
            calendar_year: period_end.format("%Y").to_string(),
            period: format!("Q{}", (period_end.month0() / 3) + 1),
            reported_currency: "USD".to_string(),
            revenue: Some(revenue),
            gross_profit_ratio: Some(0.45),
            operating_income: Some(operating_income),
            operating_income_ratio: Some(operating_income / revenue),
            eps_diluted: Some(eps_diluted),
            total_assets: Some(4000.0),
            total_debt: Some(1000.0),
            operating_cash_flow: Some(300.0),
            capital_expenditure: Some(-100.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_growth_matches_fiscal_quarter_year_over_year() {
        let records = vec![
            record(d(2023, 3, 31), 1000.0, 200.0, 1.0),
            record(d(2023, 6, 30), 1200.0, 250.0, 1.2),
            record(d(2024, 3, 31), 1100.0, 240.0, 1.25),
            record(d(2024, 6, 30), 1500.0, 300.0, 1.5),
        ];

        let perf = derive_performance(&records);
        let q1_2024 = perf
            .iter()
            .find(|p| p.fiscal_period_end == d(2024, 3, 31))
            .unwrap();

        // Q1 2024 against Q1 2023, never against Q4 2023 or Q2 2024.
        assert_eq!(q1_2024.revenue_growth, Some((1100.0 - 1000.0) / 1000.0));
        assert_eq!(
            q1_2024.operating_income_growth,
            Some((240.0 - 200.0) / 200.0)
        );
        assert_eq!(q1_2024.eps_diluted_growth, Some(0.25));
    }

    #[test]
    fn test_first_year_has_no_growth() {
        let records = vec![
            record(d(2023, 3, 31), 1000.0, 200.0, 1.0),
            record(d(2024, 3, 31), 1100.0, 240.0, 1.25),
        ];

        let perf = derive_performance(&records);
        let q1_2023 = perf
            .iter()
            .find(|p| p.fiscal_period_end == d(2023, 3, 31))
            .unwrap();
        assert_eq!(q1_2023.revenue_growth, None);
        assert_eq!(q1_2023.clone().zero_filled().revenue_growth, Some(0.0));
    }

    #[test]
    fn test_margins_and_ordering() {
        let records = vec![
            record(d(2023, 3, 31), 1000.0, 200.0, 1.0),
            record(d(2023, 6, 30), 1200.0, 250.0, 1.2),
        ];

        let perf = derive_performance(&records);
        // Most recent disclosure first.
        assert_eq!(perf[0].fiscal_period_end, d(2023, 6, 30));
        assert_eq!(perf[0].gross_margin, Some(0.45));
        // FCF derived from OCF + capex when not reported directly.
        assert_eq!(perf[0].free_cash_flow_margin, Some(200.0 / 1200.0));
        assert_eq!(perf[0].debt_to_assets, Some(0.25));
    }

    #[test]
    fn test_zero_base_yields_no_growth() {
        let records = vec![
            record(d(2023, 3, 31), 1000.0, 0.0, 1.0),
            record(d(2024, 3, 31), 1100.0, 240.0, 1.25),
        ];

        let perf = derive_performance(&records);
        let q1_2024 = perf
            .iter()
            .find(|p| p.fiscal_period_end == d(2024, 3, 31))
            .unwrap();
        assert_eq!(q1_2024.operating_income_growth, None);
        assert_eq!(q1_2024.revenue_growth, Some(0.1));
    }
}
