//! Statement merger: inner join of income, balance, and cash-flow rows.
//!
//! Only periods present in all three statements survive, so a merged record
//! never has missing cross-statement fields. Periods with partial vendor
//! discrepancies are silently discarded by the inner join - a deliberate
//! policy.

use std::collections::HashMap;

use fmpkit_core::{
    BalanceSheet, CashFlowStatement, IncomeStatement, MergedFinancialRecord, Period,
};
use tracing::warn;

use crate::overrides::SymbolOverrides;

/// Largest tolerated gap between consecutive quarterly period ends, in days.
/// Nominal cadence is ~91 days; the looser bound accommodates issuers with
/// irregular fiscal calendars.
pub const MAX_QUARTER_GAP_DAYS: i64 = 150;

/// Result of reconciling the three statements for one symbol.
///
/// Data-quality conditions are explicit variants rather than errors, so
/// callers can tell "no usable data" apart from "a problem occurred".
#[derive(Clone, Debug, PartialEq)]
pub enum MergeOutcome {
    /// The statements reconciled; records are ordered by disclosure date
    /// ascending.
    Merged(Vec<MergedFinancialRecord>),
    /// One or more of the three statements was empty.
    Incomplete,
    /// Consecutive period ends were further apart than the quarterly bound;
    /// none of the data can be trusted.
    AnomalousContinuity {
        /// The offending gap, in days.
        gap_days: i64,
    },
    /// The symbol is on the deny list.
    Excluded,
}

impl MergeOutcome {
    /// True when the merge produced usable records.
    #[must_use]
    pub const fn is_merged(&self) -> bool {
        matches!(self, Self::Merged(_))
    }

    /// The merged records, when the outcome is [`Self::Merged`].
    #[must_use]
    pub fn records(self) -> Option<Vec<MergedFinancialRecord>> {
        match self {
            Self::Merged(records) => Some(records),
            _ => None,
        }
    }

    /// Borrows the merged records, when the outcome is [`Self::Merged`].
    #[must_use]
    pub fn as_records(&self) -> Option<&[MergedFinancialRecord]> {
        match self {
            Self::Merged(records) => Some(records),
            _ => None,
        }
    }
}

/// Joins one period's rows from the three statements into a merged record.
///
/// The income statement wins the `net_income` field collision with the
/// cash-flow statement, and contributes the acceptance timestamp.
fn join_rows(
    income: &IncomeStatement,
    balance: &BalanceSheet,
    cash: &CashFlowStatement,
) -> MergedFinancialRecord {
    MergedFinancialRecord {
        symbol: income.symbol.clone(),
        cik: income.cik.clone(),
        fiscal_period_end: income.date,
        disclosure_date: income.filling_date,
        accepted_at: income.accepted_date.clone(),
        calendar_year: income.calendar_year.clone(),
        period: income.period.clone(),
        reported_currency: income.reported_currency.clone(),
        revenue: income.revenue,
        cost_of_revenue: income.cost_of_revenue,
        gross_profit: income.gross_profit,
        gross_profit_ratio: income.gross_profit_ratio,
        operating_expenses: income.operating_expenses,
        operating_income: income.operating_income,
        operating_income_ratio: income.operating_income_ratio,
        net_income: income.net_income,
        net_income_ratio: income.net_income_ratio,
        ebitda: income.ebitda,
        eps: income.eps,
        eps_diluted: income.eps_diluted,
        weighted_average_shs_out: income.weighted_average_shs_out,
        total_assets: balance.total_assets,
        total_current_assets: balance.total_current_assets,
        cash_and_equivalents: balance.cash_and_cash_equivalents,
        total_liabilities: balance.total_liabilities,
        total_current_liabilities: balance.total_current_liabilities,
        total_debt: balance.total_debt,
        stockholders_equity: balance.total_stockholders_equity,
        operating_cash_flow: cash.operating_cash_flow,
        capital_expenditure: cash.capital_expenditure,
        free_cash_flow: cash.free_cash_flow,
        dividends_paid: cash.dividends_paid,
    }
}

/// Reconciles the three statement sequences for one symbol.
///
/// 1. Any empty input yields [`MergeOutcome::Incomplete`].
/// 2. Deny-listed symbols yield [`MergeOutcome::Excluded`] regardless of
///    data quality.
/// 3. Inner join on the seven-field [`StatementKey`](fmpkit_core::StatementKey).
/// 4. Sort by `(disclosure_date, accepted_at)` ascending, then dedupe by
///    disclosure date keeping the first occurrence: when multiple filings
///    share a filing date, the earliest accepted disclosure wins.
/// 5. Symbols on the drop-first list lose their earliest row, a known
///    vendor artifact.
/// 6. For quarterly data, any gap between consecutive period ends above
///    [`MAX_QUARTER_GAP_DAYS`] yields [`MergeOutcome::AnomalousContinuity`]
///    and no records at all.
///
/// Missing numeric fields stay `None`; use
/// [`MergedFinancialRecord::zero_filled`] at the presentation boundary.
pub fn merge_statements(
    income: &[IncomeStatement],
    balance: &[BalanceSheet],
    cash: &[CashFlowStatement],
    period: Period,
    overrides: &SymbolOverrides,
) -> MergeOutcome {
    if income.is_empty() || balance.is_empty() || cash.is_empty() {
        let symbol = income
            .first()
            .map(|r| r.symbol.as_str())
            .or_else(|| balance.first().map(|r| r.symbol.as_str()))
            .or_else(|| cash.first().map(|r| r.symbol.as_str()))
            .unwrap_or("?");
        warn!(symbol, stage = "merge", "statement data is incomplete");
        return MergeOutcome::Incomplete;
    }

    let symbol = income[0].symbol.clone();
    if overrides.is_excluded(&symbol) {
        warn!(symbol, stage = "merge", "symbol is on the deny list");
        return MergeOutcome::Excluded;
    }

    let balance_by_key: HashMap<_, _> = balance.iter().map(|b| (b.key(), b)).collect();
    let cash_by_key: HashMap<_, _> = cash.iter().map(|c| (c.key(), c)).collect();

    let mut records: Vec<MergedFinancialRecord> = income
        .iter()
        .filter_map(|i| {
            let key = i.key();
            let b = balance_by_key.get(&key)?;
            let c = cash_by_key.get(&key)?;
            Some(join_rows(i, b, c))
        })
        .collect();

    if records.is_empty() {
        warn!(symbol, stage = "merge", "no period shared by all three statements");
        return MergeOutcome::Incomplete;
    }

    records.sort_by(|a, b| {
        (a.disclosure_date, a.accepted_at.as_str())
            .cmp(&(b.disclosure_date, b.accepted_at.as_str()))
    });
    records.dedup_by_key(|r| r.disclosure_date);

    if overrides.drops_first_row(&symbol) && !records.is_empty() {
        records.remove(0);
    }

    if period == Period::Quarter {
        for pair in records.windows(2) {
            let gap_days = (pair[1].fiscal_period_end - pair[0].fiscal_period_end).num_days();
            if gap_days > MAX_QUARTER_GAP_DAYS {
                warn!(
                    symbol,
                    stage = "merge",
                    gap_days,
                    "abnormal reporting period, incomplete data"
                );
                return MergeOutcome::AnomalousContinuity { gap_days };
            }
        }
    }

    MergeOutcome::Merged(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn income(symbol: &str, period_end: NaiveDate, filed: NaiveDate) -> IncomeStatement {
        IncomeStatement {
            date: period_end,
            symbol: symbol.to_string(),
            reported_currency: "USD".to_string(),
            cik: Some("123".to_string()),
            filling_date: filed,
            accepted_date: format!("{filed} 17:00:00"),
            calendar_year: period_end.format("%Y").to_string(),
            period: format!("Q{}", (period_end.month0() / 3) + 1),
            revenue: Some(1000.0),
            gross_profit_ratio: Some(0.4),
            operating_income: Some(200.0),
            operating_income_ratio: Some(0.2),
            net_income: Some(150.0),
            eps_diluted: Some(1.5),
            ..Default::default()
        }
    }

    fn balance(symbol: &str, period_end: NaiveDate, filed: NaiveDate) -> BalanceSheet {
        BalanceSheet {
            date: period_end,
            symbol: symbol.to_string(),
            reported_currency: "USD".to_string(),
            cik: Some("123".to_string()),
            filling_date: filed,
            accepted_date: format!("{filed} 17:00:00"),
            calendar_year: period_end.format("%Y").to_string(),
            period: format!("Q{}", (period_end.month0() / 3) + 1),
            total_assets: Some(5000.0),
            total_debt: Some(1000.0),
            ..Default::default()
        }
    }

    fn cash(symbol: &str, period_end: NaiveDate, filed: NaiveDate) -> CashFlowStatement {
        CashFlowStatement {
            date: period_end,
            symbol: symbol.to_string(),
            reported_currency: "USD".to_string(),
            cik: Some("123".to_string()),
            filling_date: filed,
            accepted_date: format!("{filed} 17:00:00"),
            calendar_year: period_end.format("%Y").to_string(),
            period: format!("Q{}", (period_end.month0() / 3) + 1),
            operating_cash_flow: Some(300.0),
            capital_expenditure: Some(-50.0),
            free_cash_flow: Some(250.0),
            ..Default::default()
        }
    }

    /// Quarterly period ends with the matching filings about five weeks out.
    fn quarterly_fixture(symbol: &str, quarters: &[(i32, u32, u32)]) -> (
        Vec<IncomeStatement>,
        Vec<BalanceSheet>,
        Vec<CashFlowStatement>,
    ) {
        let mut i = Vec::new();
        let mut b = Vec::new();
        let mut c = Vec::new();
        for &(y, m, day) in quarters {
            let end = d(y, m, day);
            let filed = end + chrono::Duration::days(35);
            i.push(income(symbol, end, filed));
            b.push(balance(symbol, end, filed));
            c.push(cash(symbol, end, filed));
        }
        (i, b, c)
    }

    #[test]
    fn test_round_trip_single_period() {
        let inc = vec![income("TEST", d(2023, 3, 31), d(2023, 5, 1))];
        let bal = vec![balance("TEST", d(2023, 3, 31), d(2023, 5, 1))];
        let csh = vec![cash("TEST", d(2023, 3, 31), d(2023, 5, 1))];

        let outcome = merge_statements(&inc, &bal, &csh, Period::Quarter, &SymbolOverrides::none());
        let records = outcome.records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fiscal_period_end, d(2023, 3, 31));
        assert_eq!(records[0].disclosure_date, d(2023, 5, 1));
        assert_eq!(records[0].revenue, Some(1000.0));
        assert_eq!(records[0].total_assets, Some(5000.0));
        assert_eq!(records[0].operating_cash_flow, Some(300.0));
    }

    #[test]
    fn test_empty_input_is_incomplete() {
        let inc = vec![income("TEST", d(2023, 3, 31), d(2023, 5, 1))];
        let bal = vec![balance("TEST", d(2023, 3, 31), d(2023, 5, 1))];

        let outcome = merge_statements(&inc, &bal, &[], Period::Quarter, &SymbolOverrides::none());
        assert_eq!(outcome, MergeOutcome::Incomplete);
    }

    #[test]
    fn test_disjoint_keys_never_yield_partial_rows() {
        let inc = vec![income("TEST", d(2023, 3, 31), d(2023, 5, 1))];
        let bal = vec![balance("TEST", d(2023, 6, 30), d(2023, 8, 1))];
        let csh = vec![cash("TEST", d(2023, 9, 30), d(2023, 11, 1))];

        let outcome = merge_statements(&inc, &bal, &csh, Period::Quarter, &SymbolOverrides::none());
        assert_eq!(outcome, MergeOutcome::Incomplete);
    }

    #[test]
    fn test_key_mismatch_on_currency_drops_the_period() {
        let inc = vec![income("TEST", d(2023, 3, 31), d(2023, 5, 1))];
        let mut bal = vec![balance("TEST", d(2023, 3, 31), d(2023, 5, 1))];
        bal[0].reported_currency = "EUR".to_string();
        let csh = vec![cash("TEST", d(2023, 3, 31), d(2023, 5, 1))];

        let outcome = merge_statements(&inc, &bal, &csh, Period::Quarter, &SymbolOverrides::none());
        assert_eq!(outcome, MergeOutcome::Incomplete);
    }

    #[test]
    fn test_merge_completeness_zero_fill() {
        let (i, b, c) = quarterly_fixture(
            "TEST",
            &[(2023, 3, 31), (2023, 6, 30), (2023, 9, 30), (2023, 12, 30)],
        );
        let outcome = merge_statements(&i, &b, &c, Period::Quarter, &SymbolOverrides::none());
        let records = outcome.records().unwrap();
        assert_eq!(records.len(), 4);
        for record in records {
            let filled = record.zero_filled();
            assert!(filled.revenue.is_some());
            assert!(filled.ebitda.is_some());
            assert!(filled.dividends_paid.is_some());
        }
    }

    #[test]
    fn test_continuity_gap_rejected() {
        // A missing quarter: ~200-day gap between consecutive period ends.
        let (i, b, c) = quarterly_fixture(
            "TEST",
            &[(2023, 3, 31), (2023, 6, 30), (2024, 1, 15)],
        );
        let outcome = merge_statements(&i, &b, &c, Period::Quarter, &SymbolOverrides::none());
        match outcome {
            MergeOutcome::AnomalousContinuity { gap_days } => assert!(gap_days > 150),
            other => panic!("expected AnomalousContinuity, got {other:?}"),
        }
    }

    #[test]
    fn test_annual_cadence_skips_the_quarterly_gate() {
        let (i, b, c) = quarterly_fixture("TEST", &[(2022, 12, 31), (2023, 12, 31)]);
        let outcome = merge_statements(&i, &b, &c, Period::Annual, &SymbolOverrides::none());
        assert!(outcome.is_merged());
    }

    #[test]
    fn test_shared_filing_date_keeps_earliest_accepted() {
        let mut inc = vec![
            income("TEST", d(2023, 3, 31), d(2023, 5, 1)),
            income("TEST", d(2023, 4, 1), d(2023, 5, 1)),
        ];
        inc[0].accepted_date = "2023-05-01 09:00:00".to_string();
        inc[0].revenue = Some(111.0);
        inc[1].accepted_date = "2023-05-01 18:00:00".to_string();
        inc[1].revenue = Some(222.0);
        let bal = vec![
            {
                let mut b = balance("TEST", d(2023, 3, 31), d(2023, 5, 1));
                b.accepted_date = inc[0].accepted_date.clone();
                b
            },
            {
                let mut b = balance("TEST", d(2023, 4, 1), d(2023, 5, 1));
                b.period = inc[1].period.clone();
                b.accepted_date = inc[1].accepted_date.clone();
                b
            },
        ];
        let csh = vec![
            {
                let mut c = cash("TEST", d(2023, 3, 31), d(2023, 5, 1));
                c.accepted_date = inc[0].accepted_date.clone();
                c
            },
            {
                let mut c = cash("TEST", d(2023, 4, 1), d(2023, 5, 1));
                c.period = inc[1].period.clone();
                c.accepted_date = inc[1].accepted_date.clone();
                c
            },
        ];

        let outcome = merge_statements(&inc, &bal, &csh, Period::Quarter, &SymbolOverrides::none());
        let records = outcome.records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].revenue, Some(111.0));
    }

    #[test]
    fn test_drop_first_override() {
        let (i, b, c) = quarterly_fixture(
            "MRNA",
            &[(2023, 3, 31), (2023, 6, 30), (2023, 9, 30)],
        );
        let outcome = merge_statements(&i, &b, &c, Period::Quarter, &SymbolOverrides::default());
        let records = outcome.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fiscal_period_end, d(2023, 6, 30));
    }

    #[test]
    fn test_deny_listed_symbol_excluded() {
        let (i, b, c) = quarterly_fixture("CSC", &[(2023, 3, 31), (2023, 6, 30)]);
        let outcome = merge_statements(&i, &b, &c, Period::Quarter, &SymbolOverrides::default());
        assert_eq!(outcome, MergeOutcome::Excluded);
    }
}
