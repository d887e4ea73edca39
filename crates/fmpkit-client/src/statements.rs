//! Financial statement endpoints.
//!
//! One fixed endpoint per statement type. An empty vendor array is returned
//! as an empty `Vec` - an absence signal for the caller, never an error.

use async_trait::async_trait;
use fmpkit_core::{
    BalanceSheet, CashFlowStatement, FundamentalSource, IncomeStatement, Period, Result,
    StatementKind, Symbol,
};

use crate::FmpClient;

impl FmpClient {
    fn statement_params(period: Period, limit: usize) -> Vec<(&'static str, String)> {
        vec![
            ("period", period.as_str().to_string()),
            ("limit", limit.to_string()),
        ]
    }

    /// Fetches income statements, most recent first.
    pub async fn income_statements(
        &self,
        symbol: &Symbol,
        period: Period,
        limit: usize,
    ) -> Result<Vec<IncomeStatement>> {
        let endpoint = format!("{}/{}", StatementKind::Income.endpoint(), symbol.as_str());
        self.get(&endpoint, &Self::statement_params(period, limit))
            .await
    }

    /// Fetches balance sheets, most recent first.
    pub async fn balance_sheets(
        &self,
        symbol: &Symbol,
        period: Period,
        limit: usize,
    ) -> Result<Vec<BalanceSheet>> {
        let endpoint = format!("{}/{}", StatementKind::Balance.endpoint(), symbol.as_str());
        self.get(&endpoint, &Self::statement_params(period, limit))
            .await
    }

    /// Fetches cash-flow statements, most recent first.
    pub async fn cash_flow_statements(
        &self,
        symbol: &Symbol,
        period: Period,
        limit: usize,
    ) -> Result<Vec<CashFlowStatement>> {
        let endpoint = format!("{}/{}", StatementKind::Cash.endpoint(), symbol.as_str());
        self.get(&endpoint, &Self::statement_params(period, limit))
            .await
    }

    /// Fetches one statement type as the raw JSON the vendor returned,
    /// including fields the typed rows drop.
    pub async fn statements_raw(
        &self,
        symbol: &Symbol,
        kind: StatementKind,
        period: Period,
        limit: usize,
    ) -> Result<serde_json::Value> {
        let endpoint = format!("{}/{}", kind.endpoint(), symbol.as_str());
        self.get(&endpoint, &Self::statement_params(period, limit))
            .await
    }
}

#[async_trait]
impl FundamentalSource for FmpClient {
    async fn income_statements(
        &self,
        symbol: &Symbol,
        period: Period,
        limit: usize,
    ) -> Result<Vec<IncomeStatement>> {
        Self::income_statements(self, symbol, period, limit).await
    }

    async fn balance_sheets(
        &self,
        symbol: &Symbol,
        period: Period,
        limit: usize,
    ) -> Result<Vec<BalanceSheet>> {
        Self::balance_sheets(self, symbol, period, limit).await
    }

    async fn cash_flow_statements(
        &self,
        symbol: &Symbol,
        period: Period,
        limit: usize,
    ) -> Result<Vec<CashFlowStatement>> {
        Self::cash_flow_statements(self, symbol, period, limit).await
    }
}
