//! Revenue segmentation endpoint (v4 API).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use fmpkit_core::{Period, Result, SegmentRevenue, SegmentStructure, Symbol};

use crate::FmpClient;

impl FmpClient {
    /// Fetches revenue broken down by product line or geography, most recent
    /// first, truncated to `limit` even when the vendor returns more.
    pub async fn revenue_segments(
        &self,
        symbol: &Symbol,
        structure: SegmentStructure,
        period: Period,
        limit: usize,
    ) -> Result<Vec<SegmentRevenue>> {
        let params = [
            ("symbol", symbol.as_str().to_string()),
            ("structure", "flat".to_string()),
            ("period", period.as_str().to_string()),
            ("limit", limit.to_string()),
        ];

        // Each entry is a single-key object: {"2023-09-30": {"iPhone": ...}}.
        let raw: Vec<BTreeMap<String, BTreeMap<String, serde_json::Value>>> =
            self.get_v4(structure.endpoint(), &params).await?;

        let mut rows: Vec<SegmentRevenue> = raw
            .into_iter()
            .flatten()
            .filter_map(|(date_str, segments)| {
                let date = date_str.parse::<NaiveDate>().ok()?;
                let segments = segments
                    .into_iter()
                    .filter_map(|(name, value)| Some((name, value.as_f64()?)))
                    .collect();
                Some(SegmentRevenue { date, segments })
            })
            .collect();

        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows.truncate(limit);
        Ok(rows)
    }
}
