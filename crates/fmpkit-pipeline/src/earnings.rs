//! Earnings calendar normalization.
//!
//! The vendor stamps each release with the announcement date, but an
//! after-market-close announcement only moves the price on the following
//! session. Shifting those releases forward one day lets the series join
//! against daily bars without lookahead.

use chrono::{Duration, NaiveDate};

use fmpkit_core::{EarningsEvent, RawEarningsEvent, ReleaseTime};

/// The date a release becomes tradable: after-market-close announcements
/// shift to the next calendar day, everything else keeps its own date.
#[must_use]
pub fn adjusted_release_date(date: NaiveDate, time: ReleaseTime) -> NaiveDate {
    if time.is_after_close() {
        date + Duration::days(1)
    } else {
        date
    }
}

/// Normalizes raw calendar rows into [`EarningsEvent`]s: release dates are
/// adjusted per [`adjusted_release_date`], every entry is marked as a fiscal
/// release, and the result is ordered most recent first.
#[must_use]
pub fn normalize_earnings(raw: Vec<RawEarningsEvent>) -> Vec<EarningsEvent> {
    let mut events: Vec<EarningsEvent> = raw
        .into_iter()
        .map(|r| EarningsEvent {
            symbol: r.symbol,
            date: adjusted_release_date(r.date, r.time),
            time: r.time,
            eps: r.eps,
            eps_estimated: r.eps_estimated,
            is_fiscal: true,
        })
        .collect();
    events.sort_by(|a, b| b.date.cmp(&a.date));
    events
}
