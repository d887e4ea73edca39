//! Alignment of earnings releases against the daily price series.
//!
//! Both series are outer-joined on date into one calendar, trailing EPS is
//! filled across the gaps, and only dates with an actual closing price
//! survive to the output.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use fmpkit_core::{EarningsEvent, EpsPricePoint, FiscalReaction, PriceBar};

/// Window length for the trailing EPS sum: four quarterly releases.
const TTM_WINDOW: usize = 4;

/// Rounding applied to EPS and price fields before any ratio is computed,
/// so the published P/E is reproducible from the published inputs.
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[derive(Clone, Copy, Debug, Default)]
struct CalendarCell {
    eps: Option<f64>,
    eps_ttm: Option<f64>,
    forward: Option<bool>,
    close: Option<f64>,
}

/// Fills gaps in a column by carrying the nearest known value over `None`s.
fn fill_gaps<'a, T, I>(column: I)
where
    T: Copy + 'a,
    I: Iterator<Item = &'a mut Option<T>>,
{
    let mut carried: Option<T> = None;
    for slot in column {
        match *slot {
            Some(v) => carried = Some(v),
            None => *slot = carried,
        }
    }
}

/// Back-fills then forward-fills the trailing EPS column over the calendar.
fn fill_eps_ttm(cells: &mut BTreeMap<NaiveDate, CalendarCell>) {
    fill_gaps(cells.values_mut().rev().map(|c| &mut c.eps_ttm));
    fill_gaps(cells.values_mut().map(|c| &mut c.eps_ttm));
}

/// Back-fills the forward flag so that every date before a release carries
/// that release's flag. Unlike EPS the flag is never carried forward: dates
/// after the last known release stay unmarked.
fn bfill_forward_flag(cells: &mut BTreeMap<NaiveDate, CalendarCell>) {
    fill_gaps(cells.values_mut().rev().map(|c| &mut c.forward));
}

/// Joins earnings releases with daily bars into a per-day EPS and P/E
/// series.
///
/// Releases missing an actual EPS fall back to the estimate and are flagged
/// as forward-looking. Trailing EPS is the sum of each release's four most
/// recent values, defined only when the whole window is known. The trailing
/// series is back-filled then forward-filled over the daily calendar; the
/// forward flag is back-filled only. EPS and close are rounded to two
/// decimals before the ratio; a non-positive trailing EPS publishes a P/E
/// of exactly zero. Dates with no closing price are dropped.
#[must_use]
pub fn eps_price_series(events: &[EarningsEvent], bars: &[PriceBar]) -> Vec<EpsPricePoint> {
    let mut releases: Vec<&EarningsEvent> = events.iter().collect();
    releases.sort_by_key(|e| e.date);

    let mut cells: BTreeMap<NaiveDate, CalendarCell> = BTreeMap::new();

    let eps_values: Vec<Option<f64>> = releases
        .iter()
        .map(|e| e.eps.or(e.eps_estimated))
        .collect();
    for (idx, event) in releases.iter().enumerate() {
        let eps = eps_values[idx];
        let eps_ttm = if idx + 1 >= TTM_WINDOW {
            eps_values[idx + 1 - TTM_WINDOW..=idx]
                .iter()
                .copied()
                .sum::<Option<f64>>()
        } else {
            None
        };
        let cell = cells.entry(event.date).or_default();
        cell.eps = eps;
        cell.eps_ttm = eps_ttm;
        cell.forward = Some(event.eps.is_none());
    }

    for bar in bars {
        cells.entry(bar.date).or_default().close = Some(bar.close);
    }

    fill_eps_ttm(&mut cells);
    bfill_forward_flag(&mut cells);

    cells
        .into_iter()
        .filter_map(|(date, cell)| {
            let close = round2(cell.close?);
            let eps_ttm = cell.eps_ttm.map(round2);
            let pe = match eps_ttm {
                Some(ttm) if ttm > 0.0 => close / ttm,
                _ => 0.0,
            };
            Some(EpsPricePoint {
                date,
                eps_ttm,
                pe,
                close,
                eps: cell.eps.map(round2),
                forward: cell.forward,
            })
        })
        .collect()
}

/// Joins fiscal releases with the price series and computes the day-over-day
/// close change around each release.
///
/// Closes are forward-filled so a release on a non-trading day carries the
/// prior session's close, dates after `as_of` are discarded, and only the
/// release dates themselves are returned.
#[must_use]
pub fn fiscal_reactions(
    events: &[EarningsEvent],
    bars: &[PriceBar],
    as_of: NaiveDate,
) -> Vec<FiscalReaction> {
    #[derive(Clone, Copy, Default)]
    struct Cell {
        close: Option<f64>,
        event: Option<usize>,
    }

    let mut cells: BTreeMap<NaiveDate, Cell> = BTreeMap::new();
    for (idx, event) in events.iter().enumerate() {
        cells.entry(event.date).or_default().event = Some(idx);
    }
    for bar in bars {
        cells.entry(bar.date).or_default().close = Some(bar.close);
    }

    cells.retain(|date, _| *date <= as_of);

    let mut prev_close: Option<f64> = None;
    let mut out = Vec::new();
    for (date, cell) in &mut cells {
        let before = prev_close;
        if cell.close.is_none() {
            cell.close = prev_close;
        }
        if let Some(close) = cell.close {
            prev_close = Some(close);
        }
        if let Some(idx) = cell.event {
            let event = &events[idx];
            if event.is_fiscal {
                let change = match (before, cell.close) {
                    (Some(p), Some(c)) if p != 0.0 => Some((c - p) / p),
                    _ => None,
                };
                out.push(FiscalReaction {
                    date: *date,
                    close: cell.close,
                    eps: event.eps,
                    eps_estimated: event.eps_estimated,
                    change,
                });
            }
        }
    }
    out
}
