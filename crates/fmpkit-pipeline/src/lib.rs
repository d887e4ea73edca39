#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/fmpkit/fmpkit/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Reconciliation pipeline over FMP financial data.
//!
//! The stages are pure functions over typed rows; [`ops`] ties them to the
//! source traits from `fmpkit-core`:
//!
//! - [`merge`] - inner join of the three statements with data-quality gates
//! - [`earnings`] - release-date normalization for the earnings calendar
//! - [`align`] - daily EPS and P/E series, release-day price reactions
//! - [`performance`] - margins and fiscal-quarter-matched growth
//! - [`overrides`] - per-symbol data-quality adjustments

/// EPS/price alignment and release-day reactions.
pub mod align;
/// Earnings calendar normalization.
pub mod earnings;
/// Statement merger.
pub mod merge;
/// High-level operations against abstract sources.
pub mod ops;
/// Per-symbol data-quality overrides.
pub mod overrides;
/// Derived performance metrics.
pub mod performance;

// Re-export commonly used items at crate root
pub use align::{eps_price_series, fiscal_reactions};
pub use earnings::{adjusted_release_date, normalize_earnings};
pub use merge::{merge_statements, MergeOutcome, MAX_QUARTER_GAP_DAYS};
pub use overrides::SymbolOverrides;
pub use performance::derive_performance;
