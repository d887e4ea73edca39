#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/fmpkit/fmpkit/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and traits for the FMP client library.
//!
//! This crate provides the foundational abstractions:
//!
//! - [`FmpError`](error::FmpError) - transport and contract error taxonomy
//! - [`Symbol`](types::Symbol), statement rows, and merged records
//! - [`FundamentalSource`](source::FundamentalSource),
//!   [`PriceSource`](source::PriceSource),
//!   [`EarningsSource`](source::EarningsSource) - seams the pipeline is
//!   written against
//! - [`table`] - polars conversions for tabular output

/// Error types for FMP operations.
pub mod error;
/// Reporting period and statement kind definitions.
pub mod period;
/// Source traits for fetching FMP data.
pub mod source;
/// Tabular (polars) conversions for typed rows.
pub mod table;
/// Core data types (Symbol, statement rows, merged records, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use error::{FmpError, Result};
pub use period::{Period, ReleaseTime, SegmentStructure, StatementKind};
pub use source::{EarningsSource, FundamentalSource, PriceSource};
pub use types::{
    BalanceSheet, CashFlowStatement, EarningsEvent, EpsPricePoint, FiscalReaction,
    IncomeStatement, ListedStock, MergedFinancialRecord, PerformanceRecord, PriceBar, Quote,
    QuoteShort, RawEarningsEvent, SearchResult, SegmentRevenue, StatementKey, Symbol,
};
