#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/fmpkit/fmpkit/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// The high-level facade.
pub mod facade;

pub use facade::Fmp;

pub use fmpkit_client::{FmpClient, RetryPolicy};
pub use fmpkit_core::{
    table, BalanceSheet, CashFlowStatement, EarningsEvent, EarningsSource, EpsPricePoint,
    FiscalReaction, FmpError, FundamentalSource, IncomeStatement, ListedStock,
    MergedFinancialRecord, Period, PerformanceRecord, PriceBar, PriceSource, Quote, QuoteShort,
    RawEarningsEvent, ReleaseTime, Result, SearchResult, SegmentRevenue, SegmentStructure,
    StatementKey, StatementKind, Symbol,
};
pub use fmpkit_pipeline::{MergeOutcome, SymbolOverrides};

/// The pure pipeline stages, usable without an HTTP client.
pub use fmpkit_pipeline as pipeline;
