#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/fmpkit/fmpkit/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Financial Modeling Prep HTTP client.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fmpkit_client::FmpClient;
//! use fmpkit_core::{Period, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> fmpkit_core::Result<()> {
//!     let client = FmpClient::from_env()?;
//!     let symbol = Symbol::new("AAPL");
//!
//!     let income = client.income_statements(&symbol, Period::Quarter, 8).await?;
//!     let prices = client.daily_prices(&symbol, 2).await?;
//!
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::time::Duration;

use fmpkit_core::{FmpError, Result};
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::{debug, warn};

mod calendar;
mod market;
mod segments;
mod statements;

/// Base URL for the v3 API.
const FMP_BASE_URL: &str = "https://financialmodelingprep.com/api/v3";

/// Base URL for the v4 API (revenue segmentation lives here).
const FMP_V4_BASE_URL: &str = "https://financialmodelingprep.com/api/v4";

/// Environment variable holding the API key for [`FmpClient::from_env`].
const API_KEY_ENV: &str = "FMP_API_KEY";

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Bounded fixed-delay retry policy for transient failures.
///
/// Retries are invisible to callers except as added latency; the final
/// failure propagates unchanged.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first.
    pub attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_millis(100),
        }
    }
}

/// Financial Modeling Prep API client.
///
/// Covers the statement, quote, price-history, search, roster, earnings
/// calendar, and segment revenue endpoints. All methods are `async` and
/// independent; nothing is cached between calls.
#[derive(Clone)]
pub struct FmpClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    v4_base_url: String,
    retry: RetryPolicy,
}

impl fmt::Debug for FmpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FmpClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .finish()
    }
}

impl FmpClient {
    /// Creates a new client with the given API key and default settings.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            api_key: api_key.into(),
            base_url: FMP_BASE_URL.to_string(),
            v4_base_url: FMP_V4_BASE_URL.to_string(),
            retry: RetryPolicy::default(),
        }
    }

    /// Creates a client reading the API key from the `FMP_API_KEY`
    /// environment variable.
    pub fn from_env() -> Result<Self> {
        let key = std::env::var(API_KEY_ENV)
            .map_err(|_| FmpError::InvalidParameter(format!("{API_KEY_ENV} is not set")))?;
        if key.is_empty() {
            return Err(FmpError::InvalidParameter(format!("{API_KEY_ENV} is empty")));
        }
        Ok(Self::new(key))
    }

    /// Creates a client with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: FMP_BASE_URL.to_string(),
            v4_base_url: FMP_V4_BASE_URL.to_string(),
            retry: RetryPolicy::default(),
        }
    }

    /// Overrides both API base URLs (used for tests against a local server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base = base_url.into();
        let base = base.trim_end_matches('/').to_string();
        self.base_url.clone_from(&base);
        self.v4_base_url = base;
        self
    }

    /// Overrides the per-request timeout by rebuilding the HTTP client.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");
        self
    }

    /// Overrides the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Issues a GET against the v3 API and decodes the JSON response.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let base = self.base_url.clone();
        self.get_from(&base, endpoint, params).await
    }

    /// Issues a GET against the v4 API and decodes the JSON response.
    pub(crate) async fn get_v4<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let base = self.v4_base_url.clone();
        self.get_from(&base, endpoint, params).await
    }

    async fn get_from<T: DeserializeOwned>(
        &self,
        base: &str,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let mut attempt = 0;
        let text = loop {
            attempt += 1;
            match self.fetch_text(base, endpoint, params).await {
                Ok(text) => break text,
                Err(e) if attempt < self.retry.attempts && is_transient(&e) => {
                    warn!(endpoint, attempt, error = %e, "transient FMP failure, retrying");
                    sleep(self.retry.delay).await;
                }
                Err(e) => return Err(e),
            }
        };

        // The vendor reports some failures inside a 200 body.
        if text.contains("\"Error Message\"") {
            return Err(FmpError::Api {
                status: 200,
                body: text,
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| FmpError::MalformedResponse(format!("{endpoint}: {e}")))
    }

    async fn fetch_text(
        &self,
        base: &str,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<String> {
        debug!(endpoint, "FMP request");
        let url = format!("{base}/{endpoint}");
        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| FmpError::Connectivity(e.to_string()))?;

        let status = response.status();
        match status.as_u16() {
            200..=299 => response
                .text()
                .await
                .map_err(|e| FmpError::Connectivity(e.to_string())),
            401 => Err(FmpError::Authentication(format!(
                "API key rejected for {endpoint}"
            ))),
            404 => Err(FmpError::NotFound(format!("resource absent: {endpoint}"))),
            429 => Err(FmpError::RateLimited {
                retry_after: retry_after_hint(&response),
            }),
            code => {
                let body = response.text().await.unwrap_or_default();
                Err(FmpError::Api { status: code, body })
            }
        }
    }
}

/// Reads the `Retry-After` header as a duration, when the vendor sends one.
fn retry_after_hint(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Whether an error is worth retrying: connection-level failures and vendor
/// 5xx responses. Auth, not-found, and rate-limit outcomes propagate
/// immediately.
fn is_transient(error: &FmpError) -> bool {
    match error {
        FmpError::Connectivity(_) => true,
        FmpError::Api { status, .. } => *status >= 500,
        _ => false,
    }
}
