// src/error.rs
// =============================================================================
// Error types for the crawler.
//
// Two layers:
// - FetchError: one address could not be fetched or parsed. Recoverable and
//   scoped to that address; it travels to the aggregator inside a Failure
//   outcome and never stops sibling tasks.
// - CrawlError: the run itself cannot start (bad configuration, bad seed,
//   HTTP client could not be built) or its aggregator died.
//
// main.rs still works with anyhow::Result at the very top, these typed
// errors convert into it through `?`.
// =============================================================================

use thiserror::Error;

/// Failure to fetch-and-extract a single address.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The address is not a valid absolute URL
    #[error("invalid address '{address}': {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: url::ParseError,
    },

    /// Network, TLS, timeout or body decoding failure
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered, but not with a 2xx status
    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),

    /// Anything else a Fetcher implementation wants to report
    #[error("{0}")]
    Other(String),
}

impl FetchError {
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

/// Errors that prevent a crawl run from starting.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid seed URL '{seed}': {source}")]
    InvalidSeed {
        seed: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("crawl worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl CrawlError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
