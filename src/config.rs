// src/config.rs
// =============================================================================
// Run configuration.
//
// Everything the crawl core needs to know before it starts: where to begin,
// how deep to go, how long to run and how many results/errors to tolerate.
// The CLI (src/cli.rs) fills this in; tests build it directly.
//
// Defaults:
// - depth 3, timeout 10s
// - 100000 errors / 10000 results before the run stops
// - each depth-raise trigger adds 2 levels
// - 2s throttle before every visit
// =============================================================================

use std::time::Duration;

use url::Url;

use crate::error::CrawlError;

pub const DEFAULT_MAX_DEPTH: usize = 3;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_ERROR_BUDGET: usize = 100_000;
pub const DEFAULT_RESULT_BUDGET: usize = 10_000;
pub const DEFAULT_DEPTH_STEP: usize = 2;
pub const DEFAULT_THROTTLE: Duration = Duration::from_secs(2);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Address the root crawl task starts from
    pub seed: String,
    /// Initial depth ceiling (the seed is depth 0)
    pub max_depth: usize,
    /// Whole-run timeout
    pub timeout: Duration,
    /// Failures tolerated before the run stops
    pub error_budget: usize,
    /// Successes collected before the run stops
    pub result_budget: usize,
    /// How much each depth-raise trigger adds to the ceiling
    pub depth_step: usize,
    /// Delay every crawl task waits before doing any work
    pub throttle: Duration,
    /// Per-request timeout for the HTTP fetcher
    pub request_timeout: Duration,
    /// Optional cap on concurrent fetches (None = unbounded fan-out)
    pub max_in_flight: Option<usize>,
    /// Only follow links on the seed's domain
    pub same_domain: bool,
}

impl CrawlConfig {
    /// Config with every knob at its default, starting from `seed`.
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            max_depth: DEFAULT_MAX_DEPTH,
            timeout: DEFAULT_TIMEOUT,
            error_budget: DEFAULT_ERROR_BUDGET,
            result_budget: DEFAULT_RESULT_BUDGET,
            depth_step: DEFAULT_DEPTH_STEP,
            throttle: DEFAULT_THROTTLE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_in_flight: None,
            same_domain: false,
        }
    }

    /// Checks the config before any work starts.
    ///
    /// The seed must parse as an http(s) URL; budgets, the timeout and the
    /// in-flight cap (when set) must be non-zero.
    pub fn validate(&self) -> Result<(), CrawlError> {
        let seed = Url::parse(&self.seed).map_err(|source| CrawlError::InvalidSeed {
            seed: self.seed.clone(),
            source,
        })?;

        if seed.scheme() != "http" && seed.scheme() != "https" {
            return Err(CrawlError::config(format!(
                "seed must be an http or https URL, got scheme '{}'",
                seed.scheme()
            )));
        }
        if self.same_domain && seed.domain().is_none() {
            return Err(CrawlError::config(
                "--same-domain needs a seed URL with a domain name",
            ));
        }
        if self.timeout.is_zero() {
            return Err(CrawlError::config("timeout must be greater than zero"));
        }
        if self.error_budget == 0 {
            return Err(CrawlError::config("error budget must be at least 1"));
        }
        if self.result_budget == 0 {
            return Err(CrawlError::config("result budget must be at least 1"));
        }
        if self.max_in_flight == Some(0) {
            return Err(CrawlError::config("max in-flight must be at least 1"));
        }

        Ok(())
    }

    /// Domain of the seed, used for the same-domain restriction.
    pub fn seed_domain(&self) -> Option<String> {
        Url::parse(&self.seed)
            .ok()
            .and_then(|url| url.domain().map(str::to_string))
    }
}
