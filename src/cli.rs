// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the Cli struct below *is* the CLI definition.
// Every field becomes a flag (or a positional argument), and the doc
// comments become the --help text.
//
// Defaults match CrawlConfig::new() in src/config.rs.
// =============================================================================

use std::time::Duration;

use clap::Parser;

use deepcrawl::config::{
    CrawlConfig, DEFAULT_DEPTH_STEP, DEFAULT_ERROR_BUDGET, DEFAULT_MAX_DEPTH,
    DEFAULT_RESULT_BUDGET,
};

#[derive(Parser, Debug)]
#[command(
    name = "deepcrawl",
    version,
    about = "Crawl a site concurrently, following links up to a depth limit",
    long_about = "deepcrawl starts at a URL, follows every link it finds (one task per new page) \
                  up to a depth limit, and prints each page's title as it goes. \
                  The run stops on timeout, Ctrl-C, or when the error/result budget runs out. \
                  Send SIGUSR1 while it runs to let it go deeper."
)]
pub struct Cli {
    /// URL to start crawling from
    pub url: String,

    /// Maximum crawl depth (the start page is depth 0)
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub depth: usize,

    /// Stop the whole run after this many seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Stop after this many failed pages
    #[arg(long, default_value_t = DEFAULT_ERROR_BUDGET)]
    pub max_errors: usize,

    /// Stop after this many crawled pages
    #[arg(long, default_value_t = DEFAULT_RESULT_BUDGET)]
    pub max_results: usize,

    /// How many levels each SIGUSR1 adds to the depth limit
    #[arg(long, default_value_t = DEFAULT_DEPTH_STEP)]
    pub depth_step: usize,

    /// Delay before each page visit, in milliseconds
    #[arg(long, default_value_t = 2000)]
    pub throttle_ms: u64,

    /// Timeout for a single page request, in seconds
    #[arg(long, default_value_t = 10)]
    pub request_timeout: u64,

    /// Cap on concurrent page fetches (unbounded when omitted)
    #[arg(long)]
    pub max_in_flight: Option<usize>,

    /// Only follow links on the start URL's domain
    #[arg(long)]
    pub same_domain: bool,

    /// Print each result as a JSON line instead of "url -> title"
    #[arg(long)]
    pub json: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn to_config(&self) -> CrawlConfig {
        CrawlConfig {
            max_depth: self.depth,
            timeout: Duration::from_secs(self.timeout),
            error_budget: self.max_errors,
            result_budget: self.max_results,
            depth_step: self.depth_step,
            throttle: Duration::from_millis(self.throttle_ms),
            request_timeout: Duration::from_secs(self.request_timeout),
            max_in_flight: self.max_in_flight,
            same_domain: self.same_domain,
            ..CrawlConfig::new(self.url.clone())
        }
    }
}
