//! Depth-bounded concurrent link crawler.
//!
//! Starting from a seed URL, every newly discovered page gets its own tokio
//! task. Tasks share a visited registry (so no page is claimed twice) and a
//! depth ceiling that can be raised while the crawl runs. Each visit sends a
//! success or failure outcome to a single aggregator, which stops the run when
//! the error or result budget runs out. A timeout or an external interrupt
//! stops it too.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use deepcrawl::{config::CrawlConfig, fetch::HttpFetcher, run::run_crawl, signals::Triggers};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = CrawlConfig::new("https://example.com");
//!     let fetcher = Arc::new(HttpFetcher::new(config.request_timeout, None)?);
//!     let (triggers, _handles) = Triggers::manual();
//!     let report = run_crawl(&config, fetcher, triggers, Box::new(|o| println!("{o}"))).await?;
//!     println!("{} pages in {:?}", report.successes, report.elapsed);
//!     Ok(())
//! }
//! ```
pub mod config;
pub mod crawl;
pub mod error;
pub mod fetch;
pub mod run;
pub mod signals;
