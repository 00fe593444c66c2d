// src/fetch/mod.rs
// =============================================================================
// The fetch-and-extract capability.
//
// The crawl core only knows the Fetcher trait: give it an address, get back
// the page title and the links found on it, or a FetchError. It assumes
// nothing about ordering, caching or retries.
//
// Submodules:
// - http: reqwest-backed implementation used by the binary
// - html: title and link extraction with scraper
// =============================================================================

mod html;
mod http;

#[cfg(test)]
pub mod fake;

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::FetchError;

pub use http::HttpFetcher;

/// What a successful fetch yields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub links: HashSet<String>,
}

/// Resolves one address to a Page.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, address: &str) -> Result<Page, FetchError>;
}
