// src/fetch/http.rs
// =============================================================================
// The real Fetcher: GET a page over HTTP(S) with reqwest and parse it.
//
// - One shared Client for the whole run (connection pooling)
// - Per-request timeout, redirects followed up to a limit
// - Any non-2xx status counts as a failed fetch
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::{html, Fetcher, Page};
use crate::error::{CrawlError, FetchError};

const USER_AGENT: &str = concat!("deepcrawl/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    // When set, only links on this domain are returned
    domain: Option<String>,
}

impl HttpFetcher {
    pub fn new(request_timeout: Duration, domain: Option<String>) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(request_timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client, domain })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, address: &str) -> Result<Page, FetchError> {
        let url = Url::parse(address).map_err(|source| FetchError::InvalidAddress {
            address: address.to_string(),
            source,
        })?;

        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        // Relative links resolve against where we ended up after redirects
        let final_url = response.url().clone();
        let body = response.text().await?;

        Ok(html::parse_page(&body, &final_url, self.domain.as_deref()))
    }
}
