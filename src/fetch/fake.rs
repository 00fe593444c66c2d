// src/fetch/fake.rs
// In-memory link graph for exercising the crawl core without a network.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{Fetcher, Page};
use crate::error::FetchError;

#[derive(Debug, Clone)]
enum Node {
    Page(Page),
    Fail(String),
    Hang,
}

#[derive(Debug, Default)]
pub struct FakeFetcher {
    nodes: HashMap<String, Node>,
    calls: Mutex<HashMap<String, usize>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// `address` has title `title` and links to each of `links`.
    pub fn page(mut self, address: &str, title: &str, links: &[&str]) -> Self {
        let page = Page {
            title: title.to_string(),
            links: links.iter().map(|link| link.to_string()).collect::<HashSet<_>>(),
        };
        self.nodes.insert(address.to_string(), Node::Page(page));
        self
    }

    /// Fetching `address` fails with `cause`.
    pub fn failing(mut self, address: &str, cause: &str) -> Self {
        self.nodes
            .insert(address.to_string(), Node::Fail(cause.to_string()));
        self
    }

    /// Fetching `address` never completes.
    pub fn hanging(mut self, address: &str) -> Self {
        self.nodes.insert(address.to_string(), Node::Hang);
        self
    }

    /// How many times `address` was fetched.
    pub fn calls(&self, address: &str) -> usize {
        let calls = self.calls.lock().unwrap();
        calls.get(address).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, address: &str) -> Result<Page, FetchError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(address.to_string())
            .or_default() += 1;

        // Give sibling tasks a chance to interleave
        tokio::task::yield_now().await;

        match self.nodes.get(address) {
            Some(Node::Page(page)) => Ok(page.clone()),
            Some(Node::Fail(cause)) => Err(FetchError::other(cause.clone())),
            Some(Node::Hang) => futures::future::pending().await,
            None => Err(FetchError::other(format!("no such page: {address}"))),
        }
    }
}
