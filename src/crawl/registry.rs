// src/crawl/registry.rs
// =============================================================================
// The visited registry: address -> title, shared by every crawl task.
//
// One Mutex guards the whole map. There is no public
// "contains then insert" pair: try_claim does both inside one lock, so two
// tasks racing on the same address can never both win it.
//
// Entry states:
// - claimed, no title yet: a task committed to visiting it (or the fetch failed)
// - claimed with a title: the visit succeeded
//
// The registry only grows; there is no removal.
// =============================================================================

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct VisitedRegistry {
    entries: Mutex<HashMap<String, Option<String>>>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // A panicking task can't leave the map half-updated (every critical
    // section is a single insert), so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Option<String>>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Claims `address` for the caller.
    ///
    /// Returns true only for the first caller; everyone after that gets false.
    pub fn try_claim(&self, address: &str) -> bool {
        let mut entries = self.lock();
        if entries.contains_key(address) {
            return false;
        }
        entries.insert(address.to_string(), None);
        true
    }

    /// Stores the title of a visited address.
    pub fn record_title(&self, address: &str, title: &str) {
        self.lock()
            .insert(address.to_string(), Some(title.to_string()));
    }

    /// True if some task has already claimed `address`.
    pub fn contains(&self, address: &str) -> bool {
        self.lock().contains_key(address)
    }

    /// Title recorded for `address`, if its visit succeeded.
    pub fn title(&self, address: &str) -> Option<String> {
        self.lock().get(address).cloned().flatten()
    }

    /// Number of claimed addresses.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Successfully visited `(address, title)` pairs, sorted by address.
    pub fn snapshot(&self) -> Vec<(String, String)> {
        let mut visited: Vec<_> = self
            .lock()
            .iter()
            .filter_map(|(address, title)| {
                title.as_ref().map(|title| (address.clone(), title.clone()))
            })
            .collect();
        visited.sort();
        visited
    }
}
