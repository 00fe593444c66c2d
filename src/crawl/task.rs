// src/crawl/task.rs
// =============================================================================
// The crawl task: visit one address at one depth, then fan out.
//
// How a single visit goes:
// 1. Stop right away if the run is cancelled
// 2. Wait out the throttle delay (cut short if the run is cancelled meanwhile)
// 3. Stop silently if depth is above the current ceiling
// 4. Claim the address in the registry; stop silently if someone else has it
// 5. Fetch it
//    - failure: send a Failure outcome, done
//    - success: record the title, send a Success outcome, then spawn one new
//      task per discovered link that isn't already in the registry
//
// Children are fire-and-forget: the parent never waits for them and never
// sees their outcomes. Everything flows to the aggregator over the channel.
//
// Cancellation is only checked before work starts. A task already fetching
// finishes its fetch and may still try to send an outcome.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;

use super::{DepthController, Outcome, VisitedRegistry};
use crate::fetch::Fetcher;

/// Shared state every crawl task works against.
pub struct Crawler {
    fetcher: Arc<dyn Fetcher>,
    registry: Arc<VisitedRegistry>,
    depth: Arc<DepthController>,
    results: mpsc::Sender<Outcome>,
    token: CancellationToken,
    throttle: Duration,
    // Optional cap on concurrent fetches
    in_flight: Option<Arc<Semaphore>>,
}

impl Crawler {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        registry: Arc<VisitedRegistry>,
        depth: Arc<DepthController>,
        results: mpsc::Sender<Outcome>,
        token: CancellationToken,
    ) -> Self {
        Self {
            fetcher,
            registry,
            depth,
            results,
            token,
            throttle: Duration::ZERO,
            in_flight: None,
        }
    }

    /// Delay every task waits before touching the depth ceiling or registry.
    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    /// Caps how many fetches may run at once. `None` leaves fan-out unbounded.
    pub fn with_max_in_flight(mut self, max_in_flight: Option<usize>) -> Self {
        self.in_flight = max_in_flight.map(|n| Arc::new(Semaphore::new(n)));
        self
    }

    /// Visits `address` at `depth`.
    ///
    /// The returned future completes once this task's own fetch and spawning
    /// are done; it does not wait for any children.
    pub fn visit(self: Arc<Self>, address: String, depth: usize) -> BoxFuture<'static, ()> {
        async move { self.run(address, depth).await }.boxed()
    }

    async fn run(self: Arc<Self>, address: String, depth: usize) {
        if self.token.is_cancelled() {
            return;
        }

        if !self.throttle.is_zero() {
            tokio::select! {
                _ = self.token.cancelled() => return,
                _ = tokio::time::sleep(self.throttle) => {}
            }
        }

        if !self.depth.allows(depth) {
            tracing::debug!(%address, depth, "beyond depth ceiling, skipping");
            return;
        }

        if !self.registry.try_claim(&address) {
            tracing::debug!(%address, "already claimed by another task");
            return;
        }

        let permit = match &self.in_flight {
            None => None,
            Some(limit) => tokio::select! {
                _ = self.token.cancelled() => return,
                permit = Arc::clone(limit).acquire_owned() => permit.ok(),
            },
        };

        let result = self.fetcher.fetch(&address).await;
        drop(permit);

        let page = match result {
            Ok(page) => page,
            Err(cause) => {
                self.report(Outcome::Failure {
                    address,
                    depth,
                    cause,
                })
                .await;
                return;
            }
        };

        self.registry.record_title(&address, &page.title);

        let delivered = self
            .report(Outcome::Success {
                address: address.clone(),
                title: page.title,
                depth,
            })
            .await;
        if !delivered {
            return;
        }

        let mut spawned = 0usize;
        for link in page.links {
            if self.registry.contains(&link) {
                continue;
            }
            tokio::spawn(Arc::clone(&self).visit(link, depth + 1));
            spawned += 1;
        }
        tracing::trace!(%address, depth, spawned, "spawned child tasks");
    }

    // False once the aggregator has stopped listening
    async fn report(&self, outcome: Outcome) -> bool {
        match self.results.send(outcome).await {
            Ok(()) => true,
            Err(mpsc::error::SendError(outcome)) => {
                tracing::debug!(address = outcome.address(), "aggregator gone, outcome dropped");
                false
            }
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does visit() return BoxFuture instead of being an `async fn`?
//    - An async fn that spawns itself has a future type that contains itself
//    - The compiler can't size (or prove Send for) such a type
//    - Boxing gives the future a fixed, named type: Pin<Box<dyn Future + Send>>
//
// 2. What is `self: Arc<Self>`?
//    - The method takes an owned reference-counted handle instead of &self
//    - Each spawned child gets its own Arc::clone, so the shared state lives
//      as long as any task still needs it
//
// 3. What does tokio::select! do here?
//    - Waits on several futures at once and runs the branch of whichever
//      finishes first
//    - We race the throttle sleep against cancellation so a stopped run
//      doesn't keep sleeping tasks around
//
// 4. Why doesn't the parent await its children?
//    - tokio::spawn returns a JoinHandle; dropping it detaches the task
//    - The child keeps running and reports through the channel on its own
// -----------------------------------------------------------------------------
