// src/run.rs
// =============================================================================
// The run controller: one crawl from seed to stop.
//
// What it sets up:
// 1. A CancellationToken shared by every task, fired by the timeout or by
//    the external interrupt trigger
// 2. The visited registry and the depth controller
// 3. The depth listener, raising the ceiling on every external trigger
// 4. The result channel (capacity 1, so senders wait on the aggregator)
// 5. The aggregator, on its own task
// 6. The root crawl task at depth 0
//
// Then it waits for the aggregator to finish, cancels the token so nothing
// new starts, and reports how the run ended and how long it took.
//
// Run states:
//   Running -> TimedOut         (timeout elapsed)
//   Running -> Interrupted      (interrupt trigger fired)
//   Running -> BudgetExhausted  (error or result budget hit zero)
//   Running -> Exhausted        (every crawl task finished first)
// =============================================================================

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::CrawlConfig;
use crate::crawl::{
    watch_depth, AggregatorStop, Aggregator, Budgets, Crawler, DepthController, Reporter,
    VisitedRegistry,
};
use crate::error::CrawlError;
use crate::fetch::Fetcher;
use crate::signals::Triggers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    Errors,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    TimedOut,
    Interrupted,
    BudgetExhausted(Budget),
    Exhausted,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::TimedOut => write!(f, "timed out"),
            RunState::Interrupted => write!(f, "interrupted"),
            RunState::BudgetExhausted(Budget::Errors) => write!(f, "max errors exceeded"),
            RunState::BudgetExhausted(Budget::Results) => write!(f, "got max results"),
            RunState::Exhausted => write!(f, "nothing left to crawl"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub state: RunState,
    pub elapsed: Duration,
    pub successes: usize,
    pub failures: usize,
    /// Addresses claimed by some task, whether or not the fetch succeeded
    pub claimed: usize,
    /// Successfully visited (address, title) pairs, sorted by address
    pub visited: Vec<(String, String)>,
}

/// Crawls from `config.seed` until the run stops.
///
/// `reporter` sees every outcome the aggregator accepts, in arrival order.
pub async fn run_crawl(
    config: &CrawlConfig,
    fetcher: Arc<dyn Fetcher>,
    triggers: Triggers,
    reporter: Reporter,
) -> Result<RunReport, CrawlError> {
    config.validate()?;

    let started = Instant::now();
    let token = CancellationToken::new();
    let interrupted = Arc::new(AtomicBool::new(false));
    let Triggers {
        interrupt,
        raise_depth,
    } = triggers;

    // Timeout and interrupt both end in the same token
    let stop_watcher = {
        let token = token.clone();
        let interrupted = Arc::clone(&interrupted);
        let timeout = config.timeout;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(timeout) => {
                    tracing::info!(?timeout, "run timed out");
                    token.cancel();
                }
                _ = interrupt => {
                    tracing::info!("run interrupted");
                    interrupted.store(true, Ordering::SeqCst);
                    token.cancel();
                }
            }
        })
    };

    let registry = Arc::new(VisitedRegistry::new());
    let depth = Arc::new(DepthController::new(config.max_depth));

    let depth_listener = {
        let depth = Arc::clone(&depth);
        let token = token.clone();
        let step = config.depth_step;
        tokio::spawn(async move { watch_depth(&depth, raise_depth, step, token).await })
    };

    let (results_tx, results_rx) = mpsc::channel(1);

    let budgets = Budgets {
        errors: config.error_budget,
        results: config.result_budget,
    };
    let aggregator = tokio::spawn(Aggregator::new(budgets, reporter).run(results_rx, token.clone()));

    let crawler = Arc::new(
        Crawler::new(
            fetcher,
            Arc::clone(&registry),
            Arc::clone(&depth),
            results_tx,
            token.clone(),
        )
        .with_throttle(config.throttle)
        .with_max_in_flight(config.max_in_flight),
    );

    tracing::info!(
        seed = %config.seed,
        max_depth = config.max_depth,
        timeout = ?config.timeout,
        "crawl started"
    );

    // The root task owns the last controller-side handle on the crawler, so
    // once it and its descendants finish the result channel closes.
    // A root fetch that outlives the run keeps going on its own task.
    let mut root = tokio::spawn(crawler.visit(config.seed.clone(), 0));
    tokio::select! {
        joined = &mut root => joined?,
        _ = token.cancelled() => tracing::debug!("run stopped before the root task finished"),
    }

    let summary = aggregator.await?;

    token.cancel();
    stop_watcher.await?;
    depth_listener.await?;

    let state = match summary.stop {
        AggregatorStop::Cancelled if interrupted.load(Ordering::SeqCst) => RunState::Interrupted,
        AggregatorStop::Cancelled => RunState::TimedOut,
        AggregatorStop::ErrorBudget => RunState::BudgetExhausted(Budget::Errors),
        AggregatorStop::ResultBudget => RunState::BudgetExhausted(Budget::Results),
        AggregatorStop::ChannelClosed => RunState::Exhausted,
    };

    let report = RunReport {
        state,
        elapsed: started.elapsed(),
        successes: summary.successes,
        failures: summary.failures,
        claimed: registry.len(),
        visited: registry.snapshot(),
    };

    tracing::info!(
        state = %report.state,
        elapsed = ?report.elapsed,
        successes = report.successes,
        failures = report.failures,
        "crawl finished"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::Outcome;
    use crate::fetch::fake::FakeFetcher;
    use std::sync::Mutex;

    fn config(seed: &str) -> CrawlConfig {
        let mut config = CrawlConfig::new(seed);
        config.throttle = Duration::ZERO;
        config
    }

    fn quiet() -> Reporter {
        Box::new(|_| {})
    }

    fn no_triggers() -> Triggers {
        Triggers::manual().0
    }

    const A: &str = "https://a.test/";
    const B: &str = "https://a.test/b";
    const C: &str = "https://a.test/c";

    #[tokio::test]
    async fn test_small_cycle_visits_each_page_once() {
        let fetcher = Arc::new(
            FakeFetcher::new()
                .page(A, "A", &[B, C])
                .page(B, "B", &[A])
                .page(C, "C", &[A]),
        );
        let mut config = config(A);
        config.max_depth = 1;

        let report = run_crawl(&config, fetcher.clone(), no_triggers(), quiet())
            .await
            .unwrap();

        assert_eq!(report.state, RunState::Exhausted);
        assert_eq!(report.successes, 3);
        assert_eq!(report.claimed, 3);
        assert_eq!(
            report.visited,
            vec![
                (A.to_string(), "A".to_string()),
                (B.to_string(), "B".to_string()),
                (C.to_string(), "C".to_string()),
            ]
        );
        assert_eq!(fetcher.calls(A), 1);
    }

    #[tokio::test]
    async fn test_failing_seed_with_error_budget_one() {
        let fetcher = Arc::new(FakeFetcher::new().failing(A, "connection refused"));
        let mut config = config(A);
        config.error_budget = 1;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let reporter: Reporter = {
            let seen = Arc::clone(&seen);
            Box::new(move |outcome: &Outcome| seen.lock().unwrap().push(outcome.is_success()))
        };

        let report = run_crawl(&config, fetcher.clone(), no_triggers(), reporter)
            .await
            .unwrap();

        assert_eq!(report.state, RunState::BudgetExhausted(Budget::Errors));
        assert_eq!(report.failures, 1);
        assert_eq!(report.successes, 0);
        assert!(report.visited.is_empty());
        assert_eq!(*seen.lock().unwrap(), vec![false]);
        assert_eq!(fetcher.total_calls(), 1);
    }

    #[tokio::test]
    async fn test_result_budget_ends_run() {
        let fetcher = Arc::new(
            FakeFetcher::new()
                .page(A, "A", &[B, C])
                .page(B, "B", &[])
                .page(C, "C", &[]),
        );
        let mut config = config(A);
        config.result_budget = 1;

        let report = run_crawl(&config, fetcher, no_triggers(), quiet())
            .await
            .unwrap();

        assert_eq!(report.state, RunState::BudgetExhausted(Budget::Results));
        assert_eq!(report.successes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_ends_run() {
        let fetcher = Arc::new(FakeFetcher::new().hanging(A));
        let mut config = config(A);
        config.timeout = Duration::from_secs(10);

        let report = run_crawl(&config, fetcher, no_triggers(), quiet())
            .await
            .unwrap();

        assert_eq!(report.state, RunState::TimedOut);
        assert!(report.elapsed >= Duration::from_secs(10));
        assert_eq!(report.successes + report.failures, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_ends_run() {
        let fetcher = Arc::new(FakeFetcher::new().hanging(A));
        let (triggers, mut handles) = Triggers::manual();
        handles.interrupt();

        let report = run_crawl(&config(A), fetcher, triggers, quiet())
            .await
            .unwrap();

        assert_eq!(report.state, RunState::Interrupted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_depth_trigger_lets_crawl_go_deeper() {
        let fetcher = Arc::new(
            FakeFetcher::new()
                .page(A, "A", &[B])
                .page(B, "B", &[]),
        );
        let mut config = config(A);
        config.max_depth = 0;
        config.depth_step = 1;
        config.throttle = Duration::from_secs(1);

        let (triggers, handles) = Triggers::manual();
        assert!(handles.raise_depth());

        let report = run_crawl(&config, fetcher.clone(), triggers, quiet())
            .await
            .unwrap();

        assert_eq!(report.state, RunState::Exhausted);
        assert_eq!(report.successes, 2);
        assert_eq!(fetcher.calls(B), 1);
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let fetcher = Arc::new(FakeFetcher::new());
        let result = run_crawl(&config("not a url"), fetcher, no_triggers(), quiet()).await;
        assert!(matches!(result, Err(CrawlError::InvalidSeed { .. })));
    }
}
