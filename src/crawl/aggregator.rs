// src/crawl/aggregator.rs
// =============================================================================
// The single consumer of crawl outcomes.
//
// Reads the result channel and decides when the crawl is over:
// - the run is cancelled (timeout or interrupt): stop, whatever the budgets say
// - a Failure brings the error budget to zero: stop
// - a Success brings the result budget to zero: stop
// - every crawl task has finished and the channel closed: stop
//
// It never cancels crawl tasks itself. Returning drops the receiver, so a
// task still trying to send gets an error instead of waiting forever.
// =============================================================================

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::Outcome;

/// Callback invoked for every outcome the aggregator accepts.
pub type Reporter = Box<dyn FnMut(&Outcome) + Send>;

/// How many failures and successes the run tolerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budgets {
    pub errors: usize,
    pub results: usize,
}

/// Why the aggregator stopped reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatorStop {
    Cancelled,
    ErrorBudget,
    ResultBudget,
    ChannelClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateSummary {
    pub stop: AggregatorStop,
    pub successes: usize,
    pub failures: usize,
}

pub struct Aggregator {
    errors_remaining: usize,
    results_remaining: usize,
    successes: usize,
    failures: usize,
    reporter: Reporter,
}

impl Aggregator {
    pub fn new(budgets: Budgets, reporter: Reporter) -> Self {
        Self {
            errors_remaining: budgets.errors,
            results_remaining: budgets.results,
            successes: 0,
            failures: 0,
            reporter,
        }
    }

    /// Consumes outcomes until one of the stop conditions hits.
    pub async fn run(
        mut self,
        mut results: mpsc::Receiver<Outcome>,
        token: CancellationToken,
    ) -> AggregateSummary {
        let stop = loop {
            tokio::select! {
                // Cancellation wins over anything already waiting in the channel
                biased;

                _ = token.cancelled() => break AggregatorStop::Cancelled,

                outcome = results.recv() => match outcome {
                    Some(outcome) => {
                        if let Some(stop) = self.accept(outcome) {
                            break stop;
                        }
                    }
                    None => break AggregatorStop::ChannelClosed,
                },
            }
        };

        match stop {
            AggregatorStop::Cancelled => tracing::info!("run cancelled, aggregator stopping"),
            AggregatorStop::ErrorBudget => tracing::info!("max errors exceeded"),
            AggregatorStop::ResultBudget => tracing::info!("got max results"),
            AggregatorStop::ChannelClosed => tracing::info!("no crawl tasks left"),
        }

        AggregateSummary {
            stop,
            successes: self.successes,
            failures: self.failures,
        }
    }

    // Applies one outcome to the budgets; Some(_) means stop reading
    fn accept(&mut self, outcome: Outcome) -> Option<AggregatorStop> {
        (self.reporter)(&outcome);

        match &outcome {
            Outcome::Success { address, title, depth } => {
                tracing::debug!(%address, %title, depth, "crawling result");
                self.successes += 1;
                self.results_remaining = self.results_remaining.saturating_sub(1);
                (self.results_remaining == 0).then_some(AggregatorStop::ResultBudget)
            }
            Outcome::Failure { address, depth, cause } => {
                tracing::warn!(%address, depth, error = %cause, "crawl failed");
                self.failures += 1;
                self.errors_remaining = self.errors_remaining.saturating_sub(1);
                (self.errors_remaining == 0).then_some(AggregatorStop::ErrorBudget)
            }
        }
    }
}
