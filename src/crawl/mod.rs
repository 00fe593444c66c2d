// src/crawl/mod.rs
// =============================================================================
// The concurrent crawl core.
//
// Submodules:
// - registry: which addresses have been claimed, and their titles
// - depth: the adjustable depth ceiling and its trigger listener
// - task: the recursive crawl task (one tokio task per discovered address)
// - outcome: Success/Failure messages sent to the aggregator
// - aggregator: consumes outcomes, applies budgets, decides when to stop
//
// The run controller (src/run.rs) wires these together.
// =============================================================================

mod aggregator;
mod depth;
mod outcome;
mod registry;
mod task;

pub use aggregator::{AggregateSummary, Aggregator, AggregatorStop, Budgets, Reporter};
pub use depth::{watch_depth, DepthController};
pub use outcome::Outcome;
pub use registry::VisitedRegistry;
pub use task::Crawler;
