// src/crawl/depth.rs
// =============================================================================
// The depth ceiling: how many link-hops from the seed a task may run at.
//
// Every crawl task reads it; only the depth-raise listener writes it, so it
// sits behind an RwLock. It can only go up.
// =============================================================================

use std::sync::RwLock;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub struct DepthController {
    ceiling: RwLock<usize>,
}

impl DepthController {
    pub fn new(ceiling: usize) -> Self {
        Self {
            ceiling: RwLock::new(ceiling),
        }
    }

    pub fn current_ceiling(&self) -> usize {
        *self
            .ceiling
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// True if a task at `depth` is allowed to run.
    pub fn allows(&self, depth: usize) -> bool {
        depth <= self.current_ceiling()
    }

    /// Raises the ceiling by `delta` and returns the new value.
    pub fn raise_ceiling(&self, delta: usize) -> usize {
        let mut ceiling = self
            .ceiling
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *ceiling = ceiling.saturating_add(delta);
        *ceiling
    }
}

/// Raises the ceiling by `step` each time `raises` yields, until the run is
/// cancelled or the trigger source goes away.
pub async fn watch_depth(
    controller: &DepthController,
    mut raises: mpsc::Receiver<()>,
    step: usize,
    token: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = token.cancelled() => return,
            raise = raises.recv() => match raise {
                Some(()) => {
                    let ceiling = controller.raise_ceiling(step);
                    tracing::info!(step, ceiling, "depth ceiling raised");
                }
                None => {
                    tracing::debug!("depth trigger source closed");
                    return;
                }
            },
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. RwLock vs Mutex
//    - Mutex: one holder at a time, readers included
//    - RwLock: many readers at once, or exactly one writer
//    - Here thousands of tasks read the ceiling and a signal writes it rarely
//
// 2. What is unwrap_or_else(|poisoned| poisoned.into_inner())?
//    - A lock becomes "poisoned" if a thread panicked while holding it
//    - into_inner() takes the value anyway; a usize can't be left half-written
// -----------------------------------------------------------------------------
