// src/signals.rs
// =============================================================================
// External triggers for a crawl run.
//
// The run controller doesn't know about OS signals. It gets two event
// sources:
// - interrupt: a future that completes when the run should stop
// - raise_depth: a stream of "go deeper" events
//
// from_os_signals() wires them to the process:
//   Ctrl-C / SIGTERM -> interrupt
//   SIGUSR1          -> raise depth (unix only)
//
// manual() hands back sender handles instead, for tests and embedding.
// =============================================================================

use futures::future::{self, BoxFuture, FutureExt};
use tokio::signal;
use tokio::sync::{mpsc, oneshot};

// Pending depth raises beyond this are dropped while the listener catches up
const RAISE_BUFFER: usize = 16;

pub struct Triggers {
    pub interrupt: BoxFuture<'static, ()>,
    pub raise_depth: mpsc::Receiver<()>,
}

/// Sending side of `Triggers::manual()`.
#[derive(Debug)]
pub struct TriggerHandles {
    interrupt: Option<oneshot::Sender<()>>,
    raise: mpsc::Sender<()>,
}

impl TriggerHandles {
    /// Fires the interrupt. Later calls do nothing.
    pub fn interrupt(&mut self) {
        if let Some(tx) = self.interrupt.take() {
            let _ = tx.send(());
        }
    }

    /// Asks for one depth-ceiling raise. Returns false if the run has
    /// stopped listening or too many raises are already queued.
    pub fn raise_depth(&self) -> bool {
        self.raise.try_send(()).is_ok()
    }
}

impl Triggers {
    /// Triggers driven by the returned handles.
    ///
    /// Dropping the handles never counts as an interrupt.
    pub fn manual() -> (Self, TriggerHandles) {
        let (interrupt_tx, interrupt_rx) = oneshot::channel();
        let (raise_tx, raise_rx) = mpsc::channel(RAISE_BUFFER);

        let interrupt = async move {
            if interrupt_rx.await.is_err() {
                future::pending::<()>().await;
            }
        }
        .boxed();

        let triggers = Self {
            interrupt,
            raise_depth: raise_rx,
        };
        let handles = TriggerHandles {
            interrupt: Some(interrupt_tx),
            raise: raise_tx,
        };
        (triggers, handles)
    }

    /// Triggers bound to process signals. Must be called inside the runtime.
    pub fn from_os_signals() -> std::io::Result<Self> {
        let (raise_tx, raise_rx) = mpsc::channel(RAISE_BUFFER);

        #[cfg(unix)]
        let interrupt = {
            use signal::unix::SignalKind;

            let mut terminate = signal::unix::signal(SignalKind::terminate())?;
            let mut user1 = signal::unix::signal(SignalKind::user_defined1())?;

            tokio::spawn(async move {
                while user1.recv().await.is_some() {
                    tracing::info!(signal = "SIGUSR1", "got signal");
                    if raise_tx.try_send(()).is_err() && raise_tx.is_closed() {
                        break;
                    }
                }
            });

            async move {
                tokio::select! {
                    result = signal::ctrl_c() => match result {
                        Ok(()) => tracing::info!(signal = "SIGINT", "got signal"),
                        Err(err) => {
                            tracing::error!(error = %err, "failed to listen for Ctrl-C");
                            future::pending::<()>().await;
                        }
                    },
                    _ = terminate.recv() => tracing::info!(signal = "SIGTERM", "got signal"),
                }
            }
            .boxed()
        };

        #[cfg(not(unix))]
        let interrupt = {
            // No depth signal here; closing the sender ends the depth listener
            drop(raise_tx);

            async move {
                match signal::ctrl_c().await {
                    Ok(()) => tracing::info!(signal = "SIGINT", "got signal"),
                    Err(err) => {
                        tracing::error!(error = %err, "failed to listen for Ctrl-C");
                        future::pending::<()>().await;
                    }
                }
            }
            .boxed()
        };

        Ok(Self {
            interrupt,
            raise_depth: raise_rx,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_manual_interrupt_fires() {
        let (triggers, mut handles) = Triggers::manual();
        handles.interrupt();
        handles.interrupt();

        tokio::time::timeout(Duration::from_secs(1), triggers.interrupt)
            .await
            .expect("interrupt should complete");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_handles_do_not_interrupt() {
        let (triggers, handles) = Triggers::manual();
        drop(handles);

        let fired = tokio::time::timeout(Duration::from_secs(60), triggers.interrupt).await;
        assert!(fired.is_err());
    }

    #[tokio::test]
    async fn test_manual_raise_depth_is_delivered() {
        let (mut triggers, handles) = Triggers::manual();
        assert!(handles.raise_depth());
        assert!(handles.raise_depth());

        assert_eq!(triggers.raise_depth.recv().await, Some(()));
        assert_eq!(triggers.raise_depth.recv().await, Some(()));
    }
}
