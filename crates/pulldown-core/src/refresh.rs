//! Refresh triggering, the re-trigger lock, and async completion delivery
//!
//! A triggered refresh runs as a spawned tokio task. Its completion comes
//! back as a [`RefreshCompletion`] on an unbounded channel, which the host
//! drains and hands to `PullController::on_refresh_complete` from its
//! event loop. The controller never aborts a started refresh; only the
//! optional timeout cuts one short.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The external refresh operation
///
/// Failures are the handler's own concern; the controller only observes
/// that the future resolved.
#[async_trait]
pub trait RefreshHandler: Send + Sync {
    async fn refresh(&self);
}

/// Adapter turning an async closure into a [`RefreshHandler`]
pub struct FnRefresh<F>(F);

#[async_trait]
impl<F, Fut> RefreshHandler for FnRefresh<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn refresh(&self) {
        (self.0)().await
    }
}

/// Wrap an async closure as a shareable refresh handler
pub fn refresh_fn<F, Fut>(f: F) -> Arc<dyn RefreshHandler>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(FnRefresh(f))
}

/// Identifies one triggered refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The handler's future resolved
    Completed,
    /// The configured timeout elapsed first
    TimedOut,
}

/// Message delivered back into the controller when a refresh concludes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshCompletion {
    pub ticket: RefreshTicket,
    pub outcome: RefreshOutcome,
}

/// Owns `is_refreshing` / `is_locked` and launches the refresh task
pub struct RefreshCoordinator {
    handler: Option<Arc<dyn RefreshHandler>>,
    completions: Option<mpsc::UnboundedSender<RefreshCompletion>>,
    timeout: Option<Duration>,
    pending: Option<RefreshTicket>,
    is_locked: bool,
    next_ticket: u64,
    /// Missing runtime already reported
    runtime_warned: bool,
}

impl RefreshCoordinator {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            handler: None,
            completions: None,
            timeout,
            pending: None,
            is_locked: false,
            next_ticket: 0,
            runtime_warned: false,
        }
    }

    /// Install the refresh handler and the channel its completions go to
    pub fn set_handler(
        &mut self,
        handler: Arc<dyn RefreshHandler>,
        completions: mpsc::UnboundedSender<RefreshCompletion>,
    ) {
        self.handler = Some(handler);
        self.completions = Some(completions);
    }

    #[inline]
    pub fn is_refreshing(&self) -> bool {
        self.pending.is_some()
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    pub fn pending(&self) -> Option<RefreshTicket> {
        self.pending
    }

    /// Start a refresh and set the lock
    ///
    /// Returns `None` without touching any state when a refresh is already
    /// outstanding, no handler is installed, or no tokio runtime is
    /// available to run it.
    pub fn trigger(&mut self) -> Option<RefreshTicket> {
        if self.is_refreshing() {
            return None;
        }
        let (handler, tx) = match (&self.handler, &self.completions) {
            (Some(handler), Some(tx)) => (handler.clone(), tx.clone()),
            _ => return None,
        };
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                if self.runtime_warned {
                    debug!(error = %e, "No async runtime available, refresh skipped");
                } else {
                    warn!(error = %e, "No async runtime available, refresh skipped");
                    self.runtime_warned = true;
                }
                return None;
            }
        };

        self.next_ticket += 1;
        let ticket = RefreshTicket(self.next_ticket);
        self.pending = Some(ticket);
        self.is_locked = true;

        let timeout = self.timeout;
        runtime.spawn(async move {
            let outcome = match timeout {
                Some(limit) => match tokio::time::timeout(limit, handler.refresh()).await {
                    Ok(()) => RefreshOutcome::Completed,
                    Err(_) => RefreshOutcome::TimedOut,
                },
                None => {
                    handler.refresh().await;
                    RefreshOutcome::Completed
                }
            };
            if tx.send(RefreshCompletion { ticket, outcome }).is_err() {
                debug!(ticket = ticket.id(), "Refresh finished after controller was dropped");
            }
        });

        info!(ticket = ticket.id(), "Refresh triggered");
        Some(ticket)
    }

    /// Clear the lock at gesture end
    pub fn release_lock(&mut self) {
        self.is_locked = false;
    }

    /// Accept a completion; returns false for one that does not match the
    /// outstanding refresh
    pub fn complete(&mut self, completion: RefreshCompletion) -> bool {
        if self.pending != Some(completion.ticket) {
            warn!(
                ticket = completion.ticket.id(),
                "Ignoring completion for a refresh that is not outstanding"
            );
            return false;
        }
        self.pending = None;
        match completion.outcome {
            RefreshOutcome::Completed => {
                debug!(ticket = completion.ticket.id(), "Refresh completed")
            }
            RefreshOutcome::TimedOut => {
                warn!(ticket = completion.ticket.id(), "Refresh timed out")
            }
        }
        true
    }
}
