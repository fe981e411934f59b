use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Turns a burst of `schedule` calls into a single firing after a quiet
/// period.
///
/// Each timer carries a ticket. Only the ticket of the most recent
/// `schedule` is ever [accepted](Self::accept), so a timer that fired just
/// before it was cancelled is still ignored.
pub struct Debouncer {
    runtime: Handle,
    pending: Option<JoinHandle<()>>,
    ticket: u64,
}

impl Debouncer {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            pending: None,
            ticket: 0,
        }
    }

    /// Cancel any pending timer, then call `fire(ticket)` once `delay` has
    /// elapsed.
    pub fn schedule<F>(&mut self, delay: Duration, fire: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.cancel();
        let ticket = self.ticket;
        self.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            fire(ticket);
        }));
        ticket
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.ticket += 1;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Claim a fired timer. Returns `false` for tickets that were cancelled
    /// or superseded.
    pub fn accept(&mut self, ticket: u64) -> bool {
        if ticket != self.ticket || self.pending.is_none() {
            return false;
        }
        self.pending = None;
        true
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
