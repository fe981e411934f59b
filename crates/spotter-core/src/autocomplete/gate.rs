use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, trace, warn};

use super::ControllerEvent;
use super::option::AutocompleteOption;
use super::source::OptionSource;
use super::state::SessionState;

/// How a lookup ended.
#[derive(Debug)]
pub enum LookupOutcome<T> {
    Success(Vec<AutocompleteOption<T>>),
    Failure(anyhow::Error),
}

/// A lookup resolution tagged with the generation that issued it.
#[derive(Debug)]
pub struct LookupResult<T> {
    pub generation: u64,
    pub query: String,
    pub outcome: LookupOutcome<T>,
}

/// What [`LookupGate::run`] did with a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Shorter than `min_chars`; options cleared, source not called.
    Skipped,
    Issued(u64),
}

/// What [`LookupGate::commit`] did with a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Applied(usize),
    Failed,
    /// Issued by an older generation; dropped without touching state.
    Stale,
}

/// Issues lookups and decides which resolutions may touch the session.
///
/// Every dispatch bumps the generation; a resolution is committed only if
/// its tag still equals the current generation. Lookups are never aborted,
/// only outdated.
pub struct LookupGate<T> {
    generation: u64,
    source: Arc<dyn OptionSource<T>>,
    runtime: Handle,
    events: UnboundedSender<ControllerEvent<T>>,
}

impl<T> LookupGate<T> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Outdate whatever is in flight without issuing anything new.
    pub(crate) fn invalidate(&mut self) {
        self.generation += 1;
    }

    pub(crate) fn set_source(&mut self, source: Arc<dyn OptionSource<T>>) {
        self.source = source;
    }
}

impl<T: Send + 'static> LookupGate<T> {
    pub(crate) fn new(
        source: Arc<dyn OptionSource<T>>,
        runtime: Handle,
        events: UnboundedSender<ControllerEvent<T>>,
    ) -> Self {
        Self {
            generation: 0,
            source,
            runtime,
            events,
        }
    }

    pub(crate) fn run(
        &mut self,
        state: &mut SessionState<T>,
        query: String,
        min_chars: usize,
    ) -> Dispatch {
        if query.chars().count() < min_chars {
            // A lookup issued before the text got this short must not
            // repopulate the list.
            self.invalidate();
            state.clear_options();
            state.is_loading = false;
            return Dispatch::Skipped;
        }

        self.generation += 1;
        let generation = self.generation;
        state.is_loading = true;
        debug!(generation, query = %query, "dispatching autocomplete lookup");

        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        self.runtime.spawn(async move {
            let outcome = match source.fetch_options(&query).await {
                Ok(options) => LookupOutcome::Success(options),
                Err(error) => LookupOutcome::Failure(error),
            };
            let _ = events.send(ControllerEvent::LookupResolved(LookupResult {
                generation,
                query,
                outcome,
            }));
        });

        Dispatch::Issued(generation)
    }

    /// The single place a resolution is allowed to change the session.
    pub(crate) fn commit(&self, state: &mut SessionState<T>, result: LookupResult<T>) -> Commit {
        if result.generation != self.generation {
            trace!(
                generation = result.generation,
                current = self.generation,
                query = %result.query,
                "discarding stale autocomplete result"
            );
            return Commit::Stale;
        }

        state.is_loading = false;
        match result.outcome {
            LookupOutcome::Success(options) => {
                let count = options.len();
                state.replace_options(options);
                Commit::Applied(count)
            }
            LookupOutcome::Failure(error) => {
                warn!(query = %result.query, error = %error, "autocomplete lookup failed");
                state.clear_options();
                Commit::Failed
            }
        }
    }
}
