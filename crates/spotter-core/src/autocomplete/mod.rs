//! Debounced, race-safe search-and-select controller.
//!
//! An [`Autocomplete`] turns free text into a canonical `(value, data)` pair
//! through an injected asynchronous [`OptionSource`]. Keystrokes update the
//! text immediately and (re)arm a debounce timer; when the timer fires the
//! lookup is dispatched and tagged with a generation, and only the result of
//! the latest generation is ever committed.
//!
//! The controller is single-owner: every state change happens inside a
//! `&mut self` method on the host's event loop. Timers and lookups run as
//! tokio tasks and report back through the controller's own channel, which
//! the host drains with [`Autocomplete::pump`] (once per UI tick) or
//! [`Autocomplete::next_event`] (async hosts).
//!
//! ```ignore
//! let mut airport = Autocomplete::mount(
//!     AutocompleteProps::new("").label("Airport").required(true),
//!     Arc::new(AirportLookup::new(client)),
//!     Box::new(move |code, airport| { let _ = tx.send(AppEvent::AirportSelected(code, airport)); }),
//!     &listeners,
//! )?;
//! airport.input("LIS");
//! ```

pub mod debounce;
pub mod dismiss;
pub mod gate;
pub mod keys;
pub mod option;
pub mod props;
pub mod source;
pub mod state;


use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::error::{Result, SpotterError};

pub use debounce::Debouncer;
pub use dismiss::{Bounds, PointerDown, PointerListeners, Region, Subscription};
pub use gate::{Commit, Dispatch, LookupGate, LookupOutcome, LookupResult};
pub use keys::{Action, NavKey, Phase};
pub use option::AutocompleteOption;
pub use props::{AutocompleteProps, DEFAULT_DEBOUNCE, DEFAULT_MIN_CHARS};
pub use source::{FnSource, OptionSource, source_fn};
pub use state::SessionState;

/// Selection callback: `(value, data)` of the chosen option.
pub type OnChange<T> = Box<dyn FnMut(String, Option<T>) + Send>;

/// Everything that reaches the controller asynchronously.
#[derive(Debug)]
pub enum ControllerEvent<T> {
    DebounceElapsed { ticket: u64, query: String },
    LookupResolved(LookupResult<T>),
    PointerDown(PointerDown),
}

/// Tells the host whether a key was used.
///
/// On `Consumed` the host must skip its own handling of the key (moving the
/// caret, submitting the form, closing the dialog).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResponse {
    Consumed,
    Ignored,
}

pub struct Autocomplete<T> {
    props: AutocompleteProps,
    state: SessionState<T>,
    debouncer: Debouncer,
    gate: LookupGate<T>,
    on_change: OnChange<T>,
    events_tx: UnboundedSender<ControllerEvent<T>>,
    events_rx: UnboundedReceiver<ControllerEvent<T>>,
    bounds: Bounds,
    outside_pointer: Option<Subscription>,
}

impl<T> Autocomplete<T>
where
    T: Clone + Send + 'static,
{
    /// Create a controller without outside-pointer dismissal.
    ///
    /// Must be called from within a tokio runtime; timers and lookups are
    /// spawned onto it.
    pub fn new(
        props: AutocompleteProps,
        source: Arc<dyn OptionSource<T>>,
        on_change: OnChange<T>,
    ) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| SpotterError::Runtime(e.to_string()))?;
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Ok(Self {
            state: SessionState::new(props.value.clone()),
            debouncer: Debouncer::new(runtime.clone()),
            gate: LookupGate::new(source, runtime, events_tx.clone()),
            props,
            on_change,
            events_tx,
            events_rx,
            bounds: Bounds::default(),
            outside_pointer: None,
        })
    }

    /// Create a controller and register it for outside-pointer dismissal.
    /// The registration lasts until the controller is dropped.
    pub fn mount(
        props: AutocompleteProps,
        source: Arc<dyn OptionSource<T>>,
        on_change: OnChange<T>,
        listeners: &PointerListeners,
    ) -> Result<Self> {
        let mut this = Self::new(props, source, on_change)?;
        let tx = this.events_tx.clone();
        this.outside_pointer = Some(listeners.subscribe(move |event| {
            let _ = tx.send(ControllerEvent::PointerDown(event));
        }));
        Ok(this)
    }

    // ── Accessors ──────────────────────────────────────────

    pub fn props(&self) -> &AutocompleteProps {
        &self.props
    }

    pub fn state(&self) -> &SessionState<T> {
        &self.state
    }

    pub fn text(&self) -> &str {
        self.state.text()
    }

    pub fn options(&self) -> &[AutocompleteOption<T>] {
        self.state.options()
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn highlighted_index(&self) -> Option<usize> {
        self.state.highlighted()
    }

    pub fn generation(&self) -> u64 {
        self.gate.generation()
    }

    pub fn is_disabled(&self) -> bool {
        self.props.disabled
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn phase(&self) -> Phase {
        if self.state.is_open() {
            Phase::Open
        } else {
            Phase::Closed
        }
    }

    // ── Input ──────────────────────────────────────────────

    /// The input's text changed. The text is applied right away; the lookup
    /// waits for the debounce.
    pub fn input(&mut self, text: impl Into<String>) {
        if self.props.disabled {
            return;
        }
        self.state.text = text.into();

        let query = self.state.text.clone();
        let tx = self.events_tx.clone();
        self.debouncer.schedule(self.props.debounce, move |ticket| {
            let _ = tx.send(ControllerEvent::DebounceElapsed { ticket, query });
        });
    }

    pub fn key(&mut self, key: NavKey) -> KeyResponse {
        if self.props.disabled {
            return KeyResponse::Ignored;
        }

        let guards = keys::GuardInput {
            text_len: self.state.text_len(),
            min_chars: self.props.min_chars,
            highlighted: self.state.highlighted,
            option_count: self.state.options.len(),
        };
        match keys::dispatch(self.phase(), key, &guards) {
            Some(action) => {
                self.apply(action);
                KeyResponse::Consumed
            }
            None => KeyResponse::Ignored,
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::LookupNow => {
                self.debouncer.cancel();
                let query = self.state.text.clone();
                self.run_lookup(query);
            }
            Action::HighlightNext => self.state.highlight_next(),
            Action::HighlightPrev => self.state.highlight_prev(),
            Action::SelectHighlighted => {
                if let Some(index) = self.state.highlighted {
                    self.select_option(index);
                }
            }
            Action::Close => self.state.close(),
            Action::Noop => {}
        }
    }

    /// Commit option `index`: copy its label into the input, report its value
    /// and data, close the list. Both Enter and pointer activation end here.
    pub fn select_option(&mut self, index: usize) -> bool {
        if self.props.disabled {
            return false;
        }
        let Some(option) = self.state.options.get(index) else {
            return false;
        };
        let value = option.value.clone();
        let data = option.data.clone();
        self.state.text = option.label.clone();
        (self.on_change)(value, data);
        self.state.close();
        true
    }

    /// Pointer activation of a listed option.
    pub fn click_option(&mut self, index: usize) -> bool {
        self.is_open() && self.select_option(index)
    }

    /// Pointer moved over a listed option.
    pub fn hover_option(&mut self, index: usize) {
        if !self.props.disabled && self.is_open() {
            self.state.highlight(index);
        }
    }

    /// The input gained focus. Reopens the last results without a new lookup.
    pub fn focus(&mut self) {
        if self.props.disabled {
            return;
        }
        if !self.state.options.is_empty() && self.state.text_len() >= self.props.min_chars {
            self.state.is_open = true;
        }
    }

    /// The input lost focus. Closes the list like an outside press; options
    /// and highlight stay for the next `focus`.
    pub fn blur(&mut self) {
        self.state.is_open = false;
    }

    /// Where the component was drawn; used to tell outside presses apart.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// A pointer press somewhere on screen. Presses outside the component
    /// close the list and leave everything else alone.
    pub fn pointer_down(&mut self, event: PointerDown) {
        if self.state.is_open && !self.bounds.contains(event.x, event.y) {
            self.state.is_open = false;
        }
    }

    // ── Props ──────────────────────────────────────────────

    /// The controlled value changed from outside (form reset, another
    /// record). Overwrites the text and nothing else.
    pub fn set_value(&mut self, value: impl Into<String>) {
        let value = value.into();
        self.props.value.clone_from(&value);
        self.state.text = value;
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        if disabled && !self.props.disabled {
            self.debouncer.cancel();
            self.gate.invalidate();
            self.state.is_loading = false;
            self.state.close();
        }
        self.props.disabled = disabled;
    }

    /// Swap the lookup. Anything still in flight from the old source is
    /// outdated.
    pub fn set_source(&mut self, source: Arc<dyn OptionSource<T>>) {
        self.gate.set_source(source);
        self.gate.invalidate();
        self.state.is_loading = false;
    }

    pub fn set_on_change(&mut self, on_change: OnChange<T>) {
        self.on_change = on_change;
    }

    // ── Events ─────────────────────────────────────────────

    fn run_lookup(&mut self, query: String) -> Dispatch {
        self.gate.run(&mut self.state, query, self.props.min_chars)
    }

    pub fn handle_event(&mut self, event: ControllerEvent<T>) {
        match event {
            ControllerEvent::DebounceElapsed { ticket, query } => {
                if self.debouncer.accept(ticket) && !self.props.disabled {
                    self.run_lookup(query);
                }
            }
            ControllerEvent::LookupResolved(result) => {
                self.gate.commit(&mut self.state, result);
            }
            ControllerEvent::PointerDown(event) => self.pointer_down(event),
        }
    }

    /// Handle everything that has arrived so far without waiting.
    /// Returns how many events were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Wait for the next event and handle it.
    pub async fn next_event(&mut self) {
        if let Some(event) = self.events_rx.recv().await {
            self.handle_event(event);
        }
    }

    /// Tear the controller down. Same as dropping it.
    pub fn dispose(self) {}
}

impl<T> Drop for Autocomplete<T> {
    fn drop(&mut self) {
        self.debouncer.cancel();
        self.gate.invalidate();
        self.outside_pointer.take();
        self.events_rx.close();
    }
}
