use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use ratatui::layout::Rect;
use spotter_core::autocomplete::{Bounds, Region};
use spotter_core::{
    Aircraft, Airport, AppConfig, Autocomplete, AutocompleteProps, OnChange, PointerDown,
    PointerListeners, SightingDraft, SightingRequest, Visibility,
};
use spotter_lookup::{AircraftLookup, AirportLookup, RateLimitedClient};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::event::AppEvent;
use crate::form::{FieldId, FormField};
use crate::theme::NordTheme;

/// How the form session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    Submitted(SightingRequest),
    Cancelled,
}

/// Where the open dropdown was drawn, for mouse hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropdownArea {
    pub field: FieldId,
    pub area: Rect,
    /// Index of the option on the first visible row.
    pub offset: usize,
    pub rows: usize,
}

impl DropdownArea {
    /// Option index under the given cell, if any.
    pub fn option_at(&self, x: u16, y: u16) -> Option<usize> {
        let inside_x = x > self.area.x && x < self.area.x + self.area.width.saturating_sub(1);
        let first_row = self.area.y + 1;
        if !inside_x || y < first_row {
            return None;
        }
        let row = usize::from(y - first_row);
        (row < self.rows).then_some(self.offset + row)
    }
}

pub struct SightingApp {
    pub draft: SightingDraft,
    pub fields: HashMap<FieldId, FormField>,
    pub active: FieldId,
    pub airport: Autocomplete<Airport>,
    pub aircraft: Autocomplete<Aircraft>,
    pub pointer: PointerListeners,
    pub theme: NordTheme,
    pub status_message: String,
    pub should_quit: bool,
    pub outcome: Option<FormOutcome>,
    pub tick_count: u64,

    /// Screen rows of each field, filled in by the renderer.
    pub field_rows: HashMap<FieldId, Region>,
    pub dropdown: Option<DropdownArea>,

    client: Arc<RateLimitedClient>,
    events_rx: UnboundedReceiver<AppEvent>,
}

impl SightingApp {
    /// Build the form. Must run inside a tokio runtime.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Arc::new(RateLimitedClient::from_config(&config.backend)?);
        let pointer = PointerListeners::new();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let airport_props = config.autocomplete.airport.apply(
            AutocompleteProps::new("")
                .label("Airport")
                .placeholder("Type an airport name or code")
                .required(true),
        );
        let airport = Autocomplete::mount(
            airport_props,
            Arc::new(AirportLookup::new(Arc::clone(&client))),
            selection_sender(&events_tx, AppEvent::AirportSelected),
            &pointer,
        )?;

        let aircraft_props = config.autocomplete.aircraft.apply(
            AutocompleteProps::new("")
                .label("Callsign")
                .placeholder("Live flights near the airport")
                .disabled(true),
        );
        let aircraft = Autocomplete::mount(
            aircraft_props,
            Arc::new(AircraftLookup::new(Arc::clone(&client))),
            selection_sender(&events_tx, AppEvent::AircraftSelected),
            &pointer,
        )?;

        let draft = SightingDraft::new();
        let mut fields = HashMap::new();
        for id in FieldId::ORDER {
            if !id.is_autocomplete() && id != FieldId::Visibility {
                fields.insert(id, FormField::default());
            }
        }
        if let Some(field) = fields.get_mut(&FieldId::Timestamp) {
            field.set(draft.timestamp.clone());
        }

        Ok(Self {
            draft,
            fields,
            active: FieldId::Timestamp,
            airport,
            aircraft,
            pointer,
            theme: NordTheme::default(),
            status_message: String::new(),
            should_quit: false,
            outcome: None,
            tick_count: 0,
            field_rows: HashMap::new(),
            dropdown: None,
            client,
            events_rx,
        })
    }

    pub fn is_airport_chosen(&self) -> bool {
        !self.aircraft.is_disabled()
    }

    /// Location is filled from the chosen airport and locked while one is set.
    pub fn is_read_only(&self, id: FieldId) -> bool {
        id == FieldId::Location && self.is_airport_chosen()
    }

    // ── Focus ──────────────────────────────────────────────

    pub fn focus(&mut self, field: FieldId) {
        if self.active != field {
            match self.active {
                FieldId::Airport => self.airport.blur(),
                FieldId::Callsign => self.aircraft.blur(),
                _ => {}
            }
        }
        self.active = field;
        match field {
            FieldId::Airport => self.airport.focus(),
            FieldId::Callsign => self.aircraft.focus(),
            _ => {}
        }
    }

    pub fn focus_next(&mut self) {
        self.focus(self.active.next());
    }

    pub fn focus_prev(&mut self) {
        self.focus(self.active.prev());
    }

    // ── Editing ────────────────────────────────────────────

    pub fn insert_char(&mut self, c: char) {
        match self.active {
            FieldId::Airport => {
                let text = format!("{}{c}", self.airport.text());
                self.airport.input(text);
            }
            FieldId::Callsign => {
                let text = format!("{}{c}", self.aircraft.text());
                self.aircraft.input(text);
            }
            FieldId::Visibility => {
                if c == ' ' {
                    self.draft.visibility = self.draft.visibility.toggle();
                }
            }
            id if self.is_read_only(id) => {}
            id => {
                if let Some(field) = self.fields.get_mut(&id) {
                    field.insert_char(c);
                }
            }
        }
    }

    pub fn delete_back(&mut self) {
        match self.active {
            FieldId::Airport => {
                let text = without_last_char(self.airport.text());
                self.airport.input(text);
            }
            FieldId::Callsign => {
                let text = without_last_char(self.aircraft.text());
                self.aircraft.input(text);
            }
            FieldId::Visibility => {}
            id if self.is_read_only(id) => {}
            id => {
                if let Some(field) = self.fields.get_mut(&id) {
                    field.delete_back();
                }
            }
        }
    }

    pub fn move_left(&mut self) {
        match self.active {
            FieldId::Visibility => self.draft.visibility = self.draft.visibility.toggle(),
            id => {
                if let Some(field) = self.fields.get_mut(&id) {
                    field.move_left();
                }
            }
        }
    }

    pub fn move_right(&mut self) {
        match self.active {
            FieldId::Visibility => self.draft.visibility = self.draft.visibility.toggle(),
            id => {
                if let Some(field) = self.fields.get_mut(&id) {
                    field.move_right();
                }
            }
        }
    }

    pub fn field_value(&self, id: FieldId) -> &str {
        match id {
            FieldId::Airport => self.airport.text(),
            FieldId::Callsign => self.aircraft.text(),
            FieldId::Visibility => self.draft.visibility.as_str(),
            id => self.fields.get(&id).map(|f| f.value.as_str()).unwrap_or(""),
        }
    }

    fn set_field(&mut self, id: FieldId, value: &str) {
        if let Some(field) = self.fields.get_mut(&id) {
            field.set(value);
        }
    }

    // ── Mouse ──────────────────────────────────────────────

    /// A left-button press at a screen cell.
    ///
    /// A press on a dropdown row commits the option drawn on that row, so it
    /// is resolved before any queued lookup result can replace the list.
    pub fn pointer_down(&mut self, x: u16, y: u16) {
        self.pointer.dispatch(PointerDown { x, y });

        if let Some(dropdown) = self.dropdown {
            if let Some(index) = dropdown.option_at(x, y) {
                match dropdown.field {
                    FieldId::Airport => self.airport.click_option(index),
                    FieldId::Callsign => self.aircraft.click_option(index),
                    _ => false,
                };
                self.drain_events();
                return;
            }
        }

        self.pump_controllers();

        let hit = self
            .field_rows
            .iter()
            .find(|(_, region)| region.contains(x, y))
            .map(|(id, _)| *id);
        if let Some(field) = hit {
            self.focus(field);
        }
    }

    pub fn pointer_moved(&mut self, x: u16, y: u16) {
        let Some(dropdown) = self.dropdown else {
            return;
        };
        if let Some(index) = dropdown.option_at(x, y) {
            match dropdown.field {
                FieldId::Airport => self.airport.hover_option(index),
                FieldId::Callsign => self.aircraft.hover_option(index),
                _ => {}
            }
        }
    }

    /// Record where a field and its dropdown were drawn this frame.
    pub fn set_field_bounds(&mut self, id: FieldId, input: Region, list: Option<Region>) {
        self.field_rows.insert(id, input);
        let bounds = Bounds {
            input: Some(input),
            list,
        };
        match id {
            FieldId::Airport => self.airport.set_bounds(bounds),
            FieldId::Callsign => self.aircraft.set_bounds(bounds),
            _ => {}
        }
    }

    // ── Events ─────────────────────────────────────────────

    /// Drain both autocomplete controllers and the app's own channel.
    pub fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
        self.pump_controllers();
        self.drain_events();
    }

    fn pump_controllers(&mut self) {
        self.airport.pump();
        self.aircraft.pump();
    }

    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_event(event);
        }
    }

    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::AirportSelected(code, airport) => self.on_airport_selected(code, airport),
            AppEvent::AircraftSelected(callsign, aircraft) => {
                self.on_aircraft_selected(callsign, aircraft)
            }
            AppEvent::Tick => self.tick(),
            AppEvent::Key(_) | AppEvent::Mouse(_) | AppEvent::Resize(..) => {}
        }
    }

    fn on_airport_selected(&mut self, code: String, airport: Option<Airport>) {
        tracing::info!(%code, "airport selected");
        self.draft.apply_airport(&code, airport.as_ref());
        self.airport.set_value(code.as_str());
        let location = self.draft.location_text.clone();
        self.set_field(FieldId::Location, &location);

        match airport {
            Some(airport) => {
                let source = AircraftLookup::near(Arc::clone(&self.client), airport);
                self.aircraft.set_source(Arc::new(source));
                self.aircraft.set_disabled(false);
            }
            None => self.aircraft.set_disabled(true),
        }
    }

    fn on_aircraft_selected(&mut self, callsign: String, aircraft: Option<Aircraft>) {
        tracing::info!(callsign = callsign.trim(), "aircraft selected");
        self.draft.apply_aircraft(&callsign, aircraft.as_ref());
        self.aircraft.set_value(self.draft.callsign.as_str());
        let filled = [
            (FieldId::Airline, self.draft.airline.clone()),
            (FieldId::Icao24, self.draft.icao24.clone()),
            (FieldId::Registration, self.draft.registration.clone()),
            (FieldId::AircraftModel, self.draft.aircraft_model.clone()),
        ];
        for (id, value) in filled {
            self.set_field(id, &value);
        }
    }

    // ── Submit / cancel ────────────────────────────────────

    fn sync_draft(&mut self) {
        let text = |fields: &HashMap<FieldId, FormField>, id: FieldId| {
            fields.get(&id).map(|f| f.value.clone()).unwrap_or_default()
        };
        self.draft.timestamp = text(&self.fields, FieldId::Timestamp);
        self.draft.location_text = text(&self.fields, FieldId::Location);
        self.draft.airline = text(&self.fields, FieldId::Airline);
        self.draft.icao24 = text(&self.fields, FieldId::Icao24);
        self.draft.registration = text(&self.fields, FieldId::Registration);
        self.draft.aircraft_model = text(&self.fields, FieldId::AircraftModel);
        self.draft.notes = text(&self.fields, FieldId::Notes);
    }

    pub fn submit(&mut self) {
        self.sync_draft();
        match self.draft.to_request() {
            Ok(request) => {
                tracing::info!(airport = %request.airport_iata_or_icao, "sighting submitted");
                self.outcome = Some(FormOutcome::Submitted(request));
                self.should_quit = true;
            }
            Err(e) => self.status_message = e.to_string(),
        }
    }

    pub fn cancel(&mut self) {
        self.outcome = Some(FormOutcome::Cancelled);
        self.should_quit = true;
    }

    pub fn visibility(&self) -> Visibility {
        self.draft.visibility
    }
}

fn selection_sender<T: 'static>(
    tx: &UnboundedSender<AppEvent>,
    wrap: fn(String, Option<T>) -> AppEvent,
) -> OnChange<T> {
    let tx = tx.clone();
    Box::new(move |value, data| {
        let _ = tx.send(wrap(value, data));
    })
}

fn without_last_char(text: &str) -> String {
    let mut text = text.to_string();
    text.pop();
    text
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use spotter_core::{AutocompleteOption, NavKey, source_fn};

    use super::*;

    fn test_app() -> SightingApp {
        let mut config = AppConfig::default();
        config.backend.base_url = "http://127.0.0.1:9".to_string();
        config.autocomplete.airport.debounce_ms = 100;
        SightingApp::new(&config).unwrap()
    }

    fn lisbon() -> Airport {
        Airport {
            icao: "LPPT".into(),
            iata: Some("LIS".into()),
            name: "Humberto Delgado".into(),
            city: "Lisbon".into(),
            country: "Portugal".into(),
            latitude: Some(38.78),
            longitude: Some(-9.13),
        }
    }

    #[tokio::test]
    async fn test_callsign_disabled_until_airport() {
        let mut app = test_app();
        assert!(app.aircraft.is_disabled());

        app.focus(FieldId::Callsign);
        app.insert_char('R');
        assert_eq!(app.aircraft.text(), "");

        app.apply_event(AppEvent::AirportSelected("LPPT".into(), Some(lisbon())));
        assert!(app.is_airport_chosen());
        assert_eq!(app.airport.text(), "LPPT");
        assert_eq!(app.field_value(FieldId::Location), "Lisbon, Portugal");

        app.insert_char('R');
        assert_eq!(app.aircraft.text(), "R");
    }

    #[tokio::test]
    async fn test_airport_without_data_keeps_callsign_disabled() {
        let mut app = test_app();
        app.apply_event(AppEvent::AirportSelected("LPPT".into(), None));
        assert!(!app.is_airport_chosen());
        assert_eq!(app.draft.airport_iata_or_icao, "LPPT");
    }

    #[tokio::test]
    async fn test_aircraft_selection_fills_fields() {
        let mut app = test_app();
        app.apply_event(AppEvent::AirportSelected("LPPT".into(), Some(lisbon())));
        let aircraft = Aircraft {
            icao24: "4ca7b4".into(),
            callsign: "RYR12AB ".into(),
            registration: Some("EI-DCL".into()),
            model: Some("737-8AS".into()),
            manufacturer: Some("Boeing".into()),
            operator: Some("Ryanair".into()),
            origin_country: None,
        };
        app.apply_event(AppEvent::AircraftSelected("RYR12AB ".into(), Some(aircraft)));

        assert_eq!(app.aircraft.text(), "RYR12AB");
        assert_eq!(app.field_value(FieldId::Registration), "EI-DCL");
        assert_eq!(app.field_value(FieldId::AircraftModel), "Boeing 737-8AS");
        assert_eq!(app.field_value(FieldId::Airline), "Ryanair");
    }

    #[tokio::test(start_paused = true)]
    async fn test_airport_pick_via_keyboard() {
        let mut app = test_app();
        app.airport.set_source(Arc::new(source_fn(|_query: String| async move {
            Ok::<_, anyhow::Error>(vec![
                AutocompleteOption::new("LPPT", "LIS / LPPT - Humberto Delgado")
                    .with_data(lisbon()),
            ])
        })));

        app.focus(FieldId::Airport);
        for c in "lis".chars() {
            app.insert_char(c);
        }
        tokio::time::sleep(Duration::from_millis(150)).await;
        app.tick();
        tokio::time::sleep(Duration::from_millis(10)).await;
        app.tick();
        assert!(app.airport.is_open());

        app.airport.key(NavKey::ArrowDown);
        app.airport.key(NavKey::Enter);
        app.drain_events();

        assert_eq!(app.draft.airport_iata_or_icao, "LPPT");
        assert!(app.is_airport_chosen());
    }

    #[tokio::test]
    async fn test_submit_requires_airport() {
        let mut app = test_app();
        app.submit();
        assert!(!app.should_quit);
        assert!(app.status_message.contains("airport"));
    }

    #[tokio::test]
    async fn test_submit_builds_request() {
        let mut app = test_app();
        app.apply_event(AppEvent::AirportSelected("LPPT".into(), Some(lisbon())));
        app.fields
            .get_mut(&FieldId::Timestamp)
            .unwrap()
            .set("2024-05-01T14:30");
        app.focus(FieldId::Notes);
        for c in "gear down".chars() {
            app.insert_char(c);
        }
        app.focus(FieldId::Visibility);
        app.insert_char(' ');
        app.submit();

        let Some(FormOutcome::Submitted(request)) = app.outcome.clone() else {
            panic!("expected a submitted form, got {:?}", app.outcome);
        };
        assert_eq!(request.airport_iata_or_icao, "LPPT");
        assert_eq!(request.notes.as_deref(), Some("gear down"));
        assert_eq!(request.visibility, Visibility::Private);
        assert!(app.should_quit);
    }

    #[test]
    fn test_dropdown_hit_testing() {
        let dropdown = DropdownArea {
            field: FieldId::Airport,
            area: Rect::new(10, 5, 30, 5),
            offset: 2,
            rows: 3,
        };
        assert_eq!(dropdown.option_at(12, 6), Some(2));
        assert_eq!(dropdown.option_at(12, 8), Some(4));
        assert_eq!(dropdown.option_at(12, 9), None);
        assert_eq!(dropdown.option_at(10, 6), None);
        assert_eq!(dropdown.option_at(12, 5), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_leaving_airport_field_closes_its_list() {
        let mut app = test_app();
        app.airport.set_source(Arc::new(source_fn(|_query: String| async move {
            Ok::<_, anyhow::Error>(vec![AutocompleteOption::new("LPPT", "LIS / LPPT")])
        })));
        app.focus(FieldId::Airport);
        app.insert_char('l');
        app.insert_char('p');
        tokio::time::sleep(Duration::from_millis(150)).await;
        app.tick();
        tokio::time::sleep(Duration::from_millis(10)).await;
        app.tick();
        assert!(app.airport.is_open());

        app.focus_next();
        assert!(!app.airport.is_open());

        app.focus_prev();
        assert_eq!(app.active, FieldId::Airport);
        assert!(app.airport.is_open());
    }

    #[tokio::test]
    async fn test_location_locked_while_airport_chosen() {
        let mut app = test_app();
        app.focus(FieldId::Location);
        app.insert_char('X');
        assert_eq!(app.field_value(FieldId::Location), "X");

        app.apply_event(AppEvent::AirportSelected("LPPT".into(), Some(lisbon())));
        assert!(app.is_read_only(FieldId::Location));
        app.focus(FieldId::Location);
        app.insert_char('X');
        app.delete_back();
        assert_eq!(app.field_value(FieldId::Location), "Lisbon, Portugal");

        app.apply_event(AppEvent::AirportSelected("LPPT".into(), None));
        assert!(!app.is_read_only(FieldId::Location));
    }
}
