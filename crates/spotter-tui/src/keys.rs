use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use spotter_core::{KeyResponse, NavKey};

use crate::app::SightingApp;
use crate::form::FieldId;

fn nav_key(code: KeyCode) -> Option<NavKey> {
    match code {
        KeyCode::Down => Some(NavKey::ArrowDown),
        KeyCode::Up => Some(NavKey::ArrowUp),
        KeyCode::Enter => Some(NavKey::Enter),
        KeyCode::Esc => Some(NavKey::Escape),
        _ => None,
    }
}

/// Offer a navigation key to the focused autocomplete first.
fn autocomplete_consumed(app: &mut SightingApp, code: KeyCode) -> bool {
    let Some(key) = nav_key(code) else {
        return false;
    };
    let response = match app.active {
        FieldId::Airport => app.airport.key(key),
        FieldId::Callsign => app.aircraft.key(key),
        _ => KeyResponse::Ignored,
    };
    response == KeyResponse::Consumed
}

pub fn handle_key(app: &mut SightingApp, code: KeyCode, modifiers: KeyModifiers) {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        app.cancel();
        return;
    }

    if autocomplete_consumed(app, code) {
        app.drain_events();
        return;
    }

    match code {
        KeyCode::Tab | KeyCode::Down => app.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.focus_prev(),
        KeyCode::Enter => app.submit(),
        KeyCode::Esc => app.cancel(),
        KeyCode::Backspace => app.delete_back(),
        KeyCode::Left => app.move_left(),
        KeyCode::Right => app.move_right(),
        KeyCode::Char(c) => app.insert_char(c),
        _ => {}
    }
}

pub fn handle_mouse(app: &mut SightingApp, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => app.pointer_down(mouse.column, mouse.row),
        MouseEventKind::Moved => app.pointer_moved(mouse.column, mouse.row),
        _ => {}
    }
}
