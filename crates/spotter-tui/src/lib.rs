pub mod app;
pub mod event;
pub mod form;
pub mod keys;
pub mod theme;
pub mod ui;

use std::io;

use anyhow::Result;
use crossterm::ExecutableCommand;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

pub use app::{FormOutcome, SightingApp};
use event::{AppEvent, EventHandler};

/// Run the new-sighting form until it is submitted or cancelled.
///
/// Must be called with a tokio runtime entered; the autocomplete timers and
/// lookups run on it while this thread drives the terminal.
pub fn run_tui(app: &mut SightingApp, tick_rate: std::time::Duration) -> Result<FormOutcome> {
    // Install panic hook
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = std::io::stdout().execute(DisableMouseCapture);
        let _ = std::io::stdout().execute(LeaveAlternateScreen);
        original_hook(info);
    }));

    // Setup terminal
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    io::stdout().execute(EnableMouseCapture)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let event_handler = EventHandler::new(tick_rate);
    let result = main_loop(&mut terminal, app, &event_handler);

    // Restore terminal
    disable_raw_mode()?;
    io::stdout().execute(DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    result?;

    Ok(app.outcome.clone().unwrap_or(FormOutcome::Cancelled))
}

fn main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut SightingApp,
    event_handler: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        match event_handler.next()? {
            AppEvent::Key(key) => keys::handle_key(app, key.code, key.modifiers),
            AppEvent::Mouse(mouse) => keys::handle_mouse(app, mouse),
            AppEvent::Resize(_, _) | AppEvent::Tick => {}
            other => app.apply_event(other),
        }
        app.tick();

        if app.should_quit {
            return Ok(());
        }
    }
}
