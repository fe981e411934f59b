use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};
use spotter_core::autocomplete::Region;
use spotter_core::{Autocomplete, AutocompleteOption};

use crate::app::{DropdownArea, SightingApp};
use crate::form::FieldId;
use crate::theme::NordTheme;

const LABEL_WIDTH: u16 = 18;
const MAX_DROPDOWN_ROWS: usize = 6;
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Draw the form and report every field's (and the open dropdown's)
/// screen area back to the app.
pub fn render(frame: &mut Frame, app: &mut SightingApp) {
    let area = centered_rect(70, 80, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" New Sighting ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.frost_dark()))
        .style(Style::default().bg(app.theme.bg()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(inner);

    let mut lines = Vec::new();
    for (row, id) in FieldId::ORDER.into_iter().enumerate() {
        lines.push(field_line(app, id));

        let y = chunks[0].y + row as u16;
        if y < chunks[0].y + chunks[0].height {
            let region = Region::new(chunks[0].x, y, chunks[0].width, 1);
            app.set_field_bounds(id, region, None);
        }
    }
    frame.render_widget(Paragraph::new(lines), chunks[0]);

    render_footer(frame, app, chunks[1]);

    app.dropdown = None;
    match app.active {
        FieldId::Airport => render_dropdown(frame, app, FieldId::Airport, chunks[0]),
        FieldId::Callsign => render_dropdown(frame, app, FieldId::Callsign, chunks[0]),
        _ => {}
    }
}

fn field_line(app: &SightingApp, id: FieldId) -> Line<'static> {
    let theme = &app.theme;
    let is_active = app.active == id;

    let label_style = if is_active {
        Style::default().fg(theme.frost_ice()).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.muted())
    };
    let indicator = if is_active { "▶ " } else { "  " };

    let (required, disabled, loading, placeholder) = match id {
        FieldId::Airport => autocomplete_flags(&app.airport),
        FieldId::Callsign => autocomplete_flags(&app.aircraft),
        FieldId::Timestamp => (true, false, false, String::new()),
        _ => (false, false, false, String::new()),
    };

    let label = if required {
        format!("{}*", id.label())
    } else {
        id.label().to_string()
    };

    let value = app.field_value(id);
    let (text, value_style) = if app.is_read_only(id) {
        (
            format!("{value} (from airport)"),
            Style::default().fg(theme.muted()),
        )
    } else if disabled {
        (
            "(select an airport first)".to_string(),
            Style::default().fg(theme.muted()).add_modifier(Modifier::DIM),
        )
    } else if is_active {
        let text = match app.fields.get(&id) {
            Some(field) => field.with_caret(),
            None if id == FieldId::Visibility => format!("◀ {value} ▶"),
            None => format!("{value}█"),
        };
        (text, Style::default().fg(theme.fg_bright()))
    } else if value.is_empty() && !placeholder.is_empty() {
        (placeholder, Style::default().fg(theme.muted()))
    } else if value.is_empty() {
        ("─".to_string(), Style::default().fg(theme.muted()))
    } else {
        (value.to_string(), Style::default().fg(theme.fg()))
    };

    let mut spans = vec![
        Span::styled(indicator, Style::default().fg(theme.frost_ice())),
        Span::styled(
            format!("{label:<width$}", width = usize::from(LABEL_WIDTH) - 2),
            label_style,
        ),
        Span::styled(text, value_style),
    ];
    if loading {
        let frame = SPINNER[(app.tick_count as usize) % SPINNER.len()];
        spans.push(Span::styled(format!(" {frame}"), Style::default().fg(theme.yellow())));
    }
    Line::from(spans)
}

fn autocomplete_flags<T>(ctl: &Autocomplete<T>) -> (bool, bool, bool, String)
where
    T: Clone + Send + 'static,
{
    let props = ctl.props();
    (
        props.required,
        ctl.is_disabled(),
        ctl.is_loading(),
        props.placeholder.clone(),
    )
}

fn render_dropdown(frame: &mut Frame, app: &mut SightingApp, field: FieldId, form_area: Rect) {
    let Some(row) = FieldId::ORDER.iter().position(|f| *f == field) else {
        return;
    };
    let input_y = form_area.y + row as u16;
    let input = Region::new(form_area.x, input_y, form_area.width, 1);

    // Keep one column clear of the form border.
    let x = form_area.x + LABEL_WIDTH;
    let width = form_area.width.saturating_sub(LABEL_WIDTH + 1);
    let text_width = usize::from(width.saturating_sub(2));

    let (items, offset, rows) = {
        let (options, highlighted, open) = match field {
            FieldId::Callsign => dropdown_items(&app.aircraft, &app.theme, text_width),
            _ => dropdown_items(&app.airport, &app.theme, text_width),
        };
        if !open {
            return;
        }
        let offset = highlighted
            .map(|h| h.saturating_sub(MAX_DROPDOWN_ROWS - 1))
            .unwrap_or(0);
        let rows = options.len().saturating_sub(offset).min(MAX_DROPDOWN_ROWS);
        let items: Vec<ListItem> = options.into_iter().skip(offset).take(rows).collect();
        (items, offset, rows)
    };

    let frame_area = frame.area();
    let y = input_y + 1;
    let height = (rows as u16 + 2).min(frame_area.height.saturating_sub(y));
    let rows = rows.min(usize::from(height.saturating_sub(2)));
    let area = Rect {
        x,
        y,
        width: width.min(frame_area.width.saturating_sub(x)),
        height,
    };
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.green()))
        .style(Style::default().bg(app.theme.bg_secondary()));
    frame.render_widget(List::new(items).block(block), area);

    let list = Region::new(area.x, area.y, area.width, area.height);
    app.set_field_bounds(field, input, Some(list));
    app.dropdown = Some(DropdownArea {
        field,
        area,
        offset,
        rows,
    });
}

fn dropdown_items<T>(
    ctl: &Autocomplete<T>,
    theme: &NordTheme,
    width: usize,
) -> (Vec<ListItem<'static>>, Option<usize>, bool)
where
    T: Clone + Send + 'static,
{
    let highlighted = ctl.highlighted_index();
    let items = ctl
        .options()
        .iter()
        .enumerate()
        .map(|(i, option)| option_item(option, highlighted == Some(i), theme, width))
        .collect();
    (items, highlighted, ctl.is_open())
}

/// Shorten the label first so the sublabel stays readable. The sublabel
/// is dropped only when the label would be left with almost nothing.
fn fit_option_text(label: &str, sublabel: Option<&str>, width: usize) -> (String, Option<String>) {
    let label = format!(" {label} ");
    let sublabel = sublabel.map(|s| format!(" {s} "));
    let sub_len = sublabel.as_deref().map_or(0, |s| s.chars().count());
    let label_len = label.chars().count();

    if label_len + sub_len <= width {
        return (label, sublabel);
    }
    let room = width.saturating_sub(sub_len);
    if sublabel.is_some() && room >= 8 {
        (truncate(&label, room), sublabel)
    } else {
        (truncate(&label, width), None)
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn option_item<T>(
    option: &AutocompleteOption<T>,
    selected: bool,
    theme: &NordTheme,
    width: usize,
) -> ListItem<'static> {
    let (label_style, sub_style) = if selected {
        let base = Style::default().bg(theme.green()).fg(theme.bg());
        (base.add_modifier(Modifier::BOLD), base)
    } else {
        (
            Style::default().fg(theme.fg()),
            Style::default().fg(theme.muted()),
        )
    };
    let (label, sublabel) = fit_option_text(&option.label, option.sublabel.as_deref(), width);
    let mut spans = vec![Span::styled(label, label_style)];
    if let Some(sublabel) = sublabel {
        spans.push(Span::styled(sublabel, sub_style));
    }
    ListItem::new(Line::from(spans))
}

fn render_footer(frame: &mut Frame, app: &SightingApp, area: Rect) {
    let status = if app.status_message.is_empty() {
        Line::from("")
    } else {
        Line::from(Span::styled(
            format!("  {}", app.status_message),
            Style::default().fg(app.theme.red()),
        ))
    };
    let help = Line::from(Span::styled(
        "  Tab: next field  ↑↓: choose  Enter: select/submit  Esc: close/cancel",
        Style::default().fg(app.theme.muted()).add_modifier(Modifier::DIM),
    ));
    frame.render_widget(Paragraph::new(vec![status, help]), area);
}

/// Helper to create a centered rect using a percentage of the available area.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
