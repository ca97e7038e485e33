//! The explore route: filters, search, grid, and preview.

use crate::state::App;
use crate::views::{filters, grid, preview};
use crate::widgets::{FilterBar, FilterChip};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const FILTERS_WIDTH: u16 = 36;
const PREVIEW_WIDTH: u16 = 44;

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let mut constraints = Vec::with_capacity(3);
    if app.page.show_filters {
        constraints.push(Constraint::Length(FILTERS_WIDTH));
    }
    constraints.push(Constraint::Min(0));
    if app.page.preview.is_some() {
        constraints.push(Constraint::Length(PREVIEW_WIDTH));
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    let mut next = 0;
    if app.page.show_filters {
        filters::render(f, app, chunks[next]);
        next += 1;
    }
    render_center(f, app, chunks[next]);
    next += 1;
    if let Some(record) = &app.page.preview {
        preview::render(f, app, record, chunks[next]);
    }
}

fn render_center(f: &mut Frame<'_>, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    render_search(f, app, rows[0]);

    let chips: Vec<FilterChip> = app
        .page
        .filter_configs
        .iter()
        .map(|config| {
            FilterChip::range(
                &config.label,
                app.page.filters.get(&config.field).map(|value| value.bounds()),
            )
        })
        .collect();
    FilterBar {
        title: "Active filters",
        chips: &chips,
        active_style: Style::default()
            .fg(app.theme.bg)
            .bg(app.theme.secondary),
        inactive_style: Style::default().fg(app.theme.text_muted),
        border_style: app.theme.border_style(false),
    }
    .render(f, rows[1]);

    grid::render(f, app, rows[2]);
}

fn render_search(f: &mut Frame<'_>, app: &App, area: Rect) {
    let editing = app.page.search_editing;
    let mut spans = vec![Span::styled(
        app.page.search_term.clone(),
        Style::default().fg(app.theme.text),
    )];
    if editing {
        spans.push(Span::styled("▏", Style::default().fg(app.theme.primary)));
    } else if app.page.search_term.is_empty() {
        spans = vec![Span::styled(
            "press / to search",
            Style::default().fg(app.theme.text_muted),
        )];
    }

    let search = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title("Search [/]")
            .borders(Borders::ALL)
            .border_style(app.theme.border_style(editing)),
    );
    f.render_widget(search, area);
}
