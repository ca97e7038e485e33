//! Filters panel: one range slider per configured filter.

use crate::state::App;
use crate::theme::filter_color;
use crate::widgets::RangeSlider;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

const SLIDER_HEIGHT: u16 = 4;

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default()
        .title("Filters [f]")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(false));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let configs = &app.page.filter_configs;
    if configs.is_empty() {
        return;
    }

    // Scroll so the focused slider stays on screen.
    let fits = (inner.height / SLIDER_HEIGHT).max(1) as usize;
    let first = app.page.focused_filter.saturating_sub(fits - 1);
    let shown = &configs[first..configs.len().min(first + fits)];

    let mut constraints: Vec<Constraint> = shown
        .iter()
        .map(|_| Constraint::Length(SLIDER_HEIGHT))
        .collect();
    constraints.push(Constraint::Min(0));
    let slots = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (offset, config) in shown.iter().enumerate() {
        let index = first + offset;
        let focused = index == app.page.focused_filter;
        let selection = app.page.filters.get(&config.field).map(|value| value.bounds());
        let color = filter_color(selection.is_some(), focused, &app.theme);

        RangeSlider {
            label: &config.label,
            min: config.filter_props.min,
            max: config.filter_props.max,
            selection,
            style: Style::default().fg(color),
            track_style: Style::default().fg(if selection.is_some() {
                app.theme.secondary
            } else {
                app.theme.text_muted
            }),
            border_style: app.theme.border_style(focused),
        }
        .render(f, slots[offset]);
    }
}
