//! View rendering dispatch.

pub mod detail;
pub mod explorer;
pub mod filters;
pub mod grid;
pub mod preview;

use crate::keys::{FOOTER_HELP, HELP_LINES};
use crate::nav::Route;
use crate::state::App;
use crate::theme::{load_status_color, notification_color};
use crate::widgets::StatusIndicator;
use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub const PAGE_TITLE: &str = "Explore Homologs";
pub const PAGE_DESCRIPTION: &str = "Browse and analyze transcript homolog data from Phytozome";

/// Notifications older than this fall back to the help line.
const NOTIFICATION_TTL_SECS: i64 = 5;

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);

    match &app.route {
        Route::Explore => explorer::render(f, app, layout[1]),
        Route::Detail(id) => detail::render(f, app, id, layout[1]),
    }

    render_footer(f, app, layout[2]);

    if app.help_visible {
        render_help(f, app);
    }
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(false))
        .title(Span::styled(
            format!("{} | {} {}", PAGE_TITLE, app.route.title(), app.route.path()),
            Style::default()
                .fg(app.theme.primary)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(16)])
        .split(inner);

    let description =
        Paragraph::new(PAGE_DESCRIPTION).style(Style::default().fg(app.theme.text_dim));
    f.render_widget(description, columns[0]);

    let status = StatusIndicator::for_result(
        &app.result,
        Style::default().fg(load_status_color(&app.result, &app.theme)),
    );
    status.render(f, columns[1]);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let ttl = chrono::Duration::seconds(NOTIFICATION_TTL_SECS);
    let recent = app
        .latest_notification()
        .filter(|note| note.is_recent(Utc::now(), ttl));

    let (text, style) = if app.page.search_editing {
        (
            "type to search • Enter done • Esc done • Ctrl-u clear".to_string(),
            Style::default().fg(app.theme.tertiary),
        )
    } else if let Some(note) = recent {
        (
            format!("{}: {}", note.level.label(), note.message),
            Style::default().fg(notification_color(note.level, &app.theme)),
        )
    } else {
        (
            FOOTER_HELP.to_string(),
            Style::default().fg(app.theme.text_dim),
        )
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(style);
    f.render_widget(footer, area);
}

fn render_help(f: &mut Frame<'_>, app: &App) {
    let height = HELP_LINES.len() as u16 + 2;
    let area = centered(f.size(), 72, height);

    let lines: Vec<Line> = HELP_LINES
        .iter()
        .map(|(keys, description)| {
            Line::from(vec![
                Span::styled(
                    format!("{:<34}", keys),
                    Style::default().fg(app.theme.primary),
                ),
                Span::raw(*description),
            ])
        })
        .collect();

    let help = Paragraph::new(lines).block(
        Block::default()
            .title("Keys (any key closes)")
            .borders(Borders::ALL)
            .border_style(app.theme.border_style(true)),
    );
    f.render_widget(Clear, area);
    f.render_widget(help, area);
}

/// A `width` x `height` rect centred in `area`, shrunk to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
