//! The data grid with its loading, error, and paging states.

use crate::columns::{visible_columns, ColumnDef};
use crate::state::App;
use crate::widgets::FetchBar;
use homolog_core::HomologRecord;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

const SKELETON_CELL: &str = "░░░░░░";

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default()
        .title("Homologs")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(!app.page.search_editing));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.result.is_error {
        render_alert(f, app, inner);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    if app.result.is_fetching || app.result.is_pending {
        FetchBar {
            tick: app.tick,
            style: Style::default().fg(app.theme.primary),
        }
        .render(f, rows[0]);
    }

    if app.result.is_pending {
        render_skeleton(f, app, rows[1]);
    } else {
        render_table(f, app, rows[1]);
    }

    let footer = Paragraph::new(page_summary(app))
        .style(Style::default().fg(app.theme.text_dim));
    f.render_widget(footer, rows[2]);
}

fn render_alert(f: &mut Frame<'_>, app: &App, area: Rect) {
    let message = app
        .result
        .error
        .as_ref()
        .map(|err| err.message.clone())
        .unwrap_or_else(|| "Unknown error".to_string());
    let alert = Paragraph::new(vec![
        Line::from(Span::styled(
            "Failed to load homolog data",
            Style::default()
                .fg(app.theme.error)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(message),
        Line::default(),
        Line::from(Span::styled(
            "Ctrl-r to retry",
            Style::default().fg(app.theme.text_dim),
        )),
    ])
    .block(
        Block::default()
            .title("Error")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.error)),
    )
    .wrap(Wrap { trim: true });
    f.render_widget(alert, area);
}

fn render_skeleton(f: &mut Frame<'_>, app: &App, area: Rect) {
    let columns = visible_columns(app.page.first_column, area.width);
    let widths: Vec<Constraint> = columns.iter().map(|c| Constraint::Length(c.width)).collect();
    let header = Row::new(columns.iter().map(|c| Cell::from(c.header)))
        .style(Style::default().fg(app.theme.text_dim));
    let skeleton = (0..app.page.query_state.page_size()).map(|_| {
        Row::new(columns.iter().map(|_| Cell::from(SKELETON_CELL)))
            .style(Style::default().fg(app.theme.text_muted))
    });
    f.render_widget(Table::new(skeleton, widths).header(header), area);
}

fn render_table(f: &mut Frame<'_>, app: &App, area: Rect) {
    let columns = visible_columns(app.page.first_column, area.width);
    let widths: Vec<Constraint> = columns.iter().map(|c| Constraint::Length(c.width)).collect();
    let header = Row::new(columns.iter().map(|c| Cell::from(c.header))).style(
        Style::default()
            .fg(app.theme.primary)
            .add_modifier(Modifier::BOLD),
    );

    let visible = app.visible_rows();
    let preview_id = app.page.preview.as_ref().map(|record| &record.id);
    let rows = visible.iter().map(|record| {
        let style = if Some(&record.id) == preview_id {
            Style::default().fg(app.theme.secondary)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(
            columns
                .iter()
                .map(|column| Cell::from(cell_text(record, column))),
        )
        .style(style)
    });

    let table = Table::new(rows, widths)
        .header(header)
        .highlight_style(app.theme.highlight_style());

    let mut state = TableState::default();
    state.select(app.page.selected);
    f.render_stateful_widget(table, area, &mut state);
}

/// Numbers are right-aligned within the column.
fn cell_text(record: &HomologRecord, column: &ColumnDef) -> String {
    let value = record.display(column.field);
    if column.is_numeric() {
        format!("{:>width$}", value, width = usize::from(column.width))
    } else {
        value
    }
}

/// "Rows a–b of n · page x/y · size s", or a no-rows notice.
pub fn page_summary(app: &App) -> String {
    let total = app.total_rows();
    let state = &app.page.query_state;
    if app.result.is_pending {
        return format!("Loading… · size {}", state.page_size());
    }
    if total == 0 {
        return format!("No rows · size {}", state.page_size());
    }
    let first = state.offset() + 1;
    let last = (state.offset() + state.page_size()).min(total);
    format!(
        "Rows {}–{} of {} · page {}/{} · size {}",
        first,
        last,
        total,
        state.page() + 1,
        state.page_count(total),
        state.page_size()
    )
}
