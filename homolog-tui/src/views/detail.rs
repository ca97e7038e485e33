//! Detail route for a single record.

use crate::columns::HOMOLOG_COLUMNS;
use crate::state::App;
use crate::views::preview::record_title;
use crate::widgets::{DetailPanel, DetailSection};
use homolog_core::RecordId;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, id: &RecordId, area: Rect) {
    let back = Line::from(Span::styled(
        "Esc back to explorer",
        Style::default().fg(app.theme.text_dim),
    ));

    let Some(record) = app.detail_record() else {
        let missing = Paragraph::new(vec![
            Line::from(format!("Record {} is not loaded.", id)),
            Line::default(),
            back,
        ])
        .block(
            Block::default()
                .title(format!("Homolog {}", id))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.warning)),
        );
        f.render_widget(missing, area);
        return;
    };

    let fields = HOMOLOG_COLUMNS
        .iter()
        .map(|column| (column.header, record.display(column.field)))
        .collect();

    DetailPanel {
        title: format!("Homolog {}", record_title(record)),
        subtitle: record.hit_defline.clone(),
        sections: vec![DetailSection {
            heading: "All fields",
            fields,
        }],
        heading_style: Style::default().fg(app.theme.primary),
        label_style: Style::default().fg(app.theme.text_dim),
        border_style: app.theme.border_style(true),
        footer: Some(back),
    }
    .render(f, area);
}
