//! Preview panel for the selected row.

use crate::nav::Route;
use crate::state::App;
use crate::widgets::{DetailPanel, DetailSection};
use homolog_core::{HomologRecord, RecordField};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    Frame,
};

pub const QUERY_FIELDS: [(&str, RecordField); 3] = [
    ("Query Transcript", RecordField::QueryTranscriptName),
    ("Query Locus", RecordField::QueryLocusName),
    ("Query Identifier", RecordField::QueryIdentifier),
];

pub const HIT_FIELDS: [(&str, RecordField); 4] = [
    ("Hit Transcript", RecordField::HitTranscriptName),
    ("Hit Locus", RecordField::HitLocusName),
    ("Hit Identifier", RecordField::HitIdentifier),
    ("Hit Proteome", RecordField::HitProteome),
];

pub const ALIGNMENT_FIELDS: [(&str, RecordField); 6] = [
    ("Score", RecordField::Score),
    ("E-value", RecordField::Evalue),
    ("Identities", RecordField::Identities),
    ("Positives", RecordField::Positives),
    ("Coverage", RecordField::Coverage),
    ("Is Primary", RecordField::IsPrimary),
];

fn section<'a>(
    heading: &'a str,
    fields: &[(&'a str, RecordField)],
    record: &HomologRecord,
) -> DetailSection<'a> {
    DetailSection {
        heading,
        fields: fields
            .iter()
            .map(|(label, field)| (*label, record.display(*field)))
            .collect(),
    }
}

/// Title of a record: its query transcript, else its id.
pub fn record_title(record: &HomologRecord) -> String {
    record
        .query_transcript_name
        .clone()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| record.id.to_string())
}

pub fn render(f: &mut Frame<'_>, app: &App, record: &HomologRecord, area: Rect) {
    let link = Route::Detail(record.id.clone()).path();
    let panel = DetailPanel {
        title: format!("Preview: {}", record_title(record)),
        subtitle: record.hit_defline.clone(),
        sections: vec![
            section("Query Information", &QUERY_FIELDS, record),
            section("Hit Information", &HIT_FIELDS, record),
            section("Alignment Statistics", &ALIGNMENT_FIELDS, record),
        ],
        heading_style: Style::default().fg(app.theme.primary),
        label_style: Style::default().fg(app.theme.text_dim),
        border_style: app.theme.border_style(true),
        footer: Some(Line::from(vec![
            Span::styled(
                "View details [o]",
                Style::default()
                    .fg(app.theme.secondary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", link), Style::default().fg(app.theme.text_muted)),
        ])),
    };
    panel.render(f, area);
}
