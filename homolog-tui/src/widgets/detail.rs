//! Sectioned field/value panel.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Shown in place of a missing value.
pub const EMPTY_VALUE: &str = "—";

pub struct DetailSection<'a> {
    pub heading: &'a str,
    pub fields: Vec<(&'a str, String)>,
}

pub struct DetailPanel<'a> {
    pub title: String,
    pub subtitle: Option<String>,
    pub sections: Vec<DetailSection<'a>>,
    pub heading_style: Style,
    pub label_style: Style,
    pub border_style: Style,
    /// Trailing hint, e.g. a key to follow a link.
    pub footer: Option<Line<'a>>,
}

impl<'a> DetailPanel<'a> {
    fn lines(&self) -> Vec<Line<'a>> {
        let mut lines = Vec::new();
        if let Some(subtitle) = &self.subtitle {
            lines.push(Line::from(Span::styled(
                subtitle.clone(),
                Style::default().add_modifier(Modifier::ITALIC),
            )));
        }
        for section in &self.sections {
            if !lines.is_empty() {
                lines.push(Line::default());
            }
            lines.push(Line::from(Span::styled(
                section.heading,
                self.heading_style.add_modifier(Modifier::BOLD),
            )));
            for (label, value) in &section.fields {
                let value = if value.is_empty() {
                    EMPTY_VALUE.to_string()
                } else {
                    value.clone()
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("{}: ", label), self.label_style),
                    Span::raw(value),
                ]));
            }
        }
        if let Some(footer) = &self.footer {
            lines.push(Line::default());
            lines.push(footer.clone());
        }
        lines
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let widget = Paragraph::new(Text::from(self.lines()))
            .block(
                Block::default()
                    .title(self.title.as_str())
                    .borders(Borders::ALL)
                    .border_style(self.border_style),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(widget, area);
    }
}
