//! Load status indicator.

use homolog_query::ListQueryResult;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub struct StatusIndicator {
    pub status: String,
    pub style: Style,
}

impl StatusIndicator {
    pub fn for_result(result: &ListQueryResult, style: Style) -> Self {
        let status = if result.is_pending {
            "Loading…".to_string()
        } else if result.is_error {
            "Error".to_string()
        } else if result.is_fetching {
            "Refreshing…".to_string()
        } else {
            "Ready".to_string()
        };
        Self { status, style }
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            format!("● {}", self.status),
            self.style,
        )));
        f.render_widget(paragraph, area);
    }
}
