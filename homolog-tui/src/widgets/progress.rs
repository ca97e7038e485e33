//! Indeterminate fetch indicator.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const SEGMENT: usize = 8;

pub struct FetchBar {
    pub tick: u64,
    pub style: Style,
}

impl FetchBar {
    /// A segment that sweeps across `width` cells as `tick` advances.
    pub fn bar(&self, width: usize) -> String {
        if width == 0 {
            return String::new();
        }
        let segment = SEGMENT.min(width);
        let travel = width - segment + 1;
        let start = (self.tick as usize) % travel;
        (0..width)
            .map(|i| if i >= start && i < start + segment { '━' } else { ' ' })
            .collect()
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let line = Line::from(Span::styled(self.bar(area.width as usize), self.style));
        f.render_widget(Paragraph::new(line), area);
    }
}
