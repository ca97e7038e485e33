//! Active filter chips shown above the grid.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

#[derive(Debug, Clone)]
pub struct FilterChip {
    pub label: String,
    pub active: bool,
}

impl FilterChip {
    pub fn range(label: &str, bounds: Option<(f64, f64)>) -> Self {
        match bounds {
            Some((min, max)) => Self {
                label: format!("{} {}–{}", label, format_bound(min), format_bound(max)),
                active: true,
            },
            None => Self {
                label: label.to_string(),
                active: false,
            },
        }
    }
}

/// Whole numbers without a trailing `.0`, others to three significant decimals.
pub fn format_bound(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let text = format!("{:.3}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

pub struct FilterBar<'a> {
    pub title: &'a str,
    pub chips: &'a [FilterChip],
    pub active_style: Style,
    pub inactive_style: Style,
    pub border_style: Style,
}

impl<'a> FilterBar<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let spans: Vec<Span> = self
            .chips
            .iter()
            .filter(|chip| chip.active)
            .map(|chip| Span::styled(format!(" {} ", chip.label), self.active_style))
            .collect();

        let line = if spans.is_empty() {
            Line::from(Span::styled(" no filters ", self.inactive_style))
        } else {
            Line::from(spans)
        };

        let paragraph = Paragraph::new(line).block(
            Block::default()
                .title(self.title)
                .borders(Borders::ALL)
                .border_style(self.border_style),
        );
        f.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bound() {
        assert_eq!(format_bound(10.0), "10");
        assert_eq!(format_bound(0.5), "0.5");
        assert_eq!(format_bound(1e-5), "0");
        assert_eq!(format_bound(-3.25), "-3.25");
    }

    #[test]
    fn test_range_chip_labels() {
        let chip = FilterChip::range("Score", Some((10.0, 250.0)));
        assert!(chip.active);
        assert_eq!(chip.label, "Score 10–250");
        assert!(!FilterChip::range("Coverage", None).active);
    }
}
