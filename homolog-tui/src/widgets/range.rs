//! Two-handle range slider drawn as a text track.

use crate::widgets::filter::format_bound;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct RangeSlider<'a> {
    pub label: &'a str,
    pub min: f64,
    pub max: f64,
    /// Current selection; `None` means the full domain with no filter applied.
    pub selection: Option<(f64, f64)>,
    pub style: Style,
    pub track_style: Style,
    pub border_style: Style,
}

impl<'a> RangeSlider<'a> {
    fn position(&self, value: f64, cells: usize) -> usize {
        let span = self.max - self.min;
        if span <= 0.0 || cells == 0 {
            return 0;
        }
        let ratio = ((value - self.min) / span).clamp(0.0, 1.0);
        ((ratio * (cells - 1) as f64).round() as usize).min(cells - 1)
    }

    /// Track of `cells` characters with `[` and `]` at the selected bounds.
    pub fn track(&self, cells: usize) -> String {
        if cells == 0 {
            return String::new();
        }
        let (lower, upper) = self.selection.unwrap_or((self.min, self.max));
        let lo = self.position(lower, cells);
        let hi = self.position(upper, cells).max(lo);
        (0..cells)
            .map(|i| {
                if i == lo {
                    '['
                } else if i == hi {
                    ']'
                } else if i > lo && i < hi {
                    '='
                } else {
                    '-'
                }
            })
            .collect()
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let inner_width = area.width.saturating_sub(2) as usize;
        let (lower, upper) = self.selection.unwrap_or((self.min, self.max));
        let values = format!("{} … {}", format_bound(lower), format_bound(upper));

        let lines = vec![
            Line::from(Span::styled(self.track(inner_width), self.track_style)),
            Line::from(Span::styled(values, self.style)),
        ];
        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .title(Span::styled(self.label, self.style))
                .borders(Borders::ALL)
                .border_style(self.border_style),
        );
        f.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slider(selection: Option<(f64, f64)>) -> RangeSlider<'static> {
        RangeSlider {
            label: "Score",
            min: 0.0,
            max: 100.0,
            selection,
            style: Style::default(),
            track_style: Style::default(),
            border_style: Style::default(),
        }
    }

    #[test]
    fn test_full_domain_track() {
        assert_eq!(slider(None).track(6), "[====]");
    }

    #[test]
    fn test_partial_selection_track() {
        assert_eq!(slider(Some((50.0, 100.0))).track(11), "-----[====]");
        assert_eq!(slider(Some((0.0, 0.0))).track(4), "[---");
    }

    #[test]
    fn test_zero_width_track() {
        assert_eq!(slider(None).track(0), "");
    }
}
