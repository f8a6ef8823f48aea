use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::Line,
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub struct IndicatorWidget;

impl IndicatorWidget {
    /// Dots for each section with arrows above and below.
    /// Arrows dim when there is nowhere to go in that direction.
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        if area.height < 3 {
            return;
        }
        let theme = &app.theme;
        let snapshot = &app.snapshot;

        let arrow = |enabled: bool, glyph: &'static str| {
            let color = if enabled { theme.active } else { theme.inactive };
            Line::styled(glyph, Style::default().fg(color))
        };

        let room = (area.height - 2) as usize;
        let (first, count) = dot_window(snapshot.current_index, snapshot.section_count, room);

        let mut lines = Vec::with_capacity(area.height as usize);
        let padding = room.saturating_sub(count) / 2;
        lines.push(arrow(snapshot.can_retreat, "▲"));
        lines.extend(std::iter::repeat(Line::from("")).take(padding));
        for index in first..first + count {
            let line = if index == snapshot.current_index {
                Line::styled("●", Style::default().fg(theme.accent))
            } else {
                Line::styled("○", Style::default().fg(theme.grey0))
            };
            lines.push(line);
        }
        lines.extend(std::iter::repeat(Line::from("")).take(room - count - padding));
        lines.push(arrow(snapshot.can_advance, "▼"));

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().bg(theme.bg0));
        frame.render_widget(paragraph, area);
    }
}

/// Range of dots that fits in `room` rows while keeping the current one visible
fn dot_window(current: usize, total: usize, room: usize) -> (usize, usize) {
    if total <= room {
        return (0, total);
    }
    let first = current.saturating_sub(room / 2).min(total - room);
    (first, room)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_window() {
        assert_eq!(dot_window(0, 4, 10), (0, 4));
        assert_eq!(dot_window(0, 20, 5), (0, 5));
        assert_eq!(dot_window(10, 20, 5), (8, 5));
        assert_eq!(dot_window(19, 20, 5), (15, 5));
        assert_eq!(dot_window(0, 0, 5), (0, 0));
    }
}
