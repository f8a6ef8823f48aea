use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let snapshot = &app.snapshot;

        let status_text = if let Some(msg) = &app.status_message {
            msg.clone()
        } else {
            let position = if snapshot.section_count == 0 {
                " EMPTY".to_string()
            } else {
                format!(
                    " {}/{} {}",
                    snapshot.current_index + 1,
                    snapshot.section_count,
                    snapshot.current_identifier.as_deref().unwrap_or("")
                )
            };
            let state = if snapshot.is_animating { "MOVING" } else { "REST" };
            match &app.last_outcome {
                Some(outcome) => format!("{} | {} | {}", position, state, outcome),
                None => format!("{} | {}", position, state),
            }
        };

        let help_hint = " q:quit j/k:section g/G:ends 1-9:jump ";
        let padding_len = (area.width as usize)
            .saturating_sub(status_text.width() + help_hint.width());

        let status_color = if app.status_message.is_some() {
            theme.warning
        } else {
            theme.fg1
        };

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(status_color).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey2).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
