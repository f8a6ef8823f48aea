use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Padding, Paragraph},
    Frame,
};

use crate::app::App;

pub struct SectionViewWidget;

impl SectionViewWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let surface = app.surface();
        let deck = surface.deck();
        let theme = &app.theme;
        let total = deck.len();

        for slice in surface.visible_slices() {
            let Some(section) = deck.sections.get(slice.index) else {
                continue;
            };
            let rect = Rect {
                x: area.x,
                y: area.y + slice.top,
                width: area.width,
                height: slice.rows.min(area.height.saturating_sub(slice.top)),
            };
            if rect.height == 0 {
                continue;
            }

            let is_current = slice.index == app.snapshot.current_index;
            let marker_style = if is_current {
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.grey0)
            };

            let mut lines = vec![
                Line::from(vec![
                    Span::styled(format!("{:02}/{:02} ", slice.index + 1, total), marker_style),
                    Span::styled(
                        section.display_title(slice.index),
                        Style::default().fg(theme.grey2),
                    ),
                ]),
                Line::from(""),
            ];
            // Rows come pre-wrapped so they match the measured section height
            lines.extend(surface.body_rows(slice.index).into_iter().map(|row| {
                if row.heading {
                    Line::styled(
                        row.text,
                        Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Line::styled(row.text, Style::default().fg(theme.fg0))
                }
            }));

            let block = Block::default()
                .padding(Padding::horizontal(1))
                .style(Style::default().bg(theme.section_bg(slice.index)));

            let paragraph = Paragraph::new(lines)
                .block(block)
                .scroll((slice.skip, 0));

            frame.render_widget(paragraph, rect);
        }
    }
}
