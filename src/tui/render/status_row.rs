use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{Mode, WidgetView};
use crate::tui::theme::Theme;
use crate::util::unicode::{display_width, truncate_to_width};

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, view: &WidgetView, theme: &Theme, area: Rect) {
    let bg = theme.background;
    let width = area.width as usize;

    let line = match view.mode {
        Mode::AddTask => {
            // Add prompt: + label▌
            let mut spans = vec![
                Span::styled(
                    format!("+ {}", view.input),
                    Style::default().fg(theme.text_bright).bg(bg),
                ),
                Span::styled("\u{258C}", Style::default().fg(theme.highlight).bg(bg)), // ▌ cursor
            ];
            let hint = "Enter add  Esc cancel";
            let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
            let hint_width = hint.chars().count();
            if content_width + hint_width < width {
                let padding = width - content_width - hint_width;
                spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
                spans.push(Span::styled(hint, Style::default().fg(theme.dim).bg(bg)));
            }
            Line::from(spans)
        }
        Mode::Normal => match &view.notice {
            Some(notice) => Line::from(Span::styled(
                truncate_to_width(notice.text(), width),
                Style::default().fg(theme.notice_color(notice)).bg(bg),
            )),
            None => Line::from(Span::styled(" ".repeat(width), Style::default().bg(bg))),
        },
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
