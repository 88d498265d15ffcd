use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::format_clock;
use crate::model::session::Phase;
use crate::tui::app::WidgetView;
use crate::tui::theme::Theme;
use crate::util::unicode::truncate_to_width;

const TASK_ROOM: usize = 32;

/// Render the minimized widget: a one-line tray entry plus its menu.
/// The session keeps running underneath.
pub fn render_tray(frame: &mut Frame, view: &WidgetView, theme: &Theme, area: Rect) {
    let bg = theme.background;
    let text_style = Style::default().fg(theme.text).bg(bg);
    let sep_style = Style::default().fg(theme.dim).bg(bg);

    let mut entry = vec![
        Span::styled("\u{25A0} ", Style::default().fg(theme.highlight).bg(bg)), // ■
        Span::styled(
            "focus",
            Style::default()
                .fg(theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    match (&view.task, view.phase) {
        (Some(task), Phase::Running | Phase::AwaitingCompletion) => {
            entry.push(Span::styled(" \u{2502} ", sep_style));
            entry.push(Span::styled(truncate_to_width(task, TASK_ROOM), text_style));
            entry.push(Span::styled(" \u{2502} ", sep_style));
            entry.push(Span::styled(
                format_clock(view.remaining_seconds),
                Style::default().fg(theme.clock).bg(bg),
            ));
        }
        (_, Phase::Selecting) => {
            entry.push(Span::styled(" \u{2502} ", sep_style));
            entry.push(Span::styled("picking a task\u{2026}", sep_style));
        }
        _ => {}
    }

    let menu = Line::from(vec![
        Span::styled("  ", text_style),
        Span::styled("[r]", Style::default().fg(theme.minimize).bg(bg)),
        Span::styled(" Restore  ", text_style),
        Span::styled("[x]", Style::default().fg(theme.close).bg(bg)),
        Span::styled(" Exit", text_style),
    ]);

    let paragraph = Paragraph::new(vec![Line::from(entry), menu]).style(text_style);
    frame.render_widget(paragraph, area);
}
