use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::format_clock;
use crate::model::session::Phase;
use crate::tui::app::WidgetView;
use crate::tui::theme::Theme;
use crate::util::unicode::{display_width, truncate_to_width};

const TASK_PREFIX: &str = "Your Task: ";

/// Render the full widget: task line, countdown, key hints, list size
pub fn render_widget_view(frame: &mut Frame, view: &WidgetView, theme: &Theme, area: Rect) {
    let bg = theme.background;
    let text_style = Style::default().fg(theme.text).bg(bg);
    let dim_style = Style::default().fg(theme.dim).bg(bg);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            " focus ",
            Style::default()
                .fg(theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(theme.border).bg(bg))
        .style(Style::default().bg(bg));
    let inner_width = area.width.saturating_sub(2) as usize;

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(""));
    lines.push(task_line(view, theme, inner_width));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format_clock(view.remaining_seconds),
        Style::default()
            .fg(theme.clock)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    lines.push(hint_line(view, theme));
    lines.push(Line::from(""));

    let count = match view.task_count {
        0 => "no tasks in the list".to_string(),
        1 => "1 task in the list".to_string(),
        n => format!("{} tasks in the list", n),
    };
    lines.push(Line::from(Span::styled(count, dim_style)));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .style(text_style);
    frame.render_widget(paragraph, area);
}

fn task_line<'a>(view: &WidgetView, theme: &Theme, width: usize) -> Line<'a> {
    let bg = theme.background;
    let Some(task) = &view.task else {
        return Line::from(vec![
            Span::styled("Press ", Style::default().fg(theme.text).bg(bg)),
            Span::styled("s", Style::default().fg(theme.start).bg(bg)),
            Span::styled(" to get a task", Style::default().fg(theme.text).bg(bg)),
        ]);
    };

    // The candidate flickers in the highlight color while the draw runs
    let task_style = match view.phase {
        Phase::Selecting => Style::default().fg(theme.highlight).bg(bg),
        _ => Style::default()
            .fg(theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    };
    let room = width.saturating_sub(display_width(TASK_PREFIX));
    Line::from(vec![
        Span::styled(TASK_PREFIX, Style::default().fg(theme.text).bg(bg)),
        Span::styled(truncate_to_width(task, room), task_style),
    ])
}

fn hint_line<'a>(view: &WidgetView, theme: &Theme) -> Line<'a> {
    let bg = theme.background;
    let mut hints = Vec::new();
    if view.phase == Phase::Idle {
        hints.push(("s", "Start Work", theme.start));
    }
    hints.push(("a", "Add Task", theme.add));
    hints.push(("m", "Minimize", theme.minimize));
    hints.push(("q", "Close", theme.close));

    let mut spans = Vec::new();
    for (i, (key, label, color)) in hints.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", Style::default().bg(bg)));
        }
        spans.push(Span::styled(
            format!("[{}]", key),
            Style::default().fg(color).bg(bg).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" {}", label),
            Style::default().fg(theme.text).bg(bg),
        ));
    }
    Line::from(spans)
}
