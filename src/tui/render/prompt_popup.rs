use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::centered_rect_fixed;
use crate::ops::lifecycle::Prompt;
use crate::tui::theme::Theme;
use crate::util::unicode::display_width;

const MAX_POPUP_W: u16 = 48;

/// Owned copy of a prompt, so it can be drawn while the session is borrowed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptView {
    pub title: String,
    pub message: String,
}

impl From<&Prompt<'_>> for PromptView {
    fn from(prompt: &Prompt<'_>) -> Self {
        PromptView {
            title: prompt.title().to_string(),
            message: prompt.message(),
        }
    }
}

/// Render a yes/no question over whatever is on screen
pub fn render_prompt(frame: &mut Frame, prompt: &PromptView, theme: &Theme, area: Rect) {
    let bg = theme.background;
    let text_style = Style::default().fg(theme.text_bright).bg(bg);
    let header_style = Style::default()
        .fg(theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let popup_w = MAX_POPUP_W.min(area.width.saturating_sub(2)).max(12);
    let inner_w = popup_w.saturating_sub(2).max(1) as usize;
    // Word wrap can leave up to a word's worth of slack per row
    let wrap_w = inner_w.saturating_sub(8).max(1);
    let message_rows = display_width(&prompt.message).div_ceil(wrap_w).max(1);

    let lines = vec![
        Line::from(Span::styled(prompt.message.clone(), text_style)),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "[y]",
                Style::default()
                    .fg(theme.start)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" Yes  ", text_style),
            Span::styled(
                "[n]",
                Style::default()
                    .fg(theme.close)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" No", text_style),
        ]),
    ];

    let popup_h = (message_rows as u16 + 4).min(area.height);
    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(format!(" {} ", prompt.title), header_style))
        .border_style(Style::default().fg(theme.highlight).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true })
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, overlay_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Task;
    use crate::ops::lifecycle::CompletionReason;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn completion_prompt_is_drawn_with_answers() {
        let task = Task::new("Write report").unwrap();
        let prompt = PromptView::from(&Prompt::Completion {
            task: &task,
            reason: CompletionReason::TimerExpired,
        });
        let theme = Theme::default();
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_prompt(frame, &prompt, &theme, area);
        });
        assert!(out.contains(" Task Completion "));
        assert!(out.contains("Time's up."));
        assert!(out.contains("report'?"));
        assert!(out.contains("[y] Yes  [n] No"));
    }

    #[test]
    fn exit_prompt() {
        let prompt = PromptView::from(&Prompt::Exit);
        assert_eq!(prompt.title, "Exit");
        let theme = Theme::default();
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_prompt(frame, &prompt, &theme, area);
        });
        assert!(out.contains(" Exit "));
        assert!(out.contains("[n] No"));
    }
}
