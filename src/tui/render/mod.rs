pub mod prompt_popup;
pub mod status_row;
pub mod tray_view;
pub mod widget_view;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::WidgetView;
use super::theme::Theme;
use crate::ops::lifecycle::Visibility;

pub use prompt_popup::PromptView;

/// Main render function: widget or tray, then any open prompt on top
pub fn render(frame: &mut Frame, view: &WidgetView, theme: &Theme, prompt: Option<&PromptView>) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    match view.visibility {
        Visibility::Visible => {
            // Layout: widget body | status row (1 row)
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(area);
            widget_view::render_widget_view(frame, view, theme, chunks[0]);
            status_row::render_status_row(frame, view, theme, chunks[1]);
        }
        Visibility::Minimized => tray_view::render_tray(frame, view, theme, area),
    }

    if let Some(prompt) = prompt {
        prompt_popup::render_prompt(frame, prompt, theme, area);
    }
}

/// Format seconds as HH:MM:SS
pub fn format_clock(seconds: u64) -> String {
    let hrs = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hrs, mins, secs)
}

pub(super) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}
