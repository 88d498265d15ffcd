use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::model::session::Phase;
use crate::ops::lifecycle::Visibility;
use crate::tui::app::{Mode, WidgetView};

pub const TERM_W: u16 = 64;
pub const TERM_H: u16 = 12;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// A visible, idle widget with `task_count` tasks and a zeroed clock
pub fn idle_view(task_count: usize) -> WidgetView {
    WidgetView {
        visibility: Visibility::Visible,
        phase: Phase::Idle,
        task: None,
        remaining_seconds: 0,
        task_count,
        mode: Mode::Normal,
        input: String::new(),
        notice: None,
    }
}

/// A visible widget counting down on `task`
pub fn running_view(task: &str, remaining_seconds: u64) -> WidgetView {
    WidgetView {
        phase: Phase::Running,
        task: Some(task.to_string()),
        remaining_seconds,
        ..idle_view(3)
    }
}
