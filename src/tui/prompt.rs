use std::io;

use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::Backend;

use super::app::WidgetView;
use super::render::{self, PromptView};
use super::theme::Theme;
use crate::ops::lifecycle::{Prompt, Prompter};

/// Modal yes/no prompt drawn over the widget.
///
/// `confirm` runs its own key loop and returns only once the user answers.
/// Worker events queue on the channel in the meantime.
pub struct TerminalPrompter<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
    backdrop: WidgetView,
    theme: Theme,
    read_event: &'a mut dyn FnMut() -> io::Result<Event>,
}

impl<'a, B: Backend> TerminalPrompter<'a, B> {
    pub fn new(
        terminal: &'a mut Terminal<B>,
        backdrop: WidgetView,
        theme: Theme,
        read_event: &'a mut dyn FnMut() -> io::Result<Event>,
    ) -> Self {
        TerminalPrompter {
            terminal,
            backdrop,
            theme,
            read_event,
        }
    }
}

impl<B: Backend> Prompter for TerminalPrompter<'_, B> {
    fn confirm(&mut self, prompt: &Prompt<'_>) -> bool {
        let view = PromptView::from(prompt);
        loop {
            let drawn = self.terminal.draw(|frame| {
                render::render(frame, &self.backdrop, &self.theme, Some(&view))
            });
            // A terminal we can't draw to can't be answered; treat it as "no"
            if drawn.is_err() {
                return false;
            }

            match (self.read_event)() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => return true,
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => return false,
                    _ => {}
                },
                Ok(_) => {}
                Err(_) => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Task;
    use crate::ops::lifecycle::CompletionReason;
    use crate::tui::render::test_helpers::{TERM_H, TERM_W, running_view};
    use crossterm::event::{KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use std::collections::VecDeque;

    fn key(c: char) -> io::Result<Event> {
        Ok(Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)))
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        buf.content.iter().map(|cell| cell.symbol()).collect()
    }

    fn answer(events: Vec<io::Result<Event>>, prompt: &Prompt<'_>) -> (bool, String) {
        let mut terminal = Terminal::new(TestBackend::new(TERM_W, TERM_H)).unwrap();
        let mut events: VecDeque<_> = events.into();
        let mut read = || {
            events
                .pop_front()
                .unwrap_or_else(|| Err(io::Error::other("no more input")))
        };
        let answer = {
            let mut prompter = TerminalPrompter::new(
                &mut terminal,
                running_view("Write report", 0),
                Theme::default(),
                &mut read,
            );
            prompter.confirm(prompt)
        };
        (answer, screen(&terminal))
    }

    #[test]
    fn other_keys_are_ignored_until_yes() {
        let task = Task::new("Write report").unwrap();
        let prompt = Prompt::Completion {
            task: &task,
            reason: CompletionReason::TimerExpired,
        };
        let (answer, screen) = answer(vec![key('s'), key('q'), key('y')], &prompt);
        assert!(answer);
        assert!(screen.contains("Task Completion"));
        // The widget stays visible behind the popup
        assert!(screen.contains("Your Task: Write report"));
    }

    #[test]
    fn no_answers_false() {
        let (answer, _) = answer(vec![key('n')], &Prompt::Exit);
        assert!(!answer);
    }

    #[test]
    fn input_error_answers_false() {
        let (answer, screen) = answer(vec![], &Prompt::Exit);
        assert!(!answer);
        assert!(screen.contains("Exit"));
    }
}
