use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Intent, Mode};
use crate::model::session::Phase;
use crate::ops::lifecycle::Visibility;
use crate::util::unicode::pop_grapheme;

/// Handle a key press. Returns the intent to hand to the lifecycle
/// controller, if the key produced one.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Option<Intent> {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return None;
    }

    // Ctrl+C closes from anywhere, through the usual prompts
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.mode = Mode::Normal;
        app.input.clear();
        return Some(Intent::Close);
    }

    match app.lifecycle.visibility() {
        Visibility::Minimized => handle_tray(key),
        Visibility::Visible => match app.mode {
            Mode::Normal => handle_normal(app, key),
            Mode::AddTask => handle_add_task(app, key),
        },
    }
}

fn handle_tray(key: KeyEvent) -> Option<Intent> {
    match key.code {
        KeyCode::Char('r') | KeyCode::Enter => Some(Intent::Restore),
        KeyCode::Char('x') | KeyCode::Char('q') => Some(Intent::Close),
        _ => None,
    }
}

fn handle_normal(app: &mut App, key: KeyEvent) -> Option<Intent> {
    match key.code {
        // The start key is only offered while Idle
        KeyCode::Char('s') if app.state.session.phase() == Phase::Idle => Some(Intent::StartWork),
        KeyCode::Char('a') => {
            app.mode = Mode::AddTask;
            app.input.clear();
            None
        }
        KeyCode::Char('m') => Some(Intent::Minimize),
        KeyCode::Char('q') | KeyCode::Esc => Some(Intent::Close),
        _ => None,
    }
}

fn handle_add_task(app: &mut App, key: KeyEvent) -> Option<Intent> {
    match (key.modifiers, key.code) {
        (_, KeyCode::Enter) => {
            app.mode = Mode::Normal;
            Some(Intent::SubmitTask(std::mem::take(&mut app.input)))
        }
        (_, KeyCode::Esc) => {
            app.mode = Mode::Normal;
            app.input.clear();
            None
        }
        (_, KeyCode::Backspace) => {
            pop_grapheme(&mut app.input);
            None
        }
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            app.input.push(c);
            None
        }
        _ => None,
    }
}
