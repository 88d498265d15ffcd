use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};

use crate::io::config_io::{DataPaths, read_config_or_default, resolve_data_dir};
use crate::io::watcher::{FileEvent, TaskFileWatcher};
use crate::model::session::Phase;
use crate::ops::app_state::AppState;
use crate::ops::lifecycle::{CloseOutcome, Lifecycle, LifecycleError, Notice, Prompter, Visibility};

use super::input;
use super::prompt::TerminalPrompter;
use super::render;
use super::theme::Theme;

/// Frame interval; worker events are drained once per frame
const FRAME: Duration = Duration::from_millis(50);

/// Current interaction mode of the visible widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    /// Typing a new task into the status row
    AddTask,
}

/// A user action forwarded to the lifecycle controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    StartWork,
    SubmitTask(String),
    Minimize,
    Restore,
    Close,
}

/// Main TUI application state
pub struct App {
    pub state: AppState,
    pub lifecycle: Lifecycle,
    pub mode: Mode,
    /// Add-task input buffer
    pub input: String,
    /// Most recent notice, shown in the status row until replaced
    pub notice: Option<Notice>,
    pub theme: Theme,
    pub should_quit: bool,
}

impl App {
    pub fn new(state: AppState, theme: Theme) -> Self {
        App {
            state,
            lifecycle: Lifecycle::new(),
            mode: Mode::Normal,
            input: String::new(),
            notice: None,
            theme,
            should_quit: false,
        }
    }

    /// Keep the last of `notices` for the status row
    pub fn push_notices(&mut self, notices: Vec<Notice>) {
        if let Some(last) = notices.into_iter().last() {
            self.notice = Some(last);
        }
    }

    /// Re-read the task document after a change on disk
    pub fn reload_tasks(&mut self) {
        if let Err(e) = self.state.store.reload() {
            self.notice = Some(Notice::Warning(format!("could not reload tasks: {}", e)));
        }
    }
}

/// Everything the renderer needs, copied out of `App`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetView {
    pub visibility: Visibility,
    pub phase: Phase,
    pub task: Option<String>,
    pub remaining_seconds: u64,
    pub task_count: usize,
    pub mode: Mode,
    pub input: String,
    pub notice: Option<Notice>,
}

impl WidgetView {
    pub fn from_app(app: &App) -> Self {
        let session = app.state.session.session();
        WidgetView {
            visibility: app.lifecycle.visibility(),
            phase: session.phase(),
            task: session.current_task().map(|t| t.label().to_string()),
            // Zero until a task is committed and the countdown starts
            remaining_seconds: session.remaining_seconds(),
            task_count: app.state.store.len(),
            mode: app.mode,
            input: app.input.clone(),
            notice: app.notice.clone(),
        }
    }
}

/// Hand one intent to the lifecycle controller
pub fn apply_intent(app: &mut App, intent: Intent, prompter: &mut dyn Prompter) {
    match intent {
        Intent::StartWork => {
            if let Err(e) = app.lifecycle.start_work(&mut app.state) {
                app.notice = Some(Notice::from(&e));
            }
        }
        Intent::SubmitTask(label) => {
            // A blank entry is dropped silently, like a canceled dialog
            if let Ok(notices) = app.lifecycle.add_task(&mut app.state, &label) {
                app.push_notices(notices);
            }
        }
        Intent::Minimize => app.lifecycle.minimize(),
        Intent::Restore => match app.lifecycle.restore() {
            Ok(()) => {}
            // Only the tray binds a restore key; a stray one changes nothing
            Err(LifecycleError::NotMinimized) => {}
        },
        Intent::Close => {
            let report = app.lifecycle.close(&mut app.state, prompter);
            app.push_notices(report.notices);
            if report.outcome == CloseOutcome::Exit {
                app.should_quit = true;
            }
        }
    }
}

/// Apply every pending worker event
pub fn pump_workers(app: &mut App, prompter: &mut dyn Prompter) {
    for event in app.state.poll_events() {
        let notices = app.lifecycle.dispatch(&mut app.state, event, prompter);
        app.push_notices(notices);
    }
}

/// Run the widget in the terminal
pub fn run(dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = resolve_data_dir(dir)?;
    let (config, config_error) = read_config_or_default(&data_dir);
    let paths = DataPaths::resolve(&data_dir, &config);

    let mut state = AppState::open(&paths, &config);
    let startup_notice = match (config_error, state.store.take_load_error()) {
        (_, Some(e)) => Some(Notice::Warning(format!("starting with an empty list: {}", e))),
        (Some(e), None) => Some(Notice::Warning(format!("using default settings: {}", e))),
        (None, None) => state.store.blank_entries_warning().map(Notice::Warning),
    };
    let mut app = App::new(state, Theme::from_config(&config.ui));
    app.notice = startup_notice;

    // The widget works without live reload if the watcher can't start
    let watcher = TaskFileWatcher::start(&paths.tasks).ok();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Run event loop
    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    watcher: Option<&TaskFileWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut read_event = event::read;
    loop {
        let view = WidgetView::from_app(app);
        terminal.draw(|frame| render::render(frame, &view, &app.theme, None))?;

        if event::poll(FRAME)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(intent) = input::handle_key(app, key)
        {
            let backdrop = WidgetView::from_app(app);
            let theme = app.theme.clone();
            let mut prompter = TerminalPrompter::new(terminal, backdrop, theme, &mut read_event);
            apply_intent(app, intent, &mut prompter);
        }

        if app.should_quit {
            break;
        }

        if let Some(FileEvent::TasksChanged) = watcher.and_then(|w| w.poll()) {
            app.reload_tasks();
        }

        // Prompts raised by worker events draw over what was last on screen
        let theme = app.theme.clone();
        let mut prompter = TerminalPrompter::new(terminal, view, theme, &mut read_event);
        pump_workers(app, &mut prompter);
    }
    Ok(())
}
