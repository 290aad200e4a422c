pub mod dashboard;

use anyhow::Result;
use chrono::Local;
use crossterm::event::{Event, KeyEventKind};
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::{Frame, Terminal};
use tokio::sync::watch;

use crate::input::{parse_main_command, UiCommand};
use crate::market::state::{RefreshState, RefreshStatus, RenderView};
use crate::market::{RefreshRequest, Refresher};

use dashboard::{ErrorBanner, KeybindBar, LogPanel, MarketBoard, StatusBar};

const MAX_LOG_MESSAGES: usize = 200;

pub struct AppState {
    pub view: RenderView,
    /// Showing an older reading because the latest cycle failed.
    pub stale: bool,
    pub log_messages: Vec<String>,
}

impl AppState {
    pub fn new(view: RenderView) -> Self {
        Self {
            view,
            stale: false,
            log_messages: Vec::new(),
        }
    }

    pub fn push_log(&mut self, msg: String) {
        self.log_messages.push(msg);
        if self.log_messages.len() > MAX_LOG_MESSAGES {
            self.log_messages.remove(0);
        }
    }

    pub fn is_loading(&self) -> bool {
        self.view.status == RefreshStatus::Loading
    }

    /// Swap in a fresh view, logging cycle outcomes.
    pub fn apply_view(&mut self, view: RenderView, stale: bool) {
        let previous = self.view.status;
        if previous != view.status {
            match view.status {
                RefreshStatus::Ok => self.push_log(format!(
                    "{} | {} assets",
                    view.updated_label,
                    view.snapshots.len()
                )),
                RefreshStatus::Error => {
                    if let Some(msg) = &view.error_message {
                        self.push_log(msg.clone());
                    }
                }
                RefreshStatus::Idle | RefreshStatus::Loading => {}
            }
        }
        self.view = view;
        self.stale = stale;
    }
}

/// Draw/input loop. `next_event` waits briefly for terminal input.
///
/// Returns on quit or once shutdown is signalled. Draw and input errors are
/// returned to the caller, which still owns terminal restore.
pub fn run_board<B, E>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    refresher: &Refresher,
    state_rx: &mut watch::Receiver<RefreshState>,
    shutdown_tx: &watch::Sender<bool>,
    mut next_event: E,
) -> Result<()>
where
    B: Backend,
    E: FnMut() -> std::io::Result<Option<Event>>,
{
    loop {
        if state_rx.has_changed().unwrap_or(false) {
            let state = state_rx.borrow_and_update().clone();
            app_state.apply_view(state.render_view(&Local), state.is_stale());
        }

        terminal.draw(|frame| render(frame, app_state))?;

        if let Some(Event::Key(key)) = next_event()? {
            if key.kind == KeyEventKind::Press {
                match parse_main_command(&key.code) {
                    Some(UiCommand::Quit) => {
                        tracing::info!("User quit");
                        let _ = shutdown_tx.send(true);
                        return Ok(());
                    }
                    Some(UiCommand::Refresh) => match refresher.request_refresh() {
                        RefreshRequest::Accepted => {
                            app_state.push_log("Manual refresh requested".to_string())
                        }
                        RefreshRequest::InFlight => {
                            app_state.push_log("Refresh already running".to_string())
                        }
                        RefreshRequest::Stopped => {
                            app_state.push_log("Market feed is stopped".to_string())
                        }
                    },
                    None => {}
                }
            }
        }

        if *shutdown_tx.borrow() {
            return Ok(());
        }
    }
}

pub fn render(frame: &mut Frame, state: &AppState) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(1), // error banner
            Constraint::Min(8),    // market board
            Constraint::Length(5), // log
            Constraint::Length(1), // keybinds
        ])
        .split(frame.area());

    frame.render_widget(
        StatusBar {
            status: state.view.status,
            updated_label: &state.view.updated_label,
            asset_count: state.view.snapshots.len(),
        },
        outer[0],
    );

    frame.render_widget(
        ErrorBanner {
            message: state.view.error_message.as_deref(),
        },
        outer[1],
    );

    frame.render_widget(MarketBoard::new(&state.view.snapshots, state.stale), outer[2]);

    frame.render_widget(LogPanel::new(&state.log_messages), outer[3]);

    frame.render_widget(
        KeybindBar {
            loading: state.is_loading(),
        },
        outer[4],
    );
}
