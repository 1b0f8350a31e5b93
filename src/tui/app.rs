//! TUI application state and event handling.
//!
//! The `App` wraps a [`SearchSession`] and adds everything that only exists
//! on screen:
//!
//! - **Panels**: results (with preview and metrics) or saved history, toggled with Tab
//! - **Pull-to-refresh**: left-button drags in the results list feed a
//!   [`PullToRefresh`] gesture; releasing past the threshold re-runs the search
//! - **Status messages**: transient feedback for clipboard, export and search outcomes
//! - **Dirty state tracking**: redraw only when something changed
//!
//! Fetches run on the session's tokio runtime. The loop here never blocks on
//! them: each tick drains completed outcomes with [`SearchSession::poll`].

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::layout::{Position, Rect};
use ratatui::widgets::ListState;

use super::events::{Action, Pointer, poll_event};
use super::rendering::{RenderState, render_ui};
use crate::clipboard::{RepositoryLink, copy_repository_link};
use crate::export::{build_export, write_export};
use crate::gesture::{PullToRefresh, Release};
use crate::metrics::format_search_time;
use crate::search::SearchEvent;
use crate::search::SearchSession;
use crate::utils::format_path_with_tilde;

/// Duration for success status messages (milliseconds)
const STATUS_SUCCESS_DURATION_MS: u64 = 3000;
/// Duration for error status messages (milliseconds)
const STATUS_ERROR_DURATION_MS: u64 = 5000;
/// Gesture units per terminal row dragged
pub const ROW_UNITS: f64 = 20.0;
/// Typing stops here; validation reports anything over the query limit
const MAX_INPUT_CHARS: usize = 512;
const PAGE_SIZE: isize = 10;

/// Type of status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
}

/// Transient status message with expiry
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub message_type: MessageType,
    pub expires_at: Instant,
}

/// Which list occupies the left pane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Results,
    History,
}

pub struct App {
    session: SearchSession,
    panel: Panel,
    results_state: ListState,
    history_state: ListState,
    gesture: PullToRefresh,
    results_area: Rect,
    export_dir: PathBuf,
    should_quit: bool,
    status_message: Option<StatusMessage>,
    needs_redraw: bool,
    last_draw_time: Instant,
}

impl App {
    pub fn new(session: SearchSession, export_dir: PathBuf) -> Self {
        let history_state = ListState::default()
            .with_selected(if session.history().is_empty() { None } else { Some(0) });

        Self {
            session,
            panel: Panel::Results,
            results_state: ListState::default(),
            history_state,
            gesture: PullToRefresh::default(),
            results_area: Rect::default(),
            export_dir,
            should_quit: false,
            status_message: None,
            needs_redraw: true,
            last_draw_time: Instant::now(),
        }
    }

    /// Set a transient status message with automatic expiry
    fn set_status(&mut self, text: impl Into<String>, message_type: MessageType) {
        let duration_ms = match message_type {
            MessageType::Success => STATUS_SUCCESS_DURATION_MS,
            MessageType::Error => STATUS_ERROR_DURATION_MS,
        };
        self.status_message = Some(StatusMessage {
            text: text.into(),
            message_type,
            expires_at: Instant::now() + Duration::from_millis(duration_ms),
        });
        self.needs_redraw = true;
    }

    /// Check and clear expired status messages
    fn check_and_clear_expired_status(&mut self) {
        let should_clear = self
            .status_message
            .as_ref()
            .map(|msg| Instant::now() >= msg.expires_at)
            .unwrap_or(false);
        if should_clear {
            self.status_message = None;
            self.needs_redraw = true;
        }
    }

    /// Apply background search results and settle a finished refresh gesture
    fn tick(&mut self) {
        self.check_and_clear_expired_status();

        for event in self.session.poll() {
            self.on_search_event(event);
        }

        // A refresh can end by completing, failing or being superseded
        if self.gesture.is_refreshing() && !self.session.is_loading() {
            self.gesture.finish_refresh();
            self.needs_redraw = true;
        }

        self.sync_gesture_enabled();
    }

    /// Pulling needs results on screen and no search in flight
    fn sync_gesture_enabled(&mut self) {
        let enabled = !self.session.repositories().is_empty() && !self.session.is_loading();
        if enabled != self.gesture.config().enabled {
            self.gesture.set_enabled(enabled);
            self.needs_redraw = true;
        }
    }

    fn on_search_event(&mut self, event: SearchEvent) {
        match event {
            SearchEvent::Completed { count, search_time_ms, refreshed, .. } => {
                self.results_state = ListState::default().with_selected((count > 0).then_some(0));
                self.sync_history_selection();
                let verb = if refreshed { "Refreshed" } else { "Found" };
                self.set_status(
                    format!(
                        "✓ {} {} repositories in {}",
                        verb,
                        count,
                        format_search_time(search_time_ms)
                    ),
                    MessageType::Success,
                );
            }
            SearchEvent::Failed { message, .. } => {
                self.set_status(format!("✗ {}", message), MessageType::Error);
            }
        }
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            self.tick();

            // Draw if dirty or if it's been >100ms (spinner, terminal resize)
            let now = Instant::now();
            let elapsed = now.duration_since(self.last_draw_time);
            if self.needs_redraw || elapsed >= Duration::from_millis(100) {
                let mut results_area = self.results_area;
                let list_state = match self.panel {
                    Panel::Results => &mut self.results_state,
                    Panel::History => &mut self.history_state,
                };
                terminal.draw(|f| {
                    let state = RenderState {
                        session: &self.session,
                        panel: self.panel,
                        gesture: &self.gesture,
                        status_message: self.status_message.as_ref(),
                    };
                    results_area = render_ui(f, &state, list_state).results_area;
                })?;
                self.results_area = results_area;
                self.needs_redraw = false;
                self.last_draw_time = now;
            }

            let action = poll_event(Duration::from_millis(100))?;
            self.handle_action(action);
        }

        Ok(())
    }

    fn active_len(&self) -> usize {
        match self.panel {
            Panel::Results => self.session.repositories().len(),
            Panel::History => self.session.history().len(),
        }
    }

    fn active_state(&mut self) -> &mut ListState {
        match self.panel {
            Panel::Results => &mut self.results_state,
            Panel::History => &mut self.history_state,
        }
    }

    /// Handle a user action (extracted for testing)
    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ClearSearch => {
                if self.session.is_loading() {
                    self.session.cancel();
                    self.set_status("Search cancelled", MessageType::Success);
                } else if self.session.query().is_empty() {
                    self.should_quit = true;
                } else {
                    self.session.query_mut().clear();
                    self.needs_redraw = true;
                }
            }
            Action::MoveUp => self.move_selection(-1),
            Action::MoveDown => self.move_selection(1),
            Action::PageUp => self.move_selection(-PAGE_SIZE),
            Action::PageDown => self.move_selection(PAGE_SIZE),
            Action::UpdateSearch(c) => self.update_search(c),
            Action::DeleteChar => self.delete_char(),
            Action::Submit => match self.panel {
                Panel::Results => self.submit(),
                Panel::History => self.rerun_history_entry(),
            },
            Action::CopyUrl => self.copy_selected(RepositoryLink::Page),
            Action::CopyCloneUrl => self.copy_selected(RepositoryLink::Clone),
            Action::Export => self.export_results(),
            Action::ToggleMode => {
                let mode = self.session.toggle_mode();
                self.set_status(format!("Search mode: {}", mode), MessageType::Success);
            }
            Action::NextPanel => {
                self.panel = match self.panel {
                    Panel::Results => Panel::History,
                    Panel::History => Panel::Results,
                };
                self.needs_redraw = true;
            }
            Action::Refresh => self.refresh(),
            Action::DeleteHistoryEntry => self.delete_history_entry(),
            Action::ClearHistory => {
                if self.panel == Panel::History {
                    self.session.clear_history();
                    self.sync_history_selection();
                    self.set_status("✓ History cleared", MessageType::Success);
                }
            }
            Action::Pointer(pointer) => self.handle_pointer(pointer),
            Action::None => {}
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let total = self.active_len();
        let state = self.active_state();
        if total == 0 {
            state.select(None);
            return;
        }

        let old_idx = state.selected();
        let current = old_idx.unwrap_or(0) as isize;
        let new_idx = (current + delta).clamp(0, total as isize - 1) as usize;
        state.select(Some(new_idx));

        if old_idx != Some(new_idx) {
            self.needs_redraw = true;
        }
    }

    fn update_search(&mut self, c: char) {
        if self.session.query().chars().count() < MAX_INPUT_CHARS {
            self.session.query_mut().push(c);
            self.needs_redraw = true;
        }
    }

    fn delete_char(&mut self) {
        if self.session.query_mut().pop().is_some() {
            self.needs_redraw = true;
        }
    }

    fn submit(&mut self) {
        match self.session.submit() {
            Ok(_) => self.needs_redraw = true,
            Err(e) => self.set_status(format!("✗ {}", e), MessageType::Error),
        }
    }

    fn refresh(&mut self) {
        if self.session.refresh().is_none() {
            self.set_status("✗ Nothing to refresh yet", MessageType::Error);
        }
        self.needs_redraw = true;
    }

    fn rerun_history_entry(&mut self) {
        let Some(query) = self
            .history_state
            .selected()
            .and_then(|idx| self.session.history().get(idx))
            .map(|entry| entry.query.clone())
        else {
            return;
        };

        self.panel = Panel::Results;
        match self.session.search(&query) {
            Ok(_) => self.needs_redraw = true,
            Err(e) => self.set_status(format!("✗ {}", e), MessageType::Error),
        }
    }

    fn delete_history_entry(&mut self) {
        if self.panel != Panel::History {
            return;
        }
        let Some(id) = self
            .history_state
            .selected()
            .and_then(|idx| self.session.history().get(idx))
            .map(|entry| entry.id.clone())
        else {
            return;
        };

        if self.session.remove_history_entry(&id) {
            self.sync_history_selection();
            self.set_status("✓ Removed from history", MessageType::Success);
        }
    }

    /// Keep the history selection inside the (possibly shorter) list
    fn sync_history_selection(&mut self) {
        let len = self.session.history().len();
        let selected = match (len, self.history_state.selected()) {
            (0, _) => None,
            (_, Some(idx)) => Some(idx.min(len - 1)),
            (_, None) => Some(0),
        };
        self.history_state.select(selected);
        self.needs_redraw = true;
    }

    fn copy_selected(&mut self, link: RepositoryLink) {
        let repositories = self.session.repositories();
        let selected = self.results_state.selected().and_then(|idx| repositories.get(idx));

        let Some(repo) = selected else {
            self.set_status("✗ No repository selected", MessageType::Error);
            return;
        };

        match copy_repository_link(&repo.repository, link) {
            Ok(_) => self.set_status(format!("✓ Copied {}", link.label()), MessageType::Success),
            Err(e) => self.set_status(format!("✗ Clipboard error: {}", e), MessageType::Error),
        }
    }

    fn export_results(&mut self) {
        let repositories = self.session.repositories();
        let Some(query) = self.session.searched_query().filter(|_| !repositories.is_empty()) else {
            self.set_status("✗ No results to export", MessageType::Error);
            return;
        };

        let document = build_export(query, self.session.mode(), repositories, Utc::now());
        match write_export(&self.export_dir, &document) {
            Ok(path) => self.set_status(
                format!("✓ Exported to {}", format_path_with_tilde(&path)),
                MessageType::Success,
            ),
            Err(e) => {
                log::error!("Export failed: {:#}", e);
                self.set_status(format!("✗ Export failed: {}", e), MessageType::Error);
            }
        }
    }

    /// Drive the pull-to-refresh gesture from mouse input in the results list
    fn handle_pointer(&mut self, pointer: Pointer) {
        let scroll_offset = self.results_state.offset() as f64;

        match pointer {
            Pointer::Press { column, row } => {
                let inside = self.results_area.contains(Position { x: column, y: row });
                self.sync_gesture_enabled();
                if self.panel == Panel::Results && inside {
                    self.gesture.touch_start(f64::from(row) * ROW_UNITS, scroll_offset);
                }
            }
            Pointer::Drag { row } => {
                if self.gesture.is_pulling() {
                    self.gesture.touch_move(f64::from(row) * ROW_UNITS, scroll_offset);
                    self.needs_redraw = true;
                }
            }
            Pointer::Release => match self.gesture.release() {
                Release::Refresh => {
                    if self.session.refresh().is_none() {
                        self.gesture.finish_refresh();
                        self.set_status("✗ Nothing to refresh yet", MessageType::Error);
                    }
                    self.needs_redraw = true;
                }
                Release::Cancelled => self.needs_redraw = true,
                Release::Ignored => {}
            },
        }
    }
}
