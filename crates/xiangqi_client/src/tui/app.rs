//! Application state and key handling.

use crossterm::event::KeyCode;
use tracing::{debug, info, instrument};
use xiangqi_core::Position;

use super::input::move_cursor;
use crate::controller::{
    Completion, InteractionController, InteractionState, Notice, Resolution, Ticket,
};

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Nothing beyond a redraw.
    None,
    /// Execute this ticket in the background.
    Dispatch(Ticket),
    /// Leave the TUI.
    Quit,
}

/// Main application state.
#[derive(Debug)]
pub struct App {
    controller: InteractionController,
    cursor: Position,
    notice: Option<Notice>,
    status_message: String,
}

impl App {
    /// Creates the application around `controller`, cursor on red's side.
    pub fn new(controller: InteractionController) -> Self {
        Self {
            controller,
            cursor: Position::new(4, 9),
            notice: None,
            status_message: "Loading board...".to_string(),
        }
    }

    /// Gets the interaction controller.
    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// Gets the cursor position.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Gets the notice awaiting acknowledgement.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Gets the transient status line.
    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Issues the initial board fetch.
    pub fn refresh(&self) -> Ticket {
        self.controller.refresh()
    }

    /// Handles one key press.
    ///
    /// While a notice is showing, any key dismisses it and does nothing else.
    #[instrument(skip(self), fields(state = self.controller.state().name(), cursor = %self.cursor))]
    pub fn handle_key(&mut self, key: KeyCode) -> Action {
        if let Some(notice) = self.notice.take() {
            debug!(%notice, "Notice dismissed");
            self.notice = self.controller.take_notice();
            return Action::None;
        }

        match key {
            KeyCode::Char('q') => {
                info!("User quit");
                Action::Quit
            }
            KeyCode::Char('r') => {
                self.status_message = "Resetting...".to_string();
                Action::Dispatch(self.controller.reset())
            }
            KeyCode::Char('u') => {
                self.status_message = "Undoing...".to_string();
                Action::Dispatch(self.controller.undo())
            }
            KeyCode::Esc => {
                self.controller.clear_candidates();
                Action::None
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(),
            KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down => {
                self.cursor = move_cursor(self.cursor, key);
                Action::None
            }
            _ => Action::None,
        }
    }

    /// Feeds a finished request back into the controller.
    #[instrument(skip_all, fields(request = ?completion.ticket().request()))]
    pub fn complete(&mut self, completion: Completion) -> Resolution {
        let failure = completion.outcome().as_ref().err().map(ToString::to_string);
        let resolution = self.controller.complete(completion);
        match resolution {
            Resolution::Applied => self.status_message.clear(),
            Resolution::Failed => {
                self.status_message =
                    failure.unwrap_or_else(|| "Backend sent an unusable reply".to_string());
            }
            Resolution::Stale => {}
        }
        if self.notice.is_none() {
            self.notice = self.controller.take_notice();
        }
        resolution
    }

    /// Select, re-select or drop at the cursor.
    fn activate(&mut self) -> Action {
        let cursor = self.cursor;
        let state = self.controller.state();
        let armed = matches!(state, InteractionState::Armed { .. });
        let committing = matches!(state, InteractionState::Committing { .. });
        let is_candidate = self.controller.candidates().contains(cursor);
        let own_piece = self.controller.store().with_current(|board| {
            board
                .piece_at(cursor)
                .is_some_and(|p| p.owner() == board.turn_owner())
        });

        let ticket = if committing {
            debug!("Move in flight, ignoring");
            None
        } else if armed && (is_candidate || !own_piece) {
            self.controller.drop_at(cursor)
        } else {
            self.controller.select_at(cursor)
        };

        if self.notice.is_none() {
            self.notice = self.controller.take_notice();
        }
        ticket.map_or(Action::None, Action::Dispatch)
    }
}
