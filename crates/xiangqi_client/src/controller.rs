//! Select/drop interaction state machine.
//!
//! The controller never performs I/O itself. Each gesture that needs the
//! backend returns a [`Ticket`]; whoever owns the runtime executes it with
//! [`Ticket::execute`] and hands the resulting [`Completion`] back through
//! [`InteractionController::complete`]. [`InteractionController::drive`]
//! does both for callers that are happy to wait.
//!
//! Every ticket is stamped with the [`Generation`] it was issued under.
//! Completions from a superseded generation never touch the board or the
//! selection. Moves, resets and undos still change the move log, in the
//! order they were issued, because the backend has carried them out.

use std::collections::VecDeque;
use std::sync::Arc;

use derive_more::Display;
use tracing::{debug, error, info, instrument, warn};
use xiangqi_core::{
    BoardState, MoveHistoryLog, MoveLogEntry, MoveToken, Piece, Position, WireBoardState,
    WirePosition, encode, to_wire,
};

use crate::backend::{BackendError, GameBackend};
use crate::candidates::CandidateMoveSet;
use crate::store::GameStateStore;

static NO_CANDIDATES: CandidateMoveSet = CandidateMoveSet::new();

/// Request stamp used to recognise stale completions.
///
/// `epoch` advances on reset and undo, which supersede everything in flight.
/// `seq` advances on each selection and commit, which supersede the
/// previous selection's requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
#[display("{epoch}.{seq}")]
pub struct Generation {
    /// Board-replacement counter.
    pub epoch: u64,
    /// Selection counter within an epoch.
    pub seq: u64,
}

/// Where the interaction currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InteractionState {
    /// Nothing selected.
    #[default]
    Idle,
    /// A piece is selected and its legal moves have been requested.
    AwaitingCandidates {
        /// The selected piece.
        piece: Piece,
    },
    /// Legal moves are known; waiting for a drop.
    Armed {
        /// The selected piece.
        piece: Piece,
        /// Its legal destinations.
        candidates: CandidateMoveSet,
    },
    /// A move has been sent and the reply is pending.
    Committing {
        /// The moving piece.
        piece: Piece,
        /// Where it is going.
        target: Position,
        /// Destinations that were on offer.
        candidates: CandidateMoveSet,
    },
}

impl InteractionState {
    /// Short state name for logs and the status bar.
    pub fn name(&self) -> &'static str {
        match self {
            InteractionState::Idle => "Idle",
            InteractionState::AwaitingCandidates { .. } => "AwaitingCandidates",
            InteractionState::Armed { .. } => "Armed",
            InteractionState::Committing { .. } => "Committing",
        }
    }
}

/// A backend call described but not yet performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// `GET /board`.
    FetchBoard,
    /// `GET /legal_moves/{row}/{col}`.
    LegalMoves(WirePosition),
    /// `POST /move`.
    SubmitMove(MoveToken),
    /// `POST /reset`.
    Reset,
    /// `POST /undo`.
    Undo,
}

/// A request together with the generation it was issued under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: Generation,
    request: Request,
}

/// Successful backend payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A board snapshot.
    Snapshot(WireBoardState),
    /// Legal destinations.
    Candidates(Vec<WirePosition>),
}

/// The outcome of executing a [`Ticket`].
#[derive(Debug, Clone)]
pub struct Completion {
    ticket: Ticket,
    outcome: Result<Reply, BackendError>,
}

impl Ticket {
    /// Returns the generation this ticket was issued under.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Returns the described request.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Performs the request against `backend`.
    #[instrument(skip(backend), fields(generation = %self.generation))]
    pub async fn execute(self, backend: &dyn GameBackend) -> Completion {
        debug!(request = ?self.request, "Executing backend request");
        let outcome = match &self.request {
            Request::FetchBoard => backend.fetch_board().await.map(Reply::Snapshot),
            Request::LegalMoves(from) => backend.legal_moves(*from).await.map(Reply::Candidates),
            Request::SubmitMove(token) => backend.submit_move(token).await.map(Reply::Snapshot),
            Request::Reset => backend.reset().await.map(Reply::Snapshot),
            Request::Undo => backend.undo().await.map(Reply::Snapshot),
        };
        Completion {
            ticket: self,
            outcome,
        }
    }
}

impl Completion {
    /// Returns the ticket that produced this completion.
    pub fn ticket(&self) -> &Ticket {
        &self.ticket
    }

    /// Returns the backend outcome.
    pub fn outcome(&self) -> &Result<Reply, BackendError> {
        &self.outcome
    }
}

/// Something the user must acknowledge.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Notice {
    /// The backend refused a move, or it could not be sent.
    #[display("Move failed: {}", _0)]
    MoveRejected(String),
}

/// What [`InteractionController::complete`] did with a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The reply was current and has been applied.
    Applied,
    /// The request failed; state was rolled back to `Idle` where relevant.
    Failed,
    /// A later request superseded this one; nothing changed.
    Stale,
}

/// Log change a history-affecting request is waiting to make.
#[derive(Debug)]
enum PendingEdit {
    /// A move; the entry is diffed against the snapshot taken at commit.
    Commit {
        source: Position,
        target: Position,
        before: BoardState,
    },
    Reset,
    Undo,
}

/// A history-affecting request and, once its reply is in, what it did.
#[derive(Debug)]
struct PendingHistory {
    generation: Generation,
    edit: PendingEdit,
    resolved: Option<HistoryEdit>,
}

#[derive(Debug)]
enum HistoryEdit {
    Append(MoveLogEntry),
    Pop,
    Clear,
    Skip,
}

/// Drives selection, move submission, reset and undo.
///
/// Owns the [`GameStateStore`], the [`MoveHistoryLog`] and the candidate set
/// for the current selection.
///
/// Log changes from moves, resets and undos are applied in issue order, so
/// a reply that arrives early waits until every earlier one of those
/// requests has completed. Every such ticket must eventually be completed.
pub struct InteractionController {
    backend: Arc<dyn GameBackend>,
    store: GameStateStore,
    history: MoveHistoryLog,
    pending: VecDeque<PendingHistory>,
    state: InteractionState,
    generation: Generation,
    notices: VecDeque<Notice>,
}

impl std::fmt::Debug for InteractionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionController")
            .field("state", &self.state.name())
            .field("generation", &self.generation)
            .field("history", &self.history.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl InteractionController {
    /// Creates a controller with an empty store.
    #[instrument(skip(backend))]
    pub fn new(backend: Arc<dyn GameBackend>) -> Self {
        info!("Creating InteractionController");
        Self {
            backend,
            store: GameStateStore::new(),
            history: MoveHistoryLog::new(),
            pending: VecDeque::new(),
            state: InteractionState::Idle,
            generation: Generation::default(),
            notices: VecDeque::new(),
        }
    }

    /// Returns a handle to the backend, for executing tickets elsewhere.
    pub fn backend(&self) -> Arc<dyn GameBackend> {
        Arc::clone(&self.backend)
    }

    /// Returns the board store.
    pub fn store(&self) -> &GameStateStore {
        &self.store
    }

    /// Returns the move history.
    pub fn history(&self) -> &MoveHistoryLog {
        &self.history
    }

    /// Returns the interaction state.
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Returns the current generation.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Returns the selected piece, if any.
    pub fn selected(&self) -> Option<&Piece> {
        match &self.state {
            InteractionState::Idle => None,
            InteractionState::AwaitingCandidates { piece }
            | InteractionState::Armed { piece, .. }
            | InteractionState::Committing { piece, .. } => Some(piece),
        }
    }

    /// Returns the legal destinations of the current selection.
    pub fn candidates(&self) -> &CandidateMoveSet {
        match &self.state {
            InteractionState::Armed { candidates, .. }
            | InteractionState::Committing { candidates, .. } => candidates,
            _ => &NO_CANDIDATES,
        }
    }

    /// Pops the oldest notice waiting for the user.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notices.pop_front()
    }

    /// Fetches the board without touching the interaction state.
    #[instrument(skip(self), fields(generation = %self.generation))]
    pub fn refresh(&self) -> Ticket {
        debug!("Issuing board fetch");
        self.ticket(Request::FetchBoard)
    }

    /// Selects `piece` and asks for its legal moves.
    ///
    /// Refused without a request when it is not the piece owner's turn, the
    /// game is over, the piece is not on the current board, or a move is
    /// already being committed. Selecting while another piece is selected
    /// replaces that selection.
    #[instrument(skip(self, piece), fields(piece = %piece.id(), at = %piece.position()))]
    pub fn select_piece(&mut self, piece: &Piece) -> Option<Ticket> {
        if matches!(self.state, InteractionState::Committing { .. }) {
            debug!("Selection refused while committing");
            return None;
        }

        let allowed = self.store.with_current(|board| {
            if board.is_game_over() {
                debug!("Selection refused: game over");
                return false;
            }
            if piece.owner() != board.turn_owner() {
                debug!(owner = %piece.owner(), turn = %board.turn_owner(), "Selection refused: not this side's turn");
                return false;
            }
            if board.piece_by_id(piece.id()) != Some(piece) {
                debug!("Selection refused: piece not on current board");
                return false;
            }
            true
        });
        if !allowed {
            return None;
        }

        self.generation.seq += 1;
        self.state = InteractionState::AwaitingCandidates {
            piece: piece.clone(),
        };
        debug!(generation = %self.generation, "Requesting legal moves");
        Some(self.ticket(Request::LegalMoves(to_wire(piece.position()))))
    }

    /// Selects whatever piece stands on `position`.
    pub fn select_at(&mut self, position: Position) -> Option<Ticket> {
        let piece = self.store.with_current(|board| board.piece_at(position).cloned())?;
        self.select_piece(&piece)
    }

    /// Drops the selected piece on `target`.
    ///
    /// A target outside the candidate set clears the selection without
    /// contacting the backend. Only valid while armed.
    #[instrument(skip_all, fields(target = %target))]
    pub fn drop_at(&mut self, target: Position) -> Option<Ticket> {
        if !matches!(self.state, InteractionState::Armed { .. }) {
            debug!(state = self.state.name(), "Drop ignored: nothing armed");
            return None;
        }
        let InteractionState::Armed { piece, candidates } =
            std::mem::take(&mut self.state)
        else {
            return None;
        };

        if !candidates.contains(target) {
            info!(piece = %piece.id(), "Illegal drop, clearing selection");
            return None;
        }

        let token = match encode(to_wire(piece.position()), to_wire(target)) {
            Ok(token) => token,
            Err(e) => {
                error!(error = %e, "Could not encode move");
                self.notices.push_back(Notice::MoveRejected(e.to_string()));
                return None;
            }
        };

        self.generation.seq += 1;
        info!(piece = %piece.id(), token = %token, generation = %self.generation, "Committing move");
        self.expect_history(PendingEdit::Commit {
            source: piece.position(),
            target,
            before: self.store.current(),
        });
        self.state = InteractionState::Committing {
            piece,
            target,
            candidates,
        };
        Some(self.ticket(Request::SubmitMove(token)))
    }

    /// Drops the current selection, if any.
    pub fn clear_candidates(&mut self) {
        match self.state {
            InteractionState::AwaitingCandidates { .. } | InteractionState::Armed { .. } => {
                debug!("Clearing selection");
                self.state = InteractionState::Idle;
            }
            _ => {}
        }
    }

    /// Restores the starting position. Available from any state.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> Ticket {
        self.supersede();
        info!(generation = %self.generation, "Requesting reset");
        self.expect_history(PendingEdit::Reset);
        self.ticket(Request::Reset)
    }

    /// Rolls back one ply. Available from any state.
    #[instrument(skip(self))]
    pub fn undo(&mut self) -> Ticket {
        self.supersede();
        info!(generation = %self.generation, "Requesting undo");
        self.expect_history(PendingEdit::Undo);
        self.ticket(Request::Undo)
    }

    /// Applies a completed request.
    #[instrument(skip_all, fields(generation = %completion.ticket.generation, current = %self.generation))]
    pub fn complete(&mut self, completion: Completion) -> Resolution {
        let Completion { ticket, outcome } = completion;
        match ticket.request {
            Request::FetchBoard => {
                if ticket.generation.epoch != self.generation.epoch {
                    return self.discard("board fetch");
                }
                match Self::snapshot(outcome) {
                    Ok(board) => {
                        self.store.apply(board);
                        info!("Board loaded");
                        Resolution::Applied
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to fetch board");
                        Resolution::Failed
                    }
                }
            }
            Request::LegalMoves(from) => {
                if ticket.generation != self.generation
                    || !matches!(self.state, InteractionState::AwaitingCandidates { .. })
                {
                    return self.discard("legal moves");
                }
                let InteractionState::AwaitingCandidates { piece } =
                    std::mem::take(&mut self.state)
                else {
                    return Resolution::Stale;
                };
                match outcome {
                    Ok(Reply::Candidates(reply)) => {
                        let candidates = CandidateMoveSet::from_wire(reply);
                        debug!(from = %from, count = candidates.len(), "Candidates received");
                        self.state = InteractionState::Armed { piece, candidates };
                        Resolution::Applied
                    }
                    Ok(Reply::Snapshot(_)) => {
                        warn!(from = %from, "Expected legal moves, got a snapshot");
                        Resolution::Failed
                    }
                    Err(e) => {
                        warn!(error = %e, from = %from, "Failed to fetch legal moves");
                        Resolution::Failed
                    }
                }
            }
            Request::SubmitMove(token) => {
                let reply = Self::snapshot(outcome);
                self.settle_history(ticket.generation, reply.as_ref().ok());
                if ticket.generation != self.generation
                    || !matches!(self.state, InteractionState::Committing { .. })
                {
                    return self.discard("move submission");
                }
                let InteractionState::Committing { piece, .. } = std::mem::take(&mut self.state)
                else {
                    return Resolution::Stale;
                };
                match reply {
                    Ok(after) => {
                        info!(piece = %piece.id(), "Move accepted");
                        self.store.apply(after);
                        Resolution::Applied
                    }
                    Err(e) => {
                        error!(error = %e, token = %token, "Move rejected");
                        self.notices.push_back(Notice::MoveRejected(e));
                        Resolution::Failed
                    }
                }
            }
            Request::Reset => self.replace_board(ticket.generation, outcome, true),
            Request::Undo => self.replace_board(ticket.generation, outcome, false),
        }
    }

    /// Executes `ticket` on this controller's backend and applies the result.
    pub async fn drive(&mut self, ticket: Ticket) -> Resolution {
        let backend = self.backend();
        let completion = ticket.execute(backend.as_ref()).await;
        self.complete(completion)
    }

    fn ticket(&self, request: Request) -> Ticket {
        Ticket {
            generation: self.generation,
            request,
        }
    }

    fn expect_history(&mut self, edit: PendingEdit) {
        self.pending.push_back(PendingHistory {
            generation: self.generation,
            edit,
            resolved: None,
        });
    }

    /// Records what the reply to the request issued under `generation` did
    /// to the log, then applies every edit whose predecessors are settled.
    fn settle_history(&mut self, generation: Generation, reply: Option<&BoardState>) {
        let Some(pending) = self
            .pending
            .iter_mut()
            .find(|p| p.generation == generation && p.resolved.is_none())
        else {
            return;
        };
        pending.resolved = Some(match (&pending.edit, reply) {
            (_, None) => HistoryEdit::Skip,
            (PendingEdit::Commit { source, target, before }, Some(after)) => {
                match MoveLogEntry::from_transition(before, after, *source, *target) {
                    Some(entry) => HistoryEdit::Append(entry),
                    None => {
                        warn!(source = %source, "Moved piece missing from pre-move snapshot");
                        HistoryEdit::Skip
                    }
                }
            }
            (PendingEdit::Reset, Some(_)) => HistoryEdit::Clear,
            (PendingEdit::Undo, Some(_)) => HistoryEdit::Pop,
        });

        while let Some(edit) = self.pending.front_mut().and_then(|p| p.resolved.take()) {
            self.pending.pop_front();
            match edit {
                HistoryEdit::Append(entry) => {
                    info!(move_line = %entry.line(self.history.len()), "Move logged");
                    self.history.append(entry);
                }
                HistoryEdit::Pop => {
                    let popped = self.history.pop_last();
                    info!(popped = popped.is_some(), "Move undone");
                }
                HistoryEdit::Clear => {
                    self.history.clear();
                    info!("History cleared");
                }
                HistoryEdit::Skip => {}
            }
        }
    }

    fn supersede(&mut self) {
        self.generation.epoch += 1;
        self.generation.seq = 0;
        self.state = InteractionState::Idle;
    }

    /// Applies a reset or undo reply.
    fn replace_board(
        &mut self,
        generation: Generation,
        outcome: Result<Reply, BackendError>,
        is_reset: bool,
    ) -> Resolution {
        let reply = Self::snapshot(outcome);
        self.settle_history(generation, reply.as_ref().ok());
        if generation.epoch != self.generation.epoch {
            return self.discard(if is_reset { "reset" } else { "undo" });
        }
        match reply {
            Ok(board) => {
                info!(reset = is_reset, "Board replaced");
                self.store.apply(board);
                Resolution::Applied
            }
            Err(e) => {
                warn!(error = %e, reset = is_reset, "Failed to replace board");
                Resolution::Failed
            }
        }
    }

    fn discard(&self, what: &str) -> Resolution {
        debug!(what, state = self.state.name(), "Discarding stale completion");
        Resolution::Stale
    }

    /// Decodes a snapshot reply, flattening every failure into a message.
    fn snapshot(outcome: Result<Reply, BackendError>) -> Result<BoardState, String> {
        match outcome {
            Ok(Reply::Snapshot(wire)) => BoardState::from_wire(wire).map_err(|e| e.to_string()),
            Ok(Reply::Candidates(_)) => Err("Expected a board snapshot".to_string()),
            Err(BackendError::Rejected { body, .. }) => Err(body),
            Err(e) => Err(e.to_string()),
        }
    }
}
