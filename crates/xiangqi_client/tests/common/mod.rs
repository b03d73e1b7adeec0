//! In-memory rules backend for controller tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use xiangqi_client::{BackendError, GameBackend};
use xiangqi_core::{
    BoardState, MoveToken, Position, WireBoardState, WirePiece, WirePosition, to_wire,
};

/// A backend call as the fake saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchBoard,
    LegalMoves(WirePosition),
    SubmitMove(String),
    Reset,
    Undo,
}

#[derive(Debug)]
struct Inner {
    board: WireBoardState,
    past: Vec<WireBoardState>,
    legal: HashMap<WirePosition, Vec<WirePosition>>,
    calls: Vec<Call>,
    reject_moves: Option<String>,
    offline: bool,
    check_after_move: bool,
    mate_after_move: bool,
}

/// Scripted backend: legal moves are whatever the test registers, moves are
/// applied without rule checks, undo replays its own history.
#[derive(Debug)]
pub struct FakeBackend {
    inner: Mutex<Inner>,
}

impl FakeBackend {
    /// Starts from the standard opening layout.
    pub fn new() -> Self {
        Self::with_board(wire_board(&BoardState::initial()))
    }

    /// Starts from `board`.
    pub fn with_board(board: WireBoardState) -> Self {
        Self {
            inner: Mutex::new(Inner {
                board,
                past: Vec::new(),
                legal: HashMap::new(),
                calls: Vec::new(),
                reject_moves: None,
                offline: false,
                check_after_move: false,
                mate_after_move: false,
            }),
        }
    }

    /// Registers legal destinations for the piece at `from` (client coordinates).
    pub fn set_legal(&self, from: Position, to: &[Position]) {
        self.lock()
            .legal
            .insert(to_wire(from), to.iter().copied().map(to_wire).collect());
    }

    /// Rejects every following move submission with `body`.
    pub fn reject_moves(&self, body: &str) {
        self.lock().reject_moves = Some(body.to_string());
    }

    /// Makes every following call fail at the transport level.
    pub fn go_offline(&self) {
        self.lock().offline = true;
    }

    /// Flags the position after the next accepted moves as check or mate.
    pub fn flag_next_moves(&self, check: bool, mate: bool) {
        let mut inner = self.lock();
        inner.check_after_move = check;
        inner.mate_after_move = mate;
    }

    /// Every call received so far.
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Number of move submissions received.
    pub fn submissions(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::SubmitMove(_)))
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("fake backend lock poisoned")
    }

    fn record(&self, call: Call) -> Result<std::sync::MutexGuard<'_, Inner>, BackendError> {
        let mut inner = self.lock();
        inner.calls.push(call);
        if inner.offline {
            return Err(BackendError::Transport("connection refused".to_string()));
        }
        Ok(inner)
    }
}

#[async_trait::async_trait]
impl GameBackend for FakeBackend {
    async fn fetch_board(&self) -> Result<WireBoardState, BackendError> {
        let inner = self.record(Call::FetchBoard)?;
        Ok(inner.board.clone())
    }

    async fn legal_moves(&self, from: WirePosition) -> Result<Vec<WirePosition>, BackendError> {
        let inner = self.record(Call::LegalMoves(from))?;
        Ok(inner.legal.get(&from).cloned().unwrap_or_default())
    }

    async fn submit_move(&self, token: &MoveToken) -> Result<WireBoardState, BackendError> {
        let mut inner = self.record(Call::SubmitMove(token.as_str().to_string()))?;
        if let Some(body) = inner.reject_moves.clone() {
            return Err(BackendError::Rejected { status: 400, body });
        }

        let digits: Vec<u8> = token
            .as_str()
            .chars()
            .filter_map(|c| c.to_digit(10))
            .map(|d| d as u8)
            .collect();
        let (from, to) = (
            WirePosition::new(digits[0], digits[1]),
            WirePosition::new(digits[2], digits[3]),
        );

        let mut next = inner.board.clone();
        let Some(index) = next.pieces.iter().position(|p| p.wire_position() == from) else {
            return Err(BackendError::Rejected {
                status: 400,
                body: "No piece at source".to_string(),
            });
        };
        let mover = next.pieces[index].player;
        next.pieces.retain(|p| p.wire_position() != to);
        if let Some(piece) = next.pieces.iter_mut().find(|p| p.wire_position() == from) {
            piece.x = to.row;
            piece.y = to.col;
        }
        next.player_turn = mover.opponent();
        next.is_check = inner.check_after_move;
        next.is_checkmate = inner.mate_after_move;
        next.is_game_over = inner.mate_after_move;

        let previous = std::mem::replace(&mut inner.board, next);
        inner.past.push(previous);
        Ok(inner.board.clone())
    }

    async fn reset(&self) -> Result<WireBoardState, BackendError> {
        let mut inner = self.record(Call::Reset)?;
        inner.board = wire_board(&BoardState::initial());
        inner.past.clear();
        Ok(inner.board.clone())
    }

    async fn undo(&self) -> Result<WireBoardState, BackendError> {
        let mut inner = self.record(Call::Undo)?;
        if let Some(previous) = inner.past.pop() {
            inner.board = previous;
        }
        Ok(inner.board.clone())
    }
}

/// Converts a client snapshot into its wire form.
pub fn wire_board(board: &BoardState) -> WireBoardState {
    WireBoardState {
        pieces: board
            .pieces()
            .iter()
            .map(|p| {
                let at = to_wire(p.position());
                WirePiece {
                    id: p.id().to_string(),
                    x: at.row,
                    y: at.col,
                    kind: p.kind(),
                    player: p.owner(),
                }
            })
            .collect(),
        player_turn: board.turn_owner(),
        is_game_over: board.is_game_over(),
        is_check: board.in_check(),
        is_checkmate: board.is_checkmate(),
        is_stalemate: board.is_stalemate(),
        result: board.result().map(str::to_string),
    }
}
