//! Payloads exchanged with the rules backend.
//!
//! Everything in this module is in wire coordinates. Conversion into the
//! client's [`BoardState`] happens once, in [`BoardState::from_wire`].

use std::collections::HashSet;

use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{BoardState, MoveToken, Piece, PieceKind, Position, Side, WirePosition, from_wire};

/// A piece as the backend reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePiece {
    /// Opaque piece id.
    pub id: String,
    /// Row (wire convention).
    pub x: u8,
    /// Column (wire convention).
    pub y: u8,
    /// Piece kind.
    #[serde(rename = "type")]
    pub kind: PieceKind,
    /// Owning side.
    pub player: Side,
}

impl WirePiece {
    /// Returns the piece position in wire coordinates.
    pub fn wire_position(&self) -> WirePosition {
        WirePosition::new(self.x, self.y)
    }
}

/// Board snapshot as returned by `/board`, `/move`, `/reset` and `/undo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireBoardState {
    /// Pieces on the board.
    pub pieces: Vec<WirePiece>,
    /// Side to move.
    pub player_turn: Side,
    /// Game ended.
    #[serde(default)]
    pub is_game_over: bool,
    /// Side to move is in check.
    #[serde(default)]
    pub is_check: bool,
    /// Side to move is mated.
    #[serde(default)]
    pub is_checkmate: bool,
    /// Side to move is stalemated.
    #[serde(default)]
    pub is_stalemate: bool,
    /// Free-form result text.
    #[serde(default)]
    pub result: Option<String>,
}

/// Body of a move submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRequest {
    /// The encoded move.
    pub payload: MoveToken,
}

impl MoveRequest {
    /// Wraps a token for submission.
    pub fn new(payload: MoveToken) -> Self {
        Self { payload }
    }
}

/// A snapshot that breaks the one-piece-per-point or unique-id rule.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum WireError {
    /// Two pieces share an id.
    #[display("Duplicate piece id {}", _0)]
    DuplicateId(String),
    /// Two pieces share a point.
    #[display("Two pieces occupy {}", _0)]
    DuplicatePosition(Position),
}

impl std::error::Error for WireError {}

impl BoardState {
    /// Converts a backend snapshot into client coordinates.
    ///
    /// Each piece position goes through [`from_wire`] exactly once. Snapshots
    /// with duplicate ids or stacked pieces are rejected so that capture
    /// detection can rely on at most one piece per point.
    #[instrument(skip(wire), fields(pieces = wire.pieces.len(), turn = %wire.player_turn))]
    pub fn from_wire(wire: WireBoardState) -> Result<Self, WireError> {
        let mut ids = HashSet::with_capacity(wire.pieces.len());
        let mut occupied = HashSet::with_capacity(wire.pieces.len());
        let mut pieces = Vec::with_capacity(wire.pieces.len());

        for piece in wire.pieces {
            let position = from_wire(piece.wire_position());
            if !occupied.insert(position) {
                return Err(WireError::DuplicatePosition(position));
            }
            if !ids.insert(piece.id.clone()) {
                return Err(WireError::DuplicateId(piece.id));
            }
            pieces.push(Piece::new(piece.id, piece.kind, piece.player, position));
        }

        let mut state = BoardState::new(pieces, wire.player_turn)
            .with_in_check(wire.is_check)
            .with_is_checkmate(wire.is_checkmate)
            .with_is_stalemate(wire.is_stalemate)
            .with_is_game_over(wire.is_game_over || wire.is_checkmate || wire.is_stalemate);
        if let Some(result) = wire.result {
            state = state.with_result(result);
        }

        debug!(
            check = state.in_check(),
            game_over = state.is_game_over(),
            "Decoded board snapshot"
        );
        Ok(state)
    }
}
