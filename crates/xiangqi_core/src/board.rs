//! Board snapshots as seen by the client.

use std::collections::HashMap;

use derive_more::Display;
use derive_setters::Setters;
use tracing::instrument;

use crate::{Piece, PieceKind, Position, Side};

/// Headline status of a snapshot, as shown above the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum GameStatus {
    /// Nothing to announce.
    #[display("")]
    InProgress,
    /// The side to move is in check.
    #[display("Check!")]
    Check,
    /// The side to move has been mated.
    #[display("{} wins by Checkmate!", winner)]
    Checkmate {
        /// The side that delivered mate.
        winner: Side,
    },
    /// The side to move has no legal move and is not in check.
    #[display("Stalemate!")]
    Stalemate,
    /// The backend ended the game for another reason.
    #[display("Game Over!")]
    Over,
}

/// One complete, immutable observation of the game.
///
/// Built from a backend reply in client coordinates. All fields belong to
/// the same observation; the store swaps whole snapshots, never fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Setters)]
#[setters(prefix = "with_")]
pub struct BoardState {
    #[setters(skip)]
    pieces: Vec<Piece>,
    #[setters(skip)]
    turn_owner: Side,
    in_check: bool,
    is_checkmate: bool,
    is_stalemate: bool,
    is_game_over: bool,
    #[setters(strip_option, into)]
    result: Option<String>,
}

impl BoardState {
    /// Creates a snapshot with the given pieces and side to move, all flags
    /// cleared.
    pub fn new(pieces: Vec<Piece>, turn_owner: Side) -> Self {
        Self {
            pieces,
            turn_owner,
            ..Self::default()
        }
    }

    /// Returns the standard 32-piece starting layout with red to move.
    #[instrument]
    pub fn initial() -> Self {
        const BACK_RANK: [PieceKind; 9] = [
            PieceKind::Chariot,
            PieceKind::Horse,
            PieceKind::Elephant,
            PieceKind::Advisor,
            PieceKind::General,
            PieceKind::Advisor,
            PieceKind::Elephant,
            PieceKind::Horse,
            PieceKind::Chariot,
        ];

        let mut pieces = Vec::with_capacity(32);
        for (side, back, cannons, soldiers) in [(Side::Red, 9, 7, 6), (Side::Black, 0, 2, 3)] {
            let mut seen = HashMap::<PieceKind, usize>::new();
            let mut place = |kind: PieceKind, x: u8, y: u8| {
                let n = seen.entry(kind).or_default();
                let id = format!("{}_{}_{}", side.as_str(), kind, n);
                *n += 1;
                pieces.push(Piece::new(id, kind, side, Position::new(x, y)));
            };
            for (x, kind) in (0u8..).zip(BACK_RANK) {
                place(kind, x, back);
            }
            place(PieceKind::Cannon, 1, cannons);
            place(PieceKind::Cannon, 7, cannons);
            for x in (0..9).step_by(2) {
                place(PieceKind::Soldier, x, soldiers);
            }
        }

        Self::new(pieces, Side::Red)
    }

    /// Returns every piece on the board.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Returns the side whose turn it is.
    pub fn turn_owner(&self) -> Side {
        self.turn_owner
    }

    /// Returns true if the side to move is in check.
    pub fn in_check(&self) -> bool {
        self.in_check
    }

    /// Returns true if the side to move is checkmated.
    pub fn is_checkmate(&self) -> bool {
        self.is_checkmate
    }

    /// Returns true if the side to move is stalemated.
    pub fn is_stalemate(&self) -> bool {
        self.is_stalemate
    }

    /// Returns true if the game has ended.
    ///
    /// Checkmate and stalemate always imply game over, whatever the raw flag
    /// says.
    pub fn is_game_over(&self) -> bool {
        self.is_game_over || self.is_checkmate || self.is_stalemate
    }

    /// Returns the backend's result description, if any.
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// Returns the piece standing on `position`.
    pub fn piece_at(&self, position: Position) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.position() == position)
    }

    /// Returns the piece with the given id.
    pub fn piece_by_id(&self, id: &str) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id() == id)
    }

    /// Returns the headline status.
    pub fn status(&self) -> GameStatus {
        if self.is_checkmate {
            GameStatus::Checkmate {
                winner: self.turn_owner.opponent(),
            }
        } else if self.is_stalemate {
            GameStatus::Stalemate
        } else if self.in_check {
            GameStatus::Check
        } else if self.is_game_over() {
            GameStatus::Over
        } else {
            GameStatus::InProgress
        }
    }

    /// Returns the turn line shown under the status.
    pub fn turn_banner(&self) -> String {
        if self.is_game_over() {
            "Game Over!".to_string()
        } else {
            format!("{}'s Turn", self.turn_owner)
        }
    }
}
