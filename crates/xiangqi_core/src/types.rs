//! Core domain types for the xiangqi client.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// Number of columns (files) on the board.
pub const BOARD_COLUMNS: u8 = 9;

/// Number of rows (ranks) on the board.
pub const BOARD_ROWS: u8 = 10;

/// A side in the game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumIter, strum::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Red moves first.
    #[default]
    Red,
    /// Black moves second.
    Black,
}

impl Side {
    /// Returns the opposing side.
    pub fn opponent(self) -> Self {
        match self {
            Side::Red => Side::Black,
            Side::Black => Side::Red,
        }
    }

    /// Returns the lowercase name used on the wire and in piece ids.
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Red => "red",
            Side::Black => "black",
        }
    }
}

/// The kind of a piece.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PieceKind {
    /// Soldier (pawn).
    Soldier,
    /// Cannon.
    Cannon,
    /// Chariot (rook).
    Chariot,
    /// Horse (knight).
    Horse,
    /// Elephant (minister).
    Elephant,
    /// Advisor (guard).
    Advisor,
    /// General (king).
    General,
}

/// A board point in client coordinates.
///
/// `x` is the column (0-8, left to right) and `y` the row (0-9, top to
/// bottom, black's back rank at 0). The wire uses the transposed
/// convention, see [`crate::WirePosition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Display)]
#[display("({x},{y})")]
pub struct Position {
    /// Column.
    pub x: u8,
    /// Row.
    pub y: u8,
}

impl Position {
    /// Creates a new position.
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Returns true if the position lies on the 9x10 board.
    pub fn is_on_board(&self) -> bool {
        self.x < BOARD_COLUMNS && self.y < BOARD_ROWS
    }
}

/// A piece on the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    id: String,
    kind: PieceKind,
    owner: Side,
    position: Position,
}

impl Piece {
    /// Creates a new piece.
    pub fn new(id: impl Into<String>, kind: PieceKind, owner: Side, position: Position) -> Self {
        Self {
            id: id.into(),
            kind,
            owner,
            position,
        }
    }

    /// Opaque identity assigned by the backend.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the piece kind.
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Returns the owning side.
    pub fn owner(&self) -> Side {
        self.owner
    }

    /// Returns the position in client coordinates.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns the display glyph for this piece.
    pub fn glyph(&self) -> char {
        crate::glyph(self.kind, self.owner)
    }
}
