//! Xiangqi client domain - pure types with no I/O.
//!
//! This crate holds everything the client needs to reason about a game
//! without talking to the rules backend.
//!
//! # Architecture
//!
//! - **Types**: pieces, sides and client-side [`Position`]s
//! - **Coordinates**: the transposition between client and wire points
//! - **Encoding**: compact move tokens for the move endpoint
//! - **Wire**: backend payloads and their conversion into [`BoardState`]
//! - **History**: move log entries derived from consecutive snapshots
//!
//! # Example
//!
//! ```
//! use xiangqi_core::{Position, encode, to_wire};
//!
//! let from = to_wire(Position::new(0, 6));
//! let to = to_wire(Position::new(0, 5));
//! assert_eq!(encode(from, to).unwrap().as_str(), "6050");
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod coords;
mod encoding;
mod glyph;
mod history;
mod types;
mod wire;

pub use board::{BoardState, GameStatus};
pub use coords::{WirePosition, from_wire, to_wire};
pub use encoding::{EncodeError, MoveToken, encode};
pub use glyph::glyph;
pub use history::{MoveHistoryLog, MoveLogEntry};
pub use types::{BOARD_COLUMNS, BOARD_ROWS, Piece, PieceKind, Position, Side};
pub use wire::{MoveRequest, WireBoardState, WireError, WirePiece};
