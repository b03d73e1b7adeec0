//! Mapping between client coordinates and wire coordinates.
//!
//! The backend addresses points as `(row, col)` while the client uses
//! `(x, y)` with `x` the column. The two are transposes of each other.
//! Every position that crosses the network boundary goes through exactly
//! one of [`to_wire`] or [`from_wire`]; keeping [`WirePosition`] a separate
//! type from [`Position`] makes a skipped or doubled transform a type error.
//!
//! No range checks happen here. Callers own the 0-8 / 0-9 bounds.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::Position;

/// A board point in wire coordinates.
///
/// Serialized as `{"x": row, "y": col}`, which is how the backend names the
/// fields.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[display("[{row},{col}]")]
pub struct WirePosition {
    /// Row on the wire (the client's `y`).
    #[serde(rename = "x")]
    pub row: u8,
    /// Column on the wire (the client's `x`).
    #[serde(rename = "y")]
    pub col: u8,
}

impl WirePosition {
    /// Creates a new wire position.
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

/// Converts a client position into wire coordinates.
pub fn to_wire(position: Position) -> WirePosition {
    WirePosition {
        row: position.y,
        col: position.x,
    }
}

/// Converts a wire position into client coordinates.
pub fn from_wire(position: WirePosition) -> Position {
    Position {
        x: position.col,
        y: position.row,
    }
}
