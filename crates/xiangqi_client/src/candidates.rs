//! Legal destinations for the selected piece.

use std::collections::BTreeSet;

use xiangqi_core::{Position, WirePosition, from_wire};

/// Destinations the backend reported for the current selection, in client
/// coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateMoveSet {
    positions: BTreeSet<Position>,
}

impl CandidateMoveSet {
    /// Creates an empty set.
    pub const fn new() -> Self {
        Self {
            positions: BTreeSet::new(),
        }
    }

    /// Builds the set from a backend reply, converting each point once.
    pub fn from_wire(reply: impl IntoIterator<Item = WirePosition>) -> Self {
        Self {
            positions: reply.into_iter().map(from_wire).collect(),
        }
    }

    /// Returns true if `position` is a legal destination.
    pub fn contains(&self, position: Position) -> bool {
        self.positions.contains(&position)
    }

    /// Number of destinations.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if there are no destinations.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterates destinations in (x, y) order.
    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions.iter().copied()
    }
}

impl FromIterator<Position> for CandidateMoveSet {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}
