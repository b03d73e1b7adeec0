//! Move history derived from consecutive snapshots.

use derive_new::new;
use tracing::{debug, instrument};

use crate::{BoardState, Position, Side};

/// One executed move as shown in the history panel.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct MoveLogEntry {
    /// Side that moved.
    pub mover: Side,
    /// Glyph of the moving piece.
    pub piece_glyph: char,
    /// Source point (client coordinates).
    pub source: Position,
    /// Target point (client coordinates).
    pub target: Position,
    /// Glyph of the captured piece, if any.
    pub captured_glyph: Option<char>,
    /// The move gave check.
    pub is_check: bool,
    /// The move gave mate.
    pub is_checkmate: bool,
}

impl MoveLogEntry {
    /// Assembles an entry from the snapshots before and after a move.
    ///
    /// Mover and glyphs come from `before`, check flags from `after`.
    /// Returns `None` when `before` has no piece on `source`.
    #[instrument(skip(before, after))]
    pub fn from_transition(
        before: &BoardState,
        after: &BoardState,
        source: Position,
        target: Position,
    ) -> Option<Self> {
        let moved = before.piece_at(source)?;
        let captured = before
            .piece_at(target)
            .filter(|p| p.owner() != moved.owner())
            .map(|p| p.glyph());

        Some(Self::new(
            moved.owner(),
            moved.glyph(),
            source,
            target,
            captured,
            after.in_check(),
            after.is_checkmate(),
        ))
    }

    /// Check marker: `#` for mate, `+` for check.
    pub fn check_marker(&self) -> Option<char> {
        if self.is_checkmate {
            Some('#')
        } else if self.is_check {
            Some('+')
        } else {
            None
        }
    }

    /// Renders the entry as a numbered history line (`index` is zero-based).
    pub fn line(&self, index: usize) -> String {
        let mut line = format!(
            "{}. {}: {} {} → {}",
            index + 1,
            self.mover,
            self.piece_glyph,
            self.source,
            self.target
        );
        if let Some(captured) = self.captured_glyph {
            line.push_str(&format!(" captures {}", captured));
        }
        if let Some(marker) = self.check_marker() {
            line.push(' ');
            line.push(marker);
        }
        line
    }
}

/// Ordered, append-only record of executed moves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveHistoryLog {
    entries: Vec<MoveLogEntry>,
}

impl MoveHistoryLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry at the end.
    pub fn append(&mut self, entry: MoveLogEntry) {
        debug!(ply = self.entries.len() + 1, "Appending history entry");
        self.entries.push(entry);
    }

    /// Removes and returns the most recent entry. No-op when empty.
    pub fn pop_last(&mut self) -> Option<MoveLogEntry> {
        self.entries.pop()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the entries, oldest first.
    pub fn entries(&self) -> &[MoveLogEntry] {
        &self.entries
    }

    /// Returns the most recent entry.
    pub fn last(&self) -> Option<&MoveLogEntry> {
        self.entries.last()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no move has been logged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders every entry as numbered lines.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| entry.line(index))
    }
}
