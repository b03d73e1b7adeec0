//! Single source of truth for the current board.

use tokio::sync::watch;
use tracing::{debug, instrument};
use xiangqi_core::BoardState;

/// Holds the one current [`BoardState`].
///
/// [`apply`](Self::apply) is the only way to change it and swaps the whole
/// snapshot at once. Readers either borrow the current value or
/// [`subscribe`](Self::subscribe) to be told about every replacement.
#[derive(Debug)]
pub struct GameStateStore {
    tx: watch::Sender<BoardState>,
}

impl GameStateStore {
    /// Creates a store holding the empty default snapshot.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(BoardState::default());
        Self { tx }
    }

    /// Replaces the current snapshot.
    #[instrument(skip_all, fields(pieces = snapshot.pieces().len(), turn = %snapshot.turn_owner()))]
    pub fn apply(&mut self, snapshot: BoardState) {
        debug!("Applying snapshot");
        self.tx.send_replace(snapshot);
    }

    /// Returns a copy of the current snapshot.
    pub fn current(&self) -> BoardState {
        self.tx.borrow().clone()
    }

    /// Runs `f` against the current snapshot without cloning it.
    pub fn with_current<R>(&self, f: impl FnOnce(&BoardState) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Returns a receiver that observes every applied snapshot.
    pub fn subscribe(&self) -> watch::Receiver<BoardState> {
        self.tx.subscribe()
    }
}

impl Default for GameStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xiangqi_core::Side;

    #[test]
    fn test_starts_empty() {
        let store = GameStateStore::new();
        assert_eq!(store.current(), BoardState::default());
    }

    #[test]
    fn test_apply_replaces_whole_snapshot() {
        let mut store = GameStateStore::new();
        let mut rx = store.subscribe();

        let snapshot = BoardState::initial().with_in_check(true);
        store.apply(snapshot.clone());

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), snapshot);
        assert_eq!(store.current(), snapshot);

        store.apply(BoardState::new(Vec::new(), Side::Black));
        store.with_current(|s| {
            assert!(s.pieces().is_empty());
            assert!(!s.in_check());
            assert_eq!(s.turn_owner(), Side::Black);
        });
    }
}
