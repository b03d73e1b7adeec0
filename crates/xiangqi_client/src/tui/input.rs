//! Cursor movement for keyboard navigation.

use crossterm::event::KeyCode;
use xiangqi_core::{BOARD_COLUMNS, BOARD_ROWS, Position};

/// Moves the cursor one point in the arrow's direction, stopping at the
/// board edge. Other keys leave it where it is.
pub fn move_cursor(cursor: Position, key: KeyCode) -> Position {
    let Position { x, y } = cursor;
    match key {
        KeyCode::Left => Position::new(x.saturating_sub(1), y),
        KeyCode::Right if x + 1 < BOARD_COLUMNS => Position::new(x + 1, y),
        KeyCode::Up => Position::new(x, y.saturating_sub(1)),
        KeyCode::Down if y + 1 < BOARD_ROWS => Position::new(x, y + 1),
        _ => cursor,
    }
}
