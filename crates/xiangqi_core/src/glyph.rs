//! Display glyphs for pieces.

use crate::{PieceKind, Side};

/// Returns the traditional character for a piece kind and side.
pub fn glyph(kind: PieceKind, side: Side) -> char {
    match (side, kind) {
        (Side::Red, PieceKind::General) => '帥',
        (Side::Red, PieceKind::Advisor) => '仕',
        (Side::Red, PieceKind::Elephant) => '相',
        (Side::Red, PieceKind::Horse) => '傌',
        (Side::Red, PieceKind::Chariot) => '俥',
        (Side::Red, PieceKind::Cannon) => '炮',
        (Side::Red, PieceKind::Soldier) => '兵',
        (Side::Black, PieceKind::General) => '將',
        (Side::Black, PieceKind::Advisor) => '士',
        (Side::Black, PieceKind::Elephant) => '象',
        (Side::Black, PieceKind::Horse) => '馬',
        (Side::Black, PieceKind::Chariot) => '車',
        (Side::Black, PieceKind::Cannon) => '砲',
        (Side::Black, PieceKind::Soldier) => '卒',
    }
}
