//! Tests for decoding backend snapshots.

use xiangqi_core::{BoardState, PieceKind, Position, Side, WireBoardState, WireError};

fn snapshot(json: serde_json::Value) -> WireBoardState {
    serde_json::from_value(json).expect("valid wire snapshot")
}

#[test]
fn test_decode_transposes_positions() {
    let wire = snapshot(serde_json::json!({
        "pieces": [
            {"id": "r1", "x": 6, "y": 0, "type": "soldier", "player": "red"},
            {"id": "b1", "x": 0, "y": 4, "type": "general", "player": "black"}
        ],
        "playerTurn": "black",
        "isGameOver": false,
        "isCheck": true,
        "isCheckmate": false,
        "isStalemate": false,
        "result": null
    }));

    let state = BoardState::from_wire(wire).unwrap();
    let soldier = state.piece_by_id("r1").unwrap();
    assert_eq!(soldier.position(), Position::new(0, 6));
    assert_eq!(soldier.kind(), PieceKind::Soldier);
    assert_eq!(soldier.owner(), Side::Red);
    assert_eq!(state.piece_by_id("b1").unwrap().position(), Position::new(4, 0));
    assert_eq!(state.turn_owner(), Side::Black);
    assert!(state.in_check());
}

#[test]
fn test_decode_tolerates_missing_optional_fields() {
    let wire = snapshot(serde_json::json!({
        "pieces": [],
        "playerTurn": "red"
    }));
    let state = BoardState::from_wire(wire).unwrap();
    assert!(state.pieces().is_empty());
    assert!(!state.is_game_over());
    assert_eq!(state.result(), None);
}

#[test]
fn test_checkmate_forces_game_over() {
    let wire = snapshot(serde_json::json!({
        "pieces": [],
        "playerTurn": "black",
        "isGameOver": false,
        "isCheck": true,
        "isCheckmate": true,
        "isStalemate": false,
        "result": "red wins"
    }));
    let state = BoardState::from_wire(wire).unwrap();
    assert!(state.is_checkmate());
    assert!(state.is_game_over());
    assert_eq!(state.result(), Some("red wins"));
}

#[test]
fn test_stalemate_forces_game_over() {
    let wire = snapshot(serde_json::json!({
        "pieces": [],
        "playerTurn": "black",
        "isGameOver": false,
        "isCheck": false,
        "isCheckmate": false,
        "isStalemate": true,
        "result": null
    }));
    let state = BoardState::from_wire(wire).unwrap();
    assert!(state.is_stalemate());
    assert!(!state.is_checkmate());
    assert!(state.is_game_over());
}

#[test]
fn test_duplicate_position_rejected() {
    let wire = snapshot(serde_json::json!({
        "pieces": [
            {"id": "a", "x": 1, "y": 1, "type": "horse", "player": "red"},
            {"id": "b", "x": 1, "y": 1, "type": "horse", "player": "black"}
        ],
        "playerTurn": "red"
    }));
    assert_eq!(
        BoardState::from_wire(wire),
        Err(WireError::DuplicatePosition(Position::new(1, 1)))
    );
}

#[test]
fn test_duplicate_id_rejected() {
    let wire = snapshot(serde_json::json!({
        "pieces": [
            {"id": "a", "x": 1, "y": 1, "type": "horse", "player": "red"},
            {"id": "a", "x": 2, "y": 1, "type": "horse", "player": "red"}
        ],
        "playerTurn": "red"
    }));
    assert_eq!(
        BoardState::from_wire(wire),
        Err(WireError::DuplicateId("a".to_string()))
    );
}

#[test]
fn test_unknown_piece_type_fails_to_parse() {
    let result: Result<WireBoardState, _> = serde_json::from_value(serde_json::json!({
        "pieces": [{"id": "q", "x": 0, "y": 0, "type": "queen", "player": "red"}],
        "playerTurn": "red"
    }));
    assert!(result.is_err());
}
