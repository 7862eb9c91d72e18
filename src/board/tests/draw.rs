//! Game-end and draw detection tests.

use crate::board::{Board, Color, DrawReason, GameOutcome};

fn play(board: &mut Board, moves: &[&str]) {
    for uci in moves {
        board.make_move_uci(uci).unwrap();
    }
}

#[test]
fn test_fen_halfmove_parsing() {
    let board = Board::from_fen("8/8/8/8/8/8/8/K1k5 w - - 57 1").unwrap();
    assert_eq!(board.halfmove_clock(), 57);
}

#[test]
fn test_fifty_move_rule_draw() {
    let board = Board::from_fen("7k/8/8/8/8/8/8/KR6 w - - 100 80").unwrap();
    assert_eq!(board.outcome(), GameOutcome::Draw(DrawReason::FiftyMove));
    let board = Board::from_fen("7k/8/8/8/8/8/8/KR6 w - - 99 80").unwrap();
    assert_eq!(board.outcome(), GameOutcome::Ongoing);
}

#[test]
fn test_halfmove_resets_on_pawn_move() {
    let mut board = Board::from_fen("8/8/8/8/8/8/4P3/K1k5 w - - 99 1").unwrap();
    play(&mut board, &["e2e4"]);
    assert_eq!(board.halfmove_clock(), 0);
    assert!(!board.is_draw());
}

#[test]
fn test_checkmate_beats_fifty_move_rule() {
    let board = Board::from_fen("7k/7Q/7K/8/8/8/8/8 b - - 100 60").unwrap();
    assert!(board.is_checkmate());
    assert_eq!(
        board.outcome(),
        GameOutcome::Checkmate {
            winner: Color::White
        }
    );
}

#[test]
fn test_threefold_repetition() {
    let mut board = Board::new();
    let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
    play(&mut board, &shuffle);
    assert_eq!(board.repetition_count(), 1);
    assert!(!board.is_threefold_repetition());

    play(&mut board, &shuffle);
    assert_eq!(board.repetition_count(), 2);
    assert_eq!(board.outcome(), GameOutcome::Draw(DrawReason::Repetition));

    board.undo();
    assert!(!board.is_threefold_repetition());
}

#[test]
fn test_repetition_cut_by_irreversible_move() {
    let mut board = Board::new();
    play(&mut board, &["g1f3", "g8f6", "f3g1", "f6g8", "e2e4", "e7e5"]);
    play(&mut board, &["g1f3", "g8f6", "f3g1", "f6g8"]);
    assert_eq!(board.repetition_count(), 1);
}

#[test]
fn test_shuffle_after_double_pushes_reaches_threefold() {
    let mut board = Board::new();
    play(&mut board, &["e2e4", "e7e5"]);
    let after_pushes = board.key();
    play(&mut board, &["g1f3", "g8f6", "f3g1", "f6g8"]);
    assert_eq!(board.key(), after_pushes);
    assert_eq!(board.repetition_count(), 1);
    play(&mut board, &["g1f3", "g8f6", "f3g1", "f6g8"]);
    assert_eq!(board.repetition_count(), 2);
    assert_eq!(board.outcome(), GameOutcome::Draw(DrawReason::Repetition));
}

#[test]
fn test_repetition_needs_same_side_to_move() {
    // Same placement after a null move is a different position.
    let mut board = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 0 1").unwrap();
    let key = board.key();
    board.make_null_move();
    assert_ne!(board.key(), key);
    assert_eq!(board.repetition_count(), 0);
}

#[test]
fn test_insufficient_material() {
    let drawn = [
        "8/8/8/8/8/8/8/K1k5 w - - 0 1",
        "8/8/8/8/8/8/6N1/K1k5 w - - 0 1",
        "8/8/8/8/8/8/6b1/K1k5 w - - 0 1",
        "8/8/8/8/8/5B2/6b1/K1k5 w - - 0 1",
    ];
    for fen in drawn {
        let board = Board::from_fen(fen).unwrap();
        assert!(board.is_insufficient_material(), "{fen}");
        assert_eq!(
            board.outcome(),
            GameOutcome::Draw(DrawReason::InsufficientMaterial)
        );
    }

    let playable = [
        "8/8/8/8/8/8/5Nb1/K1k5 w - - 0 1",
        "8/8/8/8/8/8/5bb1/K1k5 w - - 0 1",
        "8/8/8/8/8/8/6p1/K1k5 w - - 0 1",
        "8/8/8/8/8/8/6N1/KNk5 w - - 0 1",
    ];
    for fen in playable {
        let board = Board::from_fen(fen).unwrap();
        assert!(!board.is_insufficient_material(), "{fen}");
    }
}

#[test]
fn test_stalemate() {
    let board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(board.is_stalemate());
    assert!(!board.is_checkmate());
    assert_eq!(board.outcome(), GameOutcome::Draw(DrawReason::Stalemate));
    assert!(board.is_draw());
}

#[test]
fn test_fools_mate() {
    let mut board = Board::new();
    play(&mut board, &["f2f3", "e7e5", "g2g4", "d8h4"]);
    assert!(board.is_checkmate());
    assert_eq!(board.outcome().to_string(), "0-1");
}
