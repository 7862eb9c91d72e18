use chess_position::board::{DrawReason, FenError, MoveError, MoveParseError, START_FEN};
use chess_position::{Board, Bound, Color, GameOutcome, Move, TranspositionTable};

#[test]
fn scholars_mate_game() {
    let mut board: Board = START_FEN.parse().unwrap();
    for uci in ["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6"] {
        board.make_move_uci(uci).unwrap();
        assert_eq!(board.outcome(), GameOutcome::Ongoing);
    }
    let mate = board.parse_move("h5f7").unwrap();
    assert!(board.gives_check(mate));
    board.try_make_move(mate).unwrap();

    assert_eq!(
        board.outcome(),
        GameOutcome::Checkmate {
            winner: Color::White
        }
    );
    assert_eq!(board.fullmove_number(), 4);
    assert_eq!(
        board.to_fen(),
        "r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4"
    );

    assert_eq!(board.undo(), Some(mate));
    assert_eq!(board.outcome(), GameOutcome::Ongoing);
}

#[test]
fn errors_are_reported_not_panicked() {
    let mut board = Board::new();
    assert!(matches!(
        Board::from_fen("8/8/8/8/8/8/8/8 w - - 0 1"),
        Err(FenError::InvalidKingCount { .. })
    ));
    assert!(matches!(
        board.parse_move("e2e5"),
        Err(MoveParseError::IllegalMove { .. })
    ));
    assert!(matches!(
        board.parse_move("e2"),
        Err(MoveParseError::InvalidLength { .. })
    ));

    let bogus = Move::new("a1".parse().unwrap(), "a5".parse().unwrap());
    assert_eq!(
        board.try_make_move(bogus),
        Err(MoveError::IllegalMove { mv: bogus })
    );
    assert_eq!(board.ply_count(), 0);

    let err = board.set_fen("not a fen").unwrap_err();
    assert!(!err.to_string().is_empty());
    assert_eq!(board.to_fen(), START_FEN);
}

#[test]
fn repetition_by_knight_shuffle() {
    let mut board = Board::new();
    for _ in 0..2 {
        for uci in ["b1c3", "b8c6", "c3b1", "c6b8"] {
            board.make_move_uci(uci).unwrap();
        }
    }
    assert_eq!(board.outcome(), GameOutcome::Draw(DrawReason::Repetition));
    assert!(board.is_draw());
}

#[test]
fn transposition_table_keeps_positions_apart() {
    let tt = TranspositionTable::new(1);
    let mut board = Board::new();
    let start_key = board.key();
    let e4 = board.make_move_uci("e2e4").unwrap();
    let after_key = board.key();

    tt.store(start_key, 25, Bound::Exact, 6, Some(e4), tt.generation());
    tt.store(after_key, -10, Bound::Upper, 5, None, tt.generation());

    let hit = tt.probe(start_key).unwrap();
    assert_eq!(hit.best_move, Some(e4));
    assert_eq!(hit.value, 25);
    assert_eq!(tt.probe(after_key).unwrap().bound, Bound::Upper);

    tt.clear();
    assert!(tt.probe(start_key).is_none());
}
