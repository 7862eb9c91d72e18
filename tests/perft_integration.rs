use chess_position::board::START_FEN;
use chess_position::perft::perft_parallel;
use chess_position::{Board, Perft, PerftConfig};

const POSITIONS: &[(&str, u32, u64)] = &[
    (START_FEN, 4, 197_281),
    (
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        3,
        97_862,
    ),
    ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 4, 43_238),
    (
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        3,
        9467,
    ),
    (
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        3,
        62_379,
    ),
];

#[test]
fn perft_strategies_agree() {
    for &(fen, depth, expected) in POSITIONS {
        let mut board = Board::from_fen(fen).unwrap();
        assert_eq!(board.perft(depth), expected, "plain {fen}");

        let mut session = Perft::new(PerftConfig::default());
        assert_eq!(session.run(&mut board, depth), expected, "cached {fen}");

        assert_eq!(perft_parallel(&board, depth, 3), expected, "parallel {fen}");
        assert_eq!(board.to_fen(), Board::from_fen(fen).unwrap().to_fen());
    }
}

#[test]
fn divide_matches_child_perft() {
    let mut board = Board::from_fen(POSITIONS[1].0).unwrap();
    let mut session = Perft::new(PerftConfig::uncached());
    for (mv, nodes) in session.divide(&mut board, 2) {
        board.make_move(mv);
        assert_eq!(board.perft(1), nodes, "{mv}");
        board.take_move(mv);
    }
}

#[test]
fn perft_after_moves_played() {
    // Counts depend only on the position, not on how it was reached.
    let mut played = Board::new();
    for uci in ["e2e4", "c7c5", "g1f3"] {
        played.make_move_uci(uci).unwrap();
    }
    let mut fresh = Board::from_fen(&played.to_fen()).unwrap();
    assert_eq!(played.perft(3), fresh.perft(3));
}
