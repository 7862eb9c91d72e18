//! Chess position engine: bitboard board model, legal move generation,
//! exact make/take of moves, draw detection, perft and hash tables.
//!
//! # Example
//! ```
//! use chess_position::{Board, Perft, PerftConfig};
//!
//! let mut board = Board::new();
//! assert_eq!(board.perft(3), 8902);
//!
//! let mut perft = Perft::new(PerftConfig::default());
//! assert_eq!(perft.run(&mut board, 4), 197_281);
//! ```

/// Debug-level log line, compiled in only with the `logging` feature.
macro_rules! debug_log {
    ($($arg:tt)*) => {{
        #[cfg(feature = "logging")]
        log::debug!($($arg)*);
        #[cfg(not(feature = "logging"))]
        let _ = format_args!($($arg)*);
    }};
}

pub mod board;
pub mod perft;
pub mod tt;
mod zobrist;

pub use board::{Board, Color, GameOutcome, Move, MoveList, Piece, Square};
pub use perft::{perft_parallel, Perft, PerftCache, PerftConfig, SharedPerftCache};
pub use tt::{Bound, TTEntry, TranspositionTable, DEFAULT_TT_MB};
