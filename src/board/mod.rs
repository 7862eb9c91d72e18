//! Chess board representation and rules.
//!
//! Uses bitboards plus a square array for placement, and an arena of
//! per-ply states so every move can be taken back exactly. Supports full
//! chess rules including castling, en passant, promotions and the
//! automatic draw conditions.
//!
//! # Example
//! ```
//! use chess_position::board::{Board, Color};
//!
//! let mut board = Board::new();
//! let moves = board.generate_moves();
//! assert_eq!(moves.len(), 20);
//!
//! let e4 = board.parse_move("e2e4").unwrap();
//! board.make_move(e4);
//! assert_eq!(board.side_to_move(), Color::Black);
//! board.take_move(e4);
//! assert_eq!(board, Board::new());
//! ```

pub mod attack_tables;
mod builder;
mod debug;
mod draw;
mod error;
mod fen;
mod make_unmake;
mod movegen;
pub mod observer;
pub mod prelude;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use builder::BoardBuilder;
pub use debug::BitboardGrid;
pub use draw::{DrawReason, GameOutcome};
pub use error::{FenError, MoveError, MoveParseError, SquareError};
pub use fen::START_FEN;
pub use observer::{EventCounts, NoopObserver, PieceEvent, PieceObserver};
pub use state::Board;
pub use types::{
    Bitboard, BitboardIter, CastlingRights, Color, Move, MoveList, MoveListIntoIter, MoveType,
    Piece, Square,
};

pub(crate) use types::{
    CASTLE_BLACK_K, CASTLE_BLACK_Q, CASTLE_WHITE_K, CASTLE_WHITE_Q, PROMOTION_PIECES,
};
