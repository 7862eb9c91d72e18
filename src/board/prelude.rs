//! Prelude module for convenient imports.
//!
//! # Example
//! ```
//! use chess_position::board::prelude::*;
//!
//! let board = Board::new();
//! assert_eq!(board.side_to_move(), Color::White);
//! ```

pub use super::{
    Bitboard, Board, BoardBuilder, CastlingRights, Color, FenError, GameOutcome, Move, MoveError,
    MoveList, MoveParseError, MoveType, Piece, PieceEvent, PieceObserver, Square,
};
pub use crate::perft::{Perft, PerftConfig};
