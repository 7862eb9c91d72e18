//! Core chess types.
//!
//! This module contains the fundamental types used throughout the crate:
//! - `Piece` and `Color` - chess piece types and colors
//! - `Square` - compact board square representation (u8 index)
//! - `Bitboard` - 64-bit square set
//! - `Move`, `MoveType` and `MoveList` - move representation
//! - `CastlingRights` - castling state

mod bitboard;
mod castling;
mod moves;
mod piece;
mod square;

// Re-export all public types
pub use bitboard::{Bitboard, BitboardIter};
pub use castling::CastlingRights;
pub use moves::{Move, MoveList, MoveListIntoIter, MoveType};
pub use piece::{Color, Piece};
pub use square::Square;

// Re-export internal utilities
pub(crate) use castling::{CASTLE_BLACK_K, CASTLE_BLACK_Q, CASTLE_WHITE_K, CASTLE_WHITE_Q};
pub(crate) use piece::PROMOTION_PIECES;
