//! Error types for chess board operations.

use std::fmt;

use super::Move;

/// Error type for FEN parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN string has too few or too many fields (needs 4 to 6)
    WrongFieldCount { found: usize },
    /// Piece placement does not describe exactly 8 ranks
    WrongRankCount { found: usize },
    /// Invalid piece character in position string
    InvalidPiece { char: char },
    /// A rank describes more or fewer than 8 files
    WrongFileCount { rank: usize, files: usize },
    /// Invalid side to move (must be 'w' or 'b')
    InvalidSideToMove { found: String },
    /// Invalid castling character
    InvalidCastling { char: char },
    /// Invalid en passant square
    InvalidEnPassant { found: String },
    /// Half-move clock is not a number
    InvalidHalfmoveClock { found: String },
    /// Full-move number is not a number
    InvalidFullmoveNumber { found: String },
    /// A side does not have exactly one king
    InvalidKingCount { color: super::Color, found: u32 },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::WrongFieldCount { found } => {
                write!(f, "FEN must have 4 to 6 fields, found {found}")
            }
            FenError::WrongRankCount { found } => {
                write!(f, "FEN piece placement must have 8 ranks, found {found}")
            }
            FenError::InvalidPiece { char } => {
                write!(f, "Invalid piece character '{char}' in FEN")
            }
            FenError::WrongFileCount { rank, files } => {
                write!(f, "Rank {rank} describes {files} files, expected 8")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "Invalid side to move '{found}', expected 'w' or 'b'")
            }
            FenError::InvalidCastling { char } => {
                write!(f, "Invalid castling character '{char}' in FEN")
            }
            FenError::InvalidEnPassant { found } => {
                write!(f, "Invalid en passant square '{found}'")
            }
            FenError::InvalidHalfmoveClock { found } => {
                write!(f, "Invalid half-move clock '{found}'")
            }
            FenError::InvalidFullmoveNumber { found } => {
                write!(f, "Invalid full-move number '{found}'")
            }
            FenError::InvalidKingCount { color, found } => {
                write!(f, "{color} must have exactly one king, found {found}")
            }
        }
    }
}

impl std::error::Error for FenError {}

/// Error type for move parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    /// Move string has invalid length (must be 4-5 characters)
    InvalidLength { len: usize },
    /// Invalid square notation in move
    InvalidSquare { notation: String },
    /// Invalid promotion piece
    InvalidPromotion { char: char },
    /// Move is not legal in the current position
    IllegalMove { notation: String },
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::InvalidLength { len } => {
                write!(f, "Move must be 4-5 characters, found {len}")
            }
            MoveParseError::InvalidSquare { notation } => {
                write!(f, "Invalid square notation in '{notation}'")
            }
            MoveParseError::InvalidPromotion { char } => {
                write!(f, "Invalid promotion piece '{char}'")
            }
            MoveParseError::IllegalMove { notation } => {
                write!(f, "Illegal move '{notation}'")
            }
        }
    }
}

impl std::error::Error for MoveParseError {}

/// Error returned when applying a move that is not legal in the position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// The move is not in the legal move list of the side to move
    IllegalMove { mv: Move },
    /// The null move cannot be applied while in check
    NullMoveInCheck,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::IllegalMove { mv } => write!(f, "Illegal move '{mv}'"),
            MoveError::NullMoveInCheck => write!(f, "Cannot pass the turn while in check"),
        }
    }
}

impl std::error::Error for MoveError {}

/// Error type for square parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    /// Rank out of bounds (must be 0-7)
    RankOutOfBounds { rank: usize },
    /// File out of bounds (must be 0-7)
    FileOutOfBounds { file: usize },
    /// Invalid algebraic notation
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::RankOutOfBounds { rank } => {
                write!(f, "Rank {rank} out of bounds (must be 0-7)")
            }
            SquareError::FileOutOfBounds { file } => {
                write!(f, "File {file} out of bounds (must be 0-7)")
            }
            SquareError::InvalidNotation { notation } => {
                write!(f, "Invalid square notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for SquareError {}
