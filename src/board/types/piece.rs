//! Piece kinds and sides.

use std::fmt;
use std::ops::Not;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// FEN letters for each piece kind, indexed like [`Piece::index`].
const LETTERS: [char; 6] = ['p', 'n', 'b', 'r', 'q', 'k'];

/// What stands on an occupied square. Empty squares are `Option::None`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Piece {
    /// Pawn through king; the position in this array is the bitboard slot.
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Slot back to kind. Anything past the queen slot reads as a king.
    #[inline]
    #[must_use]
    pub(crate) const fn from_index(slot: usize) -> Piece {
        if slot < Self::ALL.len() {
            Self::ALL[slot]
        } else {
            Piece::King
        }
    }

    /// Kind named by a FEN letter of either case.
    #[must_use]
    pub fn from_char(letter: char) -> Option<Piece> {
        let lower = letter.to_ascii_lowercase();
        LETTERS
            .iter()
            .position(|&l| l == lower)
            .map(Piece::from_index)
    }

    /// Lowercase letter, as used for promotions in UCI moves.
    #[inline]
    #[must_use]
    pub const fn to_char(self) -> char {
        LETTERS[self.index()]
    }

    /// Letter for the FEN board field: White upper case, Black lower case.
    #[inline]
    #[must_use]
    pub fn to_fen_char(self, side: Color) -> char {
        match side {
            Color::White => self.to_char().to_ascii_uppercase(),
            Color::Black => self.to_char(),
        }
    }

    /// Centipawn worth used for the non-pawn material tally.
    #[inline]
    #[must_use]
    pub const fn value(self) -> i32 {
        match self {
            Piece::Pawn => 100,
            Piece::Knight => 320,
            Piece::Bishop => 330,
            Piece::Rook => 500,
            Piece::Queen => 900,
            Piece::King => 0,
        }
    }
}

/// Promotion choices in generation order.
pub(crate) const PROMOTION_PIECES: [Piece; 4] =
    [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

/// Side to move or owner of a piece. `!color` gives the other side.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const BOTH: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Rank index the side's king and rooks start on.
    #[inline]
    #[must_use]
    pub(crate) const fn back_rank(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Rank step of a single pawn push.
    #[inline]
    #[must_use]
    pub(crate) const fn pawn_direction(self) -> isize {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

impl Not for Color {
    type Output = Color;

    fn not(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::White => "White",
            Color::Black => "Black",
        })
    }
}
