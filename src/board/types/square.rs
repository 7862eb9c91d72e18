//! Square type and coordinate helpers.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::error::SquareError;

/// A square on the chess board, stored as its index (a1 = 0, b1 = 1, ..., h8 = 63).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Square(u8);

impl Square {
    pub const A1: Square = Square(0);
    pub const B1: Square = Square(1);
    pub const C1: Square = Square(2);
    pub const D1: Square = Square(3);
    pub const E1: Square = Square(4);
    pub const F1: Square = Square(5);
    pub const G1: Square = Square(6);
    pub const H1: Square = Square(7);
    pub const A8: Square = Square(56);
    pub const B8: Square = Square(57);
    pub const C8: Square = Square(58);
    pub const D8: Square = Square(59);
    pub const E8: Square = Square(60);
    pub const F8: Square = Square(61);
    pub const G8: Square = Square(62);
    pub const H8: Square = Square(63);

    /// Create a square from rank and file with bounds checking
    #[must_use]
    pub const fn new(rank: usize, file: usize) -> Option<Self> {
        if rank < 8 && file < 8 {
            Some(Square((rank * 8 + file) as u8))
        } else {
            None
        }
    }

    /// Create a square from rank and file; both must be in 0..8.
    #[inline]
    #[must_use]
    pub(crate) const fn from_coords(rank: usize, file: usize) -> Self {
        debug_assert!(rank < 8 && file < 8);
        Square((rank * 8 + file) as u8)
    }

    /// Create a square from an index (0-63)
    #[must_use]
    pub const fn from_index(idx: usize) -> Option<Self> {
        if idx < 64 {
            Some(Square(idx as u8))
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub(crate) const fn from_index_unchecked(idx: usize) -> Self {
        debug_assert!(idx < 64);
        Square(idx as u8)
    }

    /// Get the rank (0-7, where 0 = rank 1)
    #[inline]
    #[must_use]
    pub const fn rank(self) -> usize {
        (self.0 >> 3) as usize
    }

    /// Get the file (0-7, where 0 = file a)
    #[inline]
    #[must_use]
    pub const fn file(self) -> usize {
        (self.0 & 7) as usize
    }

    /// Get the square's index (0-63, a1=0, b1=1, ..., h8=63)
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Flip the square vertically (e.g., a1 <-> a8)
    #[inline]
    #[must_use]
    pub const fn flip_vertical(self) -> Self {
        Square(self.0 ^ 56)
    }

    /// Chebyshev distance: the number of king steps between two squares.
    #[must_use]
    pub const fn distance(self, other: Square) -> usize {
        let dr = self.rank().abs_diff(other.rank());
        let df = self.file().abs_diff(other.file());
        if dr > df {
            dr
        } else {
            df
        }
    }

    /// The square `delta` ranks away on the same file, if on the board.
    #[inline]
    #[must_use]
    pub(crate) const fn offset_rank(self, delta: isize) -> Option<Self> {
        let rank = self.rank() as isize + delta;
        if rank >= 0 && rank < 8 {
            Some(Square::from_coords(rank as usize, self.file()))
        } else {
            None
        }
    }

    /// Iterate over all 64 squares, a1 first.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64u8).map(Square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            (self.file() as u8 + b'a') as char,
            self.rank() + 1
        )
    }
}

impl TryFrom<(usize, usize)> for Square {
    type Error = SquareError;

    fn try_from((rank, file): (usize, usize)) -> Result<Self, Self::Error> {
        if rank >= 8 {
            return Err(SquareError::RankOutOfBounds { rank });
        }
        if file >= 8 {
            return Err(SquareError::FileOutOfBounds { file });
        }
        Ok(Square::from_coords(rank, file))
    }
}

impl FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SquareError::InvalidNotation {
            notation: s.to_string(),
        };
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }
        let file = match bytes[0] {
            b @ b'a'..=b'h' => (b - b'a') as usize,
            _ => return Err(invalid()),
        };
        let rank = match bytes[1] {
            b @ b'1'..=b'8' => (b - b'1') as usize,
            _ => return Err(invalid()),
        };
        Ok(Square::from_coords(rank, file))
    }
}
