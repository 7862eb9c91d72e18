//! Bitboard type and operations.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

use super::square::Square;

/// A 64-bit bitboard representing a set of squares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(pub u64);

// Board-wide masks
impl Bitboard {
    pub const FILE_A: Bitboard = Bitboard(0x0101010101010101);

    pub const RANK_1: Bitboard = Bitboard(0x00000000000000FF);

    pub const EMPTY: Bitboard = Bitboard(0);
    pub const ALL: Bitboard = Bitboard(!0);

    /// Light squares (b1, d1, ..., a2, c2, ...)
    pub const LIGHT_SQUARES: Bitboard = Bitboard(0x55AA55AA55AA55AA);
    /// Dark squares (a1, c1, ..., b2, d2, ...)
    pub const DARK_SQUARES: Bitboard = Bitboard(0xAA55AA55AA55AA55);
}

impl Bitboard {
    /// Create a bitboard with a single square set
    #[inline]
    #[must_use]
    pub const fn from_square(sq: Square) -> Self {
        Bitboard(1 << sq.index())
    }

    /// Returns an iterator over the squares set in this bitboard, lowest index first
    #[inline]
    #[must_use]
    pub fn iter(self) -> BitboardIter {
        BitboardIter(self)
    }

    /// Returns true if the bitboard is empty
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the number of set bits (population count)
    #[inline]
    #[must_use]
    pub const fn popcount(self) -> u32 {
        self.0.count_ones()
    }

    /// Returns true if more than one bit is set
    #[inline]
    #[must_use]
    pub const fn more_than_one(self) -> bool {
        self.0 & self.0.wrapping_sub(1) != 0
    }

    /// Returns true if the given square is set
    #[inline]
    #[must_use]
    pub const fn contains(self, sq: Square) -> bool {
        (self.0 & (1 << sq.index())) != 0
    }

    /// Least significant set square, if any
    #[inline]
    #[must_use]
    pub const fn lsb(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(Square::from_index_unchecked(self.0.trailing_zeros() as usize))
        }
    }

    /// Remove and return the least significant set square. The board must be non-empty.
    #[inline]
    pub fn pop_lsb(&mut self) -> Square {
        debug_assert!(!self.is_empty());
        let sq = Square::from_index_unchecked(self.0.trailing_zeros() as usize);
        self.0 &= self.0 - 1;
        sq
    }

    /// Squares set in `self` but not in `other`
    #[inline]
    #[must_use]
    pub const fn without(self, other: Self) -> Self {
        Bitboard(self.0 & !other.0)
    }

    /// Get the file mask for a given file index (0-7)
    #[inline]
    #[must_use]
    pub const fn file_mask(file: usize) -> Self {
        Bitboard(Self::FILE_A.0 << file)
    }

    /// Get the rank mask for a given rank index (0-7)
    #[inline]
    #[must_use]
    pub const fn rank_mask(rank: usize) -> Self {
        Bitboard(Self::RANK_1.0 << (rank * 8))
    }
}

impl BitOr for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitOr<Square> for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn bitor(self, rhs: Square) -> Self {
        Bitboard(self.0 | (1 << rhs.index()))
    }
}

impl BitAnd for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitXor for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl BitXor<Square> for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn bitxor(self, rhs: Square) -> Self {
        Bitboard(self.0 ^ (1 << rhs.index()))
    }
}

impl Not for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn not(self) -> Self {
        Bitboard(!self.0)
    }
}

impl BitOrAssign for Bitboard {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAndAssign for Bitboard {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl BitXorAssign for Bitboard {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl BitOrAssign<Square> for Bitboard {
    #[inline]
    fn bitor_assign(&mut self, rhs: Square) {
        self.0 |= 1 << rhs.index();
    }
}

impl BitXorAssign<Square> for Bitboard {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Square) {
        self.0 ^= 1 << rhs.index();
    }
}

impl From<Square> for Bitboard {
    fn from(sq: Square) -> Self {
        Bitboard::from_square(sq)
    }
}

impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            for file in 0..8 {
                let ch = if self.contains(Square::from_coords(rank, file)) {
                    '1'
                } else {
                    '.'
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Iterator over set squares in a Bitboard
pub struct BitboardIter(Bitboard);

impl Iterator for BitboardIter {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.pop_lsb())
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.popcount() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for BitboardIter {}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;

    fn into_iter(self) -> Self::IntoIter {
        BitboardIter(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_is_lowest_first() {
        let bb = Bitboard::from_square(Square::H8) | Square::A1 | Square::E1;
        let squares: Vec<Square> = bb.iter().collect();
        assert_eq!(squares, vec![Square::A1, Square::E1, Square::H8]);
    }

    #[test]
    fn test_set_operations() {
        let a = Bitboard::RANK_1;
        let b = Bitboard::FILE_A;
        assert_eq!((a & b).popcount(), 1);
        assert_eq!((a | b).popcount(), 15);
        assert_eq!(a.without(b).popcount(), 7);
        assert!((a & b).contains(Square::A1));
        assert!(!(a ^ b).contains(Square::A1));
    }

    #[test]
    fn test_lsb_and_pop() {
        let mut bb = Bitboard::rank_mask(7);
        assert_eq!(bb.lsb(), Some(Square::A8));
        assert_eq!(bb.pop_lsb(), Square::A8);
        assert_eq!(bb.lsb(), Some(Square::B8));
        assert_eq!(Bitboard::EMPTY.lsb(), None);
    }

    #[test]
    fn test_more_than_one() {
        assert!(!Bitboard::EMPTY.more_than_one());
        assert!(!Bitboard::from_square(Square::D1).more_than_one());
        assert!(Bitboard::rank_mask(1).more_than_one());
    }
}
