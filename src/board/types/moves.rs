//! Move types and move list.

use std::fmt;
use std::ops::Index;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Piece;
use super::square::Square;
use crate::board::error::MoveParseError;

const TO_MASK: u16 = 0x3F;
const FROM_SHIFT: u16 = 6;
const PROMO_SHIFT: u16 = 12;
const TYPE_SHIFT: u16 = 14;

/// The kind of a move, stored in the two top bits of the packed value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MoveType {
    Normal = 0,
    Promotion = 1,
    EnPassant = 2,
    Castling = 3,
}

impl MoveType {
    const fn from_bits(bits: u16) -> Self {
        match bits & 3 {
            0 => MoveType::Normal,
            1 => MoveType::Promotion,
            2 => MoveType::EnPassant,
            _ => MoveType::Castling,
        }
    }
}

/// Compact 16-bit move representation.
///
/// Encoding:
/// - bits 0-5:   to square (0-63)
/// - bits 6-11:  from square (0-63)
/// - bits 12-13: promotion piece, as offset from knight
/// - bits 14-15: move type
///
/// Castling is encoded as the king's own move (e1g1, e1c1, ...).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move(u16);

impl Move {
    /// The null move (all bits zero)
    pub const NULL: Move = Move(0);

    /// Create a quiet move or capture
    #[inline]
    #[must_use]
    pub const fn new(from: Square, to: Square) -> Self {
        Move(to.index() as u16 | ((from.index() as u16) << FROM_SHIFT))
    }

    /// Create a move of the given type; `promotion` is only meaningful for promotions.
    #[inline]
    #[must_use]
    pub const fn with_type(from: Square, to: Square, kind: MoveType, promotion: Piece) -> Self {
        let promo = match promotion {
            Piece::Bishop => 1,
            Piece::Rook => 2,
            Piece::Queen => 3,
            _ => 0,
        };
        Move(
            to.index() as u16
                | ((from.index() as u16) << FROM_SHIFT)
                | (promo << PROMO_SHIFT)
                | ((kind as u16) << TYPE_SHIFT),
        )
    }

    /// Create a special (non-promotion) move; the promotion field defaults to knight.
    #[inline]
    #[must_use]
    pub const fn special(from: Square, to: Square, kind: MoveType) -> Self {
        Move::with_type(from, to, kind, Piece::Knight)
    }

    /// Create a promotion move
    #[inline]
    #[must_use]
    pub const fn promotion_to(from: Square, to: Square, piece: Piece) -> Self {
        Move::with_type(from, to, MoveType::Promotion, piece)
    }

    /// Get the source square
    #[inline]
    #[must_use]
    pub const fn from(self) -> Square {
        Square::from_index_unchecked(((self.0 >> FROM_SHIFT) & 0x3F) as usize)
    }

    /// Get the destination square
    #[inline]
    #[must_use]
    pub const fn to(self) -> Square {
        Square::from_index_unchecked((self.0 & TO_MASK) as usize)
    }

    #[inline]
    #[must_use]
    pub const fn move_type(self) -> MoveType {
        MoveType::from_bits(self.0 >> TYPE_SHIFT)
    }

    /// The decoded promotion piece field (knight for non-promotions)
    #[inline]
    #[must_use]
    pub const fn promotion_piece(self) -> Piece {
        Piece::from_index(((self.0 >> PROMO_SHIFT) & 3) as usize + 1)
    }

    /// Get the promotion piece, if this is a promotion move
    #[inline]
    #[must_use]
    pub const fn promotion(self) -> Option<Piece> {
        if self.is_promotion() {
            Some(self.promotion_piece())
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// A move is valid when origin and destination differ
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.from().index() != self.to().index()
    }

    #[inline]
    #[must_use]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.move_type(), MoveType::EnPassant)
    }

    #[inline]
    #[must_use]
    pub const fn is_castling(self) -> bool {
        matches!(self.move_type(), MoveType::Castling)
    }

    #[inline]
    #[must_use]
    pub const fn is_promotion(self) -> bool {
        matches!(self.move_type(), MoveType::Promotion)
    }

    /// Get the raw 16-bit value (for hashing/storage)
    #[inline]
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Create from raw 16-bit value
    #[inline]
    #[must_use]
    pub const fn from_u16(value: u16) -> Self {
        Move(value)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.move_type() {
            MoveType::Normal => write!(f, "Move({self})"),
            kind => write!(f, "Move({self} {kind:?})"),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "..");
        }
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(promo) = self.promotion() {
            write!(f, "{}", promo.to_char())?;
        }
        Ok(())
    }
}

/// Parses coordinate notation. Only the squares and promotion piece are known here;
/// use `Board::parse_move` to resolve castling and en passant against a position.
impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 4 || s.len() > 5 || !s.is_ascii() {
            return Err(MoveParseError::InvalidLength { len: s.len() });
        }
        let invalid_square = || MoveParseError::InvalidSquare {
            notation: s.to_string(),
        };
        let from: Square = s[0..2].parse().map_err(|_| invalid_square())?;
        let to: Square = s[2..4].parse().map_err(|_| invalid_square())?;

        match s[4..].chars().next() {
            None => Ok(Move::new(from, to)),
            Some(c) => match Piece::from_char(c) {
                Some(piece @ (Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen)) => {
                    Ok(Move::promotion_to(from, to, piece))
                }
                _ => Err(MoveParseError::InvalidPromotion { char: c }),
            },
        }
    }
}

pub(crate) const MAX_MOVES: usize = 256;

/// List of moves with fixed-size backing array.
#[derive(Clone, Debug)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    #[must_use]
    pub fn new() -> Self {
        MoveList {
            moves: [Move::NULL; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, mv: Move) {
        self.moves[self.len] = mv;
        self.len += 1;
    }

    /// Keep only the moves for which `keep` returns true, preserving order.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(Move) -> bool) {
        let mut write = 0;
        for read in 0..self.len {
            let mv = self.moves[read];
            if keep(mv) {
                self.moves[write] = mv;
                write += 1;
            }
        }
        self.len = write;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[must_use]
    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }

    #[must_use]
    pub fn get(&self, idx: usize) -> Option<Move> {
        self.as_slice().get(idx).copied()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        MoveList::new()
    }
}

/// Owning iterator over moves in a `MoveList`
pub struct MoveListIntoIter {
    list: MoveList,
    idx: usize,
}

impl Iterator for MoveListIntoIter {
    type Item = Move;

    fn next(&mut self) -> Option<Self::Item> {
        if self.idx < self.list.len {
            let mv = self.list.moves[self.idx];
            self.idx += 1;
            Some(mv)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.list.len - self.idx;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MoveListIntoIter {}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = MoveListIntoIter;

    fn into_iter(self) -> Self::IntoIter {
        MoveListIntoIter { list: self, idx: 0 }
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, idx: usize) -> &Self::Output {
        assert!(
            idx < self.len,
            "MoveList index {} out of bounds (len {})",
            idx,
            self.len
        );
        &self.moves[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_null_move() {
        assert!(Move::NULL.is_null());
        assert!(!Move::NULL.is_valid());
        assert_eq!(Move::NULL.to_string(), "..");
        assert_eq!(Move::default(), Move::NULL);
    }

    #[test]
    fn test_decode_normal_move() {
        let mv = Move::new(sq("e2"), sq("e4"));
        assert_eq!(mv.from(), sq("e2"));
        assert_eq!(mv.to(), sq("e4"));
        assert_eq!(mv.move_type(), MoveType::Normal);
        assert_eq!(mv.promotion(), None);
        assert_eq!(mv.promotion_piece(), Piece::Knight);
        assert!(mv.is_valid());
        assert_eq!(mv.to_string(), "e2e4");
    }

    #[test]
    fn test_decode_promotions() {
        for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
            let mv = Move::promotion_to(sq("b7"), sq("a8"), piece);
            assert!(mv.is_promotion());
            assert_eq!(mv.promotion(), Some(piece));
            assert_eq!(mv.from(), sq("b7"));
            assert_eq!(mv.to(), sq("a8"));
        }
        assert_eq!(
            Move::promotion_to(sq("e7"), sq("e8"), Piece::Queen).to_string(),
            "e7e8q"
        );
    }

    #[test]
    fn test_special_moves_keep_type() {
        let castle = Move::special(Square::E1, Square::G1, MoveType::Castling);
        assert!(castle.is_castling());
        assert!(!castle.is_promotion());
        let ep = Move::special(sq("e5"), sq("d6"), MoveType::EnPassant);
        assert!(ep.is_en_passant());
        assert_ne!(ep, Move::new(sq("e5"), sq("d6")));
    }

    #[test]
    fn test_equality_is_on_packed_value() {
        let a = Move::new(sq("g1"), sq("f3"));
        let b = Move::from_u16(a.as_u16());
        assert_eq!(a, b);
        let a1_to_a1 = Move::new(Square::A1, Square::A1);
        assert!(a1_to_a1.is_null());
    }

    #[test]
    fn test_parse_coordinate_notation() {
        let mv: Move = "e7e8n".parse().unwrap();
        assert_eq!(mv.promotion(), Some(Piece::Knight));
        assert!(matches!(
            "e7e8k".parse::<Move>(),
            Err(MoveParseError::InvalidPromotion { char: 'k' })
        ));
        assert!(matches!(
            "e7".parse::<Move>(),
            Err(MoveParseError::InvalidLength { len: 2 })
        ));
        assert!(matches!(
            "z9e4".parse::<Move>(),
            Err(MoveParseError::InvalidSquare { .. })
        ));
    }

    #[test]
    fn test_move_list_retain() {
        let mut list = MoveList::new();
        list.push(Move::new(Square::A1, Square::B1));
        list.push(Move::new(Square::A1, Square::C1));
        list.push(Move::new(Square::A1, Square::D1));
        list.retain(|m| m.to() != Square::C1);
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].to(), Square::D1);
    }
}
