//! Castling rights type.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Color;

pub(crate) const CASTLE_WHITE_K: u8 = 1 << 0;
pub(crate) const CASTLE_WHITE_Q: u8 = 1 << 1;
pub(crate) const CASTLE_BLACK_K: u8 = 1 << 2;
pub(crate) const CASTLE_BLACK_Q: u8 = 1 << 3;

/// All castling rights combined
pub(crate) const ALL_CASTLING_RIGHTS: u8 =
    CASTLE_WHITE_K | CASTLE_WHITE_Q | CASTLE_BLACK_K | CASTLE_BLACK_Q;

/// Castling rights represented as a bitmask
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastlingRights(u8);

impl CastlingRights {
    /// No castling rights
    #[must_use]
    pub const fn none() -> Self {
        CastlingRights(0)
    }

    /// All castling rights (both sides can castle kingside and queenside)
    #[must_use]
    pub const fn all() -> Self {
        CastlingRights(ALL_CASTLING_RIGHTS)
    }

    /// Check if a specific castling right is set
    #[inline]
    #[must_use]
    pub const fn has(self, color: Color, kingside: bool) -> bool {
        self.0 & Self::bit_for(color, kingside) != 0
    }

    /// Returns true if `color` holds either castling right
    #[inline]
    #[must_use]
    pub const fn any(self, color: Color) -> bool {
        self.has(color, true) || self.has(color, false)
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Set a specific castling right
    #[inline]
    pub fn set(&mut self, color: Color, kingside: bool) {
        self.0 |= Self::bit_for(color, kingside);
    }

    /// Remove a specific castling right
    #[inline]
    pub fn remove(&mut self, color: Color, kingside: bool) {
        self.0 &= !Self::bit_for(color, kingside);
    }

    /// Drop every right whose bit is set in `mask`.
    #[inline]
    pub(crate) fn clear_mask(&mut self, mask: u8) {
        self.0 &= !mask;
    }

    #[inline]
    const fn bit_for(color: Color, kingside: bool) -> u8 {
        match (color, kingside) {
            (Color::White, true) => CASTLE_WHITE_K,
            (Color::White, false) => CASTLE_WHITE_Q,
            (Color::Black, true) => CASTLE_BLACK_K,
            (Color::Black, false) => CASTLE_BLACK_Q,
        }
    }
}

/// FEN castling field (`KQkq`, `-` when empty)
impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        for (bit, ch) in [
            (CASTLE_WHITE_K, 'K'),
            (CASTLE_WHITE_Q, 'Q'),
            (CASTLE_BLACK_K, 'k'),
            (CASTLE_BLACK_Q, 'q'),
        ] {
            if self.0 & bit != 0 {
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_remove() {
        let mut rights = CastlingRights::none();
        rights.set(Color::White, true);
        rights.set(Color::Black, false);
        assert!(rights.has(Color::White, true));
        assert!(!rights.has(Color::White, false));
        assert_eq!(rights.to_string(), "Kq");
        rights.remove(Color::White, true);
        assert_eq!(rights.to_string(), "q");
    }

    #[test]
    fn test_clear_mask() {
        let mut rights = CastlingRights::all();
        rights.clear_mask(CASTLE_WHITE_K | CASTLE_WHITE_Q);
        assert!(!rights.any(Color::White));
        assert!(rights.any(Color::Black));
        assert_eq!(rights.to_string(), "kq");
    }
}
