//! Zobrist hashing for chess positions.
//!
//! Provides incrementally-updatable 64-bit position keys for the perft cache,
//! the transposition table and repetition detection.

use once_cell::sync::Lazy;
use rand::prelude::*;

use crate::board::{CastlingRights, Color, Piece, Square};

pub(crate) struct ZobristKeys {
    // piece_keys[piece_type][color][square_index]
    piece_keys: [[[u64; 64]; 2]; 6],
    black_to_move_key: u64,
    // castling_keys[color][side]: 0=White, 1=Black; 0=Kingside, 1=Queenside
    castling_keys: [[u64; 2]; 2],
    // en_passant_keys[file_index] (only file matters for EP target)
    en_passant_keys: [u64; 8],
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(1234567890_u64); // Fixed seed: keys are stable across runs
        let mut piece_keys = [[[0; 64]; 2]; 6];
        let mut castling_keys = [[0; 2]; 2];
        let mut en_passant_keys = [0; 8];

        for piece in &mut piece_keys {
            for color in piece.iter_mut() {
                for key in color.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        let black_to_move_key = rng.gen();

        for color in &mut castling_keys {
            for key in color.iter_mut() {
                *key = rng.gen();
            }
        }

        for key in &mut en_passant_keys {
            *key = rng.gen();
        }

        ZobristKeys {
            piece_keys,
            black_to_move_key,
            castling_keys,
            en_passant_keys,
        }
    }

    #[inline]
    pub(crate) fn piece(&self, color: Color, piece: Piece, sq: Square) -> u64 {
        self.piece_keys[piece.index()][color.index()][sq.index()]
    }

    #[inline]
    pub(crate) fn side(&self) -> u64 {
        self.black_to_move_key
    }

    #[inline]
    pub(crate) fn en_passant(&self, sq: Square) -> u64 {
        self.en_passant_keys[sq.file()]
    }

    /// Combined key of every right held in `rights`.
    pub(crate) fn castling(&self, rights: CastlingRights) -> u64 {
        let mut key = 0;
        for color in Color::BOTH {
            if rights.has(color, true) {
                key ^= self.castling_keys[color.index()][0];
            }
            if rights.has(color, false) {
                key ^= self.castling_keys[color.index()][1];
            }
        }
        key
    }
}

// Initialize Zobrist keys lazily and globally; they are immutable after creation
pub(crate) static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_distinct() {
        let a = ZOBRIST.piece(Color::White, Piece::Pawn, Square::A1);
        let b = ZOBRIST.piece(Color::Black, Piece::Pawn, Square::A1);
        let c = ZOBRIST.piece(Color::White, Piece::Knight, Square::A1);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(ZOBRIST.side(), 0);
    }

    #[test]
    fn test_castling_key_composes_by_xor() {
        let mut kq = CastlingRights::none();
        kq.set(Color::White, true);
        let k_only = ZOBRIST.castling(kq);
        kq.set(Color::White, false);
        let both = ZOBRIST.castling(kq);
        let mut q = CastlingRights::none();
        q.set(Color::White, false);
        assert_eq!(both, k_only ^ ZOBRIST.castling(q));
        assert_eq!(ZOBRIST.castling(CastlingRights::none()), 0);
    }
}
