//! Attack tables for move generation.
//!
//! Leaper attacks (knight, king, pawn) and the line/between geometry are
//! precomputed once. Sliding attacks use Hyperbola Quintessence, a
//! branch-free algorithm built on the `o^(o-2r)` trick, with a small
//! lookup table for ranks.

#![allow(clippy::needless_range_loop)] // Index loops are clearer for board coordinates
#![allow(clippy::inline_always)] // Performance-critical hot path functions

mod tables;

use once_cell::sync::Lazy;

use super::types::{Bitboard, Color, Piece, Square};
use tables::{BETWEEN, KING_ATTACKS, KNIGHT_ATTACKS, LINE, PAWN_ATTACKS};

// File mask for column A
const FILE_A: u64 = 0x0101010101010101;

/// Diagonal masks for each square (bottom-left to top-right direction)
static DIAG_MASKS: Lazy<[u64; 64]> = Lazy::new(|| {
    let mut masks = [0u64; 64];
    for sq in 0..64 {
        let rank = sq / 8;
        let file = sq % 8;
        let mut mask = 0u64;
        let mut r = rank as isize;
        let mut f = file as isize;
        while r < 8 && f < 8 {
            mask |= 1u64 << (r * 8 + f);
            r += 1;
            f += 1;
        }
        r = rank as isize - 1;
        f = file as isize - 1;
        while r >= 0 && f >= 0 {
            mask |= 1u64 << (r * 8 + f);
            r -= 1;
            f -= 1;
        }
        masks[sq] = mask & !(1u64 << sq);
    }
    masks
});

/// Anti-diagonal masks for each square (top-left to bottom-right direction)
static ANTI_MASKS: Lazy<[u64; 64]> = Lazy::new(|| {
    let mut masks = [0u64; 64];
    for sq in 0..64 {
        let rank = sq / 8;
        let file = sq % 8;
        let mut mask = 0u64;
        let mut r = rank as isize;
        let mut f = file as isize;
        while r < 8 && f >= 0 {
            mask |= 1u64 << (r * 8 + f);
            r += 1;
            f -= 1;
        }
        r = rank as isize - 1;
        f = file as isize + 1;
        while r >= 0 && f < 8 {
            mask |= 1u64 << (r * 8 + f);
            r -= 1;
            f += 1;
        }
        masks[sq] = mask & !(1u64 << sq);
    }
    masks
});

/// File masks for each square, excluding the square itself
static FILE_MASKS: Lazy<[u64; 64]> = Lazy::new(|| {
    let mut masks = [0u64; 64];
    for sq in 0..64 {
        masks[sq] = (FILE_A << (sq % 8)) & !(1u64 << sq);
    }
    masks
});

/// Rank attack lookup table: `[8 * occupancy_6bit + file]` -> attacks on rank 1
static RANK_ATTACKS: Lazy<[u64; 512]> = Lazy::new(|| {
    let mut attacks = [0u64; 512];
    for occ_6bit in 0..64 {
        for file in 0..8 {
            let mut attack = 0u64;
            for f in (file + 1)..8 {
                attack |= 1u64 << f;
                // occupancy bits 0-5 stand for files b-g
                if (1..=6).contains(&f) && (occ_6bit & (1 << (f - 1))) != 0 {
                    break;
                }
            }
            for f in (0..file).rev() {
                attack |= 1u64 << f;
                if (1..=6).contains(&f) && (occ_6bit & (1 << (f - 1))) != 0 {
                    break;
                }
            }
            attacks[8 * occ_6bit + file] = attack;
        }
    }
    attacks
});

/// Hyperbola Quintessence for one line through `square`.
/// Byteswap mirrors the board vertically to compute the reverse direction.
#[inline(always)]
fn hyp_quint(occupied: u64, mask: u64, square: usize) -> u64 {
    let piece_bit = 1u64 << square;
    let forward = occupied & mask;
    let backward = forward.swap_bytes();
    let forward_attacks = forward.wrapping_sub(piece_bit.wrapping_mul(2));
    let backward_attacks =
        backward.wrapping_sub(piece_bit.swap_bytes().wrapping_mul(2)).swap_bytes();
    (forward_attacks ^ backward_attacks) & mask
}

#[inline(always)]
fn rank_attacks(occupied: u64, square: usize) -> u64 {
    let rank = square / 8;
    let file = square % 8;
    let occ_6bit = ((occupied >> (rank * 8 + 1)) & 63) as usize;
    RANK_ATTACKS[8 * occ_6bit + file] << (rank * 8)
}

/// Diagonal attacks for a bishop on `sq` given `occupancy`.
#[inline]
#[must_use]
pub fn bishop_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    let s = sq.index();
    Bitboard(hyp_quint(occupancy.0, DIAG_MASKS[s], s) | hyp_quint(occupancy.0, ANTI_MASKS[s], s))
}

/// Orthogonal attacks for a rook on `sq` given `occupancy`.
#[inline]
#[must_use]
pub fn rook_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    let s = sq.index();
    Bitboard(hyp_quint(occupancy.0, FILE_MASKS[s], s) | rank_attacks(occupancy.0, s))
}

/// Queen attacks (all 8 directions)
#[inline]
#[must_use]
pub fn queen_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupancy) | rook_attacks(sq, occupancy)
}

#[inline]
#[must_use]
pub fn knight_attacks(sq: Square) -> Bitboard {
    Bitboard(KNIGHT_ATTACKS[sq.index()])
}

#[inline]
#[must_use]
pub fn king_attacks(sq: Square) -> Bitboard {
    Bitboard(KING_ATTACKS[sq.index()])
}

/// Squares attacked by a pawn of `color` standing on `sq`.
#[inline]
#[must_use]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    Bitboard(PAWN_ATTACKS[color.index()][sq.index()])
}

/// Attacks of a non-pawn piece type from `sq` against `occupancy`.
#[must_use]
pub fn attacks(piece: Piece, sq: Square, occupancy: Bitboard) -> Bitboard {
    match piece {
        Piece::Knight => knight_attacks(sq),
        Piece::Bishop => bishop_attacks(sq, occupancy),
        Piece::Rook => rook_attacks(sq, occupancy),
        Piece::Queen => queen_attacks(sq, occupancy),
        Piece::King => king_attacks(sq),
        Piece::Pawn => Bitboard::EMPTY,
    }
}

/// The whole rank, file or diagonal shared by `a` and `b`, both included.
/// Empty when the squares are equal or share no line.
#[inline]
#[must_use]
pub fn line(a: Square, b: Square) -> Bitboard {
    Bitboard(LINE[a.index()][b.index()])
}

/// Squares strictly between two aligned squares; empty otherwise.
#[inline]
#[must_use]
pub fn between(a: Square, b: Square) -> Bitboard {
    Bitboard(BETWEEN[a.index()][b.index()])
}

/// True when `c` lies on the line through `a` and `b`.
#[inline]
#[must_use]
pub fn aligned(a: Square, b: Square, c: Square) -> bool {
    line(a, b).contains(c)
}
