//! Precomputed geometry tables: leaper attacks, lines and in-between squares.

use once_cell::sync::Lazy;

const KNIGHT_DELTAS: [(isize, isize); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

const KING_DELTAS: [(isize, isize); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

fn leaper_table(deltas: &[(isize, isize)]) -> [u64; 64] {
    let mut attacks = [0u64; 64];
    for (sq, slot) in attacks.iter_mut().enumerate() {
        let r = (sq / 8) as isize;
        let f = (sq % 8) as isize;
        let mut mask = 0u64;
        for &(dr, df) in deltas {
            let nr = r + dr;
            let nf = f + df;
            if (0..8).contains(&nr) && (0..8).contains(&nf) {
                mask |= 1u64 << ((nr as usize) * 8 + (nf as usize));
            }
        }
        *slot = mask;
    }
    attacks
}

pub(crate) static KNIGHT_ATTACKS: Lazy<[u64; 64]> = Lazy::new(|| leaper_table(&KNIGHT_DELTAS));

pub(crate) static KING_ATTACKS: Lazy<[u64; 64]> = Lazy::new(|| leaper_table(&KING_DELTAS));

/// `PAWN_ATTACKS[color][sq]`: squares a pawn of `color` on `sq` attacks.
pub(crate) static PAWN_ATTACKS: Lazy<[[u64; 64]; 2]> = Lazy::new(|| {
    [
        leaper_table(&[(1, -1), (1, 1)]),
        leaper_table(&[(-1, -1), (-1, 1)]),
    ]
});

/// Walk from `sq` in direction (dr, df), collecting squares until the edge.
fn ray(sq: usize, dr: isize, df: isize) -> u64 {
    let mut mask = 0u64;
    let mut r = (sq / 8) as isize + dr;
    let mut f = (sq % 8) as isize + df;
    while (0..8).contains(&r) && (0..8).contains(&f) {
        mask |= 1u64 << (r * 8 + f);
        r += dr;
        f += df;
    }
    mask
}

/// Unit step from `a` toward `b` if they share a rank, file or diagonal.
fn direction(a: usize, b: usize) -> Option<(isize, isize)> {
    if a == b {
        return None;
    }
    let dr = (b / 8) as isize - (a / 8) as isize;
    let df = (b % 8) as isize - (a % 8) as isize;
    if dr == 0 || df == 0 || dr.abs() == df.abs() {
        Some((dr.signum(), df.signum()))
    } else {
        None
    }
}

/// Full edge-to-edge line through two aligned squares, endpoints included.
pub(crate) static LINE: Lazy<Box<[[u64; 64]; 64]>> = Lazy::new(|| {
    let mut table = Box::new([[0u64; 64]; 64]);
    for a in 0..64 {
        for b in 0..64 {
            if let Some((dr, df)) = direction(a, b) {
                table[a][b] = ray(a, dr, df) | ray(a, -dr, -df) | (1u64 << a);
            }
        }
    }
    table
});

/// Squares strictly between two aligned squares.
pub(crate) static BETWEEN: Lazy<Box<[[u64; 64]; 64]>> = Lazy::new(|| {
    let mut table = Box::new([[0u64; 64]; 64]);
    for a in 0..64 {
        for b in 0..64 {
            if let Some((dr, df)) = direction(a, b) {
                table[a][b] = ray(a, dr, df) & ray(b, -dr, -df);
            }
        }
    }
    table
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knight_corner() {
        // a1 knight reaches b3 and c2
        assert_eq!(KNIGHT_ATTACKS[0], (1u64 << 17) | (1u64 << 10));
    }

    #[test]
    fn test_king_center_count() {
        assert_eq!(KING_ATTACKS[28].count_ones(), 8);
        assert_eq!(KING_ATTACKS[0].count_ones(), 3);
    }

    #[test]
    fn test_pawn_attacks_by_color() {
        // e4 = 28: white attacks d5/f5, black attacks d3/f3
        assert_eq!(PAWN_ATTACKS[0][28], (1u64 << 35) | (1u64 << 37));
        assert_eq!(PAWN_ATTACKS[1][28], (1u64 << 19) | (1u64 << 21));
        // no wrap on the a-file
        assert_eq!(PAWN_ATTACKS[0][8], 1u64 << 17);
    }

    #[test]
    fn test_between_is_exclusive() {
        // a1..d4 -> b2, c3
        assert_eq!(BETWEEN[0][27], (1u64 << 9) | (1u64 << 18));
        assert_eq!(BETWEEN[0][1], 0);
        assert_eq!(BETWEEN[0][17], 0);
    }
}
