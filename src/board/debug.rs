//! Text rendering of boards and bitboards for diagnostics.

use std::fmt;

use super::{Bitboard, Board, Square};

const SEPARATOR: &str = "  +---+---+---+---+---+---+---+---+";
const FILES: &str = "    a   b   c   d   e   f   g   h";

/// Draws an 8x8 grid, rank 8 on top, filling each cell with `cell(square)`.
fn write_grid(f: &mut fmt::Formatter<'_>, cell: impl Fn(Square) -> char) -> fmt::Result {
    writeln!(f, "{SEPARATOR}")?;
    for rank in (0..8).rev() {
        write!(f, "{} |", rank + 1)?;
        for file in 0..8 {
            write!(f, " {} |", cell(Square::from_coords(rank, file)))?;
        }
        writeln!(f)?;
        writeln!(f, "{SEPARATOR}")?;
    }
    writeln!(f, "{FILES}")
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grid(f, |sq| {
            self.piece_at(sq)
                .map_or(' ', |(color, piece)| piece.to_fen_char(color))
        })?;
        writeln!(f)?;
        writeln!(f, "Fen: {}", self.to_fen())?;
        write!(f, "Key: {}", self.key_hex())
    }
}

/// Wraps a bitboard to print it as a grid of `X` and `.`.
pub struct BitboardGrid(pub Bitboard);

impl fmt::Display for BitboardGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:#018x}", self.0 .0)?;
        write_grid(f, |sq| if self.0.contains(sq) { 'X' } else { '.' })
    }
}
