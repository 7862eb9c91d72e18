use super::super::{Bitboard, Board, Move, MoveList, Piece};
use crate::board::attack_tables::attacks;

const SLIDERS: [Piece; 3] = [Piece::Bishop, Piece::Rook, Piece::Queen];

impl Board {
    pub(crate) fn generate_slider_moves(&self, moves: &mut MoveList, target: Bitboard) {
        let us = self.side_to_move;
        for piece in SLIDERS {
            for from in self.pieces_of(us, piece) {
                for to in attacks(piece, from, self.all_occupied) & target {
                    moves.push(Move::new(from, to));
                }
            }
        }
    }
}
