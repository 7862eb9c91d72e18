use super::super::{Bitboard, Board, Move, MoveList, Piece};
use crate::board::attack_tables::knight_attacks;

impl Board {
    pub(crate) fn generate_knight_moves(&self, moves: &mut MoveList, target: Bitboard) {
        for from in self.pieces_of(self.side_to_move, Piece::Knight) {
            for to in knight_attacks(from) & target {
                moves.push(Move::new(from, to));
            }
        }
    }
}
