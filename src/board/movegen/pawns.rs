use super::super::make_unmake::en_passant_victim;
use super::super::{Bitboard, Board, Move, MoveList, MoveType, Piece, Square, PROMOTION_PIECES};
use crate::board::attack_tables::pawn_attacks;

impl Board {
    /// Pawn pushes and captures landing on `target`, plus en passant.
    ///
    /// En passant ignores `target`: whether it resolves a check is left to
    /// the legality filter.
    pub(crate) fn generate_pawn_moves(&self, moves: &mut MoveList, target: Bitboard) {
        let us = self.side_to_move;
        let them = !us;
        let dir = us.pawn_direction();
        let start_rank = if dir > 0 { 1 } else { 6 };
        let last_rank = if dir > 0 { 7 } else { 0 };
        let empty = !self.all_occupied;
        let enemies = self.occupied_by(them);

        let push = |moves: &mut MoveList, from: Square, to: Square| {
            if to.rank() == last_rank {
                for promo in PROMOTION_PIECES {
                    moves.push(Move::promotion_to(from, to, promo));
                }
            } else {
                moves.push(Move::new(from, to));
            }
        };

        for from in self.pieces_of(us, Piece::Pawn) {
            if let Some(one) = from.offset_rank(dir) {
                if empty.contains(one) {
                    if target.contains(one) {
                        push(moves, from, one);
                    }
                    if from.rank() == start_rank {
                        if let Some(two) = one.offset_rank(dir) {
                            if empty.contains(two) && target.contains(two) {
                                moves.push(Move::new(from, two));
                            }
                        }
                    }
                }
            }

            for to in pawn_attacks(us, from) & enemies & target {
                push(moves, from, to);
            }
        }

        if let Some(ep) = self.en_passant_target() {
            let victim = en_passant_victim(ep, us);
            if self.is_empty_square(ep) && self.piece_at(victim) == Some((them, Piece::Pawn)) {
                let capturers = pawn_attacks(them, ep) & self.pieces_of(us, Piece::Pawn);
                for from in capturers {
                    moves.push(Move::special(from, ep, MoveType::EnPassant));
                }
            }
        }
    }
}
