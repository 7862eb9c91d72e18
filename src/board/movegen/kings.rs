use super::super::{Board, Move, MoveList, MoveType, Piece, Square};
use crate::board::attack_tables::{between, king_attacks};

impl Board {
    /// King steps onto any square not held by our own pieces, and castling
    /// when the right is held and the path between king and rook is clear.
    /// Attacked destinations and transit squares are rejected by the
    /// legality filter.
    pub(crate) fn generate_king_moves(&self, moves: &mut MoveList) {
        let us = self.side_to_move;
        let Some(king) = self.king_square(us) else {
            return;
        };

        for to in king_attacks(king) & !self.occupied_by(us) {
            moves.push(Move::new(king, to));
        }

        let rank = us.back_rank();
        if self.in_check() || king != Square::from_coords(rank, 4) {
            return;
        }
        let rights = self.castling_rights();
        for (kingside, rook_file, king_to_file) in [(true, 7, 6), (false, 0, 2)] {
            let rook = Square::from_coords(rank, rook_file);
            if rights.has(us, kingside)
                && self.piece_at(rook) == Some((us, Piece::Rook))
                && (between(king, rook) & self.all_occupied).is_empty()
            {
                let to = Square::from_coords(rank, king_to_file);
                moves.push(Move::special(king, to, MoveType::Castling));
            }
        }
    }
}
