//! Legal move generation.
//!
//! Moves are generated pseudo-legally per piece type, already restricted to
//! check evasions when the side to move is in check. The legality filter
//! then only needs to look at king moves, pinned pieces and en passant.

mod kings;
mod knights;
mod pawns;
mod sliders;

use super::attack_tables::{
    aligned, attacks, between, bishop_attacks, knight_attacks, line, pawn_attacks, rook_attacks,
};
use super::make_unmake::{castling_rook_squares, en_passant_victim};
use super::{Board, Move, MoveList, MoveType, Piece};

impl Board {
    /// All legal moves for the side to move, in no particular order.
    #[must_use]
    pub fn generate_moves(&self) -> MoveList {
        let mut moves = self.pseudo_legal_moves();
        let us = self.side_to_move;
        let king = self.king_sq(us);
        let pinned = self.king_blockers(us);
        moves.retain(|m| {
            let needs_check = m.from() == king || pinned.contains(m.from()) || m.is_en_passant();
            !needs_check || self.is_legal(m)
        });
        moves
    }

    /// Moves that obey piece movement and check evasion, ignoring pins and
    /// attacked king destinations.
    pub(crate) fn pseudo_legal_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        let us = self.side_to_move;
        let checkers = self.checkers();

        if !checkers.more_than_one() {
            let target = match checkers.lsb() {
                None => !self.occupied_by(us),
                Some(checker) => between(self.king_sq(us), checker) | checker,
            };
            self.generate_pawn_moves(&mut moves, target);
            self.generate_knight_moves(&mut moves, target);
            self.generate_slider_moves(&mut moves, target);
        }
        self.generate_king_moves(&mut moves);
        moves
    }

    /// True if `m` would be generated in this position before the legality
    /// filter.
    #[must_use]
    pub fn is_pseudo_legal(&self, m: Move) -> bool {
        m.is_valid() && self.pseudo_legal_moves().contains(m)
    }

    /// True if the pseudo-legal move `m` does not leave our king attacked.
    #[must_use]
    pub fn is_legal(&self, m: Move) -> bool {
        let us = self.side_to_move;
        let them = !us;
        let from = m.from();
        let to = m.to();
        let Some(king) = self.king_square(us) else {
            return false;
        };

        match m.move_type() {
            MoveType::EnPassant => {
                let victim = en_passant_victim(to, us);
                let occupancy = (self.all_occupied ^ from ^ victim) | to;
                let attackers = self.attackers_to(king, occupancy) & self.occupied_by(them);
                return attackers.without(victim.into()).is_empty();
            }
            MoveType::Castling => {
                let path = between(from, to) | from | to;
                return path.iter().all(|sq| !self.is_square_attacked(sq, them));
            }
            MoveType::Normal | MoveType::Promotion => {}
        }

        if from == king {
            let occupancy = self.all_occupied ^ from;
            return (self.attackers_to(to, occupancy) & self.occupied_by(them)).is_empty();
        }

        let checkers = self.checkers();
        if !checkers.is_empty() {
            let Some(checker) = checkers.lsb() else {
                return false;
            };
            if checkers.more_than_one() || !(between(king, checker) | checker).contains(to) {
                return false;
            }
        }

        !self.king_blockers(us).contains(from) || line(from, king).contains(to)
    }

    /// True if making `m` would put the opponent in check.
    #[must_use]
    pub fn gives_check(&self, m: Move) -> bool {
        let us = self.side_to_move;
        let them = !us;
        let from = m.from();
        let to = m.to();
        let Some(their_king) = self.king_square(them) else {
            return false;
        };
        let Some((_, piece)) = self.piece_at(from) else {
            return false;
        };

        let direct = match piece {
            Piece::Pawn => pawn_attacks(us, to).contains(their_king),
            Piece::Knight => knight_attacks(to).contains(their_king),
            Piece::King => false,
            slider => attacks(slider, to, self.all_occupied).contains(their_king),
        };
        if direct && !m.is_promotion() {
            return true;
        }

        let discoverers = self.st().blockers[them.index()] & self.occupied_by(us);
        if discoverers.contains(from) && !aligned(from, to, their_king) {
            return true;
        }

        match m.move_type() {
            MoveType::Normal => false,
            MoveType::Promotion => {
                let occupancy = self.all_occupied ^ from;
                attacks(m.promotion_piece(), to, occupancy).contains(their_king)
            }
            MoveType::EnPassant => {
                let victim = en_passant_victim(to, us);
                let occupancy = (self.all_occupied ^ from ^ victim) | to;
                let rooks = self.pieces_of(us, Piece::Rook) | self.pieces_of(us, Piece::Queen);
                let bishops = self.pieces_of(us, Piece::Bishop) | self.pieces_of(us, Piece::Queen);
                !(rook_attacks(their_king, occupancy) & rooks).is_empty()
                    || !(bishop_attacks(their_king, occupancy) & bishops).is_empty()
            }
            MoveType::Castling => {
                let (rook_from, rook_to) = castling_rook_squares(to);
                let occupancy = (self.all_occupied ^ from ^ rook_from) | to | rook_to;
                rook_attacks(rook_to, occupancy).contains(their_king)
            }
        }
    }
}
