use super::error::MoveError;
use super::observer::{NoopObserver, PieceEvent, PieceObserver};
use super::state::State;
use super::{
    Bitboard, Board, Color, Move, MoveType, Piece, Square, CASTLE_BLACK_K, CASTLE_BLACK_Q,
    CASTLE_WHITE_K, CASTLE_WHITE_Q,
};

/// Castling rights lost when a move starts or ends on `sq`.
#[inline]
fn castling_mask(sq: Square) -> u8 {
    match sq {
        Square::A1 => CASTLE_WHITE_Q,
        Square::E1 => CASTLE_WHITE_K | CASTLE_WHITE_Q,
        Square::H1 => CASTLE_WHITE_K,
        Square::A8 => CASTLE_BLACK_Q,
        Square::E8 => CASTLE_BLACK_K | CASTLE_BLACK_Q,
        Square::H8 => CASTLE_BLACK_K,
        _ => 0,
    }
}

/// Rook origin and destination for a castling move whose king lands on `king_to`.
#[inline]
pub(crate) fn castling_rook_squares(king_to: Square) -> (Square, Square) {
    let rank = king_to.rank();
    if king_to.file() == 6 {
        (Square::from_coords(rank, 7), Square::from_coords(rank, 5))
    } else {
        (Square::from_coords(rank, 0), Square::from_coords(rank, 3))
    }
}

/// Square of the pawn removed by an en passant capture landing on `to`.
#[inline]
pub(crate) fn en_passant_victim(to: Square, us: Color) -> Square {
    Square::from_coords((to.rank() as isize - us.pawn_direction()) as usize, to.file())
}

impl Board {
    /// Places `piece` on `sq`, replacing whatever stood there.
    pub fn add_piece(&mut self, color: Color, piece: Piece, sq: Square) {
        self.add_piece_observed(color, piece, sq, &mut NoopObserver);
    }

    pub fn add_piece_observed<O: PieceObserver + ?Sized>(
        &mut self,
        color: Color,
        piece: Piece,
        sq: Square,
        obs: &mut O,
    ) {
        self.lift_observed(sq, obs);
        self.put_observed(sq, color, piece, obs);
        self.refresh();
    }

    /// Clears `sq`, returning the piece that stood there.
    pub fn remove_piece(&mut self, sq: Square) -> Option<(Color, Piece)> {
        self.remove_piece_observed(sq, &mut NoopObserver)
    }

    pub fn remove_piece_observed<O: PieceObserver + ?Sized>(
        &mut self,
        sq: Square,
        obs: &mut O,
    ) -> Option<(Color, Piece)> {
        let (color, piece) = self.lift_piece(sq)?;
        obs.on_event(PieceEvent::Removed {
            color,
            piece,
            square: sq,
        });
        self.refresh();
        Some((color, piece))
    }

    /// Applies a legal move. Illegal input is caught by debug assertions only;
    /// use [`Board::try_make_move`] for unchecked input.
    pub fn make_move(&mut self, m: Move) {
        self.make_move_observed(m, &mut NoopObserver);
    }

    /// Applies a move, reporting every piece change to `obs`.
    pub fn make_move_observed<O: PieceObserver + ?Sized>(&mut self, m: Move, obs: &mut O) {
        let us = self.side_to_move;
        let them = !us;
        let from = m.from();
        let to = m.to();

        let moving = match self.piece_at(from) {
            Some((color, piece)) if color == us => piece,
            other => {
                debug_assert!(false, "make_move {m}: found {other:?} on {from}");
                return;
            }
        };
        debug_assert!(
            self.piece_at(to).map_or(true, |(c, p)| c == them && p != Piece::King)
                || m.is_castling(),
            "make_move {m}: cannot land on own piece or king"
        );

        self.push_state(m, us);
        self.set_en_passant(None);

        // Capture
        let captured = match m.move_type() {
            MoveType::Castling => None,
            MoveType::EnPassant => {
                let victim = en_passant_victim(to, us);
                self.lift_observed(victim, obs)
            }
            MoveType::Normal | MoveType::Promotion => self.lift_observed(to, obs),
        };
        if captured.is_some() {
            self.st_mut().rule50 = 0;
        }
        self.st_mut().captured = captured;

        // Move
        if m.is_castling() {
            let (rook_from, rook_to) = castling_rook_squares(to);
            self.shift_observed(from, to, obs);
            self.shift_observed(rook_from, rook_to, obs);
        } else {
            self.shift_observed(from, to, obs);
            if let Some(promo) = m.promotion() {
                self.lift_observed(to, obs);
                self.put_observed(to, us, promo, obs);
            }
        }

        if moving == Piece::Pawn {
            self.st_mut().rule50 = 0;
            if from.rank().abs_diff(to.rank()) == 2 {
                let passed = Square::from_coords((from.rank() + to.rank()) / 2, from.file());
                if self.en_passant_capturable(passed, them) {
                    self.set_en_passant(Some(passed));
                }
            }
        }

        let lost = castling_mask(from) | castling_mask(to);
        if lost != 0 {
            let mut rights = self.castling_rights();
            rights.clear_mask(lost);
            self.set_castling_rights(rights);
        }

        self.set_side_to_move(them);
        self.update_check_info();
    }

    /// Applies `m` only if it is legal in this position.
    ///
    /// # Errors
    /// Returns [`MoveError::IllegalMove`] when `m` is not in the legal move
    /// list; the board is left unchanged.
    pub fn try_make_move(&mut self, m: Move) -> Result<(), MoveError> {
        if !self.generate_moves().contains(m) {
            return Err(MoveError::IllegalMove { mv: m });
        }
        self.make_move(m);
        Ok(())
    }

    /// Reverts `m`, which must be the last move made.
    pub fn take_move(&mut self, m: Move) {
        self.take_move_observed(m, &mut NoopObserver);
    }

    pub fn take_move_observed<O: PieceObserver + ?Sized>(&mut self, m: Move, obs: &mut O) {
        debug_assert_eq!(self.last_move(), m, "take_move out of order");
        let Some(previous) = self.st().previous else {
            debug_assert!(false, "take_move {m} at the root");
            return;
        };

        let us = !self.side_to_move;
        let from = m.from();
        let to = m.to();
        let captured = self.st().captured;
        self.side_to_move = us;

        // Piece edits below touch the record being discarded; the previous
        // record already holds the right key and material.
        if m.is_castling() {
            let (rook_from, rook_to) = castling_rook_squares(to);
            self.shift_observed(rook_to, rook_from, obs);
            self.shift_observed(to, from, obs);
        } else {
            if m.is_promotion() {
                self.lift_observed(to, obs);
                self.put_observed(to, us, Piece::Pawn, obs);
            }
            self.shift_observed(to, from, obs);
        }

        if let Some(piece) = captured {
            let sq = if m.is_en_passant() {
                en_passant_victim(to, us)
            } else {
                to
            };
            self.put_observed(sq, !us, piece, obs);
        }

        self.states.truncate(self.current);
        self.current = previous;
    }

    /// Takes back the last move, returning it. `None` at the root.
    pub fn undo(&mut self) -> Option<Move> {
        if self.current == 0 {
            return None;
        }
        let m = self.last_move();
        if m.is_null() {
            self.take_null_move();
        } else {
            self.take_move(m);
        }
        Some(m)
    }

    /// Passes the turn. The side to move must not be in check.
    pub fn make_null_move(&mut self) {
        debug_assert!(!self.in_check(), "null move while in check");
        let us = self.side_to_move;
        self.push_state(Move::NULL, us);
        self.st_mut().plies_from_null = 0;
        self.set_en_passant(None);
        self.set_side_to_move(!us);
        self.update_check_info();
    }

    /// Passes the turn, refusing when the side to move is in check.
    ///
    /// # Errors
    /// [`MoveError::NullMoveInCheck`] if the side to move is in check.
    pub fn try_make_null_move(&mut self) -> Result<(), MoveError> {
        if self.in_check() {
            return Err(MoveError::NullMoveInCheck);
        }
        self.make_null_move();
        Ok(())
    }

    pub fn take_null_move(&mut self) {
        debug_assert!(self.last_move().is_null(), "take_null_move out of order");
        let Some(previous) = self.st().previous else {
            return;
        };
        self.side_to_move = !self.side_to_move;
        self.states.truncate(self.current);
        self.current = previous;
    }

    /// Pushes a successor record copying the carried-over fields.
    fn push_state(&mut self, m: Move, mover: Color) {
        let prev = self.st();
        let next = State {
            previous: Some(self.current),
            castling: prev.castling,
            en_passant: prev.en_passant,
            rule50: prev.rule50 + 1,
            fullmove: prev.fullmove + u32::from(mover == Color::Black),
            plies_from_null: prev.plies_from_null + 1,
            key: prev.key,
            material: prev.material,
            last_move: m,
            captured: None,
            checkers: Bitboard::EMPTY,
            blockers: [Bitboard::EMPTY; 2],
            pinners: [Bitboard::EMPTY; 2],
        };
        self.states.truncate(self.current + 1);
        self.states.push(next);
        self.current = self.states.len() - 1;
    }

    fn lift_observed<O: PieceObserver + ?Sized>(&mut self, sq: Square, obs: &mut O) -> Option<Piece> {
        let (color, piece) = self.lift_piece(sq)?;
        obs.on_event(PieceEvent::Removed {
            color,
            piece,
            square: sq,
        });
        Some(piece)
    }

    fn put_observed<O: PieceObserver + ?Sized>(
        &mut self,
        sq: Square,
        color: Color,
        piece: Piece,
        obs: &mut O,
    ) {
        self.put_piece(sq, color, piece);
        obs.on_event(PieceEvent::Added {
            color,
            piece,
            square: sq,
        });
    }

    fn shift_observed<O: PieceObserver + ?Sized>(&mut self, from: Square, to: Square, obs: &mut O) {
        if let Some((color, piece)) = self.shift_piece(from, to) {
            obs.on_event(PieceEvent::Moved {
                color,
                piece,
                from,
                to,
            });
        }
    }
}
