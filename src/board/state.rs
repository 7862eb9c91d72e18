use super::attack_tables::{
    between, bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks,
};
use super::{Bitboard, CastlingRights, Color, Move, Piece, Square};
use crate::zobrist::ZOBRIST;

/// Per-ply record of everything a move changes that cannot be recomputed
/// cheaply on take-back.
///
/// Records live in an arena owned by the [`Board`]; `previous` is the index
/// of the record this one was derived from, `None` for the root.
#[derive(Clone, Debug)]
pub(crate) struct State {
    pub(crate) previous: Option<usize>,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) rule50: u32,
    pub(crate) fullmove: u32,
    /// Plies since the last null move, or since the root.
    pub(crate) plies_from_null: u32,
    pub(crate) key: u64,
    /// Non-pawn material per side.
    pub(crate) material: [i32; 2],
    pub(crate) last_move: Move,
    pub(crate) captured: Option<Piece>,
    pub(crate) checkers: Bitboard,
    /// `blockers[c]`: sole pieces (either color) between king `c` and an enemy slider.
    pub(crate) blockers: [Bitboard; 2],
    /// `pinners[c]`: enemy sliders pinning a piece of color `c` to its king.
    pub(crate) pinners: [Bitboard; 2],
}

impl State {
    fn root() -> Self {
        State {
            previous: None,
            castling: CastlingRights::none(),
            en_passant: None,
            rule50: 0,
            fullmove: 1,
            plies_from_null: 0,
            key: 0,
            material: [0, 0],
            last_move: Move::NULL,
            captured: None,
            checkers: Bitboard::EMPTY,
            blockers: [Bitboard::EMPTY; 2],
            pinners: [Bitboard::EMPTY; 2],
        }
    }
}

/// A chess position together with the history of states that led to it.
#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) squares: [Option<(Color, Piece)>; 64],
    pub(crate) pieces: [[Bitboard; 6]; 2],
    pub(crate) occupied: [Bitboard; 2],
    pub(crate) all_occupied: Bitboard,
    pub(crate) side_to_move: Color,
    pub(crate) states: Vec<State>,
    pub(crate) current: usize,
}

impl Board {
    /// The standard starting position.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Board::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, &piece) in back_rank.iter().enumerate() {
            board.put_piece(Square::from_coords(0, file), Color::White, piece);
            board.put_piece(Square::from_coords(7, file), Color::Black, piece);
            board.put_piece(Square::from_coords(1, file), Color::White, Piece::Pawn);
            board.put_piece(Square::from_coords(6, file), Color::Black, Piece::Pawn);
        }
        board.set_castling_rights(CastlingRights::all());
        board.refresh();
        board
    }

    /// A board with no pieces, White to move and no castling rights.
    ///
    /// Populate it with [`Board::add_piece`]; move generation requires one
    /// king per side.
    #[must_use]
    pub fn empty() -> Self {
        Board {
            squares: [None; 64],
            pieces: [[Bitboard::EMPTY; 6]; 2],
            occupied: [Bitboard::EMPTY; 2],
            all_occupied: Bitboard::EMPTY,
            side_to_move: Color::White,
            states: vec![State::root()],
            current: 0,
        }
    }

    #[inline]
    pub(crate) fn st(&self) -> &State {
        &self.states[self.current]
    }

    #[inline]
    pub(crate) fn st_mut(&mut self) -> &mut State {
        &mut self.states[self.current]
    }

    // --- Piece placement primitives ---

    /// Places a piece, keeping bitboards, key and material in sync.
    pub(crate) fn put_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        debug_assert!(self.squares[sq.index()].is_none(), "square {sq} occupied");
        self.squares[sq.index()] = Some((color, piece));
        self.pieces[color.index()][piece.index()] |= sq;
        self.occupied[color.index()] |= sq;
        self.all_occupied |= sq;
        let st = &mut self.states[self.current];
        st.key ^= ZOBRIST.piece(color, piece, sq);
        if piece != Piece::Pawn {
            st.material[color.index()] += piece.value();
        }
    }

    /// Lifts the piece on `sq`, returning it.
    pub(crate) fn lift_piece(&mut self, sq: Square) -> Option<(Color, Piece)> {
        let (color, piece) = self.squares[sq.index()].take()?;
        self.pieces[color.index()][piece.index()] ^= sq;
        self.occupied[color.index()] ^= sq;
        self.all_occupied ^= sq;
        let st = &mut self.states[self.current];
        st.key ^= ZOBRIST.piece(color, piece, sq);
        if piece != Piece::Pawn {
            st.material[color.index()] -= piece.value();
        }
        Some((color, piece))
    }

    /// Moves the piece on `from` to the empty square `to`.
    pub(crate) fn shift_piece(&mut self, from: Square, to: Square) -> Option<(Color, Piece)> {
        let (color, piece) = self.squares[from.index()].take()?;
        debug_assert!(self.squares[to.index()].is_none(), "square {to} occupied");
        self.squares[to.index()] = Some((color, piece));
        let delta = Bitboard::from_square(from) | to;
        self.pieces[color.index()][piece.index()] ^= delta;
        self.occupied[color.index()] ^= delta;
        self.all_occupied ^= delta;
        self.states[self.current].key ^=
            ZOBRIST.piece(color, piece, from) ^ ZOBRIST.piece(color, piece, to);
        Some((color, piece))
    }

    pub(crate) fn set_castling_rights(&mut self, rights: CastlingRights) {
        let st = self.st_mut();
        st.key ^= ZOBRIST.castling(st.castling) ^ ZOBRIST.castling(rights);
        st.castling = rights;
    }

    pub(crate) fn set_en_passant(&mut self, target: Option<Square>) {
        let st = self.st_mut();
        if let Some(old) = st.en_passant {
            st.key ^= ZOBRIST.en_passant(old);
        }
        if let Some(new) = target {
            st.key ^= ZOBRIST.en_passant(new);
        }
        st.en_passant = target;
    }

    /// True if a pawn of `capturer` attacks the en passant `target`. Only
    /// such targets are recorded, so a double push nobody can answer hashes
    /// like any quiet move.
    pub(crate) fn en_passant_capturable(&self, target: Square, capturer: Color) -> bool {
        !(pawn_attacks(!capturer, target) & self.pieces_of(capturer, Piece::Pawn)).is_empty()
    }

    pub(crate) fn set_side_to_move(&mut self, color: Color) {
        if color != self.side_to_move {
            self.side_to_move = color;
            self.st_mut().key ^= ZOBRIST.side();
        }
    }

    // --- Observers of the position ---

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.st().castling
    }

    /// The square a pawn passed over on the last double push, if any.
    #[inline]
    #[must_use]
    pub fn en_passant_target(&self) -> Option<Square> {
        self.st().en_passant
    }

    /// Plies since the last capture or pawn move.
    #[inline]
    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.st().rule50
    }

    #[inline]
    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.st().fullmove
    }

    /// Zobrist key of the position: pieces, side to move, castling rights
    /// and en passant target.
    #[inline]
    #[must_use]
    pub fn key(&self) -> u64 {
        self.st().key
    }

    /// The key as `0x` followed by 16 upper-case hex digits.
    #[must_use]
    pub fn key_hex(&self) -> String {
        format!("0x{:016X}", self.key())
    }

    /// Non-pawn material of `color` in centipawns.
    #[inline]
    #[must_use]
    pub fn material(&self, color: Color) -> i32 {
        self.st().material[color.index()]
    }

    /// The move that produced this position; [`Move::NULL`] at the root or
    /// after a null move.
    #[inline]
    #[must_use]
    pub fn last_move(&self) -> Move {
        self.st().last_move
    }

    /// The piece captured by [`Board::last_move`].
    #[inline]
    #[must_use]
    pub fn captured_piece(&self) -> Option<Piece> {
        self.st().captured
    }

    /// Number of moves (including null moves) that can be taken back.
    #[inline]
    #[must_use]
    pub fn ply_count(&self) -> usize {
        self.current
    }

    #[inline]
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.squares[sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn is_empty_square(&self, sq: Square) -> bool {
        self.squares[sq.index()].is_none()
    }

    /// All occupied squares.
    #[inline]
    #[must_use]
    pub fn pieces(&self) -> Bitboard {
        self.all_occupied
    }

    #[inline]
    #[must_use]
    pub fn pieces_of(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    /// Pieces of type `piece` for both colors.
    #[inline]
    #[must_use]
    pub fn pieces_by_type(&self, piece: Piece) -> Bitboard {
        self.pieces[0][piece.index()] | self.pieces[1][piece.index()]
    }

    #[inline]
    #[must_use]
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.occupied[color.index()]
    }

    /// Square of the king of `color`. Every position reachable through FEN
    /// parsing or move making has exactly one king per side.
    #[inline]
    #[must_use]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(color, Piece::King).lsb()
    }

    #[inline]
    pub(crate) fn king_sq(&self, color: Color) -> Square {
        self.king_square(color).unwrap_or(Square::A1)
    }

    // --- Attacks, checks and pins ---

    /// Pieces of both colors attacking `sq`, with sliders seen through
    /// `occupancy`.
    #[must_use]
    pub fn attackers_to(&self, sq: Square, occupancy: Bitboard) -> Bitboard {
        let rooks_queens = self.pieces_by_type(Piece::Rook) | self.pieces_by_type(Piece::Queen);
        let bishops_queens =
            self.pieces_by_type(Piece::Bishop) | self.pieces_by_type(Piece::Queen);
        (pawn_attacks(Color::Black, sq) & self.pieces_of(Color::White, Piece::Pawn))
            | (pawn_attacks(Color::White, sq) & self.pieces_of(Color::Black, Piece::Pawn))
            | (knight_attacks(sq) & self.pieces_by_type(Piece::Knight))
            | (king_attacks(sq) & self.pieces_by_type(Piece::King))
            | (rook_attacks(sq, occupancy) & rooks_queens)
            | (bishop_attacks(sq, occupancy) & bishops_queens)
    }

    /// True if any piece of `by` attacks `sq` in the current position.
    #[must_use]
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        !(self.attackers_to(sq, self.all_occupied) & self.occupied_by(by)).is_empty()
    }

    /// Enemy pieces giving check to the side to move.
    #[inline]
    #[must_use]
    pub fn checkers(&self) -> Bitboard {
        self.st().checkers
    }

    #[inline]
    #[must_use]
    pub fn in_check(&self) -> bool {
        !self.st().checkers.is_empty()
    }

    /// Pieces of `color` that alone shield their king from an enemy slider.
    #[inline]
    #[must_use]
    pub fn king_blockers(&self, color: Color) -> Bitboard {
        self.st().blockers[color.index()] & self.occupied_by(color)
    }

    /// Enemy sliders pinning a piece of `color` to its king.
    #[inline]
    #[must_use]
    pub fn pinners(&self, color: Color) -> Bitboard {
        self.st().pinners[color.index()]
    }

    /// Pieces standing alone between `king` and one of `sliders`, along with
    /// the sliders whose blocker belongs to `king_color`.
    pub(crate) fn slider_blockers(
        &self,
        sliders: Bitboard,
        king: Square,
        king_color: Color,
    ) -> (Bitboard, Bitboard) {
        let mut blockers = Bitboard::EMPTY;
        let mut pinners = Bitboard::EMPTY;

        let rooks_queens = self.pieces_by_type(Piece::Rook) | self.pieces_by_type(Piece::Queen);
        let bishops_queens =
            self.pieces_by_type(Piece::Bishop) | self.pieces_by_type(Piece::Queen);
        let snipers = ((rook_attacks(king, Bitboard::EMPTY) & rooks_queens)
            | (bishop_attacks(king, Bitboard::EMPTY) & bishops_queens))
            & sliders;
        let occupancy = self.all_occupied.without(snipers);

        for sniper in snipers {
            let b = between(king, sniper) & occupancy;
            if !b.is_empty() && !b.more_than_one() {
                blockers |= b;
                if !(b & self.occupied_by(king_color)).is_empty() {
                    pinners |= sniper;
                }
            }
        }
        (blockers, pinners)
    }

    /// Recomputes checkers, blockers and pinners for the current state.
    pub(crate) fn update_check_info(&mut self) {
        let us = self.side_to_move;
        let mut blockers = [Bitboard::EMPTY; 2];
        let mut pinners = [Bitboard::EMPTY; 2];
        for color in Color::BOTH {
            if let Some(king) = self.king_square(color) {
                let (b, p) = self.slider_blockers(self.occupied_by(!color), king, color);
                blockers[color.index()] = b;
                pinners[color.index()] = p;
            }
        }
        let checkers = match self.king_square(us) {
            Some(king) => self.attackers_to(king, self.all_occupied) & self.occupied_by(!us),
            None => Bitboard::EMPTY,
        };

        let st = self.st_mut();
        st.blockers = blockers;
        st.pinners = pinners;
        st.checkers = checkers;
    }

    /// Recomputes derived state after direct placement edits.
    pub(crate) fn refresh(&mut self) {
        self.update_check_info();
    }

    /// Zobrist key computed from scratch. Always equal to [`Board::key`].
    #[must_use]
    pub fn compute_key(&self) -> u64 {
        let mut key = 0;
        for sq in self.all_occupied {
            if let Some((color, piece)) = self.piece_at(sq) {
                key ^= ZOBRIST.piece(color, piece, sq);
            }
        }
        if self.side_to_move == Color::Black {
            key ^= ZOBRIST.side();
        }
        key ^= ZOBRIST.castling(self.castling_rights());
        if let Some(ep) = self.en_passant_target() {
            key ^= ZOBRIST.en_passant(ep);
        }
        key
    }

    /// Checks the redundant representations against each other.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mut union = Bitboard::EMPTY;
        for color in Color::BOTH {
            let mut side = Bitboard::EMPTY;
            for piece in Piece::ALL {
                let bb = self.pieces_of(color, piece);
                if !(side & bb).is_empty() {
                    return false;
                }
                side |= bb;
                if bb.iter().any(|sq| self.piece_at(sq) != Some((color, piece))) {
                    return false;
                }
            }
            if side != self.occupied_by(color) {
                return false;
            }
            union |= side;
        }
        let empty_ok = Square::all()
            .filter(|&sq| !union.contains(sq))
            .all(|sq| self.piece_at(sq).is_none());
        union == self.all_occupied && empty_ok && self.key() == self.compute_key()
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl PartialEq for Board {
    /// Positions are equal when placement, side, castling, en passant and the
    /// clocks agree; history is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.squares == other.squares
            && self.side_to_move == other.side_to_move
            && self.castling_rights() == other.castling_rights()
            && self.en_passant_target() == other.en_passant_target()
            && self.halfmove_clock() == other.halfmove_clock()
            && self.fullmove_number() == other.fullmove_number()
    }
}

impl Eq for Board {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_consistent() {
        let board = Board::new();
        assert!(board.is_consistent());
        assert_eq!(board.pieces().popcount(), 32);
        assert_eq!(board.king_square(Color::White), Some(Square::E1));
        assert_eq!(board.king_square(Color::Black), Some(Square::E8));
        assert_eq!(board.side_to_move(), Color::White);
        assert_eq!(board.castling_rights(), CastlingRights::all());
        assert!(!board.in_check());
        assert_eq!(board.ply_count(), 0);
    }

    #[test]
    fn test_starting_material() {
        let board = Board::new();
        let expected = 2 * 320 + 2 * 330 + 2 * 500 + 900;
        assert_eq!(board.material(Color::White), expected);
        assert_eq!(board.material(Color::Black), expected);
    }

    #[test]
    fn test_empty_board_key_is_zero() {
        let board = Board::empty();
        assert_eq!(board.key(), 0);
        assert_eq!(board.compute_key(), 0);
        assert!(board.king_square(Color::White).is_none());
    }

    #[test]
    fn test_attackers_to_start_position() {
        let board = Board::new();
        let f3: Square = "f3".parse().unwrap();
        let attackers = board.attackers_to(f3, board.pieces());
        // e2 and g2 pawns, g1 knight
        assert_eq!(attackers.popcount(), 3);
        assert!(board.is_square_attacked(f3, Color::White));
        assert!(!board.is_square_attacked(f3, Color::Black));
    }

    #[test]
    fn test_key_hex_format() {
        let hex = Board::new().key_hex();
        assert!(hex.starts_with("0x"));
        assert_eq!(hex.len(), 18);
        assert!(hex[2..]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }
}
