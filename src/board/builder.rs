//! Fluent builder for constructing chess positions.
//!
//! Allows creating positions piece by piece rather than parsing FEN strings.
//!
//! # Example
//! ```
//! use chess_position::board::{BoardBuilder, Color, Piece, Square};
//!
//! let board = BoardBuilder::new()
//!     .piece(Square::E1, Color::White, Piece::King)
//!     .piece(Square::E8, Color::Black, Piece::King)
//!     .piece(Square::A1, Color::White, Piece::Rook)
//!     .side_to_move(Color::Black)
//!     .build()
//!     .unwrap();
//! assert_eq!(board.to_fen(), "4k3/8/8/8/8/8/8/R3K3 b - - 0 1");
//! ```

use super::error::FenError;
use super::{Board, CastlingRights, Color, Piece, Square};

/// A fluent builder for constructing `Board` positions.
#[derive(Clone, Debug)]
pub struct BoardBuilder {
    pieces: Vec<(Square, Color, Piece)>,
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Default for BoardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardBuilder {
    /// An empty board, White to move, no castling rights.
    #[must_use]
    pub fn new() -> Self {
        BoardBuilder {
            pieces: Vec::new(),
            side_to_move: Color::White,
            castling: CastlingRights::none(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Start from an existing position, dropping its history.
    #[must_use]
    pub fn from_board(board: &Board) -> Self {
        BoardBuilder {
            pieces: board
                .pieces()
                .iter()
                .filter_map(|sq| board.piece_at(sq).map(|(c, p)| (sq, c, p)))
                .collect(),
            side_to_move: board.side_to_move(),
            castling: board.castling_rights(),
            en_passant: board.en_passant_target(),
            halfmove_clock: board.halfmove_clock(),
            fullmove_number: board.fullmove_number(),
        }
    }

    /// Place a piece, replacing whatever was on `square`.
    #[must_use]
    pub fn piece(mut self, square: Square, color: Color, piece: Piece) -> Self {
        self.pieces.retain(|(sq, _, _)| *sq != square);
        self.pieces.push((square, color, piece));
        self
    }

    #[must_use]
    pub fn clear(mut self, square: Square) -> Self {
        self.pieces.retain(|(sq, _, _)| *sq != square);
        self
    }

    #[must_use]
    pub const fn side_to_move(mut self, color: Color) -> Self {
        self.side_to_move = color;
        self
    }

    #[must_use]
    pub const fn castling(mut self, rights: CastlingRights) -> Self {
        self.castling = rights;
        self
    }

    #[must_use]
    pub const fn en_passant(mut self, target: Option<Square>) -> Self {
        self.en_passant = target;
        self
    }

    #[must_use]
    pub const fn halfmove_clock(mut self, clock: u32) -> Self {
        self.halfmove_clock = clock;
        self
    }

    #[must_use]
    pub const fn fullmove_number(mut self, number: u32) -> Self {
        self.fullmove_number = number;
        self
    }

    /// Build the board.
    ///
    /// # Errors
    /// [`FenError::InvalidKingCount`] unless each side has exactly one king,
    /// the same requirement FEN parsing enforces.
    pub fn build(self) -> Result<Board, FenError> {
        let mut board = Board::empty();
        for (square, color, piece) in self.pieces {
            board.put_piece(square, color, piece);
        }
        for color in Color::BOTH {
            let found = board.pieces_of(color, Piece::King).popcount();
            if found != 1 {
                return Err(FenError::InvalidKingCount { color, found });
            }
        }

        board.set_side_to_move(self.side_to_move);
        board.set_castling_rights(self.castling);
        let en_passant = self
            .en_passant
            .filter(|&ep| board.en_passant_capturable(ep, self.side_to_move));
        board.set_en_passant(en_passant);
        let st = board.st_mut();
        st.rule50 = self.halfmove_clock;
        st.fullmove = self.fullmove_number.max(1);
        board.refresh();
        Ok(board)
    }
}
