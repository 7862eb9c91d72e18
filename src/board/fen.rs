use std::str::FromStr;

use super::error::{FenError, MoveParseError};
use super::{Board, CastlingRights, Color, Move, Piece, Square};

/// FEN of the standard starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Board {
    /// Parse a board position from FEN notation.
    ///
    /// The half-move clock and full-move number are optional and default to
    /// 0 and 1.
    ///
    /// # Errors
    /// Returns a [`FenError`] naming the first field that failed to parse.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&parts.len()) {
            return Err(FenError::WrongFieldCount { found: parts.len() });
        }

        let mut board = Board::empty();

        // Piece placement, rank 8 first
        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount { found: ranks.len() });
        }
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx;
            let mut file = 0;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    file += skip as usize;
                    continue;
                }
                let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let sq = Square::new(rank, file).ok_or(FenError::WrongFileCount {
                    rank: rank + 1,
                    files: file + 1,
                })?;
                board.put_piece(sq, color, piece);
                file += 1;
            }
            if file != 8 {
                return Err(FenError::WrongFileCount {
                    rank: rank + 1,
                    files: file,
                });
            }
        }

        for color in Color::BOTH {
            let kings = board.pieces_of(color, Piece::King).popcount();
            if kings != 1 {
                return Err(FenError::InvalidKingCount {
                    color,
                    found: kings,
                });
            }
        }

        let side = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };
        board.set_side_to_move(side);

        let mut rights = CastlingRights::none();
        if parts[2] != "-" {
            for c in parts[2].chars() {
                match c {
                    'K' => rights.set(Color::White, true),
                    'Q' => rights.set(Color::White, false),
                    'k' => rights.set(Color::Black, true),
                    'q' => rights.set(Color::Black, false),
                    _ => return Err(FenError::InvalidCastling { char: c }),
                }
            }
        }
        board.set_castling_rights(rights);

        if parts[3] != "-" {
            let invalid_ep = || FenError::InvalidEnPassant {
                found: parts[3].to_string(),
            };
            let ep: Square = parts[3].parse().map_err(|_| invalid_ep())?;
            // The target lies behind a pawn of the side that just moved
            let expected_rank = if side == Color::White { 5 } else { 2 };
            if ep.rank() != expected_rank {
                return Err(invalid_ep());
            }
            // Dropped unless a pawn can actually take
            if board.en_passant_capturable(ep, side) {
                board.set_en_passant(Some(ep));
            }
        }

        if let Some(clock) = parts.get(4) {
            board.st_mut().rule50 = clock.parse().map_err(|_| FenError::InvalidHalfmoveClock {
                found: (*clock).to_string(),
            })?;
        }
        if let Some(number) = parts.get(5) {
            let fullmove: u32 = number.parse().map_err(|_| FenError::InvalidFullmoveNumber {
                found: (*number).to_string(),
            })?;
            board.st_mut().fullmove = fullmove.max(1);
        }

        board.refresh();
        Ok(board)
    }

    /// Replace this position with the one described by `fen`.
    ///
    /// # Errors
    /// On a [`FenError`] the board is left untouched.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), FenError> {
        *self = Board::from_fen(fen)?;
        Ok(())
    }

    /// Convert the board position to FEN notation.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows: Vec<String> = Vec::with_capacity(8);
        for rank in (0..8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8 {
                match self.piece_at(Square::from_coords(rank, file)) {
                    Some((color, piece)) => {
                        if empty > 0 {
                            row.push_str(&empty.to_string());
                            empty = 0;
                        }
                        row.push(piece.to_fen_char(color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let active = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };
        let ep = self
            .en_passant_target()
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            rows.join("/"),
            active,
            self.castling_rights(),
            ep,
            self.halfmove_clock(),
            self.fullmove_number()
        )
    }

    /// Parse a move in coordinate notation (e.g., "e2e4", "e7e8q") and
    /// resolve it against the legal moves of this position, so castling and
    /// en passant come back with their move type set.
    ///
    /// # Errors
    /// Returns a [`MoveParseError`] for malformed notation or a move that is
    /// not legal here.
    ///
    /// # Example
    /// ```
    /// use chess_position::board::Board;
    ///
    /// let board = Board::new();
    /// let mv = board.parse_move("e2e4").unwrap();
    /// assert_eq!(mv.to_string(), "e2e4");
    /// ```
    pub fn parse_move(&self, notation: &str) -> Result<Move, MoveParseError> {
        let parsed: Move = notation.parse()?;
        self.generate_moves()
            .iter()
            .copied()
            .find(|m| {
                m.from() == parsed.from()
                    && m.to() == parsed.to()
                    && m.promotion() == parsed.promotion()
            })
            .ok_or_else(|| MoveParseError::IllegalMove {
                notation: notation.to_string(),
            })
    }

    /// Parse a move and make it on the board in one call.
    ///
    /// # Errors
    /// See [`Board::parse_move`]; the board is unchanged on error.
    pub fn make_move_uci(&mut self, notation: &str) -> Result<Move, MoveParseError> {
        let mv = self.parse_move(notation)?;
        self.make_move(mv);
        Ok(mv)
    }
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::from_fen(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::MoveType;

    #[test]
    fn test_start_fen_matches_new() {
        let board = Board::from_fen(START_FEN).unwrap();
        assert_eq!(board, Board::new());
        assert_eq!(board.key(), Board::new().key());
        assert_eq!(Board::new().to_fen(), START_FEN);
    }

    #[test]
    fn test_fen_round_trip() {
        let fens = [
            START_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 12 40",
        ];
        for fen in fens {
            assert_eq!(Board::from_fen(fen).unwrap().to_fen(), fen);
        }
    }

    #[test]
    fn test_fen_key_matches_compute_key() {
        let board = Board::from_fen("rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3").unwrap();
        assert_eq!(board.side_to_move(), Color::Black);
        assert_eq!(board.en_passant_target(), Some("e3".parse().unwrap()));
        assert_eq!(board.key(), board.compute_key());
        assert!(board.is_consistent());
    }

    #[test]
    fn test_uncapturable_en_passant_dropped() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let board = Board::from_fen(fen).unwrap();
        assert_eq!(board.en_passant_target(), None);
        assert_eq!(
            board.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        );
        let mut played = Board::new();
        played.make_move_uci("e2e4").unwrap();
        assert_eq!(board.key(), played.key());
        assert_eq!(board.key(), board.compute_key());
    }

    #[test]
    fn test_optional_clocks() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - -").unwrap();
        assert_eq!(board.halfmove_clock(), 0);
        assert_eq!(board.fullmove_number(), 1);
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 42 7").unwrap();
        assert_eq!(board.halfmove_clock(), 42);
        assert_eq!(board.fullmove_number(), 7);
    }

    #[test]
    fn test_fen_errors() {
        let cases: [(&str, FenError); 9] = [
            (
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w",
                FenError::WrongFieldCount { found: 2 },
            ),
            (
                "rnbqkbnr/pppppppp/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
                FenError::WrongRankCount { found: 7 },
            ),
            (
                "rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
                FenError::InvalidPiece { char: 'x' },
            ),
            (
                "rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
                FenError::WrongFileCount { rank: 7, files: 9 },
            ),
            (
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
                FenError::InvalidSideToMove {
                    found: "x".to_string(),
                },
            ),
            (
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w XQkq - 0 1",
                FenError::InvalidCastling { char: 'X' },
            ),
            (
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq z9 0 1",
                FenError::InvalidEnPassant {
                    found: "z9".to_string(),
                },
            ),
            (
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - x 1",
                FenError::InvalidHalfmoveClock {
                    found: "x".to_string(),
                },
            ),
            (
                "rnbq1bnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQ - 0 1",
                FenError::InvalidKingCount {
                    color: Color::Black,
                    found: 0,
                },
            ),
        ];
        for (fen, expected) in cases {
            assert_eq!(Board::from_fen(fen), Err(expected), "{fen}");
        }
    }

    #[test]
    fn test_en_passant_rank_checked() {
        let result = Board::from_fen("4k3/8/8/8/4P3/8/8/4K3 b - e4 0 1");
        assert!(matches!(result, Err(FenError::InvalidEnPassant { .. })));
    }

    #[test]
    fn test_set_fen_failure_leaves_board() {
        let mut board = Board::new();
        board.make_move_uci("e2e4").unwrap();
        let before = board.to_fen();
        assert!(board.set_fen("not a fen").is_err());
        assert_eq!(board.to_fen(), before);
        assert_eq!(board.ply_count(), 1);

        board.set_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(board.ply_count(), 0);
        assert_eq!(board.pieces().popcount(), 2);
    }

    #[test]
    fn test_parse_move_resolves_special_moves() {
        let board = Board::from_fen("r3k2r/8/8/3pP3/8/8/8/R3K2R w KQkq d6 0 1").unwrap();
        assert_eq!(board.parse_move("e1g1").unwrap().move_type(), MoveType::Castling);
        assert_eq!(board.parse_move("e5d6").unwrap().move_type(), MoveType::EnPassant);
        assert_eq!(board.parse_move("a1a5").unwrap().move_type(), MoveType::Normal);
    }

    #[test]
    fn test_parse_move_promotion() {
        let board = Board::from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1").unwrap();
        let mv = board.parse_move("a7a8q").unwrap();
        assert_eq!(mv.promotion(), Some(Piece::Queen));
        assert!(matches!(
            board.parse_move("a7a8"),
            Err(MoveParseError::IllegalMove { .. })
        ));
    }

    #[test]
    fn test_parse_move_errors() {
        let board = Board::new();
        assert!(matches!(
            board.parse_move("e2"),
            Err(MoveParseError::InvalidLength { .. })
        ));
        assert!(matches!(
            board.parse_move("z9z9"),
            Err(MoveParseError::InvalidSquare { .. })
        ));
        assert!(matches!(
            board.parse_move("e2e5"),
            Err(MoveParseError::IllegalMove { .. })
        ));
        assert!(matches!(
            board.parse_move("e7e8k"),
            Err(MoveParseError::InvalidPromotion { char: 'k' })
        ));
    }

    #[test]
    fn test_fullmove_advances_after_black() {
        let mut board = Board::new();
        board.make_move_uci("e2e4").unwrap();
        board.make_move_uci("c7c5").unwrap();
        board.make_move_uci("g1f3").unwrap();
        assert_eq!(
            board.to_fen(),
            "rnbqkbnr/pp1ppppp/8/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
        );
    }
}
