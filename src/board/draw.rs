//! Game-end detection: mate, stalemate and the automatic draw rules.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{Bitboard, Board, Color, Piece};

/// Why a position is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DrawReason {
    Stalemate,
    /// 100 plies without a capture or pawn move.
    FiftyMove,
    /// Third occurrence of the same position with the same side to move.
    Repetition,
    InsufficientMaterial,
}

/// State of the game in the current position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GameOutcome {
    Ongoing,
    Checkmate { winner: Color },
    Draw(DrawReason),
}

impl GameOutcome {
    #[must_use]
    pub fn is_over(self) -> bool {
        self != GameOutcome::Ongoing
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Ongoing => write!(f, "*"),
            GameOutcome::Checkmate { winner: Color::White } => write!(f, "1-0"),
            GameOutcome::Checkmate { winner: Color::Black } => write!(f, "0-1"),
            GameOutcome::Draw(_) => write!(f, "1/2-1/2"),
        }
    }
}

impl Board {
    /// Decide whether the game has ended. Mate and stalemate take precedence
    /// over the fifty-move rule.
    #[must_use]
    pub fn outcome(&self) -> GameOutcome {
        if self.generate_moves().is_empty() {
            return if self.in_check() {
                GameOutcome::Checkmate {
                    winner: !self.side_to_move,
                }
            } else {
                GameOutcome::Draw(DrawReason::Stalemate)
            };
        }
        if self.halfmove_clock() >= 100 {
            return GameOutcome::Draw(DrawReason::FiftyMove);
        }
        if self.is_threefold_repetition() {
            return GameOutcome::Draw(DrawReason::Repetition);
        }
        if self.is_insufficient_material() {
            return GameOutcome::Draw(DrawReason::InsufficientMaterial);
        }
        GameOutcome::Ongoing
    }

    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.in_check() && self.generate_moves().is_empty()
    }

    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        !self.in_check() && self.generate_moves().is_empty()
    }

    /// True for any drawn outcome, stalemate included.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        matches!(self.outcome(), GameOutcome::Draw(_))
    }

    /// How many earlier positions in the history equal this one.
    ///
    /// Only positions with the same side to move are compared, and the walk
    /// stops at the last capture, pawn move or null move since nothing before
    /// it can repeat.
    #[must_use]
    pub fn repetition_count(&self) -> usize {
        let st = self.st();
        let end = st.rule50.min(st.plies_from_null);
        let mut count = 0;
        let mut idx = self.current;
        let mut ply = 2;
        while ply <= end {
            let Some(back_one) = self.states[idx].previous else {
                break;
            };
            let Some(back_two) = self.states[back_one].previous else {
                break;
            };
            idx = back_two;
            if self.states[idx].key == st.key {
                count += 1;
            }
            ply += 2;
        }
        count
    }

    /// The current position has occurred at least twice before.
    #[must_use]
    pub fn is_threefold_repetition(&self) -> bool {
        self.repetition_count() >= 2
    }

    /// Neither side can deliver mate by any sequence of legal moves:
    /// bare kings, a single minor piece, or bishops all on one square color.
    #[must_use]
    pub fn is_insufficient_material(&self) -> bool {
        let heavy = self.pieces_by_type(Piece::Pawn)
            | self.pieces_by_type(Piece::Rook)
            | self.pieces_by_type(Piece::Queen);
        if !heavy.is_empty() {
            return false;
        }

        let knights = self.pieces_by_type(Piece::Knight);
        let bishops = self.pieces_by_type(Piece::Bishop);
        let minors = knights.popcount() + bishops.popcount();
        if minors <= 1 {
            return true;
        }

        knights.is_empty() && bishops_all_same_color(bishops)
    }
}

fn bishops_all_same_color(bishops: Bitboard) -> bool {
    (bishops & Bitboard::LIGHT_SQUARES).is_empty() || (bishops & Bitboard::DARK_SQUARES).is_empty()
}
