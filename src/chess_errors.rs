//! Errors used throughout the chess engine.
//!
//! `ChessErrors` is the single error type shared by parsing, move application,
//! search and the engine front-end. Variants fall into three groups:
//!
//! - Malformed input (bad FEN, bad square, bad move string, illegal move,
//!   bad option value, truncated protocol command).
//!   These are rejected at the parsing boundary and are safe to show to users.
//! - Internal invariant violations (empty origin square, king cache out of
//!   sync). These indicate a logic bug and abort the current search call.
//! - Collaborator failures (opening book, tablebase). The engine logs these
//!   and falls through to a normal search.

use thiserror::Error;

use crate::game_state::chess_types::{Color, Square};

/// Unified error type for the chess engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessErrors {
    /// The position description could not be parsed.
    #[error("invalid FEN: {reason}")]
    InvalidFen { reason: String },

    /// A coordinate such as `e4` was malformed or out of range.
    #[error("invalid square: {0}")]
    InvalidSquare(String),

    /// A coordinate move string did not match `[a-h][1-8][a-h][1-8][qrbn]?`.
    #[error("invalid move string: {0}")]
    InvalidMoveString(String),

    /// A well-formed move that is not legal in the given position.
    #[error("illegal move {mv} in position {fen}")]
    IllegalMove { mv: String, fen: String },

    /// Move application was asked to move a piece from an empty square.
    #[error("no piece on from-square {0}")]
    EmptyFromSquare(Square),

    /// Move application was asked to move an opponent's piece.
    #[error("piece on square {0} does not belong to the side to move")]
    WrongSideToMove(Square),

    /// The cached king square disagrees with the board.
    #[error("king square cache for {color:?} says {cached} but board has {actual:?}")]
    KingSquareMismatch {
        color: Color,
        cached: Square,
        actual: Option<Square>,
    },

    /// A side has no king on the board.
    #[error("position has no {0:?} king")]
    MissingKing(Color),

    /// A protocol command was missing arguments or had an unknown token.
    #[error("malformed command: {0}")]
    MalformedCommand(String),

    /// An engine option had an unusable value.
    #[error("invalid value '{value}' for option {name}")]
    InvalidOption { name: String, value: String },

    /// The opening book could not be loaded or parsed.
    #[error("opening book error: {0}")]
    BookLoad(String),

    /// The endgame tablebase lookup failed.
    #[error("tablebase error: {0}")]
    Tablebase(String),
}

impl ChessErrors {
    pub(crate) fn fen(reason: impl Into<String>) -> Self {
        ChessErrors::InvalidFen {
            reason: reason.into(),
        }
    }

    pub(crate) fn option(name: &str, value: &str) -> Self {
        ChessErrors::InvalidOption {
            name: name.to_owned(),
            value: value.to_owned(),
        }
    }

    /// True for variants that indicate a bug rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ChessErrors::EmptyFromSquare(_)
                | ChessErrors::WrongSideToMove(_)
                | ChessErrors::KingSquareMismatch { .. }
        )
    }
}

pub type ChessResult<T> = Result<T, ChessErrors>;

#[cfg(test)]
mod tests {
    use super::ChessErrors;

    #[test]
    fn display_messages_carry_context() {
        let err = ChessErrors::fen("board layout must contain 8 ranks");
        assert_eq!(err.to_string(), "invalid FEN: board layout must contain 8 ranks");

        let err = ChessErrors::IllegalMove {
            mv: "e2e5".to_owned(),
            fen: "startpos".to_owned(),
        };
        assert!(err.to_string().contains("e2e5"));
    }

    #[test]
    fn invariant_variants_are_internal() {
        assert!(ChessErrors::EmptyFromSquare(12).is_internal());
        assert!(!ChessErrors::InvalidMoveString("zz".to_owned()).is_internal());
        assert!(!ChessErrors::Tablebase("offline".to_owned()).is_internal());
    }
}
