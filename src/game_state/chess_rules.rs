//! Canonical chess-rule constants.
//!
//! Static rule literals such as the standard starting position and the
//! centipawn values used by evaluation and move ordering.

use crate::game_state::chess_types::PieceKind;

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// King value is a sentinel: kings are never captured under strict legality.
pub const KING_SENTINEL_VALUE: i32 = 20_000;

#[inline]
pub const fn piece_value(piece: PieceKind) -> i32 {
    match piece {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => KING_SENTINEL_VALUE,
    }
}
