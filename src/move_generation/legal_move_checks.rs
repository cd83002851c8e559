//! Attack detection.
//!
//! `is_square_attacked` works backwards from the target square: it looks for
//! an attacker-colored pawn, knight or king on the squares that would reach it,
//! then walks the eight rays for the first blocker.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::ray;
use crate::moves::bishop_moves::BISHOP_DIRECTIONS;
use crate::moves::king_moves::king_attacks;
use crate::moves::knight_moves::knight_attacks;
use crate::moves::pawn_moves::pawn_attacks;
use crate::moves::rook_moves::ROOK_DIRECTIONS;

pub fn is_square_attacked(game_state: &GameState, square: Square, attacker_color: Color) -> bool {
    let has = |sq: Square, kind: PieceKind| {
        game_state.piece_at(sq) == Some(Piece::new(attacker_color, kind))
    };

    // A pawn of `attacker_color` attacks `square` iff a pawn of the other
    // color on `square` would attack the pawn.
    if squares_in_mask(pawn_attacks(attacker_color.opposite(), square))
        .any(|sq| has(sq, PieceKind::Pawn))
    {
        return true;
    }

    if squares_in_mask(knight_attacks(square)).any(|sq| has(sq, PieceKind::Knight)) {
        return true;
    }

    if squares_in_mask(king_attacks(square)).any(|sq| has(sq, PieceKind::King)) {
        return true;
    }

    slider_hits(game_state, square, attacker_color, &BISHOP_DIRECTIONS, PieceKind::Bishop)
        || slider_hits(game_state, square, attacker_color, &ROOK_DIRECTIONS, PieceKind::Rook)
}

fn slider_hits(
    game_state: &GameState,
    square: Square,
    attacker_color: Color,
    directions: &[(i8, i8)],
    line_piece: PieceKind,
) -> bool {
    directions.iter().any(|&direction| {
        ray(square, direction)
            .find_map(|sq| game_state.piece_at(sq))
            .is_some_and(|piece| {
                piece.color == attacker_color
                    && (piece.kind == line_piece || piece.kind == PieceKind::Queen)
            })
    })
}

#[inline]
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    is_square_attacked(game_state, game_state.king_square(color), color.opposite())
}

/// True when the side that just moved has left the side to move in check.
#[inline]
pub fn gives_check(game_after_move: &GameState) -> bool {
    is_king_in_check(game_after_move, game_after_move.side_to_move)
}
