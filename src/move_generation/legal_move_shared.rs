//! Helpers shared by the per-piece generators.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::move_descriptions::MoveDescription;

/// Squares along one direction from `from` (exclusive), up to the board edge.
#[inline]
pub fn ray(from: Square, direction: (i8, i8)) -> impl Iterator<Item = Square> {
    let mut current = from;
    std::iter::from_fn(move || {
        let next = offset_square(current, direction.0, direction.1)?;
        current = next;
        Some(next)
    })
}

/// Push a quiet move or capture to `to` unless it holds an own piece.
/// Returns `true` when the square was empty, so sliders keep going.
#[inline]
pub fn push_step_move(
    game_state: &GameState,
    from: Square,
    to: Square,
    kind: PieceKind,
    out: &mut Vec<MoveDescription>,
) -> bool {
    match game_state.piece_at(to) {
        None => {
            out.push(MoveDescription::quiet(from, to, kind));
            true
        }
        Some(piece) if piece.color != game_state.side_to_move => {
            out.push(MoveDescription::capture(from, to, kind, piece.kind));
            false
        }
        Some(_) => false,
    }
}

/// Sliding generation for bishops, rooks and queens.
pub fn push_sliding_moves(
    game_state: &GameState,
    kind: PieceKind,
    directions: &[(i8, i8)],
    out: &mut Vec<MoveDescription>,
) {
    let side = game_state.side_to_move;
    for (from, piece) in game_state.pieces() {
        if piece.color != side || piece.kind != kind {
            continue;
        }
        for &direction in directions {
            for to in ray(from, direction) {
                if !push_step_move(game_state, from, to, kind, out) {
                    break;
                }
            }
        }
    }
}

/// Step generation for knights and kings from a precomputed target mask.
pub fn push_masked_moves(
    game_state: &GameState,
    from: Square,
    kind: PieceKind,
    targets: u64,
    out: &mut Vec<MoveDescription>,
) {
    for to in squares_in_mask(targets) {
        push_step_move(game_state, from, to, kind, out);
    }
}
