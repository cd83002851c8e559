//! Full legal move generation pipeline.
//!
//! Orchestrates piece-wise pseudo-legal generation, applies each candidate to
//! a copy of the position and drops those that leave the mover's king attacked.

use crate::chess_errors::ChessResult;
use crate::game_state::{chess_types::Color, game_state::GameState};
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_moves_bishop::generate_bishop_moves;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_queen::generate_queen_moves;
use crate::move_generation::legal_moves_rook::generate_rook_moves;
use crate::move_generation::move_generator::{GeneratedMove, MoveGenerator};
use crate::moves::move_descriptions::MoveDescription;

#[derive(Debug, Clone, Copy, Default)]
pub struct LegalMoveGenerator;

impl MoveGenerator for LegalMoveGenerator {
    fn generate_legal_moves(&self, game_state: &GameState) -> ChessResult<Vec<GeneratedMove>> {
        generate_legal_moves(game_state)
    }
}

/// Moves obeying piece movement rules, ignoring whether the mover's king is
/// left in check. Castling is still fully validated.
pub fn generate_pseudo_legal_moves(game_state: &GameState) -> Vec<MoveDescription> {
    let mut pseudo = Vec::<MoveDescription>::with_capacity(64);

    generate_pawn_moves(game_state, &mut pseudo);
    generate_knight_moves(game_state, &mut pseudo);
    generate_bishop_moves(game_state, &mut pseudo);
    generate_rook_moves(game_state, &mut pseudo);
    generate_queen_moves(game_state, &mut pseudo);
    generate_king_moves(game_state, &mut pseudo);

    pseudo
}

pub fn generate_legal_moves(game_state: &GameState) -> ChessResult<Vec<GeneratedMove>> {
    let pseudo = generate_pseudo_legal_moves(game_state);
    let mut legal = Vec::<GeneratedMove>::with_capacity(pseudo.len());

    for mv in pseudo {
        let next = apply_move(game_state, &mv)?;

        // Illegal if own king is in check after move.
        if is_king_in_check(&next, game_state.side_to_move) {
            continue;
        }

        legal.push(GeneratedMove {
            move_description: mv,
            game_after_move: next,
        });
    }

    Ok(legal)
}

/// Pseudo-legal move count for `color`, as if it were that side's turn.
pub fn count_pseudo_legal_moves(game_state: &GameState, color: Color) -> usize {
    if game_state.side_to_move == color {
        return generate_pseudo_legal_moves(game_state).len();
    }
    let mut flipped = *game_state;
    flipped.side_to_move = color;
    flipped.en_passant_square = None;
    generate_pseudo_legal_moves(&flipped).len()
}
