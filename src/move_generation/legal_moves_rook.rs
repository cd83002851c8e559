use crate::game_state::{chess_types::PieceKind, game_state::GameState};
use crate::move_generation::legal_move_shared::push_sliding_moves;
use crate::moves::move_descriptions::MoveDescription;
use crate::moves::rook_moves::ROOK_DIRECTIONS;

pub fn generate_rook_moves(game_state: &GameState, out: &mut Vec<MoveDescription>) {
    push_sliding_moves(game_state, PieceKind::Rook, &ROOK_DIRECTIONS, out);
}
