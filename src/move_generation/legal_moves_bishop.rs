use crate::game_state::{chess_types::PieceKind, game_state::GameState};
use crate::move_generation::legal_move_shared::push_sliding_moves;
use crate::moves::bishop_moves::BISHOP_DIRECTIONS;
use crate::moves::move_descriptions::MoveDescription;

pub fn generate_bishop_moves(game_state: &GameState, out: &mut Vec<MoveDescription>) {
    push_sliding_moves(game_state, PieceKind::Bishop, &BISHOP_DIRECTIONS, out);
}
