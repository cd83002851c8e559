use crate::game_state::{chess_types::PieceKind, game_state::GameState};
use crate::move_generation::legal_move_shared::push_sliding_moves;
use crate::moves::move_descriptions::MoveDescription;
use crate::moves::queen_moves::QUEEN_DIRECTIONS;

pub fn generate_queen_moves(game_state: &GameState, out: &mut Vec<MoveDescription>) {
    push_sliding_moves(game_state, PieceKind::Queen, &QUEEN_DIRECTIONS, out);
}
