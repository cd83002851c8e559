use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::push_masked_moves;
use crate::moves::knight_moves::knight_attacks;
use crate::moves::move_descriptions::MoveDescription;

pub fn generate_knight_moves(game_state: &GameState, out: &mut Vec<MoveDescription>) {
    let knight = Some(Piece::new(game_state.side_to_move, PieceKind::Knight));
    for from in 0..64u8 {
        if game_state.piece_at(from) == knight {
            push_masked_moves(game_state, from, PieceKind::Knight, knight_attacks(from), out);
        }
    }
}
