use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::move_generation::legal_move_shared::push_masked_moves;
use crate::moves::king_moves::king_attacks;
use crate::moves::move_descriptions::MoveDescription;

pub fn generate_king_moves(game_state: &GameState, out: &mut Vec<MoveDescription>) {
    let side = game_state.side_to_move;
    let from = game_state.king_square(side);
    if game_state.piece_at(from) != Some(Piece::new(side, PieceKind::King)) {
        return;
    }

    push_masked_moves(game_state, from, PieceKind::King, king_attacks(from), out);
    generate_castling_moves(game_state, out, from);
}

/// Castling requires the right, an empty path to the rook, and that the king
/// is not in check and neither crosses nor lands on an attacked square.
fn generate_castling_moves(game_state: &GameState, out: &mut Vec<MoveDescription>, king_from: Square) {
    let side = game_state.side_to_move;
    let enemy = side.opposite();

    for kind in CastleKind::for_color(side) {
        if !game_state.has_castling_right(kind.right()) || kind.king_squares().0 != king_from {
            continue;
        }
        let (rook_from, _) = kind.rook_squares();
        if game_state.piece_at(rook_from) != Some(Piece::new(side, PieceKind::Rook)) {
            continue;
        }
        if !kind.empty_squares().iter().all(|&sq| game_state.is_empty(sq)) {
            continue;
        }
        if is_square_attacked(game_state, king_from, enemy) {
            return;
        }
        if kind
            .king_path()
            .iter()
            .any(|&sq| is_square_attacked(game_state, sq, enemy))
        {
            continue;
        }
        out.push(MoveDescription::castle(kind));
    }
}
