use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::move_descriptions::MoveDescription;
use crate::moves::pawn_moves::{pawn_attacks, pawn_start_rank, promotion_rank};

pub fn generate_pawn_moves(game_state: &GameState, out: &mut Vec<MoveDescription>) {
    let side = game_state.side_to_move;
    let pawn = Some(Piece::new(side, PieceKind::Pawn));
    let forward = side.pawn_direction();

    for from in 0..64u8 {
        if game_state.piece_at(from) != pawn {
            continue;
        }

        if let Some(to) = offset_square(from, 0, forward) {
            if game_state.is_empty(to) {
                push_pawn_move(side, MoveDescription::quiet(from, to, PieceKind::Pawn), out);

                if rank_of(from) == pawn_start_rank(side) {
                    if let Some(two_step) = offset_square(to, 0, forward) {
                        if game_state.is_empty(two_step) {
                            out.push(MoveDescription::double_push(from, two_step, to));
                        }
                    }
                }
            }
        }

        for to in squares_in_mask(pawn_attacks(side, from)) {
            match game_state.piece_at(to) {
                Some(target) if target.color != side => push_pawn_move(
                    side,
                    MoveDescription::capture(from, to, PieceKind::Pawn, target.kind),
                    out,
                ),
                None if game_state.en_passant_square == Some(to) => {
                    let captured_square = make_square(file_of(to), rank_of(from));
                    if game_state.piece_at(captured_square)
                        == Some(Piece::new(side.opposite(), PieceKind::Pawn))
                    {
                        out.push(MoveDescription::en_passant(from, to, captured_square));
                    }
                }
                _ => {}
            }
        }
    }
}

/// Expand a move reaching the last rank into the four promotions.
fn push_pawn_move(side: Color, mv: MoveDescription, out: &mut Vec<MoveDescription>) {
    if rank_of(mv.to) == promotion_rank(side) {
        out.extend(
            PieceKind::PROMOTIONS
                .iter()
                .map(|&promo| mv.with_promotion(promo)),
        );
    } else {
        out.push(mv);
    }
}
