//! Move ordering.
//!
//! The hash move goes first, then an optional bias move (a book suggestion
//! at the root), then captures by most-valuable-victim / least-valuable-
//! attacker, then promotions, then quiet moves in generation order.

use std::cmp::Reverse;

use crate::game_state::chess_rules::piece_value;
use crate::move_generation::move_generator::GeneratedMove;
use crate::moves::move_descriptions::MoveDescription;

pub trait MoveOrderer: Send + Sync {
    fn order(
        &self,
        moves: &mut [GeneratedMove],
        hash_move: Option<&MoveDescription>,
        bias_move: Option<&MoveDescription>,
    );
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MvvLvaOrdering;

const CAPTURE_BASE: i32 = 100_000;
const PROMOTION_BASE: i32 = 50_000;

/// Heuristic rank of a move, higher first. Pure in the move.
pub fn mvv_lva_score(mv: &MoveDescription) -> i32 {
    let mut score = 0;
    if let Some(victim) = mv.captured_piece {
        score += CAPTURE_BASE + 10 * piece_value(victim) - mv.moved_piece.index() as i32;
    }
    if let Some(promo) = mv.promotion_piece {
        score += PROMOTION_BASE + piece_value(promo);
    }
    score
}

impl MoveOrderer for MvvLvaOrdering {
    fn order(
        &self,
        moves: &mut [GeneratedMove],
        hash_move: Option<&MoveDescription>,
        bias_move: Option<&MoveDescription>,
    ) {
        moves.sort_by_key(|mv| Reverse(mvv_lva_score(&mv.move_description)));

        // Pull bias then hash move to the front so the hash move ends up first.
        for preferred in [bias_move, hash_move].into_iter().flatten() {
            if let Some(pos) = moves
                .iter()
                .position(|mv| mv.move_description.same_coordinates(preferred))
            {
                moves[..=pos].rotate_right(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{mvv_lva_score, MoveOrderer, MvvLvaOrdering};
    use crate::game_state::chess_types::PieceKind;
    use crate::game_state::game_state::GameState;
    use crate::move_generation::legal_move_generator::generate_legal_moves;
    use crate::moves::move_descriptions::MoveDescription;

    #[test]
    fn prefers_valuable_victims_and_cheap_attackers() {
        let pxq = MoveDescription::capture(28, 35, PieceKind::Pawn, PieceKind::Queen);
        let qxq = MoveDescription::capture(3, 35, PieceKind::Queen, PieceKind::Queen);
        let pxp = MoveDescription::capture(28, 35, PieceKind::Pawn, PieceKind::Pawn);
        let quiet = MoveDescription::quiet(6, 21, PieceKind::Knight);
        assert!(mvv_lva_score(&pxq) > mvv_lva_score(&qxq));
        assert!(mvv_lva_score(&qxq) > mvv_lva_score(&pxp));
        assert!(mvv_lva_score(&pxp) > mvv_lva_score(&quiet));
    }

    #[test]
    fn captures_lead_and_hash_move_overrides() {
        // Light can take the d5 queen with the e4 pawn or the d1 queen.
        let game = GameState::from_fen("4k3/8/8/3q4/4P3/8/8/3QK3 w - - 0 1")
            .expect("FEN should parse");
        let mut moves = generate_legal_moves(&game).expect("generation");
        MvvLvaOrdering.order(&mut moves, None, None);
        assert_eq!(moves[0].move_description.to_string(), "e4d5");
        assert_eq!(moves[1].move_description.to_string(), "d1d5");

        let hash = MoveDescription::quiet(4, 5, PieceKind::King);
        let bias = MoveDescription::quiet(3, 0, PieceKind::Queen);
        MvvLvaOrdering.order(&mut moves, Some(&hash), Some(&bias));
        assert_eq!(moves[0].move_description.to_string(), "e1f1");
        assert_eq!(moves[1].move_description.to_string(), "d1a1");
        assert_eq!(moves[2].move_description.to_string(), "e4d5");
    }
}
