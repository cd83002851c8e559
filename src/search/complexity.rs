//! Cheap tactical-density estimate over the root moves, used once per search
//! to nudge the depth and time budgets.

use crate::move_generation::legal_move_checks::gives_check;
use crate::move_generation::move_generator::GeneratedMove;
use crate::search::board_scoring::GamePhase;

/// Root branching factor above which the position counts as busy.
const WIDE_ROOT_MOVES: usize = 35;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComplexityEstimate {
    pub moves: usize,
    pub captures: usize,
    pub checks: usize,
    pub score: i32,
}

impl ComplexityEstimate {
    pub fn from_root_moves(moves: &[GeneratedMove]) -> Self {
        let captures = moves
            .iter()
            .filter(|mv| mv.move_description.is_capture())
            .count();
        let checks = moves
            .iter()
            .filter(|mv| gives_check(&mv.game_after_move))
            .count();
        let wide_bonus = if moves.len() > WIDE_ROOT_MOVES { 2 } else { 0 };

        Self {
            moves: moves.len(),
            captures,
            checks,
            score: 2 * captures as i32 + 3 * checks as i32 + wide_bonus,
        }
    }

    /// -1 for quiet positions up to +2 for very tactical ones.
    pub fn adjustment(&self) -> i8 {
        match self.score {
            s if s >= 15 => 2,
            s if s >= 8 => 1,
            s if s <= 3 => -1,
            _ => 0,
        }
    }

    /// Nominal depth moved by the adjustment, plus one in the endgame, then
    /// clamped to `[min_depth, max_depth]`.
    pub fn adjusted_depth(&self, base: u8, phase: GamePhase, min_depth: u8, max_depth: u8) -> u8 {
        let mut depth = i16::from(base) + i16::from(self.adjustment());
        if phase == GamePhase::Endgame {
            depth += 1;
        }
        let low = i16::from(min_depth.max(1));
        let high = i16::from(max_depth.max(min_depth).max(1));
        depth.clamp(low, high) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::ComplexityEstimate;
    use crate::game_state::game_state::GameState;
    use crate::move_generation::legal_move_generator::generate_legal_moves;
    use crate::search::board_scoring::GamePhase;

    fn estimate(fen: &str) -> ComplexityEstimate {
        let game = GameState::from_fen(fen).expect("FEN should parse");
        ComplexityEstimate::from_root_moves(&generate_legal_moves(&game).expect("generation"))
    }

    #[test]
    fn start_position_is_quiet() {
        let est = estimate(crate::game_state::chess_rules::STARTING_POSITION_FEN);
        assert_eq!(est.moves, 20);
        assert_eq!(est.captures, 0);
        assert_eq!(est.checks, 0);
        assert_eq!(est.adjustment(), -1);
        assert_eq!(est.adjusted_depth(4, GamePhase::Opening, 1, 8), 3);
    }

    #[test]
    fn kiwipete_is_very_tactical() {
        let est =
            estimate("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        assert_eq!(est.moves, 48);
        assert_eq!(est.captures, 8);
        assert_eq!(est.adjustment(), 2);
        assert_eq!(est.adjusted_depth(4, GamePhase::Middlegame, 1, 8), 6);
        assert_eq!(est.adjusted_depth(4, GamePhase::Endgame, 1, 6), 6);
    }

    #[test]
    fn clamp_respects_minimum() {
        let est = ComplexityEstimate::default();
        assert_eq!(est.adjustment(), -1);
        assert_eq!(est.adjusted_depth(1, GamePhase::Opening, 2, 8), 2);
    }
}
