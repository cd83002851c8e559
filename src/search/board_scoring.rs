//! Pluggable board evaluation interfaces and the phase-aware evaluator.
//!
//! Search delegates static scoring to `BoardScorer`, so alternate heuristics
//! can be swapped without touching search code. `PhaseAwareScorer` sums
//! material, phase-scaled piece-square values, a mobility difference and the
//! configured structural heuristics, all white-minus-black, then converts the
//! total to the side to move.

use crate::game_state::{chess_rules::piece_value, chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_generator::count_pseudo_legal_moves;
use crate::search::eval_heuristics::EvalHeuristic;
use crate::tables::piece_square_tables::pst_value;

pub const MATE_SCORE: i32 = 30000;
/// Scores at or beyond this magnitude encode a forced mate.
pub const MATE_THRESHOLD: i32 = MATE_SCORE - 1000;

/// Half-moves before which the game counts as the opening.
pub const OPENING_PLY_LIMIT: u16 = 20;
/// Half-moves before which the game counts as the middlegame.
pub const MIDDLEGAME_PLY_LIMIT: u16 = 80;
/// Non-pawn material (both sides, kings excluded) at or below which any
/// position counts as an endgame.
pub const ENDGAME_MATERIAL_LIMIT: i32 = 1300;

pub trait BoardScorer: Send + Sync {
    /// Score from the perspective of the side to move.
    fn score(&self, game_state: &GameState) -> i32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    Opening,
    Middlegame,
    Endgame,
}

impl GamePhase {
    pub fn detect(game_state: &GameState) -> Self {
        if non_pawn_material(game_state) <= ENDGAME_MATERIAL_LIMIT {
            return GamePhase::Endgame;
        }
        match game_state.game_ply {
            ply if ply < OPENING_PLY_LIMIT => GamePhase::Opening,
            ply if ply < MIDDLEGAME_PLY_LIMIT => GamePhase::Middlegame,
            _ => GamePhase::Endgame,
        }
    }

    pub const fn mobility_weight(self) -> i32 {
        match self {
            GamePhase::Opening => 4,
            GamePhase::Middlegame => 3,
            GamePhase::Endgame => 2,
        }
    }
}

pub fn non_pawn_material(game_state: &GameState) -> i32 {
    game_state
        .pieces()
        .filter(|(_, piece)| !matches!(piece.kind, PieceKind::Pawn | PieceKind::King))
        .map(|(_, piece)| piece_value(piece.kind))
        .sum()
}

/// Score for a side to move with no legal moves: mated (offset by `ply` so
/// nearer mates score worse) or stalemated.
#[inline]
pub const fn terminal_score(in_check: bool, ply: i32) -> i32 {
    if in_check {
        -MATE_SCORE + ply
    } else {
        0
    }
}

#[inline]
pub const fn is_mate_score(score: i32) -> bool {
    score >= MATE_THRESHOLD || score <= -MATE_THRESHOLD
}

/// Piece-square value after phase scaling, in tenths applied as integer math.
fn scaled_pst(kind: PieceKind, color: Color, square: Square, phase: GamePhase) -> i32 {
    let endgame = phase == GamePhase::Endgame;
    let raw = pst_value(kind, color, square, endgame);
    let tenths = match (phase, kind) {
        (GamePhase::Opening, PieceKind::Knight | PieceKind::Bishop) => 12,
        (GamePhase::Endgame, PieceKind::Pawn) => 13,
        (GamePhase::Endgame, PieceKind::King) => 15,
        _ => 10,
    };
    raw * tenths / 10
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl MaterialScorer {
    pub fn white_minus_black(game_state: &GameState) -> i32 {
        game_state
            .pieces()
            .map(|(_, piece)| piece.color.sign() * piece_value(piece.kind))
            .sum()
    }
}

impl BoardScorer for MaterialScorer {
    fn score(&self, game_state: &GameState) -> i32 {
        game_state.side_to_move.sign() * Self::white_minus_black(game_state)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseAwareScorer {
    pub heuristics: Vec<EvalHeuristic>,
    pub use_mobility: bool,
}

impl Default for PhaseAwareScorer {
    fn default() -> Self {
        Self::new(EvalHeuristic::ALL.to_vec())
    }
}

impl PhaseAwareScorer {
    pub fn new(heuristics: Vec<EvalHeuristic>) -> Self {
        Self {
            heuristics,
            use_mobility: true,
        }
    }

    /// Material and piece-square terms only.
    pub fn base_only() -> Self {
        Self {
            heuristics: Vec::new(),
            use_mobility: false,
        }
    }

    pub fn white_minus_black(&self, game_state: &GameState) -> i32 {
        let phase = GamePhase::detect(game_state);

        let mut score: i32 = game_state
            .pieces()
            .map(|(sq, piece)| {
                piece.color.sign()
                    * (piece_value(piece.kind) + scaled_pst(piece.kind, piece.color, sq, phase))
            })
            .sum();

        if self.use_mobility {
            let light = count_pseudo_legal_moves(game_state, Color::Light) as i32;
            let dark = count_pseudo_legal_moves(game_state, Color::Dark) as i32;
            score += phase.mobility_weight() * (light - dark);
        }

        score += self
            .heuristics
            .iter()
            .map(|heuristic| heuristic.white_minus_black(game_state))
            .sum::<i32>();

        score
    }
}

impl BoardScorer for PhaseAwareScorer {
    fn score(&self, game_state: &GameState) -> i32 {
        game_state.side_to_move.sign() * self.white_minus_black(game_state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(fen: &str) -> GameState {
        GameState::from_fen(fen).expect("FEN should parse")
    }

    #[test]
    fn material_scorer_reflects_side_to_move_perspective() {
        let scorer = MaterialScorer;
        assert_eq!(scorer.score(&game("4k3/8/8/8/8/8/8/4KQ2 w - - 0 1")), 900);
        assert_eq!(scorer.score(&game("4k3/8/8/8/8/8/8/4KQ2 b - - 0 1")), -900);
    }

    #[test]
    fn start_position_is_balanced() {
        let scorer = PhaseAwareScorer::default();
        assert_eq!(scorer.score(&GameState::new_game()), 0);
    }

    #[test]
    fn mirrored_positions_score_the_same_for_the_mover() {
        let scorer = PhaseAwareScorer::default();
        let light = game("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4");
        let dark = game("rnbqk2r/pppp1ppp/5n2/2b1p3/4P3/2N2N2/PPPP1PPP/R1BQKB1R b KQkq - 4 4");
        assert_eq!(scorer.score(&light), scorer.score(&dark));
    }

    #[test]
    fn central_knight_beats_rim_knight() {
        let scorer = PhaseAwareScorer::default();
        let center = game("4k3/8/8/3N4/8/8/8/4K3 w - - 0 1");
        let rim = game("4k3/8/8/8/8/8/N7/4K3 w - - 0 1");
        assert!(scorer.score(&center) > scorer.score(&rim));
    }

    #[test]
    fn phase_follows_ply_and_material() {
        let start = GameState::new_game();
        assert_eq!(GamePhase::detect(&start), GamePhase::Opening);

        let mut later = start;
        later.game_ply = 30;
        assert_eq!(GamePhase::detect(&later), GamePhase::Middlegame);
        later.game_ply = 80;
        assert_eq!(GamePhase::detect(&later), GamePhase::Endgame);

        // Rook each: 1000 of non-pawn material is an endgame at any ply.
        let rooks = game("r3k3/pppp4/8/8/8/8/PPPP4/R3K3 w - - 0 1");
        assert_eq!(GamePhase::detect(&rooks), GamePhase::Endgame);
    }

    #[test]
    fn endgame_king_prefers_the_centre() {
        let scorer = PhaseAwareScorer::base_only();
        let active = game("k7/8/8/8/4K3/4P3/8/8 w - - 0 1");
        let passive = game("k7/8/8/8/8/4P3/8/4K3 w - - 0 1");
        assert!(scorer.score(&active) > scorer.score(&passive));
    }

    #[test]
    fn mate_score_helpers() {
        assert_eq!(terminal_score(true, 3), -MATE_SCORE + 3);
        assert_eq!(terminal_score(false, 3), 0);
        assert!(is_mate_score(MATE_SCORE - 5));
        assert!(is_mate_score(-MATE_SCORE + 5));
        assert!(!is_mate_score(900));
    }
}
