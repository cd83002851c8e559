//! Quiescence search: resolve captures, promotions and early checks at the
//! horizon before trusting the static score.

use crate::chess_errors::ChessResult;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_checks::{gives_check, is_king_in_check};
use crate::move_generation::move_generator::GeneratedMove;
use crate::search::board_scoring::terminal_score;
use crate::search::search_context::SearchContext;

/// Returns `Ok(None)` when the search was aborted below this node.
///
/// `qply` counts quiescence plies below the horizon, `ply` counts plies from
/// the root and only feeds mate distances.
pub fn quiescence(
    ctx: &mut SearchContext<'_>,
    game_state: &GameState,
    mut alpha: i32,
    beta: i32,
    qply: u8,
    ply: i32,
) -> ChessResult<Option<i32>> {
    if ctx.should_abort() {
        return Ok(None);
    }
    ctx.stats.quiescence_nodes += 1;

    if qply >= ctx.quiescence.max_plies {
        ctx.stats.quiescence_cap_hits += 1;
        return Ok(Some(ctx.scorer.score(game_state)));
    }

    let in_check = is_king_in_check(game_state, game_state.side_to_move);
    let mut moves = ctx.generator.generate_legal_moves(game_state)?;
    if moves.is_empty() {
        return Ok(Some(terminal_score(in_check, ply)));
    }

    if !in_check {
        let stand_pat = ctx.scorer.score(game_state);
        if stand_pat >= beta {
            return Ok(Some(beta));
        }
        alpha = alpha.max(stand_pat);

        let allow_checks = qply < ctx.quiescence.check_plies;
        moves.retain(|mv| is_forcing(mv, allow_checks));
        if moves.is_empty() {
            return Ok(Some(alpha));
        }
    }

    ctx.orderer.order(&mut moves, None, None);

    for mv in &moves {
        let Some(child) = quiescence(ctx, &mv.game_after_move, -beta, -alpha, qply + 1, ply + 1)?
        else {
            return Ok(None);
        };
        let score = -child;
        if score >= beta {
            return Ok(Some(beta));
        }
        if score > alpha {
            alpha = score;
        }
    }

    Ok(Some(alpha))
}

fn is_forcing(mv: &GeneratedMove, allow_checks: bool) -> bool {
    mv.move_description.is_tactical() || (allow_checks && gives_check(&mv.game_after_move))
}

#[cfg(test)]
mod tests {
    use super::quiescence;
    use crate::game_state::game_state::GameState;
    use crate::move_generation::legal_move_generator::LegalMoveGenerator;
    use crate::search::board_scoring::{BoardScorer, MaterialScorer, MATE_SCORE};
    use crate::search::move_ordering::MvvLvaOrdering;
    use crate::search::search_context::{QuiescenceOptions, SearchContext};

    const WINDOW: i32 = MATE_SCORE + 1;

    fn run(fen: &str) -> (i32, u64) {
        let game = GameState::from_fen(fen).expect("FEN should parse");
        let mut ctx = SearchContext::new(&LegalMoveGenerator, &MaterialScorer, &MvvLvaOrdering);
        let score = quiescence(&mut ctx, &game, -WINDOW, WINDOW, 0, 0)
            .expect("quiescence")
            .expect("not aborted");
        (score, ctx.stats.quiescence_cap_hits)
    }

    #[test]
    fn quiet_position_returns_stand_pat() {
        let fen = "4k3/8/8/8/8/8/8/4KR2 w - - 0 1";
        let game = GameState::from_fen(fen).expect("FEN should parse");
        let (score, _) = run(fen);
        // The only check, Rf8+, just drops the rook to Kxf8.
        assert_eq!(score, MaterialScorer.score(&game));
    }

    #[test]
    fn hanging_queen_is_collected() {
        // Light to move can take the undefended queen on d5.
        let (score, cap_hits) = run("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1");
        assert_eq!(score, 100);
        assert_eq!(cap_hits, 0);
    }

    #[test]
    fn defended_pawn_is_not_grabbed_with_the_queen() {
        // Qxd5 loses the queen to exd5, so standing pat is better.
        let (score, _) = run("4k3/8/4p3/3p4/8/8/8/3QK3 w - - 0 1");
        assert_eq!(score, 900 - 200);
    }

    #[test]
    fn checkmated_side_scores_mate() {
        let (score, _) = run("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
        assert_eq!(score, -MATE_SCORE);
    }

    #[test]
    fn cap_is_not_hit_in_ordinary_tactics() {
        let (_, cap_hits) = run(crate::game_state::chess_rules::STARTING_POSITION_FEN);
        assert_eq!(cap_hits, 0);
        // Pawn and rook trades on d5 and the d-file, all resolved well inside the cap.
        let (score, cap_hits) = run("3rk3/8/8/3p4/4P3/8/8/3RK3 w - - 0 1");
        assert_eq!(cap_hits, 0);
        assert!(score >= 0);
    }

    #[test]
    fn forking_check_is_searched_only_within_check_plies() {
        // Nc7+ forks king and queen; no capture is available at the horizon.
        let game = GameState::from_fen("q3k3/8/8/1N6/8/8/8/6K1 w - - 0 1").expect("FEN should parse");

        let mut ctx = SearchContext::new(&LegalMoveGenerator, &MaterialScorer, &MvvLvaOrdering);
        let with_checks = quiescence(&mut ctx, &game, -WINDOW, WINDOW, 0, 0)
            .expect("quiescence")
            .expect("not aborted");
        assert_eq!(with_checks, 320);

        let mut ctx = SearchContext::new(&LegalMoveGenerator, &MaterialScorer, &MvvLvaOrdering)
            .with_quiescence(QuiescenceOptions {
                check_plies: 0,
                ..QuiescenceOptions::default()
            });
        let captures_only = quiescence(&mut ctx, &game, -WINDOW, WINDOW, 0, 0)
            .expect("quiescence")
            .expect("not aborted");
        assert_eq!(captures_only, MaterialScorer.score(&game));
        assert_eq!(captures_only, -580);
    }
}
