//! Iterative deepening search with negamax alpha-beta pruning.
//!
//! Each depth runs a full-window pass from the root. Only completed depths
//! update the reported best move; an aborted pass (deadline, stop flag or
//! node budget) is discarded whole. If not even depth 1 completes, the first
//! move of the ordered root list is returned so callers always get a legal
//! move from a non-terminal position.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, trace_span};

use crate::chess_errors::ChessResult;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::move_generator::{GeneratedMove, MoveGenerator};
use crate::moves::move_descriptions::MoveDescription;
use crate::search::board_scoring::{terminal_score, BoardScorer, MATE_SCORE, MATE_THRESHOLD};
use crate::search::move_ordering::MoveOrderer;
use crate::search::quiescence::quiescence;
use crate::search::search_context::{QuiescenceOptions, SearchContext};
use crate::search::transposition_table::{
    score_to_tt, Bound, TTEntry, TTStats, TranspositionTable,
};

/// Strictly wider than any reachable score.
pub const INFINITY: i32 = MATE_SCORE + 1;

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub max_depth: u8,
    pub movetime_ms: Option<u64>,
    pub max_nodes: Option<u64>,
    pub stop_flag: Option<Arc<AtomicBool>>,
    pub use_transposition_table: bool,
    pub quiescence: QuiescenceOptions,
    /// Tried first at the root, after the hash move.
    pub root_bias_move: Option<MoveDescription>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            movetime_ms: None,
            max_nodes: None,
            stop_flag: None,
            use_transposition_table: true,
            quiescence: QuiescenceOptions::default(),
            root_bias_move: None,
        }
    }
}

/// Summary of one completed depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthReport {
    pub depth: u8,
    pub score: i32,
    pub nodes: u64,
    pub elapsed_ms: u64,
    pub principal_variation: Vec<MoveDescription>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub best_move: Option<MoveDescription>,
    pub best_score: i32,
    pub reached_depth: u8,
    pub nodes: u64,
    pub quiescence_nodes: u64,
    pub quiescence_cap_hits: u64,
    pub elapsed_ms: u64,
    pub nps: u64,
    pub tt_stats: TTStats,
    pub iterations: Vec<DepthReport>,
    /// True when no depth completed and `best_move` is the first ordered
    /// root move.
    pub used_fallback: bool,
}

pub fn iterative_deepening_search<G: MoveGenerator, S: BoardScorer, O: MoveOrderer>(
    game_state: &GameState,
    generator: &G,
    scorer: &S,
    orderer: &O,
    config: &SearchConfig,
    tt: &mut TranspositionTable,
) -> ChessResult<SearchResult> {
    let _span = trace_span!("search", max_depth = config.max_depth).entered();
    game_state.verify_king_squares()?;
    let started_at = Instant::now();
    let deadline = config
        .movetime_ms
        .map(|ms| started_at + Duration::from_millis(ms.max(1)));

    let mut root_moves = generator.generate_legal_moves(game_state)?;
    if root_moves.is_empty() {
        let in_check = is_king_in_check(game_state, game_state.side_to_move);
        debug!(in_check, "no legal moves at the root");
        return Ok(SearchResult {
            best_score: terminal_score(in_check, 0),
            nodes: 1,
            elapsed_ms: started_at.elapsed().as_millis() as u64,
            tt_stats: tt.stats(),
            ..SearchResult::default()
        });
    }

    if config.max_depth == 0 {
        return Ok(SearchResult {
            best_score: scorer.score(game_state),
            nodes: 1,
            elapsed_ms: started_at.elapsed().as_millis() as u64,
            tt_stats: tt.stats(),
            ..SearchResult::default()
        });
    }

    if config.use_transposition_table {
        tt.new_generation();
    }

    let mut ctx = SearchContext::new(generator, scorer, orderer)
        .with_quiescence(config.quiescence)
        .with_deadline(deadline)
        .with_stop_flag(config.stop_flag.clone())
        .with_max_nodes(config.max_nodes);
    if config.use_transposition_table {
        ctx = ctx.with_transposition_table(tt);
    }

    let root_hint = ctx
        .tt
        .as_deref_mut()
        .and_then(|table| table.probe(game_state.zobrist_key))
        .and_then(|entry| entry.best_move);
    ctx.orderer
        .order(&mut root_moves, root_hint.as_ref(), config.root_bias_move.as_ref());

    let mut result = SearchResult {
        best_move: Some(root_moves[0].move_description),
        best_score: 0,
        used_fallback: true,
        ..SearchResult::default()
    };

    for depth in 1..=config.max_depth {
        if ctx.should_abort() {
            break;
        }

        let Some((best_move, best_score)) = search_root(&mut ctx, game_state, &root_moves, depth)? else {
            debug!(depth, "depth abandoned");
            break;
        };

        let principal_variation = principal_variation(&mut ctx, game_state, best_move, depth);
        let elapsed_ms = started_at.elapsed().as_millis() as u64;
        debug!(
            depth,
            score = best_score,
            nodes = ctx.stats.total_nodes(),
            elapsed_ms,
            "depth complete"
        );

        result.best_move = Some(best_move);
        result.best_score = best_score;
        result.reached_depth = depth;
        result.used_fallback = false;
        result.iterations.push(DepthReport {
            depth,
            score: best_score,
            nodes: ctx.stats.total_nodes(),
            elapsed_ms,
            principal_variation,
        });

        // Next depth starts from this depth's choice.
        if let Some(pos) = root_moves
            .iter()
            .position(|mv| mv.move_description == best_move)
        {
            root_moves[..=pos].rotate_right(1);
        }

        // A mate inside the searched horizon will not improve with depth.
        if best_score >= MATE_THRESHOLD && MATE_SCORE - best_score <= i32::from(depth) {
            break;
        }
    }

    let stats = ctx.stats;
    drop(ctx);

    result.nodes = stats.total_nodes();
    result.quiescence_nodes = stats.quiescence_nodes;
    result.quiescence_cap_hits = stats.quiescence_cap_hits;
    result.elapsed_ms = started_at.elapsed().as_millis() as u64;
    result.nps = if result.elapsed_ms == 0 {
        0
    } else {
        result.nodes.saturating_mul(1000) / result.elapsed_ms
    };
    result.tt_stats = tt.stats();

    Ok(result)
}

fn search_root(
    ctx: &mut SearchContext<'_>,
    game_state: &GameState,
    root_moves: &[GeneratedMove],
    depth: u8,
) -> ChessResult<Option<(MoveDescription, i32)>> {
    let mut alpha = -INFINITY;
    let beta = INFINITY;
    let mut best: Option<(MoveDescription, i32)> = None;

    for mv in root_moves {
        let Some(child) = negamax(ctx, &mv.game_after_move, depth - 1, -beta, -alpha, 1)? else {
            return Ok(None);
        };
        let score = -child;
        let improved = match best {
            Some((_, best_score)) => score > best_score,
            None => true,
        };
        if improved {
            best = Some((mv.move_description, score));
        }
        alpha = alpha.max(score);
    }

    if let (Some((best_move, score)), Some(tt)) = (best, ctx.tt.as_deref_mut()) {
        tt.store(TTEntry {
            key: game_state.zobrist_key,
            depth,
            score: score_to_tt(score, 0),
            bound: Bound::Exact,
            best_move: Some(best_move),
        });
    }

    Ok(best)
}

fn negamax(
    ctx: &mut SearchContext<'_>,
    game_state: &GameState,
    depth: u8,
    mut alpha: i32,
    beta: i32,
    ply: i32,
) -> ChessResult<Option<i32>> {
    if ctx.should_abort() {
        return Ok(None);
    }
    ctx.stats.nodes += 1;

    let key = game_state.zobrist_key;
    let mut hash_move = None;
    if let Some(tt) = ctx.tt.as_deref_mut() {
        let probe = tt.probe_window(key, depth, alpha, beta, ply);
        if let Some(score) = probe.usable_score {
            return Ok(Some(score));
        }
        hash_move = probe.best_move;
    }

    if depth == 0 {
        return horizon(ctx, game_state, alpha, beta, ply);
    }

    let mut moves = ctx.generator.generate_legal_moves(game_state)?;
    if moves.is_empty() {
        let in_check = is_king_in_check(game_state, game_state.side_to_move);
        return Ok(Some(terminal_score(in_check, ply)));
    }
    ctx.orderer.order(&mut moves, hash_move.as_ref(), None);

    let alpha_orig = alpha;
    let mut best_score = -INFINITY;
    let mut best_move = None;

    for mv in &moves {
        let Some(child) = negamax(ctx, &mv.game_after_move, depth - 1, -beta, -alpha, ply + 1)?
        else {
            return Ok(None);
        };
        let score = -child;
        if score > best_score {
            best_score = score;
            best_move = Some(mv.move_description);
        }
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            break;
        }
    }

    let bound = if best_score <= alpha_orig {
        Bound::Upper
    } else if best_score >= beta {
        Bound::Lower
    } else {
        Bound::Exact
    };
    if let Some(tt) = ctx.tt.as_deref_mut() {
        tt.store(TTEntry {
            key,
            depth,
            score: score_to_tt(best_score, ply),
            bound,
            best_move,
        });
    }

    Ok(Some(best_score))
}

/// Depth-zero node: quiescence when enabled, otherwise a terminal-aware
/// static score.
fn horizon(
    ctx: &mut SearchContext<'_>,
    game_state: &GameState,
    alpha: i32,
    beta: i32,
    ply: i32,
) -> ChessResult<Option<i32>> {
    if ctx.quiescence.enabled {
        return quiescence(ctx, game_state, alpha, beta, 0, ply);
    }

    // Mates at the horizon must still outrank material.
    if ctx.generator.generate_legal_moves(game_state)?.is_empty() {
        let in_check = is_king_in_check(game_state, game_state.side_to_move);
        return Ok(Some(terminal_score(in_check, ply)));
    }
    Ok(Some(ctx.scorer.score(game_state)))
}

/// Best move followed by the hash moves stored along its line. Hash moves are
/// matched against the legal moves so a key collision cannot inject garbage.
fn principal_variation(
    ctx: &mut SearchContext<'_>,
    game_state: &GameState,
    first: MoveDescription,
    max_len: u8,
) -> Vec<MoveDescription> {
    let mut line = vec![first];
    let Ok(moves) = ctx.generator.generate_legal_moves(game_state) else {
        return line;
    };
    let Some(mut state) = moves
        .into_iter()
        .find(|mv| mv.move_description == first)
        .map(|mv| mv.game_after_move)
    else {
        return line;
    };

    while line.len() < usize::from(max_len) {
        let Some(hint) = ctx
            .tt
            .as_deref_mut()
            .and_then(|table| table.probe(state.zobrist_key))
            .and_then(|entry| entry.best_move)
        else {
            break;
        };
        let Ok(moves) = ctx.generator.generate_legal_moves(&state) else {
            break;
        };
        let Some(next) = moves.into_iter().find(|mv| mv.move_description == hint) else {
            break;
        };
        line.push(next.move_description);
        state = next.game_after_move;
    }

    line
}
