//! Iterative-deepening engine.
//!
//! Move selection runs in a fixed order: opening book (early game only),
//! endgame tablebase (few pieces only), then the alpha-beta search. Book and
//! tablebase answers are accepted only if they are legal in the current
//! position, and their failures are logged and skipped, never surfaced.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::engines::engine_config::{BookPolicy, EngineConfig};
use crate::engines::engine_trait::{Engine, EngineOutput, GoParams};
use crate::engines::time_management::{move_budget_ms, scale_for_complexity};
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::move_generation::move_generator::MoveGenerator;
use crate::moves::move_descriptions::MoveDescription;
use crate::search::board_scoring::{is_mate_score, GamePhase, PhaseAwareScorer, MATE_SCORE};
use crate::search::complexity::ComplexityEstimate;
use crate::search::iterative_deepening::{iterative_deepening_search, SearchConfig, SearchResult};
use crate::search::move_ordering::MvvLvaOrdering;
use crate::search::transposition_table::TranspositionTable;
use crate::tables::endgame_tablebase::EndgameTablebase;
use crate::tables::opening_book::{OpeningBook, OpeningBookSource};
use crate::utils::long_algebraic::find_legal_move;

/// Depth ceiling for `go infinite`; the stop handle ends the search first.
const INFINITE_DEPTH: u8 = 64;
/// How often an infinite `go` checks for `stop` once its search is done.
const STOP_POLL_MS: u64 = 5;

pub struct IterativeEngine {
    config: EngineConfig,
    move_generator: LegalMoveGenerator,
    scorer: PhaseAwareScorer,
    orderer: MvvLvaOrdering,
    tt: TranspositionTable,
    opening_book: Option<Box<dyn OpeningBookSource>>,
    tablebase: Option<Box<dyn EndgameTablebase>>,
    rng: StdRng,
    game_state: GameState,
    /// Moves since the standard start. `None` after a custom FEN, which keeps
    /// the book out of play.
    move_history: Option<Vec<String>>,
    stop_signal: Arc<AtomicBool>,
}

impl IterativeEngine {
    pub fn new(config: EngineConfig) -> Self {
        let scorer = PhaseAwareScorer {
            heuristics: config.heuristics.clone(),
            use_mobility: config.use_mobility,
        };
        Self {
            tt: TranspositionTable::new_with_mb(config.hash_mb),
            rng: seeded_rng(config.rng_seed),
            config,
            move_generator: LegalMoveGenerator,
            scorer,
            orderer: MvvLvaOrdering,
            opening_book: Some(Box::new(OpeningBook::load_default())),
            tablebase: None,
            game_state: GameState::new_game(),
            move_history: Some(Vec::new()),
            stop_signal: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_opening_book(mut self, book: impl OpeningBookSource + 'static) -> Self {
        self.opening_book = Some(Box::new(book));
        self
    }

    pub fn without_opening_book(mut self) -> Self {
        self.opening_book = None;
        self
    }

    pub fn with_tablebase(mut self, tablebase: impl EndgameTablebase + 'static) -> Self {
        self.tablebase = Some(Box::new(tablebase));
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn move_history(&self) -> Option<&[String]> {
        self.move_history.as_deref()
    }

    /// One-shot entry point: best move for `fen` within `time_budget_ms`, in
    /// coordinate notation.
    ///
    /// `move_history`, when given, sets the game ply used for phase detection
    /// and keys the opening book. Returns `Ok(None)` only when the side to
    /// move has no legal move; malformed input and invariant violations are
    /// errors.
    pub fn get_best_move(
        &mut self,
        fen: &str,
        time_budget_ms: u64,
        move_history: Option<&[String]>,
    ) -> ChessResult<Option<String>> {
        let mut state = GameState::from_fen(fen)?;
        if let Some(history) = move_history {
            state.game_ply = u16::try_from(history.len()).unwrap_or(u16::MAX);
        }

        self.stop_signal.store(false, Ordering::Relaxed);
        let params = GoParams {
            movetime_ms: Some(time_budget_ms.max(1)),
            ..GoParams::default()
        };
        let output = self.think(&state, move_history, &params, true)?;
        Ok(output.best_move.map(|mv| mv.to_string()))
    }

    fn think(
        &mut self,
        state: &GameState,
        history: Option<&[String]>,
        params: &GoParams,
        adapt_time: bool,
    ) -> ChessResult<EngineOutput> {
        state.verify_king_squares()?;
        let mut out = EngineOutput::default();

        let root_moves = self.move_generator.generate_legal_moves(state)?;
        if root_moves.is_empty() {
            let in_check = is_king_in_check(state, state.side_to_move);
            let ending = if in_check { "checkmate" } else { "stalemate" };
            info!(ending, "no legal moves");
            out.info_lines
                .push(format!("info string no legal moves ({ending})"));
            return Ok(out);
        }

        let mut bias_move = None;
        if let Some(book_move) = self.book_move(state, history) {
            match self.config.book_policy {
                BookPolicy::Play => {
                    info!(mv = %book_move, "playing book move");
                    out.info_lines
                        .push(format!("info string book move {book_move}"));
                    out.best_move = Some(book_move);
                    return Ok(out);
                }
                BookPolicy::BiasOrdering => {
                    out.info_lines
                        .push(format!("info string book bias {book_move}"));
                    bias_move = Some(book_move);
                }
                BookPolicy::Off => {}
            }
        }

        if let Some(tb_move) = self.tablebase_move(state) {
            info!(mv = %tb_move, "playing tablebase move");
            out.info_lines
                .push(format!("info string tablebase move {tb_move}"));
            out.best_move = Some(tb_move);
            return Ok(out);
        }

        let phase = GamePhase::detect(state);
        let complexity = ComplexityEstimate::from_root_moves(&root_moves);
        let fixed_depth = params.depth.or(self.config.fixed_depth).filter(|d| *d > 0);
        let adapt = fixed_depth.is_none() && self.config.adapt_to_complexity;

        let depth = match fixed_depth {
            Some(depth) => depth,
            None if params.infinite => INFINITE_DEPTH,
            None if adapt => complexity.adjusted_depth(
                self.config.default_depth,
                phase,
                self.config.min_depth,
                self.config.max_depth,
            ),
            None => self
                .config
                .default_depth
                .clamp(self.config.min_depth, self.config.max_depth.max(self.config.min_depth)),
        };

        let mut budget_ms = move_budget_ms(state, params, self.config.time_strategy);
        if adapt && adapt_time {
            budget_ms = budget_ms.map(|ms| scale_for_complexity(ms, complexity.adjustment()));
        }

        debug!(
            ?phase,
            complexity = complexity.score,
            adjustment = complexity.adjustment(),
            depth,
            budget_ms,
            "starting search"
        );

        let search_config = SearchConfig {
            max_depth: depth,
            movetime_ms: budget_ms,
            max_nodes: None,
            stop_flag: Some(Arc::clone(&self.stop_signal)),
            use_transposition_table: self.config.use_transposition_table,
            quiescence: self.config.quiescence,
            root_bias_move: bias_move,
        };
        let result = iterative_deepening_search(
            state,
            &self.move_generator,
            &self.scorer,
            &self.orderer,
            &search_config,
            &mut self.tt,
        )?;

        out.info_lines.extend(iteration_lines(&result));
        out.info_lines.push(format!(
            "info string complexity {} adjustment {} depth {} budget {}",
            complexity.score,
            complexity.adjustment(),
            depth,
            budget_ms.map_or_else(|| "none".to_owned(), |ms| ms.to_string()),
        ));
        if result.used_fallback {
            out.info_lines.push(
                "info string search stopped before depth 1 completed, playing first ordered move"
                    .to_owned(),
            );
        }

        info!(
            best_move = ?result.best_move.map(|mv| mv.to_string()),
            score = result.best_score,
            depth = result.reached_depth,
            nodes = result.nodes,
            elapsed_ms = result.elapsed_ms,
            tt_hits = result.tt_stats.hits,
            "search finished"
        );

        out.best_move = result.best_move;
        Ok(out)
    }

    fn book_move(&mut self, state: &GameState, history: Option<&[String]>) -> Option<MoveDescription> {
        if self.config.book_policy == BookPolicy::Off
            || state.game_ply >= self.config.book_max_plies
        {
            return None;
        }
        let history: &[String] = match history {
            Some(history) => history,
            None if is_start_position(state) => &[],
            None => return None,
        };
        let book = self.opening_book.as_ref()?;

        match book.choose_move(history, &mut self.rng) {
            Ok(Some(uci)) => match find_legal_move(&uci, state) {
                Ok(generated) => Some(generated.move_description),
                Err(err) => {
                    warn!(%err, %uci, "rejecting book move");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!(%err, "opening book lookup failed");
                None
            }
        }
    }

    fn tablebase_move(&self, state: &GameState) -> Option<MoveDescription> {
        if state.piece_count() > self.config.tablebase_max_pieces {
            return None;
        }
        let tablebase = self.tablebase.as_ref()?;

        match tablebase.probe(state) {
            Ok(Some(uci)) => match find_legal_move(&uci, state) {
                Ok(generated) => Some(generated.move_description),
                Err(err) => {
                    warn!(%err, %uci, "rejecting tablebase move");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!(%err, "tablebase probe failed");
                None
            }
        }
    }
}

impl Default for IterativeEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine for IterativeEngine {
    fn name(&self) -> &str {
        "Thorn Chess"
    }

    fn author(&self) -> &str {
        "the Thorn Chess developers"
    }

    fn game_state(&self) -> &GameState {
        &self.game_state
    }

    fn new_game(&mut self) {
        self.tt.clear();
        self.game_state = GameState::new_game();
        self.move_history = Some(Vec::new());
        self.rng = seeded_rng(self.config.rng_seed);
    }

    fn set_position(&mut self, fen: Option<&str>, moves: &[&str]) -> ChessResult<()> {
        let mut state = match fen {
            Some(fen) => GameState::from_fen(fen)?,
            None => GameState::new_game(),
        };
        let mut history = is_start_position(&state).then(Vec::new);

        for token in moves {
            state = find_legal_move(token, &state)?.game_after_move;
            if let Some(history) = history.as_mut() {
                history.push((*token).to_owned());
            }
        }

        self.game_state = state;
        self.move_history = history;
        Ok(())
    }

    fn set_option(&mut self, name: &str, value: &str) -> ChessResult<()> {
        let value = value.trim();
        if name.eq_ignore_ascii_case("Hash") {
            let hash_mb = value
                .parse::<usize>()
                .map_err(|_| ChessErrors::option(name, value))?;
            self.config.hash_mb = hash_mb.max(1);
            self.tt = TranspositionTable::new_with_mb(self.config.hash_mb);
        } else if name.eq_ignore_ascii_case("OwnBook") {
            let enabled = parse_bool(name, value)?;
            self.config.book_policy = match (enabled, self.config.book_policy) {
                (false, _) => BookPolicy::Off,
                (true, BookPolicy::Off) => BookPolicy::Play,
                (true, policy) => policy,
            };
        } else if name.eq_ignore_ascii_case("BookPolicy") {
            self.config.book_policy = value.parse()?;
        } else if name.eq_ignore_ascii_case("FixedDepth") {
            let depth = value
                .parse::<u8>()
                .map_err(|_| ChessErrors::option(name, value))?;
            self.config.fixed_depth = (depth > 0).then_some(depth);
        } else if name.eq_ignore_ascii_case("TimeStrategy") {
            self.config.time_strategy = value.parse()?;
        } else {
            debug!(name, value, "ignoring unknown option");
        }
        Ok(())
    }

    /// With `infinite` set this returns only after the stop handle is raised,
    /// so the caller never reports a best move before `stop`.
    fn go(&mut self, params: &GoParams) -> ChessResult<EngineOutput> {
        let state = self.game_state;
        let history = self.move_history.clone();
        // An explicit movetime is the caller's hard budget.
        let adapt_time = params.movetime_ms.is_none();
        let output = self.think(&state, history.as_deref(), params, adapt_time)?;
        if params.infinite {
            while !self.stop_signal.load(Ordering::Relaxed) {
                thread::sleep(Duration::from_millis(STOP_POLL_MS));
            }
        }
        Ok(output)
    }

    fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop_signal)
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}

fn is_start_position(state: &GameState) -> bool {
    state.game_ply == 0 && state.zobrist_key == GameState::new_game().zobrist_key
}

fn parse_bool(name: &str, value: &str) -> ChessResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ChessErrors::option(name, value)),
    }
}

/// `cp N`, or `mate N` in moves (negative when being mated).
pub fn score_to_uci(score: i32) -> String {
    if !is_mate_score(score) {
        format!("cp {score}")
    } else if score > 0 {
        format!("mate {}", (MATE_SCORE - score + 1) / 2)
    } else {
        format!("mate {}", -((MATE_SCORE + score) / 2))
    }
}

fn iteration_lines(result: &SearchResult) -> impl Iterator<Item = String> + '_ {
    result.iterations.iter().map(|report| {
        let pv = report
            .principal_variation
            .iter()
            .map(|mv| mv.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            "info depth {} score {} nodes {} time {} pv {}",
            report.depth,
            score_to_uci(report.score),
            report.nodes,
            report.elapsed_ms,
            pv
        )
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::thread;
    use std::time::{Duration, Instant};

    use rand::rngs::StdRng;

    use super::{score_to_uci, IterativeEngine};
    use crate::chess_errors::{ChessErrors, ChessResult};
    use crate::engines::engine_config::{BookPolicy, EngineConfig};
    use crate::engines::engine_trait::{Engine, GoParams};
    use crate::engines::time_management::TimeManagementStrategy;
    use crate::game_state::chess_types::Color;
    use crate::game_state::game_state::GameState;
    use crate::move_generation::legal_move_checks::is_king_in_check;
    use crate::move_generation::legal_move_generator::generate_legal_moves;
    use crate::search::board_scoring::MATE_SCORE;
    use crate::tables::endgame_tablebase::InMemoryTablebase;
    use crate::tables::opening_book::{OpeningBook, OpeningBookSource};
    use crate::utils::long_algebraic::find_legal_move;

    struct BrokenBook;

    impl OpeningBookSource for BrokenBook {
        fn choose_move(&self, _history: &[String], _rng: &mut StdRng) -> ChessResult<Option<String>> {
            Err(ChessErrors::BookLoad("book file vanished".to_owned()))
        }
    }

    fn seeded(config: EngineConfig) -> IterativeEngine {
        IterativeEngine::new(config.with_rng_seed(7))
    }

    fn depth(d: u8) -> GoParams {
        GoParams {
            depth: Some(d),
            ..GoParams::default()
        }
    }

    #[test]
    fn book_move_is_played_from_the_start() {
        let mut engine = seeded(EngineConfig::default());
        let out = engine.go(&GoParams::default()).expect("go should succeed");
        let best = out.best_move.expect("book move").to_string();

        let book = OpeningBook::embedded();
        let candidates = book.moves_for(&[]).expect("book has first moves");
        assert!(candidates.iter().any(|m| m.uci == best), "{best} not in book");
        assert!(out.info_lines.iter().any(|l| l.starts_with("info string book move")));
    }

    #[test]
    fn book_follows_the_move_history() {
        let mut engine = seeded(EngineConfig::default());
        engine
            .set_position(None, &["e2e4", "e7e5"])
            .expect("moves are legal");
        assert_eq!(engine.move_history().map(|h| h.len()), Some(2));
        let out = engine.go(&GoParams::default()).expect("go should succeed");
        // Every book line through 1.e4 e5 continues with Nf3.
        assert_eq!(out.best_move.map(|mv| mv.to_string()), Some("g1f3".to_owned()));
    }

    #[test]
    fn custom_fen_keeps_the_book_out() {
        let mut engine = seeded(EngineConfig::default());
        engine
            .set_position(Some("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1"), &[])
            .expect("FEN is valid");
        assert_eq!(engine.move_history(), None);
        let out = engine.go(&depth(2)).expect("go should succeed");
        assert_eq!(out.best_move.map(|mv| mv.to_string()), Some("e4d5".to_owned()));
        assert!(out.info_lines.iter().any(|l| l.starts_with("info depth 2 ")));
    }

    #[test]
    fn bias_policy_searches_but_reports_the_book_move() {
        let mut engine = seeded(EngineConfig::default().with_book_policy(BookPolicy::BiasOrdering));
        let out = engine.go(&depth(1)).expect("go should succeed");
        assert!(out.info_lines.iter().any(|l| l.starts_with("info string book bias")));
        assert!(out.info_lines.iter().any(|l| l.starts_with("info depth 1 ")));
        let best = out.best_move.expect("search move").to_string();
        find_legal_move(&best, &GameState::new_game()).expect("move is legal");
    }

    #[test]
    fn failing_book_falls_through_to_search() {
        let mut engine = seeded(EngineConfig::default()).with_opening_book(BrokenBook);
        let out = engine.go(&depth(1)).expect("book failure is not fatal");
        assert!(out.best_move.is_some());
        assert!(out.info_lines.iter().any(|l| l.starts_with("info depth 1 ")));
    }

    #[test]
    fn illegal_position_moves_are_rejected_without_side_effects() {
        let mut engine = seeded(EngineConfig::default());
        engine.set_position(None, &["e2e4"]).expect("legal");
        let err = engine
            .set_position(None, &["e2e4", "e7e4"])
            .expect_err("e7e4 is illegal");
        assert!(matches!(err, ChessErrors::IllegalMove { .. }));
        assert_eq!(engine.game_state().side_to_move, Color::Dark);
        assert_eq!(engine.move_history().map(|h| h.len()), Some(1));

        let err = engine
            .set_position(Some("not a fen"), &[])
            .expect_err("bad FEN");
        assert!(matches!(err, ChessErrors::InvalidFen { .. }));
    }

    #[test]
    fn get_best_move_delivers_mate_in_one() {
        let fen = "6k1/5Q2/6K1/8/8/8/8/8 w - - 0 1";
        let mut engine = seeded(EngineConfig::default());
        let best = engine
            .get_best_move(fen, 2_000, None)
            .expect("search should succeed")
            .expect("a move exists");

        let game = GameState::from_fen(fen).expect("FEN should parse");
        let after = find_legal_move(&best, &game).expect("legal").game_after_move;
        assert!(generate_legal_moves(&after).expect("generation").is_empty());
        assert!(is_king_in_check(&after, after.side_to_move));
    }

    #[test]
    fn get_best_move_returns_none_when_game_is_over() {
        let mut engine = seeded(EngineConfig::default());
        assert_eq!(
            engine
                .get_best_move("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", 100, None)
                .expect("stalemate is not an error"),
            None
        );
        assert_eq!(
            engine
                .get_best_move("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1", 100, None)
                .expect("checkmate is not an error"),
            None
        );
        assert!(engine.get_best_move("8/8/8/8 w - - 0 1", 100, None).is_err());
    }

    #[test]
    fn get_best_move_uses_history_for_the_book() {
        let mut engine = seeded(EngineConfig::default());
        let history: Vec<String> = ["d2d4", "g8f6", "c2c4", "e7e6", "b1c3"]
            .iter()
            .map(|m| (*m).to_owned())
            .collect();
        let best = engine
            .get_best_move(
                "rnbqkb1r/pppp1ppp/4pn2/8/2PP4/2N5/PP2PPPP/R1BQKBNR b KQkq - 1 3",
                500,
                Some(&history),
            )
            .expect("search should succeed");
        assert_eq!(best.as_deref(), Some("f8b4"));
    }

    #[test]
    fn tablebase_answers_small_endgames() {
        let fen = "4k3/8/8/8/8/8/8/3QK3 w - - 0 1";
        let mut tablebase = InMemoryTablebase::new();
        tablebase.insert(fen, "d1e2").expect("valid entry");
        let mut engine = seeded(EngineConfig::default()).with_tablebase(tablebase);
        engine.set_position(Some(fen), &[]).expect("FEN is valid");
        let out = engine.go(&depth(3)).expect("go should succeed");
        assert_eq!(out.best_move.map(|mv| mv.to_string()), Some("d1e2".to_owned()));
        assert!(out.info_lines.iter().any(|l| l.starts_with("info string tablebase")));
    }

    #[test]
    fn illegal_tablebase_answer_is_ignored() {
        let fen = "4k3/8/8/8/8/8/8/3QK3 w - - 0 1";
        let mut tablebase = InMemoryTablebase::new();
        tablebase.insert(fen, "a1a8").expect("entry is stored unchecked");
        let mut engine = seeded(EngineConfig::default()).with_tablebase(tablebase);
        engine.set_position(Some(fen), &[]).expect("FEN is valid");
        let out = engine.go(&depth(1)).expect("go should succeed");
        let best = out.best_move.expect("search move").to_string();
        assert_ne!(best, "a1a8");
        find_legal_move(&best, engine.game_state()).expect("move is legal");
    }

    #[test]
    fn raised_stop_handle_still_yields_a_legal_move() {
        let mut engine = seeded(EngineConfig::default().with_book_policy(BookPolicy::Off));
        engine
            .set_position(Some("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4"), &[])
            .expect("FEN is valid");
        engine.stop_handle().store(true, Ordering::Relaxed);
        let out = engine.go(&depth(12)).expect("go should succeed");
        let best = out.best_move.expect("fallback move").to_string();
        find_legal_move(&best, engine.game_state()).expect("move is legal");
        assert!(out.info_lines.iter().any(|l| l.contains("first ordered move")));
    }

    #[test]
    fn stop_raised_mid_search_returns_promptly() {
        let mut engine = seeded(EngineConfig::default().with_book_policy(BookPolicy::Off));
        engine
            .set_position(Some("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4"), &[])
            .expect("FEN is valid");
        let stop = engine.stop_handle();
        let raiser = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            stop.store(true, Ordering::Relaxed);
        });

        let started = Instant::now();
        let out = engine.go(&depth(12)).expect("go should succeed");
        let elapsed = started.elapsed();
        raiser.join().expect("stop thread");

        let best = out.best_move.expect("move despite the stop").to_string();
        find_legal_move(&best, engine.game_state()).expect("move is legal");
        assert!(elapsed < Duration::from_secs(5), "stop took {elapsed:?}");
    }

    #[test]
    fn infinite_go_waits_for_stop_before_answering() {
        let mut engine = seeded(EngineConfig::default().with_book_policy(BookPolicy::Off));
        engine
            .set_position(Some("6k1/5Q2/6K1/8/8/8/8/8 w - - 0 1"), &[])
            .expect("FEN is valid");
        let stop = engine.stop_handle();
        let raiser = thread::spawn(move || {
            thread::sleep(Duration::from_millis(80));
            stop.store(true, Ordering::Relaxed);
        });

        let started = Instant::now();
        let params = GoParams {
            infinite: true,
            ..GoParams::default()
        };
        let out = engine.go(&params).expect("go should succeed");
        assert!(started.elapsed() >= Duration::from_millis(80));
        assert!(engine.stop_handle().load(Ordering::Relaxed));
        raiser.join().expect("stop thread");

        let best = out.best_move.expect("mating move").to_string();
        find_legal_move(&best, engine.game_state()).expect("move is legal");
    }

    #[test]
    fn stale_king_cache_fails_the_search() {
        let mut engine = seeded(EngineConfig::default().with_book_policy(BookPolicy::Off));
        engine.game_state.king_squares[0] = 3;
        let err = engine.go(&depth(1)).expect_err("stale cache must not be searched");
        assert!(matches!(err, ChessErrors::KingSquareMismatch { .. }));
    }

    #[test]
    fn options_update_the_config() {
        let mut engine = seeded(EngineConfig::default());
        engine.set_option("Hash", "32").expect("valid hash");
        assert_eq!(engine.config().hash_mb, 32);

        engine.set_option("OwnBook", "false").expect("valid bool");
        assert_eq!(engine.config().book_policy, BookPolicy::Off);
        engine.set_option("OwnBook", "true").expect("valid bool");
        assert_eq!(engine.config().book_policy, BookPolicy::Play);
        engine.set_option("BookPolicy", "bias").expect("valid policy");
        assert_eq!(engine.config().book_policy, BookPolicy::BiasOrdering);

        engine.set_option("FixedDepth", "3").expect("valid depth");
        assert_eq!(engine.config().fixed_depth, Some(3));
        engine.set_option("FixedDepth", "0").expect("valid depth");
        assert_eq!(engine.config().fixed_depth, None);

        engine.set_option("TimeStrategy", "fraction20").expect("valid strategy");
        assert_eq!(engine.config().time_strategy, TimeManagementStrategy::Fraction20);

        assert!(matches!(
            engine.set_option("Hash", "lots"),
            Err(ChessErrors::InvalidOption { .. })
        ));
        engine.set_option("Ponder", "true").expect("unknown options are ignored");
    }

    #[test]
    fn new_game_resets_position_and_history() {
        let mut engine = seeded(EngineConfig::default());
        engine
            .set_position(Some("4k3/8/8/8/8/8/8/3QK3 w - - 0 1"), &[])
            .expect("FEN is valid");
        engine.new_game();
        assert_eq!(engine.game_state(), &GameState::new_game());
        assert_eq!(engine.move_history().map(|h| h.len()), Some(0));
    }

    #[test]
    fn mate_scores_are_reported_in_moves() {
        assert_eq!(score_to_uci(MATE_SCORE - 1), "mate 1");
        assert_eq!(score_to_uci(MATE_SCORE - 3), "mate 2");
        assert_eq!(score_to_uci(-MATE_SCORE + 2), "mate -1");
        assert_eq!(score_to_uci(35), "cp 35");
    }
}
