//! Engine abstraction layer used by the UCI subsystem.
//!
//! The trait mirrors the minimal command surface: start a new game, set a
//! position, search it, and hand out a stop handle that another thread can
//! raise to end a search early.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::chess_errors::ChessResult;
use crate::game_state::game_state::GameState;
use crate::moves::move_descriptions::MoveDescription;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    pub depth: Option<u8>,
    pub movetime_ms: Option<u64>,
    pub wtime_ms: Option<u64>,
    pub btime_ms: Option<u64>,
    pub winc_ms: Option<u64>,
    pub binc_ms: Option<u64>,
    pub movestogo: Option<u16>,
    pub infinite: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutput {
    /// `None` only when the side to move has no legal move.
    pub best_move: Option<MoveDescription>,
    pub info_lines: Vec<String>,
}

pub trait Engine: Send {
    fn name(&self) -> &str;

    fn author(&self) -> &str;

    /// Forget everything learned about the previous game.
    fn new_game(&mut self);

    /// `fen: None` means the standard starting position. Moves are coordinate
    /// strings applied in order; on error the previous position is kept.
    fn set_position(&mut self, fen: Option<&str>, moves: &[&str]) -> ChessResult<()>;

    fn game_state(&self) -> &GameState;

    /// Unknown option names are accepted and ignored.
    fn set_option(&mut self, name: &str, value: &str) -> ChessResult<()>;

    /// Search the current position. The stop handle is not cleared here;
    /// whoever raises it also lowers it before the next search.
    fn go(&mut self, params: &GoParams) -> ChessResult<EngineOutput>;

    fn stop_handle(&self) -> Arc<AtomicBool>;
}
