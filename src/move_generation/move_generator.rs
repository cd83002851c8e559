use crate::chess_errors::ChessResult;
use crate::game_state::game_state::GameState;
use crate::moves::move_descriptions::MoveDescription;

/// A legal move together with the position it produces.
#[derive(Debug, Clone)]
pub struct GeneratedMove {
    pub move_description: MoveDescription,
    pub game_after_move: GameState,
}

pub trait MoveGenerator: Send + Sync {
    /// Every strictly legal move for the side to move. Empty means the game
    /// is over: checkmate if the side to move is in check, stalemate otherwise.
    fn generate_legal_moves(&self, game_state: &GameState) -> ChessResult<Vec<GeneratedMove>>;
}
