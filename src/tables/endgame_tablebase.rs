//! Endgame tablebase lookup.
//!
//! The engine only asks a tablebase about positions with few pieces on the
//! board. `InMemoryTablebase` maps positions to known-best moves; remote or
//! on-disk sources plug in through the same trait.

use std::collections::HashMap;

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::game_state::GameState;

pub trait EndgameTablebase: Send + Sync {
    /// Best move for the position in coordinate notation, `None` when the
    /// position is not covered.
    fn probe(&self, game_state: &GameState) -> ChessResult<Option<String>>;
}

/// Positions keyed by the first four FEN fields (placement, side, castling,
/// en passant), so the clocks do not affect a lookup.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTablebase {
    entries: HashMap<String, String>,
}

impl InMemoryTablebase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, fen: &str, best_move: &str) -> ChessResult<()> {
        let game_state = GameState::from_fen(fen)?;
        self.entries
            .insert(position_key(&game_state)?, best_move.to_owned());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EndgameTablebase for InMemoryTablebase {
    fn probe(&self, game_state: &GameState) -> ChessResult<Option<String>> {
        Ok(self.entries.get(&position_key(game_state)?).cloned())
    }
}

fn position_key(game_state: &GameState) -> ChessResult<String> {
    let fen = game_state.get_fen();
    let fields: Vec<&str> = fen.split_whitespace().take(4).collect();
    if fields.len() != 4 {
        return Err(ChessErrors::Tablebase(format!("unexpected FEN layout: {fen}")));
    }
    Ok(fields.join(" "))
}

#[cfg(test)]
mod tests {
    use super::{EndgameTablebase, InMemoryTablebase};
    use crate::game_state::game_state::GameState;

    #[test]
    fn lookup_ignores_move_clocks() {
        let mut tablebase = InMemoryTablebase::new();
        tablebase
            .insert("6k1/8/6K1/8/8/8/8/R7 w - - 0 1", "a1a8")
            .expect("FEN should parse");
        let later = GameState::from_fen("6k1/8/6K1/8/8/8/8/R7 w - - 12 57").expect("FEN");
        assert_eq!(
            tablebase.probe(&later).expect("probe"),
            Some("a1a8".to_owned())
        );
    }

    #[test]
    fn unknown_position_is_not_covered() {
        let tablebase = InMemoryTablebase::new();
        assert!(tablebase.is_empty());
        assert_eq!(tablebase.probe(&GameState::new_game()).expect("probe"), None);
    }
}
