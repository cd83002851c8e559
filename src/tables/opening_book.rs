//! Opening-book support with TSV import compatible with public opening datasets.
//!
//! Rows are move sequences in coordinate notation. Every prefix of a row is
//! indexed by the space-joined move history that leads to it, so a lookup
//! needs only the moves played so far, not the position.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::Rng;

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::game_state::GameState;
use crate::utils::long_algebraic::find_legal_move;

/// A source of opening moves keyed by game history.
pub trait OpeningBookSource: Send + Sync {
    /// Pick a continuation for `history`, or `None` when out of book.
    fn choose_move(&self, history: &[String], rng: &mut StdRng) -> ChessResult<Option<String>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookMove {
    pub uci: String,
    pub weight: u32,
}

#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    by_history: HashMap<String, Vec<BookMove>>,
}

impl OpeningBook {
    /// Load the opening book from `tables/openings.tsv` when present,
    /// otherwise fall back to the small embedded table.
    pub fn load_default() -> Self {
        let candidates = ["tables/openings.tsv", "tables/lichess_openings.tsv"];

        for p in candidates {
            if Path::new(p).exists() {
                match Self::from_tsv_path(p) {
                    Ok(book) => return book,
                    Err(err) => tracing::warn!(path = p, %err, "ignoring unreadable opening book"),
                }
            }
        }

        Self::embedded()
    }

    /// The table compiled into the binary.
    pub fn embedded() -> Self {
        Self::from_tsv_str(include_str!("data/opening_book_minimal.tsv")).unwrap_or_default()
    }

    pub fn from_tsv_path(path: &str) -> ChessResult<Self> {
        let data = fs::read_to_string(path)
            .map_err(|e| ChessErrors::BookLoad(format!("failed reading {path}: {e}")))?;
        Self::from_tsv_str(&data)
    }

    pub fn from_tsv_str(tsv: &str) -> ChessResult<Self> {
        let mut lines = tsv.lines().filter(|line| !line.trim().is_empty());
        let header = lines
            .next()
            .ok_or_else(|| ChessErrors::BookLoad("opening TSV is empty".to_owned()))?;
        let columns: Vec<&str> = header.split('\t').collect();

        let mut uci_idx = None;
        let mut moves_idx = None;
        let mut weight_idx = None;

        for (i, name) in columns.iter().enumerate() {
            let lc = name.trim().to_ascii_lowercase();
            if lc == "uci" {
                uci_idx = Some(i);
            } else if lc == "moves" {
                moves_idx = Some(i);
            } else if lc == "weight" || lc == "count" || lc == "plays" {
                weight_idx = Some(i);
            }
        }

        let sequence_idx = uci_idx.or(moves_idx).ok_or_else(|| {
            ChessErrors::BookLoad(
                "opening TSV must contain either a 'uci' or 'moves' column".to_owned(),
            )
        })?;

        let mut by_history_and_move: HashMap<String, HashMap<String, u32>> = HashMap::new();

        for line in lines {
            let fields: Vec<&str> = line.split('\t').collect();
            let sequence = fields
                .get(sequence_idx)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    ChessErrors::BookLoad(format!("missing move sequence in row '{line}'"))
                })?;

            let row_weight = weight_idx
                .and_then(|idx| fields.get(idx).copied())
                .and_then(|w| w.trim().parse::<u32>().ok())
                .unwrap_or(1)
                .max(1);

            // Replaying the row rejects sequences with illegal moves.
            let mut state = GameState::new_game();
            let mut history = String::new();
            for token in sequence.split_whitespace() {
                let generated = find_legal_move(token, &state).map_err(|e| {
                    ChessErrors::BookLoad(format!("bad move '{token}' in row '{line}': {e}"))
                })?;

                let move_weights = by_history_and_move.entry(history.clone()).or_default();
                let entry = move_weights.entry(token.to_owned()).or_insert(0);
                *entry = entry.saturating_add(row_weight);

                if !history.is_empty() {
                    history.push(' ');
                }
                history.push_str(token);
                state = generated.game_after_move;
            }
        }

        let by_history = by_history_and_move
            .into_iter()
            .map(|(history, moves)| {
                let mut row: Vec<BookMove> = moves
                    .into_iter()
                    .map(|(uci, weight)| BookMove { uci, weight })
                    .collect();
                // HashMap order is random; sort so seeded picks are reproducible.
                row.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| a.uci.cmp(&b.uci)));
                (history, row)
            })
            .collect();

        Ok(Self { by_history })
    }

    pub fn len(&self) -> usize {
        self.by_history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_history.is_empty()
    }

    pub fn moves_for(&self, history: &[String]) -> Option<&[BookMove]> {
        self.by_history
            .get(&history.join(" "))
            .map(|v| v.as_slice())
    }

    pub fn choose_weighted_move<R: Rng + ?Sized>(
        &self,
        history: &[String],
        rng: &mut R,
    ) -> Option<String> {
        let moves = self.moves_for(history)?;
        let first = moves.first()?;

        let total_weight: u64 = moves.iter().map(|m| u64::from(m.weight)).sum();
        if total_weight == 0 {
            return Some(first.uci.clone());
        }

        let mut pick = rng.random_range(0..total_weight);
        for m in moves {
            let w = u64::from(m.weight);
            if pick < w {
                return Some(m.uci.clone());
            }
            pick -= w;
        }

        Some(first.uci.clone())
    }
}

impl OpeningBookSource for OpeningBook {
    fn choose_move(&self, history: &[String], rng: &mut StdRng) -> ChessResult<Option<String>> {
        Ok(self.choose_weighted_move(history, rng))
    }
}
