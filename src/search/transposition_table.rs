//! Fixed-size transposition table keyed by Zobrist hash.
//!
//! This table uses direct indexing with depth-preferred replacement and
//! generation aging to evict stale entries. Scores are bound-typed: a stored
//! score is only handed back when its bound proves a cutoff for the caller's
//! window, never just because the key matched.

use crate::moves::move_descriptions::MoveDescription;
use crate::search::board_scoring::MATE_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Score is the true value.
    Exact,
    /// Search failed high: true value is at least the score.
    Lower,
    /// Search failed low: true value is at most the score.
    Upper,
}

#[derive(Debug, Clone, Copy)]
pub struct TTEntry {
    pub key: u64,
    pub depth: u8,
    pub score: i32,
    pub bound: Bound,
    pub best_move: Option<MoveDescription>,
}

/// Result of a windowed probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TtProbe {
    /// Score the caller may return directly.
    pub usable_score: Option<i32>,
    /// Move-ordering hint, present whenever the key matched.
    pub best_move: Option<MoveDescription>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TTStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    entries: Vec<Option<TTEntry>>,
    generations: Vec<u8>,
    current_generation: u8,
    stats: TTStats,
}

impl TranspositionTable {
    const AGE_REPLACE_THRESHOLD: u8 = 4;
    const DEPTH_REPLACE_MARGIN: u8 = 2;

    pub fn new_with_mb(size_mb: usize) -> Self {
        let bytes = size_mb.max(1) * 1024 * 1024;
        let entry_size = std::mem::size_of::<Option<TTEntry>>().max(1);
        Self::with_entries(bytes / entry_size)
    }

    pub fn with_entries(count: usize) -> Self {
        let count = count.max(1);
        Self {
            entries: vec![None; count],
            generations: vec![0; count],
            current_generation: 0,
            stats: TTStats::default(),
        }
    }

    /// Advance TT generation (once per search call).
    #[inline]
    pub fn new_generation(&mut self) {
        self.current_generation = self.current_generation.wrapping_add(1);
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.fill(None);
        self.generations.fill(0);
        self.current_generation = 0;
        self.stats = TTStats::default();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn stats(&self) -> TTStats {
        self.stats
    }

    #[inline]
    fn idx(&self, key: u64) -> usize {
        (key % self.entries.len() as u64) as usize
    }

    pub fn probe(&mut self, key: u64) -> Option<TTEntry> {
        self.stats.probes += 1;
        let idx = self.idx(key);
        let hit = self.entries[idx].filter(|e| e.key == key);
        if hit.is_some() {
            self.stats.hits += 1;
            self.generations[idx] = self.current_generation;
        }
        hit
    }

    /// Probe for a node searched to `depth` with window `(alpha, beta)` at
    /// `ply` from the root.
    pub fn probe_window(&mut self, key: u64, depth: u8, alpha: i32, beta: i32, ply: i32) -> TtProbe {
        let Some(entry) = self.probe(key) else {
            return TtProbe::default();
        };

        let score = score_from_tt(entry.score, ply);
        let usable = entry.depth >= depth
            && match entry.bound {
                Bound::Exact => true,
                Bound::Lower => score >= beta,
                Bound::Upper => score <= alpha,
            };

        TtProbe {
            usable_score: usable.then_some(score),
            best_move: entry.best_move,
        }
    }

    pub fn store(&mut self, entry: TTEntry) {
        self.stats.stores += 1;
        let idx = self.idx(entry.key);
        match self.entries[idx] {
            None => {
                self.entries[idx] = Some(entry);
                self.generations[idx] = self.current_generation;
            }
            Some(existing) => {
                let same_key = existing.key == entry.key;
                let age = self.current_generation.wrapping_sub(self.generations[idx]);
                let stale = age >= Self::AGE_REPLACE_THRESHOLD;

                let replace = if same_key {
                    entry.depth >= existing.depth
                } else {
                    stale
                        || entry.depth.saturating_add(Self::DEPTH_REPLACE_MARGIN) >= existing.depth
                };

                if replace {
                    self.entries[idx] = Some(entry);
                    self.generations[idx] = self.current_generation;
                }
            }
        }
    }
}

/// Mate scores are stored relative to the node, not the root.
#[inline]
pub fn score_to_tt(score: i32, ply: i32) -> i32 {
    if score >= MATE_THRESHOLD {
        score + ply
    } else if score <= -MATE_THRESHOLD {
        score - ply
    } else {
        score
    }
}

#[inline]
pub fn score_from_tt(score: i32, ply: i32) -> i32 {
    if score >= MATE_THRESHOLD {
        score - ply
    } else if score <= -MATE_THRESHOLD {
        score + ply
    } else {
        score
    }
}
