//! Explicit engine configuration.
//!
//! Every tunable the engine reads lives here and is passed in at
//! construction; UCI `setoption` edits the engine's own copy.

use std::str::FromStr;

use crate::chess_errors::ChessErrors;
use crate::engines::time_management::TimeManagementStrategy;
use crate::search::eval_heuristics::EvalHeuristic;
use crate::search::search_context::QuiescenceOptions;

/// How the opening book participates in move selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookPolicy {
    Off,
    /// Play the book move without searching.
    Play,
    /// Search normally but try the book move first at the root.
    BiasOrdering,
}

impl FromStr for BookPolicy {
    type Err = ChessErrors;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(BookPolicy::Off),
            "play" => Ok(BookPolicy::Play),
            "bias" | "biasordering" => Ok(BookPolicy::BiasOrdering),
            _ => Err(ChessErrors::option("BookPolicy", value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Nominal depth before the complexity adjustment.
    pub default_depth: u8,
    pub min_depth: u8,
    pub max_depth: u8,
    /// Overrides the nominal depth and disables the complexity adjustment.
    pub fixed_depth: Option<u8>,
    pub hash_mb: usize,
    pub book_policy: BookPolicy,
    /// The book is consulted only while the game ply is below this.
    pub book_max_plies: u16,
    /// The tablebase is consulted only with at most this many pieces.
    pub tablebase_max_pieces: usize,
    pub use_transposition_table: bool,
    pub quiescence: QuiescenceOptions,
    pub heuristics: Vec<EvalHeuristic>,
    pub use_mobility: bool,
    pub time_strategy: TimeManagementStrategy,
    /// Let the root complexity estimate move depth and time budgets.
    pub adapt_to_complexity: bool,
    /// Seed for book and tablebase choices; `None` draws from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_depth: 5,
            min_depth: 1,
            max_depth: 12,
            fixed_depth: None,
            hash_mb: 16,
            book_policy: BookPolicy::Play,
            book_max_plies: 20,
            tablebase_max_pieces: 6,
            use_transposition_table: true,
            quiescence: QuiescenceOptions::default(),
            heuristics: EvalHeuristic::ALL.to_vec(),
            use_mobility: true,
            time_strategy: TimeManagementStrategy::Adaptive,
            adapt_to_complexity: true,
            rng_seed: None,
        }
    }
}

impl EngineConfig {
    pub fn with_default_depth(mut self, depth: u8) -> Self {
        self.default_depth = depth.max(1);
        self
    }

    pub fn with_depth_bounds(mut self, min_depth: u8, max_depth: u8) -> Self {
        self.min_depth = min_depth.max(1);
        self.max_depth = max_depth.max(self.min_depth);
        self
    }

    pub fn with_fixed_depth(mut self, depth: Option<u8>) -> Self {
        self.fixed_depth = depth.filter(|d| *d > 0);
        self
    }

    pub fn with_hash_mb(mut self, hash_mb: usize) -> Self {
        self.hash_mb = hash_mb.max(1);
        self
    }

    pub fn with_book_policy(mut self, policy: BookPolicy) -> Self {
        self.book_policy = policy;
        self
    }

    pub fn with_transposition_table(mut self, enabled: bool) -> Self {
        self.use_transposition_table = enabled;
        self
    }

    pub fn with_quiescence(mut self, quiescence: QuiescenceOptions) -> Self {
        self.quiescence = quiescence;
        self
    }

    pub fn with_heuristics(mut self, heuristics: Vec<EvalHeuristic>) -> Self {
        self.heuristics = heuristics;
        self
    }

    pub fn with_time_strategy(mut self, strategy: TimeManagementStrategy) -> Self {
        self.time_strategy = strategy;
        self
    }

    pub fn with_complexity_adaptation(mut self, enabled: bool) -> Self {
        self.adapt_to_complexity = enabled;
        self
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{BookPolicy, EngineConfig};

    #[test]
    fn builders_keep_bounds_sane() {
        let config = EngineConfig::default()
            .with_depth_bounds(0, 0)
            .with_fixed_depth(Some(0))
            .with_hash_mb(0);
        assert_eq!(config.min_depth, 1);
        assert_eq!(config.max_depth, 1);
        assert_eq!(config.fixed_depth, None);
        assert_eq!(config.hash_mb, 1);
    }

    #[test]
    fn book_policy_parses_option_values() {
        assert_eq!("Play".parse::<BookPolicy>(), Ok(BookPolicy::Play));
        assert_eq!("bias".parse::<BookPolicy>(), Ok(BookPolicy::BiasOrdering));
        assert_eq!(" off ".parse::<BookPolicy>(), Ok(BookPolicy::Off));
        assert!("sometimes".parse::<BookPolicy>().is_err());
    }
}
