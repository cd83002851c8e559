//! Per-search mutable state shared by the main search and quiescence.
//!
//! A `SearchContext` lives for exactly one `iterative_deepening_search` call.
//! It carries the collaborators (move generator, scorer, orderer, optional
//! transposition table), the abort conditions and the running statistics.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::move_generation::move_generator::MoveGenerator;
use crate::search::board_scoring::BoardScorer;
use crate::search::move_ordering::MoveOrderer;
use crate::search::transposition_table::TranspositionTable;

/// Nodes between wall-clock reads.
const TIME_CHECK_INTERVAL: u64 = 256;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub quiescence_nodes: u64,
    pub quiescence_cap_hits: u64,
}

impl SearchStats {
    #[inline]
    pub fn total_nodes(&self) -> u64 {
        self.nodes + self.quiescence_nodes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuiescenceOptions {
    pub enabled: bool,
    /// Hard cap on quiescence depth.
    pub max_plies: u8,
    /// Quiet checking moves are searched only below this quiescence ply.
    pub check_plies: u8,
}

impl Default for QuiescenceOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            max_plies: 8,
            check_plies: 2,
        }
    }
}

pub struct SearchContext<'a> {
    pub generator: &'a dyn MoveGenerator,
    pub scorer: &'a dyn BoardScorer,
    pub orderer: &'a dyn MoveOrderer,
    pub tt: Option<&'a mut TranspositionTable>,
    pub quiescence: QuiescenceOptions,
    pub stats: SearchStats,
    deadline: Option<Instant>,
    stop_flag: Option<Arc<AtomicBool>>,
    max_nodes: Option<u64>,
    aborted: bool,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        generator: &'a dyn MoveGenerator,
        scorer: &'a dyn BoardScorer,
        orderer: &'a dyn MoveOrderer,
    ) -> Self {
        Self {
            generator,
            scorer,
            orderer,
            tt: None,
            quiescence: QuiescenceOptions::default(),
            stats: SearchStats::default(),
            deadline: None,
            stop_flag: None,
            max_nodes: None,
            aborted: false,
        }
    }

    pub fn with_transposition_table(mut self, tt: &'a mut TranspositionTable) -> Self {
        self.tt = Some(tt);
        self
    }

    pub fn with_quiescence(mut self, quiescence: QuiescenceOptions) -> Self {
        self.quiescence = quiescence;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_stop_flag(mut self, stop_flag: Option<Arc<AtomicBool>>) -> Self {
        self.stop_flag = stop_flag;
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: Option<u64>) -> Self {
        self.max_nodes = max_nodes.filter(|n| *n > 0);
        self
    }

    /// True once the deadline passed, the stop flag was raised or the node
    /// budget ran out. Sticky for the rest of the search.
    pub fn should_abort(&mut self) -> bool {
        if self.aborted {
            return true;
        }

        let nodes = self.stats.total_nodes();
        if self.max_nodes.is_some_and(|cap| nodes >= cap) {
            self.aborted = true;
        } else if self
            .stop_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
        {
            self.aborted = true;
        } else if nodes % TIME_CHECK_INTERVAL == 0
            && self.deadline.is_some_and(|limit| Instant::now() >= limit)
        {
            self.aborted = true;
        }

        self.aborted
    }
}
