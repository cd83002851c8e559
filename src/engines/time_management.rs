//! Reusable time-management strategies for engine move budgeting.
//!
//! UCI passes raw clock data (`wtime/btime/winc/binc/movetime`) and the
//! engine decides the final per-move allocation based on strategy. The
//! allocation can then be stretched or shrunk once by the root complexity
//! estimate.

use std::str::FromStr;

use crate::chess_errors::ChessErrors;
use crate::engines::engine_trait::GoParams;
use crate::game_state::chess_types::Color;
use crate::game_state::game_state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeManagementStrategy {
    /// Spend 1/20th of the remaining clock.
    Fraction20,
    /// Clock, increment and game-phase aware allocation.
    Adaptive,
}

impl FromStr for TimeManagementStrategy {
    type Err = ChessErrors;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "adaptive" => Ok(TimeManagementStrategy::Adaptive),
            "fraction20" | "simple" => Ok(TimeManagementStrategy::Fraction20),
            _ => Err(ChessErrors::option("TimeStrategy", value)),
        }
    }
}

/// Milliseconds to spend on this move, or `None` when the search is bounded
/// by depth (or `go infinite`) only. An explicit `movetime` always wins.
pub fn move_budget_ms(
    game_state: &GameState,
    params: &GoParams,
    strategy: TimeManagementStrategy,
) -> Option<u64> {
    if params.infinite {
        return None;
    }
    if let Some(movetime) = params.movetime_ms {
        return Some(movetime.max(1));
    }

    let (remaining, increment) = match game_state.side_to_move {
        Color::Light => (params.wtime_ms, params.winc_ms),
        Color::Dark => (params.btime_ms, params.binc_ms),
    };
    let remaining = remaining?;

    Some(match strategy {
        TimeManagementStrategy::Fraction20 => (remaining / 20).max(1),
        TimeManagementStrategy::Adaptive => {
            adaptive_budget_ms(game_state, remaining, increment, params.movestogo)
        }
    })
}

fn adaptive_budget_ms(
    game_state: &GameState,
    remaining_ms: u64,
    inc_ms: Option<u64>,
    movestogo: Option<u16>,
) -> u64 {
    let ply = game_state.game_ply;
    let expected_moves_left = if let Some(mtg) = movestogo {
        u64::from(mtg.max(1))
    } else if ply < 20 {
        40
    } else if ply < 60 {
        28
    } else {
        18
    };

    let reserve = (remaining_ms / 25)
        .max(100)
        .min(remaining_ms.saturating_sub(1));
    let usable = remaining_ms.saturating_sub(reserve);
    let base = usable / expected_moves_left;
    let inc_bonus = inc_ms.unwrap_or(0).saturating_mul(3) / 4;
    let panic = if remaining_ms < 2_000 {
        remaining_ms / 12
    } else {
        0
    };
    let target = base.saturating_add(inc_bonus).saturating_add(panic);

    let min_budget = if remaining_ms < 1_000 { 5 } else { 15 };
    let max_budget = (remaining_ms / 4).max(1);
    target.max(min_budget).min(max_budget)
}

/// Scale a budget by the root complexity adjustment (-1..=2).
pub fn scale_for_complexity(budget_ms: u64, adjustment: i8) -> u64 {
    let percent: u64 = match adjustment {
        a if a >= 2 => 150,
        1 => 120,
        -1 => 70,
        _ => 100,
    };
    (budget_ms.saturating_mul(percent) / 100).max(1)
}
