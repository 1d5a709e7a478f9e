use rayon::prelude::*;

use crate::engine::{Board, Direction};

use super::search_seq::alphabeta;
use super::{Ply, SearchResult, SearchStats, WIN_VALUE};

/// Root-parallel alpha-beta policy.
///
/// Searches the four root branches on the rayon pool, each with a full
/// window, then keeps the earliest strict maximum in enumeration order.
/// Every branch owns its clone, so no state is shared across threads, and
/// the result is identical to [`super::AlphaBeta`]: the root value of an
/// alpha-beta search is exact, and a sibling pruned under a narrowed window
/// can never beat the running maximum.
#[derive(Debug, Default)]
pub struct AlphaBetaParallel {
    stats: SearchStats,
}

impl AlphaBetaParallel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the recommended direction for `board` searched to `depth`.
    #[inline]
    pub fn best_move(&mut self, board: &Board, depth: u32) -> Option<Direction> {
        self.search(board, depth).direction
    }

    /// Full search result: chosen direction plus its backed-up value.
    pub fn search(&mut self, board: &Board, depth: u32) -> SearchResult {
        if board.is_terminal() {
            self.stats.nodes = 1;
            self.stats.peak_nodes = self.stats.peak_nodes.max(1);
            let value = if board.has_reached_target() {
                WIN_VALUE
            } else {
                (board.score() as i64).min(1)
            };
            return SearchResult {
                direction: None,
                value,
            };
        }
        if depth == 0 {
            // Delegate the leaf to the sequential search; nothing to split.
            let mut nodes = 0u64;
            let result = alphabeta(board, 0, i64::MIN, i64::MAX, Ply::Player, &mut nodes);
            self.stats.nodes = nodes;
            self.stats.peak_nodes = self.stats.peak_nodes.max(nodes);
            return result;
        }

        let branches: Vec<(Option<i64>, u64)> = Direction::ALL
            .par_iter()
            .map(|&direction| {
                let mut child = board.clone();
                let points = child.slide(direction);
                if points == 0 && child.cells() == board.cells() {
                    return (None, 0);
                }
                let mut nodes = 0u64;
                let value = alphabeta(
                    &child,
                    depth - 1,
                    i64::MIN,
                    i64::MAX,
                    Ply::Environment,
                    &mut nodes,
                )
                .value;
                (Some(value), nodes)
            })
            .collect();

        let mut alpha = i64::MIN;
        let mut best_direction = None;
        let mut nodes = 1u64;
        for (direction, (value, branch_nodes)) in Direction::ALL.iter().zip(&branches) {
            nodes += branch_nodes;
            if let Some(value) = *value {
                if value > alpha {
                    alpha = value;
                    best_direction = Some(*direction);
                }
            }
        }
        self.stats.nodes = nodes;
        self.stats.peak_nodes = self.stats.peak_nodes.max(nodes);
        SearchResult {
            direction: best_direction,
            value: alpha,
        }
    }

    /// Statistics collected from the last call to [`Self::best_move`] or
    /// [`Self::search`].
    #[inline]
    pub fn last_stats(&self) -> SearchStats {
        self.stats
    }

    /// Reset accumulated stats to zero.
    #[inline]
    pub fn reset_stats(&mut self) {
        self.stats = SearchStats::default();
    }
}
