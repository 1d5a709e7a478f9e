//! Alpha-beta move recommender for 2048.
//!
//! This module provides two policy implementations:
//! - [`AlphaBeta`]: single-threaded alpha-beta search.
//! - [`AlphaBetaParallel`]: rayon-based variant that searches the four root
//!   branches in parallel.
//!
//! Both variants share one recursive search that alternates a maximizing
//! player ply (picking a direction) with a minimizing environment ply
//! (placing a 2 or 4 on an empty cell). The environment is adversarial, not
//! expectation-weighted: it assumes the worst spawn. Each recursive call,
//! player or environment, consumes exactly one unit of depth.
//!
//! Quick start
//! ```
//! use twenty48::engine::Board;
//! use twenty48::search::{find_best_move, AlphaBeta};
//!
//! let board = Board::with_seed(4, 2048, 123);
//! assert!(find_best_move(&board, 3).is_some());
//!
//! let mut policy = AlphaBeta::new();
//! let chosen = policy.best_move(&board, 3);
//! assert_eq!(chosen, find_best_move(&board, 3));
//! ```

use crate::engine::Direction;

mod heuristic;
mod search_par;
mod search_seq;

pub use search_par::AlphaBetaParallel;
pub use search_seq::{find_best_move, AlphaBeta};

/// Backed-up value of a winning position. Nothing outscores a won game.
pub const WIN_VALUE: i64 = i64::MAX;

/// Whose turn a search node models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Ply {
    /// The player chooses a direction and maximizes.
    Player,
    /// The environment places a tile and minimizes.
    Environment,
}

/// Chosen direction and backed-up value of one search.
///
/// `direction` is `None` at environment plies, at depth-0 leaves and when no
/// legal player move exists (the position was already terminal at that ply);
/// callers must not rely on a direction in those cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub direction: Option<Direction>,
    pub value: i64,
}

/// Basic search stats for a single evaluation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchStats {
    /// Nodes visited by the last search.
    pub nodes: u64,
    /// Largest node count seen across searches on this policy.
    pub peak_nodes: u64,
}

/// Bench-only: expose the raw heuristic value for a board.
///
/// Enabled only with the `bench-internal` feature to keep the public API
/// small.
#[cfg(feature = "bench-internal")]
#[inline]
pub fn heuristic_value(board: &crate::engine::Board) -> i64 {
    heuristic::heuristic_score(board)
}
