use crate::engine::{Board, Direction};

use super::heuristic::heuristic_score;
use super::{Ply, SearchResult, SearchStats, WIN_VALUE};

/// Single-threaded alpha-beta policy.
///
/// Keeps per-search node statistics; the search itself is stateless, so one
/// policy value can score any number of boards.
#[derive(Debug, Default)]
pub struct AlphaBeta {
    stats: SearchStats,
}

impl AlphaBeta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the recommended direction for `board` searched to `depth`.
    ///
    /// Returns `None` when the position is terminal (or `depth` is zero),
    /// in which case there is no move to recommend.
    ///
    /// Example
    /// ```
    /// use twenty48::engine::Board;
    /// use twenty48::search::AlphaBeta;
    ///
    /// let board = Board::with_seed(4, 2048, 1);
    /// let mut policy = AlphaBeta::new();
    /// assert!(policy.best_move(&board, 2).is_some());
    /// ```
    #[inline]
    pub fn best_move(&mut self, board: &Board, depth: u32) -> Option<Direction> {
        self.search(board, depth).direction
    }

    /// Full search result: chosen direction plus its backed-up value.
    pub fn search(&mut self, board: &Board, depth: u32) -> SearchResult {
        let mut nodes = 0u64;
        let result = alphabeta(board, depth, i64::MIN, i64::MAX, Ply::Player, &mut nodes);
        self.stats.nodes = nodes;
        self.stats.peak_nodes = self.stats.peak_nodes.max(nodes);
        result
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

/// Recommend the best direction for `board` searched to `depth`.
///
/// Convenience wrapper over [`AlphaBeta`] for callers that do not care
/// about node statistics.
pub fn find_best_move(board: &Board, depth: u32) -> Option<Direction> {
    AlphaBeta::new().best_move(board, depth)
}

/// One recursive search over both roles.
///
/// The role tag keeps the player and environment plies inside a single
/// function so they cannot drift apart: every recursive call flips the role
/// and consumes exactly one unit of depth.
pub(super) fn alphabeta(
    board: &Board,
    depth: u32,
    mut alpha: i64,
    mut beta: i64,
    ply: Ply,
    nodes: &mut u64,
) -> SearchResult {
    *nodes += 1;

    if board.is_terminal() {
        let value = if board.has_reached_target() {
            WIN_VALUE
        } else {
            // Lost position: worth its banked score, never more than 1.
            (board.score() as i64).min(1)
        };
        return SearchResult {
            direction: None,
            value,
        };
    }
    if depth == 0 {
        return SearchResult {
            direction: None,
            value: heuristic_score(board),
        };
    }

    match ply {
        Ply::Player => {
            let mut best_direction = None;
            for direction in Direction::ALL {
                let mut child = board.clone();
                let points = child.slide(direction);
                if points == 0 && child.cells() == board.cells() {
                    // not a legal, distinguishable move
                    continue;
                }
                let value =
                    alphabeta(&child, depth - 1, alpha, beta, Ply::Environment, nodes).value;
                if value > alpha {
                    alpha = value;
                    best_direction = Some(direction);
                }
                if beta <= alpha {
                    break; // beta cutoff
                }
            }
            SearchResult {
                direction: best_direction,
                value: alpha,
            }
        }
        Ply::Environment => {
            let empty = board.empty_cells();
            if empty.is_empty() {
                return SearchResult {
                    direction: None,
                    value: 0,
                };
            }
            'cells: for id in empty {
                let row = id / board.size();
                let col = id % board.size();
                for value in [2u32, 4] {
                    let mut child = board.clone();
                    child.set_empty_cell(row, col, value);
                    let score =
                        alphabeta(&child, depth - 1, alpha, beta, Ply::Player, nodes).value;
                    if score < beta {
                        beta = score;
                    }
                    if beta <= alpha {
                        break 'cells; // alpha cutoff
                    }
                }
            }
            SearchResult {
                direction: None,
                value: beta,
            }
        }
    }
}
