//! Board-quality estimate used when the search bottoms out.

use crate::engine::Board;

/// Score a non-terminal board snapshot.
///
/// Combines the real score, a logarithmic bonus per empty cell and a
/// clustering penalty, floored so the estimate never falls below the
/// trivial "stop now" baseline of `min(score, 1)`.
pub(crate) fn heuristic_score(board: &Board) -> i64 {
    combine(
        board.score(),
        board.empty_count(),
        clustering_penalty(board.cells(), board.size()),
    )
}

fn combine(actual_score: u64, empty_count: usize, clustering_penalty: u64) -> i64 {
    let actual = actual_score as f64;
    // ln is undefined at zero; an empty-score board gets no bonus.
    let empty_bonus = if actual_score > 0 {
        actual * actual.ln() * empty_count as f64
    } else {
        0.0
    };
    let estimate = (actual + empty_bonus - clustering_penalty as f64).floor() as i64;
    estimate.max((actual_score as i64).min(1))
}

/// Sum over occupied cells of the mean absolute difference to the occupied
/// 8-neighborhood. High values mean unequal tiles packed together.
fn clustering_penalty(cells: &[u32], size: usize) -> u64 {
    let mut penalty = 0u64;
    for i in 0..size {
        for j in 0..size {
            let value = cells[i * size + j];
            if value == 0 {
                continue;
            }
            let mut neighbors = 0u64;
            let mut sum = 0u64;
            for di in -1i64..=1 {
                let x = i as i64 + di;
                if x < 0 || x >= size as i64 {
                    continue;
                }
                for dj in -1i64..=1 {
                    if di == 0 && dj == 0 {
                        continue;
                    }
                    let y = j as i64 + dj;
                    if y < 0 || y >= size as i64 {
                        continue;
                    }
                    let neighbor = cells[x as usize * size + y as usize];
                    if neighbor > 0 {
                        neighbors += 1;
                        sum += u64::from(value.abs_diff(neighbor));
                    }
                }
            }
            if neighbors > 0 {
                penalty += sum / neighbors;
            }
        }
    }
    penalty
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lone_tile_has_no_penalty() {
        let mut cells = vec![0u32; 16];
        cells[5] = 8;
        assert_eq!(clustering_penalty(&cells, 4), 0);
    }

    #[test]
    fn uniform_neighbors_have_no_penalty() {
        let cells = vec![4u32; 16];
        assert_eq!(clustering_penalty(&cells, 4), 0);
    }

    #[test]
    fn penalty_uses_integer_mean_per_cell() {
        // [2, 4] on one row: each cell has one occupied neighbor at
        // distance 2, so the penalty is 2 + 2.
        let mut cells = vec![0u32; 16];
        cells[0] = 2;
        cells[1] = 4;
        assert_eq!(clustering_penalty(&cells, 4), 4);
    }

    #[test]
    fn zero_score_gets_no_log_bonus() {
        assert_eq!(combine(0, 16, 0), 0);
        assert_eq!(combine(0, 16, 100), 0);
    }

    #[test]
    fn monotone_in_empty_count() {
        for empty in 0..15 {
            assert!(combine(1000, empty + 1, 50) >= combine(1000, empty, 50));
        }
    }

    #[test]
    fn monotone_in_clustering_penalty() {
        for penalty in 0..200u64 {
            assert!(combine(1000, 8, penalty) >= combine(1000, 8, penalty + 1));
        }
    }

    #[test]
    fn never_below_stop_now_baseline() {
        // Huge penalty cannot push the estimate under min(score, 1).
        assert_eq!(combine(500, 0, 1_000_000), 1);
        assert_eq!(combine(0, 0, 1_000_000), 0);
    }

    #[test]
    fn matches_formula_on_a_simple_board() {
        let board = Board::from_parts(
            4,
            2048,
            vec![2, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            100,
        );
        let expected = (100.0 + 100.0 * (100.0f64).ln() * 14.0 - 4.0).floor() as i64;
        assert_eq!(heuristic_score(&board), expected);
    }
}
