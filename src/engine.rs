use std::fmt;
use std::str::FromStr;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A direction to slide/merge tiles.
///
/// The variant order is load-bearing: the search visits directions in this
/// order and breaks ties toward the earliest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All directions, in enumeration order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "Up",
            Direction::Right => "Right",
            Direction::Down => "Down",
            Direction::Left => "Left",
        };
        write!(f, "{name}")
    }
}

/// Error returned when a string does not name a [`Direction`].
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unrecognized direction: {0:?}")]
pub struct ParseDirectionError(String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "right" => Ok(Direction::Right),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// Result of one full turn ([`Board::step`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The turn changed the board and the game goes on.
    Continue,
    /// The merges of this turn reached the target value.
    Win,
    /// No direction can change the board any more.
    NoMoreMoves,
    /// The chosen direction changed nothing and no tile spawned.
    InvalidMove,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            Outcome::Continue => "Game continues",
            Outcome::Win => "You won!",
            Outcome::NoMoreMoves => "No more moves, game over",
            Outcome::InvalidMove => "Invalid move",
        };
        write!(f, "{description}")
    }
}

/// An N×N 2048 board: grid, running score and spawn RNG.
///
/// Cells hold the tile value directly (0 = empty, otherwise a power of two
/// ≥ 2), stored row-major. Every mutation happens in place; the search works
/// on clones, so a clone must never share state with its parent (the derived
/// `Clone` deep-copies the grid and forks the RNG).
///
/// Example
/// ```
/// use twenty48::engine::{Board, Direction};
///
/// let mut board = Board::with_seed(4, 2048, 42);
/// assert_eq!(board.empty_count(), 14);
/// board.step(Direction::Left);
/// assert_eq!(board.empty_count(), board.empty_cells().len());
/// ```
#[derive(Clone)]
pub struct Board {
    size: usize,
    target: u32,
    min_win_score: u64,
    cells: Vec<u32>,
    score: u64,
    empty: usize,
    rng: SmallRng,
}

impl Board {
    /// Create a fresh board with two random tiles, seeded from entropy.
    ///
    /// Panics if `size` is zero or `target` is not a power of two ≥ 8.
    pub fn new(size: usize, target: u32) -> Self {
        Self::from_rng(size, target, SmallRng::from_entropy())
    }

    /// Create a fresh board with a deterministic spawn sequence.
    ///
    /// ```
    /// use twenty48::engine::Board;
    /// let a = Board::with_seed(4, 2048, 7);
    /// let b = Board::with_seed(4, 2048, 7);
    /// assert_eq!(a.grid(), b.grid());
    /// ```
    pub fn with_seed(size: usize, target: u32, seed: u64) -> Self {
        Self::from_rng(size, target, SmallRng::seed_from_u64(seed))
    }

    fn from_rng(size: usize, target: u32, rng: SmallRng) -> Self {
        assert!(size > 0, "grid size must be positive");
        assert!(
            target >= 8 && target.is_power_of_two(),
            "target must be a power of two >= 8"
        );
        // Cheapest lineage builds the target entirely from spawned 4s:
        // target * (log2(target) - 2). 18432 for the classic 2048 target.
        let min_win_score = u64::from(target) * u64::from(target.trailing_zeros() - 2);
        let mut board = Board {
            size,
            target,
            min_win_score,
            cells: vec![0; size * size],
            score: 0,
            empty: size * size,
            rng,
        };
        board.spawn_random_tile();
        board.spawn_random_tile();
        board
    }

    /// Grid side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Tile value the game is played toward.
    pub fn target(&self) -> u32 {
        self.target
    }

    /// Cumulative score of this lineage of moves.
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Snapshot of the grid, row-major. Always a copy, never an alias.
    pub fn grid(&self) -> Vec<u32> {
        self.cells.clone()
    }

    /// Value at `(row, col)`; 0 means empty.
    pub fn cell(&self, row: usize, col: usize) -> u32 {
        self.cells[row * self.size + col]
    }

    pub(crate) fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// Number of empty cells, maintained incrementally.
    pub fn empty_count(&self) -> usize {
        self.empty
    }

    /// Ids of the empty cells, row-major (`row * size + col`).
    pub fn empty_cells(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 0)
            .map(|(id, _)| id)
            .collect()
    }

    /// Slide and merge tiles toward `direction`, returning the points
    /// awarded by this call. Zero points with an unchanged grid means the
    /// direction was a no-op.
    ///
    /// The grid is rotated so the move becomes a leftward compaction, each
    /// row is compacted toward column 0, then the rotation is undone. A
    /// per-row `last_merge` marker keeps a freshly merged cell from merging
    /// again within the same call.
    pub fn slide(&mut self, direction: Direction) -> u64 {
        match direction {
            Direction::Up => self.rotate_left(),
            Direction::Right => {
                self.rotate_left();
                self.rotate_left();
            }
            Direction::Down => self.rotate_right(),
            Direction::Left => {}
        }

        let n = self.size;
        let mut points = 0u64;
        for i in 0..n {
            let row = i * n;
            let mut last_merge = 0usize;
            for j in 1..n {
                if self.cells[row + j] == 0 {
                    continue;
                }
                let mut prev = j - 1;
                while prev > last_merge && self.cells[row + prev] == 0 {
                    prev -= 1;
                }
                if self.cells[row + prev] == 0 {
                    // slide into the empty slot
                    self.cells[row + prev] = self.cells[row + j];
                    self.cells[row + j] = 0;
                } else if self.cells[row + prev] == self.cells[row + j] {
                    let merged = self.cells[row + prev] * 2;
                    self.cells[row + prev] = merged;
                    self.cells[row + j] = 0;
                    points += u64::from(merged);
                    last_merge = prev + 1;
                    self.empty += 1;
                } else if prev + 1 != j {
                    // blocked by a different value; pack behind it
                    self.cells[row + prev + 1] = self.cells[row + j];
                    self.cells[row + j] = 0;
                }
            }
        }
        self.score += points;

        match direction {
            Direction::Up => self.rotate_right(),
            Direction::Right => {
                self.rotate_right();
                self.rotate_right();
            }
            Direction::Down => self.rotate_left(),
            Direction::Left => {}
        }
        points
    }

    /// Place a 2 (90%) or 4 (10%) on a uniformly chosen empty cell.
    ///
    /// Returns false on a full grid; never an error.
    pub fn spawn_random_tile(&mut self) -> bool {
        let empty = self.empty_cells();
        if empty.is_empty() {
            return false;
        }
        let id = empty[self.rng.gen_range(0..empty.len())];
        let value = if self.rng.gen::<f64>() < 0.9 { 2 } else { 4 };
        self.set_empty_cell(id / self.size, id % self.size, value);
        true
    }

    /// Write a tile into an empty cell.
    ///
    /// Panics if the cell is occupied; overwriting a tile is a contract
    /// violation, not a recoverable condition.
    pub fn set_empty_cell(&mut self, row: usize, col: usize, value: u32) {
        let id = row * self.size + col;
        assert!(
            self.cells[id] == 0,
            "cell ({row}, {col}) is already occupied"
        );
        debug_assert!(value >= 2 && value.is_power_of_two());
        self.cells[id] = value;
        self.empty -= 1;
    }

    /// True if some cell has reached the target value.
    ///
    /// Rejects cheaply on the score first: no lineage can hold the target
    /// tile before its score passes `min_win_score`.
    pub fn has_reached_target(&self) -> bool {
        if self.score < self.min_win_score {
            return false;
        }
        self.cells.iter().any(|&v| v >= self.target)
    }

    /// True if the target is reached or no direction can change the board.
    pub fn is_terminal(&self) -> bool {
        if self.has_reached_target() {
            return true;
        }
        if self.empty != 0 {
            return false;
        }
        Direction::ALL.iter().all(|&direction| {
            let mut probe = self.clone();
            probe.slide(direction) == 0 && probe.cells == self.cells
        })
    }

    /// Perform one full turn: slide, then spawn a tile if the grid changed.
    pub fn step(&mut self, direction: Direction) -> Outcome {
        let before = self.cells.clone();
        let points = self.slide(direction);
        let changed = self.cells != before;
        let spawned = if changed { self.spawn_random_tile() } else { false };

        if !changed && !spawned {
            if self.is_terminal() {
                Outcome::NoMoreMoves
            } else {
                Outcome::InvalidMove
            }
        } else if points >= u64::from(self.target) {
            Outcome::Win
        } else if self.is_terminal() {
            Outcome::NoMoreMoves
        } else {
            Outcome::Continue
        }
    }

    fn rotate_left(&mut self) {
        let n = self.size;
        let mut rotated = vec![0u32; n * n];
        for i in 0..n {
            for j in 0..n {
                rotated[(n - 1 - j) * n + i] = self.cells[i * n + j];
            }
        }
        self.cells = rotated;
    }

    fn rotate_right(&mut self) {
        let n = self.size;
        let mut rotated = vec![0u32; n * n];
        for i in 0..n {
            for j in 0..n {
                rotated[i * n + j] = self.cells[(n - 1 - j) * n + i];
            }
        }
        self.cells = rotated;
    }

    /// Test fixture: a board with a prescribed grid and score.
    #[cfg(test)]
    pub(crate) fn from_parts(size: usize, target: u32, cells: Vec<u32>, score: u64) -> Self {
        assert_eq!(cells.len(), size * size);
        let mut board = Self::from_rng(size, target, SmallRng::seed_from_u64(0));
        board.empty = cells.iter().filter(|&&v| v == 0).count();
        board.cells = cells;
        board.score = score;
        board
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Board {{ size: {}, score: {}, empty: {} }}",
            self.size, self.score, self.empty
        )
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Score: {}", self.score)?;
        for i in 0..self.size {
            for j in 0..self.size {
                let v = self.cells[i * self.size + j];
                if v == 0 {
                    write!(f, "{:>6}", ".")?;
                } else {
                    write!(f, "{v:>6}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_4(cells: [u32; 16]) -> Board {
        Board::from_parts(4, 2048, cells.to_vec(), 0)
    }

    #[test]
    fn rotations_are_inverses() {
        let reference = board_4([2, 4, 8, 16, 0, 2, 0, 4, 32, 0, 0, 0, 2, 2, 4, 4]);
        let mut board = reference.clone();
        board.rotate_left();
        board.rotate_right();
        assert_eq!(board.grid(), reference.grid());
        board.rotate_right();
        board.rotate_left();
        assert_eq!(board.grid(), reference.grid());

        let reference = Board::from_parts(3, 2048, vec![2, 0, 4, 0, 8, 0, 16, 0, 32], 0);
        let mut board = reference.clone();
        board.rotate_left();
        board.rotate_right();
        assert_eq!(board.grid(), reference.grid());
    }

    #[test]
    fn rotate_left_turns_rows_into_columns() {
        let mut board = board_4([2, 4, 8, 16, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        board.rotate_left();
        assert_eq!(
            board.grid(),
            vec![16, 0, 0, 0, 8, 0, 0, 0, 4, 0, 0, 0, 2, 0, 0, 0]
        );
    }

    #[test]
    fn merge_awards_points_once() {
        // [2,2,4,0] toward the 2,2 side: the new 4 must not merge with the
        // pre-existing 4.
        let mut board = board_4([2, 2, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let points = board.slide(Direction::Left);
        assert_eq!(points, 4);
        assert_eq!(&board.grid()[..4], &[4, 4, 0, 0]);
        assert_eq!(board.score(), 4);
    }

    #[test]
    fn no_double_merge_in_one_slide() {
        let mut board = board_4([2, 2, 2, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(board.slide(Direction::Left), 8);
        assert_eq!(&board.grid()[..4], &[4, 4, 0, 0]);

        let mut board = board_4([4, 2, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(board.slide(Direction::Left), 4);
        assert_eq!(&board.grid()[..4], &[4, 4, 0, 0]);
    }

    #[test]
    fn slide_right_and_vertical() {
        let mut board = board_4([2, 2, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(board.slide(Direction::Right), 4);
        assert_eq!(&board.grid()[..4], &[0, 0, 4, 4]);

        let mut board = board_4([2, 0, 0, 0, 2, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(board.slide(Direction::Up), 4);
        assert_eq!(board.cell(0, 0), 4);
        assert_eq!(board.cell(1, 0), 4);
        assert_eq!(board.cell(2, 0), 0);

        let mut board = board_4([2, 0, 0, 0, 2, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(board.slide(Direction::Down), 4);
        assert_eq!(board.cell(3, 0), 4);
        assert_eq!(board.cell(2, 0), 4);
        assert_eq!(board.cell(0, 0), 0);
    }

    #[test]
    fn wider_grid_slides() {
        let mut cells = vec![0u32; 25];
        cells[..5].copy_from_slice(&[2, 2, 4, 4, 8]);
        let mut board = Board::from_parts(5, 2048, cells, 0);
        assert_eq!(board.slide(Direction::Left), 12);
        assert_eq!(&board.grid()[..5], &[4, 8, 8, 0, 0]);
    }

    #[test]
    fn noop_direction_stays_noop() {
        let mut board = board_4([2, 0, 0, 0, 4, 0, 0, 0, 8, 0, 0, 0, 16, 0, 0, 0]);
        let snapshot = board.grid();
        assert_eq!(board.slide(Direction::Left), 0);
        assert_eq!(board.grid(), snapshot);
        assert_eq!(board.slide(Direction::Left), 0);
        assert_eq!(board.grid(), snapshot);
    }

    #[test]
    fn values_stay_powers_of_two() {
        let mut board = Board::with_seed(4, 2048, 99);
        let mut previous_score = board.score();
        for turn in 0..200 {
            let direction = Direction::ALL[turn % 4];
            let outcome = board.step(direction);
            assert!(board
                .grid()
                .iter()
                .all(|&v| v == 0 || (v >= 2 && v.is_power_of_two())));
            assert!(board.score() >= previous_score);
            assert_eq!(board.empty_count(), board.empty_cells().len());
            previous_score = board.score();
            if outcome == Outcome::NoMoreMoves || outcome == Outcome::Win {
                break;
            }
        }
    }

    #[test]
    fn empty_count_tracks_fills() {
        let mut board = board_4([0; 16]);
        assert_eq!(board.empty_count(), 16);
        board.set_empty_cell(1, 2, 2);
        assert_eq!(board.empty_count(), 15);
        assert!(board.spawn_random_tile());
        assert_eq!(board.empty_count(), 14);
        assert_eq!(board.empty_count(), board.empty_cells().len());
    }

    #[test]
    fn empty_cell_ids_are_row_major() {
        let board = board_4([2, 0, 2, 0, 0, 2, 2, 2, 2, 2, 2, 0, 2, 2, 2, 2]);
        assert_eq!(board.empty_cells(), vec![1, 3, 4, 11]);
    }

    #[test]
    fn spawn_on_full_grid_is_noop() {
        let mut board = board_4([2, 4, 2, 4, 4, 2, 4, 2, 2, 4, 2, 4, 4, 2, 4, 2]);
        assert!(!board.spawn_random_tile());
        assert_eq!(board.empty_count(), 0);
    }

    #[test]
    #[should_panic(expected = "already occupied")]
    fn writing_occupied_cell_panics() {
        let mut board = board_4([2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        board.set_empty_cell(0, 0, 4);
    }

    #[test]
    #[should_panic(expected = "grid size must be positive")]
    fn zero_size_panics() {
        let _ = Board::new(0, 2048);
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn bad_target_panics() {
        let _ = Board::new(4, 100);
    }

    #[test]
    fn terminal_detection_on_full_grids() {
        // Checkerboard: full, no adjacent equal pair anywhere.
        let stuck = board_4([2, 4, 2, 4, 4, 2, 4, 2, 2, 4, 2, 4, 4, 2, 4, 2]);
        assert!(stuck.is_terminal());

        // One horizontal pair keeps the game alive.
        let alive = board_4([2, 2, 4, 8, 4, 8, 16, 2, 2, 4, 8, 16, 4, 8, 16, 2]);
        assert!(!alive.is_terminal());

        // Any empty cell keeps the game alive.
        let open = board_4([0, 4, 2, 4, 4, 2, 4, 2, 2, 4, 2, 4, 4, 2, 4, 2]);
        assert!(!open.is_terminal());
    }

    #[test]
    fn target_check_rejects_on_low_score() {
        let cells = [2048, 2, 4, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        let low = Board::from_parts(4, 2048, cells.to_vec(), 0);
        assert!(!low.has_reached_target());
        let high = Board::from_parts(4, 2048, cells.to_vec(), 18_432);
        assert!(high.has_reached_target());
        assert!(high.is_terminal());
    }

    #[test]
    fn step_outcomes() {
        // No-op direction with empty cells: nothing changes, nothing spawns.
        let mut board = board_4([2, 0, 0, 0, 4, 0, 0, 0, 8, 0, 0, 0, 16, 0, 0, 0]);
        assert_eq!(board.step(Direction::Left), Outcome::InvalidMove);
        assert_eq!(board.empty_count(), 12);

        // Stuck full board: every direction reports the end of the game.
        let mut stuck = board_4([2, 4, 2, 4, 4, 2, 4, 2, 2, 4, 2, 4, 4, 2, 4, 2]);
        assert_eq!(stuck.step(Direction::Up), Outcome::NoMoreMoves);

        // A merge worth the target wins the turn.
        let mut winning = board_4([1024, 1024, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(winning.step(Direction::Left), Outcome::Win);

        let mut ongoing = board_4([2, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(ongoing.step(Direction::Left), Outcome::Continue);
    }

    #[test]
    fn grid_snapshot_is_detached() {
        let mut board = board_4([2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let snapshot = board.grid();
        board.set_empty_cell(0, 1, 4);
        assert_eq!(snapshot[1], 0);
        assert_eq!(board.cell(0, 1), 4);
    }

    #[test]
    fn direction_parsing() {
        assert_eq!("up".parse::<Direction>(), Ok(Direction::Up));
        assert_eq!("LEFT".parse::<Direction>(), Ok(Direction::Left));
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn seeded_boards_are_reproducible() {
        let mut a = Board::with_seed(4, 2048, 5);
        let mut b = Board::with_seed(4, 2048, 5);
        for direction in [Direction::Left, Direction::Up, Direction::Right] {
            a.step(direction);
            b.step(direction);
            assert_eq!(a.grid(), b.grid());
            assert_eq!(a.score(), b.score());
        }
    }
}
