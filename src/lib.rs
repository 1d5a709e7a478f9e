//! twenty48: a 2048 game engine + alpha-beta move recommender
//!
//! This crate provides:
//! - A parameterized `Board` type (`engine` module) with exact slide/merge,
//!   spawn and terminal-detection rules
//! - An adversarial move recommender (`search` module) with single-threaded
//!   and root-parallel variants
//!
//! Quick start:
//! ```
//! use twenty48::engine::{Board, Direction};
//! use twenty48::search::find_best_move;
//!
//! // Deterministic board initialization with a seeded RNG
//! let mut board = Board::with_seed(4, 2048, 42);
//! if let Some(direction) = find_best_move(&board, 3) {
//!     board.step(direction);
//! }
//! assert!(board.score() < 100);
//! ```
//!
//! The search treats tile spawns adversarially (the environment minimizes),
//! so its recommendations are deterministic for a given board and depth;
//! randomness only enters through `Board::step`/`Board::spawn_random_tile`.

pub mod engine;
pub mod search;
