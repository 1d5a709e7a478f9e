use std::io::{self, BufRead};

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use twenty48::engine::{Board, Direction, Outcome};
use twenty48::search::{AlphaBeta, AlphaBetaParallel};

#[derive(Parser)]
#[command(name = "twenty48", about = "2048 with an alpha-beta move recommender")]
struct Args {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Play interactively with a solver hint each turn
    Play {
        #[arg(long, default_value_t = 7)]
        depth: u32,
        #[arg(long, default_value_t = 4)]
        size: usize,
        #[arg(long, default_value_t = 2048)]
        target: u32,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Let the solver play one game to completion
    Auto {
        #[arg(long, default_value_t = 7)]
        depth: u32,
        #[arg(long, default_value_t = 4)]
        size: usize,
        #[arg(long, default_value_t = 2048)]
        target: u32,
        #[arg(long)]
        seed: Option<u64>,
        /// Only print the final summary
        #[arg(long)]
        quiet: bool,
    },
    /// Estimate the solver's win rate over many games
    Accuracy {
        #[arg(long, default_value_t = 10)]
        games: u32,
        #[arg(long, default_value_t = 7)]
        depth: u32,
        #[arg(long, default_value_t = 4)]
        size: usize,
        #[arg(long, default_value_t = 2048)]
        target: u32,
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() {
    match Args::parse().cmd {
        Cmd::Play {
            depth,
            size,
            target,
            seed,
        } => play(depth, size, target, seed),
        Cmd::Auto {
            depth,
            size,
            target,
            seed,
            quiet,
        } => auto(depth, size, target, seed, quiet),
        Cmd::Accuracy {
            games,
            depth,
            size,
            target,
            seed,
        } => accuracy(games, depth, size, target, seed),
    }
}

fn new_board(size: usize, target: u32, seed: Option<u64>) -> Board {
    match seed {
        Some(seed) => Board::with_seed(size, target, seed),
        None => Board::new(size, target),
    }
}

fn print_position(board: &Board, hint: Option<Direction>) {
    println!("-------------------------");
    print!("{board}");
    match hint {
        Some(direction) => println!("Hint: {direction}"),
        None => println!("Hint: none"),
    }
    println!("-------------------------");
}

fn play(depth: u32, size: usize, target: u32, seed: Option<u64>) {
    println!("Play the {target} game!");
    println!(
        "Use 8 for Up, 6 for Right, 2 for Down and 4 for Left (or type the \
         direction name). Type a to follow the hint and q to quit."
    );

    let mut board = new_board(size, target, seed);
    let mut policy = AlphaBetaParallel::new();
    let mut hint = policy.best_move(&board, depth);
    print_position(&board, hint);

    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("input error: {e}");
                return;
            }
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let direction = match input {
            "8" => Some(Direction::Up),
            "6" => Some(Direction::Right),
            "2" => Some(Direction::Down),
            "4" => Some(Direction::Left),
            "a" | "A" => hint,
            "q" | "Q" => {
                println!("Game ended, user quit.");
                return;
            }
            other => other.parse::<Direction>().ok(),
        };
        let Some(direction) = direction else {
            println!(
                "Invalid key! Use 8/6/2/4 or a direction name; a follows the \
                 hint, q quits."
            );
            continue;
        };

        let outcome = board.step(direction);
        hint = if outcome == Outcome::Continue || outcome == Outcome::InvalidMove {
            policy.best_move(&board, depth)
        } else {
            None
        };
        print_position(&board, hint);
        if outcome != Outcome::Continue {
            println!("{outcome}");
        }
        if outcome == Outcome::Win || outcome == Outcome::NoMoreMoves {
            return;
        }
    }
}

fn auto(depth: u32, size: usize, target: u32, seed: Option<u64>, quiet: bool) {
    let mut board = new_board(size, target, seed);
    let mut policy = AlphaBetaParallel::new();
    if !quiet {
        println!("{board}");
    }

    let mut moves = 0u64;
    let mut total_nodes = 0u64;
    let mut peak_nodes = 0u64;
    while !board.is_terminal() {
        let Some(direction) = policy.best_move(&board, depth) else {
            break;
        };
        board.step(direction);
        moves += 1;
        let stats = policy.last_stats();
        total_nodes = total_nodes.saturating_add(stats.nodes);
        peak_nodes = peak_nodes.max(stats.nodes);
        if !quiet {
            println!("{board}");
        }
    }

    println!(
        "Moves made: {moves}, nodes searched: {total_nodes}, peak nodes for a move: {peak_nodes}"
    );
    if board.has_reached_target() {
        println!("Reached {}. Final score: {}", board.target(), board.score());
    } else {
        println!("No more moves. Final score: {}", board.score());
    }
}

fn accuracy(games: u32, depth: u32, size: usize, target: u32, seed: Option<u64>) {
    println!("Running {games} games at depth {depth} to estimate the win rate:");
    let pb = ProgressBar::new(u64::from(games));
    pb.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} | {elapsed_precise}")
            .expect("progress bar template"),
    );

    let wins = (0..games)
        .into_par_iter()
        .map(|game| {
            let game_seed = seed.map(|s| s.wrapping_add(u64::from(game)));
            let won = play_to_completion(size, target, game_seed, depth);
            pb.inc(1);
            won
        })
        .filter(|&won| won)
        .count();
    pb.finish();

    println!("{wins} wins out of {games} games.");
}

fn play_to_completion(size: usize, target: u32, seed: Option<u64>, depth: u32) -> bool {
    let mut board = new_board(size, target, seed);
    let mut policy = AlphaBeta::new();
    loop {
        let Some(direction) = policy.best_move(&board, depth) else {
            return board.has_reached_target();
        };
        match board.step(direction) {
            Outcome::Continue | Outcome::InvalidMove => {}
            Outcome::Win => return true,
            Outcome::NoMoreMoves => return false,
        }
    }
}
