use clap::Parser;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use watersort_solver::engine::Board;
use watersort_solver::error::SolveError;
use watersort_solver::logging::init_tracing;
use watersort_solver::solver::Algorithm;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Number of random boards to evaluate
    #[clap(short, long, default_value_t = 20)]
    boards: usize,

    /// Seed of the first board; the following boards use consecutive seeds
    #[clap(short, long, default_value_t = 0)]
    start_seed: u64,

    /// Number of colors per board (1 to 26)
    #[clap(short, long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..=26))]
    colors: u8,

    /// Number of empty vessels per board
    #[clap(short, long, default_value_t = 2)]
    empty: usize,

    /// Per-search time limit in seconds
    #[clap(short, long, default_value_t = 30)]
    timeout: u64,

    /// Log search progress to stderr
    #[clap(short, long)]
    verbose: bool,
}

#[derive(Debug, Default)]
struct Totals {
    solved: usize,
    unsolvable: usize,
    cancelled: usize,
    failed: usize,
    steps: usize,
    expansions: usize,
    elapsed: Duration,
}

/// Runs one search, raising its stop flag once `limit` has passed.
fn run_with_timeout(
    algorithm: Algorithm,
    board: &Board,
    limit: Duration,
) -> (Result<usize, SolveError>, usize, Duration) {
    let stop_flag = Arc::new(AtomicBool::new(false));
    let (done_tx, done_rx) = mpsc::channel::<()>();
    let watchdog = {
        let stop_flag = stop_flag.clone();
        thread::spawn(move || {
            if let Err(RecvTimeoutError::Timeout) = done_rx.recv_timeout(limit) {
                stop_flag.store(true, Ordering::Relaxed);
            }
        })
    };

    let mut solver = algorithm.build_with_stop_flag(stop_flag);
    let started = Instant::now();
    let result = solver.solve(board).map(|moves| moves.len());
    let elapsed = started.elapsed();
    drop(done_tx);
    let _ = watchdog.join();
    (result, solver.stats().expansions, elapsed)
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);
    let limit = Duration::from_secs(args.timeout);

    let mut totals: HashMap<Algorithm, Totals> = HashMap::new();
    let mut disagreements = 0;

    println!(
        "Starting solver evaluation for {} boards ({} colors, {} empty vessels)...",
        args.boards, args.colors, args.empty
    );

    for board_idx in 0..args.boards {
        let seed = args.start_seed + board_idx as u64;
        let board = Board::new_random_with_seed(usize::from(args.colors), args.empty, seed);
        println!("\nEvaluating Board {} (Seed: {}): {}", board_idx, seed, board);

        let mut lengths = Vec::new();
        for algorithm in Algorithm::ALL {
            let (result, expansions, elapsed) = run_with_timeout(algorithm, &board, limit);
            let entry = totals.entry(algorithm).or_default();
            entry.expansions += expansions;
            entry.elapsed += elapsed;

            let outcome = match result {
                Ok(steps) => {
                    entry.solved += 1;
                    entry.steps += steps;
                    lengths.push(steps);
                    format!("{} steps", steps)
                }
                Err(SolveError::NoSolution) => {
                    entry.unsolvable += 1;
                    "no solution".to_string()
                }
                Err(SolveError::Cancelled { .. }) => {
                    entry.cancelled += 1;
                    "timed out".to_string()
                }
                Err(e) => {
                    entry.failed += 1;
                    eprintln!("Error: {} on board {} (Seed: {}): {}", algorithm, board_idx, seed, e);
                    "error".to_string()
                }
            };
            println!(
                "  Algorithm: {:<10} Result: {:<12} Expansions: {:<10} Time: {:.2?}",
                algorithm.to_string(),
                outcome,
                expansions,
                elapsed
            );
        }

        if lengths.windows(2).any(|w| w[0] != w[1]) {
            disagreements += 1;
            println!("  Solution lengths differ: {:?}", lengths);
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("Number of boards evaluated: {}", args.boards);
    println!("Boards with differing solution lengths: {}", disagreements);
    println!("\n--- Totals ---");
    for algorithm in Algorithm::ALL {
        let Some(t) = totals.get(&algorithm) else {
            continue;
        };
        let avg_steps = if t.solved == 0 {
            0.0
        } else {
            t.steps as f64 / t.solved as f64
        };
        println!(
            "{:<10}: solved {:<4} unsolvable {:<4} timed out {:<4} errors {:<4} avg steps {:<6.2} expansions {:<10} time {:.2?}",
            algorithm.to_string(),
            t.solved,
            t.unsolvable,
            t.cancelled,
            t.failed,
            avg_steps,
            t.expansions,
            t.elapsed
        );
    }
}
