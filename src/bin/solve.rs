use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use watersort_solver::engine::Board;
use watersort_solver::logging::init_tracing;
use watersort_solver::solver::Algorithm;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Search strategy: astar, dijkstra or idastar
    #[clap(short, long, default_value = "astar")]
    algorithm: Algorithm,

    /// Board notation, vessels bottom to top separated by ';' (e.g. "FOFO;OFOF;")
    #[clap(conflicts_with = "file", required_unless_present = "file")]
    board: Option<String>,

    /// Path to a file holding the board notation
    #[clap(short, long)]
    file: Option<PathBuf>,

    /// Print every intermediate board
    #[clap(short, long)]
    show_boards: bool,

    /// Log search progress to stderr
    #[clap(short, long)]
    verbose: bool,
}

fn read_board(args: &Args) -> Result<Board, String> {
    let notation = match (&args.board, &args.file) {
        (Some(board), _) => board.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?
            .trim()
            .to_string(),
        (None, None) => return Err("No board given".to_string()),
    };
    notation
        .parse::<Board>()
        .map_err(|e| format!("Invalid board notation: {}", e))
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let board = match read_board(&args) {
        Ok(board) => board,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };
    println!("Initial board ({} vessels):\n{}\n", board.len(), board.to_string_with_highlight(None));
    println!("Searching with {}...\n", args.algorithm);

    let mut solver = args.algorithm.build();
    let started = Instant::now();
    let result = solver.solve(&board);
    let elapsed = started.elapsed();
    let stats = solver.stats();

    let moves = match result {
        Ok(moves) => moves,
        Err(e) => {
            eprintln!(
                "{} failed after {} expansions: {}",
                solver.name(),
                stats.expansions,
                e
            );
            return ExitCode::FAILURE;
        }
    };

    println!("Puzzle solved in {} steps!", moves.len());
    println!("Expansions: {}, time: {:.2?}\n", stats.expansions, elapsed);
    let mut current = board;
    for (i, mv) in moves.iter().enumerate() {
        println!("  Move {}: {}", i + 1, mv);
        if args.show_boards {
            println!("{}\n", current.to_string_with_highlight(Some(*mv)));
        }
        current = match current.apply(*mv) {
            Ok(next) => next,
            Err(e) => {
                eprintln!("Move {} cannot be replayed: {}", i + 1, e);
                return ExitCode::FAILURE;
            }
        };
    }
    if args.show_boards {
        println!("Final board:\n{}", current.to_string_with_highlight(None));
    }
    ExitCode::SUCCESS
}
