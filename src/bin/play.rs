use clap::Parser;
use std::io::{self, Write};
use watersort_solver::engine::{Board, Move};
use watersort_solver::logging::init_tracing;
use watersort_solver::solver::{Algorithm, Solver};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Board notation to play; a random board is generated when omitted
    board: Option<String>,

    /// Number of colors of a random board (1 to 26)
    #[clap(short, long, default_value_t = 6, value_parser = clap::value_parser!(u8).range(1..=26))]
    colors: u8,

    /// Number of empty vessels of a random board
    #[clap(short, long, default_value_t = 2)]
    empty: usize,

    /// Seed of a random board
    #[clap(short, long, default_value_t = 0)]
    seed: u64,

    /// Strategy used for hints
    #[clap(short, long, default_value = "astar")]
    algorithm: Algorithm,
}

fn hint(solver: &mut dyn Solver, board: &Board) -> String {
    match solver.solve(board) {
        Ok(moves) => match moves.first() {
            Some(mv) => format!("Try {} ({} moves left with best play).", mv, moves.len()),
            None => "The board is already sorted.".to_string(),
        },
        Err(e) => format!("No hint available: {}.", e),
    }
}

fn parse_move(input: &str, vessels: usize) -> Result<Move, String> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    if parts.len() != 2 {
        return Err("Invalid input format. Use 'from to', 'u', 'h', or 'q'.".to_string());
    }
    let (Ok(from), Ok(to)) = (parts[0].parse::<usize>(), parts[1].parse::<usize>()) else {
        return Err("Invalid input: Please enter vessel numbers (e.g., '1 3'), 'u', 'h', or 'q'.".to_string());
    };
    if !(1..=vessels).contains(&from) || !(1..=vessels).contains(&to) {
        return Err(format!("Invalid vessel: numbers must be between 1 and {}.", vessels));
    }
    Ok(Move::new(from - 1, to - 1))
}

fn main() {
    let args = Args::parse();
    init_tracing(false);

    let initial = match &args.board {
        Some(notation) => match notation.parse::<Board>() {
            Ok(board) => board,
            Err(e) => {
                eprintln!("Invalid board notation: {}", e);
                std::process::exit(1);
            }
        },
        None => Board::new_random_with_seed(usize::from(args.colors), args.empty, args.seed),
    };
    let mut hint_solver = args.algorithm.build();

    let mut history: Vec<Board> = vec![initial];
    let mut last_move: Option<Move> = None;
    println!("Welcome to Water Sort!");

    while let Some(board) = history.last().cloned() {
        println!("---------------------");
        println!("Steps: {}", history.len() - 1);
        println!("{}", board.to_string_with_highlight(last_move));

        if board.is_terminal() {
            println!();
            println!("---------------------");
            println!("🎉 SORTED! 🎉");
            println!("Total Steps: {}", history.len() - 1);
            println!("---------------------");
            break;
        }

        print!("Enter your move (from to), 'u' to undo, 'h' for a hint, 'q' to quit: ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => {
                println!("Error reading input. Please try again.");
                continue;
            }
        }

        match input.trim() {
            "q" => {
                println!("Thanks for playing!");
                break;
            }
            "u" => {
                if history.len() > 1 {
                    history.pop();
                    last_move = None;
                    println!("Move undone.");
                } else {
                    println!("Cannot undo further (already at initial state).");
                }
            }
            "h" => println!("{}", hint(hint_solver.as_mut(), &board)),
            other => match parse_move(other, board.len()) {
                Ok(mv) if !board.is_legal(mv) => {
                    println!("Illegal pour {}: the top must land on an empty vessel or on the same color with room to spare.", mv);
                }
                Ok(mv) => match board.apply(mv) {
                    Ok(next) => {
                        history.push(next);
                        last_move = Some(mv);
                    }
                    Err(e) => println!("Invalid move: {}", e),
                },
                Err(message) => println!("{}", message),
            },
        }
    }
}
