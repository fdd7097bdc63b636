//! Drives every search strategy through the `Solver` trait on a table of boards
//! with known optimal solution lengths.
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use watersort_solver::engine::Board;
use watersort_solver::error::SolveError;
use watersort_solver::solver::{Algorithm, Solver};
use watersort_solver::{AStarSolver, IdaStarSolver};

const SOLVABLE: &[(&str, usize)] = &[
    ("O;OOO", 1),
    ("FOFO;OFOF;", 7),
    ("FORF;OORF;RFOR;;", 10),
    ("FROO;FRFR;OFRO;;", 10),
    ("RGGG;ORPG;PORO;FPOP;FFFR;;", 12),
    ("GORO;FFRO;PPFO;GPRF;GRGP;;", 15),
    ("GOGF;OPPO;PRFR;FRGP;FGRO;;", 16),
    ("PRFP;RGGO;ROOP;PRGF;GOFF;;", 14),
    ("FPFB;PPGB;OOQO;BRPO;FGRQ;QFRR;QBGG;;", 20),
    ("FPGG;OFPF;FORG;OGRP;RORP;;", 16),
    ("FPGR;OGGB;PQOR;GRFB;BPQB;POFQ;QRFO;;", 22),
    ("QFFF;FQPO;QOQG;ROGP;RBPR;OBGB;PGBR;;", 21),
    ("RPPR;BRFR;OGOO;QFGQ;GBQO;BQPB;PFFG;;", 21),
    ("BQFB;PFRG;FPGF;BRQO;GOBG;RPOR;OPQQ;;", 22),
    ("GOFR;OPRG;OFRG;PFFG;PPRO;;", 16),
    ("GRPP;GBPB;FOQQ;OPGQ;FGBR;FFBQ;OORR;;", 20),
    ("ORRF;PGRO;FFGR;GOPF;OPGP;;", 15),
    ("BBFG;QROP;RGOF;QFRP;QOPP;GBFB;GQRO;;", 22),
    ("GRPO;PRFB;OQOB;PGFB;PQRB;QGGR;FFOQ;;", 21),
    ("RFFF;GGOO;GRPO;RGOP;PRPF;;", 13),
    ("ORBB;GPPG;QFOG;PFQR;OQPG;RROB;BFFQ;;", 19),
    ("OORP;RGGF;ORPP;PFFG;FRGO;;", 13),
    ("OQBF;PPRP;OQGQ;GFPR;FFBQ;ROOB;BGGR;;", 19),
    ("QBPO;BGGP;FOFO;PBGF;QRGF;BQQR;RORP;;", 22),
    ("FGPT;BTHF;FQGO;POOB;QRRP;FOHG;GRTB;QHRH;PBQT;;", 29),
    ("GOPO;OFTQ;TQRP;BHQR;GFRH;QPHR;BGOG;FBBT;HTPF;;", 28),
    ("RGGR;BFOP;QQPF;BGBO;GOBF;PQQR;PFOR;;", 21),
    ("TRFH;QFOO;QGQG;THBT;BRRB;FPQP;ORPF;OPBH;HGTG;;", 28),
    ("BRQF;GRFG;GFBP;RRGP;QBOP;QOPB;OOFQ;;", 21),
    ("QGFH;QTGG;OQRP;BBTH;HFRB;RFOR;PTBQ;POOH;GPTF;;", 27),
    ("FBHB;FRHT;QTFF;RPOG;QGPR;OGGH;HQTR;TQPO;OBBP;;", 27),
    ("FBPG;ROQP;BFFO;POBR;PFGO;QGBR;GQRQ;;", 22),
    ("OHTP;TGFR;FGBF;ORRB;PTQT;HFBQ;QOHG;RPHP;BGQO;;", 28),
    ("POGR;OBFP;OQGP;PQRG;BQQB;GRFO;FBRF;;", 22),
    ("ROGB;PTQH;BQGP;HOOG;ROTR;PFTT;HBFQ;FRBP;QFHG;;", 28),
    ("GPBH;PBBF;RORR;QTQH;BPHG;TTOG;ROQH;GFFO;FPTQ;;", 26),
    ("QTGO;HBFQ;OHFB;GQHR;TGTP;PBRT;PBRP;GQOH;ROFF;;", 28),
    ("GTFH;HORF;BHQP;PGRO;BBGO;QQOT;GFFR;HBPT;QRTP;;", 28),
    ("BRGO;BGFF;QORB;GPPF;PRQO;RQBO;FGQP;;", 21),
    ("GBRP;FFFG;FROG;OROB;BPQQ;HHTO;QHGB;HPPT;TTRQ;;", 24),
];

const UNSOLVABLE: &[&str] = &["ABCD;BCDA;CDAB;DABC", "AB;AB;", "ABAB;"];

fn board(s: &str) -> Board {
    s.parse().unwrap_or_else(|e| panic!("bad board {s}: {e}"))
}

fn check_solution(solver: &mut dyn Solver, text: &str, expected: usize) {
    let start = board(text);
    let moves = solver
        .solve(&start)
        .unwrap_or_else(|e| panic!("{} failed on {text}: {e}", solver.name()));
    assert_eq!(moves.len(), expected, "{} on {text}", solver.name());
    let mut end = start.clone();
    for &mv in &moves {
        assert!(end.is_legal(mv), "{} poured {mv} illegally on {end}", solver.name());
        end = end.apply(mv).unwrap();
    }
    assert!(end.is_terminal(), "{} did not sort {text}: {end}", solver.name());
    assert_eq!(start.replay(&moves), Ok(end));
    assert!(solver.stats().expansions > 0);
}

#[test]
fn astar_solves_table() {
    let mut solver = Algorithm::AStar.build();
    for &(text, expected) in SOLVABLE {
        check_solution(solver.as_mut(), text, expected);
    }
}

#[test]
fn dijkstra_solves_table() {
    let mut solver = Algorithm::Dijkstra.build();
    for &(text, expected) in SOLVABLE {
        check_solution(solver.as_mut(), text, expected);
    }
}

#[test]
fn idastar_solves_table() {
    let mut solver = Algorithm::IdaStar.build();
    for &(text, expected) in SOLVABLE {
        check_solution(solver.as_mut(), text, expected);
    }
}

#[test]
fn unsolvable_boards_report_no_solution() {
    for algorithm in Algorithm::ALL {
        let mut solver = algorithm.build();
        for &text in UNSOLVABLE {
            assert_eq!(
                solver.solve(&board(text)),
                Err(SolveError::NoSolution),
                "{algorithm} on {text}"
            );
        }
    }
}

#[test]
fn sorted_board_needs_no_moves() {
    for algorithm in Algorithm::ALL {
        let mut solver = algorithm.build();
        assert_eq!(solver.solve(&board("AAAA;BBBB;;")), Ok(Vec::new()));
        assert_eq!(solver.solve(&board(";;")), Ok(Vec::new()));
    }
}

#[test]
fn vessel_order_does_not_change_solution_length() {
    let mut solver = AStarSolver::new();
    let a = solver.solve(&board("FORF;OORF;RFOR;;")).unwrap().len();
    let b = solver.solve(&board(";RFOR;;OORF;FORF")).unwrap().len();
    assert_eq!(a, b);
}

#[test]
fn raised_stop_flag_cancels_every_strategy() {
    let flag = Arc::new(AtomicBool::new(true));
    for algorithm in Algorithm::ALL {
        let mut solver = algorithm.build_with_stop_flag(flag.clone());
        assert!(matches!(
            solver.solve(&board("FOFO;OFOF;")),
            Err(SolveError::Cancelled { .. })
        ));
    }
}

#[test]
fn random_boards_agree_across_strategies() {
    for seed in 0..5 {
        let start = Board::new_random_with_seed(4, 2, seed);
        let astar = AStarSolver::new().solve(&start);
        let dijkstra = AStarSolver::dijkstra().solve(&start);
        assert_eq!(
            dijkstra.as_ref().map(|m| m.len()),
            astar.as_ref().map(|m| m.len()),
            "seed {seed}"
        );
        // IDA* keeps no closed set, so it only runs where a solution exists.
        if let Ok(moves) = astar {
            assert!(start.replay(&moves).unwrap().is_terminal());
            let ida = IdaStarSolver::new().solve(&start);
            assert_eq!(ida.map(|m| m.len()), Ok(moves.len()), "seed {seed}");
        }
    }
}
