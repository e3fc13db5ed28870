use std::env;
use std::process;
use std::rc::Rc;

use pushworld::config::Mode;
use pushworld::{solve, LoadPuzzle};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!(
            "Usage: pushworld <mode> <puzzle>

Prints a plan of (L)eft, (R)ight, (U)p, (D)own actions that solves the given
PushWorld puzzle, or prints \"NO SOLUTION\" if no solution exists.

Options:
    <mode>   : \"RGD\"   - The recursive graph distance heuristic.
               \"N+RGD\" - A lexicographic combination of the novelty
                          heuristic with the RGD heuristic.
    <puzzle> : The path of a PushWorld file in .pwp format."
        );
        process::exit(1);
    }

    let mode: Mode = args[1].parse().unwrap_or_else(|err| {
        eprintln!("{}", err);
        process::exit(1);
    });

    let puzzle = args[2].load_puzzle().unwrap_or_else(|err| {
        eprintln!("Can't load puzzle {}: {}", args[2], err);
        process::exit(1);
    });

    let solution = solve(&Rc::new(puzzle), mode);
    match solution.plan {
        Some(plan) => {
            let actions: String = plan.iter().map(|action| action.to_char()).collect();
            println!("{}", actions);
        }
        None => println!("NO SOLUTION"),
    }
}
