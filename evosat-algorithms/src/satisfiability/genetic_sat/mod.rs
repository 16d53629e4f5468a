pub mod config;
pub mod crossover;
pub mod evolution;
pub mod fitness;
pub mod genome;
pub mod mutation;
pub mod preprocess;
pub mod runner;
pub mod selection;

pub use config::Config;
pub use runner::{Report, Solver, Status};

use anyhow::Result;
use evosat_challenges::{Formula, Solution};
use serde_json::{Map, Value};

pub fn solve_challenge(
    formula: &Formula,
    seed: [u8; 32],
    save_solution: &dyn Fn(&Solution) -> Result<()>,
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<()> {
    let report = Solver::solve_challenge_instance(formula, seed, hyperparameters)?;
    match report.solution {
        Some(solution) if report.solution_found => save_solution(&solution),
        _ => Ok(()),
    }
}
