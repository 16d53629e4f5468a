use super::config::Config;
use super::evolution::{Evolution, Outcome, State};
use super::fitness;
use super::genome::{decode, Allele, Domain};
use super::preprocess::{preprocess, Reduction, Simplified, Stats};
use anyhow::{anyhow, Result};
use evosat_challenges::{Formula, Solution};
use rand::{rngs::SmallRng, SeedableRng};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::atomic::AtomicBool;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    TriviallySolved,
    Unsatisfiable,
    Solved,
    Exhausted,
    Cancelled,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Report {
    pub status: Status,
    pub solution_found: bool,
    /// Value given to every variable when the formula was trivially satisfiable.
    pub polarity: Option<bool>,
    /// Satisfying or best found assignment; absent for an unsatisfiable formula.
    pub solution: Option<Solution>,
    /// Clauses of the original formula satisfied by `solution`.
    pub fitness: usize,
    pub num_clauses: usize,
    pub generations: usize,
    /// Product score of the raw best genome against the simplified formula.
    pub relaxed_fitness: Option<f64>,
    pub preprocessing: Option<Stats>,
}

pub struct Solver;

impl Solver {
    pub fn solve(
        formula: &Formula,
        params: &Config,
        seed: [u8; 32],
        cancel: Option<&AtomicBool>,
    ) -> Result<Report> {
        formula.validate()?;
        params.validate()?;

        match preprocess(formula) {
            Simplified::Trivial(polarity) => Ok(Report {
                status: Status::TriviallySolved,
                solution_found: true,
                polarity: Some(polarity),
                solution: Some(Solution {
                    variables: vec![polarity; formula.num_variables],
                }),
                fitness: formula.num_clauses(),
                num_clauses: formula.num_clauses(),
                generations: 0,
                relaxed_fitness: None,
                preprocessing: None,
            }),
            Simplified::Conflict => Ok(Report {
                status: Status::Unsatisfiable,
                solution_found: false,
                polarity: None,
                solution: None,
                fitness: 0,
                num_clauses: formula.num_clauses(),
                generations: 0,
                relaxed_fitness: None,
                preprocessing: None,
            }),
            Simplified::Reduced(reduction) => {
                let mut rng = SmallRng::from_seed(seed);
                let evolution = Evolution::new(&reduction.formula, &reduction.forced, params);
                match params.domain {
                    Domain::Discrete => {
                        let outcome = evolution.run::<bool>(&mut rng, cancel);
                        Self::report(formula, &reduction, outcome)
                    }
                    Domain::Continuous => {
                        let outcome = evolution.run::<f64>(&mut rng, cancel);
                        Self::report(formula, &reduction, outcome)
                    }
                }
            }
        }
    }

    fn report<A: Allele>(formula: &Formula, reduction: &Reduction, outcome: Outcome<A>) -> Result<Report> {
        let best = outcome
            .best
            .ok_or_else(|| anyhow!("Evolution ended without evaluating an individual"))?;
        let variables = decode(&best.genome);
        let fitness = formula.count_satisfied(&variables);
        let status = match outcome.state {
            State::Solved => Status::Solved,
            State::Cancelled => Status::Cancelled,
            _ => Status::Exhausted,
        };

        Ok(Report {
            status,
            solution_found: fitness == formula.num_clauses(),
            polarity: None,
            solution: Some(Solution { variables }),
            fitness,
            num_clauses: formula.num_clauses(),
            generations: outcome.generations,
            relaxed_fitness: Some(fitness::relaxed(&reduction.formula, &best.genome)),
            preprocessing: Some(reduction.stats),
        })
    }

    pub fn solve_challenge_instance(
        formula: &Formula,
        seed: [u8; 32],
        hyperparameters: &Option<Map<String, Value>>,
    ) -> Result<Report> {
        let params = Config::initialize(hyperparameters)?;
        Self::solve(formula, &params, seed, None)
    }
}
