use evosat_algorithms::satisfiability::genetic_sat::crossover::Crossover;
use evosat_algorithms::satisfiability::genetic_sat::genome::Domain;
use evosat_algorithms::satisfiability::genetic_sat::mutation::Mutation;
use evosat_algorithms::satisfiability::genetic_sat::*;
use evosat_challenges::{Formula, Solution};
use serde_json::{json, Map, Value};
use std::cell::RefCell;
use std::sync::atomic::AtomicBool;

const SEED: [u8; 32] = [42u8; 32];

fn small_config() -> Config {
    Config {
        population_size: 20,
        max_generations: 50,
        ..Config::default()
    }
}

/// Every sign combination over three variables: unsatisfiable, with no unit
/// clause or pure literal for preprocessing to use.
fn all_combinations() -> Formula {
    let clauses = (0..8)
        .map(|bits| (1..=3).map(|v| if bits >> (v - 1) & 1 == 1 { v } else { -v }).collect())
        .collect();
    Formula::new(3, clauses)
}

fn hyperparameters(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

#[test]
fn test_single_positive_clause_is_trivially_solved() {
    let formula = Formula::new(3, vec![vec![1, 2, 3]]);
    let report = Solver::solve(&formula, &small_config(), SEED, None).unwrap();
    assert_eq!(report.status, Status::TriviallySolved);
    assert!(report.solution_found);
    assert_eq!(report.polarity, Some(true));
    assert_eq!(report.solution.unwrap().variables, vec![true; 3]);
    assert_eq!(report.generations, 0);
}

#[test]
fn test_conflicting_units_report_no_solution() {
    let formula = Formula::new(1, vec![vec![1], vec![-1]]);
    let report = Solver::solve(&formula, &small_config(), SEED, None).unwrap();
    assert_eq!(report.status, Status::Unsatisfiable);
    assert!(!report.solution_found);
    assert!(report.solution.is_none());
}

#[test]
fn test_two_variable_formula_is_solved() {
    let formula = Formula::new(2, vec![vec![1, 2], vec![-1, -2]]);
    for domain in [Domain::Discrete, Domain::Continuous] {
        let params = Config {
            domain,
            ..small_config()
        };
        let report = Solver::solve(&formula, &params, SEED, None).unwrap();
        assert_eq!(report.status, Status::Solved);
        assert!(report.solution_found);
        assert_eq!(report.fitness, 2);
        let solution = report.solution.unwrap();
        assert!(formula.verify_solution(&solution).is_ok());
        assert!(report.relaxed_fitness.unwrap() > 0.0);
    }
}

#[test]
fn test_every_operator_pair_runs() {
    let formula = Formula::new(2, vec![vec![1, 2], vec![-1, -2]]);
    let crossovers = [
        Crossover::SinglePoint,
        Crossover::TwoPoint,
        Crossover::SlidingWindow,
        Crossover::RandomMap,
        Crossover::Uniform,
    ];
    let mutations = [
        Mutation::SingleBitFlip,
        Mutation::MultipleBitFlip,
        Mutation::GreedySingleBit,
        Mutation::GreedyMaxSingleBit,
        Mutation::MultiBitGreedy,
        Mutation::FlipGa,
    ];
    for crossover in crossovers {
        for mutation in mutations {
            let params = Config {
                crossover,
                mutation,
                ..small_config()
            };
            let report = Solver::solve(&formula, &params, SEED, None).unwrap();
            assert!(report.solution_found, "{:?} {:?}", crossover, mutation);
        }
    }
}

#[test]
fn test_unsatisfiable_search_is_exhausted() {
    let formula = all_combinations();
    let params = Config {
        population_size: 10,
        max_generations: 5,
        crossover: Crossover::SlidingWindow,
        ..Config::default()
    };
    let report = Solver::solve(&formula, &params, SEED, None).unwrap();
    assert_eq!(report.status, Status::Exhausted);
    assert!(!report.solution_found);
    assert_eq!(report.generations, 5);
    assert_eq!(report.fitness, 7);
    assert_eq!(report.num_clauses, 8);
}

#[test]
fn test_runs_are_reproducible() {
    let formula = Formula::generate_instance(&[5u8; 32], 30, 430).unwrap();
    let params = Config {
        population_size: 16,
        max_generations: 10,
        mutation: Mutation::MultipleBitFlip,
        ..Config::default()
    };
    let a = Solver::solve(&formula, &params, SEED, None).unwrap();
    let b = Solver::solve(&formula, &params, SEED, None).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_cancellation_stops_at_generation_boundary() {
    let cancel = AtomicBool::new(true);
    let report = Solver::solve(&all_combinations(), &small_config(), SEED, Some(&cancel)).unwrap();
    assert_eq!(report.status, Status::Cancelled);
    assert_eq!(report.generations, 0);
    assert!(report.solution.is_some());
}

#[test]
fn test_forced_values_survive_mutation() {
    let formula = Formula::new(4, vec![vec![1], vec![-1, 2], vec![3, 4], vec![-3, -4]]);
    let params = Config {
        mutation: Mutation::MultipleBitFlip,
        mutation_rate: 1.0,
        max_generations: 5,
        ..small_config()
    };
    let report = Solver::solve(&formula, &params, SEED, None).unwrap();
    assert_eq!(report.preprocessing.unwrap().unit_propagations, 2);
    let variables = report.solution.unwrap().variables;
    assert!(variables[0] && variables[1]);
    assert!(report.solution_found);
}

#[test]
fn test_planted_instance_mostly_satisfied() {
    let planted: Vec<bool> = (0..20).map(|i| i % 3 == 0).collect();
    let mut formula = Formula::generate_instance(&[8u8; 32], 20, 400).unwrap();
    formula
        .clauses
        .retain(|clause| evosat_challenges::satisfiability::clause_satisfied(clause, &planted));
    let params = Config {
        population_size: 20,
        max_generations: 30,
        mutation: Mutation::FlipGa,
        ..Config::default()
    };
    let report = Solver::solve(&formula, &params, SEED, None).unwrap();
    assert!(report.fitness * 10 >= report.num_clauses * 9);
    let solution = report.solution.unwrap();
    assert_eq!(formula.count_satisfied(&solution.variables), report.fitness);
    if report.solution_found {
        assert!(formula.verify_solution(&solution).is_ok());
    }
}

#[test]
fn test_invalid_formula_fails_fast() {
    let formula = Formula::new(1, vec![vec![2]]);
    assert!(Solver::solve(&formula, &small_config(), SEED, None).is_err());
    let formula = Formula::new(1, vec![vec![0]]);
    assert!(Solver::solve(&formula, &small_config(), SEED, None).is_err());
    let formula = Formula::new(usize::MAX, vec![vec![1, 2], vec![-1, -2]]);
    assert!(Solver::solve(&formula, &Config::default(), SEED, None).is_err());
}

#[test]
fn test_config_defaults() {
    let params = Config::initialize(&None).unwrap();
    assert_eq!(params, Config::default());
    assert_eq!(params.population_size, 500);
    assert_eq!(params.max_generations, 1000);
    assert_eq!(params.replacement_rate, 0.5);
    assert_eq!(params.mutation_rate, 0.1);
    assert_eq!(params.window_fraction, 0.4);
}

#[test]
fn test_config_overlay() {
    let params = Config::initialize(&hyperparameters(json!({
        "population_size": 20,
        "domain": "continuous",
        "crossover": "sliding_window",
        "mutation": "flip_ga"
    })))
    .unwrap();
    assert_eq!(params.population_size, 20);
    assert_eq!(params.domain, Domain::Continuous);
    assert_eq!(params.crossover, Crossover::SlidingWindow);
    assert_eq!(params.mutation, Mutation::FlipGa);
    assert_eq!(params.max_generations, 1000);
}

#[test]
fn test_config_rejects_bad_values() {
    for bad in [
        json!({"population_size": 1}),
        json!({"mutation_rate": 1.5}),
        json!({"replacement_rate": -0.1}),
        json!({"crossover": "three_point"}),
        json!({"elitism": 0.2}),
        json!({"trace_interval": 0}),
    ] {
        assert!(Config::initialize(&hyperparameters(bad.clone())).is_err(), "{}", bad);
    }
}

#[test]
fn test_solve_challenge_saves_satisfying_assignment() {
    let formula = Formula::new(2, vec![vec![1, 2], vec![-1, -2]]);
    let saved: RefCell<Option<Solution>> = RefCell::new(None);
    let save = |solution: &Solution| {
        *saved.borrow_mut() = Some(solution.clone());
        Ok(())
    };
    solve_challenge(
        &formula,
        SEED,
        &save,
        &hyperparameters(json!({"population_size": 20, "max_generations": 50})),
    )
    .unwrap();
    let solution = saved.into_inner().unwrap();
    assert!(formula.verify_solution(&solution).is_ok());
}
