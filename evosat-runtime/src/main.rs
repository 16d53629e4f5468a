use anyhow::{anyhow, Result};
use clap::{arg, ArgAction, Command};
use evosat_algorithms::satisfiability::genetic_sat::{Config, Solver};
use evosat_challenges::{Formula, Solution};
use evosat_utils::{dejsonify, jsonify, jsonify_pretty, u8s_from_str};
use serde_json::{Map, Value};
use std::{fs, io::Read, path::PathBuf};
use tracing::info;
use tracing_subscriber::prelude::*;

fn cli() -> Command {
    Command::new("evosat")
        .about("Solves, verifies or generates CNF formulas")
        .arg_required_else_help(true)
        .arg(
            arg!(-v --verbose "Log every traced generation")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("solve")
                .about("Runs the genetic solver on a DIMACS CNF file")
                .arg(
                    arg!(<CNF> "Path to a DIMACS CNF file")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--config [CONFIG] "Hyperparameters json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--seed [SEED] "A string used in seed generation")
                        .default_value("0")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--output [OUTPUT_FILE] "If set, the report will be saved to this file path")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("verify_solution")
                .about("Checks an assignment against a DIMACS CNF file")
                .arg(
                    arg!(<CNF> "Path to a DIMACS CNF file")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(<SOLUTION> "Solution json string, path to json file, or '-' for stdin")
                        .value_parser(clap::value_parser!(String)),
                ),
        )
        .subcommand(
            Command::new("generate_instance")
                .about("Prints a random 3-SAT formula in DIMACS format")
                .arg(
                    arg!(<SEED> "A string used in seed generation")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(<NUM_VARIABLES> "Number of variables")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--ratio [PERCENT] "Clauses per variable, in percent")
                        .default_value("426")
                        .value_parser(clap::value_parser!(u32)),
                ),
        )
}

fn main() {
    let matches = cli().get_matches();

    let filter = if matches.get_flag("verbose") {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = match matches.subcommand() {
        Some(("solve", sub_m)) => solve(
            sub_m.get_one::<PathBuf>("CNF").unwrap().clone(),
            sub_m.get_one::<String>("config").cloned(),
            sub_m.get_one::<String>("seed").unwrap().clone(),
            sub_m.get_one::<PathBuf>("output").cloned(),
        ),
        Some(("verify_solution", sub_m)) => verify_solution(
            sub_m.get_one::<PathBuf>("CNF").unwrap().clone(),
            sub_m.get_one::<String>("SOLUTION").unwrap().clone(),
        ),
        Some(("generate_instance", sub_m)) => generate_instance(
            sub_m.get_one::<String>("SEED").unwrap().clone(),
            *sub_m.get_one::<usize>("NUM_VARIABLES").unwrap(),
            *sub_m.get_one::<u32>("ratio").unwrap(),
        ),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

pub fn solve(
    cnf_path: PathBuf,
    config: Option<String>,
    seed: String,
    output_file: Option<PathBuf>,
) -> Result<()> {
    let formula = Formula::from_dimacs_file(&cnf_path)?;
    let hyperparameters = match config {
        Some(config) => Some(load_hyperparameters(&config)?),
        None => None,
    };
    let params = Config::initialize(&hyperparameters)?;
    info!(
        num_variables = formula.num_variables,
        num_clauses = formula.num_clauses(),
        ?params,
        "solving {}",
        cnf_path.display()
    );

    let report = Solver::solve(&formula, &params, u8s_from_str(&seed), None)?;
    if let Some(path) = output_file {
        fs::write(&path, jsonify_pretty(&report)?)?;
        println!("report written to: {:?}", path);
    } else {
        println!("{}", jsonify(&report)?);
    }
    if !report.solution_found {
        eprintln!("No solution found");
    }
    Ok(())
}

pub fn verify_solution(cnf_path: PathBuf, solution: String) -> Result<()> {
    let formula = Formula::from_dimacs_file(&cnf_path)?;
    let solution = load_solution(&solution)?;
    formula
        .verify_solution(&solution)
        .map_err(|e| anyhow!("Invalid solution: {}", e))?;
    println!("Solution is valid");
    Ok(())
}

pub fn generate_instance(seed: String, num_variables: usize, ratio: u32) -> Result<()> {
    let formula = Formula::generate_instance(&u8s_from_str(&seed), num_variables, ratio)?;
    print!("{}", formula.to_dimacs());
    Ok(())
}

fn read_json_arg(arg: &str) -> Result<String> {
    if arg == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow!("Failed to read from stdin: {}", e))?;
        Ok(buffer)
    } else if arg.ends_with(".json") {
        fs::read_to_string(arg).map_err(|e| anyhow!("Failed to read file {}: {}", arg, e))
    } else {
        Ok(arg.to_string())
    }
}

fn load_hyperparameters(config: &str) -> Result<Map<String, Value>> {
    dejsonify::<Map<String, Value>>(&read_json_arg(config)?)
        .map_err(|e| anyhow!("Failed to parse config: {}", e))
}

fn load_solution(solution: &str) -> Result<Solution> {
    dejsonify::<Solution>(&read_json_arg(solution)?)
        .map_err(|e| anyhow!("Failed to parse solution: {}", e))
}
