//! CNF simplification run once before the search.
//!
//! Unit propagation runs to its fixed point, then a single pure-literal pass
//! fixes variables appearing with one polarity. The two passes are not
//! iterated jointly, so a pure literal exposed by the second pass stays free.

use evosat_challenges::Formula;
use serde::Serialize;
use std::collections::VecDeque;
use tracing::{debug, info};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub unit_propagations: usize,
    pub pure_literals: usize,
    pub forced_variables: usize,
    pub remaining_clauses: usize,
}

/// The simplified formula together with the variables it fixed. The formula
/// keeps the original `num_variables`; forced variables no longer occur in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    pub formula: Formula,
    pub forced: Vec<Option<bool>>,
    pub stats: Stats,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Simplified {
    /// Every variable set to the given polarity satisfies the formula.
    Trivial(bool),
    Conflict,
    Reduced(Reduction),
}

/// Index (into the clause list at the time) of the clause emptied by propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub clause: usize,
}

/// `Some(true)` when no clause holds a negative literal, `Some(false)` when none
/// holds a positive one. An empty clause is never trivial.
pub fn trivial_case(formula: &Formula) -> Option<bool> {
    if formula.clauses.iter().any(|clause| clause.is_empty()) {
        return None;
    }
    let literals = || formula.clauses.iter().flatten();
    if !literals().any(|&literal| literal < 0) {
        Some(true)
    } else if !literals().any(|&literal| literal > 0) {
        Some(false)
    } else {
        None
    }
}

/// Fixes the literal of every unit clause, drops the clauses it satisfies and
/// strips its negation from the rest, until no unit clause remains. Returns the
/// number of propagated units, which never exceeds the initial clause count.
pub fn unit_propagate(
    clauses: &mut Vec<Vec<i32>>,
    forced: &mut [Option<bool>],
) -> Result<usize, Conflict> {
    let mut alive = vec![true; clauses.len()];
    let mut queue: VecDeque<usize> = clauses
        .iter()
        .enumerate()
        .filter(|(_, clause)| clause.len() == 1)
        .map(|(idx, _)| idx)
        .collect();
    let mut steps = 0;

    while let Some(unit) = queue.pop_front() {
        if !alive[unit] {
            continue;
        }
        let literal = clauses[unit][0];
        forced[literal.unsigned_abs() as usize - 1] = Some(literal > 0);
        steps += 1;

        for (idx, clause) in clauses.iter_mut().enumerate() {
            if !alive[idx] {
                continue;
            }
            if clause.contains(&literal) {
                alive[idx] = false;
                continue;
            }
            let before = clause.len();
            clause.retain(|&l| l != -literal);
            if clause.len() < before {
                match clause.len() {
                    0 => return Err(Conflict { clause: idx }),
                    1 => queue.push_back(idx),
                    _ => {}
                }
            }
        }
    }

    let mut idx = 0;
    clauses.retain(|_| {
        idx += 1;
        alive[idx - 1]
    });
    Ok(steps)
}

/// Fixes each free variable that occurs with a single polarity to satisfy it,
/// and free variables that occur nowhere to false. Drops the satisfied
/// clauses. Returns how many occurring variables were fixed.
pub fn eliminate_pure_literals(clauses: &mut Vec<Vec<i32>>, forced: &mut [Option<bool>]) -> usize {
    let mut positive = vec![false; forced.len()];
    let mut negative = vec![false; forced.len()];
    for &literal in clauses.iter().flatten() {
        let var = literal.unsigned_abs() as usize - 1;
        if literal > 0 {
            positive[var] = true;
        } else {
            negative[var] = true;
        }
    }

    let mut pure = 0;
    for var in 0..forced.len() {
        if forced[var].is_some() {
            continue;
        }
        forced[var] = match (positive[var], negative[var]) {
            (true, true) => continue,
            (false, false) => Some(false),
            (only_positive, _) => {
                pure += 1;
                Some(only_positive)
            }
        };
    }

    clauses.retain(|clause| {
        !clause
            .iter()
            .any(|&literal| forced[literal.unsigned_abs() as usize - 1] == Some(literal > 0))
    });
    pure
}

pub fn preprocess(formula: &Formula) -> Simplified {
    if let Some(idx) = formula.clauses.iter().position(|clause| clause.is_empty()) {
        info!(clause = idx, "formula contains an empty clause");
        return Simplified::Conflict;
    }
    if let Some(polarity) = trivial_case(formula) {
        info!(polarity, "formula is trivially satisfiable");
        return Simplified::Trivial(polarity);
    }

    let mut clauses = formula.clauses.clone();
    let mut forced = vec![None; formula.num_variables];

    let unit_propagations = match unit_propagate(&mut clauses, &mut forced) {
        Ok(steps) => steps,
        Err(conflict) => {
            info!(clause = conflict.clause, "unit propagation produced an empty clause");
            return Simplified::Conflict;
        }
    };
    debug!(unit_propagations, remaining = clauses.len(), "unit propagation done");
    let pure_literals = eliminate_pure_literals(&mut clauses, &mut forced);

    let stats = Stats {
        unit_propagations,
        pure_literals,
        forced_variables: forced.iter().filter(|slot| slot.is_some()).count(),
        remaining_clauses: clauses.len(),
    };
    info!(
        unit_propagations = stats.unit_propagations,
        pure_literals = stats.pure_literals,
        forced_variables = stats.forced_variables,
        remaining_clauses = stats.remaining_clauses,
        "preprocessing done"
    );

    Simplified::Reduced(Reduction {
        formula: Formula::new(formula.num_variables, clauses),
        forced,
        stats,
    })
}
