use evosat_algorithms::satisfiability::genetic_sat::preprocess::*;
use evosat_challenges::Formula;
use rand::{rngs::SmallRng, Rng, SeedableRng};

fn assignments(num_variables: usize) -> impl Iterator<Item = Vec<bool>> {
    (0..1u32 << num_variables).map(move |bits| (0..num_variables).map(|i| (bits >> i) & 1 == 1).collect())
}

fn satisfies(formula: &Formula, variables: &[bool]) -> bool {
    formula.count_satisfied(variables) == formula.num_clauses()
}

fn random_formula(rng: &mut SmallRng, num_variables: usize) -> Formula {
    let num_clauses = rng.gen_range(1..12);
    let clauses = (0..num_clauses)
        .map(|_| {
            (0..rng.gen_range(1..=3))
                .map(|_| {
                    let var = rng.gen_range(1..=num_variables as i32);
                    if rng.gen::<bool>() {
                        var
                    } else {
                        -var
                    }
                })
                .collect()
        })
        .collect();
    Formula::new(num_variables, clauses)
}

#[test]
fn test_trivial_all_positive() {
    let formula = Formula::new(3, vec![vec![1, 2, 3]]);
    assert_eq!(trivial_case(&formula), Some(true));
    assert_eq!(preprocess(&formula), Simplified::Trivial(true));
}

#[test]
fn test_trivial_all_negative() {
    let formula = Formula::new(3, vec![vec![-1], vec![-2, -3]]);
    assert_eq!(preprocess(&formula), Simplified::Trivial(false));
}

#[test]
fn test_empty_formula_is_trivial() {
    assert_eq!(preprocess(&Formula::new(4, vec![])), Simplified::Trivial(true));
}

#[test]
fn test_empty_clause_is_conflict() {
    let formula = Formula::new(2, vec![vec![1, 2], vec![]]);
    assert_eq!(trivial_case(&formula), None);
    assert_eq!(preprocess(&formula), Simplified::Conflict);
}

#[test]
fn test_conflicting_units() {
    let formula = Formula::new(1, vec![vec![1], vec![-1]]);
    assert_eq!(preprocess(&formula), Simplified::Conflict);
}

#[test]
fn test_unit_chain() {
    let formula = Formula::new(3, vec![vec![1], vec![-1, 2], vec![-2, 3], vec![1, 2, -3]]);
    match preprocess(&formula) {
        Simplified::Reduced(reduction) => {
            assert_eq!(reduction.forced, vec![Some(true); 3]);
            assert!(reduction.formula.clauses.is_empty());
            assert_eq!(reduction.formula.num_variables, 3);
            assert_eq!(reduction.stats.unit_propagations, 3);
            assert_eq!(reduction.stats.remaining_clauses, 0);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_unit_propagate_strips_negations() {
    let mut clauses = vec![vec![-2], vec![1, 2, 3, 4], vec![2, -3]];
    let mut forced = vec![None; 4];
    assert_eq!(unit_propagate(&mut clauses, &mut forced), Ok(2));
    assert_eq!(forced, vec![None, Some(false), Some(false), None]);
    assert_eq!(clauses, vec![vec![1, 4]]);
}

#[test]
fn test_pure_literals() {
    let mut clauses = vec![vec![1, -2], vec![1, 3], vec![-2, -3], vec![2, 3]];
    let mut forced = vec![None; 4];
    assert_eq!(eliminate_pure_literals(&mut clauses, &mut forced), 1);
    assert_eq!(forced, vec![Some(true), None, None, Some(false)]);
    assert_eq!(clauses, vec![vec![-2, -3], vec![2, 3]]);
}

#[test]
fn test_forced_variables_leave_the_formula() {
    let formula = Formula::new(4, vec![vec![1], vec![-1, 2, 3], vec![-2, 4], vec![2, -4], vec![-3, -4]]);
    if let Simplified::Reduced(reduction) = preprocess(&formula) {
        for &literal in reduction.formula.clauses.iter().flatten() {
            assert!(reduction.forced[literal.unsigned_abs() as usize - 1].is_none());
        }
        assert_eq!(reduction.forced.len(), 4);
    } else {
        panic!("expected a reduced formula");
    }
}

#[test]
fn test_preprocessing_soundness() {
    let num_variables = 5;
    for seed in 0..300 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let formula = random_formula(&mut rng, num_variables);
        let satisfiable = assignments(num_variables).any(|a| satisfies(&formula, &a));

        match preprocess(&formula) {
            Simplified::Trivial(polarity) => {
                assert!(satisfies(&formula, &vec![polarity; num_variables]), "seed {}", seed)
            }
            Simplified::Conflict => assert!(!satisfiable, "seed {}", seed),
            Simplified::Reduced(reduction) => {
                assert!(reduction.stats.unit_propagations <= formula.num_clauses());
                let extensions: Vec<Vec<bool>> = assignments(num_variables)
                    .filter(|a| {
                        a.iter()
                            .zip(&reduction.forced)
                            .all(|(value, forced)| forced.map_or(true, |f| f == *value))
                    })
                    .collect();
                let reduced_satisfiable = extensions.iter().any(|a| satisfies(&reduction.formula, a));
                assert_eq!(reduced_satisfiable, satisfiable, "seed {}", seed);
                for a in extensions.iter().filter(|a| satisfies(&reduction.formula, a)) {
                    assert!(satisfies(&formula, a), "seed {}", seed);
                }
            }
        }
    }
}
