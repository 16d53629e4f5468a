use super::genome::Allele;
use evosat_challenges::Formula;

/// Contribution of a false literal to the relaxed score. Keeps a single false
/// clause from zeroing the whole product.
pub const EPSILON: f64 = 1e-6;

#[inline]
pub fn literal_satisfied<A: Allele>(literal: i32, genome: &[A]) -> bool {
    let value = genome[literal.unsigned_abs() as usize - 1].truth();
    (literal > 0) == value
}

/// Number of satisfied clauses, in `[0, num_clauses]`.
pub fn count_satisfied<A: Allele>(formula: &Formula, genome: &[A]) -> usize {
    formula
        .clauses
        .iter()
        .filter(|clause| clause.iter().any(|&literal| literal_satisfied(literal, genome)))
        .count()
}

#[inline]
pub fn is_solution(formula: &Formula, fitness: usize) -> bool {
    fitness >= formula.num_clauses()
}

/// Product over clauses of the summed literal truth degrees. A positive
/// literal contributes the slot's degree, a negative one its complement, and
/// anything below `EPSILON` is raised to it.
pub fn relaxed<A: Allele>(formula: &Formula, genome: &[A]) -> f64 {
    formula
        .clauses
        .iter()
        .map(|clause| {
            clause
                .iter()
                .map(|&literal| {
                    let degree = genome[literal.unsigned_abs() as usize - 1].degree();
                    let contribution = if literal > 0 { degree } else { 1.0 - degree };
                    contribution.max(EPSILON)
                })
                .sum::<f64>()
        })
        .product()
}
