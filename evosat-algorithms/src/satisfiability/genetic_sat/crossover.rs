//! Recombination operators. Each takes two parents of equal length and
//! returns two children of that length built only from the parents' alleles.

use super::fitness::count_satisfied;
use super::genome::Allele;
use evosat_challenges::Formula;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Crossover {
    #[default]
    SinglePoint,
    TwoPoint,
    SlidingWindow,
    RandomMap,
    Uniform,
}

impl Crossover {
    pub fn apply<A: Allele, R: Rng + ?Sized>(
        self,
        parent1: &[A],
        parent2: &[A],
        formula: &Formula,
        window_fraction: f64,
        rng: &mut R,
    ) -> (Vec<A>, Vec<A>) {
        match self {
            Crossover::SinglePoint => single_point(parent1, parent2, rng),
            Crossover::TwoPoint => two_point(parent1, parent2, rng),
            Crossover::SlidingWindow => sliding_window(parent1, parent2, window_fraction, formula),
            Crossover::RandomMap => random_map(parent1, parent2, rng),
            Crossover::Uniform => uniform(parent1, parent2),
        }
    }
}

/// Children that take `start..end` from the other parent.
pub fn swap_segment<T: Copy>(parent1: &[T], parent2: &[T], start: usize, end: usize) -> (Vec<T>, Vec<T>) {
    let mut child1 = parent1.to_vec();
    let mut child2 = parent2.to_vec();
    child1[start..end].copy_from_slice(&parent2[start..end]);
    child2[start..end].copy_from_slice(&parent1[start..end]);
    (child1, child2)
}

pub fn single_point<T: Copy, R: Rng + ?Sized>(parent1: &[T], parent2: &[T], rng: &mut R) -> (Vec<T>, Vec<T>) {
    let len = parent1.len();
    if len < 2 {
        return (parent1.to_vec(), parent2.to_vec());
    }
    let cut = rng.gen_range(1..len);
    swap_segment(parent1, parent2, cut, len)
}

pub fn two_point<T: Copy, R: Rng + ?Sized>(parent1: &[T], parent2: &[T], rng: &mut R) -> (Vec<T>, Vec<T>) {
    let len = parent1.len();
    if len < 2 {
        return (parent1.to_vec(), parent2.to_vec());
    }
    let cut1 = rng.gen_range(0..len - 1);
    let cut2 = rng.gen_range(cut1 + 1..len);
    swap_segment(parent1, parent2, cut1, cut2)
}

/// Slides a window of `window_fraction * len` slots over every position and
/// keeps, for each child independently, the swap with the most satisfied
/// clauses. Ties go to the later position.
pub fn sliding_window<A: Allele>(
    parent1: &[A],
    parent2: &[A],
    window_fraction: f64,
    formula: &Formula,
) -> (Vec<A>, Vec<A>) {
    let len = parent1.len();
    let window = (((len as f64) * window_fraction).floor() as usize).min(len);

    let mut best = [(0usize, 0usize); 2];
    for start in 0..=(len - window) {
        let (child1, child2) = swap_segment(parent1, parent2, start, start + window);
        for (slot, child) in [child1, child2].iter().enumerate() {
            let fitness = count_satisfied(formula, child);
            if fitness >= best[slot].0 {
                best[slot] = (fitness, start);
            }
        }
    }

    let (child1, _) = swap_segment(parent1, parent2, best[0].1, best[0].1 + window);
    let (_, child2) = swap_segment(parent1, parent2, best[1].1, best[1].1 + window);
    (child1, child2)
}

/// Uniform crossover with a fresh random mask; alleles swap where the mask is unset.
pub fn random_map<T: Copy, R: Rng + ?Sized>(parent1: &[T], parent2: &[T], rng: &mut R) -> (Vec<T>, Vec<T>) {
    let mut child1 = parent1.to_vec();
    let mut child2 = parent2.to_vec();
    for idx in 0..parent1.len() {
        if !rng.gen::<bool>() {
            child1[idx] = parent2[idx];
            child2[idx] = parent1[idx];
        }
    }
    (child1, child2)
}

/// Swaps the alleles at even indices.
pub fn uniform<T: Copy>(parent1: &[T], parent2: &[T]) -> (Vec<T>, Vec<T>) {
    let mut child1 = parent1.to_vec();
    let mut child2 = parent2.to_vec();
    for idx in (0..parent1.len()).step_by(2) {
        child1[idx] = parent2[idx];
        child2[idx] = parent1[idx];
    }
    (child1, child2)
}
