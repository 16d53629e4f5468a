//! Random perturbation and single-flip hill climbing over a population.

use super::fitness::count_satisfied;
use super::genome::{Allele, Genome};
use evosat_challenges::Formula;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mutation {
    #[default]
    SingleBitFlip,
    MultipleBitFlip,
    GreedySingleBit,
    GreedyMaxSingleBit,
    MultiBitGreedy,
    FlipGa,
}

impl Mutation {
    pub fn apply<A: Allele, R: Rng + ?Sized>(
        self,
        population: &mut [Genome<A>],
        formula: &Formula,
        mutation_rate: f64,
        rng: &mut R,
    ) {
        match self {
            Mutation::SingleBitFlip => single_bit_flip(population, mutation_rate, rng),
            Mutation::MultipleBitFlip => multiple_bit_flip(population, mutation_rate, rng),
            Mutation::GreedySingleBit => population
                .iter_mut()
                .for_each(|genome| greedy_single_bit(genome, formula)),
            Mutation::GreedyMaxSingleBit => population
                .iter_mut()
                .for_each(|genome| greedy_max_single_bit(genome, formula)),
            Mutation::MultiBitGreedy => population.iter_mut().for_each(|genome| {
                multi_bit_greedy(genome, formula);
            }),
            Mutation::FlipGa => population
                .iter_mut()
                .for_each(|genome| flip_ga(genome, formula)),
        }
    }
}

#[inline]
pub fn flip<A: Allele>(genome: &mut [A], idx: usize) {
    genome[idx] = genome[idx].flipped();
}

/// With probability `mutation_rate`, flips one random slot of each genome.
pub fn single_bit_flip<A: Allele, R: Rng + ?Sized>(
    population: &mut [Genome<A>],
    mutation_rate: f64,
    rng: &mut R,
) {
    for genome in population.iter_mut() {
        if genome.is_empty() || !rng.gen_bool(mutation_rate) {
            continue;
        }
        let idx = rng.gen_range(0..genome.len());
        flip(genome, idx);
    }
}

/// With probability `mutation_rate`, flips a random number of random slots
/// (possibly the same slot more than once) of each genome.
pub fn multiple_bit_flip<A: Allele, R: Rng + ?Sized>(
    population: &mut [Genome<A>],
    mutation_rate: f64,
    rng: &mut R,
) {
    for genome in population.iter_mut() {
        if genome.is_empty() || !rng.gen_bool(mutation_rate) {
            continue;
        }
        let num_flips = rng.gen_range(0..genome.len());
        for _ in 0..num_flips {
            let idx = rng.gen_range(0..genome.len());
            flip(genome, idx);
        }
    }
}

/// Fitness after flipping `idx`, leaving the genome as it was.
pub fn fitness_with_flip<A: Allele>(genome: &mut [A], idx: usize, formula: &Formula) -> usize {
    let original = genome[idx];
    genome[idx] = original.flipped();
    let fitness = count_satisfied(formula, genome);
    genome[idx] = original;
    fitness
}

/// First improvement: applies the first flip, in slot order, that raises fitness.
pub fn greedy_single_bit<A: Allele>(genome: &mut [A], formula: &Formula) {
    let fitness = count_satisfied(formula, genome);
    if let Some(idx) = (0..genome.len()).find(|&idx| fitness_with_flip(genome, idx, formula) > fitness) {
        flip(genome, idx);
    }
}

/// Best improvement: applies the single flip with the highest fitness, the
/// later slot winning ties. Leaves the genome alone at a local optimum.
pub fn greedy_max_single_bit<A: Allele>(genome: &mut [A], formula: &Formula) {
    let fitness = count_satisfied(formula, genome);
    let mut best: Option<(usize, usize)> = None;
    for idx in 0..genome.len() {
        let candidate = fitness_with_flip(genome, idx, formula);
        if candidate > fitness && best.map_or(true, |(best_fitness, _)| candidate >= best_fitness) {
            best = Some((candidate, idx));
        }
    }
    if let Some((_, idx)) = best {
        flip(genome, idx);
    }
}

/// One left-to-right sweep keeping every flip that improves the running
/// fitness. Returns whether anything was kept.
pub fn multi_bit_greedy<A: Allele>(genome: &mut [A], formula: &Formula) -> bool {
    let mut fitness = count_satisfied(formula, genome);
    let mut improved = false;
    for idx in 0..genome.len() {
        let candidate = fitness_with_flip(genome, idx, formula);
        if candidate > fitness {
            flip(genome, idx);
            fitness = candidate;
            improved = true;
        }
    }
    improved
}

/// Repeats `multi_bit_greedy` sweeps until one makes no progress.
pub fn flip_ga<A: Allele>(genome: &mut [A], formula: &Formula) {
    while multi_bit_greedy(genome, formula) {}
}
