use super::genome::{Allele, Genome, Individual};
use rand::Rng;

/// Number of individuals a rate covers in a population of `len`, rounded down.
pub fn quota(len: usize, rate: f64) -> usize {
    ((len as f64) * rate).floor() as usize
}

/// Roulette-wheel sampling of `count` indices, proportional to `weights` and
/// without replacement. An exhausted pool is refilled with every index. A pool
/// whose total weight is zero is sampled uniformly.
pub fn roulette<R: Rng + ?Sized>(weights: &[usize], count: usize, rng: &mut R) -> Vec<usize> {
    let mut picked = Vec::with_capacity(count);
    if weights.is_empty() {
        return picked;
    }

    let mut pool: Vec<usize> = Vec::new();
    while picked.len() < count {
        if pool.is_empty() {
            pool.extend(0..weights.len());
        }
        let total: usize = pool.iter().map(|&idx| weights[idx]).sum();
        let pos = if total == 0 {
            rng.gen_range(0..pool.len())
        } else {
            let draw = rng.gen_range(0..total);
            let mut cumulative = 0;
            pool.iter()
                .position(|&idx| {
                    cumulative += weights[idx];
                    draw < cumulative
                })
                .unwrap_or(pool.len() - 1)
        };
        picked.push(pool.remove(pos));
    }
    picked
}

/// Fitness-proportional choice of `quota(population.len(), replacement_rate)` parents.
pub fn select<A: Allele, R: Rng + ?Sized>(
    population: &[Individual<A>],
    replacement_rate: f64,
    rng: &mut R,
) -> Vec<Genome<A>> {
    let weights: Vec<usize> = population.iter().map(|ind| ind.fitness).collect();
    roulette(&weights, quota(population.len(), replacement_rate), rng)
        .into_iter()
        .map(|idx| population[idx].genome.clone())
        .collect()
}
