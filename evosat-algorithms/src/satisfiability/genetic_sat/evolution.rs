use super::config::Config;
use super::fitness;
use super::genome::{clamp, create_population, Allele, Genome, Individual};
use super::selection::{quota, select};
use evosat_challenges::Formula;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum State {
    Initializing,
    Evaluating,
    Solved,
    Exhausted,
    Cancelled,
}

impl State {
    pub fn is_terminal(self) -> bool {
        matches!(self, State::Solved | State::Exhausted | State::Cancelled)
    }
}

#[derive(Debug, Clone)]
pub struct Outcome<A> {
    pub state: State,
    /// Fittest individual seen over the whole run.
    pub best: Option<Individual<A>>,
    pub generations: usize,
}

/// Generational loop over a preprocessed formula. Genomes span every variable;
/// the forced ones are clamped after each mutation step.
pub struct Evolution<'a> {
    pub formula: &'a Formula,
    pub forced: &'a [Option<bool>],
    pub params: &'a Config,
}

impl<'a> Evolution<'a> {
    pub fn new(formula: &'a Formula, forced: &'a [Option<bool>], params: &'a Config) -> Self {
        Self {
            formula,
            forced,
            params,
        }
    }

    pub fn run<A: Allele>(&self, rng: &mut SmallRng, cancel: Option<&AtomicBool>) -> Outcome<A> {
        let mut state = State::Initializing;
        let mut population: Vec<Genome<A>> = Vec::new();
        let mut best: Option<Individual<A>> = None;
        let mut generation = 0;

        while !state.is_terminal() {
            state = match state {
                State::Initializing => {
                    population = create_population(
                        self.formula.num_variables,
                        self.forced,
                        self.params.population_size,
                        rng,
                    );
                    State::Evaluating
                }
                State::Evaluating => {
                    let evaluated: Vec<Individual<A>> = population
                        .drain(..)
                        .map(|genome| Individual::new(genome, self.formula))
                        .collect();

                    let leader = evaluated.iter().max_by_key(|ind| ind.fitness);
                    let max_fitness = leader.map_or(0, |ind| ind.fitness);
                    if let Some(leader) = leader {
                        if best.as_ref().map_or(true, |b| leader.fitness > b.fitness) {
                            best = Some(leader.clone());
                        }
                    }
                    if generation % self.params.trace_interval == 0 {
                        debug!(
                            generation,
                            population = evaluated.len(),
                            max_fitness,
                            "generation evaluated"
                        );
                    }

                    let solved = leader.is_some() && fitness::is_solution(self.formula, max_fitness);
                    if solved {
                        State::Solved
                    } else if generation >= self.params.max_generations {
                        State::Exhausted
                    } else if cancel.map_or(false, |flag| flag.load(Ordering::Relaxed)) {
                        State::Cancelled
                    } else {
                        population = self.breed(evaluated, rng);
                        generation += 1;
                        State::Evaluating
                    }
                }
                terminal => terminal,
            };
        }

        info!(
            ?state,
            generations = generation,
            best_fitness = best.as_ref().map_or(0, |b| b.fitness),
            num_clauses = self.formula.num_clauses(),
            "evolution finished"
        );
        Outcome {
            state,
            best,
            generations: generation,
        }
    }

    /// Children of roulette-selected parents plus the elites of `evaluated`,
    /// mutated and clamped. Elites come first so truncation to the population
    /// size never drops them; a shortfall is filled by the next ranked
    /// individuals.
    pub fn breed<A: Allele>(&self, mut evaluated: Vec<Individual<A>>, rng: &mut SmallRng) -> Vec<Genome<A>> {
        let size = self.params.population_size;

        let mut parents = select(&evaluated, self.params.replacement_rate, rng);
        parents.shuffle(rng);
        let mut children = Vec::with_capacity(parents.len());
        for pair in parents.chunks_exact(2) {
            let (child1, child2) = self.params.crossover.apply(
                &pair[0],
                &pair[1],
                self.formula,
                self.params.window_fraction,
                rng,
            );
            children.push(child1);
            children.push(child2);
        }

        evaluated.sort_by(|a, b| b.fitness.cmp(&a.fitness));
        let num_elites = quota(evaluated.len(), self.params.replacement_rate);
        let mut ranked = evaluated.into_iter().map(|ind| ind.genome);

        let mut next: Vec<Genome<A>> = Vec::with_capacity(size);
        next.extend(ranked.by_ref().take(num_elites));
        next.extend(children);
        next.truncate(size);
        let missing = size - next.len();
        next.extend(ranked.take(missing));

        self.params
            .mutation
            .apply(&mut next, self.formula, self.params.mutation_rate, rng);
        for genome in next.iter_mut() {
            clamp(genome, self.forced);
        }
        next
    }
}
