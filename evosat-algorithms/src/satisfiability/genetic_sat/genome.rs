use super::fitness;
use evosat_challenges::Formula;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    #[default]
    Discrete,
    Continuous,
}

/// One slot of a genome. `bool` is the discrete domain, `f64` in `[0, 1]`
/// the continuous one.
pub trait Allele: Copy + PartialEq + Debug {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self;
    fn from_truth(value: bool) -> Self;
    fn truth(self) -> bool;
    /// Degree of truth in `[0, 1]`.
    fn degree(self) -> f64;

    fn flipped(self) -> Self {
        Self::from_truth(!self.truth())
    }
}

impl Allele for bool {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.gen()
    }

    fn from_truth(value: bool) -> Self {
        value
    }

    fn truth(self) -> bool {
        self
    }

    fn degree(self) -> f64 {
        if self {
            1.0
        } else {
            0.0
        }
    }
}

impl Allele for f64 {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.gen::<f64>()
    }

    fn from_truth(value: bool) -> Self {
        if value {
            1.0
        } else {
            0.0
        }
    }

    fn truth(self) -> bool {
        self >= 0.5
    }

    fn degree(self) -> f64 {
        self.clamp(0.0, 1.0)
    }
}

pub type Genome<A> = Vec<A>;

#[derive(Clone, Debug, PartialEq)]
pub struct Individual<A> {
    pub genome: Genome<A>,
    pub fitness: usize,
}

impl<A: Allele> Individual<A> {
    pub fn new(genome: Genome<A>, formula: &Formula) -> Self {
        let fitness = fitness::count_satisfied(formula, &genome);
        Self { genome, fitness }
    }
}

/// Overwrites every forced slot with its fixed value.
pub fn clamp<A: Allele>(genome: &mut [A], forced: &[Option<bool>]) {
    for (slot, value) in genome.iter_mut().zip(forced) {
        if let Some(value) = value {
            *slot = A::from_truth(*value);
        }
    }
}

pub fn create_population<A: Allele, R: Rng + ?Sized>(
    num_variables: usize,
    forced: &[Option<bool>],
    size: usize,
    rng: &mut R,
) -> Vec<Genome<A>> {
    (0..size)
        .map(|_| {
            let mut genome: Genome<A> = (0..num_variables).map(|_| A::random(rng)).collect();
            clamp(&mut genome, forced);
            genome
        })
        .collect()
}

pub fn decode<A: Allele>(genome: &[A]) -> Vec<bool> {
    genome.iter().map(|&allele| allele.truth()).collect()
}
