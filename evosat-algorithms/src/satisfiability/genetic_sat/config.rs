use super::crossover::Crossover;
use super::genome::Domain;
use super::mutation::Mutation;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub population_size: usize,
    pub max_generations: usize,
    /// Share of the population drawn as parents, and kept as elites.
    pub replacement_rate: f64,
    pub mutation_rate: f64,
    /// Window length of the sliding-window crossover, as a share of the genome.
    pub window_fraction: f64,
    pub domain: Domain,
    pub crossover: Crossover,
    pub mutation: Mutation,
    /// Generations between two progress traces.
    pub trace_interval: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            population_size: 500,
            max_generations: 1000,
            replacement_rate: 0.5,
            mutation_rate: 0.1,
            window_fraction: 0.4,
            domain: Domain::Discrete,
            crossover: Crossover::SinglePoint,
            mutation: Mutation::SingleBitFlip,
            trace_interval: 1,
        }
    }
}

impl Config {
    /// Overlays the given hyperparameters onto the defaults.
    pub fn initialize(hyperparameters: &Option<Map<String, Value>>) -> Result<Self> {
        let mut merged_params = serde_json::to_value(Self::default())?;
        if let (Value::Object(ref mut obj), Some(map)) = (&mut merged_params, hyperparameters) {
            for (k, v) in map {
                obj.insert(k.clone(), v.clone());
            }
        }

        let params: Self = serde_json::from_value(merged_params)
            .map_err(|e| anyhow!("Invalid hyperparameters: {}", e))?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(anyhow!(
                "population_size must be at least 2, got {}",
                self.population_size
            ));
        }
        for (name, value) in [
            ("replacement_rate", self.replacement_rate),
            ("mutation_rate", self.mutation_rate),
            ("window_fraction", self.window_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(anyhow!("{} must lie in [0, 1], got {}", name, value));
            }
        }
        if self.trace_interval == 0 {
            return Err(anyhow!("trace_interval must be positive"));
        }
        Ok(())
    }
}
