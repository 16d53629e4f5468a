use anyhow::{anyhow, Result};
use ndarray::{Array2, Axis};
use rand::{
    distributions::{Distribution, Uniform},
    rngs::{SmallRng, StdRng},
    Rng, SeedableRng,
};
use serde::{
    de::{self, SeqAccess, Visitor},
    ser::SerializeSeq,
    Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::{from_value, Map, Value};

/// Largest variable index a literal can carry.
pub const MAX_VARIABLES: usize = i32::MAX as usize;

/// A boolean assignment, `variables[i]` holding the value of variable `i + 1`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Solution {
    #[serde(with = "bool_vec_as_u8")]
    pub variables: Vec<bool>,
}

impl TryFrom<Map<String, Value>> for Solution {
    type Error = serde_json::Error;

    fn try_from(v: Map<String, Value>) -> Result<Self, Self::Error> {
        from_value(Value::Object(v))
    }
}

/// A CNF formula: a conjunction of clauses, each a disjunction of signed
/// literals whose magnitude is a 1-based variable index.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Formula {
    pub num_variables: usize,
    pub clauses: Vec<Vec<i32>>,
}

impl Formula {
    pub fn new(num_variables: usize, clauses: Vec<Vec<i32>>) -> Self {
        Self {
            num_variables,
            clauses,
        }
    }

    /// Uniform random 3-SAT with `num_variables * percent / 100` clauses.
    pub fn generate_instance(
        seed: &[u8; 32],
        num_variables: usize,
        clauses_to_variables_percent: u32,
    ) -> Result<Self> {
        if num_variables == 0 || num_variables > MAX_VARIABLES {
            return Err(anyhow!(
                "Cannot generate an instance with {} variables",
                num_variables
            ));
        }
        let mut rng = SmallRng::from_seed(StdRng::from_seed(seed.clone()).gen());
        let num_clauses = (num_variables as f64 * clauses_to_variables_percent as f64 / 100.0)
            .floor() as usize;

        let var_distr = Uniform::new(1, num_variables as i32 + 1);
        let neg_distr = Uniform::new(0, 2);

        let clauses_array = Array2::from_shape_fn((num_clauses, 3), |_| var_distr.sample(&mut rng));
        let negations = Array2::from_shape_fn((num_clauses, 3), |_| {
            if neg_distr.sample(&mut rng) == 0 {
                -1
            } else {
                1
            }
        });
        let clauses_array = clauses_array * negations;

        let clauses = clauses_array
            .axis_iter(Axis(0))
            .map(|row| row.to_vec())
            .collect();

        Ok(Self {
            num_variables,
            clauses,
        })
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Fails on a variable count beyond what an `i32` literal can address, a
    /// `0` literal, or one whose variable lies outside `1..=num_variables`.
    pub fn validate(&self) -> Result<()> {
        if self.num_variables > MAX_VARIABLES {
            return Err(anyhow!(
                "Formula has {} variables, at most {} are supported",
                self.num_variables,
                MAX_VARIABLES
            ));
        }
        for (idx, clause) in self.clauses.iter().enumerate() {
            for &literal in clause {
                if literal == 0 {
                    return Err(anyhow!("Clause '{}' contains the literal 0", idx));
                }
                if literal.unsigned_abs() as usize > self.num_variables {
                    return Err(anyhow!(
                        "Clause '{}' references variable {} but the formula has {} variables",
                        idx,
                        literal.unsigned_abs(),
                        self.num_variables
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn count_satisfied(&self, variables: &[bool]) -> usize {
        self.clauses
            .iter()
            .filter(|clause| clause_satisfied(clause, variables))
            .count()
    }

    pub fn verify_solution(&self, solution: &Solution) -> Result<()> {
        if solution.variables.len() != self.num_variables {
            return Err(anyhow!(
                "Invalid number of variables. Expected: {}, Actual: {}",
                self.num_variables,
                solution.variables.len()
            ));
        }

        if let Some((idx, _)) = self
            .clauses
            .iter()
            .enumerate()
            .find(|(_, clause)| !clause_satisfied(clause, &solution.variables))
        {
            Err(anyhow!("Clause '{}' not satisfied", idx))
        } else {
            Ok(())
        }
    }
}

pub fn clause_satisfied(clause: &[i32], variables: &[bool]) -> bool {
    clause.iter().any(|&literal| {
        let var_value = variables[literal.unsigned_abs() as usize - 1];
        (literal > 0 && var_value) || (literal < 0 && !var_value)
    })
}

mod bool_vec_as_u8 {
    use super::*;
    use std::fmt;

    pub fn serialize<S>(data: &Vec<bool>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(data.len()))?;
        for &value in data {
            seq.serialize_element(&(if value { 1 } else { 0 }))?;
        }
        seq.end()
    }

    struct BoolVecVisitor;

    impl<'de> Visitor<'de> for BoolVecVisitor {
        type Value = Vec<bool>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a sequence of booleans or integers 0/1")
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(value) = seq.next_element::<serde_json::Value>()? {
                match value {
                    serde_json::Value::Number(n) if n.as_u64() == Some(1) => vec.push(true),
                    serde_json::Value::Number(n) if n.as_u64() == Some(0) => vec.push(false),
                    serde_json::Value::Bool(b) => vec.push(b),
                    _ => return Err(de::Error::custom("expected 0, 1, true, or false")),
                }
            }
            Ok(vec)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(BoolVecVisitor)
    }
}
