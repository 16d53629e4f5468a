//! DIMACS CNF reading and writing.
//!
//! Comment lines start with `c`, the header is `p cnf <variables> <clauses>`,
//! and literals are whitespace separated with `0` closing each clause. Clauses
//! may span lines. A `%` token ends the body, as in the SATLIB benchmark files.

use crate::satisfiability::Formula;
use anyhow::{anyhow, Result};
use std::{fs, path::Path};

impl Formula {
    pub fn from_dimacs(input: &str) -> Result<Self> {
        let mut header: Option<(usize, usize)> = None;
        let mut clauses: Vec<Vec<i32>> = Vec::new();
        let mut clause: Vec<i32> = Vec::new();

        'lines: for (line_no, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('c') {
                continue;
            }

            if line.starts_with('p') {
                if header.is_some() {
                    return Err(anyhow!("Duplicate header on line {}", line_no + 1));
                }
                header = Some(parse_header(line)?);
                continue;
            }

            if header.is_none() {
                return Err(anyhow!("Clause data before 'p cnf' header on line {}", line_no + 1));
            }

            for token in line.split_whitespace() {
                if token == "%" {
                    break 'lines;
                }
                let literal: i32 = token
                    .parse()
                    .map_err(|_| anyhow!("Invalid literal '{}' on line {}", token, line_no + 1))?;
                if literal == 0 {
                    clauses.push(std::mem::take(&mut clause));
                } else {
                    clause.push(literal);
                }
            }
        }

        let (num_variables, num_clauses) = header.ok_or_else(|| anyhow!("Missing 'p cnf' header"))?;
        if !clause.is_empty() {
            clauses.push(clause);
        }
        if clauses.len() != num_clauses {
            return Err(anyhow!(
                "Header declares {} clauses but {} were read",
                num_clauses,
                clauses.len()
            ));
        }

        let formula = Formula::new(num_variables, clauses);
        formula.validate()?;
        Ok(formula)
    }

    pub fn from_dimacs_file(path: &Path) -> Result<Self> {
        let input = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read '{}': {}", path.display(), e))?;
        Self::from_dimacs(&input)
    }

    pub fn to_dimacs(&self) -> String {
        let mut out = format!("p cnf {} {}\n", self.num_variables, self.clauses.len());
        for clause in &self.clauses {
            for literal in clause {
                out.push_str(&format!("{} ", literal));
            }
            out.push_str("0\n");
        }
        out
    }
}

fn parse_header(line: &str) -> Result<(usize, usize)> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts[..] {
        ["p", "cnf", vars, clauses] => {
            let vars = vars
                .parse()
                .map_err(|_| anyhow!("Invalid variable count '{}'", vars))?;
            let clauses = clauses
                .parse()
                .map_err(|_| anyhow!("Invalid clause count '{}'", clauses))?;
            Ok((vars, clauses))
        }
        _ => Err(anyhow!("Malformed header '{}'", line)),
    }
}
