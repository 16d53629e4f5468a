pub mod dimacs;
pub mod satisfiability;
pub use satisfiability::{Formula, Solution, MAX_VARIABLES};
