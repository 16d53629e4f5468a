pub mod genetic_sat;
