pub mod cli;
pub mod cn;
pub mod commands;
pub mod coverage;
pub mod gene;
pub mod solutions;
pub mod solver;
pub mod utils;
