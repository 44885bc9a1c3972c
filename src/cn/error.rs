use crate::gene::GeneRegion;
use crate::solver::SolverError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CnError {
    #[error(
        "Given copy number solution contains unknown copy number configuration {0}. \
         Please run 'paracn configs' for the list of valid configurations"
    )]
    UnknownConfiguration(String),
    #[error("Negative copy number {cn} for region {region} of gene copy {gene_copy}")]
    NegativeCopyNumber {
        gene_copy: usize,
        region: GeneRegion,
        cn: i32,
    },
    #[error("Invalid solution score: {0}")]
    InvalidScore(f64),
    #[error("Copy number solver failed: {0}")]
    Solver(#[from] SolverError),
}

impl From<CnError> for String {
    fn from(e: CnError) -> String {
        e.to_string()
    }
}
