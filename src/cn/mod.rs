//! Copy-number estimation: picks the combination of gene configurations
//! whose main-gene and pseudogene copy numbers best explain the observed
//! region coverage.

mod assemble;
mod error;
mod filter;
mod model;
mod region_coverage;
mod structures;
mod user;

pub use assemble::assemble_solutions;
pub use error::CnError;
pub use filter::filter_configs;
pub use model::{CnModel, CnOptimum, Selection};
pub use region_coverage::{log_coverage, max_observed_cn, region_coverage, RegionCoverage};
pub use structures::{expand_structures, Structure, StructureId, Structures};
pub use user::parse_user_solution;

use crate::coverage::Coverage;
use crate::gene::{CnConfig, Gene};
use crate::solutions::{allele_sort_key, CnSolution};
use crate::solver::{create_solver, emit_lp, SolverBackend, SolverKind};
use itertools::Itertools;
use std::collections::BTreeMap;

/// Highest copy number considered for a single configuration; scales down the
/// mutation threshold of the configuration filter.
pub const MAX_CN: f64 = 20.0;

/// Weights and bounds of the copy-number model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CnParams {
    /// Added to the objective for every selected left-fusion structure.
    pub left_fusion_penalty: f64,
    /// Weight of the PCE region error relative to the other regions.
    pub pce_penalty_coeff: f64,
    /// Bound on the absolute error of each region.
    pub max_cn_error: f64,
    /// Added to the objective for every selected structure.
    pub parsimony_penalty: f64,
}

impl Default for CnParams {
    fn default() -> Self {
        Self {
            left_fusion_penalty: 0.1,
            pce_penalty_coeff: 1.5,
            max_cn_error: 10.0,
            parsimony_penalty: 0.5,
        }
    }
}

/// Estimates the copy-number configurations of a sample. Returns the user
/// solution when one is given, otherwise every optimal solution of the model
/// (a single +inf sentinel if the model is infeasible).
pub fn estimate_cn<'a>(
    gene: &'a Gene,
    coverage: &Coverage,
    solver: SolverKind,
    user_solution: Option<&[String]>,
    params: &CnParams,
) -> Result<Vec<CnSolution<'a>>, CnError> {
    if let Some(names) = user_solution {
        return Ok(vec![parse_user_solution(gene, names)?]);
    }

    let configs = filter_configs(gene, coverage);
    let max_cn = max_observed_cn(gene, coverage);
    log_coverage(gene, coverage);
    let region_cov = region_coverage(gene, coverage);
    let backend = create_solver(solver);
    solve_cn_model(
        gene,
        &configs,
        max_cn,
        &region_cov,
        backend.as_ref(),
        params,
    )
}

/// Solves the copy-number model over `configs` and returns all tied optima.
pub fn solve_cn_model<'a>(
    gene: &'a Gene,
    configs: &BTreeMap<String, CnConfig>,
    max_cn: i32,
    region_cov: &RegionCoverage,
    backend: &dyn SolverBackend,
    params: &CnParams,
) -> Result<Vec<CnSolution<'a>>, CnError> {
    log::debug!("Maximum CN = {}", max_cn);
    log::debug!(
        "Possible candidates: {}",
        configs
            .keys()
            .sorted_by_cached_key(|name| allele_sort_key(name))
            .map(|name| format!("*{}", name))
            .join(", ")
    );

    let structures = expand_structures(configs, max_cn);
    let model = CnModel::build(&structures, region_cov, params);
    if log::log_enabled!(log::Level::Trace) {
        log::trace!("CN model:\n{}", emit_lp(model.model(), model.objective()));
    }

    match model.solve(backend)? {
        Some(optimum) => assemble_solutions(gene, &structures, &optimum),
        None => {
            log::debug!("No copy-number configuration fits the coverage of {}", gene.name);
            Ok(vec![CnSolution::infeasible(gene)])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gene::{CnConfigKind, CnVector, GeneRegion, Mutation, RegionSpan};
    use rand::{rng, seq::SliceRandom};

    fn e(n: u32) -> GeneRegion {
        GeneRegion::new(n, "e")
    }

    fn vector(main: [i32; 3], pseudo: [i32; 3]) -> CnVector {
        let side = |cn: [i32; 3]| -> BTreeMap<GeneRegion, i32> { (1..=3).map(e).zip(cn).collect() };
        BTreeMap::from([(0, side(main)), (1, side(pseudo))])
    }

    fn catalog() -> Vec<(&'static str, CnConfig)> {
        vec![
            ("1", CnConfig::new(CnConfigKind::Normal, vector([1, 1, 1], [1, 1, 1]))),
            ("5", CnConfig::new(CnConfigKind::Deletion, vector([0, 0, 0], [1, 1, 1]))),
            (
                "68",
                CnConfig::new(CnConfigKind::LeftFusion, vector([0, 1, 1], [1, 1, 1])),
            ),
            (
                "4",
                CnConfig::new(CnConfigKind::Normal, vector([1, 1, 1], [1, 1, 1]))
                    .with_mutations([Mutation::new(150, "G>A", true)]),
            ),
        ]
    }

    fn gene_from(configs: Vec<(&'static str, CnConfig)>) -> Gene {
        let mut gene = Gene {
            name: "CYP2D6".to_string(),
            unique_regions: (1..=3).map(e).collect(),
            ..Default::default()
        };
        for gene_copy in 0..2u64 {
            let regions = gene.regions.entry(gene_copy as usize).or_default();
            for n in 1..=3u64 {
                let start = gene_copy * 1000 + n * 100;
                let span = RegionSpan::new(start, start + 100).unwrap();
                regions.insert(e(n as u32), span);
            }
        }
        for (name, config) in configs {
            gene.cn_configs.insert(name.to_string(), config);
        }
        gene
    }

    fn gene() -> Gene {
        gene_from(catalog())
    }

    fn coverage(main: f64, pseudo: f64) -> Coverage {
        let mut cov = Coverage::new(0.5);
        for n in 1..=3 {
            cov.set_region_coverage(0, e(n), main);
            cov.set_region_coverage(1, e(n), pseudo);
        }
        cov
    }

    fn estimate<'a>(gene: &'a Gene, cov: &Coverage) -> Vec<CnSolution<'a>> {
        estimate_cn(gene, cov, SolverKind::Microlp, None, &CnParams::default()).unwrap()
    }

    fn counts(solution: &CnSolution) -> Vec<(String, usize)> {
        solution
            .solution()
            .iter()
            .map(|(name, count)| (name.clone(), *count))
            .collect()
    }

    #[test]
    fn two_normal_copies() {
        let gene = gene();
        let solutions = estimate(&gene, &coverage(2.0, 2.0));
        assert_eq!(solutions.len(), 1);
        assert!((solutions[0].score() - 1.0).abs() < 1e-9);
        assert_eq!(counts(&solutions[0]), vec![("1".to_string(), 2)]);
        assert_eq!(solutions[0].region_cn()[&0][&e(2)], 2);
        assert_eq!(solutions[0].region_cn()[&1][&e(2)], 2);
    }

    #[test]
    fn duplication_uses_weak_copy() {
        let gene = gene();
        let solutions = estimate(&gene, &coverage(3.0, 2.0));
        assert_eq!(solutions.len(), 1);
        assert!((solutions[0].score() - 1.5).abs() < 1e-9);
        assert_eq!(counts(&solutions[0]), vec![("1".to_string(), 3)]);
        assert_eq!(solutions[0].region_cn()[&0][&e(1)], 3);
        assert_eq!(solutions[0].region_cn()[&1][&e(1)], 2);
    }

    #[test]
    fn deletion() {
        let gene = gene();
        let solutions = estimate(&gene, &coverage(1.0, 2.0));
        assert_eq!(solutions.len(), 1);
        assert!((solutions[0].score() - 1.0).abs() < 1e-9);
        assert_eq!(
            counts(&solutions[0]),
            vec![("1".to_string(), 1), ("5".to_string(), 1)]
        );
        assert_eq!(solutions[0].region_cn()[&0][&e(3)], 1);
        assert_eq!(solutions[0].region_cn()[&1][&e(3)], 2);
        assert_eq!(solutions[0].position_cn(1350), 2);
    }

    #[test]
    fn supported_configs_tie() {
        let gene = gene();
        let mut cov = coverage(2.0, 2.0);
        cov.add_mutation_coverage(150, "G>A", 10.0);
        cov.add_mutation_coverage(150, "_", 10.0);

        let solutions = estimate(&gene, &cov);
        let mut found: Vec<_> = solutions.iter().map(counts).collect();
        found.sort();
        assert_eq!(
            found,
            vec![
                vec![("1".to_string(), 1), ("4".to_string(), 1)],
                vec![("1".to_string(), 2)],
                vec![("4".to_string(), 2)],
            ]
        );
        assert!(solutions.iter().all(|s| (s.score() - 1.0).abs() < 1e-9));
    }

    #[test]
    fn every_tied_pair_returned() {
        let names = ["1", "2", "3", "4", "5", "6"];
        let normal = || CnConfig::new(CnConfigKind::Normal, vector([1, 1, 1], [1, 1, 1]));
        let gene = gene_from(names.iter().map(|n| (*n, normal())).collect());

        let solutions = estimate(&gene, &coverage(2.0, 2.0));
        // Two copies of one configuration or one copy each of two
        assert_eq!(solutions.len(), 21);
        let distinct: std::collections::BTreeSet<_> = solutions.iter().map(counts).collect();
        assert_eq!(distinct.len(), 21);
        assert!(solutions.iter().all(|s| (s.score() - 1.0).abs() < 1e-9));
    }

    #[test]
    fn infeasible_gives_sentinel() {
        let gene = gene_from(vec![catalog().swap_remove(1)]);
        let solutions = estimate(&gene, &coverage(15.0, 2.0));
        assert_eq!(solutions.len(), 1);
        assert!(solutions[0].is_infeasible());
        assert!(solutions[0].solution().is_empty());
        assert!(solutions[0].region_cn().is_empty());
    }

    #[test]
    fn repeated_runs_agree() {
        let mut shuffled = catalog();
        shuffled.shuffle(&mut rng());
        let (a, b) = (gene(), gene_from(shuffled));
        let mut cov = coverage(2.0, 2.0);
        cov.add_mutation_coverage(150, "G>A", 10.0);

        fn sorted(solutions: Vec<CnSolution>) -> Vec<String> {
            solutions.iter().map(|s| s.to_string()).sorted().collect()
        }
        let first = sorted(estimate(&a, &cov));
        assert_eq!(first, sorted(estimate(&a, &cov)));
        assert_eq!(first, sorted(estimate(&b, &cov)));
    }

    #[test]
    fn user_solution_skips_solver() {
        let gene = gene();
        let names = vec!["1".to_string(), "5".to_string()];
        let solutions = estimate_cn(
            &gene,
            &coverage(9.0, 0.0),
            SolverKind::Microlp,
            Some(names.as_slice()),
            &CnParams::default(),
        )
        .unwrap();
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].score(), 0.0);
        assert_eq!(solutions[0].region_cn()[&1][&e(1)], 2);

        let names = vec!["*1".to_string()];
        let err = estimate_cn(
            &gene,
            &coverage(2.0, 2.0),
            SolverKind::Microlp,
            Some(names.as_slice()),
            &CnParams::default(),
        )
        .unwrap_err();
        assert_eq!(err, CnError::UnknownConfiguration("*1".to_string()));
    }
}
