use super::format_cn;
use crate::cli::EstimateArgs;
use crate::cn::{estimate_cn, CnParams};
use crate::coverage::Coverage;
use crate::gene::Gene;
use crate::solutions::{allele_sort_key, CnSolution};
use crate::utils::Result;
use itertools::Itertools;

pub fn estimate(args: EstimateArgs) -> Result<()> {
    let gene = Gene::from_path(&args.gene_path)?;
    let coverage = Coverage::from_path(&args.coverage_path, args.threshold)?;
    log::info!(
        "Loaded gene {} with {} configurations",
        gene.name,
        gene.cn_configs.len()
    );

    let params = CnParams {
        left_fusion_penalty: args.left_fusion_penalty,
        pce_penalty_coeff: args.pce_penalty_coeff,
        max_cn_error: args.max_cn_error,
        parsimony_penalty: args.parsimony_penalty,
    };
    let solutions = estimate_cn(
        &gene,
        &coverage,
        args.solver,
        args.user_cn.as_deref(),
        &params,
    )?;

    if solutions.iter().any(|s| s.is_infeasible()) {
        log::warn!("No copy-number configuration of {} fits the coverage", gene.name);
    } else {
        log::info!("Found {} copy-number solution(s)", solutions.len());
    }

    println!("#solution\tscore\tconfigs\tregion_cn");
    for (index, solution) in solutions.iter().enumerate() {
        println!("{}", format_solution(index + 1, solution));
    }
    Ok(())
}

fn format_solution(index: usize, solution: &CnSolution) -> String {
    let configs = solution
        .solution()
        .iter()
        .sorted_by_cached_key(|(name, _)| allele_sort_key(name))
        .flat_map(|(name, count)| std::iter::repeat(format!("*{}", name)).take(*count))
        .join(",");
    format!(
        "{}\t{:.2}\t{}\t{}",
        index,
        solution.score(),
        if configs.is_empty() { "." } else { configs.as_str() },
        format_cn(solution.region_cn())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gene::{CnVector, GeneRegion};
    use std::collections::BTreeMap;

    #[test]
    fn solution_row() {
        let gene = Gene::default();
        let cn: CnVector = BTreeMap::from([(0, BTreeMap::from([(GeneRegion::new(1, "e"), 3)]))]);
        let solution = CnSolution::new(
            1.5,
            BTreeMap::from([("10".to_string(), 1), ("2".to_string(), 2)]),
            &cn,
            &gene,
        )
        .unwrap();
        assert_eq!(format_solution(1, &solution), "1\t1.50\t*2,*2,*10\t0:e1=3");
    }

    #[test]
    fn infeasible_row() {
        let gene = Gene::default();
        let solution = CnSolution::infeasible(&gene);
        assert_eq!(format_solution(1, &solution), "1\tinf\t.\t.");
    }
}
