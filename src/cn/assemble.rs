use super::error::CnError;
use super::model::CnOptimum;
use super::structures::Structures;
use crate::gene::{CnVector, Gene};
use crate::solutions::CnSolution;
use std::collections::BTreeMap;

/// Adds `count` copies of `vector` to `total`.
pub(crate) fn add_vector(total: &mut CnVector, vector: &CnVector, count: i32) {
    for (gene_copy, regions) in vector {
        let target = total.entry(*gene_copy).or_default();
        for (region, cn) in regions {
            *target.entry(region.clone()).or_insert(0) += cn * count;
        }
    }
}

/// Turns every tied optimal selection into a `CnSolution` sharing the optimal score.
pub fn assemble_solutions<'a>(
    gene: &'a Gene,
    structures: &Structures,
    optimum: &CnOptimum,
) -> Result<Vec<CnSolution<'a>>, CnError> {
    let mut result = Vec::with_capacity(optimum.selections.len());
    for selection in &optimum.selections {
        let mut region_cn = CnVector::new();
        let mut solution: BTreeMap<String, usize> = BTreeMap::new();
        for id in &selection.structures {
            add_vector(&mut region_cn, &structures[id].cn, 1);
            *solution.entry(id.name.clone()).or_insert(0) += 1;
        }
        let solution = CnSolution::new(optimum.score, solution, &region_cn, gene)?;
        log::debug!("CN solution: {}", solution);
        result.push(solution);
    }
    Ok(result)
}
