use super::assemble::add_vector;
use super::error::CnError;
use crate::gene::{CnVector, Gene};
use crate::solutions::CnSolution;
use std::collections::BTreeMap;

/// Builds the copy-number solution given by a list of configuration names,
/// where repeated names denote multiple copies.
pub fn parse_user_solution<'a>(
    gene: &'a Gene,
    names: &[String],
) -> Result<CnSolution<'a>, CnError> {
    let mut solution: BTreeMap<String, usize> = BTreeMap::new();
    for name in names {
        if !gene.cn_configs.contains_key(name) {
            return Err(CnError::UnknownConfiguration(name.clone()));
        }
        *solution.entry(name.clone()).or_insert(0) += 1;
    }

    let mut region_cn = CnVector::new();
    for (name, count) in &solution {
        let count = i32::try_from(*count).unwrap_or(i32::MAX);
        add_vector(&mut region_cn, &gene.cn_configs[name].cn, count);
    }
    let solution = CnSolution::new(0.0, solution, &region_cn, gene)?;
    log::debug!("User-provided CN solution: {}", solution);
    Ok(solution)
}
