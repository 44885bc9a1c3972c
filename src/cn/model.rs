use super::error::CnError;
use super::region_coverage::RegionCoverage;
use super::structures::{StructureId, Structures};
use super::CnParams;
use crate::gene::{CnConfigKind, GeneRegion, PCE_REGION};
use crate::solver::{
    quicksum, LinearExpr, Model, Objective, Sense, SolverBackend, SolverError, Var,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Structures selected by one optimal assignment together with the region errors.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub structures: Vec<StructureId>,
    pub errors: BTreeMap<GeneRegion, f64>,
}

/// Optimal score and every selection that attains it.
#[derive(Debug, Clone, PartialEq)]
pub struct CnOptimum {
    pub score: f64,
    pub selections: Vec<Selection>,
}

/// Copy-number integer program over a set of expanded structures.
///
/// Every structure gets a binary selector and every region an error variable
/// bounded by `max_cn_error`. The difference between the main-gene and
/// pseudogene copy numbers of the chosen structures, corrected by the error,
/// must match the observed coverage difference of each region.
pub struct CnModel {
    model: Model,
    objective: Objective,
    selectors: BTreeMap<StructureId, Var>,
    errors: BTreeMap<GeneRegion, Var>,
}

impl CnModel {
    pub fn build(
        structures: &Structures,
        region_cov: &RegionCoverage,
        params: &CnParams,
    ) -> Self {
        let mut model = Model::new("CN");

        // Full structures take the first columns
        let mut selectors = BTreeMap::new();
        let ordered = structures
            .keys()
            .filter(|id| id.is_full())
            .chain(structures.keys().filter(|id| !id.is_full()));
        for id in ordered {
            selectors.insert(id.clone(), model.add_binary(id.var_name()));
        }

        model.add_constraint(
            "diploid",
            quicksum(
                selectors
                    .iter()
                    .filter(|(id, _)| id.is_full())
                    .map(|(_, v)| *v),
            ),
            Sense::Eq,
            2.0,
        );

        for (id, var) in &selectors {
            let Some(pred) = id.predecessor() else {
                continue;
            };
            let Some(pred_var) = selectors.get(&pred) else {
                continue;
            };
            let expr = LinearExpr::from_var(*var, 1.0).sub(LinearExpr::from_var(*pred_var, 1.0));
            model.add_constraint(
                format!("order_{}_{}", id.name, id.index),
                expr,
                Sense::Le,
                0.0,
            );
        }

        let mut errors = BTreeMap::new();
        for (region, (main_cov, pseudo_cov)) in region_cov {
            let error = model.add_continuous(
                format!("E_{}", region),
                -params.max_cn_error,
                params.max_cn_error,
            );
            let mut expr = LinearExpr::from_var(error, 1.0);
            for (id, structure) in structures {
                let diff = structure.region_cn(0, region) - structure.region_cn(1, region);
                expr.add_term(selectors[id], f64::from(diff));
            }
            model.add_constraint(
                format!("cov_{}", region),
                expr,
                Sense::Eq,
                main_cov - pseudo_cov,
            );
            errors.insert(region.clone(), error);
        }

        // Weak structures lower the pseudogene count, which must never drop below zero
        let negative: BTreeSet<(usize, &GeneRegion)> = structures
            .values()
            .flat_map(|s| {
                s.cn.iter().flat_map(|(gene_copy, regions)| {
                    regions
                        .iter()
                        .filter(|(_, cn)| **cn < 0)
                        .map(move |(region, _)| (*gene_copy, region))
                })
            })
            .collect();
        for (gene_copy, region) in negative {
            let mut expr = LinearExpr::zero();
            for (id, structure) in structures {
                expr.add_term(
                    selectors[id],
                    f64::from(structure.region_cn(gene_copy, region)),
                );
            }
            model.add_constraint(
                format!("nonneg_{}_{}", gene_copy, region),
                expr,
                Sense::Ge,
                0.0,
            );
        }

        let weights: HashMap<Var, f64> = errors
            .get(&*PCE_REGION)
            .map(|v| (*v, params.pce_penalty_coeff))
            .into_iter()
            .collect();
        let mut objective = Objective::abssum(errors.values().copied(), &weights);
        objective.add_linear(&quicksum(selectors.values().copied()), params.parsimony_penalty);
        let left_fusions = selectors
            .iter()
            .filter(|(id, _)| structures[*id].kind == CnConfigKind::LeftFusion)
            .map(|(_, v)| *v);
        objective.add_linear(&quicksum(left_fusions), params.left_fusion_penalty);

        Self {
            model,
            objective,
            selectors,
            errors,
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// Solves the model; `None` when no assignment is feasible.
    pub fn solve(&self, backend: &dyn SolverBackend) -> Result<Option<CnOptimum>, CnError> {
        let solved = match backend.solve_all(&self.model, &self.objective) {
            Ok(solved) => solved,
            Err(SolverError::NoSolution) => {
                log::debug!("CN model status: infeasible ({})", backend.name());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        log::debug!(
            "CN model status: {} ({}), opt: {:.2}",
            solved.status,
            backend.name(),
            solved.objective
        );

        let selections = solved
            .assignments
            .iter()
            .map(|assignment| Selection {
                structures: self
                    .selectors
                    .iter()
                    .filter(|(_, v)| assignment.is_set(**v))
                    .map(|(id, _)| id.clone())
                    .collect(),
                errors: self
                    .errors
                    .iter()
                    .map(|(region, v)| (region.clone(), assignment.value(*v)))
                    .collect(),
            })
            .collect();
        Ok(Some(CnOptimum {
            score: solved.objective,
            selections,
        }))
    }
}
