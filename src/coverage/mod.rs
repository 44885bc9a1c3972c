//! Per-region and per-mutation read coverage of one sample.

mod reader;

use crate::gene::{GeneRegion, Mutation};
use std::collections::BTreeMap;

/// Reads supporting the reference at a position are stored under the op `_`.
#[derive(Debug, Clone, PartialEq)]
pub struct Coverage {
    region_cov: BTreeMap<(usize, GeneRegion), f64>,
    mutations: BTreeMap<u64, BTreeMap<String, f64>>,
    threshold: f64,
}

impl Coverage {
    /// `threshold` is the minimum fraction of the position coverage that a mutation needs.
    pub fn new(threshold: f64) -> Self {
        Self {
            region_cov: BTreeMap::new(),
            mutations: BTreeMap::new(),
            threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn set_region_coverage(&mut self, gene_copy: usize, region: GeneRegion, cov: f64) {
        self.region_cov.insert((gene_copy, region), cov);
    }

    pub fn add_mutation_coverage(&mut self, pos: u64, op: impl Into<String>, reads: f64) {
        *self
            .mutations
            .entry(pos)
            .or_default()
            .entry(op.into())
            .or_insert(0.0) += reads;
    }

    /// Average copy number of `region` in `gene_copy`; 0 if never observed.
    pub fn region_coverage(&self, gene_copy: usize, region: &GeneRegion) -> f64 {
        self.region_cov
            .get(&(gene_copy, region.clone()))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn coverage(&self, mutation: &Mutation) -> f64 {
        self.mutations
            .get(&mutation.pos)
            .and_then(|ops| ops.get(&mutation.op))
            .copied()
            .unwrap_or(0.0)
    }

    /// Total read coverage at `pos` across all ops.
    pub fn total(&self, pos: u64) -> f64 {
        self.mutations
            .get(&pos)
            .map(|ops| ops.values().sum())
            .unwrap_or(0.0)
    }

    /// Returns a view without the mutation entries rejected by `filter`, which
    /// receives the mutation, its coverage, the position total and the threshold.
    /// Totals are taken from the unfiltered coverage.
    pub fn filtered<F>(&self, filter: F) -> Coverage
    where
        F: Fn(&Mutation, f64, f64, f64) -> bool,
    {
        let mut mutations = BTreeMap::new();
        for (pos, ops) in &self.mutations {
            let total = self.total(*pos);
            let kept: BTreeMap<String, f64> = ops
                .iter()
                .filter(|(op, cov)| {
                    let mutation = Mutation::new(*pos, op.as_str(), false);
                    filter(&mutation, **cov, total, self.threshold)
                })
                .map(|(op, cov)| (op.clone(), *cov))
                .collect();
            if !kept.is_empty() {
                mutations.insert(*pos, kept);
            }
        }
        Coverage {
            region_cov: self.region_cov.clone(),
            mutations,
            threshold: self.threshold,
        }
    }

    /// Keeps mutations supported by at least one read and by `thres` of the total coverage.
    pub fn basic_filter(_mutation: &Mutation, cov: f64, total: f64, thres: f64) -> bool {
        cov >= f64::max(1.0, total * thres)
    }
}
