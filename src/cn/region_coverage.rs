use crate::coverage::Coverage;
use crate::gene::{Gene, GeneRegion, PCE_REGION};
use std::collections::{BTreeMap, BTreeSet};

/// Observed (main gene, pseudogene) coverage of each region used by the model.
pub type RegionCoverage = BTreeMap<GeneRegion, (f64, f64)>;

pub fn region_coverage(gene: &Gene, coverage: &Coverage) -> RegionCoverage {
    if !gene.has_pseudogenes() {
        return gene
            .unique_regions
            .iter()
            .map(|r| (r.clone(), (coverage.region_coverage(0, r), 0.0)))
            .collect();
    }

    let mut cov: RegionCoverage = gene
        .unique_regions
        .iter()
        .filter(|r| !r.is_pce())
        .map(|r| {
            (
                r.clone(),
                (coverage.region_coverage(0, r), coverage.region_coverage(1, r)),
            )
        })
        .collect();
    // The PCE region may exist only in the pseudogene; give the main gene a zero entry.
    if gene.has_region(1, &PCE_REGION) && !gene.has_region(0, &PCE_REGION) {
        cov.insert(
            PCE_REGION.clone(),
            (0.0, coverage.region_coverage(1, &PCE_REGION)),
        );
    }
    cov
}

/// One more than the largest region coverage of any gene copy, rounded half to even.
pub fn max_observed_cn(gene: &Gene, coverage: &Coverage) -> i32 {
    1 + gene
        .regions
        .iter()
        .flat_map(|(gene_copy, regions)| {
            regions
                .keys()
                .map(move |r| coverage.region_coverage(*gene_copy, r).round_ties_even() as i32)
        })
        .max()
        .unwrap_or(0)
}

/// Debug table of the coverage of every region of the main gene and the pseudogene.
pub fn log_coverage(gene: &Gene, coverage: &Coverage) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    let regions: BTreeSet<&GeneRegion> = gene.regions.values().flat_map(|r| r.keys()).collect();
    let cov_of = |gene_copy: usize, region: &GeneRegion| {
        if gene.has_region(gene_copy, region) {
            coverage.region_coverage(gene_copy, region)
        } else {
            0.0
        }
    };
    for region in regions {
        let (main, pseudo) = (cov_of(0, region), cov_of(1, region));
        let diff = if gene.unique_regions.contains(region) {
            format!("* with diff = {:5.2}", main - pseudo)
        } else {
            String::new()
        };
        log::debug!(
            "Region {:>5} {:2}: {:5.2} {:5.2} {}",
            region.kind,
            region.number,
            main,
            pseudo,
            diff
        );
    }
}
